//! Printer configuration.
//!
//! A [`Config`] is built once and owned by a [`Printer`](crate::Printer). It
//! holds the indent unit, the recursion marker and the ordered filter list.
//!
//! ## Examples
//!
//! ```rust
//! use lucid::{to_string_with_config, Config};
//! use std::collections::BTreeMap;
//!
//! let mut map = BTreeMap::new();
//! map.insert("a", 1);
//!
//! let config = Config::new().with_indent("  ");
//! let text = to_string_with_config(&map, &config).unwrap();
//! assert_eq!(text, "BTreeMap<&str, i32>{\n  \"a\": 1\n}");
//! ```

use crate::filter::{Filter, DEFAULT_FILTERS};
use std::fmt;

/// The indent used when [`Config::indent`] is empty.
pub const DEFAULT_INDENT: &str = "    ";

/// The marker used when [`Config::recursion_marker`] is empty.
pub const DEFAULT_RECURSION_MARKER: &str = "<recursion>";

/// Configuration for a [`Printer`](crate::Printer).
///
/// # Examples
///
/// ```rust
/// use lucid::Config;
///
/// // Default filters, four-space indent, `<recursion>` marker
/// let config = Config::new();
/// assert_eq!(config.filters.len(), 4);
///
/// // No filters at all
/// let config = Config::bare().with_recursion_marker("<cycle>");
/// assert!(config.filters.is_empty());
/// ```
#[derive(Clone)]
pub struct Config {
    /// Filters tried in order before generic rendering.
    pub filters: Vec<Filter>,
    /// The string used to indent nested values. Empty means
    /// [`DEFAULT_INDENT`].
    pub indent: String,
    /// Displayed instead of a value that is already being rendered. Empty
    /// means [`DEFAULT_RECURSION_MARKER`].
    pub recursion_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            filters: DEFAULT_FILTERS.to_vec(),
            indent: DEFAULT_INDENT.to_string(),
            recursion_marker: DEFAULT_RECURSION_MARKER.to_string(),
        }
    }
}

impl Config {
    /// Creates a configuration with the [`DEFAULT_FILTERS`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration without any filters.
    ///
    /// Time, duration and lock values are then rendered structurally, as
    /// opaque values.
    #[must_use]
    pub fn bare() -> Self {
        Config {
            filters: Vec::new(),
            ..Default::default()
        }
    }

    /// Sets the string used to indent nested values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lucid::Config;
    ///
    /// let config = Config::new().with_indent("\t");
    /// assert_eq!(config.indent, "\t");
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the text displayed when recursion is detected.
    #[must_use]
    pub fn with_recursion_marker(mut self, marker: impl Into<String>) -> Self {
        self.recursion_marker = marker.into();
        self
    }

    /// Appends a filter, tried after the filters already registered.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replaces the filter list.
    #[must_use]
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters = filters.into_iter().collect();
        self
    }

    pub(crate) fn effective_indent(&self) -> &str {
        if self.indent.is_empty() {
            DEFAULT_INDENT
        } else {
            &self.indent
        }
    }

    pub(crate) fn effective_recursion_marker(&self) -> &str {
        if self.recursion_marker.is_empty() {
            DEFAULT_RECURSION_MARKER
        } else {
            &self.recursion_marker
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("filters", &self.filters.len())
            .field("indent", &self.indent)
            .field("recursion_marker", &self.recursion_marker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = Config::new().with_indent("").with_recursion_marker("");
        assert_eq!(config.effective_indent(), DEFAULT_INDENT);
        assert_eq!(config.effective_recursion_marker(), DEFAULT_RECURSION_MARKER);
    }

    #[test]
    fn test_with_filters_replaces_defaults() {
        let config = Config::new().with_filters([crate::filter::type_filter as Filter]);
        assert_eq!(config.filters.len(), 1);

        let config = Config::bare().with_filter(crate::filter::sync_filter);
        assert_eq!(config.filters.len(), 1);
    }
}
