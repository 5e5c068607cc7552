//! Type-specific formatting overrides.
//!
//! Before a value is rendered structurally, every registered [`Filter`] is
//! tried in order. The first one that returns [`Outcome::Handled`] wins; if
//! all of them decline, the value is rendered by its [`Kind`].
//!
//! A filter receives a [`FilterPrinter`] it can use to render parts of the
//! value it is handling with the full rules of the printer, including the
//! shared map renderer.
//!
//! ## Writing a filter
//!
//! ```rust
//! use lucid::{to_string_with_config, Config, FilterPrinter, Outcome, Result, Value};
//! use std::io::Write;
//!
//! fn upper_filter(
//!     w: &mut dyn Write,
//!     v: &Value<'_>,
//!     p: &mut FilterPrinter<'_, '_>,
//! ) -> Result<Outcome> {
//!     match v.value.downcast_ref::<String>() {
//!         Some(s) => {
//!             p.write_annotated(w, v, &s.to_uppercase())?;
//!             Ok(Outcome::Handled)
//!         }
//!         None => Ok(Outcome::Declined),
//!     }
//! }
//!
//! let config = Config::new().with_filter(upper_filter);
//! let text = to_string_with_config(&vec!["abc".to_string()], &config).unwrap();
//! assert_eq!(text, "Vec<String>[\n    ABC\n]");
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::map;
use crate::reflect::{Kind, MapView, Type};
use crate::value::Value;
use crate::visitor::Visitor;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, Utc};
use std::io::Write;
use std::time::{Duration, SystemTime};

/// What a filter did with a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The value was rendered; no other filter and no structural rendering
    /// is applied to it.
    Handled,
    /// The filter does not apply to this value.
    Declined,
}

/// A type-specific formatting override.
///
/// An error returned by a filter aborts the whole traversal and reaches the
/// caller unchanged. Wrap foreign errors with
/// [`Error::filter`](crate::Error::filter) to keep them downcastable.
///
/// Filters may write any bytes. Rendering to a `String` fails with
/// [`Error::Utf8`](crate::Error::Utf8) if they are not UTF-8.
pub type Filter = fn(&mut dyn Write, &Value<'_>, &mut FilterPrinter<'_, '_>) -> Result<Outcome>;

/// The filters used by [`Config::new`], in order.
pub const DEFAULT_FILTERS: &[Filter] = &[type_filter, time_filter, duration_filter, sync_filter];

/// Gives filters access to the printer driving the current traversal.
pub struct FilterPrinter<'v, 'c> {
    visitor: &'v mut Visitor<'c>,
}

impl<'v, 'c> FilterPrinter<'v, 'c> {
    pub(crate) fn new(visitor: &'v mut Visitor<'c>) -> Self {
        FilterPrinter { visitor }
    }

    /// Renders `v` through the filter chain and the structural renderers.
    pub fn write(&mut self, w: &mut dyn Write, v: &Value<'_>) -> Result<()> {
        self.visitor.visit(w, v)
    }

    /// Renders `entries` the way maps are rendered: keys sorted by their
    /// rendered text and values aligned in one column.
    ///
    /// Only the `{...}` body is written; the caller writes any type
    /// annotation.
    pub fn write_map(&mut self, w: &mut dyn Write, v: &Value<'_>, entries: &MapView<'_>) -> Result<()> {
        map::write_map(self.visitor, w, v, entries)
    }

    /// Writes `text`, wrapped as `TypeName(text)` if the type of `v` is
    /// ambiguous.
    pub fn write_annotated(&mut self, w: &mut dyn Write, v: &Value<'_>, text: &str) -> Result<()> {
        if v.is_ambiguous_type() {
            write!(w, "{}({})", self.type_name(v), text)?;
        } else {
            w.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    /// The name used to annotate `v`.
    #[must_use]
    pub fn type_name<'a>(&self, v: &'a Value<'_>) -> &'a str {
        v.type_name()
    }

    /// The configuration of the printer.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.visitor.config()
    }
}

/// Renders [`Type`] values as the name of the type they describe.
pub fn type_filter(w: &mut dyn Write, v: &Value<'_>, p: &mut FilterPrinter<'_, '_>) -> Result<Outcome> {
    match v.value.downcast_ref::<Type>() {
        Some(ty) => {
            p.write_annotated(w, v, ty.name())?;
            Ok(Outcome::Handled)
        }
        None => Ok(Outcome::Declined),
    }
}

/// Renders date and time values.
///
/// Zoned `chrono` timestamps and [`SystemTime`] use RFC 3339; naive values
/// use their `Display` form.
pub fn time_filter(w: &mut dyn Write, v: &Value<'_>, p: &mut FilterPrinter<'_, '_>) -> Result<Outcome> {
    let any = v.value;
    let text = if let Some(t) = any.downcast_ref::<DateTime<Utc>>() {
        t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    } else if let Some(t) = any.downcast_ref::<DateTime<FixedOffset>>() {
        t.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    } else if let Some(t) = any.downcast_ref::<DateTime<Local>>() {
        t.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    } else if let Some(t) = any.downcast_ref::<SystemTime>() {
        DateTime::<Utc>::from(*t).to_rfc3339_opts(SecondsFormat::AutoSi, true)
    } else if let Some(t) = any.downcast_ref::<NaiveDateTime>() {
        t.to_string()
    } else if let Some(t) = any.downcast_ref::<NaiveDate>() {
        t.to_string()
    } else if let Some(t) = any.downcast_ref::<NaiveTime>() {
        t.to_string()
    } else {
        return Ok(Outcome::Declined);
    };

    p.write_annotated(w, v, &text)?;
    Ok(Outcome::Handled)
}

/// Renders [`Duration`] values as `1.5s` and `chrono` [`TimeDelta`] values
/// in ISO 8601.
pub fn duration_filter(w: &mut dyn Write, v: &Value<'_>, p: &mut FilterPrinter<'_, '_>) -> Result<Outcome> {
    let text = if let Some(d) = v.value.downcast_ref::<Duration>() {
        format!("{d:?}")
    } else if let Some(d) = v.value.downcast_ref::<TimeDelta>() {
        d.to_string()
    } else {
        return Ok(Outcome::Declined);
    };

    p.write_annotated(w, v, &text)?;
    Ok(Outcome::Handled)
}

/// Renders the contents of lock cells (`Mutex`, `RwLock`, `RefCell`,
/// `Cell`).
///
/// The cell is acquired without blocking. Its contents are rendered in
/// place of the cell; a cell held elsewhere renders as
/// `TypeName(<locked>)`. Poisoned locks are rendered normally.
pub fn sync_filter(w: &mut dyn Write, v: &Value<'_>, p: &mut FilterPrinter<'_, '_>) -> Result<Outcome> {
    let Kind::Lock(cell) = v.value.reflect() else {
        return Ok(Outcome::Declined);
    };

    let inner_type = cell.inner_type();
    let acquired = cell.with_inner(&mut |inner| p.write(&mut *w, &Value::pointee(inner, inner_type.clone(), v)))?;
    if !acquired {
        write!(w, "{}(<locked>)", v.type_name())?;
    }
    Ok(Outcome::Handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_string, to_string_with_config, Typed};
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[test]
    fn test_type_filter() {
        assert_eq!(to_string(&i32::static_type()).unwrap(), "Type(i32)");
        assert_eq!(
            to_string(&vec![String::static_type()]).unwrap(),
            "Vec<Type>[\n    String\n]"
        );
    }

    #[test]
    fn test_time_filter() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(to_string(&t).unwrap(), "DateTime<Utc>(2024-01-02T03:04:05Z)");
        assert_eq!(to_string(&Some(t)).unwrap(), "Option<DateTime<Utc>>(Some(2024-01-02T03:04:05Z))");

        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(to_string(&date).unwrap(), "NaiveDate(2024-02-29)");
    }

    #[test]
    fn test_duration_filter() {
        assert_eq!(to_string(&Duration::from_millis(1500)).unwrap(), "Duration(1.5s)");
        assert_eq!(to_string(&vec![Duration::from_secs(2)]).unwrap(), "Vec<Duration>[\n    2s\n]");
    }

    #[test]
    fn test_sync_filter_renders_contents() {
        let mutex = Mutex::new(vec![1u8]);
        assert_eq!(to_string(&mutex).unwrap(), "Vec<u8>[\n    1\n]");
    }

    #[test]
    fn test_sync_filter_reports_held_lock() {
        let mutex = Mutex::new(1u8);
        let _held = mutex.lock().unwrap();
        assert_eq!(to_string(&mutex).unwrap(), "Mutex<u8>(<locked>)");
    }

    #[test]
    fn test_without_filters_values_are_opaque() {
        let config = Config::bare();
        let mutex = Mutex::new(1u8);
        assert_eq!(to_string_with_config(&mutex, &config).unwrap(), "Mutex<u8>(<opaque>)");
        assert_eq!(
            to_string_with_config(&Duration::from_secs(1), &config).unwrap(),
            "Duration(1s)"
        );
    }
}
