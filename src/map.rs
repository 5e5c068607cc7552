//! Rendering of associative containers.
//!
//! Keys are rendered to a buffer first, then sorted by their rendered text,
//! so the output does not depend on the container's iteration order. Values
//! are aligned in one column. A key that spans several lines contributes its
//! longest line to the column width and its last line to the padding, since
//! the `": "` separator follows the last line.
//!
//! ```text
//! {
//!     "short":                         1
//!     "the longest key in the galaxy": 2
//! }
//! ```

use crate::error::Result;
use crate::io::Indenter;
use crate::reflect::{MapView, Reflect};
use crate::value::Value;
use crate::visitor::Visitor;
use std::io::Write;

/// A rendered key, alive for one map render.
struct MapKey<'a> {
    text: String,
    /// Width of the last line of `text`.
    width: usize,
    value: &'a dyn Reflect,
}

/// Writes the `{...}` body of a map.
///
/// Type annotations are the caller's concern: an empty map is exactly `{}`.
pub(crate) fn write_map(vis: &mut Visitor<'_>, w: &mut dyn Write, v: &Value<'_>, view: &MapView<'_>) -> Result<()> {
    if view.entries.is_empty() {
        w.write_all(b"{}")?;
        return Ok(());
    }

    let indent = vis.indent();
    w.write_all(b"{\n")?;
    write_entries(vis, &mut Indenter::new(&mut *w, indent), v, view)?;
    w.write_all(b"}")?;
    Ok(())
}

fn write_entries(vis: &mut Visitor<'_>, w: &mut dyn Write, v: &Value<'_>, view: &MapView<'_>) -> Result<()> {
    let (keys, alignment) = format_map_keys(vis, v, view)?;

    for key in &keys {
        debug_assert!(alignment >= key.width, "key wider than the value column");
        let padding = alignment - key.width;
        write!(w, "{}: {:padding$}", key.text, "")?;
        vis.visit(w, &Value::element(key.value, view.value.clone(), v))?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// Renders every key and returns them sorted by their text, along with the
/// column the values are aligned to.
fn format_map_keys<'a>(vis: &mut Visitor<'_>, v: &Value<'_>, view: &MapView<'a>) -> Result<(Vec<MapKey<'a>>, usize)> {
    let mut keys = Vec::with_capacity(view.entries.len());
    let mut alignment = 0;
    let mut align_to_last_line = false;

    for &(key, value) in &view.entries {
        let text = vis.render(&Value::element(key, view.key.clone(), v))?;

        // a tie goes to a key whose widest line is its last
        let (max, last) = widths(&text);
        if max > alignment {
            alignment = max;
            align_to_last_line = max == last;
        } else if max == alignment {
            align_to_last_line |= max == last;
        }

        keys.push(MapKey { text, width: last, value });
    }

    keys.sort_by(|a, b| a.text.cmp(&b.text));

    // the widest line is not followed by the ":" separator
    if !align_to_last_line {
        alignment -= 1;
    }

    Ok((keys, alignment))
}

/// Returns the number of characters in the longest and in the last line of
/// `s`.
fn widths(s: &str) -> (usize, usize) {
    let mut max = 0;
    let mut last = 0;
    for line in s.split('\n') {
        last = line.chars().count();
        max = max.max(last);
    }
    (max, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::reflect::{Kind, Typed};
    use std::collections::BTreeMap;

    fn body<T: Reflect>(map: &T) -> String {
        let config = Config::bare();
        let mut vis = Visitor::new(&config);
        let Kind::Map(view) = map.reflect() else {
            panic!("expected map");
        };
        let mut out = Vec::new();
        write_map(&mut vis, &mut out, &Value::root(map), &view).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_widths() {
        assert_eq!(widths("abc"), (3, 3));
        assert_eq!(widths("[\n    1\n]"), (5, 1));
        assert_eq!(widths("a\n"), (1, 0));
        assert_eq!(widths("ü"), (1, 1));
    }

    #[test]
    fn test_integer_keys() {
        let map: BTreeMap<i32, i32> = [(2, 200), (1, 100)].into_iter().collect();
        assert_eq!(body(&map), "{\n    1: 100\n    2: 200\n}");
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(body(&BTreeMap::<String, Vec<u8>>::new()), "{}");
    }

    #[test]
    fn test_values_align_to_widest_key() {
        let map: BTreeMap<&'static str, u8> = [("short", 1), ("the longest key in the galaxy", 2)]
            .into_iter()
            .collect();
        assert_eq!(
            body(&map),
            "{\n    \"short\":                         1\n    \"the longest key in the galaxy\": 2\n}"
        );

        let map: BTreeMap<&'static str, u8> = [("short", 1), ("mid", 2)].into_iter().collect();
        assert_eq!(body(&map), "{\n    \"mid\":   2\n    \"short\": 1\n}");
    }

    fn body_of(entries: &[(&Option<Vec<i32>>, &u8)]) -> String {
        let view = MapView {
            key: Option::<Vec<i32>>::static_type(),
            value: u8::static_type(),
            entries: entries
                .iter()
                .map(|&(k, v)| (k as &dyn Reflect, v as &dyn Reflect))
                .collect(),
        };
        let config = Config::bare();
        let mut vis = Visitor::new(&config);
        let mut out = Vec::new();
        write_map(&mut vis, &mut out, &Value::root(&()), &view).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tied_widest_lines_ignore_entry_order() {
        let flat: Option<Vec<i32>> = Some(vec![]);
        let tall: Option<Vec<i32>> = Some(vec![1000]);
        let (one, two) = (1u8, 2u8);

        let expected = "{\n    Some([\n        1000\n    ]):       2\n    Some([]): 1\n}";
        assert_eq!(body_of(&[(&flat, &one), (&tall, &two)]), expected);
        assert_eq!(body_of(&[(&tall, &two), (&flat, &one)]), expected);
    }

    #[test]
    fn test_tied_widest_lines_none_last() {
        let first: Option<Vec<i32>> = Some(vec![1000]);
        let second: Option<Vec<i32>> = Some(vec![2000]);
        let (one, two) = (1u8, 2u8);

        let expected = "{\n    Some([\n        1000\n    ]):      1\n    Some([\n        2000\n    ]):      2\n}";
        assert_eq!(body_of(&[(&first, &one), (&second, &two)]), expected);
        assert_eq!(body_of(&[(&second, &two), (&first, &one)]), expected);
    }

    #[test]
    fn test_multi_line_keys() {
        let map: BTreeMap<Vec<i32>, u8> = [(vec![], 20), (vec![1, 2], 10)].into_iter().collect();
        assert_eq!(
            body(&map),
            "{\n    [\n        1\n        2\n    ]:    10\n    []:   20\n}"
        );
    }
}
