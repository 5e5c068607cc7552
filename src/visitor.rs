//! Generic dispatch over [`Kind`], and the renderers for every kind except
//! maps (see [`crate::map`]).

use crate::config::Config;
use crate::error::Result;
use crate::filter::{FilterPrinter, Outcome};
use crate::guard::RecursionGuard;
use crate::io::Indenter;
use crate::map;
use crate::reflect::{EnumView, Field, Kind, MapView, OptionView, PointerView, Reflect, SeqView, StructStyle, StructView};
use crate::value::Value;
use std::io::Write;

/// State for one top-level traversal.
pub(crate) struct Visitor<'c> {
    config: &'c Config,
    indent: &'c str,
    marker: &'c str,
    guard: RecursionGuard,
}

impl<'c> Visitor<'c> {
    pub(crate) fn new(config: &'c Config) -> Self {
        Visitor {
            config,
            indent: config.effective_indent(),
            marker: config.effective_recursion_marker(),
            guard: RecursionGuard::new(),
        }
    }

    pub(crate) fn config(&self) -> &'c Config {
        self.config
    }

    pub(crate) fn indent(&self) -> &'c str {
        self.indent
    }

    /// Renders `v` to `w`, trying the filters first.
    pub(crate) fn visit(&mut self, w: &mut dyn Write, v: &Value<'_>) -> Result<()> {
        let config = self.config;
        for filter in &config.filters {
            match filter(w, v, &mut FilterPrinter::new(self)) {
                Ok(Outcome::Handled) => return Ok(()),
                Ok(Outcome::Declined) => {}
                Err(err) => {
                    tracing::debug!(type_name = v.type_name(), error = %err, "filter aborted rendering");
                    return Err(err);
                }
            }
        }

        self.visit_kind(w, v)
    }

    /// Renders `v` to a string instead of the output stream.
    pub(crate) fn render(&mut self, v: &Value<'_>) -> Result<String> {
        let mut buf = Vec::new();
        self.visit(&mut buf, v)?;
        Ok(String::from_utf8(buf)?)
    }

    fn visit_kind(&mut self, w: &mut dyn Write, v: &Value<'_>) -> Result<()> {
        match v.value.reflect() {
            Kind::Bool(b) => write_scalar(w, v, &b.to_string()),
            Kind::Int(n) => write_scalar(w, v, &n.to_string()),
            Kind::Uint(n) => write_scalar(w, v, &n.to_string()),
            Kind::Float(f) => write_scalar(w, v, &format!("{f:?}")),
            Kind::Char(c) => write_scalar(w, v, &format!("{c:?}")),
            Kind::Str(s) => write_scalar(w, v, &format!("{s:?}")),
            Kind::Unit => write_scalar(w, v, "()"),
            Kind::Literal(text) => write_scalar(w, v, &text),
            Kind::Opaque(text) => {
                write!(w, "{}({})", v.type_name(), text)?;
                Ok(())
            }
            Kind::Struct(view) => self.visit_struct(w, v, &view),
            Kind::Enum(view) => self.visit_enum(w, v, &view),
            Kind::Seq(view) => self.visit_seq(w, v, &view),
            Kind::Map(view) => self.visit_map(w, v, &view),
            Kind::Option(view) => self.visit_option(w, v, &view),
            Kind::Pointer(view) => self.visit_pointer(w, v, &view),
            // Only reachable without the sync filter.
            Kind::Lock(_) => {
                write!(w, "{}(<opaque>)", v.type_name())?;
                Ok(())
            }
        }
    }

    /// Runs `body` with `v` marked as being rendered, or writes the
    /// recursion marker if it already is.
    ///
    /// `target` is the data `v` refers to: the pointee of a pointer, or `v`
    /// itself for containers.
    fn guarded<F>(&mut self, w: &mut dyn Write, v: &Value<'_>, target: &dyn Reflect, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self, &mut dyn Write) -> Result<()>,
    {
        let Some(identity) = RecursionGuard::identity(v.value, target) else {
            return body(self, w);
        };

        if self.guard.enter(identity) {
            tracing::trace!(type_name = v.type_name(), "recursion detected");
            write!(w, "{}({})", v.type_name(), self.marker)?;
            return Ok(());
        }

        let result = body(self, w);
        self.guard.leave(&identity);
        result
    }

    fn visit_struct(&mut self, w: &mut dyn Write, v: &Value<'_>, view: &StructView<'_>) -> Result<()> {
        if v.is_ambiguous_type() {
            w.write_all(v.type_name().as_bytes())?;
        }
        self.visit_fields(w, v, view.style, &view.fields)
    }

    fn visit_enum(&mut self, w: &mut dyn Write, v: &Value<'_>, view: &EnumView<'_>) -> Result<()> {
        if v.is_ambiguous_type() {
            write!(w, "{}::", v.type_name())?;
        }
        w.write_all(view.variant.as_bytes())?;

        match view.style {
            StructStyle::Unit => Ok(()),
            style => self.visit_fields(w, v, style, &view.fields),
        }
    }

    fn visit_fields(&mut self, w: &mut dyn Write, v: &Value<'_>, style: StructStyle, fields: &[Field<'_>]) -> Result<()> {
        match style {
            StructStyle::Tuple => {
                w.write_all(b"(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        w.write_all(b", ")?;
                    }
                    self.visit(w, &Value::field(field, v))?;
                }
                w.write_all(b")")?;
            }
            StructStyle::Named if !fields.is_empty() => {
                let alignment = fields.iter().map(|f| f.name.chars().count()).max().unwrap_or(0);

                w.write_all(b"{\n")?;
                let mut indented = Indenter::new(&mut *w, self.indent);
                for field in fields {
                    let padding = alignment - field.name.chars().count();
                    write!(indented, "{}: {:padding$}", field.name, "")?;
                    self.visit(&mut indented, &Value::field(field, v))?;
                    indented.write_all(b"\n")?;
                }
                w.write_all(b"}")?;
            }
            StructStyle::Named | StructStyle::Unit => w.write_all(b"{}")?,
        }
        Ok(())
    }

    fn visit_seq(&mut self, w: &mut dyn Write, v: &Value<'_>, view: &SeqView<'_>) -> Result<()> {
        self.guarded(w, v, v.value, |vis, w| {
            if v.is_ambiguous_type() {
                w.write_all(v.type_name().as_bytes())?;
            }

            if view.items.is_empty() {
                w.write_all(b"[]")?;
                return Ok(());
            }

            w.write_all(b"[\n")?;
            let mut indented = Indenter::new(&mut *w, vis.indent);
            if view.ordered {
                for &item in &view.items {
                    vis.visit(&mut indented, &Value::element(item, view.elem.clone(), v))?;
                    indented.write_all(b"\n")?;
                }
            } else {
                let mut rendered = view
                    .items
                    .iter()
                    .map(|&item| vis.render(&Value::element(item, view.elem.clone(), v)))
                    .collect::<Result<Vec<_>>>()?;
                rendered.sort();

                for text in &rendered {
                    indented.write_all(text.as_bytes())?;
                    indented.write_all(b"\n")?;
                }
            }
            w.write_all(b"]")?;
            Ok(())
        })
    }

    fn visit_map(&mut self, w: &mut dyn Write, v: &Value<'_>, view: &MapView<'_>) -> Result<()> {
        self.guarded(w, v, v.value, |vis, w| {
            if v.is_ambiguous_type() {
                w.write_all(v.type_name().as_bytes())?;
            }
            map::write_map(vis, w, v, view)
        })
    }

    fn visit_option(&mut self, w: &mut dyn Write, v: &Value<'_>, view: &OptionView<'_>) -> Result<()> {
        let ambiguous = v.is_ambiguous_type();
        if ambiguous {
            write!(w, "{}(", v.type_name())?;
        }

        match view.value {
            Some(inner) => {
                w.write_all(b"Some(")?;
                self.visit(w, &Value::element(inner, view.elem.clone(), v))?;
                w.write_all(b")")?;
            }
            None => w.write_all(b"None")?,
        }

        if ambiguous {
            w.write_all(b")")?;
        }
        Ok(())
    }

    fn visit_pointer(&mut self, w: &mut dyn Write, v: &Value<'_>, view: &PointerView<'_>) -> Result<()> {
        let target = Value::pointee(view.target, view.pointee.clone(), v);
        self.guarded(w, v, view.target, |vis, w| vis.visit(w, &target))
    }
}

/// Writes a scalar literal, annotated when its type is ambiguous and not
/// already implied by the literal syntax.
fn write_scalar(w: &mut dyn Write, v: &Value<'_>, literal: &str) -> Result<()> {
    if v.is_ambiguous_type() && !v.dynamic_type.is_implied_by_literal() {
        write!(w, "{}({})", v.type_name(), literal)?;
    } else {
        w.write_all(literal.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};
    use std::rc::Rc;

    fn render<T: Reflect>(value: &T) -> String {
        let config = Config::bare();
        let mut visitor = Visitor::new(&config);
        visitor.render(&Value::root(value)).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(&42i32), "i32(42)");
        assert_eq!(render(&-1i8), "i8(-1)");
        assert_eq!(render(&1.0f64), "f64(1.0)");
        assert_eq!(render(&0.1f32), "f32(0.1)");
        assert_eq!(render(&true), "true");
        assert_eq!(render(&'x'), "'x'");
        assert_eq!(render(&()), "()");
        assert_eq!(render(&String::from("a\"b")), "\"a\\\"b\"");
    }

    #[test]
    fn test_sequences() {
        assert_eq!(render(&Vec::<i32>::new()), "Vec<i32>[]");
        assert_eq!(render(&vec![1u8, 2]), "Vec<u8>[\n    1\n    2\n]");
        assert_eq!(render(&[true]), "[bool; 1][\n    true\n]");
    }

    #[test]
    fn test_sets_are_sorted() {
        let set: HashSet<&'static str> = ["pear", "apple", "fig"].into_iter().collect();
        assert_eq!(
            render(&set),
            "HashSet<&str>[\n    \"apple\"\n    \"fig\"\n    \"pear\"\n]"
        );

        // Sorted by rendered text, not numerically.
        let set: BTreeSet<u32> = [9, 10].into_iter().collect();
        assert_eq!(render(&set), "BTreeSet<u32>[\n    10\n    9\n]");
    }

    #[test]
    fn test_tuples_and_options() {
        assert_eq!(render(&(1u8, "a")), "(u8, &str)(1, \"a\")");
        assert_eq!(render(&Some(5u16)), "Option<u16>(Some(5))");
        assert_eq!(render(&None::<u16>), "Option<u16>(None)");
        assert_eq!(render(&vec![Some(1i64), None]), "Vec<Option<i64>>[\n    Some(1)\n    None\n]");
    }

    #[test]
    fn test_pointers_are_transparent() {
        assert_eq!(render(&Box::new(7u8)), "u8(7)");
        assert_eq!(render(&vec![Rc::new(7u8)]), "Vec<Rc<u8>>[\n    7\n]");

        let erased: Vec<Box<dyn Reflect>> = vec![Box::new(7u8), Box::new("s")];
        assert_eq!(
            render(&erased),
            "Vec<Box<dyn Reflect>>[\n    u8(7)\n    \"s\"\n]"
        );
    }

    thread_local! {
        static REFUSE: std::cell::Cell<bool> = std::cell::Cell::new(false);
    }

    fn refuse_u8(_: &mut dyn Write, v: &Value<'_>, _: &mut FilterPrinter<'_, '_>) -> Result<Outcome> {
        if REFUSE.with(|refuse| refuse.get()) && v.value.downcast_ref::<u8>().is_some() {
            return Err(crate::Error::custom("refused"));
        }
        Ok(Outcome::Declined)
    }

    #[test]
    fn test_guard_is_left_after_filter_error() {
        let shared = Rc::new(vec![1u8]);
        let siblings = vec![Rc::clone(&shared), Rc::clone(&shared)];
        let config = Config::bare().with_filter(refuse_u8);
        let mut visitor = Visitor::new(&config);

        REFUSE.with(|refuse| refuse.set(true));
        assert!(visitor.render(&Value::root(&shared)).is_err());
        assert_eq!(visitor.guard.depth(), 0);

        REFUSE.with(|refuse| refuse.set(false));
        assert_eq!(visitor.render(&Value::root(&shared)).unwrap(), "Vec<u8>[\n    1\n]");
        assert_eq!(
            visitor.render(&Value::root(&siblings)).unwrap(),
            "Vec<Rc<Vec<u8>>>[\n    [\n        1\n    ]\n    [\n        1\n    ]\n]"
        );
        assert_eq!(visitor.guard.depth(), 0);
    }

    #[test]
    fn test_shared_pointers_are_not_recursion() {
        let shared = Rc::new(vec![1u8]);
        let pair = vec![Rc::clone(&shared), shared];
        assert_eq!(
            render(&pair),
            "Vec<Rc<Vec<u8>>>[\n    [\n        1\n    ]\n    [\n        1\n    ]\n]"
        );
    }
}
