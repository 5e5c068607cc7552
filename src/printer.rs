//! The printer façade: one traversal per call.

use crate::config::Config;
use crate::error::Result;
use crate::reflect::AsReflect;
use std::io::{self, Write};

/// Generates human-readable representations of values.
///
/// The output is as minimal as possible without being ambiguous: type names
/// are only included where they can not be inferred from the structure of
/// the value.
///
/// # Examples
///
/// ```rust
/// use lucid::{Config, Printer};
///
/// let printer = Printer::new(Config::new().with_indent("  "));
/// assert_eq!(printer.format(&vec![1u8]).unwrap(), "Vec<u8>[\n  1\n]");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Printer {
    config: Config,
}

impl Printer {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Printer { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Writes the representation of `value` to `writer`.
    ///
    /// Returns the number of bytes written. Output written before a failure
    /// is left in the writer; wrap it in a
    /// [`CountingWriter`](crate::io::CountingWriter) to learn how much.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the writer fails and
    /// [`Error::Filter`](crate::Error::Filter) (or whatever error the filter
    /// returned) if a filter fails.
    pub fn write<W, T>(&self, writer: W, value: &T) -> Result<usize>
    where
        W: io::Write,
        T: ?Sized + AsReflect,
    {
        crate::to_writer_with_config(writer, value, &self.config)
    }

    /// Returns the representation of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if a filter fails, and
    /// [`Error::Utf8`](crate::Error::Utf8) if a filter wrote bytes that are
    /// not UTF-8.
    pub fn format<T>(&self, value: &T) -> Result<String>
    where
        T: ?Sized + AsReflect,
    {
        let mut buf = Vec::with_capacity(128);
        self.write(&mut buf, value)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Writes the representation of `value` and a newline to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if a filter or stdout fails.
    pub fn print<T>(&self, value: &T) -> Result<()>
    where
        T: ?Sized + AsReflect,
    {
        let mut stdout = io::stdout().lock();
        self.write(&mut stdout, value)?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reflect;

    #[test]
    fn test_write_returns_byte_count() {
        let mut out = Vec::new();
        let n = Printer::default().write(&mut out, &vec!["é"]).unwrap();
        assert_eq!(n, out.len());
        assert_eq!(String::from_utf8(out).unwrap(), "Vec<&str>[\n    \"é\"\n]");
    }

    fn raw_bool_filter(w: &mut dyn Write, v: &crate::Value<'_>, _: &mut crate::FilterPrinter<'_, '_>) -> Result<crate::Outcome> {
        if v.value.downcast_ref::<bool>().is_none() {
            return Ok(crate::Outcome::Declined);
        }
        w.write_all(b"\xff")?;
        Ok(crate::Outcome::Handled)
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let printer = Printer::new(Config::bare().with_filter(raw_bool_filter));

        let mut out = Vec::new();
        printer.write(&mut out, &vec![true]).unwrap();
        assert_eq!(out, b"Vec<bool>[\n    \xff\n]");

        match printer.format(&vec![true]) {
            Err(crate::Error::Utf8(err)) => assert_eq!(err.as_bytes(), out.as_slice()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_dyn_reflect_root() {
        let value: Box<dyn Reflect> = Box::new(3i16);
        let printer = Printer::default();
        assert_eq!(printer.format(&*value).unwrap(), "i16(3)");
        assert_eq!(printer.format(&value).unwrap(), "i16(3)");
    }

    #[test]
    fn test_custom_recursion_marker() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Node {
            next: RefCell<Option<Rc<Node>>>,
        }

        crate::reflect_struct!(Node { next });

        let node = Rc::new(Node {
            next: RefCell::new(None),
        });
        *node.next.borrow_mut() = Some(Rc::clone(&node));

        let printer = Printer::new(Config::new().with_recursion_marker("<cycle>"));
        let text = printer.format(&node).unwrap();
        *node.next.borrow_mut() = None;

        assert_eq!(text, "Node{\n    next: Some(Rc<Node>(<cycle>))\n}");
    }
}
