//! Writer adapters used by the printer.
//!
//! - [`Indenter`] prefixes every non-empty line written through it.
//! - [`CountingWriter`] counts the bytes accepted by the inner writer, so the
//!   count survives a failed traversal.

use std::io::{self, Write};

/// Writes an indent before the first byte of every non-empty line.
///
/// Lines are detected across calls, so a line built from several writes is
/// indented once.
pub struct Indenter<'w, W: ?Sized + Write> {
    inner: &'w mut W,
    indent: &'w [u8],
    at_line_start: bool,
}

impl<'w, W: ?Sized + Write> Indenter<'w, W> {
    pub fn new(inner: &'w mut W, indent: &'w str) -> Self {
        Indenter {
            inner,
            indent: indent.as_bytes(),
            at_line_start: true,
        }
    }
}

impl<W: ?Sized + Write> Write for Indenter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for line in buf.split_inclusive(|&b| b == b'\n') {
            if self.at_line_start && line != b"\n" {
                self.inner.write_all(self.indent)?;
            }
            self.inner.write_all(line)?;
            self.at_line_start = line.ends_with(b"\n");
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Counts the bytes written to the inner writer.
///
/// # Examples
///
/// ```rust
/// use lucid::io::CountingWriter;
/// use std::io::Write;
///
/// let mut out = Vec::new();
/// let mut counter = CountingWriter::new(&mut out);
/// counter.write_all(b"hello").unwrap();
/// assert_eq!(counter.count(), 5);
/// ```
pub struct CountingWriter<W> {
    inner: W,
    count: usize,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        CountingWriter { inner, count: 0 }
    }

    /// The number of bytes the inner writer has accepted.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indenter_prefixes_each_line() {
        let mut out = Vec::new();
        let mut w = Indenter::new(&mut out, "  ");
        w.write_all(b"a: ").unwrap();
        w.write_all(b"1\nb: 2\n").unwrap();
        assert_eq!(out, b"  a: 1\n  b: 2\n");
    }

    #[test]
    fn test_indenter_skips_empty_lines() {
        let mut out = Vec::new();
        let mut w = Indenter::new(&mut out, "--");
        w.write_all(b"x\n\ny").unwrap();
        assert_eq!(out, b"--x\n\n--y");
    }

    #[test]
    fn test_nested_indenters() {
        let mut out = Vec::new();
        let mut outer = Indenter::new(&mut out, "  ");
        let mut inner = Indenter::new(&mut outer, "  ");
        inner.write_all(b"deep\n").unwrap();
        assert_eq!(out, b"    deep\n");
    }

    struct Failing;

    impl Write for Failing {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_counting_writer_keeps_partial_count() {
        let mut counter = CountingWriter::new(Vec::new());
        counter.write_all(b"abc").unwrap();
        assert_eq!(counter.count(), 3);

        let mut failing = CountingWriter::new(Failing);
        assert!(failing.write_all(b"abc").is_err());
        assert_eq!(failing.count(), 0);
    }
}
