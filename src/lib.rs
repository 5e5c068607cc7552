//! # lucid
//!
//! Deterministic, unambiguous pretty-printing of nested Rust values.
//!
//! ## What does it print?
//!
//! `lucid` renders a value as text meant for humans: debugging output, log
//! lines, test failure messages. The output is as small as possible without
//! being ambiguous. Type names are only written where the type can not be
//! inferred from how the value is nested.
//!
//! ## Key Features
//!
//! - **Minimal annotations**: `Vec<u8>[\n    1\n]`, not `Vec<u8>[u8(1)]`;
//!   values behind `Box<dyn Reflect>` are annotated with their concrete type
//! - **Deterministic**: map keys and set elements are sorted by their
//!   rendered text, so hash containers print the same way every time
//! - **Aligned**: map values and struct fields line up in one column, even
//!   when keys span several lines
//! - **Cycle safe**: a value that refers back to itself is printed as
//!   `TypeName(<recursion>)`
//! - **Extensible**: [`Filter`]s override the rendering of specific types
//! - **Serde bridge**: anything `Serialize` can be captured with
//!   [`to_dynamic`] and printed
//!
//! ## Quick Start
//!
//! ```rust
//! use lucid::{reflect_struct, to_string};
//! use std::collections::HashMap;
//!
//! struct User {
//!     pub id: u32,
//!     pub name: String,
//!     pub roles: HashMap<String, bool>,
//! }
//!
//! reflect_struct!(User { pub id, pub name, pub roles });
//!
//! let mut roles = HashMap::new();
//! roles.insert("reader".to_string(), true);
//! roles.insert("admin".to_string(), false);
//!
//! let user = User { id: 7, name: "Alice".to_string(), roles };
//!
//! assert_eq!(
//!     to_string(&user).unwrap(),
//!     "User{\n    id:    7\n    name:  \"Alice\"\n    roles: {\n        \"admin\":  false\n        \"reader\": true\n    }\n}",
//! );
//! ```
//!
//! ### Abstract slots
//!
//! ```rust
//! use lucid::{to_string, Reflect};
//!
//! let values: Vec<Box<dyn Reflect>> = vec![Box::new(1u8), Box::new(1i64)];
//! assert_eq!(
//!     to_string(&values).unwrap(),
//!     "Vec<Box<dyn Reflect>>[\n    u8(1)\n    i64(1)\n]",
//! );
//! ```
//!
//! ## Output Conventions
//!
//! - Ambiguous scalars: `TypeName(value)`; `bool`, `char`, `()` and strings
//!   are never annotated because their literal syntax implies the type
//! - Ambiguous composites: `TypeName{...}` or `TypeName[...]`
//! - Unambiguous values: the bare literal, `{...}` or `[...]`
//! - Recursion: `TypeName(<recursion>)`
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - No panics in library code paths; failures are returned as [`Error`]
//! - Locks are only ever acquired without blocking

pub mod config;
pub mod dynamic;
pub mod error;
pub mod filter;
mod guard;
mod impls;
pub mod io;
pub mod macros;
mod map;
pub mod printer;
pub mod reflect;
pub mod ser;
pub mod value;
mod visitor;

pub use config::{Config, DEFAULT_INDENT, DEFAULT_RECURSION_MARKER};
pub use dynamic::DynamicValue;
pub use error::{Error, Result};
pub use filter::{
    duration_filter, sync_filter, time_filter, type_filter, Filter, FilterPrinter, Outcome, DEFAULT_FILTERS,
};
pub use printer::Printer;
pub use reflect::{
    AsAny, AsReflect, EnumView, Field, Guarded, Kind, MapView, OptionView, PointerView, Reflect, SeqView,
    StructStyle, StructView, Type, TypeKind, Typed,
};
pub use ser::DynamicSerializer;
pub use value::Value;

#[doc(hidden)]
pub use macros::field as __field;

use serde::Serialize;
use std::io as stdio;

/// Render any `T: Reflect` to a string.
///
/// # Examples
///
/// ```rust
/// use lucid::to_string;
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert(2, 200);
/// map.insert(1, 100);
///
/// let text = to_string(&map).unwrap();
/// assert_eq!(text, "BTreeMap<i32, i32>{\n    1: 100\n    2: 200\n}");
/// ```
///
/// # Errors
///
/// Returns an error if a filter fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + AsReflect,
{
    Printer::default().format(value)
}

/// Render any `T: Reflect` to a string with a custom configuration.
///
/// Fails with [`Error::Utf8`] instead of replacing invalid bytes written by
/// a filter.
///
/// # Examples
///
/// ```rust
/// use lucid::{to_string_with_config, Config};
///
/// let config = Config::new().with_indent("\t");
/// let text = to_string_with_config(&vec![1u8], &config).unwrap();
/// assert_eq!(text, "Vec<u8>[\n\t1\n]");
/// ```
///
/// # Errors
///
/// Returns an error if a filter fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_config<T>(value: &T, config: &Config) -> Result<String>
where
    T: ?Sized + AsReflect,
{
    let mut buf = Vec::with_capacity(128);
    to_writer_with_config(&mut buf, value, config)?;
    Ok(String::from_utf8(buf)?)
}

/// Render any `T: Reflect` to a writer.
///
/// Returns the number of bytes written.
///
/// # Examples
///
/// ```rust
/// use lucid::to_writer;
///
/// let mut buffer = Vec::new();
/// let n = to_writer(&mut buffer, &Some(true)).unwrap();
/// assert_eq!(buffer, b"Option<bool>(Some(true))");
/// assert_eq!(n, buffer.len());
/// ```
///
/// # Errors
///
/// Returns an error if writing to the writer fails or a filter fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<usize>
where
    W: stdio::Write,
    T: ?Sized + AsReflect,
{
    Printer::default().write(writer, value)
}

/// Render any `T: Reflect` to a writer with a custom configuration.
///
/// # Errors
///
/// Returns an error if writing to the writer fails or a filter fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_config<W, T>(writer: W, value: &T, config: &Config) -> Result<usize>
where
    W: stdio::Write,
    T: ?Sized + AsReflect,
{
    let mut visitor = visitor::Visitor::new(config);
    let mut counter = io::CountingWriter::new(writer);
    visitor.visit(&mut counter, &Value::root(value.as_reflect()))?;
    Ok(counter.count())
}

/// Print the representation of `value` and a newline to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails or a filter fails.
pub fn print<T>(value: &T) -> Result<()>
where
    T: ?Sized + AsReflect,
{
    Printer::default().print(value)
}

/// Capture any `T: Serialize` as a [`DynamicValue`] that can be printed.
///
/// # Examples
///
/// ```rust
/// use lucid::{to_dynamic, to_string};
///
/// let json = serde_json::json!({"b": [1, 2], "a": null});
/// let value = to_dynamic(&json).unwrap();
/// assert_eq!(
///     to_string(&value).unwrap(),
///     "Map<Dynamic, Dynamic>{\n    \"a\": ()\n    \"b\": Vec<Dynamic>[\n        u64(1)\n        u64(2)\n    ]\n}",
/// );
/// ```
///
/// # Errors
///
/// Returns an error if the `Serialize` implementation fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_dynamic<T>(value: &T) -> Result<DynamicValue>
where
    T: ?Sized + Serialize,
{
    ser::to_dynamic_value(value)
}
