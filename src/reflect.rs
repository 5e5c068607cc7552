//! Run-time reflection for the printer.
//!
//! Rust has no built-in reflection, so the printer works through the
//! [`Reflect`] trait. A reflected value reports two things:
//!
//! - its dynamic [`Type`] ([`Reflect::type_of`]), and
//! - a structural view of itself ([`Reflect::reflect`]) as one of the
//!   [`Kind`] variants.
//!
//! The declared type of a slot (a struct field, a map's value type, a
//! pointee) comes from [`Typed::static_type`]. When a slot is declared as
//! [`TypeKind::Interface`] the printer can not infer the dynamic type of the
//! value stored in it, and annotates it.
//!
//! ## Examples
//!
//! ```rust
//! use lucid::{Kind, Reflect, Type, TypeKind, Typed};
//!
//! assert_eq!(i32::static_type().name(), "i32");
//! assert_eq!(Vec::<String>::static_type().name(), "Vec<String>");
//! assert!(Type::any().is_interface());
//!
//! let value = 42u8;
//! assert!(matches!(value.reflect(), Kind::Uint(42)));
//! assert_eq!(value.type_of().kind(), TypeKind::Uint);
//! ```

use crate::Result;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;

/// The structural category of a [`Type`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Bool,
    Char,
    Str,
    Unit,
    Int,
    Uint,
    Float,
    /// A foreign scalar rendered from its textual form, e.g. a big integer.
    Literal,
    /// A value whose structure is hidden; always rendered with its type.
    Opaque,
    Struct,
    Enum,
    Seq,
    Map,
    Option,
    Pointer,
    /// An interior-mutability cell (`Mutex`, `RwLock`, `RefCell`, `Cell`).
    Lock,
    /// An abstract slot whose dynamic type can not be inferred.
    Interface,
}

/// A type descriptor: a display name and a [`TypeKind`].
///
/// Names are written the way a reader would write the type in source code,
/// without module paths (`HashMap<i32, String>`, not
/// `std::collections::hash::map::HashMap<i32, alloc::string::String>`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    name: Cow<'static, str>,
    kind: TypeKind,
}

impl Type {
    /// Creates a type descriptor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lucid::{Type, TypeKind};
    ///
    /// let ty = Type::new(TypeKind::Struct, "Point");
    /// assert_eq!(ty.to_string(), "Point");
    /// ```
    #[must_use]
    pub fn new(kind: TypeKind, name: impl Into<Cow<'static, str>>) -> Self {
        Type {
            name: name.into(),
            kind,
        }
    }

    /// The abstract type of a traversal root: `dyn Reflect`.
    #[must_use]
    pub const fn any() -> Self {
        Type {
            name: Cow::Borrowed("dyn Reflect"),
            kind: TypeKind::Interface,
        }
    }

    /// Returns the static type of `T`.
    #[must_use]
    pub fn of<T: ?Sized + Typed>() -> Self {
        T::static_type()
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns `true` if values stored in a slot of this type need their
    /// dynamic type spelled out.
    #[inline]
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub(crate) fn name_cow(&self) -> &Cow<'static, str> {
        &self.name
    }

    pub(crate) fn kind_ref(&self) -> &TypeKind {
        &self.kind
    }

    /// Returns `true` if a literal of this type already implies the type,
    /// so it is never annotated: `true`, `'c'`, `()`, `"text"`.
    pub(crate) fn is_implied_by_literal(&self) -> bool {
        match self.kind {
            TypeKind::Bool | TypeKind::Char | TypeKind::Unit => true,
            TypeKind::Str => matches!(self.name(), "String" | "&str" | "str"),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Types with a statically known [`Type`].
///
/// This is the declared type of a slot. It is implemented for `dyn Reflect`
/// as [`Type::any`], which is what makes `Box<dyn Reflect>` an abstract slot.
pub trait Typed {
    fn static_type() -> Type;
}

/// Access to `self` as [`Any`], implemented for every `'static` type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A value the printer can traverse.
///
/// Implementations exist for the std collections, smart pointers, locks and
/// primitives, as well as `chrono`, `num-bigint` and `indexmap` types. Use
/// [`reflect_struct!`](crate::reflect_struct) and
/// [`reflect_enum!`](crate::reflect_enum) for your own types.
pub trait Reflect: Any + AsAny {
    /// The dynamic type of this value.
    fn type_of(&self) -> Type;

    /// A structural view of this value.
    fn reflect(&self) -> Kind<'_>;
}

impl dyn Reflect {
    /// Returns a reference to the concrete value if it is of type `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lucid::Reflect;
    ///
    /// let value: Box<dyn Reflect> = Box::new(7i64);
    /// assert_eq!((*value).downcast_ref::<i64>(), Some(&7));
    /// assert!((*value).downcast_ref::<i32>().is_none());
    /// ```
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    /// Returns the [`TypeId`] of the concrete value.
    #[must_use]
    pub fn concrete_type_id(&self) -> TypeId {
        AsAny::as_any(self).type_id()
    }
}

impl Typed for dyn Reflect {
    fn static_type() -> Type {
        Type::any()
    }
}

/// Upcasts to `&dyn Reflect`; implemented for sized [`Reflect`] types and
/// for `dyn Reflect` itself.
pub trait AsReflect {
    fn as_reflect(&self) -> &dyn Reflect;
}

impl<T: Reflect> AsReflect for T {
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }
}

impl AsReflect for dyn Reflect {
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }
}

/// The structural view of a reflected value.
pub enum Kind<'a> {
    Bool(bool),
    Int(i128),
    Uint(u128),
    Float(f64),
    Char(char),
    Str(&'a str),
    Unit,
    /// A scalar rendered from text, annotated only when ambiguous.
    Literal(String),
    /// Text that is always rendered as `TypeName(text)`.
    Opaque(String),
    Struct(StructView<'a>),
    Enum(EnumView<'a>),
    Seq(SeqView<'a>),
    Map(MapView<'a>),
    Option(OptionView<'a>),
    Pointer(PointerView<'a>),
    Lock(&'a dyn Guarded),
}

/// How the fields of a struct or enum variant are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructStyle {
    Named,
    Tuple,
    Unit,
}

/// A struct field or tuple element.
pub struct Field<'a> {
    pub name: &'a str,
    /// The declared type of the field.
    pub ty: Type,
    pub value: &'a dyn Reflect,
    /// `false` for private fields.
    pub public: bool,
}

impl<'a> Field<'a> {
    #[must_use]
    pub fn new(name: &'a str, ty: Type, value: &'a dyn Reflect) -> Self {
        Field {
            name,
            ty,
            value,
            public: true,
        }
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }
}

pub struct StructView<'a> {
    pub style: StructStyle,
    pub fields: Vec<Field<'a>>,
}

pub struct EnumView<'a> {
    pub variant: &'a str,
    pub style: StructStyle,
    pub fields: Vec<Field<'a>>,
}

pub struct SeqView<'a> {
    /// The declared element type.
    pub elem: Type,
    pub items: Vec<&'a dyn Reflect>,
    /// `false` for sets; their elements are sorted by rendered text.
    pub ordered: bool,
}

pub struct MapView<'a> {
    /// The declared key type.
    pub key: Type,
    /// The declared value type.
    pub value: Type,
    pub entries: Vec<(&'a dyn Reflect, &'a dyn Reflect)>,
}

pub struct OptionView<'a> {
    pub elem: Type,
    pub value: Option<&'a dyn Reflect>,
}

pub struct PointerView<'a> {
    /// The declared pointee type; [`Type::any`] for `Box<dyn Reflect>` and
    /// friends.
    pub pointee: Type,
    pub target: &'a dyn Reflect,
}

/// An interior-mutability cell whose contents can only be reached through a
/// guard.
pub trait Guarded {
    /// The declared type of the contents.
    fn inner_type(&self) -> Type;

    /// Calls `f` with the contents without blocking.
    ///
    /// Returns `Ok(false)` without calling `f` when the contents are held
    /// elsewhere (a locked mutex, a mutably borrowed `RefCell`).
    fn with_inner(&self, f: &mut dyn FnMut(&dyn Reflect) -> Result<()>) -> Result<bool>;
}
