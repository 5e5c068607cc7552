//! The value descriptor passed through every step of a traversal.
//!
//! A [`Value`] pairs a reflected value with the type it was declared as and
//! two ambiguity flags. The flags are structural facts about *how the value
//! was reached*; they are fixed when the descriptor is built from its parent
//! and never revised.
//!
//! ## Ambiguity
//!
//! - `is_ambiguous_dynamic_type` is set when the slot the value was read
//!   from is abstract ([`TypeKind::Interface`](crate::TypeKind::Interface)),
//!   so its concrete type must be spelled out.
//! - `is_ambiguous_static_type` is set only at the traversal root, where the
//!   caller supplies no declared type at all.
//!
//! Rust has no untyped nil, so every descriptor has a dynamic type.
//!
//! ## Examples
//!
//! ```rust
//! use lucid::{Type, Typed, Value};
//!
//! let number = 42i32;
//! let root = Value::root(&number);
//! assert!(root.is_ambiguous_type());
//! assert_eq!(root.type_name(), "i32");
//!
//! let element = Value::element(&number, i32::static_type(), &root);
//! assert!(!element.is_ambiguous_type());
//!
//! let boxed = Value::element(&number, Type::any(), &root);
//! assert!(boxed.is_ambiguous_dynamic_type);
//! ```

use crate::reflect::{Field, Reflect, Type};

/// A reflected value together with how it was reached.
#[derive(Clone)]
pub struct Value<'a> {
    pub value: &'a dyn Reflect,
    /// The concrete type of `value`.
    pub dynamic_type: Type,
    /// The declared type of the slot `value` was read from.
    pub static_type: Type,
    pub is_ambiguous_dynamic_type: bool,
    pub is_ambiguous_static_type: bool,
    /// `true` if a private field was traversed to reach `value`.
    pub is_unexported: bool,
}

impl<'a> Value<'a> {
    /// Describes the root of a traversal: declared as [`Type::any`], with
    /// both ambiguity flags set.
    #[must_use]
    pub fn root(value: &'a dyn Reflect) -> Self {
        Value {
            value,
            dynamic_type: value.type_of(),
            static_type: Type::any(),
            is_ambiguous_dynamic_type: true,
            is_ambiguous_static_type: true,
            is_unexported: false,
        }
    }

    /// Describes an element of a container (a sequence item, map key or
    /// value, option payload) whose declared type is `static_type`.
    #[must_use]
    pub fn element(value: &'a dyn Reflect, static_type: Type, parent: &Value<'_>) -> Self {
        Value {
            value,
            dynamic_type: value.type_of(),
            is_ambiguous_dynamic_type: static_type.is_interface(),
            is_ambiguous_static_type: false,
            static_type,
            is_unexported: parent.is_unexported,
        }
    }

    /// Describes a struct field or tuple element.
    #[must_use]
    pub fn field(field: &Field<'a>, parent: &Value<'_>) -> Self {
        let mut child = Value::element(field.value, field.ty.clone(), parent);
        child.is_unexported |= !field.public;
        child
    }

    /// Describes the target of a transparent wrapper (a smart pointer or a
    /// lock cell).
    ///
    /// The target stands in for the wrapper, so it keeps the wrapper's
    /// ambiguity, and becomes ambiguous if the wrapper points at an abstract
    /// type.
    #[must_use]
    pub fn pointee(value: &'a dyn Reflect, pointee: Type, parent: &Value<'_>) -> Self {
        Value {
            value,
            dynamic_type: value.type_of(),
            is_ambiguous_dynamic_type: parent.is_ambiguous_dynamic_type || pointee.is_interface(),
            is_ambiguous_static_type: parent.is_ambiguous_static_type,
            static_type: pointee,
            is_unexported: parent.is_unexported,
        }
    }

    /// Returns `true` if the rendering of this value must include its type.
    #[inline]
    #[must_use]
    pub fn is_ambiguous_type(&self) -> bool {
        self.is_ambiguous_dynamic_type || self.is_ambiguous_static_type
    }

    /// The name of the dynamic type.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.dynamic_type.name()
    }
}
