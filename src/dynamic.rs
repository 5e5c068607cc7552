//! Values captured from `serde::Serialize` implementations.
//!
//! Types that implement [`Serialize`](serde::Serialize) but not
//! [`Reflect`](crate::Reflect) can be captured into a [`DynamicValue`] with
//! [`to_dynamic`](crate::to_dynamic) and printed like any other value.
//!
//! Every slot of a dynamic value is abstract, so nested values are annotated
//! with the type serde reported for them.
//!
//! ## Examples
//!
//! ```rust
//! use lucid::{to_dynamic, to_string};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_dynamic(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(to_string(&value).unwrap(), "Point{\n    x: i32(1)\n    y: i32(2)\n}");
//! ```

use crate::reflect::{
    EnumView, Field, Kind, MapView, OptionView, Reflect, SeqView, StructStyle, StructView, Type, TypeKind, Typed,
};

/// A tree of values as reported by serde.
///
/// Scalars keep the name of the Rust type they were serialized from.
#[derive(Clone, Debug, PartialEq)]
pub enum DynamicValue {
    Bool(bool),
    Int(i128, &'static str),
    Uint(u128, &'static str),
    Float(f64, &'static str),
    Char(char),
    Str(String),
    Unit,
    Option(Option<Box<DynamicValue>>),
    Seq(Vec<DynamicValue>),
    Map(Vec<(DynamicValue, DynamicValue)>),
    UnitStruct(&'static str),
    TupleStruct {
        name: &'static str,
        fields: Vec<DynamicValue>,
    },
    Struct {
        name: &'static str,
        fields: Vec<(&'static str, DynamicValue)>,
    },
    UnitVariant {
        name: &'static str,
        variant: &'static str,
    },
    TupleVariant {
        name: &'static str,
        variant: &'static str,
        fields: Vec<DynamicValue>,
    },
    StructVariant {
        name: &'static str,
        variant: &'static str,
        fields: Vec<(&'static str, DynamicValue)>,
    },
}

impl Typed for DynamicValue {
    fn static_type() -> Type {
        Type::new(TypeKind::Interface, "Dynamic")
    }
}

impl Reflect for DynamicValue {
    fn type_of(&self) -> Type {
        match self {
            DynamicValue::Bool(_) => Type::new(TypeKind::Bool, "bool"),
            DynamicValue::Int(_, name) => Type::new(TypeKind::Int, *name),
            DynamicValue::Uint(_, name) => Type::new(TypeKind::Uint, *name),
            DynamicValue::Float(_, name) => Type::new(TypeKind::Float, *name),
            DynamicValue::Char(_) => Type::new(TypeKind::Char, "char"),
            DynamicValue::Str(_) => Type::new(TypeKind::Str, "String"),
            DynamicValue::Unit => Type::new(TypeKind::Unit, "()"),
            DynamicValue::Option(_) => Type::new(TypeKind::Option, "Option<Dynamic>"),
            DynamicValue::Seq(_) => Type::new(TypeKind::Seq, "Vec<Dynamic>"),
            DynamicValue::Map(_) => Type::new(TypeKind::Map, "Map<Dynamic, Dynamic>"),
            DynamicValue::UnitStruct(name)
            | DynamicValue::TupleStruct { name, .. }
            | DynamicValue::Struct { name, .. } => Type::new(TypeKind::Struct, *name),
            DynamicValue::UnitVariant { name, .. }
            | DynamicValue::TupleVariant { name, .. }
            | DynamicValue::StructVariant { name, .. } => Type::new(TypeKind::Enum, *name),
        }
    }

    fn reflect(&self) -> Kind<'_> {
        match self {
            DynamicValue::Bool(b) => Kind::Bool(*b),
            DynamicValue::Int(n, _) => Kind::Int(*n),
            DynamicValue::Uint(n, _) => Kind::Uint(*n),
            // Widened from f32 on capture; narrowing back is exact.
            DynamicValue::Float(f, "f32") => Kind::Literal(format!("{:?}", *f as f32)),
            DynamicValue::Float(f, _) => Kind::Float(*f),
            DynamicValue::Char(c) => Kind::Char(*c),
            DynamicValue::Str(s) => Kind::Str(s),
            DynamicValue::Unit => Kind::Unit,
            DynamicValue::Option(value) => Kind::Option(OptionView {
                elem: Self::static_type(),
                value: value.as_deref().map(|v| v as &dyn Reflect),
            }),
            DynamicValue::Seq(items) => Kind::Seq(SeqView {
                elem: Self::static_type(),
                items: items.iter().map(|v| v as &dyn Reflect).collect(),
                ordered: true,
            }),
            DynamicValue::Map(entries) => Kind::Map(MapView {
                key: Self::static_type(),
                value: Self::static_type(),
                entries: entries
                    .iter()
                    .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect))
                    .collect(),
            }),
            DynamicValue::UnitStruct(_) => Kind::Struct(StructView {
                style: StructStyle::Unit,
                fields: Vec::new(),
            }),
            DynamicValue::TupleStruct { fields, .. } => Kind::Struct(StructView {
                style: StructStyle::Tuple,
                fields: tuple_fields(fields),
            }),
            DynamicValue::Struct { fields, .. } => Kind::Struct(StructView {
                style: StructStyle::Named,
                fields: named_fields(fields),
            }),
            DynamicValue::UnitVariant { variant, .. } => Kind::Enum(EnumView {
                variant,
                style: StructStyle::Unit,
                fields: Vec::new(),
            }),
            DynamicValue::TupleVariant { variant, fields, .. } => Kind::Enum(EnumView {
                variant,
                style: StructStyle::Tuple,
                fields: tuple_fields(fields),
            }),
            DynamicValue::StructVariant { variant, fields, .. } => Kind::Enum(EnumView {
                variant,
                style: StructStyle::Named,
                fields: named_fields(fields),
            }),
        }
    }
}

fn tuple_fields(fields: &[DynamicValue]) -> Vec<Field<'_>> {
    fields
        .iter()
        .map(|value| Field::new("", DynamicValue::static_type(), value))
        .collect()
}

fn named_fields<'a>(fields: &'a [(&'static str, DynamicValue)]) -> Vec<Field<'a>> {
    fields
        .iter()
        .map(|(name, value)| Field::new(name, DynamicValue::static_type(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_string;

    #[test]
    fn test_children_are_annotated() {
        let value = DynamicValue::Seq(vec![
            DynamicValue::Uint(1, "u8"),
            DynamicValue::Str("x".to_string()),
            DynamicValue::Option(None),
        ]);
        assert_eq!(
            to_string(&value).unwrap(),
            "Vec<Dynamic>[\n    u8(1)\n    \"x\"\n    Option<Dynamic>(None)\n]"
        );
    }

    #[test]
    fn test_f32_keeps_short_form() {
        let value = DynamicValue::Float(f64::from(0.1f32), "f32");
        assert_eq!(to_string(&value).unwrap(), "f32(0.1)");
    }

    #[test]
    fn test_struct_fields_are_annotated() {
        let value = DynamicValue::Struct {
            name: "Size",
            fields: vec![("w", DynamicValue::Uint(3, "u16")), ("label", DynamicValue::Unit)],
        };
        assert_eq!(to_string(&value).unwrap(), "Size{\n    w:     u16(3)\n    label: ()\n}");
    }

    #[test]
    fn test_variants() {
        let value = DynamicValue::TupleVariant {
            name: "Shape",
            variant: "Circle",
            fields: vec![DynamicValue::Float(0.5, "f64")],
        };
        assert_eq!(to_string(&value).unwrap(), "Shape::Circle(f64(0.5))");
    }
}
