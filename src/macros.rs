//! Declarative macros implementing [`Typed`] and [`Reflect`] for user types.
//!
//! [`Typed`]: crate::Typed
//! [`Reflect`]: crate::Reflect

use crate::reflect::{Field, Reflect, Typed};

/// Builds a [`Field`] whose declared type is the type of `value`.
#[doc(hidden)]
pub fn field<'a, T: Reflect + Typed>(name: &'a str, value: &'a T, public: bool) -> Field<'a> {
    Field {
        name,
        ty: T::static_type(),
        value,
        public,
    }
}

/// Implements [`Typed`](crate::Typed) and [`Reflect`](crate::Reflect) for a
/// non-generic struct.
///
/// Named fields marked `pub` are public; the others are rendered as private
/// fields. Tuple struct fields are listed by index.
///
/// # Examples
///
/// ```rust
/// use lucid::{reflect_struct, to_string};
///
/// struct Point {
///     pub x: i32,
///     pub y: i32,
/// }
///
/// struct Meters(f64);
///
/// struct Marker;
///
/// reflect_struct!(Point { pub x, pub y });
/// reflect_struct!(Meters(0));
/// reflect_struct!(Marker);
///
/// assert_eq!(
///     to_string(&Point { x: 1, y: 2 }).unwrap(),
///     "Point{\n    x: 1\n    y: 2\n}",
/// );
/// assert_eq!(to_string(&Meters(1.5)).unwrap(), "Meters(1.5)");
/// assert_eq!(to_string(&Marker).unwrap(), "Marker{}");
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($name:ident { $($vis:vis $field:ident),* $(,)? }) => {
        $crate::reflect_struct!(@typed $name);

        impl $crate::Reflect for $name {
            fn type_of(&self) -> $crate::Type {
                <Self as $crate::Typed>::static_type()
            }

            fn reflect(&self) -> $crate::Kind<'_> {
                $crate::Kind::Struct($crate::StructView {
                    style: $crate::StructStyle::Named,
                    fields: vec![$(
                        $crate::__field(
                            stringify!($field),
                            &self.$field,
                            !stringify!($vis).is_empty(),
                        )
                    ),*],
                })
            }
        }
    };

    ($name:ident ( $($index:tt),* $(,)? )) => {
        $crate::reflect_struct!(@typed $name);

        impl $crate::Reflect for $name {
            fn type_of(&self) -> $crate::Type {
                <Self as $crate::Typed>::static_type()
            }

            fn reflect(&self) -> $crate::Kind<'_> {
                $crate::Kind::Struct($crate::StructView {
                    style: $crate::StructStyle::Tuple,
                    fields: vec![$(
                        $crate::__field(stringify!($index), &self.$index, true)
                    ),*],
                })
            }
        }
    };

    ($name:ident) => {
        $crate::reflect_struct!(@typed $name);

        impl $crate::Reflect for $name {
            fn type_of(&self) -> $crate::Type {
                <Self as $crate::Typed>::static_type()
            }

            fn reflect(&self) -> $crate::Kind<'_> {
                $crate::Kind::Struct($crate::StructView {
                    style: $crate::StructStyle::Unit,
                    fields: Vec::new(),
                })
            }
        }
    };

    (@typed $name:ident) => {
        impl $crate::Typed for $name {
            fn static_type() -> $crate::Type {
                $crate::Type::new($crate::TypeKind::Struct, stringify!($name))
            }
        }
    };
}

/// Implements [`Typed`](crate::Typed) and [`Reflect`](crate::Reflect) for a
/// non-generic enum.
///
/// Every variant must be listed. Tuple variants name a binding per element;
/// struct variants list their fields.
///
/// # Examples
///
/// ```rust
/// use lucid::{reflect_enum, to_string};
///
/// enum Shape {
///     Empty,
///     Circle(f64),
///     Rect { w: u32, h: u32 },
/// }
///
/// reflect_enum!(Shape {
///     Empty,
///     Circle(radius),
///     Rect { w, h },
/// });
///
/// assert_eq!(to_string(&Shape::Empty).unwrap(), "Shape::Empty");
/// assert_eq!(to_string(&Shape::Circle(0.5)).unwrap(), "Shape::Circle(0.5)");
/// assert_eq!(
///     to_string(&Shape::Rect { w: 3, h: 4 }).unwrap(),
///     "Shape::Rect{\n    w: 3\n    h: 4\n}",
/// );
/// ```
#[macro_export]
macro_rules! reflect_enum {
    ($name:ident {
        $($variant:ident $(( $($binding:ident),* $(,)? ))? $({ $($field:ident),* $(,)? })?),* $(,)?
    }) => {
        impl $crate::Typed for $name {
            fn static_type() -> $crate::Type {
                $crate::Type::new($crate::TypeKind::Enum, stringify!($name))
            }
        }

        impl $crate::Reflect for $name {
            fn type_of(&self) -> $crate::Type {
                <Self as $crate::Typed>::static_type()
            }

            fn reflect(&self) -> $crate::Kind<'_> {
                match self {
                    $(
                        $crate::reflect_enum!(
                            @pattern $name $variant
                            $(( $($binding),* ))? $({ $($field),* })?
                        ) => $crate::reflect_enum!(
                            @view $variant
                            $(( $($binding),* ))? $({ $($field),* })?
                        ),
                    )*
                }
            }
        }
    };

    (@pattern $name:ident $variant:ident ( $($binding:ident),* )) => {
        $name::$variant($($binding),*)
    };
    (@pattern $name:ident $variant:ident { $($field:ident),* }) => {
        $name::$variant { $($field),* }
    };
    (@pattern $name:ident $variant:ident) => {
        $name::$variant
    };

    (@view $variant:ident ( $($binding:ident),* )) => {
        $crate::Kind::Enum($crate::EnumView {
            variant: stringify!($variant),
            style: $crate::StructStyle::Tuple,
            fields: vec![$($crate::__field(stringify!($binding), $binding, true)),*],
        })
    };
    (@view $variant:ident { $($field:ident),* }) => {
        $crate::Kind::Enum($crate::EnumView {
            variant: stringify!($variant),
            style: $crate::StructStyle::Named,
            fields: vec![$($crate::__field(stringify!($field), $field, true)),*],
        })
    };
    (@view $variant:ident) => {
        $crate::Kind::Enum($crate::EnumView {
            variant: stringify!($variant),
            style: $crate::StructStyle::Unit,
            fields: Vec::new(),
        })
    };
}

#[cfg(test)]
mod tests {
    use crate::{Kind, Reflect, StructStyle, TypeKind, Typed};

    struct Account {
        pub id: u32,
        secret: String,
    }

    crate::reflect_struct!(Account { pub id, secret });

    enum Event {
        Started,
        Moved(i32, i32),
        Renamed { from: String, to: String },
    }

    crate::reflect_enum!(Event {
        Started,
        Moved(dx, dy),
        Renamed { from, to },
    });

    #[test]
    fn test_struct_field_visibility() {
        let account = Account {
            id: 7,
            secret: "hunter2".to_string(),
        };
        match account.reflect() {
            Kind::Struct(view) => {
                assert_eq!(view.style, StructStyle::Named);
                assert_eq!(view.fields.len(), 2);
                assert!(view.fields[0].public);
                assert!(!view.fields[1].public);
                assert_eq!(view.fields[1].ty.name(), "String");
            }
            _ => panic!("expected struct"),
        }
        assert_eq!(Account::static_type().kind(), TypeKind::Struct);
    }

    #[test]
    fn test_enum_variants() {
        match Event::Moved(1, -1).reflect() {
            Kind::Enum(view) => {
                assert_eq!(view.variant, "Moved");
                assert_eq!(view.style, StructStyle::Tuple);
                assert_eq!(view.fields.len(), 2);
            }
            _ => panic!("expected enum"),
        }

        match Event::Started.reflect() {
            Kind::Enum(view) => assert_eq!(view.style, StructStyle::Unit),
            _ => panic!("expected enum"),
        }

        let renamed = Event::Renamed {
            from: "a".to_string(),
            to: "b".to_string(),
        };
        match renamed.reflect() {
            Kind::Enum(view) => {
                assert_eq!(view.fields[0].name, "from");
                assert_eq!(view.fields[1].name, "to");
            }
            _ => panic!("expected enum"),
        }
    }
}
