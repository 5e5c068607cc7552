//! [`Reflect`] and [`Typed`] implementations for std and third-party types.

use crate::reflect::{
    AsReflect, Field, Guarded, Kind, MapView, OptionView, PointerView, Reflect, SeqView, StructStyle,
    StructView, Type, TypeKind, Typed,
};
use crate::Result;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use indexmap::{IndexMap, IndexSet};
use num_bigint::{BigInt, BigUint};
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex, RwLock, TryLockError};
use std::time::{Duration, SystemTime};

macro_rules! reflect_scalar {
    ($($ty:ty => $type_kind:ident, $kind:ident($conv:ty)),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn static_type() -> Type {
                    Type::new(TypeKind::$type_kind, stringify!($ty))
                }
            }

            impl Reflect for $ty {
                fn type_of(&self) -> Type {
                    Self::static_type()
                }

                fn reflect(&self) -> Kind<'_> {
                    Kind::$kind(*self as $conv)
                }
            }
        )*
    };
}

reflect_scalar! {
    i8 => Int, Int(i128),
    i16 => Int, Int(i128),
    i32 => Int, Int(i128),
    i64 => Int, Int(i128),
    i128 => Int, Int(i128),
    isize => Int, Int(i128),
    u8 => Uint, Uint(u128),
    u16 => Uint, Uint(u128),
    u32 => Uint, Uint(u128),
    u64 => Uint, Uint(u128),
    u128 => Uint, Uint(u128),
    usize => Uint, Uint(u128),
    f64 => Float, Float(f64),
    bool => Bool, Bool(bool),
    char => Char, Char(char),
}

// Widening f32 to f64 changes its shortest round-trip text (0.1 becomes
// 0.10000000149011612), so it keeps its own formatting.
impl Typed for f32 {
    fn static_type() -> Type {
        Type::new(TypeKind::Float, "f32")
    }
}

impl Reflect for f32 {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        Kind::Literal(format!("{self:?}"))
    }
}

impl Typed for () {
    fn static_type() -> Type {
        Type::new(TypeKind::Unit, "()")
    }
}

impl Reflect for () {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        Kind::Unit
    }
}

impl Typed for String {
    fn static_type() -> Type {
        Type::new(TypeKind::Str, "String")
    }
}

impl Reflect for String {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        Kind::Str(self)
    }
}

impl Typed for &'static str {
    fn static_type() -> Type {
        Type::new(TypeKind::Str, "&str")
    }
}

impl Reflect for &'static str {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        Kind::Str(self)
    }
}

impl Typed for Cow<'static, str> {
    fn static_type() -> Type {
        Type::new(TypeKind::Str, "Cow<str>")
    }
}

impl Reflect for Cow<'static, str> {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        Kind::Str(self)
    }
}

macro_rules! reflect_tuple {
    ($(($($name:ident $idx:tt),+))+) => {
        $(
            impl<$($name: Typed),+> Typed for ($($name,)+) {
                fn static_type() -> Type {
                    let names = [$($name::static_type().to_string()),+];
                    let name = if names.len() == 1 {
                        format!("({},)", names[0])
                    } else {
                        format!("({})", names.join(", "))
                    };
                    Type::new(TypeKind::Struct, name)
                }
            }

            impl<$($name: Reflect + Typed),+> Reflect for ($($name,)+) {
                fn type_of(&self) -> Type {
                    Self::static_type()
                }

                fn reflect(&self) -> Kind<'_> {
                    Kind::Struct(StructView {
                        style: StructStyle::Tuple,
                        fields: vec![
                            $(Field::new(stringify!($idx), $name::static_type(), &self.$idx)),+
                        ],
                    })
                }
            }
        )+
    };
}

reflect_tuple! {
    (A 0)
    (A 0, B 1)
    (A 0, B 1, C 2)
    (A 0, B 1, C 2, D 3)
    (A 0, B 1, C 2, D 3, E 4)
    (A 0, B 1, C 2, D 3, E 4, F 5)
}

fn seq_kind<'a, T, I>(items: I, ordered: bool) -> Kind<'a>
where
    T: Reflect + Typed,
    I: Iterator<Item = &'a T>,
{
    Kind::Seq(SeqView {
        elem: T::static_type(),
        items: items.map(|item| item as &dyn Reflect).collect(),
        ordered,
    })
}

fn map_kind<'a, K, V, I>(entries: I) -> Kind<'a>
where
    K: Reflect + Typed,
    V: Reflect + Typed,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    Kind::Map(MapView {
        key: K::static_type(),
        value: V::static_type(),
        entries: entries
            .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect))
            .collect(),
    })
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn static_type() -> Type {
        Type::new(TypeKind::Seq, format!("[{}; {}]", T::static_type(), N))
    }
}

impl<T: Reflect + Typed, const N: usize> Reflect for [T; N] {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        seq_kind(self.iter(), true)
    }
}

macro_rules! reflect_seq {
    ($($container:ident<$t:ident $(, $s:ident)?> => $name:literal, $ordered:literal;)+) => {
        $(
            impl<$t: Typed $(, $s)?> Typed for $container<$t $(, $s)?> {
                fn static_type() -> Type {
                    Type::new(
                        TypeKind::Seq,
                        format!(concat!($name, "<{}>"), $t::static_type()),
                    )
                }
            }

            impl<$t: Reflect + Typed $(, $s: 'static)?> Reflect for $container<$t $(, $s)?> {
                fn type_of(&self) -> Type {
                    Self::static_type()
                }

                fn reflect(&self) -> Kind<'_> {
                    seq_kind(self.iter(), $ordered)
                }
            }
        )+
    };
}

reflect_seq! {
    Vec<T> => "Vec", true;
    VecDeque<T> => "VecDeque", true;
    HashSet<T, S> => "HashSet", false;
    BTreeSet<T> => "BTreeSet", false;
    IndexSet<T, S> => "IndexSet", false;
}

macro_rules! reflect_map {
    ($($container:ident<$k:ident, $v:ident $(, $s:ident)?> => $name:literal;)+) => {
        $(
            impl<$k: Typed, $v: Typed $(, $s)?> Typed for $container<$k, $v $(, $s)?> {
                fn static_type() -> Type {
                    Type::new(
                        TypeKind::Map,
                        format!(
                            concat!($name, "<{}, {}>"),
                            $k::static_type(),
                            $v::static_type()
                        ),
                    )
                }
            }

            impl<$k: Reflect + Typed, $v: Reflect + Typed $(, $s: 'static)?> Reflect
                for $container<$k, $v $(, $s)?>
            {
                fn type_of(&self) -> Type {
                    Self::static_type()
                }

                fn reflect(&self) -> Kind<'_> {
                    map_kind(self.iter())
                }
            }
        )+
    };
}

reflect_map! {
    HashMap<K, V, S> => "HashMap";
    BTreeMap<K, V> => "BTreeMap";
    IndexMap<K, V, S> => "IndexMap";
}

impl<T: Typed> Typed for Option<T> {
    fn static_type() -> Type {
        Type::new(TypeKind::Option, format!("Option<{}>", T::static_type()))
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        Kind::Option(OptionView {
            elem: T::static_type(),
            value: self.as_ref().map(|value| value as &dyn Reflect),
        })
    }
}

macro_rules! reflect_pointer {
    ($($pointer:ident),+) => {
        $(
            impl<T: ?Sized + Typed> Typed for $pointer<T> {
                fn static_type() -> Type {
                    Type::new(
                        TypeKind::Pointer,
                        format!(concat!(stringify!($pointer), "<{}>"), T::static_type()),
                    )
                }
            }

            impl<T: ?Sized + Typed + AsReflect + 'static> Reflect for $pointer<T> {
                fn type_of(&self) -> Type {
                    Self::static_type()
                }

                fn reflect(&self) -> Kind<'_> {
                    Kind::Pointer(PointerView {
                        pointee: T::static_type(),
                        target: (**self).as_reflect(),
                    })
                }
            }
        )+
    };
}

reflect_pointer!(Box, Rc, Arc);

macro_rules! reflect_lock {
    ($($lock:ident),+) => {
        $(
            impl<T: Typed> Typed for $lock<T> {
                fn static_type() -> Type {
                    Type::new(
                        TypeKind::Lock,
                        format!(concat!(stringify!($lock), "<{}>"), T::static_type()),
                    )
                }
            }

            impl<T: Reflect + Typed> Reflect for $lock<T> {
                fn type_of(&self) -> Type {
                    Self::static_type()
                }

                fn reflect(&self) -> Kind<'_> {
                    Kind::Lock(self)
                }
            }
        )+
    };
}

reflect_lock!(Mutex, RwLock, RefCell);

impl<T: Reflect + Typed> Guarded for Mutex<T> {
    fn inner_type(&self) -> Type {
        T::static_type()
    }

    fn with_inner(&self, f: &mut dyn FnMut(&dyn Reflect) -> Result<()>) -> Result<bool> {
        let guard = match self.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Ok(false),
        };
        f(&*guard)?;
        Ok(true)
    }
}

impl<T: Reflect + Typed> Guarded for RwLock<T> {
    fn inner_type(&self) -> Type {
        T::static_type()
    }

    fn with_inner(&self, f: &mut dyn FnMut(&dyn Reflect) -> Result<()>) -> Result<bool> {
        let guard = match self.try_read() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Ok(false),
        };
        f(&*guard)?;
        Ok(true)
    }
}

impl<T: Reflect + Typed> Guarded for RefCell<T> {
    fn inner_type(&self) -> Type {
        T::static_type()
    }

    fn with_inner(&self, f: &mut dyn FnMut(&dyn Reflect) -> Result<()>) -> Result<bool> {
        match self.try_borrow() {
            Ok(inner) => {
                f(&*inner)?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}

impl<T: Typed> Typed for Cell<T> {
    fn static_type() -> Type {
        Type::new(TypeKind::Lock, format!("Cell<{}>", T::static_type()))
    }
}

impl<T: Reflect + Typed + Copy> Reflect for Cell<T> {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        Kind::Lock(self)
    }
}

impl<T: Reflect + Typed + Copy> Guarded for Cell<T> {
    fn inner_type(&self) -> Type {
        T::static_type()
    }

    fn with_inner(&self, f: &mut dyn FnMut(&dyn Reflect) -> Result<()>) -> Result<bool> {
        let inner = self.get();
        f(&inner)?;
        Ok(true)
    }
}

macro_rules! reflect_opaque {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Typed for $ty {
                fn static_type() -> Type {
                    Type::new(TypeKind::Opaque, $name)
                }
            }

            impl Reflect for $ty {
                fn type_of(&self) -> Type {
                    Self::static_type()
                }

                fn reflect(&self) -> Kind<'_> {
                    Kind::Opaque(format!("{self:?}"))
                }
            }
        )+
    };
}

reflect_opaque! {
    Duration => "Duration",
    SystemTime => "SystemTime",
    DateTime<Utc> => "DateTime<Utc>",
    DateTime<FixedOffset> => "DateTime<FixedOffset>",
    DateTime<Local> => "DateTime<Local>",
    NaiveDateTime => "NaiveDateTime",
    NaiveDate => "NaiveDate",
    NaiveTime => "NaiveTime",
    TimeDelta => "TimeDelta",
}

macro_rules! reflect_literal {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Typed for $ty {
                fn static_type() -> Type {
                    Type::new(TypeKind::Literal, $name)
                }
            }

            impl Reflect for $ty {
                fn type_of(&self) -> Type {
                    Self::static_type()
                }

                fn reflect(&self) -> Kind<'_> {
                    Kind::Literal(self.to_string())
                }
            }
        )+
    };
}

reflect_literal! {
    BigInt => "BigInt",
    BigUint => "BigUint",
}

crate::reflect_enum!(TypeKind {
    Bool,
    Char,
    Str,
    Unit,
    Int,
    Uint,
    Float,
    Literal,
    Opaque,
    Struct,
    Enum,
    Seq,
    Map,
    Option,
    Pointer,
    Lock,
    Interface,
});

impl Typed for Type {
    fn static_type() -> Type {
        Type::new(TypeKind::Struct, "Type")
    }
}

impl Reflect for Type {
    fn type_of(&self) -> Type {
        Self::static_type()
    }

    fn reflect(&self) -> Kind<'_> {
        Kind::Struct(StructView {
            style: StructStyle::Named,
            fields: vec![
                Field::new("name", Cow::<'static, str>::static_type(), self.name_cow()).private(),
                Field::new("kind", TypeKind::static_type(), self.kind_ref()).private(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_type_names() {
        assert_eq!(HashMap::<i32, String>::static_type().name(), "HashMap<i32, String>");
        assert_eq!(Vec::<Box<dyn Reflect>>::static_type().name(), "Vec<Box<dyn Reflect>>");
        assert_eq!(<[u8; 4]>::static_type().name(), "[u8; 4]");
        assert_eq!(<(i32, String)>::static_type().name(), "(i32, String)");
        assert_eq!(<(bool,)>::static_type().name(), "(bool,)");
        assert_eq!(Rc::<RefCell<Vec<i32>>>::static_type().name(), "Rc<RefCell<Vec<i32>>>");
    }

    #[test]
    fn test_sets_are_unordered() {
        let set: HashSet<i32> = [1, 2].into_iter().collect();
        match set.reflect() {
            Kind::Seq(view) => {
                assert!(!view.ordered);
                assert_eq!(view.items.len(), 2);
            }
            _ => panic!("expected sequence"),
        }
    }

    #[test]
    fn test_mutex_reports_contention() {
        let mutex = Mutex::new(1u8);
        let _held = mutex.lock().unwrap();
        let mut called = false;
        let acquired = mutex
            .with_inner(&mut |_| {
                called = true;
                Ok(())
            })
            .unwrap();
        assert!(!acquired);
        assert!(!called);
    }

    #[test]
    fn test_refcell_yields_contents() {
        let cell = RefCell::new(String::from("inside"));
        let mut seen = None;
        cell.with_inner(&mut |inner| {
            seen = inner.downcast_ref::<String>().cloned();
            Ok(())
        })
        .unwrap();
        assert_eq!(seen.as_deref(), Some("inside"));
    }

    #[test]
    fn test_big_integers_are_literals() {
        let n = BigInt::from(-12345);
        match n.reflect() {
            Kind::Literal(text) => assert_eq!(text, "-12345"),
            _ => panic!("expected literal"),
        }
    }
}
