//! Capturing `Serialize` values as [`DynamicValue`] trees.
//!
//! The [`DynamicSerializer`] implements [`serde::Serializer`] and builds a
//! [`DynamicValue`] instead of producing text. It accepts every serde data
//! type, including maps with non-string keys.

use crate::dynamic::DynamicValue;
use crate::error::{Error, Result};
use serde::{ser, Serialize};

/// A serializer producing [`DynamicValue`]s.
pub struct DynamicSerializer;

/// Collects the elements of sequences, tuples and tuple structs or variants.
pub struct SerializeVec {
    vec: Vec<DynamicValue>,
    shape: VecShape,
}

enum VecShape {
    Seq,
    TupleStruct(&'static str),
    TupleVariant(&'static str, &'static str),
}

/// Collects the entries of a map.
pub struct SerializeMap {
    entries: Vec<(DynamicValue, DynamicValue)>,
    current_key: Option<DynamicValue>,
}

/// Collects the fields of structs and struct variants.
pub struct SerializeStruct {
    name: &'static str,
    variant: Option<&'static str>,
    fields: Vec<(&'static str, DynamicValue)>,
}

impl ser::Serializer for DynamicSerializer {
    type Ok = DynamicValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStruct;

    fn serialize_bool(self, v: bool) -> Result<DynamicValue> {
        Ok(DynamicValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<DynamicValue> {
        Ok(DynamicValue::Int(v.into(), "i8"))
    }

    fn serialize_i16(self, v: i16) -> Result<DynamicValue> {
        Ok(DynamicValue::Int(v.into(), "i16"))
    }

    fn serialize_i32(self, v: i32) -> Result<DynamicValue> {
        Ok(DynamicValue::Int(v.into(), "i32"))
    }

    fn serialize_i64(self, v: i64) -> Result<DynamicValue> {
        Ok(DynamicValue::Int(v.into(), "i64"))
    }

    fn serialize_i128(self, v: i128) -> Result<DynamicValue> {
        Ok(DynamicValue::Int(v, "i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<DynamicValue> {
        Ok(DynamicValue::Uint(v.into(), "u8"))
    }

    fn serialize_u16(self, v: u16) -> Result<DynamicValue> {
        Ok(DynamicValue::Uint(v.into(), "u16"))
    }

    fn serialize_u32(self, v: u32) -> Result<DynamicValue> {
        Ok(DynamicValue::Uint(v.into(), "u32"))
    }

    fn serialize_u64(self, v: u64) -> Result<DynamicValue> {
        Ok(DynamicValue::Uint(v.into(), "u64"))
    }

    fn serialize_u128(self, v: u128) -> Result<DynamicValue> {
        Ok(DynamicValue::Uint(v, "u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<DynamicValue> {
        Ok(DynamicValue::Float(v.into(), "f32"))
    }

    fn serialize_f64(self, v: f64) -> Result<DynamicValue> {
        Ok(DynamicValue::Float(v, "f64"))
    }

    fn serialize_char(self, v: char) -> Result<DynamicValue> {
        Ok(DynamicValue::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<DynamicValue> {
        Ok(DynamicValue::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<DynamicValue> {
        let vec = v.iter().map(|&b| DynamicValue::Uint(b.into(), "u8")).collect();
        Ok(DynamicValue::Seq(vec))
    }

    fn serialize_none(self) -> Result<DynamicValue> {
        Ok(DynamicValue::Option(None))
    }

    fn serialize_some<T>(self, value: &T) -> Result<DynamicValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(DynamicValue::Option(Some(Box::new(to_dynamic_value(value)?))))
    }

    fn serialize_unit(self) -> Result<DynamicValue> {
        Ok(DynamicValue::Unit)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<DynamicValue> {
        Ok(DynamicValue::UnitStruct(name))
    }

    fn serialize_unit_variant(self, name: &'static str, _variant_index: u32, variant: &'static str) -> Result<DynamicValue> {
        Ok(DynamicValue::UnitVariant { name, variant })
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<DynamicValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(DynamicValue::TupleStruct {
            name,
            fields: vec![to_dynamic_value(value)?],
        })
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<DynamicValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(DynamicValue::TupleVariant {
            name,
            variant,
            fields: vec![to_dynamic_value(value)?],
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(VecShape::Seq, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(VecShape::Seq, len))
    }

    fn serialize_tuple_struct(self, name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(VecShape::TupleStruct(name), len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(VecShape::TupleVariant(name, variant), len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            current_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeStruct> {
        Ok(SerializeStruct::new(name, None, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStruct> {
        Ok(SerializeStruct::new(name, Some(variant), len))
    }
}

impl SerializeVec {
    fn new(shape: VecShape, len: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(len),
            shape,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_dynamic_value(value)?);
        Ok(())
    }

    fn finish(self) -> DynamicValue {
        match self.shape {
            VecShape::Seq => DynamicValue::Seq(self.vec),
            VecShape::TupleStruct(name) => DynamicValue::TupleStruct { name, fields: self.vec },
            VecShape::TupleVariant(name, variant) => DynamicValue::TupleVariant {
                name,
                variant,
                fields: self.vec,
            },
        }
    }
}

impl SerializeStruct {
    fn new(name: &'static str, variant: Option<&'static str>, len: usize) -> Self {
        SerializeStruct {
            name,
            variant,
            fields: Vec::with_capacity(len),
        }
    }

    fn finish(self) -> DynamicValue {
        match self.variant {
            Some(variant) => DynamicValue::StructVariant {
                name: self.name,
                variant,
                fields: self.fields,
            },
            None => DynamicValue::Struct {
                name: self.name,
                fields: self.fields,
            },
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = DynamicValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<DynamicValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = DynamicValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<DynamicValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = DynamicValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<DynamicValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = DynamicValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<DynamicValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = DynamicValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(to_dynamic_value(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.entries.push((key, to_dynamic_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<DynamicValue> {
        Ok(DynamicValue::Map(self.entries))
    }
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = DynamicValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.push((key, to_dynamic_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<DynamicValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeStruct {
    type Ok = DynamicValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.push((key, to_dynamic_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<DynamicValue> {
        Ok(self.finish())
    }
}

pub(crate) fn to_dynamic_value<T: Serialize + ?Sized>(value: &T) -> Result<DynamicValue> {
    value.serialize(DynamicSerializer)
}
