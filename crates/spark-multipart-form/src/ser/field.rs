//! 单个字段值的归类序列化器。
//!
//! [`FieldSerializer`] 不直接写 Part，只把字段值归类为 [`FieldValue`]：
//! 空值、单个叶子或叶子列表。结构性拒绝（map、嵌套对象、列表套列表）在这里发生，
//! 因此对象编码器拿到的永远是扁平值。

use bytes::Bytes;
use serde::Serialize;
use serde::ser::{self, Impossible};

use crate::error::FormError;
use crate::kind::{FieldKind, ScalarKind};
use crate::leaf::Leaf;
use crate::ser::list::ListEncoder;

/// 归类后的字段值。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldValue {
    Null,
    Leaf(Leaf),
    List(Vec<Leaf>),
}

impl FieldValue {
    pub(crate) fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Leaf(leaf) => Some(leaf.kind()),
            FieldValue::List(_) => Some(FieldKind::List),
        }
    }
}

/// 字段值序列化器；`element` 为真时表示正在序列化列表元素。
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSerializer {
    field: &'static str,
    element: bool,
}

impl FieldSerializer {
    pub(crate) fn new(field: &'static str) -> Self {
        Self {
            field,
            element: false,
        }
    }

    pub(crate) fn element(field: &'static str) -> Self {
        Self {
            field,
            element: true,
        }
    }

    fn reject(self, kind: FieldKind) -> FormError {
        if self.element && kind == FieldKind::NamedObject {
            return FormError::unsupported(Some(self.field), "lists of objects are not supported");
        }
        FormError::unsupported_kind(Some(self.field), kind)
    }

    fn leaf(leaf: Leaf) -> Result<FieldValue, FormError> {
        Ok(FieldValue::Leaf(leaf))
    }
}

impl ser::Serializer for FieldSerializer {
    type Ok = FieldValue;
    type Error = FormError;

    type SerializeSeq = ListEncoder;
    type SerializeTuple = ListEncoder;
    type SerializeTupleStruct = Impossible<FieldValue, FormError>;
    type SerializeTupleVariant = Impossible<FieldValue, FormError>;
    type SerializeMap = Impossible<FieldValue, FormError>;
    type SerializeStruct = Impossible<FieldValue, FormError>;
    type SerializeStructVariant = Impossible<FieldValue, FormError>;

    fn serialize_bool(self, v: bool) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::I64(v.into(), ScalarKind::I8))
    }

    fn serialize_i16(self, v: i16) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::I64(v.into(), ScalarKind::I16))
    }

    fn serialize_i32(self, v: i32) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::I64(v.into(), ScalarKind::I32))
    }

    fn serialize_i64(self, v: i64) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::I64(v, ScalarKind::I64))
    }

    fn serialize_i128(self, v: i128) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::I128(v))
    }

    fn serialize_u8(self, v: u8) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::U64(v.into(), ScalarKind::U8))
    }

    fn serialize_u16(self, v: u16) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::U64(v.into(), ScalarKind::U16))
    }

    fn serialize_u32(self, v: u32) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::U64(v.into(), ScalarKind::U32))
    }

    fn serialize_u64(self, v: u64) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::U64(v, ScalarKind::U64))
    }

    fn serialize_u128(self, v: u128) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::U128(v))
    }

    fn serialize_f32(self, v: f32) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::Text(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::Bytes(Bytes::copy_from_slice(v)))
    }

    fn serialize_none(self) -> Result<FieldValue, FormError> {
        Ok(FieldValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<FieldValue, FormError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<FieldValue, FormError> {
        Err(FormError::NotSupportedOperation {
            operation: "encoding a unit value",
        })
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<FieldValue, FormError> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<FieldValue, FormError> {
        Self::leaf(Leaf::Text(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<FieldValue, FormError>
    where
        T: ?Sized + Serialize,
    {
        // 包装类型折叠为内部值，沿用外层字段名
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<FieldValue, FormError>
    where
        T: ?Sized + Serialize,
    {
        Err(self.reject(FieldKind::NamedObject))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListEncoder, FormError> {
        if self.element {
            return Err(self.reject(FieldKind::List));
        }
        Ok(ListEncoder::new(self.field, len))
    }

    fn serialize_tuple(self, len: usize) -> Result<ListEncoder, FormError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, FormError> {
        Err(self.reject(FieldKind::NamedObject))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, FormError> {
        Err(self.reject(FieldKind::NamedObject))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, FormError> {
        Err(self.reject(FieldKind::Map))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, FormError> {
        Err(self.reject(FieldKind::NamedObject))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, FormError> {
        Err(self.reject(FieldKind::NamedObject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Wrapper(u32);

    #[derive(Serialize)]
    struct Inner {
        a: u8,
    }

    #[derive(Serialize)]
    enum Color {
        Red,
        Custom(u8),
    }

    fn classify<T: Serialize>(value: &T) -> Result<FieldValue, FormError> {
        value.serialize(FieldSerializer::new("f"))
    }

    #[test]
    fn scalars_wrappers_and_unit_variants_are_leaves() {
        assert_eq!(
            classify(&Wrapper(7)),
            Ok(FieldValue::Leaf(Leaf::U64(7, ScalarKind::U32)))
        );
        assert_eq!(
            classify(&Color::Red),
            Ok(FieldValue::Leaf(Leaf::Text("Red".to_owned())))
        );
        assert_eq!(classify(&Option::<u8>::None), Ok(FieldValue::Null));
    }

    #[test]
    fn lists_skip_null_elements() {
        let value = vec![Some("a"), None, Some("b")];
        assert_eq!(
            classify(&value),
            Ok(FieldValue::List(vec![
                Leaf::Text("a".to_owned()),
                Leaf::Text("b".to_owned())
            ]))
        );
    }

    #[test]
    fn non_flat_values_are_rejected() {
        let map: BTreeMap<String, u8> = BTreeMap::new();
        assert_eq!(
            classify(&map),
            Err(FormError::unsupported_kind(Some("f"), FieldKind::Map))
        );
        assert!(matches!(
            classify(&Inner { a: 1 }),
            Err(FormError::UnsupportedStructure { .. })
        ));
        assert!(matches!(
            classify(&vec![vec![1u8]]),
            Err(FormError::UnsupportedStructure { .. })
        ));
        assert!(matches!(
            classify(&vec![Inner { a: 1 }]),
            Err(FormError::UnsupportedStructure { .. })
        ));
        assert!(matches!(
            classify(&Color::Custom(1)),
            Err(FormError::UnsupportedStructure { .. })
        ));
    }
}
