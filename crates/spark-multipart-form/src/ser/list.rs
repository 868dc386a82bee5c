//! 列表字段：逐个收集元素叶子。

use serde::Serialize;
use serde::ser::{SerializeSeq, SerializeTuple};

use crate::error::FormError;
use crate::kind::FieldKind;
use crate::leaf::Leaf;
use crate::ser::field::{FieldSerializer, FieldValue};

/// 收集列表元素；`None` 元素被跳过，非叶子元素被拒绝。
#[derive(Debug)]
pub(crate) struct ListEncoder {
    field: &'static str,
    items: Vec<Leaf>,
}

impl ListEncoder {
    pub(crate) fn new(field: &'static str, len: Option<usize>) -> Self {
        Self {
            field,
            items: Vec::with_capacity(len.unwrap_or_default()),
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<(), FormError>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(FieldSerializer::element(self.field))? {
            FieldValue::Null => Ok(()),
            FieldValue::Leaf(leaf) => {
                self.items.push(leaf);
                Ok(())
            }
            FieldValue::List(_) => Err(FormError::unsupported_kind(
                Some(self.field),
                FieldKind::List,
            )),
        }
    }
}

impl SerializeSeq for ListEncoder {
    type Ok = FieldValue;
    type Error = FormError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), FormError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<FieldValue, FormError> {
        Ok(FieldValue::List(self.items))
    }
}

impl SerializeTuple for ListEncoder {
    type Ok = FieldValue;
    type Error = FormError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), FormError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<FieldValue, FormError> {
        SerializeSeq::end(self)
    }
}
