//! 单个字段（或列表元素）的反序列化器。
//!
//! 输入是对象解码器已解析好的值序列：要么全部来自 header 字符串，要么全部来自 body 字节。
//! 标量只读取第一个值；列表以前向游标逐个消费。

use serde::de::{self, IntoDeserializer, Visitor};

use spark_codec_multipart::StringCodec;

use crate::de::list::ListCursor;
use crate::error::FormError;
use crate::kind::{FieldKind, ScalarKind};
use crate::leaf::{LeafSource, parse_bool, parse_char, parse_scalar};

pub(crate) struct FieldDeserializer<'a> {
    field: &'static str,
    sources: Vec<LeafSource>,
    codec: &'a dyn StringCodec,
    element: bool,
}

impl<'a> FieldDeserializer<'a> {
    pub(crate) fn new(
        field: &'static str,
        sources: Vec<LeafSource>,
        codec: &'a dyn StringCodec,
    ) -> Self {
        Self {
            field,
            sources,
            codec,
            element: false,
        }
    }

    pub(crate) fn element(
        field: &'static str,
        source: LeafSource,
        codec: &'a dyn StringCodec,
    ) -> Self {
        Self {
            field,
            sources: vec![source],
            codec,
            element: true,
        }
    }

    fn first(&self) -> Result<&LeafSource, FormError> {
        self.sources
            .first()
            .ok_or_else(|| FormError::missing(self.field))
    }

    fn first_text(&self) -> Result<String, FormError> {
        Ok(self.first()?.text(self.codec))
    }

    fn scalar<T>(&self, kind: ScalarKind) -> Result<T, FormError>
    where
        T: core::str::FromStr,
    {
        let text = self.first_text()?;
        parse_scalar(self.field, &text, kind)
    }

    fn reject(&self, kind: FieldKind) -> FormError {
        reject(self.field, self.element, kind)
    }

    fn list(self) -> ListCursor<'a> {
        ListCursor::new(self.field, self.sources, self.codec)
    }
}

fn reject(field: &'static str, element: bool, kind: FieldKind) -> FormError {
    if element && kind == FieldKind::NamedObject {
        return FormError::unsupported(Some(field), "lists of objects are not supported");
    }
    FormError::unsupported_kind(Some(field), kind)
}

/// 以变体名文本表示的枚举：只接受单元变体，携带数据的变体按结构违规拒绝。
struct UnitVariant {
    field: &'static str,
    element: bool,
    name: String,
}

impl UnitVariant {
    fn reject(&self) -> FormError {
        reject(self.field, self.element, FieldKind::NamedObject)
    }
}

impl<'de> de::EnumAccess<'de> for UnitVariant {
    type Error = FormError;
    type Variant = Self;

    fn variant_seed<S>(self, seed: S) -> Result<(S::Value, Self), FormError>
    where
        S: de::DeserializeSeed<'de>,
    {
        let name: de::value::StrDeserializer<'_, FormError> =
            self.name.as_str().into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, self))
    }
}

impl<'de> de::VariantAccess<'de> for UnitVariant {
    type Error = FormError;

    fn unit_variant(self) -> Result<(), FormError> {
        Ok(())
    }

    fn newtype_variant_seed<S>(self, _seed: S) -> Result<S::Value, FormError>
    where
        S: de::DeserializeSeed<'de>,
    {
        Err(self.reject())
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(self.reject())
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(self.reject())
    }
}

macro_rules! deserialize_scalar {
    ($($method:ident => $visit:ident: $ty:ty, $kind:ident;)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, FormError>
            where
                V: Visitor<'de>,
            {
                let value: $ty = self.scalar(ScalarKind::$kind)?;
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for FieldDeserializer<'_> {
    type Error = FormError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        if self.element || self.sources.len() == 1 {
            visitor.visit_string(self.first_text()?)
        } else {
            visitor.visit_seq(self.list())
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        let text = self.first_text()?;
        visitor.visit_bool(parse_bool(self.field, &text)?)
    }

    deserialize_scalar! {
        deserialize_i8 => visit_i8: i8, I8;
        deserialize_i16 => visit_i16: i16, I16;
        deserialize_i32 => visit_i32: i32, I32;
        deserialize_i64 => visit_i64: i64, I64;
        deserialize_i128 => visit_i128: i128, I128;
        deserialize_u8 => visit_u8: u8, U8;
        deserialize_u16 => visit_u16: u16, U16;
        deserialize_u32 => visit_u32: u32, U32;
        deserialize_u64 => visit_u64: u64, U64;
        deserialize_u128 => visit_u128: u128, U128;
        deserialize_f32 => visit_f32: f32, F32;
        deserialize_f64 => visit_f64: f64, F64;
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        let text = self.first_text()?;
        visitor.visit_char(parse_char(self.field, &text)?)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.first_text()?)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        let bytes = self.first()?.bytes(self.codec);
        visitor.visit_byte_buf(bytes.to_vec())
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        if self.sources.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, _visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(FormError::NotSupportedOperation {
            operation: "decoding a unit value",
        })
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        // 包装类型拿到与外层字段相同的已解析值
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        if self.element {
            return Err(self.reject(FieldKind::List));
        }
        visitor.visit_seq(self.list())
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        if self.element {
            return Err(self.reject(FieldKind::List));
        }
        if self.sources.len() < len {
            return Err(FormError::missing(self.field));
        }
        visitor.visit_seq(self.list())
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(self.reject(FieldKind::NamedObject))
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(self.reject(FieldKind::Map))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(self.reject(FieldKind::NamedObject))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        let name = self.first_text()?;
        visitor.visit_enum(UnitVariant {
            field: self.field,
            element: self.element,
            name,
        })
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}
