//! 解码方向：serde `Deserializer` 实现。
//!
//! ## 结构概览（What）
//! - `RootDeserializer`：只接受结构体（或单元结构体）作为根；
//! - `object::ObjectDecoder`：`MapAccess`，按字段解析 header/body 来源；
//! - `field::FieldDeserializer`：把已解析值转换为目标标量、列表或包装类型；
//! - `list::ListCursor`：列表的前向游标。

mod field;
mod list;
mod object;

use serde::de::{self, DeserializeOwned, Visitor};
use spark_codec_multipart::{FormData, StringCodec};

use crate::directive::FormSchema;
use crate::error::FormError;
use crate::kind::{FieldKind, ScalarKind};

use self::object::ObjectDecoder;

/// 以显式 schema 从 Part 存储解码值。
pub fn from_form_data<T>(
    form: &FormData,
    schema: &FormSchema,
    codec: &dyn StringCodec,
) -> Result<T, FormError>
where
    T: DeserializeOwned,
{
    T::deserialize(RootDeserializer {
        form,
        schema,
        codec,
    })
}

struct RootDeserializer<'a> {
    form: &'a FormData,
    schema: &'a FormSchema,
    codec: &'a dyn StringCodec,
}

fn reject_root(kind: FieldKind) -> FormError {
    FormError::unsupported(None, format!("root must be a struct, found {kind}"))
}

macro_rules! reject_root_kind {
    ($($method:ident => $kind:expr;)*) => {
        $(
            fn $method<V>(self, _visitor: V) -> Result<V::Value, FormError>
            where
                V: Visitor<'de>,
            {
                Err(reject_root($kind))
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for RootDeserializer<'_> {
    type Error = FormError;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(FormError::NotSupportedOperation {
            operation: "self-describing decode of a whole form",
        })
    }

    reject_root_kind! {
        deserialize_bool => FieldKind::Scalar(ScalarKind::Bool);
        deserialize_i8 => FieldKind::Scalar(ScalarKind::I8);
        deserialize_i16 => FieldKind::Scalar(ScalarKind::I16);
        deserialize_i32 => FieldKind::Scalar(ScalarKind::I32);
        deserialize_i64 => FieldKind::Scalar(ScalarKind::I64);
        deserialize_i128 => FieldKind::Scalar(ScalarKind::I128);
        deserialize_u8 => FieldKind::Scalar(ScalarKind::U8);
        deserialize_u16 => FieldKind::Scalar(ScalarKind::U16);
        deserialize_u32 => FieldKind::Scalar(ScalarKind::U32);
        deserialize_u64 => FieldKind::Scalar(ScalarKind::U64);
        deserialize_u128 => FieldKind::Scalar(ScalarKind::U128);
        deserialize_f32 => FieldKind::Scalar(ScalarKind::F32);
        deserialize_f64 => FieldKind::Scalar(ScalarKind::F64);
        deserialize_char => FieldKind::Scalar(ScalarKind::Char);
        deserialize_str => FieldKind::Text;
        deserialize_string => FieldKind::Text;
        deserialize_identifier => FieldKind::Text;
        deserialize_bytes => FieldKind::Bytes;
        deserialize_byte_buf => FieldKind::Bytes;
        deserialize_seq => FieldKind::List;
        deserialize_map => FieldKind::Map;
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, _visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(FormError::unsupported(None, "root must be a struct, found unit"))
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(reject_root(FieldKind::List))
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
        Err(reject_root(FieldKind::List))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(ObjectDecoder::new(self.form, self.schema, self.codec, fields))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        Err(reject_root(FieldKind::NamedObject))
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, FormError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}
