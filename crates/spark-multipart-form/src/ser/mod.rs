//! 编码方向：serde `Serializer` 实现。
//!
//! ## 结构概览（What）
//! - `RootSerializer`：只接受结构体（或单元结构体）作为根；
//! - `object::ObjectEncoder`：`SerializeStruct`，逐字段分派并在结束时执行延迟编辑；
//! - `field::FieldSerializer`：把字段值归类为空值、叶子或叶子列表；
//! - `list::ListEncoder`：收集列表元素。

mod field;
mod list;
mod object;

use serde::Serialize;
use serde::ser::{self, Impossible};
use spark_codec_multipart::{FormData, StringCodec};

use crate::directive::FormSchema;
use crate::error::FormError;
use crate::kind::{FieldKind, ScalarKind};

use self::object::ObjectEncoder;

/// 以显式 schema 将值编码为 Part 存储。
pub fn to_form_data<T>(
    value: &T,
    schema: &FormSchema,
    codec: &dyn StringCodec,
) -> Result<FormData, FormError>
where
    T: ?Sized + Serialize,
{
    value.serialize(RootSerializer { schema, codec })
}

/// 根层序列化器：只有结构体能打开字段遍历。
pub(crate) struct RootSerializer<'a> {
    schema: &'a FormSchema,
    codec: &'a dyn StringCodec,
}

impl RootSerializer<'_> {
    fn reject(kind: FieldKind) -> FormError {
        FormError::unsupported(None, format!("root must be a struct, found {kind}"))
    }
}

type RootImpossible = Impossible<FormData, FormError>;

impl<'a> ser::Serializer for RootSerializer<'a> {
    type Ok = FormData;
    type Error = FormError;

    type SerializeSeq = RootImpossible;
    type SerializeTuple = RootImpossible;
    type SerializeTupleStruct = RootImpossible;
    type SerializeTupleVariant = RootImpossible;
    type SerializeMap = RootImpossible;
    type SerializeStruct = ObjectEncoder<'a>;
    type SerializeStructVariant = RootImpossible;

    fn serialize_bool(self, _v: bool) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::Bool)))
    }

    fn serialize_i8(self, _v: i8) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::I8)))
    }

    fn serialize_i16(self, _v: i16) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::I16)))
    }

    fn serialize_i32(self, _v: i32) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::I32)))
    }

    fn serialize_i64(self, _v: i64) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::I64)))
    }

    fn serialize_i128(self, _v: i128) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::I128)))
    }

    fn serialize_u8(self, _v: u8) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::U8)))
    }

    fn serialize_u16(self, _v: u16) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::U16)))
    }

    fn serialize_u32(self, _v: u32) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::U32)))
    }

    fn serialize_u64(self, _v: u64) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::U64)))
    }

    fn serialize_u128(self, _v: u128) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::U128)))
    }

    fn serialize_f32(self, _v: f32) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::F32)))
    }

    fn serialize_f64(self, _v: f64) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::F64)))
    }

    fn serialize_char(self, _v: char) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Scalar(ScalarKind::Char)))
    }

    fn serialize_str(self, _v: &str) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Text))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Bytes))
    }

    fn serialize_none(self) -> Result<FormData, FormError> {
        Err(FormError::unsupported(None, "root must be a struct, found none"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<FormData, FormError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<FormData, FormError> {
        Err(FormError::unsupported(None, "root must be a struct, found unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<FormData, FormError> {
        Ok(FormData::new())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<FormData, FormError> {
        Err(Self::reject(FieldKind::Text))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<FormData, FormError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<FormData, FormError>
    where
        T: ?Sized + Serialize,
    {
        Err(Self::reject(FieldKind::NamedObject))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<RootImpossible, FormError> {
        Err(Self::reject(FieldKind::List))
    }

    fn serialize_tuple(self, _len: usize) -> Result<RootImpossible, FormError> {
        Err(Self::reject(FieldKind::List))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<RootImpossible, FormError> {
        Err(Self::reject(FieldKind::List))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<RootImpossible, FormError> {
        Err(Self::reject(FieldKind::NamedObject))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<RootImpossible, FormError> {
        Err(Self::reject(FieldKind::Map))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<ObjectEncoder<'a>, FormError> {
        Ok(ObjectEncoder::new(self.schema, self.codec))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<RootImpossible, FormError> {
        Err(Self::reject(FieldKind::NamedObject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{DynamicHeader, StaticHeader};
    use spark_codec_multipart::Utf8Codec;

    #[derive(Serialize)]
    struct Upload {
        mime: &'static str,
        file: Vec<&'static str>,
        note: Option<String>,
    }

    #[derive(Serialize)]
    struct Marker;

    fn schema() -> FormSchema {
        FormSchema::new()
            .field("mime", |f| {
                f.dynamic_header(DynamicHeader::value("Content-Type", "file"))
                    .static_header(StaticHeader::value("Ignored", "x"))
            })
            .field("file", |f| f.static_header(StaticHeader::attribute("X-Meta", "kind", "doc")))
    }

    #[test]
    fn header_field_declared_before_target_still_applies() {
        let value = Upload {
            mime: "text/plain",
            file: vec!["one", "two"],
            note: None,
        };
        let form = to_form_data(&value, &schema(), &Utf8Codec).expect("编码成功");

        assert_eq!(form.names(), vec!["file"]);
        for part in form.parts("file") {
            let content_type = part.headers.get("Content-Type").and_then(|h| h.value());
            assert_eq!(content_type, Some("text/plain"));
            // 列表元素 Part 不写静态 header
            assert!(part.headers.get("X-Meta").is_none());
            assert!(part.headers.get("Ignored").is_none());
        }
    }

    #[test]
    fn unit_struct_root_encodes_to_empty_form() {
        let form = to_form_data(&Marker, &FormSchema::new(), &Utf8Codec).expect("编码成功");
        assert!(form.is_empty());
    }

    #[test]
    fn non_struct_roots_are_rejected() {
        for result in [
            to_form_data(&5u8, &FormSchema::new(), &Utf8Codec),
            to_form_data("text", &FormSchema::new(), &Utf8Codec),
            to_form_data(&vec![1, 2], &FormSchema::new(), &Utf8Codec),
        ] {
            assert!(matches!(
                result,
                Err(FormError::UnsupportedStructure { field: None, .. })
            ));
        }
    }
}
