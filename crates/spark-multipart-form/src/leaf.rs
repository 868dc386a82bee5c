//! 叶子值编解码：标量 <-> 规范文本 <-> body 字节。
//!
//! 规范文本：布尔为 `true`/`false`，整数与浮点使用 `Display`，字符为单字符字符串；
//! 文本与字节之间的转换统一经过配置的 [`StringCodec`]。

use bytes::Bytes;
use spark_codec_multipart::StringCodec;

use crate::error::FormError;
use crate::kind::{FieldKind, ScalarKind};

/// 编码方向的叶子值。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Leaf {
    Bool(bool),
    I64(i64, ScalarKind),
    U64(u64, ScalarKind),
    I128(i128),
    U128(u128),
    F32(f32),
    F64(f64),
    Char(char),
    Text(String),
    Bytes(Bytes),
}

impl Leaf {
    pub(crate) fn kind(&self) -> FieldKind {
        match self {
            Leaf::Bool(_) => FieldKind::Scalar(ScalarKind::Bool),
            Leaf::I64(_, kind) | Leaf::U64(_, kind) => FieldKind::Scalar(*kind),
            Leaf::I128(_) => FieldKind::Scalar(ScalarKind::I128),
            Leaf::U128(_) => FieldKind::Scalar(ScalarKind::U128),
            Leaf::F32(_) => FieldKind::Scalar(ScalarKind::F32),
            Leaf::F64(_) => FieldKind::Scalar(ScalarKind::F64),
            Leaf::Char(_) => FieldKind::Scalar(ScalarKind::Char),
            Leaf::Text(_) => FieldKind::Text,
            Leaf::Bytes(_) => FieldKind::Bytes,
        }
    }

    /// 规范文本；字节值经字符串编码解码为文本。
    pub(crate) fn into_text(self, codec: &dyn StringCodec) -> String {
        match self {
            Leaf::Bool(value) => value.to_string(),
            Leaf::I64(value, _) => value.to_string(),
            Leaf::U64(value, _) => value.to_string(),
            Leaf::I128(value) => value.to_string(),
            Leaf::U128(value) => value.to_string(),
            Leaf::F32(value) => value.to_string(),
            Leaf::F64(value) => value.to_string(),
            Leaf::Char(value) => value.to_string(),
            Leaf::Text(value) => value,
            Leaf::Bytes(value) => codec.decode(&value),
        }
    }

    /// body 字节；字节值原样保留，其余值先转为规范文本再编码。
    pub(crate) fn into_body(self, codec: &dyn StringCodec) -> Bytes {
        match self {
            Leaf::Bytes(value) => value,
            other => Bytes::from(codec.encode(&other.into_text(codec))),
        }
    }
}

/// 解码方向的单个已解析值：header 字符串或 body 字节。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LeafSource {
    Header(String),
    Body(Bytes),
}

impl LeafSource {
    /// 文本视图：header 原样返回，body 经字符串编码解码。
    pub(crate) fn text(&self, codec: &dyn StringCodec) -> String {
        match self {
            LeafSource::Header(text) => text.clone(),
            LeafSource::Body(body) => codec.decode(body),
        }
    }

    /// 字节视图：body 原样返回，header 经字符串编码编码。
    pub(crate) fn bytes(&self, codec: &dyn StringCodec) -> Bytes {
        match self {
            LeafSource::Header(text) => Bytes::from(codec.encode(text)),
            LeafSource::Body(body) => body.clone(),
        }
    }
}

/// 按标量种类解析文本。
pub(crate) fn parse_scalar<T>(field: &str, text: &str, kind: ScalarKind) -> Result<T, FormError>
where
    T: core::str::FromStr,
{
    text.parse::<T>()
        .map_err(|_| FormError::conversion(field, text, kind.type_name()))
}

/// 布尔值只接受 `true`/`false`。
pub(crate) fn parse_bool(field: &str, text: &str) -> Result<bool, FormError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(FormError::conversion(field, other, "bool")),
    }
}

/// 字符要求恰好一个 Unicode 标量。
pub(crate) fn parse_char(field: &str, text: &str) -> Result<char, FormError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(FormError::conversion(field, text, "char")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_codec_multipart::{Latin1Codec, Utf8Codec};

    #[test]
    fn canonical_text_of_scalars() {
        let codec = Utf8Codec;
        assert_eq!(Leaf::Bool(true).into_text(&codec), "true");
        assert_eq!(Leaf::I64(-7, ScalarKind::I8).into_text(&codec), "-7");
        assert_eq!(Leaf::U128(u128::MAX).into_text(&codec), u128::MAX.to_string());
        assert_eq!(Leaf::F64(1.5).into_text(&codec), "1.5");
        assert_eq!(Leaf::Char('é').into_text(&codec), "é");
    }

    #[test]
    fn body_goes_through_string_codec_except_bytes() {
        let latin1 = Latin1Codec;
        assert_eq!(Leaf::Text("é".to_owned()).into_body(&latin1).as_ref(), &[0xe9]);
        let raw = Bytes::from_static(&[0xff, 0x00]);
        assert_eq!(Leaf::Bytes(raw.clone()).into_body(&latin1), raw);
    }

    #[test]
    fn strict_bool_and_char_parsing() {
        assert_eq!(parse_bool("f", "true"), Ok(true));
        assert!(parse_bool("f", "TRUE").is_err());
        assert_eq!(parse_char("c", "x"), Ok('x'));
        assert!(parse_char("c", "").is_err());
        assert!(parse_char("c", "xy").is_err());
        assert_eq!(
            parse_scalar::<u8>("age", "300", ScalarKind::U8),
            Err(FormError::conversion("age", "300", "u8"))
        );
    }

    #[test]
    fn header_source_prefers_text_body_source_prefers_bytes() {
        let codec = Utf8Codec;
        let header = LeafSource::Header("H1".to_owned());
        let body = LeafSource::Body(Bytes::from_static(b"x"));
        assert_eq!(header.text(&codec), "H1");
        assert_eq!(header.bytes(&codec), Bytes::from_static(b"H1"));
        assert_eq!(body.text(&codec), "x");
    }
}
