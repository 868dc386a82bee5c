//! 字符串 <-> 字节的可插拔编码。
//!
//! 绑定层把所有文本（标量的规范文本、header 字符串）都经由 [`StringCodec`] 转成 body 字节；
//! 线格式编解码器也用它写出/读入 header 行。

use core::fmt::Debug;

/// 字符串编码契约。
///
/// 实现必须无状态或内部只读，以便在多次调用间共享。
pub trait StringCodec: Debug + Send + Sync + 'static {
    /// 将文本编码为字节。
    fn encode(&self, text: &str) -> Vec<u8>;

    /// 将字节解码为文本；无法表示的字节需以替代字符处理，而非报错。
    fn decode(&self, bytes: &[u8]) -> String;

    /// 用于日志与 `Content-Type` 的字符集名称。
    fn charset(&self) -> &'static str;
}

/// UTF-8 编码，解码时以 U+FFFD 替换非法序列。
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Codec;

impl StringCodec for Utf8Codec {
    fn encode(&self, text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn charset(&self) -> &'static str {
        "utf-8"
    }
}

/// ISO-8859-1 编码；超出 U+00FF 的字符写为 `?`。
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1Codec;

impl StringCodec for Latin1Codec {
    fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
            .collect()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&byte| char::from(byte)).collect()
    }

    fn charset(&self) -> &'static str {
        "iso-8859-1"
    }
}
