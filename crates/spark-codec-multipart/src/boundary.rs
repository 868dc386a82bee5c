//! boundary 令牌。
//!
//! RFC 2046 §5.1.1：1 到 70 个 `bchars` 字符，且不能以空格结尾。

use core::fmt;

use rand::{Rng, distributions::Alphanumeric};

use crate::error::MultipartParseError;

/// RFC 2046 允许的最大 boundary 长度。
pub const MAX_BOUNDARY_LEN: usize = 70;

/// 文档化的固定默认 boundary。
pub const DEFAULT_BOUNDARY: &str = "1234567890abcdefghijklmnopqrstuvwxyz";

/// 经过校验的 boundary 令牌。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// 校验并包装调用方提供的令牌。
    pub fn new(token: impl Into<String>) -> Result<Self, MultipartParseError> {
        let token = token.into();
        if let Some(reason) = validate(&token) {
            return Err(MultipartParseError::InvalidBoundary {
                boundary: token,
                reason,
            });
        }
        Ok(Self(token))
    }

    /// 生成长度为 `len` 的随机字母数字令牌，`len` 会被钳制到 `1..=70`。
    pub fn random(len: usize) -> Self {
        let len = len.clamp(1, MAX_BOUNDARY_LEN);
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// 固定默认令牌 [`DEFAULT_BOUNDARY`]。
    pub fn fixed_default() -> Self {
        Self(DEFAULT_BOUNDARY.to_owned())
    }

    /// 令牌文本。
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 分隔行 `--<boundary>`。
    pub fn delimiter(&self) -> String {
        format!("--{}", self.0)
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::fixed_default()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Boundary {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn validate(token: &str) -> Option<&'static str> {
    if token.is_empty() {
        return Some("boundary must not be empty");
    }
    if token.len() > MAX_BOUNDARY_LEN {
        return Some("boundary must not exceed 70 characters");
    }
    if token.ends_with(' ') {
        return Some("boundary must not end with a space");
    }
    if !token.bytes().all(is_bchar) {
        return Some("boundary contains characters outside RFC 2046 bchars");
    }
    None
}

fn is_bchar(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?' | b' '
        )
}
