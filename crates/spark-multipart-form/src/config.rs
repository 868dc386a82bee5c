//! 绑定层配置。
//!
//! ## 设计目标（Why）
//! - 以调用方显式构造的不可变值取代进程级默认单例；
//! - 配置可在多个并发调用间共享（`Clone + Send + Sync`），构造后不再变化。
//!
//! ## 契约说明（What）
//! - boundary 策略二选一：固定令牌（默认 `1234567890abcdefghijklmnopqrstuvwxyz`，所有调用共用同一令牌），
//!   或每次编码生成指定长度的随机令牌；
//! - 线格式选项与字符串编码透传给 [`MultipartCodec`]；
//! - [`MultipartFormSettings`] 是可从 TOML 加载的外部表示，经 `TryFrom` 校验后转换为配置。

use std::sync::Arc;

use serde::Deserialize;
use spark_codec_multipart::{
    Boundary, Latin1Codec, MultipartCodec, StringCodec, Utf8Codec, WireOptions,
    boundary::MAX_BOUNDARY_LEN,
};

use crate::error::FormError;

/// boundary 令牌的选取策略。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryStrategy {
    /// 每次编码都使用同一个令牌。
    Fixed(Boundary),
    /// 每次编码生成 `length` 个字母数字字符的新令牌；解码时从报文中嗅探。
    Random {
        /// 令牌长度，`1..=70`。
        length: usize,
    },
}

impl BoundaryStrategy {
    /// 为一次编码取得 boundary。
    pub fn next_boundary(&self) -> Boundary {
        match self {
            BoundaryStrategy::Fixed(boundary) => boundary.clone(),
            BoundaryStrategy::Random { length } => Boundary::random(*length),
        }
    }
}

impl Default for BoundaryStrategy {
    fn default() -> Self {
        BoundaryStrategy::Fixed(Boundary::fixed_default())
    }
}

/// 不可变的绑定层配置。
///
/// # 教案式说明
/// - **意图 (Why)**：集中承载 boundary 策略、线格式选项与字符串编码，编码与解码共用同一份设置。
/// - **契约 (What)**：只能通过 [`MultipartFormConfig::builder`] 或 `TryFrom<MultipartFormSettings>` 构造，
///   构造时完成全部校验，之后的访问器都不会失败。
/// - **风险提示 (Trade-offs)**：`Fixed` 策略下并发调用方会写出相同的 boundary；
///   需要逐次隔离时请改用 `Random` 策略。
#[derive(Debug, Clone)]
pub struct MultipartFormConfig {
    boundary: BoundaryStrategy,
    wire: WireOptions,
    strings: Arc<dyn StringCodec>,
}

impl MultipartFormConfig {
    /// 以默认值开始构建。
    pub fn builder() -> MultipartFormConfigBuilder {
        MultipartFormConfigBuilder::default()
    }

    /// boundary 策略。
    pub fn boundary_strategy(&self) -> &BoundaryStrategy {
        &self.boundary
    }

    /// 线格式选项。
    pub fn wire_options(&self) -> &WireOptions {
        &self.wire
    }

    /// 字符串编码。
    pub fn string_codec(&self) -> &Arc<dyn StringCodec> {
        &self.strings
    }

    /// 依据本配置创建线格式编解码器。
    pub fn wire_codec(&self) -> MultipartCodec {
        MultipartCodec::new(self.wire.clone(), Arc::clone(&self.strings))
    }
}

impl Default for MultipartFormConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryStrategy::default(),
            wire: WireOptions::default(),
            strings: Arc::new(Utf8Codec),
        }
    }
}

/// [`MultipartFormConfig`] 的构建器。
#[derive(Debug, Clone)]
pub struct MultipartFormConfigBuilder {
    boundary: BoundaryStrategy,
    wire: WireOptions,
    strings: Arc<dyn StringCodec>,
}

impl Default for MultipartFormConfigBuilder {
    fn default() -> Self {
        let MultipartFormConfig {
            boundary,
            wire,
            strings,
        } = MultipartFormConfig::default();
        Self {
            boundary,
            wire,
            strings,
        }
    }
}

impl MultipartFormConfigBuilder {
    /// 使用固定 boundary。
    #[must_use]
    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = BoundaryStrategy::Fixed(boundary);
        self
    }

    /// 每次编码生成长度为 `length` 的随机 boundary。
    #[must_use]
    pub fn random_boundary(mut self, length: usize) -> Self {
        self.boundary = BoundaryStrategy::Random { length };
        self
    }

    /// 行分隔符，只能由 `\r`/`\n` 组成。
    #[must_use]
    pub fn line_separator(mut self, separator: impl Into<String>) -> Self {
        self.wire.line_separator = separator.into();
        self
    }

    /// 解码时是否要求结尾分隔行。
    #[must_use]
    pub fn require_close_delimiter(mut self, required: bool) -> Self {
        self.wire.require_close_delimiter = required;
        self
    }

    /// 解码时是否要求报文包含配置的分隔行。
    #[must_use]
    pub fn check_boundary(mut self, check: bool) -> Self {
        self.wire.check_boundary = check;
        self
    }

    /// 字符串编码。
    #[must_use]
    pub fn string_codec(mut self, codec: Arc<dyn StringCodec>) -> Self {
        self.strings = codec;
        self
    }

    /// 校验并生成配置。
    pub fn build(self) -> Result<MultipartFormConfig, FormError> {
        if let BoundaryStrategy::Random { length } = self.boundary
            && !(1..=MAX_BOUNDARY_LEN).contains(&length)
        {
            return Err(FormError::invalid_config(format!(
                "random boundary length must be within 1..={MAX_BOUNDARY_LEN}, got {length}"
            )));
        }
        let separator = &self.wire.line_separator;
        if separator.is_empty() || !separator.chars().all(|ch| ch == '\r' || ch == '\n') {
            return Err(FormError::invalid_config(format!(
                "line separator must consist of CR/LF characters, got {separator:?}"
            )));
        }
        Ok(MultipartFormConfig {
            boundary: self.boundary,
            wire: self.wire,
            strings: self.strings,
        })
    }
}

/// 字符集选择。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Charset {
    /// UTF-8（默认）。
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// ISO-8859-1。
    #[serde(rename = "iso-8859-1", alias = "latin1")]
    Latin1,
}

impl Charset {
    fn codec(self) -> Arc<dyn StringCodec> {
        match self {
            Charset::Utf8 => Arc::new(Utf8Codec),
            Charset::Latin1 => Arc::new(Latin1Codec),
        }
    }
}

/// 可反序列化的配置表示。
///
/// ```toml
/// boundary = "my-boundary"          # 与 random_boundary_length 互斥
/// # random_boundary_length = 40
/// line_separator = "\r\n"
/// charset = "utf-8"
/// require_close_delimiter = true
/// check_boundary = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultipartFormSettings {
    /// 固定 boundary 令牌。
    pub boundary: Option<String>,
    /// 随机 boundary 长度。
    pub random_boundary_length: Option<usize>,
    /// 行分隔符。
    pub line_separator: String,
    /// 字符集。
    pub charset: Charset,
    /// 是否要求结尾分隔行。
    pub require_close_delimiter: bool,
    /// 是否校验分隔行存在。
    pub check_boundary: bool,
}

impl Default for MultipartFormSettings {
    fn default() -> Self {
        let wire = WireOptions::default();
        Self {
            boundary: None,
            random_boundary_length: None,
            line_separator: wire.line_separator,
            charset: Charset::default(),
            require_close_delimiter: wire.require_close_delimiter,
            check_boundary: wire.check_boundary,
        }
    }
}

impl MultipartFormSettings {
    /// 从 TOML 文本加载。
    pub fn from_toml_str(input: &str) -> Result<Self, FormError> {
        toml::from_str(input).map_err(|err| FormError::invalid_config(err.to_string()))
    }
}

impl TryFrom<MultipartFormSettings> for MultipartFormConfig {
    type Error = FormError;

    fn try_from(settings: MultipartFormSettings) -> Result<Self, FormError> {
        let mut builder = MultipartFormConfig::builder()
            .line_separator(settings.line_separator)
            .require_close_delimiter(settings.require_close_delimiter)
            .check_boundary(settings.check_boundary)
            .string_codec(settings.charset.codec());
        builder = match (settings.boundary, settings.random_boundary_length) {
            (Some(_), Some(_)) => {
                return Err(FormError::invalid_config(
                    "`boundary` and `random_boundary_length` are mutually exclusive",
                ));
            }
            (Some(token), None) => builder.boundary(Boundary::new(token)?),
            (None, Some(length)) => builder.random_boundary(length),
            (None, None) => builder,
        };
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_documented_boundary() {
        let config = MultipartFormConfig::default();
        assert_eq!(
            config.boundary_strategy().next_boundary(),
            Boundary::fixed_default()
        );
        assert_eq!(config.wire_options().line_separator, "\n");
        assert_eq!(config.string_codec().charset(), "utf-8");
    }

    #[test]
    fn builder_validates_random_length_and_separator() {
        assert!(MultipartFormConfig::builder().random_boundary(0).build().is_err());
        assert!(MultipartFormConfig::builder().random_boundary(71).build().is_err());
        assert!(MultipartFormConfig::builder().line_separator("").build().is_err());
        assert!(MultipartFormConfig::builder().line_separator("|").build().is_err());
        assert!(MultipartFormConfig::builder()
            .random_boundary(70)
            .line_separator("\r\n")
            .build()
            .is_ok());
    }

    #[test]
    fn settings_from_toml() {
        let settings = MultipartFormSettings::from_toml_str(
            r#"
            random_boundary_length = 32
            line_separator = "\r\n"
            charset = "latin1"
            "#,
        )
        .expect("TOML 合法");
        assert_eq!(settings.charset, Charset::Latin1);
        assert!(settings.check_boundary);

        let config = MultipartFormConfig::try_from(settings).expect("配置合法");
        assert_eq!(
            config.boundary_strategy(),
            &BoundaryStrategy::Random { length: 32 }
        );
        assert_eq!(config.string_codec().charset(), "iso-8859-1");
        assert_eq!(config.wire_options().line_separator, "\r\n");
    }

    #[test]
    fn conflicting_or_invalid_settings_are_rejected() {
        let both = MultipartFormSettings {
            boundary: Some("abc".to_owned()),
            random_boundary_length: Some(10),
            ..MultipartFormSettings::default()
        };
        assert!(matches!(
            MultipartFormConfig::try_from(both),
            Err(FormError::InvalidConfig { .. })
        ));

        let bad_token = MultipartFormSettings {
            boundary: Some("bad;token".to_owned()),
            ..MultipartFormSettings::default()
        };
        assert!(matches!(
            MultipartFormConfig::try_from(bad_token),
            Err(FormError::Wire(_))
        ));

        assert!(MultipartFormSettings::from_toml_str("unknown = 1").is_err());
    }
}
