//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为字段 <-> Part 绑定层集中定义错误语义，使编码与解码两个方向共享同一套分类；
//! - 同时作为 `serde::ser::Error` 与 `serde::de::Error` 的实现，使用户的 `Serialize`/`Deserialize`
//!   实现可以直接抛出自定义消息。
//!
//! ## 设计要求（What）
//! - 所有错误在当前调用内都是致命的：不做本地恢复，也不返回部分结果；
//! - 能定位到字段时，错误必须携带字段名。

use std::fmt::Display;

use spark_codec_multipart::MultipartParseError;
use thiserror::Error;

use crate::kind::FieldKind;

/// 绑定层错误。
///
/// # 教案式说明
/// - **意图 (Why)**：把“结构不受支持”“缺值”“转换失败”“线格式损坏”等失败区分开，
///   调用方可据此决定是修正类型定义还是拒绝输入。
/// - **契约 (What)**：
///   - `UnsupportedStructure` 在编码与解码两个方向对同一类型给出相同结论；
///   - `MissingValue` 来自非可空字段缺少 Part/header，或元组需要的元素多于收集到的值；
///   - `Wire` 透传 [`MultipartParseError`]。
/// - **设计权衡 (Trade-offs)**：`reason` 使用 `String`，便于拼接字段种类等上下文。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FormError {
    /// 值的结构超出扁平模型（map、嵌套列表、嵌套对象、非结构体根等）。
    #[error(
        "unsupported structure at `{}`: {reason}",
        .field.as_deref().unwrap_or("<root>")
    )]
    UnsupportedStructure {
        /// 出错字段；根层错误时为 `None`。
        field: Option<String>,
        /// 拒绝原因。
        reason: String,
    },

    /// 非可空字段没有可用的 body 或 header 值。
    #[error("field `{field}` has no value")]
    MissingValue {
        /// 缺值字段。
        field: String,
    },

    /// 已解析出的字符串无法转换为目标标量。
    #[error("field `{field}`: cannot convert `{value}` to {target}")]
    DecodeConversion {
        /// 出错字段。
        field: String,
        /// 原始文本。
        value: String,
        /// 目标类型名称。
        target: &'static str,
    },

    /// 模型刻意未定义的操作。
    #[error("operation not supported: {operation}")]
    NotSupportedOperation {
        /// 操作描述。
        operation: &'static str,
    },

    /// 线格式解析失败。
    #[error(transparent)]
    Wire(#[from] MultipartParseError),

    /// 配置不合法。
    #[error("invalid multipart form configuration: {reason}")]
    InvalidConfig {
        /// 拒绝原因。
        reason: String,
    },

    /// 用户 `Serialize`/`Deserialize` 实现抛出的消息。
    #[error("{0}")]
    Custom(String),
}

impl FormError {
    pub(crate) fn unsupported(field: Option<&str>, reason: impl Into<String>) -> Self {
        Self::UnsupportedStructure {
            field: field.map(str::to_owned),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_kind(field: Option<&str>, kind: FieldKind) -> Self {
        Self::unsupported(field, kind.rejection())
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingValue {
            field: field.to_owned(),
        }
    }

    pub(crate) fn conversion(field: &str, value: impl Into<String>, target: &'static str) -> Self {
        Self::DecodeConversion {
            field: field.to_owned(),
            value: value.into(),
            target,
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl serde::ser::Error for FormError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl serde::de::Error for FormError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        Self::missing(field)
    }
}
