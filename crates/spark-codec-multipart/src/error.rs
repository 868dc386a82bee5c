//! 错误类型模块。
//!
//! ## 模块目的（Why）
//! - 将线格式解析与 boundary 校验阶段的失败分门别类，便于调用方通过模式匹配定位问题。
//! - 错误枚举不持有输入缓冲的引用，可在日志中安全复制。

use thiserror::Error;

/// multipart 线格式解析阶段可能出现的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MultipartParseError {
    /// 报文中找不到 `--<boundary>` 分隔行。
    #[error("boundary delimiter `--{boundary}` not found in payload")]
    MissingBoundary {
        /// 期望的 boundary 令牌。
        boundary: String,
    },
    /// 在 header 区或 body 区结束前遇到 EOF。
    #[error("payload ended unexpectedly while reading {context}")]
    UnexpectedEof {
        /// 发生截断时所处的解析阶段。
        context: &'static str,
    },
    /// 报文缺少结尾的 `--<boundary>--` 行。
    #[error("closing delimiter `--{boundary}--` is missing")]
    MissingCloseDelimiter {
        /// 期望的 boundary 令牌。
        boundary: String,
    },
    /// header 行缺少冒号或名称为空。
    #[error("invalid header line `{line}`")]
    InvalidHeaderLine {
        /// 出错的原始行（已按字符串编码解码）。
        line: String,
    },
    /// Part 的 `Content-Disposition` 缺少 `name` 属性。
    #[error("part #{index} has no `Content-Disposition` name")]
    MissingPartName {
        /// Part 在报文中的序号（从 0 开始）。
        index: usize,
    },
    /// boundary 令牌不满足 RFC 2046 的字符集或长度约束。
    #[error("invalid boundary `{boundary}`: {reason}")]
    InvalidBoundary {
        /// 被拒绝的令牌。
        boundary: String,
        /// 拒绝原因。
        reason: &'static str,
    },
}
