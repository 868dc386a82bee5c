#![warn(missing_docs)]

//! # spark-codec-multipart
//!
//! ## 教案目的（Why）
//! - **定位**：该 crate 负责 `multipart/form-data` 报文的 Part 存储模型与线格式编解码，
//!   是 `spark-multipart-form` 绑定层向下依赖的唯一物理层。
//! - **架构角色**：向上提供按名称索引、允许重名的 [`FormData`]；向下把它写成以 boundary
//!   分隔的字节流，或从字节流恢复。
//!
//! ## 交互契约（What）
//! - **输入前提**：调用方提供合法的 [`Boundary`]；header 名称按 ASCII 大小写不敏感比较。
//! - **输出能力**：
//!   - [`FormDataBuilder`] 在遍历期只追加 Part，并排队延迟编辑（deferred edit），
//!     `build` 时一次性执行后冻结为 [`FormData`]；
//!   - [`MultipartCodec`] 负责 `encode(boundary, form)` 与 `decode(boundary, bytes)`。
//! - **后置条件**：`FormData` 没有可变 API，可安全在线程间共享。
//!
//! ## 实现策略（How）
//! - **模块划分**：
//!   1. `types`：`Part`、`HeaderMap`、`HeaderEntry`；
//!   2. `form`：Part 存储、构建器与延迟编辑队列；
//!   3. `boundary` / `charset`：分隔符令牌与字符串 <-> 字节编码；
//!   4. `parse` / `fmt`：线格式解析与输出，沿用 SIP 编解码器的 header 处理手法；
//!   5. `codec`：组合以上模块的门面类型。
//!
//! ## 风险提示（Trade-offs）
//! - body 中若恰好包含 `<sep>--<boundary>` 序列会被误判为分隔符；随机 boundary 可显著降低概率。
//! - 仅支持一层 multipart，不解析嵌套的 `multipart/mixed`。

pub mod boundary;
pub mod charset;
pub mod codec;
pub mod error;
pub mod fmt;
pub mod form;
pub mod parse;
pub mod types;

pub use crate::boundary::Boundary;
pub use crate::charset::{Latin1Codec, StringCodec, Utf8Codec};
pub use crate::codec::{MultipartCodec, WireOptions};
pub use crate::error::MultipartParseError;
pub use crate::form::{EditSelector, FormData, FormDataBuilder};
pub use crate::types::{CONTENT_DISPOSITION, HeaderEntry, HeaderMap, Part};

/// 本 crate 的统一结果别名。
pub type Result<T, E = MultipartParseError> = core::result::Result<T, E>;
