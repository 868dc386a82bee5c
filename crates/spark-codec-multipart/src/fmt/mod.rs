//! 序列化模块入口。
//!
//! ## 模块目标（Why）
//! - 将冻结的 [`FormData`](crate::form::FormData) 写成 multipart 字节流；
//! - 提供 header 粒度与整体报文粒度的写入函数，方便测试按需组合。
//!
//! ## 结构概览（What）
//! - `headers`：单个 header 行的格式化与转义；
//! - `message`：分隔行、`Content-Disposition` 归一化与 body 拼接。

mod headers;
mod message;

pub use headers::{write_header, write_headers};
pub use message::write_form;
