#![warn(missing_docs)]

//! # spark-multipart-form
//!
//! ## 教案目的（Why）
//! - **定位**：把扁平的类型化值（结构体字段为标量、包装类型或标量列表）绑定到
//!   `multipart/form-data` 的具名 Part 上，并能反向恢复。
//! - **架构角色**：位于 serde 与 `spark-codec-multipart` 之间；serde 负责字段枚举，
//!   本 crate 决定每个字段落在 body、header 值还是 header 属性上，线格式交给下层编解码器。
//!
//! ## 交互契约（What）
//! - **字段映射**：
//!   - 普通字段 → 与字段同名的 Part，body 为规范文本（或原始字节）；
//!   - 列表字段 → 同名的多个 Part，顺序与元素顺序一致，`None` 元素跳过；
//!   - 带动态 header 指令的字段 → 不产生 Part，值写到目标 Part 的 header（值或属性）上；
//!   - 静态 header 指令 → 在标量字段自己的 Part 上写入固定 header，列表元素 Part 不受影响。
//! - **扁平约束**：嵌套结构体、映射、列表套列表、列表套对象一律以
//!   [`FormError::UnsupportedStructure`] 拒绝；根必须是结构体。
//! - **后置条件**：失败时不产生任何部分输出。
//!
//! ## 实现策略（How）
//! - `directive`：[`FormSchema`]/[`DescribeForm`] 声明 header 指令并按固定顺序解析；
//! - `ser`：`Serializer` 实现，动态指令排入 [`FormDataBuilder`] 的延迟编辑队列，
//!   在全部字段遍历结束后统一执行，因此字段声明顺序不影响结果；
//! - `de`：`Deserializer` 实现，动态字段取第一个非空指令的 header 结果；
//! - `config` / `form`：不可变配置与编解码门面 [`MultipartForm`]。
//!
//! ## 风险提示（Trade-offs）
//! - 动态字段在解码时不会回退到同名 body；
//! - `Vec<u8>` 被视为 `u8` 列表，原始字节字段请使用 `bytes::Bytes`。

pub mod config;
mod de;
pub mod directive;
pub mod error;
pub mod form;
pub mod kind;
mod leaf;
mod ser;

pub use crate::config::{
    BoundaryStrategy, Charset, MultipartFormConfig, MultipartFormConfigBuilder,
    MultipartFormSettings,
};
pub use crate::de::from_form_data;
pub use crate::directive::{
    DescribeForm, DynamicHeader, FieldDirectives, FormSchema, ResolvedDirectives, StaticHeader,
};
pub use crate::error::FormError;
pub use crate::form::{EncodedForm, MultipartForm};
pub use crate::kind::{FieldDescriptor, FieldKind, ScalarKind};
pub use crate::ser::to_form_data;
pub use spark_codec_multipart::{
    Boundary, FormData, FormDataBuilder, HeaderEntry, HeaderMap, Latin1Codec, Part, StringCodec,
    Utf8Codec, WireOptions,
};

/// 本 crate 的统一结果别名。
pub type Result<T, E = FormError> = core::result::Result<T, E>;
