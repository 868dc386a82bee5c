//! 面向调用方的编解码门面。

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use spark_codec_multipart::{Boundary, FormData, MultipartCodec};

use crate::config::{BoundaryStrategy, MultipartFormConfig};
use crate::de::from_form_data;
use crate::directive::{DescribeForm, FormSchema};
use crate::error::FormError;
use crate::ser::to_form_data;

/// 一次编码的产物：报文字节与其使用的 boundary。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedForm {
    /// 本次编码使用的 boundary。
    pub boundary: Boundary,
    /// `multipart/form-data` 报文。
    pub body: Bytes,
}

impl EncodedForm {
    /// 供 HTTP 层使用的 `Content-Type` 值。
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary.as_str())
    }
}

/// 类型化值与 `multipart/form-data` 报文之间的双向绑定。
///
/// # 教案式说明
/// - **意图 (Why)**：调用方只面对自己的结构体与字节，不接触 Part 存储与线格式细节。
/// - **契约 (What)**：
///   - `encode`：值 → [`FormData`] → 字节，boundary 按配置策略选取；
///   - `decode`：字节 → [`FormData`] → 值；`Random` 策略下从报文首个分隔行嗅探 boundary；
///   - 带 `_with_schema` 后缀的方法接受显式 [`FormSchema`]，其余方法取 [`DescribeForm::form_schema`]。
/// - **执行 (How)**：`to_form_data`/`from_form_data` 完成 serde 绑定，[`MultipartCodec`] 负责线格式；
///   每次调用都处于 `multipart.encode`/`multipart.decode` span 内。
/// - **风险提示 (Trade-offs)**：实例不可变，可跨线程共享；没有任何进程级状态。
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    config: MultipartFormConfig,
    codec: MultipartCodec,
}

impl MultipartForm {
    /// 以给定配置创建门面。
    pub fn new(config: MultipartFormConfig) -> Self {
        let codec = config.wire_codec();
        Self { config, codec }
    }

    /// 当前配置。
    pub fn config(&self) -> &MultipartFormConfig {
        &self.config
    }

    /// 以类型自带的 schema 编码。
    pub fn encode<T>(&self, value: &T) -> Result<EncodedForm, FormError>
    where
        T: Serialize + DescribeForm,
    {
        self.encode_with_schema(value, &T::form_schema())
    }

    /// 以显式 schema 编码。
    pub fn encode_with_schema<T>(
        &self,
        value: &T,
        schema: &FormSchema,
    ) -> Result<EncodedForm, FormError>
    where
        T: ?Sized + Serialize,
    {
        let _span = tracing::debug_span!(
            "multipart.encode",
            ty = core::any::type_name::<T>(),
            charset = self.config.string_codec().charset(),
        )
        .entered();
        let form = self.to_form_data(value, schema)?;
        let boundary = self.config.boundary_strategy().next_boundary();
        let body = self.codec.encode(&boundary, &form);
        Ok(EncodedForm { boundary, body })
    }

    /// 以类型自带的 schema 解码。
    pub fn decode<T>(&self, input: &[u8]) -> Result<T, FormError>
    where
        T: DeserializeOwned + DescribeForm,
    {
        self.decode_with_schema(input, &T::form_schema())
    }

    /// 以显式 schema 解码，boundary 按配置策略确定。
    pub fn decode_with_schema<T>(&self, input: &[u8], schema: &FormSchema) -> Result<T, FormError>
    where
        T: DeserializeOwned,
    {
        let boundary = match self.config.boundary_strategy() {
            BoundaryStrategy::Fixed(boundary) => boundary.clone(),
            BoundaryStrategy::Random { .. } => self.codec.sniff_boundary(input)?,
        };
        self.decode_with_boundary(input, &boundary, schema)
    }

    /// 以调用方给定的 boundary 解码（通常取自请求的 `Content-Type`）。
    pub fn decode_with_boundary<T>(
        &self,
        input: &[u8],
        boundary: &Boundary,
        schema: &FormSchema,
    ) -> Result<T, FormError>
    where
        T: DeserializeOwned,
    {
        let _span = tracing::debug_span!(
            "multipart.decode",
            ty = core::any::type_name::<T>(),
            boundary = boundary.as_str(),
        )
        .entered();
        let form = self.codec.decode(boundary, input)?;
        self.from_form_data(&form, schema)
    }

    /// 只做绑定，不写线格式。
    pub fn to_form_data<T>(&self, value: &T, schema: &FormSchema) -> Result<FormData, FormError>
    where
        T: ?Sized + Serialize,
    {
        to_form_data(value, schema, self.config.string_codec().as_ref())
    }

    /// 从已有的 Part 存储解码。
    pub fn from_form_data<T>(&self, form: &FormData, schema: &FormSchema) -> Result<T, FormError>
    where
        T: DeserializeOwned,
    {
        from_form_data(form, schema, self.config.string_codec().as_ref())
    }
}
