//! 线格式编解码门面。

use std::sync::Arc;

use bytes::Bytes;

use crate::boundary::Boundary;
use crate::charset::{StringCodec, Utf8Codec};
use crate::error::MultipartParseError;
use crate::fmt::write_form;
use crate::form::FormData;
use crate::parse::{parse_form, sniff_boundary};

/// 线格式选项。
///
/// # 教案式说明
/// - **意图 (Why)**：不同对端对行分隔符与结尾分隔行的要求不同，选项集中在一处便于由上层配置透传。
/// - **契约 (What)**：
///   - `line_separator`：写出与解析时使用的行分隔符，默认 `"\n"`；
///   - `require_close_delimiter`：解析时缺少 `--<boundary>--` 是否视为错误；
///   - `check_boundary`：解析时找不到首个分隔行是否视为错误，关闭后返回空表单。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireOptions {
    /// 行分隔符。
    pub line_separator: String,
    /// 是否要求结尾分隔行。
    pub require_close_delimiter: bool,
    /// 是否校验首个分隔行存在。
    pub check_boundary: bool,
}

impl Default for WireOptions {
    fn default() -> Self {
        Self {
            line_separator: "\n".to_owned(),
            require_close_delimiter: true,
            check_boundary: true,
        }
    }
}

/// multipart 编解码器。
///
/// # 教案式说明
/// - **意图 (Why)**：把 `fmt`/`parse` 两个方向与字符串编码组合成一个可克隆、可跨线程共享的对象。
/// - **契约 (What)**：`encode` 不会失败；`decode` 在报文结构不合法时返回 [`MultipartParseError`]。
///   编码后再以同一 boundary 解码，得到名称、顺序、header 与 body 均相同的 [`FormData`]
///   （前提是 body 中不出现 `<sep>--<boundary>`）。
/// - **执行 (How)**：内部仅持有只读选项与 `Arc<dyn StringCodec>`，无可变状态。
#[derive(Debug, Clone)]
pub struct MultipartCodec {
    options: WireOptions,
    strings: Arc<dyn StringCodec>,
}

impl MultipartCodec {
    /// 以给定选项与字符串编码创建编解码器。
    pub fn new(options: WireOptions, strings: Arc<dyn StringCodec>) -> Self {
        Self { options, strings }
    }

    /// 当前线格式选项。
    pub fn options(&self) -> &WireOptions {
        &self.options
    }

    /// 当前字符串编码。
    pub fn string_codec(&self) -> &Arc<dyn StringCodec> {
        &self.strings
    }

    /// 将表单写成 multipart 字节流。
    pub fn encode(&self, boundary: &Boundary, form: &FormData) -> Bytes {
        let capacity = form
            .iter()
            .map(|(name, part)| name.len() + part.body.len() + 64)
            .sum::<usize>()
            + boundary.as_str().len()
            + 8;
        let mut out = Vec::with_capacity(capacity);
        write_form(
            &mut out,
            boundary,
            form,
            self.strings.as_ref(),
            &self.options.line_separator,
        );
        tracing::debug!(
            boundary = %boundary,
            parts = form.len(),
            bytes = out.len(),
            charset = self.strings.charset(),
            "encoded multipart form"
        );
        Bytes::from(out)
    }

    /// 按给定 boundary 解析字节流。
    pub fn decode(&self, boundary: &Boundary, input: &[u8]) -> Result<FormData, MultipartParseError> {
        let result = parse_form(input, boundary, self.strings.as_ref(), &self.options);
        match &result {
            Ok(form) => tracing::debug!(
                boundary = %boundary,
                parts = form.len(),
                bytes = input.len(),
                "decoded multipart form"
            ),
            Err(error) => tracing::debug!(
                boundary = %boundary,
                bytes = input.len(),
                %error,
                "failed to decode multipart form"
            ),
        }
        result
    }

    /// 从报文首个分隔行恢复 boundary。
    pub fn sniff_boundary(&self, input: &[u8]) -> Result<Boundary, MultipartParseError> {
        sniff_boundary(input, self.strings.as_ref(), &self.options)
    }
}

impl Default for MultipartCodec {
    fn default() -> Self {
        Self::new(WireOptions::default(), Arc::new(Utf8Codec))
    }
}
