//! 解析模块入口。
//!
//! ## 模块目标（Why）
//! - 将 multipart 字节流还原为 [`FormData`]，保持 Part 顺序与同名重复；
//! - 提供 boundary 嗅探能力，供随机 boundary 场景在解码端恢复令牌。
//!
//! ## 解析流程（How）
//! 1. 定位首个 `--<boundary>`（允许前导 preamble）；
//! 2. 每个分隔行之后读取 header 区直到空行，再读取 body 直到下一个 `<sep>--<boundary>`；
//! 3. 遇到 `--<boundary>--` 结束，其后的 epilogue 被忽略。

mod headers;

use headers::parse_headers;

use bytes::Bytes;

use crate::boundary::Boundary;
use crate::charset::StringCodec;
use crate::codec::WireOptions;
use crate::error::MultipartParseError;
use crate::form::FormData;
use crate::types::{CONTENT_DISPOSITION, Part};

/// 按给定 boundary 解析完整报文。
pub fn parse_form(
    input: &[u8],
    boundary: &Boundary,
    codec: &dyn StringCodec,
    options: &WireOptions,
) -> Result<FormData, MultipartParseError> {
    let separator = options.line_separator.as_bytes();
    let delimiter = boundary.delimiter().into_bytes();

    let Some(first) = find_first_delimiter(input, &delimiter, separator) else {
        if options.check_boundary {
            return Err(MultipartParseError::MissingBoundary {
                boundary: boundary.as_str().to_owned(),
            });
        }
        return Ok(FormData::new());
    };

    let mut body_delimiter = Vec::with_capacity(separator.len() + delimiter.len());
    body_delimiter.extend_from_slice(separator);
    body_delimiter.extend_from_slice(&delimiter);

    let mut entries = Vec::new();
    let mut cursor = first + delimiter.len();
    let mut closed = false;

    while cursor < input.len() {
        let rest = &input[cursor..];
        if rest.starts_with(b"--") {
            closed = true;
            break;
        }

        let padding = rest
            .iter()
            .take_while(|&&byte| matches!(byte, b' ' | b'\t'))
            .count();
        let rest = &rest[padding..];
        if !rest.starts_with(separator) {
            return Err(MultipartParseError::UnexpectedEof {
                context: "delimiter line",
            });
        }
        cursor += padding + separator.len();

        let (header_block, body_start) = split_header_block(input, cursor, separator)?;
        let headers = parse_headers(&codec.decode(header_block), &options.line_separator)?;

        let body_len = find_subslice(&input[body_start..], &body_delimiter).ok_or(
            MultipartParseError::UnexpectedEof {
                context: "part body",
            },
        )?;
        let body = Bytes::copy_from_slice(&input[body_start..body_start + body_len]);
        cursor = body_start + body_len + body_delimiter.len();

        let index = entries.len();
        let name = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|entry| entry.attribute("name"))
            .map(str::to_owned)
            .ok_or(MultipartParseError::MissingPartName { index })?;
        entries.push((name, Part { headers, body }));
    }

    if !closed && options.require_close_delimiter {
        return Err(MultipartParseError::MissingCloseDelimiter {
            boundary: boundary.as_str().to_owned(),
        });
    }

    Ok(entries.into_iter().collect())
}

/// 从首个分隔行中恢复 boundary 令牌。
pub fn sniff_boundary(
    input: &[u8],
    codec: &dyn StringCodec,
    options: &WireOptions,
) -> Result<Boundary, MultipartParseError> {
    let separator = options.line_separator.as_bytes();
    let mut offset = 0usize;
    while offset < input.len() {
        let line_end = find_subslice(&input[offset..], separator)
            .map_or(input.len(), |relative| offset + relative);
        let line = &input[offset..line_end];
        if let Some(token) = line.strip_prefix(b"--") {
            let mut token = codec.decode(token);
            let trimmed_len = token.trim_end_matches(['\r', ' ', '\t']).len();
            token.truncate(trimmed_len);
            let remainder = input.get(line_end + separator.len()..).unwrap_or_default();
            if remainder.iter().all(u8::is_ascii_whitespace)
                && let Some(stripped) = token.strip_suffix("--")
            {
                let stripped_len = stripped.len();
                token.truncate(stripped_len);
            }
            return Boundary::new(token);
        }
        offset = line_end + separator.len();
    }
    Err(MultipartParseError::MissingBoundary {
        boundary: String::new(),
    })
}

fn find_first_delimiter(input: &[u8], delimiter: &[u8], separator: &[u8]) -> Option<usize> {
    if input.starts_with(delimiter) {
        return Some(0);
    }
    let mut needle = Vec::with_capacity(separator.len() + delimiter.len());
    needle.extend_from_slice(separator);
    needle.extend_from_slice(delimiter);
    find_subslice(input, &needle).map(|position| position + separator.len())
}

/// 返回 header 区原始字节与 body 起始下标。
fn split_header_block<'a>(
    input: &'a [u8],
    start: usize,
    separator: &[u8],
) -> Result<(&'a [u8], usize), MultipartParseError> {
    let rest = &input[start..];
    if rest.starts_with(separator) {
        return Ok((&[], start + separator.len()));
    }

    let mut blank_line = Vec::with_capacity(separator.len() * 2);
    blank_line.extend_from_slice(separator);
    blank_line.extend_from_slice(separator);
    let end = find_subslice(rest, &blank_line).ok_or(MultipartParseError::UnexpectedEof {
        context: "part headers",
    })?;
    Ok((&rest[..end], start + end + blank_line.len()))
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
