//! header 行格式化。
//!
//! 输出形如 `Name: value; attr="v"`：
//! - 普通值为空或包含 `;`、`"`、首尾空白、换行时写为带引号的字符串；
//! - 缺失普通值（`None`）时写出空的值段，即 `Name: ; attr="v"`；
//! - 属性值总是加引号，`"` 与 `\` 以反斜杠转义，CR/LF 写为 `\r`/`\n`。

use crate::charset::StringCodec;
use crate::types::{HeaderEntry, HeaderMap};

/// 写出单个 header 行（含行分隔符）。
pub fn write_header(
    out: &mut Vec<u8>,
    name: &str,
    entry: &HeaderEntry,
    codec: &dyn StringCodec,
    line_separator: &str,
) {
    let mut line = String::with_capacity(name.len() + 16);
    line.push_str(name);
    line.push(':');

    match entry.value() {
        Some(value) if needs_quoting(value) => {
            line.push(' ');
            push_quoted(&mut line, value);
        }
        Some(value) => {
            line.push(' ');
            line.push_str(value);
        }
        None => {}
    }

    let mut first_attribute = true;
    for (attribute, value) in entry.attributes() {
        if first_attribute && entry.value().is_none() {
            line.push_str(" ;");
        } else {
            line.push(';');
        }
        first_attribute = false;
        line.push(' ');
        line.push_str(attribute);
        line.push('=');
        push_quoted(&mut line, value);
    }

    out.extend_from_slice(&codec.encode(&line));
    out.extend_from_slice(line_separator.as_bytes());
}

/// 按插入顺序写出全部 header。
pub fn write_headers(
    out: &mut Vec<u8>,
    headers: &HeaderMap,
    codec: &dyn StringCodec,
    line_separator: &str,
) {
    for (name, entry) in headers.iter() {
        write_header(out, name, entry, codec, line_separator);
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with([' ', '\t'])
        || value.ends_with([' ', '\t'])
        || value.contains([';', '"', '\r', '\n'])
}

fn push_quoted(line: &mut String, value: &str) {
    line.push('"');
    for ch in value.chars() {
        match ch {
            '"' => line.push_str("\\\""),
            '\\' => line.push_str("\\\\"),
            '\r' => line.push_str("\\r"),
            '\n' => line.push_str("\\n"),
            other => line.push(other),
        }
    }
    line.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Utf8Codec;

    fn render(name: &str, entry: &HeaderEntry) -> String {
        let mut out = Vec::new();
        write_header(&mut out, name, entry, &Utf8Codec, "\n");
        String::from_utf8(out).expect("输出应为 UTF-8")
    }

    #[test]
    fn plain_value_with_attributes() {
        let mut entry = HeaderEntry::with_value("form-data");
        entry.set_attribute("name", "field");
        entry.set_attribute("filename", "a \"b\".txt");
        assert_eq!(
            render("Content-Disposition", &entry),
            "Content-Disposition: form-data; name=\"field\"; filename=\"a \\\"b\\\".txt\"\n"
        );
    }

    #[test]
    fn attribute_only_header_writes_empty_value_segment() {
        let mut entry = HeaderEntry::default();
        entry.set_attribute("attr", "V");
        assert_eq!(render("Header", &entry), "Header: ; attr=\"V\"\n");
    }

    #[test]
    fn awkward_values_are_quoted() {
        assert_eq!(render("H", &HeaderEntry::with_value("")), "H: \"\"\n");
        assert_eq!(render("H", &HeaderEntry::with_value("a;b")), "H: \"a;b\"\n");
        assert_eq!(render("H", &HeaderEntry::with_value("l1\nl2")), "H: \"l1\\nl2\"\n");
    }
}
