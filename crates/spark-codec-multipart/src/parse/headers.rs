//! header 区解析。
//!
//! ## 设计思路（How）
//! 1. 逐行扫描 header 区，以空白开头的行视为上一行的折行延续；
//! 2. 每个逻辑行按首个冒号拆分名称与值；
//! 3. 值按 `value; attr=val; attr="quoted"` 拆成普通值与属性，引号内的 `;` 不作为分隔符。

use crate::error::MultipartParseError;
use crate::types::{HeaderEntry, HeaderMap};

/// 解析已解码为文本的 header 区（不含结尾空行）。
pub(crate) fn parse_headers(
    block: &str,
    line_separator: &str,
) -> Result<HeaderMap, MultipartParseError> {
    let mut headers = HeaderMap::new();
    if block.is_empty() {
        return Ok(headers);
    }

    let mut logical: Vec<String> = Vec::new();
    for raw in block.split(line_separator) {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }
        if line.starts_with([' ', '\t']) {
            match logical.last_mut() {
                Some(previous) => {
                    previous.push(' ');
                    previous.push_str(line.trim_start());
                }
                None => {
                    return Err(MultipartParseError::InvalidHeaderLine {
                        line: line.to_owned(),
                    });
                }
            }
            continue;
        }
        logical.push(line.to_owned());
    }

    for line in logical {
        let colon = line
            .find(':')
            .ok_or_else(|| MultipartParseError::InvalidHeaderLine { line: line.clone() })?;
        let name = line[..colon].trim();
        if name.is_empty() {
            return Err(MultipartParseError::InvalidHeaderLine { line: line.clone() });
        }
        headers.insert(name, parse_header_value(&line[colon + 1..]));
    }

    Ok(headers)
}

/// 将 header 值拆成普通值与属性。
pub(crate) fn parse_header_value(input: &str) -> HeaderEntry {
    let mut cursor = Cursor::new(input);
    let mut entry = HeaderEntry::default();

    cursor.skip_whitespace();
    let value = if cursor.peek() == Some('"') {
        let quoted = cursor.take_quoted();
        cursor.take_until_separator();
        Some(quoted)
    } else {
        let raw = cursor.take_until_separator();
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    };
    if let Some(value) = value {
        entry.set_value(value);
    }

    while cursor.eat(';') {
        cursor.skip_whitespace();
        let name = cursor.take_while(|ch| ch != '=' && ch != ';').trim().to_owned();
        let value = if cursor.eat('=') {
            cursor.skip_whitespace();
            if cursor.peek() == Some('"') {
                let quoted = cursor.take_quoted();
                cursor.take_until_separator();
                quoted
            } else {
                cursor.take_until_separator().trim().to_owned()
            }
        } else {
            String::new()
        };
        if !name.is_empty() {
            entry.set_attribute(name, value);
        }
    }

    entry
}

struct Cursor<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.offset += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        self.take_while(|ch| ch == ' ' || ch == '\t');
    }

    fn take_while<F>(&mut self, keep: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, ch)| !keep(*ch))
            .map_or(rest.len(), |(index, _)| index);
        self.offset += len;
        &rest[..len]
    }

    fn take_until_separator(&mut self) -> &'a str {
        self.take_while(|ch| ch != ';')
    }

    /// 读取以 `"` 开头的引号串；缺少结尾引号时读到行尾。
    fn take_quoted(&mut self) -> String {
        self.eat('"');
        let mut value = String::new();
        let mut chars = self.rest().char_indices();
        let mut consumed = self.rest().len();
        while let Some((index, ch)) = chars.next() {
            match ch {
                '"' => {
                    consumed = index + 1;
                    break;
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                other => value.push(other),
            }
        }
        self.offset += consumed;
        value
    }
}
