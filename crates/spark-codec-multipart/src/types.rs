//! Part 与 header 的基础数据模型。
//!
//! ## 设计思路（How）
//! - header 与属性均以 `Vec` 保存，保留插入顺序，保证同一输入总是写出相同字节；
//! - 名称比较统一采用 ASCII 大小写不敏感，与 SIP 编解码器处理 header 名称的方式一致；
//! - 写回时沿用首次出现的大小写拼写。

use bytes::Bytes;

/// 承载 Part 名称的 header。
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";

/// 单个 header 的值与属性。
///
/// `value` 为 `None` 表示该 header 只通过属性写入过（例如仅声明了 `attr` 的静态指令）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderEntry {
    value: Option<String>,
    attributes: Vec<(String, String)>,
}

impl HeaderEntry {
    /// 以普通值创建 header。
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            attributes: Vec::new(),
        }
    }

    /// 普通值。
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// 覆盖普通值，属性保持不变。
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// 按名称查找属性（大小写不敏感）。
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 设置属性：已存在则原位覆盖，否则追加到末尾。
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// 按插入顺序遍历属性。
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// 保序的 header 集合。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, HeaderEntry)>,
}

impl HeaderMap {
    /// 创建空集合。
    pub fn new() -> Self {
        Self::default()
    }

    /// 按名称查找 header。
    pub fn get(&self, name: &str) -> Option<&HeaderEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, entry)| entry)
    }

    /// 取得指定 header 的可变引用，不存在时插入空条目。
    pub fn entry(&mut self, name: &str) -> &mut HeaderEntry {
        let position = self
            .entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name));
        let index = match position {
            Some(index) => index,
            None => {
                self.entries.push((name.to_owned(), HeaderEntry::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// 插入或整体替换 header。
    pub fn insert(&mut self, name: &str, entry: HeaderEntry) {
        *self.entry(name) = entry;
    }

    /// 移除 header 并返回原值。
    pub fn remove(&mut self, name: &str) -> Option<HeaderEntry> {
        let index = self
            .entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    /// 按插入顺序遍历。
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// header 数量。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// multipart 中的一个 Part：header 集合加二进制 body。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    /// header 集合。
    pub headers: HeaderMap,
    /// 原始 body。
    pub body: Bytes,
}

impl Part {
    /// 以 body 创建无 header 的 Part。
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// 设置 header 普通值（属性保留）。
    pub fn set_header_value(&mut self, name: &str, value: impl Into<String>) {
        self.headers.entry(name).set_value(value);
    }

    /// 设置 header 属性（普通值保留）。
    pub fn set_header_attribute(
        &mut self,
        name: &str,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.headers.entry(name).set_attribute(attribute, value);
    }

    /// 构建器风格的 [`Part::set_header_value`]。
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header_value(name, value);
        self
    }

    /// 构建器风格的 [`Part::set_header_attribute`]。
    #[must_use]
    pub fn with_header_attribute(
        mut self,
        name: &str,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set_header_attribute(name, attribute, value);
        self
    }
}
