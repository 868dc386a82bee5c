//! header 指令的声明与解析。
//!
//! ## 模块目标（Why）
//! - serde 在运行期不携带字段注解，因此 header 指令以 [`FormSchema`] 值的形式声明，
//!   类型通过 [`DescribeForm`] 提供自己的 schema；
//! - 静态指令在字段自己的 Part 上写入固定 header；动态指令把字段值写到**另一个**具名 Part 的 header 上。
//!
//! ## 解析顺序（What）
//! - 类型级指令先于字段级指令；
//! - 同一层级内，分组声明（`*_headers([...])`）先于单独声明，各自保持声明顺序。

use spark_codec_multipart::Part;

/// 静态 header 指令：在字段自身的 Part 上写入固定值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHeader {
    /// header 名称。
    pub header_name: String,
    /// 写入的值。
    pub value: String,
    /// 设置时写入该属性，而不改动 header 的普通值。
    pub attribute: Option<String>,
}

impl StaticHeader {
    /// 写入普通值的静态指令。
    pub fn value(header_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
            value: value.into(),
            attribute: None,
        }
    }

    /// 写入属性的静态指令。
    pub fn attribute(
        header_name: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            header_name: header_name.into(),
            value: value.into(),
            attribute: Some(attribute.into()),
        }
    }

    pub(crate) fn apply(&self, part: &mut Part) {
        match &self.attribute {
            Some(attribute) => {
                part.set_header_attribute(&self.header_name, attribute.as_str(), self.value.as_str())
            }
            None => part.set_header_value(&self.header_name, self.value.as_str()),
        }
    }
}

/// 动态 header 指令：把本字段的文本值写到名为 `source_part` 的 Part 上。
///
/// 携带动态指令的字段本身不产生 body Part。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicHeader {
    /// header 名称。
    pub header_name: String,
    /// 目标 Part 的名称。
    pub source_part: String,
    /// 设置时读写该属性，而不是 header 的普通值。
    pub attribute: Option<String>,
}

impl DynamicHeader {
    /// 读写普通值的动态指令。
    pub fn value(header_name: impl Into<String>, source_part: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
            source_part: source_part.into(),
            attribute: None,
        }
    }

    /// 读写属性的动态指令。
    pub fn attribute(
        header_name: impl Into<String>,
        source_part: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            header_name: header_name.into(),
            source_part: source_part.into(),
            attribute: Some(attribute.into()),
        }
    }

    pub(crate) fn apply(&self, part: &mut Part, text: &str) {
        match &self.attribute {
            Some(attribute) => part.set_header_attribute(&self.header_name, attribute.as_str(), text),
            None => part.set_header_value(&self.header_name, text),
        }
    }

    pub(crate) fn extract(&self, part: &Part) -> Option<String> {
        let entry = part.headers.get(&self.header_name)?;
        let found = match &self.attribute {
            Some(attribute) => entry.attribute(attribute),
            None => entry.value(),
        };
        found.map(str::to_owned)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DirectiveSet {
    grouped_statics: Vec<StaticHeader>,
    statics: Vec<StaticHeader>,
    grouped_dynamics: Vec<DynamicHeader>,
    dynamics: Vec<DynamicHeader>,
}

impl DirectiveSet {
    fn collect_into<'a>(&'a self, resolved: &mut ResolvedDirectives<'a>) {
        resolved
            .statics
            .extend(self.grouped_statics.iter().chain(&self.statics));
        resolved
            .dynamics
            .extend(self.grouped_dynamics.iter().chain(&self.dynamics));
    }

    fn append(&mut self, other: DirectiveSet) {
        self.grouped_statics.extend(other.grouped_statics);
        self.statics.extend(other.statics);
        self.grouped_dynamics.extend(other.grouped_dynamics);
        self.dynamics.extend(other.dynamics);
    }
}

/// 单个字段上的指令声明，由 [`FormSchema::field`] 的闭包填写。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDirectives {
    set: DirectiveSet,
}

impl FieldDirectives {
    /// 单独声明一条静态指令。
    #[must_use]
    pub fn static_header(mut self, header: StaticHeader) -> Self {
        self.set.statics.push(header);
        self
    }

    /// 以分组形式声明多条静态指令。
    #[must_use]
    pub fn static_headers(mut self, headers: impl IntoIterator<Item = StaticHeader>) -> Self {
        self.set.grouped_statics.extend(headers);
        self
    }

    /// 单独声明一条动态指令。
    #[must_use]
    pub fn dynamic_header(mut self, header: DynamicHeader) -> Self {
        self.set.dynamics.push(header);
        self
    }

    /// 以分组形式声明多条动态指令。
    #[must_use]
    pub fn dynamic_headers(mut self, headers: impl IntoIterator<Item = DynamicHeader>) -> Self {
        self.set.grouped_dynamics.extend(headers);
        self
    }
}

/// 一个类型的全部 header 指令。
///
/// # 教案式说明
/// - **意图 (Why)**：替代字段注解，把“哪个字段写哪个 header”集中在一个不可变值里，
///   编码与解码共用同一份声明，保证两个方向对称。
/// - **契约 (What)**：
///   - 类型级指令作用于该类型的每个字段；
///   - 对同一字段多次调用 [`field`](Self::field) 会追加而非覆盖；
///   - [`resolve`](Self::resolve) 不会失败，没有指令时返回空集合。
/// - **执行 (How)**：以链式构建器声明，例如：
///
/// ```
/// use spark_multipart_form::{DynamicHeader, FormSchema, StaticHeader};
///
/// let schema = FormSchema::new()
///     .field("file", |f| f.static_header(StaticHeader::value("Content-Type", "text/plain")))
///     .field("mime", |f| f.dynamic_header(DynamicHeader::value("Content-Type", "file")));
/// assert_eq!(schema.resolve("mime").dynamics.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    type_level: DirectiveSet,
    fields: Vec<(String, DirectiveSet)>,
}

impl FormSchema {
    /// 空 schema。
    pub fn new() -> Self {
        Self::default()
    }

    /// 类型级：单独声明一条静态指令。
    #[must_use]
    pub fn static_header(mut self, header: StaticHeader) -> Self {
        self.type_level.statics.push(header);
        self
    }

    /// 类型级：以分组形式声明多条静态指令。
    #[must_use]
    pub fn static_headers(mut self, headers: impl IntoIterator<Item = StaticHeader>) -> Self {
        self.type_level.grouped_statics.extend(headers);
        self
    }

    /// 类型级：单独声明一条动态指令。
    #[must_use]
    pub fn dynamic_header(mut self, header: DynamicHeader) -> Self {
        self.type_level.dynamics.push(header);
        self
    }

    /// 类型级：以分组形式声明多条动态指令。
    #[must_use]
    pub fn dynamic_headers(mut self, headers: impl IntoIterator<Item = DynamicHeader>) -> Self {
        self.type_level.grouped_dynamics.extend(headers);
        self
    }

    /// 为字段 `name` 声明指令。
    #[must_use]
    pub fn field<F>(mut self, name: impl Into<String>, declare: F) -> Self
    where
        F: FnOnce(FieldDirectives) -> FieldDirectives,
    {
        let name = name.into();
        let declared = declare(FieldDirectives::default()).set;
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, existing)) => existing.append(declared),
            None => self.fields.push((name, declared)),
        }
        self
    }

    /// 合并类型级与字段级指令。
    pub fn resolve(&self, field: &str) -> ResolvedDirectives<'_> {
        let mut resolved = ResolvedDirectives::default();
        self.type_level.collect_into(&mut resolved);
        if let Some((_, set)) = self.fields.iter().find(|(name, _)| name == field) {
            set.collect_into(&mut resolved);
        }
        resolved
    }
}

/// 某个字段最终生效的指令，按应用顺序排列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDirectives<'a> {
    /// 静态指令。
    pub statics: Vec<&'a StaticHeader>,
    /// 动态指令。
    pub dynamics: Vec<&'a DynamicHeader>,
}

impl ResolvedDirectives<'_> {
    /// 是否没有任何指令。
    pub fn is_empty(&self) -> bool {
        self.statics.is_empty() && self.dynamics.is_empty()
    }
}

/// 为类型提供 header 指令。
///
/// 不需要 header 的类型只需写 `impl DescribeForm for T {}`。
pub trait DescribeForm {
    /// 该类型的 schema。
    fn form_schema() -> FormSchema {
        FormSchema::default()
    }
}
