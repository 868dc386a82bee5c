//! Part 存储：遍历期可追加的 [`FormDataBuilder`] 与冻结后的 [`FormData`]。
//!
//! ## 模块目标（Why）
//! - 绑定层在遍历字段时可能需要修改“尚未创建”的 Part（动态 header 指向后声明的字段），
//!   因此构建器除了追加 Part，还维护一条延迟编辑队列；
//! - 队列在 [`FormDataBuilder::build`] 中只执行一次，执行完毕后存储被冻结。
//!
//! ## 契约说明（What）
//! - 同名 Part 按插入顺序保留，用于表示列表字段；
//! - 延迟编辑按入队顺序执行，目标不存在时为空操作（记录 `debug` 日志）；
//! - [`FormData`] 不提供任何可变 API。

use crate::types::Part;

/// 对单个 Part 的编辑闭包。
type PartEdit = Box<dyn FnMut(&mut Part) + Send>;

/// 延迟编辑命中哪些同名 Part。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSelector {
    /// 所有名称匹配的 Part。
    All,
    /// 名称匹配的第 `n` 个 Part（从 0 开始）。
    Nth(usize),
}

struct DeferredEdit {
    target: String,
    selector: EditSelector,
    edit: PartEdit,
}

/// 冻结后的 Part 存储。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, Part)>,
}

impl FormData {
    /// 空存储。
    pub fn new() -> Self {
        Self::default()
    }

    /// Part 总数（同名 Part 分别计数）。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否不含任何 Part。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按插入顺序遍历 `(name, part)`。
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Part)> {
        self.entries.iter().map(|(name, part)| (name.as_str(), part))
    }

    /// 按插入顺序遍历名称为 `name` 的所有 Part。
    pub fn parts<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Part> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, part)| part)
    }

    /// 名称为 `name` 的第一个 Part。
    pub fn first(&self, name: &str) -> Option<&Part> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, part)| part)
    }

    /// 去重后的名称，按首次出现顺序排列。
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in &self.entries {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// 按名称分组的视图：组间按首次出现排序，组内保持插入顺序。
    pub fn grouped(&self) -> Vec<(&str, Vec<&Part>)> {
        self.names()
            .into_iter()
            .map(|name| (name, self.parts(name).collect()))
            .collect()
    }

    /// 取出内部条目。
    pub fn into_entries(self) -> Vec<(String, Part)> {
        self.entries
    }
}

impl FromIterator<(String, Part)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, Part)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// 遍历期的 Part 存储构建器。
///
/// # 教案式说明
/// - **意图 (Why)**：字段可以为“别的字段”的 Part 写 header，而目标 Part 可能在它之后才创建；
///   用 `(目标名称, 编辑闭包)` 排队，避免持有对具体 Part 的前向引用。
/// - **契约 (What)**：构建器随一次编码调用创建，遍历期只追加；[`build`](Self::build) 消费自身、
///   执行全部延迟编辑并返回冻结的 [`FormData`]，因此队列不可能被执行两次。
/// - **执行 (How)**：`build` 按入队顺序逐条在同名 Part 上调用闭包。
#[derive(Default)]
pub struct FormDataBuilder {
    entries: Vec<(String, Part)>,
    deferred: Vec<DeferredEdit>,
}

impl FormDataBuilder {
    /// 创建空构建器。
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个 Part。
    pub fn add(&mut self, name: impl Into<String>, part: Part) -> &mut Self {
        self.entries.push((name.into(), part));
        self
    }

    /// 立即编辑所有名称为 `name` 的 Part，返回命中数量。
    pub fn edit<F>(&mut self, name: &str, selector: EditSelector, mut edit: F) -> usize
    where
        F: FnMut(&mut Part),
    {
        let mut matched = 0usize;
        for (index, part) in self
            .entries
            .iter_mut()
            .filter(|(key, _)| key == name)
            .map(|(_, part)| part)
            .enumerate()
        {
            if selector_accepts(selector, index) {
                edit(part);
                matched += 1;
            }
        }
        matched
    }

    /// 排队一个延迟编辑，在 [`build`](Self::build) 时执行。
    pub fn defer_edit<F>(&mut self, target: impl Into<String>, selector: EditSelector, edit: F)
    where
        F: FnMut(&mut Part) + Send + 'static,
    {
        self.deferred.push(DeferredEdit {
            target: target.into(),
            selector,
            edit: Box::new(edit),
        });
    }

    /// 当前已追加的 Part 数量。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否尚未追加任何 Part。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 尚未执行的延迟编辑数量。
    pub fn pending_edits(&self) -> usize {
        self.deferred.len()
    }

    /// 执行全部延迟编辑并冻结存储。
    pub fn build(mut self) -> FormData {
        let deferred = std::mem::take(&mut self.deferred);
        for DeferredEdit {
            target,
            selector,
            mut edit,
        } in deferred
        {
            let matched = self.edit(&target, selector, &mut edit);
            if matched == 0 {
                tracing::debug!(
                    target_part = %target,
                    ?selector,
                    "deferred header edit matched no part"
                );
            }
        }
        FormData {
            entries: self.entries,
        }
    }
}

fn selector_accepts(selector: EditSelector, index: usize) -> bool {
    match selector {
        EditSelector::All => true,
        EditSelector::Nth(wanted) => wanted == index,
    }
}
