//! 字段结构种类。
//!
//! 每个字段在遍历时被归类一次，之后所有分派都基于这里的枚举做穷尽匹配。

use core::fmt;

/// 标量的具体种类，决定解析目标与错误信息中的类型名。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `bool`。
    Bool,
    /// `i8`。
    I8,
    /// `i16`。
    I16,
    /// `i32`。
    I32,
    /// `i64`。
    I64,
    /// `i128`。
    I128,
    /// `u8`。
    U8,
    /// `u16`。
    U16,
    /// `u32`。
    U32,
    /// `u64`。
    U64,
    /// `u128`。
    U128,
    /// `f32`。
    F32,
    /// `f64`。
    F64,
    /// `char`。
    Char,
}

impl ScalarKind {
    /// Rust 类型名。
    pub fn type_name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::I128 => "i128",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::U128 => "u128",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Char => "char",
        }
    }
}

/// 字段的结构种类。
///
/// # 教案式说明
/// - **意图 (Why)**：编码器与解码器都按种类分派；用封闭枚举表达，新增种类时编译器会指出所有需要处理的分支。
/// - **契约 (What)**：`Scalar`/`Bytes`/`Text` 映射为单个 Part，`List` 映射为同名 Part 序列；
///   `NamedObject` 仅允许作为折叠为单个标量的包装类型（newtype）出现，`Map` 总是被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 数值、布尔或字符。
    Scalar(ScalarKind),
    /// 原始字节。
    Bytes,
    /// 文本（包括单元枚举变体的名称）。
    Text,
    /// 标量序列。
    List,
    /// 具名对象：结构体、元组结构体或枚举的数据变体。
    NamedObject,
    /// 映射。
    Map,
}

impl FieldKind {
    /// 元素能否出现在列表中。
    pub fn is_leaf(self) -> bool {
        matches!(self, FieldKind::Scalar(_) | FieldKind::Bytes | FieldKind::Text)
    }

    pub(crate) fn rejection(self) -> &'static str {
        match self {
            FieldKind::Map => "map-typed fields are not supported",
            FieldKind::NamedObject => "non-flat structure: nested objects must collapse to a single scalar",
            FieldKind::List => "nested lists are not supported",
            FieldKind::Scalar(_) | FieldKind::Bytes | FieldKind::Text => "unexpected scalar",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(scalar) => f.write_str(scalar.type_name()),
            FieldKind::Bytes => f.write_str("bytes"),
            FieldKind::Text => f.write_str("text"),
            FieldKind::List => f.write_str("list"),
            FieldKind::NamedObject => f.write_str("object"),
            FieldKind::Map => f.write_str("map"),
        }
    }
}

/// 遍历期为单个字段建立的描述。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// 字段名，同时也是 Part 名。
    pub name: &'static str,
    /// 字段在结构体中的声明序号。
    pub ordinal: usize,
    /// 结构种类；编码时空值无法归类，记为 `None`。
    pub kind: Option<FieldKind>,
}
