use serde::Serialize;
use serde::ser::SerializeStruct;
use spark_codec_multipart::{EditSelector, FormData, FormDataBuilder, Part, StringCodec};

use crate::directive::{DynamicHeader, FormSchema, StaticHeader};
use crate::error::FormError;
use crate::kind::FieldDescriptor;
use crate::leaf::Leaf;
use crate::ser::field::{FieldSerializer, FieldValue};

/// 根结构体的逐字段编码器。
///
/// # 教案式说明
/// - **意图 (Why)**：把“一个字段产生 0..N 个 Part 或若干延迟 header 编辑”的分派集中在一处。
/// - **契约 (What)**：
///   - 空值字段不产生任何 Part，也不产生 header 动作；
///   - 带动态指令的字段不产生 body Part，只排队延迟编辑，此时字段上的静态指令被忽略；
///   - 其余字段：标量产生一个以字段命名的 Part 并写入静态指令，列表按元素顺序产生同名 Part，元素 Part 不写静态 header；
///   - [`end`](SerializeStruct::end) 执行全部延迟编辑并返回冻结的 [`FormData`]。
/// - **执行 (How)**：字段值先交给 [`FieldSerializer`] 归类，结构性错误在归类阶段即返回，
///   因此失败时不会留下半成品。
pub(crate) struct ObjectEncoder<'a> {
    schema: &'a FormSchema,
    codec: &'a dyn StringCodec,
    builder: FormDataBuilder,
    ordinal: usize,
}

impl<'a> ObjectEncoder<'a> {
    pub(crate) fn new(schema: &'a FormSchema, codec: &'a dyn StringCodec) -> Self {
        Self {
            schema,
            codec,
            builder: FormDataBuilder::new(),
            ordinal: 0,
        }
    }

    fn defer_dynamic(
        &mut self,
        field: &FieldDescriptor,
        dynamics: &[&DynamicHeader],
        value: FieldValue,
    ) {
        let texts: Vec<(EditSelector, String)> = match value {
            FieldValue::Null => return,
            FieldValue::Leaf(leaf) => vec![(EditSelector::All, leaf.into_text(self.codec))],
            FieldValue::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, leaf)| (EditSelector::Nth(index), leaf.into_text(self.codec)))
                .collect(),
        };

        for directive in dynamics {
            for (selector, text) in &texts {
                let directive = (*directive).clone();
                let text = text.clone();
                self.builder
                    .defer_edit(directive.source_part.clone(), *selector, move |part| {
                        directive.apply(part, &text);
                    });
            }
            tracing::debug!(
                field = field.name,
                ordinal = field.ordinal,
                header = %directive.header_name,
                target_part = %directive.source_part,
                "queued dynamic header edit"
            );
        }
    }

    fn append_parts(
        &mut self,
        field: &FieldDescriptor,
        statics: &[&StaticHeader],
        value: FieldValue,
    ) {
        // 静态指令只作用于标量 Part，列表元素 Part 不带静态 header
        let (leaves, statics) = match value {
            FieldValue::Null => return,
            FieldValue::Leaf(leaf) => (vec![leaf], statics),
            FieldValue::List(items) => (items, &[][..]),
        };
        let count = leaves.len();
        for leaf in leaves {
            let part = self.part_for(leaf, statics);
            self.builder.add(field.name, part);
        }
        tracing::debug!(
            field = field.name,
            ordinal = field.ordinal,
            kind = ?field.kind,
            parts = count,
            "encoded form field"
        );
    }

    fn part_for(&self, leaf: Leaf, statics: &[&StaticHeader]) -> Part {
        let mut part = Part::new(leaf.into_body(self.codec));
        for directive in statics {
            directive.apply(&mut part);
        }
        part
    }
}

impl SerializeStruct for ObjectEncoder<'_> {
    type Ok = FormData;
    type Error = FormError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), FormError>
    where
        T: ?Sized + Serialize,
    {
        let classified = value.serialize(FieldSerializer::new(key))?;
        let descriptor = FieldDescriptor {
            name: key,
            ordinal: self.ordinal,
            kind: classified.kind(),
        };
        self.ordinal += 1;

        if matches!(classified, FieldValue::Null) {
            tracing::trace!(field = key, "skipped null field");
            return Ok(());
        }

        let schema = self.schema;
        let directives = schema.resolve(key);
        if directives.dynamics.is_empty() {
            self.append_parts(&descriptor, &directives.statics, classified);
        } else {
            self.defer_dynamic(&descriptor, &directives.dynamics, classified);
        }
        Ok(())
    }

    fn skip_field(&mut self, _key: &'static str) -> Result<(), FormError> {
        self.ordinal += 1;
        Ok(())
    }

    fn end(self) -> Result<FormData, FormError> {
        Ok(self.builder.build())
    }
}
