use serde::de::{DeserializeSeed, IntoDeserializer, MapAccess};
use spark_codec_multipart::{FormData, StringCodec};

use crate::de::field::FieldDeserializer;
use crate::directive::{DynamicHeader, FormSchema};
use crate::error::FormError;
use crate::leaf::LeafSource;

/// 根结构体的逐字段解码器。
///
/// # 教案式说明
/// - **意图 (Why)**：按 serde 给出的字段名逐个解析取值来源，再交给 [`FieldDeserializer`] 转换。
/// - **契约 (What)**：
///   - 有动态指令的字段：按声明顺序求值，第一个得到非空结果的指令胜出；全部为空时字段视为缺失，
///     **不会**回退到同名 body；
///   - 无动态指令的字段：取所有同名 Part 的 body；
///   - 解析结果为空的字段不交给 visitor，由 serde 按 `missing_field` 处理：`Option` 变为 `None`，
///     `#[serde(default)]` 取默认值，其余字段报 [`FormError::MissingValue`]。
/// - **执行 (How)**：`next_key_seed` 跳过空字段并暂存下一个字段的取值，`next_value_seed` 消费暂存值。
pub(crate) struct ObjectDecoder<'a> {
    form: &'a FormData,
    schema: &'a FormSchema,
    codec: &'a dyn StringCodec,
    fields: std::slice::Iter<'static, &'static str>,
    pending: Option<(&'static str, Vec<LeafSource>)>,
}

impl<'a> ObjectDecoder<'a> {
    pub(crate) fn new(
        form: &'a FormData,
        schema: &'a FormSchema,
        codec: &'a dyn StringCodec,
        fields: &'static [&'static str],
    ) -> Self {
        Self {
            form,
            schema,
            codec,
            fields: fields.iter(),
            pending: None,
        }
    }
}

/// 解析单个字段的取值来源。
fn resolve_sources(form: &FormData, schema: &FormSchema, field: &str) -> Vec<LeafSource> {
    let directives = schema.resolve(field);
    if directives.dynamics.is_empty() {
        return form
            .parts(field)
            .map(|part| LeafSource::Body(part.body.clone()))
            .collect();
    }
    directives
        .dynamics
        .iter()
        .map(|directive| header_values(form, directive))
        .find(|values| !values.is_empty())
        .unwrap_or_default()
}

fn header_values(form: &FormData, directive: &DynamicHeader) -> Vec<LeafSource> {
    form.parts(&directive.source_part)
        .filter_map(|part| directive.extract(part))
        .map(LeafSource::Header)
        .collect()
}

impl<'de> MapAccess<'de> for ObjectDecoder<'_> {
    type Error = FormError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, FormError>
    where
        K: DeserializeSeed<'de>,
    {
        for &field in self.fields.by_ref() {
            let sources = resolve_sources(self.form, self.schema, field);
            if sources.is_empty() {
                tracing::debug!(field, "form field resolved to no value");
                continue;
            }
            tracing::debug!(field, values = sources.len(), "decoded form field");
            self.pending = Some((field, sources));
            return seed.deserialize(field.into_deserializer()).map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, FormError>
    where
        V: DeserializeSeed<'de>,
    {
        let (field, sources) = self.pending.take().ok_or(FormError::NotSupportedOperation {
            operation: "reading a form value before its field name",
        })?;
        seed.deserialize(FieldDeserializer::new(field, sources, self.codec))
    }

    fn size_hint(&self) -> Option<usize> {
        None
    }
}
