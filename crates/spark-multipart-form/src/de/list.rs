//! 列表字段的前向游标。

use serde::de::{DeserializeSeed, SeqAccess};
use spark_codec_multipart::StringCodec;

use crate::de::field::FieldDeserializer;
use crate::error::FormError;
use crate::leaf::LeafSource;

/// 按收集顺序逐个交出已解析值，不回退。
pub(crate) struct ListCursor<'a> {
    field: &'static str,
    sources: std::vec::IntoIter<LeafSource>,
    codec: &'a dyn StringCodec,
}

impl<'a> ListCursor<'a> {
    pub(crate) fn new(
        field: &'static str,
        sources: Vec<LeafSource>,
        codec: &'a dyn StringCodec,
    ) -> Self {
        Self {
            field,
            sources: sources.into_iter(),
            codec,
        }
    }
}

impl<'de> SeqAccess<'de> for ListCursor<'_> {
    type Error = FormError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, FormError>
    where
        T: DeserializeSeed<'de>,
    {
        match self.sources.next() {
            Some(source) => seed
                .deserialize(FieldDeserializer::element(self.field, source, self.codec))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.sources.len())
    }
}
