#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Deserialize;
use spark_codec_multipart::{Boundary, MultipartCodec, WireOptions};
use spark_multipart_form::{DynamicHeader, FormSchema, Utf8Codec, from_form_data};
use std::sync::Arc;

/// Fuzz 用例：任意报文字节与解析选项。
///
/// - **Why**：解析器直接面对网络输入，任何字节序列都只能得到 `Ok`/`Err`，不能 panic。
/// - **How**：先以配置的 boundary 解码；成功时把结果重新编码再解码，比对 Part 数量与 body。
/// - **What**：同时把解码结果交给类型化解码器，覆盖 header 提取与标量转换路径。
#[derive(Debug, Arbitrary)]
struct DecodeCase {
    payload: Vec<u8>,
    boundary: String,
    crlf: bool,
    require_close_delimiter: bool,
    check_boundary: bool,
    sniff: bool,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct TypedView {
    name: Option<String>,
    count: Option<u32>,
    flags: Option<Vec<bool>>,
    kind: Option<String>,
}

fn typed_schema() -> FormSchema {
    FormSchema::new().field("kind", |f| {
        f.dynamic_header(DynamicHeader::value("Content-Type", "name"))
    })
}

fuzz_target!(|case: DecodeCase| {
    let options = WireOptions {
        line_separator: if case.crlf { "\r\n" } else { "\n" }.to_owned(),
        require_close_delimiter: case.require_close_delimiter,
        check_boundary: case.check_boundary,
    };
    let codec = MultipartCodec::new(options, Arc::new(Utf8Codec));

    let boundary = if case.sniff {
        codec.sniff_boundary(&case.payload)
    } else {
        Boundary::new(case.boundary)
    };
    let Ok(boundary) = boundary else {
        return;
    };
    let Ok(form) = codec.decode(&boundary, &case.payload) else {
        return;
    };

    let _ = from_form_data::<TypedView>(&form, &typed_schema(), &Utf8Codec);

    let encoded = codec.encode(&boundary, &form);
    if let Ok(again) = codec.decode(&boundary, &encoded) {
        assert_eq!(again.len(), form.len(), "重新编码后 Part 数量应保持");
        for ((_, before), (_, after)) in form.iter().zip(again.iter()) {
            assert_eq!(before.body, after.body, "重新编码后 body 应保持");
        }
    }
});
