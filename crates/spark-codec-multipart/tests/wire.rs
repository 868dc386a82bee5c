//! multipart 线格式集成测试。
//!
//! - 固定报文：核对写出的逐字节格式与解析出的 header 结构；
//! - 性质测试：任意名称、header 与二进制 body 经编码再解码后保持名称、顺序、header 与 body。

use std::sync::Arc;

use bytes::Bytes;
use proptest::prelude::*;
use spark_codec_multipart::{
    Boundary, CONTENT_DISPOSITION, FormData, FormDataBuilder, Latin1Codec, MultipartCodec,
    MultipartParseError, Part, WireOptions,
};

fn disposition(name: &str) -> Part {
    Part::new(Bytes::new())
        .with_header(CONTENT_DISPOSITION, "form-data")
        .with_header_attribute(CONTENT_DISPOSITION, "name", name)
}

#[test]
fn attribute_only_header_survives_round_trip() {
    let codec = MultipartCodec::default();
    let boundary = Boundary::fixed_default();
    let mut builder = FormDataBuilder::new();
    builder.add(
        "file",
        Part::new("payload")
            .with_header_attribute("Header", "attr", "V")
            .with_header_attribute(CONTENT_DISPOSITION, "filename", "report \"final\".txt"),
    );
    let bytes = codec.encode(&boundary, &builder.build());

    let text = std::str::from_utf8(&bytes).expect("UTF-8");
    assert!(text.contains(
        "Content-Disposition: form-data; name=\"file\"; filename=\"report \\\"final\\\".txt\"\n"
    ));
    assert!(text.contains("Header: ; attr=\"V\"\n"));

    let decoded = codec.decode(&boundary, &bytes).expect("解码成功");
    let part = decoded.first("file").expect("file Part");
    let header = part.headers.get("header").expect("Header 存在");
    assert_eq!(header.value(), None);
    assert_eq!(header.attribute("attr"), Some("V"));
    assert_eq!(
        part.headers
            .get(CONTENT_DISPOSITION)
            .and_then(|entry| entry.attribute("filename")),
        Some("report \"final\".txt")
    );
}

#[test]
fn decodes_browser_style_crlf_payload() {
    let codec = MultipartCodec::new(
        WireOptions {
            line_separator: "\r\n".to_owned(),
            ..WireOptions::default()
        },
        Arc::new(Latin1Codec),
    );
    let boundary = Boundary::new("----WebKitFormBoundary7MA4YWxkTrZu0gW").expect("合法 boundary");
    let payload = b"------WebKitFormBoundary7MA4YWxkTrZu0gW\r\n\
Content-Disposition: form-data; name=\"title\"\r\n\
\r\n\
caf\xe9\r\n\
------WebKitFormBoundary7MA4YWxkTrZu0gW\r\n\
Content-Disposition: form-data; name=\"upload\"; filename=\"a.bin\"\r\n\
Content-Type: application/octet-stream\r\n\
\r\n\
\x00\x01\x02\r\n\
------WebKitFormBoundary7MA4YWxkTrZu0gW--\r\n";

    let form = codec.decode(&boundary, payload).expect("解码成功");
    assert_eq!(form.names(), vec!["title", "upload"]);
    assert_eq!(form.first("title").map(|p| p.body.to_vec()), Some(b"caf\xe9".to_vec()));
    let upload = form.first("upload").expect("upload Part");
    assert_eq!(upload.body.as_ref(), &[0, 1, 2]);
    assert_eq!(
        upload.headers.get("content-type").and_then(|h| h.value()),
        Some("application/octet-stream")
    );
}

#[test]
fn wrong_boundary_is_rejected() {
    let codec = MultipartCodec::default();
    let mut builder = FormDataBuilder::new();
    builder.add("a", Part::new("1"));
    let bytes = codec.encode(&Boundary::fixed_default(), &builder.build());

    let other = Boundary::new("other").expect("合法 boundary");
    let err = codec.decode(&other, &bytes).expect_err("boundary 不匹配应失败");
    assert_eq!(
        err,
        MultipartParseError::MissingBoundary {
            boundary: "other".to_owned()
        }
    );
}

#[test]
fn empty_form_round_trips() {
    let codec = MultipartCodec::default();
    let boundary = Boundary::fixed_default();
    let bytes = codec.encode(&boundary, &FormData::new());
    assert_eq!(bytes, Bytes::from("--1234567890abcdefghijklmnopqrstuvwxyz--\n"));
    assert!(codec.decode(&boundary, &bytes).expect("解码成功").is_empty());
}

fn part_strategy() -> impl Strategy<Value = (String, Vec<String>, Vec<u8>)> {
    (
        "[a-z_]{1,8}",
        prop::collection::vec("[A-Za-z0-9;\" ]{0,12}", 0..3),
        prop::collection::vec(any::<u8>(), 0..48),
    )
}

proptest! {
    #[test]
    fn prop_encode_then_decode_preserves_parts(
        parts in prop::collection::vec(part_strategy(), 0..6),
        crlf in any::<bool>(),
    ) {
        let options = WireOptions {
            line_separator: if crlf { "\r\n" } else { "\n" }.to_owned(),
            ..WireOptions::default()
        };
        let codec = MultipartCodec::new(options, Arc::new(spark_codec_multipart::Utf8Codec));
        let boundary = Boundary::random(40);

        let mut builder = FormDataBuilder::new();
        let mut expected = Vec::new();
        for (name, values, body) in &parts {
            let mut part = Part::new(Bytes::copy_from_slice(body));
            let mut wire = disposition(name);
            wire.body = part.body.clone();
            for (index, value) in values.iter().enumerate() {
                let header = format!("X-Field-{index}");
                part.set_header_value(&header, value.clone());
                wire.set_header_value(&header, value.clone());
            }
            builder.add(name.clone(), part);
            expected.push((name.clone(), wire));
        }

        let bytes = codec.encode(&boundary, &builder.build());
        let decoded = codec.decode(&boundary, &bytes).expect("解码成功");
        prop_assert_eq!(decoded.into_entries(), expected);
    }
}
