#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use serde::{Deserialize, Serialize};
use spark_multipart_form::{
    DescribeForm, DynamicHeader, FormSchema, MultipartForm, MultipartFormConfig, StaticHeader,
};

/// Fuzz 用例：任意字段值经绑定层与线格式往返。
///
/// - **Why**：差分比较“编码前的值”与“解码得到的值”，覆盖动态 header、空值省略与列表顺序。
/// - **How**：文本字段去掉行分隔字符，header 值只保留字母数字，保证输入落在可往返的取值域内。
#[derive(Debug, Arbitrary)]
struct FormCase {
    title: String,
    note: Option<String>,
    scores: Vec<i64>,
    payload: Vec<u8>,
    mime: Option<String>,
    crlf: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Document {
    title: String,
    note: Option<String>,
    #[serde(default)]
    scores: Vec<i64>,
    payload: Bytes,
    mime: Option<String>,
}

impl DescribeForm for Document {
    fn form_schema() -> FormSchema {
        FormSchema::new()
            .field("payload", |f| {
                f.static_header(StaticHeader::attribute("Content-Disposition", "filename", "blob"))
            })
            .field("mime", |f| {
                f.dynamic_header(DynamicHeader::value("Content-Type", "payload"))
            })
    }
}

fn single_line(text: &str) -> String {
    text.chars().filter(|ch| !matches!(ch, '\r' | '\n')).collect()
}

fuzz_target!(|case: FormCase| {
    let Ok(config) = MultipartFormConfig::builder()
        .random_boundary(48)
        .line_separator(if case.crlf { "\r\n" } else { "\n" })
        .build()
    else {
        return;
    };
    let form = MultipartForm::new(config);

    let document = Document {
        title: single_line(&case.title),
        note: case.note.as_deref().map(single_line),
        scores: case.scores,
        payload: Bytes::from(case.payload),
        mime: case
            .mime
            .map(|mime| mime.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
            .filter(|mime| !mime.is_empty()),
    };

    let encoded = form.encode(&document).expect("扁平结构必然可编码");
    let decoded: Document = form.decode(&encoded.body).expect("自身输出必然可解码");
    assert_eq!(decoded, document);
});
