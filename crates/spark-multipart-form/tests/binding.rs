//! Part 存储层面的绑定契约测试。
//!
//! 断言直接落在 [`FormData`] 上，不经过线格式：
//! - 标量与列表字段的 Part 形状与往返；
//! - 动态 header 指令抑制自身 body、不受字段声明顺序影响；
//! - 静态属性指令只写属性、不改普通值；
//! - 空值省略与缺失字段的区别；
//! - 列表套列表、列表套对象、映射在两个方向上都被拒绝。

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use spark_multipart_form::{
    DescribeForm, DynamicHeader, FormData, FormDataBuilder, FormError, FormSchema, HeaderEntry,
    Part, StaticHeader, StringCodec, Utf8Codec, from_form_data, to_form_data,
};

fn encode<T: Serialize + DescribeForm>(value: &T) -> FormData {
    to_form_data(value, &T::form_schema(), &Utf8Codec).expect("编码成功")
}

fn decode<T: for<'de> Deserialize<'de> + DescribeForm>(form: &FormData) -> Result<T, FormError> {
    from_form_data(form, &T::form_schema(), &Utf8Codec)
}

fn bodies<'a>(form: &'a FormData, name: &'a str) -> Vec<&'a [u8]> {
    form.parts(name).map(|part| part.body.as_ref()).collect()
}

fn header_value<'a>(part: &'a Part, name: &str) -> Option<&'a str> {
    part.headers.get(name).and_then(HeaderEntry::value)
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Person {
    name: String,
}

impl DescribeForm for Person {}

#[test]
fn scalar_object_round_trip() {
    let form = encode(&Person {
        name: "Alice".to_owned(),
    });
    assert_eq!(form.len(), 1);
    assert_eq!(bodies(&form, "name"), vec![Utf8Codec.encode("Alice").as_slice()]);

    let decoded: Person = decode(&form).expect("解码成功");
    assert_eq!(decoded.name, "Alice");
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Tagged {
    tags: Vec<String>,
}

impl DescribeForm for Tagged {}

#[test]
fn list_field_keeps_element_order() {
    let value = Tagged {
        tags: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
    };
    let form = encode(&value);
    assert_eq!(form.names(), vec!["tags"]);
    assert_eq!(bodies(&form, "tags"), vec![&b"a"[..], b"b", b"c"]);

    let decoded: Tagged = decode(&form).expect("解码成功");
    assert_eq!(decoded, value);
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Labeled {
    field: String,
    header: String,
}

impl DescribeForm for Labeled {
    fn form_schema() -> FormSchema {
        FormSchema::new().field("header", |f| {
            f.dynamic_header(DynamicHeader::value("Header", "field"))
        })
    }
}

#[test]
fn dynamic_header_suppresses_its_own_body() {
    let value = Labeled {
        field: "x".to_owned(),
        header: "H1".to_owned(),
    };
    let form = encode(&value);

    assert_eq!(form.names(), vec!["field"]);
    assert_eq!(form.parts("header").count(), 0);
    let part = form.first("field").expect("存在 field Part");
    assert_eq!(part.body.as_ref(), b"x");
    assert_eq!(header_value(part, "Header"), Some("H1"));

    let decoded: Labeled = decode(&form).expect("解码成功");
    assert_eq!(decoded, value);
}

/// header 字段声明在目标字段之前。
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct LabelFirst {
    header: String,
    field: String,
}

impl DescribeForm for LabelFirst {
    fn form_schema() -> FormSchema {
        Labeled::form_schema()
    }
}

#[test]
fn dynamic_header_applies_regardless_of_declaration_order() {
    let value = LabelFirst {
        header: "H2".to_owned(),
        field: "y".to_owned(),
    };
    let form = encode(&value);
    let part = form.first("field").expect("存在 field Part");
    assert_eq!(header_value(part, "Header"), Some("H2"));
    assert_eq!(decode::<LabelFirst>(&form), Ok(value));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Attachments {
    files: Vec<Bytes>,
    kinds: Vec<String>,
    filenames: Vec<String>,
}

impl DescribeForm for Attachments {
    fn form_schema() -> FormSchema {
        FormSchema::new()
            .field("kinds", |f| {
                f.dynamic_header(DynamicHeader::value("Content-Type", "files"))
            })
            .field("filenames", |f| {
                f.dynamic_header(DynamicHeader::attribute(
                    "Content-Disposition",
                    "files",
                    "filename",
                ))
            })
    }
}

#[test]
fn list_valued_dynamic_header_targets_parts_by_position() {
    let value = Attachments {
        files: vec![Bytes::from_static(&[0, 159, 255]), Bytes::from_static(b"%PDF")],
        kinds: vec!["application/octet-stream".to_owned(), "application/pdf".to_owned()],
        filenames: vec!["blob.bin".to_owned(), "doc.pdf".to_owned()],
    };
    let form = encode(&value);

    let parts: Vec<&Part> = form.parts("files").collect();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].body.as_ref(), &[0, 159, 255]);
    assert_eq!(header_value(parts[1], "Content-Type"), Some("application/pdf"));
    assert_eq!(
        parts[1]
            .headers
            .get("content-disposition")
            .and_then(|entry| entry.attribute("filename")),
        Some("doc.pdf")
    );

    assert_eq!(decode::<Attachments>(&form), Ok(value));
}

#[derive(Debug, Serialize)]
struct Described {
    doc: String,
}

impl DescribeForm for Described {
    fn form_schema() -> FormSchema {
        FormSchema::new().field("doc", |f| {
            f.static_header(StaticHeader::attribute("Header", "attr", "V"))
        })
    }
}

#[test]
fn static_attribute_directive_leaves_plain_value_untouched() {
    let form = encode(&Described {
        doc: "body".to_owned(),
    });
    let entry = form
        .first("doc")
        .and_then(|part| part.headers.get("Header"))
        .expect("存在 Header");
    assert_eq!(entry.attribute("attr"), Some("V"));
    assert_eq!(entry.value(), None);
}

#[derive(Debug, Serialize)]
struct Catalog {
    title: String,
    tags: Vec<String>,
}

impl DescribeForm for Catalog {
    fn form_schema() -> FormSchema {
        FormSchema::new()
            .field("title", |f| f.static_header(StaticHeader::value("X-Source", "catalog")))
            .field("tags", |f| f.static_header(StaticHeader::value("X-Source", "catalog")))
    }
}

#[test]
fn static_directives_skip_list_element_parts() {
    let form = encode(&Catalog {
        title: "t".to_owned(),
        tags: vec!["a".to_owned(), "b".to_owned()],
    });
    let title = form.first("title").expect("存在 title Part");
    assert_eq!(header_value(title, "X-Source"), Some("catalog"));

    let tags: Vec<&Part> = form.parts("tags").collect();
    assert_eq!(tags.len(), 2);
    assert!(tags.iter().all(|part| part.headers.get("X-Source").is_none()));
}

#[derive(Debug, Serialize)]
struct Layered {
    doc: String,
}

impl DescribeForm for Layered {
    fn form_schema() -> FormSchema {
        FormSchema::new()
            .static_header(StaticHeader::value("X-Order", "type-single"))
            .static_headers([StaticHeader::value("X-Order", "type-grouped")])
            .field("doc", |f| {
                f.static_header(StaticHeader::value("X-Order", "field-single"))
                    .static_headers([StaticHeader::value("X-Order", "field-grouped")])
            })
    }
}

#[test]
fn field_level_single_directive_is_applied_last() {
    let form = encode(&Layered {
        doc: "body".to_owned(),
    });
    let part = form.first("doc").expect("存在 doc Part");
    assert_eq!(header_value(part, "X-Order"), Some("field-single"));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    nickname: Option<String>,
}

impl DescribeForm for Profile {}

#[test]
fn null_field_is_omitted_and_decodes_back_to_none() {
    let value = Profile {
        name: "Bob".to_owned(),
        nickname: None,
    };
    let form = encode(&value);
    assert_eq!(form.names(), vec!["name"]);
    assert_eq!(decode::<Profile>(&form), Ok(value));
}

#[test]
fn absent_required_field_is_missing_value() {
    let mut builder = FormDataBuilder::new();
    builder.add("nickname", Part::new("bobby"));
    assert_eq!(
        decode::<Profile>(&builder.build()),
        Err(FormError::MissingValue {
            field: "name".to_owned()
        })
    );
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Upload {
    file: String,
    mime: Option<String>,
}

impl DescribeForm for Upload {
    fn form_schema() -> FormSchema {
        FormSchema::new().field("mime", |f| {
            f.dynamic_header(DynamicHeader::value("Content-Type", "file"))
                .dynamic_header(DynamicHeader::attribute("Content-Type", "file", "charset"))
        })
    }
}

#[test]
fn empty_dynamic_resolution_never_falls_back_to_body() {
    let mut builder = FormDataBuilder::new();
    builder
        .add("file", Part::new("content"))
        .add("mime", Part::new("text/plain"));
    let decoded: Upload = decode(&builder.build()).expect("解码成功");
    assert_eq!(decoded.mime, None);
}

#[derive(Debug, Serialize, Deserialize)]
struct Grid {
    cells: Vec<Vec<u8>>,
}

impl DescribeForm for Grid {}

#[derive(Debug, Serialize, Deserialize)]
struct Point {
    x: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct Shape {
    points: Vec<Point>,
}

impl DescribeForm for Shape {}

#[derive(Debug, Serialize, Deserialize)]
struct Lookup {
    table: HashMap<String, String>,
}

impl DescribeForm for Lookup {}

#[allow(dead_code)]
#[derive(Debug, Serialize, Deserialize)]
enum Outline {
    Dot,
    Circle(u8),
}

#[derive(Debug, Serialize, Deserialize)]
struct Sketch {
    outline: Outline,
}

impl DescribeForm for Sketch {}

fn one_part(name: &str) -> FormData {
    let mut builder = FormDataBuilder::new();
    builder.add(name, Part::new("1"));
    builder.build()
}

fn assert_unsupported<T>(result: Result<T, FormError>, field: &str) {
    match result {
        Err(FormError::UnsupportedStructure { field: Some(got), .. }) => assert_eq!(got, field),
        Err(other) => panic!("期望 UnsupportedStructure，实际为 {other:?}"),
        Ok(_) => panic!("期望 UnsupportedStructure，实际成功"),
    }
}

#[test]
fn structural_violations_are_rejected_in_both_directions() {
    let grid = Grid {
        cells: vec![vec![1]],
    };
    assert_unsupported(to_form_data(&grid, &Grid::form_schema(), &Utf8Codec), "cells");
    assert_unsupported(decode::<Grid>(&one_part("cells")), "cells");

    let shape = Shape {
        points: vec![Point { x: 1 }],
    };
    assert_unsupported(to_form_data(&shape, &Shape::form_schema(), &Utf8Codec), "points");
    assert_unsupported(decode::<Shape>(&one_part("points")), "points");

    let lookup = Lookup {
        table: HashMap::from([("k".to_owned(), "v".to_owned())]),
    };
    assert_unsupported(to_form_data(&lookup, &Lookup::form_schema(), &Utf8Codec), "table");
    assert_unsupported(decode::<Lookup>(&one_part("table")), "table");

    let sketch = Sketch {
        outline: Outline::Circle(3),
    };
    assert_unsupported(to_form_data(&sketch, &Sketch::form_schema(), &Utf8Codec), "outline");
    let mut builder = FormDataBuilder::new();
    builder.add("outline", Part::new("Circle"));
    assert_unsupported(decode::<Sketch>(&builder.build()), "outline");
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct UserId(u64);

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum Level {
    #[allow(dead_code)]
    Low,
    High,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Mixed {
    id: UserId,
    level: Level,
    ratio: f64,
    initial: char,
    active: bool,
    scores: Vec<Option<i32>>,
}

impl DescribeForm for Mixed {}

#[test]
fn wrappers_enums_and_nullable_elements_collapse_to_leaves() {
    let value = Mixed {
        id: UserId(42),
        level: Level::High,
        ratio: 0.25,
        initial: 'é',
        active: true,
        scores: vec![Some(3), None, Some(-7)],
    };
    let form = encode(&value);
    assert_eq!(bodies(&form, "id"), vec![&b"42"[..]]);
    assert_eq!(bodies(&form, "level"), vec![&b"High"[..]]);
    assert_eq!(bodies(&form, "scores"), vec![&b"3"[..], b"-7"]);

    let decoded: Mixed = decode(&form).expect("解码成功");
    assert_eq!(decoded.scores, vec![Some(3), Some(-7)]);
    assert_eq!(decoded.id, value.id);
    assert_eq!(decoded.level, Level::High);
    assert_eq!(decoded.ratio, 0.25);
    assert_eq!(decoded.initial, 'é');
    assert!(decoded.active);
}

#[test]
fn unparsable_scalar_reports_field_value_and_target() {
    let mut builder = FormDataBuilder::new();
    builder.add("name", Part::new("Carol"));
    builder.add("nickname", Part::new("c"));
    #[derive(Debug, Deserialize)]
    struct Counter {
        #[allow(dead_code)]
        name: u32,
    }
    let err = from_form_data::<Counter>(&builder.build(), &FormSchema::new(), &Utf8Codec)
        .expect_err("非数字应失败");
    assert_eq!(
        err,
        FormError::DecodeConversion {
            field: "name".to_owned(),
            value: "Carol".to_owned(),
            target: "u32",
        }
    );
}
