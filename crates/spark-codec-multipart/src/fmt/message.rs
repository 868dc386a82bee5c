use crate::boundary::Boundary;
use crate::charset::StringCodec;
use crate::form::FormData;
use crate::types::{CONTENT_DISPOSITION, HeaderEntry, Part};

use super::headers::{write_header, write_headers};

const FORM_DATA: &str = "form-data";

/// 写出完整的 multipart 报文。
///
/// # 教案式说明
/// - **What**：每个 Part 输出为 `--<boundary><sep>`、header 行、空行、body、`<sep>`；
///   最后以 `--<boundary>--<sep>` 收尾。空表单只包含结尾分隔行。
/// - **How**：`Content-Disposition` 总是第一行，`name` 属性取自存储中的条目名称并排在其他
///   属性（如 `filename`）之前；Part 自带的其余 header 按插入顺序跟随。
pub fn write_form(
    out: &mut Vec<u8>,
    boundary: &Boundary,
    form: &FormData,
    codec: &dyn StringCodec,
    line_separator: &str,
) {
    let delimiter = boundary.delimiter();
    for (name, part) in form.iter() {
        out.extend_from_slice(delimiter.as_bytes());
        out.extend_from_slice(line_separator.as_bytes());
        write_part_headers(out, name, part, codec, line_separator);
        out.extend_from_slice(line_separator.as_bytes());
        out.extend_from_slice(&part.body);
        out.extend_from_slice(line_separator.as_bytes());
    }
    out.extend_from_slice(delimiter.as_bytes());
    out.extend_from_slice(b"--");
    out.extend_from_slice(line_separator.as_bytes());
}

fn write_part_headers(
    out: &mut Vec<u8>,
    name: &str,
    part: &Part,
    codec: &dyn StringCodec,
    line_separator: &str,
) {
    let mut headers = part.headers.clone();
    let declared = headers.remove(CONTENT_DISPOSITION);

    let mut disposition =
        HeaderEntry::with_value(declared.as_ref().and_then(HeaderEntry::value).unwrap_or(FORM_DATA));
    disposition.set_attribute("name", name);
    if let Some(declared) = &declared {
        for (attribute, value) in declared.attributes() {
            if !attribute.eq_ignore_ascii_case("name") {
                disposition.set_attribute(attribute, value);
            }
        }
    }

    write_header(out, CONTENT_DISPOSITION, &disposition, codec, line_separator);
    write_headers(out, &headers, codec, line_separator);
}
