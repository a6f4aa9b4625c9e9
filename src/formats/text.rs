//! Plain-text based formats: RTF, CSV, JSON and XML.

use super::xml_escape;
use crate::error::AppResult;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Rich Text Format document, one `\par` per paragraph.
pub fn rtf(text: &str) -> Vec<u8> {
    let mut out = String::from("{\\rtf1\\ansi\\deff0{\\fonttbl{\\f0\\fswiss Helvetica;}}\n\\f0\\fs24\n");
    for line in text.split('\n') {
        for c in line.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '{' => out.push_str("\\{"),
                '}' => out.push_str("\\}"),
                c if c.is_ascii() => out.push(c),
                // RTF \u takes a signed 16-bit value followed by a fallback character.
                c => {
                    let mut units = [0u16; 2];
                    for unit in c.encode_utf16(&mut units) {
                        out.push_str(&format!("\\u{}?", *unit as i16));
                    }
                }
            }
        }
        out.push_str("\\par\n");
    }
    out.push('}');
    out.into_bytes()
}

/// CSV document with an optional header row.
pub fn csv(header: Option<&[String]>, rows: &[Vec<String>]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if let Some(header) = header {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::error::AppError::generation(format!("csv: {}", e)))
}

struct Row<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

struct Rows<'a> {
    columns: &'a [String],
    rows: &'a [Vec<String>],
}

impl Serialize for Rows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for values in self.rows {
            seq.serialize_element(&Row {
                columns: self.columns,
                values,
            })?;
        }
        seq.end()
    }
}

/// JSON array of objects keyed by `columns`, in column order.
///
/// `indent` of `None` produces compact output.
pub fn json(columns: &[String], rows: &[Vec<String>], indent: Option<usize>) -> AppResult<Vec<u8>> {
    let rows = Rows { columns, rows };
    let mut out = Vec::new();
    match indent {
        Some(width) => {
            let indent = " ".repeat(width);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
            rows.serialize(&mut serializer)?;
        }
        None => {
            let mut serializer = serde_json::Serializer::new(&mut out);
            rows.serialize(&mut serializer)?;
        }
    }
    Ok(out)
}

/// XML document: one `row_element` per row, one child element per column.
///
/// Element names are expected to be validated by the caller.
pub fn xml(root_element: &str, row_element: &str, columns: &[String], rows: &[Vec<String>]) -> Vec<u8> {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str(&format!("<{}>\n", root_element));
    for values in rows {
        out.push_str(&format!("  <{}>\n", row_element));
        for (column, value) in columns.iter().zip(values) {
            out.push_str(&format!("    <{c}>{}</{c}>\n", xml_escape(value), c = column));
        }
        out.push_str(&format!("  </{}>\n", row_element));
    }
    out.push_str(&format!("</{}>\n", root_element));
    out.into_bytes()
}
