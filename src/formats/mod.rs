//! Byte-level encoders for every generated file format.
//!
//! Nothing in here knows about HTTP or request types; providers feed these
//! encoders with already-generated content.

pub mod archive;
pub mod epub;
pub mod graphic;
pub mod layout;
pub mod mail;
pub mod mp3;
pub mod odf;
pub mod ooxml;
pub mod pdf;
pub mod raster;
pub mod svg;
pub mod text;

/// Escape text for use in XML character data and attribute values.
pub fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab and newlines are not valid XML 1.0.
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

/// Paragraphs of a text body, skipping blank lines.
pub fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim_end).filter(|p| !p.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(
            xml_escape("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&apos;s&lt;/a&gt;"
        );
        assert_eq!(xml_escape("bell\u{7}tab\t"), "belltab\t");
    }

    #[test]
    fn test_paragraphs_skip_blank_lines() {
        let text = "first\n\n  \nsecond  \n";
        assert_eq!(paragraphs(text).collect::<Vec<_>>(), vec!["first", "second"]);
    }
}
