//! OpenDocument text, spreadsheet and presentation packages.

use super::archive::ZipPackage;
use super::xml_escape;
use crate::error::AppResult;

const NAMESPACES: &str = concat!(
    "xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\" ",
    "xmlns:style=\"urn:oasis:names:tc:opendocument:xmlns:style:1.0\" ",
    "xmlns:text=\"urn:oasis:names:tc:opendocument:xmlns:text:1.0\" ",
    "xmlns:table=\"urn:oasis:names:tc:opendocument:xmlns:table:1.0\" ",
    "xmlns:draw=\"urn:oasis:names:tc:opendocument:xmlns:drawing:1.0\" ",
    "xmlns:fo=\"urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0\" ",
    "xmlns:svg=\"urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0\" ",
    "xmlns:presentation=\"urn:oasis:names:tc:opendocument:xmlns:presentation:1.0\" ",
    "xmlns:meta=\"urn:oasis:names:tc:opendocument:xmlns:meta:1.0\" ",
    "xmlns:dc=\"http://purl.org/dc/elements/1.1/\""
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OdfKind {
    Text,
    Spreadsheet,
    Presentation,
}

impl OdfKind {
    fn mimetype(&self) -> &'static str {
        match self {
            OdfKind::Text => "application/vnd.oasis.opendocument.text",
            OdfKind::Spreadsheet => "application/vnd.oasis.opendocument.spreadsheet",
            OdfKind::Presentation => "application/vnd.oasis.opendocument.presentation",
        }
    }
}

fn manifest(kind: OdfKind) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <manifest:manifest xmlns:manifest=\"urn:oasis:names:tc:opendocument:xmlns:manifest:1.0\" manifest:version=\"1.2\">\n\
         <manifest:file-entry manifest:full-path=\"/\" manifest:version=\"1.2\" manifest:media-type=\"{}\"/>\n\
         <manifest:file-entry manifest:full-path=\"content.xml\" manifest:media-type=\"text/xml\"/>\n\
         <manifest:file-entry manifest:full-path=\"styles.xml\" manifest:media-type=\"text/xml\"/>\n\
         <manifest:file-entry manifest:full-path=\"meta.xml\" manifest:media-type=\"text/xml\"/>\n\
         </manifest:manifest>\n",
        kind.mimetype()
    )
}

fn meta(title: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <office:document-meta {} office:version=\"1.2\">\
         <office:meta><meta:generator>faker-file-api</meta:generator><dc:title>{}</dc:title></office:meta>\
         </office:document-meta>\n",
        NAMESPACES,
        xml_escape(title)
    )
}

fn styles(kind: OdfKind) -> String {
    let master = if kind == OdfKind::Presentation {
        "<office:automatic-styles>\
         <style:page-layout style:name=\"PM1\">\
         <style:page-layout-properties fo:page-width=\"28cm\" fo:page-height=\"15.75cm\" style:print-orientation=\"landscape\"/>\
         </style:page-layout>\
         </office:automatic-styles>\
         <office:master-styles>\
         <style:master-page style:name=\"Default\" style:page-layout-name=\"PM1\"/>\
         </office:master-styles>"
    } else {
        "<office:master-styles/>"
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <office:document-styles {} office:version=\"1.2\"><office:styles/>{}</office:document-styles>\n",
        NAMESPACES, master
    )
}

fn content(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <office:document-content {} office:version=\"1.2\"><office:body>{}</office:body></office:document-content>\n",
        NAMESPACES, body
    )
}

fn package(kind: OdfKind, title: &str, body: &str) -> AppResult<Vec<u8>> {
    let mut zip = ZipPackage::new();
    zip.stored("mimetype", kind.mimetype().as_bytes())?;
    zip.deflated("META-INF/manifest.xml", manifest(kind).as_bytes())?;
    zip.deflated("meta.xml", meta(title).as_bytes())?;
    zip.deflated("styles.xml", styles(kind).as_bytes())?;
    zip.deflated("content.xml", content(body).as_bytes())?;
    zip.finish()
}

fn text_paragraphs<'a>(paragraphs: impl IntoIterator<Item = &'a str>) -> String {
    paragraphs
        .into_iter()
        .map(|p| format!("<text:p>{}</text:p>", xml_escape(p)))
        .collect()
}

/// Text document with one paragraph per item.
pub fn odt(title: &str, paragraphs: &[&str]) -> AppResult<Vec<u8>> {
    let body = format!(
        "<office:text>{}</office:text>",
        text_paragraphs(paragraphs.iter().copied())
    );
    package(OdfKind::Text, title, &body)
}

/// Spreadsheet with a single sheet of string cells.
pub fn ods(title: &str, sheet_name: &str, rows: &[Vec<String>]) -> AppResult<Vec<u8>> {
    let mut body = format!(
        "<office:spreadsheet><table:table table:name=\"{}\">",
        xml_escape(sheet_name)
    );
    for row in rows {
        body.push_str("<table:table-row>");
        for cell in row {
            body.push_str(&format!(
                "<table:table-cell office:value-type=\"string\"><text:p>{}</text:p></table:table-cell>",
                xml_escape(cell)
            ));
        }
        body.push_str("</table:table-row>");
    }
    body.push_str("</table:table></office:spreadsheet>");
    package(OdfKind::Spreadsheet, title, &body)
}

/// Presentation with one page per slide; each slide is a list of paragraphs
/// drawn in a single text frame.
pub fn odp(title: &str, slides: &[Vec<&str>]) -> AppResult<Vec<u8>> {
    let mut body = String::from("<office:presentation>");
    for (index, slide) in slides.iter().enumerate() {
        body.push_str(&format!(
            "<draw:page draw:name=\"page{}\" draw:master-page-name=\"Default\">\
             <draw:frame svg:x=\"2cm\" svg:y=\"2cm\" svg:width=\"24cm\" svg:height=\"11.75cm\">\
             <draw:text-box>{}</draw:text-box></draw:frame></draw:page>",
            index + 1,
            text_paragraphs(slide.iter().copied())
        ));
    }
    body.push_str("</office:presentation>");
    package(OdfKind::Presentation, title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    fn read(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut out = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_odt_package() {
        let mut archive = open(odt("Doc", &["first & second", "third"]).unwrap());
        assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");
        assert_eq!(read(&mut archive, "mimetype"), OdfKind::Text.mimetype());

        let content = read(&mut archive, "content.xml");
        assert!(content.contains("<text:p>first &amp; second</text:p>"));
        assert!(read(&mut archive, "META-INF/manifest.xml").contains("content.xml"));
    }

    #[test]
    fn test_ods_cells() {
        let rows = vec![
            vec!["name".to_string(), "city".to_string()],
            vec!["Ann".to_string(), "Oslo".to_string()],
        ];
        let mut archive = open(ods("Sheet", "Sheet1", &rows).unwrap());
        let content = read(&mut archive, "content.xml");
        assert_eq!(content.matches("<table:table-row>").count(), 2);
        assert!(content.contains("<text:p>Oslo</text:p>"));
    }

    #[test]
    fn test_odp_pages() {
        let slides = vec![vec!["one"], vec!["two", "three"]];
        let mut archive = open(odp("Deck", &slides).unwrap());
        let content = read(&mut archive, "content.xml");
        assert_eq!(content.matches("<draw:page ").count(), 2);
        assert!(read(&mut archive, "styles.xml").contains("style:master-page style:name=\"Default\""));
    }
}
