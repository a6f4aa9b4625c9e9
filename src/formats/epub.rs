//! EPUB 3 books with a navigation document and one XHTML page per chapter.

use super::archive::ZipPackage;
use super::xml_escape;
use crate::error::AppResult;
use chrono::{DateTime, Utc};

pub struct Chapter<'a> {
    pub title: &'a str,
    pub paragraphs: Vec<&'a str>,
}

pub struct Book<'a> {
    pub identifier: String,
    pub title: &'a str,
    pub language: &'a str,
    pub modified: DateTime<Utc>,
    pub chapters: Vec<Chapter<'a>>,
}

const CONTAINER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<container version=\"1.0\" xmlns=\"urn:oasis:names:tc:opendocument:xmlns:container\">\
<rootfiles><rootfile full-path=\"OEBPS/content.opf\" media-type=\"application/oebps-package+xml\"/></rootfiles>\
</container>\n";

fn xhtml(title: &str, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\">\
         <head><title>{}</title></head><body>{}</body></html>\n",
        xml_escape(title),
        body
    )
}

fn chapter_page(chapter: &Chapter) -> String {
    let mut body = format!("<h1>{}</h1>", xml_escape(chapter.title));
    for paragraph in &chapter.paragraphs {
        body.push_str(&format!("<p>{}</p>", xml_escape(paragraph)));
    }
    xhtml(chapter.title, &body)
}

fn nav(book: &Book) -> String {
    let items: String = book
        .chapters
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "<li><a href=\"chapter{}.xhtml\">{}</a></li>",
                i + 1,
                xml_escape(c.title)
            )
        })
        .collect();
    xhtml(
        book.title,
        &format!("<nav epub:type=\"toc\" id=\"toc\"><ol>{}</ol></nav>", items),
    )
}

fn package_document(book: &Book) -> String {
    let mut manifest = String::from(
        "<item id=\"nav\" href=\"nav.xhtml\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>",
    );
    let mut spine = String::new();
    for index in 1..=book.chapters.len() {
        manifest.push_str(&format!(
            "<item id=\"chapter{i}\" href=\"chapter{i}.xhtml\" media-type=\"application/xhtml+xml\"/>",
            i = index
        ));
        spine.push_str(&format!("<itemref idref=\"chapter{}\"/>", index));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <package xmlns=\"http://www.idpf.org/2007/opf\" version=\"3.0\" unique-identifier=\"book-id\">\
         <metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\
         <dc:identifier id=\"book-id\">{}</dc:identifier>\
         <dc:title>{}</dc:title><dc:language>{}</dc:language>\
         <meta property=\"dcterms:modified\">{}</meta>\
         </metadata><manifest>{}</manifest><spine>{}</spine></package>\n",
        xml_escape(&book.identifier),
        xml_escape(book.title),
        xml_escape(book.language),
        book.modified.format("%Y-%m-%dT%H:%M:%SZ"),
        manifest,
        spine
    )
}

pub fn epub(book: &Book) -> AppResult<Vec<u8>> {
    let mut zip = ZipPackage::new();
    zip.stored("mimetype", b"application/epub+zip")?;
    zip.deflated("META-INF/container.xml", CONTAINER.as_bytes())?;
    zip.deflated("OEBPS/content.opf", package_document(book).as_bytes())?;
    zip.deflated("OEBPS/nav.xhtml", nav(book).as_bytes())?;
    for (index, chapter) in book.chapters.iter().enumerate() {
        zip.deflated(
            &format!("OEBPS/chapter{}.xhtml", index + 1),
            chapter_page(chapter).as_bytes(),
        )?;
    }
    zip.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::{Cursor, Read};
    use zip::{CompressionMethod, ZipArchive};

    #[test]
    fn test_epub_layout() {
        let book = Book {
            identifier: "urn:uuid:1234".to_string(),
            title: "Tales & More",
            language: "en",
            modified: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
            chapters: vec![
                Chapter { title: "One", paragraphs: vec!["a", "b"] },
                Chapter { title: "Two", paragraphs: vec!["c"] },
            ],
        };
        let bytes = epub(&book).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        {
            let first = archive.by_index(0).unwrap();
            assert_eq!(first.name(), "mimetype");
            assert_eq!(first.compression(), CompressionMethod::Stored);
        }

        let mut opf = String::new();
        archive.by_name("OEBPS/content.opf").unwrap().read_to_string(&mut opf).unwrap();
        assert!(opf.contains("<dc:title>Tales &amp; More</dc:title>"));
        assert!(opf.contains("2024-05-06T07:08:09Z"));
        assert_eq!(opf.matches("<itemref ").count(), 2);

        let mut chapter = String::new();
        archive.by_name("OEBPS/chapter2.xhtml").unwrap().read_to_string(&mut chapter).unwrap();
        assert!(chapter.contains("<h1>Two</h1><p>c</p>"));
        assert!(archive.by_name("META-INF/container.xml").is_ok());
        assert!(archive.by_name("OEBPS/nav.xhtml").is_ok());
    }
}
