//! Minimal PDF 1.4 writer: text pages with a base font, or one image page.

use std::io::Write;

pub const A4_WIDTH: u32 = 595;
pub const A4_HEIGHT: u32 = 842;
pub const PAGE_MARGIN: u32 = 50;
pub const FONT_SIZE: u32 = 11;
pub const LEADING: u32 = 14;
/// Characters that fit on one Helvetica 11pt line inside the margins.
pub const LINE_CHARS: usize = 85;

fn lines_per_page() -> usize {
    ((A4_HEIGHT - 2 * PAGE_MARGIN) / LEADING) as usize
}

/// Object table; object number `n` lives at index `n - 1`.
#[derive(Default)]
struct Document {
    objects: Vec<Vec<u8>>,
}

impl Document {
    fn reserve(&mut self) -> usize {
        self.objects.push(Vec::new());
        self.objects.len()
    }

    fn set(&mut self, id: usize, body: impl Into<Vec<u8>>) {
        self.objects[id - 1] = body.into();
    }

    fn add(&mut self, body: impl Into<Vec<u8>>) -> usize {
        let id = self.reserve();
        self.set(id, body);
        id
    }

    fn stream(dict_entries: &str, data: &[u8]) -> Vec<u8> {
        let mut out = format!("<< /Length {}{} >>\nstream\n", data.len(), dict_entries).into_bytes();
        out.extend_from_slice(data);
        out.extend_from_slice(b"\nendstream");
        out
    }

    fn finish(self, root: usize, info: Option<usize>) -> Vec<u8> {
        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(self.objects.len());

        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", self.objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        let info = info.map(|id| format!(" /Info {} 0 R", id)).unwrap_or_default();
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {} 0 R{} >>\nstartxref\n{}\n%%EOF\n",
                self.objects.len() + 1,
                root,
                info,
                xref
            )
            .as_bytes(),
        );
        out
    }
}

/// Encode text as a PDF literal string body (WinAnsi).
fn literal(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            ' '..='~' => out.push(c as u8),
            // Latin-1 supplement maps one-to-one onto WinAnsi.
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push(b'?'),
        }
    }
    out
}

fn info_dict(title: Option<&str>) -> Vec<u8> {
    let mut out = b"<< /Producer (faker-file-api)".to_vec();
    if let Some(title) = title {
        out.extend_from_slice(b" /Title (");
        out.extend_from_slice(&literal(title));
        out.push(b')');
    }
    out.extend_from_slice(b" >>");
    out
}

/// Multi-page A4 document with `lines` drawn in Helvetica.
///
/// Lines are expected to be pre-wrapped to [`LINE_CHARS`]; an empty input
/// still yields one blank page.
pub fn text_document(lines: &[&str], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::default();
    let catalog = doc.reserve();
    let pages = doc.reserve();
    let font = doc.add(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );

    let chunks: Vec<&[&str]> = if lines.is_empty() {
        vec![&[][..]]
    } else {
        lines.chunks(lines_per_page()).collect()
    };

    let mut kids = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let mut content = format!(
            "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
            FONT_SIZE,
            LEADING,
            PAGE_MARGIN,
            A4_HEIGHT - PAGE_MARGIN
        )
        .into_bytes();
        for line in chunk {
            content.push(b'(');
            content.extend_from_slice(&literal(line));
            content.extend_from_slice(b") Tj\nT*\n");
        }
        content.extend_from_slice(b"ET");

        let stream = doc.add(Document::stream("", &content));
        let page = doc.add(format!(
            "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
            pages, A4_WIDTH, A4_HEIGHT, font, stream
        ));
        kids.push(page);
    }

    set_page_tree(&mut doc, catalog, pages, &kids);
    let info = doc.add(info_dict(title));
    doc.finish(catalog, Some(info))
}

/// Single-page document whose page is exactly a JPEG image.
pub fn image_document(jpeg: &[u8], width: u32, height: u32, title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::default();
    let catalog = doc.reserve();
    let pages = doc.reserve();
    let image = doc.add(Document::stream(
        &format!(
            " /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode",
            width, height
        ),
        jpeg,
    ));
    let content = format!("q\n{} 0 0 {} 0 0 cm\n/Im1 Do\nQ", width, height);
    let stream = doc.add(Document::stream("", content.as_bytes()));
    let page = doc.add(format!(
        "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
         /Resources << /XObject << /Im1 {} 0 R >> >> /Contents {} 0 R >>",
        pages, width, height, image, stream
    ));

    set_page_tree(&mut doc, catalog, pages, &[page]);
    let info = doc.add(info_dict(title));
    doc.finish(catalog, Some(info))
}

fn set_page_tree(doc: &mut Document, catalog: usize, pages: usize, kids: &[usize]) {
    let kids_refs: Vec<String> = kids.iter().map(|id| format!("{} 0 R", id)).collect();
    doc.set(
        pages,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids_refs.join(" "),
            kids.len()
        ),
    );
    doc.set(catalog, format!("<< /Type /Catalog /Pages {} 0 R >>", pages));
}
