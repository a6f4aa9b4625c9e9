//! Office Open XML packages: word documents, workbooks and presentations.

use super::archive::ZipPackage;
use super::xml_escape;
use crate::error::AppResult;

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const DOC_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const MAIN_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PML_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

struct Relationship<'a> {
    id: String,
    kind: &'a str,
    target: String,
}

fn relationships(rels: &[Relationship]) -> String {
    let mut out = format!("{}<Relationships xmlns=\"{}\">", XML_DECL, REL_NS);
    for rel in rels {
        out.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}/{}\" Target=\"{}\"/>",
            rel.id, DOC_REL, rel.kind, rel.target
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn rel<'a>(id: impl Into<String>, kind: &'a str, target: impl Into<String>) -> Relationship<'a> {
    Relationship {
        id: id.into(),
        kind,
        target: target.into(),
    }
}

/// `[Content_Types].xml` with the common defaults plus `overrides`
/// of (part name, content type).
fn content_types(overrides: &[(String, &str)]) -> String {
    let mut out = format!(
        "{}<Types xmlns=\"{}\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>",
        XML_DECL, CT_NS
    );
    for (part, content_type) in overrides {
        out.push_str(&format!(
            "<Override PartName=\"{}\" ContentType=\"{}\"/>",
            part, content_type
        ));
    }
    out.push_str("</Types>");
    out
}

fn root_rels(target: &str) -> String {
    relationships(&[rel("rId1", "officeDocument", target)])
}

/// Word document with one paragraph per item.
pub fn docx(paragraphs: &[&str]) -> AppResult<Vec<u8>> {
    let mut body = String::new();
    for paragraph in paragraphs {
        body.push_str(&format!(
            "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            xml_escape(paragraph)
        ));
    }
    let document = format!(
        "{}<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/></w:sectPr></w:body></w:document>",
        XML_DECL, body
    );

    let mut zip = ZipPackage::new();
    zip.deflated(
        "[Content_Types].xml",
        content_types(&[(
            "/word/document.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        )])
        .as_bytes(),
    )?;
    zip.deflated("_rels/.rels", root_rels("word/document.xml").as_bytes())?;
    zip.deflated("word/document.xml", document.as_bytes())?;
    zip.finish()
}

/// Spreadsheet column letters: 0 -> A, 25 -> Z, 26 -> AA.
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Workbook with a single sheet of inline string cells.
pub fn xlsx(sheet_name: &str, rows: &[Vec<String>]) -> AppResult<Vec<u8>> {
    let mut sheet_data = String::new();
    for (r, row) in rows.iter().enumerate() {
        sheet_data.push_str(&format!("<row r=\"{}\">", r + 1));
        for (c, cell) in row.iter().enumerate() {
            sheet_data.push_str(&format!(
                "<c r=\"{}{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                column_name(c),
                r + 1,
                xml_escape(cell)
            ));
        }
        sheet_data.push_str("</row>");
    }
    let sheet = format!(
        "{}<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
         <sheetData>{}</sheetData></worksheet>",
        XML_DECL, sheet_data
    );
    let workbook = format!(
        "{}<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" xmlns:r=\"{}\">\
         <sheets><sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>",
        XML_DECL,
        DOC_REL,
        xml_escape(sheet_name)
    );

    let mut zip = ZipPackage::new();
    zip.deflated(
        "[Content_Types].xml",
        content_types(&[
            (
                "/xl/workbook.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
            ),
            (
                "/xl/worksheets/sheet1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
            ),
        ])
        .as_bytes(),
    )?;
    zip.deflated("_rels/.rels", root_rels("xl/workbook.xml").as_bytes())?;
    zip.deflated("xl/workbook.xml", workbook.as_bytes())?;
    zip.deflated(
        "xl/_rels/workbook.xml.rels",
        relationships(&[rel("rId1", "worksheet", "worksheets/sheet1.xml")]).as_bytes(),
    )?;
    zip.deflated("xl/worksheets/sheet1.xml", sheet.as_bytes())?;
    zip.finish()
}

const SLIDE_WIDTH: u64 = 9_144_000;
const SLIDE_HEIGHT: u64 = 6_858_000;

fn theme() -> String {
    let colors = [
        ("dk1", "000000"),
        ("lt1", "FFFFFF"),
        ("dk2", "1F497D"),
        ("lt2", "EEECE1"),
        ("accent1", "4F81BD"),
        ("accent2", "C0504D"),
        ("accent3", "9BBB59"),
        ("accent4", "8064A2"),
        ("accent5", "4BACC6"),
        ("accent6", "F79646"),
        ("hlink", "0000FF"),
        ("folHlink", "800080"),
    ];
    let scheme: String = colors
        .iter()
        .map(|(name, rgb)| format!("<a:{n}><a:srgbClr val=\"{}\"/></a:{n}>", rgb, n = name))
        .collect();
    let fill = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    let line = "<a:ln><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>";
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        "{decl}<a:theme xmlns:a=\"{ns}\" name=\"Office Theme\"><a:themeElements>\
         <a:clrScheme name=\"Office\">{scheme}</a:clrScheme>\
         <a:fontScheme name=\"Office\">\
         <a:majorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
         <a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
         </a:fontScheme>\
         <a:fmtScheme name=\"Office\">\
         <a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>\
         <a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>\
         <a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>\
         <a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst>\
         </a:fmtScheme></a:themeElements></a:theme>",
        decl = XML_DECL,
        ns = MAIN_NS,
        scheme = scheme,
        fill = fill,
        line = line,
        effect = effect
    )
}

fn empty_tree() -> &'static str {
    "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"
}

fn slide_master() -> String {
    format!(
        "{}<p:sldMaster xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">\
         <p:cSld><p:spTree>{}</p:spTree></p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" \
         accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
         </p:sldMaster>",
        XML_DECL,
        MAIN_NS,
        DOC_REL,
        PML_NS,
        empty_tree()
    )
}

fn slide_layout() -> String {
    format!(
        "{}<p:sldLayout xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\" type=\"blank\">\
         <p:cSld name=\"Blank\"><p:spTree>{}</p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>",
        XML_DECL,
        MAIN_NS,
        DOC_REL,
        PML_NS,
        empty_tree()
    )
}

fn slide(paragraphs: &[&str]) -> String {
    let text: String = paragraphs
        .iter()
        .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", xml_escape(p)))
        .collect();
    let text = if text.is_empty() { "<a:p/>".to_string() } else { text };

    format!(
        "{}<p:sld xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\"><p:cSld><p:spTree>{}\
         <p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"Text\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr><a:xfrm><a:off x=\"457200\" y=\"457200\"/><a:ext cx=\"8229600\" cy=\"5943600\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         <p:txBody><a:bodyPr wrap=\"square\"/><a:lstStyle/>{}</p:txBody></p:sp>\
         </p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
        XML_DECL,
        MAIN_NS,
        DOC_REL,
        PML_NS,
        empty_tree(),
        text
    )
}

/// Presentation with one slide per item; each slide holds one text box.
pub fn pptx(slides: &[Vec<&str>]) -> AppResult<Vec<u8>> {
    let slides: Vec<&[&str]> = if slides.is_empty() {
        vec![&[][..]]
    } else {
        slides.iter().map(Vec::as_slice).collect()
    };

    let mut overrides = vec![
        (
            "/ppt/presentation.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        ),
        (
            "/ppt/slideMasters/slideMaster1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
        ),
        (
            "/ppt/slideLayouts/slideLayout1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
        ),
        (
            "/ppt/theme/theme1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.theme+xml",
        ),
    ];
    for index in 1..=slides.len() {
        overrides.push((
            format!("/ppt/slides/slide{}.xml", index),
            "application/vnd.openxmlformats-officedocument.presentationml.slide+xml",
        ));
    }

    // rId1 is the master, rId2 the theme, slides follow.
    let mut presentation_rels = vec![
        rel("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        rel("rId2", "theme", "theme/theme1.xml"),
    ];
    let mut slide_ids = String::new();
    for index in 1..=slides.len() {
        let id = format!("rId{}", index + 2);
        slide_ids.push_str(&format!("<p:sldId id=\"{}\" r:id=\"{}\"/>", 255 + index, id));
        presentation_rels.push(rel(id, "slide", format!("slides/slide{}.xml", index)));
    }

    let presentation = format!(
        "{}<p:presentation xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{}</p:sldIdLst>\
         <p:sldSz cx=\"{}\" cy=\"{}\"/><p:notesSz cx=\"{}\" cy=\"{}\"/></p:presentation>",
        XML_DECL, MAIN_NS, DOC_REL, PML_NS, slide_ids, SLIDE_WIDTH, SLIDE_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH
    );

    let mut zip = ZipPackage::new();
    zip.deflated("[Content_Types].xml", content_types(&overrides).as_bytes())?;
    zip.deflated("_rels/.rels", root_rels("ppt/presentation.xml").as_bytes())?;
    zip.deflated("ppt/presentation.xml", presentation.as_bytes())?;
    zip.deflated(
        "ppt/_rels/presentation.xml.rels",
        relationships(&presentation_rels).as_bytes(),
    )?;
    zip.deflated("ppt/slideMasters/slideMaster1.xml", slide_master().as_bytes())?;
    zip.deflated(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        relationships(&[
            rel("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            rel("rId2", "theme", "../theme/theme1.xml"),
        ])
        .as_bytes(),
    )?;
    zip.deflated("ppt/slideLayouts/slideLayout1.xml", slide_layout().as_bytes())?;
    zip.deflated(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        relationships(&[rel("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).as_bytes(),
    )?;
    zip.deflated("ppt/theme/theme1.xml", theme().as_bytes())?;

    let slide_rels = relationships(&[rel("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]);
    for (index, paragraphs) in slides.iter().enumerate() {
        zip.deflated(
            &format!("ppt/slides/slide{}.xml", index + 1),
            slide(paragraphs).as_bytes(),
        )?;
        zip.deflated(
            &format!("ppt/slides/_rels/slide{}.xml.rels", index + 1),
            slide_rels.as_bytes(),
        )?;
    }
    zip.finish()
}
