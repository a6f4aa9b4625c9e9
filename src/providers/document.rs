//! Word processing, presentation and publishing documents.

use super::text::TextFileRequest;
use super::{body, named, FileProvider, Validate};
use crate::error::AppResult;
use crate::faker;
use crate::formats::{self, epub, layout, paragraphs, pdf, raster};
use crate::types::{Category, FileNaming, GeneratedFile, ImageGenerator, PdfGenerator, TextOptions};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Width of the page image embedded by the raster PDF backend.
const RASTER_PAGE_WIDTH: u32 = 800;

pub struct DocxFile;

impl FileProvider for DocxFile {
    const NAME: &'static str = "docx_file";
    const CATEGORY: Category = Category::RichText;
    const SUMMARY: &'static str = "DOCX file provider.";

    type Request = TextFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        let paragraphs: Vec<&str> = paragraphs(&text).collect();
        let bytes = formats::ooxml::docx(&paragraphs)?;
        Ok(named(rng, &request.naming, "docx", bytes))
    }
}

pub struct OdtFile;

impl FileProvider for OdtFile {
    const NAME: &'static str = "odt_file";
    const CATEGORY: Category = Category::RichText;
    const SUMMARY: &'static str = "ODT file provider.";

    type Request = TextFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        let paragraphs: Vec<&str> = paragraphs(&text).collect();
        let bytes = formats::odf::odt("Fake document", &paragraphs)?;
        Ok(named(rng, &request.naming, "odt", bytes))
    }
}

/// One slide per paragraph
fn slides(text: &str) -> Vec<Vec<&str>> {
    paragraphs(text).map(|p| vec![p]).collect()
}

pub struct OdpFile;

impl FileProvider for OdpFile {
    const NAME: &'static str = "odp_file";
    const CATEGORY: Category = Category::Presentation;
    const SUMMARY: &'static str = "ODP file provider.";

    type Request = TextFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        let bytes = formats::odf::odp("Fake presentation", &slides(&text))?;
        Ok(named(rng, &request.naming, "odp", bytes))
    }
}

pub struct PptxFile;

impl FileProvider for PptxFile {
    const NAME: &'static str = "pptx_file";
    const CATEGORY: Category = Category::Presentation;
    const SUMMARY: &'static str = "PPTX file provider.";

    type Request = TextFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        let bytes = formats::ooxml::pptx(&slides(&text))?;
        Ok(named(rng, &request.naming, "pptx", bytes))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PdfFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    #[serde(flatten)]
    pub text: TextOptions,
    pub pdf_generator: PdfGenerator,
}

impl Validate for PdfFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        self.text.validate()
    }
}

pub struct PdfFile;

impl FileProvider for PdfFile {
    const NAME: &'static str = "pdf_file";
    const CATEGORY: Category = Category::Publishing;
    const SUMMARY: &'static str = "PDF file provider.";

    type Request = PdfFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        let bytes = match request.pdf_generator {
            PdfGenerator::Text => {
                let wrapped = faker::wrap(&text, pdf::LINE_CHARS);
                let lines: Vec<&str> = wrapped.lines().collect();
                pdf::text_document(&lines, None)
            }
            PdfGenerator::Raster => {
                let page = layout::layout(&text, RASTER_PAGE_WIDTH);
                let image = raster::render_page(&page, ImageGenerator::Greeked);
                let (width, height) = image.dimensions();
                let jpeg = raster::encode(image, raster::RasterFormat::Jpeg)?;
                pdf::image_document(&jpeg, width, height, None)
            }
        };
        Ok(named(rng, &request.naming, "pdf", bytes))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EpubFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    #[serde(flatten)]
    pub text: TextOptions,
    /// Book title; a random sentence when absent
    pub title: Option<String>,
    /// Title of the single chapter (default: `Chapter 1`)
    pub chapter_title: Option<String>,
}

impl Validate for EpubFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        self.text.validate()
    }
}

pub struct EpubFile;

impl FileProvider for EpubFile {
    const NAME: &'static str = "epub_file";
    const CATEGORY: Category = Category::Publishing;
    const SUMMARY: &'static str = "EPUB file provider.";

    type Request = EpubFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        let title = match &request.title {
            Some(title) => title.clone(),
            None => faker::token_value("sentence", rng)?,
        };
        let identifier = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();

        let book = epub::Book {
            identifier: format!("urn:uuid:{}", identifier),
            title: &title,
            language: "en",
            modified: Utc::now(),
            chapters: vec![epub::Chapter {
                title: request.chapter_title.as_deref().unwrap_or("Chapter 1"),
                paragraphs: paragraphs(&text).collect(),
            }],
        };
        let bytes = epub::epub(&book)?;
        Ok(named(rng, &request.naming, "epub", bytes))
    }
}
