//! Plain text, rich text, generic and binary files.

use super::{body, named, FileProvider, Validate};
use crate::error::{AppError, AppResult};
use crate::faker;
use crate::formats;
use crate::types::{check_range, Category, FileNaming, GeneratedFile, TextOptions};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request of text-bearing providers that take no extra options
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TextFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    #[serde(flatten)]
    pub text: TextOptions,
}

impl Validate for TextFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        self.text.validate()
    }
}

pub struct TxtFile;

impl FileProvider for TxtFile {
    const NAME: &'static str = "txt_file";
    const CATEGORY: Category = Category::Text;
    const SUMMARY: &'static str = "TXT file provider.";

    type Request = TextFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        Ok(named(rng, &request.naming, "txt", text.into_bytes()))
    }
}

pub struct RtfFile;

impl FileProvider for RtfFile {
    const NAME: &'static str = "rtf_file";
    const CATEGORY: Category = Category::RichText;
    const SUMMARY: &'static str = "RTF file provider.";

    type Request = TextFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        Ok(named(rng, &request.naming, "rtf", formats::text::rtf(&text)))
    }
}

pub const DEFAULT_BIN_LENGTH: usize = 1024 * 1024;
pub const MAX_BIN_LENGTH: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BinFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    /// Number of random bytes
    pub length: usize,
}

impl Default for BinFileRequest {
    fn default() -> Self {
        Self {
            naming: FileNaming::default(),
            length: DEFAULT_BIN_LENGTH,
        }
    }
}

impl Validate for BinFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        check_range("length", self.length, 1, MAX_BIN_LENGTH)
    }
}

pub struct BinFile;

impl FileProvider for BinFile {
    const NAME: &'static str = "bin_file";
    const CATEGORY: Category = Category::Binary;
    const SUMMARY: &'static str = "BIN file provider.";

    type Request = BinFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let mut bytes = vec![0u8; request.length];
        rng.fill(&mut bytes[..]);
        Ok(named(rng, &request.naming, "bin", bytes))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GenericFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    /// Template written verbatim after token substitution
    pub content: String,
    /// File extension without the dot
    pub extension: String,
}

impl Default for GenericFileRequest {
    fn default() -> Self {
        Self {
            naming: FileNaming::default(),
            content: "{{paragraph}}".to_string(),
            extension: "txt".to_string(),
        }
    }
}

impl Validate for GenericFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        if self.extension.is_empty()
            || self.extension.len() > 10
            || !self.extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(AppError::validation(
                "extension must be 1 to 10 alphanumeric characters",
            ));
        }
        check_range(
            "content length",
            self.content.chars().count(),
            0,
            crate::types::MAX_NB_CHARS_LIMIT,
        )
    }
}

pub struct GenericFile;

impl FileProvider for GenericFile {
    const NAME: &'static str = "generic_file";
    const CATEGORY: Category = Category::Generic;
    const SUMMARY: &'static str = "Generic file provider.";

    type Request = GenericFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let content = faker::render_template(&request.content, rng)?;
        Ok(named(rng, &request.naming, &request.extension, content.into_bytes()))
    }
}
