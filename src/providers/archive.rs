//! Containers of other generated files: zip, tar and e-mail messages.

use super::{body, named, rows, FileProvider, Validate};
use crate::error::AppResult;
use crate::faker;
use crate::formats::archive::{self, ZipPackage};
use crate::formats::{mail, text};
use crate::types::{
    check_range, ArchiveOptions, Category, DataColumns, FileNaming, GeneratedFile, InnerFormat,
    TarCompression, TextOptions, DEFAULT_NUM_ROWS,
};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const INNER_TEXT_CHARS: usize = 1_000;
const MAX_SUBJECT_CHARS: usize = 200;

fn content_type(format: InnerFormat) -> &'static str {
    match format {
        InnerFormat::Txt => "text/plain",
        InnerFormat::Csv => "text/csv",
        InnerFormat::Json => "application/json",
        InnerFormat::Xml => "application/xml",
    }
}

/// A small file of the given kind, named after `prefix`.
fn inner_file<R: Rng + ?Sized>(
    rng: &mut R,
    format: InnerFormat,
    prefix: Option<&str>,
) -> AppResult<GeneratedFile> {
    let columns = DataColumns::name_and_address();
    let names: Vec<String> = columns.names().map(str::to_string).collect();

    let (extension, bytes) = match format {
        InnerFormat::Txt => ("txt", faker::text(rng, INNER_TEXT_CHARS).into_bytes()),
        InnerFormat::Csv => {
            let rows = rows(rng, &columns, DEFAULT_NUM_ROWS)?;
            ("csv", text::csv(Some(names.as_slice()), &rows)?)
        }
        InnerFormat::Json => {
            let rows = rows(rng, &columns, DEFAULT_NUM_ROWS)?;
            ("json", text::json(&names, &rows, Some(4))?)
        }
        InnerFormat::Xml => {
            let rows = rows(rng, &columns, DEFAULT_NUM_ROWS)?;
            ("xml", text::xml("root", "row", &names, &rows))
        }
    };

    Ok(GeneratedFile {
        filename: faker::file_name(rng, None, prefix, extension),
        bytes,
    })
}

fn inner_files<R: Rng + ?Sized>(rng: &mut R, options: &ArchiveOptions) -> AppResult<Vec<GeneratedFile>> {
    (0..options.count)
        .map(|_| inner_file(&mut *rng, options.inner_format, options.inner_prefix.as_deref()))
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ZipFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    pub options: ArchiveOptions,
}

impl Validate for ZipFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        self.options.validate()
    }
}

pub struct ZipFile;

impl FileProvider for ZipFile {
    const NAME: &'static str = "zip_file";
    const CATEGORY: Category = Category::Archive;
    const SUMMARY: &'static str = "ZIP file provider.";

    type Request = ZipFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let options = &request.options;
        let mut package = ZipPackage::new();
        let directory = options.directory.trim_matches('/');
        if !directory.is_empty() {
            package.directory(&format!("{}/", directory))?;
        }
        for file in inner_files(rng, options)? {
            package.deflated(&options.entry_path(&file.filename), &file.bytes)?;
        }
        Ok(named(rng, &request.naming, "zip", package.finish()?))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TarFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    pub options: ArchiveOptions,
    /// `"gz"` for a gzip-compressed archive, `null` for plain tar
    pub compression: Option<TarCompression>,
}

impl Validate for TarFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        self.options.validate()
    }
}

pub struct TarFile;

impl FileProvider for TarFile {
    const NAME: &'static str = "tar_file";
    const CATEGORY: Category = Category::Archive;
    const SUMMARY: &'static str = "TAR file provider.";

    type Request = TarFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let options = &request.options;
        let entries: Vec<(String, Vec<u8>)> = inner_files(rng, options)?
            .into_iter()
            .map(|file| (options.entry_path(&file.filename), file.bytes))
            .collect();

        let gzip = request.compression == Some(TarCompression::Gz);
        let mtime = Utc::now().timestamp().max(0) as u64;
        let bytes = archive::tar(&entries, gzip, mtime)?;
        let extension = if gzip { "tar.gz" } else { "tar" };
        Ok(named(rng, &request.naming, extension, bytes))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EmlFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    /// Message body
    #[serde(flatten)]
    pub text: TextOptions,
    /// Subject line; a random sentence when absent
    pub subject: Option<String>,
    /// Attachments
    pub options: ArchiveOptions,
}

impl Validate for EmlFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        self.text.validate()?;
        if let Some(subject) = &self.subject {
            check_range("subject length", subject.chars().count(), 0, MAX_SUBJECT_CHARS)?;
        }
        self.options.validate()
    }
}

pub struct EmlFile;

impl FileProvider for EmlFile {
    const NAME: &'static str = "eml_file";
    const CATEGORY: Category = Category::Archive;
    const SUMMARY: &'static str = "EML file provider.";

    type Request = EmlFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let content_type = content_type(request.options.inner_format);
        let attachments = inner_files(rng, &request.options)?
            .into_iter()
            .map(|file| mail::Attachment {
                filename: file.filename,
                content_type,
                bytes: file.bytes,
            })
            .collect();

        let subject = match &request.subject {
            Some(subject) => subject.clone(),
            None => faker::token_value("sentence", rng)?,
        };
        let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();

        let message = mail::Message {
            from: faker::token_value("email", rng)?,
            to: faker::token_value("email", rng)?,
            subject,
            date: Utc::now(),
            message_id: format!("{}@faker-file-api", id.simple()),
            boundary: format!("=_{}", id.simple()),
            body: body(rng, &request.text)?,
            attachments,
        };
        Ok(named(rng, &request.naming, "eml", mail::eml(&message)))
    }
}
