use crate::error::{AppError, AppResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use utoipa::ToSchema;

/// Provider category, used as the OpenAPI tag of its route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Category {
    #[serde(rename = "Binary")]
    Binary,
    #[serde(rename = "Rich Text")]
    RichText,
    #[serde(rename = "Image")]
    Image,
    #[serde(rename = "Spreadsheet")]
    Spreadsheet,
    #[serde(rename = "Archive")]
    Archive,
    #[serde(rename = "Publishing")]
    Publishing,
    #[serde(rename = "Markup")]
    Markup,
    #[serde(rename = "Data")]
    Data,
    #[serde(rename = "Generic")]
    Generic,
    #[serde(rename = "Audio")]
    Audio,
    #[serde(rename = "Presentation")]
    Presentation,
    #[serde(rename = "Text")]
    Text,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Binary => "Binary",
            Category::RichText => "Rich Text",
            Category::Image => "Image",
            Category::Spreadsheet => "Spreadsheet",
            Category::Archive => "Archive",
            Category::Publishing => "Publishing",
            Category::Markup => "Markup",
            Category::Data => "Data",
            Category::Generic => "Generic",
            Category::Audio => "Audio",
            Category::Presentation => "Presentation",
            Category::Text => "Text",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A generated file, ready to be streamed
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// File naming parameters shared by every provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FileNaming {
    /// File name without extension; a random name is used when absent
    pub basename: Option<String>,
    /// Prefix of the random file name (default: `tmp`)
    pub prefix: Option<String>,
}

impl FileNaming {
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [("basename", &self.basename), ("prefix", &self.prefix)] {
            if let Some(value) = value {
                if value.contains(['/', '\\']) || value.contains("..") {
                    return Err(AppError::validation(format!(
                        "{} must not contain path separators",
                        field
                    )));
                }
                if value.chars().count() > 200 {
                    return Err(AppError::validation(format!("{} is too long", field)));
                }
            }
        }
        if matches!(self.basename.as_deref(), Some("")) {
            return Err(AppError::validation("basename must not be empty"));
        }
        Ok(())
    }
}

pub const DEFAULT_MAX_NB_CHARS: usize = 10_000;
pub const MAX_NB_CHARS_LIMIT: usize = 1_000_000;

/// Text content parameters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TextOptions {
    /// Upper bound of generated text length, in characters
    pub max_nb_chars: usize,
    /// Hard-wrap lines after this many characters
    pub wrap_chars_after: Option<usize>,
    /// Template used instead of random text, e.g. `"Hello {{name}}"`
    pub content: Option<String>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            max_nb_chars: DEFAULT_MAX_NB_CHARS,
            wrap_chars_after: None,
            content: None,
        }
    }
}

impl TextOptions {
    pub fn with_max_nb_chars(max_nb_chars: usize) -> Self {
        Self {
            max_nb_chars,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        check_range("max_nb_chars", self.max_nb_chars, 1, MAX_NB_CHARS_LIMIT)?;
        if let Some(width) = self.wrap_chars_after {
            check_range("wrap_chars_after", width, 1, 10_000)?;
        }
        Ok(())
    }
}

/// Ordered mapping of column name to value template
///
/// Deserialized from a JSON object; the order of keys is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataColumns(pub Vec<(String, String)>);

impl DataColumns {
    pub fn new<K: Into<String>, V: Into<String>>(columns: impl IntoIterator<Item = (K, V)>) -> Self {
        Self(
            columns
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Default columns of the data providers
    pub fn name_and_address() -> Self {
        Self::new([("name", "{{name}}"), ("address", "{{address}}")])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for DataColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DataColumns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColumnsVisitor;

        impl<'de> Visitor<'de> for ColumnsVisitor {
            type Value = DataColumns;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping column names to templates")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut columns = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    columns.push((k, v));
                }
                Ok(DataColumns(columns))
            }
        }

        deserializer.deserialize_map(ColumnsVisitor)
    }
}

/// Row count parameters of the data providers
pub const DEFAULT_NUM_ROWS: usize = 10;
pub const NUM_ROWS_LIMIT: usize = 10_000;

/// Kind of the files placed inside archives and e-mails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InnerFormat {
    #[default]
    Txt,
    Csv,
    Json,
    Xml,
}

/// Options of the archive providers and e-mail attachments
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ArchiveOptions {
    /// Number of inner files
    pub count: usize,
    /// Directory the inner files are placed in
    pub directory: String,
    /// Format of the inner files
    pub inner_format: InnerFormat,
    /// Prefix of the inner file names
    pub inner_prefix: Option<String>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            count: 5,
            directory: String::new(),
            inner_format: InnerFormat::Txt,
            inner_prefix: None,
        }
    }
}

impl ArchiveOptions {
    pub fn validate(&self) -> AppResult<()> {
        check_range("options.count", self.count, 1, 100)?;
        if self.directory.starts_with('/') || self.directory.split('/').any(|p| p == "..") {
            return Err(AppError::validation(
                "options.directory must be a relative path",
            ));
        }
        if let Some(prefix) = &self.inner_prefix {
            if prefix.contains(['/', '\\']) {
                return Err(AppError::validation(
                    "options.inner_prefix must not contain path separators",
                ));
            }
        }
        Ok(())
    }

    /// Path of an inner file inside the archive
    pub fn entry_path(&self, filename: &str) -> String {
        let directory = self.directory.trim_matches('/');
        if directory.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", directory, filename)
        }
    }
}

/// Renderer used by the text-to-image providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageGenerator {
    /// Words drawn as filled bars
    #[default]
    Greeked,
    /// Words drawn as stroked boxes
    Outline,
}

/// Renderer used by the PDF provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PdfGenerator {
    /// Real text drawn with the Helvetica base font
    #[default]
    Text,
    /// Greeked text rendered to a JPEG and embedded as an image
    Raster,
}

/// Encoder profile used by the MP3 provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mp3Generator {
    /// MPEG-1 Layer III, 128 kbit/s, 44.1 kHz
    #[default]
    #[serde(rename = "cbr_128k")]
    Cbr128k,
    /// MPEG-2 Layer III, 32 kbit/s, 22.05 kHz
    #[serde(rename = "cbr_32k")]
    Cbr32k,
}

/// Hue family of generated graphics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Hue {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Monochrome,
}

/// Brightness family of generated graphics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Luminosity {
    Bright,
    Dark,
    Light,
    Random,
}

/// Compression applied to tar archives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TarCompression {
    Gz,
}

/// Fail with a validation error unless `min <= value <= max`
pub fn check_range(field: &str, value: usize, min: usize, max: usize) -> AppResult<()> {
    if value < min || value > max {
        return Err(AppError::validation(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

/// Fail unless `name` can be used as an XML element name
pub fn check_xml_name(field: &str, name: &str) -> AppResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')),
        _ => false,
    };
    if !valid || name.to_ascii_lowercase().starts_with("xml") {
        return Err(AppError::validation(format!(
            "{} '{}' is not a valid XML element name",
            field, name
        )));
    }
    Ok(())
}
