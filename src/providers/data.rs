//! Tabular and structured data files built from column templates.

use super::{column_names, named, rows, validate_columns, FileProvider, Validate};
use crate::error::AppResult;
use crate::formats;
use crate::types::{
    check_range, check_xml_name, Category, DataColumns, FileNaming, GeneratedFile,
    DEFAULT_NUM_ROWS,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request of the spreadsheet providers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TableFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    /// Column name to value template, in output order
    #[schema(value_type = Object)]
    pub data_columns: DataColumns,
    pub num_rows: usize,
    /// Write the column names as the first row
    pub include_header: bool,
    /// Prepend a 1-based row number column
    pub include_row_ids: bool,
}

impl Default for TableFileRequest {
    fn default() -> Self {
        Self {
            naming: FileNaming::default(),
            data_columns: DataColumns::name_and_address(),
            num_rows: DEFAULT_NUM_ROWS,
            include_header: true,
            include_row_ids: false,
        }
    }
}

impl Validate for TableFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        validate_columns(&self.data_columns, self.num_rows)
    }
}

impl TableFileRequest {
    /// Header (when requested) and rendered rows, row ids applied.
    fn table<R: Rng + ?Sized>(&self, rng: &mut R) -> AppResult<(Option<Vec<String>>, Vec<Vec<String>>)> {
        let mut header = column_names(&self.data_columns);
        let mut rows = rows(rng, &self.data_columns, self.num_rows)?;
        if self.include_row_ids {
            header.insert(0, "#".to_string());
            for (index, row) in rows.iter_mut().enumerate() {
                row.insert(0, (index + 1).to_string());
            }
        }
        Ok((self.include_header.then_some(header), rows))
    }

    fn sheet<R: Rng + ?Sized>(&self, rng: &mut R) -> AppResult<Vec<Vec<String>>> {
        let (header, mut rows) = self.table(rng)?;
        if let Some(header) = header {
            rows.insert(0, header);
        }
        Ok(rows)
    }
}

pub struct CsvFile;

impl FileProvider for CsvFile {
    const NAME: &'static str = "csv_file";
    const CATEGORY: Category = Category::Spreadsheet;
    const SUMMARY: &'static str = "CSV file provider.";

    type Request = TableFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let (header, rows) = request.table(rng)?;
        let bytes = formats::text::csv(header.as_deref(), &rows)?;
        Ok(named(rng, &request.naming, "csv", bytes))
    }
}

pub struct OdsFile;

impl FileProvider for OdsFile {
    const NAME: &'static str = "ods_file";
    const CATEGORY: Category = Category::Spreadsheet;
    const SUMMARY: &'static str = "ODS file provider.";

    type Request = TableFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let sheet = request.sheet(rng)?;
        let bytes = formats::odf::ods("Fake data", "Sheet1", &sheet)?;
        Ok(named(rng, &request.naming, "ods", bytes))
    }
}

pub struct XlsxFile;

impl FileProvider for XlsxFile {
    const NAME: &'static str = "xlsx_file";
    const CATEGORY: Category = Category::Spreadsheet;
    const SUMMARY: &'static str = "XLSX file provider.";

    type Request = TableFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let sheet = request.sheet(rng)?;
        let bytes = formats::ooxml::xlsx("Sheet1", &sheet)?;
        Ok(named(rng, &request.naming, "xlsx", bytes))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct JsonFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    #[schema(value_type = Object)]
    pub data_columns: DataColumns,
    pub num_rows: usize,
    /// Spaces per indentation level; `null` writes compact JSON
    pub indent: Option<usize>,
}

impl Default for JsonFileRequest {
    fn default() -> Self {
        Self {
            naming: FileNaming::default(),
            data_columns: DataColumns::name_and_address(),
            num_rows: DEFAULT_NUM_ROWS,
            indent: Some(4),
        }
    }
}

impl Validate for JsonFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        validate_columns(&self.data_columns, self.num_rows)?;
        if let Some(indent) = self.indent {
            check_range("indent", indent, 0, 16)?;
        }
        Ok(())
    }
}

pub struct JsonFile;

impl FileProvider for JsonFile {
    const NAME: &'static str = "json_file";
    const CATEGORY: Category = Category::Data;
    const SUMMARY: &'static str = "JSON file provider.";

    type Request = JsonFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let rows = rows(rng, &request.data_columns, request.num_rows)?;
        let columns = column_names(&request.data_columns);
        let bytes = formats::text::json(&columns, &rows, request.indent)?;
        Ok(named(rng, &request.naming, "json", bytes))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct XmlFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    /// Column element name to value template
    #[schema(value_type = Object)]
    pub data_columns: DataColumns,
    pub num_rows: usize,
    pub root_element: String,
    pub row_element: String,
}

impl Default for XmlFileRequest {
    fn default() -> Self {
        Self {
            naming: FileNaming::default(),
            data_columns: DataColumns::name_and_address(),
            num_rows: DEFAULT_NUM_ROWS,
            root_element: "root".to_string(),
            row_element: "row".to_string(),
        }
    }
}

impl Validate for XmlFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        validate_columns(&self.data_columns, self.num_rows)?;
        check_xml_name("root_element", &self.root_element)?;
        check_xml_name("row_element", &self.row_element)?;
        for column in self.data_columns.names() {
            check_xml_name("data_columns", column)?;
        }
        Ok(())
    }
}

pub struct XmlFile;

impl FileProvider for XmlFile {
    const NAME: &'static str = "xml_file";
    const CATEGORY: Category = Category::Data;
    const SUMMARY: &'static str = "XML file provider.";

    type Request = XmlFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let rows = rows(rng, &request.data_columns, request.num_rows)?;
        let columns = column_names(&request.data_columns);
        let bytes = formats::text::xml(&request.root_element, &request.row_element, &columns, &rows);
        Ok(named(rng, &request.naming, "xml", bytes))
    }
}
