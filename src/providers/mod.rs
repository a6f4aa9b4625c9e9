//! File providers: one request type and one generator per route.

pub mod archive;
pub mod audio;
pub mod data;
pub mod document;
pub mod image;
pub mod text;

use crate::error::{AppError, AppResult};
use crate::faker;
use crate::types::{check_range, Category, DataColumns, FileNaming, GeneratedFile, TextOptions};
use rand::Rng;
use serde::de::DeserializeOwned;

/// Request validation beyond what deserialization checks
pub trait Validate {
    fn validate(&self) -> AppResult<()>;
}

/// A fake-file generator exposed as `POST /<NAME>/`
pub trait FileProvider {
    /// Route name, e.g. `txt_file`
    const NAME: &'static str;
    const CATEGORY: Category;
    /// One-line description listed by `/providers/`
    const SUMMARY: &'static str;

    type Request: DeserializeOwned + Validate + Send + 'static;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile>;
}

/// Name the generated bytes after the request's naming options.
pub(crate) fn named<R: Rng + ?Sized>(
    rng: &mut R,
    naming: &FileNaming,
    extension: &str,
    bytes: Vec<u8>,
) -> GeneratedFile {
    GeneratedFile {
        filename: faker::file_name(
            rng,
            naming.basename.as_deref(),
            naming.prefix.as_deref(),
            extension,
        ),
        bytes,
    }
}

pub(crate) fn body<R: Rng + ?Sized>(rng: &mut R, text: &TextOptions) -> AppResult<String> {
    faker::body_text(
        rng,
        text.content.as_deref(),
        text.max_nb_chars,
        text.wrap_chars_after,
    )
}

pub(crate) const MAX_COLUMNS: usize = 100;

pub(crate) fn validate_columns(columns: &DataColumns, num_rows: usize) -> AppResult<()> {
    if columns.is_empty() {
        return Err(AppError::validation("data_columns must not be empty"));
    }
    check_range("data_columns", columns.len(), 1, MAX_COLUMNS)?;
    check_range("num_rows", num_rows, 1, crate::types::NUM_ROWS_LIMIT)
}

/// Render `num_rows` rows, one rendered template per column.
///
/// All cells together share the [`faker::MAX_RENDERED_BYTES`] budget.
pub(crate) fn rows<R: Rng + ?Sized>(
    rng: &mut R,
    columns: &DataColumns,
    num_rows: usize,
) -> AppResult<Vec<Vec<String>>> {
    let mut remaining = faker::MAX_RENDERED_BYTES;
    let mut rows = Vec::with_capacity(num_rows);

    for _ in 0..num_rows {
        let mut row = Vec::with_capacity(columns.len());
        for template in columns.templates() {
            let cell = faker::render_bounded(template, &mut *rng, remaining)?;
            remaining -= cell.len();
            row.push(cell);
        }
        rows.push(row);
    }
    Ok(rows)
}

pub(crate) fn column_names(columns: &DataColumns) -> Vec<String> {
    columns.names().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rows_follow_columns() {
        let mut rng = StdRng::seed_from_u64(11);
        let columns = DataColumns::new([("id", "{{pyint}}"), ("fixed", "constant")]);
        let rows = rows(&mut rng, &columns, 3).unwrap();
        assert_eq!(rows.len(), 3);
        for row in rows {
            assert_eq!(row.len(), 2);
            assert!(row[0].parse::<u32>().is_ok());
            assert_eq!(row[1], "constant");
        }
    }

    #[test]
    fn test_rows_reject_unknown_tokens() {
        let mut rng = StdRng::seed_from_u64(12);
        let columns = DataColumns::new([("x", "{{nope}}")]);
        assert_eq!(rows(&mut rng, &columns, 1).unwrap_err().kind(), "TemplateError");
    }

    #[test]
    fn test_rows_share_one_output_budget() {
        let mut rng = StdRng::seed_from_u64(12);
        let template = "{{paragraph}}".repeat(20);
        let columns = DataColumns::new((0..10).map(|i| (format!("c{}", i), template.clone())));
        let err = rows(&mut rng, &columns, crate::types::NUM_ROWS_LIMIT).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
        assert!(err.to_string().contains("exceeds the limit"));
    }

    #[test]
    fn test_validate_columns() {
        assert!(validate_columns(&DataColumns::name_and_address(), 10).is_ok());
        assert!(validate_columns(&DataColumns::new(Vec::<(String, String)>::new()), 10).is_err());
        assert!(validate_columns(&DataColumns::name_and_address(), 0).is_err());
        assert!(validate_columns(&DataColumns::name_and_address(), 10_001).is_err());
    }

    #[test]
    fn test_named_uses_basename() {
        let mut rng = StdRng::seed_from_u64(13);
        let naming = FileNaming {
            basename: Some("out".to_string()),
            prefix: None,
        };
        assert_eq!(named(&mut rng, &naming, "txt", Vec::new()).filename, "out.txt");
    }
}
