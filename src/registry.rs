//! Route table of every registered file provider.

use crate::handlers::files;
use crate::providers::{archive, audio, data, document, image, text, FileProvider};
use crate::types::Category;
use crate::AppState;
use axum::routing::{post, MethodRouter};
use std::collections::BTreeMap;

/// One registered provider
pub struct ProviderEntry {
    pub name: &'static str,
    pub category: Category,
    pub summary: &'static str,
    route: fn() -> MethodRouter<AppState>,
}

impl ProviderEntry {
    fn of<P: FileProvider>(route: fn() -> MethodRouter<AppState>) -> Self {
        Self {
            name: P::NAME,
            category: P::CATEGORY,
            summary: P::SUMMARY,
            route,
        }
    }

    /// Route path, e.g. `/txt_file/`
    pub fn path(&self) -> String {
        format!("/{}/", self.name)
    }

    pub fn method_router(&self) -> MethodRouter<AppState> {
        (self.route)()
    }
}

/// Immutable, ordered table of providers, built once at startup
pub struct ProviderRegistry {
    entries: Vec<ProviderEntry>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        let entries = vec![
            ProviderEntry::of::<text::BinFile>(|| post(files::bin_file)),
            ProviderEntry::of::<data::CsvFile>(|| post(files::csv_file)),
            ProviderEntry::of::<document::DocxFile>(|| post(files::docx_file)),
            ProviderEntry::of::<archive::EmlFile>(|| post(files::eml_file)),
            ProviderEntry::of::<document::EpubFile>(|| post(files::epub_file)),
            ProviderEntry::of::<text::GenericFile>(|| post(files::generic_file)),
            ProviderEntry::of::<image::GraphicIcoFile>(|| post(files::graphic_ico_file)),
            ProviderEntry::of::<image::GraphicJpegFile>(|| post(files::graphic_jpeg_file)),
            ProviderEntry::of::<image::GraphicPdfFile>(|| post(files::graphic_pdf_file)),
            ProviderEntry::of::<image::GraphicPngFile>(|| post(files::graphic_png_file)),
            ProviderEntry::of::<image::GraphicWebpFile>(|| post(files::graphic_webp_file)),
            ProviderEntry::of::<image::IcoFile>(|| post(files::ico_file)),
            ProviderEntry::of::<image::JpegFile>(|| post(files::jpeg_file)),
            ProviderEntry::of::<data::JsonFile>(|| post(files::json_file)),
            ProviderEntry::of::<audio::Mp3File>(|| post(files::mp3_file)),
            ProviderEntry::of::<document::OdpFile>(|| post(files::odp_file)),
            ProviderEntry::of::<data::OdsFile>(|| post(files::ods_file)),
            ProviderEntry::of::<document::OdtFile>(|| post(files::odt_file)),
            ProviderEntry::of::<document::PdfFile>(|| post(files::pdf_file)),
            ProviderEntry::of::<image::PngFile>(|| post(files::png_file)),
            ProviderEntry::of::<document::PptxFile>(|| post(files::pptx_file)),
            ProviderEntry::of::<text::RtfFile>(|| post(files::rtf_file)),
            ProviderEntry::of::<image::SvgFile>(|| post(files::svg_file)),
            ProviderEntry::of::<archive::TarFile>(|| post(files::tar_file)),
            ProviderEntry::of::<text::TxtFile>(|| post(files::txt_file)),
            ProviderEntry::of::<data::XlsxFile>(|| post(files::xlsx_file)),
            ProviderEntry::of::<data::XmlFile>(|| post(files::xml_file)),
            ProviderEntry::of::<archive::ZipFile>(|| post(files::zip_file)),
        ];
        Self { entries }
    }

    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ProviderEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Route path to summary, as listed by `/providers/`
    pub fn summaries(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.path(), e.summary.to_string()))
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_every_provider_once() {
        let registry = ProviderRegistry::new();
        assert_eq!(registry.len(), 28);

        let names: HashSet<&str> = registry.entries().iter().map(|e| e.name).collect();
        assert_eq!(names.len(), registry.len());
        assert!(registry.entries().iter().all(|e| e.name.ends_with("_file")));
    }

    #[test]
    fn test_registry_is_sorted_by_name() {
        let registry = ProviderRegistry::new();
        let names: Vec<&str> = registry.entries().iter().map(|e| e.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_lookup_and_paths() {
        let registry = ProviderRegistry::new();
        let entry = registry.get("mp3_file").unwrap();
        assert_eq!(entry.category, Category::Audio);
        assert_eq!(entry.path(), "/mp3_file/");
        assert!(registry.get("gif_file").is_none());
    }

    #[test]
    fn test_summaries_keyed_by_path() {
        let summaries = ProviderRegistry::new().summaries();
        assert_eq!(summaries.len(), 28);
        assert_eq!(summaries.get("/txt_file/").map(String::as_str), Some("TXT file provider."));
    }
}
