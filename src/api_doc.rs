use crate::error::ErrorBody;
use crate::handlers::{files, meta, HeartbeatResponse, ProvidersResponse};
use crate::observability::{self, MetricsResponse};
use crate::providers::archive::{EmlFileRequest, TarFileRequest, ZipFileRequest};
use crate::providers::audio::Mp3FileRequest;
use crate::providers::data::{JsonFileRequest, TableFileRequest, XmlFileRequest};
use crate::providers::document::{EpubFileRequest, PdfFileRequest};
use crate::providers::image::{GraphicFileRequest, GraphicIcoFileRequest, ImageFileRequest};
use crate::providers::text::{BinFileRequest, GenericFileRequest, TextFileRequest};
use crate::types::{
    ArchiveOptions, Category, FileNaming, Hue, ImageGenerator, InnerFormat, Luminosity,
    Mp3Generator, PdfGenerator, TarCompression, TextOptions,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        meta::heartbeat,
        meta::providers,
        observability::metrics_handler,
        files::bin_file,
        files::csv_file,
        files::docx_file,
        files::eml_file,
        files::epub_file,
        files::generic_file,
        files::graphic_ico_file,
        files::graphic_jpeg_file,
        files::graphic_pdf_file,
        files::graphic_png_file,
        files::graphic_webp_file,
        files::ico_file,
        files::jpeg_file,
        files::json_file,
        files::mp3_file,
        files::odp_file,
        files::ods_file,
        files::odt_file,
        files::pdf_file,
        files::png_file,
        files::pptx_file,
        files::rtf_file,
        files::svg_file,
        files::tar_file,
        files::txt_file,
        files::xlsx_file,
        files::xml_file,
        files::zip_file
    ),
    components(schemas(
        ErrorBody,
        HeartbeatResponse,
        ProvidersResponse,
        MetricsResponse,
        Category,
        FileNaming,
        TextOptions,
        ArchiveOptions,
        InnerFormat,
        ImageGenerator,
        PdfGenerator,
        Mp3Generator,
        Hue,
        Luminosity,
        TarCompression,
        TextFileRequest,
        BinFileRequest,
        GenericFileRequest,
        TableFileRequest,
        JsonFileRequest,
        XmlFileRequest,
        PdfFileRequest,
        EpubFileRequest,
        ImageFileRequest,
        GraphicFileRequest,
        GraphicIcoFileRequest,
        Mp3FileRequest,
        ZipFileRequest,
        TarFileRequest,
        EmlFileRequest
    )),
    tags(
        (name = "Service", description = "Liveness, provider listing and metrics"),
        (name = "Archive", description = "Archives and e-mail messages"),
        (name = "Audio", description = "Audio files"),
        (name = "Binary", description = "Random binary files"),
        (name = "Data", description = "Structured data files"),
        (name = "Generic", description = "Files with a caller-chosen extension"),
        (name = "Image", description = "Raster and vector images"),
        (name = "Presentation", description = "Slide decks"),
        (name = "Publishing", description = "PDF and EPUB documents"),
        (name = "Rich Text", description = "Word processing documents"),
        (name = "Spreadsheet", description = "Tabular files"),
        (name = "Text", description = "Plain text files")
    ),
    info(
        title = "faker-file-api",
        description = "Generate fake files of many formats over HTTP",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ProviderRegistry;

    #[test]
    fn test_document_lists_every_provider_route() {
        let doc = ApiDoc::openapi();
        for entry in ProviderRegistry::new().entries() {
            let item = doc
                .paths
                .paths
                .get(&entry.path())
                .unwrap_or_else(|| panic!("{} missing from OpenAPI document", entry.path()));
            let post = item.post.as_ref().unwrap();
            let tags = post.tags.as_ref().unwrap();
            assert_eq!(tags, &vec![entry.category.label().to_string()], "{}", entry.name);
        }
    }

    #[test]
    fn test_document_lists_service_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/heartbeat/", "/providers/", "/metrics"] {
            assert!(doc.paths.paths.contains_key(path), "{}", path);
        }
    }
}
