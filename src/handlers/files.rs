//! One POST handler per provider; all of them delegate to [`serve`].

use crate::error::{AppError, AppResult, ErrorBody, Payload};
use crate::providers::archive::{EmlFile, EmlFileRequest, TarFile, TarFileRequest, ZipFile, ZipFileRequest};
use crate::providers::audio::{Mp3File, Mp3FileRequest};
use crate::providers::data::{
    CsvFile, JsonFile, JsonFileRequest, OdsFile, TableFileRequest, XlsxFile, XmlFile, XmlFileRequest,
};
use crate::providers::document::{
    DocxFile, EpubFile, EpubFileRequest, OdpFile, OdtFile, PdfFile, PdfFileRequest, PptxFile,
};
use crate::providers::image::{
    GraphicFileRequest, GraphicIcoFile, GraphicIcoFileRequest, GraphicJpegFile, GraphicPdfFile,
    GraphicPngFile, GraphicWebpFile, IcoFile, ImageFileRequest, JpegFile, PngFile, SvgFile,
};
use crate::providers::text::{
    BinFile, BinFileRequest, GenericFile, GenericFileRequest, RtfFile, TextFileRequest, TxtFile,
};
use crate::providers::{FileProvider, Validate};
use crate::types::GeneratedFile;
use crate::AppState;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue,
    },
    response::{IntoResponse, Response},
};
use futures_util::stream;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::convert::Infallible;
use tracing::{debug, info};

/// Generated file streamed back as `application/octet-stream`
pub struct FileResponse {
    filename: String,
    bytes: Bytes,
    chunk_size: usize,
}

impl FileResponse {
    pub fn new(file: GeneratedFile, chunk_size: usize) -> Self {
        Self {
            filename: file.filename,
            bytes: Bytes::from(file.bytes),
            chunk_size: chunk_size.max(1),
        }
    }

    fn chunks(&self) -> Vec<Result<Bytes, Infallible>> {
        let len = self.bytes.len();
        (0..len)
            .step_by(self.chunk_size)
            .map(|start| Ok(self.bytes.slice(start..(start + self.chunk_size).min(len))))
            .collect()
    }
}

impl IntoResponse for FileResponse {
    fn into_response(self) -> Response {
        let disposition = HeaderValue::from_str(&format!("inline; filename={}", self.filename))
            .unwrap_or_else(|_| HeaderValue::from_static("inline"));
        let body = Body::from_stream(stream::iter(self.chunks()));

        (
            [
                (CONTENT_TYPE, HeaderValue::from_static("application/octet-stream")),
                (CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response()
    }
}

/// Validate the request, generate on the blocking pool and stream the result.
async fn serve<P: FileProvider + 'static>(
    state: &AppState,
    request: P::Request,
) -> AppResult<FileResponse> {
    state.metrics.increment_requests().await;

    match generate::<P>(request).await {
        Ok(file) => {
            state.metrics.increment_success().await;
            state.metrics.record_file(file.bytes.len()).await;
            info!(
                provider = P::NAME,
                filename = %file.filename,
                bytes = file.bytes.len(),
                "Generated file"
            );
            Ok(FileResponse::new(file, state.settings.limits.stream_chunk_bytes))
        }
        Err(err) => {
            state.metrics.increment_failure().await;
            Err(err)
        }
    }
}

async fn generate<P: FileProvider + 'static>(request: P::Request) -> AppResult<GeneratedFile> {
    request.validate()?;
    debug!(provider = P::NAME, "Generating file");

    tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::from_entropy();
        P::generate(&request, &mut rng)
    })
    .await
    .map_err(|e| AppError::generation(format!("{} task failed: {}", P::NAME, e)))?
}

/// BIN file provider.
#[utoipa::path(
    post,
    path = "/bin_file/",
    request_body = BinFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Binary"
)]
pub async fn bin_file(
    State(state): State<AppState>,
    Payload(request): Payload<BinFileRequest>,
) -> AppResult<FileResponse> {
    serve::<BinFile>(&state, request).await
}

/// CSV file provider.
#[utoipa::path(
    post,
    path = "/csv_file/",
    request_body = TableFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Spreadsheet"
)]
pub async fn csv_file(
    State(state): State<AppState>,
    Payload(request): Payload<TableFileRequest>,
) -> AppResult<FileResponse> {
    serve::<CsvFile>(&state, request).await
}

/// DOCX file provider.
#[utoipa::path(
    post,
    path = "/docx_file/",
    request_body = TextFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Rich Text"
)]
pub async fn docx_file(
    State(state): State<AppState>,
    Payload(request): Payload<TextFileRequest>,
) -> AppResult<FileResponse> {
    serve::<DocxFile>(&state, request).await
}

/// EML file provider.
#[utoipa::path(
    post,
    path = "/eml_file/",
    request_body = EmlFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Archive"
)]
pub async fn eml_file(
    State(state): State<AppState>,
    Payload(request): Payload<EmlFileRequest>,
) -> AppResult<FileResponse> {
    serve::<EmlFile>(&state, request).await
}

/// EPUB file provider.
#[utoipa::path(
    post,
    path = "/epub_file/",
    request_body = EpubFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Publishing"
)]
pub async fn epub_file(
    State(state): State<AppState>,
    Payload(request): Payload<EpubFileRequest>,
) -> AppResult<FileResponse> {
    serve::<EpubFile>(&state, request).await
}

/// Generic file provider.
#[utoipa::path(
    post,
    path = "/generic_file/",
    request_body = GenericFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Generic"
)]
pub async fn generic_file(
    State(state): State<AppState>,
    Payload(request): Payload<GenericFileRequest>,
) -> AppResult<FileResponse> {
    serve::<GenericFile>(&state, request).await
}

/// Graphic ICO file provider.
#[utoipa::path(
    post,
    path = "/graphic_ico_file/",
    request_body = GraphicIcoFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Image"
)]
pub async fn graphic_ico_file(
    State(state): State<AppState>,
    Payload(request): Payload<GraphicIcoFileRequest>,
) -> AppResult<FileResponse> {
    serve::<GraphicIcoFile>(&state, request).await
}

/// Graphic JPEG file provider.
#[utoipa::path(
    post,
    path = "/graphic_jpeg_file/",
    request_body = GraphicFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Image"
)]
pub async fn graphic_jpeg_file(
    State(state): State<AppState>,
    Payload(request): Payload<GraphicFileRequest>,
) -> AppResult<FileResponse> {
    serve::<GraphicJpegFile>(&state, request).await
}

/// Graphic PDF file provider.
#[utoipa::path(
    post,
    path = "/graphic_pdf_file/",
    request_body = GraphicFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Publishing"
)]
pub async fn graphic_pdf_file(
    State(state): State<AppState>,
    Payload(request): Payload<GraphicFileRequest>,
) -> AppResult<FileResponse> {
    serve::<GraphicPdfFile>(&state, request).await
}

/// Graphic PNG file provider.
#[utoipa::path(
    post,
    path = "/graphic_png_file/",
    request_body = GraphicFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Image"
)]
pub async fn graphic_png_file(
    State(state): State<AppState>,
    Payload(request): Payload<GraphicFileRequest>,
) -> AppResult<FileResponse> {
    serve::<GraphicPngFile>(&state, request).await
}

/// Graphic WEBP file provider.
#[utoipa::path(
    post,
    path = "/graphic_webp_file/",
    request_body = GraphicFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Image"
)]
pub async fn graphic_webp_file(
    State(state): State<AppState>,
    Payload(request): Payload<GraphicFileRequest>,
) -> AppResult<FileResponse> {
    serve::<GraphicWebpFile>(&state, request).await
}

/// ICO file provider.
#[utoipa::path(
    post,
    path = "/ico_file/",
    request_body = ImageFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Image"
)]
pub async fn ico_file(
    State(state): State<AppState>,
    Payload(request): Payload<ImageFileRequest>,
) -> AppResult<FileResponse> {
    serve::<IcoFile>(&state, request).await
}

/// JPEG file provider.
#[utoipa::path(
    post,
    path = "/jpeg_file/",
    request_body = ImageFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Image"
)]
pub async fn jpeg_file(
    State(state): State<AppState>,
    Payload(request): Payload<ImageFileRequest>,
) -> AppResult<FileResponse> {
    serve::<JpegFile>(&state, request).await
}

/// JSON file provider.
#[utoipa::path(
    post,
    path = "/json_file/",
    request_body = JsonFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Data"
)]
pub async fn json_file(
    State(state): State<AppState>,
    Payload(request): Payload<JsonFileRequest>,
) -> AppResult<FileResponse> {
    serve::<JsonFile>(&state, request).await
}

/// MP3 file provider.
#[utoipa::path(
    post,
    path = "/mp3_file/",
    request_body = Mp3FileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Audio"
)]
pub async fn mp3_file(
    State(state): State<AppState>,
    Payload(request): Payload<Mp3FileRequest>,
) -> AppResult<FileResponse> {
    serve::<Mp3File>(&state, request).await
}

/// ODP file provider.
#[utoipa::path(
    post,
    path = "/odp_file/",
    request_body = TextFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Presentation"
)]
pub async fn odp_file(
    State(state): State<AppState>,
    Payload(request): Payload<TextFileRequest>,
) -> AppResult<FileResponse> {
    serve::<OdpFile>(&state, request).await
}

/// ODS file provider.
#[utoipa::path(
    post,
    path = "/ods_file/",
    request_body = TableFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Spreadsheet"
)]
pub async fn ods_file(
    State(state): State<AppState>,
    Payload(request): Payload<TableFileRequest>,
) -> AppResult<FileResponse> {
    serve::<OdsFile>(&state, request).await
}

/// ODT file provider.
#[utoipa::path(
    post,
    path = "/odt_file/",
    request_body = TextFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Rich Text"
)]
pub async fn odt_file(
    State(state): State<AppState>,
    Payload(request): Payload<TextFileRequest>,
) -> AppResult<FileResponse> {
    serve::<OdtFile>(&state, request).await
}

/// PDF file provider.
#[utoipa::path(
    post,
    path = "/pdf_file/",
    request_body = PdfFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Publishing"
)]
pub async fn pdf_file(
    State(state): State<AppState>,
    Payload(request): Payload<PdfFileRequest>,
) -> AppResult<FileResponse> {
    serve::<PdfFile>(&state, request).await
}

/// PNG file provider.
#[utoipa::path(
    post,
    path = "/png_file/",
    request_body = ImageFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Image"
)]
pub async fn png_file(
    State(state): State<AppState>,
    Payload(request): Payload<ImageFileRequest>,
) -> AppResult<FileResponse> {
    serve::<PngFile>(&state, request).await
}

/// PPTX file provider.
#[utoipa::path(
    post,
    path = "/pptx_file/",
    request_body = TextFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Presentation"
)]
pub async fn pptx_file(
    State(state): State<AppState>,
    Payload(request): Payload<TextFileRequest>,
) -> AppResult<FileResponse> {
    serve::<PptxFile>(&state, request).await
}

/// RTF file provider.
#[utoipa::path(
    post,
    path = "/rtf_file/",
    request_body = TextFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Rich Text"
)]
pub async fn rtf_file(
    State(state): State<AppState>,
    Payload(request): Payload<TextFileRequest>,
) -> AppResult<FileResponse> {
    serve::<RtfFile>(&state, request).await
}

/// SVG file provider.
#[utoipa::path(
    post,
    path = "/svg_file/",
    request_body = ImageFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Image"
)]
pub async fn svg_file(
    State(state): State<AppState>,
    Payload(request): Payload<ImageFileRequest>,
) -> AppResult<FileResponse> {
    serve::<SvgFile>(&state, request).await
}

/// TAR file provider.
#[utoipa::path(
    post,
    path = "/tar_file/",
    request_body = TarFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Archive"
)]
pub async fn tar_file(
    State(state): State<AppState>,
    Payload(request): Payload<TarFileRequest>,
) -> AppResult<FileResponse> {
    serve::<TarFile>(&state, request).await
}

/// TXT file provider.
#[utoipa::path(
    post,
    path = "/txt_file/",
    request_body = TextFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Text"
)]
pub async fn txt_file(
    State(state): State<AppState>,
    Payload(request): Payload<TextFileRequest>,
) -> AppResult<FileResponse> {
    serve::<TxtFile>(&state, request).await
}

/// XLSX file provider.
#[utoipa::path(
    post,
    path = "/xlsx_file/",
    request_body = TableFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Spreadsheet"
)]
pub async fn xlsx_file(
    State(state): State<AppState>,
    Payload(request): Payload<TableFileRequest>,
) -> AppResult<FileResponse> {
    serve::<XlsxFile>(&state, request).await
}

/// XML file provider.
#[utoipa::path(
    post,
    path = "/xml_file/",
    request_body = XmlFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Data"
)]
pub async fn xml_file(
    State(state): State<AppState>,
    Payload(request): Payload<XmlFileRequest>,
) -> AppResult<FileResponse> {
    serve::<XmlFile>(&state, request).await
}

/// ZIP file provider.
#[utoipa::path(
    post,
    path = "/zip_file/",
    request_body = ZipFileRequest,
    responses(
        (status = 200, description = "Generated file", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 422, description = "Invalid request or generation failure", body = ErrorBody)
    ),
    tag = "Archive"
)]
pub async fn zip_file(
    State(state): State<AppState>,
    Payload(request): Payload<ZipFileRequest>,
) -> AppResult<FileResponse> {
    serve::<ZipFile>(&state, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_file_response_is_chunked_and_named() {
        let file = GeneratedFile {
            filename: "report.txt".to_string(),
            bytes: b"0123456789".to_vec(),
        };
        let response = FileResponse::new(file, 4);
        assert_eq!(response.chunks().len(), 3);

        let response = response.into_response();
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "inline; filename=report.txt"
        );
        assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"0123456789");
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let file = GeneratedFile {
            filename: "a.bin".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(FileResponse::new(file, 0).chunks().len(), 3);
    }

    #[tokio::test]
    async fn test_generate_validates_before_spawning() {
        let request: TextFileRequest = serde_json::from_str(r#"{"max_nb_chars": 0}"#).unwrap();
        let err = generate::<TxtFile>(request).await.unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }
}
