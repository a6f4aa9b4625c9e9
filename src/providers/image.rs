//! Text rendered to images, and abstract graphics.

use super::{body, named, FileProvider, Validate};
use crate::error::AppResult;
use crate::formats::raster::{self, RasterFormat, ICO_MAX_SIDE};
use crate::formats::{graphic, layout, pdf, svg};
use crate::types::{check_range, Category, FileNaming, GeneratedFile, Hue, ImageGenerator, Luminosity, TextOptions};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Page width of text rendered to images, in pixels.
pub const PAGE_WIDTH: u32 = 800;
pub const MAX_GRAPHIC_SIDE: u32 = 4096;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ImageFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    #[serde(flatten)]
    pub text: TextOptions,
    pub image_generator: ImageGenerator,
}

impl Validate for ImageFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        self.text.validate()
    }
}

fn text_image<R: Rng + ?Sized>(
    request: &ImageFileRequest,
    rng: &mut R,
    format: RasterFormat,
) -> AppResult<GeneratedFile> {
    let text = body(rng, &request.text)?;
    let page = layout::layout(&text, PAGE_WIDTH);
    let bytes = raster::encode(raster::render_page(&page, request.image_generator), format)?;
    Ok(named(rng, &request.naming, format.extension(), bytes))
}

pub struct PngFile;

impl FileProvider for PngFile {
    const NAME: &'static str = "png_file";
    const CATEGORY: Category = Category::Image;
    const SUMMARY: &'static str = "PNG file provider.";

    type Request = ImageFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        text_image(request, rng, RasterFormat::Png)
    }
}

pub struct JpegFile;

impl FileProvider for JpegFile {
    const NAME: &'static str = "jpeg_file";
    const CATEGORY: Category = Category::Image;
    const SUMMARY: &'static str = "JPEG file provider.";

    type Request = ImageFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        text_image(request, rng, RasterFormat::Jpeg)
    }
}

pub struct IcoFile;

impl FileProvider for IcoFile {
    const NAME: &'static str = "ico_file";
    const CATEGORY: Category = Category::Image;
    const SUMMARY: &'static str = "ICO file provider.";

    type Request = ImageFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        text_image(request, rng, RasterFormat::Ico)
    }
}

pub struct SvgFile;

impl FileProvider for SvgFile {
    const NAME: &'static str = "svg_file";
    const CATEGORY: Category = Category::Image;
    const SUMMARY: &'static str = "SVG file provider.";

    type Request = ImageFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let text = body(rng, &request.text)?;
        let page = layout::layout(&text, PAGE_WIDTH);
        let bytes = svg::render_page(&page, request.image_generator, &text);
        Ok(named(rng, &request.naming, "svg", bytes))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GraphicFileRequest {
    #[serde(flatten)]
    pub naming: FileNaming,
    /// `[width, height]` in pixels
    #[schema(value_type = Vec<u32>)]
    pub size: [u32; 2],
    pub hue: Option<Hue>,
    pub luminosity: Option<Luminosity>,
}

impl Default for GraphicFileRequest {
    fn default() -> Self {
        Self {
            naming: FileNaming::default(),
            size: [256, 256],
            hue: None,
            luminosity: None,
        }
    }
}

impl GraphicFileRequest {
    fn check_size(&self, max_side: u32) -> AppResult<()> {
        check_range("size[0]", self.size[0] as usize, 1, max_side as usize)?;
        check_range("size[1]", self.size[1] as usize, 1, max_side as usize)
    }

    fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> image::RgbImage {
        graphic::abstract_graphic(rng, self.size[0], self.size[1], self.hue, self.luminosity)
    }
}

impl Validate for GraphicFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.naming.validate()?;
        self.check_size(MAX_GRAPHIC_SIDE)
    }
}

/// Graphic request limited to icon sizes
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GraphicIcoFileRequest {
    #[serde(flatten)]
    pub graphic: GraphicFileRequest,
}

impl Validate for GraphicIcoFileRequest {
    fn validate(&self) -> AppResult<()> {
        self.graphic.naming.validate()?;
        self.graphic.check_size(ICO_MAX_SIDE)
    }
}

fn graphic_image<R: Rng + ?Sized>(
    request: &GraphicFileRequest,
    rng: &mut R,
    format: RasterFormat,
) -> AppResult<GeneratedFile> {
    let bytes = raster::encode(request.render(rng), format)?;
    Ok(named(rng, &request.naming, format.extension(), bytes))
}

pub struct GraphicPngFile;

impl FileProvider for GraphicPngFile {
    const NAME: &'static str = "graphic_png_file";
    const CATEGORY: Category = Category::Image;
    const SUMMARY: &'static str = "Graphic PNG file provider.";

    type Request = GraphicFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        graphic_image(request, rng, RasterFormat::Png)
    }
}

pub struct GraphicJpegFile;

impl FileProvider for GraphicJpegFile {
    const NAME: &'static str = "graphic_jpeg_file";
    const CATEGORY: Category = Category::Image;
    const SUMMARY: &'static str = "Graphic JPEG file provider.";

    type Request = GraphicFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        graphic_image(request, rng, RasterFormat::Jpeg)
    }
}

pub struct GraphicWebpFile;

impl FileProvider for GraphicWebpFile {
    const NAME: &'static str = "graphic_webp_file";
    const CATEGORY: Category = Category::Image;
    const SUMMARY: &'static str = "Graphic WEBP file provider.";

    type Request = GraphicFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        graphic_image(request, rng, RasterFormat::Webp)
    }
}

pub struct GraphicIcoFile;

impl FileProvider for GraphicIcoFile {
    const NAME: &'static str = "graphic_ico_file";
    const CATEGORY: Category = Category::Image;
    const SUMMARY: &'static str = "Graphic ICO file provider.";

    type Request = GraphicIcoFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        graphic_image(&request.graphic, rng, RasterFormat::Ico)
    }
}

pub struct GraphicPdfFile;

impl FileProvider for GraphicPdfFile {
    const NAME: &'static str = "graphic_pdf_file";
    const CATEGORY: Category = Category::Publishing;
    const SUMMARY: &'static str = "Graphic PDF file provider.";

    type Request = GraphicFileRequest;

    fn generate<R: Rng + ?Sized>(request: &Self::Request, rng: &mut R) -> AppResult<GeneratedFile> {
        let [width, height] = request.size;
        let jpeg = raster::encode(request.render(rng), RasterFormat::Jpeg)?;
        let bytes = pdf::image_document(&jpeg, width, height, None);
        Ok(named(rng, &request.naming, "pdf", bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(51)
    }

    fn short() -> ImageFileRequest {
        ImageFileRequest {
            text: TextOptions::with_max_nb_chars(300),
            ..ImageFileRequest::default()
        }
    }

    #[test]
    fn test_text_images_decode() {
        let png = PngFile::generate(&short(), &mut rng()).unwrap();
        let decoded = image::load_from_memory(&png.bytes).unwrap();
        assert_eq!(decoded.width(), PAGE_WIDTH);
        assert!(png.filename.ends_with(".png"));

        let jpeg = JpegFile::generate(&short(), &mut rng()).unwrap();
        assert!(image::load_from_memory(&jpeg.bytes).is_ok());
        assert!(jpeg.filename.ends_with(".jpg"));

        let ico = IcoFile::generate(&short(), &mut rng()).unwrap();
        let decoded = image::load_from_memory_with_format(&ico.bytes, image::ImageFormat::Ico).unwrap();
        assert!(decoded.width() <= ICO_MAX_SIDE);
    }

    #[test]
    fn test_svg_outline() {
        let request = ImageFileRequest {
            image_generator: ImageGenerator::Outline,
            ..short()
        };
        let file = SvgFile::generate(&request, &mut rng()).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(text.contains("<svg "));
        assert!(text.contains("stroke="));
    }

    #[test]
    fn test_image_generator_selector() {
        assert!(serde_json::from_str::<ImageFileRequest>(r#"{"image_generator": "outline"}"#).is_ok());
        assert!(serde_json::from_str::<ImageFileRequest>(r#"{"image_generator": "weasyprint"}"#).is_err());
    }

    #[test]
    fn test_graphic_sizes() {
        let request: GraphicFileRequest =
            serde_json::from_str(r#"{"size": [40, 30], "hue": "green", "luminosity": "dark"}"#).unwrap();
        request.validate().unwrap();
        for (file, format) in [
            (GraphicPngFile::generate(&request, &mut rng()).unwrap(), image::ImageFormat::Png),
            (GraphicJpegFile::generate(&request, &mut rng()).unwrap(), image::ImageFormat::Jpeg),
            (GraphicWebpFile::generate(&request, &mut rng()).unwrap(), image::ImageFormat::WebP),
        ] {
            let decoded = image::load_from_memory_with_format(&file.bytes, format).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (40, 30), "{}", file.filename);
        }
    }

    #[test]
    fn test_graphic_size_limits() {
        let request = GraphicFileRequest {
            size: [0, 10],
            ..GraphicFileRequest::default()
        };
        assert!(request.validate().is_err());

        let request = GraphicFileRequest {
            size: [MAX_GRAPHIC_SIDE + 1, 10],
            ..GraphicFileRequest::default()
        };
        assert!(request.validate().is_err());

        let ico: GraphicIcoFileRequest = serde_json::from_str(r#"{"size": [512, 512]}"#).unwrap();
        assert!(ico.validate().is_err());
        assert!(GraphicIcoFileRequest::default().validate().is_ok());
    }

    #[test]
    fn test_graphic_ico_decodes() {
        let file = GraphicIcoFile::generate(&GraphicIcoFileRequest::default(), &mut rng()).unwrap();
        assert!(image::load_from_memory_with_format(&file.bytes, image::ImageFormat::Ico).is_ok());
        assert!(file.filename.ends_with(".ico"));
    }

    #[test]
    fn test_graphic_pdf_page_matches_size() {
        let request = GraphicFileRequest {
            size: [64, 48],
            ..GraphicFileRequest::default()
        };
        let file = GraphicPdfFile::generate(&request, &mut rng()).unwrap();
        let text = String::from_utf8_lossy(&file.bytes);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("/MediaBox [0 0 64 48]"));
    }
}
