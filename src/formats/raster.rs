//! Raster rendering of greeked pages and raster encoding.

use super::layout::{PageLayout, WordBox};
use crate::error::{AppError, AppResult};
use crate::types::ImageGenerator;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([40, 40, 48]);

/// Largest side of an ICO image.
pub const ICO_MAX_SIDE: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
    Ico,
    Webp,
}

impl RasterFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Ico => "ico",
            RasterFormat::Webp => "webp",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Ico => ImageFormat::Ico,
            RasterFormat::Webp => ImageFormat::WebP,
        }
    }
}

/// Draw a page with the chosen renderer.
pub fn render_page(page: &PageLayout, generator: ImageGenerator) -> RgbImage {
    let mut img = RgbImage::from_pixel(page.width, page.height, PAPER);
    for word in &page.boxes {
        match generator {
            ImageGenerator::Greeked => fill_rect(&mut img, word, INK),
            ImageGenerator::Outline => stroke_rect(&mut img, word, INK),
        }
    }
    img
}

/// Fill a rectangle, clipped to the image.
pub fn fill_rect(img: &mut RgbImage, rect: &WordBox, color: Rgb<u8>) {
    let x_end = (rect.x + rect.width).min(img.width());
    let y_end = (rect.y + rect.height).min(img.height());
    for y in rect.y.min(y_end)..y_end {
        for x in rect.x.min(x_end)..x_end {
            img.put_pixel(x, y, color);
        }
    }
}

fn stroke_rect(img: &mut RgbImage, rect: &WordBox, color: Rgb<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let right = rect.x + rect.width - 1;
    let bottom = rect.y + rect.height - 1;
    let edges = [
        WordBox { x: rect.x, y: rect.y, width: rect.width, height: 1 },
        WordBox { x: rect.x, y: bottom, width: rect.width, height: 1 },
        WordBox { x: rect.x, y: rect.y, width: 1, height: rect.height },
        WordBox { x: right, y: rect.y, width: 1, height: rect.height },
    ];
    for edge in &edges {
        fill_rect(img, edge, color);
    }
}

/// Encode an image; ICO output is shrunk to fit 256x256 first.
pub fn encode(img: RgbImage, format: RasterFormat) -> AppResult<Vec<u8>> {
    if img.width() == 0 || img.height() == 0 {
        return Err(AppError::generation("cannot encode an empty image"));
    }

    let mut image = DynamicImage::ImageRgb8(img);
    if format == RasterFormat::Ico
        && (image.width() > ICO_MAX_SIDE || image.height() > ICO_MAX_SIDE)
    {
        image = image.thumbnail(ICO_MAX_SIDE, ICO_MAX_SIDE);
    }
    if format == RasterFormat::Ico {
        image = DynamicImage::ImageRgba8(image.to_rgba8());
    }

    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format.image_format())?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::layout::layout;

    #[test]
    fn test_greeked_and_outline_differ() {
        let page = layout("alpha beta gamma", 200);
        let greeked = render_page(&page, ImageGenerator::Greeked);
        let outline = render_page(&page, ImageGenerator::Outline);

        let ink = |img: &RgbImage| img.pixels().filter(|p| **p == INK).count();
        assert!(ink(&greeked) > ink(&outline));
        assert!(ink(&outline) > 0);
    }

    #[test]
    fn test_encode_round_trips_through_decoder() {
        let page = layout("some words here", 120);
        let img = render_page(&page, ImageGenerator::Greeked);
        let (w, h) = img.dimensions();

        for format in [RasterFormat::Png, RasterFormat::Jpeg, RasterFormat::Webp] {
            let bytes = encode(img.clone(), format).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (w, h), "{:?}", format);
        }
    }

    #[test]
    fn test_ico_is_shrunk() {
        let img = RgbImage::from_pixel(600, 300, PAPER);
        let bytes = encode(img, RasterFormat::Ico).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Ico).unwrap();
        assert!(decoded.width() <= ICO_MAX_SIDE && decoded.height() <= ICO_MAX_SIDE);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut img = RgbImage::from_pixel(10, 10, PAPER);
        fill_rect(&mut img, &WordBox { x: 8, y: 8, width: 10, height: 10 }, INK);
        assert_eq!(img.pixels().filter(|p| **p == INK).count(), 4);
    }
}
