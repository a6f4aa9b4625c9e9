//! Abstract graphics: random shapes in a hue/luminosity constrained palette.

use super::layout::WordBox;
use super::raster::fill_rect;
use crate::types::{Hue, Luminosity};
use image::{Rgb, RgbImage};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Hue range in degrees; ranges may run past 360 and wrap.
fn hue_range(hue: Option<Hue>) -> (f64, f64) {
    match hue {
        Some(Hue::Red) => (334.0, 378.0),
        Some(Hue::Orange) => (18.0, 46.0),
        Some(Hue::Yellow) => (46.0, 62.0),
        Some(Hue::Green) => (62.0, 178.0),
        Some(Hue::Blue) => (178.0, 257.0),
        Some(Hue::Purple) => (257.0, 282.0),
        Some(Hue::Pink) => (282.0, 334.0),
        Some(Hue::Monochrome) | None => (0.0, 360.0),
    }
}

/// Saturation and value ranges for a luminosity.
fn sv_range(luminosity: Option<Luminosity>) -> ((f64, f64), (f64, f64)) {
    match luminosity {
        Some(Luminosity::Bright) => ((0.55, 1.0), (0.8, 1.0)),
        Some(Luminosity::Dark) => ((0.5, 1.0), (0.2, 0.5)),
        Some(Luminosity::Light) => ((0.1, 0.4), (0.85, 1.0)),
        Some(Luminosity::Random) => ((0.0, 1.0), (0.0, 1.0)),
        None => ((0.4, 1.0), (0.5, 1.0)),
    }
}

/// Random color matching the requested hue and luminosity.
pub fn random_color<R: Rng + ?Sized>(
    rng: &mut R,
    hue: Option<Hue>,
    luminosity: Option<Luminosity>,
) -> Rgb<u8> {
    let (h_min, h_max) = hue_range(hue);
    let ((s_min, s_max), (v_min, v_max)) = sv_range(luminosity);

    let h = rng.gen_range(h_min..h_max) % 360.0;
    let s = if hue == Some(Hue::Monochrome) {
        0.0
    } else {
        rng.gen_range(s_min..=s_max)
    };
    let v = rng.gen_range(v_min..=v_max);
    hsv_to_rgb(h, s, v)
}

/// HSV (degrees, 0..1, 0..1) to 8-bit RGB.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb<u8> {
    let c = v * s;
    let sector = (h / 60.0) % 6.0;
    let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let to_u8 = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}

/// Paint an abstract graphic of the given size.
///
/// The background gets one palette color, then rectangles and discs of
/// other palette colors are scattered over it, sized around a fifth of the
/// shorter side.
pub fn abstract_graphic<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
    hue: Option<Hue>,
    luminosity: Option<Luminosity>,
) -> RgbImage {
    let background = random_color(rng, hue, luminosity);
    let mut img = RgbImage::from_pixel(width, height, background);

    let short_side = width.min(height) as f64;
    let size_dist = Normal::new(short_side / 5.0, short_side / 12.0).ok();
    let shapes = rng.gen_range(6..=16);

    for _ in 0..shapes {
        let color = random_color(rng, hue, luminosity);
        let size = size_dist
            .as_ref()
            .map(|d| d.sample(rng))
            .unwrap_or(short_side / 5.0)
            .max(2.0) as u32;
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);

        if rng.gen_bool(0.5) {
            let rect = WordBox {
                x,
                y,
                width: size,
                height: (size as f64 * rng.gen_range(0.3..1.5)).max(1.0) as u32,
            };
            fill_rect(&mut img, &rect, color);
        } else {
            fill_disc(&mut img, x, y, size / 2, color);
        }
    }

    img
}

fn fill_disc(img: &mut RgbImage, cx: u32, cy: u32, radius: u32, color: Rgb<u8>) {
    let r = radius as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let x = cx as i64 + dx;
            let y = cy as i64 + dy;
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
