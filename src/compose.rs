//! Logo compositing.
//!
//! The logo is scaled into a box a quarter of the QR bitmap's size, keeping
//! its aspect ratio, and blended onto the center of a copy of the bitmap with
//! its own alpha channel as the mask.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

/// Default ratio between the QR bitmap edge and the logo bounding box edge.
pub const DEFAULT_SCALE_DIVISOR: u32 = 4;

/// Size of the logo after fitting it into the bounding box of a
/// `qr_width` x `qr_height` bitmap.
///
/// Wide logos fill the box width; tall and square logos fill the box height.
/// All divisions truncate. A dimension that truncates to zero is clamped to 1.
pub fn logo_dimensions(
    qr_width: u32,
    qr_height: u32,
    logo_width: u32,
    logo_height: u32,
    divisor: u32,
) -> (u32, u32) {
    let divisor = divisor.max(1);
    let box_w = (qr_width / divisor) as u64;
    let box_h = (qr_height / divisor) as u64;
    let (lw, lh) = (logo_width.max(1) as u64, logo_height.max(1) as u64);

    let (w, h) = if lw > lh {
        (box_w, lh * box_w / lw)
    } else {
        (lw * box_h / lh, box_h)
    };
    (w.max(1) as u32, h.max(1) as u32)
}

/// Top-left corner that centers a `logo_width` x `logo_height` logo.
pub fn logo_position(qr_width: u32, qr_height: u32, logo_width: u32, logo_height: u32) -> (u32, u32) {
    (
        qr_width.saturating_sub(logo_width) / 2,
        qr_height.saturating_sub(logo_height) / 2,
    )
}

/// Rounded division by 255, as used for 8-bit mask blending.
#[inline]
fn div255(v: u32) -> u8 {
    let t = v + 128;
    (((t >> 8) + t) >> 8) as u8
}

/// Scale colour channels by alpha so transparent pixels carry no colour.
fn premultiply(img: &RgbaImage) -> RgbaImage {
    let mut out = img.clone();
    for px in out.pixels_mut() {
        let a = px.0[3] as u32;
        for c in &mut px.0[..3] {
            *c = div255(*c as u32 * a);
        }
    }
    out
}

/// Inverse of [`premultiply`]; fully transparent pixels become black.
fn unpremultiply(img: &RgbaImage) -> RgbaImage {
    let mut out = img.clone();
    for px in out.pixels_mut() {
        let a = px.0[3] as u32;
        for c in &mut px.0[..3] {
            *c = if a == 0 { 0 } else { ((*c as u32 * 255 + a / 2) / a).min(255) as u8 };
        }
    }
    out
}

/// Resize in premultiplied space so transparent pixels don't bleed colour
/// into their neighbours.
fn resize_rgba(logo: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let scaled = imageops::resize(&premultiply(logo), width, height, FilterType::CatmullRom);
    unpremultiply(&scaled)
}

/// Blend `logo` onto a copy of `base` with its top-left corner at `(x, y)`.
///
/// Every channel, alpha included, is mixed as
/// `base * (255 - a) + logo * a` where `a` is the logo pixel's alpha.
/// Pixels of the logo falling outside `base` are dropped.
pub fn blend_at(base: &RgbaImage, logo: &RgbaImage, x: u32, y: u32) -> RgbaImage {
    let mut out = base.clone();

    for (lx, ly, px) in logo.enumerate_pixels() {
        let (dx, dy) = (x + lx, y + ly);
        if dx >= out.width() || dy >= out.height() {
            continue;
        }
        let a = px.0[3] as u32;
        let dst = out.get_pixel_mut(dx, dy);
        for (d, s) in dst.0.iter_mut().zip(px.0) {
            *d = div255(*d as u32 * (255 - a) + s as u32 * a);
        }
    }
    out
}

/// Place `logo` centered on `qr`, sized to fit a `1/divisor` bounding box.
///
/// Returns a new image with the same dimensions as `qr`. Logos with a zero
/// dimension leave the bitmap untouched.
pub fn overlay_logo(qr: &RgbaImage, logo: &DynamicImage, divisor: u32) -> RgbaImage {
    let (qw, qh) = qr.dimensions();
    if logo.width() == 0 || logo.height() == 0 {
        log::debug!("Ignoring empty {}x{} logo", logo.width(), logo.height());
        return qr.clone();
    }

    let (w, h) = logo_dimensions(qw, qh, logo.width(), logo.height(), divisor);
    let resized = resize_rgba(&logo.to_rgba8(), w, h);
    let (x, y) = logo_position(qw, qh, w, h);
    log::debug!(
        "Placing {}x{} logo (from {}x{}) at ({}, {}) on {}x{} QR",
        w,
        h,
        logo.width(),
        logo.height(),
        x,
        y,
        qw,
        qh
    );
    blend_at(qr, &resized, x, y)
}

/// Merge an optional logo onto the QR bitmap.
pub fn composite(qr: RgbaImage, logo: Option<&DynamicImage>, divisor: u32) -> RgbaImage {
    match logo {
        Some(logo) => overlay_logo(&qr, logo, divisor),
        None => qr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x / 10 + y / 10) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn wide_logo_keeps_aspect_ratio() {
        assert_eq!(logo_dimensions(400, 400, 300, 100, 4), (100, 33));
    }

    #[test]
    fn tall_logo_fills_box_height() {
        assert_eq!(logo_dimensions(400, 400, 100, 300, 4), (33, 100));
    }

    #[test]
    fn square_logo_takes_height_branch() {
        assert_eq!(logo_dimensions(290, 290, 16, 16, 4), (72, 72));
        // Non-square canvas shows which branch ran: height fills box_h.
        assert_eq!(logo_dimensions(400, 200, 50, 50, 4), (50, 50));
        assert_eq!(logo_dimensions(200, 400, 50, 50, 4), (100, 100));
    }

    #[test]
    fn degenerate_sizes_clamp_to_one_pixel() {
        assert_eq!(logo_dimensions(400, 400, 1000, 1, 4), (100, 1));
        assert_eq!(logo_dimensions(3, 3, 10, 10, 4), (1, 1));
    }

    #[test]
    fn position_centers_with_truncation() {
        assert_eq!(logo_position(400, 400, 100, 33), (150, 183));
        assert_eq!(logo_position(290, 290, 72, 72), (109, 109));
    }

    #[test]
    fn div255_rounds() {
        assert_eq!(div255(0), 0);
        assert_eq!(div255(255 * 255), 255);
        assert_eq!(div255(128 * 255), 128);
        assert_eq!(div255(127), 0);
        assert_eq!(div255(128), 1);
    }

    #[test]
    fn transparent_logo_leaves_base_untouched() {
        let base = checker(40, 40);
        let logo = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 0]));
        let out = blend_at(&base, &logo, 15, 15);
        assert_eq!(out, base);
    }

    #[test]
    fn opaque_logo_replaces_pixels() {
        let base = checker(40, 40);
        let logo = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let out = blend_at(&base, &logo, 15, 15);
        assert_eq!(out.get_pixel(15, 15).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(24, 24).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(14, 15), base.get_pixel(14, 15));
        assert_eq!(out.get_pixel(25, 24), base.get_pixel(25, 24));
    }

    #[test]
    fn half_alpha_mixes_every_channel() {
        let base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let logo = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        let out = blend_at(&base, &logo, 1, 1);
        // 255 * 128 / 255 = 128 for colour; alpha: 255 * 127 + 128 * 128 = 48769 -> 191
        assert_eq!(out.get_pixel(1, 1).0, [128, 128, 128, 191]);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn logo_overhanging_the_edge_is_clipped() {
        let base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let logo = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]));
        let out = blend_at(&base, &logo, 2, 2);
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_pixel(3, 3).0, [9, 9, 9, 255]);
    }

    #[test]
    fn overlay_keeps_canvas_size_and_centers_logo() {
        let qr = checker(400, 400);
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(300, 100, Rgba([200, 10, 10, 255])));
        let out = overlay_logo(&qr, &logo, DEFAULT_SCALE_DIVISOR);
        assert_eq!(out.dimensions(), (400, 400));
        // Logo spans x 150..250, y 183..216.
        assert_eq!(out.get_pixel(200, 200).0, [200, 10, 10, 255]);
        assert_eq!(out.get_pixel(150, 183).0, [200, 10, 10, 255]);
        assert_eq!(out.get_pixel(249, 215).0, [200, 10, 10, 255]);
        assert_eq!(out.get_pixel(149, 200), qr.get_pixel(149, 200));
        assert_eq!(out.get_pixel(200, 216), qr.get_pixel(200, 216));
        assert_eq!(out.get_pixel(200, 182), qr.get_pixel(200, 182));
    }

    #[test]
    fn rgb_logo_is_treated_as_opaque() {
        let qr = checker(80, 80);
        let logo = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3])));
        let out = overlay_logo(&qr, &logo, 4);
        assert_eq!(out.get_pixel(40, 40).0, [1, 2, 3, 255]);
    }

    #[test]
    fn transparent_padding_does_not_darken_the_edge() {
        let qr = RgbaImage::from_pixel(400, 400, Rgba([255, 255, 255, 255]));
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_fn(20, 20, |x, _| {
            if x < 10 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([255, 255, 255, 255])
            }
        }));
        let out = overlay_logo(&qr, &logo, DEFAULT_SCALE_DIVISOR);
        for (x, y, px) in out.enumerate_pixels() {
            assert_eq!(&px.0[..3], &[255, 255, 255], "colour changed at ({}, {})", x, y);
        }
    }

    #[test]
    fn premultiply_round_trips_opaque_and_clears_transparent() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([12, 200, 99, 255])
            } else {
                Rgba([180, 40, 7, 0])
            }
        });
        let back = unpremultiply(&premultiply(&img));
        assert_eq!(back.get_pixel(0, 0).0, [12, 200, 99, 255]);
        assert_eq!(back.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn composite_without_logo_is_identity() {
        let qr = checker(50, 50);
        let out = composite(qr.clone(), None, 4);
        assert_eq!(out, qr);
    }
}
