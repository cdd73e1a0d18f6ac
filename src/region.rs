//! Skin region extraction
//!
//! Marks probable skin pixels by combining an HSV box with a YCbCr box, then
//! cleans the candidate mask with a morphological opening and closing. The
//! largest connected skin blob stands in for the face: when it is big enough
//! the mask is restricted to its padded bounding box, otherwise the global
//! thresholded mask is used as is.

use image::RgbaImage;
use std::collections::VecDeque;
use tracing::debug;

use crate::color::Rgb;
use crate::config::{ImageConfig, RegionConfig};
use crate::error::{AnalysisError, Result};

/// Per-pixel skin flags with the same dimensions as the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

/// Axis-aligned pixel rectangle, `x..x + width` by `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    /// Grow by `fraction` of the shorter side on every edge, clipped to the image
    pub fn padded(&self, fraction: f32, image_width: u32, image_height: u32) -> Self {
        let pad = (self.width.min(self.height) as f32 * fraction).round() as u32;
        let x = self.x.saturating_sub(pad);
        let y = self.y.saturating_sub(pad);
        let right = (self.x + self.width + pad).min(image_width);
        let bottom = (self.y + self.height + pad).min(image_height);
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

impl SkinMask {
    /// Empty mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Out-of-bounds coordinates read as unmarked
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.data[idx] = value;
        }
    }

    /// Number of marked pixels
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// Coordinates of marked pixels in row-major order
    pub fn marked(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(move |(i, _)| ((i % w) as u32, (i / w) as u32))
    }

    /// Keep only marked pixels inside `bbox`
    pub fn restricted_to(&self, bbox: &BoundingBox) -> Self {
        Self::from_fn(self.width, self.height, |x, y| self.get(x, y) && bbox.contains(x, y))
    }

    /// A pixel stays marked only if its whole square window is marked.
    /// Pixels beyond the border do not erode.
    pub fn eroded(&self, radius: u32) -> Self {
        self.window_filter(radius, true)
    }

    /// A pixel becomes marked if anything in its square window is marked
    pub fn dilated(&self, radius: u32) -> Self {
        self.window_filter(radius, false)
    }

    /// Erosion then dilation: removes specks smaller than the window
    pub fn opened(&self, radius: u32) -> Self {
        self.eroded(radius).dilated(radius)
    }

    /// Dilation then erosion: fills pinholes smaller than the window
    pub fn closed(&self, radius: u32) -> Self {
        self.dilated(radius).eroded(radius)
    }

    fn window_filter(&self, radius: u32, all: bool) -> Self {
        if radius == 0 {
            return self.clone();
        }
        let r = radius as i64;
        let (w, h) = (self.width as i64, self.height as i64);
        Self::from_fn(self.width, self.height, |x, y| {
            let (x, y) = (x as i64, y as i64);
            let mut window = (y - r..=y + r)
                .filter(|ny| (0..h).contains(ny))
                .flat_map(|ny| {
                    (x - r..=x + r)
                        .filter(|nx| (0..w).contains(nx))
                        .map(move |nx| (nx, ny))
                })
                .map(|(nx, ny)| self.get(nx as u32, ny as u32));
            if all {
                window.all(|v| v)
            } else {
                window.any(|v| v)
            }
        })
    }

    /// Largest 4-connected blob of marked pixels: (pixel count, bounding box)
    pub fn largest_component(&self) -> Option<(usize, BoundingBox)> {
        let mut visited = vec![false; self.data.len()];
        let mut queue = VecDeque::new();
        let mut best: Option<(usize, BoundingBox)> = None;

        for start in 0..self.data.len() {
            if !self.data[start] || visited[start] {
                continue;
            }
            visited[start] = true;
            queue.push_back(start);

            let w = self.width as usize;
            let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
            let (mut max_x, mut max_y) = (0usize, 0usize);
            let mut size = 0usize;

            while let Some(idx) = queue.pop_front() {
                let (x, y) = (idx % w, idx / w);
                size += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);

                let mut visit = |n: usize| {
                    if self.data[n] && !visited[n] {
                        visited[n] = true;
                        queue.push_back(n);
                    }
                };
                if x > 0 {
                    visit(idx - 1);
                }
                if x + 1 < w {
                    visit(idx + 1);
                }
                if y > 0 {
                    visit(idx - w);
                }
                if y + 1 < self.height as usize {
                    visit(idx + w);
                }
            }

            // ties keep the first blob in scan order
            if best.is_none_or(|(best_size, _)| size > best_size) {
                let bbox = BoundingBox {
                    x: min_x as u32,
                    y: min_y as u32,
                    width: (max_x - min_x + 1) as u32,
                    height: (max_y - min_y + 1) as u32,
                };
                best = Some((size, bbox));
            }
        }

        best
    }
}

/// Whether a single pixel falls inside both the HSV and the YCbCr skin boxes.
/// Fully transparent pixels never count.
pub fn is_skin_pixel(pixel: [u8; 4], config: &RegionConfig) -> bool {
    if pixel[3] == 0 {
        return false;
    }
    let rgb = Rgb::new(pixel[0], pixel[1], pixel[2]);

    let (hue, saturation, value) = rgb.to_hsv();
    let hue_ok = hue <= config.hue_max_deg || hue >= config.hue_wrap_min_deg;
    if !(hue_ok && saturation >= config.saturation_min && value >= config.value_min) {
        return false;
    }

    let (_, cb, cr) = rgb.to_ycbcr();
    (config.cr_min..=config.cr_max).contains(&cr) && (config.cb_min..=config.cb_max).contains(&cb)
}

/// Reject images too small to analyze
pub fn check_dimensions(image: &RgbaImage, limits: &ImageConfig) -> Result<()> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(AnalysisError::invalid_image(format!("image has no pixels ({}x{})", w, h)));
    }
    if w.max(h) < limits.min_dimension_px {
        return Err(AnalysisError::invalid_image(format!(
            "image is {}x{}, longest side must be at least {}px",
            w, h, limits.min_dimension_px
        )));
    }
    Ok(())
}

/// Candidate skin pixels from color thresholds alone, before any cleanup
pub fn threshold_skin(image: &RgbaImage, config: &RegionConfig) -> SkinMask {
    let (w, h) = image.dimensions();
    SkinMask::from_fn(w, h, |x, y| is_skin_pixel(image.get_pixel(x, y).0, config))
}

/// Padded bounding box of the dominant skin blob, if one is large enough to
/// be taken as the subject's face
pub fn locate_face_region(mask: &SkinMask, config: &RegionConfig) -> Option<BoundingBox> {
    let (size, bbox) = mask.largest_component()?;
    let total = mask.width() as f64 * mask.height() as f64;
    if (size as f64) < total * config.min_face_fraction as f64 {
        return None;
    }
    Some(bbox.padded(config.face_padding, mask.width(), mask.height()))
}

/// Locate probable skin pixels.
///
/// # Errors
///
/// - `InvalidImage` if the image is empty or below the minimum size
/// - `NoSkinDetected` if no pixel passes the skin thresholds
pub fn extract(image: &RgbaImage, limits: &ImageConfig, config: &RegionConfig) -> Result<SkinMask> {
    check_dimensions(image, limits)?;
    let (width, height) = image.dimensions();

    let candidates = threshold_skin(image, config);
    let candidate_count = candidates.count();
    if candidate_count == 0 {
        return Err(AnalysisError::NoSkinDetected { width, height });
    }

    let radius = config.morphology_radius;
    let mut cleaned = candidates.opened(radius).closed(radius);
    if cleaned.is_empty() {
        // only specks survived thresholding; keep them rather than report nothing
        debug!(candidate_count, "morphological cleanup removed every pixel, using raw candidates");
        cleaned = candidates;
    }

    let mask = match locate_face_region(&cleaned, config) {
        Some(face) => {
            debug!(?face, "restricting skin mask to face region");
            cleaned.restricted_to(&face)
        }
        None => {
            debug!("no dominant skin region, using global thresholding");
            cleaned
        }
    };

    if mask.is_empty() {
        return Err(AnalysisError::NoSkinDetected { width, height });
    }
    debug!(width, height, marked = mask.count(), "skin mask extracted");
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const SKIN: [u8; 4] = [230, 180, 130, 255];
    const BLUE: [u8; 4] = [40, 90, 200, 255];

    fn block_image(w: u32, h: u32, block: BoundingBox) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if block.contains(x, y) { Rgba(SKIN) } else { Rgba(BLUE) }
        })
    }

    #[test]
    fn test_skin_pixel_classification() {
        let config = RegionConfig::default();
        assert!(is_skin_pixel(SKIN, &config));
        assert!(is_skin_pixel([230, 180, 190, 255], &config)); // pinkish
        assert!(!is_skin_pixel(BLUE, &config));
        assert!(!is_skin_pixel([255, 255, 255, 255], &config));
        assert!(!is_skin_pixel([10, 8, 6, 255], &config));
        assert!(!is_skin_pixel([230, 180, 130, 0], &config)); // transparent
    }

    #[test]
    fn test_extract_marks_skin_block() {
        let block = BoundingBox { x: 30, y: 30, width: 40, height: 40 };
        let image = block_image(100, 100, block);
        let mask = extract(&image, &ImageConfig::default(), &RegionConfig::default()).unwrap();

        assert_eq!(mask.dimensions(), (100, 100));
        assert_eq!(mask.count(), 1600);
        assert!(mask.get(50, 50));
        assert!(!mask.get(5, 5));
    }

    #[test]
    fn test_extract_without_skin_fails() {
        let image = RgbaImage::from_pixel(64, 64, Rgba(BLUE));
        let err = extract(&image, &ImageConfig::default(), &RegionConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::NoSkinDetected { width: 64, height: 64 }));
    }

    #[test]
    fn test_extract_rejects_tiny_image() {
        let image = RgbaImage::from_pixel(10, 12, Rgba(SKIN));
        let err = extract(&image, &ImageConfig::default(), &RegionConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImage { .. }));
    }

    #[test]
    fn test_extract_accepts_thin_image_with_long_side() {
        let image = RgbaImage::from_pixel(40, 5, Rgba(SKIN));
        let mask = extract(&image, &ImageConfig::default(), &RegionConfig::default()).unwrap();
        assert_eq!(mask.count(), 200);
    }

    #[test]
    fn test_face_region_drops_distant_specks() {
        let face = BoundingBox { x: 20, y: 20, width: 30, height: 30 };
        let mut image = block_image(200, 200, face);
        // a separate 4x4 skin patch far from the face
        for y in 180..184 {
            for x in 180..184 {
                image.put_pixel(x, y, Rgba(SKIN));
            }
        }

        let mask = extract(&image, &ImageConfig::default(), &RegionConfig::default()).unwrap();
        assert_eq!(mask.count(), 900);
        assert!(!mask.get(181, 181));
    }

    #[test]
    fn test_global_fallback_when_no_dominant_region() {
        let config = RegionConfig {
            min_face_fraction: 0.5,
            ..RegionConfig::default()
        };
        let face = BoundingBox { x: 20, y: 20, width: 30, height: 30 };
        let mut image = block_image(200, 200, face);
        for y in 150..160 {
            for x in 150..160 {
                image.put_pixel(x, y, Rgba(SKIN));
            }
        }

        let mask = extract(&image, &ImageConfig::default(), &config).unwrap();
        assert_eq!(mask.count(), 1000);
    }

    #[test]
    fn test_opening_removes_specks_closing_fills_holes() {
        let mut mask = SkinMask::from_fn(20, 20, |x, y| (5..15).contains(&x) && (5..15).contains(&y));
        mask.set(10, 10, false);
        mask.set(0, 0, true);

        let cleaned = mask.opened(1).closed(1);
        assert!(!cleaned.get(0, 0));
        assert!(cleaned.get(10, 10));
        assert_eq!(cleaned.count(), 100);
    }

    #[test]
    fn test_specks_survive_when_cleanup_empties_mask() {
        let mut image = RgbaImage::from_pixel(50, 50, Rgba(BLUE));
        image.put_pixel(10, 10, Rgba(SKIN));
        image.put_pixel(30, 30, Rgba(SKIN));

        let mask = extract(&image, &ImageConfig::default(), &RegionConfig::default()).unwrap();
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_largest_component() {
        let mask = SkinMask::from_fn(10, 10, |x, y| (x < 2 && y < 2) || (x >= 5 && y >= 5));
        let (size, bbox) = mask.largest_component().unwrap();
        assert_eq!(size, 25);
        assert_eq!(bbox, BoundingBox { x: 5, y: 5, width: 5, height: 5 });
        assert!(SkinMask::new(4, 4).largest_component().is_none());
    }

    #[test]
    fn test_padded_bbox_is_clipped() {
        let bbox = BoundingBox { x: 2, y: 2, width: 10, height: 20 };
        let padded = bbox.padded(0.5, 15, 100);
        assert_eq!(padded, BoundingBox { x: 0, y: 0, width: 15, height: 27 });
    }
}
