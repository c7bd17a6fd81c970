use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use chrono::{DateTime, Local};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use thiserror::Error;

use crate::shared::detection_box::DetectionBox;
use crate::shared::frame::Frame;

const BOX_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const LABEL_COLOR: Rgb<u8> = Rgb([12, 255, 36]);
const CLOCK_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Border thickness in pixels.
const BOX_THICKNESS: u32 = 2;
/// Gap between a label's baseline and the top of its box.
const LABEL_OFFSET: i32 = 10;
const LABEL_SCALE: f32 = 22.0;
const CLOCK_SCALE: f32 = 18.0;
/// Clock baseline sits this far from the left and bottom edges.
const CLOCK_MARGIN: i32 = 10;

pub const CLOCK_FORMAT: &str = "%A %d %B %Y %I:%M:%S%p";

/// DejaVu Sans Mono, used when no font is configured.
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not a usable TrueType/OpenType font")]
    Invalid { path: PathBuf },
    #[error("bundled font is not usable")]
    Bundled,
}

/// Loads a TrueType/OpenType font for label and clock text.
pub fn load_font(path: &Path) -> Result<FontArc, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| FontError::Invalid {
        path: path.to_path_buf(),
    })
}

/// The font compiled into the crate.
pub fn bundled_font() -> Result<FontArc, FontError> {
    FontArc::try_from_slice(BUNDLED_FONT).map_err(|_| FontError::Bundled)
}

/// Draws detection boxes, the resolved identity and a wall clock onto
/// frames.
///
/// Text needs a font. Without one only boxes are drawn; see
/// [`bundled_font`].
pub struct FrameAnnotator {
    font: Option<FontArc>,
}

impl FrameAnnotator {
    pub fn new(font: Option<FontArc>) -> Self {
        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn annotate(
        &self,
        frame: Frame,
        boxes: &[DetectionBox],
        label: Option<&str>,
        now: &DateTime<Local>,
    ) -> Frame {
        let index = frame.index();
        let mut image = frame.into_rgb_image();

        for b in boxes {
            draw_box(&mut image, b);
        }

        if let Some(font) = &self.font {
            if let Some(label) = label {
                let scale = PxScale::from(LABEL_SCALE);
                for b in boxes {
                    let top = (b.y - LABEL_OFFSET - LABEL_SCALE as i32).max(0);
                    draw_text_mut(&mut image, LABEL_COLOR, b.x.max(0), top, scale, font, label);
                }
            }

            let clock = now.format(CLOCK_FORMAT).to_string();
            let top = image.height() as i32 - CLOCK_MARGIN - CLOCK_SCALE as i32;
            draw_text_mut(
                &mut image,
                CLOCK_COLOR,
                CLOCK_MARGIN,
                top.max(0),
                PxScale::from(CLOCK_SCALE),
                font,
                &clock,
            );
        }

        Frame::from_rgb_image(image, index)
    }
}

fn draw_box(image: &mut RgbImage, b: &DetectionBox) {
    for inset in 0..BOX_THICKNESS {
        let width = b.width.saturating_sub(2 * inset);
        let height = b.height.saturating_sub(2 * inset);
        if width == 0 || height == 0 {
            break;
        }
        let rect = Rect::at(b.x + inset as i32, b.y + inset as i32).of_size(width, height);
        draw_hollow_rect_mut(image, rect, BOX_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BG: [u8; 3] = [40, 40, 40];

    fn blank(width: u32, height: u32) -> Frame {
        Frame::from_rgb_image(RgbImage::from_pixel(width, height, Rgb(BG)), 3)
    }

    fn now() -> DateTime<Local> {
        Local.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * frame.width() + x) * 3) as usize;
        [frame.data()[i], frame.data()[i + 1], frame.data()[i + 2]]
    }

    #[test]
    fn test_box_border_is_two_pixels() {
        let annotator = FrameAnnotator::new(None);
        let out = annotator.annotate(
            blank(64, 64),
            &[DetectionBox::new(10, 10, 20, 20)],
            None,
            &now(),
        );

        assert_eq!(pixel(&out, 10, 10), BOX_COLOR.0);
        assert_eq!(pixel(&out, 11, 11), BOX_COLOR.0);
        assert_eq!(pixel(&out, 29, 29), BOX_COLOR.0);
        assert_eq!(pixel(&out, 12, 12), BG);
        assert_eq!(pixel(&out, 20, 20), BG);
        assert_eq!(pixel(&out, 5, 5), BG);
    }

    #[test]
    fn test_keeps_frame_shape_and_index() {
        let annotator = FrameAnnotator::new(None);
        let out = annotator.annotate(blank(40, 30), &[], None, &now());
        assert_eq!((out.width(), out.height(), out.index()), (40, 30, 3));
    }

    #[test]
    fn test_no_boxes_and_no_font_leaves_frame_untouched() {
        let annotator = FrameAnnotator::new(None);
        let input = blank(16, 16);
        let expected = input.data().to_vec();
        let out = annotator.annotate(input, &[], Some("John Doe"), &now());
        assert_eq!(out.data(), &expected[..]);
    }

    #[test]
    fn test_thin_box_is_drawn_without_panicking() {
        let annotator = FrameAnnotator::new(None);
        let out = annotator.annotate(
            blank(16, 16),
            &[DetectionBox::new(2, 2, 1, 5)],
            None,
            &now(),
        );
        assert_eq!(pixel(&out, 2, 2), BOX_COLOR.0);
    }

    #[test]
    fn test_clock_format() {
        let t = Local.with_ymd_and_hms(2024, 1, 1, 15, 4, 5).unwrap();
        assert_eq!(
            t.format(CLOCK_FORMAT).to_string(),
            "Monday 01 January 2024 03:04:05PM"
        );
    }

    #[test]
    fn test_bundled_font_draws_label_and_clock() {
        let annotator = FrameAnnotator::new(Some(bundled_font().unwrap()));
        assert!(annotator.has_font());

        let (w, h) = (320, 120);
        let boxes = [DetectionBox::new(40, 70, 40, 40)];
        let out = annotator.annotate(blank(w, h), &boxes, Some("John Doe"), &now());

        // label sits between its top (70 - 10 - 22) and the box
        let label_pixels: Vec<_> = (38..70)
            .flat_map(|y| (40..w).map(move |x| (x, y)))
            .map(|(x, y)| pixel(&out, x, y))
            .filter(|p| *p != BG)
            .collect();
        assert!(!label_pixels.is_empty());
        assert!(label_pixels.iter().any(|p| p[1] > p[0] && p[1] > p[2]));

        // clock text ends at the baseline 10 px above the bottom edge
        let clock_pixels: Vec<_> = (h - 10 - 18..h - 10)
            .flat_map(|y| (10..w).map(move |x| (x, y)))
            .map(|(x, y)| pixel(&out, x, y))
            .filter(|p| *p != BG)
            .collect();
        assert!(!clock_pixels.is_empty());
        assert!(clock_pixels.iter().any(|p| p[0] > p[1] && p[0] > p[2]));
    }

    #[test]
    fn test_label_skipped_without_label() {
        let annotator = FrameAnnotator::new(Some(bundled_font().unwrap()));
        let boxes = [DetectionBox::new(40, 70, 40, 40)];
        let out = annotator.annotate(blank(320, 120), &boxes, None, &now());
        for y in 38..70 {
            for x in 40..320 {
                assert_eq!(pixel(&out, x, y), BG);
            }
        }
    }

    #[test]
    fn test_load_font_missing_file() {
        let err = load_font(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Read { .. }));
    }

    #[test]
    fn test_load_font_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(load_font(&path), Err(FontError::Invalid { .. })));
    }
}
