//! Text drawing for titles, captions and the page number
//!
//! Glyphs are drawn with `imageproc` using a system font. Without a usable
//! font nothing is drawn and the sheet is produced without text.

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use super::geometry::{Frame, text::LINE_SPACING};

/// Fonts tried in order when no font is configured. CJK-capable faces first.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-zenhei/wqy-zenhei.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Horizontal placement of a line within its frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Center,
    Right,
}

pub struct TextPainter {
    font: Option<FontArc>,
}

impl TextPainter {
    /// Load `font_path` if given, otherwise the first system font that parses
    pub fn load(font_path: Option<&Path>) -> Self {
        if let Some(path) = font_path {
            match read_font(path) {
                Some(font) => return Self { font: Some(font) },
                None => log::warn!(
                    "Configured font {} could not be loaded, searching system fonts",
                    path.display()
                ),
            }
        }

        let font = FONT_CANDIDATES
            .iter()
            .find_map(|candidate| read_font(Path::new(candidate)));
        if font.is_none() {
            log::warn!("No usable font found, sheet text will not be drawn");
        }
        Self { font }
    }

    /// Painter that never draws; used when text is not wanted
    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw one line, vertically centred in `frame`
    pub fn draw_line(
        &self,
        img: &mut RgbaImage,
        text: &str,
        frame: &Frame,
        size_px: f32,
        color: Rgba<u8>,
        align: Align,
    ) {
        let Some(font) = &self.font else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let scale = PxScale::from(size_px);
        let (w, h) = text_size(scale, font, text);
        let x = match align {
            Align::Center => frame.x + (frame.width - w as f32) * 0.5,
            Align::Right => frame.right() - w as f32,
        };
        let y = frame.y + (frame.height - h as f32) * 0.5;
        draw_text_mut(img, color, x.round() as i32, y.round() as i32, scale, font, text);
    }

    /// Draw text wrapped to the frame width, centred line by line.
    ///
    /// Lines that do not fit the frame height are dropped from the bottom.
    pub fn draw_wrapped(
        &self,
        img: &mut RgbaImage,
        text: &str,
        frame: &Frame,
        size_px: f32,
        color: Rgba<u8>,
    ) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(size_px);
        let measure = |s: &str| text_size(scale, font, s).0 as f32;
        let mut lines = wrap_lines(text, frame.width, measure);

        let line_h = size_px * LINE_SPACING;
        let max_lines = ((frame.height / line_h).floor() as usize).max(1);
        if lines.len() > max_lines {
            log::debug!("Caption truncated to {} line(s)", max_lines);
            lines.truncate(max_lines);
        }

        let block_h = line_h * lines.len() as f32;
        let mut y = frame.y + (frame.height - block_h).max(0.0) * 0.5;
        for line in &lines {
            let line_frame = Frame::new(frame.x, y, frame.width, line_h);
            self.draw_line(img, line, &line_frame, size_px, color, Align::Center);
            y += line_h;
        }
    }
}

fn read_font(path: &Path) -> Option<FontArc> {
    let bytes = std::fs::read(path).ok()?;
    match FontArc::try_from_vec(bytes) {
        Ok(font) => {
            log::debug!("Using font {}", path.display());
            Some(font)
        }
        Err(err) => {
            log::debug!("Skipping font {}: {}", path.display(), err);
            None
        }
    }
}

/// Greedy line breaking.
///
/// Breaks at the last space when a line overflows, or between characters
/// when there is none (CJK text has no spaces). Explicit newlines are kept.
pub fn wrap_lines(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for ch in paragraph.chars() {
            current.push(ch);
            if measure(&current) <= max_width || current.chars().count() == 1 {
                continue;
            }
            current.pop();
            match current.rfind(' ') {
                Some(idx) if idx > 0 => {
                    let rest = current.split_off(idx);
                    lines.push(current);
                    current = rest.trim_start().to_string();
                }
                _ => {
                    let line = std::mem::take(&mut current);
                    let line = line.trim_start();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                }
            }
            // No line starts with the space it broke at
            if !(current.is_empty() && ch == ' ') {
                current.push(ch);
            }
        }
        if !current.trim().is_empty() {
            lines.push(current.trim_end().to_string());
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten pixels per character
    fn mono(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let lines = wrap_lines("bank transfer record", 100.0, mono);
        assert_eq!(lines, ["bank", "transfer", "record"]);
    }

    #[test]
    fn test_wrap_breaks_cjk_between_chars() {
        let lines = wrap_lines("工资条与银行流水记录", 40.0, mono);
        assert_eq!(lines, ["工资条与", "银行流水", "记录"]);
    }

    #[test]
    fn test_wrap_at_full_width_word_has_no_leading_space() {
        let lines = wrap_lines("aaaaaaaaaa bbbbbbbbbbbb", 100.0, mono);
        assert_eq!(lines, ["aaaaaaaaaa", "bbbbbbbbbb", "bb"]);
        assert!(lines.iter().all(|l| !l.starts_with(' ')));
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        let lines = wrap_lines("a\nb", 100.0, mono);
        assert_eq!(lines, ["a", "b"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap_lines("", 100.0, mono).is_empty());
        assert!(wrap_lines("   ", 100.0, mono).is_empty());
    }

    #[test]
    fn test_painter_without_font_is_noop() {
        let painter = TextPainter::without_font();
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        let before = img.clone();
        painter.draw_wrapped(
            &mut img,
            "text",
            &Frame::new(0.0, 0.0, 20.0, 20.0),
            12.0,
            Rgba([0, 0, 0, 255]),
        );
        assert_eq!(img, before);
    }
}
