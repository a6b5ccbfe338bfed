//! Page geometry for the printed sheet
//!
//! Positions are computed in CSS pixels (96 per inch) and multiplied by the
//! pixel ratio, so a ratio of 2 gives a 2245x1587 PNG for A4 landscape.

/// Page and band sizes in millimetres
pub mod page {
    pub const WIDTH_MM: f32 = 297.0;
    pub const HEIGHT_MM: f32 = 210.0;
    pub const PADDING_MM: f32 = 5.0;
    /// Band holding the title
    pub const HEADER_MM: f32 = 15.0;
    /// Space between the header band and the images
    pub const HEADER_GAP_MM: f32 = 2.0;
    /// Absolutely positioned band holding the page number
    pub const FOOTER_MM: f32 = 10.0;
    /// Caption band under each image
    pub const NOTE_MM: f32 = 10.0;
    /// Space between an image box and its caption
    pub const NOTE_GAP_MM: f32 = 2.0;
}

/// Text sizes and spacing in CSS pixels
pub mod text {
    pub const TITLE_PX: f32 = 20.0;
    pub const NOTE_PX: f32 = 14.0;
    pub const FOOTER_PX: f32 = 14.0;
    /// Gap between the footer text and the right page edge
    pub const FOOTER_RIGHT_PX: f32 = 16.0;
    /// Horizontal gutter on each side of a slot
    pub const SLOT_GUTTER_PX: f32 = 10.0;
    pub const LINE_SPACING: f32 = 1.3;
}

pub const CSS_PX_PER_MM: f32 = 96.0 / 25.4;

#[inline]
pub fn mm_to_px(mm: f32) -> f32 {
    mm * CSS_PX_PER_MM
}

/// Axis-aligned box in output pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Where one image and its caption go
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotFrames {
    pub image: Frame,
    pub note: Frame,
}

/// Resolved positions of every band on the page at a given pixel ratio
#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub pixel_ratio: f32,
    pub width: u32,
    pub height: u32,
    pub header: Frame,
    pub body: Frame,
    pub footer: Frame,
    pub slots: Vec<SlotFrames>,
}

impl PageLayout {
    /// Lay out a page holding `slot_count` images side by side
    pub fn new(slot_count: usize, pixel_ratio: f32) -> Self {
        let px = |mm: f32| mm_to_px(mm) * pixel_ratio;

        let width = px(page::WIDTH_MM).round() as u32;
        let height = px(page::HEIGHT_MM).round() as u32;
        let pad = px(page::PADDING_MM);

        let inner_w = width as f32 - 2.0 * pad;
        let header = Frame::new(pad, pad, inner_w, px(page::HEADER_MM));

        let footer_h = px(page::FOOTER_MM);
        let footer = Frame::new(0.0, height as f32 - footer_h, width as f32, footer_h);

        let body_top = header.bottom() + px(page::HEADER_GAP_MM);
        let body_bottom = height as f32 - pad - footer_h;
        let body = Frame::new(pad, body_top, inner_w, body_bottom - body_top);

        let slots = slot_frames(&body, slot_count, pixel_ratio);

        Self {
            pixel_ratio,
            width,
            height,
            header,
            body,
            footer,
            slots,
        }
    }
}

fn slot_frames(body: &Frame, count: usize, pixel_ratio: f32) -> Vec<SlotFrames> {
    if count == 0 {
        return Vec::new();
    }

    let gutter = text::SLOT_GUTTER_PX * pixel_ratio;
    let note_h = mm_to_px(page::NOTE_MM) * pixel_ratio;
    let note_gap = mm_to_px(page::NOTE_GAP_MM) * pixel_ratio;
    let slot_w = body.width / count as f32;
    let image_h = body.height - note_h - note_gap;

    (0..count)
        .map(|i| {
            let x = body.x + slot_w * i as f32 + gutter;
            let w = slot_w - 2.0 * gutter;
            SlotFrames {
                image: Frame::new(x, body.y, w, image_h),
                note: Frame::new(x, body.y + image_h + note_gap, w, note_h),
            }
        })
        .collect()
}

/// Largest size with the source aspect ratio that fits inside the box
pub fn contain(src_w: u32, src_h: u32, box_w: f32, box_h: f32) -> (f32, f32) {
    if src_w == 0 || src_h == 0 || box_w <= 0.0 || box_h <= 0.0 {
        return (0.0, 0.0);
    }
    let factor = (box_w / src_w as f32).min(box_h / src_h as f32);
    (src_w as f32 * factor, src_h as f32 * factor)
}

/// Bounding box of a `w`x`h` rectangle rotated by `degrees` and scaled
pub fn transformed_bounds(w: f32, h: f32, degrees: f32, scale: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let bw = (w * cos).abs() + (h * sin).abs();
    let bh = (w * sin).abs() + (h * cos).abs();
    (bw * scale, bh * scale)
}
