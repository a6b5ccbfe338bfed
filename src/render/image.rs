//! Sheet rasterization using tiny-skia
//!
//! Images are composed onto a tiny-skia pixmap with their rotation and scale,
//! then text is drawn on the resulting `RgbaImage` in a second pass.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    Color, ColorU8, FilterQuality, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    StrokeDash, Transform,
};

use super::geometry::{self, Frame, PageLayout, page, text};
use super::text::{Align, TextPainter};
use crate::capture::target::{ImageElement, RenderTarget};
use crate::capture::{RasterOptions, Rasterize};
use crate::error::RasterError;

const TITLE_COLOR: Rgba<u8> = Rgba([17, 17, 17, 255]);
const NOTE_COLOR: Rgba<u8> = Rgba([51, 51, 51, 255]);
const FOOTER_COLOR: Rgba<u8> = Rgba([17, 17, 17, 255]);
const PLACEHOLDER_FILL: [u8; 4] = [249, 250, 251, 255];
const PLACEHOLDER_BORDER: [u8; 4] = [209, 213, 219, 255];

/// Default [`Rasterize`] implementation for the printed sheet
pub struct SheetRenderer {
    text: TextPainter,
}

impl SheetRenderer {
    pub fn new(text: TextPainter) -> Self {
        Self { text }
    }
}

impl Rasterize for SheetRenderer {
    fn rasterize(
        &self,
        target: &RenderTarget,
        options: &RasterOptions,
    ) -> Result<RgbaImage, RasterError> {
        let ratio = options.pixel_ratio;
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(RasterError::Other(format!("invalid pixel ratio {ratio}")));
        }

        let layout = PageLayout::new(target.elements.len(), ratio);
        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or(RasterError::Canvas {
            width: layout.width,
            height: layout.height,
        })?;

        let [r, g, b, a] = options.background;
        pixmap.fill(Color::from_rgba8(r, g, b, a));

        if target.is_empty() {
            draw_placeholder(&mut pixmap, &layout.body, ratio);
        }

        for (element, slot) in target.elements.iter().zip(&layout.slots) {
            draw_element(&mut pixmap, element, &slot.image);
        }

        let mut img = into_rgba(&pixmap)?;

        self.text.draw_line(
            &mut img,
            &target.title,
            &layout.header,
            text::TITLE_PX * ratio,
            TITLE_COLOR,
            Align::Center,
        );

        for (element, slot) in target.elements.iter().zip(&layout.slots) {
            self.text
                .draw_wrapped(&mut img, &element.note, &slot.note, text::NOTE_PX * ratio, NOTE_COLOR);
        }

        if options.include_overlays {
            let pad = geometry::mm_to_px(page::PADDING_MM) * ratio;
            let footer = Frame::new(
                layout.footer.x,
                layout.footer.y,
                layout.footer.width - text::FOOTER_RIGHT_PX * ratio,
                layout.footer.height - pad,
            );
            self.text.draw_line(
                &mut img,
                &format!("P {}", target.page_number),
                &footer,
                text::FOOTER_PX * ratio,
                FOOTER_COLOR,
                Align::Right,
            );
        }

        Ok(img)
    }
}

/// Draw one element fitted into its box, rotated and scaled about the centre
fn draw_element(pixmap: &mut Pixmap, element: &ImageElement, frame: &Frame) {
    let Some(pixels) = element.pixels() else {
        log::debug!("Skipping {} with no pixels", element.file_name);
        return;
    };
    let Some(src) = pixmap_from_rgba(pixels) else {
        return;
    };

    let (nat_w, nat_h) = pixels.dimensions();
    let (fit_w, fit_h) = geometry::contain(nat_w, nat_h, frame.width, frame.height);
    if fit_w <= 0.0 || fit_h <= 0.0 {
        return;
    }

    let scale = element.scale.get();
    let degrees = f32::from(element.rotation.degrees());
    let (bound_w, bound_h) = geometry::transformed_bounds(fit_w, fit_h, degrees, scale);
    if bound_w > frame.width + 0.5 || bound_h > frame.height + 0.5 {
        log::debug!("{} overflows its slot", element.file_name);
    }

    let (cx, cy) = frame.center();
    let transform = Transform::from_translate(cx, cy)
        .pre_rotate(degrees)
        .pre_scale(scale * fit_w / nat_w as f32, scale * fit_h / nat_h as f32)
        .pre_translate(-(nat_w as f32) * 0.5, -(nat_h as f32) * 0.5);

    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..Default::default()
    };
    pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
}

/// Empty-sheet panel: a light box with a dashed border
fn draw_placeholder(pixmap: &mut Pixmap, body: &Frame, ratio: f32) {
    let inset = text::SLOT_GUTTER_PX * ratio;
    let Some(rect) = tiny_skia::Rect::from_xywh(
        body.x + inset,
        body.y + inset,
        body.width - 2.0 * inset,
        body.height - 2.0 * inset,
    ) else {
        return;
    };

    let mut fill = Paint::default();
    let [r, g, b, a] = PLACEHOLDER_FILL;
    fill.set_color_rgba8(r, g, b, a);
    pixmap.fill_rect(rect, &fill, Transform::identity(), None);

    let mut border = Paint::default();
    let [r, g, b, a] = PLACEHOLDER_BORDER;
    border.set_color_rgba8(r, g, b, a);
    border.anti_alias = true;
    let stroke = Stroke {
        width: 2.0 * ratio,
        dash: StrokeDash::new(vec![8.0 * ratio, 6.0 * ratio], 0.0),
        ..Default::default()
    };
    let path = PathBuilder::from_rect(rect);
    pixmap.stroke_path(&path, &border, &stroke, Transform::identity(), None);
}

/// Straight-alpha RGBA into a premultiplied pixmap
fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut data = Vec::with_capacity(img.as_raw().len());
    for pixel in img.pixels() {
        let [r, g, b, a] = pixel.0;
        let c = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, size)
}

/// Premultiplied pixmap back into straight-alpha RGBA
fn into_rgba(pixmap: &Pixmap) -> Result<RgbaImage, RasterError> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| RasterError::Other("pixmap size mismatch".into()))
}
