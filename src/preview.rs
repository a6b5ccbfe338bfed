//! Display zoom of the inline preview

/// Zoom factor between 0.5x and 2.0x, moved in 0.1 steps
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewZoom(f32);

impl PreviewZoom {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 2.0;
    pub const STEP: f32 = 0.1;

    pub fn new(factor: f32) -> Self {
        if factor.is_nan() {
            return Self::default();
        }
        Self(snap(factor.clamp(Self::MIN, Self::MAX)))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    pub fn zoom_in(self) -> Self {
        Self::new(self.0 + Self::STEP)
    }

    pub fn zoom_out(self) -> Self {
        Self::new(self.0 - Self::STEP)
    }

    /// Label shown next to the zoom buttons, e.g. "110%"
    pub fn label(self) -> String {
        format!("{}%", (self.0 * 100.0).round() as i32)
    }

    /// Size of an `width`x`height` artifact at this zoom
    pub fn apply(self, width: u32, height: u32) -> (u32, u32) {
        (
            (width as f32 * self.0).round() as u32,
            (height as f32 * self.0).round() as u32,
        )
    }
}

impl Default for PreviewZoom {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Round to the nearest step so repeated steps do not drift
fn snap(factor: f32) -> f32 {
    (factor / PreviewZoom::STEP).round() * PreviewZoom::STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut zoom = PreviewZoom::default();
        for _ in 0..20 {
            zoom = zoom.zoom_in();
        }
        assert_eq!(zoom.label(), "200%");

        for _ in 0..30 {
            zoom = zoom.zoom_out();
        }
        assert_eq!(zoom.label(), "50%");
    }

    #[test]
    fn test_steps_do_not_drift() {
        let zoom = PreviewZoom::default().zoom_in().zoom_in().zoom_in();
        assert_eq!(zoom.label(), "130%");
        assert!((zoom.get() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_apply_scales_dimensions() {
        assert_eq!(PreviewZoom::new(0.5).apply(2245, 1587), (1123, 794));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(PreviewZoom::new(9.0).get(), 2.0);
        assert_eq!(PreviewZoom::new(f32::NAN), PreviewZoom::default());
    }
}
