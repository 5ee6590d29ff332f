use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette (one colour per series)
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Continuous scale: value → shade of red (choropleth fill)
// ---------------------------------------------------------------------------

/// Maps values in `[min, max]` onto a light-to-dark red ramp, interpolated
/// in linear RGB.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    min: f64,
    max: f64,
    low: LinSrgb,
    high: LinSrgb,
}

impl ColorScale {
    /// Build a "reds" scale spanning the finite values in `values`.
    /// `None` when there are none.
    pub fn reds<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(ColorScale {
            min,
            max,
            low: Srgb::new(1.0, 0.96, 0.94).into_linear(),
            high: Srgb::new(0.40, 0.0, 0.05).into_linear(),
        })
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Position of `value` on the scale, clamped to `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 1.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }

    /// Fill colour for `value`; non-finite values (e.g. the standard
    /// deviation of a single-plan state) are grey.
    pub fn color_for(&self, value: f64) -> Color32 {
        if !value.is_finite() {
            return Color32::GRAY;
        }
        let mixed = self.low.mix(self.high, self.fraction(value));
        to_color32(Srgb::from_linear(mixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_scale_range_ignores_nan() {
        let scale = ColorScale::reds([f64::NAN, 300.0, 100.0, 200.0]).unwrap();
        assert_eq!(scale.range(), (100.0, 300.0));
        assert_eq!(scale.fraction(200.0), 0.5);
        assert_eq!(scale.fraction(1000.0), 1.0);
        assert!(ColorScale::reds([f64::NAN]).is_none());
    }

    #[test]
    fn test_scale_darkens_with_value() {
        let scale = ColorScale::reds([0.0, 10.0]).unwrap();
        let light = scale.color_for(0.0);
        let dark = scale.color_for(10.0);
        let brightness = |c: Color32| u32::from(c.r()) + u32::from(c.g()) + u32::from(c.b());
        assert!(brightness(light) > brightness(dark));
        assert_eq!(scale.color_for(f64::NAN), Color32::GRAY);
    }

    #[test]
    fn test_flat_scale() {
        let scale = ColorScale::reds([5.0, 5.0]).unwrap();
        assert_eq!(scale.fraction(5.0), 1.0);
    }
}
