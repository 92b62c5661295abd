//! Fixed month colours.

use image::Rgba;

const MONTHS: usize = 12;
/// The hue circle is split into 13 steps so that December and January stay
/// distinguishable.
const HUE_STEPS: f64 = 13.0;
const HUE_OFFSET: f64 = 0.01;
const LIGHTNESS: f64 = 0.5;
const SATURATION: f64 = 1.0;

/// One colour per month, evenly spaced around the HLS hue circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: [Rgba<u8>; MONTHS],
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    pub fn new() -> Self {
        let mut colors = [Rgba([0, 0, 0, 255]); MONTHS];
        for (i, color) in colors.iter_mut().enumerate() {
            let hue = (i as f64 / HUE_STEPS + HUE_OFFSET).fract();
            let (r, g, b) = hls_to_rgb(hue, LIGHTNESS, SATURATION);
            *color = Rgba([to_byte(r), to_byte(g), to_byte(b), 255]);
        }

        Palette { colors }
    }

    /// Colour for a 1-based month. Out of range months wrap around.
    pub fn color(&self, month: u32) -> Rgba<u8> {
        self.colors[(month as usize + MONTHS - 1) % MONTHS]
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;

    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_start_near_red() {
        let palette = Palette::new();
        let Rgba([r, g, b, a]) = palette.color(1);

        assert_eq!(r, 255);
        assert!(g < 30);
        assert_eq!(b, 0);
        assert_eq!(a, 255);
    }

    #[test]
    fn should_give_each_month_a_distinct_colour() {
        let palette = Palette::new();

        for a in 1..=12 {
            for b in (a + 1)..=12 {
                assert_ne!(palette.color(a), palette.color(b));
            }
        }
    }

    #[test]
    fn should_be_deterministic() {
        assert_eq!(Palette::new(), Palette::new());
        assert_eq!(Palette::new().color(13), Palette::new().color(1));
    }

    #[test]
    fn should_convert_primary_hues() {
        assert_eq!(hls_to_rgb(0.0, 0.5, 1.0), (1.0, 0.0, 0.0));
        assert_eq!(hls_to_rgb(1.0 / 3.0, 0.5, 1.0), (0.0, 1.0, 0.0));
        assert_eq!(hls_to_rgb(0.5, 1.0, 0.0), (1.0, 1.0, 1.0));
    }
}
