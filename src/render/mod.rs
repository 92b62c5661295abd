//! Polar rose rendering.
//!
//! Draws one closed polyline per month on a shared polar axis, with the
//! compass labels placed at the rotation-aware sector angles. The result is a
//! transparent canvas-sized image ready to be composited over the map.

pub mod font;
pub mod palette;

use image::{Rgba, RgbaImage};
use imageproc::{
    drawing::{
        draw_antialiased_line_segment_mut, draw_filled_rect_mut, draw_hollow_circle_mut,
        draw_line_segment_mut, draw_text_mut, text_size,
    },
    pixelops::interpolate,
    rect::Rect,
};
use rusttype::{Font, Scale};

pub use font::load_font;
pub use palette::Palette;

use crate::{
    geometry::{MapGeometry, CANVAS_HEIGHT, CANVAS_WIDTH},
    reading::Sector,
    stats::{Statistic, WindTable},
};

/// Centre of the polar axes. Shifted right of the map centre by the same
/// margin the compositor removes.
const CENTER: (f32, f32) = (235.0, 225.0);
const RADIUS: f32 = 160.0;
const LABEL_RADIUS: f32 = 185.0;
const RINGS: usize = 4;
/// Direction (mathematical angle, radians) along which ring values are printed.
const RING_LABEL_ANGLE: f32 = std::f32::consts::PI / 8.0;

const TICK_FONT_SIZE: f32 = 16.0;
const RING_FONT_SIZE: f32 = 11.0;
const LEGEND_FONT_SIZE: f32 = 13.0;
const LEGEND_X: i32 = 470;
const LEGEND_Y: i32 = 30;
const LEGEND_ROW: i32 = 20;
const LEGEND_SWATCH: u32 = 18;

const GRID: Rgba<u8> = Rgba([176, 176, 176, 255]);
const SPINE: Rgba<u8> = Rgba([64, 64, 64, 255]);
const TEXT: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

pub struct RoseRenderer {
    palette: Palette,
    font: Option<Font<'static>>,
}

impl RoseRenderer {
    pub fn new(palette: Palette, font: Option<Font<'static>>) -> Self {
        if font.is_none() {
            tracing::warn!("no font available, diagrams will be drawn without labels");
        }

        RoseRenderer { palette, font }
    }

    pub fn render(
        &self,
        table: &WindTable,
        statistic: Statistic,
        months: &[u32],
        geometry: &MapGeometry,
    ) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, TRANSPARENT);

        let series: Vec<(u32, Vec<f64>)> = months
            .iter()
            .map(|&month| (month, closed_series(table, statistic, month)))
            .collect();

        let peak = series
            .iter()
            .flat_map(|(_, values)| values.iter().copied())
            .fold(0.0, f64::max);
        let r_max = nice_ceiling(peak);

        self.draw_axes(&mut canvas, geometry, r_max);

        let angles = geometry.closed_angles();
        for (month, values) in &series {
            let points: Vec<(f32, f32)> = angles
                .iter()
                .zip(values)
                .map(|(&theta, &value)| to_pixel(theta as f32, (value / r_max) as f32 * RADIUS))
                .collect();
            draw_polyline(&mut canvas, &points, self.palette.color(*month));
        }

        self.draw_legend(&mut canvas, months);

        canvas
    }

    fn draw_axes(&self, canvas: &mut RgbaImage, geometry: &MapGeometry, r_max: f64) {
        let center = (CENTER.0.round() as i32, CENTER.1.round() as i32);

        for ring in 1..RINGS {
            let r = RADIUS * ring as f32 / RINGS as f32;
            draw_hollow_circle_mut(canvas, center, r.round() as i32, GRID);
        }
        draw_hollow_circle_mut(canvas, center, RADIUS.round() as i32, SPINE);

        for &theta in geometry.angles() {
            draw_line_segment_mut(canvas, CENTER, to_pixel(theta as f32, RADIUS), GRID);
        }

        let Some(font) = &self.font else {
            return;
        };

        let tick_scale = Scale::uniform(TICK_FONT_SIZE);
        for (sector, &theta) in Sector::compass().zip(geometry.angles()) {
            let (x, y) = to_pixel(theta as f32, LABEL_RADIUS);
            draw_centered_text(canvas, font, tick_scale, (x, y), sector.label());
        }

        let ring_scale = Scale::uniform(RING_FONT_SIZE);
        for ring in 1..=RINGS {
            let value = r_max * ring as f64 / RINGS as f64;
            let r = RADIUS * ring as f32 / RINGS as f32;
            let position = to_pixel(RING_LABEL_ANGLE, r);
            draw_centered_text(canvas, font, ring_scale, position, &format_tick(value));
        }
    }

    fn draw_legend(&self, canvas: &mut RgbaImage, months: &[u32]) {
        let scale = Scale::uniform(LEGEND_FONT_SIZE);

        for (row, &month) in months.iter().enumerate() {
            let y = LEGEND_Y + row as i32 * LEGEND_ROW;
            let color = self.palette.color(month);
            draw_filled_rect_mut(canvas, Rect::at(LEGEND_X, y + 7).of_size(LEGEND_SWATCH, 3), color);

            if let Some(font) = &self.font {
                let label = format!("{}月", month);
                draw_text_mut(canvas, TEXT, LEGEND_X + LEGEND_SWATCH as i32 + 6, y, scale, font, &label);
            }
        }
    }
}

/// The 16 compass values for `month`, with the first repeated to close the
/// polygon. Calm is not plotted.
pub fn closed_series(table: &WindTable, statistic: Statistic, month: u32) -> Vec<f64> {
    let mut values: Vec<f64> = Sector::compass()
        .map(|sector| table.value(month, sector, statistic))
        .collect();
    values.push(values[0]);
    values
}

/// Smallest of 1, 2, 2.5, 5 x 10^k that is at least `value`.
pub fn nice_ceiling(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }

    let magnitude = 10f64.powf(value.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|step| step * magnitude)
        .find(|&bound| bound >= value)
        .unwrap_or(10.0 * magnitude)
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn to_pixel(theta: f32, r: f32) -> (f32, f32) {
    (CENTER.0 + r * theta.cos(), CENTER.1 - r * theta.sin())
}

// A second stroke one pixel along the normal gives a 2px line.
fn draw_polyline(canvas: &mut RgbaImage, points: &[(f32, f32)], color: Rgba<u8>) {
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let length = (dx * dx + dy * dy).sqrt();
        let (nx, ny) = if length > 0.0 {
            (-dy / length, dx / length)
        } else {
            (1.0, 0.0)
        };

        for side in [0.0, 1.0] {
            let start = ((x0 + side * nx).round() as i32, (y0 + side * ny).round() as i32);
            let end = ((x1 + side * nx).round() as i32, (y1 + side * ny).round() as i32);
            if start == end {
                continue;
            }
            draw_antialiased_line_segment_mut(canvas, start, end, color, interpolate);
        }
    }
}

fn draw_centered_text(canvas: &mut RgbaImage, font: &Font, scale: Scale, at: (f32, f32), text: &str) {
    let (w, h) = text_size(scale, font, text);
    let x = at.0.round() as i32 - w / 2;
    let y = at.1.round() as i32 - h / 2;
    draw_text_mut(canvas, TEXT, x, y, scale, font, text);
}
