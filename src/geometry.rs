//! Rotation-aware geometry shared by the rose diagram and the base map.
//!
//! A single rotation drives both the plotting angles of the compass sectors
//! and the rotation of the map crop, so that north on the diagram always
//! points at north on the rotated map.

use std::{f64::consts::TAU, path::Path};

use image::{imageops, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::{
    error::{Result, WindRoseError},
    reading::COMPASS_POINTS,
};

pub const CANVAS_WIDTH: u32 = 550;
pub const CANVAS_HEIGHT: u32 = 450;

/// Side of the square cut from the source map before rotation. Large enough
/// that the rotated square still covers the visible map at any angle.
pub const MAP_CROP_SIZE: u32 = 640;
/// Side of the visible square map, anchored at the top-left of the canvas.
pub const MAP_SIZE: u32 = 450;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Reduces any angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: i64) -> u32 {
    degrees.rem_euclid(360) as u32
}

/// Plotting angle of each compass point, in radians within `[0, 2π)`.
///
/// Angles follow the mathematical convention (0 = east, counter-clockwise),
/// while compass points run clockwise from north: `0.25` puts north at the
/// top and the negative step turns the ordering clockwise.
pub fn angles_for(rotation_degrees: u32) -> [f64; COMPASS_POINTS] {
    let mut angles = [0.0; COMPASS_POINTS];
    for (i, angle) in angles.iter_mut().enumerate() {
        let turns = 0.25 - i as f64 / COMPASS_POINTS as f64 + rotation_degrees as f64 / 360.0;
        *angle = wrap_angle(turns * TAU);
    }

    angles
}

fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Crops the centre of `orig` to `width` x `height`. A source smaller than
/// the target is centred on a white background.
pub fn center_crop(orig: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (orig_width, orig_height) = orig.dimensions();
    let crop_left = orig_width.saturating_sub(width) / 2;
    let crop_top = orig_height.saturating_sub(height) / 2;

    let cropped = imageops::crop_imm(orig, crop_left, crop_top, width.min(orig_width), height.min(orig_height))
        .to_image();

    let (cropped_width, cropped_height) = cropped.dimensions();
    let padding_left = (width - cropped_width) / 2;
    let padding_top = (height - cropped_height) / 2;

    let mut background = RgbImage::from_pixel(width, height, WHITE);
    imageops::replace(&mut background, &cropped, padding_left as i64, padding_top as i64);

    background
}

/// Drops the alpha channel by compositing onto white.
pub fn flatten(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// The rotation for one run, with its derived angles and map background.
#[derive(Debug, Clone)]
pub struct MapGeometry {
    rotation: u32,
    angles: [f64; COMPASS_POINTS],
    map: RgbImage,
}

impl MapGeometry {
    pub fn load(path: &Path, rotation_degrees: i64) -> Result<Self> {
        if !path.is_file() {
            return Err(WindRoseError::MissingInputFile {
                path: path.to_path_buf(),
            });
        }

        let source = image::open(path)?.to_rgba8();
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            path = %path.display(),
            "loaded base map"
        );

        Ok(MapGeometry::new(&source, rotation_degrees))
    }

    pub fn new(source: &RgbaImage, rotation_degrees: i64) -> Self {
        let rotation = normalize_rotation(rotation_degrees);
        let angles = angles_for(rotation);
        let map = crop_and_rotate(source, rotation);

        MapGeometry { rotation, angles, map }
    }

    pub fn rotation(&self) -> u32 {
        self.rotation
    }

    pub fn angles(&self) -> &[f64; COMPASS_POINTS] {
        &self.angles
    }

    /// Angles with the first repeated, closing a polygon.
    pub fn closed_angles(&self) -> Vec<f64> {
        let mut closed = self.angles.to_vec();
        closed.push(self.angles[0]);
        closed
    }

    /// Canvas-sized map background.
    pub fn map(&self) -> &RgbImage {
        &self.map
    }
}

/// Crops, rotates counter-clockwise by `rotation_degrees` and re-crops the
/// map, placing it at the left of a white canvas.
pub fn crop_and_rotate(source: &RgbaImage, rotation_degrees: u32) -> RgbImage {
    let square = center_crop(&flatten(source), MAP_CROP_SIZE, MAP_CROP_SIZE);

    // imageproc rotates clockwise for positive angles
    let theta = -(rotation_degrees as f32).to_radians();
    let rotated = if rotation_degrees == 0 {
        square
    } else {
        rotate_about_center(&square, theta, Interpolation::Nearest, WHITE)
    };

    let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, WHITE);
    imageops::replace(&mut canvas, &center_crop(&rotated, MAP_SIZE, MAP_SIZE), 0, 0);

    canvas
}
