//! Font discovery for compass and legend labels.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusttype::Font;

/// Common locations of fonts with Japanese glyphs.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansJP-Regular.ttf",
    "/usr/share/fonts/opentype/ipafont-gothic/ipag.ttf",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\YuGothR.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

/// Loads `explicit` if given, otherwise the first candidate that parses.
pub fn load_font(explicit: Option<&Path>) -> Option<Font<'static>> {
    match explicit {
        Some(path) => {
            let font = read_font(path);
            if font.is_none() {
                tracing::warn!(path = %path.display(), "could not load font");
            }
            font
        }
        None => FONT_CANDIDATES.iter().map(PathBuf::from).find_map(|path| {
            let font = read_font(&path)?;
            tracing::debug!(path = %path.display(), "using font");
            Some(font)
        }),
    }
}

fn read_font(path: &Path) -> Option<Font<'static>> {
    let data = fs::read(path).ok()?;
    // font collections hold several faces; the first is the regular one
    Font::try_from_vec_and_index(data, 0)
}
