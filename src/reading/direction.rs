//! Wind direction sectors and the normalizer that maps raw tokens onto them.

use std::collections::HashMap;

use crate::error::{Result, WindRoseError};

/// Canonical direction labels, clockwise from north. The last entry is calm.
pub const DIRECTIONS: [&str; 17] = [
    "北", "北北東", "北東", "東北東", "東", "東南東", "南東", "南南東", "南", "南南西", "南西",
    "西南西", "西", "西北西", "北西", "北北西", "静穏",
];

/// Number of compass points that have a plotting angle.
pub const COMPASS_POINTS: usize = 16;

/// One of the 16 compass points or calm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sector(u8);

impl Sector {
    pub const NORTH: Sector = Sector(0);
    pub const CALM: Sector = Sector(16);

    pub fn new(index: usize) -> Option<Self> {
        (index < DIRECTIONS.len()).then(|| Sector(index as u8))
    }

    /// Iterates the 16 compass points, excluding calm.
    pub fn compass() -> impl Iterator<Item = Sector> {
        (Sector::NORTH.0..Sector::CALM.0).map(Sector)
    }

    pub fn all() -> impl Iterator<Item = Sector> {
        (0..DIRECTIONS.len()).filter_map(Sector::new)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn label(self) -> &'static str {
        DIRECTIONS[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

/// Maps raw direction tokens to sectors.
///
/// Tokens in the source data occasionally carry a run of stray characters on
/// one side (`北微北`, `南東)`). The side that does not begin or end with a
/// canonical label is trimmed one character at a time until a canonical
/// label remains.
#[derive(Debug, Clone)]
pub struct DirectionNormalizer {
    lookup: HashMap<&'static str, Sector>,
}

impl Default for DirectionNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectionNormalizer {
    pub fn new() -> Self {
        let lookup = Sector::all().map(|s| (s.label(), s)).collect();

        DirectionNormalizer { lookup }
    }

    pub fn normalize(&self, raw: &str) -> Result<Sector> {
        if raw.is_empty() {
            return Ok(Sector::CALM);
        }
        if let Some(sector) = self.lookup.get(raw) {
            return Ok(*sector);
        }

        let clean_start = DIRECTIONS.iter().any(|d| raw.starts_with(d));
        let clean_end = DIRECTIONS.iter().any(|d| raw.ends_with(d));

        let sector = match (clean_start, clean_end) {
            (true, false) => self.strip(raw, Side::End),
            (false, true) => self.strip(raw, Side::Start),
            (true, true) => match (self.strip(raw, Side::End), self.strip(raw, Side::Start)) {
                (Some(a), Some(b)) if a == b => Some(a),
                _ => None,
            },
            (false, false) => None,
        };

        sector.ok_or_else(|| WindRoseError::InvalidDirection {
            token: raw.to_string(),
            line: 0,
        })
    }

    // Drops characters from `side` until the remainder is canonical. Only
    // called when the opposite side already holds a label, so it always
    // converges on one.
    fn strip(&self, raw: &str, side: Side) -> Option<Sector> {
        let mut rest = raw;
        loop {
            let mut chars = rest.chars();
            match side {
                Side::End => chars.next_back(),
                Side::Start => chars.next(),
            }?;
            rest = chars.as_str();
            if let Some(sector) = self.lookup.get(rest) {
                return Some(*sector);
            }
        }
    }
}
