pub mod direction;
pub mod observation;

pub use direction::{DirectionNormalizer, Sector, COMPASS_POINTS, DIRECTIONS};
pub use observation::{NormalizedObservation, RawObservation};
