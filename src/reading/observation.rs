//! Hourly observation records and their month/sector attribution.

use chrono::{Datelike, Duration, NaiveDateTime};
use csv::StringRecord;

use super::{DirectionNormalizer, Sector};
use crate::error::{Result, WindRoseError};

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const TIMESTAMP_COLUMN: usize = 0;
const SPEED_COLUMN: usize = 1;
const DIRECTION_COLUMN: usize = 3;

/// One row of the input file, as logged.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub line: usize,
    pub timestamp: NaiveDateTime,
    pub raw_speed: Option<f64>,
    pub raw_direction: String,
}

/// An observation attributed to the hour in which it began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedObservation {
    pub month: u32,
    pub sector: Sector,
    pub speed: f64,
}

impl RawObservation {
    pub fn from_record(record: &StringRecord, line: usize) -> Result<Self> {
        let field = |column: usize| {
            record
                .get(column)
                .map(str::trim)
                .ok_or_else(|| WindRoseError::MalformedRow {
                    line,
                    reason: format!("expected at least {} columns, got {}", DIRECTION_COLUMN + 1, record.len()),
                })
        };

        let timestamp_field = field(TIMESTAMP_COLUMN)?;
        let speed_field = field(SPEED_COLUMN)?;
        let raw_direction = field(DIRECTION_COLUMN)?.to_string();

        let timestamp = NaiveDateTime::parse_from_str(timestamp_field, TIMESTAMP_FORMAT).map_err(|e| {
            WindRoseError::MalformedRow {
                line,
                reason: format!("timestamp {:?}: {}", timestamp_field, e),
            }
        })?;

        let raw_speed = match speed_field {
            "" => None,
            s => Some(parse_speed(s).map_err(|reason| WindRoseError::MalformedRow {
                line,
                reason: format!("speed {:?}: {}", s, reason),
            })?),
        };

        Ok(RawObservation {
            line,
            timestamp,
            raw_speed,
            raw_direction,
        })
    }

    /// Readings are logged at the end of the measured hour, so the month is
    /// taken from the timestamp one hour earlier.
    pub fn normalize(&self, normalizer: &DirectionNormalizer) -> Result<NormalizedObservation> {
        let began = self.timestamp - Duration::hours(1);
        let sector = normalizer.normalize(&self.raw_direction).map_err(|e| match e {
            WindRoseError::InvalidDirection { token, .. } => WindRoseError::InvalidDirection {
                token,
                line: self.line,
            },
            other => other,
        })?;

        Ok(NormalizedObservation {
            month: began.month(),
            sector,
            speed: self.raw_speed.unwrap_or(0.0),
        })
    }
}

// Speeds are finite and non-negative; `f64::from_str` also accepts `NaN`,
// `inf` and negatives.
fn parse_speed(s: &str) -> std::result::Result<f64, String> {
    let speed = s.parse::<f64>().map_err(|e| e.to_string())?;
    if !speed.is_finite() {
        return Err("not a finite number".to_string());
    }
    if speed < 0.0 {
        return Err("negative".to_string());
    }

    Ok(speed)
}

#[cfg(test)]
mod tests {

    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn should_parse_record() {
        let obs = RawObservation::from_record(&record(&["2023/07/14 13:00:00", " 3.4 ", "8", "南南西"]), 1)
            .unwrap();

        assert_eq!(obs.timestamp.month(), 7);
        assert_eq!(obs.raw_speed, Some(3.4));
        assert_eq!(obs.raw_direction, "南南西");
    }

    #[test]
    fn should_parse_unpadded_timestamp() {
        let obs = RawObservation::from_record(&record(&["2023/7/4 1:00:00", "1.0", "", "東"]), 1).unwrap();

        assert_eq!(obs.timestamp.day(), 4);
    }

    #[test]
    fn should_shift_into_previous_month() {
        let normalizer = DirectionNormalizer::new();
        let obs = RawObservation::from_record(&record(&["2023/01/01 00:30:00", "5.2", "—", "北"]), 1).unwrap();
        let n = obs.normalize(&normalizer).unwrap();

        assert_eq!(n.month, 12);
        assert_eq!(n.sector, Sector::NORTH);
        assert_eq!(n.speed, 5.2);
    }

    #[test]
    fn should_keep_month_within_hour() {
        let normalizer = DirectionNormalizer::new();
        let obs = RawObservation::from_record(&record(&["2023/03/01 01:00:00", "2.0", "", "西"]), 1).unwrap();

        assert_eq!(obs.normalize(&normalizer).unwrap().month, 3);
    }

    #[test]
    fn should_treat_empty_speed_as_zero() {
        let normalizer = DirectionNormalizer::new();
        let obs = RawObservation::from_record(&record(&["2023/05/10 10:00:00", "", "", ""]), 1).unwrap();
        let n = obs.normalize(&normalizer).unwrap();

        assert_eq!(obs.raw_speed, None);
        assert_eq!(n.speed, 0.0);
        assert_eq!(n.sector, Sector::CALM);
    }

    #[test]
    fn should_reject_bad_timestamp() {
        let result = RawObservation::from_record(&record(&["2023-05-10 10:00", "1.0", "", "北"]), 7);

        assert!(matches!(result, Err(WindRoseError::MalformedRow { line: 7, .. })));
    }

    #[test]
    fn should_reject_bad_speed() {
        let result = RawObservation::from_record(&record(&["2023/05/10 10:00:00", "calm", "", "北"]), 3);

        assert!(matches!(result, Err(WindRoseError::MalformedRow { line: 3, .. })));
    }

    #[test]
    fn should_reject_non_finite_speed() {
        for speed in ["NaN", "inf", "-inf", "infinity"] {
            let result = RawObservation::from_record(&record(&["2023/05/10 10:00:00", speed, "", "北"]), 4);

            assert!(
                matches!(result, Err(WindRoseError::MalformedRow { line: 4, .. })),
                "{} was accepted",
                speed
            );
        }
    }

    #[test]
    fn should_reject_negative_speed() {
        let result = RawObservation::from_record(&record(&["2023/05/10 10:00:00", "-3.0", "", "南"]), 5);

        assert!(matches!(result, Err(WindRoseError::MalformedRow { line: 5, .. })));
    }

    #[test]
    fn should_accept_zero_speed() {
        let obs = RawObservation::from_record(&record(&["2023/05/10 10:00:00", "0.0", "", "静穏"]), 1).unwrap();

        assert_eq!(obs.raw_speed, Some(0.0));
    }

    #[test]
    fn should_reject_short_row() {
        let result = RawObservation::from_record(&record(&["2023/05/10 10:00:00", "1.0"]), 2);

        assert!(matches!(result, Err(WindRoseError::MalformedRow { line: 2, .. })));
    }

    #[test]
    fn should_report_line_of_invalid_direction() {
        let normalizer = DirectionNormalizer::new();
        let obs = RawObservation::from_record(&record(&["2023/05/10 10:00:00", "1.0", "", "x北x"]), 42).unwrap();

        match obs.normalize(&normalizer) {
            Err(WindRoseError::InvalidDirection { token, line }) => {
                assert_eq!(token, "x北x");
                assert_eq!(line, 42);
            }
            other => panic!("expected InvalidDirection, got {:?}", other),
        }
    }
}
