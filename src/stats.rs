//! Monthly per-sector wind statistics.

use std::{fmt, path::Path, str::FromStr};

use crate::{
    deserialise::read_observations,
    error::{Result, WindRoseError},
    reading::{DirectionNormalizer, NormalizedObservation, Sector, DIRECTIONS},
};

const MONTHS: usize = 12;
const SECTORS: usize = DIRECTIONS.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Percentage,
    Mean,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 3] = [Statistic::Percentage, Statistic::Mean, Statistic::Max];

    /// Column name, also used as the output file prefix.
    pub fn name(self) -> &'static str {
        match self {
            Statistic::Percentage => "wind_percentage",
            Statistic::Mean => "wind_mean",
            Statistic::Max => "wind_max",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = WindRoseError;

    fn from_str(s: &str) -> Result<Self> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| WindRoseError::UnsupportedStatistic(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSectorStat {
    pub month: u32,
    pub sector: Sector,
    pub percentage: f64,
    pub mean_speed: f64,
    pub max_speed: f64,
}

impl MonthSectorStat {
    pub fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Percentage => self.percentage,
            Statistic::Mean => self.mean_speed,
            Statistic::Max => self.max_speed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    count: usize,
    sum: f64,
    max: f64,
}

/// Aggregated statistics for every (month, sector) pair seen in the data.
#[derive(Debug, Clone, PartialEq)]
pub struct WindTable {
    rows: Vec<MonthSectorStat>,
    hours: [usize; MONTHS],
    index: [[Option<usize>; SECTORS]; MONTHS],
}

impl WindTable {
    /// Reads, normalizes and aggregates the observations file.
    pub fn load(path: &Path, normalizer: &DirectionNormalizer) -> Result<Self> {
        let raw = read_observations(path)?;
        let observations = raw
            .iter()
            .map(|r| r.normalize(normalizer))
            .collect::<Result<Vec<_>>>()?;

        let table = WindTable::build(&observations);
        for row in table.rows() {
            tracing::trace!(
                month = row.month,
                sector = row.sector.label(),
                percentage = row.percentage,
                mean = row.mean_speed,
                max = row.max_speed,
                "wind statistic"
            );
        }
        tracing::info!(
            observations = observations.len(),
            groups = table.rows().len(),
            empty_months = (1..=MONTHS as u32).filter(|&m| table.hours(m) == 0).count(),
            "aggregated wind observations"
        );

        Ok(table)
    }

    pub fn build(observations: &[NormalizedObservation]) -> Self {
        let mut hours = [0usize; MONTHS];
        let mut groups = [[Accumulator::default(); SECTORS]; MONTHS];

        for obs in observations {
            let Some(m) = month_slot(obs.month) else {
                tracing::warn!(month = obs.month, "skipping observation outside the calendar");
                continue;
            };
            hours[m] += 1;

            let acc = &mut groups[m][obs.sector.index()];
            acc.count += 1;
            acc.sum += obs.speed;
            acc.max = if acc.count == 1 { obs.speed } else { acc.max.max(obs.speed) };
        }

        let mut rows = Vec::new();
        let mut index = [[None; SECTORS]; MONTHS];

        for (m, month_groups) in groups.iter().enumerate() {
            for sector in Sector::all() {
                let acc = month_groups[sector.index()];
                if acc.count == 0 {
                    continue;
                }

                index[m][sector.index()] = Some(rows.len());
                rows.push(MonthSectorStat {
                    month: m as u32 + 1,
                    sector,
                    percentage: or_zero(acc.count as f64 / hours[m] as f64 * 100.0),
                    mean_speed: or_zero(acc.sum / acc.count as f64),
                    max_speed: or_zero(acc.max),
                });
            }
        }

        WindTable { rows, hours, index }
    }

    /// Rows ordered by month, then sector.
    pub fn rows(&self) -> &[MonthSectorStat] {
        &self.rows
    }

    /// Observation-hours attributed to `month`.
    pub fn hours(&self, month: u32) -> usize {
        month_slot(month).map_or(0, |m| self.hours[m])
    }

    pub fn get(&self, month: u32, sector: Sector) -> Option<&MonthSectorStat> {
        let m = month_slot(month)?;
        self.index[m][sector.index()].map(|i| &self.rows[i])
    }

    /// A pair that never occurred reads as 0.
    pub fn value(&self, month: u32, sector: Sector, statistic: Statistic) -> f64 {
        self.get(month, sector).map_or(0.0, |row| row.get(statistic))
    }
}

fn month_slot(month: u32) -> Option<usize> {
    (1..=MONTHS as u32).contains(&month).then(|| month as usize - 1)
}

// Aggregates over no observations are defined as 0.
fn or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
