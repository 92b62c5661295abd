//! Produces the full set of diagrams: every month grouping crossed with every statistic.

use std::{
    fmt, fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{ImageOutputFormat, RgbImage};
use tempfile::NamedTempFile;

use crate::{
    cli::create_progress_bar,
    composite::overlay,
    error::Result,
    geometry::MapGeometry,
    render::RoseRenderer,
    stats::{Statistic, WindTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Year,
    Summer,
    Winter,
}

impl Grouping {
    pub const ALL: [Grouping; 3] = [Grouping::Year, Grouping::Summer, Grouping::Winter];

    pub fn name(self) -> &'static str {
        match self {
            Grouping::Year => "year",
            Grouping::Summer => "summer",
            Grouping::Winter => "winter",
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Month sets for the seasonal groupings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seasons {
    pub summer: Vec<u32>,
    pub winter: Vec<u32>,
}

impl Default for Seasons {
    fn default() -> Self {
        Seasons {
            summer: vec![4, 5, 6, 7, 8, 9, 10, 11],
            winter: vec![12, 1, 2, 3],
        }
    }
}

impl Seasons {
    pub fn months(&self, grouping: Grouping) -> Vec<u32> {
        match grouping {
            Grouping::Year => (1..=12).collect(),
            Grouping::Summer => self.summer.clone(),
            Grouping::Winter => self.winter.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    pub statistic: Statistic,
    pub grouping: Grouping,
    pub months: Vec<u32>,
}

impl DiagramRequest {
    pub fn file_name(&self) -> String {
        format!("{}_{}.png", self.statistic, self.grouping)
    }
}

/// Every grouping crossed with every statistic, skipping empty groupings.
pub fn requests(seasons: &Seasons) -> Vec<DiagramRequest> {
    Grouping::ALL
        .into_iter()
        .map(|grouping| (grouping, seasons.months(grouping)))
        .filter(|(_, months)| !months.is_empty())
        .flat_map(|(grouping, months)| {
            Statistic::ALL.into_iter().map(move |statistic| DiagramRequest {
                statistic,
                grouping,
                months: months.clone(),
            })
        })
        .collect()
}

pub struct DiagramOrchestrator<'a> {
    table: &'a WindTable,
    geometry: &'a MapGeometry,
    renderer: &'a RoseRenderer,
    output_dir: PathBuf,
}

impl<'a> DiagramOrchestrator<'a> {
    pub fn new(
        table: &'a WindTable,
        geometry: &'a MapGeometry,
        renderer: &'a RoseRenderer,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        DiagramOrchestrator {
            table,
            geometry,
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// Writes one image per request and returns their paths.
    pub fn run(&self, seasons: &Seasons) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;

        let requests = requests(seasons);
        let pb = create_progress_bar(requests.len() as u64, "Drawing diagrams...".to_string());
        let mut written = Vec::with_capacity(requests.len());

        for request in &requests {
            pb.set_message(request.file_name());
            let image = self.compose(request);
            let path = self.output_dir.join(request.file_name());
            save_png(&image, &path)?;

            tracing::debug!(path = %path.display(), months = ?request.months, "saved diagram");
            written.push(path);
            pb.inc(1);
        }

        pb.finish_with_message("Diagrams drawn");
        tracing::info!(
            count = written.len(),
            rotation = self.geometry.rotation(),
            dir = %self.output_dir.display(),
            "wrote diagrams"
        );

        Ok(written)
    }

    pub fn compose(&self, request: &DiagramRequest) -> RgbImage {
        let rose = self
            .renderer
            .render(self.table, request.statistic, &request.months, self.geometry);

        overlay(self.geometry.map(), &rose)
    }
}

// Written next to the target and renamed into place, so a failure never
// leaves a partial image behind.
fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let staging = NamedTempFile::new_in(dir)?;

    {
        let mut writer = BufWriter::new(staging.as_file());
        image.write_to(&mut writer, ImageOutputFormat::Png)?;
        writer.flush()?;
    }

    staging.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{Rgb, Rgba, RgbaImage};

    use super::*;
    use crate::{
        geometry::{CANVAS_HEIGHT, CANVAS_WIDTH},
        reading::{NormalizedObservation, Sector},
        render::Palette,
    };

    fn table() -> WindTable {
        let observations = [
            (12, 0, 5.2),
            (1, 0, 2.0),
            (1, 4, 3.0),
            (7, 8, 6.0),
            (7, 16, 0.0),
        ]
        .into_iter()
        .map(|(month, sector, speed)| NormalizedObservation {
            month,
            sector: Sector::new(sector).unwrap(),
            speed,
        })
        .collect::<Vec<_>>();

        WindTable::build(&observations)
    }

    fn map() -> RgbaImage {
        RgbaImage::from_fn(700, 700, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255]))
    }

    #[test]
    fn should_generate_nine_requests() {
        let requests = requests(&Seasons::default());

        assert_eq!(requests.len(), 9);
        assert_eq!(requests[0].file_name(), "wind_percentage_year.png");
        assert_eq!(requests[4].file_name(), "wind_mean_summer.png");
        assert_eq!(requests[8].file_name(), "wind_max_winter.png");
        assert_eq!(requests[0].months.len(), 12);
        assert_eq!(requests[6].months, vec![12, 1, 2, 3]);
    }

    #[test]
    fn should_skip_empty_grouping() {
        let seasons = Seasons {
            summer: vec![],
            winter: vec![1],
        };
        let requests = requests(&seasons);

        assert_eq!(requests.len(), 6);
        assert!(requests.iter().all(|r| r.grouping != Grouping::Summer));
    }

    #[test]
    fn should_write_nine_files_for_each_rotation() {
        let table = table();
        let renderer = RoseRenderer::new(Palette::new(), None);

        let mut maps = Vec::new();
        for rotation in [0, 90] {
            let dir = tempfile::tempdir().unwrap();
            let out = dir.path().join("diagrams");
            let geometry = MapGeometry::new(&map(), rotation);

            let written = DiagramOrchestrator::new(&table, &geometry, &renderer, &out)
                .run(&Seasons::default())
                .unwrap();

            assert_eq!(written.len(), 9);
            let mut names: Vec<String> = fs::read_dir(&out)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            assert_eq!(names.len(), 9);
            assert!(names.contains(&"wind_max_summer.png".to_string()));

            let image = image::open(&written[0]).unwrap().to_rgb8();
            assert_eq!(image.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
            maps.push(geometry.map().clone());
        }

        assert_ne!(maps[0], maps[1]);
    }

    #[test]
    fn should_composite_over_map() {
        let table = table();
        let renderer = RoseRenderer::new(Palette::new(), None);
        let geometry = MapGeometry::new(&map(), 0);
        let orchestrator = DiagramOrchestrator::new(&table, &geometry, &renderer, "unused");

        let request = DiagramRequest {
            statistic: Statistic::Max,
            grouping: Grouping::Winter,
            months: vec![12, 1, 2, 3],
        };
        let image = orchestrator.compose(&request);

        // untouched corner shows the map
        assert_eq!(image.get_pixel(2, 440), geometry.map().get_pixel(2, 440));
        assert_ne!(*image.get_pixel(2, 440), Rgb([255, 255, 255]));
    }
}
