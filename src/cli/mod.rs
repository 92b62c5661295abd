//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use crate::diagram::Seasons;

#[derive(Parser, Debug)]
#[command(version, about = "Generate wind rose diagrams.", long_about = None)]
pub struct Cli {
    /// The angle to rotate wind rose diagrams, in degrees
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub angle: i64,

    /// Hourly wind observations (timestamp, speed, _, direction)
    #[arg(long, default_value = "wind.csv")]
    pub wind: PathBuf,

    /// Base map drawn under the diagrams
    #[arg(long, default_value = "map.png")]
    pub map: PathBuf,

    /// Directory the diagrams are written to
    #[arg(short, long, default_value = "diagrams")]
    pub output_dir: PathBuf,

    /// Months of the summer diagrams
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 0..,
        default_value = "4,5,6,7,8,9,10,11",
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub summer: Vec<u32>,

    /// Months of the winter diagrams
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 0..,
        default_value = "12,1,2,3",
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub winter: Vec<u32>,

    /// Font used for labels. Common CJK system fonts are tried when omitted
    #[arg(long)]
    pub font: Option<PathBuf>,
}

impl Cli {
    pub fn seasons(&self) -> Seasons {
        Seasons {
            summer: self.summer.clone(),
            winter: self.winter.clone(),
        }
    }
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
