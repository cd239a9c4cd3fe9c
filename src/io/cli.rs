//! Command-line interface for generating stamp paintings

use crate::generate::controller::GenerationController;
use crate::io::configuration::{
    DEFAULT_COLOR_MODEL_COUNT, DEFAULT_HEIGHT, DEFAULT_STAMP_COUNT_DEMULTIPLIER,
    DEFAULT_STAMP_GROUP_COUNT, DEFAULT_STAMPS_PER_GROUP, DEFAULT_WIDTH, Preferences,
};
use crate::io::error::Result;
use crate::io::image::export_png;
use crate::io::loader::StampLoader;
use crate::io::progress::{ProgressBarListener, ProgressListener, SilentListener};
use crate::paint::CancellationToken;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stampede")]
#[command(
    author,
    version,
    about = "Generate procedural paintings from randomized stamp projections"
)]
/// Command-line arguments for the painting generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Directory of stamp PNGs, one subdirectory per group
    #[arg(value_name = "STAMPS_DIR")]
    pub stamps_dir: PathBuf,

    /// Output directory for generated paintings
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Canvas width in pixels
    #[arg(short, long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Random seed for a reproducible image sequence
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of paintings to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Number of color models in the pallette
    #[arg(long, default_value_t = DEFAULT_COLOR_MODEL_COUNT)]
    pub colors: usize,

    /// Number of stamp groups drawn per run
    #[arg(long, default_value_t = DEFAULT_STAMP_GROUP_COUNT)]
    pub groups: usize,

    /// Number of stamps drawn from each group
    #[arg(long, default_value_t = DEFAULT_STAMPS_PER_GROUP)]
    pub per_group: usize,

    /// Projection density divisor; larger means fewer projections
    #[arg(long, default_value_t = DEFAULT_STAMP_COUNT_DEMULTIPLIER, value_parser = clap::value_parser!(u32).range(1..))]
    pub density: u32,

    /// Render the selection formula as a two-tone diagnostic image
    #[arg(long)]
    pub spine: bool,

    /// Reuse the color pallette across paintings
    #[arg(long)]
    pub retain_colors: bool,

    /// Reuse the composite stamp pool across paintings
    #[arg(long)]
    pub retain_stamps: bool,

    /// Reuse the selection formulas across paintings
    #[arg(long)]
    pub retain_spine: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the immutable per-run preference snapshot
    pub const fn preferences(&self) -> Preferences {
        Preferences {
            width: self.width,
            height: self.height,
            color_model_count: self.colors,
            stamp_group_count: self.groups,
            stamps_per_group: self.per_group,
            stamp_count_demultiplier: self.density,
            spine_mode: self.spine,
        }
    }
}

/// Runs a batch of generations according to CLI arguments
pub struct Runner {
    cli: Cli,
    listener: Box<dyn ProgressListener>,
}

impl Runner {
    /// Create a runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let listener: Box<dyn ProgressListener> = if cli.should_show_progress() {
            Box::new(ProgressBarListener::new())
        } else {
            Box::new(SilentListener)
        };
        Self { cli, listener }
    }

    /// Load stamps and generate the requested paintings
    ///
    /// # Errors
    ///
    /// Returns an error if stamp loading, generation or export fails.
    pub fn run(&mut self) -> Result<()> {
        let stamps = StampLoader::new(&self.cli.stamps_dir).load()?;
        let mut controller =
            GenerationController::new(stamps, self.cli.preferences(), self.cli.seed);
        controller.set_retain_colors(self.cli.retain_colors);
        controller.set_retain_stamps(self.cli.retain_stamps);
        controller.set_retain_spine(self.cli.retain_spine);

        let token = CancellationToken::new();
        for index in 0..self.cli.count {
            match controller.generate_image(self.listener.as_ref(), &token)? {
                Some(image) => {
                    let path = self.cli.output.join(format!("painting_{index:03}.png"));
                    export_png(&image, &path)?;
                }
                // A cancelled run produced nothing; stop the batch cleanly
                None => break,
            }
        }
        self.listener.clear();
        Ok(())
    }
}
