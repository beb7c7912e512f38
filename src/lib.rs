// Library exports for snaplytics

pub mod data;
pub mod error;
pub mod csv_reader;
pub mod parser;
pub mod ingest;

// Analysis core
pub mod classify;
pub mod inference;
pub mod aggregate;
pub mod projection;

pub use data::{Dataset, Record, Scalar};
pub use error::{IngestError, IngestResult};
pub use projection::{
    project, AxisSelection, ChartType, DashboardState, DisplayProjection, SingleFieldMode,
};

use serde::Deserialize;

/// Tunables for single-field analysis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisOptions {
    /// Histogram bin count
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Rows kept by the top/bottom rankings
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_bins() -> usize { 10 }
fn default_top_k() -> usize { 10 }

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            bins: 10,
            top_k: 10,
        }
    }
}
