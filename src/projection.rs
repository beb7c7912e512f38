//! Display projection: decides which dataset, axis keys and chart type the
//! renderer receives for the current dashboard state.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{self, SortOrder};
use crate::data::Dataset;
use crate::inference::{default_axes, field_is_numeric};
use crate::AnalysisOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    Scatter,
    Pie,
}

/// Analysis applied when exactly one axis is selected. Only numeric fields
/// honour it; categorical fields always get a frequency count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingleFieldMode {
    #[default]
    Frequency,
    Histogram,
    Top10,
    Bottom10,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Scatter => "scatter",
            ChartType::Pie => "pie",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(ChartType::Line),
            "bar" => Ok(ChartType::Bar),
            "scatter" => Ok(ChartType::Scatter),
            "pie" => Ok(ChartType::Pie),
            other => Err(format!(
                "unknown chart type '{}' (expected line, bar, scatter or pie)",
                other
            )),
        }
    }
}

impl FromStr for SingleFieldMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frequency" => Ok(SingleFieldMode::Frequency),
            "histogram" => Ok(SingleFieldMode::Histogram),
            "top10" => Ok(SingleFieldMode::Top10),
            "bottom10" => Ok(SingleFieldMode::Bottom10),
            other => Err(format!(
                "unknown single-field mode '{}' (expected frequency, histogram, top10 or bottom10)",
                other
            )),
        }
    }
}

/// Selected X and Y fields. Empty names are stored as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSelection {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl AxisSelection {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: non_empty(x.into()),
            y: non_empty(y.into()),
        }
    }

    /// Exactly one axis chosen.
    pub fn is_single_field(&self) -> bool {
        self.x.is_some() != self.y.is_some()
    }

    /// The one chosen field in single-field mode, X winning over Y.
    pub fn single_field(&self) -> Option<&str> {
        self.x.as_deref().or(self.y.as_deref())
    }
}

fn non_empty(name: String) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// What the renderer gets: records plus the keys to plot and a chart type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProjection<'a> {
    pub data: Cow<'a, Dataset>,
    pub x_key: String,
    pub y_key: String,
    pub chart_type: ChartType,
}

impl<'a> DisplayProjection<'a> {
    fn pass_through(state: &'a DashboardState) -> Self {
        Self {
            data: Cow::Borrowed(&state.dataset),
            x_key: state.axes.x.clone().unwrap_or_default(),
            y_key: state.axes.y.clone().unwrap_or_default(),
            chart_type: state.chart_type,
        }
    }

    fn derived(derived: aggregate::DerivedDataset) -> Self {
        Self {
            data: Cow::Owned(derived.records),
            x_key: derived.x_key.to_string(),
            y_key: derived.y_key.to_string(),
            chart_type: derived.chart_type,
        }
    }

    /// Whether the data came from an aggregation rather than the raw rows.
    pub fn is_derived(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }
}

/// Everything the projection depends on, held explicitly.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub dataset: Dataset,
    pub axes: AxisSelection,
    pub chart_type: ChartType,
    pub single_field_mode: SingleFieldMode,
    pub options: AnalysisOptions,
}

impl DashboardState {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replace the dataset and fill in any unset axes from it.
    pub fn load(&mut self, dataset: Dataset) {
        self.axes = default_axes(&dataset, &self.axes);
        self.dataset = dataset;
    }

    pub fn set_x(&mut self, field: impl Into<String>) {
        self.axes.x = non_empty(field.into());
    }

    pub fn set_y(&mut self, field: impl Into<String>) {
        self.axes.y = non_empty(field.into());
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
    }

    pub fn set_single_field_mode(&mut self, mode: SingleFieldMode) {
        self.single_field_mode = mode;
    }

    pub fn single_field_selected(&self) -> bool {
        self.axes.is_single_field()
    }

    pub fn project(&self) -> DisplayProjection<'_> {
        project(self)
    }
}

/// Compute the display projection for `state`.
///
/// With both or neither axis chosen (or no rows) the dataset passes through
/// untouched. With exactly one axis chosen the field is aggregated: always a
/// frequency count for categorical fields, otherwise per the single-field
/// mode.
pub fn project(state: &DashboardState) -> DisplayProjection<'_> {
    if !state.axes.is_single_field() || state.dataset.is_empty() {
        return DisplayProjection::pass_through(state);
    }

    let field = match state.axes.single_field() {
        Some(field) if !field.is_empty() => field,
        _ => return DisplayProjection::pass_through(state),
    };

    let dataset = &state.dataset;
    let options = &state.options;

    if !field_is_numeric(dataset, field) {
        debug!(field, "Categorical field, using frequency");
        return DisplayProjection::derived(aggregate::frequency(dataset, field));
    }

    debug!(field, mode = ?state.single_field_mode, "Numeric field");
    let derived = match state.single_field_mode {
        SingleFieldMode::Histogram => aggregate::histogram(dataset, field, options.bins),
        SingleFieldMode::Top10 => aggregate::top_k(dataset, field, options.top_k, SortOrder::Desc),
        SingleFieldMode::Bottom10 => {
            aggregate::top_k(dataset, field, options.top_k, SortOrder::Asc)
        }
        SingleFieldMode::Frequency => aggregate::frequency(dataset, field),
    };
    DisplayProjection::derived(derived)
}
