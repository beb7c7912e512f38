use std::collections::HashMap;

use crate::classify::coerce_number;
use crate::data::{Dataset, Record};
use crate::projection::ChartType;
use tracing::trace;

/// Maximum number of distinct values kept by [`frequency`].
pub const FREQUENCY_LIMIT: usize = 20;

/// Grouping key used for missing and null values.
pub const EMPTY_KEY: &str = "(empty)";

/// Field holding row labels for top/bottom rankings.
pub const LABEL_FIELD: &str = "name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Desc,
    Asc,
}

/// A secondary dataset derived from a single field, with the axis keys its
/// records use.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedDataset {
    pub records: Dataset,
    pub x_key: &'static str,
    pub y_key: &'static str,
    pub chart_type: ChartType,
}

impl DerivedDataset {
    fn bar(records: Dataset, x_key: &'static str, y_key: &'static str) -> Self {
        Self {
            records,
            x_key,
            y_key,
            chart_type: ChartType::Bar,
        }
    }
}

/// Count occurrences of each distinct value of `field`.
///
/// Output is sorted by count, highest first; equal counts keep the order in
/// which values were first seen. At most [`FREQUENCY_LIMIT`] values are kept.
pub fn frequency(dataset: &Dataset, field: &str) -> DerivedDataset {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in dataset {
        let key = match record.get(field) {
            Some(value) if !value.is_null() => value.to_text(),
            _ => EMPTY_KEY.to_string(),
        };
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    let mut entries: Vec<(String, usize)> = order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            (key, count)
        })
        .collect();
    // stable: ties stay in first-seen order
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(FREQUENCY_LIMIT);

    trace!(field, distinct = counts.len(), kept = entries.len(), "Frequency");

    let records = entries
        .into_iter()
        .map(|(value, count)| Record::new().with("value", value).with("count", count))
        .collect();
    DerivedDataset::bar(records, "value", "count")
}

/// Bucket the numeric values of `field` into `bins` equal-width bins.
///
/// Every bin is emitted, empty or not, unless no row has a numeric value.
/// When all values are equal the range is taken as 1.
pub fn histogram(dataset: &Dataset, field: &str, bins: usize) -> DerivedDataset {
    let bins = bins.max(1);
    let values: Vec<f64> = dataset
        .iter()
        .filter_map(|r| coerce_number(r.get(field)))
        .collect();

    if values.is_empty() {
        return DerivedDataset::bar(Dataset::default(), "bin", "count");
    }

    let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let range = max - min;
    let width = (if range == 0.0 { 1.0 } else { range }) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &values {
        // clamp: the max value lands exactly on the upper edge
        let idx = ((v - min) / width).floor();
        let idx = if idx < 0.0 { 0 } else { (idx as usize).min(bins - 1) };
        counts[idx] += 1;
    }

    trace!(field, values = values.len(), min, max, width, "Histogram");

    let records = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let low = min + i as f64 * width;
            let high = min + (i + 1) as f64 * width;
            let label = format!("{} - {}", to_fixed_1(low), to_fixed_1(high));
            Record::new().with("bin", label).with("count", count)
        })
        .collect();
    DerivedDataset::bar(records, "bin", "count")
}

/// Rank rows by the numeric value of `field` and keep the first `k`.
///
/// Rows are labelled by their `name` field, falling back to their 1-based
/// position (`#3`). Rows without a numeric value are dropped. Ties keep their
/// original relative order.
pub fn top_k(dataset: &Dataset, field: &str, k: usize, order: SortOrder) -> DerivedDataset {
    let mut ranked: Vec<(String, f64)> = dataset
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let value = coerce_number(record.get(field))?;
            let label = match record.get(LABEL_FIELD) {
                Some(name) if !name.is_null() => name.to_text(),
                _ => format!("#{}", idx + 1),
            };
            Some((label, value))
        })
        .collect();

    match order {
        SortOrder::Desc => ranked.sort_by(|a, b| b.1.total_cmp(&a.1)),
        SortOrder::Asc => ranked.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }
    ranked.truncate(k);

    trace!(field, ?order, kept = ranked.len(), "Top/bottom ranking");

    let records = ranked
        .into_iter()
        .map(|(label, value)| Record::new().with("label", label).with("value", value))
        .collect();
    DerivedDataset::bar(records, "label", "value")
}

/// Format with one decimal place, rounding exact midpoints away from zero.
/// Non-finite edges print as `NaN`, `Infinity` and `-Infinity`.
fn to_fixed_1(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0.0".to_string();
    }
    let abs = x.abs();
    // Only fractional parts .25 and .75 are exact binary midpoints at one
    // decimal; std formatting would round those to even.
    let is_midpoint = (abs * 4.0).fract() == 0.0 && (abs * 2.0).fract() != 0.0;
    if is_midpoint {
        let rounded = (abs * 10.0).ceil() / 10.0;
        let sign = if x < 0.0 { "-" } else { "" };
        format!("{}{:.1}", sign, rounded)
    } else {
        format!("{:.1}", x)
    }
}
