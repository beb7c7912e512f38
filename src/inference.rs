//! Field role inference and default axis selection.

use crate::classify::is_numeric;
use crate::data::{Dataset, Scalar};
use crate::projection::AxisSelection;
use tracing::debug;

/// Number of leading rows inspected when classifying a field.
pub const SAMPLE_ROWS: usize = 50;

/// Share of present sampled values that must be numeric, exclusive.
pub const NUMERIC_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Numeric,
    Categorical,
}

/// Classify a field by majority vote over the first [`SAMPLE_ROWS`] rows.
///
/// Rows missing the field are skipped; explicit nulls count as present but
/// not numeric. A field absent from every sampled row is never numeric.
pub fn field_is_numeric(dataset: &Dataset, field: &str) -> bool {
    if field.is_empty() {
        return false;
    }

    let mut total = 0usize;
    let mut numeric = 0usize;
    for value in dataset.iter().take(SAMPLE_ROWS).filter_map(|r| r.get(field)) {
        total += 1;
        if is_numeric(Some(value)) {
            numeric += 1;
        }
    }

    total > 0 && numeric as f64 / total as f64 > NUMERIC_THRESHOLD
}

pub fn field_role(dataset: &Dataset, field: &str) -> FieldRole {
    if field_is_numeric(dataset, field) {
        FieldRole::Numeric
    } else {
        FieldRole::Categorical
    }
}

/// Fields (in first-record order) where at least one row anywhere in the
/// dataset holds a numeric value. Looser than [`field_is_numeric`].
pub fn numeric_candidates(dataset: &Dataset) -> Vec<String> {
    dataset
        .field_names()
        .into_iter()
        .filter(|field| dataset.iter().any(|r| is_numeric(r.get(field))))
        .collect()
}

/// Fill unset axes for a freshly loaded dataset. Axes that are already
/// chosen are left alone.
pub fn default_axes(dataset: &Dataset, current: &AxisSelection) -> AxisSelection {
    let mut axes = current.clone();

    if axes.x.is_none() {
        axes.x = dataset.field_names().into_iter().next();
    }
    if axes.y.is_none() {
        axes.y = numeric_candidates(dataset).into_iter().next();
    }

    debug!(x = ?axes.x, y = ?axes.y, "Default axes");
    axes
}

/// Fields offered to the user: the requested list when it names anything,
/// otherwise the dataset's own field names.
pub fn available_fields(requested: &str, dataset: &Dataset) -> Vec<String> {
    let entered = crate::parser::requested_fields(requested);
    if entered.is_empty() {
        dataset.field_names()
    } else {
        entered
    }
}

/// Fields whose value in the first record is already a number (no text
/// coercion).
pub fn typed_numeric_fields(dataset: &Dataset) -> Vec<String> {
    dataset
        .records()
        .first()
        .map(|first| {
            first
                .iter()
                .filter(|(_, value)| matches!(value, Scalar::Number(_)))
                .map(|(name, _)| name.to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn scores(values: &[&str]) -> Dataset {
        values
            .iter()
            .map(|v| Record::new().with("score", *v))
            .collect()
    }

    #[test]
    fn test_majority_numeric() {
        let dataset = scores(&["1", "2", "3", "4", "N/A"]);
        assert!(field_is_numeric(&dataset, "score"));
        assert_eq!(field_role(&dataset, "score"), FieldRole::Numeric);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let dataset = scores(&["1", "2", "3", "N/A", "n/a"]);
        assert!(!field_is_numeric(&dataset, "score"));
        assert_eq!(field_role(&dataset, "score"), FieldRole::Categorical);
    }

    #[test]
    fn test_only_first_fifty_rows_sampled() {
        let mut values = vec!["x"; 50];
        values.extend(vec!["1"; 200]);
        assert!(!field_is_numeric(&scores(&values), "score"));

        let mut values = vec!["1"; 50];
        values.extend(vec!["x"; 200]);
        assert!(field_is_numeric(&scores(&values), "score"));
    }

    #[test]
    fn test_missing_rows_are_skipped_but_nulls_count() {
        let dataset: Dataset = vec![
            Record::new().with("v", "1"),
            Record::new().with("other", "a"),
            Record::new().with("other", "b"),
        ]
        .into_iter()
        .collect();
        // 1 of 1 present values numeric
        assert!(field_is_numeric(&dataset, "v"));

        let with_nulls: Dataset = vec![
            Record::new().with("v", "1"),
            Record::new().with("v", Scalar::Null),
        ]
        .into_iter()
        .collect();
        // 1 of 2
        assert!(!field_is_numeric(&with_nulls, "v"));
    }

    #[test]
    fn test_absent_or_empty_field() {
        let dataset = scores(&["1", "2"]);
        assert!(!field_is_numeric(&dataset, "nope"));
        assert!(!field_is_numeric(&dataset, ""));
        assert!(!field_is_numeric(&Dataset::default(), "score"));
    }

    #[test]
    fn test_default_axes_fill_unset_only() {
        let dataset: Dataset = vec![
            Record::new().with("name", "a").with("city", "x").with("price", "n/a"),
            Record::new().with("name", "b").with("city", "y").with("price", "$20"),
        ]
        .into_iter()
        .collect();

        let axes = default_axes(&dataset, &AxisSelection::default());
        assert_eq!(axes.x.as_deref(), Some("name"));
        // one numeric row is enough for the default Y
        assert_eq!(axes.y.as_deref(), Some("price"));

        let chosen = AxisSelection::new("city", "");
        let axes = default_axes(&dataset, &chosen);
        assert_eq!(axes.x.as_deref(), Some("city"));
        assert_eq!(axes.y.as_deref(), Some("price"));
    }

    #[test]
    fn test_default_y_unset_without_numbers() {
        let dataset: Dataset = vec![Record::new().with("name", "a")].into_iter().collect();
        let axes = default_axes(&dataset, &AxisSelection::default());
        assert_eq!(axes.x.as_deref(), Some("name"));
        assert_eq!(axes.y, None);

        let empty = default_axes(&Dataset::default(), &AxisSelection::default());
        assert_eq!(empty, AxisSelection::default());
    }

    #[test]
    fn test_available_fields() {
        let dataset: Dataset = vec![Record::new().with("a", 1.0).with("b", 2.0)]
            .into_iter()
            .collect();
        assert_eq!(available_fields("", &dataset), vec!["a", "b"]);
        assert_eq!(available_fields(" rating , ", &dataset), vec!["rating"]);
    }

    #[test]
    fn test_typed_numeric_fields() {
        let dataset: Dataset = vec![
            Record::new().with("name", "a").with("price", 3.0).with("qty", "4"),
            Record::new().with("name", 1.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(typed_numeric_fields(&dataset), vec!["price"]);
    }
}
