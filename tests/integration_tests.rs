use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Run the snaplytics binary with `args`, feeding `stdin` when given.
/// Returns parsed stdout on success and stderr on failure.
fn run_snaplytics(args: &[&str], stdin: Option<&str>) -> Result<Value, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_snaplytics"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut pipe) = child.stdin.take() {
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes())
                .map_err(|e| format!("Failed to write to stdin: {}", e))?;
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        serde_json::from_slice(&output.stdout)
            .map_err(|e| format!("Output is not JSON: {}", e))
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn column(projection: &Value, key: &str) -> Vec<Value> {
    projection["data"]
        .as_array()
        .expect("data is an array")
        .iter()
        .map(|row| row[key].clone())
        .collect()
}

#[test]
fn test_frequency_of_names() {
    let result = run_snaplytics(&["test/products.json", "-x", "name", "-y", ""], None);
    let projection = result.expect("run failed");
    assert_eq!(
        projection,
        json!({
            "data": [{"value": "a", "count": 2}, {"value": "b", "count": 1}],
            "xKey": "value",
            "yKey": "count",
            "chartType": "bar"
        })
    );
}

#[test]
fn test_histogram_of_sequence() {
    let projection = run_snaplytics(
        &["test/sequence.json", "-x", "v", "-y", "", "--mode", "histogram"],
        None,
    )
    .expect("run failed");

    assert_eq!(projection["xKey"], "bin");
    assert_eq!(projection["yKey"], "count");
    let bins = column(&projection, "bin");
    assert_eq!(bins.len(), 10);
    assert_eq!(bins[0], "1.0 - 1.9");
    assert_eq!(bins[9], "9.1 - 10.0");
    assert!(column(&projection, "count").iter().all(|c| *c == 1));
}

#[test]
fn test_csv_defaults_pass_through() {
    let projection = run_snaplytics(&["test/products.csv", "-f", "csv"], None).expect("run failed");
    assert_eq!(projection["xKey"], "name");
    assert_eq!(projection["yKey"], "price");
    assert_eq!(projection["chartType"], "line");
    assert_eq!(projection["data"].as_array().map(Vec::len), Some(6));
    assert_eq!(projection["data"][5]["price"], "N/A");
}

#[test]
fn test_chart_type_applies_to_pass_through() {
    let projection = run_snaplytics(&["test/products.csv", "-f", "csv", "--chart", "scatter"], None)
        .expect("run failed");
    assert_eq!(projection["chartType"], "scatter");
    assert_eq!(projection["xKey"], "name");
}

#[test]
fn test_top_and_bottom_rankings() {
    let projection = run_snaplytics(
        &["test/products.csv", "-f", "csv", "-x", "", "-y", "price", "--mode", "top10"],
        None,
    )
    .expect("run failed");
    assert_eq!(projection["xKey"], "label");
    assert_eq!(projection["yKey"], "value");
    assert_eq!(
        column(&projection, "label"),
        vec![json!("fig"), json!("pear"), json!("plum"), json!("apple"), json!("kiwi")]
    );
    assert_eq!(projection["data"][0]["value"], 9.25);

    let projection = run_snaplytics(
        &[
            "test/products.csv", "-f", "csv", "-x", "", "-y", "price", "--mode", "bottom10",
            "--top-k", "2",
        ],
        None,
    )
    .expect("run failed");
    assert_eq!(column(&projection, "label"), vec![json!("kiwi"), json!("apple")]);
}

#[test]
fn test_categorical_field_ignores_histogram_mode() {
    let projection = run_snaplytics(
        &["test/products.csv", "-f", "csv", "-x", "shop", "-y", "", "--mode", "histogram"],
        None,
    )
    .expect("run failed");
    assert_eq!(projection["xKey"], "value");
    assert_eq!(projection["data"][0], json!({"value": "north", "count": 3}));
    assert_eq!(projection["data"][1], json!({"value": "south", "count": 2}));
}

#[test]
fn test_raw_model_reply() {
    let projection = run_snaplytics(
        &[
            "test/model_reply.txt", "--format", "raw", "-x", "", "-y", "price", "--mode",
            "histogram", "--bins", "3",
        ],
        None,
    )
    .expect("run failed");
    let counts = column(&projection, "count");
    assert_eq!(counts.len(), 3);
    let total: i64 = counts.iter().filter_map(Value::as_i64).sum();
    assert_eq!(total, 3);
}

#[test]
fn test_describe_after_coercion() {
    let described = run_snaplytics(
        &["test/rows_reply.txt", "--format", "raw", "--coerce", "--describe"],
        None,
    )
    .expect("run failed");
    assert_eq!(
        described,
        json!({
            "rows": 2,
            "fields": [
                {"field": "name", "role": "categorical", "hasNumericValues": false},
                {"field": "qty", "role": "numeric", "hasNumericValues": true}
            ],
            "typedNumericFields": ["qty"]
        })
    );
}

#[test]
fn test_content_item_falls_back_to_model_reply() {
    let projection = run_snaplytics(
        &["test/content_item.json", "--format", "content", "-x", "", "--mode", "top10"],
        None,
    )
    .expect("run failed");
    assert_eq!(projection["xKey"], "label");
    assert_eq!(
        column(&projection, "label"),
        vec![json!("Desk"), json!("Chair"), json!("Lamp")]
    );
    assert_eq!(projection["data"][1]["value"], 89.5);
}

#[test]
fn test_selection_merges_rows_in_order() {
    let described = run_snaplytics(
        &["test/selection.json", "--format", "selection", "--describe"],
        None,
    )
    .expect("run failed");
    assert_eq!(described["rows"], 3);
    assert_eq!(described["typedNumericFields"], json!(["price"]));

    let projection = run_snaplytics(&["--format", "selection"], Some(r#"[{"id": 1}]"#));
    let stderr = projection.expect_err("empty selection accepted");
    assert!(stderr.contains("Nothing to visualize"), "stderr: {}", stderr);
}

#[test]
fn test_describe_requested_fields() {
    let described = run_snaplytics(
        &["test/products.csv", "-f", "csv", "--describe", "--fields", "price, ,shop"],
        None,
    )
    .expect("run failed");
    assert_eq!(described["rows"], 6);
    let fields: Vec<&Value> = described["fields"]
        .as_array()
        .expect("fields is an array")
        .iter()
        .map(|f| &f["field"])
        .collect();
    assert_eq!(fields, vec!["price", "shop"]);
    assert_eq!(described["fields"][0]["role"], "numeric");
}

#[test]
fn test_config_file_sets_bins() {
    let mut config = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(config, r#"{{"bins": 4}}"#).expect("Failed to write config");
    let path = config.path().to_str().expect("utf-8 path").to_string();

    let projection = run_snaplytics(
        &["test/sequence.json", "-x", "v", "-y", "", "--mode", "histogram", "--config", &path],
        None,
    )
    .expect("run failed");
    assert_eq!(column(&projection, "bin").len(), 4);
}

#[test]
fn test_config_rejects_unknown_keys() {
    let mut config = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(config, r#"{{"bucket": 4}}"#).expect("Failed to write config");
    let path = config.path().to_str().expect("utf-8 path").to_string();

    let result = run_snaplytics(&["test/sequence.json", "--config", &path], None);
    let stderr = result.expect_err("unknown config key accepted");
    assert!(stderr.contains("Invalid config file"), "stderr: {}", stderr);
}

#[test]
fn test_stdin_input() {
    let csv = fs::read_to_string("test/products.csv").expect("Failed to read test CSV");
    let projection = run_snaplytics(&["-f", "csv", "-y", ""], Some(&csv)).expect("run failed");
    // x defaults to "name"; names are unique
    assert_eq!(projection["xKey"], "value");
    assert_eq!(projection["data"].as_array().map(Vec::len), Some(6));
}

#[test]
fn test_empty_array() {
    let projection = run_snaplytics(&[], Some("[]")).expect("run failed");
    assert_eq!(
        projection,
        json!({"data": [], "xKey": "", "yKey": "", "chartType": "line"})
    );
}

#[test]
fn test_no_defaults_leaves_axes_unset() {
    let projection = run_snaplytics(&["test/products.json", "--no-defaults"], None)
        .expect("run failed");
    assert_eq!(projection["xKey"], "");
    assert_eq!(projection["yKey"], "");
    assert_eq!(projection["data"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_invalid_json_fails() {
    let result = run_snaplytics(&[], Some("{not json"));
    let stderr = result.expect_err("invalid input accepted");
    assert!(stderr.contains("Invalid JSON input"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_mode_fails() {
    let result = run_snaplytics(&["test/products.json", "--mode", "median"], None);
    assert!(result.is_err());
}
