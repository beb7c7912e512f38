use std::io::Read;

use crate::data::{Dataset, Record, Scalar};
use crate::error::IngestResult;

/// Read CSV with a header row into a dataset. Every cell is kept as text;
/// short rows simply lack the trailing fields.
pub fn read_csv<R: Read>(reader: R) -> IngestResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut dataset = Dataset::default();
    for row in rdr.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.clone(), Scalar::Text(cell.to_string())))
            .collect();
        dataset.push(record);
    }

    Ok(dataset)
}
