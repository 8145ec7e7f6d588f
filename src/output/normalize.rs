//! Client output parsing.

use csv::ReaderBuilder;
use serde_json::Value;
use tracing::{debug, warn};

use super::{NormalizedResult, Record};
use crate::client::RawExecutionResult;
use crate::dialect::{DialectProfile, OutputFormat};
use crate::error::{GatewayError, Result};

/// Converts a client's raw output into a [`NormalizedResult`].
///
/// A non-zero exit always wins over whatever is on stdout and becomes
/// [`GatewayError::BackendExecutionFailed`] carrying the trimmed stderr.
pub fn normalize(raw: &RawExecutionResult, profile: &DialectProfile) -> Result<NormalizedResult> {
    if !raw.succeeded() {
        return Err(GatewayError::backend(raw.exit_code, raw.stderr.trim()));
    }

    let output = raw.stdout.trim();
    if output.is_empty() {
        return Ok(NormalizedResult::no_rows());
    }

    let format = profile.output_format;
    if is_status_line(output, format) {
        debug!("Treating single-line output as status: {}", output);
        return Ok(NormalizedResult::status(output));
    }

    match parse_table(output, format) {
        Ok(Some(rows)) => Ok(NormalizedResult::from_rows(rows)),
        Ok(None) => {
            warn!("Client output has no header line; returning it raw");
            Ok(NormalizedResult::Raw(output.to_string()))
        }
        Err(e) => {
            warn!("Could not parse {} output ({}); returning it raw", profile.name, e);
            Ok(NormalizedResult::Raw(output.to_string()))
        }
    }
}

/// A lone line without a delimiter is a server acknowledgement such as
/// `UPDATE 3` or `COMMIT`, not a one-column table.
fn is_status_line(output: &str, format: OutputFormat) -> bool {
    !output.contains('\n') && !output.contains(char::from(format.delimiter()))
}

/// Reads a header line plus data lines. Returns `None` if there is no usable
/// header. Data lines are zipped positionally: short lines leave trailing
/// fields absent and long lines drop their extra values.
fn parse_table(output: &str, format: OutputFormat) -> csv::Result<Option<Vec<Record>>> {
    match format {
        OutputFormat::Tsv => Ok(parse_tsv(output)),
        OutputFormat::Csv => parse_csv(output),
    }
}

/// Batch-mode output is unquoted, so every line is a row, including the
/// empty line a single empty-string value prints as.
fn parse_tsv(output: &str) -> Option<Vec<Record>> {
    let mut lines = output
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    let headers: Vec<&str> = lines.next()?.split('\t').collect();
    if headers.iter().all(|name| name.is_empty()) {
        return None;
    }

    Some(
        lines
            .map(|line| zip_fields(&headers, line.split('\t')))
            .collect(),
    )
}

fn parse_csv(output: &str) -> csv::Result<Option<Vec<Record>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(OutputFormat::Csv.delimiter())
        .quoting(OutputFormat::Csv.quoted())
        .has_headers(true)
        .flexible(true)
        .from_reader(output.as_bytes());

    let headers = reader.headers()?.clone();
    let names: Vec<&str> = headers.iter().collect();
    if names.iter().all(|name| name.is_empty()) {
        return Ok(None);
    }

    let mut rows = Vec::new();
    for line in reader.records() {
        let line = line?;
        rows.push(zip_fields(&names, line.iter()));
    }
    Ok(Some(rows))
}

fn zip_fields<'a>(headers: &[&str], values: impl Iterator<Item = &'a str>) -> Record {
    let mut record = Record::new();
    for (name, value) in headers.iter().zip(values) {
        // Duplicate names keep the first position and the last value.
        record.insert((*name).to_string(), Value::String(value.to_string()));
    }
    record
}
