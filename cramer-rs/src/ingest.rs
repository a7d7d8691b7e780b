//! Reads a linear system from a whitespace-delimited text table.
//!
//! Each data line holds one equation: every token but the last is a
//! coefficient of `A`, the last token is the matching entry of `b`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use cramer_core::DenseMatrix;

use crate::error::IngestionError;

/// A square system `A x = b` loaded from text.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    pub a: DenseMatrix<f64>,
    pub b: Vec<f64>,
}

impl LinearSystem {
    /// Number of unknowns.
    pub fn dimension(&self) -> usize {
        self.b.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Skip lines containing a non-numeric token instead of failing.
    pub skip_unparsable_lines: bool,
}

/// Loads a system from the file at `path`.
pub fn read_system(
    path: impl AsRef<Path>,
    options: &IngestOptions,
) -> Result<LinearSystem, IngestionError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestionError::NotFound {
        path: path.display().to_string(),
        source,
    })?;
    let system = read_system_from_reader(file, options)?;
    log::info!(
        "Loaded {n}x{n} system from {}",
        path.display(),
        n = system.dimension()
    );
    Ok(system)
}

/// Loads a system from any reader.
///
/// Blank lines and lines with a single token are skipped. A `#` starts a
/// comment that runs to the end of the line, wherever it appears.
/// Tokens may be separated by any run of spaces or tabs.
pub fn read_system_from_reader<R: Read>(
    reader: R,
    options: &IngestOptions,
) -> Result<LinearSystem, IngestionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut b = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let tokens = data_tokens(&record);
        if tokens.len() < 2 {
            if !tokens.is_empty() {
                log::debug!("Skipping line {}: no coefficients", line);
            }
            continue;
        }

        let values = match parse_tokens(&tokens, line) {
            Ok(values) => values,
            Err(err) if options.skip_unparsable_lines => {
                log::warn!("Skipping line {}: {}", line, err);
                continue;
            }
            Err(err) => return Err(err),
        };

        let Some((&rhs, coefficients)) = values.split_last() else {
            continue;
        };

        if let Some(first) = rows.first() {
            if first.len() != coefficients.len() {
                return Err(IngestionError::DimensionMismatch(format!(
                    "line {}: expected {} coefficients, found {}",
                    line,
                    first.len(),
                    coefficients.len()
                )));
            }
        }
        rows.push(coefficients.to_vec());
        b.push(rhs);
    }

    let cols = rows.first().map_or(0, Vec::len);
    if rows.len() != cols {
        return Err(IngestionError::DimensionMismatch(format!(
            "Matrix A must be square, got {}x{}",
            rows.len(),
            cols
        )));
    }

    let a = DenseMatrix::from_rows(&rows)
        .map_err(|err| IngestionError::DimensionMismatch(err.to_string()))?;
    Ok(LinearSystem { a, b })
}

/// Splits a record into numeric tokens, dropping everything from the first `#`.
///
/// Runs of spaces show up as empty fields; tabs stay inside a field.
fn data_tokens(record: &csv::StringRecord) -> Vec<&str> {
    let mut tokens = Vec::new();
    for field in record.iter() {
        match field.split_once('#') {
            Some((data, _comment)) => {
                tokens.extend(data.split_whitespace());
                break;
            }
            None => tokens.extend(field.split_whitespace()),
        }
    }
    tokens
}

fn parse_tokens(tokens: &[&str], line: u64) -> Result<Vec<f64>, IngestionError> {
    tokens
        .iter()
        .map(|token| match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(IngestionError::Parse {
                line,
                token: token.to_string(),
            }),
        })
        .collect()
}
