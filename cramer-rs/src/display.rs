//! Human-readable and JSON renderings of a solution.

use cramer_lsolver::algorithms::{CramerMetadata, SolveResult};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct DisplayOptions {
    /// Decimal places printed per unknown.
    pub precision: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

/// Renders the solution as one `x<i> = value` line per unknown (1-based).
pub fn format_solution(x: &[f64], options: &DisplayOptions) -> String {
    if x.is_empty() {
        return "Solution: empty system, nothing to solve".to_string();
    }
    let mut out = String::from("Solution:");
    for (i, value) in x.iter().enumerate() {
        out.push_str(&format!(
            "\n  x{} = {}",
            i + 1,
            format_value(*value, options.precision)
        ));
    }
    out
}

/// Serialises the solution and solve metadata as pretty-printed JSON.
pub fn format_json(result: &SolveResult<f64, CramerMetadata<f64>>) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn format_value(value: f64, precision: usize) -> String {
    let rounded = format!("{:.*}", precision, value);
    // Rounding can leave "-0.000000"; print it unsigned.
    match rounded.strip_prefix('-') {
        Some(magnitude) if magnitude.chars().all(|c| c == '0' || c == '.') => magnitude.to_string(),
        _ => rounded,
    }
}
