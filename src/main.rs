use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use log::info;

use indicator_engine::{
    CellValue, ConsoleProgress, DataMatrix, EngineConfig, Pipeline, RunParameters,
};

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 5 {
        bail!("usage: {} <extract.csv> <population.csv> <year> <cutoff-month>", args[0]);
    }

    let extract_path = Path::new(&args[1]);
    let population_path = Path::new(&args[2]);
    let year: i32 = args[3].parse().context("target year must be an integer")?;
    let cutoff_month: u32 = args[4].parse().context("cutoff month must be an integer")?;

    info!("Loading extract from: {}", extract_path.display());
    let start = Instant::now();
    let matrix = load_extract(extract_path)?;
    info!(
        "Decoded {} rows with {} header columns in {:?}",
        matrix.rows.len(),
        matrix.headers.len(),
        start.elapsed()
    );

    let mut pipeline = Pipeline::new(EngineConfig::default());
    let mut progress = ConsoleProgress::new();
    let params = RunParameters { year, cutoff_month };

    let start = Instant::now();
    let result = pipeline.run(matrix, population_path, &params, &mut progress)?;
    info!(
        "Aggregated {} rows into {} groups in {:?}",
        result.row_count,
        result.groups.len(),
        start.elapsed()
    );

    if !result.missing_fields.is_empty() {
        info!("Missing fields: {}", result.missing_fields.join(", "));
    }
    if !result.issues.is_empty() {
        info!("Data quality issues: {}", result.issues.len());
    }

    println!("{}", serde_json::to_string_pretty(&result.totals)?);

    Ok(())
}

/// Decode a semicolon-delimited extract into a data matrix
///
/// Stand-in for the spreadsheet parser collaborator: every non-empty cell
/// arrives as text and the normalizers do the rest.
fn load_extract(path: &Path) -> Result<DataMatrix> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let headers = match lines.next() {
        Some(line) => decode_line(line),
        None => bail!("{} is empty", path.display()),
    };
    let rows = lines.map(decode_line).collect();

    Ok(DataMatrix { headers, rows })
}

fn decode_line(line: &str) -> Vec<CellValue> {
    line.split(';')
        .map(|cell| {
            if cell.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(cell.to_string())
            }
        })
        .collect()
}
