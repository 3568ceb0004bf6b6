// 📂 Import - transactions from CSV, snapshots from JSON
//
// CSV columns: id,amount,date,actor_id,description
// Dates: RFC 3339, "YYYY-MM-DD HH:MM:SS" or "YYYY-MM-DD" (all UTC)

use crate::engine::AnalysisSnapshot;
use crate::model::Transaction;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// One CSV row before the date is interpreted
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    amount: f64,
    date: String,
    #[serde(default)]
    actor_id: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(anyhow!("Unrecognized date format: {:?}", value))
}

/// Load transactions from a CSV file with a header row
pub fn load_transactions_csv(csv_path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(csv_path)
        .with_context(|| format!("Failed to open file: {}", csv_path.display()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut transactions = Vec::new();

    for (line_num, result) in reader.deserialize::<CsvRow>().enumerate() {
        // +2: 1-indexed plus header row
        let row = result.with_context(|| {
            format!("Failed to parse CSV line {} in {}", line_num + 2, csv_path.display())
        })?;
        let date = parse_date(&row.date)
            .with_context(|| format!("Bad date on CSV line {}", line_num + 2))?;

        transactions.push(Transaction {
            id: row.id,
            amount: row.amount,
            date,
            actor_id: row.actor_id.filter(|s| !s.is_empty()),
            description: row.description.filter(|s| !s.is_empty()),
            approved: false,
        });
    }

    debug!(count = transactions.len(), path = %csv_path.display(), "transactions loaded");

    Ok(transactions)
}

/// Load an analysis snapshot from a JSON file
pub fn load_snapshot(json_path: &Path) -> Result<AnalysisSnapshot> {
    let file = File::open(json_path)
        .with_context(|| format!("Failed to open file: {}", json_path.display()))?;

    let snapshot: AnalysisSnapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON from {}", json_path.display()))?;

    Ok(snapshot)
}

// ============================================================================
// TESTS
// ============================================================================
