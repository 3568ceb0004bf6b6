// 📈 Statistical Anomaly Detector - z-score outliers
//
// Population mean and standard deviation over the whole series; a value
// is an outlier when it sits more than `threshold` deviations away.

use crate::model::{round_to, RiskLevel};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Series shorter than this yield no anomalies
pub const MIN_SERIES_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    /// Position in the input series
    pub index: usize,
    pub value: f64,
    pub z_score: f64,
    pub is_outlier: bool,
    pub severity: RiskLevel,
    pub description: String,
}

// ============================================================================
// DESCRIPTIVE STATISTICS
// ============================================================================

/// Arithmetic mean (0 for an empty slice)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (0 for an empty slice)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

// ============================================================================
// DETECTION
// ============================================================================

pub fn detect_anomalies(values: &[f64], threshold: f64) -> Vec<AnomalyFlag> {
    if values.len() < MIN_SERIES_LEN {
        return Vec::new();
    }

    let m = mean(values);
    let sd = std_dev(values);

    let flags: Vec<AnomalyFlag> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let z = if sd > 0.0 { ((value - m) / sd).abs() } else { 0.0 };
            if z <= threshold {
                return None;
            }

            let (severity, description) = if z > 4.0 {
                (RiskLevel::High, format!("Extreme outlier (Z={:.2})", z))
            } else if z > 3.5 {
                (RiskLevel::Medium, format!("Outlier (Z={:.2})", z))
            } else {
                (RiskLevel::Low, format!("Notable deviation (Z={:.2})", z))
            };

            Some(AnomalyFlag {
                index,
                value: *value,
                z_score: round_to(z, 2),
                is_outlier: true,
                severity,
                description,
            })
        })
        .collect();

    debug!(len = values.len(), mean = m, std_dev = sd, outliers = flags.len(), "z-score scan finished");

    flags
}

// ============================================================================
// TESTS
// ============================================================================
