// 🔢 Distribution Analyzer - Benford's Law first-digit test
//
// Naturally occurring amounts have leading digits skewed toward 1.
// Fabricated ledgers tend to flatten that curve; the chi-square statistic
// against the Newcomb-Benford distribution measures how far they drift.

use crate::model::{round_to, RiskLevel};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Expected share of each leading digit 1..=9
pub const BENFORD_DISTRIBUTION: [f64; 9] = [
    0.301, 0.176, 0.125, 0.097, 0.079, 0.067, 0.058, 0.051, 0.046,
];

/// Below this many amounts the test is not meaningful
pub const MIN_SAMPLE_SIZE: usize = 100;

// Critical chi-square values for 8 degrees of freedom
const CHI_SQUARE_HIGH: f64 = 15.51;
const CHI_SQUARE_MEDIUM: f64 = 11.07;

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionResult {
    pub chi_square: f64,
    pub is_anomaly: bool,

    /// Observed share per digit 1..=9 (empty when the sample was too small)
    pub distribution: Vec<f64>,

    pub expected_distribution: Vec<f64>,

    /// |observed - expected| per digit, in percentage points
    pub deviations: Vec<f64>,

    pub risk_level: RiskLevel,
    pub message: String,

    /// Amounts that contributed a leading digit (|amount| >= 1)
    pub digits_counted: usize,
}

impl DistributionResult {
    fn insufficient_sample() -> Self {
        DistributionResult {
            chi_square: 0.0,
            is_anomaly: false,
            distribution: Vec::new(),
            expected_distribution: BENFORD_DISTRIBUTION.to_vec(),
            deviations: Vec::new(),
            risk_level: RiskLevel::Low,
            message: "Sample too small for a reliable analysis".to_string(),
            digits_counted: 0,
        }
    }
}

// ============================================================================
// ANALYSIS
// ============================================================================

/// Run the first-digit test over a set of amounts
pub fn analyze_distribution(amounts: &[f64]) -> DistributionResult {
    if amounts.len() < MIN_SAMPLE_SIZE {
        return DistributionResult::insufficient_sample();
    }

    let mut counts = [0usize; 9];
    for amount in amounts {
        if let Some(digit) = leading_digit(*amount) {
            counts[digit - 1] += 1;
        }
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        // Every amount was below 1: nothing to compare
        return DistributionResult::insufficient_sample();
    }

    let observed: Vec<f64> = counts.iter().map(|c| *c as f64 / total as f64).collect();

    let mut chi_square = 0.0;
    let mut deviations = Vec::with_capacity(9);
    for (i, expected_share) in BENFORD_DISTRIBUTION.iter().enumerate() {
        let expected = expected_share * total as f64;
        chi_square += (counts[i] as f64 - expected).powi(2) / expected;
        deviations.push(round_to((observed[i] - expected_share).abs() * 100.0, 2));
    }

    let (risk_level, message) = if chi_square > CHI_SQUARE_HIGH {
        (
            RiskLevel::High,
            "Deviation above 15.51 - high probability of manipulation",
        )
    } else if chi_square > CHI_SQUARE_MEDIUM {
        (
            RiskLevel::Medium,
            "Deviation between 11.07 and 15.51 - review required",
        )
    } else {
        (RiskLevel::Low, "Deviation below 11.07 - normal")
    };

    debug!(chi_square, total, ?risk_level, "benford distribution analyzed");

    DistributionResult {
        chi_square: round_to(chi_square, 2),
        is_anomaly: chi_square > CHI_SQUARE_HIGH,
        distribution: observed.iter().map(|d| round_to(*d, 3)).collect(),
        expected_distribution: BENFORD_DISTRIBUTION.to_vec(),
        deviations,
        risk_level,
        message: message.to_string(),
        digits_counted: total,
    }
}

/// Leading decimal digit of |amount|, or None when |amount| < 1
fn leading_digit(amount: f64) -> Option<usize> {
    let magnitude = amount.abs();
    if !magnitude.is_finite() || magnitude < 1.0 {
        return None;
    }

    // Scientific notation always starts with the leading significant digit
    format!("{:e}", magnitude)
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as usize)
        .filter(|d| (1..=9).contains(d))
}

// ============================================================================
// TESTS
// ============================================================================
