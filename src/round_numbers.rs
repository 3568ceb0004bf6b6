// 🎯 Round-Number Pattern Detector
//
// Hand-typed, fabricated amounts gravitate to tidy shapes: 5000, 999,
// 7777. Each transaction is tested against a fixed ordered list of
// patterns over the digits of its rounded magnitude.

use crate::model::{RiskLevel, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// PATTERNS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPattern {
    /// ...000
    EndsInThreeZeros,
    /// ...999
    EndsInThreeNines,
    /// 77, 4444
    RepeatedDigit,
    /// 3, 50, 7000
    LeadingDigitThenZeros,
}

impl RoundPattern {
    /// Checked in this order; one flag per match
    pub const ALL: [RoundPattern; 4] = [
        RoundPattern::EndsInThreeZeros,
        RoundPattern::EndsInThreeNines,
        RoundPattern::RepeatedDigit,
        RoundPattern::LeadingDigitThenZeros,
    ];

    pub fn risk(&self) -> RiskLevel {
        match self {
            RoundPattern::EndsInThreeZeros => RiskLevel::Medium,
            RoundPattern::EndsInThreeNines => RiskLevel::High,
            RoundPattern::RepeatedDigit => RiskLevel::High,
            RoundPattern::LeadingDigitThenZeros => RiskLevel::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoundPattern::EndsInThreeZeros => "Ends in three zeros",
            RoundPattern::EndsInThreeNines => "Ends in three nines",
            RoundPattern::RepeatedDigit => "Repeated digit",
            RoundPattern::LeadingDigitThenZeros => "Single digit followed by zeros",
        }
    }

    /// Test against the decimal digits of a non-negative integer
    fn matches(&self, digits: &str) -> bool {
        match self {
            RoundPattern::EndsInThreeZeros => digits.ends_with("000"),
            RoundPattern::EndsInThreeNines => digits.ends_with("999"),
            RoundPattern::RepeatedDigit => {
                let mut chars = digits.chars();
                match chars.next() {
                    Some(first) => digits.len() >= 2 && chars.all(|c| c == first),
                    None => false,
                }
            }
            RoundPattern::LeadingDigitThenZeros => {
                let mut chars = digits.chars();
                match chars.next() {
                    Some(first) => {
                        first != '0' && digits.len() >= 2 && chars.all(|c| c == '0')
                    }
                    None => false,
                }
            }
        }
    }
}

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundNumberFlag {
    pub id: String,
    pub amount: f64,
    pub pattern: RoundPattern,
    pub risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundNumberResult {
    pub suspicious_transactions: Vec<RoundNumberFlag>,
    pub total_suspicious: usize,

    /// Matches per hundred transactions; can exceed 100 when an amount
    /// matches several patterns
    pub percentage_suspicious: f64,
}

// ============================================================================
// DETECTION
// ============================================================================

pub fn detect_round_number_patterns(transactions: &[Transaction]) -> RoundNumberResult {
    let mut flags = Vec::new();

    for tx in transactions {
        // Formatted from the float so magnitudes past u64 keep their digits
        let digits = format!("{:.0}", tx.amount.round().abs());
        for pattern in RoundPattern::ALL {
            if pattern.matches(&digits) {
                flags.push(RoundNumberFlag {
                    id: tx.id.clone(),
                    amount: tx.amount,
                    pattern,
                    risk: pattern.risk(),
                });
            }
        }
    }

    let percentage_suspicious = if transactions.is_empty() {
        0.0
    } else {
        flags.len() as f64 / transactions.len() as f64 * 100.0
    };

    debug!(matches = flags.len(), percentage_suspicious, "round-number scan finished");

    RoundNumberResult {
        total_suspicious: flags.len(),
        suspicious_transactions: flags,
        percentage_suspicious,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn tx(id: &str, amount: f64) -> Transaction {
        Transaction::new(id, amount, Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap())
    }

    fn patterns_for(amount: f64) -> Vec<RoundPattern> {
        detect_round_number_patterns(&[tx("t", amount)])
            .suspicious_transactions
            .into_iter()
            .map(|f| f.pattern)
            .collect()
    }

    #[rstest]
    #[case(5000.0, vec![RoundPattern::EndsInThreeZeros, RoundPattern::LeadingDigitThenZeros])]
    #[case(9999.0, vec![RoundPattern::EndsInThreeNines, RoundPattern::RepeatedDigit])]
    #[case(12999.0, vec![RoundPattern::EndsInThreeNines])]
    #[case(4444.0, vec![RoundPattern::RepeatedDigit])]
    #[case(70.0, vec![RoundPattern::LeadingDigitThenZeros])]
    #[case(-3000.4, vec![RoundPattern::EndsInThreeZeros, RoundPattern::LeadingDigitThenZeros])]
    #[case(1e20, vec![RoundPattern::EndsInThreeZeros, RoundPattern::LeadingDigitThenZeros])]
    #[case(5173.0, vec![])]
    #[case(7.0, vec![])]
    #[case(0.0, vec![])]
    fn test_pattern_matching(#[case] amount: f64, #[case] expected: Vec<RoundPattern>) {
        assert_eq!(patterns_for(amount), expected);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RoundPattern::EndsInThreeNines.risk(), RiskLevel::High);
        assert_eq!(RoundPattern::EndsInThreeZeros.risk(), RiskLevel::Medium);
    }

    #[test]
    fn test_percentage_counts_every_match() {
        let transactions = vec![tx("a", 5000.0), tx("b", 5173.0), tx("c", 9999.0), tx("d", 42.17)];
        let result = detect_round_number_patterns(&transactions);

        assert_eq!(result.total_suspicious, 4);
        assert_eq!(result.percentage_suspicious, 100.0);
        assert!(result.suspicious_transactions.iter().all(|f| f.id != "b"));
    }

    #[test]
    fn test_empty_batch() {
        let result = detect_round_number_patterns(&[]);
        assert_eq!(result.total_suspicious, 0);
        assert_eq!(result.percentage_suspicious, 0.0);
    }
}
