// 🔍 Duplicate Detector - near-identical transactions clustered in time
//
// Pairwise comparison of every transaction with every later one. Quadratic
// in the batch size, which is fine for a period's worth of records
// (hundreds, not millions).

use crate::model::{RiskLevel, Transaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_TOLERANCE: f64 = 0.01;
pub const DEFAULT_TIME_WINDOW_HOURS: f64 = 24.0;

// ============================================================================
// DUPLICATE GROUP
// ============================================================================

/// A transaction that has at least one near-identical companion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of transactions in the cluster, including this one
    pub count: usize,

    pub risk: RiskLevel,
}

/// Structural grouping key: (rounded amount, actor)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    rounded_amount: i64,
    actor: String,
}

impl GroupKey {
    fn for_transaction(tx: &Transaction) -> Self {
        GroupKey {
            rounded_amount: tx.amount.round() as i64,
            actor: tx.actor_id.clone().unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

// ============================================================================
// DUPLICATE DETECTOR
// ============================================================================

pub struct DuplicateDetector {
    /// Maximum amount difference for a match (default: 0.01)
    pub tolerance: f64,

    /// Maximum time distance for a match, in hours (default: 24)
    pub time_window_hours: f64,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        DuplicateDetector {
            tolerance: DEFAULT_TOLERANCE,
            time_window_hours: DEFAULT_TIME_WINDOW_HOURS,
        }
    }

    pub fn with_params(tolerance: f64, time_window_hours: f64) -> Self {
        DuplicateDetector {
            tolerance,
            time_window_hours,
        }
    }

    /// Find clustered duplicates in a batch.
    ///
    /// Groups appear in the order their key was first matched; within a
    /// group, one record per anchoring transaction.
    pub fn find(&self, transactions: &[Transaction]) -> Vec<DuplicateGroup> {
        let mut key_order: Vec<GroupKey> = Vec::new();
        let mut groups: HashMap<GroupKey, Vec<DuplicateGroup>> = HashMap::new();

        for (i, tx) in transactions.iter().enumerate() {
            for other in &transactions[i + 1..] {
                let hours_apart = hours_between(tx.date, other.date);
                let amount_diff = (tx.amount - other.amount).abs();

                if hours_apart > self.time_window_hours || amount_diff > self.tolerance {
                    continue;
                }

                let key = GroupKey::for_transaction(tx);
                let members = groups.entry(key.clone()).or_insert_with(|| {
                    key_order.push(key);
                    Vec::new()
                });

                match members.iter_mut().find(|m| m.id == tx.id) {
                    Some(existing) => {
                        existing.count += 1;
                        if existing.count > 3 {
                            existing.risk = RiskLevel::High;
                        }
                    }
                    None => members.push(DuplicateGroup {
                        id: tx.id.clone(),
                        amount: tx.amount,
                        date: tx.date,
                        actor_id: tx.actor_id.clone(),
                        description: tx.description.clone(),
                        count: 2,
                        risk: risk_for_gap(hours_apart),
                    }),
                }
            }
        }

        let flagged: Vec<DuplicateGroup> = key_order
            .iter()
            .filter_map(|key| groups.remove(key))
            .flatten()
            .collect();

        debug!(
            transactions = transactions.len(),
            flagged = flagged.len(),
            "duplicate scan finished"
        );

        flagged
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper over [`DuplicateDetector`]
pub fn detect_duplicates(
    transactions: &[Transaction],
    tolerance: f64,
    time_window_hours: f64,
) -> Vec<DuplicateGroup> {
    DuplicateDetector::with_params(tolerance, time_window_hours).find(transactions)
}

fn hours_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (a - b).num_milliseconds().abs() as f64 / 3_600_000.0
}

fn risk_for_gap(hours_apart: f64) -> RiskLevel {
    if hours_apart < 1.0 {
        RiskLevel::High
    } else if hours_apart < 12.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

// ============================================================================
// TESTS
// ============================================================================
