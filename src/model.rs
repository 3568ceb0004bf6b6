// 📒 Data Model - immutable inputs handed to the analyzers
//
// Every record here is a plain serde value: the caller builds a snapshot,
// the engine reads it, nothing is written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION
// ============================================================================

/// A single ledger movement for the analysis period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier supplied by the caller
    pub id: String,

    /// Signed amount (expenses may be negative)
    pub amount: f64,

    /// When the movement happened
    pub date: DateTime<Utc>,

    /// Employee or user who recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the movement carries an explicit approval
    #[serde(default)]
    pub approved: bool,
}

impl Transaction {
    pub fn new(id: &str, amount: f64, date: DateTime<Utc>) -> Self {
        Transaction {
            id: id.to_string(),
            amount,
            date,
            actor_id: None,
            description: None,
            approved: false,
        }
    }

    pub fn with_actor(mut self, actor_id: &str) -> Self {
        self.actor_id = Some(actor_id.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn approved(mut self) -> Self {
        self.approved = true;
        self
    }
}

// ============================================================================
// BALANCE SNAPSHOT
// ============================================================================

/// Point-in-time aggregate figures for a period.
///
/// Every field is required: the engine never assumes a default for a
/// financial figure the caller did not supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub current_assets: f64,
    pub current_liabilities: f64,
    pub inventory: f64,
    pub cash: f64,
    pub revenue: f64,
    pub cost_of_goods_sold: f64,
    pub average_inventory: f64,
    pub credit_sales: f64,
    pub average_receivables: f64,
    pub average_total_assets: f64,
}

impl BalanceSnapshot {
    /// Field names paired with values, for validation messages
    pub fn fields(&self) -> [(&'static str, f64); 10] {
        [
            ("current_assets", self.current_assets),
            ("current_liabilities", self.current_liabilities),
            ("inventory", self.inventory),
            ("cash", self.cash),
            ("revenue", self.revenue),
            ("cost_of_goods_sold", self.cost_of_goods_sold),
            ("average_inventory", self.average_inventory),
            ("credit_sales", self.credit_sales),
            ("average_receivables", self.average_receivables),
            ("average_total_assets", self.average_total_assets),
        ]
    }
}

// ============================================================================
// ACTIVITY LOG
// ============================================================================

/// One entry of the per-actor activity log (Behavioral Profiler input)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub actor_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

// ============================================================================
// COMPLIANCE INPUTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    pub id: String,
    pub created_by: String,
    pub approved_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub role: String,
}

impl UserAccount {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Balance-sheet ratios checked by the compliance rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioInputs {
    pub current_ratio: f64,
    pub debt_to_equity: f64,
}

// ============================================================================
// SHARED CLASSIFICATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Health of a single ratio reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Healthy,
    Warning,
    Critical,
}

/// Severity of a compliance finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Recommendation priority; declaration order is the sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

// ============================================================================
// ROUNDING (display stability only)
// ============================================================================

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
