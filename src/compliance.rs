// 🏛️ Compliance Rule Engine - fixed internal-control rules
//
// Each rule looks at one part of the input bag. Missing parts skip their
// rule; passing rules stay silent. Only violations are reported.

use crate::model::{Approval, RatioInputs, Severity, Transaction, UserAccount};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Transactions above this need an explicit approval
pub const APPROVAL_LIMIT: f64 = 100_000.0;
pub const MIN_CURRENT_RATIO: f64 = 1.0;
pub const MAX_DEBT_TO_EQUITY: f64 = 2.0;
/// Largest tolerated share of admin accounts
pub const MAX_ADMIN_SHARE: f64 = 0.2;

// ============================================================================
// RULES & FINDINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceRule {
    SeparationOfDuties,
    ApprovalThreshold,
    LiquidityFloor,
    LeverageCeiling,
    LeastPrivilege,
}

impl fmt::Display for ComplianceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComplianceRule::SeparationOfDuties => "Separation of duties",
            ComplianceRule::ApprovalThreshold => "Approval thresholds",
            ComplianceRule::LiquidityFloor => "Required liquidity",
            ComplianceRule::LeverageCeiling => "Leverage ceiling",
            ComplianceRule::LeastPrivilege => "Least privilege",
        };
        f.write_str(name)
    }
}

/// A failed rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceFinding {
    pub rule: ComplianceRule,
    pub severity: Severity,
    pub details: String,
    /// Suggested remediation
    pub action: String,
}

/// Whatever the caller has available; absent parts are skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceInput {
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default)]
    pub approvals: Option<Vec<Approval>>,
    #[serde(default)]
    pub users: Option<Vec<UserAccount>>,
    #[serde(default)]
    pub financial_ratios: Option<RatioInputs>,
}

// ============================================================================
// EVALUATION
// ============================================================================

pub fn check_compliance(input: &ComplianceInput) -> Vec<ComplianceFinding> {
    let mut findings = Vec::new();

    if let Some(approvals) = &input.approvals {
        let self_approved = approvals
            .iter()
            .filter(|a| a.created_by == a.approved_by)
            .count();
        if self_approved > 0 {
            findings.push(ComplianceFinding {
                rule: ComplianceRule::SeparationOfDuties,
                severity: Severity::Error,
                details: format!("{} self-approval case(s) detected", self_approved),
                action: "Revoke self-approvals and reroute them to another approver".to_string(),
            });
        }
    }

    if let Some(transactions) = &input.transactions {
        let unapproved_large = transactions
            .iter()
            .filter(|t| t.amount > APPROVAL_LIMIT && !t.approved)
            .count();
        if unapproved_large > 0 {
            findings.push(ComplianceFinding {
                rule: ComplianceRule::ApprovalThreshold,
                severity: Severity::Error,
                details: format!("{} large transaction(s) without approval", unapproved_large),
                action: "Suspend the transactions until approved".to_string(),
            });
        }
    }

    if let Some(ratios) = &input.financial_ratios {
        if ratios.current_ratio < MIN_CURRENT_RATIO {
            findings.push(ComplianceFinding {
                rule: ComplianceRule::LiquidityFloor,
                severity: Severity::Warning,
                details: "Current ratio is below 1.0".to_string(),
                action: "Review the liquidity plan".to_string(),
            });
        }

        if ratios.debt_to_equity > MAX_DEBT_TO_EQUITY {
            findings.push(ComplianceFinding {
                rule: ComplianceRule::LeverageCeiling,
                severity: Severity::Warning,
                details: "Debt-to-equity ratio exceeds 2.0".to_string(),
                action: "Reduce borrowing or increase capital".to_string(),
            });
        }
    }

    if let Some(users) = &input.users {
        let admins = users.iter().filter(|u| u.is_admin()).count();
        if admins as f64 > users.len() as f64 * MAX_ADMIN_SHARE {
            findings.push(ComplianceFinding {
                rule: ComplianceRule::LeastPrivilege,
                severity: Severity::Warning,
                details: format!(
                    "{} of {} users are administrators (over 20%)",
                    admins,
                    users.len()
                ),
                action: "Review and reduce administrative privileges".to_string(),
            });
        }
    }

    debug!(violations = findings.len(), "compliance rules evaluated");

    findings
}

// ============================================================================
// TESTS
// ============================================================================
