// 💡 Recommendation Synthesizer
//
// Reads whichever results are present in a report and turns triggered
// conditions into prioritized actions. Never mutates the report.

use crate::benford::DistributionResult;
use crate::engine::AnalysisReport;
use crate::model::{Priority, RiskLevel, Severity, Status, Trend};
use crate::projection::IndicatorSeverity;
use serde::{Deserialize, Serialize};

const SLOW_COLLECTION_DAYS: f64 = 60.0;
const TARGET_COLLECTION_DAYS: f64 = 45.0;
const HIGH_RISK_ACTOR_SCORE: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FraudDetection,
    LiquidityManagement,
    Receivables,
    Security,
    Compliance,
    FinancialPlanning,
    EarlyWarning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Category,
    pub priority: Priority,
    pub recommendation: String,
    pub expected_impact: String,
    pub implementation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_roi: Option<f64>,
}

impl Recommendation {
    fn new(category: Category, priority: Priority, recommendation: &str, expected_impact: &str, implementation: &str) -> Self {
        Recommendation {
            category,
            priority,
            recommendation: recommendation.to_string(),
            expected_impact: expected_impact.to_string(),
            implementation: implementation.to_string(),
            estimated_roi: None,
        }
    }
}

fn is_high_risk_distribution(result: &DistributionResult) -> bool {
    result.risk_level == RiskLevel::High
}

/// Build the action list for a report, sorted critical first (stable)
pub fn synthesize_recommendations(report: &AnalysisReport) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if report.distribution.as_ref().is_some_and(is_high_risk_distribution) {
        recommendations.push(Recommendation::new(
            Category::FraudDetection,
            Priority::Critical,
            "Run an immediate forensic audit of the financial transactions",
            "Detect and stop potential fraud",
            "Appoint an independent external auditor within 48 hours",
        ));
    }

    if let Some(liquidity) = &report.liquidity {
        if liquidity.current_ratio.status == Status::Critical {
            recommendations.push(Recommendation::new(
                Category::LiquidityManagement,
                Priority::Critical,
                "Improve liquidity urgently",
                "Avoid defaulting on obligations",
                "Speed up collections, defer non-critical payments, negotiate credit facilities",
            ));
        }
    }

    if let Some(efficiency) = &report.efficiency {
        let days = efficiency.days_receivables_outstanding;
        if days > SLOW_COLLECTION_DAYS {
            let mut collections = Recommendation::new(
                Category::Receivables,
                Priority::High,
                "Tighten the collection process",
                "",
                "Automated follow-up, early-payment discounts, stricter collection procedures",
            );
            collections.expected_impact = format!(
                "Shorten the collection period by {} days",
                days - TARGET_COLLECTION_DAYS
            );
            collections.estimated_roi = Some(15.0);
            recommendations.push(collections);
        }
    }

    if let Some(profiles) = &report.behavior {
        let high_risk = profiles
            .values()
            .filter(|p| p.risk_score > HIGH_RISK_ACTOR_SCORE)
            .count();
        if high_risk > 0 {
            recommendations.push(Recommendation::new(
                Category::Security,
                Priority::High,
                &format!("Review the activity of {} high-risk user(s)", high_risk),
                "Prevent internal fraudulent activity",
                "Detailed activity audit, restricted permissions, compliance training",
            ));
        }
    }

    if let Some(findings) = &report.compliance {
        for finding in findings {
            let priority = if finding.severity == Severity::Error {
                Priority::Critical
            } else {
                Priority::Medium
            };
            recommendations.push(Recommendation::new(
                Category::Compliance,
                priority,
                &finding.action,
                &format!("Ensure compliance with rule: {}", finding.rule),
                &finding.details,
            ));
        }
    }

    if let Some(forecast) = &report.forecast {
        if forecast.trend == Trend::Decreasing && !forecast.risk_factors.is_empty() {
            recommendations.push(Recommendation::new(
                Category::FinancialPlanning,
                Priority::Medium,
                "Prepare a contingency plan for the expected decline",
                "Soften the impact of the expected decline",
                "Diversify revenue sources, cut variable costs, build a reserve",
            ));
        }
    }

    if let Some(indicators) = &report.warnings {
        for indicator in indicators.iter().filter(|i| i.severity == IndicatorSeverity::Critical) {
            recommendations.push(Recommendation::new(
                Category::EarlyWarning,
                Priority::High,
                &format!("Act on early-warning signal: {}", indicator.message),
                "Correct course before the ratios turn critical",
                "Review the budget line behind the indicator with the branch managers",
            ));
        }
    }

    // sort_by_key is stable: equal priorities keep trigger order
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BehaviorProfile;
    use crate::compliance::{ComplianceFinding, ComplianceRule};
    use crate::forecast::{ForecastResult, RiskFactor};
    use crate::ratios::{EfficiencyResult, LiquidityResult, RatioReading};
    use std::collections::BTreeMap;

    fn reading(status: Status) -> RatioReading {
        RatioReading {
            value: 0.5,
            status,
            message: String::new(),
        }
    }

    fn finding(rule: ComplianceRule, severity: Severity) -> ComplianceFinding {
        ComplianceFinding {
            rule,
            severity,
            details: "details".to_string(),
            action: "fix it".to_string(),
        }
    }

    #[test]
    fn test_empty_report_yields_nothing() {
        assert!(synthesize_recommendations(&AnalysisReport::empty("digest")).is_empty());
    }

    #[test]
    fn test_sorted_by_priority() {
        let mut report = AnalysisReport::empty("digest");
        report.compliance = Some(vec![
            finding(ComplianceRule::LeastPrivilege, Severity::Warning),
            finding(ComplianceRule::SeparationOfDuties, Severity::Error),
        ]);
        report.efficiency = Some(EfficiencyResult {
            inventory_turnover: 1.0,
            days_inventory_outstanding: 30.0,
            receivables_turnover: 4.0,
            days_receivables_outstanding: 91.0,
            asset_turnover: 1.0,
            operating_cycle: 121.0,
        });
        report.liquidity = Some(LiquidityResult {
            current_ratio: reading(Status::Critical),
            quick_ratio: reading(Status::Critical),
            cash_ratio: reading(Status::Critical),
        });

        let recommendations = synthesize_recommendations(&report);
        let priorities: Vec<Priority> = recommendations.iter().map(|r| r.priority).collect();

        assert_eq!(
            priorities,
            vec![Priority::Critical, Priority::Critical, Priority::High, Priority::Medium]
        );
        // Liquidity was triggered before the compliance error
        assert_eq!(recommendations[0].category, Category::LiquidityManagement);
        assert_eq!(recommendations[1].category, Category::Compliance);

        let collections = &recommendations[2];
        assert_eq!(collections.estimated_roi, Some(15.0));
        assert!(collections.expected_impact.contains("46 days"));
    }

    fn distribution(risk_level: RiskLevel) -> DistributionResult {
        DistributionResult {
            chi_square: if risk_level == RiskLevel::High { 42.0 } else { 12.0 },
            is_anomaly: risk_level == RiskLevel::High,
            distribution: vec![],
            expected_distribution: vec![],
            deviations: vec![],
            risk_level,
            message: String::new(),
            digits_counted: 900,
        }
    }

    #[test]
    fn test_high_risk_distribution_calls_for_audit() {
        let mut report = AnalysisReport::empty("digest");
        report.distribution = Some(distribution(RiskLevel::High));

        let recommendations = synthesize_recommendations(&report);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].category, Category::FraudDetection);
        assert_eq!(recommendations[0].priority, Priority::Critical);

        report.distribution = Some(distribution(RiskLevel::Medium));
        assert!(synthesize_recommendations(&report).is_empty());
    }

    #[test]
    fn test_compliance_finding_maps_to_recommendation() {
        let mut report = AnalysisReport::empty("digest");
        report.compliance = Some(vec![finding(ComplianceRule::ApprovalThreshold, Severity::Error)]);

        let recommendations = synthesize_recommendations(&report);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].recommendation, "fix it");
        assert_eq!(recommendations[0].implementation, "details");
        assert!(recommendations[0].expected_impact.contains("Approval thresholds"));
    }

    #[test]
    fn test_high_risk_actors_get_one_review() {
        let mut profiles = BTreeMap::new();
        for (actor, score) in [("a", 80), ("b", 95), ("c", 70)] {
            profiles.insert(
                actor.to_string(),
                BehaviorProfile {
                    actor_id: actor.to_string(),
                    event_count: 10,
                    unusual_activity: score > 50,
                    patterns: vec![],
                    risk_score: score,
                    recommendations: vec![],
                },
            );
        }
        let mut report = AnalysisReport::empty("digest");
        report.behavior = Some(profiles);

        let recommendations = synthesize_recommendations(&report);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].category, Category::Security);
        assert!(recommendations[0].recommendation.contains("2 high-risk"));
    }

    #[test]
    fn test_declining_forecast_needs_risk_factors() {
        let mut report = AnalysisReport::empty("digest");
        report.forecast = Some(ForecastResult {
            next_period: 10.0,
            trend: Trend::Decreasing,
            confidence: 0.9,
            confidence_percent: 90.0,
            seasonal_factor: 1.0,
            risk_factors: vec![],
        });
        assert!(synthesize_recommendations(&report).is_empty());

        if let Some(forecast) = report.forecast.as_mut() {
            forecast.risk_factors.push(RiskFactor::AcceleratingDecline);
        }
        let recommendations = synthesize_recommendations(&report);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].priority, Priority::Medium);
        assert_eq!(recommendations[0].category, Category::FinancialPlanning);
    }
}
