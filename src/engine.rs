// 🧠 Financial Intelligence Engine - orchestrator
//
// Validates a snapshot once, runs every analyzer whose preconditions hold,
// collects the results into one report and finishes with the
// recommendation pass. Stateless: the same snapshot always yields the
// same report, digest included.

use crate::anomaly::{detect_anomalies, AnomalyFlag, MIN_SERIES_LEN};
use crate::behavior::{profile_behavior, BehaviorProfile};
use crate::benford::{analyze_distribution, DistributionResult, MIN_SAMPLE_SIZE};
use crate::compliance::{check_compliance, ComplianceFinding, ComplianceInput};
use crate::config::EngineConfig;
use crate::duplicates::{DuplicateDetector, DuplicateGroup};
use crate::error::{ensure_finite, ensure_non_negative, EngineError};
use crate::forecast::{forecast, ForecastResult};
use crate::model::{ActivityEvent, BalanceSnapshot, Transaction};
use crate::projection::{
    check_warning_indicators, project_cash_flow, CashFlowProjection, MonthlyFigures, WarningIndicator,
    WarningInputs, DEFAULT_GROWTH_FACTOR,
};
use crate::ratios::{
    compute_efficiency_ratios, compute_liquidity_ratios, compute_performance_ratios, EfficiencyResult,
    LiquidityResult, PerformanceInputs, PerformanceRatios,
};
use crate::recommendations::{synthesize_recommendations, Recommendation};
use crate::round_numbers::{detect_round_number_patterns, RoundNumberResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{info, warn};

// ============================================================================
// SNAPSHOT (input)
// ============================================================================

/// Everything one analysis run looks at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub balance: Option<BalanceSnapshot>,

    #[serde(default)]
    pub activity: Vec<ActivityEvent>,

    /// Revenue per period, oldest first
    #[serde(default)]
    pub revenue_history: Vec<f64>,

    /// Expenses per period, oldest first
    #[serde(default)]
    pub expense_history: Option<Vec<f64>>,

    #[serde(default)]
    pub compliance: Option<ComplianceInput>,

    #[serde(default)]
    pub performance: Option<PerformanceInputs>,

    /// Monthly revenue/expense pairs for the cash-flow projection
    #[serde(default)]
    pub monthly: Vec<MonthlyFigures>,

    #[serde(default)]
    pub warnings: Option<WarningInputs>,
}

impl AnalysisSnapshot {
    /// Reject NaN/infinite numbers and negative balance figures
    pub fn validate(&self) -> Result<(), EngineError> {
        for (i, tx) in self.transactions.iter().enumerate() {
            ensure_finite(format!("transactions[{}].amount", i), tx.amount)?;
        }

        if let Some(balance) = &self.balance {
            for (name, value) in balance.fields() {
                ensure_non_negative(format!("balance.{}", name), value)?;
            }
        }

        for (i, event) in self.activity.iter().enumerate() {
            if let Some(amount) = event.amount {
                ensure_finite(format!("activity[{}].amount", i), amount)?;
            }
        }

        for (i, value) in self.revenue_history.iter().enumerate() {
            ensure_finite(format!("revenue_history[{}]", i), *value)?;
        }

        if let Some(history) = &self.expense_history {
            for (i, value) in history.iter().enumerate() {
                ensure_finite(format!("expense_history[{}]", i), *value)?;
            }
        }

        if let Some(bag) = &self.compliance {
            if let Some(transactions) = &bag.transactions {
                for (i, tx) in transactions.iter().enumerate() {
                    ensure_finite(format!("compliance.transactions[{}].amount", i), tx.amount)?;
                }
            }
            if let Some(ratios) = &bag.financial_ratios {
                ensure_finite("compliance.financial_ratios.current_ratio", ratios.current_ratio)?;
                ensure_finite("compliance.financial_ratios.debt_to_equity", ratios.debt_to_equity)?;
            }
        }

        if let Some(performance) = &self.performance {
            ensure_finite("performance.total_salaries", performance.total_salaries)?;
            ensure_finite("performance.total_revenue", performance.total_revenue)?;
            ensure_finite("performance.total_expenses", performance.total_expenses)?;
            ensure_finite("performance.average_employee_count", performance.average_employee_count)?;
        }

        for (i, month) in self.monthly.iter().enumerate() {
            ensure_finite(format!("monthly[{}].revenue", i), month.revenue)?;
            ensure_finite(format!("monthly[{}].expenses", i), month.expenses)?;
        }

        if let Some(w) = &self.warnings {
            for (name, value) in [
                ("revenue", w.revenue),
                ("expenses", w.expenses),
                ("liquidity", w.liquidity),
                ("expense_growth", w.expense_growth),
                ("revenue_growth", w.revenue_growth),
                ("monthly_expenses", w.monthly_expenses),
            ] {
                ensure_finite(format!("warnings.{}", name), value)?;
            }
        }

        Ok(())
    }

    /// SHA-256 of the canonical JSON encoding
    pub fn digest(&self) -> Result<String, EngineError> {
        let bytes = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&bytes);
        Ok(hash.iter().map(|b| format!("{:02x}", b)).collect())
    }
}

// ============================================================================
// REPORT (output)
// ============================================================================

/// One optional result per analyzer; `None` when its preconditions were
/// not met. Built fresh per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// SHA-256 of the snapshot this report was computed from
    pub input_digest: String,

    pub distribution: Option<DistributionResult>,
    pub duplicates: Option<Vec<DuplicateGroup>>,
    pub round_numbers: Option<RoundNumberResult>,
    pub anomalies: Option<Vec<AnomalyFlag>>,
    pub liquidity: Option<LiquidityResult>,
    pub efficiency: Option<EfficiencyResult>,
    pub performance: Option<PerformanceRatios>,
    pub forecast: Option<ForecastResult>,
    pub expense_forecast: Option<ForecastResult>,
    pub cash_flow: Option<CashFlowProjection>,
    pub warnings: Option<Vec<WarningIndicator>>,
    pub behavior: Option<BTreeMap<String, BehaviorProfile>>,
    pub compliance: Option<Vec<ComplianceFinding>>,

    pub recommendations: Vec<Recommendation>,
}

impl AnalysisReport {
    pub fn empty(input_digest: &str) -> Self {
        AnalysisReport {
            input_digest: input_digest.to_string(),
            distribution: None,
            duplicates: None,
            round_numbers: None,
            anomalies: None,
            liquidity: None,
            efficiency: None,
            performance: None,
            forecast: None,
            expense_forecast: None,
            cash_flow: None,
            warnings: None,
            behavior: None,
            compliance: None,
            recommendations: Vec::new(),
        }
    }

    pub fn summary(&self) -> String {
        let critical = self
            .recommendations
            .iter()
            .filter(|r| r.priority == crate::model::Priority::Critical)
            .count();
        let short_digest: String = self.input_digest.chars().take(12).collect();
        format!(
            "Report {}: {} duplicate record(s), {} anomaly flag(s), {} compliance finding(s), {} recommendation(s) ({} critical)",
            short_digest,
            self.duplicates.as_ref().map_or(0, Vec::len),
            self.anomalies.as_ref().map_or(0, Vec::len),
            self.compliance.as_ref().map_or(0, Vec::len),
            self.recommendations.len(),
            critical
        )
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: EngineConfig) -> Self {
        debug_assert!(config.validate().is_ok());
        Engine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate the snapshot, run every analyzer, then synthesize
    pub fn analyze(&self, snapshot: &AnalysisSnapshot) -> Result<AnalysisReport, EngineError> {
        snapshot.validate()?;
        let digest = snapshot.digest()?;

        info!(
            transactions = snapshot.transactions.len(),
            events = snapshot.activity.len(),
            periods = snapshot.revenue_history.len(),
            "starting analysis"
        );

        let mut report = AnalysisReport::empty(&digest);
        let amounts: Vec<f64> = snapshot.transactions.iter().map(|t| t.amount).collect();

        if amounts.len() >= MIN_SAMPLE_SIZE {
            report.distribution = Some(analyze_distribution(&amounts));
        } else {
            warn!(
                sample = amounts.len(),
                required = MIN_SAMPLE_SIZE,
                "skipping first-digit analysis: sample too small"
            );
        }

        if !snapshot.transactions.is_empty() {
            let settings = &self.config.duplicates;
            let detector = DuplicateDetector::with_params(settings.tolerance, settings.time_window_hours);
            report.duplicates = Some(detector.find(&snapshot.transactions));
            report.round_numbers = Some(detect_round_number_patterns(&snapshot.transactions));
        }

        if amounts.len() >= MIN_SERIES_LEN {
            report.anomalies = Some(detect_anomalies(&amounts, self.config.anomalies.z_threshold));
        }

        if let Some(balance) = &snapshot.balance {
            report.liquidity = Some(compute_liquidity_ratios(balance));
            report.efficiency = Some(compute_efficiency_ratios(balance));
        }

        if let Some(performance) = &snapshot.performance {
            report.performance = Some(compute_performance_ratios(performance));
        }

        if !snapshot.revenue_history.is_empty() {
            report.forecast = Some(forecast(&snapshot.revenue_history));
        }
        if let Some(history) = snapshot.expense_history.as_ref().filter(|h| !h.is_empty()) {
            report.expense_forecast = Some(forecast(history));
        }

        if !snapshot.monthly.is_empty() {
            match project_cash_flow(&snapshot.monthly, DEFAULT_GROWTH_FACTOR) {
                Ok(projection) => report.cash_flow = Some(projection),
                Err(e) => warn!(error = %e, "skipping cash-flow projection"),
            }
        }

        if let Some(inputs) = &snapshot.warnings {
            report.warnings = Some(check_warning_indicators(inputs));
        }

        if !snapshot.activity.is_empty() {
            report.behavior = Some(profile_behavior(&snapshot.activity));
        }

        if let Some(bag) = &snapshot.compliance {
            report.compliance = Some(check_compliance(bag));
        }

        report.recommendations = synthesize_recommendations(&report);

        info!(summary = %report.summary(), "analysis finished");

        Ok(report)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_validated(EngineConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
