// 💵 Cash-Flow Projection & Early-Warning Indicators
//
// Moving-average projection of next month's revenue and expenses, plus
// threshold checks that warn before the ratios turn critical.

use crate::error::EngineError;
use crate::model::round_to;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GROWTH_FACTOR: f64 = 1.05;
const MIN_MONTHS: usize = 3;
const GROWTH_MONTHS: usize = 6;

// ============================================================================
// CASH-FLOW PROJECTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFigures {
    pub revenue: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub expected_monthly_expenses: f64,
    /// Three months of average expenses
    pub emergency_reserve: f64,
    /// Growth applied, as a percentage (5.0 = +5%)
    pub growth_rate: f64,
    pub projected_revenue: f64,
    pub projected_expenses: f64,
    pub cash_flow: f64,
}

/// Project next month from at least three months of history (oldest first).
///
/// With six or more months the growth factor is measured from the data
/// (recent quarter over first quarter) instead of using `growth_factor`.
pub fn project_cash_flow(
    months: &[MonthlyFigures],
    growth_factor: f64,
) -> Result<CashFlowProjection, EngineError> {
    if months.len() < MIN_MONTHS {
        return Err(EngineError::parameter(
            "months",
            format!("need at least {} months of history, got {}", MIN_MONTHS, months.len()),
        ));
    }

    let recent = &months[months.len() - MIN_MONTHS..];
    let avg_revenue = average_of(recent, |m| m.revenue);
    let avg_expenses = average_of(recent, |m| m.expenses);

    let mut growth = growth_factor;
    if months.len() >= GROWTH_MONTHS {
        let first_quarter = average_of(&months[..MIN_MONTHS], |m| m.revenue);
        if first_quarter > 0.0 {
            growth = avg_revenue / first_quarter;
        }
    }

    let projected_expenses = avg_expenses * growth;
    let projected_revenue = avg_revenue * growth;

    Ok(CashFlowProjection {
        expected_monthly_expenses: round_to(projected_expenses, 2),
        emergency_reserve: round_to(avg_expenses * 3.0, 2),
        growth_rate: round_to((growth - 1.0) * 100.0, 2),
        projected_revenue: round_to(projected_revenue, 2),
        projected_expenses: round_to(projected_expenses, 2),
        cash_flow: round_to(projected_revenue - projected_expenses, 2),
    })
}

fn average_of(slice: &[MonthlyFigures], pick: impl Fn(&MonthlyFigures) -> f64) -> f64 {
    slice.iter().map(pick).sum::<f64>() / slice.len() as f64
}

// ============================================================================
// WARNING INDICATORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningInputs {
    pub revenue: f64,
    pub expenses: f64,
    /// Cash available now
    pub liquidity: f64,
    /// Percentage growth of expenses over the previous period
    pub expense_growth: f64,
    /// Percentage growth of revenue over the previous period
    pub revenue_growth: f64,
    pub monthly_expenses: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    HighExpenseRatio,
    LowLiquidity,
    HighCostGrowth,
    NegativeGrowth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorSeverity {
    Warning,
    Danger,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningIndicator {
    pub kind: IndicatorKind,
    pub message: String,
    pub severity: IndicatorSeverity,
    pub value: f64,
    pub threshold: f64,
}

pub fn check_warning_indicators(inputs: &WarningInputs) -> Vec<WarningIndicator> {
    let mut warnings = Vec::new();

    // Expenses above 80% of revenue
    let expense_ratio = if inputs.revenue > 0.0 {
        inputs.expenses / inputs.revenue * 100.0
    } else {
        100.0
    };
    if expense_ratio > 80.0 {
        warnings.push(WarningIndicator {
            kind: IndicatorKind::HighExpenseRatio,
            message: format!("Expenses exceed {:.1}% of revenue", expense_ratio),
            severity: if expense_ratio > 90.0 {
                IndicatorSeverity::Critical
            } else {
                IndicatorSeverity::Danger
            },
            value: expense_ratio,
            threshold: 80.0,
        });
    }

    // Less than two months of expenses in the bank
    let months_of_liquidity = if inputs.monthly_expenses > 0.0 {
        inputs.liquidity / inputs.monthly_expenses
    } else {
        0.0
    };
    if months_of_liquidity < 2.0 {
        warnings.push(WarningIndicator {
            kind: IndicatorKind::LowLiquidity,
            message: format!("Liquidity covers only {:.1} months", months_of_liquidity),
            severity: if months_of_liquidity < 1.0 {
                IndicatorSeverity::Critical
            } else {
                IndicatorSeverity::Danger
            },
            value: months_of_liquidity,
            threshold: 2.0,
        });
    }

    if inputs.expense_growth > inputs.revenue_growth && inputs.revenue_growth >= 0.0 {
        let gap = inputs.expense_growth - inputs.revenue_growth;
        warnings.push(WarningIndicator {
            kind: IndicatorKind::HighCostGrowth,
            message: format!(
                "Expense growth ({:.1}%) outpaces revenue growth ({:.1}%)",
                inputs.expense_growth, inputs.revenue_growth
            ),
            severity: if gap > 10.0 {
                IndicatorSeverity::Danger
            } else {
                IndicatorSeverity::Warning
            },
            value: gap,
            threshold: 0.0,
        });
    }

    if inputs.revenue_growth < 0.0 {
        warnings.push(WarningIndicator {
            kind: IndicatorKind::NegativeGrowth,
            message: format!("Revenue down {:.1}%", inputs.revenue_growth.abs()),
            severity: if inputs.revenue_growth < -10.0 {
                IndicatorSeverity::Critical
            } else {
                IndicatorSeverity::Danger
            },
            value: inputs.revenue_growth,
            threshold: 0.0,
        });
    }

    warnings
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn months(figures: &[(f64, f64)]) -> Vec<MonthlyFigures> {
        figures
            .iter()
            .map(|(revenue, expenses)| MonthlyFigures {
                revenue: *revenue,
                expenses: *expenses,
            })
            .collect()
    }

    fn calm_inputs() -> WarningInputs {
        WarningInputs {
            revenue: 100_000.0,
            expenses: 60_000.0,
            liquidity: 50_000.0,
            expense_growth: 2.0,
            revenue_growth: 5.0,
            monthly_expenses: 10_000.0,
        }
    }

    #[test]
    fn test_projection_uses_default_growth() {
        let history = months(&[(1000.0, 800.0), (1000.0, 800.0), (1000.0, 800.0)]);
        let projection = project_cash_flow(&history, DEFAULT_GROWTH_FACTOR).unwrap();

        assert_eq!(projection.projected_revenue, 1050.0);
        assert_eq!(projection.projected_expenses, 840.0);
        assert_eq!(projection.emergency_reserve, 2400.0);
        assert_eq!(projection.growth_rate, 5.0);
        assert_eq!(projection.cash_flow, 210.0);
    }

    #[test]
    fn test_projection_measures_growth_with_six_months() {
        let history = months(&[
            (1000.0, 500.0),
            (1000.0, 500.0),
            (1000.0, 500.0),
            (1200.0, 600.0),
            (1200.0, 600.0),
            (1200.0, 600.0),
        ]);
        let projection = project_cash_flow(&history, DEFAULT_GROWTH_FACTOR).unwrap();

        assert_eq!(projection.growth_rate, 20.0);
        assert_eq!(projection.projected_revenue, 1440.0);
        assert_eq!(projection.expected_monthly_expenses, 720.0);
    }

    #[test]
    fn test_projection_needs_three_months() {
        let history = months(&[(1000.0, 800.0), (1000.0, 800.0)]);
        let err = project_cash_flow(&history, DEFAULT_GROWTH_FACTOR).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { .. }));
    }

    #[test]
    fn test_no_warnings_when_healthy() {
        assert!(check_warning_indicators(&calm_inputs()).is_empty());
    }

    #[test]
    fn test_expense_ratio_warning() {
        let mut inputs = calm_inputs();
        inputs.expenses = 95_000.0;
        let warnings = check_warning_indicators(&inputs);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, IndicatorKind::HighExpenseRatio);
        assert_eq!(warnings[0].severity, IndicatorSeverity::Critical);
    }

    #[test]
    fn test_low_liquidity_warning() {
        let mut inputs = calm_inputs();
        inputs.liquidity = 15_000.0;
        let warnings = check_warning_indicators(&inputs);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, IndicatorKind::LowLiquidity);
        assert_eq!(warnings[0].severity, IndicatorSeverity::Danger);
    }

    #[test]
    fn test_growth_warnings() {
        let mut inputs = calm_inputs();
        inputs.expense_growth = 20.0;
        let warnings = check_warning_indicators(&inputs);
        assert_eq!(warnings[0].kind, IndicatorKind::HighCostGrowth);
        assert_eq!(warnings[0].severity, IndicatorSeverity::Danger);

        let mut inputs = calm_inputs();
        inputs.revenue_growth = -12.0;
        let warnings = check_warning_indicators(&inputs);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, IndicatorKind::NegativeGrowth);
        assert_eq!(warnings[0].severity, IndicatorSeverity::Critical);
    }
}
