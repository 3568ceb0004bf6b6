// ⚖️ Ratio Calculator - liquidity, efficiency and staff-cost performance
//
// Every ratio guards its denominator: a zero denominator yields 0 rather
// than an error, and the classification takes it from there.

use crate::model::{round_to, BalanceSnapshot, Status};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DAYS_PER_YEAR: f64 = 365.0;

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

// ============================================================================
// LIQUIDITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioReading {
    pub value: f64,
    pub status: Status,
    pub message: String,
}

impl RatioReading {
    fn new(value: f64, status: Status, message: &str) -> Self {
        RatioReading {
            value: round_to(value, 2),
            status,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityResult {
    pub current_ratio: RatioReading,
    pub quick_ratio: RatioReading,
    pub cash_ratio: RatioReading,
}

pub fn compute_liquidity_ratios(balance: &BalanceSnapshot) -> LiquidityResult {
    let liabilities = balance.current_liabilities;

    let current = ratio(balance.current_assets, liabilities);
    let current_ratio = if (1.5..=3.0).contains(&current) {
        RatioReading::new(current, Status::Healthy, "Healthy liquidity")
    } else if (1.0..1.5).contains(&current) {
        RatioReading::new(current, Status::Warning, "Relatively low liquidity")
    } else if current < 1.0 {
        RatioReading::new(current, Status::Critical, "Critical liquidity shortfall")
    } else {
        RatioReading::new(current, Status::Warning, "Excess liquidity left underused")
    };

    let quick = ratio(balance.current_assets - balance.inventory, liabilities);
    let quick_ratio = if quick >= 1.0 {
        RatioReading::new(quick, Status::Healthy, "Good capacity to meet obligations")
    } else if quick >= 0.7 {
        RatioReading::new(quick, Status::Warning, "Limited capacity for quick settlement")
    } else {
        RatioReading::new(quick, Status::Critical, "Difficulty meeting short-term obligations")
    };

    let cash = ratio(balance.cash, liabilities);
    let cash_ratio = if cash >= 0.2 {
        RatioReading::new(cash, Status::Healthy, "Sufficient cash")
    } else if cash >= 0.1 {
        RatioReading::new(cash, Status::Warning, "Low cash")
    } else {
        RatioReading::new(cash, Status::Critical, "Severe cash shortage")
    };

    debug!(current, quick, cash, "liquidity ratios computed");

    LiquidityResult {
        current_ratio,
        quick_ratio,
        cash_ratio,
    }
}

// ============================================================================
// EFFICIENCY
// ============================================================================

/// Turnovers rounded to 2 decimals, day counts to whole days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyResult {
    pub inventory_turnover: f64,
    pub days_inventory_outstanding: f64,
    pub receivables_turnover: f64,
    pub days_receivables_outstanding: f64,
    pub asset_turnover: f64,
    pub operating_cycle: f64,
}

/// 365 / turnover, or a full year when nothing turns over
fn days_outstanding(turnover: f64) -> f64 {
    if turnover > 0.0 {
        DAYS_PER_YEAR / turnover
    } else {
        DAYS_PER_YEAR
    }
}

pub fn compute_efficiency_ratios(balance: &BalanceSnapshot) -> EfficiencyResult {
    let inventory_turnover = ratio(balance.cost_of_goods_sold, balance.average_inventory);
    let dio = days_outstanding(inventory_turnover);

    let receivables_turnover = ratio(balance.credit_sales, balance.average_receivables);
    let dro = days_outstanding(receivables_turnover);

    let asset_turnover = ratio(balance.revenue, balance.average_total_assets);

    debug!(dio, dro, asset_turnover, "efficiency ratios computed");

    EfficiencyResult {
        inventory_turnover: round_to(inventory_turnover, 2),
        days_inventory_outstanding: dio.round(),
        receivables_turnover: round_to(receivables_turnover, 2),
        days_receivables_outstanding: dro.round(),
        asset_turnover: round_to(asset_turnover, 2),
        operating_cycle: (dio + dro).round(),
    }
}

// ============================================================================
// PERFORMANCE (staff cost vs revenue)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInputs {
    pub total_salaries: f64,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub employee_count: u32,
    pub left_employees: u32,
    pub average_employee_count: f64,
}

/// Percentages except `average_employee_cost`, which is a currency amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRatios {
    pub cost_ratio: f64,
    pub profit_margin: f64,
    pub turnover_rate: f64,
    pub average_employee_cost: f64,
    pub salary_to_revenue_ratio: f64,
}

pub fn compute_performance_ratios(inputs: &PerformanceInputs) -> PerformanceRatios {
    let revenue = inputs.total_revenue;

    let cost_ratio = ratio(inputs.total_salaries, revenue) * 100.0;
    let profit_margin = ratio(revenue - inputs.total_expenses, revenue) * 100.0;
    let turnover_rate = ratio(inputs.left_employees as f64, inputs.average_employee_count) * 100.0;
    let average_employee_cost = ratio(inputs.total_expenses, inputs.employee_count as f64);

    PerformanceRatios {
        cost_ratio: round_to(cost_ratio, 2),
        profit_margin: round_to(profit_margin, 2),
        turnover_rate: round_to(turnover_rate, 2),
        average_employee_cost: round_to(average_employee_cost, 2),
        // Same formula as the cost ratio; kept under its reporting name
        salary_to_revenue_ratio: round_to(cost_ratio, 2),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn balance(current_assets: f64, current_liabilities: f64, inventory: f64, cash: f64) -> BalanceSnapshot {
        BalanceSnapshot {
            current_assets,
            current_liabilities,
            inventory,
            cash,
            revenue: 0.0,
            cost_of_goods_sold: 0.0,
            average_inventory: 0.0,
            credit_sales: 0.0,
            average_receivables: 0.0,
            average_total_assets: 0.0,
        }
    }

    #[test]
    fn test_healthy_liquidity() {
        let result = compute_liquidity_ratios(&balance(150.0, 100.0, 0.0, 100.0));

        assert_eq!(result.current_ratio.value, 1.5);
        assert_eq!(result.current_ratio.status, Status::Healthy);
        assert_eq!(result.quick_ratio.value, 1.5);
        assert_eq!(result.cash_ratio.value, 1.0);
        assert_eq!(result.cash_ratio.status, Status::Healthy);
    }

    #[rstest]
    #[case(80.0, Status::Critical)]
    #[case(100.0, Status::Warning)]
    #[case(149.0, Status::Warning)]
    #[case(300.0, Status::Healthy)]
    #[case(301.0, Status::Warning)]
    fn test_current_ratio_bands(#[case] assets: f64, #[case] expected: Status) {
        let result = compute_liquidity_ratios(&balance(assets, 100.0, 0.0, 50.0));
        assert_eq!(result.current_ratio.status, expected);
    }

    #[test]
    fn test_excess_liquidity_message() {
        let result = compute_liquidity_ratios(&balance(500.0, 100.0, 0.0, 50.0));
        assert!(result.current_ratio.message.contains("underused"));
    }

    #[rstest]
    #[case(100.0, Status::Healthy)]
    #[case(70.0, Status::Warning)]
    #[case(69.0, Status::Critical)]
    fn test_quick_ratio_bands(#[case] liquid_assets: f64, #[case] expected: Status) {
        // 50 of inventory is excluded from the quick ratio
        let result = compute_liquidity_ratios(&balance(liquid_assets + 50.0, 100.0, 50.0, 50.0));
        assert_eq!(result.quick_ratio.status, expected);
    }

    #[rstest]
    #[case(20.0, Status::Healthy)]
    #[case(10.0, Status::Warning)]
    #[case(9.0, Status::Critical)]
    fn test_cash_ratio_bands(#[case] cash: f64, #[case] expected: Status) {
        let result = compute_liquidity_ratios(&balance(200.0, 100.0, 0.0, cash));
        assert_eq!(result.cash_ratio.status, expected);
    }

    #[test]
    fn test_zero_liabilities_yield_zero_ratios() {
        let result = compute_liquidity_ratios(&balance(150.0, 0.0, 0.0, 100.0));
        assert_eq!(result.current_ratio.value, 0.0);
        assert_eq!(result.current_ratio.status, Status::Critical);
        assert_eq!(result.cash_ratio.value, 0.0);
    }

    #[test]
    fn test_efficiency_ratios() {
        let mut snapshot = balance(0.0, 0.0, 0.0, 0.0);
        snapshot.cost_of_goods_sold = 120_000.0;
        snapshot.average_inventory = 20_000.0;
        snapshot.credit_sales = 73_000.0;
        snapshot.average_receivables = 10_000.0;
        snapshot.revenue = 250_000.0;
        snapshot.average_total_assets = 100_000.0;

        let result = compute_efficiency_ratios(&snapshot);

        assert_eq!(
            result,
            EfficiencyResult {
                inventory_turnover: 6.0,
                days_inventory_outstanding: 61.0,
                receivables_turnover: 7.3,
                days_receivables_outstanding: 50.0,
                asset_turnover: 2.5,
                operating_cycle: 111.0,
            }
        );
    }

    #[test]
    fn test_stagnant_stock_is_a_full_year() {
        let result = compute_efficiency_ratios(&balance(0.0, 0.0, 0.0, 0.0));
        assert_eq!(result.inventory_turnover, 0.0);
        assert_eq!(result.days_inventory_outstanding, 365.0);
        assert_eq!(result.days_receivables_outstanding, 365.0);
        assert_eq!(result.operating_cycle, 730.0);
    }

    #[test]
    fn test_performance_ratios() {
        let result = compute_performance_ratios(&PerformanceInputs {
            total_salaries: 30_000.0,
            total_revenue: 100_000.0,
            total_expenses: 70_000.0,
            employee_count: 10,
            left_employees: 2,
            average_employee_count: 8.0,
        });

        assert_eq!(result.cost_ratio, 30.0);
        assert_eq!(result.profit_margin, 30.0);
        assert_eq!(result.turnover_rate, 25.0);
        assert_eq!(result.average_employee_cost, 7_000.0);
        assert_eq!(result.salary_to_revenue_ratio, 30.0);
    }

    #[test]
    fn test_performance_ratios_without_revenue() {
        let result = compute_performance_ratios(&PerformanceInputs {
            total_salaries: 30_000.0,
            total_revenue: 0.0,
            total_expenses: 70_000.0,
            employee_count: 0,
            left_employees: 0,
            average_employee_count: 0.0,
        });

        assert_eq!(result.cost_ratio, 0.0);
        assert_eq!(result.profit_margin, 0.0);
        assert_eq!(result.average_employee_cost, 0.0);
    }
}
