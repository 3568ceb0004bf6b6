// 🔮 Trend/Forecast Engine
//
// Ordinary least squares over index positions 1..n, projected one period
// ahead. R² doubles as the confidence of the projection.
//
// The seasonal factor (value 12 periods back over the average of all but
// the last value) is an approximation kept for compatibility with existing
// reports; it is not a seasonal decomposition.

use crate::anomaly::{mean, std_dev};
use crate::model::{round_to, Trend};
use serde::{Deserialize, Serialize};
use tracing::debug;

const SLOPE_EPSILON: f64 = 0.01;
const SEASON_LENGTH: usize = 12;

// ============================================================================
// LINEAR FORECAST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearForecast {
    /// Projected value for period n + 1, floored at 0
    pub next_period: f64,
    pub trend: Trend,
    /// R², clamped to [0, 1]
    pub confidence: f64,
    pub slope: f64,
    pub intercept: f64,
}

/// Least-squares fit of `series` (oldest first) against 1..=n
pub fn linear_forecast(series: &[f64]) -> LinearForecast {
    if series.len() < 2 {
        return LinearForecast {
            next_period: series.first().copied().unwrap_or(0.0),
            trend: Trend::Stable,
            confidence: 0.0,
            slope: 0.0,
            intercept: series.first().copied().unwrap_or(0.0),
        };
    }

    let n = series.len() as f64;
    let xs = (1..=series.len()).map(|i| i as f64);

    let sum_x: f64 = xs.clone().sum();
    let sum_y: f64 = series.iter().sum();
    let sum_xy: f64 = xs.clone().zip(series).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.clone().map(|x| x * x).sum();

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    let next_period = (slope * (n + 1.0) + intercept).max(0.0);

    let trend = if slope > SLOPE_EPSILON {
        Trend::Increasing
    } else if slope < -SLOPE_EPSILON {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    let y_mean = sum_y / n;
    let total_ss: f64 = series.iter().map(|y| (y - y_mean).powi(2)).sum();
    let residual_ss: f64 = xs
        .zip(series)
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let r_squared = if total_ss > 0.0 {
        1.0 - residual_ss / total_ss
    } else {
        1.0
    };

    LinearForecast {
        next_period,
        trend,
        confidence: r_squared.clamp(0.0, 1.0),
        slope,
        intercept,
    }
}

// ============================================================================
// TREND ANALYSIS (period-over-period changes)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub average_change: f64,
    /// Population std-dev of the period-over-period changes
    pub volatility: f64,
    /// Last value plus the average change
    pub next_value: f64,
}

pub fn analyze_trend(values: &[f64]) -> TrendAnalysis {
    if values.len() < 2 {
        return TrendAnalysis {
            trend: Trend::Stable,
            average_change: 0.0,
            volatility: 0.0,
            next_value: values.first().copied().unwrap_or(0.0),
        };
    }

    let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let average_change = mean(&changes);
    let volatility = std_dev(&changes);

    let trend = if average_change.abs() < volatility * 0.5 {
        Trend::Stable
    } else if average_change > 0.0 {
        Trend::Increasing
    } else {
        Trend::Decreasing
    };

    let last = values[values.len() - 1];

    TrendAnalysis {
        trend,
        average_change: round_to(average_change, 2),
        volatility: round_to(volatility, 2),
        next_value: round_to(last + average_change, 2),
    }
}

// ============================================================================
// FORECAST WITH RISK FACTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Changes swing by more than 30% of the series mean
    HighVolatility,
    /// Declining and projected well below the recent average
    AcceleratingDecline,
    /// Seasonal factor more than 20% away from 1
    StrongSeasonality,
}

impl RiskFactor {
    pub fn describe(&self) -> &'static str {
        match self {
            RiskFactor::HighVolatility => "High volatility in the data",
            RiskFactor::AcceleratingDecline => "Accelerating decline expected",
            RiskFactor::StrongSeasonality => "Strong seasonal effect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub next_period: f64,
    pub trend: Trend,

    /// R² in [0, 1]
    pub confidence: f64,

    /// R² as a whole percentage, for display
    pub confidence_percent: f64,

    pub seasonal_factor: f64,
    pub risk_factors: Vec<RiskFactor>,
}

pub fn forecast(series: &[f64]) -> ForecastResult {
    let fit = linear_forecast(series);
    let trend_analysis = analyze_trend(series);
    let seasonal_factor = seasonal_factor(series);
    let series_mean = mean(series);

    let mut risk_factors = Vec::new();

    if trend_analysis.volatility > series_mean * 0.3 {
        risk_factors.push(RiskFactor::HighVolatility);
    }

    // Always over three periods, even when fewer exist
    let recent = &series[series.len().saturating_sub(3)..];
    let recent_average = recent.iter().sum::<f64>() / 3.0;
    if fit.trend == Trend::Decreasing && fit.next_period < recent_average * 0.8 {
        risk_factors.push(RiskFactor::AcceleratingDecline);
    }

    if (seasonal_factor - 1.0).abs() > 0.2 {
        risk_factors.push(RiskFactor::StrongSeasonality);
    }

    debug!(
        len = series.len(),
        slope = fit.slope,
        r_squared = fit.confidence,
        risk_factors = risk_factors.len(),
        "forecast computed"
    );

    ForecastResult {
        next_period: round_to(fit.next_period, 2),
        trend: fit.trend,
        confidence: round_to(fit.confidence, 4),
        confidence_percent: (fit.confidence * 100.0).round(),
        seasonal_factor: round_to(seasonal_factor, 2),
        risk_factors,
    }
}

/// Value 12 periods back over the mean of all but the last value
fn seasonal_factor(series: &[f64]) -> f64 {
    if series.len() < SEASON_LENGTH {
        return 1.0;
    }
    let baseline = mean(&series[..series.len() - 1]);
    if baseline == 0.0 {
        return 1.0;
    }
    series[series.len() - SEASON_LENGTH] / baseline
}

// ============================================================================
// TESTS
// ============================================================================
