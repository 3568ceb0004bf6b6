// Financial Intelligence Engine - Core Library
// Exposes all analyzers for use in CLI, API server, and tests

pub mod model;
pub mod error;
pub mod config;
pub mod benford;         // First-digit distribution test
pub mod duplicates;      // Near-duplicate transactions
pub mod round_numbers;   // Fabricated-looking amounts
pub mod anomaly;         // Z-score outliers
pub mod ratios;          // Liquidity, efficiency, performance
pub mod forecast;        // Linear trend forecast
pub mod projection;      // Cash flow + early-warning indicators
pub mod behavior;        // Per-actor risk profiles
pub mod compliance;      // Internal-control rules
pub mod recommendations; // Prioritized actions
pub mod engine;          // Orchestrator
pub mod import;          // CSV / JSON loading

// Re-export commonly used types
pub use model::{
    Transaction, BalanceSnapshot, ActivityEvent, Approval, UserAccount, RatioInputs,
    RiskLevel, Status, Severity, Priority, Trend,
};
pub use error::EngineError;
pub use config::{EngineConfig, DuplicateSettings, AnomalySettings};
pub use benford::{analyze_distribution, DistributionResult};
pub use duplicates::{detect_duplicates, DuplicateDetector, DuplicateGroup};
pub use round_numbers::{detect_round_number_patterns, RoundNumberResult, RoundNumberFlag, RoundPattern};
pub use anomaly::{detect_anomalies, AnomalyFlag};
pub use ratios::{
    compute_liquidity_ratios, compute_efficiency_ratios, compute_performance_ratios,
    LiquidityResult, EfficiencyResult, PerformanceInputs, PerformanceRatios, RatioReading,
};
pub use forecast::{forecast, linear_forecast, analyze_trend, ForecastResult, LinearForecast, TrendAnalysis, RiskFactor};
pub use projection::{
    project_cash_flow, check_warning_indicators,
    MonthlyFigures, CashFlowProjection, WarningInputs, WarningIndicator, IndicatorKind, IndicatorSeverity,
};
pub use behavior::{profile_behavior, BehaviorProfile};
pub use compliance::{check_compliance, ComplianceInput, ComplianceFinding, ComplianceRule};
pub use recommendations::{synthesize_recommendations, Recommendation, Category};
pub use engine::{Engine, AnalysisSnapshot, AnalysisReport};
pub use import::{load_transactions_csv, load_snapshot};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
