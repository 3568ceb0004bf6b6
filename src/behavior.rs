// 🕵️ Behavioral Profiler - per-actor risk scoring from activity logs
//
// Three signals per actor, each adding points to a 0-100 score:
//   after-hours work (+30), an over-repeated action (+20 each),
//   anomalous amounts (+15 per outlier).

use crate::anomaly::{detect_anomalies, DEFAULT_Z_THRESHOLD};
use crate::model::ActivityEvent;
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const AFTER_HOURS_SHARE: f64 = 0.3;
const REPEATED_ACTION_SHARE: f64 = 0.5;
const AFTER_HOURS_POINTS: u32 = 30;
const REPEATED_ACTION_POINTS: u32 = 20;
const AMOUNT_ANOMALY_POINTS: u32 = 15;
const MAX_RISK_SCORE: u32 = 100;
const UNUSUAL_ACTIVITY_SCORE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub actor_id: String,
    pub event_count: usize,
    pub unusual_activity: bool,
    pub patterns: Vec<String>,
    /// 0..=100
    pub risk_score: u32,
    pub recommendations: Vec<String>,
}

/// Event hour outside 06:00-22:59 (UTC)
fn is_after_hours(event: &ActivityEvent) -> bool {
    let hour = event.timestamp.hour();
    hour < 6 || hour > 22
}

/// Profile every actor in the log, keyed by actor id
pub fn profile_behavior(events: &[ActivityEvent]) -> BTreeMap<String, BehaviorProfile> {
    let mut by_actor: BTreeMap<&str, Vec<&ActivityEvent>> = BTreeMap::new();
    for event in events {
        by_actor.entry(event.actor_id.as_str()).or_default().push(event);
    }

    by_actor
        .into_iter()
        .map(|(actor_id, actor_events)| {
            let profile = profile_actor(actor_id, &actor_events);
            (actor_id.to_string(), profile)
        })
        .collect()
}

fn profile_actor(actor_id: &str, events: &[&ActivityEvent]) -> BehaviorProfile {
    let total = events.len() as f64;
    let mut patterns = Vec::new();
    let mut recommendations = Vec::new();
    let mut score = 0u32;

    let after_hours = events.iter().filter(|e| is_after_hours(e)).count();
    if after_hours as f64 > total * AFTER_HOURS_SHARE {
        patterns.push("Frequent activity outside working hours".to_string());
        recommendations.push("Review after-hours access permissions".to_string());
        score += AFTER_HOURS_POINTS;
    }

    let mut action_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        *action_counts.entry(event.action.as_str()).or_default() += 1;
    }
    for (action, count) in &action_counts {
        if *count as f64 > total * REPEATED_ACTION_SHARE {
            patterns.push(format!("Excessive repetition of action: {}", action));
            recommendations.push(format!("Review the need to repeat {}", action));
            score += REPEATED_ACTION_POINTS;
        }
    }

    // Zero amounts carry no signal and are left out
    let amounts: Vec<f64> = events
        .iter()
        .filter_map(|e| e.amount)
        .filter(|a| *a != 0.0)
        .collect();
    let outliers = detect_anomalies(&amounts, DEFAULT_Z_THRESHOLD);
    if !outliers.is_empty() {
        patterns.push("Anomalous transaction amounts".to_string());
        recommendations.push("Verify the transactions with anomalous amounts".to_string());
        score += outliers.len() as u32 * AMOUNT_ANOMALY_POINTS;
    }

    if score > 0 {
        debug!(actor_id, score, events = events.len(), "actor flagged");
    }

    BehaviorProfile {
        actor_id: actor_id.to_string(),
        event_count: events.len(),
        unusual_activity: score > UNUSUAL_ACTIVITY_SCORE,
        patterns,
        risk_score: score.min(MAX_RISK_SCORE),
        recommendations,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(actor: &str, hour: u32, action: &str, amount: Option<f64>) -> ActivityEvent {
        ActivityEvent {
            actor_id: actor.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 4, 2, hour, 15, 0).unwrap(),
            action: action.to_string(),
            amount,
        }
    }

    #[test]
    fn test_regular_actor_scores_zero() {
        let events = vec![
            event("ana", 9, "create_expense", Some(120.0)),
            event("ana", 11, "approve_request", None),
            event("ana", 14, "edit_revenue", Some(80.0)),
            event("ana", 16, "view_report", None),
        ];
        let profiles = profile_behavior(&events);
        let ana = &profiles["ana"];

        assert_eq!(ana.risk_score, 0);
        assert!(!ana.unusual_activity);
        assert!(ana.patterns.is_empty());
        assert_eq!(ana.event_count, 4);
    }

    #[test]
    fn test_after_hours_and_repetition() {
        let events = vec![
            event("omar", 23, "delete_expense", None),
            event("omar", 2, "delete_expense", None),
            event("omar", 3, "delete_expense", None),
            event("omar", 10, "view_report", None),
        ];
        let profiles = profile_behavior(&events);
        let profile = &profiles["omar"];

        // 30 (after hours) + 20 (delete_expense is 75% of events)
        assert_eq!(profile.risk_score, 50);
        assert!(!profile.unusual_activity);
        assert_eq!(profile.patterns.len(), 2);
        assert_eq!(profile.recommendations.len(), 2);
        assert!(profile.patterns[1].contains("delete_expense"));
    }

    #[test]
    fn test_hour_22_is_within_working_hours() {
        let events = vec![event("lina", 22, "a", None), event("lina", 22, "b", None)];
        assert_eq!(profile_behavior(&events)["lina"].risk_score, 0);
    }

    #[test]
    fn test_anomalous_amounts_push_score_over_threshold() {
        let mut events: Vec<ActivityEvent> = (0..20)
            .map(|i| event("sami", 23, if i % 2 == 0 { "pay" } else { "refund" }, Some(50.0)))
            .collect();
        events.push(event("sami", 23, "pay", Some(9_000.0)));

        let profiles = profile_behavior(&events);
        let profile = &profiles["sami"];

        // 30 (after hours) + 20 ("pay" is 11 of 21) + 15 (one outlier)
        assert_eq!(profile.risk_score, 65);
        assert!(profile.unusual_activity);
    }

    #[test]
    fn test_outliers_accumulate_until_cap() {
        let mut events: Vec<ActivityEvent> = (0..40).map(|_| event("x", 1, "pay", Some(10.0))).collect();
        events.push(event("x", 1, "pay", Some(50_000.0)));

        let profiles = profile_behavior(&events);
        let profile = &profiles["x"];
        assert_eq!(profile.risk_score, 65);

        let mut events: Vec<ActivityEvent> = (0..200).map(|_| event("y", 1, "pay", Some(10.0))).collect();
        for amount in [90_000.0, 95_000.0, 99_000.0, 97_000.0] {
            events.push(event("y", 1, "pay", Some(amount)));
        }
        let profiles = profile_behavior(&events);
        let profile = &profiles["y"];
        assert_eq!(profile.risk_score, 100);
        assert!(profile.unusual_activity);
    }

    #[test]
    fn test_profiles_are_keyed_per_actor() {
        let events = vec![event("b", 9, "x", None), event("a", 9, "y", None), event("b", 10, "z", None)];
        let profiles = profile_behavior(&events);
        let keys: Vec<&String> = profiles.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(profiles["b"].event_count, 2);
    }
}
