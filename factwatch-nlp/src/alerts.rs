use chrono::{DateTime, Duration, Utc};
use factwatch_common::{Alert, AlertSeverity, Claim};

/// Anomaly notices for the dashboard.
///
/// There is no detector behind these yet: any non-empty claim set yields the
/// same two notices, stamped relative to `now`.
pub fn detect_alerts(claims: &[Claim], now: DateTime<Utc>) -> Vec<Alert> {
    if claims.is_empty() {
        return Vec::new();
    }
    vec![
        Alert {
            id: "1".into(),
            message: "Spike in mentions detected around Kharkiv region".into(),
            severity: AlertSeverity::High,
            timestamp: now,
            category: None,
            region: Some("Kharkiv".into()),
            source: None,
        },
        Alert {
            id: "2".into(),
            message: "New narrative detected: \"Peacekeeping operation\"".into(),
            severity: AlertSeverity::Medium,
            timestamp: now - Duration::hours(2),
            category: None,
            region: None,
            source: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use factwatch_common::Source;

    #[test]
    fn no_claims_no_alerts() {
        assert!(detect_alerts(&[], Utc::now()).is_empty());
    }

    #[test]
    fn static_notices_are_relative_to_now() {
        let now = Utc::now();
        let alerts = detect_alerts(&[Claim::new(Source::Web, "x")], now);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[0].timestamp, now);
        assert_eq!(now - alerts[1].timestamp, Duration::hours(2));
    }
}
