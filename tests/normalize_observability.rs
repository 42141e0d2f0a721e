use std::sync::{Arc, Mutex};

use file_normalizer::normalize::{
    normalize_upload, CompositeObserver, NormalizeContext, NormalizeObserver, NormalizeOptions,
    NormalizeSeverity, NormalizeStats,
};
use file_normalizer::ParseError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<NormalizeStats>>,
    failures: Mutex<Vec<NormalizeSeverity>>,
    alerts: Mutex<Vec<NormalizeSeverity>>,
}

impl NormalizeObserver for RecordingObserver {
    fn on_success(&self, _ctx: &NormalizeContext, stats: NormalizeStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &NormalizeContext, severity: NormalizeSeverity, _error: &ParseError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &NormalizeContext, severity: NormalizeSeverity, _error: &ParseError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_receives_success_with_table_row_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = NormalizeOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    normalize_upload("people.csv", b"name\nAda\nGrace\n", &opts)
        .unwrap()
        .unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![NormalizeStats {
            table_rows: Some(2)
        }]
    );
}

#[test]
fn tree_results_report_no_row_count() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = NormalizeOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    normalize_upload("data.json", br#"{"a": 1}"#, &opts)
        .unwrap()
        .unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes, vec![NormalizeStats { table_rows: None }]);
}

#[test]
fn parse_failure_is_error_severity_and_does_not_alert_at_critical_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = NormalizeOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: NormalizeSeverity::Critical,
        ..Default::default()
    };

    let _ = normalize_upload("data.json", b"{ nope", &opts).unwrap().unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![NormalizeSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lowered_threshold_turns_parse_failures_into_alerts() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = NormalizeOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: NormalizeSeverity::Error,
        ..Default::default()
    };

    let _ = normalize_upload("data.json", b"{ nope", &opts).unwrap().unwrap_err();

    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(alerts, vec![NormalizeSeverity::Error]);
}

#[test]
fn oversize_input_is_critical_and_alerts_at_default_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = NormalizeOptions {
        max_input_bytes: 2,
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let _ = normalize_upload("data.csv", b"a,b\n1,2\n", &opts).unwrap().unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(failures, vec![NormalizeSeverity::Critical]);
    assert_eq!(alerts, vec![NormalizeSeverity::Critical]);
}

#[test]
fn composite_observer_fans_out_to_all_members() {
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let members: Vec<Arc<dyn NormalizeObserver>> = vec![first.clone(), second.clone()];
    let composite = CompositeObserver::new(members);

    let opts = NormalizeOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    let _ = normalize_upload("data.json", b"{ nope", &opts).unwrap().unwrap_err();

    assert_eq!(first.failures.lock().unwrap().len(), 1);
    assert_eq!(second.failures.lock().unwrap().len(), 1);
}
