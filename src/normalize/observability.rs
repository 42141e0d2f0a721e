use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ParseError;
use crate::types::ParsedData;

use super::unified::FileKind;

/// Severity classification used for observer callbacks and alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NormalizeSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the upload could not be normalized).
    Error,
    /// Critical event (resource-limit or infrastructure failures).
    Critical,
}

/// Context about one normalization attempt.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// The uploaded file's name.
    pub file_name: String,
    /// Format chosen by extension dispatch.
    pub kind: FileKind,
}

/// Minimal stats reported on successful normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Row count for table-shaped results; `None` for tree-shaped ones.
    pub table_rows: Option<usize>,
}

impl NormalizeStats {
    /// Derive stats from a normalized value.
    pub fn for_data(data: &ParsedData) -> Self {
        match data {
            ParsedData::Tree(_) => Self { table_rows: None },
            ParsedData::Table(rows) => Self {
                table_rows: Some(rows.len()),
            },
        }
    }
}

/// Observer interface for normalization outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait NormalizeObserver: Send + Sync {
    /// Called when normalization succeeds.
    fn on_success(&self, _ctx: &NormalizeContext, _stats: NormalizeStats) {}

    /// Called when normalization fails.
    fn on_failure(&self, _ctx: &NormalizeContext, _severity: NormalizeSeverity, _error: &ParseError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &ParseError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn NormalizeObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn NormalizeObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl NormalizeObserver for CompositeObserver {
    fn on_success(&self, ctx: &NormalizeContext, stats: NormalizeStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &ParseError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &ParseError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs normalization events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl NormalizeObserver for StdErrObserver {
    fn on_success(&self, ctx: &NormalizeContext, stats: NormalizeStats) {
        eprintln!(
            "[normalize][ok] kind={:?} file={} rows={:?}",
            ctx.kind, ctx.file_name, stats.table_rows
        );
    }

    fn on_failure(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &ParseError) {
        eprintln!(
            "[normalize][{:?}] kind={:?} file={} err={}",
            severity, ctx.kind, ctx.file_name, error
        );
    }

    fn on_alert(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &ParseError) {
        eprintln!(
            "[ALERT][normalize][{:?}] kind={:?} file={} err={}",
            severity, ctx.kind, ctx.file_name, error
        );
    }
}

/// Appends normalization events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are
    /// ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl NormalizeObserver for FileObserver {
    fn on_success(&self, ctx: &NormalizeContext, stats: NormalizeStats) {
        self.append_line(&format!(
            "{} ok kind={:?} file={} rows={:?}",
            unix_ts(),
            ctx.kind,
            ctx.file_name,
            stats.table_rows
        ));
    }

    fn on_failure(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &ParseError) {
        self.append_line(&format!(
            "{} fail severity={:?} kind={:?} file={} err={}",
            unix_ts(),
            severity,
            ctx.kind,
            ctx.file_name,
            error
        ));
    }

    fn on_alert(&self, ctx: &NormalizeContext, severity: NormalizeSeverity, error: &ParseError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} kind={:?} file={} err={}",
            unix_ts(),
            severity,
            ctx.kind,
            ctx.file_name,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
