//! Hand-off of a finished estimation to export collaborators.
//!
//! Exports are fire-and-forget from the wizard's point of view: every
//! exporter runs, and each outcome becomes an [`ExportNotice`] the caller
//! shows transiently. A failed export never touches the answers.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::report::{ReportConfig, ReportKind, ReportSnapshot};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Export rejected: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub kind: ReportKind,
    /// Where file-based exporters write. `None` lets each exporter pick.
    pub destination: Option<PathBuf>,
    pub report: ReportConfig,
}

impl ExportOptions {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            destination: None,
            report: ReportConfig::default(),
        }
    }

    pub fn with_destination(
        mut self,
        destination: impl Into<PathBuf>,
    ) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

#[async_trait]
pub trait Exporter: Send + Sync {
    /// Short name shown in notices.
    fn name(&self) -> &'static str;

    /// Exports the snapshot and describes what was produced.
    async fn export(
        &self,
        snapshot: &ReportSnapshot,
        options: &ExportOptions,
    ) -> Result<String, ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// A transient message about one export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportNotice {
    pub exporter: &'static str,
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for ExportNotice {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "[{}] {}", self.exporter, self.message),
            NoticeLevel::Failure => write!(f, "[{}] failed: {}", self.exporter, self.message),
        }
    }
}

/// Runs every exporter in order and reports each outcome.
pub async fn dispatch_exports(
    exporters: &[Box<dyn Exporter>],
    snapshot: &ReportSnapshot,
    options: &ExportOptions,
) -> Vec<ExportNotice> {
    let mut notices = Vec::with_capacity(exporters.len());
    for exporter in exporters {
        let notice = match exporter.export(snapshot, options).await {
            Ok(message) => {
                info!(exporter = exporter.name(), "{}", message);
                ExportNotice {
                    exporter: exporter.name(),
                    level: NoticeLevel::Success,
                    message,
                }
            }
            Err(e) => {
                warn!(exporter = exporter.name(), "export failed: {}", e);
                ExportNotice {
                    exporter: exporter.name(),
                    level: NoticeLevel::Failure,
                    message: e.to_string(),
                }
            }
        };
        notices.push(notice);
    }
    notices
}
