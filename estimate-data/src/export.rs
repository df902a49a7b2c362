use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use estimate_core::export::{ExportError, ExportOptions, Exporter};
use estimate_core::report::{EstimateReport, ReportKind, ReportSnapshot};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// One row of the exported breakdown.
///
/// `section` is `item` for priced selections, `fee` for fees and `total`
/// for the subtotal, VAT and grand totals.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BreakdownRow {
    pub section: &'static str,
    pub category: String,
    pub label: String,
    pub quantity: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub amount: Decimal,
}

impl BreakdownRow {
    fn total(
        label: &str,
        amount: Decimal,
    ) -> Self {
        Self {
            section: "total",
            category: String::new(),
            label: label.to_string(),
            quantity: None,
            rate: None,
            amount,
        }
    }
}

/// Flattens a detailed report into CSV rows.
pub fn breakdown_rows(report: &EstimateReport) -> Vec<BreakdownRow> {
    let items = report.lines.iter().map(|line| BreakdownRow {
        section: "item",
        category: line.category.label().to_string(),
        label: line.selection.clone(),
        quantity: Some(line.basis),
        rate: Some(line.rate),
        amount: line.amount,
    });
    let fees = report.fees.iter().map(|fee| BreakdownRow {
        section: "fee",
        category: String::new(),
        label: fee.label.clone(),
        quantity: None,
        rate: Some(fee.rate),
        amount: fee.amount,
    });

    items
        .chain(std::iter::once(BreakdownRow::total("Subtotal", report.subtotal)))
        .chain(fees)
        .chain([
            BreakdownRow::total("Total excl. VAT", report.total_excluding_vat),
            BreakdownRow {
                rate: Some(report.vat_rate),
                ..BreakdownRow::total("VAT", report.vat)
            },
            BreakdownRow::total("Total incl. VAT", report.total_including_vat),
        ])
        .collect()
}

/// Writes the rows with a header line. Returns the number of data rows.
pub fn write_breakdown<W: Write>(
    writer: W,
    report: &EstimateReport,
) -> Result<usize, ExportError> {
    let rows = breakdown_rows(report);
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in &rows {
        csv_writer
            .serialize(row)
            .map_err(|e| ExportError::Format(e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(rows.len())
}

/// Exports the detailed cost breakdown as CSV.
pub struct CsvBreakdownExporter {
    default_path: PathBuf,
}

impl CsvBreakdownExporter {
    /// `default_path` is used when the export options name no destination.
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
        }
    }
}

#[async_trait]
impl Exporter for CsvBreakdownExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn export(
        &self,
        snapshot: &ReportSnapshot,
        options: &ExportOptions,
    ) -> Result<String, ExportError> {
        let path = options
            .destination
            .clone()
            .unwrap_or_else(|| self.default_path.clone());
        let report = EstimateReport::build(ReportKind::Detailed, snapshot, &options.report);

        let file = std::fs::File::create(&path)?;
        let rows = write_breakdown(file, &report)?;
        debug!(path = %path.display(), rows, "breakdown written");

        Ok(format!("wrote {} rows to {}", rows, path.display()))
    }
}
