//! Reports built from a finished estimation.
//!
//! The report layer only reads a [`ReportSnapshot`]. Fees are charged on the
//! subtotal and VAT on the subtotal plus fees.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AnswerSet, ClientType, ProjectType, keys};
use crate::pricing::common::{percent_of, round_half_up};
use crate::pricing::{Category, CostLine};
use crate::wizard::FormState;

/// Read-only view of a completed estimation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub answers: AnswerSet,
    pub running_total: Decimal,
    pub lines: Vec<CostLine>,
    pub taken_at: NaiveDateTime,
}

impl ReportSnapshot {
    pub fn from_state(
        state: &FormState,
        taken_at: NaiveDateTime,
    ) -> Self {
        Self {
            answers: state.answers.clone(),
            running_total: state.running_total(),
            lines: state.ledger.lines().cloned().collect(),
            taken_at,
        }
    }
}

/// A fee charged as a share of the subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub label: String,
    /// Fraction of the subtotal, e.g. `0.08`.
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub vat_rate: Decimal,
    pub fees: Vec<Fee>,
    pub quote_validity_days: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            vat_rate: Decimal::new(20, 2),
            fees: vec![
                Fee {
                    label: "Maîtrise d'œuvre".to_string(),
                    rate: Decimal::new(8, 2),
                },
                Fee {
                    label: "Assurance dommages-ouvrage".to_string(),
                    rate: Decimal::new(2, 2),
                },
            ],
            quote_validity_days: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Summary,
    Detailed,
    Quote,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detailed => "detailed",
            Self::Quote => "quote",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Some(Self::Summary),
            "detailed" => Some(Self::Detailed),
            "quote" => Some(Self::Quote),
            _ => None,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: Decimal,
    /// Percentage of the subtotal, one decimal.
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeLine {
    pub label: String,
    pub rate: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteHeader {
    pub number: String,
    pub issued_on: NaiveDate,
    pub valid_until: NaiveDate,
    pub client_name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Formats an amount the French way: `26 500,00 €`.
pub fn format_euros(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    format!("{}{grouped},{cents} €", if negative { "-" } else { "" })
}

fn format_rate(rate: Decimal) -> String {
    format!("{}", rate.saturating_mul(Decimal::ONE_HUNDRED).normalize())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateReport {
    pub kind: ReportKind,
    pub client_type: Option<ClientType>,
    pub project_type: Option<ProjectType>,
    pub subtotal: Decimal,
    pub fees: Vec<FeeLine>,
    pub total_excluding_vat: Decimal,
    pub vat_rate: Decimal,
    pub vat: Decimal,
    pub total_including_vat: Decimal,
    pub categories: Vec<CategoryTotal>,
    pub lines: Vec<CostLine>,
    pub quote: Option<QuoteHeader>,
}

impl EstimateReport {
    pub fn build(
        kind: ReportKind,
        snapshot: &ReportSnapshot,
        config: &ReportConfig,
    ) -> Self {
        let subtotal = round_half_up(snapshot.running_total);

        let fees: Vec<FeeLine> = config
            .fees
            .iter()
            .map(|fee| FeeLine {
                label: fee.label.clone(),
                rate: fee.rate,
                amount: round_half_up(subtotal.saturating_mul(fee.rate)),
            })
            .collect();
        let total_excluding_vat = fees
            .iter()
            .fold(subtotal, |total, fee| total.saturating_add(fee.amount));
        let vat = round_half_up(total_excluding_vat.saturating_mul(config.vat_rate));

        let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
        for line in &snapshot.lines {
            let total = by_category.entry(line.category).or_default();
            *total = total.saturating_add(line.amount);
        }
        let categories = match kind {
            ReportKind::Summary => Vec::new(),
            ReportKind::Detailed | ReportKind::Quote => by_category
                .into_iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(category, amount)| CategoryTotal {
                    category,
                    amount,
                    share: percent_of(amount, subtotal),
                })
                .collect(),
        };
        let lines = match kind {
            ReportKind::Summary => Vec::new(),
            ReportKind::Detailed | ReportKind::Quote => snapshot
                .lines
                .iter()
                .filter(|line| !line.amount.is_zero())
                .cloned()
                .collect(),
        };
        let quote = match kind {
            ReportKind::Quote => Some(quote_header(snapshot, config)),
            ReportKind::Summary | ReportKind::Detailed => None,
        };

        Self {
            kind,
            client_type: snapshot.answers.client_type(),
            project_type: snapshot.answers.project_type(),
            subtotal,
            fees,
            total_excluding_vat,
            vat_rate: config.vat_rate,
            vat,
            total_including_vat: total_excluding_vat.saturating_add(vat),
            categories,
            lines,
            quote,
        }
    }
}

fn quote_header(
    snapshot: &ReportSnapshot,
    config: &ReportConfig,
) -> QuoteHeader {
    let answers = &snapshot.answers;
    let issued_on = snapshot.taken_at.date();
    let owned = |key: &str| answers.text(key).map(|s| s.trim().to_string());

    QuoteHeader {
        number: format!("DEV-{}", snapshot.taken_at.format("%Y%m%d-%H%M%S")),
        issued_on,
        valid_until: issued_on
            .checked_add_days(Days::new(u64::from(config.quote_validity_days)))
            .unwrap_or(NaiveDate::MAX),
        client_name: owned(keys::CONTACT_NAME),
        company_name: owned(keys::COMPANY_NAME),
        email: owned(keys::CONTACT_EMAIL),
        phone: owned(keys::CONTACT_PHONE),
    }
}

impl fmt::Display for EstimateReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if let Some(quote) = &self.quote {
            writeln!(f, "Quote {}", quote.number)?;
            writeln!(f, "Issued:      {}", quote.issued_on.format("%d/%m/%Y"))?;
            writeln!(f, "Valid until: {}", quote.valid_until.format("%d/%m/%Y"))?;
            for (label, value) in [
                ("Client:      ", &quote.client_name),
                ("Company:     ", &quote.company_name),
                ("E-mail:      ", &quote.email),
                ("Phone:       ", &quote.phone),
            ] {
                if let Some(value) = value {
                    writeln!(f, "{label}{value}")?;
                }
            }
            writeln!(f)?;
        }

        if let Some(project) = self.project_type {
            writeln!(f, "Project:     {}", project.as_str())?;
        }
        if let Some(client) = self.client_type {
            writeln!(f, "Client type: {}", client.as_str())?;
        }

        if !self.categories.is_empty() {
            writeln!(f)?;
            writeln!(f, "Breakdown")?;
            for total in &self.categories {
                writeln!(
                    f,
                    "  {:<22} {:>16} {:>6}%",
                    total.category.label(),
                    format_euros(total.amount),
                    total.share
                )?;
            }
        }

        if !self.lines.is_empty() {
            writeln!(f)?;
            writeln!(f, "Items")?;
            for line in &self.lines {
                writeln!(
                    f,
                    "  {:<22} {:<24} {:>8} x {:>12} = {:>16}",
                    line.category.label(),
                    line.selection,
                    line.basis.normalize(),
                    format_rate_or_price(line),
                    format_euros(line.amount)
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Subtotal:            {:>16}", format_euros(self.subtotal))?;
        for fee in &self.fees {
            writeln!(
                f,
                "{:<21}{:>16}",
                format!("{} ({}%):", fee.label, format_rate(fee.rate)),
                format_euros(fee.amount)
            )?;
        }
        writeln!(
            f,
            "Total excl. VAT:     {:>16}",
            format_euros(self.total_excluding_vat)
        )?;
        writeln!(
            f,
            "{:<21}{:>16}",
            format!("VAT ({}%):", format_rate(self.vat_rate)),
            format_euros(self.vat)
        )?;
        write!(
            f,
            "Total incl. VAT:     {:>16}",
            format_euros(self.total_including_vat)
        )
    }
}

fn format_rate_or_price(line: &CostLine) -> String {
    if line.category.is_percentage() {
        format!("{}%", line.rate.normalize())
    } else {
        format_euros(line.rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::FieldValue;

    fn taken_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .and_then(|d| d.and_hms_opt(9, 26, 53))
            .unwrap()
    }

    fn line(
        category: Category,
        selection: &str,
        basis: Decimal,
        rate: Decimal,
    ) -> CostLine {
        CostLine {
            category,
            selection: selection.to_string(),
            basis,
            rate,
            amount: basis * rate,
        }
    }

    fn snapshot() -> ReportSnapshot {
        let answers = AnswerSet::new()
            .with(keys::CLIENT_TYPE, FieldValue::Text("individual".into()))
            .with(keys::PROJECT_TYPE, FieldValue::Text("construction".into()))
            .with(keys::CONTACT_NAME, FieldValue::Text("Camille Martin".into()))
            .with(keys::CONTACT_EMAIL, FieldValue::Text("camille@example.fr".into()));

        ReportSnapshot {
            answers,
            running_total: dec!(26500),
            lines: vec![
                line(Category::Roofing, "ARDOISE", dec!(100), dec!(180)),
                line(Category::Kitchen, "CUISINE DE BASE", dec!(1), dec!(8500)),
                line(Category::Windows, "PVC", dec!(0), dec!(450)),
            ],
            taken_at: taken_at(),
        }
    }

    // =========================================================================
    // totals
    // =========================================================================

    #[test]
    fn fees_apply_to_subtotal_and_vat_to_subtotal_plus_fees() {
        let report = EstimateReport::build(ReportKind::Summary, &snapshot(), &ReportConfig::default());

        assert_eq!(report.subtotal, dec!(26500));
        assert_eq!(
            report.fees.iter().map(|f| f.amount).collect::<Vec<_>>(),
            vec![dec!(2120.00), dec!(530.00)]
        );
        assert_eq!(report.total_excluding_vat, dec!(29150));
        assert_eq!(report.vat, dec!(5830));
        assert_eq!(report.total_including_vat, dec!(34980));
    }

    #[test]
    fn empty_estimation_is_all_zero() {
        let snapshot = ReportSnapshot {
            answers: AnswerSet::new(),
            running_total: dec!(0),
            lines: Vec::new(),
            taken_at: taken_at(),
        };

        let report = EstimateReport::build(ReportKind::Detailed, &snapshot, &ReportConfig::default());

        assert_eq!(report.total_including_vat, dec!(0));
        assert!(report.categories.is_empty());
    }

    #[test]
    fn custom_config_without_fees() {
        let config = ReportConfig {
            vat_rate: dec!(0.10),
            fees: Vec::new(),
            quote_validity_days: 15,
        };

        let report = EstimateReport::build(ReportKind::Summary, &snapshot(), &config);

        assert_eq!(report.total_excluding_vat, dec!(26500));
        assert_eq!(report.vat, dec!(2650));
    }

    #[test]
    fn totals_saturate_at_the_decimal_limit() {
        let snapshot = ReportSnapshot {
            running_total: Decimal::MAX,
            lines: vec![
                line(Category::Roofing, "ARDOISE", Decimal::MAX, dec!(1)),
                line(Category::Roofing, "TUILES", Decimal::MAX, dec!(1)),
            ],
            ..snapshot()
        };
        let config = ReportConfig {
            quote_validity_days: u32::MAX,
            ..ReportConfig::default()
        };

        let report = EstimateReport::build(ReportKind::Quote, &snapshot, &config);

        assert_eq!(report.total_excluding_vat, Decimal::MAX);
        assert_eq!(report.total_including_vat, Decimal::MAX);
        assert_eq!(report.categories[0].amount, Decimal::MAX);
        assert_eq!(report.categories[0].share, dec!(100));
        assert_eq!(report.quote.as_ref().map(|q| q.valid_until), Some(NaiveDate::MAX));
        assert!(report.to_string().contains("Total incl. VAT:"));
    }

    // =========================================================================
    // kinds
    // =========================================================================

    #[test]
    fn summary_has_no_breakdown() {
        let report = EstimateReport::build(ReportKind::Summary, &snapshot(), &ReportConfig::default());

        assert!(report.categories.is_empty());
        assert!(report.lines.is_empty());
        assert_eq!(report.quote, None);
    }

    #[test]
    fn detailed_breaks_down_priced_categories() {
        let report = EstimateReport::build(ReportKind::Detailed, &snapshot(), &ReportConfig::default());

        assert_eq!(
            report.categories,
            vec![
                CategoryTotal {
                    category: Category::Roofing,
                    amount: dec!(18000),
                    share: dec!(67.9),
                },
                CategoryTotal {
                    category: Category::Kitchen,
                    amount: dec!(8500),
                    share: dec!(32.1),
                },
            ]
        );
        assert_eq!(report.lines.len(), 2);
    }

    #[test]
    fn quote_header_from_snapshot() {
        let report = EstimateReport::build(ReportKind::Quote, &snapshot(), &ReportConfig::default());
        let quote = report.quote.unwrap();

        assert_eq!(quote.number, "DEV-20260314-092653");
        assert_eq!(quote.issued_on, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(quote.valid_until, NaiveDate::from_ymd_opt(2026, 4, 13).unwrap());
        assert_eq!(quote.client_name.as_deref(), Some("Camille Martin"));
        assert_eq!(quote.phone, None);
    }

    #[test]
    fn report_kind_parse() {
        assert_eq!(ReportKind::parse(" Quote "), Some(ReportKind::Quote));
        assert_eq!(ReportKind::parse("invoice"), None);
    }

    // =========================================================================
    // rendering
    // =========================================================================

    #[test]
    fn format_euros_groups_thousands() {
        assert_eq!(format_euros(dec!(26500)), "26 500,00 €");
        assert_eq!(format_euros(dec!(1234567.891)), "1 234 567,89 €");
        assert_eq!(format_euros(dec!(0)), "0,00 €");
        assert_eq!(format_euros(dec!(999.5)), "999,50 €");
    }

    #[test]
    fn rendered_quote_mentions_number_and_total() {
        let report = EstimateReport::build(ReportKind::Quote, &snapshot(), &ReportConfig::default());

        let text = report.to_string();

        assert!(text.starts_with("Quote DEV-20260314-092653"));
        assert!(text.contains("Maîtrise d'œuvre (8%):"));
        assert!(text.contains("VAT (20%):"));
        assert!(text.ends_with("34 980,00 €"));
    }
}
