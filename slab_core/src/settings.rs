//! # Quotation Settings
//!
//! Request-scoped settings for rendering a quotation: who is quoting, the
//! quotation date, optional branding, and the boilerplate terms printed at
//! the foot of the document. Nothing here is process-wide; callers build a
//! `QuotationSettings` per request and pass it explicitly.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slab_core::settings::QuotationSettings;
//!
//! let settings = QuotationSettings::default()
//!     .with_date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
//!     .with_logo("assets/logo.jpeg");
//!
//! assert_eq!(settings.date_string(), "2025-03-14");
//! let json = serde_json::to_string_pretty(&settings).unwrap();
//! assert!(json.contains("BIMTECH"));
//! ```

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Company the quotations are issued by
pub const DEFAULT_COMPANY: &str = "BIMTECH";

/// Settings for one quotation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationSettings {
    /// Issuing company, named in the closing line
    pub company_name: String,

    /// Letterhead image; rendering continues without it if absent
    #[serde(default)]
    pub logo_path: Option<PathBuf>,

    /// Quotation date (printed in the header and the file name)
    pub date: NaiveDate,

    /// Terms printed below the totals
    pub terms: Vec<String>,
}

impl QuotationSettings {
    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = company_name.into();
        self
    }

    /// Date as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// "Thank you for choosing BIMTECH! We value your business."
    pub fn closing_line(&self) -> String {
        format!("Thank you for choosing {}! We value your business.", self.company_name)
    }
}

impl Default for QuotationSettings {
    fn default() -> Self {
        QuotationSettings {
            company_name: DEFAULT_COMPANY.to_string(),
            logo_path: None,
            date: Local::now().date_naive(),
            terms: default_terms(),
        }
    }
}

/// Standard terms: payment, recommended reinforcement, exclusions, validity.
pub fn default_terms() -> Vec<String> {
    [
        "PAYMENT: Equity Bank ACC...",
        "RECOMMENDED: BRC A142/98 & CONCRETE CLASS 25",
        "TRANSPORT NOT INCLUDED",
        "WE PROVIDE ONE TECHNICIAN FOR SUPERVISION",
        "QUOTATION VALID FOR ONE MONTH",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = QuotationSettings::default();
        assert_eq!(settings.company_name, "BIMTECH");
        assert!(settings.logo_path.is_none());
        assert_eq!(settings.terms.len(), 5);
        assert!(settings.terms.last().unwrap().contains("VALID FOR ONE MONTH"));
    }

    #[test]
    fn test_date_string() {
        let settings = QuotationSettings::default()
            .with_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(settings.date_string(), "2024-01-05");
    }

    #[test]
    fn test_closing_line() {
        let settings = QuotationSettings::default().with_company("Acme Slabs");
        assert_eq!(
            settings.closing_line(),
            "Thank you for choosing Acme Slabs! We value your business."
        );
    }

    #[test]
    fn test_settings_serialization() {
        let settings = QuotationSettings::default()
            .with_date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
            .with_logo("/srv/branding/logo.png");
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("2025-06-30"));

        let roundtrip: QuotationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, settings);
    }
}
