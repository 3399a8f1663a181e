//! # Text Summary
//!
//! Plain-text rendering of a [`SlabSummary`] for terminal display. The same
//! totals rows feed the PDF quotation so both documents always agree.

use std::fmt::Write;

use crate::calculations::SlabSummary;
use crate::materials::{BREAKAGE_RATE, ECO_BEAM, ECO_BLOCK};
use crate::units::format_grouped;

/// A label/value pair in the totals table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsRow {
    pub label: String,
    pub value: String,
}

impl TotalsRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        TotalsRow {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Totals rows in quotation order. The grand total is always last.
///
/// With `show_unit_prices` the cost labels carry the unit price
/// ("Beams Cost @ 520:"), as on the printed quotation.
pub fn totals_rows(summary: &SlabSummary, show_unit_prices: bool) -> Vec<TotalsRow> {
    let (beam_label, block_label) = if show_unit_prices {
        (
            format!("Beams Cost {}:", ECO_BEAM.price_tag()),
            format!("Blocks Cost {}:", ECO_BLOCK.price_tag()),
        )
    } else {
        ("Beams Cost:".to_string(), "Blocks Cost:".to_string())
    };

    vec![
        TotalsRow::new(
            "Total Beams:",
            format!(
                "{} pcs ({:.2} m)",
                summary.total_num_beams, summary.total_beam_length.0
            ),
        ),
        TotalsRow::new(
            "Total Blocks:",
            format!(
                "{} pcs (incl. {:.0}% breakage)",
                summary.total_blocks,
                BREAKAGE_RATE * 100.0
            ),
        ),
        TotalsRow::new(
            "Total Area:",
            format!("{} m²", format_grouped(summary.total_area.0, 2)),
        ),
        TotalsRow::new(
            "Total Weight:",
            format!("{:.2} tonnes", summary.total_weight.0),
        ),
        TotalsRow::new(beam_label, summary.total_beam_cost.to_string()),
        TotalsRow::new(block_label, summary.total_block_cost.to_string()),
        TotalsRow::new("Grand Total:", summary.grand_total.to_string()),
    ]
}

/// Render the beams-per-width table and the summary totals as text.
pub fn render_text_summary(summary: &SlabSummary) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Client: {}", summary.client_name);
    let _ = writeln!(out, "Breakage: {}", summary.breakage_policy.display_name());
    let _ = writeln!(out);
    let _ = writeln!(out, "{:>10}  {:>11}", "Width (m)", "Beams (pcs)");
    for group in &summary.width_groups {
        let _ = writeln!(out, "{:>10.2}  {:>11}", group.width.0, group.num_beams);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Summary Totals");

    let rows = totals_rows(summary, false);
    let label_width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    for row in &rows {
        let _ = writeln!(out, "{:<width$} {}", row.label, row.value, width = label_width);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{estimate, Room};

    fn sample() -> SlabSummary {
        estimate("Acme Builders", &[Room::new(3.0, 5.0), Room::new(2.0, 2.7)]).unwrap()
    }

    #[test]
    fn test_totals_rows() {
        let summary = estimate("Acme", &[Room::new(3.0, 5.0)]).unwrap();
        let rows = totals_rows(&summary, true);

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].value, "9 pcs (27.00 m)");
        assert_eq!(rows[1].value, "132 pcs (incl. 10% breakage)");
        assert_eq!(rows[2].value, "15.00 m²");
        assert_eq!(rows[3].value, "2.45 tonnes");
        assert_eq!(rows[4].label, "Beams Cost @ 520:");
        assert_eq!(rows[4].value, "KSh 14,040.00");
        assert_eq!(rows[5].label, "Blocks Cost @ 90:");
        assert_eq!(rows[5].value, "KSh 11,880.00");
        assert_eq!(rows[6].label, "Grand Total:");
        assert_eq!(rows[6].value, "KSh 25,920.00");
    }

    #[test]
    fn test_text_summary_lists_every_width() {
        let text = render_text_summary(&sample());
        assert!(text.starts_with("Client: Acme Builders"));
        assert!(text.contains("3.00"));
        assert!(text.contains("2.00"));
        assert!(text.contains("Breakage: running total\n"));
        assert!(text.contains("Summary Totals"));
        assert!(text.contains("Grand Total:"));
        assert!(!text.contains("@ 520"));
    }

    #[test]
    fn test_text_summary_matches_totals() {
        let summary = sample();
        let text = render_text_summary(&summary);
        for row in totals_rows(&summary, false) {
            assert!(text.contains(&row.value), "missing {}", row.value);
        }
    }
}
