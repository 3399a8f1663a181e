//! # PDF Quotation
//!
//! Renders a [`SlabSummary`] to a one-page (or longer, for many widths) PDF
//! quotation using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via placeholder replacement before compilation
//! - The optional letterhead is served to Typst from memory
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use slab_core::calculations::{estimate, Room};
//! use slab_core::pdf::render_quotation_pdf;
//! use slab_core::settings::QuotationSettings;
//!
//! let summary = estimate("Acme Builders", &[Room::new(3.0, 5.0)]).unwrap();
//! let pdf_bytes = render_quotation_pdf(&summary, &QuotationSettings::default()).unwrap();
//! std::fs::write("quotation.pdf", pdf_bytes).unwrap();
//! ```

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use tracing::{debug, warn};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::SlabSummary;
use crate::errors::{SlabError, SlabResult};
use crate::materials::{ECO_BEAM, ECO_BLOCK};
use crate::report::totals_rows;
use crate::settings::QuotationSettings;

/// Image formats Typst can embed
const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Bundled fonts, parsed once per process
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    let mut fonts = Vec::new();
    for font_bytes in typst_assets::fonts() {
        let buffer = Bytes::new(font_bytes.to_vec());
        for font in Font::iter(buffer) {
            fonts.push(font);
        }
    }
    debug!(count = fonts.len(), "loaded bundled fonts");
    fonts
});

// ============================================================================
// Branding
// ============================================================================

/// Letterhead image loaded into memory.
#[derive(Debug, Clone)]
pub struct BrandingAsset {
    /// Root-relative path the template refers to
    virtual_path: String,
    bytes: Vec<u8>,
}

impl BrandingAsset {
    /// Load a logo image. Returns `None` (with a warning) if the file is
    /// missing, unreadable, or not an image format Typst can embed.
    pub fn load(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if !LOGO_EXTENSIONS.contains(&extension.as_str()) {
            warn!(path = %path.display(), "logo is not a supported image format; continuing without it");
            return None;
        }

        match std::fs::read(path) {
            Ok(bytes) => Some(BrandingAsset {
                virtual_path: format!("branding/logo.{}", extension),
                bytes,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "logo file not found; continuing without it");
                None
            }
        }
    }
}

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world: one in-memory source plus an optional logo.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
    /// Letterhead served at its virtual path
    logo: Option<BrandingAsset>,
    /// Date reported to `datetime.today()`
    date: NaiveDate,
}

impl PdfWorld {
    fn new(source: String, logo: Option<BrandingAsset>, date: NaiveDate) -> Self {
        let fonts = FONTS.to_vec();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
            logo,
            date,
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let requested = id.vpath().as_rootless_path();
        match &self.logo {
            Some(logo) if requested == Path::new(&logo.virtual_path) => {
                Ok(Bytes::new(logo.bytes.clone()))
            }
            _ => Err(FileError::NotFound(requested.into())),
        }
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        Datetime::from_ymd(
            self.date.year(),
            u8::try_from(self.date.month()).ok()?,
            u8::try_from(self.date.day()).ok()?,
        )
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for the slab quotation
const QUOTATION_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[{{COMPANY}} Eco-Slab Quotation]],
      align(right)[#text(size: 9pt)[Page #counter(page).display()]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

{{LOGO}}

#v(10pt)
*Client:* {{CLIENT}} \
*Date:* {{DATE}}

#v(10pt)
*Supply of:*
- {{BEAM_SUPPLY}}
- {{BLOCK_SUPPLY}}

#v(10pt)

#table(
  columns: (120pt, 120pt),
  inset: 6pt,
  stroke: 0.5pt + black,
  align: center,
  fill: (x, y) => if y == 0 { luma(211) },
  table.header([*Width (m)*], [*Beams (pcs)*]),
{{BEAM_ROWS}}
)

#v(20pt)

== Summary Totals

#table(
  columns: (200pt, 200pt),
  inset: 6pt,
  stroke: 0.5pt + gray,
{{TOTAL_ROWS}}
)

#v(15pt)

{{TERMS}}

#v(10pt)
#emph[{{CLOSING}}]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render a quotation to PDF.
///
/// # Arguments
///
/// * `summary` - Estimated quantities and costs
/// * `settings` - Date, company, logo, and terms for this quotation
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(SlabError::RenderFailed)` - If Typst compilation or export fails
///
/// A missing logo is not an error. A logo Typst cannot decode is dropped
/// with a warning and the document is rendered without it.
pub fn render_quotation_pdf(summary: &SlabSummary, settings: &QuotationSettings) -> SlabResult<Vec<u8>> {
    let logo = settings.logo_path.as_deref().and_then(BrandingAsset::load);

    if logo.is_some() {
        let source = build_source(summary, settings, logo.as_ref());
        match compile_pdf(source, logo, settings.date) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                warn!(error = %e, "quotation failed to render with logo; retrying without it");
            }
        }
    }

    compile_pdf(build_source(summary, settings, None), None, settings.date)
}

/// Fill the template with quotation data.
fn build_source(summary: &SlabSummary, settings: &QuotationSettings, logo: Option<&BrandingAsset>) -> String {
    let logo_markup = match logo {
        Some(asset) => format!(
            "#image(\"/{}\", width: 100%, height: 70pt, fit: \"contain\")",
            asset.virtual_path
        ),
        None => String::new(),
    };

    fill_template(
        QUOTATION_TEMPLATE,
        &[
            ("COMPANY", escape_typst(&settings.company_name)),
            ("LOGO", logo_markup),
            ("CLIENT", escape_typst(&summary.client_name)),
            ("DATE", settings.date_string()),
            ("BEAM_SUPPLY", ECO_BEAM.supply_line()),
            ("BLOCK_SUPPLY", ECO_BLOCK.supply_line()),
            ("BEAM_ROWS", build_beam_rows(summary)),
            ("TOTAL_ROWS", build_total_rows(summary)),
            ("TERMS", build_terms(&settings.terms)),
            ("CLOSING", escape_typst(&settings.closing_line())),
        ],
    )
}

/// Substitute `{{NAME}}` placeholders in one pass. Substituted text is
/// never scanned again, so user text that looks like a placeholder stays
/// literal. Unknown placeholders are left as they are.
fn fill_template(template: &str, fields: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 1024);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let value = after.find("}}").and_then(|end| {
            let name = &after[..end];
            fields
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (value, end))
        });

        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn compile_pdf(source: String, logo: Option<BrandingAsset>, date: NaiveDate) -> SlabResult<Vec<u8>> {
    let world = PdfWorld::new(source, logo, date);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        SlabError::render_failed("typst compile", error_msgs.join("; "))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        SlabError::render_failed("pdf export", error_msgs.join("; "))
    })
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '/' => "\\/".to_string(),
            '~' => "\\~".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Width line items, one table row per width group
fn build_beam_rows(summary: &SlabSummary) -> String {
    summary
        .width_groups
        .iter()
        .map(|g| format!("  [{:.2}], [{}],", g.width.0, g.num_beams))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Totals table rows; the grand total is set bold in dark blue
fn build_total_rows(summary: &SlabSummary) -> String {
    let rows = totals_rows(summary, true);
    let last = rows.len().saturating_sub(1);
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let label = escape_typst(&row.label);
            let value = escape_typst(&row.value);
            if i == last {
                format!(
                    "  [#text(weight: \"bold\", fill: rgb(\"#00008b\"))[{}]], [#text(weight: \"bold\", fill: rgb(\"#00008b\"))[{}]],",
                    label, value
                )
            } else {
                format!("  [{}], [{}],", label, value)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_terms(terms: &[String]) -> String {
    terms
        .iter()
        .map(|t| format!("- {}", escape_typst(t)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{estimate, Room};

    fn sample_summary() -> SlabSummary {
        estimate(
            "Jane_Doe <Site #4>",
            &[Room::new(3.0, 5.0), Room::new(4.2, 3.6), Room::new(3.0, 2.05)],
        )
        .unwrap()
    }

    fn fixed_settings() -> QuotationSettings {
        QuotationSettings::default().with_date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("a*b"), "a\\*b");
        assert_eq!(escape_typst("#x [y]"), "\\#x \\[y\\]");
        assert_eq!(escape_typst("http://x"), "http:\\/\\/x");
        assert_eq!(escape_typst("plain text"), "plain text");
    }

    #[test]
    fn test_source_contains_quotation_data() {
        let summary = sample_summary();
        let source = build_source(&summary, &fixed_settings(), None);

        assert!(source.contains("Jane\\_Doe \\<Site \\#4\\>"));
        assert!(source.contains("*Date:* 2025-03-14"));
        assert!(source.contains("- Eco-beams of 150mm × 50mm"));
        assert!(source.contains("[3.00], [12],"));
        assert!(source.contains("[4.20]"));
        assert!(source.contains("Beams Cost \\@ 520:"));
        assert!(source.contains("TRANSPORT NOT INCLUDED"));
        assert!(source.contains("Thank you for choosing BIMTECH!"));
        assert!(!source.contains("{{"));
        assert!(!source.contains("#image"));
    }

    #[test]
    fn test_placeholder_text_in_client_name_stays_literal() {
        let summary = estimate("{{TERMS}} {{BEAM_ROWS}}", &[Room::new(3.0, 5.0)]).unwrap();
        let source = build_source(&summary, &fixed_settings(), None);

        assert!(source.contains("*Client:* {{TERMS}} {{BEAM_ROWS}} \\"));
        assert_eq!(source.matches("QUOTATION VALID FOR ONE MONTH").count(), 1);
        assert_eq!(source.matches("[3.00], [9],").count(), 1);
    }

    #[test]
    fn test_fill_template_leaves_unknown_placeholders() {
        let filled = fill_template(
            "{{A}}-{{B}}-{{A}} {{ }}",
            &[("A", "x{{B}}".to_string())],
        );
        assert_eq!(filled, "x{{B}}-{{B}}-x{{B}} {{ }}");
    }

    #[test]
    fn test_missing_logo_is_skipped() {
        assert!(BrandingAsset::load(Path::new("/definitely/not/here/logo.png")).is_none());
        assert!(BrandingAsset::load(Path::new("/definitely/not/here/logo.bmp")).is_none());
    }

    #[test]
    fn test_logo_served_at_virtual_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Letterhead.JPEG");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let asset = BrandingAsset::load(&path).unwrap();
        assert_eq!(asset.virtual_path, "branding/logo.jpeg");
        assert_eq!(asset.bytes.len(), 17);

        let source = build_source(&sample_summary(), &fixed_settings(), Some(&asset));
        assert!(source.contains("#image(\"/branding/logo.jpeg\""));
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_quotation_pdf(&sample_summary(), &fixed_settings());

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_pdf_generation_with_missing_logo() {
        let settings = fixed_settings().with_logo("/definitely/not/here/logo.png");
        let pdf_bytes = render_quotation_pdf(&sample_summary(), &settings).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_generation_with_undecodable_logo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"garbage").unwrap();

        let settings = fixed_settings().with_logo(&path);
        let pdf_bytes = render_quotation_pdf(&sample_summary(), &settings).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
    }
}
