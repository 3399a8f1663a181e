//! # slab_core - Eco-Slab Estimation Engine
//!
//! `slab_core` turns measured room dimensions into an eco-slab material
//! takeoff (beams, blocks, breakage, weight, cost) and renders the result as
//! a text summary or a PDF quotation. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All data types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use slab_core::calculations::{estimate, Room};
//! use slab_core::report::render_text_summary;
//!
//! let summary = estimate("Acme Builders", &[Room::new(3.0, 5.0), Room::new(4.2, 3.6)]).unwrap();
//! println!("{}", render_text_summary(&summary));
//!
//! let json = serde_json::to_string_pretty(&summary).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Beam and block takeoff with costing
//! - [`materials`] - Fixed product geometry, prices, and weights
//! - [`report`] - Plain-text summary
//! - [`pdf`] - PDF quotation via Typst
//! - [`settings`] - Per-quotation settings (date, company, logo, terms)
//! - [`file_io`] - Room files and atomic quotation writes
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod pdf;
pub mod report;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, estimate, BreakagePolicy, Room, SlabInput, SlabSummary};
pub use errors::{SlabError, SlabResult};
pub use file_io::{load_rooms, quotation_file_name, save_quotation};
pub use settings::QuotationSettings;
