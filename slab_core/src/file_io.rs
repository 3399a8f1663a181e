//! # File I/O Module
//!
//! File operations around a quotation:
//! - **Room lists**: load measured rooms from JSON
//! - **Atomic writes**: write PDF to .tmp, sync, rename so a half-written
//!   quotation never appears under its final name
//! - **File naming**: `{client}Slab_Quotation{YYYY-MM-DD}.pdf`
//!
//! ## Example
//!
//! ```rust,no_run
//! use slab_core::calculations::estimate;
//! use slab_core::file_io::{load_rooms, save_quotation};
//! use slab_core::settings::QuotationSettings;
//! use std::path::Path;
//!
//! let rooms = load_rooms(Path::new("rooms.json"))?;
//! let summary = estimate("Acme Builders", &rooms)?;
//! let path = save_quotation(&summary, &QuotationSettings::default(), &std::env::temp_dir())?;
//! println!("Quotation written to {}", path.display());
//! # Ok::<(), slab_core::errors::SlabError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::calculations::{Room, SlabSummary};
use crate::errors::{SlabError, SlabResult};
use crate::pdf::render_quotation_pdf;
use crate::settings::QuotationSettings;

/// Accepted room file layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoomFile {
    /// `[ { "width": 3.0, "length": 5.0 }, ... ]`
    Rooms(Vec<Room>),
    /// `{ "client_name": "...", "rooms": [ ... ] }`
    Job {
        #[serde(default)]
        client_name: Option<String>,
        rooms: Vec<Room>,
    },
}

/// Rooms (and optionally the client) read from a room file.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomList {
    pub client_name: Option<String>,
    pub rooms: Vec<Room>,
}

/// Build the quotation file name for a client and date.
///
/// Spaces become underscores. Path separators are replaced as well so the
/// name is always a single path component.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use slab_core::file_io::quotation_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
/// assert_eq!(
///     quotation_file_name("Acme Builders", date),
///     "Acme_BuildersSlab_Quotation2025-03-14.pdf"
/// );
/// ```
pub fn quotation_file_name(client_name: &str, date: NaiveDate) -> String {
    format!("{}Slab_Quotation{}.pdf", client_name, date.format("%Y-%m-%d"))
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            _ => c,
        })
        .collect()
}

/// Load a room list from a JSON file.
///
/// # Returns
///
/// * `Ok(RoomList)` - Rooms in file order, plus the client name if present
/// * `Err(SlabError::SerializationError)` - Invalid JSON or layout
/// * `Err(SlabError::FileError)` - I/O error
pub fn load_room_list(path: &Path) -> SlabResult<RoomList> {
    let contents = fs::read_to_string(path).map_err(|e| {
        SlabError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let parsed: RoomFile = serde_json::from_str(&contents).map_err(|e| SlabError::SerializationError {
        reason: format!("Invalid room file {}: {}", path.display(), e),
    })?;

    Ok(match parsed {
        RoomFile::Rooms(rooms) => RoomList {
            client_name: None,
            rooms,
        },
        RoomFile::Job { client_name, rooms } => RoomList { client_name, rooms },
    })
}

/// Load just the rooms from a JSON room file.
pub fn load_rooms(path: &Path) -> SlabResult<Vec<Room>> {
    load_room_list(path).map(|list| list.rooms)
}

/// Write bytes to `dir/file_name` with atomic write semantics.
///
/// The write process:
/// 1. Write to a temporary file (.tmp) next to the target
/// 2. Sync to disk (fsync)
/// 3. Rename .tmp to the final name
pub fn write_atomic(bytes: &[u8], dir: &Path, file_name: &str) -> SlabResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| {
        SlabError::file_error("create directory", dir.display().to_string(), e.to_string())
    })?;

    let path = dir.join(file_name);
    let tmp_path = dir.join(format!("{}.tmp", file_name));

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        SlabError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SlabError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SlabError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, &path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SlabError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(path)
}

/// Write rendered PDF bytes under the standard quotation file name.
pub fn write_quotation(pdf_bytes: &[u8], dir: &Path, client_name: &str, date: NaiveDate) -> SlabResult<PathBuf> {
    write_atomic(pdf_bytes, dir, &quotation_file_name(client_name, date))
}

/// Render a summary to PDF and write it into `dir`.
///
/// Returns the path of the written quotation.
pub fn save_quotation(summary: &SlabSummary, settings: &QuotationSettings, dir: &Path) -> SlabResult<PathBuf> {
    let pdf_bytes = render_quotation_pdf(summary, settings)?;
    let path = write_quotation(&pdf_bytes, dir, &summary.client_name, settings.date)?;
    info!(path = %path.display(), bytes = pdf_bytes.len(), "quotation written");
    Ok(path)
}
