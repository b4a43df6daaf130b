// SPDX-License-Identifier: AGPL-3.0-or-later

//! Workbook document payloads.
//!
//! A sheet record stores its workbook as base64-encoded UTF-8 JSON. Only the
//! _default_ document generated here is guaranteed to follow the documented
//! shape, anything written later by a spreadsheet editor is passed through
//! unvalidated.
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::locale::{first_sheet_name, Locale};

/// Version of the workbook document format written by this crate.
pub const WORKBOOK_VERSION: u32 = 1;

/// Identifier of the first sheet in every new workbook.
///
/// The identifier is the same fixed literal for all users and locales so that
/// cross-sheet formula references stay structurally consistent, only the
/// display name is translated.
pub const FIRST_SHEET_ID: &str = "sheet1";

/// Top-level workbook document, a versioned and ordered list of sheets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workbook {
    /// Document format version.
    pub version: u32,

    /// Sheets in display order.
    pub sheets: Vec<WorkbookSheet>,
}

/// One page within a workbook document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkbookSheet {
    /// Stable sheet identifier used by formula references.
    pub id: String,

    /// User-visible sheet name.
    pub name: String,
}

/// Error raised when the stored payload of a sheet can not be decoded.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// The `data` field does not contain valid base64.
    #[error("Sheet data is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Returns an empty workbook with one sheet named in the given locale.
///
/// This is a pure function, the only input deciding the result is the locale
/// of the user creating the sheet record.
pub fn empty_workbook(locale: &Locale) -> Workbook {
    Workbook {
        version: WORKBOOK_VERSION,
        sheets: vec![WorkbookSheet {
            id: FIRST_SHEET_ID.into(),
            name: first_sheet_name(locale).into(),
        }],
    }
}

/// Returns the default `data` payload of a new sheet record, the empty
/// workbook serialized to JSON and base64-encoded.
pub fn default_sheet_data(locale: &Locale) -> String {
    let json = serde_json::to_string(&empty_workbook(locale))
        .expect("Default workbook serializes to JSON");
    BASE64.encode(json)
}

/// Decodes the stored `data` payload of a sheet record into raw bytes.
///
/// This is the computation behind the derived `raw` field: pure, evaluated on
/// demand and never persisted. Invalid base64 surfaces as a [`DecodeError`],
/// the stored `data` value itself is left untouched.
pub fn decode_sheet_data(data: &str) -> Result<Vec<u8>, DecodeError> {
    let raw = BASE64.decode(data)?;
    Ok(raw)
}

/// Encodes raw workbook bytes into the stored `data` representation.
pub fn encode_sheet_data(raw: &[u8]) -> String {
    BASE64.encode(raw)
}
