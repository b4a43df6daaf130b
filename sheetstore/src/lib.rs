// SPDX-License-Identifier: AGPL-3.0-or-later

//! # sheetstore
//!
//! Embeddable store for "sheet" records: named, ordered, access-controlled
//! containers for serialized spreadsheet workbook documents. Provides the
//! record schema, a SQL-backed repository, the default-workbook generator and
//! a small HTTP API for spreadsheet editor frontends.
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

mod config;
mod context;
mod db;
mod http;
mod locale;
mod server;
mod sheet;
mod workbook;

#[cfg(test)]
mod test_utils;

pub use crate::config::Configuration;
pub use crate::context::Context;
pub use crate::db::errors::{GroupStoreError, SheetStoreError};
pub use crate::db::{
    connection_pool, create_database, run_pending_migrations, Pool, SheetStore, SqlStore,
};
pub use crate::http::{build_server, HttpServiceContext};
pub use crate::locale::{first_sheet_name, Locale};
pub use crate::server::SheetServer;
pub use crate::sheet::{
    Group, GroupId, NewSheet, Sheet, SheetId, SheetPatch, DEFAULT_GROUP_ID,
};
pub use crate::workbook::{
    decode_sheet_data, default_sheet_data, empty_workbook, encode_sheet_data, DecodeError,
    Workbook, WorkbookSheet, FIRST_SHEET_ID, WORKBOOK_VERSION,
};
