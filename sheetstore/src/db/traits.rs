// SPDX-License-Identifier: AGPL-3.0-or-later

//! Narrow repository interface over sheet record storage.
use async_trait::async_trait;

use crate::db::errors::SheetStoreError;
use crate::sheet::{NewSheet, Sheet, SheetId, SheetPatch};

/// Interface onto the sheet record storage.
///
/// The SQL implementation lives in [`crate::db::SqlStore`], any other backend
/// (document store, in-memory map) can implement this trait instead. All
/// methods are single-record, request-scoped operations: transaction and
/// locking discipline beyond one call is left to the backend, concurrent
/// writers to the same record race last-write-wins.
#[async_trait]
pub trait SheetStore {
    /// Inserts a new sheet record and returns it with its assigned identity.
    ///
    /// When no `data` payload is given the default empty workbook is
    /// generated in the locale carried by `new_sheet`. When no groups are
    /// given the built-in "internal user" group is assigned.
    async fn insert_sheet(&self, new_sheet: &NewSheet) -> Result<Sheet, SheetStoreError>;

    /// Returns the sheet record with the given id.
    async fn get_sheet(&self, id: &SheetId) -> Result<Option<Sheet>, SheetStoreError>;

    /// Applies a partial update and returns the updated record, `None` when
    /// no record with this id exists.
    async fn update_sheet(
        &self,
        id: &SheetId,
        patch: &SheetPatch,
    ) -> Result<Option<Sheet>, SheetStoreError>;

    /// Deletes the sheet record, returns false when no record with this id
    /// exists.
    async fn delete_sheet(&self, id: &SheetId) -> Result<bool, SheetStoreError>;

    /// Returns all sheet records in default order: ascending `sequence`, ties
    /// broken by id.
    async fn list_sheets(&self) -> Result<Vec<Sheet>, SheetStoreError>;
}
