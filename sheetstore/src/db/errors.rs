// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::sheet::GroupId;

/// `SheetStore` errors.
#[derive(thiserror::Error, Debug)]
pub enum SheetStoreError {
    /// A required field is missing or empty at creation or update time.
    #[error("Invalid sheet: {0}")]
    ValidationFailed(String),

    /// A sheet references a permission group which does not exist.
    #[error("Unknown permission group {0}")]
    UnknownGroup(GroupId),

    /// Error which originates in the database driver.
    #[error("Transaction failed in sheet store: {0}")]
    TransactionFailed(String),

    /// Error which occurs when an insertion affects no rows.
    #[error("Error occured when inserting row into table {0}")]
    InsertionFailed(String),
}

/// `GroupStore` errors.
#[derive(thiserror::Error, Debug)]
pub enum GroupStoreError {
    /// A group with this name or id already exists.
    #[error("Group {0} already exists")]
    DuplicateGroup(GroupId),

    /// Error which originates in the database driver.
    #[error("Transaction failed in group store: {0}")]
    TransactionFailed(String),
}
