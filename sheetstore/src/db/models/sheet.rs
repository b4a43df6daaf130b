// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

use crate::sheet::{GroupId, Sheet, SheetId};

/// Representation of a row from the `sheets` table as stored in the database.
///
/// The derived `raw` value is deliberately absent here, it is computed from
/// `data` on demand and never persisted.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// Storage-assigned identity.
    pub id: String,

    /// User-visible title.
    pub name: String,

    /// Base64-encoded workbook document.
    pub data: String,

    /// Optional base64-encoded preview image.
    pub thumbnail: Option<String>,

    /// Position in the default listing order.
    pub sequence: i64,
}

impl SheetRow {
    /// Converts the row into a domain `Sheet` with the given group relations.
    pub fn into_sheet(self, group_ids: Vec<GroupId>) -> Sheet {
        Sheet {
            id: SheetId::from(self.id.as_str()),
            name: self.name,
            data: self.data,
            thumbnail: self.thumbnail,
            sequence: self.sequence,
            group_ids,
        }
    }
}

/// Representation of a row from the `sheet_groups` relation table.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct SheetGroupRow {
    /// Id of the related sheet.
    pub sheet_id: String,

    /// Id of the related permission group.
    pub group_id: String,
}
