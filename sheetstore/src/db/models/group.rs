// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

use crate::sheet::{Group, GroupId};

/// Representation of a row from the `groups` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    /// Group identifier.
    pub id: String,

    /// Human-readable group name.
    pub name: String,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: GroupId::from(row.id.as_str()),
            name: row.name,
        }
    }
}
