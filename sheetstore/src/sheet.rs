// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sheet records and their permission groups.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::workbook::{decode_sheet_data, DecodeError};

/// Identifier of the built-in group assigned to sheets created without
/// explicit groups.
pub const DEFAULT_GROUP_ID: &str = "internal-user";

/// Storage-assigned identity of a sheet record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SheetId(String);

impl SheetId {
    /// Returns a new random sheet id.
    ///
    /// Ids are 128 random bits in hex encoding. Listing ties on `sequence`
    /// are broken by this value, which is stable but otherwise meaningless.
    pub fn random() -> Self {
        Self(hex::encode(rand::random::<[u8; 16]>()))
    }

    /// Returns the id as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SheetId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a permission group.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Returns the id of the built-in "internal user" group.
    pub fn internal_user() -> Self {
        Self(DEFAULT_GROUP_ID.into())
    }

    /// Returns the id as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A permission group principals can be members of.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Group identifier.
    pub id: GroupId,

    /// Human-readable group name.
    pub name: String,
}

/// A stored sheet record.
///
/// The workbook payload lives in `data` as base64-encoded UTF-8 JSON. The
/// decoded bytes (the `raw` field of the original data model) are derived on
/// demand via [`Sheet::raw`] and never persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sheet {
    /// Storage-assigned identity.
    pub id: SheetId,

    /// User-visible title.
    pub name: String,

    /// Base64-encoded workbook document.
    pub data: String,

    /// Optional base64-encoded preview image, passed through unvalidated.
    pub thumbnail: Option<String>,

    /// Position in the default listing order.
    pub sequence: i64,

    /// Permission groups allowed to access this sheet.
    pub group_ids: Vec<GroupId>,
}

impl Sheet {
    /// Returns the decoded bytes of the workbook payload.
    ///
    /// Recomputed from `data` on every call, there is no caching across
    /// writes. Fails when `data` is not valid base64.
    pub fn raw(&self) -> Result<Vec<u8>, DecodeError> {
        decode_sheet_data(&self.data)
    }

    /// Returns true when a caller with the given group memberships may access
    /// this sheet.
    ///
    /// An empty `group_ids` set on the record means "no restriction": the
    /// sheet is accessible to any caller. This follows the convention of the
    /// platform family the record type comes from, where an empty
    /// many-to-many group relation disables the group check entirely.
    pub fn accessible_by(&self, caller_groups: &[GroupId]) -> bool {
        if self.group_ids.is_empty() {
            return true;
        }

        self.group_ids
            .iter()
            .any(|group_id| caller_groups.contains(group_id))
    }
}

/// Values for creating a new sheet record.
#[derive(Clone, Debug, Default)]
pub struct NewSheet {
    /// User-visible title, required and non-empty.
    pub name: String,

    /// Base64-encoded workbook document. When `None` the store generates the
    /// default empty workbook in the given locale.
    pub data: Option<String>,

    /// Optional base64-encoded preview image.
    pub thumbnail: Option<String>,

    /// Position in the default listing order, defaults to 0.
    pub sequence: Option<i64>,

    /// Permission groups, defaults to the built-in "internal user" group when
    /// left empty.
    pub group_ids: Vec<GroupId>,

    /// Locale used to translate the first sheet name of the default workbook.
    /// Resolved once at creation time, never re-translated later.
    pub locale: Locale,
}

impl NewSheet {
    /// Returns a `NewSheet` with the given title and all defaults.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial update of a sheet record. Fields set to `None` are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct SheetPatch {
    /// New title.
    pub name: Option<String>,

    /// New base64-encoded workbook document.
    pub data: Option<String>,

    /// New base64-encoded preview image.
    pub thumbnail: Option<String>,

    /// New position in the default listing order.
    pub sequence: Option<i64>,

    /// Replacement for the full set of permission groups. An explicit empty
    /// set lifts all group restrictions, see [`Sheet::accessible_by`].
    pub group_ids: Option<Vec<GroupId>>,
}
