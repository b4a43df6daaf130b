// SPDX-License-Identifier: AGPL-3.0-or-later

//! Implementations of the storage methods on [`crate::db::SqlStore`].
mod group;
mod sheet;
