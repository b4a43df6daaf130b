// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::context::Context;
use crate::db::SqlStore;

/// Test node which contains a context with an [`SqlStore`].
pub struct TestNode {
    pub context: Context<SqlStore>,
}
