// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::{connection_pool, run_pending_migrations, Pool};
use crate::test_utils::TEST_DATABASE_URL;

/// Create test database.
///
/// In-memory SQLite keeps its state per connection, a pool limited to one
/// connection makes sure every query sees the migrated schema.
pub async fn initialize_db() -> Pool {
    let pool = connection_pool(TEST_DATABASE_URL, 1).await.unwrap();
    run_pending_migrations(&pool).await.unwrap();

    pool
}
