// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::{query, query_as, query_scalar};

use crate::db::errors::GroupStoreError;
use crate::db::models::GroupRow;
use crate::db::SqlStore;
use crate::sheet::{Group, GroupId};

/// Methods to interact with the `groups` table in the database.
///
/// The table always contains the built-in "internal user" group which is
/// seeded by the migrations and assigned to every sheet created without
/// explicit groups.
impl SqlStore {
    /// Inserts a new permission group into the database.
    pub async fn insert_group(&self, group: &Group) -> Result<(), GroupStoreError> {
        if self.group_exists(&group.id).await? {
            return Err(GroupStoreError::DuplicateGroup(group.id.clone()));
        }

        query(
            "
            INSERT INTO
                groups (id, name)
            VALUES
                ($1, $2)
            ",
        )
        .bind(group.id.as_str())
        .bind(group.name.as_str())
        .execute(&self.pool)
        .await
        .map_err(|err| GroupStoreError::TransactionFailed(err.to_string()))?;

        Ok(())
    }

    /// Returns one permission group from the database.
    pub async fn get_group(&self, id: &GroupId) -> Result<Option<Group>, GroupStoreError> {
        let row = query_as::<_, GroupRow>(
            "
            SELECT
                id,
                name
            FROM
                groups
            WHERE
                id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| GroupStoreError::TransactionFailed(err.to_string()))?;

        Ok(row.map(Group::from))
    }

    /// Returns all known permission groups.
    pub async fn get_groups(&self) -> Result<Vec<Group>, GroupStoreError> {
        let rows = query_as::<_, GroupRow>(
            "
            SELECT
                id,
                name
            FROM
                groups
            ORDER BY
                id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| GroupStoreError::TransactionFailed(err.to_string()))?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    /// Returns true when a group with the given id exists.
    pub(crate) async fn group_exists(&self, id: &GroupId) -> Result<bool, GroupStoreError> {
        let count: i64 = query_scalar(
            "
            SELECT
                COUNT(*)
            FROM
                groups
            WHERE
                id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| GroupStoreError::TransactionFailed(err.to_string()))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::sheet::{Group, GroupId};
    use crate::test_utils::{test_runner, TestNode};

    #[test]
    fn builtin_group_is_seeded() {
        test_runner(|node: TestNode| async move {
            let group = node
                .context
                .store
                .get_group(&GroupId::internal_user())
                .await
                .unwrap()
                .expect("Built-in group exists after migrations");

            assert_eq!(group.name, "Internal User");
        });
    }

    #[test]
    fn inserts_and_lists_groups() {
        test_runner(|node: TestNode| async move {
            let accounting = Group {
                id: "accounting".into(),
                name: "Accounting".into(),
            };
            node.context.store.insert_group(&accounting).await.unwrap();

            let groups = node.context.store.get_groups().await.unwrap();
            assert_eq!(groups.len(), 2);
            assert!(groups.contains(&accounting));
        });
    }

    #[test]
    fn rejects_duplicate_groups() {
        test_runner(|node: TestNode| async move {
            let duplicate = Group {
                id: GroupId::internal_user(),
                name: "Imposter".into(),
            };

            assert!(node.context.store.insert_group(&duplicate).await.is_err());
        });
    }
}
