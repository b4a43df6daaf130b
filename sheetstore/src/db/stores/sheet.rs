// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;
use sqlx::{query, query_as};

use crate::db::errors::SheetStoreError;
use crate::db::models::{SheetGroupRow, SheetRow};
use crate::db::traits::SheetStore;
use crate::db::SqlStore;
use crate::sheet::{GroupId, NewSheet, Sheet, SheetId, SheetPatch};
use crate::workbook::default_sheet_data;

/// Methods to interact with the `sheets` and `sheet_groups` tables in the
/// database.
#[async_trait]
impl SheetStore for SqlStore {
    /// Inserts a new sheet record into the database.
    ///
    /// Field defaults of the record type are resolved here, at creation time:
    /// a missing `data` payload becomes the base64-encoded empty workbook in
    /// the locale of the creating user, an empty group set becomes the
    /// built-in "internal user" group. The record and its group relations are
    /// written in one transaction, a failed insert leaves no partial state
    /// behind.
    async fn insert_sheet(&self, new_sheet: &NewSheet) -> Result<Sheet, SheetStoreError> {
        if new_sheet.name.trim().is_empty() {
            return Err(SheetStoreError::ValidationFailed(
                "'name' is required and must not be empty".into(),
            ));
        }

        if let Some(data) = &new_sheet.data {
            if data.is_empty() {
                return Err(SheetStoreError::ValidationFailed(
                    "'data' is required and must not be empty".into(),
                ));
            }
        }

        let data = match &new_sheet.data {
            Some(data) => data.clone(),
            None => default_sheet_data(&new_sheet.locale),
        };

        let group_ids = if new_sheet.group_ids.is_empty() {
            vec![GroupId::internal_user()]
        } else {
            new_sheet.group_ids.clone()
        };
        self.assert_groups_exist(&group_ids).await?;

        let id = SheetId::random();
        let sequence = new_sheet.sequence.unwrap_or(0);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        let result = query(
            "
            INSERT INTO
                sheets (
                    id,
                    name,
                    data,
                    thumbnail,
                    sequence
                )
            VALUES
                ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id.as_str())
        .bind(new_sheet.name.as_str())
        .bind(data.as_str())
        .bind(new_sheet.thumbnail.as_deref())
        .bind(sequence)
        .execute(&mut tx)
        .await
        .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        if result.rows_affected() != 1 {
            return Err(SheetStoreError::InsertionFailed("sheets".into()));
        }

        for group_id in &group_ids {
            query(
                "
                INSERT INTO
                    sheet_groups (sheet_id, group_id)
                VALUES
                    ($1, $2)
                ",
            )
            .bind(id.as_str())
            .bind(group_id.as_str())
            .execute(&mut tx)
            .await
            .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        Ok(Sheet {
            id,
            name: new_sheet.name.clone(),
            data,
            thumbnail: new_sheet.thumbnail.clone(),
            sequence,
            group_ids,
        })
    }

    /// Returns one sheet record from the database.
    async fn get_sheet(&self, id: &SheetId) -> Result<Option<Sheet>, SheetStoreError> {
        let row = query_as::<_, SheetRow>(
            "
            SELECT
                id,
                name,
                data,
                thumbnail,
                sequence
            FROM
                sheets
            WHERE
                id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        match row {
            Some(row) => {
                let group_ids = self.get_sheet_group_ids(id).await?;
                Ok(Some(row.into_sheet(group_ids)))
            }
            None => Ok(None),
        }
    }

    /// Applies a partial update to a sheet record.
    ///
    /// The update is a plain read-modify-write: concurrent writers to the
    /// same record race last-write-wins, no optimistic locking is involved.
    async fn update_sheet(
        &self,
        id: &SheetId,
        patch: &SheetPatch,
    ) -> Result<Option<Sheet>, SheetStoreError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(SheetStoreError::ValidationFailed(
                    "'name' is required and must not be empty".into(),
                ));
            }
        }

        if let Some(data) = &patch.data {
            if data.is_empty() {
                return Err(SheetStoreError::ValidationFailed(
                    "'data' is required and must not be empty".into(),
                ));
            }
        }

        let current = match self.get_sheet(id).await? {
            Some(sheet) => sheet,
            None => return Ok(None),
        };

        if let Some(group_ids) = &patch.group_ids {
            self.assert_groups_exist(group_ids).await?;
        }

        let updated = Sheet {
            id: current.id,
            name: patch.name.clone().unwrap_or(current.name),
            data: patch.data.clone().unwrap_or(current.data),
            thumbnail: patch.thumbnail.clone().or(current.thumbnail),
            sequence: patch.sequence.unwrap_or(current.sequence),
            group_ids: patch.group_ids.clone().unwrap_or(current.group_ids),
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        query(
            "
            UPDATE
                sheets
            SET
                name = $1,
                data = $2,
                thumbnail = $3,
                sequence = $4
            WHERE
                id = $5
            ",
        )
        .bind(updated.name.as_str())
        .bind(updated.data.as_str())
        .bind(updated.thumbnail.as_deref())
        .bind(updated.sequence)
        .bind(id.as_str())
        .execute(&mut tx)
        .await
        .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        if patch.group_ids.is_some() {
            query(
                "
                DELETE
                FROM
                    sheet_groups
                WHERE
                    sheet_id = $1
                ",
            )
            .bind(id.as_str())
            .execute(&mut tx)
            .await
            .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

            for group_id in &updated.group_ids {
                query(
                    "
                    INSERT INTO
                        sheet_groups (sheet_id, group_id)
                    VALUES
                        ($1, $2)
                    ",
                )
                .bind(id.as_str())
                .bind(group_id.as_str())
                .execute(&mut tx)
                .await
                .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;
            }
        }

        tx.commit()
            .await
            .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        Ok(Some(updated))
    }

    /// Removes a sheet record and its group relations from the database.
    async fn delete_sheet(&self, id: &SheetId) -> Result<bool, SheetStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        query(
            "
            DELETE
            FROM
                sheet_groups
            WHERE
                sheet_id = $1
            ",
        )
        .bind(id.as_str())
        .execute(&mut tx)
        .await
        .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        let result = query(
            "
            DELETE
            FROM
                sheets
            WHERE
                id = $1
            ",
        )
        .bind(id.as_str())
        .execute(&mut tx)
        .await
        .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        tx.commit()
            .await
            .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns all sheet records in default listing order.
    async fn list_sheets(&self) -> Result<Vec<Sheet>, SheetStoreError> {
        let rows = query_as::<_, SheetRow>(
            "
            SELECT
                id,
                name,
                data,
                thumbnail,
                sequence
            FROM
                sheets
            ORDER BY
                sequence ASC,
                id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        let relations = query_as::<_, SheetGroupRow>(
            "
            SELECT
                sheet_id,
                group_id
            FROM
                sheet_groups
            ORDER BY
                sheet_id ASC,
                group_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        let sheets = rows
            .into_iter()
            .map(|row| {
                let group_ids = relations
                    .iter()
                    .filter(|relation| relation.sheet_id == row.id)
                    .map(|relation| GroupId::from(relation.group_id.as_str()))
                    .collect();
                row.into_sheet(group_ids)
            })
            .collect();

        Ok(sheets)
    }
}

impl SqlStore {
    /// Returns the ids of all groups related to one sheet.
    async fn get_sheet_group_ids(&self, id: &SheetId) -> Result<Vec<GroupId>, SheetStoreError> {
        let relations = query_as::<_, SheetGroupRow>(
            "
            SELECT
                sheet_id,
                group_id
            FROM
                sheet_groups
            WHERE
                sheet_id = $1
            ORDER BY
                group_id ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

        Ok(relations
            .into_iter()
            .map(|relation| GroupId::from(relation.group_id.as_str()))
            .collect())
    }

    /// Fails when one of the given groups is not present in the database.
    async fn assert_groups_exist(&self, group_ids: &[GroupId]) -> Result<(), SheetStoreError> {
        for group_id in group_ids {
            let exists = self
                .group_exists(group_id)
                .await
                .map_err(|err| SheetStoreError::TransactionFailed(err.to_string()))?;

            if !exists {
                return Err(SheetStoreError::UnknownGroup(group_id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::db::errors::SheetStoreError;
    use crate::db::traits::SheetStore;
    use crate::locale::Locale;
    use crate::sheet::{Group, GroupId, NewSheet, SheetId, SheetPatch};
    use crate::test_utils::{test_runner, TestNode};
    use crate::workbook::encode_sheet_data;

    #[test]
    fn insert_generates_default_workbook_data() {
        test_runner(|node: TestNode| async move {
            let mut new_sheet = NewSheet::new("Forecast");
            new_sheet.locale = Locale::new("fr");

            let sheet = node.context.store.insert_sheet(&new_sheet).await.unwrap();

            let document: Value = serde_json::from_slice(&sheet.raw().unwrap()).unwrap();
            assert_eq!(
                document,
                json!({
                    "version": 1,
                    "sheets": [{ "id": "sheet1", "name": "Feuille1" }],
                })
            );
        });
    }

    #[test]
    fn insert_assigns_builtin_group_by_default() {
        test_runner(|node: TestNode| async move {
            let sheet = node
                .context
                .store
                .insert_sheet(&NewSheet::new("Budget"))
                .await
                .unwrap();

            assert_eq!(sheet.group_ids, vec![GroupId::internal_user()]);

            // The relation is persisted, not just echoed back
            let stored = node
                .context
                .store
                .get_sheet(&sheet.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.group_ids, vec![GroupId::internal_user()]);
        });
    }

    #[test]
    fn insert_keeps_explicit_values() {
        test_runner(|node: TestNode| async move {
            node.context
                .store
                .insert_group(&Group {
                    id: "sales".into(),
                    name: "Sales".into(),
                })
                .await
                .unwrap();

            let mut new_sheet = NewSheet::new("Pipeline");
            new_sheet.data = Some(encode_sheet_data(b"{\"version\":1,\"sheets\":[]}"));
            new_sheet.thumbnail = Some(encode_sheet_data(b"png bytes"));
            new_sheet.sequence = Some(7);
            new_sheet.group_ids = vec!["sales".into()];

            let sheet = node.context.store.insert_sheet(&new_sheet).await.unwrap();
            let stored = node
                .context
                .store
                .get_sheet(&sheet.id)
                .await
                .unwrap()
                .unwrap();

            assert_eq!(stored, sheet);
            assert_eq!(stored.sequence, 7);
            assert_eq!(stored.group_ids, vec![GroupId::from("sales")]);
            assert_eq!(stored.raw().unwrap(), b"{\"version\":1,\"sheets\":[]}");
        });
    }

    #[test]
    fn insert_validates_required_fields() {
        test_runner(|node: TestNode| async move {
            let result = node.context.store.insert_sheet(&NewSheet::new("  ")).await;
            assert!(matches!(
                result,
                Err(SheetStoreError::ValidationFailed(_))
            ));

            let mut new_sheet = NewSheet::new("Budget");
            new_sheet.data = Some("".into());
            let result = node.context.store.insert_sheet(&new_sheet).await;
            assert!(matches!(
                result,
                Err(SheetStoreError::ValidationFailed(_))
            ));
        });
    }

    #[test]
    fn insert_rejects_unknown_groups() {
        test_runner(|node: TestNode| async move {
            let mut new_sheet = NewSheet::new("Budget");
            new_sheet.group_ids = vec!["nope".into()];

            let result = node.context.store.insert_sheet(&new_sheet).await;
            assert!(matches!(result, Err(SheetStoreError::UnknownGroup(_))));

            // The failed create left nothing behind
            assert!(node.context.store.list_sheets().await.unwrap().is_empty());
        });
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        test_runner(|node: TestNode| async move {
            let result = node
                .context
                .store
                .get_sheet(&SheetId::from("missing"))
                .await
                .unwrap();
            assert!(result.is_none());
        });
    }

    #[test]
    fn update_patches_single_fields() {
        test_runner(|node: TestNode| async move {
            let sheet = node
                .context
                .store
                .insert_sheet(&NewSheet::new("Draft"))
                .await
                .unwrap();

            let mut patch = SheetPatch::default();
            patch.name = Some("Final".into());
            patch.sequence = Some(3);

            let updated = node
                .context
                .store
                .update_sheet(&sheet.id, &patch)
                .await
                .unwrap()
                .unwrap();

            assert_eq!(updated.name, "Final");
            assert_eq!(updated.sequence, 3);
            // Untouched fields keep their previous values
            assert_eq!(updated.data, sheet.data);
            assert_eq!(updated.group_ids, sheet.group_ids);
        });
    }

    #[test]
    fn raw_follows_data_across_updates() {
        test_runner(|node: TestNode| async move {
            let sheet = node
                .context
                .store
                .insert_sheet(&NewSheet::new("Budget"))
                .await
                .unwrap();

            let mut patch = SheetPatch::default();
            patch.data = Some(encode_sheet_data(b"first"));
            node.context
                .store
                .update_sheet(&sheet.id, &patch)
                .await
                .unwrap();

            let stored = node
                .context
                .store
                .get_sheet(&sheet.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.raw().unwrap(), b"first");
            assert_eq!(stored.raw().unwrap(), b"first");

            patch.data = Some(encode_sheet_data(b"second"));
            node.context
                .store
                .update_sheet(&sheet.id, &patch)
                .await
                .unwrap();

            let stored = node
                .context
                .store
                .get_sheet(&sheet.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.raw().unwrap(), b"second");
        });
    }

    #[test]
    fn invalid_payload_is_stored_as_given() {
        test_runner(|node: TestNode| async move {
            // The store does not validate editor-written payloads, the decode
            // failure is confined to the derived `raw` computation
            let mut new_sheet = NewSheet::new("Broken");
            new_sheet.data = Some("not base64!".into());

            let sheet = node.context.store.insert_sheet(&new_sheet).await.unwrap();
            let stored = node
                .context
                .store
                .get_sheet(&sheet.id)
                .await
                .unwrap()
                .unwrap();

            assert_eq!(stored.data, "not base64!");
            assert!(stored.raw().is_err());
        });
    }

    #[test]
    fn update_replaces_group_relations() {
        test_runner(|node: TestNode| async move {
            node.context
                .store
                .insert_group(&Group {
                    id: "sales".into(),
                    name: "Sales".into(),
                })
                .await
                .unwrap();

            let sheet = node
                .context
                .store
                .insert_sheet(&NewSheet::new("Pipeline"))
                .await
                .unwrap();

            let mut patch = SheetPatch::default();
            patch.group_ids = Some(vec!["sales".into()]);
            let updated = node
                .context
                .store
                .update_sheet(&sheet.id, &patch)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(updated.group_ids, vec![GroupId::from("sales")]);

            // An explicit empty set removes all relations
            patch.group_ids = Some(vec![]);
            let updated = node
                .context
                .store
                .update_sheet(&sheet.id, &patch)
                .await
                .unwrap()
                .unwrap();
            assert!(updated.group_ids.is_empty());

            let stored = node
                .context
                .store
                .get_sheet(&sheet.id)
                .await
                .unwrap()
                .unwrap();
            assert!(stored.group_ids.is_empty());
        });
    }

    #[test]
    fn update_returns_none_for_unknown_id() {
        test_runner(|node: TestNode| async move {
            let result = node
                .context
                .store
                .update_sheet(&SheetId::from("missing"), &SheetPatch::default())
                .await
                .unwrap();
            assert!(result.is_none());
        });
    }

    #[test]
    fn delete_removes_record_and_relations() {
        test_runner(|node: TestNode| async move {
            let sheet = node
                .context
                .store
                .insert_sheet(&NewSheet::new("Budget"))
                .await
                .unwrap();

            assert!(node.context.store.delete_sheet(&sheet.id).await.unwrap());
            assert!(node
                .context
                .store
                .get_sheet(&sheet.id)
                .await
                .unwrap()
                .is_none());

            // Deleting again reports that nothing was removed
            assert!(!node.context.store.delete_sheet(&sheet.id).await.unwrap());
        });
    }

    #[test]
    fn list_orders_by_sequence() {
        test_runner(|node: TestNode| async move {
            for sequence in [3, 1, 2] {
                let mut new_sheet = NewSheet::new(&format!("Sheet {}", sequence));
                new_sheet.sequence = Some(sequence);
                node.context.store.insert_sheet(&new_sheet).await.unwrap();
            }

            let sheets = node.context.store.list_sheets().await.unwrap();
            let sequences: Vec<i64> = sheets.iter().map(|sheet| sheet.sequence).collect();
            assert_eq!(sequences, vec![1, 2, 3]);
        });
    }

    #[test]
    fn list_breaks_sequence_ties_by_id() {
        test_runner(|node: TestNode| async move {
            for name in ["A", "B", "C"] {
                node.context
                    .store
                    .insert_sheet(&NewSheet::new(name))
                    .await
                    .unwrap();
            }

            let sheets = node.context.store.list_sheets().await.unwrap();
            let mut ids: Vec<_> = sheets.iter().map(|sheet| sheet.id.clone()).collect();
            let listed = ids.clone();
            ids.sort();
            assert_eq!(listed, ids);
        });
    }
}
