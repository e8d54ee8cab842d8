use anyhow::{Context, Result};

use super::DbConnection;

/// Compute the next id for a collection by scanning the current maximum.
///
/// Returns max + 1, or 1 for an empty collection. Deleted ids are never
/// reused and gaps are never filled. This is intentionally not atomic:
/// two callers racing the scan can derive the same id, and the store's
/// primary-key rejection at save time is the only backstop. Callers must
/// translate that rejection into a conflict outcome.
pub fn next_id(conn: &DbConnection, table: &str, id_column: &str) -> Result<i64> {
    let max: Option<i64> = conn
        .query_row(
            &format!("SELECT MAX({id_column}) FROM {table}"),
            [],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to scan max id of {table}"))?;

    Ok(max.map_or(1, |m| m + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use proptest::prelude::*;

    fn test_db() -> Database {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        db
    }

    #[test]
    fn empty_collection_starts_at_one() {
        let db = test_db();
        let conn = db.connection().unwrap();
        assert_eq!(next_id(&conn, "attractions", "id").unwrap(), 1);
    }

    #[test]
    fn gaps_are_not_filled() {
        let db = test_db();
        let conn = db.connection().unwrap();
        for id in [1, 3, 7] {
            conn.execute(
                "INSERT INTO attractions (id, name, description, popularity, score)
                 VALUES (?, 'a', 'b', 'LOW', 0)",
                [id],
            )
            .unwrap();
        }
        assert_eq!(next_id(&conn, "attractions", "id").unwrap(), 8);
    }

    proptest! {
        #[test]
        fn next_id_is_always_max_plus_one(ids in proptest::collection::btree_set(1i64..1000, 1..20)) {
            let db = test_db();
            let conn = db.connection().unwrap();
            for id in &ids {
                conn.execute(
                    "INSERT INTO attractions (id, name, description, popularity, score)
                     VALUES (?, 'a', 'b', 'LOW', 0)",
                    [id],
                )
                .unwrap();
            }
            let expected = ids.iter().max().unwrap() + 1;
            prop_assert_eq!(next_id(&conn, "attractions", "id").unwrap(), expected);
        }
    }
}
