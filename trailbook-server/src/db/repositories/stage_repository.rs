use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use trailbook_types::Stage;

use crate::db::{allocator, DbPool};

pub struct StageRepository {
    pool: DbPool,
}

impl StageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn next_id(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        allocator::next_id(&conn, "stages", "id")
    }

    pub fn get_by_id(&self, stage_id: i64) -> Result<Option<Stage>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, trip_id, user_id, title, description, creation_date
             FROM stages
             WHERE id = ?",
        )?;

        let stage = stmt
            .query_row([stage_id], |row| {
                Ok(Stage {
                    id: row.get(0)?,
                    trip_id: row.get(1)?,
                    user_id: row.get(2)?,
                    title: row.get(3)?,
                    description: row.get(4)?,
                    creation_date: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(stage)
    }

    pub fn list_all(&self) -> Result<Vec<Stage>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, trip_id, user_id, title, description, creation_date
             FROM stages
             ORDER BY id",
        )?;

        let stages = stmt
            .query_map([], |row| {
                Ok(Stage {
                    id: row.get(0)?,
                    trip_id: row.get(1)?,
                    user_id: row.get(2)?,
                    title: row.get(3)?,
                    description: row.get(4)?,
                    creation_date: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stages)
    }

    /// Get all stages belonging to a trip
    pub fn list_by_trip(&self, trip_id: i64) -> Result<Vec<Stage>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, trip_id, user_id, title, description, creation_date
             FROM stages
             WHERE trip_id = ?
             ORDER BY id",
        )?;

        let stages = stmt
            .query_map([trip_id], |row| {
                Ok(Stage {
                    id: row.get(0)?,
                    trip_id: row.get(1)?,
                    user_id: row.get(2)?,
                    title: row.get(3)?,
                    description: row.get(4)?,
                    creation_date: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stages)
    }

    pub fn create(&self, stage: &Stage) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO stages (id, trip_id, user_id, title, description, creation_date)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                stage.id,
                stage.trip_id,
                stage.user_id,
                &stage.title,
                &stage.description,
                stage.creation_date.to_rfc3339(),
            ),
        )
        .context("Failed to create stage")?;
        Ok(())
    }

    /// Update an existing stage, keeping its creation date.
    pub fn update(&self, stage: &Stage) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "UPDATE stages SET trip_id = ?, user_id = ?, title = ?, description = ? WHERE id = ?",
                (
                    stage.trip_id,
                    stage.user_id,
                    &stage.title,
                    &stage.description,
                    stage.id,
                ),
            )
            .context("Failed to update stage")?;
        Ok(rows)
    }

    pub fn delete(&self, stage_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM stages WHERE id = ?", [stage_id])
            .context("Failed to delete stage")?;
        Ok(rows > 0)
    }

    pub fn exists(&self, stage_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM stages WHERE id = ?",
            [stage_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn repo() -> StageRepository {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        StageRepository::new(db.pool)
    }

    fn stage(id: i64, trip_id: i64) -> Stage {
        Stage {
            id,
            trip_id,
            user_id: 1,
            title: "Val Gardena".to_string(),
            description: "First huts".to_string(),
            creation_date: Utc::now(),
        }
    }

    #[test]
    fn list_by_trip_filters() {
        let repo = repo();
        repo.create(&stage(1, 1)).unwrap();
        repo.create(&stage(2, 2)).unwrap();
        repo.create(&stage(3, 1)).unwrap();

        let stages = repo.list_by_trip(1).unwrap();
        assert_eq!(
            stages.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn exists_tracks_create_and_delete() {
        let repo = repo();
        assert!(!repo.exists(1).unwrap());
        repo.create(&stage(1, 1)).unwrap();
        assert!(repo.exists(1).unwrap());
        repo.delete(1).unwrap();
        assert!(!repo.exists(1).unwrap());
    }
}
