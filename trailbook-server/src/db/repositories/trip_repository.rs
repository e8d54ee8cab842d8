use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use trailbook_types::Trip;

use crate::db::{allocator, DbPool};

pub struct TripRepository {
    pool: DbPool,
}

impl TripRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn next_id(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        allocator::next_id(&conn, "trips", "id")
    }

    /// Get trip by ID
    pub fn get_by_id(&self, trip_id: i64) -> Result<Option<Trip>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, creation_date
             FROM trips
             WHERE id = ?",
        )?;

        let trip = stmt
            .query_row([trip_id], |row| {
                Ok(Trip {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    creation_date: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(trip)
    }

    /// Get all trips
    pub fn list_all(&self) -> Result<Vec<Trip>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, creation_date
             FROM trips
             ORDER BY id",
        )?;

        let trips = stmt
            .query_map([], |row| {
                Ok(Trip {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    creation_date: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trips)
    }

    /// Get all trips owned by a user
    pub fn list_by_user(&self, user_id: i64) -> Result<Vec<Trip>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, creation_date
             FROM trips
             WHERE user_id = ?
             ORDER BY id",
        )?;

        let trips = stmt
            .query_map([user_id], |row| {
                Ok(Trip {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    creation_date: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trips)
    }

    pub fn create(&self, trip: &Trip) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO trips (id, user_id, title, description, creation_date)
             VALUES (?, ?, ?, ?, ?)",
            (
                trip.id,
                trip.user_id,
                &trip.title,
                &trip.description,
                trip.creation_date.to_rfc3339(),
            ),
        )
        .context("Failed to create trip")?;
        Ok(())
    }

    /// Update an existing trip. The creation date is immutable and is
    /// deliberately left out of the UPDATE.
    pub fn update(&self, trip: &Trip) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "UPDATE trips SET user_id = ?, title = ?, description = ? WHERE id = ?",
                (trip.user_id, &trip.title, &trip.description, trip.id),
            )
            .context("Failed to update trip")?;
        Ok(rows)
    }

    pub fn delete(&self, trip_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM trips WHERE id = ?", [trip_id])
            .context("Failed to delete trip")?;
        Ok(rows > 0)
    }

    pub fn exists(&self, trip_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM trips WHERE id = ?",
            [trip_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn repo() -> TripRepository {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        TripRepository::new(db.pool)
    }

    fn trip(id: i64, user_id: i64) -> Trip {
        Trip {
            id,
            user_id,
            title: "Dolomites".to_string(),
            description: "Hut to hut".to_string(),
            creation_date: Utc::now(),
        }
    }

    #[test]
    fn list_by_user_filters() {
        let repo = repo();
        repo.create(&trip(1, 1)).unwrap();
        repo.create(&trip(2, 1)).unwrap();
        repo.create(&trip(3, 2)).unwrap();

        let mine = repo.list_by_user(1).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.user_id == 1));
    }

    #[test]
    fn update_leaves_creation_date_alone() {
        let repo = repo();
        let original = trip(1, 1);
        repo.create(&original).unwrap();

        let mut changed = trip(1, 2);
        changed.title = "Renamed".to_string();
        changed.creation_date = Utc::now();
        assert_eq!(repo.update(&changed).unwrap(), 1);

        let fetched = repo.get_by_id(1).unwrap().unwrap();
        assert_eq!(fetched.title, "Renamed");
        assert_eq!(fetched.user_id, 2);
        assert_eq!(
            fetched.creation_date.to_rfc3339(),
            original.creation_date.to_rfc3339()
        );
    }

    #[test]
    fn delete_then_next_id_does_not_reuse() {
        let repo = repo();
        repo.create(&trip(1, 1)).unwrap();
        repo.create(&trip(2, 1)).unwrap();
        repo.delete(2).unwrap();
        // max is 1 again, so id 2 gets reallocated; only trailing deletes
        // free ids, earlier gaps never do
        assert_eq!(repo.next_id().unwrap(), 2);
        repo.delete(1).unwrap();
        assert_eq!(repo.next_id().unwrap(), 1);
    }
}
