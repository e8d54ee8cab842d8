use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use trailbook_types::{Attraction, AttractionStage, Popularity};

use crate::db::{allocator, DbPool};

pub struct AttractionRepository {
    pool: DbPool,
}

impl AttractionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn next_id(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        allocator::next_id(&conn, "attractions", "id")
    }

    pub fn get_by_id(&self, attraction_id: i64) -> Result<Option<Attraction>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, popularity, score
             FROM attractions
             WHERE id = ?",
        )?;

        let attraction = stmt
            .query_row([attraction_id], |row| {
                Ok(Attraction {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    popularity: Popularity::parse(&row.get::<_, String>(3)?).unwrap_or_default(),
                    score: row.get(4)?,
                })
            })
            .optional()?;

        Ok(attraction)
    }

    pub fn list_all(&self) -> Result<Vec<Attraction>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, popularity, score
             FROM attractions
             ORDER BY id",
        )?;

        let attractions = stmt
            .query_map([], |row| {
                Ok(Attraction {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    popularity: Popularity::parse(&row.get::<_, String>(3)?).unwrap_or_default(),
                    score: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(attractions)
    }

    /// Attractions whose tier has been promoted to HIGH
    pub fn list_popular(&self) -> Result<Vec<Attraction>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, popularity, score
             FROM attractions
             WHERE popularity = 'HIGH'
             ORDER BY id",
        )?;

        let attractions = stmt
            .query_map([], |row| {
                Ok(Attraction {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    popularity: Popularity::parse(&row.get::<_, String>(3)?).unwrap_or_default(),
                    score: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(attractions)
    }

    pub fn create(&self, attraction: &Attraction) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO attractions (id, name, description, popularity, score)
             VALUES (?, ?, ?, ?, ?)",
            (
                attraction.id,
                &attraction.name,
                &attraction.description,
                attraction.popularity.as_str(),
                attraction.score,
            ),
        )
        .context("Failed to create attraction")?;
        Ok(())
    }

    pub fn update(&self, attraction: &Attraction) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "UPDATE attractions SET name = ?, description = ?, popularity = ?, score = ?
                 WHERE id = ?",
                (
                    &attraction.name,
                    &attraction.description,
                    attraction.popularity.as_str(),
                    attraction.score,
                    attraction.id,
                ),
            )
            .context("Failed to update attraction")?;
        Ok(rows)
    }

    pub fn delete(&self, attraction_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM attractions WHERE id = ?", [attraction_id])
            .context("Failed to delete attraction")?;
        Ok(rows > 0)
    }

    pub fn exists(&self, attraction_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM attractions WHERE id = ?",
            [attraction_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Add an attraction/stage relation. Duplicates are allowed; the
    /// relation table is a multiset.
    pub fn add_relation(&self, relation: &AttractionStage) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO attraction_stages (attraction_id, stage_id) VALUES (?, ?)",
            (relation.attraction_id, relation.stage_id),
        )
        .context("Failed to create attraction relation")?;
        Ok(())
    }

    /// Remove one matching relation row. With duplicate pairs present, each
    /// call removes a single row.
    pub fn remove_relation(&self, attraction_id: i64, stage_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "DELETE FROM attraction_stages
                 WHERE rowid IN (
                     SELECT rowid FROM attraction_stages
                     WHERE attraction_id = ? AND stage_id = ?
                     LIMIT 1
                 )",
                (attraction_id, stage_id),
            )
            .context("Failed to delete attraction relation")?;
        Ok(rows > 0)
    }

    /// All relation rows pointing at a stage, duplicates included
    pub fn relations_for_stage(&self, stage_id: i64) -> Result<Vec<AttractionStage>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT attraction_id, stage_id
             FROM attraction_stages
             WHERE stage_id = ?",
        )?;

        let relations = stmt
            .query_map([stage_id], |row| {
                Ok(AttractionStage {
                    attraction_id: row.get(0)?,
                    stage_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(relations)
    }
}
