use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use trailbook_types::Post;

use crate::db::{allocator, DbPool};

pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn next_id(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        allocator::next_id(&conn, "posts", "id")
    }

    pub fn get_by_id(&self, post_id: i64) -> Result<Option<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, stage_id, trip_id, user_id, story, creation_date
             FROM posts
             WHERE id = ?",
        )?;

        let post = stmt
            .query_row([post_id], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    stage_id: row.get(1)?,
                    trip_id: row.get(2)?,
                    user_id: row.get(3)?,
                    story: row.get(4)?,
                    creation_date: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(post)
    }

    pub fn list_all(&self) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, stage_id, trip_id, user_id, story, creation_date
             FROM posts
             ORDER BY id",
        )?;

        let posts = stmt
            .query_map([], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    stage_id: row.get(1)?,
                    trip_id: row.get(2)?,
                    user_id: row.get(3)?,
                    story: row.get(4)?,
                    creation_date: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Get all posts attached to a stage
    pub fn list_by_stage(&self, stage_id: i64) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, stage_id, trip_id, user_id, story, creation_date
             FROM posts
             WHERE stage_id = ?
             ORDER BY id",
        )?;

        let posts = stmt
            .query_map([stage_id], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    stage_id: row.get(1)?,
                    trip_id: row.get(2)?,
                    user_id: row.get(3)?,
                    story: row.get(4)?,
                    creation_date: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Get all posts attached to a trip
    pub fn list_by_trip(&self, trip_id: i64) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, stage_id, trip_id, user_id, story, creation_date
             FROM posts
             WHERE trip_id = ?
             ORDER BY id",
        )?;

        let posts = stmt
            .query_map([trip_id], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    stage_id: row.get(1)?,
                    trip_id: row.get(2)?,
                    user_id: row.get(3)?,
                    story: row.get(4)?,
                    creation_date: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    pub fn create(&self, post: &Post) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (id, stage_id, trip_id, user_id, story, creation_date)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                post.id,
                post.stage_id,
                post.trip_id,
                post.user_id,
                &post.story,
                post.creation_date.to_rfc3339(),
            ),
        )
        .context("Failed to create post")?;
        Ok(())
    }

    /// Update an existing post, keeping its creation date.
    pub fn update(&self, post: &Post) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "UPDATE posts SET stage_id = ?, trip_id = ?, user_id = ?, story = ? WHERE id = ?",
                (post.stage_id, post.trip_id, post.user_id, &post.story, post.id),
            )
            .context("Failed to update post")?;
        Ok(rows)
    }

    pub fn delete(&self, post_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM posts WHERE id = ?", [post_id])
            .context("Failed to delete post")?;
        Ok(rows > 0)
    }

    pub fn exists(&self, post_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn repo() -> PostRepository {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        PostRepository::new(db.pool)
    }

    fn post(id: i64, stage_id: i64, trip_id: i64) -> Post {
        Post {
            id,
            stage_id,
            trip_id,
            user_id: 1,
            story: "Crossed the pass before the fog.".to_string(),
            creation_date: Utc::now(),
        }
    }

    #[test]
    fn stage_and_trip_filters_are_independent() {
        let repo = repo();
        repo.create(&post(1, 1, 1)).unwrap();
        repo.create(&post(2, 2, 1)).unwrap();
        repo.create(&post(3, 2, 2)).unwrap();

        assert_eq!(repo.list_by_stage(2).unwrap().len(), 2);
        assert_eq!(repo.list_by_trip(1).unwrap().len(), 2);
        assert!(repo.list_by_stage(9).unwrap().is_empty());
    }

    #[test]
    fn update_rewrites_everything_but_creation_date() {
        let repo = repo();
        let original = post(1, 1, 1);
        repo.create(&original).unwrap();

        let mut changed = post(1, 2, 2);
        changed.story = "Rewritten from the hut.".to_string();
        assert_eq!(repo.update(&changed).unwrap(), 1);

        let fetched = repo.get_by_id(1).unwrap().unwrap();
        assert_eq!(fetched.stage_id, 2);
        assert_eq!(fetched.story, "Rewritten from the hut.");
        assert_eq!(
            fetched.creation_date.to_rfc3339(),
            original.creation_date.to_rfc3339()
        );
    }
}
