use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use trailbook_types::User;

use crate::db::{allocator, DbPool};

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Next free user id (scan-max, racy by design)
    pub fn next_id(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        allocator::next_id(&conn, "users", "id")
    }

    /// Get user by ID
    pub fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, password, email
             FROM users
             WHERE id = ?",
        )?;

        let user = stmt
            .query_row([user_id], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password: row.get(2)?,
                    email: row.get(3)?,
                })
            })
            .optional()?;

        Ok(user)
    }

    /// Get user by username
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, password, email
             FROM users
             WHERE username = ?",
        )?;

        let user = stmt
            .query_row([username], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password: row.get(2)?,
                    email: row.get(3)?,
                })
            })
            .optional()?;

        Ok(user)
    }

    /// Get all users
    pub fn list_all(&self) -> Result<Vec<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, password, email
             FROM users
             ORDER BY id",
        )?;

        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password: row.get(2)?,
                    email: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Insert a new user row. The unique indexes on username and email can
    /// still reject this after the pre-checks passed.
    pub fn create(&self, user: &User) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO users (id, username, password, email)
             VALUES (?, ?, ?, ?)",
            (user.id, &user.username, &user.password, &user.email),
        )
        .context("Failed to create user")?;
        Ok(())
    }

    /// Update an existing user row. Returns the number of rows affected so
    /// the caller can tell a lost update from a success.
    pub fn update(&self, user: &User) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "UPDATE users SET username = ?, password = ?, email = ? WHERE id = ?",
                (&user.username, &user.password, &user.email, user.id),
            )
            .context("Failed to update user")?;
        Ok(rows)
    }

    /// Delete a user row. Owned trips/stages/posts are left dangling; there
    /// is no cascade anywhere in the schema.
    pub fn delete(&self, user_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM users WHERE id = ?", [user_id])
            .context("Failed to delete user")?;
        Ok(rows > 0)
    }

    pub fn exists(&self, user_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?",
            [username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?",
            [email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
