use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::User;

fn map_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
    })
}

pub fn create_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> rusqlite::Result<User> {
    conn.execute(
        "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)",
        params![name, email, password_hash],
    )?;

    let id = conn.last_insert_rowid();
    debug!(user_id = id, "Created user");

    conn.query_row(
        "SELECT id, name, email, password_hash FROM users WHERE id = ?",
        [id],
        map_user,
    )
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, email, password_hash FROM users WHERE email = ?",
        [email],
        map_user,
    )
    .optional()
}

pub fn count_users(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}
