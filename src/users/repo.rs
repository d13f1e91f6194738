use anyhow::Context;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::users::repo_types::{Credentials, User, UserChanges};

pub async fn list_all(conn: &mut SqliteConnection) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
        .fetch_all(&mut *conn)
        .await
        .context("list users")?;
    Ok(users)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("find user by id")?;
    Ok(user)
}

/// Case-insensitive substring match on `name`. LIKE wildcards in `fragment`
/// are matched literally.
pub async fn search_by_name(
    conn: &mut SqliteConnection,
    fragment: &str,
) -> anyhow::Result<Vec<User>> {
    let pattern = format!("%{}%", escape_like(fragment));
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email
        FROM users
        WHERE name LIKE ? ESCAPE '\'
        ORDER BY id
        "#,
    )
    .bind(pattern)
    .fetch_all(&mut *conn)
    .await
    .context("search users by name")?;
    Ok(users)
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// True when another row (not `except`) already has this name.
pub async fn name_taken(
    conn: &mut SqliteConnection,
    name: &str,
    except: Option<i64>,
) -> anyhow::Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE name = ? AND id IS NOT ?",
    )
    .bind(name)
    .bind(except)
    .fetch_one(&mut *conn)
    .await
    .context("check name uniqueness")?;
    Ok(count > 0)
}

/// True when another row (not `except`) already has this email.
pub async fn email_taken(
    conn: &mut SqliteConnection,
    email: &str,
    except: Option<i64>,
) -> anyhow::Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE email = ? AND id IS NOT ?",
    )
    .bind(email)
    .bind(except)
    .fetch_one(&mut *conn)
    .await
    .context("check email uniqueness")?;
    Ok(count > 0)
}

pub async fn exists(conn: &mut SqliteConnection, id: i64) -> anyhow::Result<bool> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .context("check user exists")?;
    Ok(count > 0)
}

/// Returns the new row id.
pub async fn insert(
    conn: &mut SqliteConnection,
    name: &str,
    password_hash: &str,
    email: Option<&str>,
) -> anyhow::Result<i64> {
    let res = sqlx::query(
        r#"
        INSERT INTO users (name, password_hash, email)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(password_hash)
    .bind(email)
    .execute(&mut *conn)
    .await
    .context("insert user")?;
    Ok(res.last_insert_rowid())
}

/// Writes only the columns set in `changes`. Returns affected rows.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    changes: &UserChanges,
) -> anyhow::Result<u64> {
    anyhow::ensure!(!changes.is_empty(), "update without columns");

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &changes.name {
        set.push("name = ").push_bind_unseparated(name.as_str());
    }
    if let Some(email) = &changes.email {
        set.push("email = ").push_bind_unseparated(email.as_deref());
    }
    if let Some(hash) = &changes.password_hash {
        set.push("password_hash = ").push_bind_unseparated(hash.as_str());
    }
    qb.push(" WHERE id = ").push_bind(id);

    let res = qb
        .build()
        .execute(&mut *conn)
        .await
        .context("update user")?;
    Ok(res.rows_affected())
}

/// Returns affected rows.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("delete user")?;
    Ok(res.rows_affected())
}

pub async fn find_credentials(
    conn: &mut SqliteConnection,
    name: &str,
) -> anyhow::Result<Option<Credentials>> {
    let row = sqlx::query_as::<_, Credentials>(
        "SELECT id, password_hash FROM users WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await
    .context("find credentials by name")?;
    Ok(row)
}
