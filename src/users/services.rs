use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::{
    auth::password::hash_password,
    error::{AppError, AppResult},
    users::{
        dto::{NewUser, UserUpdate},
        repo,
        repo_types::{User, UserChanges},
    },
};

const CREATE_CONFLICT: &str = "User creation failed due to data conflict.";
const UPDATE_CONFLICT: &str = "User update failed due to data conflict.";

pub async fn list_users(conn: &mut SqliteConnection) -> AppResult<Vec<User>> {
    Ok(repo::list_all(conn).await?)
}

pub async fn get_user(conn: &mut SqliteConnection, id: i64) -> AppResult<User> {
    repo::find_by_id(conn, id)
        .await?
        .ok_or_else(AppError::not_found)
}

pub async fn search_users(conn: &mut SqliteConnection, fragment: &str) -> AppResult<Vec<User>> {
    Ok(repo::search_by_name(conn, fragment).await?)
}

/// Checks name then email against rows other than `except`.
async fn ensure_unique(
    conn: &mut SqliteConnection,
    name: Option<&str>,
    email: Option<&str>,
    except: Option<i64>,
) -> AppResult<()> {
    if let Some(name) = name {
        if repo::name_taken(conn, name, except).await? {
            return Err(AppError::Conflict(format!(
                "User with name '{name}' already exists"
            )));
        }
    }
    if let Some(email) = email {
        if repo::email_taken(conn, email, except).await? {
            return Err(AppError::Conflict(format!("Email '{email}' already exists")));
        }
    }
    Ok(())
}

/// True when the storage layer refused a write on a UNIQUE constraint.
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
        )
    })
}

/// Storage uniqueness violations become `Conflict(message)`; anything else
/// stays internal.
pub fn conflict_or_internal(error: anyhow::Error, message: &str) -> AppError {
    if is_unique_violation(&error) {
        warn!(error = %error, "unique constraint hit on write");
        AppError::Conflict(message.into())
    } else {
        AppError::Internal(error)
    }
}

pub async fn create_user(conn: &mut SqliteConnection, new: NewUser) -> AppResult<i64> {
    ensure_unique(conn, Some(new.name.as_str()), new.email.as_deref(), None).await?;

    let hash = hash_password(&new.password)?;
    let id = repo::insert(conn, &new.name, &hash, new.email.as_deref())
        .await
        .map_err(|e| conflict_or_internal(e, CREATE_CONFLICT))?;
    info!(user_id = id, name = %new.name, "user created");
    Ok(id)
}

pub async fn update_user(
    conn: &mut SqliteConnection,
    id: i64,
    update: UserUpdate,
) -> AppResult<()> {
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields provided for update".into()));
    }
    if !repo::exists(conn, id).await? {
        return Err(AppError::not_found());
    }

    ensure_unique(
        conn,
        update.name.as_deref(),
        update.email.as_ref().and_then(|e| e.as_deref()),
        Some(id),
    )
    .await?;

    let changes = UserChanges {
        password_hash: update.password.as_deref().map(hash_password).transpose()?,
        name: update.name,
        email: update.email,
    };

    let affected = repo::update(conn, id, &changes)
        .await
        .map_err(|e| conflict_or_internal(e, UPDATE_CONFLICT))?;
    if affected == 0 {
        return Err(AppError::not_found());
    }
    info!(user_id = id, "user updated");
    Ok(())
}

pub async fn delete_user(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    if repo::delete(conn, id).await? == 0 {
        return Err(AppError::not_found());
    }
    info!(user_id = id, "user deleted");
    Ok(())
}
