use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::{
    auth::password::verify_or_dummy,
    error::{AppError, AppResult},
    users::repo,
};

const INVALID_CREDENTIALS: &str = "Invalid name or password";

/// Returns the user id when `password` matches the stored hash for `name`.
/// Unknown name and wrong password fail identically.
pub async fn verify_credentials(
    conn: &mut SqliteConnection,
    name: &str,
    password: &str,
) -> AppResult<i64> {
    let creds = repo::find_credentials(conn, name).await?;
    let matched = verify_or_dummy(password, creds.as_ref().map(|c| c.password_hash.as_str()))?;

    let creds = match creds {
        Some(creds) if matched => creds,
        Some(creds) => {
            warn!(%name, user_id = creds.id, "login invalid password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        None => {
            warn!(%name, "login unknown name");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    info!(user_id = creds.id, "user logged in");
    Ok(creds.id)
}
