// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::user::model::User;

// endregion: --- Imports

// region:    --- SQL

const FIND_ALL_USERS: &str = "SELECT id, name, email FROM users ORDER BY id";

pub const FIND_USER_BY_ID: &str = "SELECT id, name, email FROM users WHERE id = $1";

pub const FIND_USER_BY_EMAIL: &str = "SELECT id, name, email FROM users WHERE email = $1";

// endregion: --- SQL

// region:    --- Queries

pub async fn get_users(db: &DatabaseManager) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(FIND_ALL_USERS)
        .fetch_all(db.pool())
        .await?;
    Ok(users)
}

/// Fetches a user or fails with NotFound. Doubles as the identity
/// resolution primitive used by every other component.
pub async fn find_user(db: &DatabaseManager, user_id: i64) -> AppResult<User> {
    sqlx::query_as::<_, User>(FIND_USER_BY_ID)
        .bind(user_id)
        .fetch_optional(db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found.")))
}

// endregion: --- Queries
