// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::{on_unique_violation, AppError, AppResult};
use crate::user::model::{NewUser, User, UserPatch};
use crate::user::queries;
use tracing::info;

// endregion: --- Imports

// region:    --- SQL

const INSERT_USER: &str = "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email";

const LOCK_USER_BY_ID: &str = "SELECT id, name, email FROM users WHERE id = $1 FOR UPDATE";

const UPDATE_USER: &str =
    "UPDATE users SET name = $2, email = $3 WHERE id = $1 RETURNING id, name, email";

const DELETE_USER: &str = "DELETE FROM users WHERE id = $1";

// endregion: --- SQL

// region:    --- Commands

pub async fn add_user(db: &DatabaseManager, new_user: NewUser) -> AppResult<User> {
    info!("{:<12} --> add user: {}", "User", new_user.email);
    sqlx::query_as::<_, User>(INSERT_USER)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .fetch_one(db.pool())
        .await
        .map_err(|e| on_unique_violation(e, "User with this email already exists."))
}

/// Partial update. Blank name/email in the patch are ignored; a changed
/// email is re-checked for uniqueness inside the same transaction.
pub async fn update_user(db: &DatabaseManager, user_id: i64, patch: UserPatch) -> AppResult<User> {
    info!("{:<12} --> update user: {}", "User", user_id);
    db.transaction(|tx| {
        Box::pin(async move {
            let user = sqlx::query_as::<_, User>(LOCK_USER_BY_ID)
                .bind(user_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found.")))?;

            let name = match patch.name {
                Some(name) if !name.trim().is_empty() => name,
                _ => user.name,
            };
            let email = match patch.email {
                Some(email) if !email.trim().is_empty() => {
                    let existing = sqlx::query_as::<_, User>(queries::FIND_USER_BY_EMAIL)
                        .bind(&email)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if existing.is_some_and(|other| other.id != user_id) {
                        return Err(AppError::Conflict(format!(
                            "User with email {email} already exists."
                        )));
                    }
                    email
                }
                _ => user.email,
            };

            let updated = sqlx::query_as::<_, User>(UPDATE_USER)
                .bind(user_id)
                .bind(&name)
                .bind(&email)
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| on_unique_violation(e, "User with this email already exists."))?;
            Ok(updated)
        })
    })
    .await
}

pub async fn delete_user(db: &DatabaseManager, user_id: i64) -> AppResult<()> {
    info!("{:<12} --> delete user: {}", "User", user_id);
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, User>(LOCK_USER_BY_ID)
                .bind(user_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found.")))?;

            sqlx::query(DELETE_USER)
                .bind(user_id)
                .execute(&mut **tx)
                .await?;
            Ok(())
        })
    })
    .await
}

// endregion: --- Commands
