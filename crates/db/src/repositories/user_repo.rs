//! Repository for the `users` table.

use gemeinde_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User, UserAccess, UserResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role_id, custom_permissions, \
                       verein_id, is_active, last_login_at, failed_login_count, locked_until, \
                       created_at, updated_at";

/// Columns for [`UserResponse`], selected from `users u LEFT JOIN roles r`.
const RESPONSE_COLUMNS: &str = "u.id, u.username, u.email, u.role_id, r.name AS role, \
                                u.custom_permissions, u.verein_id, u.is_active, \
                                u.last_login_at, u.created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role_id, custom_permissions, verein_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .bind(&input.custom_permissions)
            .bind(input.verein_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Load a user's role name, role permissions and custom permissions.
    pub async fn find_access(pool: &PgPool, id: DbId) -> Result<Option<UserAccess>, sqlx::Error> {
        sqlx::query_as::<_, UserAccess>(
            "SELECT u.id, u.username, u.is_active, r.name AS role_name,
                    r.permissions AS role_permissions, u.custom_permissions, u.verein_id
             FROM users u
             LEFT JOIN roles r ON r.id = u.role_id
             WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Find a single user in its API representation.
    pub async fn find_response(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM users u
             LEFT JOIN roles r ON r.id = u.role_id
             WHERE u.id = $1"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all users with resolved role names, ordered by username.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM users u
             LEFT JOIN roles r ON r.id = u.role_id
             ORDER BY u.username ASC"
        );
        sqlx::query_as::<_, UserResponse>(&query).fetch_all(pool).await
    }

    /// Count all users (used to decide whether to bootstrap an admin).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                role_id = COALESCE($4, role_id),
                custom_permissions = COALESCE($5, custom_permissions),
                verein_id = CASE WHEN $6 THEN NULL ELSE COALESCE($7, verein_id) END,
                is_active = COALESCE($8, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.role_id)
            .bind(&input.custom_permissions)
            .bind(input.clear_verein)
            .bind(input.verein_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a user by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed login counter by 1, returning the new count.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let (count,): (i32,) = sqlx::query_as(
            "UPDATE users SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Lock a user account until the specified timestamp.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear `locked_until`,
    /// and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Update a user's password hash and clear any lockout.
    ///
    /// Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, failed_login_count = 0, locked_until = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
