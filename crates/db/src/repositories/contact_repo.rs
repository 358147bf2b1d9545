//! Repository for the `contacts` table.

use gemeinde_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::{Contact, CreateContact, UpdateContact};

const COLUMNS: &str = "id, name, position, organization, email, phone, address, verein_id, \
                       sort_order, created_at, updated_at";

/// Provides CRUD operations for contacts.
pub struct ContactRepo;

impl ContactRepo {
    pub async fn create(pool: &PgPool, input: &CreateContact) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts
                (name, position, organization, email, phone, address, verein_id, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.name)
            .bind(&input.position)
            .bind(&input.organization)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(input.verein_id)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List contacts in directory order, optionally for one Verein.
    pub async fn list(pool: &PgPool, verein_id: Option<DbId>) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts
             WHERE ($1::bigint IS NULL OR verein_id = $1)
             ORDER BY sort_order ASC, name ASC"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(verein_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContact,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts SET
                name = COALESCE($2, name),
                position = COALESCE($3, position),
                organization = COALESCE($4, organization),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                address = COALESCE($7, address),
                verein_id = COALESCE($8, verein_id),
                sort_order = COALESCE($9, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.position)
            .bind(&input.organization)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(input.verein_id)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
