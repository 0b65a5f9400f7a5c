use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::UpdateUserCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountRepository;

const USER_COLUMNS: &str =
    "id, email, password, first_name, last_name, membership_number, forgot_password_token, created_at";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password: String,
    first_name: String,
    last_name: Option<String>,
    membership_number: Option<String>,
    forgot_password_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AccountError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            membership_number: row.membership_number,
            forgot_password_token: row.forgot_password_token,
            created_at: row.created_at,
        })
    }
}

fn classify(error: sqlx::Error) -> AccountError {
    if let Some(db_err) = error.as_database_error() {
        if db_err.is_unique_violation() {
            return AccountError::EmailAlreadyRegistered;
        }
    }
    AccountError::DatabaseError(error.to_string())
}

fn row_to_user(row: PgRow) -> Result<User, AccountError> {
    UserRow::from_row(&row)
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?
        .try_into()
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, user: User) -> Result<User, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password, first_name, last_name, membership_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.membership_number)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(row_to_user).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, AccountError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: &UpdateUserCommand,
    ) -> Result<Option<User>, AccountError> {
        // COALESCE leaves columns untouched for fields the command omits.
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                membership_number = COALESCE($5, membership_number),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id.0)
        .bind(command.email.as_ref().map(|email| email.as_str().to_string()))
        .bind(&command.first_name)
        .bind(&command.last_name)
        .bind(&command.membership_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        row.map(row_to_user).transpose()
    }

    async fn store_forgot_token(&self, email: &str, token: &str) -> Result<u64, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET forgot_password_token = $2, updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn redeem_forgot_token(
        &self,
        token: &str,
        new_password_digest: &str,
    ) -> Result<u64, AccountError> {
        // Single statement: the second of two concurrent redemptions matches
        // zero rows.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $2, forgot_password_token = NULL, updated_at = now()
            WHERE forgot_password_token = $1
            "#,
        )
        .bind(token)
        .bind(new_password_digest)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn update_password(
        &self,
        id: &UserId,
        current_digest: &str,
        new_digest: &str,
    ) -> Result<u64, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $3, updated_at = now()
            WHERE id = $1 AND password = $2
            "#,
        )
        .bind(id.0)
        .bind(current_digest)
        .bind(new_digest)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
