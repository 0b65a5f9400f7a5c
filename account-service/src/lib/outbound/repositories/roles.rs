use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::account::models::UserId;
use crate::domain::roles::errors::RoleStoreError;
use crate::domain::roles::models::RoleMap;
use crate::domain::roles::ports::RoleStore;

pub struct PostgresRoleStore {
    pool: PgPool,
}

impl PostgresRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(error: sqlx::Error) -> RoleStoreError {
    RoleStoreError::DatabaseError(error.to_string())
}

#[async_trait]
impl RoleStore for PostgresRoleStore {
    async fn replace_roles(
        &self,
        user_id: &UserId,
        assignment: &RoleMap,
    ) -> Result<(), RoleStoreError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        for (service_path, roles) in assignment {
            sqlx::query(
                r#"
                INSERT INTO service_roles (user_id, service_path, roles)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, service_path)
                DO UPDATE SET roles = EXCLUDED.roles, updated_at = now()
                "#,
            )
            .bind(user_id.0)
            .bind(service_path)
            .bind(roles)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        tx.commit().await.map_err(database_error)?;

        Ok(())
    }

    async fn has_all_roles(
        &self,
        user_id: &UserId,
        service_path: &str,
        required: &[String],
    ) -> Result<bool, RoleStoreError> {
        // Array containment: absent binding never matches, empty `required`
        // is vacuously contained.
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM service_roles
                WHERE user_id = $1 AND service_path = $2 AND roles @> $3
            ) AS found
            "#,
        )
        .bind(user_id.0)
        .bind(service_path)
        .bind(required)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        row.try_get("found").map_err(database_error)
    }

    async fn has_any_roles(
        &self,
        user_id: &UserId,
        service_path: &str,
        candidate: &[String],
    ) -> Result<bool, RoleStoreError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM service_roles
                WHERE user_id = $1 AND service_path = $2 AND roles && $3
            ) AS found
            "#,
        )
        .bind(user_id.0)
        .bind(service_path)
        .bind(candidate)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        row.try_get("found").map_err(database_error)
    }

    async fn list_roles(&self, user_id: &UserId) -> Result<RoleMap, RoleStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT service_path, roles FROM service_roles WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        let mut map = RoleMap::new();
        for row in rows {
            let service_path: String = row.try_get("service_path").map_err(database_error)?;
            let roles: Vec<String> = row.try_get("roles").map_err(database_error)?;
            map.insert(service_path, roles);
        }

        Ok(map)
    }
}
