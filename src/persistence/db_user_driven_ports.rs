use super::Count;
use crate::domain;
use crate::domain::user::driven_ports::InsertUserError;
use crate::domain::user::{CreateUser, TodoUser};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

pub struct DbDetectUser;

impl domain::user::driven_ports::DetectUser for DbDetectUser {
    async fn user_exists(
        &self,
        user_id: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let user_with_id_count =
            query_as::<_, Count>("SELECT count(*) AS count FROM users u WHERE u.id = $1")
                .bind(user_id)
                .fetch_one(connection.borrow_connection())
                .await
                .context("Detecting user with ID")?;

        Ok(user_with_id_count.count() > 0)
    }

    async fn user_with_email_exists(
        &self,
        email: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let user_with_email_count =
            query_as::<_, Count>("SELECT count(*) AS count FROM users u WHERE u.email = $1")
                .bind(email)
                .fetch_one(connection.borrow_connection())
                .await
                .context("Detecting user via email")?;

        Ok(user_with_email_count.count() > 0)
    }
}

pub struct DbReadUsers;

/// Row shape of the `users` table. `password_hash` is never selected.
#[derive(sqlx::FromRow)]
struct TodoUserRow {
    id: String,
    email: Option<String>,
    username: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<TodoUserRow> for TodoUser {
    fn from(value: TodoUserRow) -> Self {
        TodoUser {
            id: value.id,
            email: value.email,
            username: value.username,
            created_at: value.created_at,
        }
    }
}

impl domain::user::driven_ports::UserReader for DbReadUsers {
    async fn get_all(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoUser>, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let users: Vec<TodoUser> = query_as::<_, TodoUserRow>(
            "SELECT u.id, u.email, u.username, u.created_at FROM users u \
             ORDER BY u.created_at, u.id",
        )
        .fetch_all(connection.borrow_connection())
        .await
        .context("Fetching all users")?
        .into_iter()
        .map(TodoUser::from)
        .collect();

        Ok(users)
    }

    async fn get_by_id(
        &self,
        id: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoUser>, Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let user = query_as::<_, TodoUserRow>(
            "SELECT u.id, u.email, u.username, u.created_at FROM users u WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(cxn_handle.borrow_connection())
        .await
        .context("Fetching a user by id")?;

        Ok(user.map(TodoUser::from))
    }
}

pub struct DbWriteUsers;

/// Unique constraints on `users`, named in the migration
const USERS_ID_CONSTRAINT: &str = "users_pkey";
const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

impl domain::user::driven_ports::UserWriter for DbWriteUsers {
    async fn create_user(
        &self,
        user: &CreateUser,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), InsertUserError> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let insert_result = query("INSERT INTO users(id, email, username) VALUES ($1, $2, $3)")
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.username)
            .execute(cxn_handle.borrow_connection())
            .await;

        match insert_result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some(USERS_ID_CONSTRAINT) => Err(InsertUserError::DuplicateId),
                    Some(USERS_EMAIL_CONSTRAINT) => Err(InsertUserError::DuplicateEmail),
                    _ => Err(Error::from(sqlx::Error::Database(db_err))
                        .context("Inserting new user")
                        .into()),
                }
            }
            Err(other) => Err(Error::from(other).context("Inserting new user").into()),
        }
    }
}
