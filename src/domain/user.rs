use crate::domain::user::driven_ports::InsertUserError;
use crate::domain::user::driving_ports::CreateUserError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::error;

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoUser {
    pub id: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct CreateUser {
    pub id: String,
    pub email: Option<String>,
    pub username: Option<String>,
}

pub mod driven_ports {
    use super::*;

    pub trait UserReader {
        async fn get_all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoUser>, anyhow::Error>;
        async fn get_by_id(
            &self,
            id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoUser>, anyhow::Error>;
    }

    /// Failure to store a new user. Duplicates are reported separately so a write that loses a
    /// race against another insert still surfaces as a conflict.
    #[derive(Debug, Error)]
    pub enum InsertUserError {
        #[error("a user with this ID is already stored")]
        DuplicateId,
        #[error("a user with this email is already stored")]
        DuplicateEmail,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    pub trait UserWriter {
        async fn create_user(
            &self,
            user: &CreateUser,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), InsertUserError>;
    }

    pub trait DetectUser {
        async fn user_exists(
            &self,
            user_id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;

        async fn user_with_email_exists(
            &self,
            email: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    #[derive(Debug, Error)]
    pub enum CreateUserError {
        #[error("A user with ID {0} already exists.")]
        UserAlreadyExists(String),
        #[error("The email {0} is already in use.")]
        EmailTaken(String),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    pub trait UserPort {
        async fn get_users(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Vec<TodoUser>, anyhow::Error>;
        async fn get_user(
            &self,
            user_id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Option<TodoUser>, anyhow::Error>;
        async fn create_user(
            &self,
            new_user: &CreateUser,
            ext_cxn: &mut impl ExternalConnectivity,
            u_writer: &impl driven_ports::UserWriter,
            u_detect: &impl driven_ports::DetectUser,
        ) -> Result<String, CreateUserError>;
    }

}

pub struct UserService;

#[derive(Debug, Error)]
pub(crate) enum UserExistsErr {
    #[error("user with ID {0} does not exist")]
    UserDoesNotExist(String),

    #[error(transparent)]
    PortError(#[from] anyhow::Error),
}

/// Fails with [UserExistsErr::UserDoesNotExist] unless a user with the given ID has been stored
pub(crate) async fn verify_user_exists(
    id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    user_detect: &impl driven_ports::DetectUser,
) -> Result<(), UserExistsErr> {
    let does_user_exist = user_detect.user_exists(id, ext_cxn).await?;

    if does_user_exist {
        Ok(())
    } else {
        Err(UserExistsErr::UserDoesNotExist(id.to_owned()))
    }
}

impl driving_ports::UserPort for UserService {
    async fn get_users(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Vec<TodoUser>, anyhow::Error> {
        let all_users_result = u_reader.get_all(ext_cxn).await;
        if let Err(ref port_err) = all_users_result {
            error!("User fetch failure: {port_err}");
        }

        all_users_result.context("Failed fetching users")
    }

    async fn get_user(
        &self,
        user_id: &str,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Option<TodoUser>, anyhow::Error> {
        u_reader
            .get_by_id(user_id, ext_cxn)
            .await
            .context("Fetching a single user")
    }

    async fn create_user(
        &self,
        new_user: &CreateUser,
        ext_cxn: &mut impl ExternalConnectivity,
        u_writer: &impl driven_ports::UserWriter,
        u_detect: &impl driven_ports::DetectUser,
    ) -> Result<String, CreateUserError> {
        let id_taken = u_detect
            .user_exists(&new_user.id, &mut *ext_cxn)
            .await
            .context("Looking up user ID during creation")?;
        if id_taken {
            return Err(CreateUserError::UserAlreadyExists(new_user.id.clone()));
        }

        if let Some(ref email) = new_user.email {
            let email_taken = u_detect
                .user_with_email_exists(email, &mut *ext_cxn)
                .await
                .context("Looking up user email during creation")?;
            if email_taken {
                return Err(CreateUserError::EmailTaken(email.clone()));
            }
        }

        match u_writer.create_user(new_user, &mut *ext_cxn).await {
            Ok(()) => Ok(new_user.id.clone()),
            Err(InsertUserError::DuplicateId) => {
                Err(CreateUserError::UserAlreadyExists(new_user.id.clone()))
            }
            Err(InsertUserError::DuplicateEmail) => Err(CreateUserError::EmailTaken(
                new_user.email.clone().unwrap_or_default(),
            )),
            Err(InsertUserError::PortError(err)) => Err(CreateUserError::from(
                err.context("Trying to create user at service level"),
            )),
        }
    }
}
