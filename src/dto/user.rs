use crate::domain;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// DTO for a constructed user
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct TodoUser {
    #[schema(example = "user_2abc")]
    pub id: String,
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[schema(example = "jane")]
    pub username: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<domain::user::TodoUser> for TodoUser {
    fn from(value: domain::user::TodoUser) -> Self {
        TodoUser {
            id: value.id,
            email: value.email,
            username: value.username,
            created_at: value.created_at,
        }
    }
}

/// DTO for creating a new user via the API. The ID comes from the authentication provider.
#[derive(Deserialize, Display, Validate, ToSchema)]
#[display("{id}")]
#[cfg_attr(test, derive(Serialize))]
pub struct NewUser {
    #[validate(length(min = 1, max = 128))]
    #[schema(example = "user_2abc")]
    pub id: String,
    #[validate(email)]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    #[schema(example = "jane")]
    pub username: Option<String>,
}

impl From<NewUser> for domain::user::CreateUser {
    fn from(value: NewUser) -> Self {
        domain::user::CreateUser {
            id: value.id,
            email: value.email,
            username: value.username,
        }
    }
}

/// DTO containing the ID of a user that was created via the API.
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct InsertedUser {
    #[schema(example = "user_2abc")]
    pub id: String,
}
