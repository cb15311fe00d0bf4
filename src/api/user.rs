use crate::domain::user::driven_ports::{DetectUser, UserReader, UserWriter};
use crate::domain::user::driving_ports::{CreateUserError, UserPort};
use crate::external_connections::{ExternalConnectivity, Transactable, TransactionHandle};
use crate::persistence::db_user_driven_ports::{DbDetectUser, DbReadUsers, DbWriteUsers};
use crate::routing_utils::{
    ConflictResponse, GenericErrorResponse, Json, NotFoundResponse, Path, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::get;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(get_users, get_user, create_user))]
/// Defines the OpenAPI documentation for the user API
pub struct UsersApi;

/// Builds a router for all the user routes
pub fn user_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                get_users(&mut ext_cxn, &domain::user::UserService, &DbReadUsers).await
            })
            .post(
                |State(app_state): AppState, Json(new_user): Json<dto::NewUser>| async move {
                    create_user(
                        new_user,
                        &app_state.ext_cxn,
                        &domain::user::UserService,
                        &DbWriteUsers,
                        &DbDetectUser,
                    )
                    .await
                },
            ),
        )
        .route(
            "/:user_id",
            get(
                |State(app_state): AppState, Path(user_id): Path<String>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    get_user(&user_id, &mut ext_cxn, &domain::user::UserService, &DbReadUsers)
                        .await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [dto::TodoUser]),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Retrieves a list of all the users in the system.
async fn get_users(
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_reader: &impl UserReader,
) -> Result<Json<Vec<dto::TodoUser>>, ErrorResponse> {
    info!("Requested users");
    let users = user_service
        .get_users(ext_cxn, user_reader)
        .await
        .map_err(GenericErrorResponse)?;

    Ok(Json(users.into_iter().map(dto::TodoUser::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "The user", body = dto::TodoUser),
        (status = 404, description = "No such user", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Retrieves a single user
async fn get_user(
    user_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_reader: &impl UserReader,
) -> Result<Json<dto::TodoUser>, ErrorResponse> {
    info!("Requested user {user_id}");
    let user = user_service
        .get_user(user_id, ext_cxn, user_reader)
        .await
        .map_err(GenericErrorResponse)?
        .ok_or(NotFoundResponse)?;

    Ok(Json(dto::TodoUser::from(user)))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = dto::NewUser,
    responses(
        (status = 201, description = "User created", body = dto::InsertedUser),
        (status = 400, description = "Invalid input", body = BasicErrorResponse),
        (status = 409, description = "ID or email already taken", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Creates a user. An ID or email which is already taken, even by an insert racing this one,
/// is reported as a conflict.
async fn create_user(
    new_user: dto::NewUser,
    ext_cxn: &impl Transactable,
    user_service: &impl UserPort,
    user_writer: &impl UserWriter,
    user_detect: &impl DetectUser,
) -> Result<(StatusCode, Json<dto::InsertedUser>), ErrorResponse> {
    info!("Attempt to create user: {new_user}");
    new_user.validate().map_err(ValidationErrorResponse::from)?;

    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;
    let domain_user = domain::user::CreateUser::from(new_user);
    let creation_result = user_service
        .create_user(&domain_user, &mut txn, user_writer, user_detect)
        .await;

    match creation_result {
        Ok(id) => {
            txn.commit().await.map_err(GenericErrorResponse)?;
            Ok((StatusCode::CREATED, Json(dto::InsertedUser { id })))
        }
        Err(
            conflict @ (CreateUserError::UserAlreadyExists(_) | CreateUserError::EmailTaken(_)),
        ) => {
            info!("Refused to create user: {conflict}");
            Err(ConflictResponse(conflict.to_string()).into())
        }
        Err(CreateUserError::PortError(cause)) => Err(GenericErrorResponse(cause).into()),
    }
}
