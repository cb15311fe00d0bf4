use crate::SharedData;
use axum::Router;
use std::sync::Arc;

pub mod swagger_main;
pub mod task;
pub mod user;

#[cfg(test)]
pub mod test_util;

/// Builds the router for every JSON endpoint on the server. Task routes live under
/// their owning user, so both groups share the "/users" prefix.
pub fn api_routes() -> Router<Arc<SharedData>> {
    Router::new().nest("/users", user::user_routes().merge(task::task_routes()))
}
