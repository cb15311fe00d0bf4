use crate::routing_utils::{BasicErrorResponse, ExtraInfo, ValidationErrorSchema};
use utoipa::OpenApi;

mod task;
mod user;

pub use task::*;
pub use user::*;

/// Collects the schemas of every DTO so they can be merged into the OpenAPI document
#[derive(OpenApi)]
#[openapi(components(schemas(
    TodoUser,
    NewUser,
    InsertedUser,
    TodoTask,
    NewTask,
    UpdateTask,
    InsertedTask,
    TaskCompletion,
    BasicErrorResponse,
    ExtraInfo,
    ValidationErrorSchema,
)))]
pub struct OpenApiSchemas;
