use super::test_util;
use crate::api::test_util::deserialize_body;
use crate::{SharedData, api, dto, persistence};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app(pool: sqlx::PgPool) -> Router {
    api::api_routes().with_state(Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
    }))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn can_create_user_and_task() {
    test_util::prepare_db_and_test(|pool| async move {
        let app = app(pool);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/users",
                json!({ "id": "user-1", "email": "first.last@example.com" }),
            ))
            .await
            .expect("request should be served");
        assert_eq!(StatusCode::CREATED, response.status());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/users",
                json!({ "id": "user-2", "email": "first.last@example.com" }),
            ))
            .await
            .expect("request should be served");
        assert_eq!(StatusCode::CONFLICT, response.status());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/users/user-1/tasks",
                json!({ "title": "Buy milk" }),
            ))
            .await
            .expect("request should be served");
        assert_eq!(StatusCode::CREATED, response.status());
        let inserted: dto::InsertedTask = deserialize_body(response.into_body()).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/users/user-1/tasks/{}/toggle", inserted.id),
                Value::Null,
            ))
            .await
            .expect("request should be served");
        assert_eq!(StatusCode::OK, response.status());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users/user-1/tasks")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should be served");
        assert_eq!(StatusCode::OK, response.status());
        let tasks: Vec<dto::TodoTask> = deserialize_body(response.into_body()).await;
        assert!(matches!(tasks.as_slice(), [
            dto::TodoTask { completed: true, title, .. }
        ] if title == "Buy milk"));
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn tasks_of_unknown_user_are_not_found() {
    test_util::prepare_db_and_test(|pool| async move {
        let response = app(pool)
            .oneshot(
                Request::builder()
                    .uri("/users/ghost/tasks")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should be served");
        assert_eq!(StatusCode::NOT_FOUND, response.status());
    });
}
