use axum::body::{self, Body};
use axum::response::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reads a whole response body and parses it as JSON into `T`. Panics (failing the test) if the
/// body can't be read or doesn't match `T`.
pub async fn deserialize_body<T: DeserializeOwned>(response_body: Body) -> T {
    let bytes = body::to_bytes(response_body, usize::MAX)
        .await
        .expect("response body should be readable");

    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!("response body did not match the expected shape: {err}, body: {bytes:?}")
    })
}

/// Pulls `error_code` out of a [crate::routing_utils::BasicErrorResponse] body
pub async fn error_code(response: Response) -> String {
    let body: Value = deserialize_body(response.into_body()).await;

    body["error_code"]
        .as_str()
        .unwrap_or_else(|| panic!("no error_code in error body: {body}"))
        .to_owned()
}
