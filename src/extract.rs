//! Request extractors that reject malformed input with the application's error
//! envelope instead of axum's plain text rejections.

use axum::extract::{FromRequest, FromRequestParts};

use crate::Error;

/// Like [axum::Json], but a body that cannot be parsed becomes
/// [Error::MalformedRequest].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Like [axum::extract::Query], but a query string that cannot be parsed
/// becomes [Error::MalformedRequest].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// Like [axum::extract::Path], but a path parameter that cannot be parsed
/// becomes [Error::MalformedRequest].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod extractor_tests {
    use axum::{Json, Router, routing::get, routing::post};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::json;

    use crate::{
        ErrorEnvelope, Reason, Status,
        extract::{ApiJson, ApiPath, ApiQuery},
    };

    #[derive(Deserialize)]
    struct Payload {
        amount: i64,
    }

    #[derive(Deserialize)]
    struct Filter {
        limit: Option<u32>,
    }

    async fn echo_amount(ApiJson(payload): ApiJson<Payload>) -> Json<i64> {
        Json(payload.amount)
    }

    async fn echo_limit(ApiQuery(filter): ApiQuery<Filter>) -> Json<Option<u32>> {
        Json(filter.limit)
    }

    async fn echo_id(ApiPath(id): ApiPath<i64>) -> Json<i64> {
        Json(id)
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route("/amount", post(echo_amount))
            .route("/limit", get(echo_limit))
            .route("/items/{id}", get(echo_id));

        TestServer::new(app)
    }

    #[track_caller]
    fn assert_malformed(envelope: &ErrorEnvelope) {
        assert_eq!(envelope.error.code, 400);
        assert_eq!(envelope.error.status, Status::InvalidArgument);
        assert_eq!(envelope.reason(), Some(Reason::ValidationError));
    }

    #[tokio::test]
    async fn valid_input_is_extracted() {
        let server = get_test_server();

        server
            .post("/amount")
            .json(&json!({"amount": 5}))
            .await
            .assert_json(&json!(5));
        server.get("/limit?limit=3").await.assert_json(&json!(3));
        server.get("/items/7").await.assert_json(&json!(7));
    }

    #[tokio::test]
    async fn invalid_json_body_is_malformed_request() {
        let server = get_test_server();

        let response = server
            .post("/amount")
            .text("{\"amount\": ")
            .content_type("application/json")
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        assert_malformed(&response.json::<ErrorEnvelope>());
    }

    #[tokio::test]
    async fn wrong_json_type_is_malformed_request() {
        let server = get_test_server();

        let response = server
            .post("/amount")
            .json(&json!({"amount": "five"}))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        assert_malformed(&response.json::<ErrorEnvelope>());
    }

    #[tokio::test]
    async fn invalid_query_is_malformed_request() {
        let server = get_test_server();

        let response = server.get("/limit?limit=many").expect_failure().await;

        response.assert_status_bad_request();
        assert_malformed(&response.json::<ErrorEnvelope>());
    }

    #[tokio::test]
    async fn invalid_path_is_malformed_request() {
        let server = get_test_server();

        let response = server.get("/items/seven").expect_failure().await;

        response.assert_status_bad_request();
        assert_malformed(&response.json::<ErrorEnvelope>());
    }
}
