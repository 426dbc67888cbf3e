use super::*;
use crate::constants::{content_type, header};
use crate::graphql::{GraphQlContext, HttpGraphQlRequest, HttpGraphQlResponse};
use crate::store::{MemoryStore, NewPost, Post, PostPatch, StoreError, StoreResult};
use crate::trophy::TrophyError;
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use http_body_util::BodyExt;
use serde_json::{Value, json};

const ORIGIN: &str = "http://localhost:5173";

struct StaticTrophies;

#[async_trait]
impl TrophyService for StaticTrophies {
    async fn fetch(&self, username: &str) -> Result<String, TrophyError> {
        Ok(format!("<svg>{username}</svg>"))
    }
}

struct PanickingExecutor;

#[async_trait]
impl GraphQlExecutor for PanickingExecutor {
    async fn execute(
        &self,
        _request: HttpGraphQlRequest,
        _context: GraphQlContext,
    ) -> Result<HttpGraphQlResponse, GatewayError> {
        panic!("engine state corrupted");
    }
}

struct UnavailableStore;

#[async_trait]
impl PostStore for UnavailableStore {
    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        Err(StoreError::Backend("service unavailable".into()))
    }

    async fn get_post(&self, _id: &str) -> StoreResult<Post> {
        Err(StoreError::Backend("service unavailable".into()))
    }

    async fn create_post(&self, _post: NewPost, _token: &str) -> StoreResult<Post> {
        Err(StoreError::Backend("service unavailable".into()))
    }

    async fn update_post(&self, _id: &str, _patch: PostPatch, _token: &str) -> StoreResult<Post> {
        Err(StoreError::Backend("service unavailable".into()))
    }

    async fn delete_post(&self, _id: &str, _token: &str) -> StoreResult<Post> {
        Err(StoreError::Backend("service unavailable".into()))
    }
}

fn gateway_with_store(store: Arc<dyn PostStore>) -> Gateway {
    Gateway::build(
        CorsOptions::default(),
        store,
        Arc::new(StaticTrophies),
        "https://api.joshuasevy.com",
    )
    .expect("default options are valid")
}

fn gateway() -> Gateway {
    gateway_with_store(Arc::new(MemoryStore::new()))
}

fn request(method: Method, uri: &str, body: &'static str) -> GatewayRequest {
    let mut headers = HeaderMap::new();
    headers.insert("origin", HeaderValue::from_static(ORIGIN));
    let uri: Uri = uri.parse().expect("valid uri");
    GatewayRequest::new(method, &uri, headers, Bytes::from_static(body.as_bytes()))
}

async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("readable body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn assert_cors(response: &Response) {
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        ORIGIN
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

mod build {
    use super::*;

    #[test]
    fn should_reject_invalid_cors_options() {
        // Arrange
        let options = CorsOptions {
            methods: Vec::new(),
            ..CorsOptions::default()
        };

        // Act
        let result = Gateway::build(
            options,
            Arc::new(MemoryStore::new()),
            Arc::new(StaticTrophies),
            "https://api.joshuasevy.com",
        );

        // Assert
        assert!(matches!(result, Err(GatewayError::Cors(_))));
    }
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn should_answer_preflight_with_no_content() {
        // Act
        let response = gateway()
            .dispatch(request(Method::OPTIONS, "/graphql", ""))
            .await;

        // Assert
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_cors(&response);
        assert_eq!(
            response.headers().get(header::VARY).unwrap(),
            "Origin, Access-Control-Request-Method, Access-Control-Request-Headers"
        );
    }

    #[tokio::test]
    async fn should_answer_404_and_405_with_cors() {
        // Arrange
        let gateway = gateway();

        // Act
        let missing = gateway.dispatch(request(Method::GET, "/nope", "")).await;
        let wrong = gateway.dispatch(request(Method::GET, "/graphql", "")).await;

        // Assert
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_cors(&missing);
        assert_eq!(wrong.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&wrong);
        assert_eq!(body_text(wrong).await, "Method Not Allowed");
    }

    #[tokio::test]
    async fn should_execute_graphql_posts() {
        // Arrange
        let gateway = gateway();
        let create = r#"{"query":"mutation { createPost(title: \"Hello\", content: \"World\") { id title } }"}"#;
        let list = r#"{"query":"{ posts { id title } }"}"#;
        let mut authorized = request(Method::POST, "/graphql", create);
        authorized
            .headers
            .insert("authorization", HeaderValue::from_static("Bearer user-jwt"));

        // Act
        let created = gateway.dispatch(authorized).await;
        let listed = gateway.dispatch(request(Method::POST, "/graphql", list)).await;

        // Assert
        assert_eq!(created.status(), StatusCode::OK);
        assert_eq!(listed.status(), StatusCode::OK);
        assert_cors(&listed);
        let body: Value = serde_json::from_str(&body_text(listed).await).unwrap();
        assert_eq!(
            body,
            json!({ "data": { "posts": [{ "id": "1", "title": "Hello" }] } })
        );
    }

    #[tokio::test]
    async fn should_answer_400_for_malformed_graphql_body() {
        // Act
        let response = gateway()
            .dispatch(request(Method::POST, "/graphql", "{oops"))
            .await;

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn should_turn_handler_panic_into_internal_error_with_cors() {
        // Arrange
        let gateway = Gateway::new(GatewayState {
            cors: Cors::new(CorsOptions::default()).expect("valid options"),
            executor: Arc::new(PanickingExecutor),
            store: Arc::new(MemoryStore::new()),
            sitemap: Sitemap::new("https://api.joshuasevy.com"),
        });

        // Act
        let response = gateway
            .dispatch(request(Method::POST, "/graphql", "{}"))
            .await;

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(body_text(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn should_turn_sitemap_store_failure_into_internal_error() {
        // Arrange
        let gateway = gateway_with_store(Arc::new(UnavailableStore));

        // Act
        let response = gateway.dispatch(request(Method::GET, "/sitemap", "")).await;

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            content_type::TEXT
        );
    }
}

mod reject {
    use super::*;

    #[tokio::test]
    async fn should_render_validation_envelope_with_cors() {
        // Arrange
        let gateway = gateway();
        let request = request(Method::POST, "/graphql", "");

        // Act
        let response = gateway.reject(
            &request,
            &GatewayError::Validation("unreadable request body".into()),
        );

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            body,
            json!({
                "errors": [{
                    "message": "unreadable request body",
                    "code": "VALIDATION_ERROR",
                    "statusCode": 400
                }]
            })
        );
    }

    #[tokio::test]
    async fn should_render_payload_too_large_with_cors() {
        // Arrange
        let gateway = gateway();
        let request = request(Method::POST, "/graphql", "");

        // Act
        let response = gateway.reject(
            &request,
            &GatewayError::PayloadTooLarge {
                limit: MAX_BODY_BYTES,
            },
        );

        // Assert
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_cors(&response);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["errors"][0]["statusCode"], 413);
    }
}

mod exceeds_body_limit {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn should_detect_length_limit_behind_axum_error() {
        // Arrange
        let err = axum::body::to_bytes(Body::from("0123456789"), 4)
            .await
            .expect_err("over limit");

        // Act
        let exceeded = super::super::exceeds_body_limit(&err);

        // Assert
        assert!(exceeded);
    }

    #[test]
    fn should_ignore_other_body_errors() {
        let err = axum::Error::new(std::io::Error::other("connection reset"));

        assert!(!super::super::exceeds_body_limit(&err));
    }
}

mod panic_message {
    use super::*;

    #[test]
    fn should_read_static_and_owned_payloads() {
        let borrowed: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(super::super::panic_message(borrowed.as_ref()), "static");
        assert_eq!(super::super::panic_message(owned.as_ref()), "owned");
        assert_eq!(super::super::panic_message(other.as_ref()), "unknown panic");
    }
}
