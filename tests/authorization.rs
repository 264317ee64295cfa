//! Router-level tests: bearer token → identity → role checks on `/api/v1/*`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use resource_server::{
    app::build_router,
    config::Config,
    services::auth::{Claims, TokenVerifier, access_jwt::AccessJwtError, build_token_verifier},
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const ISSUER: &str = "http://localhost:8080/realms/demo";
const SECRET: &str = "integration-test-secret-0123456789";
const RESOURCE_ID: &str = "demo-rest-api";

fn config(principal_attribute: Option<&str>) -> Config {
    let mut vars = HashMap::from([
        ("AUTH_ISSUER", ISSUER.to_string()),
        ("ACCESS_JWT_HMAC_SECRET", SECRET.to_string()),
        ("JWT_AUTH_CONVERTER_RESOURCE_ID", RESOURCE_ID.to_string()),
    ]);
    if let Some(attr) = principal_attribute {
        vars.insert("JWT_AUTH_CONVERTER_PRINCIPAL_ATTRIBUTE", attr.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Token string → claims. Anything else fails verification.
struct StubVerifier(HashMap<&'static str, Value>);

impl TokenVerifier for StubVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AccessJwtError> {
        match self.0.get(token) {
            Some(claims) => Ok(Claims::try_from(claims.clone()).unwrap()),
            None => Err(AccessJwtError::Jwt(
                jsonwebtoken::errors::ErrorKind::InvalidSignature.into(),
            )),
        }
    }
}

fn stub_app() -> Router {
    let verifier = StubVerifier(HashMap::from([
        (
            "user",
            json!({
                "sub": "1", "preferred_username": "bob", "jti": "t-1",
                "resource_access": {RESOURCE_ID: {"roles": ["role_user"]}}
            }),
        ),
        (
            "admin",
            json!({
                "sub": "2", "preferred_username": "alice", "scope": "openid profile",
                "resource_access": {RESOURCE_ID: {"roles": ["role_admin", "role_admin"]}}
            }),
        ),
        (
            "other-client",
            json!({
                "sub": "3", "preferred_username": "carol",
                "resource_access": {"account": {"roles": ["role_admin"]}}
            }),
        ),
        (
            "no-principal",
            json!({"sub": "5", "resource_access": {RESOURCE_ID: {"roles": ["role_admin"]}}}),
        ),
        (
            "malformed",
            json!({"sub": "4", "resource_access": {RESOURCE_ID: {"roles": "role_admin"}}}),
        ),
    ]));

    let config = config(Some("preferred_username"));
    let state = AppState::new(Arc::new(verifier), config.claim_mapping.clone());
    build_router(state, &config)
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Option<String>, String) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let res = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
    let status = res.status();
    let challenge = res
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();

    (status, challenge, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn health_is_public() {
    let (status, _, body) = send(stub_app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ok"));
}

#[tokio::test]
async fn missing_token_is_unauthenticated() {
    let (status, challenge, _) = send(stub_app(), Method::GET, "/api/v1/users", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some("Bearer"));
}

#[tokio::test]
async fn unverifiable_token_is_invalid() {
    let (status, challenge, _) =
        send(stub_app(), Method::GET, "/api/v1/users", Some("forged")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some(r#"Bearer error="invalid_token""#));
}

#[tokio::test]
async fn user_role_can_list_but_not_post() {
    let (status, _, body) = send(stub_app(), Method::GET, "/api/v1/users", Some("user")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "List of users");

    let (status, challenge, _) =
        send(stub_app(), Method::POST, "/api/v1/users", Some("user")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        challenge.as_deref(),
        Some(r#"Bearer error="insufficient_scope""#)
    );
}

#[tokio::test]
async fn admin_role_can_do_both() {
    let (status, _, body) = send(stub_app(), Method::GET, "/api/v1/users", Some("admin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "List of users");

    let (status, _, body) = send(stub_app(), Method::POST, "/api/v1/users", Some("admin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "List of admin users");
}

#[tokio::test]
async fn roles_of_other_clients_are_ignored() {
    let (status, _, _) =
        send(stub_app(), Method::GET, "/api/v1/users", Some("other-client")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn me_reports_principal_and_sorted_authorities() {
    let (status, _, body) = send(stub_app(), Method::GET, "/api/v1/me", Some("admin")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"principal": "alice", "authorities": ["ROLE_role_admin", "openid", "profile"]})
    );
}

#[tokio::test]
async fn token_without_principal_is_invalid() {
    // principal-attribute is `preferred_username`; `sub` alone is not enough
    let (status, challenge, _) =
        send(stub_app(), Method::GET, "/api/v1/users", Some("no-principal")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some(r#"Bearer error="invalid_token""#));
}

#[tokio::test]
async fn malformed_resource_access_is_surfaced() {
    let (status, _, body) = send(stub_app(), Method::GET, "/api/v1/users", Some("malformed")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("INTERNAL_SERVER_ERROR"));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let res = stub_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"], "req-42");
    assert_eq!(res.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(res.headers()[header::X_FRAME_OPTIONS], "DENY");
}

fn sign(claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn jwt_app(principal_attribute: Option<&str>) -> Router {
    let config = config(principal_attribute);
    let verifier = build_token_verifier(&config).unwrap();
    build_router(AppState::new(verifier, config.claim_mapping.clone()), &config)
}

#[tokio::test]
async fn signed_token_flows_end_to_end() {
    let token = sign(json!({
        "iss": ISSUER,
        "sub": "123",
        "preferred_username": "alice",
        "exp": 4_102_444_800u64,
        "scope": "read write",
        "resource_access": {RESOURCE_ID: {"roles": ["role_admin"]}}
    }));

    let (status, _, body) = send(jwt_app(None), Method::GET, "/api/v1/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["principal"], "123");
    assert_eq!(body["authorities"], json!(["ROLE_role_admin", "read", "write"]));

    let (status, _, body) = send(
        jwt_app(Some("preferred_username")),
        Method::POST,
        "/api/v1/users",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "List of admin users");
}

#[tokio::test]
async fn expired_signed_token_is_rejected() {
    let token = sign(json!({"iss": ISSUER, "sub": "123", "exp": 1_000}));

    let (status, challenge, _) = send(jwt_app(None), Method::GET, "/api/v1/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some(r#"Bearer error="invalid_token""#));
}
