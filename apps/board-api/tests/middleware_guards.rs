use axum::{Extension, Router, middleware, routing::get};
use axum_test::TestServer;
use board_api::application::authz::{AllowedRoles, is_authorized};
use board_api::application::middleware::{
    AuthenticatedUser, CurrentUser, ExpectedHost, host_checker, is_authenticated,
};
use core_lib::domain::user::{Role, UserStatus};
use http::{HeaderName, HeaderValue, StatusCode};

async fn ok() -> &'static str {
    "OK"
}

fn user_with_role(role: Role) -> CurrentUser {
    CurrentUser(AuthenticatedUser {
        user_id: 2,
        tenant_id: 1,
        name: "Arya Stark".to_string(),
        email: "arya.stark@got.com".to_string(),
        role,
        status: UserStatus::Active,
    })
}

fn server(router: Router) -> TestServer {
    TestServer::new(router).expect("Failed to create TestServer")
}

#[tokio::test]
async fn test_is_authorized_allows_role_in_set() {
    let app = Router::new()
        .route("/", get(ok))
        .route_layer(middleware::from_fn_with_state(
            AllowedRoles::new(&[Role::Administrator, Role::Member]),
            is_authorized,
        ))
        .layer(Extension(user_with_role(Role::Member)));

    let res = server(app).get("/").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text(), "OK");
}

#[tokio::test]
async fn test_is_authorized_rejects_role_outside_set() {
    let app = Router::new()
        .route("/", get(ok))
        .route_layer(middleware::from_fn_with_state(
            AllowedRoles::new(&[Role::Administrator, Role::Member]),
            is_authorized,
        ))
        .layer(Extension(user_with_role(Role::Visitor)));

    let res = server(app).get("/").await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_is_authorized_rejects_anonymous() {
    let app = Router::new().route("/", get(ok)).route_layer(middleware::from_fn_with_state(
        AllowedRoles::new(&Role::ALL),
        is_authorized,
    ));

    let res = server(app).get("/").await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_is_authenticated_with_user() {
    let app = Router::new()
        .route("/", get(ok))
        .route_layer(middleware::from_fn(is_authenticated))
        .layer(Extension(user_with_role(Role::Visitor)));

    let res = server(app).get("/").await;
    assert_eq!(res.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_is_authenticated_without_user() {
    let app = Router::new()
        .route("/", get(ok))
        .route_layer(middleware::from_fn(is_authenticated));

    let res = server(app).get("/").await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
}

fn host_checked_app() -> TestServer {
    let app = Router::new().route("/", get(ok)).route_layer(middleware::from_fn_with_state(
        ExpectedHost::new("http://login.test.example.com"),
        host_checker,
    ));
    server(app)
}

#[tokio::test]
async fn test_host_checker_same_host() {
    let res = host_checked_app()
        .get("/")
        .add_header(
            HeaderName::from_static("host"),
            HeaderValue::from_static("login.test.example.com"),
        )
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_host_checker_different_host() {
    let res = host_checked_app()
        .get("/")
        .add_header(
            HeaderName::from_static("host"),
            HeaderValue::from_static("demo.test.example.com"),
        )
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guards_compose_in_order() {
    // Host mismatch wins over a missing user
    let app = Router::new()
        .route("/", get(ok))
        .route_layer(middleware::from_fn_with_state(
            AllowedRoles::new(&[Role::Administrator]),
            is_authorized,
        ))
        .route_layer(middleware::from_fn(is_authenticated))
        .route_layer(middleware::from_fn_with_state(
            ExpectedHost::new("login.test.example.com"),
            host_checker,
        ));
    let server = server(app);

    let wrong_host = server
        .get("/")
        .add_header(HeaderName::from_static("host"), HeaderValue::from_static("evil.com"))
        .await;
    assert_eq!(wrong_host.status_code(), StatusCode::BAD_REQUEST);

    let anonymous = server
        .get("/")
        .add_header(
            HeaderName::from_static("host"),
            HeaderValue::from_static("login.test.example.com"),
        )
        .await;
    assert_eq!(anonymous.status_code(), StatusCode::FORBIDDEN);
}
