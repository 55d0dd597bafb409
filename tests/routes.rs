use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use plant_care::{
    db::entities::{house, house_room, user},
    test_helpers::{bearer, empty_router, house_model, test_router, user_model},
};

async fn json_response(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn authed(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(Uuid::new_v4()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (status, json) = json_response(empty_router(), get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], 200);
    assert_eq!(json["data"]["ok"], true);
}

#[tokio::test]
async fn protected_route_without_header_is_401() {
    let (status, json) = json_response(empty_router(), get("/api/v1/houses")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "No header provided");
    assert_eq!(json["data"], Value::Null);
}

#[tokio::test]
async fn scheme_without_token_is_401() {
    let request = Request::builder()
        .uri("/api/v1/plants")
        .header(header::AUTHORIZATION, "Bearer")
        .body(Body::empty())
        .unwrap();

    let (status, json) = json_response(empty_router(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "No token provided");
}

#[tokio::test]
async fn forged_token_is_403() {
    let request = Request::builder()
        .uri("/api/v1/users/profile")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();

    let (status, json) = json_response(empty_router(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Failed to authenticate token");
}

#[tokio::test]
async fn unknown_house_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<house::Model>::new()])
        .into_connection();
    let uri = format!("/api/v1/houses/{}", Uuid::new_v4());

    let (status, json) = json_response(test_router(db), authed("GET", &uri, Value::Null)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "House not found");
}

#[tokio::test]
async fn house_comes_back_with_its_rooms() {
    let id = Uuid::new_v4();
    let room = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[house_model(id)]])
        .append_query_results([[house_room::Model {
            house_id: id,
            room_id: room,
            linked_at: plant_care::test_helpers::fixed_ts(),
        }]])
        .into_connection();
    let uri = format!("/api/v1/houses/{id}");

    let (status, json) = json_response(test_router(db), authed("GET", &uri, Value::Null)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Cabin");
    assert_eq!(json["data"]["rooms"], json!([room.to_string()]));
}

#[tokio::test]
async fn malformed_id_is_400() {
    let (status, json) =
        json_response(empty_router(), authed("GET", "/api/v1/rooms/not-a-uuid", Value::Null))
            .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn unknown_patch_field_is_400() {
    let uri = format!("/api/v1/houses/{}", Uuid::new_v4());
    let body = json!({ "name": "Cottage", "owner": "someone-else" });

    let (status, json) = json_response(empty_router(), authed("PUT", &uri, body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["data"], Value::Null);
}

#[tokio::test]
async fn incomplete_house_is_400() {
    let body = json!({ "name": "Cabin" });

    let (status, json) =
        json_response(empty_router(), authed("POST", "/api/v1/houses", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Name and location are required");
}

#[tokio::test]
async fn register_without_password_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": "fern@example.com" }).to_string()))
        .unwrap();

    let (status, json) = json_response(empty_router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn register_creates_user() {
    let stored = user_model(Uuid::new_v4(), "fern@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([[stored.clone()]])
        .into_connection();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "Fern@Example.com", "password": "pw123456" }).to_string(),
        ))
        .unwrap();

    let (status, json) = json_response(test_router(db), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "User created");
    assert_eq!(json["data"]["id"], stored.id.to_string());
    assert_eq!(json["data"]["email"], "fern@example.com");
}

#[tokio::test]
async fn unknown_route_is_enveloped() {
    let (status, json) = json_response(empty_router(), get("/api/v1/greenhouses")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}
