use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use gym_server::db::DbService;
use gym_server::{Config, ServerState, build_app};

async fn test_app() -> (Router, ServerState) {
    let db = DbService::open_in_memory().await.unwrap();
    let state = ServerState::from_db(Config::with_overrides("/tmp/gym-server-test", 0), db);
    (build_app(&state), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_class(app: &Router, capacity: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/classes",
        Some(json!({
            "title": "HIIT",
            "trainer_name": "Sam",
            "date": "2099-06-01",
            "time": "07:30",
            "capacity": capacity
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

async fn book(app: &Router, class_id: i64, member_id: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/api/classes/{class_id}/bookings"),
        Some(json!({ "member_id": member_id })),
    )
    .await
}

fn member_ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|b| b["member_id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/health/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_waitlist_promotion_flow() {
    let (app, state) = test_app().await;
    let mut notifications = state.notifier.subscribe();
    let class_id = create_class(&app, 2).await;

    for (member_id, expected) in [("m1", "confirmed"), ("m2", "confirmed"), ("m3", "waitlisted")] {
        let (status, body) = book(&app, class_id, member_id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], expected);
    }

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/classes/{class_id}/bookings/m1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"]["member_id"], "m1");
    assert_eq!(body["promoted"]["member_id"], "m3");
    assert_eq!(body["promoted"]["status"], "confirmed");

    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification.member_id, "m3");

    let (_, list) = send(
        &app,
        Method::GET,
        &format!("/api/classes/{class_id}/bookings"),
        None,
    )
    .await;
    assert_eq!(member_ids(&list), vec!["m2", "m3"]);
}

#[tokio::test]
async fn test_booking_errors() {
    let (app, _) = test_app().await;
    let class_id = create_class(&app, 1).await;
    book(&app, class_id, "m1").await;

    let (status, body) = book(&app, class_id, "m1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5002);

    let (status, body) = book(&app, class_id, "  ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = book(&app, class_id + 1, "m1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/classes/{class_id}/bookings/ghost"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5001);
}

#[tokio::test]
async fn test_started_class_is_closed_for_bookings() {
    let (app, _) = test_app().await;
    let class_id = create_class(&app, 2).await;
    book(&app, class_id, "m1").await;

    // Reschedule into the past
    let uri = format!("/api/classes/{class_id}");
    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "date": "2020-01-06" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = book(&app, class_id, "m2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5003);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("{uri}/bookings/m1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5003);

    let (_, list) = send(&app, Method::GET, &format!("{uri}/bookings"), None).await;
    assert_eq!(member_ids(&list), vec!["m1"]);
}

#[tokio::test]
async fn test_class_detail_and_summary() {
    let (app, _) = test_app().await;
    let class_id = create_class(&app, 1).await;
    for member_id in ["m1", "m2", "m3"] {
        book(&app, class_id, member_id).await;
    }

    let (status, detail) = send(&app, Method::GET, &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["title"], "HIIT");
    assert_eq!(detail["confirmed_count"], 1);
    assert_eq!(detail["waitlist_count"], 2);
    assert_eq!(detail["is_full"], true);
    assert_eq!(member_ids(&detail["confirmed"]), vec!["m1"]);
    assert_eq!(member_ids(&detail["waitlist"]), vec!["m2", "m3"]);

    let (_, list) = send(&app, Method::GET, "/api/classes", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["waitlist_count"], 2);
}

#[tokio::test]
async fn test_classes_sorted_by_schedule() {
    let (app, _) = test_app().await;
    for (title, date, time) in [
        ("Late", "2099-06-02", "09:00"),
        ("Early", "2099-06-01", "18:00"),
        ("Morning", "2099-06-01", "07:00"),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/classes",
            Some(json!({ "title": title, "date": date, "time": time })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, list) = send(&app, Method::GET, "/api/classes", None).await;
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Morning", "Early", "Late"]);
    // Defaults applied
    assert_eq!(list[0]["capacity"], 20);
    assert_eq!(list[0]["duration_minutes"], 60);
}

#[tokio::test]
async fn test_class_validation() {
    let (app, _) = test_app().await;
    for payload in [
        json!({ "title": "", "date": "2099-06-01", "time": "07:00" }),
        json!({ "title": "Yoga", "date": "June 1st", "time": "07:00" }),
        json!({ "title": "Yoga", "date": "2099-06-01", "time": "7am" }),
        json!({ "title": "Yoga", "date": "2099-06-01", "time": "07:00", "capacity": -1 }),
    ] {
        let (status, body) = send(&app, Method::POST, "/api/classes", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn test_capacity_update_rules() {
    let (app, _) = test_app().await;
    let class_id = create_class(&app, 3).await;
    for member_id in ["m1", "m2", "m3", "m4"] {
        book(&app, class_id, member_id).await;
    }
    let uri = format!("/api/classes/{class_id}");

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "capacity": 2 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    // Raising the capacity leaves the waitlist alone
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "capacity": 5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacity"], 5);
    let (_, detail) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(detail["waitlist_count"], 1);

    // The next booking takes a free seat
    let (_, booked) = book(&app, class_id, "m5").await;
    assert_eq!(booked["status"], "confirmed");

    let (status, body) = send(&app, Method::PUT, "/api/classes/1", Some(json!({ "title": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_delete_class_removes_bookings() {
    let (app, state) = test_app().await;
    let class_id = create_class(&app, 1).await;
    book(&app, class_id, "m1").await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM class_booking")
        .fetch_one(&state.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let (status, _) = book(&app, class_id, "m1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookings_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("gym.db");
    let db_path = db_path.to_str().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);

    let class_id = {
        let state = ServerState::from_db(config.clone(), DbService::new(db_path).await.unwrap());
        let app = build_app(&state);
        let class_id = create_class(&app, 1).await;
        for member_id in ["m1", "m2", "m3"] {
            book(&app, class_id, member_id).await;
        }
        state.pool.close().await;
        class_id
    };

    let state = ServerState::from_db(config, DbService::new(db_path).await.unwrap());
    let app = build_app(&state);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/classes/{class_id}/bookings/m1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["promoted"]["member_id"], "m2");

    let (_, list) = send(
        &app,
        Method::GET,
        &format!("/api/classes/{class_id}/bookings"),
        None,
    )
    .await;
    assert_eq!(member_ids(&list), vec!["m2", "m3"]);
    assert_eq!(list[0]["status"], "confirmed");
    assert_eq!(list[1]["status"], "waitlisted");
}
