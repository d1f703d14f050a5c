use aerobook_api::{app, state::AppState};
use aerobook_core::flight::Flight;
use aerobook_core::seat::SeatId;
use aerobook_core::session::{BookingSession, Screen};
use aerobook_store::PgPool;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// Builds the app around a lazy pool that never actually connects; these
/// tests only drive the session endpoints, which run entirely off the
/// in-memory registry.
async fn app_with_session(flight: Flight, booked: &[&str]) -> (Router, Uuid) {
    let pool = PgPool::connect_lazy("postgres://localhost:5432/aerobook_test")
        .expect("lazy pool");
    let state = AppState::new(pool);

    let session_id = Uuid::new_v4();
    let mut session = BookingSession::new();
    let booked: Vec<SeatId> = booked.iter().map(|s| s.parse().unwrap()).collect();
    session.set_flight(flight, booked);
    session.navigate(Screen::SeatSelection);
    state.sessions.insert(session_id, session).await;

    (app(state), session_id)
}

fn flight() -> Flight {
    Flight {
        id: 7,
        airline_name: "IndiGo".into(),
        source: "Delhi".into(),
        destination: "Mumbai".into(),
        flight_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        departure_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        arrival_time: NaiveTime::from_hms_opt(11, 45, 0).unwrap(),
        price: 5000,
    }
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn seat_toggle_and_quote_follow_the_selection() {
    let (app, id) = app_with_session(flight(), &[]).await;

    let res = app
        .clone()
        .oneshot(post(
            &format!("/v1/sessions/{id}/seats"),
            json!({"seat": "10B", "selected": true}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(post(
            &format!("/v1/sessions/{id}/seats"),
            json!({"seat": "3A", "selected": true}),
        ))
        .await
        .unwrap();
    let body = body_json(res).await;
    // Selection is reported front-to-back.
    assert_eq!(body["selected_seats"], json!(["3A", "10B"]));
    assert_eq!(body["count"], 2);

    let res = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{id}/quote")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let quote = body_json(res).await;
    assert_eq!(quote["total"], 8000 + 5150);
    assert_eq!(quote["lines"][0]["seat"], "3A");
    assert_eq!(quote["lines"][0]["price"], 8000);

    // Deselect and the quote follows.
    let res = app
        .clone()
        .oneshot(post(
            &format!("/v1/sessions/{id}/seats"),
            json!({"seat": "3A", "selected": false}),
        ))
        .await
        .unwrap();
    let body = body_json(res).await;
    assert_eq!(body["count"], 1);

    let res = app
        .oneshot(get(&format!("/v1/sessions/{id}/quote")))
        .await
        .unwrap();
    let quote = body_json(res).await;
    assert_eq!(quote["total"], 5150);
}

#[tokio::test]
async fn malformed_seats_are_rejected_with_a_validation_error() {
    let (app, id) = app_with_session(flight(), &[]).await;

    for seat in ["31A", "12G", "C", ""] {
        let res = app
            .clone()
            .oneshot(post(
                &format!("/v1/sessions/{id}/seats"),
                json!({"seat": seat, "selected": true}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "seat {seat:?}");
    }
}

#[tokio::test]
async fn unknown_sessions_are_not_found() {
    let (app, _) = app_with_session(flight(), &[]).await;
    let ghost = Uuid::new_v4();

    let res = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{ghost}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .oneshot(post(&format!("/v1/sessions/{ghost}/reset"), json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_view_exposes_the_booked_cache() {
    let (app, id) = app_with_session(flight(), &["12C", "1A"]).await;

    let res = app
        .oneshot(get(&format!("/v1/sessions/{id}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let view = body_json(res).await;
    assert_eq!(view["screen"], "SEAT");
    assert_eq!(view["flight"]["airline_name"], "IndiGo");
    assert_eq!(view["booked_seats"], json!(["1A", "12C"]));
    assert_eq!(view["selected_seats"], json!([]));
    assert_eq!(view["total_price"], 0);
}

#[tokio::test]
async fn reset_clears_the_flow_but_not_the_booked_cache() {
    let (app, id) = app_with_session(flight(), &["12C"]).await;

    let res = app
        .clone()
        .oneshot(post(
            &format!("/v1/sessions/{id}/seats"),
            json!({"seat": "10B", "selected": true}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(post(&format!("/v1/sessions/{id}/reset"), json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["screen"], "SEARCH");

    let view = body_json(
        app.oneshot(get(&format!("/v1/sessions/{id}")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["selected_seats"], json!([]));
    assert_eq!(view["booking_ids"], json!([]));
    assert_eq!(view["booked_seats"], json!(["12C"]));
    assert_eq!(view["screen"], "SEARCH");
}

#[tokio::test]
async fn checkout_validation_fails_before_any_store_access() {
    let (app, id) = app_with_session(flight(), &[]).await;

    // Two seats selected, one passenger supplied: rejected up front, so the
    // lazy pool is never touched.
    for seat in ["10B", "10C"] {
        let res = app
            .clone()
            .oneshot(post(
                &format!("/v1/sessions/{id}/seats"),
                json!({"seat": seat, "selected": true}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = app
        .clone()
        .oneshot(post(
            &format!("/v1/sessions/{id}/checkout"),
            json!({
                "passengers": [{"name": "Asha", "age": "34"}],
                "email": "asha@example.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Same for a missing email.
    let res = app
        .oneshot(post(
            &format!("/v1/sessions/{id}/checkout"),
            json!({
                "passengers": [
                    {"name": "Asha", "age": "34"},
                    {"name": "Ravi", "age": "28"},
                ],
                "email": " ",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn finishing_a_session_discards_it() {
    let (app, id) = app_with_session(flight(), &[]).await;

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .oneshot(get(&format!("/v1/sessions/{id}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
