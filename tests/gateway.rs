use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode},
};
use chrono::{Local, NaiveDate};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use venue_forms::app;
use venue_forms::clock::{Clock, ManualClock, SystemClock};
use venue_forms::dispatch::Dispatch;
use venue_forms::models::{BookingSubmission, ContactSubmission};
use venue_forms::security_headers::SECURITY_HEADERS;
use venue_forms::state::AppState;

const WINDOW: Duration = Duration::from_secs(60);

fn router_with(clock: Arc<dyn Clock>) -> (Router, Arc<AppState>) {
    let state = AppState::new(5, 3, WINDOW, Duration::ZERO, clock);
    (app(Arc::clone(&state)), state)
}

fn router() -> Router {
    router_with(Arc::new(SystemClock)).0
}

fn manual_router(today: NaiveDate) -> (Router, ManualClock) {
    let clock = ManualClock::new(today);
    let (router, _) = router_with(Arc::new(clock.clone()));
    (router, clock)
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn booking_body(date: &str) -> Value {
    json!({
        "name": "Yaw Boateng",
        "email": "yaw@example.com",
        "phone": "+233201234567",
        "eventType": "basketball",
        "date": date,
        "time": "19:00",
        "guests": "40",
        "message": "Corporate league night",
    })
}

fn contact_body() -> Value {
    json!({
        "name": "Abena Owusu",
        "email": "abena@example.com",
        "subject": "Gallery photos",
        "message": "Can we use the gallery photos in our newsletter?",
    })
}

async fn send(router: &Router, method: Method, uri: &str, ip: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(body)
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post_json(router: &Router, uri: &str, ip: &str, body: &Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, ip, Body::from(body.to_string())).await
}

#[tokio::test]
async fn test_booking_accepted() {
    let (router, _clock) = manual_router(day("2026-10-14"));
    let (status, body) = post_json(&router, "/api/bookings", "203.0.113.1", &booking_body("2026-10-20")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Booking request submitted successfully. We'll contact you to confirm."
        })
    );
}

#[tokio::test]
async fn test_same_day_booking_accepted() {
    let (router, _clock) = manual_router(day("2026-10-14"));
    let (status, _) = post_json(&router, "/api/bookings", "203.0.113.1", &booking_body("2026-10-14")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_booking_over_capacity_rejected() {
    let (router, _clock) = manual_router(day("2026-10-14"));
    let mut body = booking_body("2026-10-20");
    body["guests"] = json!("1391");

    let (status, body) = post_json(&router, "/api/bookings", "203.0.113.2", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid booking data");
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["field"], "guests");
    assert!(details[0]["message"].as_str().unwrap().contains("capacity"));
}

#[tokio::test]
async fn test_booking_yesterday_rejected() {
    let (router, _clock) = manual_router(day("2026-10-14"));
    let (status, body) = post_json(&router, "/api/bookings", "203.0.113.3", &booking_body("2026-10-13")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Booking date cannot be in the past" }));
}

#[tokio::test]
async fn test_booking_yesterday_rejected_on_wall_clock() {
    let router = router();
    let yesterday = Local::now().date_naive().pred_opt().unwrap();
    let (status, body) = post_json(
        &router,
        "/api/bookings",
        "203.0.113.4",
        &booking_body(&yesterday.format("%Y-%m-%d").to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Booking date cannot be in the past");
}

#[tokio::test]
async fn test_fourth_booking_is_rate_limited_regardless_of_payload() {
    let (router, _clock) = manual_router(day("2026-10-14"));
    let ip = "198.51.100.10";

    let (s1, _) = post_json(&router, "/api/bookings", ip, &booking_body("2026-10-20")).await;
    let (s2, _) = post_json(&router, "/api/bookings", ip, &json!({})).await;
    let (s3, _) = post_json(&router, "/api/bookings", ip, &booking_body("2020-01-01")).await;
    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::BAD_REQUEST);
    assert_eq!(s3, StatusCode::BAD_REQUEST);

    let (s4, body) = post_json(&router, "/api/bookings", ip, &booking_body("2026-10-20")).await;
    assert_eq!(s4, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({ "error": "Too many requests. Please try again later." }));

    // another client is unaffected
    let (other, _) = post_json(&router, "/api/bookings", "198.51.100.11", &booking_body("2026-10-20")).await;
    assert_eq!(other, StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_recovers_after_window() {
    let (router, clock) = manual_router(day("2026-10-14"));
    let ip = "198.51.100.20";

    for _ in 0..3 {
        post_json(&router, "/api/bookings", ip, &booking_body("2026-10-20")).await;
    }
    let (limited, _) = post_json(&router, "/api/bookings", ip, &booking_body("2026-10-20")).await;
    assert_eq!(limited, StatusCode::TOO_MANY_REQUESTS);

    clock.advance(WINDOW);
    let (status, _) = post_json(&router, "/api/bookings", ip, &booking_body("2026-10-20")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_endpoints_limit_independently() {
    let (router, _clock) = manual_router(day("2026-10-14"));
    let ip = "198.51.100.30";

    for _ in 0..3 {
        post_json(&router, "/api/bookings", ip, &booking_body("2026-10-20")).await;
    }
    let (status, _) = post_json(&router, "/api/contact", ip, &contact_body()).await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..4 {
        post_json(&router, "/api/contact", ip, &contact_body()).await;
    }
    let (status, _) = post_json(&router, "/api/contact", ip, &contact_body()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_contact_accepted() {
    let (status, body) = post_json(&router(), "/api/contact", "203.0.113.5", &contact_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Your message has been received. We'll get back to you soon."
        })
    );
}

#[tokio::test]
async fn test_contact_short_subject_is_only_error() {
    let mut body = contact_body();
    body["phone"] = json!("+233241234567");
    body["subject"] = json!("Help");

    let (status, body) = post_json(&router(), "/api/contact", "203.0.113.6", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "error": "Invalid form data",
            "details": [
                { "field": "subject", "message": "Subject must be at least 5 characters" }
            ]
        })
    );
}

#[tokio::test]
async fn test_malformed_body_is_generic_500() {
    let router = router();
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/contact",
        "203.0.113.7",
        Body::from("{\"name\": "),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "An error occurred processing your request. Please try again later." })
    );

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/bookings",
        "203.0.113.7",
        Body::from("not json"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "An error occurred processing your booking. Please try again later." })
    );
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let router = router();
    for uri in ["/api/contact", "/api/bookings"] {
        let (status, body) = send(&router, Method::GET, uri, "203.0.113.8", Body::empty()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn test_requests_without_ip_headers_share_unknown_bucket() {
    let (router, _clock) = manual_router(day("2026-10-14"));

    let mut last = StatusCode::OK;
    for _ in 0..4 {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/bookings")
            .body(Body::from(booking_body("2026-10-20").to_string()))
            .unwrap();
        last = router.clone().oneshot(request).await.unwrap().status();
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let router = router();
    post_json(&router, "/api/contact", "203.0.113.9", &contact_body()).await;

    let (status, body) = send(&router, Method::GET, "/health", "203.0.113.9", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(text.to_vec()).unwrap();
    assert!(text.contains("venue_submissions_total"));
}

#[tokio::test]
async fn test_concurrent_bookings_admit_exactly_the_limit() {
    let (router, _clock) = manual_router(day("2026-10-14"));

    let mut tasks = Vec::new();
    for _ in 0..12 {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            post_json(&router, "/api/bookings", "192.0.2.50", &booking_body("2026-10-20"))
                .await
                .0
        }));
    }

    let mut ok = 0;
    let mut limited = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::TOO_MANY_REQUESTS => limited += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!((ok, limited), (3, 9));
}

async fn post_for_headers(router: &Router, uri: &str, ip: &str, body: &Value) -> (StatusCode, HeaderMap) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    (response.status(), response.headers().clone())
}

fn assert_security_headers(headers: &HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        assert_eq!(
            headers.get(name).and_then(|v| v.to_str().ok()),
            Some(value),
            "header {}",
            name
        );
    }
}

#[tokio::test]
async fn test_security_headers_on_accepted_and_limited_responses() {
    let (router, _clock) = manual_router(day("2026-10-14"));
    let ip = "192.0.2.60";

    let (status, headers) = post_for_headers(&router, "/api/contact", ip, &contact_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_security_headers(&headers);
    assert_eq!(headers["x-content-type-options"], "nosniff");

    for _ in 0..4 {
        post_for_headers(&router, "/api/contact", ip, &contact_body()).await;
    }
    let (status, headers) = post_for_headers(&router, "/api/contact", ip, &contact_body()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_security_headers(&headers);

    let (status, headers) = post_for_headers(&router, "/api/bookings", ip, &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_security_headers(&headers);
}

#[derive(Default)]
struct Recorder {
    contacts: Mutex<Vec<ContactSubmission>>,
    bookings: Mutex<Vec<BookingSubmission>>,
}

impl Dispatch for Recorder {
    fn booking(&self, booking: &BookingSubmission) {
        self.bookings.lock().unwrap().push(booking.clone());
    }

    fn contact(&self, message: &ContactSubmission) {
        self.contacts.lock().unwrap().push(message.clone());
    }
}

#[tokio::test]
async fn test_dispatch_receives_sanitized_submissions() {
    let recorder = Arc::new(Recorder::default());
    let state = AppState::with_dispatch(
        5,
        3,
        WINDOW,
        Duration::ZERO,
        Arc::new(ManualClock::new(day("2026-10-14"))),
        recorder.clone(),
    );
    let router = app(state);

    let mut body = contact_body();
    body["name"] = json!("Abena <Owusu>");
    body["email"] = json!("Abena@Example.com");
    body["message"] = json!("<b>Hello</b>, javascript:alert(1) can we book?");
    let (status, _) = post_json(&router, "/api/contact", "192.0.2.70", &body).await;
    assert_eq!(status, StatusCode::OK);

    let mut booking = booking_body("2026-10-20");
    booking["message"] = json!("  <i>Bring bibs</i> ");
    let (status, _) = post_json(&router, "/api/bookings", "192.0.2.70", &booking).await;
    assert_eq!(status, StatusCode::OK);

    let contacts = recorder.contacts.lock().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Abena Owusu");
    assert_eq!(contacts[0].email, "abena@example.com");
    assert_eq!(contacts[0].message, "bHello/b, alert(1) can we book?");

    let bookings = recorder.bookings.lock().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].message, "iBring bibs/i");
    assert_eq!(bookings[0].guests, 40);

    // rejected submissions never reach the dispatcher
    drop(contacts);
    post_json(&router, "/api/contact", "192.0.2.70", &json!({})).await;
    assert_eq!(recorder.contacts.lock().unwrap().len(), 1);
}
