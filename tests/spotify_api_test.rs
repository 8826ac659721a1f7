use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Extension, Json, Router,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use likedradio::spotify::SpotifyApi;
use serde_json::json;
use tokio::{net::TcpListener, time::Instant};

// Answers GET /me with the statuses of `plan` in turn, then with a profile
#[derive(Clone)]
struct Upstream {
    plan: Arc<Vec<(StatusCode, Option<&'static str>)>>,
    calls: Arc<AtomicUsize>,
}

impl Upstream {
    fn new(plan: Vec<(StatusCode, Option<&'static str>)>) -> Self {
        Self {
            plan: Arc::new(plan),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn me(Extension(upstream): Extension<Upstream>) -> Response {
    let call = upstream.calls.fetch_add(1, Ordering::SeqCst);

    match upstream.plan.get(call) {
        Some((status, retry_after)) => {
            let mut headers = HeaderMap::new();
            if let Some(secs) = retry_after {
                headers.insert("retry-after", HeaderValue::from_static(*secs));
            }
            (*status, headers).into_response()
        }
        None => Json(json!({ "id": "user-1", "display_name": "Listener" })).into_response(),
    }
}

async fn start(upstream: Upstream) -> SpotifyApi {
    let app = Router::new()
        .route("/me", get(me))
        .layer(Extension(upstream));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    SpotifyApi::new(format!("http://{}", addr))
}

#[tokio::test(start_paused = true)]
async fn test_bad_gateway_is_retried() {
    let upstream = Upstream::new(vec![(StatusCode::BAD_GATEWAY, None)]);
    let api = start(upstream.clone()).await;
    let started = Instant::now();

    let profile = api.profile("tok").await.unwrap();

    assert_eq!(profile.greeting_name(), "Listener");
    assert_eq!(upstream.calls(), 2);
    assert!(started.elapsed() >= Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_bad_gateway_gives_up_after_three_attempts() {
    let upstream = Upstream::new(vec![(StatusCode::BAD_GATEWAY, None); 5]);
    let api = start(upstream.clone()).await;

    let err = api.profile("tok").await.unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_GATEWAY));
    assert_eq!(upstream.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_honours_retry_after() {
    let upstream = Upstream::new(vec![
        (StatusCode::TOO_MANY_REQUESTS, Some("4")),
        (StatusCode::TOO_MANY_REQUESTS, Some("4")),
    ]);
    let api = start(upstream.clone()).await;
    let started = Instant::now();

    let profile = api.profile("tok").await.unwrap();

    assert_eq!(profile.id, "user-1");
    assert_eq!(upstream.calls(), 3);
    assert!(started.elapsed() >= Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_gives_up_after_three_attempts() {
    let upstream = Upstream::new(vec![(StatusCode::TOO_MANY_REQUESTS, Some("1")); 5]);
    let api = start(upstream.clone()).await;

    let err = api.profile("tok").await.unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(upstream.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_long_retry_after_is_not_waited_for() {
    let upstream = Upstream::new(vec![(StatusCode::TOO_MANY_REQUESTS, Some("600"))]);
    let api = start(upstream.clone()).await;

    let err = api.profile("tok").await.unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_other_errors_are_not_retried() {
    let upstream = Upstream::new(vec![(StatusCode::UNAUTHORIZED, None)]);
    let api = start(upstream.clone()).await;

    let err = api.profile("tok").await.unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
    assert_eq!(upstream.calls(), 1);
}
