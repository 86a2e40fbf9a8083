//! End-to-end: telemetry route backed by a live JSON target.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceExt;

use httpjson_exporter::{app_state::AppState, config, router};

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Target that answers with JSON until `broken` is set, then 500s.
async fn target(broken: Arc<AtomicBool>) -> SocketAddr {
    let app = Router::new()
        .route(
            "/actuator/metrics",
            get(|State(broken): State<Arc<AtomicBool>>| async move {
                if broken.load(Ordering::SeqCst) {
                    (StatusCode::INTERNAL_SERVER_ERROR, String::new())
                } else {
                    (
                        StatusCode::OK,
                        r#"{"mem":1024,"mem.free":512,"status":"UP","gc":[{"count":3}]}"#.to_string(),
                    )
                }
            }),
        )
        .with_state(broken);
    serve(app).await
}

fn exporter(addr: SocketAddr) -> Router {
    let cfg = config::resolve(
        None,
        config::Overrides {
            scrape_uri: Some(format!("http://{addr}/actuator/metrics")),
            timeout_ms: Some(2000),
            ..Default::default()
        },
    )
    .unwrap();
    router::build_router(AppState::new(cfg).unwrap())
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn metrics_scrapes_and_keeps_stale_values_on_failure() {
    let broken = Arc::new(AtomicBool::new(false));
    let app = exporter(target(Arc::clone(&broken)).await);

    let (status, text) = get_text(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("http_json_up 1\n"), "{text}");
    assert!(text.contains("http_json_value{path=\"$.mem\"} 1024\n"), "{text}");
    assert!(text.contains("http_json_value{path=\"$['mem.free']\"} 512\n"), "{text}");
    assert!(text.contains("http_json_value{path=\"$.gc[0].count\"} 3\n"), "{text}");
    assert!(!text.contains("status"), "{text}");

    broken.store(true, Ordering::SeqCst);
    let (status, text) = get_text(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("http_json_up 0\n"), "{text}");
    assert!(text.contains("http_json_value{path=\"$.mem\"} 1024\n"), "{text}");
    assert!(text.contains("http_json_scrape_errors_total{kind=\"bad_status\"} 1\n"), "{text}");
}

#[tokio::test]
async fn index_links_to_telemetry_path() {
    let app = exporter(target(Arc::new(AtomicBool::new(false))).await);
    let (status, html) = get_text(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<a href='/metrics'>Metrics</a>"));

    let (status, body) = get_text(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn index_escapes_telemetry_path() {
    let cfg = config::resolve(
        None,
        config::Overrides {
            telemetry_path: Some("/it's<metrics>".into()),
            ..Default::default()
        },
    )
    .unwrap();
    let app = router::build_router(AppState::new(cfg).unwrap());

    let (status, html) = get_text(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<a href='/it&#39;s&lt;metrics&gt;'>Metrics</a>"), "{html}");
}
