//! Operational HTTP endpoints.
//!
//! - `/`         : informational landing page
//! - `/healthz`  : process liveness (independent of scrape outcome)
//! - telemetry   : runs one scrape cycle, Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Escape text for use inside HTML bodies and quoted attributes.
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let path = html_escape(&state.cfg().web.telemetry_path);
    Html(format!(
        "<html>\n\
         <head><title>HTTP JSON Exporter</title></head>\n\
         <body>\n\
         <h1>HTTP JSON Exporter</h1>\n\
         <p><a href='{path}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    ))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.collector().scrape_and_render().await;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
