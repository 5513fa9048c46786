//! HTTP handlers
//!
//! Profiles touch `/proc` and DWARF data, so they run on the blocking pool.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, warn};
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use crate::profiles::ProfileKind;
use crate::provider::DiagnosticsProvider;
use crate::report::write_report;

/// Build the router for a profiler state
pub fn router<P>(state: Arc<AppState<P>>) -> Router
where
    P: DiagnosticsProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_handler::<P>))
        .route("/debug/symbol", get(symbol_handler::<P>))
        .route("/debug/:profile", get(profile_handler::<P>))
        .route("/report", get(report_handler::<P>))
        .route("/workload", get(workload_handler))
        .with_state(state)
}

fn text(body: Vec<u8>) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

fn internal_error(msg: String) -> Response {
    error!("{msg}");
    (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
}

/// Run a blocking closure and map both join and profile failures to 500
async fn blocking<F>(f: F) -> Response
where
    F: FnOnce() -> Result<Vec<u8>, String> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(body)) => text(body),
        Ok(Err(msg)) => internal_error(msg),
        Err(e) => internal_error(format!("profile task failed: {e}")),
    }
}

pub async fn index_handler<P>(State(state): State<Arc<AppState<P>>>) -> Html<String> {
    let port = state.port;
    let links: String = ProfileKind::ALL
        .iter()
        .map(|kind| {
            let route = kind.route();
            format!("\t\t\t<tr><td><a href=\"http://localhost:{port}/debug/{route}\">{route}</a></td></tr>\n")
        })
        .collect();

    Html(format!(
        "<html>
<head>
\t<title>Profiling</title>
</head>
<body>
\t<div class=\"content\">
\t\t<table>
\t\t\t<th>Menu</th>
{links}\t\t\t<tr><td><a href=\"http://localhost:{port}/report\">Generate report</a></td></tr>
\t\t</table>
\t</div>
</body>
</html>
"
    ))
}

pub async fn profile_handler<P>(
    State(state): State<Arc<AppState<P>>>,
    Path(profile): Path<String>,
) -> Response
where
    P: DiagnosticsProvider + Send + Sync + 'static,
{
    let kind: ProfileKind = match profile.parse() {
        Ok(kind) => kind,
        Err(msg) => {
            warn!("{msg}");
            return (StatusCode::NOT_FOUND, msg).into_response();
        }
    };

    blocking(move || {
        let mut body = Vec::new();
        state.profiler.write(kind, &mut body).map_err(|e| format!("{kind} profile failed: {e}"))?;
        Ok(body)
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    /// Addresses separated by `+`, `,` or whitespace
    #[serde(default)]
    pub addrs: String,
}

impl SymbolQuery {
    fn words(&self) -> Vec<String> {
        self.addrs
            .split(|c: char| c == '+' || c == ',' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

pub async fn symbol_handler<P>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<SymbolQuery>,
) -> Response
where
    P: DiagnosticsProvider + Send + Sync + 'static,
{
    let words = query.words();
    blocking(move || {
        let mut body = Vec::new();
        state.profiler.symbol(&words, &mut body).map_err(|e| e.to_string())?;
        Ok(body)
    })
    .await
}

pub async fn report_handler<P>(State(state): State<Arc<AppState<P>>>) -> Response
where
    P: DiagnosticsProvider + Send + Sync + 'static,
{
    blocking(move || {
        write_report(&state.profiler, &state.output_folder).map_err(|e| format!("{e:#}"))?;
        Ok(b"Report generated!".to_vec())
    })
    .await
}

/// Small allocation-heavy endpoint to put load on the process
pub async fn workload_handler() -> Json<Vec<u32>> {
    Json((0..100_000).filter(|i| i % 1000 == 0).collect())
}
