//! HTTP surface for the profiles
//!
//! | Route                  | Response                              |
//! |------------------------|---------------------------------------|
//! | `/`                    | HTML index linking every profile      |
//! | `/debug/<profile>`     | text profile (`gc`, `heap`, ...)      |
//! | `/debug/symbol?addrs=` | address to function name lookup       |
//! | `/report`              | writes report files to the output dir |
//! | `/workload`            | demo JSON payload                     |

pub mod routes;

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::profiles::Profiler;
use crate::provider::DiagnosticsProvider;

pub use routes::router;

/// Default listening port
pub const DEFAULT_PORT: u16 = 7777;

/// Shared state of the HTTP handlers
pub struct AppState<P> {
    pub profiler: Profiler<P>,
    pub output_folder: PathBuf,
    /// Port used in the links of the index page
    pub port: u16,
}

/// Serve the profiles until Ctrl+C
///
/// # Errors
/// Returns an error if the port cannot be bound or the server fails
pub async fn serve<P>(state: AppState<P>) -> Result<()>
where
    P: DiagnosticsProvider + Send + Sync + 'static,
{
    let port = state.port;
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    info!("serving profiles on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            // An error here means no signal handler; keep serving until killed
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("HTTP server failed")
}
