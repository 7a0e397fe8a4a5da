mod handlers;
mod router;

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::core::spacelift::SpaceliftService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) service: Arc<SpaceliftService>,
    pub(crate) log_tx: broadcast::Sender<String>,
}

/// The gateway's REST surface: health, stack listing, run triggering, and
/// a live log stream. One server per process, sharing one service.
pub struct ApiServer {
    service: Arc<SpaceliftService>,
    log_tx: broadcast::Sender<String>,
    host: String,
    port: u16,
}

impl ApiServer {
    pub fn new(
        service: Arc<SpaceliftService>,
        log_tx: broadcast::Sender<String>,
        host: String,
        port: u16,
    ) -> Self {
        Self {
            service,
            log_tx,
            host,
            port,
        }
    }

    pub async fn serve(self) -> Result<()> {
        let state = AppState {
            service: self.service,
            log_tx: self.log_tx,
        };
        let app = router::build_api_router(state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Gateway API running at http://{addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

// --- SSE logs (used by router) ---

async fn sse_logs_endpoint(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.log_tx.subscribe();
    let stream = BroadcastStream::new(receiver).map(|msg| match msg {
        Ok(line) => Ok(Event::default().data(line)),
        Err(_) => Ok(Event::default().data("Log stream lagged")),
    });

    Sse::new(stream)
}
