use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

const LOG_TARGET: &str = "server::http";

/// Logs each HTTP request with its status and latency. Upgraded sockets log once, at upgrade.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let query = request.uri().query().map(str::to_owned);

    tracing::info!(
        target: LOG_TARGET,
        %method,
        %path,
        query = query.as_deref().unwrap_or(""),
        "incoming request"
    );

    let start = Instant::now();
    let response = next.run(request).await;

    tracing::info!(
        target: LOG_TARGET,
        %method,
        %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}
