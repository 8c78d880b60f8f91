use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Response size for the access log: `512 B`, `3.4 KB`, `1.2 MB`.
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Access log: method, path, status, response size and latency.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{} {} -> {} | body error: {} | {}ms",
                method,
                uri.path(),
                parts.status.as_u16(),
                e,
                start.elapsed().as_millis()
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed = start.elapsed().as_millis();
    let size = format_size(bytes.len());
    if parts.status.is_success() {
        tracing::info!(
            "{} {} -> {} | {} | {}ms",
            method,
            uri.path(),
            parts.status.as_u16(),
            size,
            elapsed
        );
    } else {
        tracing::warn!(
            "{} {} -> {} | {} | {}ms",
            method,
            uri.path(),
            parts.status.as_u16(),
            size,
            elapsed
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}
