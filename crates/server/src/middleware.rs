use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

/// Best-effort caller address: first hop of X-Forwarded-For when a proxy
/// set it, otherwise the socket peer.
pub fn client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty());
    if let Some(hop) = forwarded {
        return Some(hop.to_string());
    }
    connect_info.map(|ConnectInfo(addr)| addr.ip().to_string())
}

/// Logs caller IP, method, path and latency for every request.
/// ConnectInfo is optional so routers mounted without a TCP listener
/// (tests, lambda-style embeddings) still pass through.
pub async fn request_logger(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = client_ip(request.headers(), connect_info.as_ref())
        .unwrap_or_else(|| "unknown".to_string());
    let start = Instant::now();

    info!("📍 request - IP: {} | {} {}", client_ip, method, path);

    let response = next.run(request).await;

    let duration = start.elapsed();
    info!(
        "✅ request done - IP: {} | {} {} | status: {} | {:.2}ms",
        client_ip,
        method,
        path,
        response.status().as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<ConnectInfo<SocketAddr>> {
        Some(ConnectInfo("192.0.2.1:4000".parse().unwrap()))
    }

    #[test]
    fn forwarded_header_wins_over_the_socket() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 70.41.3.18"),
        );

        assert_eq!(
            client_ip(&headers, peer().as_ref()),
            Some("203.0.113.7".to_string())
        );
    }

    #[test]
    fn socket_peer_backs_up_a_missing_or_blank_header() {
        let empty = HeaderMap::new();
        assert_eq!(
            client_ip(&empty, peer().as_ref()),
            Some("192.0.2.1".to_string())
        );

        let mut blank = HeaderMap::new();
        blank.insert("x-forwarded-for", HeaderValue::from_static("  "));
        assert_eq!(
            client_ip(&blank, peer().as_ref()),
            Some("192.0.2.1".to_string())
        );

        assert_eq!(client_ip(&empty, None), None);
    }
}
