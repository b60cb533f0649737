use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::middlewares::mw_auth::Ctx;
use crate::{AppState, Error, Result};

/// 100 requests per rolling hour per principal/IP across the whole `/api`
/// surface. The moka cache is built with a one hour TTL, so counting live
/// entries under the requester's prefix gives the rolling window.
const MAX_REQUESTS_PER_HOUR: usize = 100;

pub async fn rate_limit_middleware(
    State(app_state): State<AppState>,
    ConnectInfo(ip): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response> {
    let identifier = req
        .extensions()
        .get::<Ctx>()
        .map(|ctx| format!("user:{}", ctx.user_id))
        .unwrap_or_else(|| format!("ip:{}", ip.ip()));

    let request_id = uuid::Uuid::new_v4();
    let key = format!("rl:{}:{}", identifier, request_id);
    app_state.rate_limit_cache.insert(key, ()).await;

    let prefix = format!("rl:{}:", identifier);
    let requests_this_hour = app_state
        .rate_limit_cache
        .iter()
        .filter(|(k, _)| k.starts_with(&prefix))
        .count();

    if requests_this_hour > MAX_REQUESTS_PER_HOUR {
        tracing::warn!("rate limit exceeded for {}", identifier);
        return Err(Error::TooManyRequests);
    }

    Ok(next.run(req).await)
}
