// SPDX-FileCopyrightText: 2026 Hotline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-address admission limiter with fixed-window budgets.
//!
//! The first request from an address creates its budget entry and schedules
//! eviction exactly one window later; the eviction fires regardless of any
//! further traffic, so each address gets a fixed window, not one that slides
//! on access. The count only ever grows within a window and resets solely by
//! entry eviction.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use hotline_core::HotlineError;

use crate::handlers::ApiError;

#[derive(Debug)]
struct Visitor {
    requests: u32,
}

/// Tracks request volume per originating address.
#[derive(Debug, Clone)]
pub struct AdmissionLimiter {
    visitors: Arc<Mutex<HashMap<IpAddr, Visitor>>>,
    limit: u32,
    interval: Duration,
}

impl AdmissionLimiter {
    pub fn new(limit: u32, interval: Duration) -> Self {
        Self {
            visitors: Arc::new(Mutex::new(HashMap::new())),
            limit,
            interval,
        }
    }

    /// Record a request from `addr` and decide admission.
    ///
    /// The `limit`-th request within a window is still admitted; the
    /// `limit + 1`-th is not. The count increments either way.
    pub async fn admit(&self, addr: IpAddr) -> bool {
        let mut visitors = self.visitors.lock().await;
        let visitor = visitors.entry(addr).or_insert_with(|| {
            let map = Arc::clone(&self.visitors);
            let interval = self.interval;
            // Eviction is pinned to entry creation and never renewed.
            tokio::spawn(async move {
                tokio::time::sleep(interval).await;
                map.lock().await.remove(&addr);
                debug!(%addr, "limiter: window expired, budget reset");
            });
            Visitor { requests: 0 }
        });
        visitor.requests += 1;

        let admitted = visitor.requests <= self.limit;
        if !admitted {
            warn!(%addr, requests = visitor.requests, limit = self.limit, "limiter: request rejected");
            metrics::counter!("hotline_limiter_rejected_total").increment(1);
        }
        admitted
    }
}

/// Middleware applying admission control to every routed request,
/// authenticated or not, keyed purely by network origin.
pub async fn admission_middleware(
    State(limiter): State<AdmissionLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if limiter.admit(addr.ip()).await {
        next.run(request).await
    } else {
        ApiError::from(HotlineError::RateLimited).into_response()
    }
}
