//! Bounded Store demo
//!
//! Runs the two storage components the way a tracing collaborator would:
//! recent request records go into a bounded list, and open spans are parked
//! in a TTL cache under their correlation id until they are closed or expire.
//! Statistics are logged as JSON until Ctrl+C / SIGTERM.

use std::time::Duration;

use anyhow::Context;
use bounded_store::{BoundedList, Config, TtlCache};
use serde_json::json;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A finished request, kept in the recent-requests window.
#[derive(Debug, Clone)]
struct RequestRecord {
    correlation_id: String,
    route: &'static str,
    status: u16,
    latency_ticks: u64,
}

/// An open span waiting for its request to finish.
#[derive(Debug, Clone)]
struct OpenSpan {
    name: &'static str,
    started_tick: u64,
}

const ROUTES: [&str; 3] = ["/orders", "/users", "/health"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bounded_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: list_capacity={}, cache_ttl={}s, sweep_interval={}ms",
        config.list_capacity, config.cache_ttl_secs, config.sweep_interval_ms
    );

    let recent: BoundedList<RequestRecord> = BoundedList::new(config.list_capacity);
    let spans: TtlCache<OpenSpan> =
        TtlCache::try_with_config(config.cache_config()).context("creating span cache")?;

    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut tick: u64 = 0;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tick += 1;
                simulate_request(tick, &recent, &spans);
                if tick % 50 == 0 {
                    report(&recent, &spans);
                }
            }
            _ = &mut shutdown => break,
        }
    }

    spans.close().await.context("stopping span cache sweeper")?;
    report(&recent, &spans);
    info!("Shutdown complete");
    Ok(())
}

/// Opens a span for a new request and closes the span of an older one.
///
/// Every third request is left open so its span ages out through the sweeper.
fn simulate_request(tick: u64, recent: &BoundedList<RequestRecord>, spans: &TtlCache<OpenSpan>) {
    let correlation_id = format!("req-{tick}");
    let route = ROUTES[(tick % ROUTES.len() as u64) as usize];
    spans.put(
        correlation_id,
        OpenSpan {
            name: route,
            started_tick: tick,
        },
    );

    let finished = tick.saturating_sub(2);
    if finished > 0 && finished % 3 != 0 {
        let finished_id = format!("req-{finished}");
        if let Some(span) = spans.take(&finished_id) {
            recent.push_front(RequestRecord {
                correlation_id: finished_id,
                route: span.name,
                status: if finished % 7 == 0 { 500 } else { 200 },
                latency_ticks: tick - span.started_tick,
            });
        }
    }

    // Failed requests are dropped from the window once reported
    if tick % 25 == 0 {
        let failures = recent.remove_all_items(&500, |status, record| record.status == *status);
        for record in failures {
            warn!(
                correlation_id = %record.correlation_id,
                route = record.route,
                latency_ticks = record.latency_ticks,
                "Request failed"
            );
        }
    }
}

fn report(recent: &BoundedList<RequestRecord>, spans: &TtlCache<OpenSpan>) {
    let latest_orders = recent.search_front(&"/orders", 3, |route, record| record.route == *route);
    let list_stats = recent.stats();
    let cache_stats = spans.stats();
    let summary = json!({
        "window_fill": list_stats.fill_ratio(),
        "span_hit_rate": cache_stats.hit_rate(),
        "recent_requests": list_stats,
        "open_spans": cache_stats,
        "latest_orders": latest_orders
            .iter()
            .map(|record| record.correlation_id.as_str())
            .collect::<Vec<_>>(),
    });
    info!("Store statistics: {}", summary);
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
