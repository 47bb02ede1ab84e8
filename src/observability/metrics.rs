//! Request metrics.
//!
//! # Responsibilities
//! - Aggregate request outcomes per handler stack ([`Stats`])
//! - Publish the same outcomes through the `metrics` facade
//! - Install the Prometheus recorder backing the admin `/metrics` endpoint
//! - Run recorder upkeep so histogram buffers are drained between scrapes
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by status class
//! - `http_request_duration_seconds` (histogram): handler latency
//!
//! # Design Decisions
//! - Stats counters sit behind one mutex so a snapshot is never torn
//! - Status classes: 2xx, 4xx, 5xx; everything else only counts in totals

use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Serialize, Serializer};

use crate::lifecycle::{Actor, ActorError, Shutdown};

/// How often the Prometheus recorder drains its histogram buffers.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    count: u64,
    total: Duration,
    max: Duration,
    average: Duration,
    c2xx: u64,
    c4xx: u64,
    c5xx: u64,
}

/// Running request statistics for one handler stack.
#[derive(Debug)]
pub struct Stats {
    counters: Mutex<Counters>,
    started_at: Instant,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
            started_at: Instant::now(),
        }
    }

    /// Record the outcome of one request.
    ///
    /// `elapsed` is `None` when the request was never timed; the status is
    /// still bucketed but count and durations are left alone.
    pub fn record_request(&self, status: u16, elapsed: Option<Duration>) {
        let class = status_class(status);
        {
            let mut c = self.counters.lock().expect("stats mutex poisoned");
            if let Some(elapsed) = elapsed {
                c.count += 1;
                c.total += elapsed;
                if elapsed > c.max {
                    c.max = elapsed;
                }
                c.average = Duration::from_nanos((c.total.as_nanos() / u128::from(c.count)) as u64);
            }
            match class {
                Some(StatusClass::Success) => c.c2xx += 1,
                Some(StatusClass::ClientError) => c.c4xx += 1,
                Some(StatusClass::ServerError) => c.c5xx += 1,
                None => {}
            }
        }

        let label = class.map(StatusClass::label).unwrap_or("other");
        metrics::counter!("http_requests_total", "class" => label).increment(1);
        if let Some(elapsed) = elapsed {
            metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());
        }
    }

    /// Consistent copy of the current counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        let c = *self.counters.lock().expect("stats mutex poisoned");
        StatsSnapshot {
            uptime: self.started_at.elapsed(),
            requests: RequestStats {
                count: c.count,
                duration: DurationStats {
                    total: c.total,
                    max: c.max,
                    average: c.average,
                },
                codes: CodeStats {
                    c2xx: c.c2xx,
                    c4xx: c.c4xx,
                    c5xx: c.c5xx,
                },
            },
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusClass {
    Success,
    ClientError,
    ServerError,
}

impl StatusClass {
    fn label(self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
        }
    }
}

fn status_class(status: u16) -> Option<StatusClass> {
    if status >= 500 {
        Some(StatusClass::ServerError)
    } else if status >= 400 {
        Some(StatusClass::ClientError)
    } else if (200..300).contains(&status) {
        Some(StatusClass::Success)
    } else {
        None
    }
}

/// Point-in-time copy of [`Stats`], served by the admin `/status` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    #[serde(serialize_with = "human_duration")]
    pub uptime: Duration,
    pub requests: RequestStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestStats {
    pub count: u64,
    pub duration: DurationStats,
    pub codes: CodeStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationStats {
    #[serde(serialize_with = "human_duration")]
    pub total: Duration,
    #[serde(serialize_with = "human_duration")]
    pub max: Duration,
    #[serde(serialize_with = "human_duration")]
    pub average: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeStats {
    #[serde(rename = "2xx")]
    pub c2xx: u64,
    #[serde(rename = "4xx")]
    pub c4xx: u64,
    #[serde(rename = "5xx")]
    pub c5xx: u64,
}

fn human_duration<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:?}", d))
}

static PROMETHEUS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the process-wide Prometheus recorder.
///
/// Only the first call installs anything; later calls return the same
/// handle. Returns `None` if another recorder was already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Metrics recorder not installed");
                None
            }
        })
        .clone()
}

/// Periodic recorder upkeep as a group actor.
///
/// The recorder installed by [`init_metrics`] buffers histogram samples
/// until upkeep runs; without it the buffers grow for as long as `/metrics`
/// is not scraped.
pub fn upkeep_actor(handle: PrometheusHandle, every: Duration) -> Actor {
    let shutdown = Shutdown::new();
    let stopped = shutdown.wait();

    Actor::new(
        "metrics-upkeep",
        async move {
            let mut ticker = tokio::time::interval(every);
            tokio::pin!(stopped);
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => handle.run_upkeep(),
                }
            }
            Ok::<(), ActorError>(())
        },
        move |_| shutdown.trigger(),
    )
}
