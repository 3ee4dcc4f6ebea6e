//! Rolling per-service statistics: windowed request/token counters and
//! fixed-capacity latency/speed sample rings.

use parking_lot::Mutex;
use std::collections::VecDeque;

use super::clock::Clock;

const DEFAULT_TIME_WINDOW_SECS: u64 = 60;
const DEFAULT_LATENCY_CAPACITY: usize = 100;
const DEFAULT_SPEED_CAPACITY: usize = 50;

/// A single windowed contribution: when it landed and what it added.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    at_ms: u64,
    requests: u64,
    tokens: u64,
}

/// Latency and throughput statistics over the current sample ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub avg: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub count: usize,
}

impl LatencyStats {
    fn empty() -> Self {
        Self {
            avg: 0.0,
            p50: 0.0,
            p95: 0.0,
            p99: 0.0,
            count: 0,
        }
    }
}

/// Average-speed statistics over the current sample ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedStats {
    pub avg: f64,
    pub count: usize,
}

impl SpeedStats {
    fn empty() -> Self {
        Self { avg: 0.0, count: 0 }
    }
}

/// Current windowed request/token counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowStats {
    pub requests: u64,
    pub tokens: u64,
}

struct Inner {
    window: VecDeque<WindowEntry>,
    latencies: VecDeque<f64>,
    speeds: VecDeque<f64>,
}

/// Rolling statistics owned by a single [`super::service::Service`].
///
/// Window accounting is expired lazily, on read, rather than by a
/// background timer: every call that touches `window` first drops entries
/// older than `time_window_secs`.
pub struct ServiceStats {
    time_window_secs: u64,
    latency_capacity: usize,
    speed_capacity: usize,
    inner: Mutex<Inner>,
}

impl ServiceStats {
    /// Build a stats tracker with the given window length and ring capacities.
    pub fn new(time_window_secs: u64, latency_capacity: usize, speed_capacity: usize) -> Self {
        Self {
            time_window_secs: if time_window_secs == 0 {
                DEFAULT_TIME_WINDOW_SECS
            } else {
                time_window_secs
            },
            latency_capacity: latency_capacity.max(1),
            speed_capacity: speed_capacity.max(1),
            inner: Mutex::new(Inner {
                window: VecDeque::new(),
                latencies: VecDeque::new(),
                speeds: VecDeque::new(),
            }),
        }
    }

    /// Build a stats tracker using the documented defaults (60s window,
    /// 100-sample latency ring, 50-sample speed ring).
    pub fn with_defaults(time_window_secs: u64) -> Self {
        Self::new(
            time_window_secs,
            DEFAULT_LATENCY_CAPACITY,
            DEFAULT_SPEED_CAPACITY,
        )
    }

    fn expire_window(&self, inner: &mut Inner, now_ms: u64) {
        let horizon_ms = self.time_window_secs.saturating_mul(1000);
        while let Some(front) = inner.window.front() {
            if now_ms.saturating_sub(front.at_ms) > horizon_ms {
                inner.window.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record a completed request contributing `tokens` to the window.
    pub fn record_request(&self, tokens: u64, clock: &dyn Clock) {
        let now_ms = clock.now_ms();
        let mut inner = self.inner.lock();
        self.expire_window(&mut inner, now_ms);
        inner.window.push_back(WindowEntry {
            at_ms: now_ms,
            requests: 1,
            tokens,
        });
    }

    /// Append a latency sample (milliseconds), evicting the oldest on overflow.
    pub fn record_latency(&self, ms: f64) {
        let mut inner = self.inner.lock();
        if inner.latencies.len() >= self.latency_capacity {
            inner.latencies.pop_front();
        }
        inner.latencies.push_back(ms);
    }

    /// Append a token-speed sample (tokens/second), evicting the oldest on overflow.
    pub fn record_token_speed(&self, tps: f64) {
        let mut inner = self.inner.lock();
        if inner.speeds.len() >= self.speed_capacity {
            inner.speeds.pop_front();
        }
        inner.speeds.push_back(tps);
    }

    /// Current windowed request/token counts, after expiring stale entries.
    pub fn window_stats(&self, clock: &dyn Clock) -> WindowStats {
        let now_ms = clock.now_ms();
        let mut inner = self.inner.lock();
        self.expire_window(&mut inner, now_ms);
        let mut out = WindowStats::default();
        for entry in &inner.window {
            out.requests += entry.requests;
            out.tokens += entry.tokens;
        }
        out
    }

    /// Latency statistics over the current ring. A copy of the ring is
    /// sorted to compute percentiles and then dropped.
    pub fn latency_stats(&self) -> LatencyStats {
        let inner = self.inner.lock();
        if inner.latencies.is_empty() {
            return LatencyStats::empty();
        }
        let mut sorted: Vec<f64> = inner.latencies.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let count = sorted.len();
        let avg = sorted.iter().sum::<f64>() / count as f64;
        LatencyStats {
            avg,
            p50: percentile(&sorted, 0.50),
            p95: percentile(&sorted, 0.95),
            p99: percentile(&sorted, 0.99),
            count,
        }
    }

    /// Average token-speed statistics over the current ring.
    pub fn token_speed_stats(&self) -> SpeedStats {
        let inner = self.inner.lock();
        if inner.speeds.is_empty() {
            return SpeedStats::empty();
        }
        let count = inner.speeds.len();
        let avg = inner.speeds.iter().sum::<f64>() / count as f64;
        SpeedStats { avg, count }
    }
}

/// Linear-interpolation percentile over an already-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
