//! Shared doubles for worker integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use gas_status_bot::{
    error::{FetchError, PublishError},
    models::{GasSnapshot, PriceTier},
    services::{PriceSource, StatusPublisher},
};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing_subscriber::fmt::MakeWriter;

pub fn snapshot(fast: u64, mid: u64, slow: u64) -> GasSnapshot {
    GasSnapshot {
        fast,
        mid,
        slow,
        fetched_at: Utc::now(),
    }
}

pub fn bad_price() -> FetchError {
    FetchError::InvalidPrice {
        tier: PriceTier::Slow,
        value: "n/a".to_string(),
    }
}

/// Replays queued results, then keeps failing.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<GasSnapshot, FetchError>>>,
    calls: AtomicUsize,
    started: Mutex<Vec<Instant>>,
    latency: Duration,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<GasSnapshot, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            started: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> Vec<Instant> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch_snapshot(&self) -> Result<GasSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.lock().unwrap().push(Instant::now());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(bad_price()))
    }
}

#[derive(Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<Mutex<Vec<String>>>,
    reject: bool,
}

impl RecordingPublisher {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusPublisher for RecordingPublisher {
    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        self.published.lock().unwrap().push(text.to_string());
        if self.reject {
            return Err(PublishError::Closed("session gone".to_string()));
        }
        Ok(())
    }
}

/// In-memory sink for the fmt subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes this thread's events into the returned buffer until the guard drops.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
