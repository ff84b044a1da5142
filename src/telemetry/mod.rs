//! Telemetry for summarization sessions
//!
//! Collects request and chunk events and prints a short session summary.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Events kept for inspection; older ones are dropped, stats keep counting
pub const MAX_RETAINED_EVENTS: usize = 256;

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    StateTransition {
        from: String,
        to: String,
        timestamp: Instant,
    },
    RequestStarted {
        article: String,
        timestamp: Instant,
    },
    ChunkReceived {
        bytes: usize,
        timestamp: Instant,
    },
    RequestCompleted {
        chunks: usize,
        duration_ms: u64,
        timestamp: Instant,
    },
    RequestFailed {
        error: String,
        status: Option<u16>,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default)]
pub struct SummaryStats {
    pub requests_started: usize,
    pub requests_completed: usize,
    pub requests_failed: usize,
    pub chunks_received: usize,
    pub bytes_received: usize,
    pub state_transitions: usize,
    /// Time from the latest request start to its first chunk
    pub first_chunk_ms: Option<u64>,
}

/// Telemetry collector
#[derive(Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<VecDeque<TelemetryEvent>>>,
    stats: Arc<Mutex<SummaryStats>>,
    last_request: Arc<Mutex<Option<Instant>>>,
    start_time: Instant,
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_RETAINED_EVENTS))),
            stats: Arc::new(Mutex::new(SummaryStats::default())),
            last_request: Arc::new(Mutex::new(None)),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        if let Ok(mut stats) = self.stats.lock() {
            match &event {
                TelemetryEvent::StateTransition { .. } => {
                    stats.state_transitions += 1;
                }
                TelemetryEvent::RequestStarted { timestamp, .. } => {
                    stats.requests_started += 1;
                    stats.first_chunk_ms = None;
                    if let Ok(mut last) = self.last_request.lock() {
                        *last = Some(*timestamp);
                    }
                }
                TelemetryEvent::ChunkReceived { bytes, timestamp } => {
                    stats.chunks_received += 1;
                    stats.bytes_received += bytes;
                    if stats.first_chunk_ms.is_none() {
                        let started = self.last_request.lock().ok().and_then(|l| *l);
                        stats.first_chunk_ms = started
                            .map(|s| timestamp.saturating_duration_since(s).as_millis() as u64);
                    }
                }
                TelemetryEvent::RequestCompleted { .. } => {
                    stats.requests_completed += 1;
                }
                TelemetryEvent::RequestFailed { .. } => {
                    stats.requests_failed += 1;
                }
            }
        }

        if let Ok(mut events) = self.events.lock() {
            if events.len() == MAX_RETAINED_EVENTS {
                events.pop_front();
            }
            events.push_back(event);
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> SummaryStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Number of retained events
    pub fn event_count(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        match self.events.lock() {
            Ok(events) => {
                let start = events.len().saturating_sub(n);
                events.iter().skip(start).cloned().collect()
            }
            Err(_) => Vec::new(),
        }
    }

    /// Fraction of finished requests that completed
    pub fn success_rate(&self) -> f64 {
        let stats = self.get_stats();
        let total = stats.requests_completed + stats.requests_failed;
        if total == 0 {
            1.0
        } else {
            stats.requests_completed as f64 / total as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple telemetry display
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
    verbosity: crate::cli::Verbosity,
}

impl TelemetryDisplay {
    pub fn new(collector: TelemetryCollector, verbosity: crate::cli::Verbosity) -> Self {
        Self {
            collector,
            verbosity,
        }
    }

    /// Display summary statistics
    pub fn display_summary(&self) {
        if !self.verbosity.show_events() {
            return;
        }
        let stats = self.collector.get_stats();
        let elapsed = self.collector.elapsed();

        eprintln!("\n📊 Session Summary");
        eprintln!("─────────────────────────────────────");
        eprintln!("Duration:          {:?}", elapsed);
        eprintln!("Requests:          {}", stats.requests_started);
        eprintln!("Chunks received:   {}", stats.chunks_received);
        eprintln!("Bytes received:    {}", stats.bytes_received);
        if let Some(ms) = stats.first_chunk_ms {
            eprintln!("First chunk:       {}ms", ms);
        }
        eprintln!("Success rate:      {:.1}%", self.collector.success_rate() * 100.0);
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_creation() {
        let collector = TelemetryCollector::new();
        assert_eq!(collector.event_count(), 0);
        assert_eq!(collector.get_stats().chunks_received, 0);
    }

    #[test]
    fn test_chunk_events() {
        let collector = TelemetryCollector::new();
        let start = Instant::now();
        collector.record(TelemetryEvent::RequestStarted {
            article: "https://techcrunch.com/x".to_string(),
            timestamp: start,
        });
        collector.record(TelemetryEvent::ChunkReceived {
            bytes: 12,
            timestamp: start + Duration::from_millis(40),
        });
        collector.record(TelemetryEvent::ChunkReceived {
            bytes: 8,
            timestamp: start + Duration::from_millis(90),
        });

        let stats = collector.get_stats();
        assert_eq!(stats.requests_started, 1);
        assert_eq!(stats.chunks_received, 2);
        assert_eq!(stats.bytes_received, 20);
        assert_eq!(stats.first_chunk_ms, Some(40));
    }

    #[test]
    fn test_success_rate() {
        let collector = TelemetryCollector::new();
        assert_eq!(collector.success_rate(), 1.0);

        collector.record(TelemetryEvent::RequestCompleted {
            chunks: 3,
            duration_ms: 100,
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::RequestFailed {
            error: "HTTP 500".to_string(),
            status: Some(500),
            timestamp: Instant::now(),
        });

        assert!((collector.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recent_events() {
        let collector = TelemetryCollector::new();
        for i in 0..10 {
            collector.record(TelemetryEvent::ChunkReceived {
                bytes: i,
                timestamp: Instant::now(),
            });
        }
        assert_eq!(collector.recent_events(3).len(), 3);
    }

    #[test]
    fn test_event_log_is_bounded() {
        let collector = TelemetryCollector::new();
        let total = MAX_RETAINED_EVENTS * 4;
        for i in 0..total {
            collector.record(TelemetryEvent::ChunkReceived {
                bytes: i,
                timestamp: Instant::now(),
            });
        }

        assert_eq!(collector.event_count(), MAX_RETAINED_EVENTS);
        assert_eq!(collector.get_stats().chunks_received, total);
        match collector.recent_events(1).as_slice() {
            [TelemetryEvent::ChunkReceived { bytes, .. }] => assert_eq!(*bytes, total - 1),
            other => panic!("unexpected events: {:?}", other),
        }
    }
}
