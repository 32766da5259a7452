//! Batch orchestration
//!
//! One run: fetch → drop blocked channels → parse → score → drop
//! duplicates → sort by time → deliver → record delivered ids.

pub mod format;


use crate::config::RelayConfig;
use crate::error::Result;
use crate::filter::is_allowed;
use crate::ingester::{MessageSource, RawMessage};
use crate::notify::SignalSink;
use crate::parser::parse_message;
use crate::quality::assess;
use crate::storage::DedupStore;
use crate::types::ParsedSignal;
use chrono::Utc;
use format::{normalize_timestamp_millis, to_outbound, zone};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub received: usize,
    pub blocked: usize,
    /// No hint and no content
    pub suppressed: usize,
    pub parsed: usize,
    pub duplicates: usize,
    pub below_threshold: usize,
    pub emitted: usize,
    pub delivered: usize,
    pub delivery_failed: usize,
}

/// Orchestrator over one dedup store
pub struct Relay {
    config: RelayConfig,
    blocked: HashSet<String>,
    store: DedupStore,
}

impl Relay {
    pub fn new(config: RelayConfig, store: DedupStore) -> Self {
        let blocked = config.blocked_set();
        Self {
            config,
            blocked,
            store,
        }
    }

    pub fn store(&self) -> &DedupStore {
        &self.store
    }

    /// Scored, deduplicated, time-ordered signals for a batch.
    ///
    /// Pure with respect to the store: nothing is marked here.
    pub fn prepare(&self, messages: &[RawMessage]) -> (Vec<ParsedSignal>, BatchStats) {
        let mut stats = BatchStats {
            received: messages.len(),
            ..Default::default()
        };
        let mut batch_ids = HashSet::new();
        let mut signals = Vec::new();

        for message in messages {
            if !is_allowed(message, &self.blocked) {
                tracing::debug!("Message {} from blocked channel, skipped", message.id);
                stats.blocked += 1;
                continue;
            }

            let Some(signal) = parse_message(message) else {
                stats.suppressed += 1;
                continue;
            };
            stats.parsed += 1;

            let signal = assess(signal);
            let score = signal.quality.as_ref().map_or(0, |q| q.score);
            if let Some(min) = self.config.min_quality_score {
                if score < min {
                    tracing::debug!("Signal {} scored {} < {}, dropped", signal.id, score, min);
                    stats.below_threshold += 1;
                    continue;
                }
            }

            if self.store.seen(&signal.id) || !batch_ids.insert(signal.id.clone()) {
                tracing::debug!("Signal {} already delivered", signal.id);
                stats.duplicates += 1;
                continue;
            }

            signals.push(signal);
        }

        let now = Utc::now();
        signals.sort_by_key(|s| normalize_timestamp_millis(s.timestamp, now));
        stats.emitted = signals.len();
        (signals, stats)
    }

    /// Fetch one batch from `source` and deliver it to `sink`
    pub async fn run_once(
        &mut self,
        source: &dyn MessageSource,
        sink: &dyn SignalSink,
    ) -> Result<BatchStats> {
        let messages = source.fetch().await?;
        tracing::debug!("Fetched {} messages from {}", messages.len(), source.name());
        Ok(self.process(&messages, sink).await)
    }

    /// Deliver an already-fetched batch.
    ///
    /// Ids are marked only after the sink accepts them, so a failed
    /// delivery is retried on the next run.
    pub async fn process(&mut self, messages: &[RawMessage], sink: &dyn SignalSink) -> BatchStats {
        let (signals, mut stats) = self.prepare(messages);
        let offset = zone(self.config.utc_offset_hours);
        let delay = Duration::from_millis(self.config.delivery_delay_ms);
        let now = Utc::now();

        for (i, signal) in signals.iter().enumerate() {
            let outbound = to_outbound(signal, offset, now);
            match sink.deliver(&outbound).await {
                Ok(()) => {
                    self.store.mark_seen(signal.id.clone());
                    stats.delivered += 1;
                }
                Err(e) => {
                    tracing::error!("Delivery of {} via {} failed: {}", signal.id, sink.name(), e);
                    stats.delivery_failed += 1;
                }
            }

            if !delay.is_zero() && i + 1 < signals.len() {
                tokio::time::sleep(delay).await;
            }
        }

        let retain = self.store.retain();
        self.store.evict_oldest(retain);
        if stats.delivered > 0 {
            self.store.persist();
        }

        tracing::info!(
            "Batch done: received={} blocked={} suppressed={} duplicates={} below_threshold={} delivered={} failed={}",
            stats.received,
            stats.blocked,
            stats.suppressed,
            stats.duplicates,
            stats.below_threshold,
            stats.delivered,
            stats.delivery_failed
        );
        stats
    }
}
