use dashmap::DashMap;
use std::time::Instant;
use tracing::callsite::Identifier;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::config::Sampling;

/// Drops repetitive records per callsite.
///
/// Within each one-second tick a callsite emits its first `initial` records,
/// then every `thereafter`-th one. Without a policy every record passes.
pub struct SamplingLayer {
    policy: Option<Sampling>,
    counters: DashMap<Identifier, Counter>,
    started: Instant,
}

impl SamplingLayer {
    pub fn new(policy: Option<Sampling>) -> Self {
        Self {
            policy,
            counters: DashMap::new(),
            started: Instant::now(),
        }
    }
}

impl<S: Subscriber> Layer<S> for SamplingLayer {
    fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
        let Some(policy) = &self.policy else {
            return true;
        };
        let tick = self.started.elapsed().as_secs();
        self.counters
            .entry(event.metadata().callsite())
            .or_default()
            .observe(tick, policy)
    }
}

#[derive(Debug, Default)]
struct Counter {
    tick: u64,
    seen: u64,
}

impl Counter {
    fn observe(&mut self, tick: u64, policy: &Sampling) -> bool {
        if tick != self.tick {
            self.tick = tick;
            self.seen = 0;
        }
        self.seen += 1;

        if self.seen <= policy.initial {
            return true;
        }
        policy.thereafter != 0 && (self.seen - policy.initial) % policy.thereafter == 0
    }
}
