//! Tick scheduling.
//!
//! One scheduler tick: bump the counter, then for each tracked entity that is
//! present, for each of its instances, run every component whose interval
//! divides the counter, in declaration order. Timed instances are counted down
//! by the tick rate and expired after the pass. Missed ticks are not replayed.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use world_host::{EntityId, GameHost, TaskScheduler};

use super::{AfflictionEngine, RemovalReason};

/// Clears the tick guard when dropped, also while unwinding from a panicking component.
struct TickInProgress<'a>(&'a AtomicBool);

impl Drop for TickInProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AfflictionEngine {
    /// Scheduler ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_counter.load(Ordering::SeqCst)
    }

    /// Run one scheduler tick. An overlapping call is skipped.
    pub fn tick(&self, host: &mut dyn GameHost) {
        if self
            .ticking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("affliction tick still running, skipping");
            return;
        }

        let _running = TickInProgress(&self.ticking);
        self.run_tick(host);
    }

    fn run_tick(&self, host: &mut dyn GameHost) {
        let counter = self.tick_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let tick_rate = self.settings.tick_rate();
        let mut expired: Vec<(EntityId, String)> = Vec::new();

        for entity in self.tracked_entities() {
            if !host.is_present(entity) {
                continue;
            }
            let Some(state) = self.entities.get(&entity) else {
                continue;
            };

            for id in state.ids() {
                let Some(mut instance) = state.get_mut(&id) else {
                    continue;
                };
                let definition = instance.affliction().clone();

                for component in definition.components() {
                    if component.ticks_at(counter) {
                        component.tick(host, entity, &mut instance);
                    }
                }

                if instance.tick_down(tick_rate) {
                    expired.push((entity, id));
                }
            }
        }

        for (entity, id) in expired {
            debug!(entity = %entity, affliction = %id, "affliction ran out");
            self.remove(host, entity, &id, RemovalReason::Expired);
        }
    }

    /// Register the tick loop with the host scheduler, every `tick_rate` host ticks.
    ///
    /// Returns false if the loop is already running.
    pub fn start<H>(self: &Arc<Self>, scheduler: &mut dyn TaskScheduler, host: Arc<Mutex<H>>) -> bool
    where
        H: GameHost + Send + 'static,
    {
        let mut task = self.task.lock();
        if task.is_some() {
            error!("affliction tick loop already started");
            return false;
        }

        let rate = self.settings.tick_rate();
        let engine = Arc::clone(self);
        let id = scheduler.run_timer(
            rate,
            rate,
            Box::new(move || {
                let mut world = host.lock();
                engine.tick(&mut *world);
            }),
        );
        *task = Some(id);

        info!(tick_rate = rate, "affliction tick loop started");
        true
    }

    /// Cancel the tick loop. Returns false if it was not running.
    pub fn stop(&self, scheduler: &mut dyn TaskScheduler) -> bool {
        let Some(id) = self.task.lock().take() else {
            return false;
        };
        let cancelled = scheduler.cancel(id);
        info!(ticks = self.tick_count(), "affliction tick loop stopped");
        cancelled
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }
}
