//! Interstitial cadence controller.
//!
//! One [`AdController`] is constructed per session and shared by handle. It
//! owns a single ad slot that cycles
//!
//! ```text
//! EMPTY --preload--> LOADING --load done--> READY --cadence--> SHOWING
//!   ^                                                              |
//!   +------------------------- dismiss (then preload) -------------+
//! ```
//!
//! Every entry point takes the slot lock for its whole mutation, including
//! listener delivery, so transitions never interleave. The only suspending
//! work is the load itself, which runs on a spawned task and re-enters
//! through the same lock when it finishes.

use crate::config::AdsConfig;
use crate::error::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::broadcast;

/// Google's public test unit for Android interstitials.
pub const TEST_INTERSTITIAL_ID: &str = "ca-app-pub-3940256099942544/1033173712";

pub const DEFAULT_FREQUENCY_CAP: u32 = 3;
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(1500);

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

pub type LoadFuture = BoxFuture<'static, Result<()>>;

/// Source of ad payloads. A real deployment wraps the ad SDK's async load;
/// tests substitute something deterministic.
pub trait AdLoader: Send + Sync + 'static {
    fn load(&self) -> LoadFuture;
}

/// Stands in for a network fill: succeeds after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedLoader {
    delay: Duration,
}

impl SimulatedLoader {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedLoader {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_DELAY)
    }
}

impl AdLoader for SimulatedLoader {
    fn load(&self) -> LoadFuture {
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Empty,
    Loading,
    Ready,
    Showing,
}

#[derive(Debug, Default)]
struct AdSlot {
    loaded: bool,
    loading: bool,
    showing: bool,
    trigger_count: u32,
}

impl AdSlot {
    fn state(&self) -> SlotState {
        if self.showing {
            SlotState::Showing
        } else if self.loaded {
            SlotState::Ready
        } else if self.loading {
            SlotState::Loading
        } else {
            SlotState::Empty
        }
    }
}

/// Point-in-time view of the slot for UI hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub state: SlotState,
    pub trigger_count: u32,
    pub frequency_cap: u32,
}

/// What a single `track_action` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TrackOutcome {
    /// An ad is on screen; the action does not count.
    Ignored,
    /// Counted, cap not reached yet.
    Counted { count: u32 },
    /// Cap reached and the ready ad went on screen.
    Shown,
    /// Cap reached but nothing was loaded. The count is kept so the next
    /// action retries, and a load was requested.
    Skipped { count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdEvent {
    Show,
    Hide,
}

impl AdEvent {
    pub fn is_show(self) -> bool {
        matches!(self, AdEvent::Show)
    }
}

impl From<bool> for AdEvent {
    fn from(shown: bool) -> Self {
        if shown {
            AdEvent::Show
        } else {
            AdEvent::Hide
        }
    }
}

// ---------------------------------------------------------------------------
// AdController
// ---------------------------------------------------------------------------

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

struct Inner {
    slot: Mutex<AdSlot>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    events: broadcast::Sender<AdEvent>,
    loader: Box<dyn AdLoader>,
    frequency_cap: u32,
}

/// Shared handle to the session's ad slot. Clones refer to the same slot.
#[derive(Clone)]
pub struct AdController {
    inner: Arc<Inner>,
}

impl AdController {
    /// Build a controller and immediately start loading the first ad.
    ///
    /// The load runs on the current tokio runtime. Outside a runtime the slot
    /// stays empty until the next preload is requested from inside one.
    /// A cap of 0 is treated as 1.
    pub fn new(loader: impl AdLoader, frequency_cap: u32) -> Self {
        let (events, _) = broadcast::channel(16);
        let controller = Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(AdSlot::default()),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                events,
                loader: Box::new(loader),
                frequency_cap: frequency_cap.max(1),
            }),
        };
        controller.preload_ad();
        controller
    }

    /// Controller backed by [`SimulatedLoader`] with the configured cadence.
    pub fn from_config(config: &AdsConfig) -> Self {
        Self::new(
            SimulatedLoader::new(Duration::from_millis(config.load_delay_ms)),
            config.frequency_cap,
        )
    }

    pub fn frequency_cap(&self) -> u32 {
        self.inner.frequency_cap
    }

    /// Record one user action and show an ad if the cadence is due.
    pub fn track_action(&self) -> TrackOutcome {
        let mut slot = self.lock_slot();
        if slot.showing {
            tracing::debug!("action ignored: ad on screen");
            return TrackOutcome::Ignored;
        }

        slot.trigger_count = slot.trigger_count.saturating_add(1);
        let count = slot.trigger_count;
        tracing::debug!("action tracked: {count}/{}", self.inner.frequency_cap);

        if count < self.inner.frequency_cap {
            return TrackOutcome::Counted { count };
        }
        self.attempt_show(&mut slot)
    }

    /// Start loading the next ad unless one is loaded or already in flight.
    pub fn preload_ad(&self) {
        let mut slot = self.lock_slot();
        self.begin_load(&mut slot);
    }

    /// Take the ad off screen and start refilling the slot.
    ///
    /// Returns `false` when nothing was showing; in that case no listener is
    /// notified, but the refill is still requested.
    pub fn dismiss_ad(&self) -> bool {
        let mut slot = self.lock_slot();
        let was_showing = slot.showing;
        if was_showing {
            slot.showing = false;
            tracing::info!("interstitial dismissed");
            self.notify(false);
        } else {
            tracing::debug!("dismiss ignored: no ad showing");
        }
        self.begin_load(&mut slot);
        was_showing
    }

    /// Register a listener called with `true` when an ad goes on screen and
    /// `false` when it is dismissed.
    ///
    /// Listeners run synchronously while the slot is locked and must not call
    /// back into the controller; spawn a task for follow-up work.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.lock_listeners().push((id, Arc::new(listener)));
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Channel view of the same notifications, for message-passing consumers.
    pub fn watch(&self) -> broadcast::Receiver<AdEvent> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        let slot = self.lock_slot();
        SlotSnapshot {
            state: slot.state(),
            trigger_count: slot.trigger_count,
            frequency_cap: self.inner.frequency_cap,
        }
    }

    pub fn is_showing(&self) -> bool {
        self.lock_slot().showing
    }

    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    // -----------------------------------------------------------------------
    // Internals (caller holds the slot lock)
    // -----------------------------------------------------------------------

    fn attempt_show(&self, slot: &mut AdSlot) -> TrackOutcome {
        if slot.loaded {
            tracing::info!("showing interstitial");
            slot.showing = true;
            slot.loaded = false;
            slot.trigger_count = 0;
            self.notify(true);
            TrackOutcome::Shown
        } else {
            tracing::debug!("ad not ready, skipping this cadence");
            self.begin_load(slot);
            TrackOutcome::Skipped {
                count: slot.trigger_count,
            }
        }
    }

    fn begin_load(&self, slot: &mut AdSlot) {
        if slot.loaded || slot.loading {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime available, ad preload deferred");
            return;
        };

        tracing::info!("pre-loading background ad");
        slot.loading = true;
        let load = self.inner.loader.load();
        let controller = self.clone();
        handle.spawn(async move {
            let result = load.await;
            controller.finish_load(result);
        });
    }

    fn finish_load(&self, result: Result<()>) {
        let mut slot = self.lock_slot();
        slot.loading = false;
        match result {
            Ok(()) => {
                slot.loaded = true;
                tracing::info!("ad loaded and ready");
            }
            Err(e) => tracing::warn!("ad load failed, slot left empty: {e}"),
        }
    }

    fn notify(&self, shown: bool) {
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(shown);
        }
        // No receivers is fine.
        let _ = self.inner.events.send(AdEvent::from(shown));
    }

    fn lock_slot(&self) -> MutexGuard<'_, AdSlot> {
        self.inner
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AdController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdController")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Unsubscribe handle returned by [`AdController::subscribe`]. The listener
/// stays registered until this is dropped or [`Subscription::unsubscribe`]
/// is called.
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;
    use std::sync::atomic::AtomicUsize;

    const LOAD: Duration = Duration::from_millis(1500);

    /// Simulated loader that counts requests and can fail the first one.
    struct CountingLoader {
        calls: Arc<AtomicUsize>,
        fail_first: bool,
    }

    impl AdLoader for CountingLoader {
        fn load(&self) -> LoadFuture {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail_first && n == 0;
            Box::pin(async move {
                tokio::time::sleep(LOAD).await;
                if fail {
                    Err(LaunchError::AdLoad("no fill".into()))
                } else {
                    Ok(())
                }
            })
        }
    }

    fn counting(fail_first: bool) -> (AdController, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = CountingLoader {
            calls: Arc::clone(&calls),
            fail_first,
        };
        (AdController::new(loader, DEFAULT_FREQUENCY_CAP), calls)
    }

    fn record(controller: &AdController) -> (Subscription, Arc<Mutex<Vec<bool>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = controller.subscribe(move |shown| sink.lock().unwrap().push(shown));
        (sub, seen)
    }

    async fn finish_load() {
        tokio::time::sleep(LOAD + Duration::from_millis(100)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn construction_starts_loading_then_becomes_ready() {
        let controller = AdController::new(SimulatedLoader::default(), 3);
        assert_eq!(controller.snapshot().state, SlotState::Loading);
        finish_load().await;
        assert_eq!(controller.snapshot().state, SlotState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn third_action_shows_ready_ad_and_resets_count() {
        let controller = AdController::new(SimulatedLoader::default(), 3);
        finish_load().await;
        let (_sub, seen) = record(&controller);

        assert_eq!(controller.track_action(), TrackOutcome::Counted { count: 1 });
        assert_eq!(controller.track_action(), TrackOutcome::Counted { count: 2 });
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(controller.track_action(), TrackOutcome::Shown);

        assert_eq!(*seen.lock().unwrap(), vec![true]);
        let snap = controller.snapshot();
        assert_eq!(snap.state, SlotState::Showing);
        assert_eq!(snap.trigger_count, 0);
        assert!(controller.is_showing());
    }

    #[tokio::test(start_paused = true)]
    async fn cap_reached_while_loading_keeps_count_and_retries() {
        let (controller, calls) = counting(false);
        let (_sub, seen) = record(&controller);

        controller.track_action();
        controller.track_action();
        assert_eq!(controller.track_action(), TrackOutcome::Skipped { count: 3 });

        let snap = controller.snapshot();
        assert_eq!(snap.state, SlotState::Loading);
        assert_eq!(snap.trigger_count, 3);
        // the in-flight load is reused, not duplicated
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(seen.lock().unwrap().is_empty());

        finish_load().await;
        assert_eq!(controller.track_action(), TrackOutcome::Shown);
        assert_eq!(*seen.lock().unwrap(), vec![true]);
        assert_eq!(controller.snapshot().trigger_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn skip_on_empty_slot_requests_a_new_load() {
        let (controller, calls) = counting(true);
        finish_load().await;
        // first load failed
        assert_eq!(controller.snapshot().state, SlotState::Empty);

        controller.track_action();
        controller.track_action();
        assert_eq!(controller.track_action(), TrackOutcome::Skipped { count: 3 });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(controller.snapshot().state, SlotState::Loading);

        // still short of a load: the fourth action misses again, count grows
        assert_eq!(controller.track_action(), TrackOutcome::Skipped { count: 4 });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn actions_while_showing_do_not_count() {
        let controller = AdController::new(SimulatedLoader::default(), 3);
        finish_load().await;
        for _ in 0..3 {
            controller.track_action();
        }
        assert_eq!(controller.track_action(), TrackOutcome::Ignored);
        assert_eq!(controller.track_action(), TrackOutcome::Ignored);
        assert_eq!(controller.snapshot().trigger_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slot_is_single_use() {
        let (controller, calls) = counting(false);
        finish_load().await;
        for _ in 0..3 {
            controller.track_action();
        }
        assert!(controller.dismiss_ad());

        // refill requested but not finished: the next cadence cannot show
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        for _ in 0..2 {
            controller.track_action();
        }
        assert_eq!(controller.track_action(), TrackOutcome::Skipped { count: 3 });

        finish_load().await;
        assert_eq!(controller.track_action(), TrackOutcome::Shown);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_hides_notifies_and_refills() {
        let (controller, calls) = counting(false);
        finish_load().await;
        let (_sub, seen) = record(&controller);
        for _ in 0..3 {
            controller.track_action();
        }

        assert!(controller.dismiss_ad());
        assert!(!controller.is_showing());
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
        assert_eq!(controller.snapshot().state, SlotState::Loading);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        finish_load().await;
        assert_eq!(controller.snapshot().state, SlotState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_without_ad_is_ignored() {
        let (controller, calls) = counting(false);
        let (_sub, seen) = record(&controller);

        assert!(!controller.dismiss_ad());
        assert!(seen.lock().unwrap().is_empty());
        assert!(!controller.is_showing());
        // load already in flight, so no duplicate request
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn preload_is_idempotent() {
        let (controller, calls) = counting(false);
        controller.preload_ad();
        controller.preload_ad();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        finish_load().await;
        controller.preload_ad();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.snapshot().state, SlotState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn every_subscriber_sees_the_same_event() {
        let controller = AdController::new(SimulatedLoader::default(), 3);
        finish_load().await;
        let (_a, seen_a) = record(&controller);
        let (_b, seen_b) = record(&controller);
        let mut rx = controller.watch();

        for _ in 0..3 {
            controller.track_action();
        }
        assert_eq!(*seen_a.lock().unwrap(), vec![true]);
        assert_eq!(*seen_b.lock().unwrap(), vec![true]);
        assert_eq!(rx.recv().await.unwrap(), AdEvent::Show);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_subscription_unsubscribes() {
        let controller = AdController::new(SimulatedLoader::default(), 3);
        finish_load().await;
        let (sub, seen) = record(&controller);
        assert_eq!(controller.listener_count(), 1);

        sub.unsubscribe();
        assert_eq!(controller.listener_count(), 0);

        for _ in 0..3 {
            controller.track_action();
        }
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_cap_changes_cadence() {
        let controller = AdController::new(SimulatedLoader::default(), 1);
        finish_load().await;
        assert_eq!(controller.track_action(), TrackOutcome::Shown);

        let zero = AdController::new(SimulatedLoader::default(), 0);
        assert_eq!(zero.frequency_cap(), 1);
    }

    #[test]
    fn construction_outside_runtime_leaves_slot_empty() {
        let controller = AdController::new(SimulatedLoader::default(), 3);
        assert_eq!(controller.snapshot().state, SlotState::Empty);
        controller.track_action();
        controller.track_action();
        assert_eq!(controller.track_action(), TrackOutcome::Skipped { count: 3 });
    }

    #[test]
    fn count_saturates_when_slot_never_fills() {
        let controller = AdController::new(SimulatedLoader::default(), 3);
        controller.lock_slot().trigger_count = u32::MAX - 1;
        assert_eq!(
            controller.track_action(),
            TrackOutcome::Skipped { count: u32::MAX }
        );
        assert_eq!(
            controller.track_action(),
            TrackOutcome::Skipped { count: u32::MAX }
        );
        assert_eq!(controller.snapshot().trigger_count, u32::MAX);
    }

    #[test]
    fn track_outcome_serializes_with_tag() {
        let json = serde_json::to_value(TrackOutcome::Counted { count: 2 }).unwrap();
        assert_eq!(json["outcome"], "counted");
        assert_eq!(json["count"], 2);
        let json = serde_json::to_value(TrackOutcome::Shown).unwrap();
        assert_eq!(json["outcome"], "shown");
    }
}
