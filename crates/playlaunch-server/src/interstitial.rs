//! Server-side presenter for the interstitial.
//!
//! Mirrors what a client overlay does: it listens to the controller, becomes
//! visible on `true`, and only lets the user close the ad once the unlock
//! countdown has run out.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use playlaunch_core::ads::{AdController, Subscription};
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DismissError {
    #[error("no interstitial is showing")]
    NotShowing,
    #[error("interstitial can be closed in {remaining_secs}s")]
    Locked { remaining_secs: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresenterStatus {
    pub visible: bool,
    pub can_close: bool,
    /// Whole seconds left on the countdown, rounded up. 0 when hidden.
    pub remaining_secs: u64,
}

type ShownAt = Arc<Mutex<Option<Instant>>>;

struct PresenterInner {
    ads: AdController,
    unlock_after: Duration,
    shown_at: ShownAt,
    _subscription: Subscription,
}

/// Cheap-to-clone handle; all clones share one overlay.
#[derive(Clone)]
pub struct Interstitial {
    inner: Arc<PresenterInner>,
}

impl Interstitial {
    /// Subscribe to `ads` and start tracking visibility.
    pub fn attach(ads: AdController, unlock_after: Duration) -> Self {
        let shown_at: ShownAt = Arc::new(Mutex::new(None));
        let listener_state = Arc::clone(&shown_at);
        let subscription = ads.subscribe(move |shown| {
            let mut at = lock(&listener_state);
            *at = shown.then(Instant::now);
        });
        Self {
            inner: Arc::new(PresenterInner {
                ads,
                unlock_after,
                shown_at,
                _subscription: subscription,
            }),
        }
    }

    pub fn is_visible(&self) -> bool {
        lock(&self.inner.shown_at).is_some()
    }

    /// Time left before the close button unlocks; `None` while hidden.
    pub fn remaining(&self) -> Option<Duration> {
        let shown_at = (*lock(&self.inner.shown_at))?;
        Some(self.inner.unlock_after.saturating_sub(shown_at.elapsed()))
    }

    pub fn status(&self) -> PresenterStatus {
        match self.remaining() {
            None => PresenterStatus {
                visible: false,
                can_close: false,
                remaining_secs: 0,
            },
            Some(left) => PresenterStatus {
                visible: true,
                can_close: left.is_zero(),
                remaining_secs: ceil_secs(left),
            },
        }
    }

    /// Close the ad if the countdown has finished. On success the controller
    /// is told to dismiss, which hides this presenter and starts the refill.
    pub fn try_dismiss(&self) -> Result<(), DismissError> {
        match self.remaining() {
            None => Err(DismissError::NotShowing),
            Some(left) if !left.is_zero() => Err(DismissError::Locked {
                remaining_secs: ceil_secs(left),
            }),
            Some(_) => {
                if self.inner.ads.dismiss_ad() {
                    Ok(())
                } else {
                    Err(DismissError::NotShowing)
                }
            }
        }
    }
}

impl std::fmt::Debug for Interstitial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interstitial")
            .field("unlock_after", &self.inner.unlock_after)
            .field("status", &self.status())
            .finish()
    }
}

fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

fn lock(state: &ShownAt) -> MutexGuard<'_, Option<Instant>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playlaunch_core::ads::{SimulatedLoader, SlotState};

    const LOAD: Duration = Duration::from_millis(1500);

    async fn showing_presenter(unlock: Duration) -> (AdController, Interstitial) {
        let ads = AdController::new(SimulatedLoader::new(LOAD), 3);
        let presenter = Interstitial::attach(ads.clone(), unlock);
        tokio::time::sleep(Duration::from_millis(1600)).await;
        for _ in 0..3 {
            ads.track_action();
        }
        assert!(presenter.is_visible());
        (ads, presenter)
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_until_an_ad_is_shown() {
        let ads = AdController::new(SimulatedLoader::new(LOAD), 3);
        let presenter = Interstitial::attach(ads.clone(), Duration::from_secs(3));
        assert!(!presenter.is_visible());
        assert_eq!(presenter.try_dismiss(), Err(DismissError::NotShowing));
        assert_eq!(presenter.status().remaining_secs, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_locks_close_for_unlock_period() {
        let (ads, presenter) = showing_presenter(Duration::from_secs(3)).await;

        assert_eq!(
            presenter.try_dismiss(),
            Err(DismissError::Locked { remaining_secs: 3 })
        );

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(
            presenter.try_dismiss(),
            Err(DismissError::Locked { remaining_secs: 2 })
        );
        assert!(!presenter.status().can_close);

        tokio::time::sleep(Duration::from_millis(1800)).await;
        assert!(presenter.status().can_close);
        assert_eq!(presenter.try_dismiss(), Ok(()));

        assert!(!presenter.is_visible());
        assert!(!ads.is_showing());
        assert_eq!(ads.snapshot().state, SlotState::Loading);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_unlock_allows_immediate_close() {
        let (ads, presenter) = showing_presenter(Duration::ZERO).await;
        assert!(presenter.status().can_close);
        assert_eq!(presenter.try_dismiss(), Ok(()));
        assert_eq!(presenter.try_dismiss(), Err(DismissError::NotShowing));
        assert!(!ads.is_showing());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_outside_presenter_hides_it() {
        let (ads, presenter) = showing_presenter(Duration::from_secs(3)).await;
        assert!(ads.dismiss_ad());
        assert!(!presenter.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_presenter_unsubscribes() {
        let ads = AdController::new(SimulatedLoader::new(LOAD), 3);
        let presenter = Interstitial::attach(ads.clone(), Duration::from_secs(3));
        assert_eq!(ads.listener_count(), 1);
        let clone = presenter.clone();
        drop(presenter);
        assert_eq!(ads.listener_count(), 1);
        drop(clone);
        assert_eq!(ads.listener_count(), 0);
    }

    #[test]
    fn ceil_secs_rounds_partial_seconds_up() {
        assert_eq!(ceil_secs(Duration::ZERO), 0);
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
        assert_eq!(ceil_secs(Duration::from_secs(2)), 2);
        assert_eq!(ceil_secs(Duration::from_millis(2001)), 3);
    }
}
