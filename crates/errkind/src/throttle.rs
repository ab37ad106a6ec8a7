//! Capture throttle
//!
//! Rate-limits stack capture. Two states:
//!
//! - **Unthrottled** (initial): every [`Throttle::try_consume`] succeeds.
//! - **Throttled**: a budget of `max_per_period` captures is decremented
//!   atomically; a background thread overwrites it with `max_per_period`
//!   once per period.
//!
//! # Design
//!
//! ```text
//! budget: ArcSwapOption<Budget>        None        -> unthrottled
//!                                      Some(b)     -> b.remaining.fetch_sub(1)
//!
//! reset thread: select! { tick(period) -> b.refill(),
//!                         stop        -> exit }
//! ```
//!
//! Each activation installs a new `Budget`. A refill racing with
//! `deactivate` lands on the detached budget and is never observed.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use crossbeam_channel::{bounded, select, tick, Sender};

use crate::error::{ConfigError, ConfigResult};

const THREAD_NAME: &str = "errkind-throttle";

static GLOBAL: Throttle = Throttle::new();

/// The process-wide throttle consulted by [`Template::instantiate`](crate::Template::instantiate).
pub fn global() -> &'static Throttle {
    &GLOBAL
}

/// Throttle stack capture process-wide to `max_per_period` captures per
/// `period`. Replaces any previous setting.
pub fn throttle(period: Duration, max_per_period: u32) -> ConfigResult<()> {
    GLOBAL.activate(period, max_per_period)
}

/// Stop throttling process-wide; every later occurrence captures frames.
pub fn unthrottle() {
    GLOBAL.deactivate()
}

struct Budget {
    remaining: AtomicI64,
    max: i64,
}

impl Budget {
    fn new(max: i64) -> Self {
        Self {
            remaining: AtomicI64::new(max),
            max,
        }
    }

    fn refill(&self) {
        self.remaining.store(self.max, Ordering::Relaxed);
    }
}

/// Handle to a running reset thread. Dropping `stop` disconnects the
/// channel the thread selects on.
struct Ticker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn shutdown(self) {
        drop(self.stop);
        if self.handle.join().is_err() {
            tracing::warn!("throttle reset thread panicked");
        }
    }
}

/// Rate limiter for stack capture.
///
/// `try_consume` is lock-free; `activate`/`deactivate` serialize on an
/// internal mutex.
pub struct Throttle {
    budget: ArcSwapOption<Budget>,
    ticker: Mutex<Option<Ticker>>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new()
    }
}

impl Throttle {
    /// An unthrottled instance.
    pub const fn new() -> Self {
        Self {
            budget: ArcSwapOption::const_empty(),
            ticker: Mutex::new(None),
        }
    }

    /// Switch to the throttled state with a fresh budget of
    /// `max_per_period` and start the periodic reset.
    ///
    /// A previously running reset thread is stopped first. If the new
    /// thread cannot be spawned the throttle is left unthrottled.
    ///
    /// A zero `period` is rejected with [`ConfigError::ZeroPeriod`] and
    /// leaves the current state untouched: an earlier throttle keeps its
    /// budget and its reset thread.
    pub fn activate(&self, period: Duration, max_per_period: u32) -> ConfigResult<()> {
        if period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }

        let mut ticker = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = ticker.take() {
            previous.shutdown();
        }

        let budget = Arc::new(Budget::new(i64::from(max_per_period)));
        let (stop, stopped) = bounded::<()>(0);
        let refilled = Arc::clone(&budget);

        let spawned = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || {
                let ticks = tick(period);
                loop {
                    select! {
                        recv(ticks) -> _ => {
                            refilled.refill();
                            tracing::trace!(max = refilled.max, "capture budget refilled");
                        }
                        recv(stopped) -> _ => break,
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                self.budget.store(Some(budget));
                *ticker = Some(Ticker { stop, handle });
                tracing::debug!(?period, max_per_period, "stack capture throttled");
                Ok(())
            }
            Err(err) => {
                self.budget.store(None);
                tracing::warn!(error = %err, "could not start throttle reset thread");
                Err(ConfigError::Spawn(err))
            }
        }
    }

    /// Stop the periodic reset and return to the unthrottled state.
    ///
    /// Safe to call when never activated.
    pub fn deactivate(&self) {
        let mut ticker = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        self.budget.store(None);
        if let Some(running) = ticker.take() {
            running.shutdown();
            tracing::debug!("stack capture unthrottled");
        }
    }

    /// Take one unit of capture budget.
    ///
    /// Always true when unthrottled. When throttled, true iff the
    /// decremented budget is still non-negative.
    #[inline]
    pub fn try_consume(&self) -> bool {
        match &*self.budget.load() {
            None => true,
            Some(budget) => budget.remaining.fetch_sub(1, Ordering::Relaxed) > 0,
        }
    }

    /// True while throttled.
    pub fn is_active(&self) -> bool {
        self.budget.load().is_some()
    }

    /// Remaining budget in the current period, `None` when unthrottled.
    /// Never below zero.
    pub fn remaining(&self) -> Option<i64> {
        let budget = self.budget.load();
        (*budget)
            .as_ref()
            .map(|b| b.remaining.load(Ordering::Relaxed).max(0))
    }
}

impl Drop for Throttle {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("active", &self.is_active())
            .field("remaining", &self.remaining())
            .finish()
    }
}
