//! Per-provider usage quotas with lazily reset windows

use crate::config::ProvidersConfig;
use crate::types::ProviderName;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Usage counter for one provider
#[derive(Debug, Clone)]
struct ProviderQuota {
    limit: u32,
    used: u32,
    window: Duration,
    window_reset_at: Instant,
}

impl ProviderQuota {
    fn new(limit: u32, window: Duration, now: Instant) -> Self {
        Self {
            limit,
            used: 0,
            window,
            window_reset_at: now + window,
        }
    }

    /// Start a fresh window if the current one has passed
    fn roll_window(&mut self, now: Instant) {
        if now > self.window_reset_at {
            self.used = 0;
            self.window_reset_at = now + self.window;
        }
    }
}

/// A quota slot taken by [`QuotaTracker::try_reserve`].
///
/// The slot stays counted unless handed back with [`QuotaTracker::release`].
#[derive(Debug)]
#[must_use = "a reservation counts as usage until released"]
pub struct QuotaReservation {
    provider: ProviderName,
    window_reset_at: Instant,
}

impl QuotaReservation {
    pub fn provider(&self) -> ProviderName {
        self.provider
    }
}

/// Current state of one provider's quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaSnapshot {
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
}

/// Tracks how many calls each provider may still receive in its window.
///
/// All operations run under a single mutex, so a check and the increment that
/// follows it can never interleave with another caller's.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    quotas: Mutex<HashMap<ProviderName, ProviderQuota>>,
}

impl QuotaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with one quota per provider in `config`
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let tracker = Self::new();
        for provider in ProviderName::ALL {
            let settings = config.get(provider);
            tracker.register(provider, settings.limit, settings.window);
        }
        tracker
    }

    /// Install (or replace) the quota for a provider; the window starts now
    pub fn register(&self, provider: ProviderName, limit: u32, window: Duration) {
        let quota = ProviderQuota::new(limit, window, Instant::now());
        self.quotas.lock().insert(provider, quota);
    }

    /// Whether `provider` may be called now.
    ///
    /// Resets the window as a side effect when it has expired. Providers
    /// without a registered quota are never usable.
    pub fn can_use(&self, provider: ProviderName) -> bool {
        let now = Instant::now();
        let mut quotas = self.quotas.lock();
        match quotas.get_mut(&provider) {
            Some(quota) => {
                quota.roll_window(now);
                quota.used < quota.limit
            }
            None => false,
        }
    }

    /// Count one call against `provider`
    pub fn record_use(&self, provider: ProviderName) {
        if let Some(quota) = self.quotas.lock().get_mut(&provider) {
            quota.used = quota.used.saturating_add(1);
        }
    }

    /// Check and record in one step, returning `None` when the quota is spent
    pub fn try_reserve(&self, provider: ProviderName) -> Option<QuotaReservation> {
        let now = Instant::now();
        let mut quotas = self.quotas.lock();
        let quota = quotas.get_mut(&provider)?;
        quota.roll_window(now);
        if quota.used >= quota.limit {
            return None;
        }
        quota.used += 1;
        Some(QuotaReservation {
            provider,
            window_reset_at: quota.window_reset_at,
        })
    }

    /// Give a reserved slot back.
    ///
    /// Ignored when the window has rolled over since the reservation was
    /// taken, since the fresh window never counted it.
    pub fn release(&self, reservation: QuotaReservation) {
        let mut quotas = self.quotas.lock();
        if let Some(quota) = quotas.get_mut(&reservation.provider) {
            if quota.window_reset_at == reservation.window_reset_at {
                quota.used = quota.used.saturating_sub(1);
            }
        }
    }

    pub fn snapshot(&self, provider: ProviderName) -> Option<QuotaSnapshot> {
        let quotas = self.quotas.lock();
        quotas.get(&provider).map(|quota| QuotaSnapshot {
            limit: quota.limit,
            used: quota.used,
            remaining: quota.limit.saturating_sub(quota.used),
        })
    }
}
