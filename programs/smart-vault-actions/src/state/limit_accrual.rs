use crate::components::price_resolver::RateSource;
use crate::error::{ConfigurationError, PolicyError};
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Position of a [`LimitState`] in its reset cycle at a given time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitStatus {
    /// No capacity configured; every amount accrues.
    Inactive,
    /// `now < next_reset_time`; `accrued` counts against capacity.
    WindowOpen,
    /// `now >= next_reset_time`; the next `record` starts a new window.
    WindowElapsed,
}

/// Rolling volume limit measured in `accounting_asset` units.
///
/// # Invariants
///
/// - `capacity == 0` iff `period == 0` iff `next_reset_time == 0`.
/// - `accrued <= capacity` while the window is open, except after a
///   reconfiguration lowered the capacity below it. Such a window accepts
///   nothing more until it resets.
/// - `next_reset_time` only moves through `configure` on an inactive or
///   elapsed limit, or through a reset in `record`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable, AnchorSerialize, AnchorDeserialize,
)]
#[repr(C)]
pub struct LimitState {
    pub accounting_asset: Pubkey,
    pub capacity: u64,
    /// Window length in seconds.
    pub period: u64,
    pub accrued: u64,
    pub next_reset_time: i64,
}

impl LimitState {
    #[inline(always)]
    pub fn is_active(&self) -> bool {
        self.capacity != 0 && self.next_reset_time != 0
    }

    pub fn status(&self, now: i64) -> LimitStatus {
        if !self.is_active() {
            LimitStatus::Inactive
        } else if now >= self.next_reset_time {
            LimitStatus::WindowElapsed
        } else {
            LimitStatus::WindowOpen
        }
    }

    /// Volume already used in the window that is current at `now`.
    pub fn effective_accrued(&self, now: i64) -> u64 {
        match self.status(now) {
            LimitStatus::WindowOpen => self.accrued,
            LimitStatus::Inactive | LimitStatus::WindowElapsed => 0,
        }
    }

    /// Capacity still available at `now`.
    pub fn remaining(&self, now: i64) -> u64 {
        match self.status(now) {
            LimitStatus::Inactive => u64::MAX,
            _ => self.capacity.saturating_sub(self.effective_accrued(now)),
        }
    }

    /// Reconfigures the limit.
    ///
    /// A first configuration, or one made after the window elapsed, starts
    /// a fresh window at `now`. Reconfiguring an open window keeps its reset
    /// time and rescales `accrued` into the new accounting asset without
    /// clamping it. A zero capacity and period pair disables the limit.
    pub fn configure(
        &mut self,
        accounting_asset: Pubkey,
        capacity: u64,
        period: u64,
        now: i64,
        prices: &dyn RateSource,
    ) -> Result<()> {
        require!(
            (capacity == 0) == (period == 0),
            ConfigurationError::InvalidLimitParameters
        );

        if capacity == 0 {
            *self = Self::default();
            return Ok(());
        }

        require!(
            accounting_asset != Pubkey::default(),
            ConfigurationError::ZeroAddress
        );
        let period_secs =
            i64::try_from(period).map_err(|_| error!(ConfigurationError::InvalidLimitParameters))?;

        let next = match self.status(now) {
            LimitStatus::WindowOpen => {
                let accrued =
                    prices.convert(self.accrued, &self.accounting_asset, &accounting_asset)?;
                Self {
                    accounting_asset,
                    capacity,
                    period,
                    accrued,
                    next_reset_time: self.next_reset_time,
                }
            }
            LimitStatus::Inactive | LimitStatus::WindowElapsed => Self {
                accounting_asset,
                capacity,
                period,
                accrued: 0,
                next_reset_time: now
                    .checked_add(period_secs)
                    .ok_or(ConfigurationError::InvalidLimitParameters)?,
            },
        };

        *self = next;
        Ok(())
    }

    /// Read-only check that `amount` of `asset` still fits at `now`.
    pub fn can_accrue(
        &self,
        asset: &Pubkey,
        amount: u64,
        now: i64,
        prices: &dyn RateSource,
    ) -> Result<bool> {
        if !self.is_active() {
            return Ok(true);
        }

        let converted = prices.convert(amount, asset, &self.accounting_asset)?;
        Ok(self
            .effective_accrued(now)
            .checked_add(converted)
            .is_some_and(|total| total <= self.capacity))
    }

    /// Accrues `amount` of `asset`, resetting first when the window elapsed.
    /// State is only written when the amount fits.
    pub fn record(
        &mut self,
        asset: &Pubkey,
        amount: u64,
        now: i64,
        prices: &dyn RateSource,
    ) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }

        let converted = prices.convert(amount, asset, &self.accounting_asset)?;

        let (base, next_reset_time) = match self.status(now) {
            LimitStatus::WindowElapsed => (0, self.advanced_reset_time(now)?),
            _ => (self.accrued, self.next_reset_time),
        };

        let accrued = base
            .checked_add(converted)
            .filter(|total| *total <= self.capacity)
            .ok_or(PolicyError::SwapLimitExceeded)?;

        self.accrued = accrued;
        self.next_reset_time = next_reset_time;
        Ok(())
    }

    /// Next reset time after the window elapsed at `now`: one period past the
    /// previous boundary, or a full period from `now` when more than one
    /// period went by.
    fn advanced_reset_time(&self, now: i64) -> Result<i64> {
        let period = i64::try_from(self.period)
            .map_err(|_| error!(ConfigurationError::InvalidLimitParameters))?;
        let following = self
            .next_reset_time
            .checked_add(period)
            .ok_or(ConfigurationError::InvalidLimitParameters)?;

        if now < following {
            Ok(following)
        } else {
            now.checked_add(period)
                .ok_or_else(|| error!(ConfigurationError::InvalidLimitParameters))
        }
    }
}
