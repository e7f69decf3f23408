use crate::components::price_resolver::RateSource;
use crate::error::{ConfigurationError, PolicyError};
use crate::utils::constants::MAX_CUSTOM_THRESHOLDS;
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Value band an action amount must fall into, measured in
/// `accounting_asset` units. `maximum == 0` means no upper bound.
///
/// A threshold whose accounting asset is the default key is unset and must
/// be entirely zero.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable, AnchorSerialize, AnchorDeserialize,
)]
#[repr(C)]
pub struct Threshold {
    pub accounting_asset: Pubkey,
    pub minimum: u64,
    pub maximum: u64,
}

impl Threshold {
    pub const UNSET: Self = Self {
        accounting_asset: Pubkey::new_from_array([0u8; 32]),
        minimum: 0,
        maximum: 0,
    };

    #[inline(always)]
    pub fn is_set(&self) -> bool {
        self.accounting_asset != Pubkey::default()
    }

    pub fn validate_band(&self) -> Result<()> {
        if !self.is_set() {
            require!(*self == Self::UNSET, ConfigurationError::ZeroAddress);
            return Ok(());
        }

        require!(
            self.maximum == 0 || self.minimum <= self.maximum,
            ConfigurationError::InvalidThresholdBand
        );
        Ok(())
    }

    /// Checks an amount already expressed in accounting-asset units.
    pub fn check(&self, converted: u64) -> Result<()> {
        require!(converted >= self.minimum, PolicyError::ThresholdNotMet);
        require!(
            self.maximum == 0 || converted <= self.maximum,
            PolicyError::ThresholdExceeded
        );
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct CustomThreshold {
    pub asset: Pubkey,
    pub threshold: Threshold,
}

/// Default threshold plus per-asset overrides. An override shadows the
/// default for its own asset only.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct ThresholdGuard {
    pub default_threshold: Threshold,
    pub custom: [CustomThreshold; MAX_CUSTOM_THRESHOLDS],
    pub custom_count: u8,
    pub _padding: [u8; 7],
}

impl ThresholdGuard {
    pub fn custom_thresholds(&self) -> &[CustomThreshold] {
        &self.custom[..self.custom_count as usize]
    }

    pub fn custom_for(&self, asset: &Pubkey) -> Option<&Threshold> {
        self.custom_thresholds()
            .iter()
            .find(|entry| entry.asset == *asset)
            .map(|entry| &entry.threshold)
    }

    /// Threshold that applies to `asset`, if any.
    pub fn threshold_for(&self, asset: &Pubkey) -> Option<Threshold> {
        self.custom_for(asset)
            .copied()
            .or_else(|| self.default_threshold.is_set().then_some(self.default_threshold))
    }

    /// Replaces the default threshold. Returns the previous value.
    pub fn set_default(&mut self, threshold: Threshold) -> Result<Threshold> {
        threshold.validate_band()?;
        let previous = self.default_threshold;
        self.default_threshold = threshold;
        Ok(previous)
    }

    /// Sets or, with [`Threshold::UNSET`], removes the override for `asset`.
    /// Returns the previous override (unset when there was none).
    pub fn set_custom(&mut self, asset: &Pubkey, threshold: Threshold) -> Result<Threshold> {
        require!(*asset != Pubkey::default(), ConfigurationError::ZeroAddress);
        threshold.validate_band()?;

        let count = self.custom_count as usize;
        let position = self.custom_thresholds().iter().position(|entry| entry.asset == *asset);

        match (position, threshold.is_set()) {
            (Some(index), true) => {
                let previous = self.custom[index].threshold;
                self.custom[index].threshold = threshold;
                Ok(previous)
            }
            (Some(index), false) => {
                let previous = self.custom[index].threshold;
                self.custom[index] = self.custom[count - 1];
                self.custom[count - 1] = CustomThreshold::default();
                self.custom_count -= 1;
                Ok(previous)
            }
            (None, true) => {
                require!(
                    count < MAX_CUSTOM_THRESHOLDS,
                    ConfigurationError::CustomThresholdTableFull
                );
                self.custom[count] = CustomThreshold {
                    asset: *asset,
                    threshold,
                };
                self.custom_count += 1;
                Ok(Threshold::UNSET)
            }
            (None, false) => Ok(Threshold::UNSET),
        }
    }

    /// Validates `amount` of `asset` against the applicable threshold. With
    /// no threshold configured every amount passes.
    pub fn validate(&self, asset: &Pubkey, amount: u64, prices: &dyn RateSource) -> Result<()> {
        let Some(threshold) = self.threshold_for(asset) else {
            return Ok(());
        };

        let converted = prices.convert(amount, asset, &threshold.accounting_asset)?;
        threshold.check(converted)
    }
}
