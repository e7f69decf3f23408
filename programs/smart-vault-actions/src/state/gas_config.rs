use crate::error::ConfigurationError;
use crate::state::allow_list::AllowList;
use crate::utils::constants::BPS_DENOMINATOR;
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Ceilings applied to relayed executions. Zero disables a ceiling.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GasLimits {
    /// Micro-lamports per compute unit.
    pub gas_price_limit: u64,
    /// Lamports per execution.
    pub tx_cost_limit: u64,
    /// Basis points of the executed amount, valued in lamports.
    pub tx_cost_limit_pct: u64,
}

/// Relayer metering configuration of one action.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct GasConfig {
    pub gas_price_limit: u64,
    pub tx_cost_limit: u64,
    pub tx_cost_limit_pct: u64,
    /// Asset reimbursements are paid in; the zero key is lamports.
    pub payment_asset: Pubkey,
    pub fee_collector: Pubkey,
    pub relayers: AllowList,
    pub permissive_mode: u8,
    pub _padding: [u8; 7],
}

impl GasConfig {
    pub fn limits(&self) -> GasLimits {
        GasLimits {
            gas_price_limit: self.gas_price_limit,
            tx_cost_limit: self.tx_cost_limit,
            tx_cost_limit_pct: self.tx_cost_limit_pct,
        }
    }

    #[inline(always)]
    pub fn is_relayer(&self, account: &Pubkey) -> bool {
        self.relayers.contains(account)
    }

    #[inline(always)]
    pub fn is_permissive(&self) -> bool {
        self.permissive_mode != 0
    }

    pub fn has_fee_collector(&self) -> bool {
        self.fee_collector != Pubkey::default()
    }

    /// Returns whether `relayer` was allowed before.
    pub fn set_relayer(&mut self, relayer: &Pubkey, allowed: bool) -> Result<bool> {
        self.relayers.set(relayer, allowed)
    }

    /// Replaces every ceiling and the payment asset. Returns the previous
    /// ceilings.
    pub fn set_gas_limits(&mut self, limits: GasLimits, payment_asset: Pubkey) -> Result<GasLimits> {
        require!(
            limits.tx_cost_limit_pct <= BPS_DENOMINATOR,
            ConfigurationError::InvalidCostPercentage
        );

        let previous = self.limits();
        self.gas_price_limit = limits.gas_price_limit;
        self.tx_cost_limit = limits.tx_cost_limit;
        self.tx_cost_limit_pct = limits.tx_cost_limit_pct;
        self.payment_asset = payment_asset;
        Ok(previous)
    }

    /// Returns the previous flag.
    pub fn set_permissive(&mut self, permissive: bool) -> bool {
        let previous = self.is_permissive();
        self.permissive_mode = permissive as u8;
        previous
    }

    /// Returns the previous collector.
    pub fn set_fee_collector(&mut self, collector: Pubkey) -> Result<Pubkey> {
        require!(collector != Pubkey::default(), ConfigurationError::ZeroAddress);
        Ok(std::mem::replace(&mut self.fee_collector, collector))
    }
}
