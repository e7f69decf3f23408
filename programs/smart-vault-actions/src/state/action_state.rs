use crate::components::price_resolver::RateSource;
use crate::error::ConfigurationError;
use crate::state::allow_list::AllowList;
use crate::state::authorization::{AuthorizationGate, Operation};
use crate::state::gas_config::{GasConfig, GasLimits};
use crate::state::limit_accrual::LimitState;
use crate::state::threshold::{Threshold, ThresholdGuard};
use crate::utils::constants::BPS_DENOMINATOR;
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Concrete operation an action instance performs. Fixed at initialization.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ActionKind {
    Swapper = 0,
    Withdrawer = 1,
    Bridger = 2,
}

impl ActionKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Swapper),
            1 => Some(Self::Withdrawer),
            2 => Some(Self::Bridger),
            _ => None,
        }
    }
}

/// Kind-specific parameters. Fields a kind does not use stay zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ActionParams {
    /// Swapper and Bridger: largest slippage a caller may request.
    pub max_slippage_bps: u64,
    /// Bridger: target domain identifier.
    pub destination_domain: u64,
    /// Withdrawer: beneficiary of every transfer.
    pub recipient: Pubkey,
    /// Swapper: asset every conversion ends in.
    pub token_out: Pubkey,
}

impl ActionParams {
    pub fn validate_slippage(max_slippage_bps: u64) -> Result<()> {
        require!(
            max_slippage_bps <= BPS_DENOMINATOR,
            ConfigurationError::InvalidSlippage
        );
        Ok(())
    }
}

/// One action instance bound to one custody account.
///
/// # Layout
///
/// Every field starts on an 8-byte boundary and the trailing `reserved`
/// words leave room for new policy fields without a migration. Sizes are
/// pinned by the layout tests.
#[account(zero_copy)]
#[repr(C)]
pub struct ActionState {
    pub owner: Pubkey,
    /// Custody account acted upon.
    pub custody: Pubkey,
    /// Program owning `custody`; every primitive is a CPI into it.
    pub custody_program: Pubkey,
    pub instance_seed: [u8; 32],

    pub params: ActionParams,
    pub gate: AuthorizationGate,
    pub thresholds: ThresholdGuard,
    pub limit: LimitState,
    pub gas: GasConfig,
    pub oracle_signers: AllowList,

    pub kind: u8,
    pub bump: u8,
    pub authority_bump: u8,
    pub _padding: [u8; 5],

    pub reserved: [u64; 16],
}

impl ActionState {
    pub const INIT_SPACE: usize = std::mem::size_of::<Self>();

    pub fn action_kind(&self) -> Result<ActionKind> {
        ActionKind::from_u8(self.kind).ok_or_else(|| error!(ConfigurationError::UnexpectedActionKind))
    }

    pub fn require_kind(&self, expected: ActionKind) -> Result<()> {
        require!(
            self.action_kind()? == expected,
            ConfigurationError::UnexpectedActionKind
        );
        Ok(())
    }
}

/// Gated configuration. Every setter checks the caller against its own
/// [`Operation`] before touching state and returns the value it replaced.
impl ActionState {
    pub fn set_default_threshold(&mut self, caller: &Pubkey, threshold: Threshold) -> Result<Threshold> {
        self.gate.require(caller, Operation::SetDefaultThreshold)?;
        self.thresholds.set_default(threshold)
    }

    /// An all-zero `threshold` removes the override for `asset`.
    pub fn set_custom_threshold(
        &mut self,
        caller: &Pubkey,
        asset: &Pubkey,
        threshold: Threshold,
    ) -> Result<Threshold> {
        self.gate.require(caller, Operation::SetCustomThreshold)?;
        self.thresholds.set_custom(asset, threshold)
    }

    pub fn set_limit(
        &mut self,
        caller: &Pubkey,
        accounting_asset: Pubkey,
        capacity: u64,
        period: u64,
        now: i64,
        prices: &dyn RateSource,
    ) -> Result<LimitState> {
        self.gate.require(caller, Operation::SetLimit)?;
        let before = self.limit;
        self.limit
            .configure(accounting_asset, capacity, period, now, prices)?;
        Ok(before)
    }

    pub fn set_relayer(&mut self, caller: &Pubkey, relayer: &Pubkey, allowed: bool) -> Result<bool> {
        self.gate.require(caller, Operation::SetRelayer)?;
        self.gas.set_relayer(relayer, allowed)
    }

    /// Returns the previous ceilings and payment asset.
    pub fn set_gas_limits(
        &mut self,
        caller: &Pubkey,
        limits: GasLimits,
        payment_asset: Pubkey,
    ) -> Result<(GasLimits, Pubkey)> {
        self.gate.require(caller, Operation::SetGasLimits)?;
        let payment_asset_before = self.gas.payment_asset;
        let before = self.gas.set_gas_limits(limits, payment_asset)?;
        Ok((before, payment_asset_before))
    }

    pub fn set_permissive_mode(&mut self, caller: &Pubkey, permissive: bool) -> Result<bool> {
        self.gate.require(caller, Operation::SetPermissiveMode)?;
        Ok(self.gas.set_permissive(permissive))
    }

    pub fn set_fee_collector(&mut self, caller: &Pubkey, fee_collector: Pubkey) -> Result<Pubkey> {
        self.gate.require(caller, Operation::SetFeeCollector)?;
        self.gas.set_fee_collector(fee_collector)
    }

    pub fn set_oracle_signer(&mut self, caller: &Pubkey, signer: &Pubkey, allowed: bool) -> Result<bool> {
        self.gate.require(caller, Operation::SetOracleSigner)?;
        self.oracle_signers.set(signer, allowed)
    }

    /// Swappers and Bridgers only.
    pub fn set_max_slippage(&mut self, caller: &Pubkey, max_slippage_bps: u64) -> Result<u64> {
        self.gate.require(caller, Operation::SetMaxSlippage)?;
        require!(
            self.action_kind()? != ActionKind::Withdrawer,
            ConfigurationError::UnexpectedActionKind
        );
        ActionParams::validate_slippage(max_slippage_bps)?;
        Ok(std::mem::replace(&mut self.params.max_slippage_bps, max_slippage_bps))
    }

    pub fn set_recipient(&mut self, caller: &Pubkey, recipient: Pubkey) -> Result<Pubkey> {
        self.gate.require(caller, Operation::SetRecipient)?;
        self.require_kind(ActionKind::Withdrawer)?;
        require!(
            recipient != Pubkey::default(),
            ConfigurationError::MissingRecipient
        );
        Ok(std::mem::replace(&mut self.params.recipient, recipient))
    }

    pub fn set_destination_domain(&mut self, caller: &Pubkey, domain_id: u64) -> Result<u64> {
        self.gate.require(caller, Operation::SetDestinationDomain)?;
        self.require_kind(ActionKind::Bridger)?;
        require!(domain_id != 0, ConfigurationError::MissingDestinationDomain);
        Ok(std::mem::replace(&mut self.params.destination_domain, domain_id))
    }

    pub fn set_token_out(&mut self, caller: &Pubkey, token_out: Pubkey) -> Result<Pubkey> {
        self.gate.require(caller, Operation::SetTokenOut)?;
        self.require_kind(ActionKind::Swapper)?;
        require!(
            token_out != Pubkey::default(),
            ConfigurationError::MissingTokenOut
        );
        Ok(std::mem::replace(&mut self.params.token_out, token_out))
    }
}

/// Initial configuration of an action instance.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ActionConfig {
    pub kind: ActionKind,
    /// Distinguishes several instances over the same custody account.
    pub instance_seed: [u8; 32],
    pub max_slippage_bps: u64,
    pub destination_domain: u64,
    pub recipient: Pubkey,
    pub token_out: Pubkey,
}

impl ActionConfig {
    /// Checks that the parameters the kind depends on are present.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            ActionKind::Swapper => {
                require!(
                    self.token_out != Pubkey::default(),
                    ConfigurationError::MissingTokenOut
                );
                ActionParams::validate_slippage(self.max_slippage_bps)
            }
            ActionKind::Withdrawer => {
                require!(
                    self.recipient != Pubkey::default(),
                    ConfigurationError::MissingRecipient
                );
                Ok(())
            }
            ActionKind::Bridger => {
                require!(
                    self.destination_domain != 0,
                    ConfigurationError::MissingDestinationDomain
                );
                ActionParams::validate_slippage(self.max_slippage_bps)
            }
        }
    }

    pub fn params(&self) -> ActionParams {
        ActionParams {
            max_slippage_bps: self.max_slippage_bps,
            destination_domain: self.destination_domain,
            recipient: self.recipient,
            token_out: self.token_out,
        }
    }
}
