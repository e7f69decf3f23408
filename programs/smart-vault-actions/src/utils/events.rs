use crate::state::action_state::ActionKind;
use crate::state::authorization::Operation;
use crate::state::gas_config::GasLimits;
use crate::state::threshold::Threshold;
use anchor_lang::prelude::*;

#[event]
pub struct ActionInitialized {
    pub action: Pubkey,
    pub owner: Pubkey,
    pub custody: Pubkey,
    pub custody_program: Pubkey,
    pub kind: ActionKind,
}

#[event]
pub struct PermissionChanged {
    pub action: Pubkey,
    pub changed_by: Pubkey,
    pub account: Pubkey,
    pub operation: Operation,
    pub granted: bool,
    pub permissions_before: u64,
    pub permissions_after: u64,
}

#[event]
pub struct DefaultThresholdSet {
    pub action: Pubkey,
    pub before: Threshold,
    pub after: Threshold,
}

#[event]
pub struct CustomThresholdSet {
    pub action: Pubkey,
    pub asset: Pubkey,
    pub before: Threshold,
    pub after: Threshold,
}

#[event]
pub struct LimitConfigured {
    pub action: Pubkey,
    pub accounting_asset_before: Pubkey,
    pub capacity_before: u64,
    pub period_before: u64,
    pub accounting_asset: Pubkey,
    pub capacity: u64,
    pub period: u64,
    pub accrued: u64,
    pub next_reset_time: i64,
}

#[event]
pub struct RelayerSet {
    pub action: Pubkey,
    pub relayer: Pubkey,
    pub allowed_before: bool,
    pub allowed: bool,
}

#[event]
pub struct GasLimitsSet {
    pub action: Pubkey,
    pub before: GasLimits,
    pub after: GasLimits,
    pub payment_asset_before: Pubkey,
    pub payment_asset: Pubkey,
}

#[event]
pub struct PermissiveModeSet {
    pub action: Pubkey,
    pub before: bool,
    pub after: bool,
}

#[event]
pub struct FeeCollectorSet {
    pub action: Pubkey,
    pub before: Pubkey,
    pub after: Pubkey,
}

#[event]
pub struct OracleSignerSet {
    pub action: Pubkey,
    pub signer: Pubkey,
    pub allowed_before: bool,
    pub allowed: bool,
}

#[event]
pub struct MaxSlippageSet {
    pub action: Pubkey,
    pub before: u64,
    pub after: u64,
}

#[event]
pub struct RecipientSet {
    pub action: Pubkey,
    pub before: Pubkey,
    pub after: Pubkey,
}

#[event]
pub struct DestinationDomainSet {
    pub action: Pubkey,
    pub before: u64,
    pub after: u64,
}

#[event]
pub struct TokenOutSet {
    pub action: Pubkey,
    pub before: Pubkey,
    pub after: Pubkey,
}

#[event]
pub struct ActionExecuted {
    pub action: Pubkey,
    pub kind: ActionKind,
    pub caller: Pubkey,
    pub asset: Pubkey,
    pub amount: u64,
    /// Amount received (Swapper) or floor requested (Bridger); zero for
    /// withdrawals.
    pub amount_out: u64,
    pub limit_accrued: u64,
    pub timestamp: i64,
}

#[event]
pub struct RelayerReimbursed {
    pub action: Pubkey,
    pub relayer: Pubkey,
    pub fee_collector: Pubkey,
    pub units: u64,
    pub unit_price: u64,
    pub cost: u64,
    pub payment_asset: Pubkey,
    pub payment: u64,
    /// False when permissive mode skipped the payment.
    pub paid: bool,
}
