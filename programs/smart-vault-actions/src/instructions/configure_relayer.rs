use super::manage_permissions::ConfigureAction;
use crate::state::gas_config::GasLimits;
use crate::utils::events::{FeeCollectorSet, GasLimitsSet, PermissiveModeSet, RelayerSet};
use anchor_lang::prelude::*;

pub fn set_relayer(ctx: Context<ConfigureAction>, relayer: Pubkey, allowed: bool) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let allowed_before = state.set_relayer(&ctx.accounts.authority.key(), &relayer, allowed)?;

    emit!(RelayerSet {
        action: ctx.accounts.action_state.key(),
        relayer,
        allowed_before,
        allowed,
    });

    Ok(())
}

/// Replaces the cost ceilings and the asset reimbursements are paid in.
/// `payment_asset` may be the native key.
pub fn set_gas_limits(
    ctx: Context<ConfigureAction>,
    limits: GasLimits,
    payment_asset: Pubkey,
) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let (before, payment_asset_before) =
        state.set_gas_limits(&ctx.accounts.authority.key(), limits, payment_asset)?;

    emit!(GasLimitsSet {
        action: ctx.accounts.action_state.key(),
        before,
        after: limits,
        payment_asset_before,
        payment_asset,
    });

    Ok(())
}

pub fn set_permissive_mode(ctx: Context<ConfigureAction>, permissive: bool) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let before = state.set_permissive_mode(&ctx.accounts.authority.key(), permissive)?;

    emit!(PermissiveModeSet {
        action: ctx.accounts.action_state.key(),
        before,
        after: permissive,
    });

    Ok(())
}

pub fn set_fee_collector(ctx: Context<ConfigureAction>, fee_collector: Pubkey) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let before = state.set_fee_collector(&ctx.accounts.authority.key(), fee_collector)?;

    emit!(FeeCollectorSet {
        action: ctx.accounts.action_state.key(),
        before,
        after: fee_collector,
    });

    Ok(())
}
