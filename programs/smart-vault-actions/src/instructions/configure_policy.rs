use super::manage_permissions::ConfigureAction;
use crate::components::custody::CustodyCpi;
use crate::components::price_resolver::PriceResolver;
use crate::error::ConfigurationError;
use crate::state::action_state::ActionState;
use crate::state::threshold::Threshold;
use crate::utils::constants::ACTION_AUTHORITY_SEED;
use crate::utils::events::{CustomThresholdSet, DefaultThresholdSet, LimitConfigured};
use anchor_lang::prelude::*;

pub fn set_default_threshold(ctx: Context<ConfigureAction>, threshold: Threshold) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let before = state.set_default_threshold(&ctx.accounts.authority.key(), threshold)?;

    emit!(DefaultThresholdSet {
        action: ctx.accounts.action_state.key(),
        before,
        after: threshold,
    });

    Ok(())
}

/// Sets the override for `asset`; an all-zero threshold removes it.
pub fn set_custom_threshold(
    ctx: Context<ConfigureAction>,
    asset: Pubkey,
    threshold: Threshold,
) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let before = state.set_custom_threshold(&ctx.accounts.authority.key(), &asset, threshold)?;

    emit!(CustomThresholdSet {
        action: ctx.accounts.action_state.key(),
        asset,
        before,
        after: threshold,
    });

    Ok(())
}

/// Limit reconfiguration may need a price to rescale the accrued volume,
/// so it carries the custody accounts the default oracle is read through.
#[derive(Accounts)]
pub struct ConfigureLimit<'info> {
    #[account(
        mut,
        has_one = custody @ ConfigurationError::CustodyMismatch,
        has_one = custody_program @ ConfigurationError::InvalidCustodyProgram,
    )]
    pub action_state: AccountLoader<'info, ActionState>,

    /// CHECK: pinned by `has_one`.
    pub custody: UncheckedAccount<'info>,

    /// CHECK: pinned by `has_one`.
    pub custody_program: UncheckedAccount<'info>,

    /// CHECK: CPI signer PDA, no data.
    #[account(seeds = [ACTION_AUTHORITY_SEED, action_state.key().as_ref()], bump)]
    pub action_authority: UncheckedAccount<'info>,

    pub authority: Signer<'info>,
}

pub fn set_limit<'info>(
    ctx: Context<'_, '_, 'info, 'info, ConfigureLimit<'info>>,
    accounting_asset: Pubkey,
    capacity: u64,
    period: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let action_key = ctx.accounts.action_state.key();
    let bump = [ctx.bumps.action_authority];
    let signer_seeds: [&[u8]; 3] = [ACTION_AUTHORITY_SEED, action_key.as_ref(), &bump];

    let mut state = ctx.accounts.action_state.load_mut()?;
    let oracle = CustodyCpi::new(
        ctx.accounts.custody_program.to_account_info(),
        ctx.accounts.custody.to_account_info(),
        ctx.accounts.action_authority.to_account_info(),
        ctx.remaining_accounts,
        &signer_seeds,
    );
    let resolver = PriceResolver::oracle_only(now);

    let before = state.set_limit(
        &ctx.accounts.authority.key(),
        accounting_asset,
        capacity,
        period,
        now,
        &resolver.bind(&oracle),
    )?;
    let after = state.limit;

    emit!(LimitConfigured {
        action: action_key,
        accounting_asset_before: before.accounting_asset,
        capacity_before: before.capacity,
        period_before: before.period,
        accounting_asset: after.accounting_asset,
        capacity: after.capacity,
        period: after.period,
        accrued: after.accrued,
        next_reset_time: after.next_reset_time,
    });

    Ok(())
}
