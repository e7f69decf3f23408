use super::manage_permissions::ConfigureAction;
use crate::utils::events::{
    DestinationDomainSet, MaxSlippageSet, OracleSignerSet, RecipientSet, TokenOutSet,
};
use anchor_lang::prelude::*;

pub fn set_oracle_signer(ctx: Context<ConfigureAction>, signer: Pubkey, allowed: bool) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let allowed_before = state.set_oracle_signer(&ctx.accounts.authority.key(), &signer, allowed)?;

    emit!(OracleSignerSet {
        action: ctx.accounts.action_state.key(),
        signer,
        allowed_before,
        allowed,
    });

    Ok(())
}

pub fn set_max_slippage(ctx: Context<ConfigureAction>, max_slippage_bps: u64) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let before = state.set_max_slippage(&ctx.accounts.authority.key(), max_slippage_bps)?;

    emit!(MaxSlippageSet {
        action: ctx.accounts.action_state.key(),
        before,
        after: max_slippage_bps,
    });

    Ok(())
}

pub fn set_recipient(ctx: Context<ConfigureAction>, recipient: Pubkey) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let before = state.set_recipient(&ctx.accounts.authority.key(), recipient)?;

    emit!(RecipientSet {
        action: ctx.accounts.action_state.key(),
        before,
        after: recipient,
    });

    Ok(())
}

pub fn set_destination_domain(ctx: Context<ConfigureAction>, domain_id: u64) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let before = state.set_destination_domain(&ctx.accounts.authority.key(), domain_id)?;

    emit!(DestinationDomainSet {
        action: ctx.accounts.action_state.key(),
        before,
        after: domain_id,
    });

    Ok(())
}

pub fn set_token_out(ctx: Context<ConfigureAction>, token_out: Pubkey) -> Result<()> {
    let mut state = ctx.accounts.action_state.load_mut()?;
    let before = state.set_token_out(&ctx.accounts.authority.key(), token_out)?;

    emit!(TokenOutSet {
        action: ctx.accounts.action_state.key(),
        before,
        after: token_out,
    });

    Ok(())
}
