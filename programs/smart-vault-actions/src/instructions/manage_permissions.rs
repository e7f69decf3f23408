use crate::state::action_state::ActionState;
use crate::state::authorization::Operation;
use crate::utils::events::PermissionChanged;
use anchor_lang::prelude::*;

/// Accounts shared by every configuration entry point. The gate, not the
/// account list, decides whether `authority` may act.
#[derive(Accounts)]
pub struct ConfigureAction<'info> {
    #[account(mut)]
    pub action_state: AccountLoader<'info, ActionState>,

    pub authority: Signer<'info>,
}

pub fn authorize(ctx: Context<ConfigureAction>, account: Pubkey, operation: Operation) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    let mut state = ctx.accounts.action_state.load_mut()?;

    let before = state.gate.authorize(&caller, &account, operation)?;
    let after = state.gate.permissions_of(&account);

    emit!(PermissionChanged {
        action: ctx.accounts.action_state.key(),
        changed_by: caller,
        account,
        operation,
        granted: true,
        permissions_before: before.as_u64(),
        permissions_after: after.as_u64(),
    });

    Ok(())
}

pub fn unauthorize(
    ctx: Context<ConfigureAction>,
    account: Pubkey,
    operation: Operation,
) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    let mut state = ctx.accounts.action_state.load_mut()?;

    let before = state.gate.unauthorize(&caller, &account, operation)?;
    let after = state.gate.permissions_of(&account);

    if after.is_empty() {
        msg!("Account {} no longer holds any permission", account);
    }

    emit!(PermissionChanged {
        action: ctx.accounts.action_state.key(),
        changed_by: caller,
        account,
        operation,
        granted: false,
        permissions_before: before.as_u64(),
        permissions_after: after.as_u64(),
    });

    Ok(())
}
