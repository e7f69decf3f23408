//! One-time creation of an action instance over a custody account.
//!
//! # Bootstrap
//!
//! The payer becomes the owner and receives every operation in the
//! authorization gate. All further configuration flows through that gate,
//! so the owner can hand out narrower roles (an executor holding only
//! `Execute`, an operator holding the gas setters) and later drop its own.
use crate::error::ConfigurationError;
use crate::state::action_state::{ActionConfig, ActionState};
use crate::utils::constants::{ACTION_AUTHORITY_SEED, ACTION_STATE_SEED};
use crate::utils::events::ActionInitialized;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(config: ActionConfig)]
pub struct InitializeAction<'info> {
    /// One instance per `(custody, instance_seed)`.
    #[account(
        init,
        payer = owner,
        space = 8 + ActionState::INIT_SPACE,
        seeds = [ACTION_STATE_SEED, custody.key().as_ref(), &config.instance_seed],
        bump,
    )]
    pub action_state: AccountLoader<'info, ActionState>,

    /// CHECK: only its owner program is checked here; the custody program
    /// validates the account on every CPI.
    #[account(owner = custody_program.key() @ ConfigurationError::CustodyMismatch)]
    pub custody: UncheckedAccount<'info>,

    /// CHECK: must be an executable program; pinned into the action state.
    #[account(constraint = custody_program.executable @ ConfigurationError::InvalidCustodyProgram)]
    pub custody_program: UncheckedAccount<'info>,

    /// CHECK: data-less PDA that signs custody CPIs; derived here to store
    /// its bump.
    #[account(seeds = [ACTION_AUTHORITY_SEED, action_state.key().as_ref()], bump)]
    pub action_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_action(ctx: Context<InitializeAction>, config: ActionConfig) -> Result<()> {
    config.validate()?;

    let owner = ctx.accounts.owner.key();
    let mut state = ctx.accounts.action_state.load_init()?;

    state.owner = owner;
    state.custody = ctx.accounts.custody.key();
    state.custody_program = ctx.accounts.custody_program.key();
    state.instance_seed = config.instance_seed;
    state.params = config.params();
    state.gate.bootstrap(&owner)?;
    state.kind = config.kind as u8;
    state.bump = ctx.bumps.action_state;
    state.authority_bump = ctx.bumps.action_authority;

    msg!(
        "Action {:?} initialized over custody {}",
        config.kind,
        state.custody
    );

    emit!(ActionInitialized {
        action: ctx.accounts.action_state.key(),
        owner,
        custody: state.custody,
        custody_program: state.custody_program,
        kind: config.kind,
    });

    Ok(())
}
