use super::{admit, guarded_execution, ExecutionEnv};
use crate::components::custody::CustodyService;
use crate::components::relayer_meter::MeteredOutcome;
use crate::error::ConfigurationError;
use crate::state::action_state::{ActionKind, ActionState};
use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferArgs {
    pub asset: Pubkey,
    pub amount: u64,
}

/// Moves `amount` of `asset` out of custody to the configured recipient.
pub fn execute_transfer<C: CustodyService>(
    state: &mut ActionState,
    custody: &mut C,
    env: &ExecutionEnv<'_>,
    args: &TransferArgs,
) -> Result<MeteredOutcome<()>> {
    admit(state, env, ActionKind::Withdrawer, args.amount)?;

    let recipient = state.params.recipient;
    require!(
        recipient != Pubkey::default(),
        ConfigurationError::MissingRecipient
    );

    guarded_execution(state, custody, env, &args.asset, args.amount, |custody| {
        custody.transfer_out(&args.asset, args.amount, &recipient, &[])
    })
}
