use super::{admit, apply_slippage, guarded_execution, ExecutionEnv};
use crate::components::custody::CustodyService;
use crate::components::relayer_meter::MeteredOutcome;
use crate::error::{ConfigurationError, PolicyError};
use crate::state::action_state::{ActionKind, ActionState};
use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CrossDomainArgs {
    pub asset: Pubkey,
    pub amount: u64,
    pub slippage_bps: u64,
    pub aux_data: Vec<u8>,
}

/// Sends `amount` of `asset` to the configured destination domain. The
/// same asset arrives on the other side, so the floor is the input less
/// slippage. Returns the floor handed to custody.
pub fn execute_cross_domain<C: CustodyService>(
    state: &mut ActionState,
    custody: &mut C,
    env: &ExecutionEnv<'_>,
    args: &CrossDomainArgs,
) -> Result<MeteredOutcome<u64>> {
    admit(state, env, ActionKind::Bridger, args.amount)?;

    let domain_id = state.params.destination_domain;
    require!(domain_id != 0, ConfigurationError::MissingDestinationDomain);
    require!(
        args.slippage_bps <= state.params.max_slippage_bps,
        PolicyError::SlippageAboveMax
    );

    let min_amount_out = apply_slippage(args.amount, args.slippage_bps);

    guarded_execution(state, custody, env, &args.asset, args.amount, |custody| {
        custody.transfer_cross_domain(
            &args.asset,
            args.amount,
            min_amount_out,
            domain_id,
            &args.aux_data,
        )?;
        Ok(min_amount_out)
    })
}
