use super::{admit, apply_slippage, guarded_execution, ExecutionEnv};
use crate::components::custody::{ConvertRequest, CustodyService};
use crate::components::relayer_meter::MeteredOutcome;
use crate::error::{ConfigurationError, PolicyError};
use crate::state::action_state::{ActionKind, ActionState};
use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConvertArgs {
    pub asset_in: Pubkey,
    pub amount_in: u64,
    pub slippage_bps: u64,
    pub adapter_id: u8,
    pub aux_data: Vec<u8>,
}

/// Converts `amount_in` of `asset_in` into the configured output token.
///
/// The floor handed to custody is the resolved rate applied to the input,
/// less the requested slippage. The amount custody reports back is checked
/// against the same floor. Returns the amount received.
pub fn execute_convert<C: CustodyService>(
    state: &mut ActionState,
    custody: &mut C,
    env: &ExecutionEnv<'_>,
    args: &ConvertArgs,
) -> Result<MeteredOutcome<u64>> {
    admit(state, env, ActionKind::Swapper, args.amount_in)?;

    let token_out = state.params.token_out;
    require!(
        token_out != Pubkey::default(),
        ConfigurationError::MissingTokenOut
    );
    require!(
        args.asset_in != token_out,
        PolicyError::SameTokenConversion
    );
    require!(
        args.slippage_bps <= state.params.max_slippage_bps,
        PolicyError::SlippageAboveMax
    );

    let expected_out = env
        .resolver
        .resolve(&*custody, &args.asset_in, &token_out)?
        .apply(args.amount_in)?;
    let min_amount_out = apply_slippage(expected_out, args.slippage_bps);

    let request = ConvertRequest {
        asset_in: args.asset_in,
        asset_out: token_out,
        amount_in: args.amount_in,
        min_amount_out,
        adapter_id: args.adapter_id,
        aux_data: args.aux_data.clone(),
    };

    guarded_execution(
        state,
        custody,
        env,
        &args.asset_in,
        args.amount_in,
        |custody| {
            let amount_out = custody.convert(&request)?;
            require!(
                amount_out >= min_amount_out,
                PolicyError::MinAmountOutNotMet
            );
            Ok(amount_out)
        },
    )
}
