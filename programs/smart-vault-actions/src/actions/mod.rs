//! Action composition roots.
//!
//! Every execution follows the same pipeline:
//!
//! 1. the caller holds [`Operation::Execute`],
//! 2. the instruction matches the action kind,
//! 3. kind-specific parameter checks,
//! 4. the threshold guard and a read-only limit check,
//! 5. a metered call whose body runs the custody primitive, its
//!    post-conditions and the limit accrual.
//!
//! Nothing is written to the action state before step 5 succeeds.
pub mod bridger;
pub mod swapper;
pub mod withdrawer;

pub use bridger::*;
pub use swapper::*;
pub use withdrawer::*;

use crate::components::custody::CustodyService;
use crate::components::price_resolver::PriceResolver;
use crate::components::relayer_meter::{metered_call, ExecutionMeter, MeterContext, MeteredOutcome};
use crate::error::PolicyError;
use crate::state::action_state::{ActionKind, ActionState};
use crate::state::authorization::Operation;
use crate::utils::constants::BPS_DENOMINATOR;
use anchor_lang::prelude::*;

/// Per-invocation inputs shared by every action kind.
pub struct ExecutionEnv<'a> {
    pub caller: Pubkey,
    pub now: i64,
    pub resolver: &'a PriceResolver,
    pub meter: &'a dyn ExecutionMeter,
}

/// Steps 1 and 2 plus the amount check common to every kind.
pub(crate) fn admit(
    state: &ActionState,
    env: &ExecutionEnv<'_>,
    kind: ActionKind,
    amount: u64,
) -> Result<()> {
    state.gate.require(&env.caller, Operation::Execute)?;
    state.require_kind(kind)?;
    require!(amount > 0, PolicyError::InvalidAmount);
    Ok(())
}

/// `amount` reduced by `slippage_bps`, rounding down.
pub fn apply_slippage(amount: u64, slippage_bps: u64) -> u64 {
    let kept = BPS_DENOMINATOR.saturating_sub(slippage_bps) as u128;
    (amount as u128 * kept / BPS_DENOMINATOR as u128) as u64
}

/// Steps 4 and 5 for `amount` of `asset`.
pub(crate) fn guarded_execution<C, T, F>(
    state: &mut ActionState,
    custody: &mut C,
    env: &ExecutionEnv<'_>,
    asset: &Pubkey,
    amount: u64,
    primitive: F,
) -> Result<MeteredOutcome<T>>
where
    C: CustodyService,
    F: FnOnce(&mut C) -> Result<T>,
{
    let ActionState {
        thresholds,
        limit,
        gas,
        ..
    } = state;

    {
        let prices = env.resolver.bind(&*custody);
        thresholds.validate(asset, amount, &prices)?;
        require!(
            limit.can_accrue(asset, amount, env.now, &prices)?,
            PolicyError::SwapLimitExceeded
        );
    }

    let context = MeterContext {
        gas,
        caller: &env.caller,
        meter: env.meter,
        resolver: env.resolver,
        cost_basis: Some((*asset, amount)),
    };

    metered_call(context, custody, |custody| {
        let value = primitive(custody)?;
        let prices = env.resolver.bind(&*custody);
        limit.record(asset, amount, env.now, &prices)?;
        Ok(value)
    })
}

#[cfg(test)]
mod action_tests;
