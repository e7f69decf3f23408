//! Execution entry points.
//!
//! Each handler wires the on-chain collaborators (custody CPI client,
//! Ed25519 precompile verifier, compute-budget meter) into an
//! [`ExecutionEnv`] and hands over to the matching action. Events are
//! emitted only after the action returned successfully.
use crate::actions::{self, ConvertArgs, CrossDomainArgs, ExecutionEnv, TransferArgs};
use crate::components::custody::CustodyCpi;
use crate::components::price_resolver::{Ed25519InstructionVerifier, PriceResolver};
use crate::components::relayer_meter::{ComputeBudgetMeter, MeteredOutcome, Reimbursement};
use crate::error::{ConfigurationError, OracleError};
use crate::state::action_state::{ActionKind, ActionState};
use crate::utils::constants::ACTION_AUTHORITY_SEED;
use crate::utils::events::{ActionExecuted, RelayerReimbursed};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions as instructions_sysvar;

#[derive(Accounts)]
pub struct ExecuteAction<'info> {
    #[account(
        mut,
        has_one = custody @ ConfigurationError::CustodyMismatch,
        has_one = custody_program @ ConfigurationError::InvalidCustodyProgram,
    )]
    pub action_state: AccountLoader<'info, ActionState>,

    /// CHECK: pinned by `has_one`; validated by the custody program.
    #[account(mut)]
    pub custody: UncheckedAccount<'info>,

    /// CHECK: pinned by `has_one`.
    pub custody_program: UncheckedAccount<'info>,

    /// CHECK: CPI signer PDA, no data.
    #[account(seeds = [ACTION_AUTHORITY_SEED, action_state.key().as_ref()], bump)]
    pub action_authority: UncheckedAccount<'info>,

    /// Owner, delegated executor or relayer. Relayers additionally need
    /// `Execute` in the gate.
    pub caller: Signer<'info>,

    /// CHECK: address-constrained to the instructions sysvar; read for
    /// quote signatures and the compute-unit price.
    #[account(address = instructions_sysvar::ID @ OracleError::InvalidSignatureStructure)]
    pub instructions: UncheckedAccount<'info>,
}

/// Builds the per-call collaborators and runs `run` against the loaded
/// action state.
fn with_execution_env<'info, T>(
    ctx: &Context<'_, '_, 'info, 'info, ExecuteAction<'info>>,
    quote_bundle: Option<&[u8]>,
    run: impl FnOnce(&mut ActionState, &mut CustodyCpi<'_, 'info>, &ExecutionEnv<'_>) -> Result<T>,
) -> Result<T> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = &ctx.accounts;
    let action_key = accounts.action_state.key();
    let bump = [ctx.bumps.action_authority];
    let signer_seeds: [&[u8]; 3] = [ACTION_AUTHORITY_SEED, action_key.as_ref(), &bump];
    let instructions = accounts.instructions.to_account_info();

    let mut state = accounts.action_state.load_mut()?;

    let verifier = Ed25519InstructionVerifier::new(&instructions);
    let resolver = PriceResolver::new(quote_bundle, &state.oracle_signers, &verifier, now);
    let meter = ComputeBudgetMeter::new(&instructions);

    let mut custody = CustodyCpi::new(
        accounts.custody_program.to_account_info(),
        accounts.custody.to_account_info(),
        accounts.action_authority.to_account_info(),
        ctx.remaining_accounts,
        &signer_seeds,
    );

    let env = ExecutionEnv {
        caller: accounts.caller.key(),
        now,
        resolver: &resolver,
        meter: &meter,
    };

    run(&mut *state, &mut custody, &env)
}

struct Executed {
    kind: ActionKind,
    asset: Pubkey,
    amount: u64,
    amount_out: u64,
    limit_accrued: u64,
    reimbursement: Reimbursement,
}

fn emit_execution(ctx: &Context<ExecuteAction>, executed: Executed) -> Result<()> {
    let action = ctx.accounts.action_state.key();
    let caller = ctx.accounts.caller.key();

    emit!(ActionExecuted {
        action,
        kind: executed.kind,
        caller,
        asset: executed.asset,
        amount: executed.amount,
        amount_out: executed.amount_out,
        limit_accrued: executed.limit_accrued,
        timestamp: Clock::get()?.unix_timestamp,
    });

    let (quote, paid) = match executed.reimbursement {
        Reimbursement::NotRelayed => return Ok(()),
        Reimbursement::Paid(quote) => (quote, true),
        Reimbursement::Skipped(quote) => (quote, false),
    };

    let fee_collector = ctx.accounts.action_state.load()?.gas.fee_collector;
    emit!(RelayerReimbursed {
        action,
        relayer: caller,
        fee_collector,
        units: quote.units,
        unit_price: quote.unit_price,
        cost: quote.cost,
        payment_asset: quote.payment_asset,
        payment: quote.payment,
        paid,
    });

    Ok(())
}

fn executed<T>(
    kind: ActionKind,
    asset: Pubkey,
    amount: u64,
    outcome: MeteredOutcome<T>,
    amount_out: impl FnOnce(T) -> u64,
    limit_accrued: u64,
) -> Executed {
    Executed {
        kind,
        asset,
        amount,
        amount_out: amount_out(outcome.value),
        limit_accrued,
        reimbursement: outcome.reimbursement,
    }
}

pub fn execute_convert<'info>(
    ctx: Context<'_, '_, 'info, 'info, ExecuteAction<'info>>,
    args: ConvertArgs,
    quote_bundle: Option<Vec<u8>>,
) -> Result<()> {
    let (outcome, accrued) =
        with_execution_env(&ctx, quote_bundle.as_deref(), |state, custody, env| {
            let outcome = actions::swapper::execute_convert(state, custody, env, &args)?;
            Ok((outcome, state.limit.accrued))
        })?;

    emit_execution(
        &ctx,
        executed(ActionKind::Swapper, args.asset_in, args.amount_in, outcome, |out| out, accrued),
    )
}

pub fn execute_transfer<'info>(
    ctx: Context<'_, '_, 'info, 'info, ExecuteAction<'info>>,
    args: TransferArgs,
    quote_bundle: Option<Vec<u8>>,
) -> Result<()> {
    let (outcome, accrued) =
        with_execution_env(&ctx, quote_bundle.as_deref(), |state, custody, env| {
            let outcome = actions::withdrawer::execute_transfer(state, custody, env, &args)?;
            Ok((outcome, state.limit.accrued))
        })?;

    emit_execution(
        &ctx,
        executed(ActionKind::Withdrawer, args.asset, args.amount, outcome, |()| 0, accrued),
    )
}

pub fn execute_cross_domain<'info>(
    ctx: Context<'_, '_, 'info, 'info, ExecuteAction<'info>>,
    args: CrossDomainArgs,
    quote_bundle: Option<Vec<u8>>,
) -> Result<()> {
    let (outcome, accrued) =
        with_execution_env(&ctx, quote_bundle.as_deref(), |state, custody, env| {
            let outcome = actions::bridger::execute_cross_domain(state, custody, env, &args)?;
            Ok((outcome, state.limit.accrued))
        })?;

    emit_execution(
        &ctx,
        executed(ActionKind::Bridger, args.asset, args.amount, outcome, |out| out, accrued),
    )
}
