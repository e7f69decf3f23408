//! Execution-cost metering and reimbursement for relayed calls.
//!
//! [`metered_call`] wraps an action body. Calls from accounts outside the
//! relayer allow list run the body untouched. Relayed calls are bounded by
//! the configured compute-unit price before the body runs and by the total
//! cost after it, then the cost is converted into the payment asset and
//! paid from custody to the fee collector.
//!
//! Failing to pay reverts the whole call unless permissive mode is on and
//! custody simply lacks the balance, in which case the body's effects stand
//! and the reimbursement is reported as skipped.
use crate::components::custody::CustodyService;
use crate::components::price_resolver::{PriceResolver, RateSource};
use crate::error::{ConfigurationError, CostError, OracleError};
use crate::state::gas_config::GasConfig;
use crate::utils::constants::{
    BASE_TX_COST, BPS_DENOMINATOR, COMPUTE_BUDGET_PROGRAM_ID, METERING_OVERHEAD_UNITS,
    MICRO_LAMPORTS_PER_LAMPORT, NATIVE_ASSET,
};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::load_instruction_at_checked;

/// Source of the ambient execution price and of consumed execution units.
pub trait ExecutionMeter {
    /// Price paid per compute unit, in micro-lamports.
    fn unit_price(&self) -> Result<u64>;

    /// Compute units left to the current transaction.
    fn remaining_units(&self) -> u64;
}

const SET_COMPUTE_UNIT_PRICE_TAG: u8 = 3;

/// Reads the price from the transaction's `SetComputeUnitPrice` instruction
/// and the remaining budget from the runtime.
pub struct ComputeBudgetMeter<'a, 'info> {
    instructions: &'a AccountInfo<'info>,
}

impl<'a, 'info> ComputeBudgetMeter<'a, 'info> {
    pub fn new(instructions: &'a AccountInfo<'info>) -> Self {
        Self { instructions }
    }
}

impl ExecutionMeter for ComputeBudgetMeter<'_, '_> {
    fn unit_price(&self) -> Result<u64> {
        let mut index = 0usize;
        while let Ok(instruction) = load_instruction_at_checked(index, self.instructions) {
            if instruction.program_id == COMPUTE_BUDGET_PROGRAM_ID {
                if let Some(price) = compute_unit_price(&instruction.data) {
                    return Ok(price);
                }
            }
            index += 1;
        }
        // No priority fee requested.
        Ok(0)
    }

    fn remaining_units(&self) -> u64 {
        anchor_lang::solana_program::compute_units::sol_remaining_compute_units()
    }
}

/// Decodes `SetComputeUnitPrice(u64)`; `None` for other budget instructions.
pub(crate) fn compute_unit_price(data: &[u8]) -> Option<u64> {
    match data {
        [SET_COMPUTE_UNIT_PRICE_TAG, rest @ ..] if rest.len() == 8 => {
            let mut price = [0u8; 8];
            price.copy_from_slice(rest);
            Some(u64::from_le_bytes(price))
        }
        _ => None,
    }
}

/// Lamports charged for `units` at `unit_price` micro-lamports, rounded up,
/// plus the signature fee.
pub fn execution_cost(units: u64, unit_price: u64) -> Result<u64> {
    let total_units = units
        .checked_add(METERING_OVERHEAD_UNITS)
        .ok_or(OracleError::MathOverflow)?;
    let micro_lamports = total_units as u128 * unit_price as u128;
    let lamports = micro_lamports.div_ceil(MICRO_LAMPORTS_PER_LAMPORT as u128);

    u64::try_from(lamports)
        .ok()
        .and_then(|lamports| lamports.checked_add(BASE_TX_COST))
        .ok_or_else(|| error!(OracleError::MathOverflow))
}

/// Cost and payment figures of one relayed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostQuote {
    pub units: u64,
    pub unit_price: u64,
    /// Lamports.
    pub cost: u64,
    pub payment_asset: Pubkey,
    /// `cost` expressed in `payment_asset`.
    pub payment: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reimbursement {
    /// Caller is not a relayer.
    NotRelayed,
    Paid(CostQuote),
    /// Permissive mode and custody could not cover the payment.
    Skipped(CostQuote),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeteredOutcome<T> {
    pub value: T,
    pub reimbursement: Reimbursement,
}

/// Inputs of one metered call besides the custody service and the body.
pub struct MeterContext<'a> {
    pub gas: &'a GasConfig,
    pub caller: &'a Pubkey,
    pub meter: &'a dyn ExecutionMeter,
    pub resolver: &'a PriceResolver,
    /// Asset and amount the percentage ceiling is measured against.
    pub cost_basis: Option<(Pubkey, u64)>,
}

pub fn metered_call<C, T, F>(
    context: MeterContext<'_>,
    custody: &mut C,
    body: F,
) -> Result<MeteredOutcome<T>>
where
    C: CustodyService,
    F: FnOnce(&mut C) -> Result<T>,
{
    let MeterContext {
        gas,
        caller,
        meter,
        resolver,
        cost_basis,
    } = context;

    if !gas.is_relayer(caller) {
        return Ok(MeteredOutcome {
            value: body(custody)?,
            reimbursement: Reimbursement::NotRelayed,
        });
    }

    require!(
        gas.has_fee_collector(),
        ConfigurationError::MissingFeeCollector
    );

    let unit_price = meter.unit_price()?;
    require!(
        gas.gas_price_limit == 0 || unit_price <= gas.gas_price_limit,
        CostError::GasPriceAboveLimit
    );

    let units_before = meter.remaining_units();
    let value = body(custody)?;
    let units = units_before.saturating_sub(meter.remaining_units());

    let cost = execution_cost(units, unit_price)?;
    require!(
        gas.tx_cost_limit == 0 || cost <= gas.tx_cost_limit,
        CostError::CostAboveLimit
    );

    let payment = {
        let prices = resolver.bind(&*custody);
        if let (true, Some((asset, amount))) = (gas.tx_cost_limit_pct != 0, cost_basis) {
            let value_native = prices.convert(amount, &asset, &NATIVE_ASSET)?;
            let ceiling =
                value_native as u128 * gas.tx_cost_limit_pct as u128 / BPS_DENOMINATOR as u128;
            require!(
                cost as u128 <= ceiling,
                CostError::CostPercentageAboveLimit
            );
        }
        prices.convert(cost, &NATIVE_ASSET, &gas.payment_asset)?
    };

    let quote = CostQuote {
        units,
        unit_price,
        cost,
        payment_asset: gas.payment_asset,
        payment,
    };

    if gas.is_permissive() && custody.balance_of(&gas.payment_asset)? < payment {
        msg!(
            "Reimbursement skipped: custody balance below {} of {}",
            payment,
            gas.payment_asset
        );
        return Ok(MeteredOutcome {
            value,
            reimbursement: Reimbursement::Skipped(quote),
        });
    }

    custody.transfer_out(&gas.payment_asset, payment, &gas.fee_collector, &[])?;

    Ok(MeteredOutcome {
        value,
        reimbursement: Reimbursement::Paid(quote),
    })
}
