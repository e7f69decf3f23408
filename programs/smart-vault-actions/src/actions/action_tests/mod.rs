//! End-to-end tests of the execution pipeline against in-memory custody.
//!
//! - `swapper_tests`, `withdrawer_tests`, `bridger_tests`: kind-specific
//!   parameters, floors and primitive calls.
//! - `pipeline_tests`: gate, threshold and limit ordering, relayed calls and
//!   all-or-nothing effects through [`Ledger`](crate::test_utils::Ledger).


use crate::actions::ExecutionEnv;
use crate::components::price_resolver::PriceResolver;
use crate::test_utils::{key, ScriptedMeter};

pub(crate) const UNIT_PRICE: u64 = 1_000;
pub(crate) const CONSUMED: u64 = 188_000;
/// `execution_cost(CONSUMED, UNIT_PRICE)`
pub(crate) const RELAY_COST: u64 = 5_200;

pub(crate) fn env<'a>(
    caller: u8,
    now: i64,
    resolver: &'a PriceResolver,
    meter: &'a ScriptedMeter,
) -> ExecutionEnv<'a> {
    ExecutionEnv {
        caller: key(caller),
        now,
        resolver,
        meter,
    }
}

pub(crate) fn meter() -> ScriptedMeter {
    ScriptedMeter::new(UNIT_PRICE, CONSUMED)
}
