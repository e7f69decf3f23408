pub mod action_state;
pub mod allow_list;
pub mod authorization;
pub mod gas_config;
pub mod limit_accrual;
pub mod threshold;

pub use action_state::*;
pub use allow_list::*;
pub use authorization::*;
pub use gas_config::*;
pub use limit_accrual::*;
pub use threshold::*;

#[cfg(test)]
pub mod state_tests;
