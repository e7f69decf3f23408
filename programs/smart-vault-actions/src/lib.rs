#![allow(unexpected_cfgs)]
use anchor_lang::prelude::*;

pub mod actions;
pub mod components;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use actions::{ConvertArgs, CrossDomainArgs, TransferArgs};
pub use instructions::*;
pub use state::{ActionConfig, GasLimits, Operation, Threshold};

declare_id!("7qVfTtRt3ZJb1MNP9xo4BGUYLwXkmsGbdV8eXDaF1dAB");

#[program]
pub mod smart_vault_actions {
    use super::*;

    pub fn initialize_action(ctx: Context<InitializeAction>, config: ActionConfig) -> Result<()> {
        instructions::initialize_action(ctx, config)
    }

    pub fn authorize(ctx: Context<ConfigureAction>, account: Pubkey, operation: Operation) -> Result<()> {
        instructions::authorize(ctx, account, operation)
    }

    pub fn unauthorize(ctx: Context<ConfigureAction>, account: Pubkey, operation: Operation) -> Result<()> {
        instructions::unauthorize(ctx, account, operation)
    }

    pub fn set_default_threshold(ctx: Context<ConfigureAction>, threshold: Threshold) -> Result<()> {
        instructions::set_default_threshold(ctx, threshold)
    }

    pub fn set_custom_threshold(
        ctx: Context<ConfigureAction>,
        asset: Pubkey,
        threshold: Threshold,
    ) -> Result<()> {
        instructions::set_custom_threshold(ctx, asset, threshold)
    }

    pub fn set_limit<'info>(
        ctx: Context<'_, '_, 'info, 'info, ConfigureLimit<'info>>,
        accounting_asset: Pubkey,
        capacity: u64,
        period: u64,
    ) -> Result<()> {
        instructions::set_limit(ctx, accounting_asset, capacity, period)
    }

    pub fn set_relayer(ctx: Context<ConfigureAction>, relayer: Pubkey, allowed: bool) -> Result<()> {
        instructions::set_relayer(ctx, relayer, allowed)
    }

    pub fn set_gas_limits(
        ctx: Context<ConfigureAction>,
        limits: GasLimits,
        payment_asset: Pubkey,
    ) -> Result<()> {
        instructions::set_gas_limits(ctx, limits, payment_asset)
    }

    pub fn set_permissive_mode(ctx: Context<ConfigureAction>, permissive: bool) -> Result<()> {
        instructions::set_permissive_mode(ctx, permissive)
    }

    pub fn set_fee_collector(ctx: Context<ConfigureAction>, fee_collector: Pubkey) -> Result<()> {
        instructions::set_fee_collector(ctx, fee_collector)
    }

    pub fn set_oracle_signer(ctx: Context<ConfigureAction>, signer: Pubkey, allowed: bool) -> Result<()> {
        instructions::set_oracle_signer(ctx, signer, allowed)
    }

    pub fn set_max_slippage(ctx: Context<ConfigureAction>, max_slippage_bps: u64) -> Result<()> {
        instructions::set_max_slippage(ctx, max_slippage_bps)
    }

    pub fn set_recipient(ctx: Context<ConfigureAction>, recipient: Pubkey) -> Result<()> {
        instructions::set_recipient(ctx, recipient)
    }

    pub fn set_destination_domain(ctx: Context<ConfigureAction>, domain_id: u64) -> Result<()> {
        instructions::set_destination_domain(ctx, domain_id)
    }

    pub fn set_token_out(ctx: Context<ConfigureAction>, token_out: Pubkey) -> Result<()> {
        instructions::set_token_out(ctx, token_out)
    }

    pub fn execute_convert<'info>(
        ctx: Context<'_, '_, 'info, 'info, ExecuteAction<'info>>,
        args: ConvertArgs,
        quote_bundle: Option<Vec<u8>>,
    ) -> Result<()> {
        instructions::execute_convert(ctx, args, quote_bundle)
    }

    pub fn execute_transfer<'info>(
        ctx: Context<'_, '_, 'info, 'info, ExecuteAction<'info>>,
        args: TransferArgs,
        quote_bundle: Option<Vec<u8>>,
    ) -> Result<()> {
        instructions::execute_transfer(ctx, args, quote_bundle)
    }

    pub fn execute_cross_domain<'info>(
        ctx: Context<'_, '_, 'info, 'info, ExecuteAction<'info>>,
        args: CrossDomainArgs,
        quote_bundle: Option<Vec<u8>>,
    ) -> Result<()> {
        instructions::execute_cross_domain(ctx, args, quote_bundle)
    }
}
