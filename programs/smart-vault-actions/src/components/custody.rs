//! Seam to the external custody program.
//!
//! Actions never touch balances directly. They instruct the custody service
//! through [`CustodyService`], and price lookups fall back to its
//! [`DefaultOracle`]. On-chain the seam is [`CustodyCpi`], which calls the
//! custody program with Anchor-style instruction data signed by the action's
//! authority PDA.
use crate::components::price_resolver::Rate;
use crate::error::CustodyError;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::{get_return_data, invoke_signed};

pub trait DefaultOracle {
    /// Custody-configured rate for `(base, quote)`, `None` when unset.
    fn default_price(&self, base: &Pubkey, quote: &Pubkey) -> Result<Option<Rate>>;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConvertRequest {
    pub asset_in: Pubkey,
    pub asset_out: Pubkey,
    pub amount_in: u64,
    pub min_amount_out: u64,
    pub adapter_id: u8,
    pub aux_data: Vec<u8>,
}

pub trait CustodyService: DefaultOracle {
    /// Converts through the adapter and returns the amount received.
    fn convert(&mut self, request: &ConvertRequest) -> Result<u64>;

    fn transfer_out(
        &mut self,
        asset: &Pubkey,
        amount: u64,
        recipient: &Pubkey,
        aux_data: &[u8],
    ) -> Result<()>;

    fn transfer_cross_domain(
        &mut self,
        asset: &Pubkey,
        amount_in: u64,
        min_amount_out: u64,
        domain_id: u64,
        aux_data: &[u8],
    ) -> Result<()>;

    fn balance_of(&self, asset: &Pubkey) -> Result<u64>;
}

#[derive(AnchorSerialize)]
struct TransferOutArgs {
    asset: Pubkey,
    amount: u64,
    recipient: Pubkey,
    aux_data: Vec<u8>,
}

#[derive(AnchorSerialize)]
struct TransferCrossDomainArgs {
    asset: Pubkey,
    amount_in: u64,
    min_amount_out: u64,
    domain_id: u64,
    aux_data: Vec<u8>,
}

#[derive(AnchorSerialize)]
struct PairArgs {
    base: Pubkey,
    quote: Pubkey,
}

#[derive(AnchorSerialize)]
struct AssetArgs {
    asset: Pubkey,
}

/// Anchor global-namespace discriminator for `method`.
pub(crate) fn sighash(method: &str) -> [u8; 8] {
    let preimage = format!("global:{method}");
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

/// Whether a custody call may write the custody account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CustodyAccess {
    Read,
    Write,
}

/// Account metas for a custody call: action authority (signer), custody
/// account (writable only for [`CustodyAccess::Write`]), then the remaining
/// accounts with the privileges they were passed in with.
pub(crate) fn custody_metas(
    authority: &Pubkey,
    custody: &Pubkey,
    access: CustodyAccess,
    remaining: &[AccountInfo],
) -> Vec<AccountMeta> {
    let mut accounts = Vec::with_capacity(2 + remaining.len());
    accounts.push(AccountMeta::new_readonly(*authority, true));
    accounts.push(match access {
        CustodyAccess::Write => AccountMeta::new(*custody, false),
        CustodyAccess::Read => AccountMeta::new_readonly(*custody, false),
    });
    accounts.extend(remaining.iter().map(|info| {
        if info.is_writable {
            AccountMeta::new(*info.key, info.is_signer)
        } else {
            AccountMeta::new_readonly(*info.key, info.is_signer)
        }
    }));
    accounts
}

/// CPI client for the custody program. Price and balance reads pass the
/// custody account read-only; conversions and transfers pass it writable.
pub struct CustodyCpi<'a, 'info> {
    program: AccountInfo<'info>,
    custody: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    remaining: &'a [AccountInfo<'info>],
    signer_seeds: &'a [&'a [u8]],
}

impl<'a, 'info> CustodyCpi<'a, 'info> {
    pub fn new(
        program: AccountInfo<'info>,
        custody: AccountInfo<'info>,
        authority: AccountInfo<'info>,
        remaining: &'a [AccountInfo<'info>],
        signer_seeds: &'a [&'a [u8]],
    ) -> Self {
        Self {
            program,
            custody,
            authority,
            remaining,
            signer_seeds,
        }
    }

    fn invoke<A: AnchorSerialize>(
        &self,
        method: &str,
        access: CustodyAccess,
        args: &A,
    ) -> Result<()> {
        let mut data = sighash(method).to_vec();
        args.serialize(&mut data)
            .map_err(|_| error!(CustodyError::AdapterFailure))?;

        let instruction = Instruction {
            program_id: self.program.key(),
            accounts: custody_metas(
                self.authority.key,
                self.custody.key,
                access,
                self.remaining,
            ),
            data,
        };

        let mut infos = Vec::with_capacity(3 + self.remaining.len());
        infos.push(self.authority.clone());
        infos.push(self.custody.clone());
        infos.extend(self.remaining.iter().cloned());
        infos.push(self.program.clone());

        invoke_signed(&instruction, &infos, &[self.signer_seeds])?;
        Ok(())
    }

    fn read_return<T: AnchorDeserialize>(&self) -> Result<T> {
        let (program_id, data) = get_return_data().ok_or(CustodyError::MissingReturnData)?;
        require_keys_eq!(
            program_id,
            self.program.key(),
            CustodyError::UnexpectedReturnProgram
        );
        T::try_from_slice(&data).map_err(|_| error!(CustodyError::MissingReturnData))
    }
}

impl DefaultOracle for CustodyCpi<'_, '_> {
    fn default_price(&self, base: &Pubkey, quote: &Pubkey) -> Result<Option<Rate>> {
        self.invoke(
            "default_price",
            CustodyAccess::Read,
            &PairArgs {
                base: *base,
                quote: *quote,
            },
        )?;
        let raw: Option<u128> = self.read_return()?;
        Ok(raw.map(Rate::from_raw))
    }
}

impl CustodyService for CustodyCpi<'_, '_> {
    fn convert(&mut self, request: &ConvertRequest) -> Result<u64> {
        self.invoke("convert", CustodyAccess::Write, request)?;
        self.read_return()
    }

    fn transfer_out(
        &mut self,
        asset: &Pubkey,
        amount: u64,
        recipient: &Pubkey,
        aux_data: &[u8],
    ) -> Result<()> {
        self.invoke(
            "transfer_out",
            CustodyAccess::Write,
            &TransferOutArgs {
                asset: *asset,
                amount,
                recipient: *recipient,
                aux_data: aux_data.to_vec(),
            },
        )
    }

    fn transfer_cross_domain(
        &mut self,
        asset: &Pubkey,
        amount_in: u64,
        min_amount_out: u64,
        domain_id: u64,
        aux_data: &[u8],
    ) -> Result<()> {
        self.invoke(
            "transfer_cross_domain",
            CustodyAccess::Write,
            &TransferCrossDomainArgs {
                asset: *asset,
                amount_in,
                min_amount_out,
                domain_id,
                aux_data: aux_data.to_vec(),
            },
        )
    }

    fn balance_of(&self, asset: &Pubkey) -> Result<u64> {
        self.invoke(
            "balance_of",
            CustodyAccess::Read,
            &AssetArgs { asset: *asset },
        )?;
        self.read_return()
    }
}
