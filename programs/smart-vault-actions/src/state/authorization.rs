use crate::error::AuthorizationError;
use crate::utils::constants::MAX_AUTHORIZED_ACCOUNTS;
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Identifier for every gated entry point of an action.
///
/// Each variant owns one bit of [`Permissions`]. The gate is configured
/// through itself: granting requires `Authorize`, revoking requires
/// `Unauthorize`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Operation {
    // Gate
    Authorize = 0,
    Unauthorize = 1,
    // Threshold and limit policy
    SetDefaultThreshold = 2,
    SetCustomThreshold = 3,
    SetLimit = 4,
    // Relayer metering
    SetRelayer = 5,
    SetGasLimits = 6,
    SetPermissiveMode = 7,
    SetFeeCollector = 8,
    // Price resolution
    SetOracleSigner = 9,
    // Action parameters
    SetMaxSlippage = 10,
    SetRecipient = 11,
    SetDestinationDomain = 12,
    SetTokenOut = 13,
    Execute = 14,
}

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::Authorize,
        Operation::Unauthorize,
        Operation::SetDefaultThreshold,
        Operation::SetCustomThreshold,
        Operation::SetLimit,
        Operation::SetRelayer,
        Operation::SetGasLimits,
        Operation::SetPermissiveMode,
        Operation::SetFeeCollector,
        Operation::SetOracleSigner,
        Operation::SetMaxSlippage,
        Operation::SetRecipient,
        Operation::SetDestinationDomain,
        Operation::SetTokenOut,
        Operation::Execute,
    ];

    /// Single-bit permission set for this operation.
    #[inline(always)]
    pub const fn permission(self) -> Permissions {
        Permissions(1u64 << (self as u8))
    }
}

/// Compact bitfield of granted operations for one account.
///
/// The transparent `u64` wrapper keeps the zero-copy layout stable while
/// giving type-safe grant/revoke helpers. Bits outside [`Self::VALID_MASK`]
/// are never produced by the helpers and are dropped on reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable, Default, AnchorDeserialize, AnchorSerialize)]
#[repr(transparent)]
pub struct Permissions(u64);

impl Permissions {
    /// Every operation known to this program version.
    pub const VALID_MASK: u64 = (1u64 << Operation::ALL.len()) - 1;

    /// Bootstrap grant for the action owner.
    pub const ALL: Self = Self(Self::VALID_MASK);

    #[inline(always)]
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline(always)]
    pub fn has(self, permission: Self) -> bool {
        (self.0 & permission.0) != 0
    }

    #[inline(always)]
    pub fn allows(self, operation: Operation) -> bool {
        self.has(operation.permission())
    }

    #[inline(always)]
    pub fn grant(&mut self, permission: Self) {
        self.0 |= permission.0;
    }

    #[inline(always)]
    pub fn revoke(&mut self, permission: Self) {
        self.0 &= !permission.0;
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Masks bits written by a future program version.
    #[inline(always)]
    pub const fn from_u64_truncate(value: u64) -> Self {
        Self(value & Self::VALID_MASK)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PermissionEntry {
    pub account: Pubkey,
    pub permissions: Permissions,
}

/// Per-action capability table: `(account, operation) -> granted`.
///
/// # Invariants
///
/// - Slots `[0, entry_count)` hold distinct, non-default accounts with a
///   non-empty permission set; every slot past `entry_count` is zeroed.
/// - An account holds an operation or it does not. There is no expiry and no
///   delegation depth.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct AuthorizationGate {
    pub entries: [PermissionEntry; MAX_AUTHORIZED_ACCOUNTS],
    pub entry_count: u8,
    pub _padding: [u8; 7],
}

impl AuthorizationGate {
    /// Resets the table and grants every operation to `owner`.
    pub fn bootstrap(&mut self, owner: &Pubkey) -> Result<()> {
        require!(*owner != Pubkey::default(), AuthorizationError::InvalidAccount);

        *self = Self::zeroed();
        self.entries[0] = PermissionEntry {
            account: *owner,
            permissions: Permissions::ALL,
        };
        self.entry_count = 1;
        Ok(())
    }

    pub fn active_entries(&self) -> &[PermissionEntry] {
        &self.entries[..self.entry_count as usize]
    }

    fn position(&self, account: &Pubkey) -> Option<usize> {
        self.active_entries()
            .iter()
            .position(|entry| entry.account == *account)
    }

    /// Permission set currently held by `account` (empty when absent).
    pub fn permissions_of(&self, account: &Pubkey) -> Permissions {
        self.position(account)
            .map(|index| self.entries[index].permissions)
            .unwrap_or_default()
    }

    pub fn is_authorized(&self, account: &Pubkey, operation: Operation) -> bool {
        self.permissions_of(account).allows(operation)
    }

    /// Uniform guard every state-mutating entry point calls first.
    pub fn require(&self, caller: &Pubkey, operation: Operation) -> Result<()> {
        require!(
            self.is_authorized(caller, operation),
            AuthorizationError::Unauthorized
        );
        Ok(())
    }

    /// Grants `operation` to `account`. Returns the permission set held
    /// before the change.
    pub fn authorize(
        &mut self,
        caller: &Pubkey,
        account: &Pubkey,
        operation: Operation,
    ) -> Result<Permissions> {
        self.require(caller, Operation::Authorize)?;
        require!(*account != Pubkey::default(), AuthorizationError::InvalidAccount);

        let index = match self.position(account) {
            Some(index) => index,
            None => {
                let index = self.entry_count as usize;
                require!(
                    index < MAX_AUTHORIZED_ACCOUNTS,
                    AuthorizationError::AuthorizationTableFull
                );
                self.entries[index] = PermissionEntry {
                    account: *account,
                    permissions: Permissions::new(),
                };
                self.entry_count += 1;
                index
            }
        };

        let before = self.entries[index].permissions;
        self.entries[index].permissions.grant(operation.permission());
        Ok(before)
    }

    /// Revokes `operation` from `account`. Accounts left with no permission
    /// are removed and the table is compacted. Returns the permission set held
    /// before the change.
    pub fn unauthorize(
        &mut self,
        caller: &Pubkey,
        account: &Pubkey,
        operation: Operation,
    ) -> Result<Permissions> {
        self.require(caller, Operation::Unauthorize)?;

        let Some(index) = self.position(account) else {
            return Ok(Permissions::new());
        };

        let before = self.entries[index].permissions;
        self.entries[index].permissions.revoke(operation.permission());

        if self.entries[index].permissions.is_empty() {
            let last = self.entry_count as usize - 1;
            self.entries[index] = self.entries[last];
            self.entries[last] = PermissionEntry::default();
            self.entry_count -= 1;
        }

        Ok(before)
    }
}
