use crate::error::ConfigurationError;
use crate::utils::constants::MAX_ALLOW_LIST;
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Fixed-capacity set of keys (relayers, oracle signers).
///
/// Members occupy `[0, count)` without gaps; removal swaps the last member
/// into the freed slot.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct AllowList {
    pub members: [Pubkey; MAX_ALLOW_LIST],
    pub count: u8,
    pub _padding: [u8; 7],
}

impl AllowList {
    pub fn members(&self) -> &[Pubkey] {
        &self.members[..self.count as usize]
    }

    pub fn contains(&self, key: &Pubkey) -> bool {
        *key != Pubkey::default() && self.members().contains(key)
    }

    /// Adds or removes `key`. Returns whether it was a member before.
    pub fn set(&mut self, key: &Pubkey, allowed: bool) -> Result<bool> {
        require!(*key != Pubkey::default(), ConfigurationError::ZeroAddress);

        let position = self.members().iter().position(|member| member == key);
        match (position, allowed) {
            (Some(_), true) => Ok(true),
            (None, false) => Ok(false),
            (None, true) => {
                let index = self.count as usize;
                require!(index < MAX_ALLOW_LIST, ConfigurationError::AllowListFull);
                self.members[index] = *key;
                self.count += 1;
                Ok(false)
            }
            (Some(index), false) => {
                let last = self.count as usize - 1;
                self.members[index] = self.members[last];
                self.members[last] = Pubkey::default();
                self.count -= 1;
                Ok(true)
            }
        }
    }
}
