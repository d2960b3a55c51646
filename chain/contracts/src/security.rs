//! Shared security primitives for contract modules
//!
//! Reentrancy protection and the fixed role table the escrow ledger checks
//! callers against.

use serde::{Deserialize, Serialize};
use types::ids::Address;

/// Reentrancy guard preventing nested calls into protected functions.
///
/// A contract function acquires the guard before executing state-changing
/// logic and releases it on completion. Any nested call attempt fails.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `true` if successfully acquired.
    /// Returns `false` if already locked (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Release the guard.
    pub fn release(&mut self) {
        self.locked = false;
    }

    /// Check if currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Escrow authority roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administrative authority, the deployer
    Owner,
    /// Dispute arbitration authority
    Resolver,
}

/// Role table fixed at construction.
///
/// There are no setters: once a ledger is built with a role table, the
/// holders of each role never change. One address may hold both roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roles {
    owner: Address,
    resolver: Address,
}

impl Roles {
    pub fn new(owner: Address, resolver: Address) -> Self {
        Self { owner, resolver }
    }

    /// Check if a caller holds the specified role.
    pub fn has_role(&self, caller: &Address, role: Role) -> bool {
        match role {
            Role::Owner => *caller == self.owner,
            Role::Resolver => *caller == self.resolver,
        }
    }

    /// Check if a caller holds at least one of the given roles.
    pub fn has_any(&self, caller: &Address, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(caller, *role))
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn resolver(&self) -> &Address {
        &self.resolver
    }
}
