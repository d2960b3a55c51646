//! Token Ledger — balances, allowances, delegated transfer
//!
//! The escrow ledger only ever talks to a token through the [`TokenLedger`]
//! capability, so any conforming implementation can back it. [`FungibleToken`]
//! is the in-process implementation:
//! - Fixed supply minted to the deployer at construction
//! - Owner-initiated `transfer`
//! - `approve` sets (replaces) a spender's allowance
//! - `transfer_from` spends allowance and balance together, all or nothing

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info, warn};
use types::ids::Address;
use types::numeric::Amount;

use crate::config::TokenConfig;
use crate::errors::TokenError;
use crate::events::{Approval, TokenEvent, Transfer};

/// Capability interface over a fungible token ledger.
///
/// Every mutating call names its `caller` explicitly; implementations must
/// leave their state untouched whenever they return an error.
pub trait TokenLedger {
    /// Address this ledger is deployed at.
    fn address(&self) -> Address;

    /// Set `spender`'s allowance over `caller`'s balance to exactly `amount`.
    fn approve(&mut self, caller: &Address, spender: &Address, amount: Amount);

    /// Move `amount` from `caller` to `to`.
    fn transfer(&mut self, caller: &Address, to: &Address, amount: Amount) -> Result<(), TokenError>;

    /// Move `amount` from `owner` to `to`, spending `caller`'s allowance.
    fn transfer_from(
        &mut self,
        caller: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError>;

    fn balance_of(&self, account: &Address) -> Amount;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    fn total_supply(&self) -> Amount;
}

/// In-process fungible token ledger.
#[derive(Debug)]
pub struct FungibleToken {
    address: Address,
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: Amount,
    /// Balances: account -> amount
    balances: HashMap<Address, Amount>,
    /// Allowances: (owner, spender) -> remaining
    allowances: HashMap<(Address, Address), Amount>,
    /// Emitted events log (append-only)
    events: Vec<TokenEvent>,
}

impl FungibleToken {
    /// Create a token at `address`, minting the configured supply to `deployer`.
    ///
    /// A zero supply mints nothing and emits no event.
    pub fn new(address: Address, deployer: Address, config: TokenConfig) -> Self {
        let mut balances = HashMap::new();
        let mut events = Vec::new();
        if config.initial_supply > 0 {
            balances.insert(deployer, config.initial_supply);
            events.push(TokenEvent::Transfer(Transfer {
                from: Address::ZERO,
                to: deployer,
                value: config.initial_supply,
            }));
        }

        info!(
            token = %address,
            deployer = %deployer,
            symbol = %config.symbol,
            supply = %config.initial_supply,
            "Token ledger deployed"
        );

        Self {
            address,
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
            total_supply: config.initial_supply,
            balances,
            allowances: HashMap::new(),
            events,
        }
    }

    /// Deploy at the address derived from `(deployer, nonce)`.
    pub fn deploy(deployer: Address, nonce: u64, config: TokenConfig) -> Self {
        Self::new(Address::derive(&deployer, nonce), deployer, config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    /// Sum of all balances. Always equal to `total_supply()`.
    pub fn circulating(&self) -> Amount {
        self.balances.values().sum()
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    /// Move tokens between accounts, validating everything before mutating.
    fn move_balance(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                account: *from,
                required: amount,
                available,
            });
        }

        if from != to {
            let credited = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            self.balances.insert(*from, available - amount);
            self.balances.insert(*to, credited);
        }

        self.events.push(TokenEvent::Transfer(Transfer {
            from: *from,
            to: *to,
            value: amount,
        }));
        Ok(())
    }
}

impl TokenLedger for FungibleToken {
    fn address(&self) -> Address {
        self.address
    }

    fn approve(&mut self, caller: &Address, spender: &Address, amount: Amount) {
        self.allowances.insert((*caller, *spender), amount);
        self.events.push(TokenEvent::Approval(Approval {
            owner: *caller,
            spender: *spender,
            value: amount,
        }));
        debug!(owner = %caller, spender = %spender, value = %amount, "Allowance set");
    }

    fn transfer(&mut self, caller: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        self.move_balance(caller, to, amount).map_err(|err| {
            warn!(from = %caller, to = %to, value = %amount, error = %err, "Transfer rejected");
            err
        })?;
        debug!(from = %caller, to = %to, value = %amount, "Transfer");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        caller: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let remaining = self.allowance(owner, caller);
        if remaining < amount {
            warn!(
                owner = %owner,
                spender = %caller,
                required = %amount,
                available = %remaining,
                "Delegated transfer rejected: insufficient allowance"
            );
            return Err(TokenError::InsufficientAllowance {
                owner: *owner,
                spender: *caller,
                required: amount,
                available: remaining,
            });
        }

        self.move_balance(owner, to, amount).map_err(|err| {
            warn!(owner = %owner, spender = %caller, error = %err, "Delegated transfer rejected");
            err
        })?;
        self.allowances.insert((*owner, *caller), remaining - amount);

        debug!(
            owner = %owner,
            spender = %caller,
            to = %to,
            value = %amount,
            allowance_left = %(remaining - amount),
            "Delegated transfer"
        );
        Ok(())
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }
}

/// Cloneable handle to a token ledger.
///
/// Lets the depositor approve on the same ledger instance the escrow pulls
/// from. Execution is single-threaded and serialized, so interior mutability
/// through `RefCell` is enough.
///
/// Prefer [`with`](Self::with) and [`with_mut`](Self::with_mut), which end
/// the borrow when the closure returns. A guard from `borrow()` held across
/// an escrow call makes that call's pull or payout panic with "already
/// borrowed".
#[derive(Debug)]
pub struct SharedLedger<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> SharedLedger<T> {
    pub fn new(ledger: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ledger)),
        }
    }

    /// Run `f` against the ledger under a shared borrow.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.borrow())
    }

    /// Run `f` against the ledger under an exclusive borrow.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.inner.borrow_mut())
    }

    /// # Panics
    /// Panics if the ledger is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    /// # Panics
    /// Panics if the ledger is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }
}

impl<T> Clone for SharedLedger<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: TokenLedger> TokenLedger for SharedLedger<T> {
    fn address(&self) -> Address {
        self.inner.borrow().address()
    }

    fn approve(&mut self, caller: &Address, spender: &Address, amount: Amount) {
        self.inner.borrow_mut().approve(caller, spender, amount)
    }

    fn transfer(&mut self, caller: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        self.inner.borrow_mut().transfer(caller, to, amount)
    }

    fn transfer_from(
        &mut self,
        caller: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.inner.borrow_mut().transfer_from(caller, owner, to, amount)
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.inner.borrow().balance_of(account)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.inner.borrow().allowance(owner, spender)
    }

    fn total_supply(&self) -> Amount {
        self.inner.borrow().total_supply()
    }
}
