//! Escrow Ledger — agreement bookkeeping, fund locking, role-gated settlement
//!
//! Agreement lifecycle: `nonexistent → active → settled`.
//!
//! Funding follows the two-phase protocol: the depositor first approves the
//! escrow's address on the token ledger, then calls `create_escrow`, which
//! pulls the approved amount into the escrow's own token balance. The record
//! is written only after the pull succeeds.
//!
//! All state-changing operations check, in order:
//! 1. Reentrancy guard
//! 2. Role (settlement only)
//! 3. Agreement existence and state
//! 4. Token ledger outcome

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use types::ids::{Address, EscrowId};
use types::numeric::{Amount, NO_TIME_LOCK};

use crate::config::EscrowConfig;
use crate::errors::EscrowError;
use crate::events::{EscrowCreated, EscrowEvent, EscrowRefunded, EscrowReleased};
use crate::policy::{ArbitrationPolicy, Resolution};
use crate::security::{ReentrancyGuard, Role, Roles};
use crate::token::TokenLedger;

/// Where the held funds of a settled agreement went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// Paid to the beneficiary
    Released,
    /// Returned to the depositor
    Refunded,
}

/// A single escrow agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowAgreement {
    pub depositor: Address,
    pub beneficiary: Address,
    pub amount: Amount,
    /// Earliest release time; 0 means no time lock
    pub release_time: u64,
    pub settled: bool,
    pub outcome: Option<Settlement>,
}

impl EscrowAgreement {
    /// Whether a release at `now` is blocked by the time lock.
    pub fn is_locked_at(&self, now: u64) -> bool {
        self.release_time != NO_TIME_LOCK && now < self.release_time
    }
}

/// Core escrow contract holding funds on one token ledger.
#[derive(Debug)]
pub struct EscrowLedger<T: TokenLedger> {
    /// Address the escrow holds its token balance under
    address: Address,
    config: EscrowConfig,
    roles: Roles,
    token: T,
    /// Agreements: id -> record. Never removed.
    agreements: HashMap<EscrowId, EscrowAgreement>,
    reentrancy_guard: ReentrancyGuard,
    /// Emitted events log (append-only)
    events: Vec<EscrowEvent>,
}

impl<T: TokenLedger> EscrowLedger<T> {
    /// Create an escrow at `address` bound to `token`.
    ///
    /// Fails if `token` is not deployed at `config.token_address`.
    pub fn new(address: Address, config: EscrowConfig, token: T) -> Result<Self, EscrowError> {
        let actual = token.address();
        if actual != config.token_address {
            return Err(EscrowError::TokenMismatch {
                expected: config.token_address,
                actual,
            });
        }

        info!(
            escrow = %address,
            owner = %config.owner,
            resolver = %config.resolver,
            token = %config.token_address,
            "Escrow ledger deployed"
        );

        Ok(Self {
            address,
            roles: Roles::new(config.owner, config.resolver),
            config,
            token,
            agreements: HashMap::new(),
            reentrancy_guard: ReentrancyGuard::new(),
            events: Vec::new(),
        })
    }

    /// Deploy at the address derived from `(deployer, nonce)`, with the
    /// deployer holding both the owner and resolver roles.
    pub fn deploy(deployer: Address, nonce: u64, token: T) -> Self {
        let address = Address::derive(&deployer, nonce);
        let config = EscrowConfig::new(deployer, token.address());
        info!(
            escrow = %address,
            owner = %deployer,
            resolver = %deployer,
            token = %config.token_address,
            "Escrow ledger deployed"
        );
        Self {
            address,
            roles: Roles::new(deployer, deployer),
            config,
            token,
            agreements: HashMap::new(),
            reentrancy_guard: ReentrancyGuard::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Creation ─────────────────────────

    /// Create a new agreement funded from `caller`'s approved balance.
    ///
    /// `id` is the textual 32-byte identifier. Checks run in order and the
    /// first failure wins: malformed id, duplicate id, zero amount, an
    /// unpayable beneficiary, then the token pull. Nothing is recorded unless
    /// the pull succeeds.
    pub fn create_escrow(
        &mut self,
        caller: &Address,
        id: &str,
        amount: Amount,
        beneficiary: &Address,
        release_time: u64,
    ) -> Result<bool, EscrowError> {
        self.guarded(|this| this.try_create(caller, id, amount, beneficiary, release_time))
            .map_err(|err| {
                warn!(depositor = %caller, id, error = %err, "Escrow creation rejected");
                err
            })
    }

    fn try_create(
        &mut self,
        caller: &Address,
        id: &str,
        amount: Amount,
        beneficiary: &Address,
        release_time: u64,
    ) -> Result<bool, EscrowError> {
        let id = EscrowId::parse(id)?;

        if self.agreements.contains_key(&id) {
            return Err(EscrowError::DuplicateIdentifier { id });
        }

        if amount == 0 {
            return Err(EscrowError::InvalidAmount);
        }

        // A payout to the escrow itself would settle without moving custody.
        if beneficiary.is_zero() || *beneficiary == self.address {
            return Err(EscrowError::InvalidBeneficiary {
                beneficiary: *beneficiary,
            });
        }

        // Pull first: nothing local changes until custody is confirmed.
        let escrow = self.address;
        self.token
            .transfer_from(&escrow, caller, &escrow, amount)
            .map_err(EscrowError::FundingFailed)?;

        self.agreements.insert(
            id,
            EscrowAgreement {
                depositor: *caller,
                beneficiary: *beneficiary,
                amount,
                release_time,
                settled: false,
                outcome: None,
            },
        );

        self.events.push(EscrowEvent::Created(EscrowCreated {
            id,
            depositor: *caller,
            beneficiary: *beneficiary,
            amount,
            release_time,
        }));

        info!(
            %id,
            depositor = %caller,
            beneficiary = %beneficiary,
            amount = %amount,
            release_time,
            "Escrow created"
        );
        Ok(true)
    }

    // ───────────────────────── Settlement ─────────────────────────

    /// Pay an agreement's held amount to its beneficiary.
    ///
    /// Owner or resolver only. A non-zero `release_time` must have passed.
    pub fn release(&mut self, caller: &Address, id: &EscrowId, now: u64) -> Result<(), EscrowError> {
        self.guarded(|this| {
            this.authorize(caller, &[Role::Owner, Role::Resolver])?;
            this.settle(caller, id, Settlement::Released, now)
        })
        .map_err(|err| settlement_rejected("release", caller, id, err))
    }

    /// Return an agreement's held amount to its depositor. Resolver only.
    pub fn refund(&mut self, caller: &Address, id: &EscrowId) -> Result<(), EscrowError> {
        self.guarded(|this| {
            this.authorize(caller, &[Role::Resolver])?;
            this.settle(caller, id, Settlement::Refunded, 0)
        })
        .map_err(|err| settlement_rejected("refund", caller, id, err))
    }

    /// Settle a disputed agreement as decided by `policy`. Resolver only.
    ///
    /// A release decision is still subject to the time lock.
    pub fn resolve(
        &mut self,
        caller: &Address,
        id: &EscrowId,
        now: u64,
        policy: &dyn ArbitrationPolicy,
    ) -> Result<Resolution, EscrowError> {
        self.guarded(|this| {
            this.authorize(caller, &[Role::Resolver])?;
            let agreement = this.active_agreement(id)?;
            let resolution = policy.decide(id, agreement, now);
            debug!(%id, resolver = %caller, ?resolution, "Arbitration decided");

            let outcome = match resolution {
                Resolution::Release => Settlement::Released,
                Resolution::Refund => Settlement::Refunded,
            };
            this.settle(caller, id, outcome, now)?;
            Ok(resolution)
        })
        .map_err(|err| settlement_rejected("resolve", caller, id, err))
    }

    fn settle(
        &mut self,
        caller: &Address,
        id: &EscrowId,
        outcome: Settlement,
        now: u64,
    ) -> Result<(), EscrowError> {
        let agreement = self.active_agreement(id)?;
        let amount = agreement.amount;
        let payee = match outcome {
            Settlement::Released => {
                if agreement.is_locked_at(now) {
                    return Err(EscrowError::StillLocked {
                        release_time: agreement.release_time,
                        now,
                    });
                }
                agreement.beneficiary
            }
            Settlement::Refunded => agreement.depositor,
        };

        let escrow = self.address;
        self.token
            .transfer(&escrow, &payee, amount)
            .map_err(EscrowError::SettlementFailed)?;

        if let Some(agreement) = self.agreements.get_mut(id) {
            agreement.settled = true;
            agreement.outcome = Some(outcome);
        }

        let event = match outcome {
            Settlement::Released => EscrowEvent::Released(EscrowReleased {
                id: *id,
                beneficiary: payee,
                amount,
                released_by: *caller,
            }),
            Settlement::Refunded => EscrowEvent::Refunded(EscrowRefunded {
                id: *id,
                depositor: payee,
                amount,
                refunded_by: *caller,
            }),
        };
        self.events.push(event);

        info!(%id, payee = %payee, amount = %amount, ?outcome, by = %caller, "Escrow settled");
        Ok(())
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        *self.roles.owner()
    }

    pub fn resolver(&self) -> Address {
        *self.roles.resolver()
    }

    pub fn token_address(&self) -> Address {
        self.config.token_address
    }

    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// Get an agreement by id, settled or not.
    pub fn get_escrow(&self, id: &EscrowId) -> Option<&EscrowAgreement> {
        self.agreements.get(id)
    }

    /// Number of agreements ever created.
    pub fn agreement_count(&self) -> usize {
        self.agreements.len()
    }

    /// Total amount held for agreements not yet settled.
    pub fn locked_total(&self) -> Amount {
        self.agreements
            .values()
            .filter(|a| !a.settled)
            .map(|a| a.amount)
            .sum()
    }

    /// The token ledger this escrow is bound to.
    pub fn token(&self) -> &T {
        &self.token
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<EscrowEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    /// Run `op` holding the reentrancy guard, releasing it on every path.
    ///
    /// `&mut self` already rules out nested entry from safe code; the guard
    /// catches it if a future caller path ever gets around that.
    fn guarded<R>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<R, EscrowError>,
    ) -> Result<R, EscrowError> {
        if !self.reentrancy_guard.acquire() {
            return Err(EscrowError::Reentrancy);
        }
        let result = op(self);
        self.reentrancy_guard.release();
        result
    }

    fn authorize(&self, caller: &Address, roles: &[Role]) -> Result<(), EscrowError> {
        if !self.roles.has_any(caller, roles) {
            debug!(caller = %caller, ?roles, "Caller lacks settlement role");
            return Err(EscrowError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    fn active_agreement(&self, id: &EscrowId) -> Result<&EscrowAgreement, EscrowError> {
        let agreement = self
            .agreements
            .get(id)
            .ok_or(EscrowError::NotFound { id: *id })?;
        if agreement.settled {
            return Err(EscrowError::AlreadySettled { id: *id });
        }
        Ok(agreement)
    }
}

fn settlement_rejected(op: &str, caller: &Address, id: &EscrowId, err: EscrowError) -> EscrowError {
    warn!(op, caller = %caller, %id, error = %err, "Escrow settlement rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use crate::errors::TokenError;
    use crate::policy::{RefundDepositor, ReleaseToBeneficiary};
    use crate::token::FungibleToken;
    use std::sync::{Arc, Mutex};
    use types::errors::IdError;

    const ID_A: &str = "0x5d3d8741c1e0b2f4a9d6e3b7c8f1a2d5e4b9c6f3a8d7e2b1c4f5a6d9e0b3da31";
    const ID_B: &str = "0x00000000000000000000000000000000000000000000000000000000000000b2";

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn deployer() -> Address {
        addr(0xa0)
    }

    fn depositor() -> Address {
        addr(0xa1)
    }

    fn beneficiary() -> Address {
        addr(0xb1)
    }

    fn id(text: &str) -> EscrowId {
        EscrowId::parse(text).unwrap()
    }

    /// Escrow deployed by `deployer`, depositor funded with 1_000 tokens.
    fn setup_escrow() -> EscrowLedger<FungibleToken> {
        let mut token = FungibleToken::new(addr(0xee), deployer(), TokenConfig::with_supply(10_000));
        token.transfer(&deployer(), &depositor(), 1_000).unwrap();
        EscrowLedger::deploy(deployer(), 1, token)
    }

    fn approve(escrow: &mut EscrowLedger<FungibleToken>, amount: Amount) {
        let spender = escrow.address();
        escrow.token.approve(&depositor(), &spender, amount);
    }

    fn funded(amount: Amount, release_time: u64) -> EscrowLedger<FungibleToken> {
        let mut escrow = setup_escrow();
        approve(&mut escrow, amount);
        escrow
            .create_escrow(&depositor(), ID_A, amount, &beneficiary(), release_time)
            .unwrap();
        escrow
    }

    // ─── Construction ───

    #[test]
    fn test_deploy_sets_roles() {
        let escrow = setup_escrow();
        assert_eq!(escrow.owner(), deployer());
        assert_eq!(escrow.resolver(), deployer());
        assert_eq!(escrow.token_address(), addr(0xee));
    }

    #[test]
    fn test_new_rejects_mismatched_token() {
        let token = FungibleToken::new(addr(0xee), deployer(), TokenConfig::default());
        let config = EscrowConfig::new(deployer(), addr(0xef));
        let result = EscrowLedger::new(addr(0xcc), config, token);
        assert!(matches!(
            result,
            Err(EscrowError::TokenMismatch { expected, actual })
                if expected == addr(0xef) && actual == addr(0xee)
        ));
    }

    // ─── Creation ───

    #[test]
    fn test_create_escrow_success() {
        let escrow = funded(100, 0);
        let agreement = escrow.get_escrow(&id(ID_A)).unwrap();
        assert_eq!(agreement.amount, 100);
        assert_eq!(agreement.beneficiary, beneficiary());
        assert_eq!(agreement.depositor, depositor());
        assert!(!agreement.settled);
        assert_eq!(escrow.token().balance_of(&escrow.address()), 100);
        assert_eq!(escrow.token().balance_of(&depositor()), 900);
        assert_eq!(escrow.locked_total(), 100);
    }

    #[test]
    fn test_create_escrow_emits_event() {
        let escrow = funded(100, 0);
        assert_eq!(
            escrow.events(),
            &[EscrowEvent::Created(EscrowCreated {
                id: id(ID_A),
                depositor: depositor(),
                beneficiary: beneficiary(),
                amount: 100,
                release_time: 0,
            })]
        );
    }

    #[test]
    fn test_create_escrow_empty_id() {
        let mut escrow = setup_escrow();
        approve(&mut escrow, 100);
        let result = escrow.create_escrow(&depositor(), "", 100, &beneficiary(), 0);
        assert_eq!(result, Err(EscrowError::MalformedIdentifier(IdError::Empty)));
        assert_eq!(escrow.agreement_count(), 0);
    }

    #[test]
    fn test_create_escrow_duplicate_id() {
        let mut escrow = funded(100, 0);
        approve(&mut escrow, 50);
        let result = escrow.create_escrow(&depositor(), ID_A, 50, &addr(0xb2), 7);
        assert_eq!(result, Err(EscrowError::DuplicateIdentifier { id: id(ID_A) }));

        let original = escrow.get_escrow(&id(ID_A)).unwrap();
        assert_eq!(original.amount, 100);
        assert_eq!(original.beneficiary, beneficiary());
        assert_eq!(escrow.token().allowance(&depositor(), &escrow.address()), 50);
    }

    #[test]
    fn test_create_escrow_zero_amount() {
        let mut escrow = setup_escrow();
        let result = escrow.create_escrow(&depositor(), ID_A, 0, &beneficiary(), 0);
        assert_eq!(result, Err(EscrowError::InvalidAmount));
        assert!(escrow.get_escrow(&id(ID_A)).is_none());
    }

    #[test]
    fn test_create_escrow_without_approval() {
        let mut escrow = setup_escrow();
        let result = escrow.create_escrow(&depositor(), ID_A, 100, &beneficiary(), 0);
        assert_eq!(
            result,
            Err(EscrowError::FundingFailed(TokenError::InsufficientAllowance {
                owner: depositor(),
                spender: escrow.address(),
                required: 100,
                available: 0,
            }))
        );
        assert_eq!(escrow.token().balance_of(&depositor()), 1_000);
        assert!(escrow.get_escrow(&id(ID_A)).is_none());
        assert!(escrow.events().is_empty());
    }

    #[test]
    fn test_create_escrow_beyond_balance() {
        let mut escrow = setup_escrow();
        approve(&mut escrow, 5_000);
        let result = escrow.create_escrow(&depositor(), ID_A, 5_000, &beneficiary(), 0);
        assert!(matches!(
            result,
            Err(EscrowError::FundingFailed(TokenError::InsufficientBalance { .. }))
        ));
        assert_eq!(escrow.token().allowance(&depositor(), &escrow.address()), 5_000);
    }

    #[test]
    fn test_create_escrow_rejects_escrow_as_beneficiary() {
        let mut escrow = setup_escrow();
        approve(&mut escrow, 100);
        let own = escrow.address();

        let result = escrow.create_escrow(&depositor(), ID_A, 100, &own, 0);
        assert_eq!(result, Err(EscrowError::InvalidBeneficiary { beneficiary: own }));
        assert!(escrow.get_escrow(&id(ID_A)).is_none());
        assert_eq!(escrow.token().balance_of(&own), 0);
        assert_eq!(escrow.token().balance_of(&depositor()), 1_000);
        assert_eq!(escrow.token().allowance(&depositor(), &own), 100);
    }

    #[test]
    fn test_create_escrow_rejects_zero_beneficiary() {
        let mut escrow = setup_escrow();
        approve(&mut escrow, 100);
        let result = escrow.create_escrow(&depositor(), ID_A, 100, &Address::ZERO, 0);
        assert_eq!(
            result,
            Err(EscrowError::InvalidBeneficiary {
                beneficiary: Address::ZERO
            })
        );
        assert_eq!(escrow.locked_total(), 0);
    }

    #[test]
    fn test_beneficiary_checked_after_amount() {
        let mut escrow = setup_escrow();
        let own = escrow.address();
        let result = escrow.create_escrow(&depositor(), ID_A, 0, &own, 0);
        assert_eq!(result, Err(EscrowError::InvalidAmount));
    }

    #[test]
    fn test_entry_while_guard_held_rejected() {
        let mut escrow = funded(100, 0);
        approve(&mut escrow, 50);

        assert!(escrow.reentrancy_guard.acquire());
        assert_eq!(
            escrow.create_escrow(&depositor(), ID_B, 50, &beneficiary(), 0),
            Err(EscrowError::Reentrancy)
        );
        assert_eq!(
            escrow.release(&deployer(), &id(ID_A), 0),
            Err(EscrowError::Reentrancy)
        );
        assert_eq!(escrow.agreement_count(), 1);
        assert_eq!(escrow.token().balance_of(&escrow.address()), 100);

        escrow.reentrancy_guard.release();
        escrow.release(&deployer(), &id(ID_A), 0).unwrap();
    }

    #[test]
    fn test_guard_released_after_failure() {
        let mut escrow = setup_escrow();
        assert!(escrow
            .create_escrow(&depositor(), ID_A, 100, &beneficiary(), 0)
            .is_err());
        approve(&mut escrow, 100);
        assert_eq!(
            escrow.create_escrow(&depositor(), ID_A, 100, &beneficiary(), 0),
            Ok(true)
        );
    }

    // ─── Release ───

    #[test]
    fn test_release_pays_beneficiary() {
        let mut escrow = funded(100, 0);
        escrow.release(&deployer(), &id(ID_A), 0).unwrap();

        let agreement = escrow.get_escrow(&id(ID_A)).unwrap();
        assert!(agreement.settled);
        assert_eq!(agreement.outcome, Some(Settlement::Released));
        assert_eq!(escrow.token().balance_of(&beneficiary()), 100);
        assert_eq!(escrow.token().balance_of(&escrow.address()), 0);
        assert_eq!(escrow.locked_total(), 0);
    }

    #[test]
    fn test_release_twice_fails() {
        let mut escrow = funded(100, 0);
        escrow.release(&deployer(), &id(ID_A), 0).unwrap();
        let result = escrow.release(&deployer(), &id(ID_A), 0);
        assert_eq!(result, Err(EscrowError::AlreadySettled { id: id(ID_A) }));
        assert_eq!(escrow.token().balance_of(&beneficiary()), 100);
    }

    #[test]
    fn test_release_unauthorized() {
        let mut escrow = funded(100, 0);
        let result = escrow.release(&beneficiary(), &id(ID_A), 0);
        assert_eq!(result, Err(EscrowError::Unauthorized { caller: beneficiary() }));
        assert!(!escrow.get_escrow(&id(ID_A)).unwrap().settled);
    }

    #[test]
    fn test_release_before_time_lock() {
        let mut escrow = funded(100, 3_600);
        let result = escrow.release(&deployer(), &id(ID_A), 3_599);
        assert_eq!(
            result,
            Err(EscrowError::StillLocked {
                release_time: 3_600,
                now: 3_599
            })
        );
        escrow.release(&deployer(), &id(ID_A), 3_600).unwrap();
    }

    #[test]
    fn test_release_unknown_id() {
        let mut escrow = setup_escrow();
        let result = escrow.release(&deployer(), &id(ID_B), 0);
        assert_eq!(result, Err(EscrowError::NotFound { id: id(ID_B) }));
    }

    // ─── Refund & arbitration ───

    #[test]
    fn test_refund_returns_to_depositor() {
        let mut escrow = funded(100, 3_600);
        escrow.refund(&deployer(), &id(ID_A)).unwrap();
        assert_eq!(escrow.token().balance_of(&depositor()), 1_000);
        assert_eq!(
            escrow.get_escrow(&id(ID_A)).unwrap().outcome,
            Some(Settlement::Refunded)
        );
    }

    #[test]
    fn test_refund_requires_resolver() {
        let token = FungibleToken::new(addr(0xee), deployer(), TokenConfig::with_supply(500));
        let config = EscrowConfig::new(deployer(), addr(0xee)).with_resolver(addr(0xd0));
        let mut escrow = EscrowLedger::new(addr(0xcc), config, token).unwrap();
        escrow.token.approve(&deployer(), &addr(0xcc), 100);
        escrow
            .create_escrow(&deployer(), ID_A, 100, &beneficiary(), 0)
            .unwrap();

        let result = escrow.refund(&deployer(), &id(ID_A));
        assert_eq!(result, Err(EscrowError::Unauthorized { caller: deployer() }));
        escrow.refund(&addr(0xd0), &id(ID_A)).unwrap();
        assert_eq!(escrow.token().balance_of(&deployer()), 500);
    }

    #[test]
    fn test_resolve_with_policy() {
        let mut escrow = funded(100, 0);
        let resolution = escrow
            .resolve(&deployer(), &id(ID_A), 0, &RefundDepositor)
            .unwrap();
        assert_eq!(resolution, Resolution::Refund);
        assert_eq!(escrow.token().balance_of(&depositor()), 1_000);

        let again = escrow.resolve(&deployer(), &id(ID_A), 0, &ReleaseToBeneficiary);
        assert_eq!(again, Err(EscrowError::AlreadySettled { id: id(ID_A) }));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_settlement_rejections_logged_at_warn() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut escrow = funded(100, 3_600);
            assert!(escrow.release(&deployer(), &id(ID_A), 10).is_err());
            assert!(escrow.refund(&deployer(), &id(ID_B)).is_err());
            assert!(escrow
                .resolve(&beneficiary(), &id(ID_A), 0, &RefundDepositor)
                .is_err());
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        let warnings: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("WARN") && line.contains("Escrow settlement rejected"))
            .collect();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("release") && warnings[0].contains("locked until"));
        assert!(warnings[1].contains("refund") && warnings[1].contains("not found"));
        assert!(warnings[2].contains("resolve") && warnings[2].contains("Unauthorized"));
    }

    #[test]
    fn test_resolve_release_respects_time_lock() {
        let mut escrow = funded(100, 50);
        let result = escrow.resolve(&deployer(), &id(ID_A), 10, &ReleaseToBeneficiary);
        assert!(matches!(result, Err(EscrowError::StillLocked { .. })));
        assert!(!escrow.get_escrow(&id(ID_A)).unwrap().settled);
    }
}
