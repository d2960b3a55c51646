//! Arbitration policies
//!
//! When the resolver settles a disputed agreement it delegates the actual
//! decision to an [`ArbitrationPolicy`]. The escrow ledger enforces who may
//! ask and what each outcome does with the funds; the policy only picks the
//! outcome.

use types::ids::EscrowId;

use crate::escrow::EscrowAgreement;

/// Outcome chosen by an arbitration policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Pay the held amount to the beneficiary (subject to the time lock)
    Release,
    /// Return the held amount to the depositor
    Refund,
}

/// Decides how a disputed agreement is settled.
pub trait ArbitrationPolicy {
    fn decide(&self, id: &EscrowId, agreement: &EscrowAgreement, now: u64) -> Resolution;
}

/// Always rules for the beneficiary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseToBeneficiary;

impl ArbitrationPolicy for ReleaseToBeneficiary {
    fn decide(&self, _id: &EscrowId, _agreement: &EscrowAgreement, _now: u64) -> Resolution {
        Resolution::Release
    }
}

/// Always rules for the depositor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefundDepositor;

impl ArbitrationPolicy for RefundDepositor {
    fn decide(&self, _id: &EscrowId, _agreement: &EscrowAgreement, _now: u64) -> Resolution {
        Resolution::Refund
    }
}

impl<F> ArbitrationPolicy for F
where
    F: Fn(&EscrowId, &EscrowAgreement, u64) -> Resolution,
{
    fn decide(&self, id: &EscrowId, agreement: &EscrowAgreement, now: u64) -> Resolution {
        self(id, agreement, now)
    }
}
