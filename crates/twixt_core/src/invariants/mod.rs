//! First-class invariants for TwixT.
//!
//! Invariants are logical properties that must hold for every game state.
//! They are checked as move postconditions in debug builds and whenever a
//! state arrives from outside the engine.

use crate::board::Board;

// ─────────────────────────────────────────────────────────────
//  Invariant Trait
// ─────────────────────────────────────────────────────────────

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Invariant Sets
// ─────────────────────────────────────────────────────────────

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of two to six invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);
impl_invariant_set!(I1, I2, I3, I4, I5);
impl_invariant_set!(I1, I2, I3, I4, I5, I6);

// ─────────────────────────────────────────────────────────────
//  TwixT Invariants
// ─────────────────────────────────────────────────────────────

pub mod alternating_turn;
pub mod border_links;
pub mod link_geometry;
pub mod monotonic_ownership;
pub mod no_crossing;
pub mod winner_recorded;

pub use alternating_turn::AlternatingTurnInvariant;
pub use border_links::BorderLinksInvariant;
pub use link_geometry::LinkGeometryInvariant;
pub use monotonic_ownership::MonotonicOwnershipInvariant;
pub use no_crossing::NoCrossingInvariant;
pub use winner_recorded::WinnerRecordedInvariant;

/// All TwixT invariants as a composable set.
pub type TwixtInvariants = (
    MonotonicOwnershipInvariant,
    LinkGeometryInvariant,
    BorderLinksInvariant,
    NoCrossingInvariant,
    AlternatingTurnInvariant,
    WinnerRecordedInvariant,
);

/// Returns true if every node owned in `before` has the same owner in
/// `after`, and every link in `before` is still present in `after`.
pub fn ownership_preserved(before: &Board, after: &Board) -> bool {
    let owners_kept = before
        .nodes()
        .iter()
        .zip(after.nodes())
        .all(|(old, new)| old.owner().is_none() || old.owner() == new.owner());
    owners_kept && after.links().starts_with(before.links())
}
