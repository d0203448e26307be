//! Bidirectional USD⇄token conversion state machine.
//!
//! `Conversion` owns the two amount fields and decides which one is the
//! source of truth after each edit. Every accepted keystroke gets a fresh
//! [`EditId`]; the debounce timer and the rate lookup both carry that id
//! back, and anything stamped with a superseded id is inert. Staleness is
//! settled by the id alone.

use crate::amount::{is_valid_amount, parse_amount, round_to_decimals, truncate_decimals};

/// Fractional digits kept on the fiat field.
pub const USD_MAX_DECIMALS: usize = 2;
/// Fractional digits kept on the token field.
pub const TOKEN_MAX_DECIMALS: usize = 8;

/// Which amount field an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Usd,
    Token,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Usd => Side::Token,
            Side::Token => Side::Usd,
        }
    }

    pub fn max_decimals(self) -> usize {
        match self {
            Side::Usd => USD_MAX_DECIMALS,
            Side::Token => TOKEN_MAX_DECIMALS,
        }
    }
}

/// Display orientation of the pair. Reversing swaps display roles only;
/// the stored amounts are untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    UsdToToken,
    TokenToUsd,
}

impl Direction {
    pub fn reversed(self) -> Direction {
        match self {
            Direction::UsdToToken => Direction::TokenToUsd,
            Direction::TokenToUsd => Direction::UsdToToken,
        }
    }

    /// The side whose balance is spent by a conversion in this direction.
    pub fn source_side(self) -> Side {
        match self {
            Direction::UsdToToken => Side::Usd,
            Direction::TokenToUsd => Side::Token,
        }
    }
}

/// Token identifying one accepted keystroke. Monotonically increasing;
/// only the newest id may advance the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EditId(u64);

/// Where the controller is between a keystroke and the recomputation it
/// triggers.
#[derive(Clone, Debug, Default, PartialEq)]
enum Phase {
    /// Fields are empty or mutually consistent with the last applied rate.
    #[default]
    Idle,
    /// Keystroke accepted, debounce window running.
    Editing { side: Side, edit: EditId },
    /// Debounce elapsed; the rate lookup for the snapshotted value is in
    /// flight and recomputation is blocked on it.
    AwaitingRate {
        side: Side,
        value: String,
        edit: EditId,
    },
}

/// What [`Conversion::edit`] did with a keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Shape check failed; nothing changed.
    Rejected,
    /// Empty value: both fields reset, nothing pending.
    Cleared,
    /// Value stored; arm a debounce timer for this id.
    Accepted(EditId),
}

#[derive(Clone, Debug, Default)]
pub struct Conversion {
    usd_amount: String,
    token_amount: String,
    direction: Direction,
    phase: Phase,
    edits: u64,
}

impl Conversion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usd_amount(&self) -> &str {
        &self.usd_amount
    }

    pub fn token_amount(&self) -> &str {
        &self.token_amount
    }

    pub fn amount(&self, side: Side) -> &str {
        match side {
            Side::Usd => &self.usd_amount,
            Side::Token => &self.token_amount,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The field the user last edited, while its recomputation is pending.
    pub fn active_side(&self) -> Option<Side> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Editing { side, .. } | Phase::AwaitingRate { side, .. } => Some(*side),
        }
    }

    /// True from keystroke acceptance until the dependent field settles.
    pub fn is_recomputing(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Validate and store a keystroke on one side.
    ///
    /// Invalid shapes are dropped without touching the stored value. An
    /// accepted empty value resets both fields. An accepted non-empty value
    /// is truncated to the side's precision, the opposite field is blanked
    /// to signal recomputation, and the returned id must be handed back via
    /// [`debounce_elapsed`](Self::debounce_elapsed) once the quiescence
    /// window passes.
    pub fn edit(&mut self, side: Side, raw: &str) -> EditOutcome {
        if !is_valid_amount(raw) {
            return EditOutcome::Rejected;
        }
        if raw.is_empty() {
            self.usd_amount.clear();
            self.token_amount.clear();
            self.phase = Phase::Idle;
            return EditOutcome::Cleared;
        }
        let value = truncate_decimals(raw, side.max_decimals());
        *self.amount_mut(side) = value;
        self.amount_mut(side.opposite()).clear();
        let edit = self.next_edit();
        self.phase = Phase::Editing { side, edit };
        EditOutcome::Accepted(edit)
    }

    /// Advance `Editing → AwaitingRate` when the debounce timer for `edit`
    /// fires, snapshotting the debounced value. Returns `false` (and leaves
    /// the state alone) when a newer keystroke superseded this one.
    pub fn debounce_elapsed(&mut self, edit: EditId) -> bool {
        let side = match &self.phase {
            Phase::Editing {
                side,
                edit: current,
            } if *current == edit => *side,
            _ => return false,
        };
        let value = self.amount(side).to_string();
        self.phase = Phase::AwaitingRate { side, value, edit };
        true
    }

    /// Apply a resolved rate for `edit`, recomputing the dependent field
    /// from the snapshotted value: `usd / rate` rounded to eight digits, or
    /// `token * rate` rounded to two. Returns `false` when the id is stale;
    /// a superseded lookup must never overwrite state.
    pub fn settle(&mut self, edit: EditId, rate: f64) -> bool {
        let (side, value) = match &self.phase {
            Phase::AwaitingRate {
                side,
                value,
                edit: current,
            } if *current == edit => (*side, value.clone()),
            _ => return false,
        };
        match parse_amount(&value) {
            Some(n) if rate > 0.0 => {
                let computed = match side {
                    Side::Usd => round_to_decimals(n / rate, TOKEN_MAX_DECIMALS),
                    Side::Token => round_to_decimals(n * rate, USD_MAX_DECIMALS),
                };
                *self.amount_mut(side.opposite()) = computed;
            }
            // Nothing computable (e.g. a lone "."); leave the opposite blank.
            _ => self.amount_mut(side.opposite()).clear(),
        }
        self.phase = Phase::Idle;
        true
    }

    /// Flip the display orientation. Amounts and any pending recomputation
    /// are untouched.
    pub fn reverse(&mut self) {
        self.direction = self.direction.reversed();
    }

    fn amount_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Usd => &mut self.usd_amount,
            Side::Token => &mut self.token_amount,
        }
    }

    fn next_edit(&mut self) -> EditId {
        self.edits += 1;
        EditId(self.edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f64 = 30_000.0;

    fn accepted(conversion: &mut Conversion, side: Side, raw: &str) -> EditId {
        match conversion.edit(side, raw) {
            EditOutcome::Accepted(edit) => edit,
            other => panic!("expected acceptance of {raw:?}, got {other:?}"),
        }
    }

    fn settle_edit(conversion: &mut Conversion, edit: EditId, rate: f64) {
        assert!(conversion.debounce_elapsed(edit));
        assert!(conversion.settle(edit, rate));
    }

    #[test]
    fn test_usd_edit_computes_token() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, "100");
        assert_eq!(c.token_amount(), "");
        assert!(c.is_recomputing());
        settle_edit(&mut c, edit, RATE);
        assert_eq!(c.token_amount(), "0.00333333");
        assert!(!c.is_recomputing());
        assert_eq!(c.active_side(), None);
    }

    #[test]
    fn test_token_edit_computes_usd() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Token, "0.5");
        settle_edit(&mut c, edit, RATE);
        assert_eq!(c.usd_amount(), "15000.00");
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, "100");
        settle_edit(&mut c, edit, RATE);
        let token = c.token_amount().to_string();
        assert_eq!(token, "0.00333333");

        let edit = accepted(&mut c, Side::Token, &token);
        settle_edit(&mut c, edit, RATE);
        assert_eq!(c.usd_amount(), "100.00");
    }

    #[test]
    fn test_typed_input_truncated_not_rounded() {
        let mut c = Conversion::new();
        accepted(&mut c, Side::Usd, "100.12345");
        assert_eq!(c.usd_amount(), "100.12");
        accepted(&mut c, Side::Token, "0.12345678910");
        assert_eq!(c.token_amount(), "0.12345678");
    }

    #[test]
    fn test_invalid_keystroke_leaves_field_unchanged() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, "100");
        settle_edit(&mut c, edit, RATE);
        for raw in ["100a", "abc", "1.2.3", "10 0", "-5"] {
            assert_eq!(c.edit(Side::Usd, raw), EditOutcome::Rejected);
            assert_eq!(c.usd_amount(), "100");
            assert_eq!(c.token_amount(), "0.00333333");
        }
    }

    #[test]
    fn test_empty_edit_resets_everything() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, "100");
        settle_edit(&mut c, edit, RATE);
        assert_eq!(c.edit(Side::Usd, ""), EditOutcome::Cleared);
        assert_eq!(c.usd_amount(), "");
        assert_eq!(c.token_amount(), "");
        assert!(!c.is_recomputing());
    }

    #[test]
    fn test_burst_collapses_to_last_keystroke() {
        // Type "100", then append to "200" before the first debounce fires.
        let mut c = Conversion::new();
        let first = accepted(&mut c, Side::Usd, "100");
        let second = accepted(&mut c, Side::Usd, "200");

        // The first timer fires late: it must not advance anything.
        assert!(!c.debounce_elapsed(first));
        assert!(c.debounce_elapsed(second));
        assert!(!c.settle(first, 25_000.0));
        assert!(c.settle(second, 25_000.0));
        assert_eq!(c.token_amount(), "0.00800000");
    }

    #[test]
    fn test_keystroke_during_pending_fetch_invalidates_it() {
        let mut c = Conversion::new();
        let first = accepted(&mut c, Side::Usd, "100");
        assert!(c.debounce_elapsed(first));

        // Fetch for "100" is in flight when the user types again.
        let second = accepted(&mut c, Side::Usd, "1000");
        assert!(!c.settle(first, RATE));
        assert_eq!(c.token_amount(), "");
        assert_eq!(c.usd_amount(), "1000");

        assert!(c.debounce_elapsed(second));
        assert!(c.settle(second, RATE));
        assert_eq!(c.token_amount(), "0.03333333");
    }

    #[test]
    fn test_opposite_side_edit_takes_over() {
        let mut c = Conversion::new();
        let first = accepted(&mut c, Side::Usd, "100");
        assert!(c.debounce_elapsed(first));

        let second = accepted(&mut c, Side::Token, "2");
        assert_eq!(c.usd_amount(), "");
        assert!(!c.settle(first, RATE));
        settle_edit(&mut c, second, RATE);
        assert_eq!(c.usd_amount(), "60000.00");
    }

    #[test]
    fn test_lone_separator_settles_to_blank() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, ".");
        settle_edit(&mut c, edit, RATE);
        assert_eq!(c.usd_amount(), ".");
        assert_eq!(c.token_amount(), "");
    }

    #[test]
    fn test_reverse_preserves_values() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, "100");
        settle_edit(&mut c, edit, RATE);
        let (usd, token) = (c.usd_amount().to_string(), c.token_amount().to_string());

        c.reverse();
        assert_eq!(c.direction(), Direction::TokenToUsd);
        assert_eq!(c.usd_amount(), usd);
        assert_eq!(c.token_amount(), token);

        c.reverse();
        assert_eq!(c.direction(), Direction::UsdToToken);
        assert_eq!(c.usd_amount(), usd);
        assert_eq!(c.token_amount(), token);
    }

    #[test]
    fn test_reverse_does_not_disturb_pending_edit() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, "100");
        c.reverse();
        assert!(c.is_recomputing());
        settle_edit(&mut c, edit, RATE);
        assert_eq!(c.token_amount(), "0.00333333");
        assert_eq!(c.direction(), Direction::TokenToUsd);
    }

    #[test]
    fn test_non_positive_rate_clears_opposite() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, "100");
        assert!(c.debounce_elapsed(edit));
        assert!(c.settle(edit, 0.0));
        assert_eq!(c.token_amount(), "");
        assert!(!c.is_recomputing());
    }

    #[test]
    fn test_settle_requires_elapsed_debounce() {
        let mut c = Conversion::new();
        let edit = accepted(&mut c, Side::Usd, "100");
        // Rate resolving before the quiescence window is not applied.
        assert!(!c.settle(edit, RATE));
        assert!(c.debounce_elapsed(edit));
        assert!(c.settle(edit, RATE));
    }

    #[test]
    fn test_source_side_follows_direction() {
        assert_eq!(Direction::UsdToToken.source_side(), Side::Usd);
        assert_eq!(Direction::TokenToUsd.source_side(), Side::Token);
    }
}
