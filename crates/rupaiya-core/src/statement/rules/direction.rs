//! Debit/credit resolution as an ordered rule list.
//!
//! Tiers, first hit wins:
//! 1. explicit sign on the amount text
//! 2. direction keyword in the description (debit keywords beat credit ones)
//! 3. running-balance continuity against the previous row
//! 4. purchase/payment-rail hint when balance columns are present
//! 5. default: as detected for multi-amount rows, configurable for single-amount rows

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::patterns::{CREDIT_KEYWORDS, DEBIT_KEYWORDS, PURCHASE_HINTS};
use crate::models::transaction::Direction;

/// The tier that decided a row's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionRule {
    ExplicitSign,
    Keyword,
    BalanceContinuity,
    PurchaseHint,
    Default,
}

/// Everything known about a row when deciding its direction.
#[derive(Debug, Clone, Default)]
pub struct DirectionInput<'a> {
    pub description: &'a str,
    /// Unsigned amounts in column order; the first is the transaction amount,
    /// the last (when more than one) the running balance.
    pub amounts: &'a [Decimal],
    /// Direction carried by the amount text itself (leading minus).
    pub explicit: Option<Direction>,
    /// Running balance of the previous row.
    pub previous_balance: Option<Decimal>,
}

/// Outcome of direction resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub direction: Direction,
    pub magnitude: Decimal,
    pub rule: DirectionRule,
}

impl Resolution {
    /// Signed transaction amount.
    pub fn signed_amount(&self) -> Decimal {
        self.direction.apply(self.magnitude)
    }
}

/// Applies the tiers in order.
#[derive(Debug, Clone)]
pub struct DirectionResolver {
    single_amount_default: Direction,
}

impl DirectionResolver {
    pub fn new(single_amount_default: Direction) -> Self {
        Self {
            single_amount_default,
        }
    }

    /// Resolve a row. `None` when the row carries no amount.
    pub fn resolve(&self, input: &DirectionInput<'_>) -> Option<Resolution> {
        let magnitude = input.amounts.first()?.abs();
        let decide = |direction, rule| Resolution {
            direction,
            magnitude,
            rule,
        };

        if let Some(direction) = input.explicit {
            return Some(decide(direction, DirectionRule::ExplicitSign));
        }

        if let Some(direction) = keyword_direction(input.description) {
            return Some(decide(direction, DirectionRule::Keyword));
        }

        if input.amounts.len() >= 2 {
            if let Some(direction) = balance_direction(input) {
                return Some(decide(direction, DirectionRule::BalanceContinuity));
            }
            if PURCHASE_HINTS.is_match(input.description) {
                return Some(decide(Direction::Debit, DirectionRule::PurchaseHint));
            }
            return Some(decide(Direction::Credit, DirectionRule::Default));
        }

        Some(decide(self.single_amount_default, DirectionRule::Default))
    }
}

impl Default for DirectionResolver {
    fn default() -> Self {
        Self::new(Direction::Credit)
    }
}

/// Direction implied by keywords alone.
pub fn keyword_direction(description: &str) -> Option<Direction> {
    if DEBIT_KEYWORDS.is_match(description) {
        Some(Direction::Debit)
    } else if CREDIT_KEYWORDS.is_match(description) {
        Some(Direction::Credit)
    } else {
        None
    }
}

fn balance_direction(input: &DirectionInput<'_>) -> Option<Direction> {
    let previous = input.previous_balance?;
    let amount = input.amounts.first()?.abs();
    let balance = *input.amounts.last()?;

    if previous - amount == balance {
        Some(Direction::Debit)
    } else if previous + amount == balance {
        Some(Direction::Credit)
    } else {
        None
    }
}
