// Path: crates/types/src/app/coin.rs
//! Multi-denomination coin arithmetic used by the fee ledger.
//!
//! `Coins` is kept normalized at all times: denominations are sorted, merged
//! and zero-free. This makes the SCALE encoding of any given value unique,
//! which matters because fee records are written to consensus-critical state.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single amount of one denomination.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Coin {
    /// The denomination, e.g. `"stake"`.
    pub denom: String,
    /// The amount in the smallest unit of the denomination.
    pub amount: u128,
}

impl Coin {
    /// Creates a new coin.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Coin {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A normalized set of coins: sorted by denomination, merged, zero-free.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, Encode, Decode)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Normalizes an arbitrary list of coins.
    pub fn new(coins: Vec<Coin>) -> Self {
        let mut merged: Vec<Coin> = Vec::with_capacity(coins.len());
        let mut sorted = coins;
        sorted.sort_by(|a, b| a.denom.cmp(&b.denom));
        for coin in sorted {
            if coin.amount == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.denom == coin.denom => {
                    last.amount = last.amount.saturating_add(coin.amount);
                }
                _ => merged.push(coin),
            }
        }
        Coins(merged)
    }

    /// A set holding a single denomination.
    pub fn one(denom: impl Into<String>, amount: u128) -> Self {
        Coins::new(vec![Coin::new(denom, amount)])
    }

    /// The empty set.
    pub fn empty() -> Self {
        Coins(Vec::new())
    }

    /// True if no value is held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The amount held of one denomination, zero if absent.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(0)
    }

    /// Iterates the held coins in denomination order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Denomination-wise sum.
    pub fn add(&self, other: &Coins) -> Coins {
        let mut all = self.0.clone();
        all.extend(other.0.iter().cloned());
        Coins::new(all)
    }

    /// Denomination-wise subtraction, `None` if any denomination underflows.
    pub fn safe_sub(&self, other: &Coins) -> Option<Coins> {
        let mut result = Vec::with_capacity(self.0.len());
        for coin in &self.0 {
            let sub = other.amount_of(&coin.denom);
            if sub > coin.amount {
                return None;
            }
            result.push(Coin::new(coin.denom.clone(), coin.amount - sub));
        }
        // A denomination present only in `other` underflows from zero.
        for coin in &other.0 {
            if coin.amount > 0 && self.amount_of(&coin.denom) == 0 {
                return None;
            }
        }
        Some(Coins::new(result))
    }

    /// True if, for every denomination in `other`, this set holds at least as much.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.0.iter().all(|c| self.amount_of(&c.denom) >= c.amount)
    }

    /// Multiplies every amount by a scalar.
    pub fn scale(&self, factor: u128) -> Coins {
        Coins::new(
            self.0
                .iter()
                .map(|c| Coin::new(c.denom.clone(), c.amount.saturating_mul(factor)))
                .collect(),
        )
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(empty)");
        }
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_merges_and_sorts() {
        let coins = Coins::new(vec![
            Coin::new("x", 5),
            Coin::new("a", 1),
            Coin::new("x", 7),
            Coin::new("b", 0),
        ]);
        assert_eq!(coins.amount_of("x"), 12);
        assert_eq!(coins.amount_of("a"), 1);
        assert_eq!(coins.amount_of("b"), 0);
        let denoms: Vec<&str> = coins.iter().map(|c| c.denom.as_str()).collect();
        assert_eq!(denoms, vec!["a", "x"]);
    }

    #[test]
    fn test_safe_sub() {
        let a = Coins::new(vec![Coin::new("x", 10), Coin::new("y", 3)]);
        let b = Coins::one("x", 4);
        let diff = a.safe_sub(&b).unwrap();
        assert_eq!(diff.amount_of("x"), 6);
        assert_eq!(diff.amount_of("y"), 3);

        assert!(a.safe_sub(&Coins::one("x", 11)).is_none());
        assert!(a.safe_sub(&Coins::one("z", 1)).is_none());
        assert_eq!(a.safe_sub(&a).unwrap(), Coins::empty());
    }

    #[test]
    fn test_is_all_gte() {
        let a = Coins::new(vec![Coin::new("x", 10), Coin::new("y", 3)]);
        assert!(a.is_all_gte(&Coins::one("x", 10)));
        assert!(a.is_all_gte(&Coins::empty()));
        assert!(!a.is_all_gte(&Coins::one("y", 4)));
        assert!(!a.is_all_gte(&Coins::one("z", 1)));
    }

    #[test]
    fn test_scale() {
        let a = Coins::one("x", 3);
        assert_eq!(a.scale(1000).amount_of("x"), 3000);
        assert!(a.scale(0).is_empty());
    }
}
