//! Rule tables for elementary cellular automata.
//!
//! A rule number `0..=255` is written as 8 bits, most significant first. Entry
//! `k` of the table is the output for the neighborhood whose value is `7 - k`,
//! so the table reads in the canonical Wolfram order `111, 110, ..., 000`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AutomatonError, AutomatonResult};

/// Number of distinct 3-cell neighborhoods.
pub const NEIGHBORHOOD_COUNT: usize = 8;

/// Well-known elementary rules.
pub mod rules {
    /// Rule 30 - chaotic, used for random number generation.
    pub const RULE_30: u8 = 30;

    /// Rule 90 - Sierpinski triangle.
    pub const RULE_90: u8 = 90;

    /// Rule 110 - class 4, supports gliders.
    pub const RULE_110: u8 = 110;

    /// Rule 184 - traffic flow model.
    pub const RULE_184: u8 = 184;

    /// Rule 250 - simple growth.
    pub const RULE_250: u8 = 250;
}

/// Validate that a value is a binary cell state.
pub(crate) fn check_state(state: u8) -> AutomatonResult<u8> {
    match state {
        0 | 1 => Ok(state),
        other => Err(AutomatonError::InvalidState { state: other }),
    }
}

/// The three cells that determine a cell's next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawNeighborhood")]
pub struct Neighborhood {
    left: u8,
    center: u8,
    right: u8,
}

/// Unchecked wire form of [`Neighborhood`].
#[derive(Deserialize)]
struct RawNeighborhood {
    left: u8,
    center: u8,
    right: u8,
}

impl TryFrom<RawNeighborhood> for Neighborhood {
    type Error = AutomatonError;

    fn try_from(raw: RawNeighborhood) -> AutomatonResult<Self> {
        Self::new(raw.left, raw.center, raw.right)
    }
}

impl Neighborhood {
    /// Build a neighborhood, rejecting non-binary values.
    pub fn new(left: u8, center: u8, right: u8) -> AutomatonResult<Self> {
        Ok(Self {
            left: check_state(left)?,
            center: check_state(center)?,
            right: check_state(right)?,
        })
    }

    /// Build a neighborhood from the lowest bit of each cell.
    pub(crate) fn from_low_bits(left: u8, center: u8, right: u8) -> Self {
        Self {
            left: left & 1,
            center: center & 1,
            right: right & 1,
        }
    }

    /// Left neighbor (wraps to the last cell for index 0).
    pub fn left(&self) -> u8 {
        self.left
    }

    /// The cell itself.
    pub fn center(&self) -> u8 {
        self.center
    }

    /// Right neighbor (wraps to the first cell for the last index).
    pub fn right(&self) -> u8 {
        self.right
    }

    /// Decode a neighborhood from its value `0..=7`.
    pub fn from_value(value: u8) -> AutomatonResult<Self> {
        if value as usize >= NEIGHBORHOOD_COUNT {
            return Err(AutomatonError::InvalidState { state: value });
        }
        Ok(Self::from_low_bits(value >> 2, value >> 1, value))
    }

    /// Integer value `4*left + 2*center + right`.
    pub fn value(&self) -> u8 {
        4 * self.left + 2 * self.center + self.right
    }

    /// Read the neighborhood of `index` from a ring of cells.
    ///
    /// Panics if `cells` is empty or `index` is out of bounds; callers in this
    /// crate only pass indices of a non-empty row.
    pub fn of(cells: &[u8], index: usize) -> Self {
        let len = cells.len();
        Self::from_low_bits(
            cells[(index + len - 1) % len],
            cells[index],
            cells[(index + 1) % len],
        )
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, self.center, self.right)
    }
}

/// The 8-entry lookup table derived from a rule number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRuleTable")]
pub struct RuleTable {
    bits: [u8; NEIGHBORHOOD_COUNT],
}

/// Unchecked wire form of [`RuleTable`].
#[derive(Deserialize)]
struct RawRuleTable {
    bits: [u8; NEIGHBORHOOD_COUNT],
}

impl TryFrom<RawRuleTable> for RuleTable {
    type Error = AutomatonError;

    fn try_from(raw: RawRuleTable) -> AutomatonResult<Self> {
        Self::from_bits(raw.bits)
    }
}

impl RuleTable {
    /// Derive a table from a rule number, rejecting values above 255.
    pub fn from_number(rule: u32) -> AutomatonResult<Self> {
        let rule = u8::try_from(rule).map_err(|_| AutomatonError::InvalidRule { rule })?;
        Ok(Self::from(rule))
    }

    /// Build a table from explicit bits in `111 -> 000` order.
    pub fn from_bits(bits: [u8; NEIGHBORHOOD_COUNT]) -> AutomatonResult<Self> {
        for bit in bits {
            check_state(bit)?;
        }
        Ok(Self { bits })
    }

    /// The table entries, most significant bit first.
    pub fn bits(&self) -> &[u8; NEIGHBORHOOD_COUNT] {
        &self.bits
    }

    /// Re-encode the table as its big-endian rule number.
    pub fn number(&self) -> u8 {
        self.bits.iter().fold(0u8, |acc, bit| (acc << 1) | bit)
    }

    /// Output for a neighborhood. The table is stored MSB-first, so the
    /// neighborhood value `v` lives at `7 - v`.
    pub fn output_for(&self, neighborhood: Neighborhood) -> u8 {
        self.bits[NEIGHBORHOOD_COUNT - 1 - neighborhood.value() as usize]
    }

    /// Iterate `(neighborhood, output)` pairs from `111` down to `000`.
    pub fn entries(&self) -> impl Iterator<Item = (Neighborhood, u8)> + '_ {
        self.bits.iter().enumerate().map(|(k, bit)| {
            let value = (NEIGHBORHOOD_COUNT - 1 - k) as u8;
            (Neighborhood::from_low_bits(value >> 2, value >> 1, value), *bit)
        })
    }
}

impl From<u8> for RuleTable {
    fn from(rule: u8) -> Self {
        let mut bits = [0u8; NEIGHBORHOOD_COUNT];
        for (k, bit) in bits.iter_mut().enumerate() {
            *bit = (rule >> (NEIGHBORHOOD_COUNT - 1 - k)) & 1;
        }
        Self { bits }
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (neighborhood, output) in self.entries() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{neighborhood}:{output}")?;
            first = false;
        }
        Ok(())
    }
}
