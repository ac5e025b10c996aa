//! Per-bag weight table for expected-value queries.
//!
//! Text format, one entry per line: a subset of unseen shapes written as
//! concatenated letters (`null` for the empty subset) followed by seven
//! integers in `[0, 2^32]`, one per shape in `IJLOSTZ` order. The value for
//! a shape is the reward for finishing with that shape in hold while the
//! subset is still unseen. Subsets without a line use an all-zero row.
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

use crate::error::ConfigError;
use crate::piece::{Bag, Shape, PIECE_SHAPES};
use crate::search::Score;

/// One whole failure in weighted mode; weights are stored in these ticks.
pub const WEIGHT_SCALE: Score = 1 << 32;
pub const WEIGHT_LINES: usize = (1 << PIECE_SHAPES) - 1;
const EMPTY_TOKEN: &str = "null";

/// Weights shifted so the smallest is zero. `fail` is the measure of a
/// future with no perfect clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightRow {
    values: [Score; PIECE_SHAPES],
    min: Score,
    fail: Score,
}

impl WeightRow {
    pub fn new(raw: [Score; PIECE_SHAPES], unit: Score) -> Self {
        let min = raw.iter().copied().min().unwrap_or(0).min(unit);
        let values = raw.map(|x| x - min);
        Self { values, min, fail: unit - min }
    }

    #[inline]
    pub fn get(&self, hold: Shape) -> Score { self.values[hold.index()] }
    pub fn min(&self) -> Score { self.min }
    #[inline]
    pub fn fail(&self) -> Score { self.fail }
}

#[derive(Clone, Debug)]
pub struct WeightTable {
    rows: Vec<Option<WeightRow>>,
    default: WeightRow,
    unit: Score,
}

impl WeightTable {
    /// Pass/fail counting: every future is worth one, every success zero.
    pub fn unweighted() -> Self { Self::empty(1) }

    fn empty(unit: Score) -> Self {
        Self { rows: vec![None; 1 << PIECE_SHAPES], default: WeightRow::new([0; PIECE_SHAPES], unit), unit }
    }

    pub fn unit(&self) -> Score { self.unit }
    pub fn is_weighted(&self) -> bool { self.unit == WEIGHT_SCALE }
    pub fn len(&self) -> usize { self.rows.iter().filter(|r| r.is_some()).count() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Row for the set of still-unseen shapes, or the default row.
    #[inline]
    pub fn row(&self, unseen: Bag) -> &WeightRow {
        self.rows[unseen.bits() as usize].as_ref().unwrap_or(&self.default)
    }

    pub fn insert(&mut self, unseen: Bag, raw: [Score; PIECE_SHAPES]) {
        self.rows[unseen.bits() as usize] = Some(WeightRow::new(raw, self.unit));
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut table = Self::empty(WEIGHT_SCALE);
        for (i, line) in text.lines().enumerate() {
            let mut tokens = line.split_whitespace();
            let Some(subset) = tokens.next() else { continue };
            let syntax = |reason: String| ConfigError::WeightSyntax { line: i + 1, reason };
            let bag = if subset == EMPTY_TOKEN {
                Bag::EMPTY
            } else {
                let mut bag = Bag::EMPTY;
                for c in subset.chars() {
                    bag.insert(Shape::from_char(c).ok_or_else(|| syntax(format!("unknown piece '{c}'")))?);
                }
                bag
            };
            let mut raw = [0 as Score; PIECE_SHAPES];
            for slot in raw.iter_mut() {
                let tok = tokens.next().ok_or_else(|| syntax(format!("expected {PIECE_SHAPES} weights")))?;
                let x: i64 = tok.parse().map_err(|_| syntax(format!("invalid weight '{tok}'")))?;
                if x < 0 || x as u64 > WEIGHT_SCALE {
                    return Err(ConfigError::WeightRange { subset: subset.to_string(), value: x });
                }
                *slot = x as Score;
            }
            if let Some(extra) = tokens.next() {
                return Err(syntax(format!("unexpected token '{extra}'")));
            }
            table.insert(bag, raw);
        }
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("read weight file: {}", path.display()))?;
        let table = Self::parse(&text).with_context(|| format!("parse weight file: {}", path.display()))?;
        if table.len() != WEIGHT_LINES {
            warn!("weight file has {} subsets, expected {}", table.len(), WEIGHT_LINES);
        }
        info!("Loaded {} weight rows", table.len());
        Ok(table)
    }
}
