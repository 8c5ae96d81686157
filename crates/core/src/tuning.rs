//! Generation tuning — tag weights and the rigidity dial.
//!
//! Both are consumed by prompt assembly and never mutated mid-call.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Weights are clamped into this range at the write path.
pub const WEIGHT_MIN: f64 = 0.0;
pub const WEIGHT_MAX: f64 = 2.0;

/// A tag's weight when it carries no explicit entry.
pub const WEIGHT_DEFAULT: f64 = 1.0;

/// Importance multipliers keyed by tag, in insertion order.
///
/// Iteration order is deterministic (insertion order), which keeps prompt
/// assembly deterministic for identical inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagWeights {
    weights: IndexMap<String, f64>,
}

impl TagWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a tag's weight, clamped into `[0.0, 2.0]`.
    pub fn set(&mut self, tag: impl Into<String>, weight: f64) {
        self.weights
            .insert(tag.into(), weight.clamp(WEIGHT_MIN, WEIGHT_MAX));
    }

    /// Read a tag's weight; unset tags read as the neutral `1.0`.
    pub fn get(&self, tag: &str) -> f64 {
        self.weights.get(tag).copied().unwrap_or(WEIGHT_DEFAULT)
    }

    pub fn remove(&mut self, tag: &str) -> Option<f64> {
        self.weights.shift_remove(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Tags weighted above neutral, in insertion order. Only these are
    /// mentioned when assembling a prompt.
    pub fn emphasized(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights
            .iter()
            .filter(|(_, w)| **w > WEIGHT_DEFAULT)
            .map(|(tag, w)| (tag.as_str(), *w))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TagWeights {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut weights = Self::new();
        for (tag, weight) in iter {
            weights.set(tag, weight);
        }
        weights
    }
}

/// How strictly generated output should adhere to constraints, `0..=100`.
///
/// Above 50 the assembled prompt directs the model to be strict; at or
/// below 50 it directs it to be creative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rigidity(f32);

impl Rigidity {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 100.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Whether the strict directive applies. The boundary value 50 does
    /// not: strictness requires rigidity strictly above the midpoint.
    pub fn is_strict(&self) -> bool {
        self.0 > 50.0
    }
}

impl Default for Rigidity {
    fn default() -> Self {
        Self(50.0)
    }
}
