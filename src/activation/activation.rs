use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Transfer function shared by every non-input node of a network.
///
/// The two variants disagree on what a node records as its `activation`
/// after a forward pass, and `derivative()` is always evaluated on that
/// recorded value:
///
/// * `Sigmoid` records the squashed output, so the slope is the usual
///   `a * (1 - a)` of the recorded value.
/// * `ReLU` records the raw weighted sum (the rectified value is kept
///   separately as the node's `output`), so the slope is the 0/1 step on
///   the recorded sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Sigmoid,
    ReLU,
}

impl Activation {
    /// Element-wise transfer of a weighted sum.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            Activation::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Value a node records as its `activation` for the weighted sum `x`.
    pub fn recorded(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => self.function(x),
            Activation::ReLU => x,
        }
    }

    /// Slope at a node's recorded activation.  The argument is the value
    /// `recorded()` produced, not the raw weighted sum.
    pub fn derivative(&self, recorded: f64) -> f64 {
        match self {
            Activation::Sigmoid => recorded * (1.0 - recorded),
            Activation::ReLU => if recorded > 0.0 { 1.0 } else { 0.0 },
        }
    }
}

impl Default for Activation {
    fn default() -> Self {
        Activation::ReLU
    }
}
