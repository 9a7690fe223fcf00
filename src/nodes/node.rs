use std::ops::Range;

use anyhow::{anyhow, bail, Result};
use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;

/// Role of a node inside a network.  The role picks the forward and
/// training rules and is serialized by name into snapshot files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// First-layer node; its activation is the externally supplied value.
    Input,
    /// Interior node with the full weighted-sum and gradient rules.
    Primary,
    /// Last-layer node; forward rule as `Primary`, but a flat weight
    /// delta and no bias update when training.
    Output,
}

/// Serialized form of one node as stored in snapshot files: its role, its
/// bias, and one weight per predecessor connection in layer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub bias: f64,
    pub prev: Vec<f64>,
}

/// The atomic computational unit: a bias plus one weight per node of the
/// previous layer, aligned by position.
///
/// Nodes live in a network's flat arena.  `prev` is the arena index range
/// of the predecessor layer, so a node never holds references into
/// sibling storage; predecessors always sit strictly before the node.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Position within the node's own layer.
    pub index: usize,
    pub bias: f64,
    /// Recorded value of the last forward pass.  Under `Activation::ReLU`
    /// this is the raw weighted sum; under `Sigmoid` the squashed output.
    pub activation: f64,
    /// Post-transfer value the next layer reads.
    pub output: f64,
    pub weights: Vec<f64>,
    pub prev: Range<usize>,
}

impl Node {
    /// Input-layer node: no connections, bias pinned to zero.
    pub fn input(index: usize) -> Node {
        Node {
            kind: NodeKind::Input,
            index,
            bias: 0.0,
            activation: 0.0,
            output: 0.0,
            weights: Vec::new(),
            prev: 0..0,
        }
    }

    /// Node wired to the given predecessor arena range, one weight per
    /// predecessor.  Input nodes must not carry weights; their bias is
    /// forced to zero whatever the caller supplies.
    pub fn new(
        kind: NodeKind,
        index: usize,
        bias: f64,
        weights: Vec<f64>,
        prev: Range<usize>,
    ) -> Result<Node> {
        match kind {
            NodeKind::Input => {
                if !weights.is_empty() {
                    bail!("input node {index} cannot carry predecessor weights");
                }
                Ok(Node::input(index))
            }
            NodeKind::Primary | NodeKind::Output => {
                if weights.len() != prev.len() {
                    bail!(
                        "node {index} holds {} weights for {} predecessor nodes",
                        weights.len(),
                        prev.len()
                    );
                }
                Ok(Node {
                    kind,
                    index,
                    bias,
                    activation: 0.0,
                    output: 0.0,
                    weights,
                    prev,
                })
            }
        }
    }

    /// Forward rule, dispatched on the node's role.
    ///
    /// `settled` is the arena prefix holding this node's predecessor
    /// layer.  `input` carries the value an `Input` node loads; the other
    /// roles ignore it and compute `weights . outputs + bias` instead.
    pub fn calculate(
        &mut self,
        settled: &[Node],
        activation: Activation,
        input: Option<f64>,
    ) -> Result<()> {
        match self.kind {
            NodeKind::Input => {
                let value = input
                    .ok_or_else(|| anyhow!("input node {} received no value to load", self.index))?;
                self.activation = value;
                self.output = value;
            }
            NodeKind::Primary | NodeKind::Output => {
                if self.weights.is_empty() {
                    bail!("node {} has no predecessor connections to calculate from", self.index);
                }
                if self.prev.end > settled.len() {
                    bail!("node {} is wired past its predecessor layer", self.index);
                }
                let sum: f64 = self
                    .weights
                    .iter()
                    .zip(&settled[self.prev.clone()])
                    .map(|(weight, source)| weight * source.output)
                    .sum();
                let z = sum + self.bias;
                self.activation = activation.recorded(z);
                self.output = activation.function(z);
            }
        }
        Ok(())
    }

    /// One training step from this node's share of the error signal.
    /// Returns the propagated error, one entry per predecessor connection.
    ///
    /// The update is weight-proportional: each weight moves by a fraction
    /// of itself, and the pre-update value feeds its own delta.  `Primary`
    /// nodes scale the delta by the slope at the predecessor's recorded
    /// activation and nudge their bias by the slope at their own;
    /// `Output` nodes use the flat `learning_rate * error` delta and
    /// leave their bias alone.  The propagated entries are computed from
    /// the already-updated weights.
    pub fn train(
        &mut self,
        settled: &[Node],
        activation: Activation,
        error: f64,
        learning_rate: f64,
    ) -> Vec<f64> {
        match self.kind {
            NodeKind::Input => Vec::new(),
            NodeKind::Primary => {
                let bias_delta =
                    learning_rate * error * self.bias * activation.derivative(self.activation);
                self.bias += bias_delta;

                let mut propagated = Vec::with_capacity(self.weights.len());
                for (weight, source) in
                    self.weights.iter_mut().zip(&settled[self.prev.clone()])
                {
                    let delta = learning_rate
                        * error
                        * *weight
                        * activation.derivative(source.activation);
                    *weight += *weight * delta;
                    propagated.push(*weight * error);
                }
                propagated
            }
            NodeKind::Output => {
                let delta = learning_rate * error;
                let mut propagated = Vec::with_capacity(self.weights.len());
                for weight in &mut self.weights {
                    *weight += *weight * delta;
                    propagated.push(*weight * error);
                }
                propagated
            }
        }
    }

    /// Clears the values of the last forward pass.
    pub fn reset(&mut self) {
        self.activation = 0.0;
        self.output = 0.0;
    }

    /// Number of predecessor connections (zero for input nodes).
    pub fn connection_count(&self) -> usize {
        self.weights.len()
    }

    /// Serializable copy of the node's trainable state.
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            kind: self.kind,
            bias: self.bias,
            prev: self.weights.clone(),
        }
    }
}
