use std::collections::VecDeque;
use std::ops::Range;

use anyhow::{anyhow, bail, Result};
use log::{debug, info, trace};
use rand::prelude::*;

use crate::activation::activation::Activation;
use crate::network::config::{LayerSpec, NetConfig, Task};
use crate::network::memory::{ErrorHistory, NetworkMemory};
use crate::nodes::node::{Node, NodeKind, NodeSnapshot};

/// The network engine: every node of every layer in one flat arena, plus
/// the persisted training counters.
///
/// Layer `i` occupies the arena span `layers[i]`.  Spans are disjoint and
/// strictly increasing, so a forward pass can split the arena at a layer
/// start and read finished predecessors while writing the current layer.
pub struct Network {
    task: Task,
    activation: Activation,
    learning_rate: f64,
    batch_size: usize,
    maximum_stored_errors: usize,
    completed_cycles: u64,
    cost_history: VecDeque<f64>,
    nodes: Vec<Node>,
    layers: Vec<Range<usize>>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Network {
    /// Builds a network shaped for `task`.
    ///
    /// With an empty `memory` the interior layers come from `config` and
    /// every connected node rolls fresh random weights; otherwise the
    /// stored layers are rehydrated exactly, including the cycle counter.
    /// `history` seeds the rolling error record either way.
    pub fn build(
        task: Task,
        config: &NetConfig,
        memory: NetworkMemory,
        history: ErrorHistory,
    ) -> Result<Network> {
        if config.batch_size == 0 {
            bail!("batchSize must be at least 1");
        }

        let mut net = Network {
            task,
            activation: config.activation,
            learning_rate: config.learning_rate,
            batch_size: config.batch_size,
            maximum_stored_errors: config.maximum_stored_errors,
            completed_cycles: memory.completed_cycles,
            cost_history: VecDeque::new(),
            nodes: Vec::new(),
            layers: Vec::new(),
        };

        if memory.layers.is_empty() {
            net.create_layers(&config.layers)?;
        } else {
            net.restore_layers(&memory.layers)?;
        }

        for cost in history.cost {
            net.cost_history.push_back(cost);
        }
        while net.cost_history.len() > net.maximum_stored_errors {
            net.cost_history.pop_front();
        }

        info!(
            "network ready: {} layers, {} nodes, {} completed cycles",
            net.layers.len(),
            net.nodes.len(),
            net.completed_cycles
        );
        Ok(net)
    }

    /// Fresh random initialization: the task-sized input layer, the
    /// configured interior layers, then the task-sized output layer.
    fn create_layers(&mut self, interior: &[LayerSpec]) -> Result<()> {
        debug!("no stored layers, rolling fresh weights");
        let mut rng = rand::thread_rng();

        let start = self.nodes.len();
        for index in 0..self.task.input_width() {
            self.nodes.push(Node::input(index));
        }
        self.layers.push(start..self.nodes.len());

        for spec in interior {
            if spec.amount == 0 {
                bail!("configured {:?} layer has zero nodes", spec.kind);
            }
            if spec.kind == NodeKind::Input {
                bail!("interior layers cannot be built from Input nodes");
            }
            self.push_random_layer(spec.kind, spec.amount, &mut rng)?;
        }

        self.push_random_layer(NodeKind::Output, self.task.output_width(), &mut rng)?;
        Ok(())
    }

    fn push_random_layer(
        &mut self,
        kind: NodeKind,
        amount: usize,
        rng: &mut ThreadRng,
    ) -> Result<()> {
        let prev = self
            .layers
            .last()
            .cloned()
            .ok_or_else(|| anyhow!("cannot add a connected layer before the input layer"))?;
        let start = self.nodes.len();
        for index in 0..amount {
            let weights: Vec<f64> = (0..prev.len()).map(|_| random_weight(rng)).collect();
            let bias = random_weight(rng);
            self.nodes.push(Node::new(kind, index, bias, weights, prev.clone())?);
        }
        self.layers.push(start..self.nodes.len());
        Ok(())
    }

    /// Rebuilds the arena from stored layers, validating that the stored
    /// shape still fits the task.
    fn restore_layers(&mut self, stored: &[Vec<NodeSnapshot>]) -> Result<()> {
        debug!("rehydrating {} stored layers", stored.len());
        if stored.len() < 2 {
            bail!("a snapshot needs at least an input and an output layer, found {}", stored.len());
        }

        for (layer_index, rows) in stored.iter().enumerate() {
            if rows.is_empty() {
                bail!("stored layer {layer_index} is empty");
            }
            let prev = if layer_index == 0 {
                0..0
            } else {
                self.layers[layer_index - 1].clone()
            };
            let start = self.nodes.len();
            for (index, row) in rows.iter().enumerate() {
                if layer_index == 0 && row.kind != NodeKind::Input {
                    bail!("stored layer 0 holds a {:?} node; the first layer must be all Input", row.kind);
                }
                if layer_index > 0 && row.kind == NodeKind::Input {
                    bail!("stored layer {layer_index} holds an Input node outside the input layer");
                }
                if row.prev.len() != prev.len() {
                    bail!(
                        "stored node {index} in layer {layer_index} holds {} weights but the previous layer has {} nodes",
                        row.prev.len(),
                        prev.len()
                    );
                }
                self.nodes
                    .push(Node::new(row.kind, index, row.bias, row.prev.clone(), prev.clone())?);
            }
            self.layers.push(start..self.nodes.len());
        }

        let input_width = self.layers[0].len();
        if input_width != self.task.input_width() {
            bail!(
                "stored input layer has {} nodes but {:?} needs {}",
                input_width,
                self.task,
                self.task.input_width()
            );
        }
        let output = self.layers[self.layers.len() - 1].clone();
        if output.len() != self.task.output_width() {
            bail!(
                "stored output layer has {} nodes but {:?} needs {}",
                output.len(),
                self.task,
                self.task.output_width()
            );
        }
        for node in &self.nodes[output] {
            if node.kind != NodeKind::Output {
                bail!("the stored last layer holds a {:?} node; it must be all Output", node.kind);
            }
        }
        Ok(())
    }
}

/// Uniform in [-1, 1), the spread every fresh bias and weight starts from.
fn random_weight(rng: &mut ThreadRng) -> f64 {
    rng.gen::<f64>() * 2.0 - 1.0
}

// ---------------------------------------------------------------------------
// Forward pass
// ---------------------------------------------------------------------------

impl Network {
    /// Loads one input vector into the input layer, by position.
    pub fn insert_input(&mut self, input: &[f64]) -> Result<()> {
        let span = self.layers[0].clone();
        if input.len() != span.len() {
            bail!(
                "input vector holds {} values but the input layer has {} nodes",
                input.len(),
                span.len()
            );
        }
        for (node, &value) in self.nodes[span].iter_mut().zip(input) {
            node.calculate(&[], self.activation, Some(value))?;
        }
        Ok(())
    }

    /// Runs the forward pass over layers `1..n` in order and returns the
    /// output layer's recorded activations.
    pub fn calculate(&mut self) -> Result<Vec<f64>> {
        trace!("running forward calculations");
        for layer_index in 1..self.layers.len() {
            let span = self.layers[layer_index].clone();
            let (settled, rest) = self.nodes.split_at_mut(span.start);
            for node in &mut rest[..span.len()] {
                node.calculate(settled, self.activation, None)?;
            }
        }
        Ok(self.output_activations())
    }

    /// Single inference: insert, run forward, read the outputs.
    pub fn evaluate(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.insert_input(input)?;
        self.calculate()
    }

    /// Inference plus argmax over the outputs.  Returns the winning index
    /// alongside the raw activations; fails if no output activation is a
    /// comparable number.
    pub fn classify(&mut self, input: &[f64]) -> Result<(usize, Vec<f64>)> {
        let outputs = self.evaluate(input)?;
        let winner = outputs
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_nan())
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(index, _)| index)
            .ok_or_else(|| anyhow!("no output node produced a usable activation"))?;
        Ok((winner, outputs))
    }

    /// Recorded activations of the output layer, index-aligned with the
    /// task's output encoding.
    pub fn output_activations(&self) -> Vec<f64> {
        let span = self.layers[self.layers.len() - 1].clone();
        self.nodes[span].iter().map(|node| node.activation).collect()
    }
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

impl Network {
    /// Per-output error signal for the last forward pass.
    ///
    /// The product task scores each bit against the activation slope at
    /// the recorded output value; the digit task against the raw value.
    pub fn output_error(&self, actual: &[f64], expected: &[f64]) -> Result<Vec<f64>> {
        let width = self.task.output_width();
        if actual.len() != width || expected.len() != width {
            bail!(
                "error vectors must match the output width {width} (got {} actual, {} expected)",
                actual.len(),
                expected.len()
            );
        }
        let errors = match self.task {
            Task::Product => actual
                .iter()
                .zip(expected)
                .map(|(&a, &e)| e - self.activation.derivative(a))
                .collect(),
            Task::Mnist => actual.iter().zip(expected).map(|(&a, &e)| e - a).collect(),
        };
        Ok(errors)
    }

    /// Walks the layers last to first, training each one and feeding its
    /// propagated error to the layer below.  The input layer never trains.
    pub fn backpropagate(&mut self, output_errors: &[f64]) -> Result<()> {
        trace!("starting backpropagation");
        let width = self.task.output_width();
        if output_errors.len() != width {
            bail!("backpropagation needs {width} output errors, got {}", output_errors.len());
        }
        let mut current = output_errors.to_vec();
        for layer_index in (1..self.layers.len()).rev() {
            current = self.train_layer(layer_index, &current);
        }
        Ok(())
    }

    /// Trains every node of one layer and combines the per-node propagated
    /// errors: an element-wise sum over the layer, scaled down by the
    /// predecessor layer's width.
    fn train_layer(&mut self, layer_index: usize, errors: &[f64]) -> Vec<f64> {
        let span = self.layers[layer_index].clone();
        let (settled, rest) = self.nodes.split_at_mut(span.start);
        let layer = &mut rest[..span.len()];

        let prev_width = layer[0].connection_count();
        let mut combined = vec![0.0; prev_width];
        for (node, &error) in layer.iter_mut().zip(errors) {
            let propagated = node.train(settled, self.activation, error, self.learning_rate);
            for (slot, value) in combined.iter_mut().zip(&propagated) {
                *slot += value;
            }
        }
        if prev_width > 0 {
            let scale = prev_width as f64;
            for slot in &mut combined {
                *slot /= scale;
            }
        }
        combined
    }

    /// Clears the recorded values of every non-input node so nothing
    /// carries over into an unrelated pass.
    pub fn reset_activations(&mut self) {
        for layer_index in 1..self.layers.len() {
            let span = self.layers[layer_index].clone();
            for node in &mut self.nodes[span] {
                node.reset();
            }
        }
    }

    /// Records one batch's error magnitude (sum of absolute entries),
    /// evicting the oldest entries past the configured maximum.
    pub fn push_batch_error(&mut self, errors: &[f64]) {
        let total: f64 = errors.iter().map(|e| e.abs()).sum();
        self.cost_history.push_back(total);
        while self.cost_history.len() > self.maximum_stored_errors {
            self.cost_history.pop_front();
        }
    }

    /// Bumps the persisted count of completed training cycles.
    pub fn record_cycle(&mut self) {
        self.completed_cycles += 1;
    }
}

// ---------------------------------------------------------------------------
// State & persistence
// ---------------------------------------------------------------------------

impl Network {
    pub fn task(&self) -> Task {
        self.task
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    pub fn cost_history(&self) -> &VecDeque<f64> {
        &self.cost_history
    }

    /// Serializable copy of every node plus the training counter.
    pub fn snapshot(&self) -> NetworkMemory {
        let layers = self
            .layers
            .iter()
            .map(|span| self.nodes[span.clone()].iter().map(Node::snapshot).collect())
            .collect();
        NetworkMemory { completed_cycles: self.completed_cycles, layers }
    }

    /// Serializable copy of the rolling error record.
    pub fn history(&self) -> ErrorHistory {
        ErrorHistory { cost: self.cost_history.iter().copied().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> NetConfig {
        NetConfig {
            batch_size: 4,
            learning_rate: 0.1,
            maximum_stored_errors: 3,
            layers: Vec::new(),
            activation: Activation::ReLU,
        }
    }

    /// Product-shaped memory with every bias and weight pinned to 1 so the
    /// forward values are exact integers.
    fn uniform_memory(hidden: &[usize]) -> NetworkMemory {
        let mut layers: Vec<Vec<NodeSnapshot>> = Vec::new();
        layers.push(
            (0..16)
                .map(|_| NodeSnapshot { kind: NodeKind::Input, bias: 0.0, prev: Vec::new() })
                .collect(),
        );
        let mut prev_width = 16;
        for &width in hidden {
            layers.push(
                (0..width)
                    .map(|_| NodeSnapshot {
                        kind: NodeKind::Primary,
                        bias: 1.0,
                        prev: vec![1.0; prev_width],
                    })
                    .collect(),
            );
            prev_width = width;
        }
        layers.push(
            (0..8)
                .map(|_| NodeSnapshot {
                    kind: NodeKind::Output,
                    bias: 1.0,
                    prev: vec![1.0; prev_width],
                })
                .collect(),
        );
        NetworkMemory { completed_cycles: 0, layers }
    }

    fn alternating_input() -> Vec<f64> {
        (0..16).map(|i| if i % 2 == 0 { 1.0 } else { 0.0 }).collect()
    }

    #[test]
    fn forward_pass_through_a_known_network() {
        let mut net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[3]),
            ErrorHistory::default(),
        )
        .unwrap();

        let outputs = net.evaluate(&alternating_input()).unwrap();

        // eight set bits through unit weights plus bias: 8 + 1 = 9
        let hidden: Vec<f64> = net.nodes[16..19].iter().map(|n| n.activation).collect();
        assert_eq!(hidden, vec![9.0, 9.0, 9.0]);
        // three hidden outputs of 9 through unit weights plus bias: 27 + 1 = 28
        assert_eq!(outputs, vec![28.0; 8]);
    }

    #[test]
    fn forward_pass_is_repeatable() {
        let mut net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[3]),
            ErrorHistory::default(),
        )
        .unwrap();
        let first = net.evaluate(&alternating_input()).unwrap();
        let second = net.evaluate(&alternating_input()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn insert_rejects_a_mismatched_input_width() {
        let mut net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[]),
            ErrorHistory::default(),
        )
        .unwrap();
        assert!(net.insert_input(&vec![1.0; 10]).is_err());
    }

    #[test]
    fn fresh_construction_follows_the_config_shape() {
        let mut config = test_config();
        config.layers = vec![LayerSpec { kind: NodeKind::Primary, amount: 4 }];
        let net = Network::build(
            Task::Product,
            &config,
            NetworkMemory::empty(),
            ErrorHistory::default(),
        )
        .unwrap();

        let snapshot = net.snapshot();
        assert_eq!(snapshot.completed_cycles, 0);
        assert_eq!(snapshot.layers.len(), 3);
        assert_eq!(snapshot.layers[0].len(), 16);
        assert_eq!(snapshot.layers[1].len(), 4);
        assert_eq!(snapshot.layers[2].len(), 8);
        for row in &snapshot.layers[0] {
            assert_eq!(row.kind, NodeKind::Input);
            assert_eq!(row.bias, 0.0);
            assert!(row.prev.is_empty());
        }
        for row in &snapshot.layers[1] {
            assert_eq!(row.prev.len(), 16);
            assert!(row.prev.iter().all(|w| (-1.0..1.0).contains(w)));
        }
        for row in &snapshot.layers[2] {
            assert_eq!(row.kind, NodeKind::Output);
            assert_eq!(row.prev.len(), 4);
        }
    }

    #[test]
    fn build_rejects_a_zero_batch_size() {
        let mut config = test_config();
        config.batch_size = 0;
        assert!(Network::build(
            Task::Product,
            &config,
            NetworkMemory::empty(),
            ErrorHistory::default()
        )
        .is_err());
    }

    #[test]
    fn build_rejects_degenerate_interior_layers() {
        let mut config = test_config();
        config.layers = vec![LayerSpec { kind: NodeKind::Primary, amount: 0 }];
        assert!(Network::build(
            Task::Product,
            &config,
            NetworkMemory::empty(),
            ErrorHistory::default()
        )
        .is_err());

        config.layers = vec![LayerSpec { kind: NodeKind::Input, amount: 4 }];
        assert!(Network::build(
            Task::Product,
            &config,
            NetworkMemory::empty(),
            ErrorHistory::default()
        )
        .is_err());
    }

    #[test]
    fn restore_rejects_mismatched_weight_counts() {
        let mut memory = uniform_memory(&[3]);
        memory.layers[1][0].prev.pop();
        assert!(Network::build(
            Task::Product,
            &test_config(),
            memory,
            ErrorHistory::default()
        )
        .is_err());
    }

    #[test]
    fn restore_rejects_a_connected_first_layer() {
        let mut memory = uniform_memory(&[]);
        memory.layers[0][0].kind = NodeKind::Primary;
        assert!(Network::build(
            Task::Product,
            &test_config(),
            memory,
            ErrorHistory::default()
        )
        .is_err());
    }

    #[test]
    fn restore_rejects_a_snapshot_shaped_for_another_task() {
        assert!(Network::build(
            Task::Mnist,
            &test_config(),
            uniform_memory(&[3]),
            ErrorHistory::default()
        )
        .is_err());
    }

    #[test]
    fn product_error_scores_against_the_activation_slope() {
        let net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[]),
            ErrorHistory::default(),
        )
        .unwrap();

        let actual = [2.0, -1.0, 0.5, 0.0, 1.0, 3.0, -2.0, 0.25];
        let expected = [1.0; 8];
        let errors = net.output_error(&actual, &expected).unwrap();
        // ReLU slope is 1 where the recorded value is positive, else 0
        assert_eq!(errors, vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn digit_error_is_the_plain_difference() {
        let mut memory = NetworkMemory { completed_cycles: 0, layers: Vec::new() };
        memory.layers.push(
            (0..784)
                .map(|_| NodeSnapshot { kind: NodeKind::Input, bias: 0.0, prev: Vec::new() })
                .collect(),
        );
        memory.layers.push(
            (0..10)
                .map(|_| NodeSnapshot { kind: NodeKind::Output, bias: 0.0, prev: vec![1.0; 784] })
                .collect(),
        );
        let net = Network::build(Task::Mnist, &test_config(), memory, ErrorHistory::default())
            .unwrap();

        let actual = [0.1, 0.2, 0.3, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5];
        let mut expected = [0.0; 10];
        expected[3] = 1.0;
        let errors = net.output_error(&actual, &expected).unwrap();
        for (i, error) in errors.iter().enumerate() {
            assert!((error - (expected[i] - actual[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn output_error_rejects_mismatched_widths() {
        let net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[]),
            ErrorHistory::default(),
        )
        .unwrap();
        assert!(net.output_error(&[0.0; 7], &[0.0; 8]).is_err());
        assert!(net.output_error(&[0.0; 8], &[0.0; 9]).is_err());
    }

    #[test]
    fn backpropagation_trains_outputs_and_spares_the_input_layer() {
        let mut net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[]),
            ErrorHistory::default(),
        )
        .unwrap();
        net.evaluate(&alternating_input()).unwrap();

        net.backpropagate(&[0.5; 8]).unwrap();

        let snapshot = net.snapshot();
        for row in &snapshot.layers[1] {
            // flat delta: 0.1 * 0.5 = 0.05, so every unit weight moves to 1.05
            for weight in &row.prev {
                assert!((weight - 1.05).abs() < 1e-12);
            }
            // output biases never train
            assert_eq!(row.bias, 1.0);
        }
        for row in &snapshot.layers[0] {
            assert_eq!(row.bias, 0.0);
            assert!(row.prev.is_empty());
        }
    }

    #[test]
    fn propagated_errors_are_averaged_over_the_predecessor_width() {
        let mut net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[2]),
            ErrorHistory::default(),
        )
        .unwrap();
        net.evaluate(&vec![1.0; 16]).unwrap();

        net.backpropagate(&[0.1; 8]).unwrap();

        // each output: delta = 0.1 * 0.1, weights 1 -> 1.01, propagated 0.101;
        // summed over 8 outputs and divided by the hidden width 2 -> 0.404
        let snapshot = net.snapshot();
        for row in &snapshot.layers[2] {
            for weight in &row.prev {
                assert!((weight - 1.01).abs() < 1e-12);
            }
        }
        // hidden error 0.404 with unit bias and live slopes moves both the
        // bias and all sixteen weights by the same 0.0404 step
        for row in &snapshot.layers[1] {
            assert!((row.bias - 1.0404).abs() < 1e-12);
            for weight in &row.prev {
                assert!((weight - 1.0404).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn backpropagate_rejects_a_mismatched_error_width() {
        let mut net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[]),
            ErrorHistory::default(),
        )
        .unwrap();
        assert!(net.backpropagate(&[0.1; 7]).is_err());
    }

    #[test]
    fn reset_clears_every_non_input_activation() {
        let mut net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[3]),
            ErrorHistory::default(),
        )
        .unwrap();
        net.evaluate(&alternating_input()).unwrap();
        assert_ne!(net.output_activations(), vec![0.0; 8]);

        net.reset_activations();
        assert_eq!(net.output_activations(), vec![0.0; 8]);
        for node in &net.nodes[16..] {
            assert_eq!(node.activation, 0.0);
            assert_eq!(node.output, 0.0);
        }
    }

    #[test]
    fn error_history_is_bounded_and_drops_the_oldest() {
        let mut net = Network::build(
            Task::Product,
            &test_config(),
            uniform_memory(&[]),
            ErrorHistory { cost: vec![1.0, 2.0, 3.0, 4.0, 5.0] },
        )
        .unwrap();
        // seeded history already trimmed to the newest three
        assert_eq!(net.history().cost, vec![3.0, 4.0, 5.0]);

        net.push_batch_error(&[1.5, -4.5]);
        assert_eq!(net.history().cost, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn classify_picks_the_strongest_output() {
        let mut memory = uniform_memory(&[3]);
        for weight in &mut memory.layers[2][2].prev {
            *weight = 3.0;
        }
        let mut net =
            Network::build(Task::Product, &test_config(), memory, ErrorHistory::default())
                .unwrap();

        let (winner, outputs) = net.classify(&alternating_input()).unwrap();
        assert_eq!(winner, 2);
        assert_eq!(outputs[2], 9.0 * 3.0 * 3.0 + 1.0);
    }

    #[test]
    fn classify_fails_when_no_output_is_usable() {
        let mut memory = uniform_memory(&[]);
        for row in &mut memory.layers[1] {
            row.bias = f64::NAN;
        }
        let mut net =
            Network::build(Task::Product, &test_config(), memory, ErrorHistory::default())
                .unwrap();
        assert!(net.classify(&alternating_input()).is_err());
    }

    #[test]
    fn record_cycle_counts_up_from_the_stored_value() {
        let mut memory = uniform_memory(&[]);
        memory.completed_cycles = 41;
        let mut net =
            Network::build(Task::Product, &test_config(), memory, ErrorHistory::default())
                .unwrap();
        net.record_cycle();
        assert_eq!(net.completed_cycles(), 42);
        assert_eq!(net.snapshot().completed_cycles, 42);
    }
}
