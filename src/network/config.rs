use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;
use crate::nodes::node::NodeKind;

/// The two built-in tasks a network can be shaped for.  The task fixes the
/// input and output layer widths; only the interior layers are
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Two 4-bit operands in (16 bits), their 8-bit product out.
    Product,
    /// One 28x28 grayscale image in (784 pixels), ten digit classes out.
    Mnist,
}

impl Task {
    /// Width of the input layer.
    pub fn input_width(&self) -> usize {
        match self {
            Task::Product => 16,
            Task::Mnist => 784,
        }
    }

    /// Width of the output layer.
    pub fn output_width(&self) -> usize {
        match self {
            Task::Product => 8,
            Task::Mnist => 10,
        }
    }
}

/// Describes one interior layer of a network.
///
/// Fields:
/// - `kind`   - which node role fills the layer (serialized as `type`)
/// - `amount` - number of nodes in the layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub amount: usize,
}

/// Tunables read once at process start and threaded into network
/// construction.  Serialized with camelCase keys so a config file reads
/// `batchSize`, `learningRate`, `maximumStoredErrors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetConfig {
    /// Samples per training cycle; errors are averaged over the batch.
    pub batch_size: usize,
    /// Step-size factor applied by every node's training rule.
    pub learning_rate: f64,
    /// Upper bound on the persisted batch-error history.
    pub maximum_stored_errors: usize,
    /// Interior layer shapes, input side first.  Input and output layers
    /// are implied by the task and never listed here.
    pub layers: Vec<LayerSpec>,
    /// Transfer function for every non-input node.
    #[serde(default)]
    pub activation: Activation,
}

impl Default for NetConfig {
    fn default() -> Self {
        NetConfig {
            batch_size: 100,
            learning_rate: 0.05,
            maximum_stored_errors: 1000,
            layers: vec![LayerSpec { kind: NodeKind::Primary, amount: 16 }],
            activation: Activation::default(),
        }
    }
}

impl NetConfig {
    /// Reads a config file, falling back to the built-in defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<NetConfig> {
        if !path.exists() {
            return Ok(NetConfig::default());
        }
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow!("Failed to open config {}: {}", path.display(), e))?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse config {}: {}", path.display(), e))
    }
}
