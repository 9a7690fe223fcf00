use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Serialize, Deserialize};

use crate::nodes::node::NodeSnapshot;

/// On-disk form of a whole network: the training counter plus every node
/// of every layer, input side first.
///
/// An empty `layers` list is the "no snapshot yet" signal; construction
/// rolls fresh random weights when it sees one.  Serialized with
/// camelCase keys (`completedCycles`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMemory {
    pub completed_cycles: u64,
    pub layers: Vec<Vec<NodeSnapshot>>,
}

impl NetworkMemory {
    /// Memory with no layers: loading it makes construction roll fresh
    /// weights instead of rehydrating.
    pub fn empty() -> NetworkMemory {
        NetworkMemory { completed_cycles: 0, layers: Vec::new() }
    }

    /// Serializes the memory to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| anyhow!("Failed to create snapshot {}: {}", path.display(), e))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| anyhow!("Failed to write snapshot {}: {}", path.display(), e))
    }

    /// Deserializes a memory written by `save_json`.
    pub fn load_json(path: &Path) -> Result<NetworkMemory> {
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow!("Failed to open snapshot {}: {}", path.display(), e))?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse snapshot {}: {}", path.display(), e))
    }

    /// Loads a snapshot file, treating a missing file as the empty memory
    /// of a first run.
    pub fn load_or_empty(path: &Path) -> Result<NetworkMemory> {
        if path.exists() {
            NetworkMemory::load_json(path)
        } else {
            Ok(NetworkMemory::empty())
        }
    }
}

/// Rolling record of recent batch error magnitudes, persisted separately
/// from the snapshot so either file can be inspected or discarded alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorHistory {
    pub cost: Vec<f64>,
}

impl ErrorHistory {
    /// Serializes the history to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| anyhow!("Failed to create history {}: {}", path.display(), e))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| anyhow!("Failed to write history {}: {}", path.display(), e))
    }

    /// Loads a history file, treating a missing file as an empty history.
    pub fn load_or_empty(path: &Path) -> Result<ErrorHistory> {
        if !path.exists() {
            return Ok(ErrorHistory::default());
        }
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow!("Failed to open history {}: {}", path.display(), e))?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse history {}: {}", path.display(), e))
    }
}
