pub mod activation;
pub mod binary;
pub mod data;
pub mod network;
pub mod nodes;
pub mod train;

// Convenience re-exports
pub use activation::activation::Activation;
pub use binary::bits::{from_binary_array, to_binary_array, to_bit};
pub use data::mnist::MnistSet;
pub use data::product::ProductCursor;
pub use data::sample::{Sample, SampleSource};
pub use network::config::{LayerSpec, NetConfig, Task};
pub use network::memory::{ErrorHistory, NetworkMemory};
pub use network::network::Network;
pub use nodes::node::{Node, NodeKind, NodeSnapshot};
pub use train::batch::run_training_batch;
