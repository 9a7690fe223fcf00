pub mod config;
pub mod memory;
pub mod network;

pub use config::{LayerSpec, NetConfig, Task};
pub use memory::{ErrorHistory, NetworkMemory};
pub use network::Network;
