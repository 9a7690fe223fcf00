pub mod node;

pub use node::{Node, NodeKind, NodeSnapshot};
