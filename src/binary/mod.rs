pub mod bits;

pub use bits::{from_binary_array, to_binary_array, to_bit, BYTE_WIDTH};
