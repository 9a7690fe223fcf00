use anyhow::{bail, Result};
use log::trace;
use rand::seq::SliceRandom;

use crate::binary::bits::{to_binary_array, BYTE_WIDTH};
use crate::data::sample::{Sample, SampleSource};

/// Largest operand the multiplication task trains on.
pub const MAX_FACTOR: u8 = 15;

/// Shuffled, self-refilling traversal of every operand pair in
/// `[0, MAX_FACTOR] x [0, MAX_FACTOR]`.
///
/// Pairs are popped from the end of a shuffled list; when the list runs
/// dry the full cross product is rebuilt and reshuffled, so every pair
/// appears exactly once per cycle in a fresh order.  A forced pair
/// short-circuits the traversal entirely.
pub struct ProductCursor {
    pending: Vec<(u8, u8)>,
    forced: Option<(u8, u8)>,
}

impl ProductCursor {
    pub fn new() -> ProductCursor {
        ProductCursor { pending: Vec::new(), forced: None }
    }

    /// Cursor that serves the same operand pair on every draw.
    pub fn fixed(first: u8, second: u8) -> Result<ProductCursor> {
        if first > MAX_FACTOR || second > MAX_FACTOR {
            bail!("operands must be at most {MAX_FACTOR}, got {first} and {second}");
        }
        Ok(ProductCursor { pending: Vec::new(), forced: Some((first, second)) })
    }

    /// Next operand pair in the current traversal.
    pub fn next_pair(&mut self) -> (u8, u8) {
        if let Some(pair) = self.forced {
            return pair;
        }
        if self.pending.is_empty() {
            self.refill();
        }
        self.pending.pop().expect("a refilled pair list is never empty")
    }

    fn refill(&mut self) {
        trace!("regenerating the multiplication pair pool");
        self.pending = (0..=MAX_FACTOR)
            .flat_map(|first| (0..=MAX_FACTOR).map(move |second| (first, second)))
            .collect();
        self.pending.shuffle(&mut rand::thread_rng());
    }
}

impl SampleSource for ProductCursor {
    fn next_sample(&mut self) -> Sample {
        let (first, second) = self.next_pair();
        let input = product_input(first, second)
            .expect("operands at most MAX_FACTOR always encode");
        let product = u16::from(first) * u16::from(second);
        let target = to_binary_array(i64::from(product))
            .expect("the product of two 4-bit operands always fits one byte")
            .iter()
            .map(|&bit| f64::from(bit))
            .collect();
        Sample { input, target }
    }
}

/// Concatenated big-endian bit encodings of both operands: the 16-value
/// input vector of the multiplication task.
pub fn product_input(first: u8, second: u8) -> Result<Vec<f64>> {
    let mut input = Vec::with_capacity(2 * BYTE_WIDTH);
    input.extend(to_binary_array(i64::from(first))?.iter().map(|&bit| f64::from(bit)));
    input.extend(to_binary_array(i64::from(second))?.iter().map(|&bit| f64::from(bit)));
    Ok(input)
}
