use anyhow::Result;
use log::debug;

use crate::data::sample::SampleSource;
use crate::network::network::Network;

/// Runs one training cycle and returns the batch-averaged error vector.
///
/// One cycle means:
/// 1. draw `batch_size` samples from `source`, run each through the
///    network, and accumulate the per-output error signals;
/// 2. divide the accumulated signals by the batch size;
/// 3. backpropagate that averaged vector exactly once;
/// 4. append the averaged vector's absolute sum to the rolling error
///    history;
/// 5. clear every non-input activation and bump the cycle counter.
///
/// Weights only move in step 3, so the order of samples inside a batch
/// cannot influence the outcome.
pub fn run_training_batch<S: SampleSource>(net: &mut Network, source: &mut S) -> Result<Vec<f64>> {
    let batch_size = net.batch_size();
    let width = net.task().output_width();
    let mut total = vec![0.0; width];

    for _ in 0..batch_size {
        let sample = source.next_sample();
        let actual = net.evaluate(&sample.input)?;
        let errors = net.output_error(&actual, &sample.target)?;
        for (slot, error) in total.iter_mut().zip(&errors) {
            *slot += error;
        }
    }

    let scale = batch_size as f64;
    for slot in &mut total {
        *slot /= scale;
    }

    net.backpropagate(&total)?;
    net.push_batch_error(&total);
    net.reset_activations();
    net.record_cycle();
    debug!("completed cycle {} with averaged error {:?}", net.completed_cycles(), total);
    Ok(total)
}
