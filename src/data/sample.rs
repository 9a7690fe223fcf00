/// One training example: the input activations and the expected output
/// vector, both index-aligned with a network's first and last layers.
#[derive(Debug, Clone)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

/// A self-refilling stream of training samples.  Drawing never runs dry;
/// sources reshuffle or wrap around instead of signalling exhaustion.
pub trait SampleSource {
    fn next_sample(&mut self) -> Sample;
}
