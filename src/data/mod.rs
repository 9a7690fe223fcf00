pub mod mnist;
pub mod product;
pub mod sample;

pub use mnist::MnistSet;
pub use product::ProductCursor;
pub use sample::{Sample, SampleSource};
