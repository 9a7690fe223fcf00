pub mod batch;

pub use batch::run_training_batch;
