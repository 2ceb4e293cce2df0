pub mod pipeline;

pub use pipeline::{default_filename, Pipeline, RunOutput, Source, Stage};
