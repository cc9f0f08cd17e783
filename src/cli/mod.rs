mod args;

pub use args::{CliArgs, Command, CommonArgs, CompressionLevel, DetectArgs, GridArgs};
