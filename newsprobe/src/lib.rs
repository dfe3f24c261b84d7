// Library interface for newsprobe modules
// This allows tests and other binaries to import modules

pub mod analyzer;
pub mod annotate;
pub mod inference;
pub mod labels;
pub mod pipeline;
pub mod report;
pub mod server;
