// Poll orchestration
pub mod check;

// Metric extraction and emission
pub mod emitter;

// Connectivity service check
pub mod prober;
