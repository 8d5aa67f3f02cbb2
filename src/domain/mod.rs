// Emission results and stage reports
pub mod emission;

// Logstash API constants and metric catalog
pub mod logstash;

// Dotted metric paths and resolution
pub mod metric_path;

// Port interfaces
pub mod ports;

// Connectivity check results
pub mod service_check;

// Domain-specific error types
pub mod errors;
