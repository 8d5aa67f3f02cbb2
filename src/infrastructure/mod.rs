pub mod core;
pub mod logstash_client;
pub mod mock;
pub mod observability;

pub use logstash_client::HttpLogstashClient;
pub use mock::MockLogstashApi;
