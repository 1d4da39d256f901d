mod config;
pub mod server;
pub mod site;
pub mod tracing;
pub mod upstream;

pub use server::TestServer;
pub use tracing::{CapturedEvent, init_test_tracing};
