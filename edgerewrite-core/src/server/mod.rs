mod pid;
mod proxy;
mod reload;
mod runtime;
pub mod setup;

pub use proxy::EdgeGateway;
pub use reload::ReloadHandle;
pub use runtime::{RuntimeState, build_runtime_state, reload_runtime_state};
pub use setup::{build_edge_server, run};
