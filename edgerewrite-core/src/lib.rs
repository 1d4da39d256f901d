pub mod cli;
pub mod conf;
pub mod ctx;
pub mod device;
pub mod http_event;
pub mod logging;
pub mod rewrite;
pub mod server;
pub mod static_files;
