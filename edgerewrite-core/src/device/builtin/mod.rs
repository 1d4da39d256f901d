pub mod precompressed_rewrite;
pub mod structured_logging;
