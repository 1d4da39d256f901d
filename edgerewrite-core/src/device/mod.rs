pub mod builtin;
pub mod core;
