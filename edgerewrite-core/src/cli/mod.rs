mod check;
mod objects;
mod precompress;
mod rewrite;

pub use check::*;
pub use objects::*;
pub use precompress::*;
pub use rewrite::*;
