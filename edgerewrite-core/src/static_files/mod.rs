pub mod handler;
pub mod object;
pub mod precompress;
mod resolve;
mod response;
mod serve;

#[cfg(test)]
mod tests;

pub use handler::handle_static_request;
pub use object::{StoredObject, list_objects};
pub use precompress::{PrecompressReport, precompress};
pub use resolve::{ResolveError, ResolvedObject, resolve_object_path};
pub use response::{ServeError, StaticBody, StaticResponse};
