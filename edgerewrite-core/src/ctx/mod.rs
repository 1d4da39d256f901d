mod request_ctx;
mod response_ctx;

pub use request_ctx::RequestCtx;
pub use response_ctx::ResponseCtx;
