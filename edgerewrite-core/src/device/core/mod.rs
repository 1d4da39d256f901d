pub mod errors;
pub mod pipeline;
pub mod registry;
pub mod result;


use self::errors::DeviceError;
pub use self::result::DeviceResult;
use crate::ctx::{RequestCtx, ResponseCtx};

/// A processing unit in the edge request pipeline.
///
/// Devices can intercept and modify requests/responses at different stages.
/// Each device must be both Send and Sync; one instance serves every worker
/// thread.
///
/// All methods provide default implementations that simply continue the pipeline,
/// allowing implementations to override only the methods they care about.
pub trait Device: Send + Sync {
    /// Called when a request is first received, before the origin is consulted.
    ///
    /// This is where the request path may be rewritten.
    fn on_request(&self, _ctx: &mut RequestCtx) -> DeviceResult {
        DeviceResult::Continue
    }

    /// Called just before the response is sent back to the client.
    fn on_response(&self, _ctx: &mut ResponseCtx) -> DeviceResult {
        DeviceResult::Continue
    }

    /// Called when a device in the pipeline reports an error.
    fn on_error(&self, _err: &DeviceError) {}
}
