use super::{Device, DeviceResult};
use crate::ctx::{RequestCtx, ResponseCtx};
use std::sync::Arc;

pub struct DevicePipeline;

impl DevicePipeline {
    pub fn run_on_request(devices: &[Arc<dyn Device>], ctx: &mut RequestCtx) -> DeviceResult {
        for dev in devices {
            match dev.on_request(ctx) {
                DeviceResult::Continue => continue,
                r @ DeviceResult::Respond(_) => return r,
                DeviceResult::Error(err) => {
                    Self::report_error(devices, &err);
                    return DeviceResult::Error(err);
                }
            }
        }
        DeviceResult::Continue
    }

    pub fn run_on_response(devices: &[Arc<dyn Device>], ctx: &mut ResponseCtx) -> DeviceResult {
        for dev in devices {
            match dev.on_response(ctx) {
                DeviceResult::Continue => continue,
                r @ DeviceResult::Respond(_) => return r,
                DeviceResult::Error(err) => {
                    Self::report_error(devices, &err);
                    return DeviceResult::Error(err);
                }
            }
        }
        DeviceResult::Continue
    }

    /// Every device sees the error, not just the one that raised it.
    fn report_error(devices: &[Arc<dyn Device>], err: &super::errors::DeviceError) {
        for dev in devices {
            dev.on_error(err);
        }
    }
}
