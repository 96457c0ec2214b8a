//! Capture device seam.
//!
//! A [`CameraBackend`] enumerates and opens devices; each open device
//! yields a [`CaptureStream`] that must be released exactly once.

use async_trait::async_trait;

use super::ScanError;
use super::codec::LumaFrame;

/// Enumerated capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    /// Human-readable label, used to pick a rear-facing camera.
    pub label: String,
}

impl CameraDevice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Device or permission failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CameraError {
    message: String,
}

impl CameraError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Platform access to capture devices.
#[async_trait]
pub trait CameraBackend: Send + Sync {
    /// List the devices currently available.
    async fn list_devices(&self) -> Result<Vec<CameraDevice>, CameraError>;

    /// Acquire exclusive access to `device`.
    async fn open(&self, device: &CameraDevice) -> Result<Box<dyn CaptureStream>, CameraError>;
}

/// Exclusive handle on a running capture device.
#[async_trait]
pub trait CaptureStream: Send {
    /// Wait for the next frame. `Ok(None)` means the stream has ended.
    async fn next_frame(&mut self) -> Result<Option<LumaFrame>, CameraError>;

    /// Hand the device back to the platform.
    fn release(&mut self);
}

/// Decodes a single frame into an identifier.
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, frame: &LumaFrame) -> Result<String, ScanError>;
}
