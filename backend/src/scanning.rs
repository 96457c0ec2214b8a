//! QR scanning: symbol encode/decode and the live camera session.
//!
//! Purpose: turn a worker identifier into a printable QR symbol and back.
//! The camera session owns at most one capture handle at a time and always
//! releases it before reporting a result.
//!
//! Public surface:
//! - [`codec`]: SVG/PNG/print rendering and image or frame decoding.
//! - [`camera`]: the device backend seam and frame decoder trait.
//! - [`session::ScanSession`]: start/stop/next-scan lifecycle over a backend.
//! - [`manual::ManualEntry`]: typed-in fallback when no camera is usable.

pub mod camera;
pub mod codec;
pub mod manual;
pub mod session;

pub use self::camera::{CameraBackend, CameraDevice, CameraError, CaptureStream, FrameDecoder};
pub use self::codec::{DEFAULT_QR_SIZE, LumaFrame, QrDecoder};
pub use self::manual::ManualEntry;
pub use self::session::{ScanSession, ScanState};

/// Failures raised while encoding, capturing or decoding QR symbols.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Device enumeration returned nothing.
    #[error("No camera found on this device")]
    NoCameraFound,
    /// No readable QR symbol in the frame or image.
    #[error("No QR code found in image")]
    DecodeFailure,
    /// Every device failed to start, or a running capture broke.
    #[error("camera error: {message}")]
    Device { message: String },
    /// `next_scan` called without a running capture.
    #[error("no active scanning session")]
    NotScanning,
    /// The identifier does not fit in a QR symbol.
    #[error("could not encode QR code: {message}")]
    Encode { message: String },
}

impl From<CameraError> for ScanError {
    fn from(value: CameraError) -> Self {
        Self::Device {
            message: value.to_string(),
        }
    }
}
