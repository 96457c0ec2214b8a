//! Live camera scanning session.
//!
//! A session owns at most one capture handle. The handle is wrapped in
//! [`ActiveCapture`], whose `Drop` releases the device, so every path that
//! clears the slot (stop, decode success, stream failure, dropping the
//! session) gives the device back.
//!
//! State machine: `Idle -> Scanning -> Idle` on a normal scan and
//! `Idle -> Error -> Idle` when no device could be started. `start` while
//! scanning stops first; there is no `Scanning -> Scanning` transition.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use super::ScanError;
use super::camera::{CameraBackend, CameraDevice, CaptureStream, FrameDecoder};
use super::codec;

/// Pause between attempts when falling back to the next device.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(120);

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Error,
}

static REAR_FACING_RE: OnceLock<Regex> = OnceLock::new();
static SECONDARY_RE: OnceLock<Regex> = OnceLock::new();

fn label_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("camera label regex failed to compile: {error}"))
    })
}

fn rear_facing() -> &'static Regex {
    label_regex(&REAR_FACING_RE, r"(?i)back|rear|environment")
}

fn secondary() -> &'static Regex {
    label_regex(&SECONDARY_RE, r"(?i)camera ?2")
}

/// Order devices for start-up: a rear-facing label wins, then a "camera 2"
/// label, then the first enumerated device. Every other device follows in
/// enumeration order.
pub fn preferred_order(devices: &[CameraDevice]) -> Vec<CameraDevice> {
    let preferred = devices
        .iter()
        .position(|d| rear_facing().is_match(&d.label))
        .or_else(|| devices.iter().position(|d| secondary().is_match(&d.label)))
        .unwrap_or(0);

    let mut ordered = Vec::with_capacity(devices.len());
    if let Some(first) = devices.get(preferred) {
        ordered.push(first.clone());
    }
    ordered.extend(
        devices
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != preferred)
            .map(|(_, device)| device.clone()),
    );
    ordered
}

/// Owned capture handle; releases the device when dropped.
struct ActiveCapture {
    device: CameraDevice,
    stream: Box<dyn CaptureStream>,
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        self.stream.release();
        debug!(device = %self.device.id, "capture released");
    }
}

/// Single-device scanning session over a camera backend.
pub struct ScanSession<B> {
    backend: Arc<B>,
    decoder: Arc<dyn FrameDecoder>,
    retry_delay: Duration,
    capture: Option<ActiveCapture>,
    state: ScanState,
}

impl<B: CameraBackend> ScanSession<B> {
    /// Create an idle session.
    pub fn new(backend: Arc<B>, decoder: Arc<dyn FrameDecoder>) -> Self {
        Self {
            backend,
            decoder,
            retry_delay: DEFAULT_RETRY_DELAY,
            capture: None,
            state: ScanState::Idle,
        }
    }

    /// Override the pause between device fallback attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Device currently held, if scanning.
    pub fn active_device(&self) -> Option<&CameraDevice> {
        self.capture.as_ref().map(|c| &c.device)
    }

    /// Start scanning on the best available device.
    ///
    /// Any running capture is stopped first. Devices are tried once each in
    /// [`preferred_order`]; the first that opens becomes the active capture.
    ///
    /// # Errors
    /// [`ScanError::NoCameraFound`] when enumeration fails or finds nothing
    /// and [`ScanError::Device`] when every device refuses to start. The session is left in [`ScanState::Error`].
    pub async fn start(&mut self) -> Result<CameraDevice, ScanError> {
        self.stop();

        let devices = match self.backend.list_devices().await {
            Ok(devices) => devices,
            Err(err) => {
                warn!(error = %err, "camera enumeration failed");
                Vec::new()
            }
        };
        if devices.is_empty() {
            return Err(self.fail(ScanError::NoCameraFound));
        }

        let mut last_error = None;
        for (attempt, device) in preferred_order(&devices).into_iter().enumerate() {
            if attempt > 0 && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
            match self.backend.open(&device).await {
                Ok(stream) => {
                    debug!(device = %device.id, label = %device.label, "capture started");
                    self.capture = Some(ActiveCapture {
                        device: device.clone(),
                        stream,
                    });
                    self.state = ScanState::Scanning;
                    return Ok(device);
                }
                Err(err) => {
                    warn!(device = %device.id, error = %err, "camera failed to start, trying next");
                    last_error = Some(err);
                }
            }
        }

        let message = last_error.map_or_else(
            || "no camera could be started".to_owned(),
            |err| err.to_string(),
        );
        Err(self.fail(ScanError::Device { message }))
    }

    /// Read frames until one decodes, then stop and return the identifier.
    ///
    /// The capture is released before this returns, so a following
    /// [`ScanSession::start`] never overlaps the previous device handle.
    /// Frames that hold no readable symbol are skipped.
    pub async fn next_scan(&mut self) -> Result<String, ScanError> {
        loop {
            let Some(capture) = self.capture.as_mut() else {
                return Err(ScanError::NotScanning);
            };
            let frame = match capture.stream.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    self.stop();
                    return Err(ScanError::Device {
                        message: "capture stream ended".to_owned(),
                    });
                }
                Err(err) => return Err(self.fail(err.into())),
            };
            match self.decoder.decode(&frame) {
                Ok(identifier) => {
                    self.stop();
                    return Ok(identifier);
                }
                Err(ScanError::DecodeFailure) => continue,
                Err(err) => return Err(self.fail(err)),
            }
        }
    }

    /// Release any capture and return to [`ScanState::Idle`].
    ///
    /// Safe to call in any state, any number of times.
    pub fn stop(&mut self) {
        self.capture = None;
        self.state = ScanState::Idle;
    }

    /// Decode a still image instead of the live feed.
    ///
    /// A running capture is stopped first so the image decode never competes
    /// with the device.
    pub fn scan_still_image(&mut self, bytes: &[u8]) -> Result<String, ScanError> {
        self.stop();
        codec::decode_image(bytes)
    }

    fn fail(&mut self, error: ScanError) -> ScanError {
        self.capture = None;
        self.state = ScanState::Error;
        error
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
