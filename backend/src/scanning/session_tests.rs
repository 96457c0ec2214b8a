//! Tests for the live scanning session.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::rstest;

use super::*;
use crate::scanning::camera::CameraError;
use crate::scanning::codec::{LumaFrame, QrDecoder, encode_png};

/// Frames scripted per opened stream; `None` entries end the stream.
type Script = VecDeque<Result<Option<LumaFrame>, CameraError>>;

#[derive(Default)]
struct FakeCamera {
    devices: Vec<CameraDevice>,
    enumeration_denied: bool,
    broken: HashSet<String>,
    script: Mutex<Script>,
    opened: Mutex<Vec<String>>,
    live_handles: Arc<AtomicUsize>,
    peak_handles: Arc<AtomicUsize>,
}

impl FakeCamera {
    fn with_devices(labels: &[(&str, &str)]) -> Self {
        Self {
            devices: labels
                .iter()
                .map(|(id, label)| CameraDevice::new(*id, *label))
                .collect(),
            ..Self::default()
        }
    }

    fn denying_enumeration(mut self) -> Self {
        self.enumeration_denied = true;
        self
    }

    fn broken(mut self, id: &str) -> Self {
        self.broken.insert(id.to_owned());
        self
    }

    fn frames(self, frames: impl IntoIterator<Item = Result<Option<LumaFrame>, CameraError>>) -> Self {
        self.script
            .lock()
            .expect("script lock")
            .extend(frames);
        self
    }

    fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("opened lock").clone()
    }

    fn live(&self) -> usize {
        self.live_handles.load(Ordering::SeqCst)
    }

    fn peak(&self) -> usize {
        self.peak_handles.load(Ordering::SeqCst)
    }

    fn next_scripted(&self) -> Result<Option<LumaFrame>, CameraError> {
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

struct FakeStream {
    camera: Arc<FakeCamera>,
    released: bool,
}

#[async_trait]
impl CaptureStream for FakeStream {
    async fn next_frame(&mut self) -> Result<Option<LumaFrame>, CameraError> {
        self.camera.next_scripted()
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.camera.live_handles.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Backend handle sharing one [`FakeCamera`] with its streams.
struct FakeBackend(Arc<FakeCamera>);

#[async_trait]
impl CameraBackend for FakeBackend {
    async fn list_devices(&self) -> Result<Vec<CameraDevice>, CameraError> {
        if self.0.enumeration_denied {
            return Err(CameraError::new("permission denied"));
        }
        Ok(self.0.devices.clone())
    }

    async fn open(&self, device: &CameraDevice) -> Result<Box<dyn CaptureStream>, CameraError> {
        self.0.opened.lock().expect("opened lock").push(device.id.clone());
        if self.0.broken.contains(&device.id) {
            return Err(CameraError::new(format!("{} is busy", device.id)));
        }
        let live = self.0.live_handles.fetch_add(1, Ordering::SeqCst) + 1;
        self.0.peak_handles.fetch_max(live, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            camera: Arc::clone(&self.0),
            released: false,
        }))
    }
}

fn session(camera: &Arc<FakeCamera>) -> ScanSession<FakeBackend> {
    ScanSession::new(Arc::new(FakeBackend(Arc::clone(camera))), Arc::new(QrDecoder))
        .with_retry_delay(Duration::ZERO)
}

fn qr_frame(identifier: &str) -> LumaFrame {
    let png = encode_png(identifier, 120).expect("png");
    let luma = image::load_from_memory(&png).expect("decodable").to_luma8();
    let (w, h) = luma.dimensions();
    LumaFrame::new(w as usize, h as usize, luma.into_raw()).expect("frame")
}

fn blank_frame() -> LumaFrame {
    LumaFrame::new(32, 32, vec![u8::MAX; 32 * 32]).expect("frame")
}

#[rstest]
#[case(&[("f", "Front Camera"), ("b", "Back Camera")], "b")]
#[case(&[("f", "front"), ("e", "camera facing environment")], "e")]
#[case(&[("1", "Camera 1"), ("2", "Camera 2")], "2")]
#[case(&[("1", "camera1"), ("2", "camera2")], "2")]
#[case(&[("x", "Integrated"), ("y", "USB")], "x")]
fn preferred_device_is_tried_first(#[case] devices: &[(&str, &str)], #[case] expected: &str) {
    let devices: Vec<_> = devices
        .iter()
        .map(|(id, label)| CameraDevice::new(*id, *label))
        .collect();
    let ordered = preferred_order(&devices);
    assert_eq!(ordered.len(), devices.len());
    assert_eq!(ordered[0].id, expected);
}

#[test]
fn remaining_devices_keep_enumeration_order() {
    let devices = vec![
        CameraDevice::new("a", "front"),
        CameraDevice::new("b", "usb"),
        CameraDevice::new("c", "rear"),
        CameraDevice::new("d", "ir"),
    ];
    let ids: Vec<_> = preferred_order(&devices).into_iter().map(|d| d.id).collect();
    assert_eq!(ids, ["c", "a", "b", "d"]);
}

#[tokio::test]
async fn start_without_devices_reports_no_camera() {
    let camera = Arc::new(FakeCamera::default());
    let mut scan = session(&camera);

    let err = scan.start().await.expect_err("no devices");
    assert_eq!(err, ScanError::NoCameraFound);
    assert_eq!(scan.state(), ScanState::Error);

    scan.stop();
    assert_eq!(scan.state(), ScanState::Idle);
}

#[tokio::test]
async fn start_treats_failed_enumeration_as_no_camera() {
    let camera = Arc::new(FakeCamera::with_devices(&[("rear", "Rear")]).denying_enumeration());
    let mut scan = session(&camera);

    let err = scan.start().await.expect_err("enumeration denied");
    assert_eq!(err, ScanError::NoCameraFound);
    assert_eq!(scan.state(), ScanState::Error);
    assert!(camera.opened().is_empty());
}

#[tokio::test]
async fn start_falls_back_when_preferred_device_fails() {
    let camera = Arc::new(
        FakeCamera::with_devices(&[("front", "Front"), ("rear", "Rear")]).broken("rear"),
    );
    let mut scan = session(&camera);

    let device = scan.start().await.expect("fallback device");
    assert_eq!(device.id, "front");
    assert_eq!(camera.opened(), ["rear", "front"]);
    assert_eq!(scan.state(), ScanState::Scanning);
    assert_eq!(camera.live(), 1);
}

#[tokio::test]
async fn every_device_failing_leaves_error_state() {
    let camera = Arc::new(
        FakeCamera::with_devices(&[("a", "Back"), ("b", "Front")])
            .broken("a")
            .broken("b"),
    );
    let mut scan = session(&camera);

    let err = scan.start().await.expect_err("nothing started");
    assert!(matches!(err, ScanError::Device { .. }));
    assert_eq!(scan.state(), ScanState::Error);
    assert_eq!(camera.live(), 0);
}

#[tokio::test]
async fn successful_decode_releases_device_before_returning() {
    let camera = Arc::new(
        FakeCamera::with_devices(&[("rear", "Back Camera")])
            .frames([Ok(Some(blank_frame())), Ok(Some(qr_frame("WKR-000031")))]),
    );
    let mut scan = session(&camera);
    scan.start().await.expect("started");

    let identifier = scan.next_scan().await.expect("decoded");
    assert_eq!(identifier, "WKR-000031");
    assert_eq!(scan.state(), ScanState::Idle);
    assert_eq!(camera.live(), 0);
    assert!(scan.active_device().is_none());
}

#[tokio::test]
async fn restart_while_scanning_never_overlaps_handles() {
    let camera = Arc::new(FakeCamera::with_devices(&[("rear", "Back Camera")]));
    let mut scan = session(&camera);

    scan.start().await.expect("first start");
    scan.start().await.expect("second start");
    scan.start().await.expect("third start");

    assert_eq!(camera.peak(), 1);
    assert_eq!(camera.live(), 1);
    assert_eq!(scan.state(), ScanState::Scanning);
}

#[tokio::test]
async fn stop_is_idempotent() {
    let camera = Arc::new(FakeCamera::with_devices(&[("rear", "Back Camera")]));
    let mut scan = session(&camera);

    scan.stop();
    scan.start().await.expect("started");
    scan.stop();
    scan.stop();

    assert_eq!(scan.state(), ScanState::Idle);
    assert_eq!(camera.live(), 0);
}

#[tokio::test]
async fn ended_stream_stops_the_session() {
    let camera = Arc::new(FakeCamera::with_devices(&[("rear", "Back Camera")]));
    let mut scan = session(&camera);
    scan.start().await.expect("started");

    let err = scan.next_scan().await.expect_err("stream ended");
    assert!(matches!(err, ScanError::Device { .. }));
    assert_eq!(scan.state(), ScanState::Idle);
    assert_eq!(camera.live(), 0);
}

#[tokio::test]
async fn broken_stream_moves_to_error_and_releases() {
    let camera = Arc::new(
        FakeCamera::with_devices(&[("rear", "Back Camera")])
            .frames([Err(CameraError::new("permission revoked"))]),
    );
    let mut scan = session(&camera);
    scan.start().await.expect("started");

    scan.next_scan().await.expect_err("broken");
    assert_eq!(scan.state(), ScanState::Error);
    assert_eq!(camera.live(), 0);
}

#[tokio::test]
async fn next_scan_requires_a_running_capture() {
    let camera = Arc::new(FakeCamera::with_devices(&[("rear", "Back Camera")]));
    let mut scan = session(&camera);
    assert_eq!(scan.next_scan().await, Err(ScanError::NotScanning));
}

#[tokio::test]
async fn still_image_scan_stops_live_capture_first() {
    let camera = Arc::new(FakeCamera::with_devices(&[("rear", "Back Camera")]));
    let mut scan = session(&camera);
    scan.start().await.expect("started");

    let png = encode_png("WKR-000099", 120).expect("png");
    assert_eq!(scan.scan_still_image(&png).expect("decoded"), "WKR-000099");
    assert_eq!(camera.live(), 0);
    assert_eq!(scan.state(), ScanState::Idle);

    assert_eq!(scan.scan_still_image(b"garbage"), Err(ScanError::DecodeFailure));
    assert_eq!(scan.state(), ScanState::Idle);
}

#[tokio::test]
async fn dropping_the_session_releases_the_device() {
    let camera = Arc::new(FakeCamera::with_devices(&[("rear", "Back Camera")]));
    {
        let mut scan = session(&camera);
        scan.start().await.expect("started");
        assert_eq!(camera.live(), 1);
    }
    assert_eq!(camera.live(), 0);
}
