//! QR symbol rendering and decoding.
//!
//! Symbols always use error-correction level H so a creased or smudged
//! printout still scans. Rendering is deterministic for a given identifier
//! and size.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use super::ScanError;
use super::camera::FrameDecoder;

/// Module colour used for on-screen and printed symbols.
pub const QR_DARK: &str = "#0d9488";
/// Background colour behind the modules.
pub const QR_LIGHT: &str = "#ffffff";
/// Default rendered edge length in pixels.
pub const DEFAULT_QR_SIZE: u32 = 200;

const DARK_RGB: Rgb<u8> = Rgb([0x0d, 0x94, 0x88]);
const LIGHT_RGB: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

fn symbol(identifier: &str) -> Result<QrCode, ScanError> {
    QrCode::with_error_correction_level(identifier.as_bytes(), EcLevel::H).map_err(|err| {
        ScanError::Encode {
            message: err.to_string(),
        }
    })
}

/// Render `identifier` as inline SVG markup of at least `size` pixels.
///
/// # Examples
/// ```
/// use medicare_backend::scanning::codec::encode_svg;
///
/// let markup = encode_svg("WKR-000001", 200).expect("encodable");
/// assert!(markup.contains("<svg"));
/// ```
pub fn encode_svg(identifier: &str, size: u32) -> Result<String, ScanError> {
    Ok(symbol(identifier)?
        .render::<svg::Color<'_>>()
        .min_dimensions(size, size)
        .dark_color(svg::Color(QR_DARK))
        .light_color(svg::Color(QR_LIGHT))
        .quiet_zone(false)
        .build())
}

/// Render a downloadable PNG at double `size` with a white margin.
pub fn encode_png(identifier: &str, size: u32) -> Result<Vec<u8>, ScanError> {
    let edge = size.saturating_mul(2);
    let pixels = symbol(identifier)?
        .render::<Rgb<u8>>()
        .min_dimensions(edge, edge)
        .dark_color(DARK_RGB)
        .light_color(LIGHT_RGB)
        .quiet_zone(true)
        .build();

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|err| ScanError::Encode {
            message: err.to_string(),
        })?;
    Ok(out.into_inner())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Build a standalone print page embedding the symbol markup, the worker's
/// display name and the identifier.
pub fn print_document(identifier: &str, full_name: &str, size: u32) -> Result<String, ScanError> {
    let markup = encode_svg(identifier, size)?;
    let id = escape_html(identifier);
    let name = escape_html(full_name);
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>QR Code - {id}</title>
<style>
body {{ font-family: system-ui, sans-serif; display: flex; flex-direction: column; align-items: center; padding: 40px; }}
h1 {{ margin: 0 0 4px; font-size: 24px; }}
p {{ margin: 0 0 24px; color: #64748b; }}
.worker-id {{ margin-top: 16px; font-family: monospace; font-size: 18px; font-weight: 600; }}
</style>
</head>
<body>
<h1>{name}</h1>
<p>Digital Health Record</p>
{markup}
<div class="worker-id">{id}</div>
</body>
</html>
"#
    ))
}

/// Greyscale video frame, one byte per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaFrame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl LumaFrame {
    /// Wrap raw luma bytes. Returns `None` when the buffer length does not
    /// match `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        (width.checked_mul(height) == Some(pixels.len())).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn at(&self, x: usize, y: usize) -> u8 {
        self.pixels.get(y * self.width + x).copied().unwrap_or(u8::MAX)
    }
}

/// Decode the first readable symbol in a greyscale frame.
pub fn decode_luma(frame: &LumaFrame) -> Result<String, ScanError> {
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(frame.width, frame.height, |x, y| {
            frame.at(x, y)
        });
    prepared
        .detect_grids()
        .into_iter()
        .find_map(|grid| grid.decode().ok().map(|(_, content)| content))
        .ok_or(ScanError::DecodeFailure)
}

/// Decode a still image (PNG or JPEG bytes).
///
/// The decoded bitmap lives only for the duration of the call.
pub fn decode_image(bytes: &[u8]) -> Result<String, ScanError> {
    let image = image::load_from_memory(bytes).map_err(|_| ScanError::DecodeFailure)?;
    let luma = image.to_luma8();
    let (width, height) = luma.dimensions();
    let frame = LumaFrame::new(width as usize, height as usize, luma.into_raw())
        .ok_or(ScanError::DecodeFailure)?;
    decode_luma(&frame)
}

/// [`FrameDecoder`] backed by [`decode_luma`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder;

impl FrameDecoder for QrDecoder {
    fn decode(&self, frame: &LumaFrame) -> Result<String, ScanError> {
        decode_luma(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use rstest::rstest;

    fn rendered_frame(identifier: &str) -> LumaFrame {
        let bitmap = QrCode::with_error_correction_level(identifier.as_bytes(), EcLevel::H)
            .expect("encodable")
            .render::<Luma<u8>>()
            .min_dimensions(240, 240)
            .build();
        let (w, h) = bitmap.dimensions();
        LumaFrame::new(w as usize, h as usize, bitmap.into_raw()).expect("frame")
    }

    #[rstest]
    #[case("WKR-000001")]
    #[case("abc")]
    #[case("worker-with-a-rather-long-identifier-0123456789-abcdefghij-xyz")]
    fn png_round_trips_identifier(#[case] identifier: &str) {
        let png = encode_png(identifier, DEFAULT_QR_SIZE).expect("png");
        assert_eq!(decode_image(&png).expect("decoded"), identifier);
    }

    #[test]
    fn frame_decoder_reads_rendered_symbol() {
        let frame = rendered_frame("WKR-004321");
        assert_eq!(QrDecoder.decode(&frame).expect("decoded"), "WKR-004321");
    }

    #[test]
    fn blank_frame_is_a_decode_failure() {
        let frame = LumaFrame::new(64, 64, vec![u8::MAX; 64 * 64]).expect("frame");
        assert_eq!(decode_luma(&frame), Err(ScanError::DecodeFailure));
    }

    #[test]
    fn non_image_bytes_are_a_decode_failure() {
        assert_eq!(decode_image(b"not an image"), Err(ScanError::DecodeFailure));
    }

    #[test]
    fn svg_is_deterministic_and_coloured() {
        let first = encode_svg("WKR-000007", 160).expect("svg");
        let second = encode_svg("WKR-000007", 160).expect("svg");
        assert_eq!(first, second);
        assert!(first.contains(QR_DARK));
    }

    #[test]
    fn print_document_escapes_the_display_name() {
        let page = print_document("WKR-000002", "<b>Ana & Co</b>", 120).expect("page");
        assert!(page.contains("<title>QR Code - WKR-000002</title>"));
        assert!(page.contains("&lt;b&gt;Ana &amp; Co&lt;/b&gt;"));
        assert!(page.contains("Digital Health Record"));
        assert!(page.contains("<svg"));
    }

    #[test]
    fn mismatched_frame_buffer_is_rejected() {
        assert!(LumaFrame::new(4, 4, vec![0; 15]).is_none());
    }
}
