//! QR image encoding and decoding
//!
//! Codes use error correction level High so a creased printout or a phone
//! screen with glare still scans.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

use super::payload::QrPayload;
use crate::domain::ClientError;

/// Light modules around the symbol
pub const QUIET_ZONE: u32 = 1;
/// Pixels per module in the rendered image
pub const MODULE_PIXELS: u32 = 8;

pub fn download_file_name(loan_id: i64) -> String {
    format!("book-qrcode-{}.png", loan_id)
}

/// Render arbitrary text as a greyscale QR image.
pub fn render_text(text: &str) -> Result<GrayImage, ClientError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)
        .map_err(|e| ClientError::Validation(format!("Failed to generate QR code: {}", e)))?;

    let width = code.width() as u32;
    let colors = code.to_colors();
    let side = (width + 2 * QUIET_ZONE) * MODULE_PIXELS;

    Ok(GrayImage::from_fn(side, side, |x, y| {
        let mx = (x / MODULE_PIXELS).checked_sub(QUIET_ZONE);
        let my = (y / MODULE_PIXELS).checked_sub(QUIET_ZONE);
        let dark = match (mx, my) {
            (Some(mx), Some(my)) if mx < width && my < width => {
                colors[(my * width + mx) as usize] == Color::Dark
            }
            _ => false,
        };
        if dark { Luma([0]) } else { Luma([255]) }
    }))
}

/// PNG bytes for the downloadable pickup code.
pub fn encode_png(payload: &QrPayload) -> Result<Vec<u8>, ClientError> {
    let text = payload.to_text()?;
    let image = render_text(&text)?;

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ClientError::Validation(format!("Failed to generate QR code: {}", e)))?;

    tracing::debug!(
        "Encoded pickup code for loan {} ({} bytes)",
        payload.loan_id,
        bytes.len()
    );
    Ok(bytes)
}

/// `data:` URL for hosts that hand the image straight to a download link
pub fn encode_data_url(payload: &QrPayload) -> Result<String, ClientError> {
    let png = encode_png(payload)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Text of the first readable QR symbol in a camera frame, if any.
pub fn decode_image(frame: &GrayImage) -> Option<String> {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        frame.width() as usize,
        frame.height() as usize,
        |x, y| frame.get_pixel(x as u32, y as u32)[0],
    );

    prepared.detect_grids().into_iter().find_map(|grid| match grid.decode() {
        Ok((_, content)) => Some(content),
        Err(e) => {
            tracing::debug!("QR grid found but not decodable: {:?}", e);
            None
        }
    })
}
