//! QR code rendering for the survey form link.

use super::ReportError;
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

/// Pixel size of one QR module.
const MODULE_PIXELS: u32 = 10;

/// Render `data` as a black-on-white PNG QR code.
pub fn render_qr_png(data: &str) -> Result<Vec<u8>, ReportError> {
    let code = QrCode::new(data.as_bytes())?;
    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
