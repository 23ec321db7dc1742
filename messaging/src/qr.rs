use crate::error::{Error, Result};

/// Turns image bytes into the text of the QR code they contain.
pub trait QrDecoder: Send + Sync {
    fn decode(&self, image: &[u8]) -> Result<String>;
}

/// [`QrDecoder`] backed by `image` for PNG/JPEG decoding and `rqrr` for QR
/// detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image: &[u8]) -> Result<String> {
        let luma = image::load_from_memory(image)?.to_luma8();
        let (width, height) = luma.dimensions();

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                luma.get_pixel(x as u32, y as u32).0[0]
            });

        // First grid that decodes wins.
        let mut last_error = None;
        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) => return Ok(content),
                Err(e) => last_error = Some(Error::from(e)),
            }
        }

        Err(last_error.unwrap_or(Error::QrNotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use qrcode::{Color, QrCode};
    use std::io::Cursor;

    fn to_png(image: GrayImage) -> Vec<u8> {
        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(image)
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();
        png.into_inner()
    }

    /// PNG of a QR code holding `payload`, 8px per module with a 4 module quiet zone.
    fn qr_png(payload: &str) -> Vec<u8> {
        const SCALE: u32 = 8;
        const QUIET: u32 = 4;

        let code = QrCode::new(payload.as_bytes()).unwrap();
        let modules = code.width() as u32;
        let colors = code.to_colors();
        let side = (modules + 2 * QUIET) * SCALE;

        let image = GrayImage::from_fn(side, side, |x, y| {
            let (mx, my) = (x / SCALE, y / SCALE);
            let inside = (QUIET..QUIET + modules).contains(&mx)
                && (QUIET..QUIET + modules).contains(&my);
            if inside && colors[((my - QUIET) * modules + (mx - QUIET)) as usize] == Color::Dark {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        to_png(image)
    }

    #[test]
    fn test_decodes_qr_code_payload() {
        let png = qr_png("https://example.com/qr");
        assert_eq!(RqrrDecoder.decode(&png).unwrap(), "https://example.com/qr");
    }

    #[test]
    fn test_decodes_payload_with_surrounding_text() {
        let payload = "Join us: https://example.com/a and https://example.com/b";
        assert_eq!(RqrrDecoder.decode(&qr_png(payload)).unwrap(), payload);
    }

    #[test]
    fn test_non_image_bytes_are_an_image_decode_error() {
        let result = RqrrDecoder.decode(b"definitely not a png");
        assert!(matches!(result, Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_blank_image_has_no_qr_code() {
        let png = to_png(GrayImage::from_pixel(64, 64, Luma([255])));

        let result = RqrrDecoder.decode(&png);
        assert!(matches!(result, Err(Error::QrNotFound)));
    }
}
