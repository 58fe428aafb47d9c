//! JPEG frame header scanning. The file itself becomes the `/DCTDecode`
//! stream, so only the dimensions and component count are read.

use crate::error::{BoxError, PdfError, Result};
use crate::images::decode::{ColorSpace, DecodedImage, ImageDecoder, RasterFormat};

/// Built-in decoder for baseline and progressive JPEG files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegDecoder;

impl ImageDecoder for JpegDecoder {
    fn decode(&self, data: &[u8]) -> std::result::Result<DecodedImage, BoxError> {
        decode_jpeg(data).map_err(BoxError::from)
    }
}

pub fn decode_jpeg(data: &[u8]) -> Result<DecodedImage> {
    let (width, height, color_space, bits_per_component) = parse_frame_header(data)?;
    Ok(DecodedImage {
        format: RasterFormat::Jpeg,
        width,
        height,
        bits_per_component,
        color_space,
        palette: Vec::new(),
        transparency: Vec::new(),
        soft_mask: Vec::new(),
        data: data.to_vec(),
        decode_parms: None,
        soft_mask_decode_parms: None,
    })
}

fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC
}

fn parse_frame_header(data: &[u8]) -> Result<(u32, u32, ColorSpace, u8)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(PdfError::InvalidImage("Not a valid JPEG file".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(PdfError::InvalidImage("Invalid JPEG marker".to_string()));
        }
        let marker = data[pos + 1];
        pos += 2;

        if marker == 0xFF {
            // fill byte
            pos -= 1;
            continue;
        }

        if is_start_of_frame(marker) {
            // length(2) precision(1) height(2) width(2) components(1)
            let frame = data
                .get(pos..pos + 8)
                .ok_or_else(|| PdfError::InvalidImage("Truncated JPEG file".to_string()))?;
            let precision = frame[2];
            let height = u16::from_be_bytes([frame[3], frame[4]]) as u32;
            let width = u16::from_be_bytes([frame[5], frame[6]]) as u32;
            let components = frame[7];

            if width == 0 || height == 0 {
                return Err(PdfError::InvalidImage(
                    "Could not find image dimensions".to_string(),
                ));
            }
            let color_space = match components {
                1 => ColorSpace::DeviceGray,
                3 => ColorSpace::DeviceRGB,
                4 => ColorSpace::DeviceCMYK,
                _ => {
                    return Err(PdfError::InvalidImage(format!(
                        "Unsupported number of components: {components}"
                    )))
                }
            };
            return Ok((width, height, color_space, precision));
        }

        match marker {
            0xD9 => break,
            0xD8 | 0xD0..=0xD7 | 0x01 => continue,
            _ => {
                let length = data
                    .get(pos..pos + 2)
                    .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
                    .ok_or_else(|| PdfError::InvalidImage("Truncated JPEG file".to_string()))?;
                pos += length;
            }
        }
    }

    Err(PdfError::InvalidImage(
        "Could not find image dimensions".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_jpeg(components: u8) -> Vec<u8> {
        vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0 with 2 bytes of payload
            0xFF, 0xC0, // SOF0
            0x00, 0x11, // length
            0x08, // precision
            0x00, 0x64, // height 100
            0x00, 0xC8, // width 200
            components,
        ]
    }

    #[test]
    fn test_frame_header() {
        let image = decode_jpeg(&minimal_jpeg(3)).unwrap();
        assert_eq!(image.format, RasterFormat::Jpeg);
        assert_eq!((image.width, image.height), (200, 100));
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!(image.bits_per_component, 8);
        assert_eq!(image.data, minimal_jpeg(3));
        assert!(image.decode_parms.is_none());
    }

    #[test]
    fn test_component_counts() {
        assert_eq!(
            decode_jpeg(&minimal_jpeg(1)).unwrap().color_space,
            ColorSpace::DeviceGray
        );
        assert_eq!(
            decode_jpeg(&minimal_jpeg(4)).unwrap().color_space,
            ColorSpace::DeviceCMYK
        );
        assert!(decode_jpeg(&minimal_jpeg(2)).is_err());
    }

    #[test]
    fn test_invalid_jpeg() {
        assert!(decode_jpeg(&[0x00, 0x00]).is_err());
        assert!(decode_jpeg(&[]).is_err());
        assert!(decode_jpeg(&[0xFF, 0xD8, 0xFF, 0xD9]).is_err());
        assert!(decode_jpeg(&minimal_jpeg(3)[..14]).is_err());
    }

    #[test]
    fn test_trait_returns_pdf_error() {
        let err = JpegDecoder.decode(b"not a jpeg").unwrap_err();
        assert!(err.downcast_ref::<PdfError>().is_some());
    }
}
