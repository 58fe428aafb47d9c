//! PNG header and chunk parsing.
//!
//! Image data is not decoded: the concatenated IDAT stream already is valid
//! `/FlateDecode` data with PNG predictors. Only images with an alpha channel
//! are inflated, to split color and alpha into two images.

use crate::compression::{compress, decompress, DEFAULT_COMPRESSION_LEVEL};
use crate::error::{BoxError, PdfError, Result};
use crate::images::decode::{ColorSpace, DecodedImage, ImageDecoder, RasterFormat};
use crate::objects::Dictionary;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const GRAY: u8 = 0;
const TRUE_COLOR: u8 = 2;
const INDEXED: u8 = 3;
const GRAY_ALPHA: u8 = 4;
const TRUE_COLOR_ALPHA: u8 = 6;

fn invalid(msg: impl Into<String>) -> PdfError {
    PdfError::InvalidImage(msg.into())
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| invalid("truncated PNG file"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }
}

/// Built-in decoder for non-interlaced PNG files up to 8 bits per channel.
#[derive(Debug, Clone, Copy)]
pub struct PngDecoder {
    /// Deflate level for the color samples of images with alpha.
    pub compression_level: u32,
}

impl Default for PngDecoder {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ImageDecoder for PngDecoder {
    fn decode(&self, data: &[u8]) -> std::result::Result<DecodedImage, BoxError> {
        decode_png(data, self.compression_level).map_err(BoxError::from)
    }
}

pub fn decode_png(file: &[u8], compression_level: u32) -> Result<DecodedImage> {
    let mut r = Cursor { data: file, pos: 0 };
    if r.take(8).ok() != Some(&PNG_SIGNATURE[..]) {
        return Err(invalid("not a PNG file"));
    }

    r.take(4)?;
    if r.take(4)? != b"IHDR" {
        return Err(invalid("incorrect PNG file, IHDR expected"));
    }
    let width = r.u32()?;
    let height = r.u32()?;
    let bpc = r.u8()?;
    if bpc > 8 {
        return Err(invalid("16-bit depth not supported"));
    }
    let color_type = r.u8()?;
    let color_space = match color_type {
        GRAY | GRAY_ALPHA => ColorSpace::DeviceGray,
        TRUE_COLOR | TRUE_COLOR_ALPHA => ColorSpace::DeviceRGB,
        INDEXED => ColorSpace::Indexed,
        other => return Err(invalid(format!("unknown PNG color type {}", other))),
    };
    if r.u8()? != 0 {
        return Err(invalid("unknown PNG compression method"));
    }
    if r.u8()? != 0 {
        return Err(invalid("unknown PNG filter method"));
    }
    if r.u8()? != 0 {
        return Err(invalid("interlaced PNG not supported"));
    }
    r.take(4)?;

    let mut palette = Vec::new();
    let mut transparency = Vec::new();
    let mut idat = Vec::new();
    loop {
        let length = r.u32()? as usize;
        let kind = r.take(4)?;
        let body = r.take(length)?;
        r.take(4)?;
        match kind {
            b"PLTE" => palette = body.to_vec(),
            b"tRNS" => {
                transparency = match color_type {
                    GRAY if body.len() >= 2 => vec![body[1]],
                    TRUE_COLOR if body.len() >= 6 => vec![body[1], body[3], body[5]],
                    INDEXED => body
                        .iter()
                        .position(|alpha| *alpha == 0)
                        .map(|i| vec![i as u8])
                        .unwrap_or_default(),
                    _ => Vec::new(),
                }
            }
            b"IDAT" => idat.extend_from_slice(body),
            b"IEND" => break,
            _ => {}
        }
    }

    if color_space == ColorSpace::Indexed && palette.is_empty() {
        return Err(invalid("missing palette"));
    }

    let mut decode_parms = Dictionary::new();
    decode_parms.set("Predictor", 15);
    decode_parms.set("Columns", width);
    if color_space == ColorSpace::DeviceRGB {
        decode_parms.set("Colors", 3);
    }
    if bpc != 8 {
        decode_parms.set("BitsPerComponent", bpc as i64);
    }

    let mut image = DecodedImage {
        format: RasterFormat::Png,
        width,
        height,
        bits_per_component: bpc,
        color_space,
        palette,
        transparency,
        soft_mask: Vec::new(),
        data: idat,
        decode_parms: Some(decode_parms),
        soft_mask_decode_parms: None,
    };

    if color_type == GRAY_ALPHA || color_type == TRUE_COLOR_ALPHA {
        let color_bytes = if color_type == GRAY_ALPHA { 1 } else { 3 };
        let (color, alpha) = split_alpha(&decompress(&image.data)?, width, height, color_bytes)?;
        image.data = compress(&color, compression_level)?;
        image.soft_mask = alpha;

        let mut smask_parms = Dictionary::new();
        smask_parms.set("Predictor", 15);
        smask_parms.set("Columns", width);
        smask_parms.set("Colors", 1);
        image.soft_mask_decode_parms = Some(smask_parms);
    }

    Ok(image)
}

/// Splits filtered 8-bit rows into color rows and alpha rows. Every output row
/// keeps the filter type byte of its source row; the PNG filters only refer
/// to the same channel of neighbouring pixels, so the split rows stay valid.
fn split_alpha(
    raw: &[u8],
    width: u32,
    height: u32,
    color_bytes: usize,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let pixel = color_bytes + 1;
    let row = pixel
        .checked_mul(width as usize)
        .and_then(|bytes| bytes.checked_add(1))
        .ok_or_else(|| invalid("PNG dimensions too large"))?;
    let total = row
        .checked_mul(height as usize)
        .ok_or_else(|| invalid("PNG dimensions too large"))?;
    if raw.len() < total {
        return Err(invalid("PNG image data shorter than its dimensions"));
    }

    let mut color = Vec::with_capacity((1 + color_bytes * width as usize) * height as usize);
    let mut alpha = Vec::with_capacity((1 + width as usize) * height as usize);
    for line in raw.chunks(row).take(height as usize) {
        color.push(line[0]);
        alpha.push(line[0]);
        for px in line[1..].chunks(pixel) {
            color.extend_from_slice(&px[..color_bytes]);
            alpha.push(px[color_bytes]);
        }
    }
    Ok((color, alpha))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Object;

    fn chunk(kind: &[u8], body: &[u8]) -> Vec<u8> {
        let mut crc = flate2::Crc::new();
        crc.update(kind);
        crc.update(body);
        let mut out = (body.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(body);
        out.extend_from_slice(&crc.sum().to_be_bytes());
        out
    }

    fn png(width: u32, height: u32, bpc: u8, color_type: u8, extra: &[Vec<u8>], raw: &[u8]) -> Vec<u8> {
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[bpc, color_type, 0, 0, 0]);

        let mut out = PNG_SIGNATURE.to_vec();
        out.extend(chunk(b"IHDR", &ihdr));
        for c in extra {
            out.extend_from_slice(c);
        }
        out.extend(chunk(b"IDAT", &compress(raw, 6).unwrap()));
        out.extend(chunk(b"IEND", &[]));
        out
    }

    #[test]
    fn test_rgb_passthrough() {
        // 2x1, filter byte 0
        let raw = [0u8, 255, 0, 0, 0, 255, 0];
        let file = png(2, 1, 8, TRUE_COLOR, &[], &raw);
        let image = decode_png(&file, 9).unwrap();

        assert_eq!(image.format, RasterFormat::Png);
        assert_eq!((image.width, image.height), (2, 1));
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!(decompress(&image.data).unwrap(), raw);
        assert!(!image.has_soft_mask());

        let parms = image.decode_parms.unwrap();
        assert_eq!(parms.get("Predictor"), Some(&Object::Integer(15)));
        assert_eq!(parms.get("Columns"), Some(&Object::Integer(2)));
        assert_eq!(parms.get("Colors"), Some(&Object::Integer(3)));
        assert!(parms.get("BitsPerComponent").is_none());
    }

    #[test]
    fn test_indexed_with_transparency() {
        let palette = chunk(b"PLTE", &[255, 0, 0, 0, 255, 0, 0, 0, 255]);
        let trns = chunk(b"tRNS", &[255, 0, 255]);
        let raw = [0u8, 0b0001_1000];
        let file = png(2, 1, 2, INDEXED, &[palette, trns], &raw);
        let image = decode_png(&file, 9).unwrap();

        assert_eq!(image.color_space, ColorSpace::Indexed);
        assert_eq!(image.palette.len(), 9);
        assert_eq!(image.transparency, vec![1]);
        assert_eq!(image.bits_per_component, 2);
        let parms = image.decode_parms.unwrap();
        assert_eq!(parms.get("BitsPerComponent"), Some(&Object::Integer(2)));
        assert!(parms.get("Colors").is_none());
    }

    #[test]
    fn test_gray_and_rgb_color_keys() {
        let trns = chunk(b"tRNS", &[0, 7]);
        let image = decode_png(&png(1, 1, 8, GRAY, &[trns], &[0, 7]), 9).unwrap();
        assert_eq!(image.transparency, vec![7]);

        let trns = chunk(b"tRNS", &[0, 1, 0, 2, 0, 3]);
        let image = decode_png(&png(1, 1, 8, TRUE_COLOR, &[trns], &[0, 1, 2, 3]), 9).unwrap();
        assert_eq!(image.transparency, vec![1, 2, 3]);
    }

    #[test]
    fn test_rgba_split() {
        // two rows of 2 pixels, filter types 0 and 1
        let raw = [
            0u8, 10, 20, 30, 255, 40, 50, 60, 128, //
            1, 1, 2, 3, 0, 4, 5, 6, 7,
        ];
        let file = png(2, 2, 8, TRUE_COLOR_ALPHA, &[], &raw);
        let image = decode_png(&file, 9).unwrap();

        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!(
            decompress(&image.data).unwrap(),
            vec![0, 10, 20, 30, 40, 50, 60, 1, 1, 2, 3, 4, 5, 6]
        );
        assert_eq!(image.soft_mask, vec![0, 255, 128, 1, 0, 7]);
        let parms = image.soft_mask_decode_parms.unwrap();
        assert_eq!(parms.get("Colors"), Some(&Object::Integer(1)));
        assert_eq!(parms.get("Columns"), Some(&Object::Integer(2)));
    }

    #[test]
    fn test_gray_alpha_split() {
        let raw = [0u8, 9, 200, 8, 100];
        let image = decode_png(&png(2, 1, 8, GRAY_ALPHA, &[], &raw), 9).unwrap();
        assert_eq!(image.color_space, ColorSpace::DeviceGray);
        assert_eq!(decompress(&image.data).unwrap(), vec![0, 9, 8]);
        assert_eq!(image.soft_mask, vec![0, 200, 100]);
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(decode_png(b"GIF89a", 9), Err(PdfError::InvalidImage(_))));

        let sixteen = png(1, 1, 16, GRAY, &[], &[0, 0, 0]);
        assert!(decode_png(&sixteen, 9).is_err());

        let no_palette = png(1, 1, 8, INDEXED, &[], &[0, 0]);
        match decode_png(&no_palette, 9) {
            Err(PdfError::InvalidImage(msg)) => assert!(msg.contains("palette")),
            other => panic!("expected missing palette, got {:?}", other),
        }

        let mut interlaced = png(1, 1, 8, GRAY, &[], &[0, 0]);
        interlaced[8 + 8 + 12] = 1;
        assert!(decode_png(&interlaced, 9).is_err());

        let truncated = &png(1, 1, 8, GRAY, &[], &[0, 0])[..30];
        assert!(decode_png(truncated, 9).is_err());
    }

    #[test]
    fn test_short_alpha_data() {
        let file = png(4, 4, 8, TRUE_COLOR_ALPHA, &[], &[0, 1, 2, 3, 4]);
        assert!(matches!(decode_png(&file, 9), Err(PdfError::InvalidImage(_))));
    }

    #[test]
    fn test_huge_alpha_dimensions_are_rejected() {
        let file = png(u32::MAX, u32::MAX, 8, TRUE_COLOR_ALPHA, &[], &[0; 16]);
        match decode_png(&file, 9) {
            Err(PdfError::InvalidImage(msg)) => assert!(
                msg.contains("too large") || msg.contains("shorter"),
                "unexpected message {}",
                msg
            ),
            other => panic!("expected invalid image, got {:?}", other),
        }
    }
}
