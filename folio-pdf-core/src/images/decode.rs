//! Decoded raster parameters handed to the image adapter.

use crate::error::BoxError;
use crate::objects::Dictionary;

/// Supported raster formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// Samples are zlib compressed PNG rows (`/FlateDecode` with predictors).
    Png,
    /// Samples are the JPEG file itself (`/DCTDecode`).
    Jpeg,
}

/// Color spaces for images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
    DeviceCMYK,
    /// Palette based; the palette is written as an RGB lookup table.
    Indexed,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
            ColorSpace::Indexed => "Indexed",
        }
    }
}

/// Everything the image adapter needs to write an image XObject.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub format: RasterFormat,
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    pub color_space: ColorSpace,
    /// RGB triples for [`ColorSpace::Indexed`].
    pub palette: Vec<u8>,
    /// Color key values; each value `v` becomes the range `v v` in `/Mask`.
    pub transparency: Vec<u8>,
    /// Uncompressed alpha samples for a `/SMask` image.
    pub soft_mask: Vec<u8>,
    /// Sample data as it goes into the image stream.
    pub data: Vec<u8>,
    pub decode_parms: Option<Dictionary>,
    pub soft_mask_decode_parms: Option<Dictionary>,
}

impl DecodedImage {
    pub fn has_soft_mask(&self) -> bool {
        !self.soft_mask.is_empty()
    }
}

/// Turns an image file into [`DecodedImage`] parameters.
pub trait ImageDecoder {
    fn decode(&self, data: &[u8]) -> std::result::Result<DecodedImage, BoxError>;
}
