//! Image embedding: PNG and JPEG bitmaps and pages of foreign PDF files.

pub mod decode;
mod image_file;
pub mod jpeg;
pub mod pdf_import;
pub mod png;

pub use decode::{ColorSpace, DecodedImage, ImageDecoder, RasterFormat};
pub use image_file::{ImageDecoders, ImageFile, ImageFormat, ImageId, ImageState};
pub use jpeg::JpegDecoder;
pub use pdf_import::{
    get_pdf_box_dimensions, BoxDimensions, PageBoxes, PdfBox, PdfImportBackend, PdfImporter,
};
pub use png::PngDecoder;
