//! # folio-pdf
//!
//! A low-level PDF writer. Objects are written to any [`std::io::Write`] sink
//! as soon as they are saved; the document keeps only what it needs for the
//! page tree, the fonts and images, and the cross-reference table.
//!
//! ## Features
//!
//! - **Value model**: dictionaries, arrays, names and strings serialized
//!   byte-for-byte reproducibly
//! - **Incremental writing**: reserve object numbers early, save objects in
//!   any order, compressed streams via a reused zlib encoder
//! - **Fonts**: subset and embed OpenType/TrueType programs as Type0 fonts
//!   with a ToUnicode CMap
//! - **Images**: PNG and JPEG files, and pages of other PDF files
//! - **Navigation**: outlines, named destinations, annotations
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_pdf::{Document, DocumentInfo, NameDest, OutlineItem, Result};
//! use std::io::Write;
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new(Vec::new());
//! doc.set_info(DocumentInfo::new().title("Hello"));
//!
//! let mut content = doc.new_object();
//! content.write_all(b"0 0 1 rg 100 100 200 50 re f")?;
//! let page = doc.add_page(content, None).id();
//!
//! doc.add_name_destination(NameDest::new(page, "start", 0.0, 842.0));
//! doc.set_outlines(vec![OutlineItem::new("Start", "start")]);
//! doc.finish()?;
//!
//! let pdf = doc.into_inner();
//! assert!(pdf.ends_with(b"%%EOF\n"));
//! # Ok(())
//! # }
//! ```
//!
//! Fonts and image decoders plug in through the [`FontProgram`],
//! [`ImageDecoder`] and [`PdfImportBackend`] traits.

pub mod compression;
pub mod document;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod info;
pub mod objects;
pub mod page;
pub mod structure;
pub mod writer;

pub use document::{Document, DocumentOptions, ResourceIds};
pub use error::{BoxError, PdfError, Result};
pub use fonts::{
    Face, FaceId, FaceState, FontFlavor, FontMetrics, FontProgram, SubsetMode, SubsetOutput, SubsetRequest,
};
pub use graphics::Separation;
pub use images::{
    get_pdf_box_dimensions, BoxDimensions, ColorSpace, DecodedImage, ImageDecoder, ImageFile,
    ImageFormat, ImageId, PageBoxes, PdfBox, PdfImportBackend, PdfImporter, RasterFormat,
};
pub use info::DocumentInfo;
pub use objects::{Array, Dictionary, Object, ObjectId};
pub use page::{Annotation, Page, PageGeometry};
pub use structure::{NameDest, NameTree, OutlineItem};
pub use writer::{IndirectObject, PdfVersion, PdfWriter, WriterConfig};

/// Current version of folio-pdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
