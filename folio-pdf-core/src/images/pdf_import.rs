//! Pages of foreign PDF files placed as images.
//!
//! Parsing the foreign file is left to a [`PdfImportBackend`]; this module
//! only defines the contract and resolves page boxes.

use std::collections::HashMap;
use std::fmt;

use crate::error::{BoxError, PdfError, Result};
use crate::objects::ObjectId;

/// The page boundaries a PDF page can carry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PdfBox {
    #[default]
    Media,
    Crop,
    Bleed,
    Trim,
    Art,
}

impl PdfBox {
    /// Parses `MediaBox`, `/MediaBox` and the other box names.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.strip_prefix('/').unwrap_or(name) {
            "MediaBox" => Ok(PdfBox::Media),
            "CropBox" => Ok(PdfBox::Crop),
            "BleedBox" => Ok(PdfBox::Bleed),
            "TrimBox" => Ok(PdfBox::Trim),
            "ArtBox" => Ok(PdfBox::Art),
            _ => Err(PdfError::UnknownBox(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PdfBox::Media => "MediaBox",
            PdfBox::Crop => "CropBox",
            PdfBox::Bleed => "BleedBox",
            PdfBox::Trim => "TrimBox",
            PdfBox::Art => "ArtBox",
        }
    }
}

impl fmt::Display for PdfBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// Boxes present on one page, as `[llx, lly, urx, ury]`.
pub type PageBoxes = HashMap<PdfBox, [f64; 4]>;

/// A resolved page box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDimensions {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoxDimensions {
    /// Clamps `rect` inward so it never exceeds `bounds`.
    fn clamped(rect: [f64; 4], bounds: [f64; 4]) -> Self {
        let llx = rect[0].max(bounds[0]);
        let lly = rect[1].max(bounds[1]);
        let urx = rect[2].min(bounds[2]);
        let ury = rect[3].min(bounds[3]);
        BoxDimensions {
            llx,
            lly,
            urx,
            ury,
            x: llx,
            y: lly,
            w: urx - llx,
            h: ury - lly,
        }
    }
}

/// Resolves `pdf_box` on page `page` (1-based).
///
/// A missing CropBox falls back to the MediaBox; missing Bleed, Trim and Art
/// boxes fall back to the CropBox, then the MediaBox. The result is clamped
/// to the MediaBox.
pub fn get_pdf_box_dimensions(
    page_sizes: &HashMap<u32, PageBoxes>,
    filename: &str,
    page: u32,
    pdf_box: PdfBox,
) -> Result<BoxDimensions> {
    let boxes = page_sizes.get(&page).ok_or_else(|| PdfError::PageNotFound {
        filename: filename.to_string(),
        page,
    })?;
    let media = *boxes
        .get(&PdfBox::Media)
        .ok_or_else(|| PdfError::MissingMediaBox {
            filename: filename.to_string(),
            page,
        })?;

    let source = match pdf_box {
        PdfBox::Media => media,
        PdfBox::Crop => boxes.get(&PdfBox::Crop).copied().unwrap_or(media),
        PdfBox::Bleed | PdfBox::Trim | PdfBox::Art => boxes
            .get(&pdf_box)
            .or_else(|| boxes.get(&PdfBox::Crop))
            .copied()
            .unwrap_or(media),
    };

    Ok(BoxDimensions::clamped(source, media))
}

/// An opened foreign PDF document.
pub trait PdfImporter {
    fn page_count(&self) -> std::result::Result<u32, BoxError>;

    /// Boxes of every page, keyed by 1-based page number.
    fn page_boxes(&self) -> std::result::Result<HashMap<u32, PageBoxes>, BoxError>;

    /// Imports one page as a form XObject together with everything it
    /// references. Object numbers are requested from `allocate`; the first
    /// number handed out must be the form XObject itself. Returns the raw
    /// object bodies (without `obj`/`endobj`) keyed by those numbers.
    fn import_page(
        &mut self,
        page: u32,
        pdf_box: PdfBox,
        allocate: &mut dyn FnMut() -> ObjectId,
    ) -> std::result::Result<Vec<(ObjectId, Vec<u8>)>, BoxError>;
}

/// Opens foreign PDF documents.
pub trait PdfImportBackend {
    fn open(&self, data: Vec<u8>, filename: &str)
        -> std::result::Result<Box<dyn PdfImporter>, BoxError>;
}
