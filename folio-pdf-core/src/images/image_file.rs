//! A physical image file (PNG, JPEG) or one page of a foreign PDF, embedded
//! once as an image or form XObject.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use crate::compression::DEFAULT_COMPRESSION_LEVEL;
use crate::error::{PdfError, Result};
use crate::images::decode::{ColorSpace, DecodedImage, ImageDecoder, RasterFormat};
use crate::images::jpeg::JpegDecoder;
use crate::images::pdf_import::{
    get_pdf_box_dimensions, BoxDimensions, PageBoxes, PdfBox, PdfImportBackend, PdfImporter,
};
use crate::images::png::{PngDecoder, PNG_SIGNATURE};
use crate::objects::{Array, Dictionary, Object, ObjectId};
use crate::writer::PdfWriter;

/// Document wide identifier of an image; also its resource name `/ImgBag<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub(crate) u32);

impl ImageId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Pdf,
}

impl ImageFormat {
    /// Detects the format from the leading bytes of a file.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&PNG_SIGNATURE) {
            Some(ImageFormat::Png)
        } else if data.starts_with(&[0xFF, 0xD8]) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"%PDF") {
            Some(ImageFormat::Pdf)
        } else {
            None
        }
    }
}

impl From<RasterFormat> for ImageFormat {
    fn from(format: RasterFormat) -> Self {
        match format {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Loaded,
    Finished,
}

/// Decoders used when loading images into a document.
pub struct ImageDecoders {
    pub png: Box<dyn ImageDecoder>,
    pub jpeg: Box<dyn ImageDecoder>,
    pub pdf: Option<Box<dyn PdfImportBackend>>,
}

impl ImageDecoders {
    pub fn new(compression_level: u32) -> Self {
        Self {
            png: Box::new(PngDecoder { compression_level }),
            jpeg: Box::new(JpegDecoder),
            pdf: None,
        }
    }
}

impl Default for ImageDecoders {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

enum ImageSource {
    Bitmap(DecodedImage),
    Pdf(Box<dyn PdfImporter>),
}

pub struct ImageFile {
    id: ImageId,
    filename: String,
    format: ImageFormat,
    number_of_pages: u32,
    page_sizes: HashMap<u32, PageBoxes>,
    scale_x: f64,
    scale_y: f64,
    width: u32,
    height: u32,
    pdf_box: PdfBox,
    page_number: u32,
    object: ObjectId,
    source: ImageSource,
    state: ImageState,
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("id", &self.id)
            .field("filename", &self.filename)
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("object", &self.object)
            .field("state", &self.state)
            .finish()
    }
}

impl ImageFile {
    /// Loads `data`, choosing the decoder by file signature. `pdf_box` and
    /// `page_number` (1-based) only matter for PDF files.
    pub(crate) fn load(
        id: ImageId,
        object: ObjectId,
        filename: &str,
        data: Vec<u8>,
        pdf_box: PdfBox,
        page_number: u32,
        decoders: &ImageDecoders,
    ) -> Result<Self> {
        tracing::info!(filename = %filename, "load image");
        match ImageFormat::sniff(&data) {
            Some(ImageFormat::Png) => {
                let image = decoders
                    .png
                    .decode(&data)
                    .map_err(|e| PdfError::from_boxed("decode", filename, e))?;
                Ok(Self::from_decoded(id, object, filename, image))
            }
            Some(ImageFormat::Jpeg) => {
                let image = decoders
                    .jpeg
                    .decode(&data)
                    .map_err(|e| PdfError::from_boxed("decode", filename, e))?;
                Ok(Self::from_decoded(id, object, filename, image))
            }
            Some(ImageFormat::Pdf) => {
                let backend = decoders.pdf.as_ref().ok_or_else(|| {
                    PdfError::UnsupportedImageFormat(format!(
                        "{}: no PDF import backend configured",
                        filename
                    ))
                })?;
                let importer = backend
                    .open(data, filename)
                    .map_err(|e| PdfError::collaborator("open", filename, e))?;
                Self::from_importer(id, object, filename, importer, pdf_box, page_number)
            }
            None => Err(PdfError::UnsupportedImageFormat(filename.to_string())),
        }
    }

    pub(crate) fn from_decoded(
        id: ImageId,
        object: ObjectId,
        filename: &str,
        image: DecodedImage,
    ) -> Self {
        Self {
            id,
            filename: filename.to_string(),
            format: image.format.into(),
            number_of_pages: 1,
            page_sizes: HashMap::new(),
            scale_x: 1.0,
            scale_y: 1.0,
            width: image.width,
            height: image.height,
            pdf_box: PdfBox::Media,
            page_number: 1,
            object,
            source: ImageSource::Bitmap(image),
            state: ImageState::Loaded,
        }
    }

    pub(crate) fn from_importer(
        id: ImageId,
        object: ObjectId,
        filename: &str,
        importer: Box<dyn PdfImporter>,
        pdf_box: PdfBox,
        page_number: u32,
    ) -> Result<Self> {
        let number_of_pages = importer
            .page_count()
            .map_err(|e| PdfError::collaborator("page count", filename, e))?;
        let page_sizes = importer
            .page_boxes()
            .map_err(|e| PdfError::collaborator("page boxes", filename, e))?;
        let dimensions = get_pdf_box_dimensions(&page_sizes, filename, page_number, pdf_box)?;

        Ok(Self {
            id,
            filename: filename.to_string(),
            format: ImageFormat::Pdf,
            number_of_pages,
            page_sizes,
            scale_x: dimensions.w,
            scale_y: dimensions.h,
            width: dimensions.w.round().max(0.0) as u32,
            height: dimensions.h.round().max(0.0) as u32,
            pdf_box,
            page_number,
            object,
            source: ImageSource::Pdf(importer),
            state: ImageState::Loaded,
        })
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Resource name used in `/XObject` dictionaries and content streams.
    pub fn internal_name(&self) -> String {
        format!("/ImgBag{}", self.id)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn number_of_pages(&self) -> u32 {
        self.number_of_pages
    }

    pub fn page_sizes(&self) -> &HashMap<u32, PageBoxes> {
        &self.page_sizes
    }

    /// Natural size for PDF pages (the selected box), 1 for bitmaps.
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Pixel size; the rounded box size for PDF pages.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pdf_box(&self) -> PdfBox {
        self.pdf_box
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// The XObject that page resources refer to.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn state(&self) -> ImageState {
        self.state
    }

    pub fn color_space(&self) -> Option<ColorSpace> {
        match &self.source {
            ImageSource::Bitmap(image) => Some(image.color_space),
            ImageSource::Pdf(_) => None,
        }
    }

    pub fn get_pdf_box_dimensions(&self, page: u32, pdf_box: PdfBox) -> Result<BoxDimensions> {
        get_pdf_box_dimensions(&self.page_sizes, &self.filename, page, pdf_box)
    }

    pub(crate) fn finish<W: Write>(&mut self, writer: &mut PdfWriter<W>) -> Result<()> {
        if self.state == ImageState::Finished {
            return Err(PdfError::InvalidStructure(format!(
                "image {} finished twice",
                self.filename
            )));
        }
        tracing::info!(filename = %self.filename, "write image to PDF");

        match &mut self.source {
            ImageSource::Bitmap(image) => finish_bitmap(image, self.object, writer)?,
            ImageSource::Pdf(importer) => finish_pdf(
                &mut **importer,
                &self.filename,
                self.page_number,
                self.pdf_box,
                self.object,
                writer,
            )?,
        }
        self.state = ImageState::Finished;
        Ok(())
    }
}

fn finish_pdf<W: Write>(
    importer: &mut dyn PdfImporter,
    filename: &str,
    page: u32,
    pdf_box: PdfBox,
    object: ObjectId,
    writer: &mut PdfWriter<W>,
) -> Result<()> {
    let mut first = Some(object);
    let mut imported = {
        let writer = &*writer;
        let mut allocate = || first.take().unwrap_or_else(|| writer.next_object());
        importer
            .import_page(page, pdf_box, &mut allocate)
            .map_err(|e| PdfError::collaborator("import", filename, e))?
    };

    if first.is_some() || !imported.iter().any(|(id, _)| *id == object) {
        return Err(PdfError::collaborator(
            "import",
            filename,
            format!("page {} was not returned as object {}", page, object.number()).into(),
        ));
    }

    imported.sort_by_key(|(id, _)| *id);
    for (id, bytes) in imported {
        let mut obj = writer.new_object_with_number(id);
        obj.set_raw(true);
        obj.set_data(bytes);
        writer.save(&mut obj)?;
    }
    Ok(())
}

fn image_dictionary(image: &DecodedImage, color_space: &str) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::name("XObject"));
    dict.set("Subtype", Object::name("Image"));
    dict.set("BitsPerComponent", image.bits_per_component as i64);
    dict.set("ColorSpace", Object::name(color_space));
    dict.set("Width", image.width);
    dict.set("Height", image.height);
    dict
}

fn finish_bitmap<W: Write>(
    image: &mut DecodedImage,
    object: ObjectId,
    writer: &mut PdfWriter<W>,
) -> Result<()> {
    let mut dict = image_dictionary(image, image.color_space.pdf_name());

    if !image.transparency.is_empty() {
        let mask: Array = image
            .transparency
            .iter()
            .flat_map(|v| [Object::Integer(*v as i64), Object::Integer(*v as i64)])
            .collect();
        dict.set("Mask", mask);
    }

    if image.has_soft_mask() {
        let mut smask = writer.new_object();
        smask.dictionary = image_dictionary(image, "DeviceGray");
        if let Some(parms) = image.soft_mask_decode_parms.take() {
            smask.dictionary.set("DecodeParms", parms);
        }
        smask.set_compression(writer.config().compression_level);
        smask.set_data(std::mem::take(&mut image.soft_mask));
        writer.save(&mut smask)?;
        dict.set("SMask", smask.id());
    }

    if image.color_space == ColorSpace::Indexed {
        let hival = (image.palette.len() / 3) as i64 - 1;
        let mut palette = writer.new_object();
        palette.set_data(std::mem::take(&mut image.palette));
        writer.save(&mut palette)?;
        let color_space = Array::new()
            .with(Object::name("Indexed"))
            .with(Object::name("DeviceRGB"))
            .with(hival)
            .with(palette.id());
        dict.set("ColorSpace", color_space);
    }

    if let Some(parms) = image.decode_parms.take() {
        dict.set("DecodeParms", parms);
    }

    let filter = match image.format {
        RasterFormat::Png => "FlateDecode",
        RasterFormat::Jpeg => "DCTDecode",
    };
    dict.set("Filter", Object::name(filter));

    let mut obj = writer.new_object_with_number(object).with_dictionary(dict);
    obj.set_data(std::mem::take(&mut image.data));
    writer.save(&mut obj)
}
