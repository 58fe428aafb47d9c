use crate::compression::DEFAULT_COMPRESSION_LEVEL;
use crate::error::{PdfError, Result};
use crate::fonts::{Face, FaceId, FontProgram};
use crate::graphics::Separation;
use crate::images::{
    ImageDecoder, ImageDecoders, ImageFile, ImageId, PdfBox, PdfImportBackend, RasterFormat,
};
use crate::info::DocumentInfo;
use crate::objects::{Array, Dictionary, Object, ObjectId};
use crate::page::{Page, PageGeometry};
use crate::structure::{write_outlines, NameDest, NameTree, OutlineItem};
use crate::writer::{IndirectObject, PdfVersion, PdfWriter, WriterConfig};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info};

/// Options for a new [`Document`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentOptions {
    /// Written to the file header. An `/Info` dictionary is only written
    /// below 2.0.
    pub version: PdfVersion,
    /// Deflate level for compressed streams (fonts, soft masks)
    pub compression_level: u32,
    /// Geometry of new pages and the `/MediaBox` of the page tree
    pub page: PageGeometry,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            version: PdfVersion::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            page: PageGeometry::default(),
        }
    }
}

/// Allocates the ids shared by faces and images (`/F<id>`, `/ImgBag<id>`).
#[derive(Debug)]
pub struct ResourceIds(AtomicU32);

impl ResourceIds {
    pub fn new() -> Self {
        Self(AtomicU32::new(1))
    }

    pub fn allocate(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for ResourceIds {
    fn default() -> Self {
        Self::new()
    }
}

/// A PDF document written to `W`.
///
/// Objects are written as soon as they are saved. Pages, fonts, images and
/// the navigation structures are collected and written by
/// [`Document::finish`].
///
/// # Example
///
/// ```rust
/// use folio_pdf::{Document, Result};
///
/// # fn main() -> Result<()> {
/// let mut doc = Document::new(Vec::new());
/// let mut content = doc.new_object();
/// content.set_data(b"0 0 m 100 100 l S".to_vec());
/// doc.add_page(content, None);
/// doc.finish()?;
///
/// let pdf = doc.into_inner();
/// assert!(pdf.starts_with(b"%PDF-1.7"));
/// # Ok(())
/// # }
/// ```
pub struct Document<W: Write> {
    writer: PdfWriter<W>,
    options: DocumentOptions,
    resource_ids: ResourceIds,
    pages: Vec<Page>,
    faces: BTreeMap<FaceId, Face>,
    images: BTreeMap<ImageId, ImageFile>,
    decoders: ImageDecoders,
    catalog: Dictionary,
    names: Dictionary,
    name_dests: BTreeMap<String, NameDest>,
    outlines: Vec<OutlineItem>,
    separations: Vec<Separation>,
    info: Option<DocumentInfo>,
    finished: bool,
}

impl<W: Write> Document<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, DocumentOptions::default())
    }

    pub fn with_options(writer: W, options: DocumentOptions) -> Self {
        let config = WriterConfig {
            version: options.version,
            compression_level: options.compression_level,
        };
        Self {
            writer: PdfWriter::with_config(writer, config),
            options,
            resource_ids: ResourceIds::new(),
            pages: Vec::new(),
            faces: BTreeMap::new(),
            images: BTreeMap::new(),
            decoders: ImageDecoders::new(options.compression_level),
            catalog: Dictionary::new(),
            names: Dictionary::new(),
            name_dests: BTreeMap::new(),
            outlines: Vec::new(),
            separations: Vec::new(),
            info: None,
            finished: false,
        }
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn writer(&self) -> &PdfWriter<W> {
        &self.writer
    }

    /// Direct access for writing custom objects.
    pub fn writer_mut(&mut self) -> &mut PdfWriter<W> {
        &mut self.writer
    }

    /// Creates an object with a freshly reserved number.
    pub fn new_object(&self) -> IndirectObject {
        self.writer.new_object()
    }

    /// Reserves an object number, e.g. for a page referenced before it exists.
    pub fn next_object(&self) -> ObjectId {
        self.writer.next_object()
    }

    pub fn save(&mut self, obj: &mut IndirectObject) -> Result<()> {
        self.writer.save(obj)
    }

    /// Entries merged into the catalog last; they replace generated ones.
    pub fn catalog_mut(&mut self) -> &mut Dictionary {
        &mut self.catalog
    }

    /// Returns the sub-dictionary `name` of the catalog's `/Names`
    /// dictionary, creating it if needed.
    pub fn catalog_name_tree_dict(&mut self, name: &str) -> &mut Dictionary {
        self.names.entry_dict(name)
    }

    pub fn set_info(&mut self, info: DocumentInfo) {
        self.info = Some(info);
    }

    pub fn info(&self) -> Option<&DocumentInfo> {
        self.info.as_ref()
    }

    /// Writes a spot color and makes it available as `/CS<n>` on every page.
    pub fn add_separation(
        &mut self,
        name: &str,
        c: f64,
        m: f64,
        y: f64,
        k: f64,
    ) -> Result<&Separation> {
        let id = format!("CS{}", self.separations.len() + 1);
        let separation = Separation::new(name, id, self.writer.next_object(), c, m, y, k);
        separation.write(&mut self.writer)?;
        self.separations.push(separation);
        let index = self.separations.len() - 1;
        Ok(&self.separations[index])
    }

    pub fn separations(&self) -> &[Separation] {
        &self.separations
    }

    /// Adds a named destination; a destination with the same name is replaced.
    pub fn add_name_destination(&mut self, dest: NameDest) {
        self.name_dests.insert(dest.name.clone(), dest);
    }

    pub fn set_outlines(&mut self, outlines: Vec<OutlineItem>) {
        self.outlines = outlines;
    }

    /// Adds a page with `content` as its content stream. `page` is a number
    /// reserved earlier with [`Document::next_object`]; `None` reserves one.
    pub fn add_page(&mut self, mut content: IndirectObject, page: Option<ObjectId>) -> &mut Page {
        content.set_force_stream(true);
        let id = page.unwrap_or_else(|| self.writer.next_object());
        self.pages.push(Page::new(id, content, self.options.page));
        let index = self.pages.len() - 1;
        &mut self.pages[index]
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Registers a font program. Its Type0 font object is reserved now and
    /// written by [`Document::finish`] if a page uses the face.
    pub fn load_face(&mut self, program: Box<dyn FontProgram>, filename: &str) -> FaceId {
        info!(filename = %filename, "load font");
        let id = FaceId(self.resource_ids.allocate());
        let face = Face::new(id, program, filename, self.writer.next_object());
        self.faces.insert(id, face);
        id
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(&id)
    }

    pub fn face_mut(&mut self, id: FaceId) -> Option<&mut Face> {
        self.faces.get_mut(&id)
    }

    /// Replaces the decoder for PNG or JPEG files.
    pub fn set_image_decoder(&mut self, format: RasterFormat, decoder: Box<dyn ImageDecoder>) {
        match format {
            RasterFormat::Png => self.decoders.png = decoder,
            RasterFormat::Jpeg => self.decoders.jpeg = decoder,
        }
    }

    /// Enables placing pages of PDF files as images.
    pub fn set_pdf_import_backend(&mut self, backend: Box<dyn PdfImportBackend>) {
        self.decoders.pdf = Some(backend);
    }

    /// Loads an image file. PDF files are placed with page 1 and the MediaBox.
    pub fn load_image_file(&mut self, path: impl AsRef<Path>) -> Result<ImageId> {
        self.load_image_file_with_box(path, PdfBox::Media, 1)
    }

    pub fn load_image_file_with_box(
        &mut self,
        path: impl AsRef<Path>,
        pdf_box: PdfBox,
        page: u32,
    ) -> Result<ImageId> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        self.load_image_bytes_with_box(&path.display().to_string(), data, pdf_box, page)
    }

    /// Loads an image from memory; `filename` names it in errors and orders
    /// images in the output.
    pub fn load_image_bytes(&mut self, filename: &str, data: Vec<u8>) -> Result<ImageId> {
        self.load_image_bytes_with_box(filename, data, PdfBox::Media, 1)
    }

    pub fn load_image_bytes_with_box(
        &mut self,
        filename: &str,
        data: Vec<u8>,
        pdf_box: PdfBox,
        page: u32,
    ) -> Result<ImageId> {
        let id = ImageId(self.resource_ids.allocate());
        let object = self.writer.next_object();
        let image = ImageFile::load(id, object, filename, data, pdf_box, page, &self.decoders)?;
        self.images.insert(id, image);
        Ok(id)
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageFile> {
        self.images.get(&id)
    }

    /// Bytes written so far.
    pub fn size(&self) -> u64 {
        self.writer.size()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Writes pages, images, fonts, outlines, the catalog, the info
    /// dictionary and finally the cross-reference table and trailer.
    ///
    /// A document without pages is rejected before anything is written.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Err(PdfError::InvalidStructure(
                "document finished twice".to_string(),
            ));
        }
        if self.pages.is_empty() {
            return Err(PdfError::NoPages);
        }
        info!(pages = self.pages.len(), "finish document");

        let mut used_faces = BTreeSet::new();
        let mut used_images = BTreeSet::new();
        for page in self.pages.iter_mut() {
            used_faces.extend(page.faces().iter().copied());
            used_images.extend(page.images().iter().copied());
            self.writer.save(page.content_mut())?;
        }

        let pages_id = self.writer.next_object();

        let mut images: Vec<&mut ImageFile> = self
            .images
            .values_mut()
            .filter(|image| used_images.contains(&image.id()))
            .collect();
        images.sort_by(|a, b| {
            a.filename()
                .cmp(b.filename())
                .then_with(|| a.id().cmp(&b.id()))
        });
        for image in images {
            image.finish(&mut self.writer)?;
        }

        let default_geometry = self.options.page;
        for page in &self.pages {
            let mut resources = Dictionary::new();
            if !page.faces().is_empty() {
                let mut fonts = Dictionary::new();
                for id in page.faces() {
                    let face = self.faces.get(id).ok_or_else(|| {
                        PdfError::InvalidStructure(format!("page uses unknown face {}", id))
                    })?;
                    fonts.set(face.internal_name(), face.font_object());
                }
                resources.set("Font", fonts);
            }
            if !self.separations.is_empty() {
                let mut color_spaces = Dictionary::new();
                for separation in &self.separations {
                    color_spaces.set(separation.id.as_str(), separation.object);
                }
                resources.set("ColorSpace", color_spaces);
            }
            if !page.images().is_empty() {
                let mut xobjects = Dictionary::new();
                for id in page.images() {
                    let image = self.images.get(id).ok_or_else(|| {
                        PdfError::InvalidStructure(format!("page uses unknown image {}", id))
                    })?;
                    xobjects.set(image.internal_name(), image.object());
                }
                resources.set("XObject", xobjects);
            }

            let mut dict = Dictionary::new();
            dict.set("Type", Object::name("Page"));
            dict.set("Contents", page.content().id());
            dict.set("Parent", pages_id);
            if page.geometry() != default_geometry {
                dict.set("MediaBox", page.geometry().media_box());
            }
            if !resources.is_empty() {
                dict.set("Resources", resources);
            }

            if !page.annotations.is_empty() {
                let mut annots = Array::with_capacity(page.annotations.len());
                for annotation in &page.annotations {
                    let mut obj = self.writer.new_object().with_dictionary(annotation.to_dict());
                    self.writer.save(&mut obj)?;
                    annots.push(obj.id());
                }
                dict.set("Annots", annots);
            }
            dict.merge(&page.dictionary);

            let mut obj = self.writer.new_object_with_number(page.id()).with_dictionary(dict);
            self.writer.save(&mut obj)?;
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::name("Pages"));
        pages_dict.set(
            "Kids",
            self.pages.iter().map(|p| Object::Reference(p.id())).collect::<Array>(),
        );
        pages_dict.set("Count", self.pages.len());
        pages_dict.set("MediaBox", default_geometry.media_box());
        let mut pages_obj = self.writer.new_object_with_number(pages_id).with_dictionary(pages_dict);
        self.writer.save(&mut pages_obj)?;

        let outlines_id = write_outlines(&mut self.writer, &self.outlines)?;

        if !self.name_dests.is_empty() {
            let mut tree = NameTree::new();
            for (name, dest) in &self.name_dests {
                tree.add(name.as_str(), dest.write(&mut self.writer)?);
            }
            self.names.set("Dests", tree.to_dict());
        }

        let mut catalog = self.writer.new_object();
        catalog.dictionary.set("Type", Object::name("Catalog"));
        catalog.dictionary.set("Pages", pages_id);
        if let Some(outlines_id) = outlines_id {
            catalog.dictionary.set("Outlines", outlines_id);
        }
        if !self.names.is_empty() {
            catalog.dictionary.set("Names", self.names.clone());
        }
        catalog.dictionary.merge(&self.catalog);
        self.writer.save(&mut catalog)?;

        for face in self.faces.values_mut() {
            if used_faces.contains(&face.id()) {
                face.finish(&mut self.writer)?;
            }
        }

        let mut info_id = None;
        if let Some(info) = &self.info {
            if self.options.version.major < 2 {
                let mut obj = self.writer.new_object().with_dictionary(info.to_dict());
                self.writer.save(&mut obj)?;
                info_id = Some(obj.id());
            }
        }

        self.writer.write_xref_and_trailer(catalog.id(), info_id)?;
        self.finished = true;
        debug!(size = self.writer.size(), "document finished");
        Ok(())
    }
}
