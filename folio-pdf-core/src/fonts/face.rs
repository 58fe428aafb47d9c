//! One font program at one subsetting configuration.
//!
//! A face collects the glyphs used by the document, optionally renumbers them
//! into a compact subset, and is embedded exactly once as a Type0 font with an
//! Identity-H encoding, a CIDFont descendant, a FontDescriptor, the font
//! program stream and a ToUnicode CMap.

use crate::error::{PdfError, Result};
use crate::fonts::cmap::to_unicode_cmap;
use crate::fonts::descriptor::{scale_to_pdf, FontDescriptor};
use crate::fonts::subset_tag::subset_tag;
use crate::fonts::widths::width_array;
use crate::fonts::{FontFlavor, FontProgram, SubsetMode, SubsetRequest};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::writer::PdfWriter;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::io::Write;

/// Document wide identifier of a face; also its resource name `/F<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub(crate) u32);

impl FaceId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceState {
    Created,
    Compacted,
    Finished,
}

struct CompactSubset {
    data: Vec<u8>,
    gid_map: HashMap<u16, u16>,
}

pub struct Face {
    id: FaceId,
    program: Box<dyn FontProgram>,
    filename: String,
    used: BTreeSet<u16>,
    to_rune: HashMap<u16, char>,
    variations: BTreeMap<String, f32>,
    compact: Option<CompactSubset>,
    font_object: ObjectId,
    state: FaceState,
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("id", &self.id)
            .field("filename", &self.filename)
            .field("used", &self.used.len())
            .field("font_object", &self.font_object)
            .field("state", &self.state)
            .finish()
    }
}

impl Face {
    pub(crate) fn new(
        id: FaceId,
        program: Box<dyn FontProgram>,
        filename: impl Into<String>,
        font_object: ObjectId,
    ) -> Self {
        let mut used = BTreeSet::new();
        used.insert(0);
        Self {
            id,
            program,
            filename: filename.into(),
            used,
            to_rune: HashMap::new(),
            variations: BTreeMap::new(),
            compact: None,
            font_object,
            state: FaceState::Created,
        }
    }

    pub fn id(&self) -> FaceId {
        self.id
    }

    /// Resource name such as `/F3`.
    pub fn internal_name(&self) -> String {
        format!("/F{}", self.id)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn postscript_name(&self) -> String {
        self.program.postscript_name()
    }

    pub fn units_per_em(&self) -> u16 {
        self.program.units_per_em()
    }

    /// The reserved Type0 font object referenced from page resources.
    pub fn font_object(&self) -> ObjectId {
        self.font_object
    }

    pub fn state(&self) -> FaceState {
        self.state
    }

    /// Used glyph ids in ascending order; glyph 0 is always included.
    pub fn used_glyphs(&self) -> Vec<u16> {
        self.used.iter().copied().collect()
    }

    /// Glyph id for `c`, 0 when the font has no glyph for it. The character
    /// is remembered for the ToUnicode map.
    pub fn codepoint(&mut self, c: char) -> u16 {
        match self.program.glyph_index(c) {
            Some(glyph) => {
                self.to_rune.entry(glyph).or_insert(c);
                glyph
            }
            None => 0,
        }
    }

    /// Glyph ids for all characters of `text` the font can map; unmapped
    /// characters are skipped.
    pub fn codepoints(&mut self, text: &str) -> Vec<u16> {
        let mut glyphs = Vec::with_capacity(text.len());
        for c in text.chars() {
            if let Some(glyph) = self.program.glyph_index(c) {
                self.to_rune.entry(glyph).or_insert(c);
                glyphs.push(glyph);
            }
        }
        glyphs
    }

    /// Marks a glyph as used on some page.
    ///
    /// Glyphs that never went through [`Face::codepoint`] get their ToUnicode
    /// entry from [`FontProgram::glyph_char`], or U+FFFD when that is `None`.
    pub fn register_codepoint(&mut self, glyph: u16) -> Result<()> {
        match self.state {
            FaceState::Finished => Err(PdfError::FontError(format!(
                "face {} is already embedded",
                self.id
            ))),
            FaceState::Compacted if !self.used.contains(&glyph) => Err(PdfError::FontError(format!(
                "glyph {} registered after compacting face {}",
                glyph, self.id
            ))),
            _ => {
                self.used.insert(glyph);
                Ok(())
            }
        }
    }

    pub fn register_codepoints(&mut self, glyphs: &[u16]) -> Result<()> {
        for glyph in glyphs {
            self.register_codepoint(*glyph)?;
        }
        Ok(())
    }

    /// Pins a variation axis (for example `wght` to 700) so a static
    /// instance is embedded.
    pub fn set_variation(&mut self, tag: impl Into<String>, value: f32) -> Result<()> {
        if self.state != FaceState::Created {
            return Err(PdfError::FontError(format!(
                "variations of face {} cannot change after subsetting",
                self.id
            )));
        }
        self.variations.insert(tag.into(), value);
        Ok(())
    }

    pub fn variations(&self) -> &BTreeMap<String, f32> {
        &self.variations
    }

    fn variation_list(&self) -> Vec<(String, f32)> {
        self.variations
            .iter()
            .map(|(tag, value)| (tag.clone(), *value))
            .collect()
    }

    /// Renumbers the used glyphs densely. Content written afterwards must use
    /// [`Face::mapped_glyph`] ids; no new glyphs can be registered.
    pub fn compact_subset(&mut self) -> Result<()> {
        if self.state != FaceState::Created {
            return Err(PdfError::FontError(format!(
                "face {} is already subsetted",
                self.id
            )));
        }
        let request = SubsetRequest {
            glyphs: self.used_glyphs(),
            mode: SubsetMode::Renumber,
            variations: self.variation_list(),
            drop_layout_tables: true,
        };
        let output = self
            .program
            .subset(&request)
            .map_err(|e| PdfError::collaborator("subset", self.filename.clone(), e))?;
        let gid_map = output.gid_map.ok_or_else(|| {
            PdfError::FontError(format!(
                "subsetter returned no glyph map for {}",
                self.filename
            ))
        })?;
        if let Some(missing) = request.glyphs.iter().find(|g| !gid_map.contains_key(g)) {
            return Err(PdfError::FontError(format!(
                "subsetter dropped glyph {} of {}",
                missing, self.filename
            )));
        }
        self.compact = Some(CompactSubset {
            data: output.data,
            gid_map,
        });
        self.state = FaceState::Compacted;
        Ok(())
    }

    /// The glyph id to use in content streams: the renumbered id after
    /// [`Face::compact_subset`], the original id otherwise.
    pub fn mapped_glyph(&self, glyph: u16) -> Option<u16> {
        match &self.compact {
            Some(compact) => compact.gid_map.get(&glyph).copied(),
            None => Some(glyph),
        }
    }

    pub fn subset_tag(&self) -> String {
        subset_tag(&self.used_glyphs(), &self.variations)
    }

    /// Writes font program, descriptor, ToUnicode CMap, CIDFont and finally
    /// the reserved Type0 font object.
    pub(crate) fn finish<W: Write>(&mut self, writer: &mut PdfWriter<W>) -> Result<()> {
        if self.state == FaceState::Finished {
            return Err(PdfError::FontError(format!(
                "face {} finished twice",
                self.id
            )));
        }
        let psname = self.program.postscript_name();
        tracing::info!(filename = %self.filename, psname = %psname, "write font to PDF");

        let glyphs = self.used_glyphs();
        let compact_data = self
            .compact
            .as_mut()
            .map(|compact| std::mem::take(&mut compact.data));
        let font_data = match compact_data {
            Some(data) => data,
            None => {
                let request = SubsetRequest {
                    glyphs: glyphs.clone(),
                    mode: SubsetMode::RetainGids,
                    variations: self.variation_list(),
                    drop_layout_tables: false,
                };
                self.program
                    .subset(&request)
                    .map_err(|e| PdfError::collaborator("subset", self.filename.clone(), e))?
                    .data
            }
        };

        // (original glyph, embedded glyph)
        let embedded: Vec<(u16, u16)> = glyphs
            .iter()
            .filter_map(|g| self.mapped_glyph(*g).map(|m| (*g, m)))
            .collect();

        let metrics = self.program.metrics();
        let upem = self.program.units_per_em();
        let base_font = format!("{}+{}", self.subset_tag(), psname);

        let mut font_file = writer.new_object();
        font_file.set_data(font_data);
        font_file.set_compression(writer.config().compression_level);
        if metrics.flavor == FontFlavor::Cff {
            font_file
                .dictionary
                .set("Subtype", Object::name("CIDFontType0C"));
        }
        writer.save(&mut font_file)?;

        let descriptor = FontDescriptor::from_metrics(base_font.clone(), &metrics, upem);
        let mut descriptor_obj = writer
            .new_object()
            .with_dictionary(descriptor.to_dict(font_file.id()));
        writer.save(&mut descriptor_obj)?;

        let mappings: Vec<(u16, Option<char>)> = embedded
            .iter()
            .map(|(original, mapped)| {
                let c = self
                    .to_rune
                    .get(original)
                    .copied()
                    .or_else(|| self.program.glyph_char(*original));
                (*mapped, c)
            })
            .collect();
        let mut cmap_obj = writer.new_object();
        cmap_obj.set_data(to_unicode_cmap(&mappings));
        writer.save(&mut cmap_obj)?;

        let widths: Vec<(u16, i64)> = embedded
            .iter()
            .map(|(original, mapped)| {
                let advance = self.program.advance_width(*original).unwrap_or(0);
                (*mapped, scale_to_pdf(advance as f64, upem))
            })
            .collect();

        let mut system_info = Dictionary::new();
        system_info.set("Registry", "Adobe");
        system_info.set("Ordering", "Identity");
        system_info.set("Supplement", 0);

        let mut cid_font = Dictionary::new();
        cid_font.set("Type", Object::name("Font"));
        cid_font.set("BaseFont", Object::name(base_font.clone()));
        cid_font.set("CIDSystemInfo", system_info);
        cid_font.set("FontDescriptor", descriptor_obj.id());
        cid_font.set("W", Object::Array(width_array(&widths)));
        match metrics.flavor {
            FontFlavor::Cff => cid_font.set("Subtype", Object::name("CIDFontType0")),
            FontFlavor::TrueType => {
                cid_font.set("Subtype", Object::name("CIDFontType2"));
                cid_font.set("CIDToGIDMap", Object::name("Identity"));
            }
        }
        let mut cid_font_obj = writer.new_object().with_dictionary(cid_font);
        writer.save(&mut cid_font_obj)?;

        let mut type0 = Dictionary::new();
        type0.set("Type", Object::name("Font"));
        type0.set("Subtype", Object::name("Type0"));
        type0.set("BaseFont", Object::name(base_font));
        type0.set("Encoding", Object::name("Identity-H"));
        type0.set("DescendantFonts", vec![Object::Reference(cid_font_obj.id())]);
        type0.set("ToUnicode", cmap_obj.id());
        let mut font_obj = writer
            .new_object_with_number(self.font_object)
            .with_dictionary(type0);
        writer.save(&mut font_obj)?;

        self.state = FaceState::Finished;
        Ok(())
    }
}
