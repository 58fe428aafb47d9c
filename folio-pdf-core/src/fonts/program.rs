//! Interface to the font engine that owns glyph lookup, metrics and subsetting.
//!
//! The writer never parses font files itself. A [`FontProgram`] answers cmap
//! lookups and metric queries in font units and produces subset font programs
//! on request; the embedding pipeline in [`crate::fonts::Face`] turns the
//! answers into PDF objects.

use crate::error::BoxError;
use std::collections::HashMap;

/// Outline format of the font program, deciding between `/FontFile2` and
/// `/FontFile3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFlavor {
    TrueType,
    /// CFF outlines; the embedded program is the bare CFF table.
    Cff,
}

/// Font wide metrics, all lengths in font units.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// `[x_min, y_min, x_max, y_max]`
    pub bbox: [i32; 4],
    pub ascent: i32,
    pub descent: i32,
    pub cap_height: i32,
    pub x_height: i32,
    pub italic_angle: f64,
    /// OS/2 `usWeightClass`
    pub weight_class: u16,
    pub fixed_pitch: bool,
    pub italic: bool,
    pub flavor: FontFlavor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetMode {
    /// Glyph ids of the subset equal the original ids, so content streams
    /// written with original ids stay valid.
    RetainGids,
    /// Glyphs are renumbered densely; the engine reports the old to new map.
    Renumber,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubsetRequest {
    /// Ascending, without duplicates; always contains glyph 0.
    pub glyphs: Vec<u16>,
    pub mode: SubsetMode,
    /// Variation axis pins `(tag, value)` sorted by tag. A non-empty list asks
    /// for a static instance.
    pub variations: Vec<(String, f32)>,
    pub drop_layout_tables: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SubsetOutput {
    /// The font program to embed (CFF table only for CFF flavored fonts).
    pub data: Vec<u8>,
    /// Old glyph id to new glyph id; present for [`SubsetMode::Renumber`].
    pub gid_map: Option<HashMap<u16, u16>>,
}

pub trait FontProgram {
    fn units_per_em(&self) -> u16;

    fn postscript_name(&self) -> String;

    /// cmap lookup.
    fn glyph_index(&self, c: char) -> Option<u16>;

    /// Reverse cmap lookup for glyphs registered by id, e.g. from a shaper.
    /// Used for the ToUnicode map when the character is not known otherwise.
    fn glyph_char(&self, _glyph: u16) -> Option<char> {
        None
    }

    /// Horizontal advance of a glyph, in font units.
    fn advance_width(&self, glyph: u16) -> Option<u16>;

    fn metrics(&self) -> FontMetrics;

    fn subset(&self, request: &SubsetRequest) -> std::result::Result<SubsetOutput, BoxError>;
}
