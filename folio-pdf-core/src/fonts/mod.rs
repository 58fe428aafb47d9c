//! Font subsetting and embedding.
//!
//! Fonts are embedded as composite (Type0) fonts with `Identity-H` encoding,
//! so content streams address glyphs by 2-byte glyph id. A [`Face`] tracks
//! which glyphs are used; at the end of the document it asks its
//! [`FontProgram`] for a subset and writes the font objects.

pub mod cmap;
pub mod descriptor;
mod face;
mod program;
pub mod subset_tag;
pub mod widths;

pub use descriptor::{FontDescriptor, FontFlags};
pub use face::{Face, FaceId, FaceState};
pub use program::{FontFlavor, FontMetrics, FontProgram, SubsetMode, SubsetOutput, SubsetRequest};
pub use subset_tag::subset_tag;
