//! Font descriptor structures for PDF font embedding

use crate::fonts::{FontFlavor, FontMetrics};
use crate::objects::{Array, Dictionary, Object, ObjectId};
use bitflags::bitflags;

bitflags! {
    /// Font descriptor flags (ISO 32000-1, table 123)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontFlags: u32 {
        /// All glyphs have the same width
        const FIXED_PITCH = 1 << 0;
        /// Glyphs have serifs
        const SERIF = 1 << 1;
        /// Font contains glyphs outside Adobe standard Latin set
        const SYMBOLIC = 1 << 2;
        /// Font is a script font
        const SCRIPT = 1 << 3;
        /// Font uses Adobe standard Latin character set
        const NONSYMBOLIC = 1 << 5;
        /// Font is italic
        const ITALIC = 1 << 6;
    }
}

/// StemV estimate from the weight class.
pub fn stem_v(weight_class: u16) -> i64 {
    if weight_class >= 700 {
        140
    } else if weight_class >= 500 {
        100
    } else {
        80
    }
}

/// Converts font units to the 1000 unit glyph space.
pub fn scale_to_pdf(value: f64, units_per_em: u16) -> i64 {
    if units_per_em == 0 {
        return value.round() as i64;
    }
    (value * 1000.0 / units_per_em as f64).round() as i64
}

/// PDF Font Descriptor, metrics already scaled to glyph space.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Subset name, `ABCDEF+PostScriptName`
    pub font_name: String,
    pub flags: FontFlags,
    /// Font bounding box [llx, lly, urx, ury]
    pub font_bbox: [i64; 4],
    pub italic_angle: f64,
    pub ascent: i64,
    pub descent: i64,
    pub cap_height: i64,
    pub x_height: i64,
    pub stem_v: i64,
    pub flavor: FontFlavor,
}

impl FontDescriptor {
    pub fn from_metrics(font_name: impl Into<String>, metrics: &FontMetrics, units_per_em: u16) -> Self {
        let scale = |v: i32| scale_to_pdf(v as f64, units_per_em);

        let mut flags = FontFlags::NONSYMBOLIC;
        if metrics.fixed_pitch {
            flags |= FontFlags::FIXED_PITCH;
        }
        if metrics.italic {
            flags |= FontFlags::ITALIC;
        }

        FontDescriptor {
            font_name: font_name.into(),
            flags,
            font_bbox: [
                scale(metrics.bbox[0]),
                scale(metrics.bbox[1]),
                scale(metrics.bbox[2]),
                scale(metrics.bbox[3]),
            ],
            italic_angle: metrics.italic_angle,
            ascent: scale(metrics.ascent),
            descent: scale(metrics.descent),
            cap_height: scale(metrics.cap_height),
            x_height: scale(metrics.x_height),
            stem_v: stem_v(metrics.weight_class),
            flavor: metrics.flavor,
        }
    }

    /// Convert to PDF dictionary
    pub fn to_dict(&self, font_file: ObjectId) -> Dictionary {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::name("FontDescriptor"));
        dict.set("FontName", Object::name(self.font_name.clone()));
        dict.set("Flags", Object::Integer(self.flags.bits() as i64));
        dict.set("FontBBox", Array::from_integers(&self.font_bbox));
        dict.set("ItalicAngle", Object::Real(self.italic_angle));
        dict.set("Ascent", Object::Integer(self.ascent));
        dict.set("Descent", Object::Integer(self.descent));
        dict.set("CapHeight", Object::Integer(self.cap_height));
        dict.set("XHeight", Object::Integer(self.x_height));
        dict.set("StemV", Object::Integer(self.stem_v));

        match self.flavor {
            FontFlavor::Cff => dict.set("FontFile3", font_file),
            FontFlavor::TrueType => dict.set("FontFile2", font_file),
        }

        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FontMetrics {
        FontMetrics {
            bbox: [-1000, -500, 4000, 2000],
            ascent: 1900,
            descent: -500,
            cap_height: 1400,
            x_height: 1000,
            italic_angle: -12.5,
            weight_class: 400,
            fixed_pitch: false,
            italic: false,
            flavor: FontFlavor::TrueType,
        }
    }

    #[test]
    fn test_font_flags() {
        let flags = FontFlags::FIXED_PITCH | FontFlags::SERIF;
        assert!(flags.contains(FontFlags::FIXED_PITCH));
        assert!(flags.contains(FontFlags::SERIF));
        assert!(!flags.contains(FontFlags::ITALIC));
        assert_eq!(FontFlags::NONSYMBOLIC.bits(), 32);
    }

    #[test]
    fn test_stem_v_bands() {
        assert_eq!(stem_v(100), 80);
        assert_eq!(stem_v(499), 80);
        assert_eq!(stem_v(500), 100);
        assert_eq!(stem_v(699), 100);
        assert_eq!(stem_v(700), 140);
        assert_eq!(stem_v(900), 140);
    }

    #[test]
    fn test_scaling_to_glyph_space() {
        assert_eq!(scale_to_pdf(1024.0, 2048), 500);
        assert_eq!(scale_to_pdf(-500.0, 2000), -250);
        assert_eq!(scale_to_pdf(333.0, 1000), 333);
        assert_eq!(scale_to_pdf(1.0, 3), 333);
    }

    #[test]
    fn test_descriptor_from_metrics() {
        let desc = FontDescriptor::from_metrics("ABCDEF+Serif", &metrics(), 2000);
        assert_eq!(desc.font_bbox, [-500, -250, 2000, 1000]);
        assert_eq!(desc.ascent, 950);
        assert_eq!(desc.descent, -250);
        assert_eq!(desc.cap_height, 700);
        assert_eq!(desc.x_height, 500);
        assert_eq!(desc.stem_v, 80);
        assert_eq!(desc.flags, FontFlags::NONSYMBOLIC);
    }

    #[test]
    fn test_flags_from_metrics() {
        let mut m = metrics();
        m.fixed_pitch = true;
        m.italic = true;
        let desc = FontDescriptor::from_metrics("X", &m, 1000);
        assert_eq!(
            desc.flags,
            FontFlags::NONSYMBOLIC | FontFlags::FIXED_PITCH | FontFlags::ITALIC
        );
        assert_eq!(desc.flags.bits(), 32 + 1 + 64);
    }

    #[test]
    fn test_descriptor_to_dict_font_file_key() {
        let desc = FontDescriptor::from_metrics("ABCDEF+Serif", &metrics(), 1000);
        let dict = desc.to_dict(ObjectId::new(12));
        assert_eq!(dict.get("Type"), Some(&Object::name("FontDescriptor")));
        assert_eq!(dict.get("FontName"), Some(&Object::name("ABCDEF+Serif")));
        assert_eq!(dict.get("FontFile2"), Some(&Object::Reference(ObjectId::new(12))));
        assert!(dict.get("FontFile3").is_none());

        let mut cff = metrics();
        cff.flavor = FontFlavor::Cff;
        let dict = FontDescriptor::from_metrics("X", &cff, 1000).to_dict(ObjectId::new(3));
        assert_eq!(dict.get("FontFile3"), Some(&Object::Reference(ObjectId::new(3))));
        assert!(dict.get("FontFile2").is_none());
    }
}
