//! ToUnicode CMap synthesis.

use std::fmt::Write as _;

/// Maximum number of entries in one `beginbfchar` block.
const BFCHAR_BLOCK: usize = 100;

/// Code point written for glyphs without a known character.
pub const REPLACEMENT: char = '\u{FFFD}';

fn utf16_hex(c: char) -> String {
    let mut buf = [0u16; 2];
    c.encode_utf16(&mut buf)
        .iter()
        .map(|unit| format!("{:04X}", unit))
        .collect()
}

/// Builds a ToUnicode CMap for the given `(glyph id, character)` pairs.
///
/// Glyphs are emitted in ascending order. The codespace range runs from
/// `<0000>` to the largest glyph id plus one, capped at `<FFFF>`.
pub fn to_unicode_cmap(mappings: &[(u16, Option<char>)]) -> Vec<u8> {
    let mut sorted = mappings.to_vec();
    sorted.sort_by_key(|(glyph, _)| *glyph);
    sorted.dedup_by_key(|(glyph, _)| *glyph);

    let max_glyph = sorted.last().map(|(glyph, _)| *glyph as u32).unwrap_or(0);

    let mut cmap = String::new();
    cmap.push_str("/CIDInit /ProcSet findresource begin\n");
    cmap.push_str("12 dict begin\n");
    cmap.push_str("begincmap\n");
    cmap.push_str("/CIDSystemInfo\n");
    cmap.push_str("<< /Registry (Adobe)\n");
    cmap.push_str("   /Ordering (UCS)\n");
    cmap.push_str("   /Supplement 0\n");
    cmap.push_str(">> def\n");
    cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
    cmap.push_str("/CMapType 2 def\n");
    cmap.push_str("1 begincodespacerange\n");
    let _ = writeln!(cmap, "<0000> <{:04X}>", (max_glyph + 1).min(0xFFFF));
    cmap.push_str("endcodespacerange\n");

    for block in sorted.chunks(BFCHAR_BLOCK) {
        let _ = writeln!(cmap, "{} beginbfchar", block.len());
        for (glyph, c) in block {
            let _ = writeln!(
                cmap,
                "<{:04X}> <{}>",
                glyph,
                utf16_hex(c.unwrap_or(REPLACEMENT))
            );
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\n");
    cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
    cmap.push_str("end\n");
    cmap.push_str("end\n");

    cmap.into_bytes()
}
