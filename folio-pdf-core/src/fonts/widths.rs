//! `/W` array of a CIDFont.

use crate::objects::Object;

/// Builds the `/W` array from `(glyph id, width)` pairs.
///
/// Glyphs are sorted; every run of consecutive ids becomes one
/// `first [w1 w2 ...]` segment.
pub fn width_array(widths: &[(u16, i64)]) -> Vec<Object> {
    let mut sorted = widths.to_vec();
    sorted.sort_by_key(|(glyph, _)| *glyph);
    sorted.dedup_by_key(|(glyph, _)| *glyph);

    let mut out = Vec::new();
    let mut run: Vec<Object> = Vec::new();
    let mut run_start = 0u16;
    let mut previous: Option<u16> = None;

    for (glyph, width) in sorted {
        let continues = matches!(previous, Some(p) if p as u32 + 1 == glyph as u32);
        if !continues && !run.is_empty() {
            out.push(Object::Integer(run_start as i64));
            out.push(Object::Array(std::mem::take(&mut run)));
        }
        if run.is_empty() {
            run_start = glyph;
        }
        run.push(Object::Integer(width));
        previous = Some(glyph);
    }
    if !run.is_empty() {
        out.push(Object::Integer(run_start as i64));
        out.push(Object::Array(run));
    }
    out
}
