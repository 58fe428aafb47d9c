//! Six letter subset prefix (`ABCDEF+FontName`).

use std::collections::BTreeMap;

/// Derives the subset tag from the used glyphs and the variation pins.
///
/// The glyph ids are sorted and deduplicated, written as big endian `u16`,
/// followed by the `tag:value` pins in tag order joined with commas. Each
/// letter comes from a pair of MD5 digest bytes: `(b[2i] + b[2i+1]) % 26`.
pub fn subset_tag(glyphs: &[u16], variations: &BTreeMap<String, f32>) -> String {
    let mut sorted = glyphs.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut input = Vec::with_capacity(sorted.len() * 2);
    for glyph in &sorted {
        input.extend_from_slice(&glyph.to_be_bytes());
    }
    let pins: Vec<String> = variations
        .iter()
        .map(|(tag, value)| format!("{}:{}", tag, value))
        .collect();
    input.extend_from_slice(pins.join(",").as_bytes());

    let digest = md5::compute(&input).0;
    (0..6)
        .map(|i| {
            let sum = digest[2 * i] as u32 + digest[2 * i + 1] as u32;
            (b'A' + (sum % 26) as u8) as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_pins() -> BTreeMap<String, f32> {
        BTreeMap::new()
    }

    #[test]
    fn test_tag_shape() {
        let tag = subset_tag(&[0, 36, 37, 38], &no_pins());
        assert_eq!(tag.len(), 6);
        assert!(tag.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tag_ignores_order_and_duplicates() {
        let a = subset_tag(&[38, 0, 36, 37], &no_pins());
        let b = subset_tag(&[0, 36, 36, 37, 38], &no_pins());
        assert_eq!(a, b);
    }

    #[test]
    fn test_tag_matches_digest_rule() {
        let digest = md5::compute([0u8, 0, 0, 5]).0;
        let expected: String = (0..6)
            .map(|i| (b'A' + ((digest[2 * i] as u32 + digest[2 * i + 1] as u32) % 26) as u8) as char)
            .collect();
        assert_eq!(subset_tag(&[5, 0], &no_pins()), expected);
    }

    #[test]
    fn test_different_glyphs_change_tag() {
        assert_ne!(
            subset_tag(&[0, 1, 2], &no_pins()),
            subset_tag(&[0, 1, 3], &no_pins())
        );
    }

    #[test]
    fn test_variation_pins_change_tag() {
        let mut bold = BTreeMap::new();
        bold.insert("wght".to_string(), 700.0);
        let mut light = BTreeMap::new();
        light.insert("wght".to_string(), 300.0);

        let glyphs = [0, 10, 11];
        let plain = subset_tag(&glyphs, &no_pins());
        assert_ne!(plain, subset_tag(&glyphs, &bold));
        assert_ne!(subset_tag(&glyphs, &bold), subset_tag(&glyphs, &light));
    }

    #[test]
    fn test_pins_in_tag_order() {
        let mut a = BTreeMap::new();
        a.insert("wght".to_string(), 700.0);
        a.insert("wdth".to_string(), 75.0);

        let digest = md5::compute(b"\x00\x00wdth:75,wght:700").0;
        let expected: String = (0..6)
            .map(|i| (b'A' + ((digest[2 * i] as u32 + digest[2 * i + 1] as u32) % 26) as u8) as char)
            .collect();
        assert_eq!(subset_tag(&[0], &a), expected);
    }
}
