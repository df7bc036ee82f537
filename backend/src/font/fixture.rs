//! Small TrueType fonts assembled in memory for subsetting tests.
//!
//! Glyph 0 is an empty `.notdef`, glyph `i` (1-based) is a square outline for
//! the `i`-th char. Colour fonts add one layer glyph per char plus `COLR` v0
//! and a two-entry `CPAL`.

const UNITS_PER_EM: u16 = 1000;
const GLYPH_LEN: usize = 36;

pub fn outline_font(chars: &[char]) -> Vec<u8> {
    build(chars, false)
}

pub fn color_font(chars: &[char]) -> Vec<u8> {
    build(chars, true)
}

fn build(chars: &[char], color: bool) -> Vec<u8> {
    let n = chars.len() as u16;
    let num_glyphs = if color { 1 + 2 * n } else { 1 + n };

    let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
        (*b"head", head()),
        (*b"hhea", hhea(num_glyphs)),
        (*b"maxp", maxp(num_glyphs)),
        (*b"OS/2", os2()),
        (*b"hmtx", hmtx(num_glyphs)),
        (*b"cmap", cmap(chars)),
        (*b"loca", loca(num_glyphs)),
        (*b"glyf", glyf(num_glyphs)),
    ];
    if color {
        tables.push((*b"COLR", colr(n)));
        tables.push((*b"CPAL", cpal()));
    }

    assemble(tables)
}

fn put16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn set16(out: &mut [u8], at: usize, value: u16) {
    out[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

fn head() -> Vec<u8> {
    let mut t = vec![0u8; 54];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    t[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    set16(&mut t, 18, UNITS_PER_EM);
    set16(&mut t, 36, 100);
    set16(&mut t, 40, 900);
    set16(&mut t, 42, 800);
    set16(&mut t, 48, 2);
    // long loca offsets
    set16(&mut t, 50, 1);
    t
}

fn hhea(num_glyphs: u16) -> Vec<u8> {
    let mut t = vec![0u8; 36];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    set16(&mut t, 4, 800);
    set16(&mut t, 6, (-200i16) as u16);
    set16(&mut t, 10, UNITS_PER_EM);
    set16(&mut t, 34, num_glyphs);
    t
}

fn maxp(num_glyphs: u16) -> Vec<u8> {
    let mut t = vec![0u8; 32];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    set16(&mut t, 4, num_glyphs);
    set16(&mut t, 6, 4);
    set16(&mut t, 8, 1);
    set16(&mut t, 14, 2);
    t
}

fn os2() -> Vec<u8> {
    let mut t = vec![0u8; 96];
    set16(&mut t, 0, 4);
    set16(&mut t, 2, UNITS_PER_EM);
    set16(&mut t, 4, 400);
    set16(&mut t, 6, 5);
    set16(&mut t, 68, 800);
    set16(&mut t, 70, (-200i16) as u16);
    set16(&mut t, 74, 800);
    set16(&mut t, 76, 200);
    t
}

fn hmtx(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    for gid in 0..num_glyphs {
        put16(&mut t, UNITS_PER_EM);
        put16(&mut t, if gid == 0 { 0 } else { 100 });
    }
    t
}

/// A single (3,10) format 12 subtable, one group per char
fn cmap(chars: &[char]) -> Vec<u8> {
    let mut groups: Vec<(u32, u32)> = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| (u32::from(c), i as u32 + 1))
        .collect();
    groups.sort_unstable();

    let mut t = Vec::new();
    put16(&mut t, 0);
    put16(&mut t, 1);
    put16(&mut t, 3);
    put16(&mut t, 10);
    put32(&mut t, 12);

    put16(&mut t, 12);
    put16(&mut t, 0);
    put32(&mut t, 16 + 12 * groups.len() as u32);
    put32(&mut t, 0);
    put32(&mut t, groups.len() as u32);
    for (code, glyph) in groups {
        put32(&mut t, code);
        put32(&mut t, code);
        put32(&mut t, glyph);
    }
    t
}

fn loca(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    put32(&mut t, 0);
    for gid in 1..=num_glyphs as usize {
        put32(&mut t, ((gid - 1) * GLYPH_LEN) as u32);
    }
    t
}

/// Every glyph but `.notdef` is the same square
fn glyf(num_glyphs: u16) -> Vec<u8> {
    let mut square = Vec::new();
    put16(&mut square, 1);
    for v in [100, 0, 900, 800] {
        put16(&mut square, v);
    }
    put16(&mut square, 3);
    put16(&mut square, 0);
    square.extend_from_slice(&[0x01; 4]);
    for dx in [100i16, 0, 800, 0] {
        put16(&mut square, dx as u16);
    }
    for dy in [0i16, 800, 0, -800] {
        put16(&mut square, dy as u16);
    }
    square.resize(GLYPH_LEN, 0);

    square.repeat(num_glyphs as usize - 1)
}

fn colr(n: u16) -> Vec<u8> {
    let mut t = Vec::new();
    put16(&mut t, 0);
    put16(&mut t, n);
    put32(&mut t, 14);
    put32(&mut t, 14 + 6 * u32::from(n));
    put16(&mut t, n);
    for i in 1..=n {
        put16(&mut t, i);
        put16(&mut t, i - 1);
        put16(&mut t, 1);
    }
    for i in 1..=n {
        put16(&mut t, n + i);
        put16(&mut t, (i - 1) % 2);
    }
    t
}

fn cpal() -> Vec<u8> {
    let mut t = Vec::new();
    put16(&mut t, 0);
    put16(&mut t, 2);
    put16(&mut t, 1);
    put16(&mut t, 2);
    put32(&mut t, 14);
    put16(&mut t, 0);
    // BGRA
    t.extend_from_slice(&[0x00, 0xCC, 0xFF, 0xFF]);
    t.extend_from_slice(&[0x22, 0x44, 0xFF, 0xFF]);
    t
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn assemble(mut tables: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    tables.sort_by_key(|(tag, _)| *tag);

    let count = tables.len() as u16;
    let entry_selector = 15 - count.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * 16;

    let mut out = Vec::new();
    put32(&mut out, 0x0001_0000);
    put16(&mut out, count);
    put16(&mut out, search_range);
    put16(&mut out, entry_selector);
    put16(&mut out, count * 16 - search_range);

    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in &tables {
        out.extend_from_slice(tag);
        put32(&mut out, checksum(data));
        put32(&mut out, offset as u32);
        put32(&mut out, data.len() as u32);
        offset += (data.len() + 3) & !3;
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        out.resize((out.len() + 3) & !3, 0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_parses_with_expected_glyphs() {
        let font = color_font(&['😀', '🎉']);
        let face = ttf_parser::Face::parse(&font, 0).unwrap();

        assert_eq!(face.number_of_glyphs(), 5);
        assert_eq!(face.glyph_index('😀').map(|g| g.0), Some(1));
        assert_eq!(face.glyph_index('🎉').map(|g| g.0), Some(2));
        assert!(face.glyph_bounding_box(ttf_parser::GlyphId(1)).is_some());
        assert!(face.is_color_glyph(ttf_parser::GlyphId(2)));
        assert!(!face.is_color_glyph(ttf_parser::GlyphId(3)));
    }
}
