use crate::render::Color;

/// Line colors handed out to songs.
pub const SONG_PALETTE: [Color; 12] = [
    Color::rgb8(0xe6, 0x19, 0x4b),
    Color::rgb8(0x3c, 0xb4, 0x4b),
    Color::rgb8(0x43, 0x63, 0xd8),
    Color::rgb8(0xf5, 0x82, 0x31),
    Color::rgb8(0x91, 0x1e, 0xb4),
    Color::rgb8(0x46, 0xf0, 0xf0),
    Color::rgb8(0xf0, 0x32, 0xe6),
    Color::rgb8(0xbc, 0xf6, 0x0c),
    Color::rgb8(0x00, 0x80, 0x80),
    Color::rgb8(0x9a, 0x63, 0x24),
    Color::rgb8(0x80, 0x00, 0x00),
    Color::rgb8(0x00, 0x00, 0x75),
];

/// Stable color for a song: the same name maps to the same color on every
/// page load and in every widget.
#[must_use]
pub fn color_for_song(name: &str) -> Color {
    SONG_PALETTE[palette_index(name, SONG_PALETTE.len())]
}

/// 31-multiplier rolling hash over UTF-16 code units, wrapped to `i32`.
fn palette_index(name: &str, palette_len: usize) -> usize {
    let hash = name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    hash.unsigned_abs() as usize % palette_len
}
