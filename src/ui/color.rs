// src/ui/color.rs

/// Accepts "#rgb", "#rgba", "#rrggbb", "#rrggbbaa" (or without '#').
/// Channels are returned in sRGB 0..1, unconverted, since cards are styled
/// with CSS-like colours. Returns `None` on malformed input.
pub fn try_rgba_hex(s: &str) -> Option<[f32; 4]> {
    #[inline(always)] fn nib(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(10 + (b - b'a')),
            b'A'..=b'F' => Some(10 + (b - b'A')),
            _ => None,
        }
    }
    #[inline(always)] fn byte2(h: u8, l: u8) -> Option<u8> { Some((nib(h)? << 4) | nib(l)?) }
    #[inline(always)] fn rep(n: u8) -> Option<u8> { let n = nib(n)?; Some((n << 4) | n) }

    let bytes = s.trim().as_bytes();
    let off = (bytes.first() == Some(&b'#')) as usize;
    let b = &bytes[off..];

    let (r, g, bl, a) = match b.len() {
        3 => (rep(b[0])?, rep(b[1])?, rep(b[2])?, 0xFF),
        4 => (rep(b[0])?, rep(b[1])?, rep(b[2])?, rep(b[3])?),
        6 => (byte2(b[0], b[1])?, byte2(b[2], b[3])?, byte2(b[4], b[5])?, 0xFF),
        8 => (byte2(b[0], b[1])?, byte2(b[2], b[3])?, byte2(b[4], b[5])?, byte2(b[6], b[7])?),
        _ => return None,
    };

    Some([
        r as f32 / 255.0,
        g as f32 / 255.0,
        bl as f32 / 255.0,
        a as f32 / 255.0,
    ])
}

/// Like [`try_rgba_hex`] but falls back to `fallback` on bad input.
pub fn rgba_hex_or(s: &str, fallback: [f32; 4]) -> [f32; 4] {
    match try_rgba_hex(s) {
        Some(c) => c,
        None => {
            log::warn!("Invalid colour '{}', using fallback.", s);
            fallback
        }
    }
}

/// Replace the alpha channel.
#[inline(always)]
pub fn with_alpha(c: [f32; 4], a: f32) -> [f32; 4] {
    [c[0], c[1], c[2], a.clamp(0.0, 1.0)]
}
