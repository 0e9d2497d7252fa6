//! The font capability consumed by the text methods.

/// A fixed-width bitmap font. Each glyph is one byte per pixel column, 8 pixels per byte (one
/// page band), LSB at the top.
pub trait Font {
    /// The pixel columns for `code`, or `None` if the font has no glyph for it.
    fn glyph_for(&self, code: u8) -> Option<&[u8]>;
}

impl<'a, F> Font for &'a F
where
    F: Font + ?Sized,
{
    fn glyph_for(&self, code: u8) -> Option<&[u8]> {
        (**self).glyph_for(code)
    }
}
