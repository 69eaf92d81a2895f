//! Text and bitmap layers

use heapless::String;

use crate::bitmap::BitmapInfo;
use crate::geometry::{GColor, GRect};

/// Maximum text a layer displays, in bytes
pub const TEXT_CAPACITY: usize = 32;

/// Handle to a layer inside its window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerId(pub(crate) u8);

impl LayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// System fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    #[default]
    Gothic14,
    Gothic18,
    Gothic24,
    Gothic28Bold,
    Bitham42Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Longest prefix of `text` that fits in `max_bytes` without splitting a character
pub fn truncate_str(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// A single-region text display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayer {
    frame: GRect,
    text: String<TEXT_CAPACITY>,
    text_color: GColor,
    background: GColor,
    font: Font,
    alignment: TextAlignment,
    dirty: bool,
}

impl TextLayer {
    /// New layer with black text on white, left aligned, empty
    pub fn new(frame: GRect) -> Self {
        Self {
            frame,
            text: String::new(),
            text_color: GColor::Black,
            background: GColor::White,
            font: Font::default(),
            alignment: TextAlignment::default(),
            dirty: true,
        }
    }

    /// Replace the displayed text, truncating to [`TEXT_CAPACITY`]
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        // Cannot fail: truncated to capacity
        let _ = self.text.push_str(truncate_str(text, TEXT_CAPACITY));
        self.dirty = true;
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn set_text_color(&mut self, color: GColor) {
        self.text_color = color;
        self.dirty = true;
    }

    pub fn set_background_color(&mut self, color: GColor) {
        self.background = color;
        self.dirty = true;
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.dirty = true;
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
        self.dirty = true;
    }

    pub fn frame(&self) -> GRect {
        self.frame
    }

    pub fn text_color(&self) -> GColor {
        self.text_color
    }

    pub fn background_color(&self) -> GColor {
        self.background
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }
}

/// A single-region image display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapLayer {
    frame: GRect,
    bitmap: Option<BitmapInfo>,
    dirty: bool,
}

impl BitmapLayer {
    pub fn new(frame: GRect) -> Self {
        Self {
            frame,
            bitmap: None,
            dirty: true,
        }
    }

    /// Point the layer at a (re)loaded bitmap
    pub fn set_bitmap(&mut self, bitmap: Option<BitmapInfo>) {
        self.bitmap = bitmap;
        self.dirty = true;
    }

    pub fn bitmap(&self) -> Option<&BitmapInfo> {
        self.bitmap.as_ref()
    }

    pub fn frame(&self) -> GRect {
        self.frame
    }
}

/// Any layer a window can hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    Text(TextLayer),
    Bitmap(BitmapLayer),
}

impl Layer {
    pub fn frame(&self) -> GRect {
        match self {
            Layer::Text(layer) => layer.frame,
            Layer::Bitmap(layer) => layer.frame,
        }
    }

    /// Check if the layer needs redrawing
    pub fn is_dirty(&self) -> bool {
        match self {
            Layer::Text(layer) => layer.dirty,
            Layer::Bitmap(layer) => layer.dirty,
        }
    }

    /// Request a redraw without changing content
    pub fn mark_dirty(&mut self) {
        self.set_dirty(true);
    }

    /// Mark layer as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.set_dirty(false);
    }

    fn set_dirty(&mut self, dirty: bool) {
        match self {
            Layer::Text(layer) => layer.dirty = dirty,
            Layer::Bitmap(layer) => layer.dirty = dirty,
        }
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match self {
            Layer::Text(layer) => Some(layer),
            Layer::Bitmap(_) => None,
        }
    }

    pub fn as_bitmap(&self) -> Option<&BitmapLayer> {
        match self {
            Layer::Bitmap(layer) => Some(layer),
            Layer::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_layer_defaults() {
        let layer = TextLayer::new(GRect::new(0, 0, 144, 168));
        assert_eq!(layer.text(), "");
        assert_eq!(layer.text_color(), GColor::Black);
        assert_eq!(layer.background_color(), GColor::White);
        assert_eq!(layer.alignment(), TextAlignment::Left);
        assert!(Layer::Text(layer).is_dirty());
    }

    #[test]
    fn test_set_text_marks_dirty() {
        let mut layer = Layer::Text(TextLayer::new(GRect::default()));
        layer.mark_clean();
        assert!(!layer.is_dirty());

        if let Layer::Text(text) = &mut layer {
            text.set_text("12:00:00");
        }
        assert!(layer.is_dirty());
        assert_eq!(layer.as_text().map(|t| t.text()), Some("12:00:00"));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        // '°' is two bytes, starting at index 4
        assert_eq!(truncate_str("1234\u{00B0}C", 5), "1234");
        assert_eq!(truncate_str("1234\u{00B0}C", 6), "1234\u{00B0}");
        assert_eq!(truncate_str("short", 15), "short");
    }

    #[test]
    fn test_bitmap_layer_set() {
        let mut layer = BitmapLayer::new(GRect::new(32, 10, 80, 80));
        assert!(layer.bitmap().is_none());
        let info = BitmapInfo {
            row_size_bytes: 12,
            info_flags: 0,
            bounds: GRect::new(0, 0, 80, 80),
        };
        layer.set_bitmap(Some(info));
        assert_eq!(layer.bitmap(), Some(&info));
    }

    proptest! {
        #[test]
        fn prop_text_never_exceeds_capacity(text in "\\PC{0,80}") {
            let mut layer = TextLayer::new(GRect::default());
            layer.set_text(&text);
            prop_assert!(layer.text().len() <= TEXT_CAPACITY);
            prop_assert!(text.starts_with(layer.text()));
        }

        #[test]
        fn prop_truncate_is_prefix(text in "\\PC{0,40}", max in 0usize..40) {
            let out = truncate_str(&text, max);
            prop_assert!(out.len() <= max);
            prop_assert!(text.starts_with(out));
        }
    }
}
