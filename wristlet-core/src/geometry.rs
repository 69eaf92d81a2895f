//! Screen geometry and colours

/// Display width in pixels
pub const SCREEN_WIDTH: i16 = 144;

/// Display height in pixels
pub const SCREEN_HEIGHT: i16 = 168;

/// Height of the status bar shown above non-fullscreen windows
pub const STATUS_BAR_HEIGHT: i16 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GPoint {
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GSize {
    pub w: i16,
    pub h: i16,
}

/// Rectangle in window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GRect {
    pub origin: GPoint,
    pub size: GSize,
}

impl GRect {
    pub const fn new(x: i16, y: i16, w: i16, h: i16) -> Self {
        Self {
            origin: GPoint { x, y },
            size: GSize { w, h },
        }
    }

    /// Full window frame, with or without the status bar
    pub const fn window_frame(fullscreen: bool) -> Self {
        if fullscreen {
            Self::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT)
        } else {
            Self::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT - STATUS_BAR_HEIGHT)
        }
    }

    /// Returns true if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &GRect) -> bool {
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && other.origin.x + other.size.w <= self.origin.x + self.size.w
            && other.origin.y + other.size.h <= self.origin.y + self.size.h
    }
}

/// 1-bit display colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GColor {
    #[default]
    Clear,
    Black,
    White,
}
