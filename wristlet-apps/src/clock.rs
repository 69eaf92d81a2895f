//! Clock display shared by the two messaging demos

use heapless::String;

use wristlet_core::geometry::{GColor, GRect, SCREEN_HEIGHT, SCREEN_WIDTH};
use wristlet_core::input::{ButtonId, ClickBinding, ClickConfig, DEFAULT_REPEAT_INTERVAL_MS};
use wristlet_core::time::{format_time, WallTime};
use wristlet_core::ui::{Font, TextLayer};

/// 24-hour time with seconds
pub const TIME_FORMAT: &str = "%T";

/// "00:00:00"
pub const TIME_TEXT_LEN: usize = 8;

/// Where the time sits on screen
pub const TIME_FRAME: GRect = GRect::new(29, 54, SCREEN_WIDTH - 40, SCREEN_HEIGHT - 54);

/// White bold text on a transparent background
pub fn time_layer() -> TextLayer {
    let mut layer = TextLayer::new(TIME_FRAME);
    layer.set_text_color(GColor::White);
    layer.set_background_color(GColor::Clear);
    layer.set_font(Font::Gothic28Bold);
    layer
}

pub fn time_text(time: &WallTime) -> String<TIME_TEXT_LEN> {
    format_time(TIME_FORMAT, time)
}

/// Up and down send commands, repeating while held
pub fn up_down_clicks() -> ClickConfig {
    let mut config = ClickConfig::new();
    config
        .bind(
            ButtonId::Up,
            ClickBinding::repeating(DEFAULT_REPEAT_INTERVAL_MS),
        )
        .bind(
            ButtonId::Down,
            ClickBinding::repeating(DEFAULT_REPEAT_INTERVAL_MS),
        );
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_text_fills_buffer() {
        let t = WallTime::new(2013, 4, 12, 9, 41, 7).unwrap();
        assert_eq!(time_text(&t).as_str(), "09:41:07");
    }

    #[test]
    fn test_time_frame() {
        assert_eq!(TIME_FRAME, GRect::new(29, 54, 104, 114));
    }
}
