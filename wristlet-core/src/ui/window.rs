//! Top-level window

use heapless::{String, Vec};

use super::layer::{truncate_str, BitmapLayer, Layer, LayerId, TextLayer};
use crate::geometry::{GColor, GRect};
use crate::input::ClickConfig;

/// Maximum layers per window
pub const MAX_LAYERS: usize = 4;

/// Maximum window name length (debug name only)
pub const WINDOW_NAME_LEN: usize = 16;

/// Window construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiError {
    /// Window already holds [`MAX_LAYERS`] layers
    TooManyLayers,
}

/// Full-screen window owning its child layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    name: String<WINDOW_NAME_LEN>,
    background: GColor,
    fullscreen: bool,
    layers: Vec<Layer, MAX_LAYERS>,
    click_config: ClickConfig,
}

impl Window {
    /// Create an empty window with a white background and status bar
    pub fn new(name: &str) -> Self {
        let mut window_name = String::new();
        let _ = window_name.push_str(truncate_str(name, WINDOW_NAME_LEN));
        Self {
            name: window_name,
            background: GColor::White,
            fullscreen: false,
            layers: Vec::new(),
            click_config: ClickConfig::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn set_background_color(&mut self, color: GColor) {
        self.background = color;
    }

    pub fn background_color(&self) -> GColor {
        self.background
    }

    /// Hide the status bar
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Root layer frame
    pub fn frame(&self) -> GRect {
        GRect::window_frame(self.fullscreen)
    }

    pub fn set_click_config(&mut self, config: ClickConfig) {
        self.click_config = config;
    }

    pub fn click_config(&self) -> &ClickConfig {
        &self.click_config
    }

    fn add_layer(&mut self, layer: Layer) -> Result<LayerId, UiError> {
        let id = LayerId(self.layers.len() as u8);
        self.layers.push(layer).map_err(|_| UiError::TooManyLayers)?;
        Ok(id)
    }

    /// Add a text layer on top of the existing ones
    pub fn add_text_layer(&mut self, layer: TextLayer) -> Result<LayerId, UiError> {
        self.add_layer(Layer::Text(layer))
    }

    /// Add a bitmap layer on top of the existing ones
    pub fn add_bitmap_layer(&mut self, layer: BitmapLayer) -> Result<LayerId, UiError> {
        self.add_layer(Layer::Bitmap(layer))
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.index())
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(id.index())
    }

    pub fn text_layer(&self, id: LayerId) -> Option<&TextLayer> {
        self.layer(id).and_then(Layer::as_text)
    }

    pub fn text_layer_mut(&mut self, id: LayerId) -> Option<&mut TextLayer> {
        match self.layer_mut(id)? {
            Layer::Text(layer) => Some(layer),
            Layer::Bitmap(_) => None,
        }
    }

    pub fn bitmap_layer(&self, id: LayerId) -> Option<&BitmapLayer> {
        self.layer(id).and_then(Layer::as_bitmap)
    }

    pub fn bitmap_layer_mut(&mut self, id: LayerId) -> Option<&mut BitmapLayer> {
        match self.layer_mut(id)? {
            Layer::Bitmap(layer) => Some(layer),
            Layer::Text(_) => None,
        }
    }

    /// Mark a layer for redraw on the next render pass
    pub fn mark_dirty(&mut self, id: LayerId) {
        if let Some(layer) = self.layer_mut(id) {
            layer.mark_dirty();
        }
    }

    /// All layers, bottom to top
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Check if any layer needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.layers.iter().any(Layer::is_dirty)
    }

    /// Mark all layers clean (after rendering)
    pub fn mark_clean(&mut self) {
        for layer in &mut self.layers {
            layer.mark_clean();
        }
    }
}
