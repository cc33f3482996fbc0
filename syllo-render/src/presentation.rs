use syllo_core::Slot;
use tiny_skia::Color;

/// Styling handed to the renderer once; nothing else holds presentation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub background: [u8; 4],
    pub text: [u8; 4],
    pub large_px: f32,
    pub small_px: f32,
    /// Top-left corner of stimulus images, in pixels.
    pub image_origin: (i32, i32),
    /// Vertical position of the id entry text, as a fraction of the height.
    pub entry_y: f32,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            background: [255, 255, 255, 255],
            text: [0, 0, 0, 255],
            large_px: 56.0,
            small_px: 28.0,
            image_origin: (0, 50),
            entry_y: 0.5,
        }
    }
}

impl Presentation {
    /// Vertical centre of a text slot as a fraction of the screen height.
    pub fn slot_y(&self, slot: Slot) -> f32 {
        match slot {
            Slot::Header => 0.1,
            Slot::Title => 0.2,
            Slot::Center => 0.5,
            Slot::BelowCenter => 0.6,
            Slot::Footer => 0.8,
        }
    }

    pub fn font_px(&self, large: bool) -> f32 {
        if large { self.large_px } else { self.small_px }
    }

    pub fn background_color(&self) -> Color {
        let [r, g, b, a] = self.background;
        Color::from_rgba8(r, g, b, a)
    }

    pub fn text_color(&self) -> Color {
        let [r, g, b, a] = self.text;
        Color::from_rgba8(r, g, b, a)
    }
}
