use image::RgbImage;

/// One captured frame. A frame is owned by a single loop iteration and
/// dropped at the end of it; neither loop retains frames across ticks.
#[derive(Clone)]
pub struct Frame {
    pub pixels: RgbImage,
    pub source_tag: String,
}

impl Frame {
    pub fn new(pixels: RgbImage, source_tag: impl Into<String>) -> Self {
        Self {
            pixels,
            source_tag: source_tag.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Presentation normalization: the live feed is shown mirrored.
    pub fn mirrored(&self) -> RgbImage {
        image::imageops::flip_horizontal(&self.pixels)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("size", &format!("{}x{}", self.width(), self.height()))
            .field("source_tag", &self.source_tag)
            .finish()
    }
}
