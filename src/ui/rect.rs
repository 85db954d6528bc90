//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Check if point is inside (half-open, so adjacent rects never both claim a point)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// Split at a fixed width from the left, returns (left, right)
    pub fn split_h_px(&self, pixels: f32) -> (Self, Self) {
        let split_x = pixels.clamp(0.0, self.w);
        (
            Self::new(self.x, self.y, split_x, self.h),
            Self::new(self.x + split_x, self.y, self.w - split_x, self.h),
        )
    }

    /// Split at a fixed width from the right, returns (left, right)
    pub fn split_h_px_right(&self, pixels: f32) -> (Self, Self) {
        self.split_h_px(self.w - pixels.clamp(0.0, self.w))
    }

    /// Split at a fixed height from the top, returns (top, bottom)
    pub fn split_v_px(&self, pixels: f32) -> (Self, Self) {
        let split_y = pixels.clamp(0.0, self.h);
        (
            Self::new(self.x, self.y, self.w, split_y),
            Self::new(self.x, self.y + split_y, self.w, self.h - split_y),
        )
    }

    /// Split at a fixed height from the bottom, returns (top, bottom)
    pub fn split_v_px_bottom(&self, pixels: f32) -> (Self, Self) {
        self.split_v_px(self.h - pixels.clamp(0.0, self.h))
    }

    /// Row `index` of a vertical list with fixed row height
    pub fn row(&self, index: usize, height: f32) -> Self {
        Self::new(self.x, self.y + index as f32 * height, self.w, height)
    }
}
