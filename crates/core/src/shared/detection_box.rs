/// An axis-aligned face bounding box in frame pixel coordinates.
///
/// Produced fresh per frame by a detector and never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DetectionBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersects the box with a `frame_w` x `frame_h` frame.
    ///
    /// Returns `None` when nothing of the box is visible.
    pub fn clamp_to(&self, frame_w: u32, frame_h: u32) -> Option<DetectionBox> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x as i64 + self.width as i64).min(frame_w as i64);
        let y2 = (self.y as i64 + self.height as i64).min(frame_h as i64);
        if x2 <= x1 as i64 || y2 <= y1 as i64 {
            return None;
        }
        Some(DetectionBox {
            x: x1,
            y: y1,
            width: (x2 - x1 as i64) as u32,
            height: (y2 - y1 as i64) as u32,
        })
    }
}
