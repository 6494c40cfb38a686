use crate::error::ChartResult;
use crate::render::{FramePrimitive, RenderFrame, Renderer};

/// Headless renderer: walks the frame in paint order without drawing.
///
/// Frame content is still validated, so invalid geometry fails a mount
/// even without a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_text_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        let (mut rects, mut lines, mut texts) = (0, 0, 0);
        for primitive in frame.primitives_in_draw_order() {
            match primitive {
                FramePrimitive::Rect(_) => rects += 1,
                FramePrimitive::Line(_) => lines += 1,
                FramePrimitive::Text(_) => texts += 1,
            }
        }
        self.last_rect_count = rects;
        self.last_line_count = lines;
        self.last_text_count = texts;
        self.frames_rendered += 1;
        Ok(())
    }
}
