use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one chart draw pass.
///
/// Primitives are painted in layers: rects (bands, group areas, bar
/// segments), then lines (axes, dividers, reference lines), then texts.
/// Backends walk [`RenderFrame::primitives_in_draw_order`] instead of the
/// raw vectors, so labels always end up on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

/// Borrowed view of one primitive in paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramePrimitive<'a> {
    Rect(&'a RectPrimitive),
    Line(&'a LinePrimitive),
    Text(&'a TextPrimitive),
}

impl FramePrimitive<'_> {
    pub fn validate(self) -> ChartResult<()> {
        match self {
            FramePrimitive::Rect(rect) => rect.validate(),
            FramePrimitive::Line(line) => line.validate(),
            FramePrimitive::Text(text) => text.validate(),
        }
    }
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Every primitive, rect layer first and text layer last. Insertion
    /// order is kept within a layer.
    pub fn primitives_in_draw_order(&self) -> impl Iterator<Item = FramePrimitive<'_>> {
        self.rects
            .iter()
            .map(FramePrimitive::Rect)
            .chain(self.lines.iter().map(FramePrimitive::Line))
            .chain(self.texts.iter().map(FramePrimitive::Text))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.primitives_in_draw_order()
            .try_for_each(FramePrimitive::validate)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.texts.is_empty()
    }
}
