use indexmap::IndexMap;
use tracing::debug;

use crate::chart::{VisualTree, project_visual_tree};
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{NullRenderer, RenderFrame, Renderer};

use super::MountHost;

/// What currently occupies one mount point.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedChart {
    pub tree: VisualTree,
    pub frame: RenderFrame,
}

/// Headless host keeping mount points in memory.
///
/// Rendering lays the tree out for the host viewport and hands the frame to
/// the wrapped `Renderer` before recording it.
#[derive(Debug)]
pub struct InMemoryHost<R: Renderer = NullRenderer> {
    viewport: Viewport,
    renderer: R,
    mount_points: IndexMap<String, Option<MountedChart>>,
}

impl InMemoryHost<NullRenderer> {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self::with_renderer(viewport, NullRenderer::default())
    }
}

impl<R: Renderer> InMemoryHost<R> {
    #[must_use]
    pub fn with_renderer(viewport: Viewport, renderer: R) -> Self {
        Self {
            viewport,
            renderer,
            mount_points: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Creates an empty mount point. Existing content is kept.
    pub fn insert_mount_point(&mut self, mount_point_id: impl Into<String>) {
        self.mount_points.entry(mount_point_id.into()).or_insert(None);
    }

    /// Removes the mount point together with anything mounted in it.
    pub fn remove_mount_point(&mut self, mount_point_id: &str) -> Option<MountedChart> {
        self.mount_points.shift_remove(mount_point_id).flatten()
    }

    #[must_use]
    pub fn mounted(&self, mount_point_id: &str) -> Option<&MountedChart> {
        self.mount_points.get(mount_point_id)?.as_ref()
    }
}

impl<R: Renderer> MountHost for InMemoryHost<R> {
    fn has_mount_point(&self, mount_point_id: &str) -> bool {
        self.mount_points.contains_key(mount_point_id)
    }

    fn render_into(&mut self, mount_point_id: &str, tree: &VisualTree) -> ChartResult<()> {
        if !self.mount_points.contains_key(mount_point_id) {
            return Err(ChartError::MountPointMissing(mount_point_id.to_owned()));
        }

        let frame = project_visual_tree(tree, self.viewport)?;
        self.renderer.render(&frame)?;
        debug!(
            mount_point_id,
            lines = frame.lines.len(),
            rects = frame.rects.len(),
            texts = frame.texts.len(),
            "rendered into in-memory mount point"
        );
        self.mount_points.insert(
            mount_point_id.to_owned(),
            Some(MountedChart {
                tree: tree.clone(),
                frame,
            }),
        );
        Ok(())
    }
}
