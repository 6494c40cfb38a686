use tracing::trace;

use crate::core::{BarDatum, CategoryScale, LinearScale, MetricCategory, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::{DashPattern, HoverState, LabelPosition, TrainingZone, VisualTree};

const Y_AXIS_WIDTH_PX: f64 = 60.0;
const Y_TICK_STEP: f64 = 10.0;
const TICK_LENGTH_PX: f64 = 6.0;
const AXIS_FONT_SIZE_PX: f64 = 11.0;
const LABEL_FONT_SIZE_PX: f64 = 12.0;
/// Share of each band left empty on both sides of the stacked bar.
const BAND_GAP_RATIO: f64 = 0.1;

const AXIS_COLOR: Color = Color::rgb(0.4, 0.4, 0.4);
const TEXT_COLOR: Color = Color::rgb(0.2, 0.2, 0.2);
const DIVIDER_COLOR: Color = Color::rgb(0.55, 0.55, 0.55);
const GROUP_AREA_COLOR: Color = Color::rgba(0.5, 0.5, 0.5, 0.06);
const STRENGTH_COLOR: Color = Color::rgb(0.80, 0.36, 0.27);
const HYPERTROPHY_COLOR: Color = Color::rgb(0.25, 0.52, 0.78);

fn category_color(category: MetricCategory) -> Color {
    match category {
        MetricCategory::TargetIsolation => Color::rgb(0.16, 0.44, 0.69),
        MetricCategory::TargetCompound => Color::rgb(0.33, 0.63, 0.85),
        MetricCategory::Synergists => Color::rgb(0.55, 0.76, 0.45),
        MetricCategory::Stabilizers => Color::rgb(0.94, 0.71, 0.29),
    }
}

fn zone_color(zone: TrainingZone) -> Color {
    match zone {
        TrainingZone::Strength => STRENGTH_COLOR,
        TrainingZone::Hypertrophy => HYPERTROPHY_COLOR,
    }
}

fn dashed(dash: DashPattern) -> LineStrokeStyle {
    LineStrokeStyle::Dashed {
        dash_px: dash.dash_px,
        gap_px: dash.gap_px,
    }
}

/// Pixel-space plot rectangle inside the chart margins and axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn for_tree(tree: &VisualTree, viewport: Viewport) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let margin = tree.container.margin;
        let area = Self {
            left: margin.left + Y_AXIS_WIDTH_PX,
            top: margin.top,
            right: f64::from(viewport.width) - margin.right,
            bottom: f64::from(viewport.height) - margin.bottom - tree.x_axis.height_px,
        };
        if area.right <= area.left || area.bottom <= area.top {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(area)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }
}

struct Scales {
    plot: PlotArea,
    x: CategoryScale,
    y: LinearScale,
}

impl Scales {
    fn new(tree: &VisualTree, viewport: Viewport) -> ChartResult<Self> {
        let plot = PlotArea::for_tree(tree, viewport)?;
        let x = CategoryScale::new(
            tree.data.iter().map(|datum| datum.name.as_str()),
            plot.left,
            plot.right,
        )?;
        let (domain_start, domain_end) = tree.y_axis.domain;
        let y = LinearScale::new(domain_start, domain_end)?.with_range(plot.bottom, plot.top)?;
        Ok(Self { plot, x, y })
    }

    fn y_px(&self, value: f64) -> ChartResult<f64> {
        self.y.domain_to_pixel(self.y.clamp(value))
    }
}

/// Datum whose x-axis band contains `pointer_x`.
pub fn hovered_datum(
    tree: &VisualTree,
    pointer_x: f64,
    viewport: Viewport,
) -> ChartResult<Option<&BarDatum>> {
    let scales = Scales::new(tree, viewport)?;
    Ok(scales
        .x
        .index_at(pointer_x)
        .and_then(|index| tree.data.get(index)))
}

/// Interaction state for a pointer at `pointer_x`: idle outside the plot,
/// active inside it with the datum under the pointer as payload.
pub fn hover_state(
    tree: &VisualTree,
    pointer_x: f64,
    viewport: Viewport,
) -> ChartResult<HoverState<'_>> {
    let scales = Scales::new(tree, viewport)?;
    if !pointer_x.is_finite() || pointer_x < scales.plot.left || pointer_x >= scales.plot.right {
        return Ok(HoverState::Idle);
    }
    Ok(HoverState::Active {
        payload: scales
            .x
            .index_at(pointer_x)
            .and_then(|index| tree.data.get(index)),
    })
}

/// Lays the visual tree out into pixel-space primitives for `viewport`.
///
/// Bar segments are clipped to the y-axis domain here; the chart builder
/// passes counts through untouched.
pub fn project_visual_tree(tree: &VisualTree, viewport: Viewport) -> ChartResult<RenderFrame> {
    let scales = Scales::new(tree, viewport)?;
    let plot = scales.plot;
    let mut frame = RenderFrame::new(viewport);

    for band in &tree.reference_bands {
        let top = scales.y_px(band.y1.max(band.y2))?;
        let bottom = scales.y_px(band.y1.min(band.y2))?;
        let color = zone_color(band.zone);
        frame.rects.push(RectPrimitive::new(
            plot.left,
            top,
            plot.width(),
            bottom - top,
            color.with_alpha(0.12),
        ));
        let label_y = match band.label_position {
            LabelPosition::Center => (top + bottom) * 0.5,
            LabelPosition::InsideTop => top + band.label_offset_px,
        };
        frame.texts.push(TextPrimitive::new(
            band.label.clone(),
            (plot.left + plot.right) * 0.5,
            label_y,
            LABEL_FONT_SIZE_PX,
            color,
            TextHAlign::Center,
        ));
    }

    for area in &tree.group_areas {
        let (Some(first), Some(last)) = (scales.x.index_of(&area.x1), scales.x.index_of(&area.x2))
        else {
            continue;
        };
        let (Some(left), Some(last_start)) = (scales.x.band_start(first), scales.x.band_start(last))
        else {
            continue;
        };
        let right = last_start + scales.x.bandwidth();
        frame.rects.push(RectPrimitive::new(
            left,
            plot.top,
            right - left,
            plot.height(),
            GROUP_AREA_COLOR,
        ));
        if area.label.is_empty() {
            continue;
        }
        let label_y = match area.label_position {
            LabelPosition::Center => (plot.top + plot.bottom) * 0.5,
            LabelPosition::InsideTop => plot.top + area.label_offset_px,
        };
        frame.texts.push(TextPrimitive::new(
            area.label.clone(),
            (left + right) * 0.5,
            label_y,
            LABEL_FONT_SIZE_PX,
            TEXT_COLOR,
            TextHAlign::Center,
        ));
    }

    project_bars(tree, &scales, &mut frame)?;

    for divider in &tree.group_dividers {
        let Some(x) = scales
            .x
            .index_of(&divider.x)
            .and_then(|index| scales.x.band_start(index))
        else {
            continue;
        };
        frame.lines.push(
            LinePrimitive::new(x, plot.top, x, plot.bottom, 1.0, DIVIDER_COLOR)
                .with_stroke_style(dashed(divider.dash)),
        );
    }

    for line in &tree.reference_lines {
        let y = scales.y_px(line.y)?;
        frame.lines.push(
            LinePrimitive::new(plot.left, y, plot.right, y, 1.0, zone_color(line.zone))
                .with_stroke_style(dashed(line.dash)),
        );
    }

    project_axes(tree, &scales, &mut frame)?;

    trace!(
        lines = frame.lines.len(),
        rects = frame.rects.len(),
        texts = frame.texts.len(),
        "project muscle bar chart"
    );
    Ok(frame)
}

fn project_bars(tree: &VisualTree, scales: &Scales, frame: &mut RenderFrame) -> ChartResult<()> {
    let slot_width = scales.x.bandwidth() * (1.0 - 2.0 * BAND_GAP_RATIO);
    for (index, datum) in tree.data.iter().enumerate() {
        let Some(center) = scales.x.center(index) else {
            continue;
        };
        let mut stacked = 0.0;
        for series in &tree.bars {
            let value = datum.count(series.category);
            let base = stacked;
            stacked += value;

            let top = scales.y_px(stacked)?;
            let bottom = scales.y_px(base)?;
            let height = bottom - top;
            if height <= 0.0 {
                continue;
            }
            let width = slot_width.min(series.max_bar_width_px);
            frame.rects.push(RectPrimitive::new(
                center - width * 0.5,
                top,
                width,
                height,
                category_color(series.category),
            ));
        }
    }
    Ok(())
}

fn project_axes(tree: &VisualTree, scales: &Scales, frame: &mut RenderFrame) -> ChartResult<()> {
    let plot = scales.plot;
    frame.lines.push(LinePrimitive::new(
        plot.left,
        plot.bottom,
        plot.right,
        plot.bottom,
        1.0,
        AXIS_COLOR,
    ));
    frame.lines.push(LinePrimitive::new(
        plot.left, plot.top, plot.left, plot.bottom, 1.0, AXIS_COLOR,
    ));

    let (domain_start, domain_end) = tree.y_axis.domain;
    let mut tick = domain_start;
    while tick <= domain_end {
        let y = scales.y_px(tick)?;
        frame.lines.push(LinePrimitive::new(
            plot.left - TICK_LENGTH_PX,
            y,
            plot.left,
            y,
            1.0,
            AXIS_COLOR,
        ));
        frame.texts.push(TextPrimitive::new(
            format!("{tick}"),
            plot.left - TICK_LENGTH_PX - 2.0,
            y,
            AXIS_FONT_SIZE_PX,
            TEXT_COLOR,
            TextHAlign::Right,
        ));
        tick += Y_TICK_STEP;
    }
    frame.texts.push(
        TextPrimitive::new(
            tree.y_axis.label.clone(),
            tree.container.margin.left,
            (plot.top + plot.bottom) * 0.5,
            LABEL_FONT_SIZE_PX,
            TEXT_COLOR,
            TextHAlign::Center,
        )
        .rotated(tree.y_axis.label_angle_deg),
    );

    for (index, datum) in tree.data.iter().enumerate() {
        if tree.x_axis.interval > 0 && index % (tree.x_axis.interval + 1) != 0 {
            continue;
        }
        let Some(x) = scales.x.center(index) else {
            continue;
        };
        if datum.name.is_empty() {
            continue;
        }
        frame.texts.push(
            TextPrimitive::new(
                datum.name.clone(),
                x,
                plot.bottom + TICK_LENGTH_PX,
                AXIS_FONT_SIZE_PX,
                TEXT_COLOR,
                TextHAlign::Right,
            )
            .rotated(tree.x_axis.label_angle_deg),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PlotArea, hover_state, hovered_datum, project_visual_tree};
    use crate::chart::{HoverState, MuscleBarChart};
    use crate::core::{BarDatum, ChartConfiguration, MetricCategory, Viewport};
    use approx::assert_relative_eq;

    fn tree() -> crate::chart::VisualTree {
        let config = ChartConfiguration::default()
            .with_group(
                "Arms",
                vec![
                    BarDatum::new("Biceps").with_count(MetricCategory::TargetIsolation, 12.0),
                    BarDatum::new("Triceps").with_count(MetricCategory::TargetCompound, 80.0),
                ],
            )
            .with_group(
                "Legs",
                vec![
                    BarDatum::new("Quads")
                        .with_count(MetricCategory::TargetCompound, 10.0)
                        .with_count(MetricCategory::Stabilizers, 2.0),
                ],
            );
        MuscleBarChart::from_configuration(&config).expect("tree")
    }

    #[test]
    fn bars_above_domain_are_clipped_to_plot_top() {
        let tree = tree();
        let viewport = Viewport::new(800, 600);
        let plot = PlotArea::for_tree(&tree, viewport).expect("plot");
        let frame = project_visual_tree(&tree, viewport).expect("frame");
        frame.validate().expect("valid frame");

        for rect in &frame.rects {
            assert!(rect.y >= plot.top - 1e-9);
            assert!(rect.bottom() <= plot.bottom + 1e-9);
        }
    }

    #[test]
    fn zero_segments_produce_no_rects_and_caps_apply() {
        let tree = tree();
        let viewport = Viewport::new(800, 600);
        let frame = project_visual_tree(&tree, viewport).expect("frame");
        let bar_rects: Vec<_> = frame
            .rects
            .iter()
            .filter(|rect| rect.width <= 15.0 + 1e-9)
            .collect();
        // Biceps isolation, Triceps compound, Quads compound + stabilizers.
        assert_eq!(bar_rects.len(), 4);
        assert!(bar_rects.iter().any(|rect| (rect.width - 8.0).abs() < 1e-9));
    }

    #[test]
    fn hover_resolves_datum_under_pointer() {
        let tree = tree();
        let viewport = Viewport::new(800, 600);
        let plot = PlotArea::for_tree(&tree, viewport).expect("plot");
        let band = plot.width() / 3.0;

        let hovered = hovered_datum(&tree, plot.left + band * 1.5, viewport).expect("hover");
        assert_eq!(hovered.map(|d| d.name.as_str()), Some("Triceps"));
        let outside = hovered_datum(&tree, plot.left - 1.0, viewport).expect("hover");
        assert!(outside.is_none());

        let tooltip = tree
            .tooltip_at(plot.left + band * 2.5, viewport)
            .expect("tooltip")
            .expect("active");
        assert_eq!(tooltip.title, "Quads");
        assert_relative_eq!(tooltip.rows.last().expect("total").value, 12.0);
    }

    #[test]
    fn hover_outside_plot_is_idle_and_empty_plot_has_no_payload() {
        let tree = tree();
        let viewport = Viewport::new(800, 600);
        let plot = PlotArea::for_tree(&tree, viewport).expect("plot");
        assert_eq!(
            hover_state(&tree, plot.right + 1.0, viewport).expect("hover"),
            HoverState::Idle
        );
        assert!(tree.tooltip_at(plot.left - 5.0, viewport).expect("tooltip").is_none());

        let empty = MuscleBarChart::from_configuration(&ChartConfiguration::default())
            .expect("tree");
        let hover = hover_state(&empty, plot.left + 10.0, viewport).expect("hover");
        assert_eq!(hover, HoverState::Active { payload: None });
        assert!(empty.tooltip.render(hover).is_none());
    }

    #[test]
    fn viewport_too_small_for_axes_is_rejected() {
        let tree = tree();
        assert!(project_visual_tree(&tree, Viewport::new(800, 150)).is_err());
        assert!(project_visual_tree(&tree, Viewport::new(0, 600)).is_err());
    }
}
