//! Declarative bar-chart layout for weekly sets per muscle.
//!
//! `MuscleBarChart::build` is a pure function of the host configuration. It
//! never caches: every call recomputes the flattened series and the
//! muscle-group boundaries from scratch.

mod projection;
pub mod tooltip;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    BarDatum, ChartConfiguration, ExerciseIndex, Margin, MetricCategory, MuscleGroup, Viewport,
};
use crate::error::ChartResult;

pub use projection::{PlotArea, hover_state, hovered_datum, project_visual_tree};
pub use tooltip::{
    HoverState, MuscleTooltip, TooltipModel, TooltipRow, format_sets, round_one_decimal,
};

/// Fixed y-axis domain in sets per week. Never derived from data.
pub const Y_DOMAIN: (f64, f64) = (0.0, 50.0);
pub const Y_AXIS_LABEL: &str = "Sets per week";
pub const STRENGTH_RANGE: (f64, f64) = (10.0, 20.0);
pub const HYPERTROPHY_RANGE: (f64, f64) = (15.0, 30.0);
pub const STRENGTH_RANGE_LABEL: &str = "Strength range";
pub const HYPERTROPHY_RANGE_LABEL: &str = "Hypertrophy range";
pub const MAX_BAR_WIDTH_PX: f64 = 15.0;
pub const STABILIZER_MAX_BAR_WIDTH_PX: f64 = 8.0;
pub const STACK_ID: &str = "primary";
pub const CHART_MARGIN: Margin = Margin::new(20.0, 30.0, 5.0, 20.0);
pub const X_AXIS_HEIGHT_PX: f64 = 180.0;
pub const LABEL_OFFSET_PX: f64 = 10.0;
/// Dash/gap pattern shared by every reference and divider line.
pub const REFERENCE_DASH: DashPattern = DashPattern {
    dash_px: 3.0,
    gap_px: 3.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashPattern {
    pub dash_px: f64,
    pub gap_px: f64,
}

/// Training-intensity zone a reference marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingZone {
    Strength,
    Hypertrophy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelPosition {
    Center,
    InsideTop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Responsive wrapper around the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub width_percent: f64,
    pub height_percent: f64,
    pub nominal_size: Viewport,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisSpec {
    pub data_key: String,
    pub label_angle_deg: f64,
    pub text_anchor: TextAnchor,
    pub height_px: f64,
    /// `0` shows every category label.
    pub interval: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxisSpec {
    pub domain: (f64, f64),
    pub label: String,
    pub label_angle_deg: f64,
}

/// Vertical dashed line at the first datum of a group after the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDivider {
    pub x: String,
    pub dash: DashPattern,
}

/// Labelled span covering every datum of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupArea {
    pub x1: String,
    pub x2: String,
    pub label: String,
    pub label_position: LabelPosition,
    pub label_offset_px: f64,
    pub overflow_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub zone: TrainingZone,
    pub dash: DashPattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceBand {
    pub y1: f64,
    pub y2: f64,
    pub zone: TrainingZone,
    pub label: String,
    pub label_position: LabelPosition,
    pub label_offset_px: f64,
}

/// One stacked sub-bar layer, drawn for every datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeriesSpec {
    pub category: MetricCategory,
    pub stack_id: String,
    pub max_bar_width_px: f64,
}

/// Everything a renderer needs to draw the chart and answer hover events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualTree {
    pub container: ContainerSpec,
    pub x_axis: XAxisSpec,
    pub y_axis: YAxisSpec,
    /// X-axis domain: one datum per position, group order then intra-group order.
    pub data: Vec<BarDatum>,
    pub group_dividers: Vec<GroupDivider>,
    pub group_areas: Vec<GroupArea>,
    pub reference_lines: Vec<ReferenceLine>,
    pub reference_bands: Vec<ReferenceBand>,
    /// Stacking order, bottom to top.
    pub bars: Vec<BarSeriesSpec>,
    pub tooltip: MuscleTooltip,
}

impl VisualTree {
    #[must_use]
    pub fn datum(&self, name: &str) -> Option<&BarDatum> {
        self.data.iter().find(|datum| datum.name == name)
    }

    /// Tooltip for a pointer at `pointer_x`; `None` outside the plot.
    pub fn tooltip_at(
        &self,
        pointer_x: f64,
        viewport: Viewport,
    ) -> ChartResult<Option<TooltipModel>> {
        let hover = hover_state(self, pointer_x, viewport)?;
        Ok(self.tooltip.render(hover))
    }
}

/// Builder for the muscle sets-per-week chart.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuscleBarChart;

impl MuscleBarChart {
    /// Builds the visual tree for `bar_data` with tooltips backed by `muscles`.
    ///
    /// Fails only when a group is empty or a datum carries a non-finite or
    /// negative count.
    pub fn build(
        muscles: &ExerciseIndex,
        bar_data: &IndexMap<String, MuscleGroup>,
    ) -> ChartResult<VisualTree> {
        let config = ChartConfiguration::new(muscles.clone(), bar_data.clone());
        Self::from_configuration(&config)
    }

    pub fn from_configuration(config: &ChartConfiguration) -> ChartResult<VisualTree> {
        config.validate()?;

        let (group_dividers, group_areas) = group_boundaries(&config.bar_data);
        let data: Vec<BarDatum> = config.datums().cloned().collect();

        debug!(
            groups = config.bar_data.len(),
            datums = data.len(),
            dividers = group_dividers.len(),
            "build muscle bar chart"
        );

        Ok(VisualTree {
            container: ContainerSpec {
                width_percent: 100.0,
                height_percent: 100.0,
                nominal_size: Viewport::default(),
                margin: CHART_MARGIN,
            },
            x_axis: XAxisSpec {
                data_key: "name".to_owned(),
                label_angle_deg: -90.0,
                text_anchor: TextAnchor::End,
                height_px: X_AXIS_HEIGHT_PX,
                interval: 0,
            },
            y_axis: YAxisSpec {
                domain: Y_DOMAIN,
                label: Y_AXIS_LABEL.to_owned(),
                label_angle_deg: -90.0,
            },
            data,
            group_dividers,
            group_areas,
            reference_lines: reference_lines(),
            reference_bands: reference_bands(),
            bars: bar_series(),
            tooltip: MuscleTooltip::new(config.muscles.clone()),
        })
    }
}

fn group_boundaries(
    bar_data: &IndexMap<String, MuscleGroup>,
) -> (Vec<GroupDivider>, Vec<GroupArea>) {
    let mut dividers = Vec::with_capacity(bar_data.len().saturating_sub(1));
    let mut areas = Vec::with_capacity(bar_data.len());

    for (index, (group, datums)) in bar_data.iter().enumerate() {
        let (Some(first), Some(last)) = (datums.first(), datums.last()) else {
            continue;
        };
        if index > 0 {
            dividers.push(GroupDivider {
                x: first.name.clone(),
                dash: REFERENCE_DASH,
            });
        }
        areas.push(GroupArea {
            x1: first.name.clone(),
            x2: last.name.clone(),
            label: group.clone(),
            label_position: LabelPosition::InsideTop,
            label_offset_px: LABEL_OFFSET_PX,
            overflow_visible: true,
        });
    }

    (dividers, areas)
}

fn reference_lines() -> Vec<ReferenceLine> {
    [
        (STRENGTH_RANGE.0, TrainingZone::Strength),
        (HYPERTROPHY_RANGE.0, TrainingZone::Hypertrophy),
        (STRENGTH_RANGE.1, TrainingZone::Strength),
        (HYPERTROPHY_RANGE.1, TrainingZone::Hypertrophy),
    ]
    .into_iter()
    .map(|(y, zone)| ReferenceLine {
        y,
        zone,
        dash: REFERENCE_DASH,
    })
    .collect()
}

fn reference_bands() -> Vec<ReferenceBand> {
    vec![
        ReferenceBand {
            y1: HYPERTROPHY_RANGE.0,
            y2: HYPERTROPHY_RANGE.1,
            zone: TrainingZone::Hypertrophy,
            label: HYPERTROPHY_RANGE_LABEL.to_owned(),
            label_position: LabelPosition::Center,
            label_offset_px: LABEL_OFFSET_PX,
        },
        ReferenceBand {
            y1: STRENGTH_RANGE.0,
            y2: STRENGTH_RANGE.1,
            zone: TrainingZone::Strength,
            label: STRENGTH_RANGE_LABEL.to_owned(),
            label_position: LabelPosition::InsideTop,
            label_offset_px: LABEL_OFFSET_PX,
        },
    ]
}

fn bar_series() -> Vec<BarSeriesSpec> {
    MetricCategory::ALL
        .into_iter()
        .map(|category| BarSeriesSpec {
            category,
            stack_id: STACK_ID.to_owned(),
            max_bar_width_px: match category {
                MetricCategory::Stabilizers => STABILIZER_MAX_BAR_WIDTH_PX,
                _ => MAX_BAR_WIDTH_PX,
            },
        })
        .collect()
}
