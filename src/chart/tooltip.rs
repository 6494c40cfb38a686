//! Hover tooltip: per-category set counts with contributing exercises.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{BarDatum, ExerciseIndex, MetricCategory, lookup_exercises};

/// Rounds half away from zero at one decimal digit.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `"<value> sets"` with `value` rounded to one decimal.
///
/// Whole numbers print without a fractional part (`"3 sets"`).
#[must_use]
pub fn format_sets(value: f64) -> String {
    let rounded = round_one_decimal(value);
    // Normalize -0.0.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded} sets")
}

/// One tooltip table row.
///
/// The trailing total row has no category, no label and no exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub category: Option<MetricCategory>,
    pub label: Option<String>,
    pub exercises: Vec<String>,
    /// Rounded display value.
    pub value: f64,
    pub text: String,
}

impl TooltipRow {
    #[must_use]
    pub fn is_total(&self) -> bool {
        self.category.is_none()
    }
}

/// Tooltip content for one hovered datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipModel {
    pub title: String,
    pub rows: SmallVec<[TooltipRow; 5]>,
}

impl TooltipModel {
    /// Category rows, excluding the total.
    pub fn category_rows(&self) -> impl Iterator<Item = &TooltipRow> {
        self.rows.iter().filter(|row| !row.is_total())
    }

    #[must_use]
    pub fn total_row(&self) -> Option<&TooltipRow> {
        self.rows.last().filter(|row| row.is_total())
    }
}

/// Pointer interaction state driving the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HoverState<'a> {
    /// No pointer interaction with the plot.
    #[default]
    Idle,
    /// Pointer over the plot; `payload` is the datum under it, if any.
    Active { payload: Option<&'a BarDatum> },
}

impl<'a> HoverState<'a> {
    #[must_use]
    pub fn over(datum: &'a BarDatum) -> Self {
        HoverState::Active {
            payload: Some(datum),
        }
    }

    /// Datum to describe, present only when active with a payload.
    #[must_use]
    pub fn payload(self) -> Option<&'a BarDatum> {
        match self {
            HoverState::Idle => None,
            HoverState::Active { payload } => payload,
        }
    }
}

/// Tooltip renderer bound to the exercise lookup of one chart build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuscleTooltip {
    muscles: ExerciseIndex,
}

impl MuscleTooltip {
    #[must_use]
    pub fn new(muscles: ExerciseIndex) -> Self {
        Self { muscles }
    }

    /// Builds the tooltip for the hovered datum; `None` while idle or
    /// when the interaction carries no payload.
    ///
    /// Categories with a zero count are omitted. The total is summed from raw
    /// counts and rounded on its own, so it can differ from the sum of the
    /// displayed row values.
    #[must_use]
    pub fn render(&self, hover: HoverState<'_>) -> Option<TooltipModel> {
        let datum = hover.payload()?;

        let mut rows: SmallVec<[TooltipRow; 5]> = MetricCategory::ALL
            .into_iter()
            .filter(|category| datum.count(*category) > 0.0)
            .map(|category| {
                let value = datum.count(category);
                TooltipRow {
                    category: Some(category),
                    label: Some(category.label().to_owned()),
                    exercises: lookup_exercises(&self.muscles, &datum.name, category)
                        .map(<[String]>::to_vec)
                        .unwrap_or_default(),
                    value: round_one_decimal(value),
                    text: format_sets(value),
                }
            })
            .collect();

        let total = datum.total();
        rows.push(TooltipRow {
            category: None,
            label: None,
            exercises: Vec::new(),
            value: round_one_decimal(total),
            text: format_sets(total),
        });

        Some(TooltipModel {
            title: datum.name.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{HoverState, MuscleTooltip, format_sets, round_one_decimal};
    use crate::core::{BarDatum, ExerciseIndex, ExerciseSet, MetricCategory};

    #[test]
    fn idle_hover_renders_nothing() {
        let tooltip = MuscleTooltip::default();
        assert!(tooltip.render(HoverState::Idle).is_none());
        assert!(
            tooltip
                .render(HoverState::Active { payload: None })
                .is_none()
        );
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_one_decimal(3.25), 3.3);
        assert_eq!(round_one_decimal(1.05), 1.1);
        assert_eq!(round_one_decimal(2.04), 2.0);
        assert_eq!(round_one_decimal(0.0), 0.0);
        assert_eq!(format_sets(3.0), "3 sets");
        assert_eq!(format_sets(4.3), "4.3 sets");
    }

    #[test]
    fn zero_categories_are_omitted() {
        let datum = BarDatum::new("Glutes")
            .with_count(MetricCategory::TargetCompound, 3.25)
            .with_count(MetricCategory::Stabilizers, 1.05);
        let model = MuscleTooltip::default()
            .render(HoverState::over(&datum))
            .expect("tooltip");

        let texts: Vec<(Option<&str>, &str)> = model
            .rows
            .iter()
            .map(|row| (row.label.as_deref(), row.text.as_str()))
            .collect();
        assert_eq!(
            texts,
            vec![
                (Some("Targeted (compound)"), "3.3 sets"),
                (Some("Stabilizers"), "1.1 sets"),
                (None, "4.3 sets"),
            ]
        );
        assert_eq!(model.category_rows().count(), 2);
    }

    #[test]
    fn exercise_lookup_miss_yields_empty_list() {
        let mut muscles = ExerciseIndex::new();
        muscles.insert(
            "Biceps".to_owned(),
            ExerciseSet::default()
                .with_exercises(MetricCategory::TargetIsolation, ["Curl", "Hammer curl"]),
        );
        let tooltip = MuscleTooltip::new(muscles);

        let biceps = BarDatum::new("Biceps")
            .with_count(MetricCategory::TargetIsolation, 6.0)
            .with_count(MetricCategory::Synergists, 2.0);
        let model = tooltip.render(HoverState::over(&biceps)).expect("tooltip");
        assert_eq!(model.rows[0].exercises, vec!["Curl", "Hammer curl"]);
        assert!(model.rows[1].exercises.is_empty());

        let calves = BarDatum::new("Calves").with_count(MetricCategory::TargetIsolation, 4.0);
        let model = tooltip.render(HoverState::over(&calves)).expect("tooltip");
        assert!(model.rows[0].exercises.is_empty());
    }

    #[test]
    fn total_row_is_always_present() {
        let model = MuscleTooltip::default()
            .render(HoverState::over(&BarDatum::new("Neck")))
            .expect("tooltip");
        assert_eq!(model.rows.len(), 1);
        let total = model.total_row().expect("total");
        assert!(total.label.is_none());
        assert!(total.exercises.is_empty());
        assert_eq!(total.text, "0 sets");
    }
}
