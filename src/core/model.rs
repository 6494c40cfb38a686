use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// One of the four per-muscle set-count metrics, in stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricCategory {
    TargetIsolation,
    TargetCompound,
    Synergists,
    Stabilizers,
}

impl MetricCategory {
    /// Stacking and tooltip display order.
    pub const ALL: [MetricCategory; 4] = [
        MetricCategory::TargetIsolation,
        MetricCategory::TargetCompound,
        MetricCategory::Synergists,
        MetricCategory::Stabilizers,
    ];

    /// Data key as it appears in host JSON.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            MetricCategory::TargetIsolation => "targetIsolation",
            MetricCategory::TargetCompound => "targetCompound",
            MetricCategory::Synergists => "synergists",
            MetricCategory::Stabilizers => "stabilizers",
        }
    }

    /// Human label shown in the tooltip row.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            MetricCategory::TargetIsolation => "Targeted (isolation)",
            MetricCategory::TargetCompound => "Targeted (compound)",
            MetricCategory::Synergists => "Supporting",
            MetricCategory::Stabilizers => "Stabilizers",
        }
    }

    /// Style token used by bars and tooltip rows.
    #[must_use]
    pub const fn class_token(self) -> &'static str {
        match self {
            MetricCategory::TargetIsolation => "isolation",
            MetricCategory::TargetCompound => "compound",
            MetricCategory::Synergists => "synergist",
            MetricCategory::Stabilizers => "stabilizer",
        }
    }
}

/// One x-axis position: a muscle with its weekly set counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDatum {
    pub name: String,
    #[serde(default)]
    pub target_isolation: f64,
    #[serde(default)]
    pub target_compound: f64,
    #[serde(default)]
    pub synergists: f64,
    #[serde(default)]
    pub stabilizers: f64,
}

impl BarDatum {
    /// Creates a datum with every count at zero.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_isolation: 0.0,
            target_compound: 0.0,
            synergists: 0.0,
            stabilizers: 0.0,
        }
    }

    #[must_use]
    pub fn with_count(mut self, category: MetricCategory, value: f64) -> Self {
        *self.count_mut(category) = value;
        self
    }

    #[must_use]
    pub fn count(&self, category: MetricCategory) -> f64 {
        match category {
            MetricCategory::TargetIsolation => self.target_isolation,
            MetricCategory::TargetCompound => self.target_compound,
            MetricCategory::Synergists => self.synergists,
            MetricCategory::Stabilizers => self.stabilizers,
        }
    }

    fn count_mut(&mut self, category: MetricCategory) -> &mut f64 {
        match category {
            MetricCategory::TargetIsolation => &mut self.target_isolation,
            MetricCategory::TargetCompound => &mut self.target_compound,
            MetricCategory::Synergists => &mut self.synergists,
            MetricCategory::Stabilizers => &mut self.stabilizers,
        }
    }

    /// Sum of the raw (unrounded) counts.
    #[must_use]
    pub fn total(&self) -> f64 {
        MetricCategory::ALL
            .iter()
            .map(|category| self.count(*category))
            .sum()
    }

    /// Every count must be finite and `>= 0`. Names are free-form: an empty
    /// name is a valid (unlabelled) category.
    pub fn validate(&self) -> ChartResult<()> {
        for category in MetricCategory::ALL {
            let value = self.count(category);
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "`{}` of `{}` must be finite and >= 0",
                    category.key(),
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Exercise names that contributed to each metric of one muscle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_isolation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_compound: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synergists: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stabilizers: Option<Vec<String>>,
}

impl ExerciseSet {
    #[must_use]
    pub fn with_exercises<I, S>(mut self, category: MetricCategory, exercises: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = exercises.into_iter().map(Into::into).collect();
        match category {
            MetricCategory::TargetIsolation => self.target_isolation = Some(names),
            MetricCategory::TargetCompound => self.target_compound = Some(names),
            MetricCategory::Synergists => self.synergists = Some(names),
            MetricCategory::Stabilizers => self.stabilizers = Some(names),
        }
        self
    }

    /// Returns `None` when the category key is absent.
    #[must_use]
    pub fn exercises(&self, category: MetricCategory) -> Option<&[String]> {
        match category {
            MetricCategory::TargetIsolation => self.target_isolation.as_deref(),
            MetricCategory::TargetCompound => self.target_compound.as_deref(),
            MetricCategory::Synergists => self.synergists.as_deref(),
            MetricCategory::Stabilizers => self.stabilizers.as_deref(),
        }
    }
}

/// Muscle name -> contributing exercises, in host order.
pub type ExerciseIndex = IndexMap<String, ExerciseSet>;

/// Exercise-name lookup that treats a missing muscle or category as "no detail".
#[must_use]
pub fn lookup_exercises<'a>(
    index: &'a ExerciseIndex,
    muscle: &str,
    category: MetricCategory,
) -> Option<&'a [String]> {
    index.get(muscle)?.exercises(category)
}

/// Contiguous run of datums rendered under one group label.
pub type MuscleGroup = Vec<BarDatum>;

/// Render input passed through from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfiguration {
    #[serde(default)]
    pub muscles: ExerciseIndex,
    #[serde(default)]
    pub bar_data: IndexMap<String, MuscleGroup>,
}

impl ChartConfiguration {
    #[must_use]
    pub fn new(muscles: ExerciseIndex, bar_data: IndexMap<String, MuscleGroup>) -> Self {
        Self { muscles, bar_data }
    }

    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, datums: MuscleGroup) -> Self {
        self.bar_data.insert(name.into(), datums);
        self
    }

    #[must_use]
    pub fn with_exercises(mut self, muscle: impl Into<String>, exercises: ExerciseSet) -> Self {
        self.muscles.insert(muscle.into(), exercises);
        self
    }

    /// Flattened datums in group order, then intra-group order.
    pub fn datums(&self) -> impl Iterator<Item = &BarDatum> {
        self.bar_data.values().flatten()
    }

    /// Rejects empty groups and invalid datums.
    pub fn validate(&self) -> ChartResult<()> {
        for (group, datums) in &self.bar_data {
            if datums.is_empty() {
                return Err(ChartError::InvalidData(format!(
                    "muscle group `{group}` must contain at least one datum"
                )));
            }
            for datum in datums {
                datum.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BarDatum, ChartConfiguration, ExerciseSet, MetricCategory, lookup_exercises};

    #[test]
    fn missing_counts_default_to_zero() {
        let datum: BarDatum =
            serde_json::from_str(r#"{"name":"Biceps","targetCompound":2.5}"#).expect("datum");
        assert_eq!(datum.target_isolation, 0.0);
        assert_eq!(datum.target_compound, 2.5);
        assert_eq!(datum.synergists, 0.0);
        assert_eq!(datum.stabilizers, 0.0);
        assert_eq!(datum.total(), 2.5);
    }

    #[test]
    fn group_order_follows_json_key_order() {
        let config: ChartConfiguration = serde_json::from_str(
            r#"{
                "muscles": {},
                "barData": {
                    "Legs": [{"name": "Quads"}],
                    "Arms": [{"name": "Biceps"}, {"name": "Triceps"}],
                    "Back": [{"name": "Lats"}]
                }
            }"#,
        )
        .expect("config");
        let groups: Vec<&str> = config.bar_data.keys().map(String::as_str).collect();
        assert_eq!(groups, vec!["Legs", "Arms", "Back"]);
        let names: Vec<&str> = config.datums().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Quads", "Biceps", "Triceps", "Lats"]);
    }

    #[test]
    fn validate_rejects_empty_group_and_negative_counts() {
        let empty = ChartConfiguration::default().with_group("Arms", Vec::new());
        assert!(empty.validate().is_err());

        let negative = ChartConfiguration::default().with_group(
            "Arms",
            vec![BarDatum::new("Biceps").with_count(MetricCategory::Synergists, -1.0)],
        );
        assert!(negative.validate().is_err());

        let nan = ChartConfiguration::default().with_group(
            "Arms",
            vec![BarDatum::new("Biceps").with_count(MetricCategory::Stabilizers, f64::NAN)],
        );
        assert!(nan.validate().is_err());
    }

    #[test]
    fn empty_datum_name_is_accepted() {
        let config = ChartConfiguration::default().with_group(
            "Arms",
            vec![BarDatum::new("").with_count(MetricCategory::TargetIsolation, 4.0)],
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn lookup_misses_are_none() {
        let config = ChartConfiguration::default().with_exercises(
            "Biceps",
            ExerciseSet::default().with_exercises(MetricCategory::TargetIsolation, ["Curl"]),
        );
        assert_eq!(
            lookup_exercises(&config.muscles, "Biceps", MetricCategory::TargetIsolation),
            Some(&["Curl".to_owned()][..])
        );
        assert!(lookup_exercises(&config.muscles, "Biceps", MetricCategory::Synergists).is_none());
        assert!(
            lookup_exercises(&config.muscles, "Calves", MetricCategory::TargetIsolation).is_none()
        );
    }
}
