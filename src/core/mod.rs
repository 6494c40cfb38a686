pub mod category_scale;
pub mod model;
pub mod scale;
pub mod types;

pub use category_scale::CategoryScale;
pub use model::{
    BarDatum, ChartConfiguration, ExerciseIndex, ExerciseSet, MetricCategory, MuscleGroup,
    lookup_exercises,
};
pub use scale::LinearScale;
pub use types::{Margin, Viewport};
