//! muscle-chart: weekly sets-per-muscle bar chart.
//!
//! The crate turns host-supplied set counts into a declarative visual tree
//! (muscle-group spans, stacked bars, training-zone reference markers and a
//! hover tooltip), lays that tree out into backend-agnostic draw primitives,
//! mounts it into a host surface with cooperative retry, and round-trips the
//! chart configuration through a URL-safe compressed string.

pub mod chart;
pub mod codec;
pub mod core;
pub mod error;
pub mod mount;
pub mod render;
pub mod telemetry;

pub use chart::{MuscleBarChart, VisualTree};
pub use error::{ChartError, ChartResult};
pub use mount::{MountScheduler, RenderRequest};
