use crate::error::{ChartError, ChartResult};

/// Maps a numeric domain onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`), which is how the
/// vertical axis puts the domain minimum at the bottom of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() || range_start == range_end {
            return Err(ChartError::InvalidData(
                "scale range must be finite and non-zero".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    /// Clamps `value` into the domain.
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        let (low, high) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        value.clamp(low, high)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }
}

#[cfg(test)]
mod tests {
    use super::LinearScale;
    use approx::assert_relative_eq;

    #[test]
    fn inverted_range_puts_domain_start_at_bottom() {
        let scale = LinearScale::new(0.0, 50.0)
            .expect("scale")
            .with_range(300.0, 100.0)
            .expect("range");
        assert_relative_eq!(scale.domain_to_pixel(0.0).expect("px"), 300.0);
        assert_relative_eq!(scale.domain_to_pixel(50.0).expect("px"), 100.0);
        assert_relative_eq!(scale.domain_to_pixel(25.0).expect("px"), 200.0);
        assert_relative_eq!(scale.domain_to_pixel(37.5).expect("px"), 150.0);
    }

    #[test]
    fn rejects_degenerate_domain_and_range() {
        assert!(LinearScale::new(1.0, 1.0).is_err());
        assert!(LinearScale::new(f64::NAN, 1.0).is_err());
        let scale = LinearScale::new(0.0, 1.0).expect("scale");
        assert!(scale.with_range(5.0, 5.0).is_err());
        assert!(scale.domain_to_pixel(f64::INFINITY).is_err());
    }

    #[test]
    fn clamp_limits_to_domain() {
        let scale = LinearScale::new(0.0, 50.0).expect("scale");
        assert_eq!(scale.clamp(72.0), 50.0);
        assert_eq!(scale.clamp(-3.0), 0.0);
        assert_eq!(scale.clamp(12.0), 12.0);
    }
}
