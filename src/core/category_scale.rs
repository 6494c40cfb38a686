use crate::error::{ChartError, ChartResult};

/// Band scale over an ordered list of category names.
///
/// Each category owns one equal-width band of `[range_start, range_end]`;
/// the category's position is the band center.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScale {
    categories: Vec<String>,
    range_start: f64,
    range_end: f64,
}

impl CategoryScale {
    pub fn new<I, S>(categories: I, range_start: f64, range_end: f64) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !range_start.is_finite() || !range_end.is_finite() || range_end <= range_start {
            return Err(ChartError::InvalidData(
                "category range must be finite and increasing".to_owned(),
            ));
        }
        Ok(Self {
            categories: categories.into_iter().map(Into::into).collect(),
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Width of one band; zero when there are no categories.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        if self.categories.is_empty() {
            return 0.0;
        }
        (self.range_end - self.range_start) / self.categories.len() as f64
    }

    /// First occurrence of `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|category| category == name)
    }

    #[must_use]
    pub fn band_start(&self, index: usize) -> Option<f64> {
        (index < self.categories.len())
            .then(|| self.range_start + index as f64 * self.bandwidth())
    }

    #[must_use]
    pub fn center(&self, index: usize) -> Option<f64> {
        self.band_start(index)
            .map(|start| start + self.bandwidth() * 0.5)
    }

    /// Category whose band contains `pixel`.
    #[must_use]
    pub fn index_at(&self, pixel: f64) -> Option<usize> {
        if self.categories.is_empty()
            || !pixel.is_finite()
            || pixel < self.range_start
            || pixel >= self.range_end
        {
            return None;
        }
        let index = ((pixel - self.range_start) / self.bandwidth()).floor() as usize;
        (index < self.categories.len()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryScale;
    use approx::assert_relative_eq;

    #[test]
    fn bands_split_range_evenly() {
        let scale = CategoryScale::new(["a", "b", "c", "d"], 0.0, 400.0).expect("scale");
        assert_relative_eq!(scale.bandwidth(), 100.0);
        assert_relative_eq!(scale.center(0).expect("a"), 50.0);
        assert_relative_eq!(scale.center(scale.index_of("d").expect("d")).expect("d"), 350.0);
        assert!(scale.index_of("z").is_none());
        assert!(scale.center(4).is_none());
    }

    #[test]
    fn index_at_resolves_hovered_band() {
        let scale = CategoryScale::new(["a", "b"], 10.0, 210.0).expect("scale");
        assert_eq!(scale.index_at(10.0), Some(0));
        assert_eq!(scale.index_at(109.9), Some(0));
        assert_eq!(scale.index_at(110.0), Some(1));
        assert_eq!(scale.index_at(210.0), None);
        assert_eq!(scale.index_at(5.0), None);
    }

    #[test]
    fn empty_scale_has_no_bands() {
        let scale = CategoryScale::new(Vec::<String>::new(), 0.0, 100.0).expect("scale");
        assert!(scale.is_empty());
        assert_eq!(scale.bandwidth(), 0.0);
        assert_eq!(scale.index_at(50.0), None);
    }
}
