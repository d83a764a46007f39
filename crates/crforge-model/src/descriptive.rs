//! Summary statistics for label and prediction columns.

use serde::Serialize;

/// Descriptive statistics of a column of `f32` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Upper median for even counts
    pub median: f32,
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics over `values`, or `None` when there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// # use crforge_model::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let count = values.len();
        let n = count as f64;
        let mean = values.iter().copied().map(f64::from).sum::<f64>() / n;
        let variance = values
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean: mean as f32,
            median: values[count / 2],
            std_dev: variance.sqrt() as f32,
        })
    }
}

/// In-sample goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitQuality {
    pub mean_absolute_error: f32,
    /// Coefficient of determination; 1.0 for a perfect fit of a constant target
    pub r_squared: f32,
}

impl FitQuality {
    /// Compares `predictions` against `targets` pairwise.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or are empty.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn new(predictions: &[f32], targets: &[f32]) -> Self {
        assert_eq!(predictions.len(), targets.len());
        assert!(!targets.is_empty());

        let n = targets.len() as f64;
        let mean = targets.iter().copied().map(f64::from).sum::<f64>() / n;
        let (abs_err, ss_res, ss_tot) = predictions.iter().zip(targets).fold(
            (0.0, 0.0, 0.0),
            |(abs_err, ss_res, ss_tot), (&p, &t)| {
                let err = f64::from(p) - f64::from(t);
                let dev = f64::from(t) - mean;
                (abs_err + err.abs(), ss_res + err * err, ss_tot + dev * dev)
            },
        );
        let r_squared = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };
        Self {
            mean_absolute_error: (abs_err / n) as f32,
            r_squared: r_squared as f32,
        }
    }
}
