pub struct StatsHelper;

impl StatsHelper {
    /// Root mean square, accumulated in `f64` so long buffers keep precision.
    pub fn rms<I>(samples: I) -> f32
    where
        I: IntoIterator<Item = f32>,
    {
        let (count, sum_sq) = samples
            .into_iter()
            .fold((0usize, 0.0f64), |(count, sum), v| {
                (count + 1, sum + f64::from(v) * f64::from(v))
            });
        if count == 0 {
            return 0.0;
        }
        (sum_sq / count as f64).sqrt() as f32
    }

    /// Smallest and largest finite value, or `None` when there is none.
    pub fn bounds<I>(samples: I) -> Option<(f32, f32)>
    where
        I: IntoIterator<Item = f32>,
    {
        samples
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }
}
