use microflow_core::{Price, Timestamp};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::window::RollingWindow;

/// The last `N` accepted mid prices
#[derive(Debug, Clone)]
pub struct PriceSeries {
    window: RollingWindow<Price>,
}

impl PriceSeries {
    pub fn new(samples: usize) -> Self {
        Self {
            window: RollingWindow::with_capacity(samples),
        }
    }

    pub fn push(&mut self, at: Timestamp, mid: Price) {
        self.window.push(at, mid);
    }

    pub fn last(&self) -> Option<Price> {
        self.window.back().map(|entry| entry.value)
    }

    /// Percentage returns between consecutive samples
    pub fn returns(&self) -> Vec<f64> {
        let prices: Vec<Price> = self.window.values().copied().collect();
        prices
            .windows(2)
            .filter(|pair| pair[0] > Decimal::ZERO)
            .filter_map(|pair| ((pair[1] - pair[0]) / pair[0] * Decimal::ONE_HUNDRED).to_f64())
            .collect()
    }

    /// Population standard deviation of [`returns`](Self::returns), in
    /// percent. Zero with fewer than two samples.
    pub fn volatility(&self) -> f64 {
        population_std_dev(&self.returns())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_volatility_needs_two_samples() {
        let mut series = PriceSeries::new(5);
        assert_eq!(series.volatility(), 0.0);
        series.push(Utc::now(), dec!(100));
        assert_eq!(series.volatility(), 0.0);
    }

    #[test]
    fn test_constant_returns_have_zero_volatility() {
        let now = Utc::now();
        let mut series = PriceSeries::new(5);
        series.push(now, dec!(100));
        series.push(now, dec!(101));
        assert_eq!(series.returns(), vec![1.0]);
        assert_eq!(series.volatility(), 0.0);
    }

    #[test]
    fn test_population_std_of_returns() {
        let now = Utc::now();
        let mut series = PriceSeries::new(5);
        // returns: +1%, -1%
        series.push(now, dec!(100));
        series.push(now, dec!(101));
        series.push(now, dec!(99.99));

        let volatility = series.volatility();
        assert!((volatility - 1.0).abs() < 1e-9, "volatility = {volatility}");
    }

    #[test]
    fn test_only_last_samples_count() {
        let now = Utc::now();
        let mut series = PriceSeries::new(2);
        series.push(now, dec!(50));
        series.push(now, dec!(100));
        series.push(now, dec!(101));

        assert_eq!(series.len(), 2);
        assert_eq!(series.returns(), vec![1.0]);
        assert_eq!(series.last(), Some(dec!(101)));
    }
}
