use serde::{Deserialize, Serialize};

/// Realized direction of the mid price over the labeling horizon.
///
/// Serialized as its integer form (-1, 0, 1), which is what the training
/// data expects in the `target` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum TrendLabel {
    /// Price fell by more than the threshold
    Down = -1,
    /// Price moved within the threshold
    Stable = 0,
    /// Price rose by more than the threshold
    Up = 1,
}

impl TrendLabel {
    /// Classify a percentage change against a symmetric threshold (both in percent).
    ///
    /// Strict inequalities: a move of exactly `threshold_pct` is `Stable`.
    pub fn classify(pct_change: f64, threshold_pct: f64) -> Self {
        if pct_change > threshold_pct {
            TrendLabel::Up
        } else if pct_change < -threshold_pct {
            TrendLabel::Down
        } else {
            TrendLabel::Stable
        }
    }

    #[inline]
    pub fn as_int(&self) -> i8 {
        *self as i8
    }

    pub fn from_int(value: i8) -> Option<Self> {
        match value {
            -1 => Some(TrendLabel::Down),
            0 => Some(TrendLabel::Stable),
            1 => Some(TrendLabel::Up),
            _ => None,
        }
    }

    /// Returns true for `Up` and `Down`
    pub fn is_directional(&self) -> bool {
        !matches!(self, TrendLabel::Stable)
    }
}

impl From<TrendLabel> for i8 {
    fn from(label: TrendLabel) -> Self {
        label.as_int()
    }
}

impl TryFrom<i8> for TrendLabel {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        TrendLabel::from_int(value).ok_or_else(|| format!("invalid trend label: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(TrendLabel::classify(0.3, 0.05), TrendLabel::Up);
        assert_eq!(TrendLabel::classify(-0.3, 0.05), TrendLabel::Down);
        assert_eq!(TrendLabel::classify(0.01, 0.05), TrendLabel::Stable);
        assert_eq!(TrendLabel::classify(0.05, 0.05), TrendLabel::Stable);
    }

    #[test]
    fn test_int_round_trip() {
        for label in [TrendLabel::Down, TrendLabel::Stable, TrendLabel::Up] {
            assert_eq!(TrendLabel::from_int(label.as_int()), Some(label));
        }
        assert_eq!(TrendLabel::from_int(2), None);
        assert_eq!(serde_json::to_string(&TrendLabel::Down).unwrap(), "-1");
    }
}
