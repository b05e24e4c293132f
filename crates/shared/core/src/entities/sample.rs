use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{FeatureVector, TrendLabel};
use crate::values::{Price, Timestamp};

/// A feature vector waiting for its horizon to elapse
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSample {
    vector: FeatureVector,
}

impl PendingSample {
    pub fn new(vector: FeatureVector) -> Self {
        Self { vector }
    }

    pub fn observed_at(&self) -> Timestamp {
        self.vector.timestamp
    }

    pub fn mid_price(&self) -> Price {
        self.vector.mid_price
    }

    pub fn vector(&self) -> &FeatureVector {
        &self.vector
    }

    /// Percentage move from this sample's mid to `mid_now`
    pub fn pct_change_to(&self, mid_now: Price) -> f64 {
        let then = self.vector.mid_price;
        if then <= Decimal::ZERO {
            return 0.0;
        }
        ((mid_now - then) / then * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
    }

    /// Consume the pending sample, fixing its label against `mid_now`.
    /// This is the only way a label gets attached.
    pub fn resolve(self, resolved_at: Timestamp, mid_now: Price, threshold_pct: f64) -> LabeledSample {
        let pct_change = self.pct_change_to(mid_now);
        let label = TrendLabel::classify(pct_change, threshold_pct);
        LabeledSample {
            vector: self.vector.with_label(label),
            resolved_at,
            resolved_mid: mid_now,
            pct_change,
            label,
        }
    }
}

/// A feature vector together with the realized move over the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    vector: FeatureVector,
    resolved_at: Timestamp,
    resolved_mid: Price,
    pct_change: f64,
    label: TrendLabel,
}

impl LabeledSample {
    /// The original vector with `label` filled in
    pub fn vector(&self) -> &FeatureVector {
        &self.vector
    }

    pub fn into_vector(self) -> FeatureVector {
        self.vector
    }

    pub fn observed_at(&self) -> Timestamp {
        self.vector.timestamp
    }

    pub fn resolved_at(&self) -> Timestamp {
        self.resolved_at
    }

    pub fn resolved_mid(&self) -> Price {
        self.resolved_mid
    }

    pub fn pct_change(&self) -> f64 {
        self.pct_change
    }

    pub fn label(&self) -> TrendLabel {
        self.label
    }
}
