use microflow_core::PositionSide;

/// Counts consecutive same-side entry signals
#[derive(Debug, Clone)]
pub struct ConfirmationCounter {
    required: u32,
    side: Option<PositionSide>,
    count: u32,
}

impl ConfirmationCounter {
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            side: None,
            count: 0,
        }
    }

    /// Register a signal for `side`. Returns true once it has been seen
    /// `required` times in a row.
    ///
    /// When more than one period is required, a signal for the other side
    /// resets the count to zero and does not count itself.
    pub fn observe(&mut self, side: PositionSide) -> bool {
        match self.side {
            Some(current) if current == side => self.count = self.count.saturating_add(1),
            Some(_) if self.required > 1 => {
                self.side = Some(side);
                self.count = 0;
                return false;
            }
            _ => {
                self.side = Some(side);
                self.count = 1;
            }
        }
        self.is_confirmed()
    }

    pub fn is_confirmed(&self) -> bool {
        self.side.is_some() && self.count >= self.required
    }

    pub fn reset(&mut self) {
        self.side = None;
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn required(&self) -> u32 {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_period_confirms_immediately() {
        let mut counter = ConfirmationCounter::new(0);
        assert!(counter.observe(PositionSide::Long));
    }

    #[test]
    fn test_side_flip_restarts() {
        let mut counter = ConfirmationCounter::new(3);
        assert!(!counter.observe(PositionSide::Long));
        assert!(!counter.observe(PositionSide::Long));
        assert!(!counter.observe(PositionSide::Short));
        assert_eq!(counter.count(), 0);

        assert!(!counter.observe(PositionSide::Short));
        assert!(!counter.observe(PositionSide::Short));
        assert!(counter.observe(PositionSide::Short));

        counter.reset();
        assert_eq!(counter.count(), 0);
        assert!(!counter.is_confirmed());
    }

    #[test]
    fn test_flip_confirms_immediately_with_single_period() {
        let mut counter = ConfirmationCounter::new(1);
        assert!(counter.observe(PositionSide::Long));
        assert!(counter.observe(PositionSide::Short));
    }
}
