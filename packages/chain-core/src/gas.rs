use crate::error::{ChainError, ErrorKind};

/// Per-tx gas accounting. Every storage read/write
/// and every ante stage charges gas through this meter; exceeding the
/// declared limit aborts the transaction and rolls back its state effects
/// while still charging fees up to the declared limit.
#[derive(Debug, Clone)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    /// Charges `amount` gas, rejecting if doing so would exceed the limit.
    pub fn charge(&mut self, amount: u64) -> Result<(), ChainError> {
        let next = self.consumed.saturating_add(amount);
        if next > self.limit {
            return Err(ChainError::new(
                ErrorKind::InvalidRequest,
                format!("out of gas: wanted {amount}, have {} of {}", self.remaining(), self.limit),
            ));
        }
        self.consumed = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_and_rejects_overrun() {
        let mut meter = GasMeter::new(100);
        meter.charge(60).unwrap();
        assert_eq!(meter.remaining(), 40);
        assert!(meter.charge(41).is_err());
        assert_eq!(meter.consumed(), 60, "a failed charge must not partially apply");
    }
}
