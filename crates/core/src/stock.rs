//! Stock resources and per-run availability accounting.

use crate::Result;

/// A raw stock type (bar or sheet) that pieces are cut from.
pub trait StockResource {
    /// Size of one unit of this stock.
    type Size: Copy;

    /// Returns the identifier of this stock type.
    fn id(&self) -> &str;

    /// Returns the size of one unit.
    fn size(&self) -> Self::Size;

    /// Returns how many units are available to the run.
    fn available(&self) -> usize;

    /// Returns the price of one unit, if known.
    fn unit_price(&self) -> Option<f64> {
        None
    }

    /// Validates the stock type and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

/// Tracks how many units of each stock type remain during a run.
///
/// Indices follow the order of the stock slice the ledger was built from.
#[derive(Debug, Clone)]
pub struct StockLedger {
    remaining: Vec<usize>,
    taken: Vec<usize>,
}

impl StockLedger {
    /// Creates a ledger from the availability of each stock type.
    pub fn new<R: StockResource>(stock: &[R]) -> Self {
        Self {
            remaining: stock.iter().map(|s| s.available()).collect(),
            taken: vec![0; stock.len()],
        }
    }

    /// Returns true if at least one unit of stock type `index` remains.
    pub fn is_available(&self, index: usize) -> bool {
        self.remaining.get(index).is_some_and(|&n| n > 0)
    }

    /// Takes one unit of stock type `index`. Returns false if none remain.
    pub fn take(&mut self, index: usize) -> bool {
        match self.remaining.get_mut(index) {
            Some(n) if *n > 0 => {
                *n -= 1;
                self.taken[index] += 1;
                true
            }
            _ => false,
        }
    }

    /// Returns the number of units taken from stock type `index`.
    pub fn taken(&self, index: usize) -> usize {
        self.taken.get(index).copied().unwrap_or(0)
    }

    /// Returns the total number of units taken across all stock types.
    pub fn total_taken(&self) -> usize {
        self.taken.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bar(usize);

    impl StockResource for Bar {
        type Size = f64;

        fn id(&self) -> &str {
            "bar"
        }

        fn size(&self) -> f64 {
            1000.0
        }

        fn available(&self) -> usize {
            self.0
        }

        fn validate(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ledger_take() {
        let mut ledger = StockLedger::new(&[Bar(2), Bar(0)]);

        assert!(ledger.is_available(0));
        assert!(!ledger.is_available(1));
        assert!(!ledger.is_available(7));

        assert!(ledger.take(0));
        assert!(ledger.take(0));
        assert!(!ledger.take(0));
        assert!(!ledger.take(1));

        assert_eq!(ledger.taken(0), 2);
        assert_eq!(ledger.total_taken(), 2);
    }
}
