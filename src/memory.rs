//! Memory registers (MS, MR, MC, M+, M-).
//!
//! Independent of the engine: values go in and come out as plain `f64`s.

/// The list of stored values and the one MR recalls.
#[derive(Debug, Clone, Default)]
pub struct MemoryList {
    values: Vec<f64>,
    current: f64,
}

impl MemoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been stored since the last clear.
    pub fn has_memory(&self) -> bool {
        !self.values.is_empty()
    }

    /// MS: append a value and make it the one recalled.
    pub fn store(&mut self, value: f64) {
        self.values.push(value);
        self.current = value;
    }

    /// MR: the most recently stored or accumulated value.
    pub fn recall(&self) -> f64 {
        self.current
    }

    /// Recall a specific entry of the list.
    pub fn recall_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// MC.
    pub fn clear(&mut self) {
        self.values.clear();
        self.current = 0.0;
    }

    /// M+: add to the last entry, or store the value if memory is empty.
    pub fn add(&mut self, value: f64) {
        self.accumulate(value);
    }

    /// M-: subtract from the last entry, or store the negated value if memory
    /// is empty.
    pub fn subtract(&mut self, value: f64) {
        self.accumulate(-value);
    }

    /// A copy of every stored value, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.values.clone()
    }

    fn accumulate(&mut self, delta: f64) {
        match self.values.last_mut() {
            Some(last) => {
                self.current += delta;
                *last = self.current;
            }
            None => self.store(delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_recall() {
        let mut memory = MemoryList::new();
        assert!(!memory.has_memory());
        assert_eq!(memory.recall(), 0.0);

        memory.store(4.0);
        memory.store(9.0);
        assert!(memory.has_memory());
        assert_eq!(memory.recall(), 9.0);
        assert_eq!(memory.recall_at(0), Some(4.0));
        assert_eq!(memory.recall_at(5), None);
        assert_eq!(memory.values(), vec![4.0, 9.0]);
    }

    #[test]
    fn test_accumulate_into_last_entry() {
        let mut memory = MemoryList::new();
        memory.store(1.0);
        memory.store(10.0);
        memory.add(5.0);
        memory.subtract(2.0);
        assert_eq!(memory.values(), vec![1.0, 13.0]);
        assert_eq!(memory.recall(), 13.0);
    }

    #[test]
    fn test_accumulate_on_empty_memory_stores() {
        let mut memory = MemoryList::new();
        memory.subtract(3.0);
        assert_eq!(memory.values(), vec![-3.0]);

        memory.clear();
        memory.add(2.0);
        assert_eq!(memory.values(), vec![2.0]);
        assert_eq!(memory.recall(), 2.0);
    }

    #[test]
    fn test_clear() {
        let mut memory = MemoryList::new();
        memory.store(7.0);
        memory.clear();
        assert!(!memory.has_memory());
        assert_eq!(memory.recall(), 0.0);
    }
}
