/// Chords already drawn, keyed by pin index. Marking `(i, j)` also marks
/// `(j, i)`; entries are never removed.
#[derive(Clone, Debug)]
pub struct UsedEdges {
    pin_count: usize,
    used: Vec<bool>,
    len: usize,
}

impl UsedEdges {
    pub fn new(pin_count: usize) -> Self {
        Self {
            pin_count,
            used: vec![false; pin_count * pin_count],
            len: 0,
        }
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.slot(a, b).is_some_and(|slot| self.used[slot])
    }

    /// Marks the chord as used. Returns `false` if it already was, or if either
    /// index is out of range.
    pub fn insert(&mut self, a: usize, b: usize) -> bool {
        match (self.slot(a, b), self.slot(b, a)) {
            (Some(forward), Some(backward)) if !self.used[forward] => {
                self.used[forward] = true;
                self.used[backward] = true;
                self.len += 1;
                true
            }
            _ => false,
        }
    }

    /// Number of distinct chords marked.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn slot(&self, a: usize, b: usize) -> Option<usize> {
        (a < self.pin_count && b < self.pin_count).then(|| a * self.pin_count + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_is_symmetric() {
        let mut edges = UsedEdges::new(5);
        assert!(edges.is_empty());
        assert!(edges.insert(1, 3));
        assert!(edges.contains(1, 3));
        assert!(edges.contains(3, 1));
        assert!(!edges.contains(1, 2));
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn reinsertion_in_either_order_is_rejected() {
        let mut edges = UsedEdges::new(4);
        assert!(edges.insert(0, 2));
        assert!(!edges.insert(0, 2));
        assert!(!edges.insert(2, 0));
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn out_of_range_is_never_used() {
        let mut edges = UsedEdges::new(3);
        assert!(!edges.insert(0, 3));
        assert!(!edges.contains(3, 0));
        assert!(edges.is_empty());
    }
}
