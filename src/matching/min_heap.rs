/// Binary min-heap keyed by an ordered priority, carrying an arbitrary payload.
///
/// Entries with equal priorities are not reordered relative to each other
/// beyond what sifting does, so there is no stability guarantee among ties.
#[derive(Debug, Clone)]
pub struct MinHeap<P, T> {
    entries: Vec<(P, T)>,
}

impl<P: Ord, T> Default for MinHeap<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ord, T> MinHeap<P, T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn peek_priority(&self) -> Option<&P> {
        self.entries.first().map(|(priority, _)| priority)
    }

    pub fn push(&mut self, priority: P, payload: T) {
        self.entries.push((priority, payload));
        self.sift_up(self.entries.len() - 1);
    }

    /// Removes the minimum entry and returns its payload.
    pub fn pop(&mut self) -> Option<T> {
        self.pop_entry().map(|(_, payload)| payload)
    }

    pub fn pop_entry(&mut self) -> Option<(P, T)> {
        if self.is_empty() {
            return None;
        }
        // Last element takes the root slot, then sinks back into place
        let root = self.entries.swap_remove(0);
        self.sift_down(0);
        Some(root)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index].0 >= self.entries[parent].0 {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            if left >= len {
                return;
            }

            let smaller = if right < len && self.entries[right].0 < self.entries[left].0 {
                right
            } else {
                left
            };

            if self.entries[smaller].0 >= self.entries[index].0 {
                return;
            }
            self.entries.swap(index, smaller);
            index = smaller;
        }
    }

    #[cfg(test)]
    fn holds_heap_property(&self) -> bool {
        (1..self.entries.len()).all(|i| self.entries[(i - 1) / 2].0 <= self.entries[i].0)
    }
}
