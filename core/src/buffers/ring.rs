/// Fixed-size circular buffer that overwrites its oldest slot once full.
///
/// `total_pushed` keeps counting past the capacity so callers can tell how many
/// observations have ever been seen, not only how many are still retained.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    max_capacity: usize,
    total_pushed: usize,
}

impl<T> RingBuffer<T> {
    pub fn with_capacity(max_capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(max_capacity),
            max_capacity,
            total_pushed: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        if self.max_capacity == 0 {
            return;
        }
        let idx = self.total_pushed % self.max_capacity;
        if idx < self.slots.len() {
            self.slots[idx] = value;
        } else {
            self.slots.push(value);
        }
        self.total_pushed += 1;
    }

    /// Iterates the `count` most recent entries, newest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &T> + '_ {
        let available = count.min(self.slots.len());
        (0..available).map(move |offset| {
            let idx = (self.total_pushed - 1 - offset) % self.max_capacity;
            &self.slots[idx]
        })
    }

    pub fn newest(&self) -> Option<&T> {
        self.recent(1).next()
    }

    /// Iterates retained entries in slot order (not chronological once wrapped).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_pushed(&self) -> usize {
        self.total_pushed
    }

    pub fn capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.total_pushed = 0;
    }
}
