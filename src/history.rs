/// Visited cells the carver can still return to, as linear indices.
///
/// Also remembers the deepest point ever reached: depth is the length right
/// after a push, and the goal is the index pushed when a new maximum was set.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<u16>,
    max_depth: usize,
    goal: Option<u16>,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            max_depth: 0,
            goal: None,
        }
    }

    /// Returns the depth after the push.
    pub fn push(&mut self, index: u16) -> usize {
        self.entries.push(index);
        let depth = self.entries.len();
        if depth > self.max_depth {
            self.max_depth = depth;
            self.goal = Some(index);
        }
        depth
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.entries.pop()
    }

    /// Removes entry `i` in O(1) by moving the last entry into its slot.
    pub fn swap_remove(&mut self, i: usize) -> u16 {
        self.entries.swap_remove(i)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[u16] {
        &self.entries
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn goal(&self) -> Option<u16> {
        self.goal
    }
}
