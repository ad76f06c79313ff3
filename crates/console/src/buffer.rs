use std::collections::VecDeque;

/// Fixed-capacity line buffer.
///
/// Backed by a `VecDeque`. When the buffer is full, the oldest line is
/// evicted on each push and counted in [`LineBuffer::evicted`].
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: VecDeque<String>,
    capacity: usize,
    evicted: u64,
}

impl LineBuffer {
    /// Create an empty buffer holding at most `capacity` lines.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LineBuffer capacity must be > 0");
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Push a line, evicting the oldest when at capacity.
    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.evicted += 1;
        }
        self.lines.push_back(line);
    }

    /// Push every physical line of a terminated chunk.
    ///
    /// The single trailing line break ends the last line rather than
    /// starting a new, empty one.
    pub fn push_chunk(&mut self, chunk: &str) {
        let body = chunk.strip_suffix('\n').unwrap_or(chunk);
        for line in body.split('\n') {
            self.push(line.to_owned());
        }
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lines dropped to make room since the last [`LineBuffer::clear`].
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Remove all lines and reset the eviction count.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.evicted = 0;
    }
}
