/// Fixed-capacity ring buffer of frames, oldest first.
///
/// Pushing into a full window overwrites the oldest frame and hands it back.
#[derive(Debug)]
pub struct FrameWindow<T> {
    slots: Vec<Option<T>>,
    // slot holding the oldest frame
    head: usize,
    len: usize,
}

impl<T> FrameWindow<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "frame window needs room for at least one frame");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    /// Appends `frame`, returning the evicted oldest frame if the window was full.
    pub fn push(&mut self, frame: T) -> Option<T> {
        let capacity = self.capacity();

        if self.len < capacity {
            self.slots[(self.head + self.len) % capacity] = Some(frame);
            self.len += 1;
            return None;
        }

        let evicted = self.slots[self.head].replace(frame);
        self.head = (self.head + 1) % capacity;
        evicted
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % capacity].as_ref())
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }
}
