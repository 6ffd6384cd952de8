//! Waiting line of player ids.
//!
//! The queue is FIFO and never holds the same id twice. Players at the
//! front have waited the longest and are drafted first.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::roster::PlayerId;

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "Vec<PlayerId>", into = "Vec<PlayerId>")]
pub struct Queue {
    ids: VecDeque<PlayerId>,
}

impl Queue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.ids.contains(&id)
    }

    /// Zero-based place in line.
    pub fn position(&self, id: PlayerId) -> Option<usize> {
        self.ids.iter().position(|&queued| queued == id)
    }

    /// Append to the back of the line. Returns `false` if already queued.
    pub fn enqueue(&mut self, id: PlayerId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push_back(id);
        true
    }

    /// Remove an id wherever it is. Returns `false` if it wasn't queued.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.ids.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Move an id to the back of the line, inserting it if absent.
    pub fn requeue(&mut self, id: PlayerId) {
        self.remove(id);
        self.ids.push_back(id);
    }

    /// Pop up to `n` ids from the front, oldest first.
    pub fn take_front(&mut self, n: usize) -> Vec<PlayerId> {
        let n = n.min(self.ids.len());
        self.ids.drain(..n).collect()
    }

    /// The first `n` ids without removing them.
    pub fn peek_front(&self, n: usize) -> Vec<PlayerId> {
        self.ids.iter().take(n).copied().collect()
    }

    /// Replace the whole sequence. Later duplicates are dropped.
    pub fn replace(&mut self, ids: Vec<PlayerId>) {
        *self = Self::from(ids);
    }

    pub fn retain(&mut self, keep: impl FnMut(&PlayerId) -> bool) {
        self.ids.retain(keep);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<PlayerId> {
        self.ids.iter().copied().collect()
    }
}

impl From<Vec<PlayerId>> for Queue {
    fn from(ids: Vec<PlayerId>) -> Self {
        let mut queue = Self::new();
        for id in ids {
            queue.enqueue(id);
        }
        queue
    }
}

impl From<Queue> for Vec<PlayerId> {
    fn from(queue: Queue) -> Self {
        queue.ids.into()
    }
}

impl FromIterator<PlayerId> for Queue {
    fn from_iter<I: IntoIterator<Item = PlayerId>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
