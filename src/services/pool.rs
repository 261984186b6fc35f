use rand::Rng;

use crate::models::webcam::Webcam;

/// Webcams not yet attempted in the current run.
///
/// Every draw removes the webcam from the pool regardless of what happens to
/// it afterwards, so a run makes at most `catalog.len()` attempts.
pub struct CandidatePool<'a, R> {
    remaining: Vec<&'a Webcam>,
    rng: R,
}

impl<'a, R: Rng> CandidatePool<'a, R> {
    pub fn new(catalog: &'a [Webcam], rng: R) -> Self {
        Self {
            remaining: catalog.iter().collect(),
            rng,
        }
    }

    /// Pick a remaining webcam uniformly at random and remove it.
    /// Returns `None` once the pool is exhausted.
    pub fn draw(&mut self) -> Option<&'a Webcam> {
        if self.remaining.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.remaining.len());
        Some(self.remaining.remove(index))
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
