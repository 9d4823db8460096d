//! Request generations for discarding stale asynchronous results.
//!
//! Decoding and probing run off the UI thread and may finish out of order.
//! Every request takes the next generation; a result is only applied if its
//! generation is still the latest one handed out.

/// Identifier of one asynchronous request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonically increasing generation source.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a new generation, superseding every earlier one.
    pub fn advance(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    pub fn current(&self) -> Generation {
        Generation(self.latest)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }
}
