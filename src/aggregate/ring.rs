use crate::types::sample::Sample;

/// Bounded, timestamp-ordered storage for one stream's samples.
///
/// Out-of-order arrivals are placed at the correct position rather than
/// appended, so the sequence is sorted by timestamp at all times.
#[derive(Clone, Debug)]
pub struct SampleRing {
    samples: Vec<Sample>,
    capacity: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        SampleRing {
            samples: Vec::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    /// Ordered insertion by timestamp. A duplicate timestamp overwrites the
    /// existing value in place (idempotent re-ingestion). At capacity the
    /// oldest-by-timestamp entry is evicted, which is the incoming sample
    /// itself when it predates everything retained.
    pub fn insert(&mut self, sample: Sample) {
        match self
            .samples
            .binary_search_by_key(&sample.timestamp, |s| s.timestamp)
        {
            Ok(i) => self.samples[i].value = sample.value,
            Err(i) => {
                self.samples.insert(i, sample);
                if self.samples.len() > self.capacity {
                    self.samples.remove(0);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn earliest(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }
}
