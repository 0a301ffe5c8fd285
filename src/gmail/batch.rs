//! Bounded fan-out: chunks run one after another, members of a chunk run
//! concurrently on the calling task.

use std::future::Future;
use std::time::Instant;

use futures::future::join_all;

use crate::errors::Error;
use crate::telemetry::fetch::{FetchOperation, FetchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    batch_size: usize,
}

impl BatchPlan {
    pub fn new(batch_size: usize) -> Result<Self, Error> {
        if batch_size == 0 {
            return Err(Error::Config("batch_size must be > 0".into()));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Sizes of the chunks `total` items are split into.
    pub fn batch_sizes(&self, total: usize) -> Vec<usize> {
        (0..total)
            .step_by(self.batch_size)
            .map(|start| (total - start).min(self.batch_size))
            .collect()
    }

    /// Runs `fetch` over every item. Chunk N+1 starts only after every
    /// member of chunk N has completed. Output order follows input order.
    ///
    /// All members of a chunk are awaited even when one fails; the first
    /// error in input order is then returned and no later chunk starts.
    pub async fn run<T, O, F, Fut>(&self, items: &[T], mut fetch: F) -> Result<Vec<O>, Error>
    where
        F: FnMut(&T) -> Fut,
        Fut: Future<Output = Result<O, Error>>,
    {
        let mut out = Vec::with_capacity(items.len());
        for (sequence, chunk) in items.chunks(self.batch_size).enumerate() {
            let start = Instant::now();
            let results = join_all(chunk.iter().map(&mut fetch)).await;
            let success = results.iter().all(Result::is_ok);
            FetchOutcome {
                operation: FetchOperation::GetMessageBatch,
                sequence,
                items: chunk.len(),
                success,
                elapsed: start.elapsed(),
            }
            .log();
            for result in results {
                out.push(result?);
            }
        }
        Ok(out)
    }
}
