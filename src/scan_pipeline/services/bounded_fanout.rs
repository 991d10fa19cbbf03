use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::future::Future;

/// Runs independent async operations with a cap on how many are in flight.
///
/// Every item runs to completion; results come back in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedFanout {
    max_concurrency: usize,
}

impl BoundedFanout {
    pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

    /// Creates a fan-out; a limit of zero is raised to one
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub async fn run<I, T, F, Fut, R>(&self, items: I, f: F) -> Vec<R>
    where
        I: IntoIterator<Item = T>,
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let f = &f;
        let mut indexed: Vec<(usize, R)> = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| async move { (index, f(item).await) })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    /// Like [`run`](Self::run) for fallible operations: waits for every item,
    /// then returns the first error in input order, if any.
    pub async fn try_all<I, T, F, Fut, R>(&self, items: I, f: F) -> Result<Vec<R>>
    where
        I: IntoIterator<Item = T>,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        self.run(items, f).await.into_iter().collect()
    }
}

impl Default for BoundedFanout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_CONCURRENCY)
    }
}
