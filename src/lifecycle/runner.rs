//! Chunked concurrent execution.
//!
//! Items are split into ordered groups of at most `chunk_size`. Each group runs
//! concurrently via `join_all`, and the next group does not start until every
//! future in the current one has settled. Peak concurrency is therefore bounded
//! by the chunk size while groups still make forward progress in input order.

use std::future::Future;

use futures::future::join_all;

/// Run `action` once per item, `chunk_size` at a time.
///
/// Returns one output per input item, in input order. A `chunk_size` of zero is
/// treated as one.
pub async fn run_chunked<T, F, Fut>(items: Vec<T>, chunk_size: usize, action: F) -> Vec<Fut::Output>
where
    F: Fn(T) -> Fut,
    Fut: Future,
{
    let chunk_size = chunk_size.max(1);
    let mut outputs = Vec::with_capacity(items.len());
    let mut items = items.into_iter().peekable();
    let mut chunk_index = 0usize;

    while items.peek().is_some() {
        let chunk: Vec<T> = items.by_ref().take(chunk_size).collect();
        tracing::trace!("Dispatching chunk {} with {} items", chunk_index, chunk.len());

        outputs.extend(join_all(chunk.into_iter().map(&action)).await);
        chunk_index += 1;
    }

    outputs
}
