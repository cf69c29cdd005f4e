//! Bounded batch executor
//!
//! Runs an async operation over a sequence of items with a fixed concurrency
//! ceiling. Items are partitioned into `ceil(N/C)` batches of size <= C; each
//! batch runs concurrently and batches execute strictly sequentially, so at
//! most C operations are ever in flight. A progress callback fires after each
//! completed batch.
//!
//! All "concurrency" here is overlapping async I/O on the cooperative
//! scheduler, not CPU parallelism.

use futures::future::try_join_all;
use std::future::Future;

/// Runs `op` over `items` in sequential batches of at most `concurrency`
///
/// Outputs are returned in item order, which lets callers fold results into
/// shared state strictly after the executor completes instead of mutating it
/// from concurrent tasks.
///
/// # Failure semantics
///
/// Fails fast: the first operation error aborts the current batch and skips
/// all remaining batches. Partial outputs are discarded. Operations that
/// should not abort the run must map their failures into their output type.
///
/// # Arguments
///
/// * `items` - The items to process
/// * `concurrency` - Maximum operations in flight (must be > 0)
/// * `op` - Async per-item operation
/// * `progress` - Called as `(batch_index, batch_count)` after each batch
pub async fn run_batched<T, R, E, F, Fut, P>(
    items: &[T],
    concurrency: usize,
    op: F,
    mut progress: P,
) -> Result<Vec<R>, E>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    P: FnMut(usize, usize),
{
    assert!(concurrency > 0, "batch concurrency must be non-zero");

    let batch_count = items.len().div_ceil(concurrency);
    let mut outputs = Vec::with_capacity(items.len());

    for (batch_index, chunk) in items.chunks(concurrency).enumerate() {
        let batch = try_join_all(chunk.iter().map(&op)).await?;
        outputs.extend(batch);
        progress(batch_index, batch_count);
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_batch_partitioning_and_progress() {
        // 120 items at concurrency 50 -> exactly 3 batches of 50/50/20
        let items: Vec<u32> = (0..120).collect();
        let progress_calls = Mutex::new(Vec::new());

        let outputs = run_batched(
            &items,
            50,
            |n| {
                let n = *n;
                async move { Ok::<u32, ()>(n * 2) }
            },
            |batch_index, batch_count| {
                progress_calls.lock().unwrap().push((batch_index, batch_count));
            },
        )
        .await
        .unwrap();

        assert_eq!(outputs.len(), 120);
        assert_eq!(
            *progress_calls.lock().unwrap(),
            vec![(0, 3), (1, 3), (2, 3)]
        );
    }

    #[tokio::test]
    async fn test_outputs_in_item_order() {
        let items: Vec<u64> = vec![30, 10, 20, 5];

        // Later items finish first; order must still follow the input
        let outputs = run_batched(
            &items,
            4,
            |ms| {
                let ms = *ms;
                async move {
                    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
                    Ok::<u64, ()>(ms)
                }
            },
            |_, _| {},
        )
        .await
        .unwrap();

        assert_eq!(outputs, items);
    }

    #[tokio::test]
    async fn test_concurrency_ceiling() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let items: Vec<u32> = (0..20).collect();

        run_batched(
            &items,
            5,
            |_| {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                async {
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<(), ()>(())
                }
            },
            |_, _| {},
        )
        .await
        .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 5);
    }

    #[tokio::test]
    async fn test_fail_fast_skips_remaining_batches() {
        let attempts = AtomicUsize::new(0);
        let items: Vec<u32> = (0..10).collect();
        let progress_count = AtomicUsize::new(0);

        let result = run_batched(
            &items,
            2,
            |n| {
                attempts.fetch_add(1, Ordering::SeqCst);
                let n = *n;
                async move {
                    if n == 3 {
                        Err("boom")
                    } else {
                        Ok(())
                    }
                }
            },
            |_, _| {
                progress_count.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;

        assert_eq!(result, Err("boom"));
        // Batches 0 and 1 started (items 0..4); batches 2..4 never ran
        assert!(attempts.load(Ordering::SeqCst) <= 4);
        // The failing batch never reports progress
        assert_eq!(progress_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let items: Vec<u32> = vec![];
        let progress_count = AtomicUsize::new(0);

        let outputs = run_batched(
            &items,
            50,
            |_| async { Ok::<(), ()>(()) },
            |_, _| {
                progress_count.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

        assert!(outputs.is_empty());
        assert_eq!(progress_count.load(Ordering::SeqCst), 0);
    }
}
