//! Size-dependent fan-out/fan-in over independent work items.
//!
//! Small batches run inline on the calling thread. Batches at or above
//! [`FAN_OUT_THRESHOLD`] are handed to a bounded pool of scoped worker threads
//! that pull items from a shared queue and push their results into one
//! channel. The channel is drained only after every worker has finished.
//!
//! A `fan_out` issued from inside a pool worker runs inline, so nesting never
//! grows the pool past [`worker_count`] threads. Results are returned in input
//! order in both modes.

use std::cell::Cell;
use std::sync::{Mutex, PoisonError, mpsc};
use std::thread;

/// Batches smaller than this are processed sequentially.
pub const FAN_OUT_THRESHOLD: usize = 5;

thread_local! {
    static ON_POOL_WORKER: Cell<bool> = const { Cell::new(false) };
}

/// Number of workers for a batch of `items`: available parallelism, capped by
/// the batch size.
pub fn worker_count(items: usize) -> usize {
    let parallelism = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    parallelism.min(items).max(1)
}

/// Apply `work` to every item and flatten the outputs, in input order.
///
/// `work` may yield any number of results per item (an `Option` for a
/// filter-map, a `Vec` for a flat-map). Items are independent; a worker
/// never sees another worker's item.
pub fn fan_out<T, U, I, F>(items: &[T], work: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    I: IntoIterator<Item = U>,
    F: Fn(&T) -> I + Sync,
{
    if items.len() < FAN_OUT_THRESHOLD || ON_POOL_WORKER.with(Cell::get) {
        return items.iter().flat_map(&work).collect();
    }

    let queue = Mutex::new(items.iter().enumerate());
    let (tx, rx) = mpsc::channel::<(usize, Vec<U>)>();

    thread::scope(|scope| {
        for _ in 0..worker_count(items.len()) {
            let tx = tx.clone();
            let queue = &queue;
            let work = &work;

            scope.spawn(move || {
                ON_POOL_WORKER.with(|flag| flag.set(true));
                loop {
                    let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                    let Some((position, item)) = next else { break };

                    if tx.send((position, work(item).into_iter().collect())).is_err() {
                        return;
                    }
                }
            });
        }
    });

    // Every worker has joined; dropping the last sender ends the drain.
    drop(tx);
    let mut batches: Vec<(usize, Vec<U>)> = rx.into_iter().collect();
    batches.sort_unstable_by_key(|(position, _)| *position);
    batches.into_iter().flat_map(|(_, results)| results).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_worker_count_bounds() {
        assert_eq!(worker_count(0), 1);
        assert_eq!(worker_count(1), 1);
        assert!(worker_count(1000) >= 1);
        assert!(worker_count(1000) <= 1000);
    }

    #[test]
    fn test_sequential_below_threshold_keeps_order() {
        let items = vec![4, 3, 2, 1];
        let out = fan_out(&items, |n| Some(n * 10));
        assert_eq!(out, vec![40, 30, 20, 10]);
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<u32> = vec![];
        let out: Vec<u32> = fan_out(&items, |n| Some(*n));
        assert!(out.is_empty());
    }

    #[test]
    fn test_fan_out_no_drops_no_duplicates() {
        let keys: Vec<String> = (0..200).map(|i| format!("JIRA-{}", i)).collect();

        let out = fan_out(&keys, |k| Some(k.clone()));

        assert_eq!(out.len(), keys.len());
        let expected: HashSet<_> = keys.iter().cloned().collect();
        let actual: HashSet<_> = out.iter().cloned().collect();
        assert_eq!(actual, expected);
        assert_eq!(out, keys);
    }

    #[test]
    fn test_fan_out_at_threshold() {
        let items: Vec<usize> = (0..FAN_OUT_THRESHOLD).collect();
        let out = fan_out(&items, |n| Some(*n));
        assert_eq!(out, items);
    }

    #[test]
    fn test_fan_out_filter_and_flatten() {
        let items: Vec<u32> = (0..20).collect();

        // Even items dropped, odd items yield two results each.
        let out = fan_out(&items, |n| if n % 2 == 1 { vec![*n, *n] } else { vec![] });

        let expected: Vec<u32> = (0..20).filter(|n| n % 2 == 1).flat_map(|n| [n, n]).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_nested_fan_out() {
        let batches: Vec<Vec<u32>> = (0..8).map(|b| (0..10).map(|i| b * 10 + i).collect()).collect();

        let out = fan_out(&batches, |batch| fan_out(batch, |n| Some(*n)));

        assert_eq!(out, (0..80).collect::<Vec<u32>>());
    }

    #[test]
    fn test_nested_fan_out_stays_within_pool() {
        let batches: Vec<Vec<u32>> = (0..32).map(|b| (0..16).map(|i| b * 16 + i).collect()).collect();
        let threads = Mutex::new(HashSet::new());
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        fan_out(&batches, |batch| {
            fan_out(batch, |n| {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                threads.lock().unwrap().insert(thread::current().id());
                thread::yield_now();
                active.fetch_sub(1, Ordering::SeqCst);
                Some(*n)
            })
        });

        let limit = worker_count(batches.len());
        assert!(peak.load(Ordering::SeqCst) <= limit);
        assert!(threads.lock().unwrap().len() <= limit);
    }

    #[test]
    fn test_flat_results_keep_item_grouping() {
        let items: Vec<u32> = (0..64).collect();

        let out = fan_out(&items, |n| vec![(*n, 'a'), (*n, 'b'), (*n, 'c')]);

        let expected: Vec<(u32, char)> = items
            .iter()
            .flat_map(|n| [(*n, 'a'), (*n, 'b'), (*n, 'c')])
            .collect();
        assert_eq!(out, expected);
    }
}
