use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::unbounded;

/// Apply `op` to every item of `items` on a bounded pool of `workers`
/// threads and return the results in input order.
///
/// Workers claim indices from a shared cursor and ship `(index, result)`
/// pairs back over a channel; the caller scatters completions into a
/// pre-sized slot vector addressed by index, so thread scheduling never
/// affects output order. The pool size is clamped to the item count and is
/// independent of input length: a million chunks still run on `workers`
/// threads.
///
/// If any call fails, in-flight items run to completion, not-yet-claimed
/// items are skipped, and the error with the lowest index is returned.
pub fn process_ordered<T, R, E, F>(items: &[T], workers: usize, op: F) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(usize, &T) -> Result<R, E> + Sync,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let workers = workers.max(1).min(items.len());

    let next = AtomicUsize::new(0);
    let failed = AtomicBool::new(false);
    let (tx, rx) = unbounded();

    thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            let failed = &failed;
            let op = &op;
            s.spawn(move || loop {
                if failed.load(Ordering::Relaxed) {
                    break;
                }
                let i = next.fetch_add(1, Ordering::Relaxed);
                if i >= items.len() {
                    break;
                }
                let result = op(i, &items[i]);
                if result.is_err() {
                    failed.store(true, Ordering::Relaxed);
                }
                let _ = tx.send((i, result));
            });
        }
    });
    drop(tx);

    let mut slots: Vec<Option<Result<R, E>>> = Vec::with_capacity(items.len());
    slots.resize_with(items.len(), || None);
    for (i, result) in rx.try_iter() {
        slots[i] = Some(result);
    }

    // The cursor hands out indices in order, so unclaimed (None) slots form a
    // suffix that always sits behind the failure that caused the skip; the
    // first error by index is found before any empty slot is reached.
    let mut out = Vec::with_capacity(items.len());
    for (i, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(Ok(value)) => out.push(value),
            Some(Err(e)) => return Err(e),
            None => unreachable!("slot {i} unfilled without an earlier failure"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Deterministic per-index delay so completion order scrambles while
    /// input order stays fixed.
    fn jitter(seed: u64, i: usize) -> Duration {
        let mut x = seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        Duration::from_micros((x >> 52) * 40)
    }

    #[test]
    fn preserves_input_order_under_scrambled_completion() {
        let items: Vec<usize> = (0..64).collect();
        let result: Result<Vec<usize>, ()> = process_ordered(&items, 8, |i, &v| {
            thread::sleep(jitter(0xC0FFEE, i));
            assert_eq!(i, v);
            Ok(v * 2)
        });
        let out = result.unwrap();
        assert_eq!(out, (0..64).map(|v| v * 2).collect::<Vec<_>>());
    }

    #[test]
    fn returns_first_error_by_index_not_by_completion_time() {
        let items: Vec<usize> = (0..16).collect();
        // Index 11 fails immediately; index 3 fails after a delay. The error
        // surfaced must still be the one with the lower index.
        let result: Result<Vec<usize>, String> = process_ordered(&items, 16, |i, &v| match i {
            3 => {
                thread::sleep(Duration::from_millis(50));
                Err("err at 3".to_string())
            }
            11 => Err("err at 11".to_string()),
            _ => Ok(v),
        });
        assert_eq!(result.unwrap_err(), "err at 3");
    }

    #[test]
    fn more_items_than_workers() {
        let items: Vec<u32> = (0..1000).collect();
        let out: Vec<u32> = process_ordered(&items, 3, |_, &v| Ok::<_, ()>(v + 1)).unwrap();
        assert_eq!(out.len(), 1000);
        assert!(out.iter().enumerate().all(|(i, &v)| v == i as u32 + 1));
    }

    #[test]
    fn empty_input_spawns_nothing() {
        let items: Vec<u8> = Vec::new();
        let out: Vec<u8> = process_ordered(&items, 8, |_, &v| Ok::<_, ()>(v)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_workers_is_clamped_to_one() {
        let items = vec![1u8, 2, 3];
        let out: Vec<u8> = process_ordered(&items, 0, |_, &v| Ok::<_, ()>(v)).unwrap();
        assert_eq!(out, items);
    }

    #[test]
    fn failure_skips_unclaimed_tail() {
        // One worker, so everything after the failing index is never claimed.
        let items: Vec<usize> = (0..100).collect();
        let hit = AtomicUsize::new(0);
        let result: Result<Vec<usize>, &str> = process_ordered(&items, 1, |i, _| {
            hit.fetch_add(1, Ordering::Relaxed);
            if i == 5 {
                Err("boom")
            } else {
                Ok(i)
            }
        });
        assert_eq!(result.unwrap_err(), "boom");
        // 0..=5 claimed; the rest skipped after the failure flag was set.
        assert!(hit.load(Ordering::Relaxed) <= 7);
    }
}
