/*!
 * Property Tests
 * Queue behaviour against a sequential model
 */

use fair_queue::{FairQueue, QueueError};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Enqueue(u32),
    TryDequeue,
    Dequeue,
    Drain,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Enqueue),
        3 => Just(Op::TryDequeue),
        2 => Just(Op::Dequeue),
        1 => Just(Op::Drain),
    ]
}

proptest! {
    #[test]
    fn prop_matches_sequential_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let queue = FairQueue::new();
        let mut model = VecDeque::new();
        let mut removed = 0usize;

        for op in ops {
            match op {
                Op::Enqueue(v) => {
                    queue.enqueue(v).unwrap();
                    model.push_back(v);
                }
                Op::TryDequeue => {
                    let got = queue.try_dequeue().unwrap();
                    let expected = model.pop_front();
                    if expected.is_some() {
                        removed += 1;
                    }
                    prop_assert_eq!(got, expected);
                }
                // Only block when the model says an item is there
                Op::Dequeue => {
                    if let Some(expected) = model.pop_front() {
                        prop_assert_eq!(queue.dequeue(), Ok(expected));
                        removed += 1;
                    }
                }
                Op::Drain => {
                    let got = queue.drain();
                    removed += got.len();
                    prop_assert_eq!(got, model.drain(..).collect::<Vec<_>>());
                }
            }

            prop_assert_eq!(queue.size(), model.len());
            prop_assert_eq!(queue.visited(), removed);
            prop_assert_eq!(queue.waiting(), 0);
        }
    }

    #[test]
    fn prop_close_discards_exactly_stored(items in prop::collection::vec(any::<u16>(), 0..64)) {
        let queue = FairQueue::new();
        for item in &items {
            queue.enqueue(*item).unwrap();
        }

        prop_assert_eq!(queue.close(), items.len());
        prop_assert_eq!(queue.size(), 0);
        prop_assert_eq!(queue.visited(), 0);
        prop_assert_eq!(queue.try_dequeue(), Err(QueueError::Closed));
    }
}
