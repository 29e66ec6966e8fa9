use fibre_queue::BoundedBlockingQueue;

use std::sync::Arc;

#[test]
#[cfg(not(debug_assertions))]
fn queue_tsan_stress_test() {
  // Run with RUSTFLAGS="-Z sanitizer=thread" cargo +nightly test --release queue_tsan_stress_test
  let queue = Arc::new(BoundedBlockingQueue::new(64).unwrap());
  let num_threads = 16;
  let items_per_thread = 100_000;
  let mut handles = vec![];

  for i in 0..num_threads {
    let queue = Arc::clone(&queue);
    handles.push(std::thread::spawn(move || {
      for j in 0..items_per_thread {
        queue.put((i, j));
        // A yield can help expose more interleavings.
        if j % 10 == 0 {
          std::thread::yield_now();
        }
      }
    }));
  }

  let mut count = 0;
  let mut last_seen = vec![None; num_threads];
  while count < num_threads * items_per_thread {
    let (producer, seq) = queue.take();
    if let Some(prev) = last_seen[producer] {
      assert!(seq > prev);
    }
    last_seen[producer] = Some(seq);
    count += 1;
    if count % 10 == 0 {
      std::thread::yield_now();
    }
  }

  for handle in handles {
    handle.join().unwrap();
  }

  assert_eq!(count, num_threads * items_per_thread);
  assert!(queue.is_empty());
}
