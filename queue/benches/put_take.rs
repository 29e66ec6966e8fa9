use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;

use fibre_queue::BoundedBlockingQueue;

const ITEM_VALUE: u64 = 42;
const NUM_ITEMS: usize = 10_000;
const CAPACITIES: [usize; 4] = [1, 16, 128, 1024];

fn run_spsc(capacity: usize) {
  let queue = Arc::new(BoundedBlockingQueue::new(capacity).unwrap());
  let producer = {
    let queue = Arc::clone(&queue);
    thread::spawn(move || {
      for _ in 0..NUM_ITEMS {
        queue.put(ITEM_VALUE);
      }
    })
  };
  for _ in 0..NUM_ITEMS {
    criterion::black_box(queue.take());
  }
  producer.join().unwrap();
}

fn run_mpmc(capacity: usize, producers: usize, consumers: usize) {
  let queue = Arc::new(BoundedBlockingQueue::new(capacity).unwrap());
  let per_producer = NUM_ITEMS / producers;
  let per_consumer = per_producer * producers / consumers;

  let producer_handles: Vec<_> = (0..producers)
    .map(|_| {
      let queue = Arc::clone(&queue);
      thread::spawn(move || {
        for _ in 0..per_producer {
          queue.put(ITEM_VALUE);
        }
      })
    })
    .collect();
  let consumer_handles: Vec<_> = (0..consumers)
    .map(|_| {
      let queue = Arc::clone(&queue);
      thread::spawn(move || {
        for _ in 0..per_consumer {
          criterion::black_box(queue.take());
        }
      })
    })
    .collect();

  for handle in producer_handles.into_iter().chain(consumer_handles) {
    handle.join().unwrap();
  }
}

fn bench_uncontended(c: &mut Criterion) {
  let mut group = c.benchmark_group("BoundedBlockingQueue/SingleThread");
  group.throughput(Throughput::Elements(1));
  let queue = BoundedBlockingQueue::new(1).unwrap();
  group.bench_function("put_take", |b| {
    b.iter(|| {
      queue.put(ITEM_VALUE);
      criterion::black_box(queue.take());
    })
  });
  group.bench_function("try_put_try_take", |b| {
    b.iter(|| {
      queue.try_put(ITEM_VALUE).unwrap();
      criterion::black_box(queue.try_take().unwrap());
    })
  });
  group.finish();
}

fn bench_spsc(c: &mut Criterion) {
  let mut group = c.benchmark_group("BoundedBlockingQueue/SPSC");
  group.throughput(Throughput::Elements(NUM_ITEMS as u64));
  for capacity in CAPACITIES {
    group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
      b.iter(|| run_spsc(capacity))
    });
  }
  group.finish();
}

fn bench_mpmc(c: &mut Criterion) {
  let mut group = c.benchmark_group("BoundedBlockingQueue/MPMC_4x4");
  group.throughput(Throughput::Elements(NUM_ITEMS as u64));
  group.sample_size(20);
  for capacity in CAPACITIES {
    group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
      b.iter(|| run_mpmc(capacity, 4, 4))
    });
  }
  group.finish();
}

criterion_group!(benches, bench_uncontended, bench_spsc, bench_mpmc);
criterion_main!(benches);
