use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;

use tether::{AtomicCoordinator, BoundedBuffer, Channel, SharedCounter};

const ITEMS: usize = 10_000;

fn bench_bounded_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_buffer");
    group.throughput(Throughput::Elements(ITEMS as u64));

    for capacity in [1usize, 16, 256] {
        group.bench_with_input(BenchmarkId::new("spsc", capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let buffer = BoundedBuffer::new(capacity).unwrap();
                thread::scope(|s| {
                    s.spawn(|| {
                        for item in buffer.drain() {
                            black_box(item);
                        }
                    });
                    for i in 0..ITEMS {
                        buffer.produce(i).unwrap();
                    }
                    buffer.finish();
                });
            });
        });
    }

    group.bench_function("mpmc_4x4_cap_64", |b| {
        b.iter(|| {
            let buffer = BoundedBuffer::new(64).unwrap();
            thread::scope(|s| {
                for _ in 0..4 {
                    s.spawn(|| buffer.drain().count());
                }
                let producers: Vec<_> = (0..4)
                    .map(|_| {
                        s.spawn(|| {
                            for i in 0..ITEMS / 4 {
                                buffer.produce(i).unwrap();
                            }
                        })
                    })
                    .collect();
                for producer in producers {
                    producer.join().unwrap();
                }
                buffer.finish();
            });
        });
    });

    group.finish();
}

fn bench_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel");
    group.throughput(Throughput::Elements(ITEMS as u64));

    group.bench_function("tether_channel", |b| {
        b.iter(|| {
            let channel = Channel::new();
            thread::scope(|s| {
                s.spawn(|| channel.iter().map(black_box).count());
                for i in 0..ITEMS {
                    channel.send(i).unwrap();
                }
                channel.close();
            });
        });
    });

    group.bench_function("std_mpsc", |b| {
        b.iter(|| {
            let (tx, rx) = std::sync::mpsc::channel();
            thread::scope(|s| {
                s.spawn(move || rx.iter().map(black_box).count());
                for i in 0..ITEMS {
                    tx.send(i).unwrap();
                }
                drop(tx);
            });
        });
    });

    group.finish();
}

fn bench_counters(c: &mut Criterion) {
    let mut group = c.benchmark_group("counters");
    group.throughput(Throughput::Elements(ITEMS as u64));

    group.bench_function("shared_counter_4_threads", |b| {
        b.iter(|| {
            let counter = SharedCounter::<i64>::new();
            thread::scope(|s| {
                for worker in 0..4 {
                    let counter = &counter;
                    s.spawn(move || {
                        for _ in 0..ITEMS / 4 {
                            counter.increment(1, worker);
                        }
                    });
                }
            });
            black_box(counter.get())
        });
    });

    group.bench_function("atomic_coordinator_4_threads", |b| {
        b.iter(|| {
            let coordinator = AtomicCoordinator::for_workers(4, ITEMS / 4).unwrap();
            thread::scope(|s| {
                for _ in 0..4 {
                    s.spawn(|| {
                        for _ in 0..ITEMS / 4 {
                            coordinator.fetch_add(1);
                        }
                        coordinator.report_progress();
                    });
                }
            });
            black_box(coordinator.is_done())
        });
    });

    group.bench_function("std_mutex_vec_deque_baseline", |b| {
        b.iter(|| {
            let queue = Mutex::new(VecDeque::new());
            for i in 0..ITEMS {
                queue.lock().unwrap().push_back(i);
            }
            while let Some(i) = queue.lock().unwrap().pop_front() {
                black_box(i);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_bounded_buffer, bench_channel, bench_counters);
criterion_main!(benches);
