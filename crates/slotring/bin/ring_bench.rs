use slotring::{Behavior, Ring, RingFlags};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const TOTAL_MESSAGES: u64 = 50_000_000; // 50M total messages
const BATCH_SIZE: usize = 64;
const RING_SIZE: u32 = 1 << 16; // 64K slots

fn run_benchmark(flags: RingFlags, producers: usize, consumers: usize) -> f64 {
    let per_producer = TOTAL_MESSAGES / producers as u64;
    let total = per_producer * producers as u64;

    let ring = Arc::new(Ring::<usize>::create("bench", RING_SIZE, flags).unwrap());
    let received = Arc::new(AtomicU64::new(0));

    let start = Instant::now();

    let mut handles = vec![];
    for id in 0..producers {
        let ring = Arc::clone(&ring);
        handles.push(thread::spawn(move || {
            let batch: Vec<usize> = vec![id; BATCH_SIZE];
            let mut sent = 0u64;
            while sent < per_producer {
                let want = BATCH_SIZE.min((per_producer - sent) as usize);
                match ring.enqueue_bulk(&batch[..want], Behavior::Partial) {
                    Ok(outcome) if outcome.count > 0 => sent += outcome.count as u64,
                    _ => thread::yield_now(),
                }
            }
        }));
    }

    for _ in 0..consumers {
        let ring = Arc::clone(&ring);
        let received = Arc::clone(&received);
        handles.push(thread::spawn(move || {
            let mut out = [0usize; BATCH_SIZE];
            while received.load(Ordering::Relaxed) < total {
                let outcome = ring.dequeue_burst(&mut out);
                if outcome.count == 0 {
                    thread::yield_now();
                    continue;
                }
                received.fetch_add(outcome.count as u64, Ordering::Relaxed);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let duration = start.elapsed();
    let throughput = total as f64 / duration.as_secs_f64();

    println!(
        "| {:6} | {:5} | {:12.1} |",
        format!("{producers}P{consumers}C"),
        mode_label(flags),
        throughput / 1_000_000.0
    );
    throughput
}

fn mode_label(flags: RingFlags) -> &'static str {
    match (flags.single_producer, flags.single_consumer) {
        (true, true) => "SPSC",
        (true, false) => "SPMC",
        (false, true) => "MPSC",
        (false, false) => "MPMC",
    }
}

fn main() {
    println!("\nslotring Benchmark");
    println!("==================");
    println!(
        "Total messages: {} ({:.1}M)",
        TOTAL_MESSAGES,
        TOTAL_MESSAGES as f64 / 1_000_000.0
    );
    println!("Batch size: {BATCH_SIZE}");
    println!("Ring size: {RING_SIZE} slots\n");

    println!("| Config | Mode  | Throughput M/s |");
    println!("|--------|-------|----------------|");

    let baseline = run_benchmark(RingFlags::SPSC, 1, 1);
    run_benchmark(RingFlags::MPMC, 1, 1);
    run_benchmark(RingFlags::MPSC, 2, 1);
    run_benchmark(RingFlags::MPSC, 4, 1);
    run_benchmark(RingFlags::SPMC, 1, 2);
    run_benchmark(RingFlags::SPMC, 1, 4);
    run_benchmark(RingFlags::MPMC, 2, 2);
    let contended = run_benchmark(RingFlags::MPMC, 4, 4);

    println!("\nBenchmark complete!");
    println!(
        "\nNote: 4P4C MPMC runs at {:.2}x the 1P1C SPSC baseline",
        contended / baseline
    );
}
