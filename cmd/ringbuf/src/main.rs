//! RingBuf demo - one producer thread, one blocking consumer.
//!
//! The producer writes `--count` messages, one every `--interval-ms`, and
//! closes the buffer once the consumer has drained it. The consumer reads
//! with `wait_read` until the buffer reports closure.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use giztoy_ringbuf::{Config, RingBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ringbuf-demo")]
#[command(about = "Producer/consumer demo for the auto-growing ring buffer")]
#[command(version)]
struct Cli {
    /// Initial buffer capacity
    #[arg(long, default_value_t = 16)]
    capacity: usize,

    /// Number of messages to produce
    #[arg(short = 'n', long, default_value_t = 50)]
    count: usize,

    /// Delay between writes in milliseconds
    #[arg(short = 'i', long, default_value_t = 500)]
    interval_ms: u64,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone)]
struct Msg {
    id: usize,
    sent_at: Instant,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .init();

    let buf = RingBuf::<Msg>::with_config(Config::with_capacity(cli.capacity))
        .context("invalid buffer configuration")?;
    info!(capacity = buf.capacity(), count = cli.count, "starting producer");

    let producer_buf = buf.clone();
    let count = cli.count;
    let interval = Duration::from_millis(cli.interval_ms);
    let producer = thread::spawn(move || {
        for id in 0..count {
            producer_buf.write(Msg {
                id,
                sent_at: Instant::now(),
            });
            thread::sleep(interval);
        }

        // Close discards unread data, so let the consumer catch up first.
        while !producer_buf.is_empty() {
            thread::sleep(Duration::from_millis(1));
        }
        producer_buf.close();
    });

    // blocking read
    while let Some(msg) = buf.wait_read() {
        println!("read msg: {}", msg.id);
        debug!(
            id = msg.id,
            latency = ?msg.sent_at.elapsed(),
            len = buf.len(),
            capacity = buf.capacity(),
            "received"
        );
    }

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;
    println!("close buf");
    Ok(())
}
