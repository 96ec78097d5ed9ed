// SPDX-License-Identifier: MIT
//
// n-lines — live status boards for concurrent work, in the terminal.
//
// This binary drives the n-board crate through four demos, each a
// different way of feeding rows:
//
//   sentences [rows]   — one thread, random-looking rows, custom labels
//   workers [n]        — n scoped threads, each owning a row by index
//   primes [limit]     — a worker pool counting primes, status relayed
//                        through a channel to identifier-addressed rows
//   threads [count]    — named threads writing tagged messages
//
// The board draws on stderr; summaries go to stdout, so
// `n-lines primes > result.txt` still shows the live board.
//
// Flags: --no-color, --header.
//
// Logging is off unless N_LINES_LOG_FILE names a file to write to;
// N_LINES_LOG sets the filter (default "info"). Never to stderr, since
// stderr belongs to the board.

use std::env;
use std::fs::File;
use std::panic;
use std::process;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use n_board::relay::available_parallelism;
use n_board::{BoardError, BoardOptions, LineBoard, PoolOptions, StatusSender, message, pool_map};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: n-lines [sentences [rows] | workers [n] | primes [limit] | threads [count]] \
                     [--no-color] [--header]";

const LABEL_NAMES: [&str; 15] = [
    "Ava", "Bruno", "Chiara", "Dmitri", "Elena", "Farid", "Greta", "Hiro", "Ines", "Jonas",
    "Kemal", "Lucia", "Mateo", "Nadia", "Oskar",
];

const WORDS: [&str; 24] = [
    "amber", "quietly", "river", "signal", "builds", "under", "northern", "lanterns", "while",
    "seven", "copper", "engines", "drift", "toward", "the", "harbor", "every", "morning",
    "patient", "clocks", "measure", "distant", "thunder", "again",
];

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    Sentences { rows: usize },
    Workers { count: usize },
    Primes { limit: u64 },
    Threads { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Args {
    demo: Demo,
    color: bool,
    header: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut color = true;
    let mut header = false;
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--no-color" => color = false,
            "--header" => header = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            other => positional.push(other),
        }
    }

    let number = |default: u64| -> Result<u64, String> {
        match positional.get(1) {
            None => Ok(default),
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) | Err(_) => Err(format!("expected a positive number, got {raw:?}")),
                Ok(n) => Ok(n),
            },
        }
    };
    let count = |default: u64| number(default).and_then(|n| usize::try_from(n).map_err(|e| e.to_string()));

    let demo = match positional.first().copied() {
        None | Some("sentences") => Demo::Sentences { rows: count(15)? },
        Some("workers") => Demo::Workers { count: count(15)? },
        Some("primes") => Demo::Primes {
            limit: number(100_000)?,
        },
        Some("threads") => Demo::Threads { count: count(10)? },
        Some(other) => return Err(format!("unknown demo {other:?}")),
    };
    if positional.len() > 2 {
        return Err(format!("unexpected argument {:?}", positional[2]));
    }
    Ok(Args {
        demo,
        color,
        header,
    })
}

// ─── Demos ──────────────────────────────────────────────────────────────────

/// Rows updated at pseudo-random positions by a single thread.
fn sentences(args: Args, rows: usize) -> Result<(), BoardError> {
    println!("Generating sentences...");
    let labels = (0..rows).map(|i| {
        let name = LABEL_NAMES[i % LABEL_NAMES.len()];
        if i < LABEL_NAMES.len() {
            name.to_owned()
        } else {
            format!("{name}{}", i / LABEL_NAMES.len())
        }
    });
    let options = BoardOptions::size(rows)
        .with_row_labels(labels)
        .max_chars(100)
        .show_header(args.header)
        .use_color(args.color);
    let mut board = LineBoard::stderr(options)?;

    let session = board.session()?;
    for step in 0..200 {
        session.set(scatter(step, rows), sentence(step))?;
        thread::sleep(Duration::from_millis(20));
    }
    session.finish()
}

/// Workers on scoped threads, each rewriting its own row.
fn workers(args: Args, count: usize) -> Result<(), BoardError> {
    println!("Total of {count} workers working concurrently");
    let options = BoardOptions::size(count)
        .show_header(args.header)
        .use_color(args.color);
    let mut board = LineBoard::stderr(options)?;

    let session = board.session()?;
    let board = &*session;
    let processed = thread::scope(|scope| {
        let handles: Vec<_> = (0..count)
            .map(|worker| scope.spawn(move || do_work(board, worker)))
            .collect();
        join_all(handles)
    })?;
    session.finish()?;

    let total: usize = processed.iter().sum();
    println!("The {count} workers processed a total of {total} items");
    Ok(())
}

fn do_work(board: &LineBoard, worker: usize) -> Result<usize, BoardError> {
    let total = 10 + (worker * 13) % 56;
    for item in 0..total {
        let pause = [50, 100, 25][(worker + item) % 3];
        thread::sleep(Duration::from_millis(pause));
        board.set(worker, format!("processed {}", sentence(worker * 100 + item)))?;
    }
    Ok(total)
}

/// Prime counting on a worker pool, status relayed to identifier rows.
fn primes(args: Args, limit: u64) -> Result<(), BoardError> {
    let start = Instant::now();
    let concurrency = available_parallelism();
    let ranges = split_ranges(limit, concurrency);
    println!(
        "Distributing {} ranges across {concurrency} workers running concurrently",
        ranges.len()
    );

    let ids = ranges.iter().map(|&(lo, hi)| format!("{lo}:{hi}"));
    let options = BoardOptions::identifiers(ids)
        .show_header(args.header)
        .use_color(args.color);
    let mut board = LineBoard::stderr(options)?;

    let counts = {
        let session = board.session()?;
        let counts = pool_map(ranges, count_primes, PoolOptions::new().on_board(&*session))?;
        session.finish()?;
        counts
    };

    let total: u64 = counts.iter().sum();
    println!(
        "Finished in {:.2} seconds\nTotal number of primes between 0-{limit}: {total}",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn count_primes((lo, hi): (u64, u64), status: &StatusSender) -> u64 {
    let id = format!("{lo}:{hi}");
    status.write_tagged(&id, &format!("processing total of {} items", hi - lo));
    let mut found = 0;
    for n in lo..hi {
        if is_prime(n) {
            found += 1;
            status.write_tagged(&id, &format!("{id} {n} is prime"));
        }
    }
    status.write_tagged(&id, &format!("{id} processing complete"));
    found
}

/// Named threads pulling items from a shared counter.
fn threads(args: Args, count: usize) -> Result<(), BoardError> {
    let ids: Vec<String> = (0..count).map(|i| format!("thread_{i}")).collect();
    let options = BoardOptions::identifiers(ids.clone())
        .show_header(args.header)
        .use_color(args.color);
    let mut board = LineBoard::stderr(options)?;

    let items = count * 50;
    let next = AtomicUsize::new(0);
    let session = board.session()?;
    let board = &*session;
    let handled = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(count);
        for id in ids {
            let next = &next;
            let handle = thread::Builder::new()
                .name(id)
                .spawn_scoped(scope, move || thread_task(board, next, items))?;
            handles.push(handle);
        }
        join_all(handles)
    })?;
    session.finish()?;

    println!(
        "{count} threads handled {} items",
        handled.iter().sum::<usize>()
    );
    Ok(())
}

fn thread_task(board: &LineBoard, next: &AtomicUsize, items: usize) -> Result<usize, BoardError> {
    let current = thread::current();
    let name = current.name().unwrap_or("thread");
    let mut handled = 0;
    loop {
        let item = next.fetch_add(1, Ordering::Relaxed);
        if item >= items {
            return Ok(handled);
        }
        board.write(&message::tag(name, &format!("{name}: {item}_{}", sentence(item))))?;
        thread::sleep(Duration::from_millis([40, 90, 160, 300][item % 4]));
        handled += 1;
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn join_all<T>(
    handles: Vec<thread::ScopedJoinHandle<'_, Result<T, BoardError>>>,
) -> Result<Vec<T>, BoardError> {
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.join() {
            Ok(result) => results.push(result?),
            Err(payload) => panic::resume_unwind(payload),
        }
    }
    Ok(results)
}

/// A row for step `step`, spread over the board without a visible pattern.
const fn scatter(step: usize, rows: usize) -> usize {
    (step * 7 + step / rows) % rows
}

/// A deterministic, sentence-shaped string.
fn sentence(seed: usize) -> String {
    let len = 4 + seed % 7;
    let mut words: Vec<&str> = (0..len)
        .map(|i| WORDS[(seed * 31 + i * 17 + i * i) % WORDS.len()])
        .collect();
    let first = words.remove(0);
    let mut text = first[..1].to_uppercase() + &first[1..];
    for word in words {
        text.push(' ');
        text.push_str(word);
    }
    text.push('.');
    text
}

/// Split `0..limit` into about `parts` equal half-open ranges.
fn split_ranges(limit: u64, parts: usize) -> Vec<(u64, u64)> {
    let parts = u64::try_from(parts.max(1)).unwrap_or(1);
    let step = (limit / parts).max(1);
    (0..limit)
        .step_by(usize::try_from(step).unwrap_or(usize::MAX))
        .map(|lo| (lo, (lo + step).min(limit)))
        .collect()
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

fn init_logging() {
    let Ok(path) = env::var("N_LINES_LOG_FILE") else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("n-lines: {path}: {e}");
            return;
        }
    };
    let filter = EnvFilter::try_from_env("N_LINES_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    init_logging();

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&argv).unwrap_or_else(|e| {
        eprintln!("n-lines: {e}\n{USAGE}");
        process::exit(1);
    });
    info!(?args, "starting demo");

    let result = match args.demo {
        Demo::Sentences { rows } => sentences(args, rows),
        Demo::Workers { count } => workers(args, count),
        Demo::Primes { limit } => primes(args, limit),
        Demo::Threads { count } => threads(args, count),
    };
    if let Err(e) = result {
        eprintln!("n-lines: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
