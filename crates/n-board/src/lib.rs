// SPDX-License-Identifier: MIT
//
// n-board — live, line-addressable status boards.
//
// A board is a fixed block of terminal rows. Each row belongs to one
// producer (a worker thread, a task, a pipeline stage) and is rewritten
// in place as that producer reports progress, so a dozen concurrent
// workers share one screen without their output interleaving.
//
// Rows are addressed by index, or by an identifier bound at construction
// and carried in tagged messages (`"<identifier>-><payload>"`). When the
// output is not a terminal the board keeps rows in memory and prints each
// one once, with its final value, when released.
//
// Module map:
//
//   board     — LineBoard and its Session guard
//   options   — construction options and their validation
//   cursor    — relative cursor bookkeeping
//   sanitize  — one line, bounded width
//   labels    — row label column
//   header    — optional ruler or header lines
//   message   — tagged message format
//   relay     — status channel and worker pool
//   error     — BoardError

pub mod board;
pub mod cursor;
pub mod error;
pub mod header;
pub mod labels;
pub mod message;
pub mod options;
pub mod relay;
pub mod sanitize;

pub use board::{DEFERRED_NOTICE, LineBoard, Session};
pub use error::{BoardError, ErrorKind};
pub use header::Header;
pub use options::{BoardOptions, SlotSource};
pub use relay::{PoolOptions, Relay, RelayTarget, StatusSender, pool_map};
pub use sanitize::Sanitizer;
