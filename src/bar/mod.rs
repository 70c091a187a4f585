//! Bar module containing the progress state, its configuration and builder.
//!
//! # Overview
//!
//! - `bar` - The [`Bar`] handle: counter, total, segments, sink and the flush protocol
//! - `snapshot` - [`Snapshot`], the consistent view segments render from
//! - `config` - [`BarConfig`] and the callback types
//! - `builder` - [`BarBuilder`] for fluent configuration
//! - `reader` - [`Reader`], a byte-counting [`std::io::Read`] wrapper
//!
//! # Wire format
//!
//! Every frame is written as `\r\x1b[K<prefix><segments><suffix>` in one write
//! call. Closing writes a single `\n`. Messages from [`Bar::log`] are written
//! as `\r\x1b[K<message>\n`, so they land above the redrawn line.

pub mod bar;
pub mod builder;
pub mod config;
pub mod reader;
pub mod snapshot;

pub use bar::{Bar, CLEAR_LINE};
pub use builder::BarBuilder;
pub use config::{BarConfig, FinalCallback, Listener};
pub use reader::Reader;
pub use snapshot::Snapshot;
