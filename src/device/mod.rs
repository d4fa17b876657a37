//! Device configurators.
//!
//! One builder per device role plus the shared command-stream model. Every
//! builder returns a `CommandStream`; the formatter in `command` renders the
//! final line sequence with all mode transitions inserted.

pub mod command;
pub mod etherchannel;
pub mod router;
pub mod switch;
pub mod switch_core;

pub use command::{Block, BlockKind, CommandStream};
pub use router::build_router;
pub use switch::build_switch;
pub use switch_core::build_switch_core;
