//! Line-protocol runner for the royale decision engine.
//!
//! - **stdin**: startup site table, then one snapshot per turn
//! - **stdout**: two command lines per turn, nothing else
//! - **stderr**: logs
//!
//! See [`protocol`] for the token layout.
//!
//! # Example
//!
//! ```bash
//! # Play against a referee on stdin/stdout
//! cargo run -p royale_bot
//!
//! # Re-run a recorded transcript
//! cargo run -p royale_bot -- replay --file match.txt
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod protocol;
pub mod runner;

pub use protocol::{ProtocolError, TokenReader};
pub use runner::{BotRunner, SessionSummary};
