//! Terminal-side coordination for dining notices.
//!
//! Each terminal (diner device, server tablet, kitchen tablet) owns one
//! [`Terminal`] coordinator. It keeps a local view of the shared orders
//! reconciled from polls, push events and its own optimistic writes, and turns
//! status changes into one-shot notifications.
//!
//! ```rust,ignore
//! let sync = SyncClient::new(store, notifier, scope);
//! let (terminal, events) = Terminal::new(TerminalKind::Server, sync, config);
//! let handle = terminal.spawn(CancellationToken::new());
//! handle.approve(order_id).await?;
//! ```

pub mod accommodation;
pub mod book;
pub mod clock;
pub mod composer;
pub mod config;
pub mod error;
pub mod expiry;
pub mod grouping;
pub mod notifier;
pub mod queue;
pub mod sync;
pub mod terminal;
pub mod timer;
pub mod view;

pub use clock::{Clock, SystemClock, TokioClock};
pub use config::TerminalConfig;
pub use error::{Error, Result};
pub use sync::SyncClient;
pub use terminal::{Command, Terminal, TerminalEvent, TerminalHandle, TerminalKind};
