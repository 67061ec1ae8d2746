//! # wlpv viewer
//!
//! Two-screen terminal browser over a [`ProtocolStore`].
//!
//! ```text
//! LIST ──enter/l──> PAGER
//!   ▲                 │
//!   └───esc/q/h───────┘   (scroll offset saved per item)
//! ```
//!
//! [`Session`] is a pure state machine fed with [`Event`]s; [`run`] wires it to the real
//! terminal through crossterm.

mod error;
mod event;
mod filter;
mod list;
mod session;
mod terminal;
mod viewport;

pub use error::{Result, ViewerError};
pub use event::{Event, Flow, Key};
pub use filter::NameFilter;
pub use list::{FilterState, ListRow, ListView};
pub use session::{ItemId, Mode, Session, ViewItem};
pub use viewport::{Viewport, WHEEL_DELTA};

use wlpv_store::ProtocolStore;

/// Blank columns left and right of the list.
pub const MARGIN_X: usize = 2;
/// Blank rows above and below the list.
pub const MARGIN_Y: usize = 1;
/// Rows reserved under the pager.
pub const FOOTER_HEIGHT: usize = 1;

/// Take over the terminal until the user quits.
///
/// Opens straight on `open`'s detail page when the store knows that name.
pub fn run(store: &ProtocolStore, open: Option<&str>) -> Result<()> {
    let mut session = Session::new(store, open);
    terminal::run(&mut session)
}

/// Cut `line` to `width` display columns, keeping ANSI styling intact.
pub(crate) fn fit_width(line: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    console::truncate_str(line, width, "").into_owned()
}
