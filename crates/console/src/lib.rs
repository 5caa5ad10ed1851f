//! Rollcall console state: roster filtering, server-backed pagination, the
//! fetch lifecycle of the student and teacher lists, the signed-in session,
//! and plain-text renderers over all of it.
//!
//! Nothing here draws a UI. A front end owns a [`roster::RosterViewModel`],
//! forwards user input to it, runs the fetch tickets it hands back against a
//! gateway from [`session::SessionContext::gateway`], and renders what the
//! view model exposes.

pub mod fetch;
pub mod filter;
pub mod pagination;
pub mod render;
pub mod roster;
pub mod session;
pub mod teachers;

#[cfg(test)]
mod testing;

pub use fetch::{FetchState, FetchTicket};
pub use filter::{visible, FilterState};
pub use pagination::{Pagination, PAGE_SIZE};
pub use roster::{EmptyState, FetchOutcome, RosterViewModel};
pub use session::{SessionContext, TokenStore};
