//! Fetch lifecycle state and staleness tags for in-flight requests.

use rollcall_core::error::RollcallError;

/// Lifecycle of one remote collection owned by a view model.
#[derive(Debug, Default)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// Terminal for that attempt. Nothing retries automatically.
    Failed(RollcallError),
}

impl<T> FetchState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, FetchState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RollcallError> {
        match self {
            FetchState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading => "loading",
            FetchState::Loaded(_) => "loaded",
            FetchState::Failed(_) => "failed",
        }
    }
}

/// Tag stamped on a fetch when it is issued.
///
/// A completion is applied only while its ticket is still the newest one
/// issued. The generation distinguishes two fetches for the same school and
/// page, e.g. a refresh issued while the first load is still pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub school_id: String,
    pub page: u32,
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues tickets and remembers which one is current.
#[derive(Debug, Default)]
pub struct FetchGuard {
    generation: u64,
    current: Option<FetchTicket>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one.
    pub fn issue(&mut self, school_id: &str, page: u32) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            school_id: school_id.to_string(),
            page,
            generation: self.generation,
        };
        self.current = Some(ticket.clone());
        ticket
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    /// Accept the completion of `ticket` if it is current. A settled ticket
    /// cannot be applied twice.
    pub fn settle(&mut self, ticket: &FetchTicket) -> bool {
        if self.is_current(ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Invalidate whatever is in flight.
    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.current.as_ref()
    }
}
