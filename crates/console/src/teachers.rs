//! Teacher list for one school. Same fetch lifecycle as the student roster,
//! without server paging and with a search-only filter.

use rollcall_core::error::{Result, RollcallError};
use rollcall_core::gateway::TeacherGateway;
use rollcall_core::models::teacher::{NewTeacher, Teacher};
use rollcall_core::validation::validate_new_teacher;
use tracing::{debug, info, warn};

use crate::fetch::{FetchGuard, FetchState, FetchTicket};

#[derive(Debug, Default)]
pub struct TeacherRosterViewModel {
    school_id: Option<String>,
    search_term: String,
    state: FetchState<Vec<Teacher>>,
    guard: FetchGuard,
}

impl TeacherRosterViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn school_id(&self) -> Option<&str> {
        self.school_id.as_deref()
    }

    pub fn state(&self) -> &FetchState<Vec<Teacher>> {
        &self.state
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn teachers(&self) -> &[Teacher] {
        self.state.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    /// Loaded teachers whose name or email contains the search term,
    /// ignoring case.
    pub fn visible(&self) -> Vec<&Teacher> {
        let needle = self.search_term.to_lowercase();
        self.teachers()
            .iter()
            .filter(|t| {
                needle.is_empty()
                    || t.name.to_lowercase().contains(&needle)
                    || t.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn set_search(&mut self, term: &str) {
        self.search_term = term.to_string();
    }

    pub fn select_school(&mut self, school_id: &str) -> FetchTicket {
        self.school_id = Some(school_id.to_string());
        self.state = FetchState::Loading;
        self.guard.issue(school_id, 1)
    }

    pub fn unmount(&mut self) {
        self.guard.cancel();
        self.school_id = None;
        self.state = FetchState::Idle;
    }

    pub fn refresh(&mut self) -> Option<FetchTicket> {
        let school_id = self.school_id.as_deref()?;
        let ticket = self.guard.issue(school_id, 1);
        self.state = FetchState::Loading;
        Some(ticket)
    }

    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.state.is_failed() {
            self.refresh()
        } else {
            None
        }
    }

    /// Apply a list result. Returns `false` for a stale ticket.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Teacher>>) -> bool {
        if !self.guard.settle(&ticket) {
            debug!(school_id = %ticket.school_id, "Discarding stale teacher list");
            return false;
        }
        self.state = match result {
            Ok(teachers) => {
                debug!(school_id = %ticket.school_id, count = teachers.len(), "Teachers loaded");
                FetchState::Loaded(teachers)
            }
            Err(err) => {
                warn!(school_id = %ticket.school_id, error = %err, "Teacher fetch failed");
                FetchState::Failed(err)
            }
        };
        true
    }

    pub async fn load<G>(&mut self, gateway: &G, ticket: FetchTicket) -> bool
    where
        G: TeacherGateway + ?Sized,
    {
        let result = gateway.list_teachers(&ticket.school_id).await;
        self.complete_fetch(ticket, result)
    }

    /// Create a teacher account for the selected school, then reload.
    pub async fn create_teacher<G>(&mut self, gateway: &G, mut teacher: NewTeacher) -> Result<Teacher>
    where
        G: TeacherGateway + ?Sized,
    {
        let school_id = self
            .school_id
            .clone()
            .ok_or_else(|| RollcallError::invalid("schoolId", "No school selected"))?;
        if teacher.school_id.is_empty() {
            teacher.school_id = school_id;
        }
        validate_new_teacher(&teacher)?;

        let created = gateway.create_teacher(&teacher).await?;
        info!(teacher_id = %created.id, "Teacher created");
        if let Some(ticket) = self.refresh() {
            self.load(gateway, ticket).await;
        }
        Ok(created)
    }
}
