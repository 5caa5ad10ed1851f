//! Roster view model: the single source of truth for the student list screen.
//!
//! Fetches are two-phase. [`RosterViewModel::begin_fetch`] marks the roster
//! `Loading` and hands out a [`FetchTicket`]; the caller runs the request and
//! passes the result to [`RosterViewModel::complete_fetch`], which applies it
//! only if no newer fetch was issued in the meantime. [`RosterViewModel::load`]
//! does both against a gateway.
//!
//! Mutations never patch the loaded page locally. They call the gateway and
//! then re-fetch so the list always shows what the server holds.

use rollcall_core::csv_upload::{self, CsvUpload};
use rollcall_core::error::{Result, RollcallError};
use rollcall_core::gateway::{RosterGateway, StudentPage};
use rollcall_core::models::common::{Division, Grade};
use rollcall_core::models::student::{ImportSummary, NewStudent, Student, StudentUpdate};
use rollcall_core::validation::{validate_new_student, validate_student_update};
use tracing::{debug, info, warn};

use crate::fetch::{FetchGuard, FetchState, FetchTicket};
use crate::filter::{self, DivisionFilter, FilterState, GradeFilter};
use crate::pagination::Pagination;

/// What `complete_fetch` did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued, or the view was unmounted.
    Discarded,
    /// The server total shrank below the current page; the returned ticket
    /// fetches the clamped page.
    Refetch(FetchTicket),
}

/// Why the list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The loaded page has no records.
    NoStudents,
    /// Records are loaded but the filter hides all of them.
    NoMatches,
}

#[derive(Debug, Default)]
pub struct RosterViewModel {
    school_id: Option<String>,
    filter: FilterState,
    pagination: Pagination,
    state: FetchState<Vec<Student>>,
    guard: FetchGuard,
    selected: Option<String>,
    import_outcome: Option<ImportSummary>,
}

impl RosterViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn school_id(&self) -> Option<&str> {
        self.school_id.as_deref()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn state(&self) -> &FetchState<Vec<Student>> {
        &self.state
    }

    /// Records of the loaded page, empty unless the state is `Loaded`.
    pub fn records(&self) -> &[Student] {
        self.state.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    /// The loaded page narrowed by the current filter.
    pub fn visible(&self) -> Vec<&Student> {
        filter::visible(self.records(), &self.filter)
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        let records = self.state.loaded()?;
        if records.is_empty() {
            Some(EmptyState::NoStudents)
        } else if self.visible().is_empty() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }

    pub fn import_outcome(&self) -> Option<&ImportSummary> {
        self.import_outcome.as_ref()
    }

    pub fn dismiss_import_outcome(&mut self) {
        self.import_outcome = None;
    }

    // ---- fetch lifecycle ----

    /// Start fetching the current page of the selected school.
    /// Returns `None` when no school is selected.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let school_id = self.school_id.as_deref()?;
        let ticket = self.guard.issue(school_id, self.pagination.current_page());
        debug!(
            school_id = %ticket.school_id,
            page = ticket.page,
            generation = ticket.generation(),
            "Roster fetch issued"
        );
        self.state = FetchState::Loading;
        Some(ticket)
    }

    /// Apply a fetch result if `ticket` is still the newest fetch.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<StudentPage>) -> FetchOutcome {
        if !self.guard.settle(&ticket) {
            debug!(
                school_id = %ticket.school_id,
                page = ticket.page,
                generation = ticket.generation(),
                "Discarding stale roster response"
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                self.pagination
                    .record_server_total(page.total, page.records.len());
                if page.records.is_empty() && self.pagination.clamp_to_total() {
                    debug!(
                        school_id = %ticket.school_id,
                        from = ticket.page,
                        to = self.pagination.current_page(),
                        "Page out of range after reload; clamping"
                    );
                    return match self.begin_fetch() {
                        Some(next) => FetchOutcome::Refetch(next),
                        None => FetchOutcome::Discarded,
                    };
                }

                if let Some(selected) = &self.selected {
                    if !page.records.iter().any(|s| &s.id == selected) {
                        debug!(student_id = %selected, "Selected student no longer on page");
                        self.selected = None;
                    }
                }
                debug!(
                    school_id = %ticket.school_id,
                    page = ticket.page,
                    count = page.records.len(),
                    total = self.pagination.total_items(),
                    "Roster loaded"
                );
                self.state = FetchState::Loaded(page.records);
            }
            Err(err) => {
                warn!(school_id = %ticket.school_id, page = ticket.page, error = %err, "Roster fetch failed");
                self.state = FetchState::Failed(err);
            }
        }
        FetchOutcome::Applied
    }

    /// Run `ticket` against `gateway`, following any clamp refetch.
    /// Returns whether a result was applied.
    pub async fn load<G>(&mut self, gateway: &G, mut ticket: FetchTicket) -> bool
    where
        G: RosterGateway + ?Sized,
    {
        loop {
            let result = gateway.fetch_page(&ticket.school_id, ticket.page).await;
            match self.complete_fetch(ticket, result) {
                FetchOutcome::Applied => return true,
                FetchOutcome::Discarded => return false,
                FetchOutcome::Refetch(next) => ticket = next,
            }
        }
    }

    // ---- navigation ----

    /// Mount the roster for `school_id`. Page position and totals from any
    /// previous school are dropped; the filter is kept.
    pub fn select_school(&mut self, school_id: &str) -> FetchTicket {
        debug!(school_id, "Selecting school");
        self.school_id = Some(school_id.to_string());
        self.pagination = Pagination::new();
        self.selected = None;
        self.import_outcome = None;
        let ticket = self.guard.issue(school_id, 1);
        self.state = FetchState::Loading;
        ticket
    }

    /// Leave the roster. A fetch still in flight can no longer land.
    pub fn unmount(&mut self) {
        debug!(school_id = ?self.school_id, "Unmounting roster");
        self.guard.cancel();
        self.school_id = None;
        self.pagination = Pagination::new();
        self.state = FetchState::Idle;
        self.selected = None;
        self.import_outcome = None;
    }

    pub fn go_to_page(&mut self, n: u32) -> Option<FetchTicket> {
        if self.pagination.go_to_page(n) {
            self.begin_fetch()
        } else {
            None
        }
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.go_to_page(self.pagination.current_page().saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        self.go_to_page(self.pagination.current_page().saturating_sub(1))
    }

    /// Re-fetch the current page.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.begin_fetch()
    }

    /// Manual retry after a failed fetch. Does nothing in any other state.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.state.is_failed() {
            self.begin_fetch()
        } else {
            None
        }
    }

    // ---- filters ----

    /// The term is matched as typed, surrounding whitespace included.
    pub fn set_search(&mut self, term: &str) -> Option<FetchTicket> {
        if self.filter.search_term == term {
            return None;
        }
        self.filter.search_term = term.to_string();
        self.filter_changed()
    }

    pub fn set_grade(&mut self, grade: Option<Grade>) -> Option<FetchTicket> {
        let grade = grade.map_or(GradeFilter::All, GradeFilter::Only);
        if self.filter.grade == grade {
            return None;
        }
        self.filter.grade = grade;
        self.filter_changed()
    }

    pub fn set_division(&mut self, division: Option<Division>) -> Option<FetchTicket> {
        let division = division.map_or(DivisionFilter::All, DivisionFilter::Only);
        if self.filter.division == division {
            return None;
        }
        self.filter.division = division;
        self.filter_changed()
    }

    pub fn clear_filters(&mut self) -> Option<FetchTicket> {
        if !self.filter.is_active() {
            return None;
        }
        self.filter = FilterState::default();
        self.filter_changed()
    }

    /// The filter narrows the loaded page only, so a page change is the
    /// sole reason to fetch.
    fn filter_changed(&mut self) -> Option<FetchTicket> {
        debug!(filter = ?self.filter, "Roster filter changed");
        if self.pagination.filter_changed() {
            self.begin_fetch()
        } else {
            None
        }
    }

    // ---- details ----

    /// Select a student on the loaded page. Returns whether it was found.
    pub fn open_details(&mut self, student_id: &str) -> bool {
        if self.records().iter().any(|s| s.id == student_id) {
            self.selected = Some(student_id.to_string());
            true
        } else {
            false
        }
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Student> {
        let id = self.selected.as_deref()?;
        self.records().iter().find(|s| s.id == id)
    }

    // ---- mutations ----

    fn require_school(&self) -> Result<String> {
        self.school_id
            .clone()
            .ok_or_else(|| RollcallError::invalid("schoolId", "No school selected"))
    }

    /// Validate locally, create on the server, then reload the current page.
    pub async fn create_student<G>(&mut self, gateway: &G, mut student: NewStudent) -> Result<Student>
    where
        G: RosterGateway + ?Sized,
    {
        let school_id = self.require_school()?;
        if student.school_id.is_empty() {
            student.school_id = school_id;
        } else if student.school_id != school_id {
            return Err(RollcallError::invalid(
                "schoolId",
                "Student belongs to a different school",
            ));
        }
        validate_new_student(&student)?;

        let created = gateway.create(&student).await?;
        info!(student_id = %created.id, "Student created");
        self.reload(gateway).await;
        Ok(created)
    }

    pub async fn update_student<G>(
        &mut self,
        gateway: &G,
        student_id: &str,
        update: &StudentUpdate,
    ) -> Result<Student>
    where
        G: RosterGateway + ?Sized,
    {
        self.require_school()?;
        validate_student_update(update)?;
        let updated = gateway.update(student_id, update).await?;
        info!(student_id, "Student updated");
        self.reload(gateway).await;
        Ok(updated)
    }

    pub async fn delete_student<G>(&mut self, gateway: &G, student_id: &str) -> Result<()>
    where
        G: RosterGateway + ?Sized,
    {
        self.require_school()?;
        gateway.remove(student_id).await?;
        info!(student_id, "Student deleted");
        if self.selected.as_deref() == Some(student_id) {
            self.selected = None;
        }
        self.reload(gateway).await;
        Ok(())
    }

    /// Upload a CSV file, keep the summary for display, and reload page 1.
    ///
    /// Rejected rows are part of a successful result; only transport and
    /// request-level failures are errors.
    pub async fn bulk_import<G>(&mut self, gateway: &G, file: &CsvUpload) -> Result<ImportSummary>
    where
        G: RosterGateway + ?Sized,
    {
        let school_id = self.require_school()?;
        self.import_outcome = None;
        let preflight = csv_upload::preflight(file)?;
        debug!(school_id = %school_id, rows = preflight.row_count, "CSV preflight passed");

        let summary = gateway.bulk_import(&school_id, file).await?;
        if summary.failed > 0 {
            warn!(saved = summary.saved, failed = summary.failed, "CSV import rejected rows");
        } else {
            info!(saved = summary.saved, "CSV import finished");
        }
        self.import_outcome = Some(summary.clone());
        self.pagination.reset();
        self.reload(gateway).await;
        Ok(summary)
    }

    async fn reload<G>(&mut self, gateway: &G)
    where
        G: RosterGateway + ?Sized,
    {
        if let Some(ticket) = self.begin_fetch() {
            self.load(gateway, ticket).await;
        }
    }
}
