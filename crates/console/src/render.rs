//! Plain-text renderers over view-model output.

use rollcall_core::error::RollcallError;
use rollcall_core::models::student::{ImportSummary, Student};

use crate::fetch::FetchState;
use crate::filter::{DivisionFilter, FilterState, GradeFilter};
use crate::pagination::Pagination;
use crate::roster::{EmptyState, RosterViewModel};

pub fn list_caption(visible: usize, loaded: usize) -> String {
    format!("Showing {visible} of {loaded} students")
}

/// `None` for an empty roster.
pub fn pagination_caption(pagination: &Pagination) -> Option<String> {
    let (start, end) = pagination.item_range()?;
    let page = pagination.current_page();
    let pages = pagination.total_pages().max(page);
    let more = if pagination.is_open_ended() { "+" } else { "" };
    Some(format!(
        "Showing {start} to {end} of {total}{more} students (Page {page} of {pages}{more})",
        total = pagination.total_items(),
    ))
}

pub fn filter_chips(filter: &FilterState) -> Vec<String> {
    let mut chips = Vec::new();
    if !filter.search_term.is_empty() {
        chips.push(format!("Search: \"{}\"", filter.search_term));
    }
    if let GradeFilter::Only(grade) = filter.grade {
        chips.push(format!("Grade: {grade}"));
    }
    if let DivisionFilter::Only(division) = filter.division {
        chips.push(format!("Division: {division}"));
    }
    chips
}

/// Counts first, then one line per rejected row.
pub fn import_banner(summary: &ImportSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Saved {} students, {} failed",
        summary.saved, summary.failed
    )];
    lines.extend(summary.errors.iter().map(|e| format!("  - {e}")));
    lines
}

pub fn error_banner(err: &RollcallError) -> String {
    let detail = match err {
        RollcallError::Network(_) => "Could not reach the server.".to_string(),
        RollcallError::Validation(errors) => format!("The server rejected the request: {errors}"),
        RollcallError::NotFound(msg) => format!("Not found: {msg}"),
        RollcallError::Auth(_) => "Your session has expired. Sign in again.".to_string(),
        RollcallError::Decode(_) => "The server sent an unexpected response.".to_string(),
        other => format!("Something went wrong: {other}"),
    };
    format!("{detail} Press retry to try again.")
}

pub fn empty_state_message(state: EmptyState) -> &'static str {
    match state {
        EmptyState::NoStudents => "No students found for this school.",
        EmptyState::NoMatches => "No students match the current filters.",
    }
}

pub fn student_row(student: &Student) -> String {
    format!(
        "{:>4}  {:<32}  Grade {}-{}",
        student.roll_number,
        student.full_name(),
        student.grade,
        student.division
    )
}

/// The whole student list screen.
pub fn roster_screen(vm: &RosterViewModel) -> String {
    let mut out = Vec::new();

    if let Some(summary) = vm.import_outcome() {
        out.extend(import_banner(summary));
    }

    match vm.state() {
        FetchState::Idle => out.push("Select a school to view its students.".to_string()),
        FetchState::Loading => out.push("Loading students...".to_string()),
        FetchState::Failed(err) => out.push(error_banner(err)),
        FetchState::Loaded(records) => {
            let chips = filter_chips(vm.filter());
            if !chips.is_empty() {
                out.push(format!("Filters: {}", chips.join(" | ")));
            }
            let visible = vm.visible();
            out.push(list_caption(visible.len(), records.len()));
            match vm.empty_state() {
                Some(state) => out.push(empty_state_message(state).to_string()),
                None => out.extend(visible.into_iter().map(student_row)),
            }
            if let Some(caption) = pagination_caption(vm.pagination()) {
                out.push(caption);
            }
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{numbered, student, ScriptedRoster, IMPORT_CSV};
    use rollcall_core::csv_upload::CsvUpload;
    use rollcall_core::models::common::{Division, Grade};

    #[test]
    fn pagination_caption_counts() {
        let mut p = Pagination::new();
        p.record_server_total(Some(45), 20);
        assert_eq!(
            pagination_caption(&p).unwrap(),
            "Showing 1 to 20 of 45 students (Page 1 of 3)"
        );
        p.go_to_page(3);
        assert_eq!(
            pagination_caption(&p).unwrap(),
            "Showing 41 to 45 of 45 students (Page 3 of 3)"
        );
    }

    #[test]
    fn pagination_caption_hidden_when_empty() {
        let mut p = Pagination::new();
        p.record_server_total(Some(0), 0);
        assert_eq!(pagination_caption(&p), None);
    }

    #[test]
    fn open_ended_caption_marks_lower_bound() {
        let mut p = Pagination::new();
        p.record_server_total(None, 20);
        assert_eq!(
            pagination_caption(&p).unwrap(),
            "Showing 1 to 20 of 20+ students (Page 1 of 1+)"
        );
    }

    #[test]
    fn chips_only_for_active_filters() {
        assert!(filter_chips(&FilterState::default()).is_empty());
        let filter = FilterState {
            search_term: "jo".into(),
            grade: GradeFilter::Only(Grade::new(7).unwrap()),
            division: DivisionFilter::Only(Division::B),
        };
        assert_eq!(
            filter_chips(&filter),
            vec!["Search: \"jo\"", "Grade: 7", "Division: B"]
        );
    }

    #[test]
    fn import_banner_shows_both_counts_and_rows() {
        let summary = ImportSummary {
            saved: 18,
            failed: 2,
            errors: vec!["Row 3: invalid grade".into(), "Row 7: missing lastName".into()],
        };
        assert_eq!(
            import_banner(&summary),
            vec![
                "Saved 18 students, 2 failed",
                "  - Row 3: invalid grade",
                "  - Row 7: missing lastName",
            ]
        );
    }

    #[test]
    fn error_banner_offers_retry() {
        let banner = error_banner(&RollcallError::Network("connection reset".into()));
        assert_eq!(banner, "Could not reach the server. Press retry to try again.");

        let banner = error_banner(&RollcallError::invalid("grade", "out of range"));
        assert!(banner.contains("grade: out of range"));
        assert!(banner.ends_with("Press retry to try again."));
    }

    #[test]
    fn student_row_layout() {
        let s = student("1", "Asha", "Rao", 7, 5, Division::C);
        let row = student_row(&s);
        assert!(row.starts_with("   7  Asha Rao"));
        assert!(row.ends_with("Grade 5-C"));
    }

    #[tokio::test]
    async fn screen_after_partial_import() {
        let gateway = ScriptedRoster::new().with_school("s1", numbered("s", 45));
        let mut vm = RosterViewModel::new();
        let t = vm.select_school("s1");
        vm.load(&gateway, t).await;

        gateway.import_reports(ImportSummary {
            saved: 18,
            failed: 2,
            errors: vec!["Row 2: duplicate rollNumber".into()],
        });
        vm.bulk_import(&gateway, &CsvUpload::from_bytes("students.csv", IMPORT_CSV))
            .await
            .unwrap();

        let screen = roster_screen(&vm);
        let lines: Vec<&str> = screen.lines().collect();
        assert_eq!(lines[0], "Saved 18 students, 2 failed");
        assert_eq!(lines[1], "  - Row 2: duplicate rollNumber");
        assert_eq!(lines[2], "Showing 20 of 20 students");
        assert_eq!(
            lines.last().copied(),
            Some("Showing 1 to 20 of 45 students (Page 1 of 3)")
        );
    }

    #[tokio::test]
    async fn screen_states() {
        let mut vm = RosterViewModel::new();
        assert_eq!(roster_screen(&vm), "Select a school to view its students.");

        let t = vm.select_school("s1");
        assert_eq!(roster_screen(&vm), "Loading students...");

        let gateway = ScriptedRoster::new();
        vm.load(&gateway, t).await;
        assert_eq!(
            roster_screen(&vm),
            "Showing 0 of 0 students\nNo students found for this school."
        );

        let gateway = ScriptedRoster::new().with_school("s1", numbered("s", 3));
        let t = vm.refresh().unwrap();
        vm.load(&gateway, t).await;
        vm.set_search("nobody");
        let screen = roster_screen(&vm);
        assert!(screen.starts_with("Filters: Search: \"nobody\"\nShowing 0 of 3 students"));
        assert!(screen.contains("No students match the current filters."));
        assert!(screen.ends_with("(Page 1 of 1)"));

        gateway.fail_next(RollcallError::Network("down".into()));
        let t = vm.refresh().unwrap();
        vm.load(&gateway, t).await;
        assert!(roster_screen(&vm).contains("Press retry"));
    }
}
