//! In-memory gateways for view-model tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use rollcall_core::csv_upload::CsvUpload;
use rollcall_core::error::{Result, RollcallError};
use rollcall_core::gateway::{RosterGateway, StudentPage, TeacherGateway};
use rollcall_core::models::common::Division;
use rollcall_core::models::student::{ImportSummary, NewStudent, Student, StudentUpdate};
use rollcall_core::models::teacher::{NewTeacher, Teacher};

use crate::pagination::PAGE_SIZE;

pub(crate) fn student(
    id: &str,
    first: &str,
    last: &str,
    roll: u32,
    grade: u8,
    division: Division,
) -> Student {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "firstName": first,
        "lastName": last,
        "rollNumber": roll,
        "grade": grade,
        "division": division,
        "schoolId": "school-1"
    }))
    .unwrap()
}

/// `count` students named `Student<n>` with roll numbers 1..=count.
pub(crate) fn numbered(prefix: &str, count: u32) -> Vec<Student> {
    (1..=count)
        .map(|n| student(&format!("{prefix}-{n}"), &format!("Student{n}"), "Doe", n, 5, Division::A))
        .collect()
}

pub(crate) fn new_student(school_id: &str, first: &str) -> NewStudent {
    NewStudent {
        student_id: "STU-9".into(),
        register_number: "REG-9".into(),
        first_name: first.into(),
        last_name: "Doe".into(),
        date_of_birth: "2012-04-01".into(),
        birth_place: "Pune".into(),
        roll_number: 9,
        father_name: "Ravi".into(),
        mother_name: "Sita".into(),
        adhaar: "234567890123".into(),
        cast: "General".into(),
        religion: "Hindu".into(),
        nationality: "Indian".into(),
        grade: 5,
        division: Division::A,
        contact_number: "9876543210".into(),
        address: "12 Main Road".into(),
        admission_date: "2020-06-01".into(),
        school_id: school_id.into(),
        ..Default::default()
    }
}

pub(crate) const IMPORT_CSV: &str = "firstName,lastName,rollNumber,grade,division\nAsha,Rao,1,5,A\nRavi,Kumar,2,5,B\n";

/// Server-paged roster held in memory, with scriptable failures.
#[derive(Default)]
pub(crate) struct ScriptedRoster {
    schools: Mutex<HashMap<String, Vec<Student>>>,
    failures: Mutex<VecDeque<RollcallError>>,
    import: Mutex<Option<ImportSummary>>,
    calls: Mutex<Vec<String>>,
    omit_total: bool,
    next_id: Mutex<u32>,
}

impl ScriptedRoster {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pages come back without a `total`, like older backend revisions.
    pub(crate) fn without_totals() -> Self {
        Self {
            omit_total: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_school(self, school_id: &str, students: Vec<Student>) -> Self {
        self.schools
            .lock()
            .unwrap()
            .insert(school_id.to_string(), students);
        self
    }

    pub(crate) fn fail_next(&self, err: RollcallError) {
        self.failures.lock().unwrap().push_back(err);
    }

    pub(crate) fn import_reports(&self, summary: ImportSummary) {
        *self.import.lock().unwrap() = Some(summary);
    }

    pub(crate) fn truncate(&self, school_id: &str, len: usize) {
        if let Some(list) = self.schools.lock().unwrap().get_mut(school_id) {
            list.truncate(len);
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RosterGateway for ScriptedRoster {
    async fn fetch_page(&self, school_id: &str, page: u32) -> Result<StudentPage> {
        self.record(format!("fetch {school_id} {page}"))?;
        let schools = self.schools.lock().unwrap();
        let Some(all) = schools.get(school_id) else {
            return Ok(StudentPage::empty());
        };
        let offset = (page.max(1) as usize - 1) * PAGE_SIZE as usize;
        let records: Vec<Student> = all.iter().skip(offset).take(PAGE_SIZE as usize).cloned().collect();
        let total = (!self.omit_total).then_some(all.len() as u64);
        Ok(StudentPage { records, total })
    }

    async fn create(&self, new: &NewStudent) -> Result<Student> {
        self.record(format!("create {}", new.first_name))?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("new-{next}")
        };
        let mut value = serde_json::to_value(new).unwrap();
        value["_id"] = serde_json::json!(id);
        let created: Student = serde_json::from_value(value).unwrap();
        self.schools
            .lock()
            .unwrap()
            .entry(new.school_id.clone())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, update: &StudentUpdate) -> Result<Student> {
        self.record(format!("update {id}"))?;
        let mut schools = self.schools.lock().unwrap();
        let found = schools
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|s| s.id == id)
            .ok_or_else(|| RollcallError::NotFound(format!("student {id}")))?;
        if let Some(first) = &update.first_name {
            found.first_name = first.clone();
        }
        if let Some(last) = &update.last_name {
            found.last_name = last.clone();
        }
        Ok(found.clone())
    }

    async fn bulk_import(&self, school_id: &str, file: &CsvUpload) -> Result<ImportSummary> {
        self.record(format!("import {school_id} {}", file.file_name))?;
        Ok(self.import.lock().unwrap().take().unwrap_or_default())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.record(format!("remove {id}"))?;
        let mut schools = self.schools.lock().unwrap();
        let mut removed = false;
        for list in schools.values_mut() {
            let before = list.len();
            list.retain(|s| s.id != id);
            removed |= list.len() != before;
        }
        if removed {
            Ok(())
        } else {
            Err(RollcallError::NotFound(format!("student {id}")))
        }
    }
}

pub(crate) fn teacher(id: &str, name: &str, email: &str) -> Teacher {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "name": name,
        "email": email,
        "schoolId": "school-1"
    }))
    .unwrap()
}

/// Teacher list held in memory.
#[derive(Default)]
pub(crate) struct ScriptedStaff {
    teachers: Mutex<Vec<Teacher>>,
    failures: Mutex<VecDeque<RollcallError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedStaff {
    pub(crate) fn with_teachers(teachers: Vec<Teacher>) -> Self {
        Self {
            teachers: Mutex::new(teachers),
            ..Self::default()
        }
    }

    pub(crate) fn fail_next(&self, err: RollcallError) {
        self.failures.lock().unwrap().push_back(err);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TeacherGateway for ScriptedStaff {
    async fn list_teachers(&self, school_id: &str) -> Result<Vec<Teacher>> {
        self.record(format!("list {school_id}"))?;
        Ok(self
            .teachers
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn create_teacher(&self, new: &NewTeacher) -> Result<Teacher> {
        self.record(format!("create {}", new.email))?;
        let mut teachers = self.teachers.lock().unwrap();
        let created = Teacher {
            id: format!("t-{}", teachers.len() + 1),
            name: new.name.clone(),
            email: new.email.clone(),
            role: new.role,
            school_id: new.school_id.clone(),
            is_active: new.is_active,
            created_at: None,
        };
        teachers.push(created.clone());
        Ok(created)
    }
}
