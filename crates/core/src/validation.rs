//! Local schema checks run before a create request leaves the console.
//!
//! The backend repeats these checks; running them locally lets the form show
//! field-level messages without a round trip.

use chrono::{DateTime, NaiveDate};

use crate::error::{FieldErrors, Result};
use crate::models::certificate::NewCertificateTemplate;
use crate::models::common::Grade;
use crate::models::school::NewSchool;
use crate::models::student::{NewStudent, StudentUpdate};
use crate::models::teacher::NewTeacher;

const MIN_CONTACT_LEN: usize = 5;
const MIN_PASSWORD_LEN: usize = 6;

/// Validate a new student, collecting every violation.
pub fn validate_new_student(student: &NewStudent) -> Result<()> {
    let mut errors = FieldErrors::new();

    require(&mut errors, "studentId", &student.student_id, "Student ID is required");
    require(
        &mut errors,
        "registerNumber",
        &student.register_number,
        "Register Number is required",
    );
    require(&mut errors, "firstName", &student.first_name, "First name is required");
    require(&mut errors, "lastName", &student.last_name, "Last name is required");
    require(&mut errors, "birthPlace", &student.birth_place, "Birth place is required");
    require(&mut errors, "fatherName", &student.father_name, "Father name is required");
    require(&mut errors, "motherName", &student.mother_name, "Mother name is required");
    require(&mut errors, "cast", &student.cast, "Cast is required");
    require(&mut errors, "religion", &student.religion, "Religion is required");
    require(&mut errors, "nationality", &student.nationality, "Nationality is required");
    require(&mut errors, "address", &student.address, "Address is required");
    require(&mut errors, "schoolId", &student.school_id, "School ID is required");

    if !is_date(&student.date_of_birth) {
        errors.push("dateOfBirth", "Invalid date format");
    }
    if !is_date(&student.admission_date) {
        errors.push("admissionDate", "Invalid date format");
    }
    if student.roll_number < 1 {
        errors.push("rollNumber", "Roll number is required");
    }
    if Grade::new(student.grade).is_none() {
        errors.push("grade", "Grade must be a number between 1 and 12");
    }
    if !is_aadhaar(&student.adhaar) {
        errors.push(
            "adhaar",
            "Aadhaar must be 12 digits and not start with 0 or 1",
        );
    }
    if student.contact_number.trim().chars().count() < MIN_CONTACT_LEN {
        errors.push("contactNumber", "Contact number is required");
    }
    for (i, field) in student.custom_fields.iter().enumerate() {
        if field.key.trim().is_empty() {
            errors.push(format!("customFields[{i}].key"), "Field name is required");
        }
    }

    errors.into_result()
}

/// Validate the fields an edit actually sets. Absent fields are left alone.
pub fn validate_student_update(update: &StudentUpdate) -> Result<()> {
    let mut errors = FieldErrors::new();

    let required = [
        ("firstName", &update.first_name, "First name is required"),
        ("lastName", &update.last_name, "Last name is required"),
        ("birthPlace", &update.birth_place, "Birth place is required"),
        ("fatherName", &update.father_name, "Father name is required"),
        ("motherName", &update.mother_name, "Mother name is required"),
        ("address", &update.address, "Address is required"),
    ];
    for (field, value, message) in required {
        if let Some(value) = value {
            require(&mut errors, field, value, message);
        }
    }

    if let Some(dob) = &update.date_of_birth {
        if !is_date(dob) {
            errors.push("dateOfBirth", "Invalid date format");
        }
    }
    if update.roll_number == Some(0) {
        errors.push("rollNumber", "Roll number must be a positive integer");
    }
    if let Some(grade) = update.grade {
        if Grade::new(grade).is_none() {
            errors.push("grade", "Grade must be a number between 1 and 12");
        }
    }
    if let Some(contact) = &update.contact_number {
        if contact.trim().chars().count() < MIN_CONTACT_LEN {
            errors.push("contactNumber", "Contact number is required");
        }
    }
    if let Some(fields) = &update.custom_fields {
        for (i, field) in fields.iter().enumerate() {
            if field.key.trim().is_empty() {
                errors.push(format!("customFields[{i}].key"), "Field name is required");
            }
        }
    }

    errors.into_result()
}

/// Validate a new teacher account.
pub fn validate_new_teacher(teacher: &NewTeacher) -> Result<()> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "name", &teacher.name, "Name is required");
    if !is_email(&teacher.email) {
        errors.push("email", "Invalid email address");
    }
    if teacher.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            "Password must be at least 6 characters long",
        );
    }
    require(&mut errors, "schoolId", &teacher.school_id, "School ID is required");
    errors.into_result()
}

/// Validate a new school.
pub fn validate_new_school(school: &NewSchool) -> Result<()> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "name", &school.name, "School name is required");
    require(&mut errors, "adminId", &school.admin_id, "Admin is required");
    require(
        &mut errors,
        "principalName",
        &school.principal_name,
        "Principal name is required",
    );
    require(&mut errors, "address", &school.address, "Address is required");
    if school.contact_number.trim().chars().count() < MIN_CONTACT_LEN {
        errors.push("contactNumber", "Contact number is required");
    }
    errors.into_result()
}

/// Validate a certificate template before saving it.
pub fn validate_new_template(template: &NewCertificateTemplate) -> Result<()> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "name", &template.name, "Certificate title is required");
    require(&mut errors, "templateCode", &template.template_code, "ZPL code is required");
    require(&mut errors, "schoolId", &template.school_id, "School ID is required");
    errors.into_result()
}

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field, message);
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn is_date(value: &str) -> bool {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

/// Twelve ASCII digits, the first in 2..=9.
pub fn is_aadhaar(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 12
        && bytes.iter().all(u8::is_ascii_digit)
        && (b'2'..=b'9').contains(&bytes[0])
}

fn is_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollcallError;
    use crate::models::common::{CustomField, Division, Gender};

    fn valid_student() -> NewStudent {
        NewStudent {
            student_id: "STU-001".into(),
            register_number: "REG-17".into(),
            first_name: "John".into(),
            middle_name: None,
            last_name: "Doe".into(),
            date_of_birth: "2012-04-09".into(),
            birth_place: "Pune".into(),
            gender: Gender::Male,
            roll_number: 7,
            father_name: "Richard".into(),
            mother_name: "Jane".into(),
            adhaar: "234567890123".into(),
            cast: "General".into(),
            religion: "None".into(),
            nationality: "Indian".into(),
            grade: 6,
            division: Division::B,
            contact_number: "9876543210".into(),
            address: "12 Main Road".into(),
            previous_school_name: None,
            admission_date: "2019-06-01T00:00:00Z".into(),
            custom_fields: vec![],
            school_id: "school-1".into(),
        }
    }

    fn field_errors(result: Result<()>) -> FieldErrors {
        match result {
            Err(RollcallError::Validation(fields)) => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_student_passes() {
        validate_new_student(&valid_student()).unwrap();
    }

    #[test]
    fn collects_every_violation() {
        let mut s = valid_student();
        s.first_name = "  ".into();
        s.grade = 13;
        s.roll_number = 0;
        s.school_id = String::new();
        let errors = field_errors(validate_new_student(&s));
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert!(errors.get("grade").is_some());
        assert!(errors.get("rollNumber").is_some());
        assert!(errors.get("schoolId").is_some());
    }

    #[test]
    fn rejects_bad_dates() {
        let mut s = valid_student();
        s.date_of_birth = "09/04/2012".into();
        let errors = field_errors(validate_new_student(&s));
        assert_eq!(errors.get("dateOfBirth"), Some("Invalid date format"));
    }

    #[test]
    fn aadhaar_rules() {
        assert!(is_aadhaar("234567890123"));
        assert!(is_aadhaar("999999999999"));
        assert!(!is_aadhaar("134567890123"));
        assert!(!is_aadhaar("034567890123"));
        assert!(!is_aadhaar("23456789012"));
        assert!(!is_aadhaar("2345678901234"));
        assert!(!is_aadhaar("23456789012a"));
    }

    #[test]
    fn short_contact_number_rejected() {
        let mut s = valid_student();
        s.contact_number = "123".into();
        let errors = field_errors(validate_new_student(&s));
        assert!(errors.get("contactNumber").is_some());
    }

    #[test]
    fn custom_field_needs_key() {
        let mut s = valid_student();
        s.custom_fields = vec![CustomField {
            key: "".into(),
            value: "x".into(),
        }];
        let errors = field_errors(validate_new_student(&s));
        assert!(errors.get("customFields[0].key").is_some());
    }

    #[test]
    fn update_checks_only_fields_it_sets() {
        assert!(validate_student_update(&StudentUpdate::default()).is_ok());

        let update = StudentUpdate {
            first_name: Some("  ".into()),
            roll_number: Some(0),
            grade: Some(13),
            date_of_birth: Some("09/04/2012".into()),
            ..Default::default()
        };
        let errors = field_errors(validate_student_update(&update));
        assert_eq!(errors.len(), 4);
        assert!(errors.get("firstName").is_some());
        assert!(errors.get("rollNumber").is_some());
        assert!(errors.get("grade").is_some());
        assert!(errors.get("dateOfBirth").is_some());

        let update = StudentUpdate {
            roll_number: Some(4),
            last_name: Some("Rao".into()),
            ..Default::default()
        };
        assert!(validate_student_update(&update).is_ok());
    }

    #[test]
    fn teacher_rules() {
        let ok = NewTeacher::new("Asha", "asha@school.edu", "secret1", "school-1");
        validate_new_teacher(&ok).unwrap();

        let bad = NewTeacher::new("", "asha@", "123", "");
        let errors = field_errors(validate_new_teacher(&bad));
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("email"), Some("Invalid email address"));
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("ab.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a@@b.co"));
        assert!(!is_email("a b@c.co"));
    }

    #[test]
    fn school_rules() {
        let school = NewSchool {
            name: "North High".into(),
            admin_id: "u1".into(),
            principal_name: "R. Iyer".into(),
            contact_number: "0201234567".into(),
            address: "1 College Road".into(),
            is_active: true,
        };
        validate_new_school(&school).unwrap();

        let errors = field_errors(validate_new_school(&NewSchool::default()));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn template_rules() {
        let tpl = NewCertificateTemplate {
            school_id: "s1".into(),
            name: "Bonafide".into(),
            template_code: "".into(),
        };
        let errors = field_errors(validate_new_template(&tpl));
        assert_eq!(errors.get("templateCode"), Some("ZPL code is required"));
    }
}
