use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{EMPLOYEE_NUMBER_RE, hire_date_not_future};

#[derive(Serialize, Deserialize)]
pub struct Teacher {
    pub teacher_id: i64,
    pub teacher_fname: String,
    pub teacher_lname: String,
    pub employee_number: String,
    pub hire_date: NaiveDate,
    pub salary: f64,
    /// Populated by the find operation only; list leaves it empty.
    pub classes: Vec<ClassSummary>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbTeacher {
    pub teacherid: Option<i64>,
    pub teacherfname: Option<String>,
    pub teacherlname: Option<String>,
    pub employeenumber: Option<String>,
    pub hiredate: Option<NaiveDate>,
    pub salary: Option<f64>,
}

impl From<DbTeacher> for Teacher {
    fn from(row: DbTeacher) -> Self {
        Self {
            teacher_id: row.teacherid.unwrap_or_default(),
            teacher_fname: row.teacherfname.unwrap_or_default(),
            teacher_lname: row.teacherlname.unwrap_or_default(),
            employee_number: row.employeenumber.unwrap_or_default(),
            hire_date: row.hiredate.unwrap_or_default(),
            salary: row.salary.unwrap_or_default(),
            classes: Vec::new(),
        }
    }
}

/// Candidate teacher for create and update. The checks mirror the table
/// constraints plus the employee number format and the hire-date cutoff.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TeacherPayload {
    #[validate(length(min = 1, message = "First name is required"))]
    pub teacher_fname: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub teacher_lname: String,
    #[validate(regex(
        path = *EMPLOYEE_NUMBER_RE,
        message = "Employee number must be 'T' followed by 3 digits"
    ))]
    pub employee_number: String,
    #[validate(custom(function = hire_date_not_future))]
    pub hire_date: NaiveDate,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: f64,
}

/// Nested projection of a class on a teacher record. Dates and the owning
/// teacher id are left out of the embedded form.
#[derive(Serialize, Deserialize, Clone)]
pub struct ClassSummary {
    pub class_id: i64,
    pub class_code: String,
    pub class_name: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbClassSummary {
    pub classid: Option<i64>,
    pub classcode: Option<String>,
    pub classname: Option<String>,
}

impl From<DbClassSummary> for ClassSummary {
    fn from(row: DbClassSummary) -> Self {
        Self {
            class_id: row.classid.unwrap_or_default(),
            class_code: row.classcode.unwrap_or_default(),
            class_name: row.classname.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Student {
    pub student_id: i64,
    pub student_fname: String,
    pub student_lname: String,
    pub student_number: String,
    pub enrol_date: NaiveDate,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbStudent {
    pub studentid: Option<i64>,
    pub studentfname: Option<String>,
    pub studentlname: Option<String>,
    pub studentnumber: Option<String>,
    pub enroldate: Option<NaiveDate>,
}

impl From<DbStudent> for Student {
    fn from(row: DbStudent) -> Self {
        Self {
            student_id: row.studentid.unwrap_or_default(),
            student_fname: row.studentfname.unwrap_or_default(),
            student_lname: row.studentlname.unwrap_or_default(),
            student_number: row.studentnumber.unwrap_or_default(),
            enrol_date: row.enroldate.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Class {
    pub class_id: i64,
    pub class_code: String,
    pub class_name: String,
    /// None once the owning teacher has been deleted.
    pub teacher_id: Option<i64>,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbClass {
    pub classid: Option<i64>,
    pub classcode: Option<String>,
    pub classname: Option<String>,
    pub teacherid: Option<i64>,
    pub startdate: Option<NaiveDate>,
    pub finishdate: Option<NaiveDate>,
}

impl From<DbClass> for Class {
    fn from(row: DbClass) -> Self {
        Self {
            class_id: row.classid.unwrap_or_default(),
            class_code: row.classcode.unwrap_or_default(),
            class_name: row.classname.unwrap_or_default(),
            teacher_id: row.teacherid,
            start_date: row.startdate.unwrap_or_default(),
            finish_date: row.finishdate.unwrap_or_default(),
        }
    }
}
