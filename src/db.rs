use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{
    Class, ClassSummary, DbClass, DbClassSummary, DbStudent, DbTeacher, Student, Teacher,
    TeacherPayload,
};
use crate::validation::validate_teacher;

/// An absent or empty search key degrades to a wildcard that matches every
/// row.
fn like_pattern(search_key: Option<&str>) -> String {
    format!("%{}%", search_key.unwrap_or_default())
}

#[instrument]
pub async fn list_teachers(
    pool: &Pool<Sqlite>,
    search_key: Option<&str>,
) -> Result<Vec<Teacher>, AppError> {
    info!("Listing teachers");
    let pattern = like_pattern(search_key);

    let rows = sqlx::query_as::<_, DbTeacher>(
        "SELECT teacherid, teacherfname, teacherlname, employeenumber, hiredate, salary
         FROM teachers
         WHERE LOWER(teacherfname) LIKE LOWER(?)
            OR LOWER(teacherlname) LIKE LOWER(?)
            OR LOWER(teacherfname || ' ' || teacherlname) LIKE LOWER(?)
            OR hiredate LIKE ?
            OR strftime('%d-%m-%Y', hiredate) LIKE ?
            OR CAST(salary AS TEXT) LIKE ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Teacher::from).collect())
}

/// Loads a teacher by id, then a second query fills in their classes with
/// the id/code/name projection.
#[instrument]
pub async fn find_teacher(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Teacher>, AppError> {
    info!("Fetching teacher by id");
    let row = sqlx::query_as::<_, DbTeacher>(
        "SELECT teacherid, teacherfname, teacherlname, employeenumber, hiredate, salary
         FROM teachers
         WHERE teacherid = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let mut teacher = Teacher::from(row);

    let classes = sqlx::query_as::<_, DbClassSummary>(
        "SELECT classid, classcode, classname FROM classes WHERE teacherid = ?",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    teacher.classes = classes.into_iter().map(ClassSummary::from).collect();

    Ok(Some(teacher))
}

#[instrument(skip(teacher))]
pub async fn create_teacher(
    pool: &Pool<Sqlite>,
    teacher: &TeacherPayload,
) -> Result<i64, AppError> {
    info!("Creating teacher");
    validate_teacher(teacher)?;

    let res = sqlx::query(
        "INSERT INTO teachers (teacherfname, teacherlname, employeenumber, hiredate, salary)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&teacher.teacher_fname)
    .bind(&teacher.teacher_lname)
    .bind(&teacher.employee_number)
    .bind(teacher.hire_date)
    .bind(teacher.salary)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

/// Full-row replacement: every mutable column is overwritten. Updating an id
/// with no row behind it affects nothing and is not an error.
#[instrument(skip(teacher))]
pub async fn update_teacher(
    pool: &Pool<Sqlite>,
    id: i64,
    teacher: &TeacherPayload,
) -> Result<(), AppError> {
    info!("Updating teacher");
    validate_teacher(teacher)?;

    sqlx::query(
        "UPDATE teachers
         SET teacherfname = ?, teacherlname = ?, employeenumber = ?, hiredate = ?, salary = ?
         WHERE teacherid = ?",
    )
    .bind(&teacher.teacher_fname)
    .bind(&teacher.teacher_lname)
    .bind(&teacher.employee_number)
    .bind(teacher.hire_date)
    .bind(teacher.salary)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Removes the teacher row, then nulls out teacherid on their classes. The
/// row delete comes first; nothing constrains it, so the decoupling update
/// is what keeps the classes table consistent.
#[instrument]
pub async fn delete_teacher(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting teacher");

    sqlx::query("DELETE FROM teachers WHERE teacherid = ?")
        .bind(id)
        .execute(pool)
        .await?;

    sqlx::query("UPDATE classes SET teacherid = NULL WHERE teacherid = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[instrument]
pub async fn list_students(
    pool: &Pool<Sqlite>,
    search_key: Option<&str>,
) -> Result<Vec<Student>, AppError> {
    info!("Listing students");
    let pattern = like_pattern(search_key);

    let rows = sqlx::query_as::<_, DbStudent>(
        "SELECT studentid, studentfname, studentlname, studentnumber, enroldate
         FROM students
         WHERE LOWER(studentfname) LIKE LOWER(?)
            OR LOWER(studentlname) LIKE LOWER(?)
            OR LOWER(studentfname || ' ' || studentlname) LIKE LOWER(?)",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Student::from).collect())
}

#[instrument]
pub async fn find_student(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Student>, AppError> {
    info!("Fetching student by id");
    let row = sqlx::query_as::<_, DbStudent>(
        "SELECT studentid, studentfname, studentlname, studentnumber, enroldate
         FROM students
         WHERE studentid = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Student::from))
}

#[instrument]
pub async fn list_classes(
    pool: &Pool<Sqlite>,
    search_key: Option<&str>,
) -> Result<Vec<Class>, AppError> {
    info!("Listing classes");
    let pattern = like_pattern(search_key);

    let rows = sqlx::query_as::<_, DbClass>(
        "SELECT classid, classcode, classname, teacherid, startdate, finishdate
         FROM classes
         WHERE LOWER(classname) LIKE LOWER(?)
            OR LOWER(classcode) LIKE LOWER(?)",
    )
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Class::from).collect())
}

#[instrument]
pub async fn find_class(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Class>, AppError> {
    info!("Fetching class by id");
    let row = sqlx::query_as::<_, DbClass>(
        "SELECT classid, classcode, classname, teacherid, startdate, finishdate
         FROM classes
         WHERE classid = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Class::from))
}
