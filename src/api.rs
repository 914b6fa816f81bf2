use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::{Deserialize, Serialize, json::Json};
use sqlx::{Pool, Sqlite};

use crate::db::{
    create_teacher, delete_teacher, find_class, find_student, find_teacher, list_classes,
    list_students, list_teachers, update_teacher,
};
use crate::error::AppError;
use crate::models::{Class, Student, Teacher, TeacherPayload};
use crate::validation::{ToValidationResponse, ValidationResponse};

#[derive(Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[get("/teachers?<search>")]
pub async fn api_list_teachers(
    search: Option<String>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Teacher>>, Status> {
    let teachers = list_teachers(db, search.as_deref()).await?;

    Ok(Json(teachers))
}

#[get("/teacher/<id>")]
pub async fn api_find_teacher(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Teacher>, Custom<Json<ValidationResponse>>> {
    let teacher = find_teacher(db, id)
        .await
        .map_err(|e| e.to_validation_response())?
        .ok_or_else(|| {
            AppError::NotFound(format!("Teacher with id {} not found", id)).to_validation_response()
        })?;

    Ok(Json(teacher))
}

#[post("/teachers", data = "<teacher>")]
pub async fn api_create_teacher(
    teacher: Json<TeacherPayload>,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    let id = create_teacher(db, &teacher)
        .await
        .map_err(|e| e.to_validation_response())?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[put("/teacher/<id>", data = "<teacher>")]
pub async fn api_update_teacher(
    id: i64,
    teacher: Json<TeacherPayload>,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Custom<Json<ValidationResponse>>> {
    update_teacher(db, id, &teacher)
        .await
        .map_err(|e| e.to_validation_response())?;

    Ok(Status::Ok)
}

#[delete("/teacher/<id>")]
pub async fn api_delete_teacher(id: i64, db: &State<Pool<Sqlite>>) -> Result<Status, Status> {
    delete_teacher(db, id).await?;

    Ok(Status::Ok)
}

#[get("/students?<search>")]
pub async fn api_list_students(
    search: Option<String>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Student>>, Status> {
    let students = list_students(db, search.as_deref()).await?;

    Ok(Json(students))
}

#[get("/student/<id>")]
pub async fn api_find_student(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Student>, Custom<Json<ValidationResponse>>> {
    let student = find_student(db, id)
        .await
        .map_err(|e| e.to_validation_response())?
        .ok_or_else(|| {
            AppError::NotFound(format!("Student with id {} not found", id)).to_validation_response()
        })?;

    Ok(Json(student))
}

#[get("/classes?<search>")]
pub async fn api_list_classes(
    search: Option<String>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Class>>, Status> {
    let classes = list_classes(db, search.as_deref()).await?;

    Ok(Json(classes))
}

#[get("/class/<id>")]
pub async fn api_find_class(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Class>, Custom<Json<ValidationResponse>>> {
    let class = find_class(db, id)
        .await
        .map_err(|e| e.to_validation_response())?
        .ok_or_else(|| {
            AppError::NotFound(format!("Class with id {} not found", id)).to_validation_response()
        })?;

    Ok(Json(class))
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}

#[catch(default)]
pub fn api_error(status: Status, _req: &rocket::Request<'_>) -> Custom<Json<ValidationResponse>> {
    status.to_validation_response()
}
