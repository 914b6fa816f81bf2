#[macro_use]
extern crate rocket;

mod api;
mod config;
mod db;
mod error;
mod models;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use api::{
    api_create_teacher, api_delete_teacher, api_error, api_find_class, api_find_student,
    api_find_teacher, api_list_classes, api_list_students, api_list_teachers, api_update_teacher,
    health,
};
use config::{DatabaseConfig, load_environment};
use rocket::{Build, Rocket};
use sqlx::{Pool, Sqlite};
use telemetry::{RequestTimer, init_tracing};
use tracing::{error, info, warn};

#[launch]
async fn rocket() -> _ {
    init_tracing();

    if let Err(e) = load_environment() {
        warn!("Could not load environment files: {}", e);
    }

    let db_config = DatabaseConfig::from_env().expect("Invalid database configuration");

    let pool = db_config
        .connect()
        .await
        .expect("Failed to connect to the school database");

    info!("Running database migrations...");
    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(_) => info!("Migrations completed successfully"),
        Err(e) => {
            error!("Failed to run migrations: {}", e);
            panic!("Database migration failed: {}", e);
        }
    }

    init_rocket(pool)
}

pub fn init_rocket(pool: Pool<Sqlite>) -> Rocket<Build> {
    info!("Starting school records service");

    rocket::build()
        .manage(pool)
        .mount(
            "/api",
            routes![
                api_list_teachers,
                api_find_teacher,
                api_create_teacher,
                api_update_teacher,
                api_delete_teacher,
                api_list_students,
                api_find_student,
                api_list_classes,
                api_find_class,
                health,
            ],
        )
        .register("/api", catchers![api_error])
        .attach(RequestTimer)
}
