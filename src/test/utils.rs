#[cfg(test)]
pub mod test_db {
    use crate::db::create_teacher;
    use crate::error::AppError;
    use crate::models::TeacherPayload;
    use chrono::NaiveDate;
    use rocket::local::asynchronous::Client;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};
    use std::collections::HashMap;
    use std::sync::Once;

    static INIT: Once = Once::new();

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
    }

    pub fn teacher_payload(
        fname: &str,
        lname: &str,
        employee_number: &str,
        hire_date: &str,
        salary: f64,
    ) -> TeacherPayload {
        TeacherPayload {
            teacher_fname: fname.to_string(),
            teacher_lname: lname.to_string(),
            employee_number: employee_number.to_string(),
            hire_date: date(hire_date),
            salary,
        }
    }

    pub struct TestTeacher {
        pub fname: String,
        pub lname: String,
        pub employee_number: String,
        pub hire_date: NaiveDate,
        pub salary: f64,
    }

    pub struct TestStudent {
        pub fname: String,
        pub lname: String,
        pub student_number: String,
        pub enrol_date: NaiveDate,
    }

    pub struct TestClass {
        pub code: String,
        pub name: String,
        pub teacher_employee_number: Option<String>,
        pub start_date: NaiveDate,
        pub finish_date: NaiveDate,
    }

    #[derive(Default)]
    pub struct TestDbBuilder {
        teachers: Vec<TestTeacher>,
        students: Vec<TestStudent>,
        classes: Vec<TestClass>,
    }

    impl TestDbBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn teacher(
            mut self,
            fname: &str,
            lname: &str,
            employee_number: &str,
            hire_date: &str,
            salary: f64,
        ) -> Self {
            self.teachers.push(TestTeacher {
                fname: fname.to_string(),
                lname: lname.to_string(),
                employee_number: employee_number.to_string(),
                hire_date: date(hire_date),
                salary,
            });
            self
        }

        pub fn student(
            mut self,
            fname: &str,
            lname: &str,
            student_number: &str,
            enrol_date: &str,
        ) -> Self {
            self.students.push(TestStudent {
                fname: fname.to_string(),
                lname: lname.to_string(),
                student_number: student_number.to_string(),
                enrol_date: date(enrol_date),
            });
            self
        }

        pub fn class(
            mut self,
            code: &str,
            name: &str,
            teacher_employee_number: Option<&str>,
            start_date: &str,
            finish_date: &str,
        ) -> Self {
            self.classes.push(TestClass {
                code: code.to_string(),
                name: name.to_string(),
                teacher_employee_number: teacher_employee_number.map(String::from),
                start_date: date(start_date),
                finish_date: date(finish_date),
            });
            self
        }

        pub async fn build(self) -> Result<TestDb, AppError> {
            INIT.call_once(|| {
                let _ = env_logger::builder().is_test(true).try_init();
            });

            // One connection: every statement sees the same in-memory database.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;

            let mut teacher_id_map: HashMap<String, i64> = HashMap::new();
            for teacher in &self.teachers {
                let payload = TeacherPayload {
                    teacher_fname: teacher.fname.clone(),
                    teacher_lname: teacher.lname.clone(),
                    employee_number: teacher.employee_number.clone(),
                    hire_date: teacher.hire_date,
                    salary: teacher.salary,
                };

                let id = create_teacher(&pool, &payload).await?;
                teacher_id_map.insert(teacher.employee_number.clone(), id);
            }

            // Students and classes are read-only entities, so they are seeded
            // directly rather than through a data-access operation.
            let mut student_id_map: HashMap<String, i64> = HashMap::new();
            for student in &self.students {
                let res = sqlx::query(
                    "INSERT INTO students (studentfname, studentlname, studentnumber, enroldate)
                     VALUES (?, ?, ?, ?)",
                )
                .bind(&student.fname)
                .bind(&student.lname)
                .bind(&student.student_number)
                .bind(student.enrol_date)
                .execute(&pool)
                .await?;

                student_id_map.insert(student.student_number.clone(), res.last_insert_rowid());
            }

            let mut class_id_map: HashMap<String, i64> = HashMap::new();
            for class in &self.classes {
                let teacher_id = class
                    .teacher_employee_number
                    .as_ref()
                    .and_then(|num| teacher_id_map.get(num).copied());

                let res = sqlx::query(
                    "INSERT INTO classes (classcode, classname, teacherid, startdate, finishdate)
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(&class.code)
                .bind(&class.name)
                .bind(teacher_id)
                .bind(class.start_date)
                .bind(class.finish_date)
                .execute(&pool)
                .await?;

                class_id_map.insert(class.code.clone(), res.last_insert_rowid());
            }

            Ok(TestDb {
                pool,
                teacher_id_map,
                student_id_map,
                class_id_map,
            })
        }
    }

    pub struct TestDb {
        pub pool: Pool<Sqlite>,
        pub teacher_id_map: HashMap<String, i64>,
        pub student_id_map: HashMap<String, i64>,
        pub class_id_map: HashMap<String, i64>,
    }

    impl TestDb {
        pub fn teacher_id(&self, employee_number: &str) -> Option<i64> {
            self.teacher_id_map.get(employee_number).copied()
        }

        pub fn student_id(&self, student_number: &str) -> Option<i64> {
            self.student_id_map.get(student_number).copied()
        }

        pub fn class_id(&self, code: &str) -> Option<i64> {
            self.class_id_map.get(code).copied()
        }

        pub async fn class_teacher_id(&self, code: &str) -> Result<Option<i64>, sqlx::Error> {
            let class_id = self.class_id(code).ok_or(sqlx::Error::RowNotFound)?;

            sqlx::query_scalar::<_, Option<i64>>(
                "SELECT teacherid FROM classes WHERE classid = ?",
            )
            .bind(class_id)
            .fetch_one(&self.pool)
            .await
        }

        pub async fn teacher_count(&self) -> Result<i64, sqlx::Error> {
            sqlx::query_scalar("SELECT COUNT(*) FROM teachers")
                .fetch_one(&self.pool)
                .await
        }
    }

    pub async fn create_standard_test_db() -> TestDb {
        TestDbBuilder::new()
            .teacher("Alexander", "Bennett", "T378", "2016-08-05", 55000.0)
            .teacher("Caitlin", "Cummings", "T381", "2014-06-10", 62000.0)
            .student("Sarah", "Valdez", "N1678", "2018-06-18")
            .student("Jennifer", "Faulkner", "N1679", "2018-08-02")
            .class(
                "http5101",
                "Web Application Development",
                Some("T378"),
                "2018-09-04",
                "2018-12-14",
            )
            .class(
                "http5102",
                "Project Management",
                Some("T381"),
                "2018-09-04",
                "2018-12-14",
            )
            .class(
                "http5103",
                "Web Programming",
                Some("T378"),
                "2018-09-04",
                "2018-12-14",
            )
            .build()
            .await
            .expect("Failed to build test database")
    }

    pub async fn setup_test_client(test_db: &TestDb) -> Client {
        Client::tracked(crate::init_rocket(test_db.pool.clone()))
            .await
            .expect("valid rocket instance")
    }
}
