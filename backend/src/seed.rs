// src/seed.rs

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::exercise::MULTIPLE_CHOICE;

struct SeedExercise {
    question: &'static str,
    options: &'static [&'static str],
    correct_answer: &'static str,
}

struct SeedLesson {
    title: &'static str,
    content: &'static str,
    exercises: &'static [SeedExercise],
}

struct SeedCourse {
    title: &'static str,
    description: &'static str,
    lessons: &'static [SeedLesson],
}

const SAMPLE_CURRICULUM: &[SeedCourse] = &[
    SeedCourse {
        title: "Introduction to Python",
        description: "Learn the fundamentals of Python programming.",
        lessons: &[
            SeedLesson {
                title: "Variables and Data Types",
                content: "<p>Content for Variables and Data Types.</p>",
                exercises: &[
                    SeedExercise {
                        question: "Which of the following is a valid Python variable name?",
                        options: &["my-var", "1var", "my_var", "$var"],
                        correct_answer: "my_var",
                    },
                    SeedExercise {
                        question: "What is the data type of the value 10.5?",
                        options: &["Integer", "Float", "String", "Boolean"],
                        correct_answer: "Float",
                    },
                ],
            },
            SeedLesson {
                title: "Control Flow (If/Else, Loops)",
                content: "<p>Content for Control Flow.</p>",
                exercises: &[],
            },
        ],
    },
    SeedCourse {
        title: "Web Development Basics",
        description: "Understand the basics of HTML and CSS.",
        lessons: &[
            SeedLesson {
                title: "HTML Fundamentals",
                content: "<p>Content for HTML Fundamentals.</p>",
                exercises: &[SeedExercise {
                    question: "Which HTML tag is used to define important text (bold)?",
                    options: &["<b>", "<important>", "<strong>", "<i>"],
                    correct_answer: "<strong>",
                }],
            },
            SeedLesson {
                title: "CSS Basics",
                content: "<p>Content for CSS Basics.</p>",
                exercises: &[],
            },
        ],
    },
];

/// Inserts the sample courses that are not present yet (matched by title).
///
/// Returns the number of courses created. Running it twice creates nothing
/// the second time.
pub async fn populate_sample_data(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    let mut created = 0;

    for course in SAMPLE_CURRICULUM {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE title = ?")
            .bind(course.title)
            .fetch_one(pool)
            .await?;
        if exists > 0 {
            continue;
        }

        let mut tx = pool.begin().await?;
        insert_course(&mut tx, course).await?;
        tx.commit().await?;

        tracing::info!("Seeded course: {}", course.title);
        created += 1;
    }

    Ok(created)
}

async fn insert_course(
    tx: &mut Transaction<'_, Sqlite>,
    course: &SeedCourse,
) -> Result<(), sqlx::Error> {
    let course_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO courses (title, description) VALUES (?, ?) RETURNING id",
    )
    .bind(course.title)
    .bind(course.description)
    .fetch_one(&mut **tx)
    .await?;

    for (lesson_idx, lesson) in course.lessons.iter().enumerate() {
        let lesson_id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO lessons (title, content, course_id, "order") VALUES (?, ?, ?, ?) RETURNING id"#,
        )
        .bind(lesson.title)
        .bind(lesson.content)
        .bind(course_id)
        .bind(lesson_idx as i64 + 1)
        .fetch_one(&mut **tx)
        .await?;

        for (position, exercise) in lesson.exercises.iter().enumerate() {
            let options = serde_json::to_string(exercise.options)
                .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

            sqlx::query(
                r#"
                INSERT INTO exercises (lesson_id, exercise_type, question, options, correct_answer, position)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(lesson_id)
            .bind(MULTIPLE_CHOICE)
            .bind(exercise.question)
            .bind(options)
            .bind(exercise.correct_answer)
            .bind(position as i64 + 1)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}
