use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use chainsaw::config::StoreError;
use chainsaw::modules::exercise::crud::ExerciseCrud;
use chainsaw::modules::exercise::interface::LogRepository;
use chainsaw::modules::exercise::model::NewExerciseLog;
use chainsaw::services::exercise_log::{validate_batch, LogWriter};

use crate::common::database::MysqlContext;
use crate::common::log_entry;

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn kg(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

#[tokio::test]
async fn bodyweight_resubmission_keeps_row_identity() {
    let Some(ctx) = MysqlContext::connect().await else {
        return;
    };
    let crud = ExerciseCrud::new(ctx.db.clone());
    let log_date = date("2024-03-01");

    let first_id = crud
        .upsert_bodyweight(ctx.user_id, kg("80"), log_date)
        .await
        .unwrap();

    let (created_at, updated_at): (DateTime<Utc>, DateTime<Utc>) =
        sqlx::query_as("SELECT created_at, updated_at FROM bodyweight_logs WHERE id = ?")
            .bind(first_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();

    // TIMESTAMP has second precision
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let second_id = crud
        .upsert_bodyweight(ctx.user_id, kg("81.5"), log_date)
        .await
        .unwrap();
    assert_eq!(second_id, first_id);

    let rows: Vec<(i32, Decimal, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
        "SELECT id, bodyweight, created_at, updated_at FROM bodyweight_logs WHERE user_id = ?",
    )
    .bind(ctx.user_id)
    .fetch_all(&ctx.db)
    .await
    .unwrap();

    assert_eq!(rows.len(), 1);
    let (id, bodyweight, created_after, updated_after) = rows[0];
    assert_eq!(id, first_id);
    assert_eq!(bodyweight, kg("81.5"));
    assert_eq!(created_after, created_at);
    assert!(updated_after > updated_at);

    ctx.cleanup().await;
}

#[tokio::test]
async fn bodyweight_on_another_date_gets_its_own_row() {
    let Some(ctx) = MysqlContext::connect().await else {
        return;
    };
    let crud = ExerciseCrud::new(ctx.db.clone());

    let march = crud
        .upsert_bodyweight(ctx.user_id, kg("80"), date("2024-03-01"))
        .await
        .unwrap();
    let april = crud
        .upsert_bodyweight(ctx.user_id, kg("80"), date("2024-04-01"))
        .await
        .unwrap();

    assert_ne!(march, april);

    ctx.cleanup().await;
}

#[tokio::test]
async fn exercise_log_conflict_is_reported_then_updated() {
    let Some(ctx) = MysqlContext::connect().await else {
        return;
    };
    let crud = ExerciseCrud::new(ctx.db.clone());
    let log_date = date("2024-03-01");
    let exercise_id = ctx.exercise_id("Bench Press").await;
    let bodyweight_id = crud
        .upsert_bodyweight(ctx.user_id, kg("80"), log_date)
        .await
        .unwrap();

    let mut log = NewExerciseLog {
        user_id: ctx.user_id,
        exercise_id,
        reps: 10,
        weight: kg("100"),
        additional_weight: None,
        exercise_type: None,
        bodyweight_id,
        log_date,
    };

    crud.insert_exercise_log(&log).await.unwrap();

    log.reps = 12;
    log.weight = kg("102.5");
    let conflict = crud.insert_exercise_log(&log).await;
    assert!(matches!(conflict, Err(StoreError::UniqueViolation)));

    crud.update_exercise_log(&log).await.unwrap();

    let rows: Vec<(i32, Decimal)> =
        sqlx::query_as("SELECT reps, weight FROM exercise_logs WHERE user_id = ?")
            .bind(ctx.user_id)
            .fetch_all(&ctx.db)
            .await
            .unwrap();
    assert_eq!(rows, vec![(12, kg("102.5"))]);

    ctx.cleanup().await;
}

#[tokio::test]
async fn log_writer_reports_resubmitted_entry_as_duplicate() {
    let Some(ctx) = MysqlContext::connect().await else {
        return;
    };
    let crud = ExerciseCrud::new(ctx.db.clone());
    let writer = LogWriter::new(&crud);
    let exercise_id = ctx.exercise_id("Squat").await;

    let first = validate_batch(vec![
        serde_json::from_value(log_entry(exercise_id, "2024-03-01")).unwrap(),
    ])
    .unwrap();
    let summary = writer.log_batch(ctx.user_id, &first).await;
    assert_eq!(summary.logged.len(), 1);
    assert!(summary.duplicates.is_empty());

    let mut resubmitted = log_entry(exercise_id, "2024-03-01");
    resubmitted["reps"] = serde_json::json!(8);
    resubmitted["body_weight"] = serde_json::json!(79.5);
    let second = validate_batch(vec![serde_json::from_value(resubmitted).unwrap()]).unwrap();
    let summary = writer.log_batch(ctx.user_id, &second).await;
    assert_eq!(summary.duplicates.len(), 1);
    assert_eq!(summary.logged.len(), 1);
    assert!(summary.failed.is_empty());

    let (reps, bodyweight): (i32, Decimal) = sqlx::query_as(
        r#"
        SELECT el.reps, bw.bodyweight
        FROM exercise_logs el
        JOIN bodyweight_logs bw ON bw.id = el.bodyweight_id
        WHERE el.user_id = ?
        "#,
    )
    .bind(ctx.user_id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(reps, 8);
    assert_eq!(bodyweight, kg("79.5"));

    ctx.cleanup().await;
}

#[tokio::test]
async fn latest_exercises_groups_by_exercise() {
    let Some(ctx) = MysqlContext::connect().await else {
        return;
    };
    let crud = ExerciseCrud::new(ctx.db.clone());
    let writer = LogWriter::new(&crud);
    let bench = ctx.exercise_id("Bench Press").await;
    let squat = ctx.exercise_id("Squat").await;

    let entries = validate_batch(
        [
            log_entry(bench, "2024-03-01"),
            log_entry(bench, "2024-03-05"),
            log_entry(squat, "2024-03-03"),
        ]
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap())
        .collect(),
    )
    .unwrap();
    writer.log_batch(ctx.user_id, &entries).await;

    let latest = crud.latest_exercises(ctx.user_id).await.unwrap();
    let pairs: Vec<(i32, NaiveDate)> = latest
        .iter()
        .map(|l| (l.exercise_id, l.latest_log_date))
        .collect();
    assert_eq!(
        pairs,
        vec![(bench, date("2024-03-05")), (squat, date("2024-03-03"))]
    );

    ctx.cleanup().await;
}
