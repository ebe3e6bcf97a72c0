use chrono::{NaiveDate, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CategoryInput, DateRange, Engine, EngineError, ExpenseFilter, ExpenseInput, MAX_AMOUNT, Money,
    NumberInput, PageRequest, expense_filter, page_request,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn input(description: &str, amount: f64, category: &str, date: &str) -> ExpenseInput {
    ExpenseInput {
        description: Some(description.to_string()),
        amount: Some(NumberInput::Number(amount)),
        category: Some(category.to_string()),
        date: Some(date.to_string()),
        notes: None,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn create_then_fetch_returns_normalized_record() {
    let (engine, _db) = engine_with_db().await;

    let mut payload = input("  Groceries ", 45.5, " Food ", "2024-03-01");
    payload.notes = Some("weekly run".to_string());
    let created = engine.create_expense(&payload).await.unwrap();

    assert_eq!(created.description, "Groceries");
    assert_eq!(created.amount, Money::new(4550));
    assert_eq!(created.category, "food");
    assert_eq!(created.date, day(2024, 3, 1));
    assert_eq!(created.notes.as_deref(), Some("weekly run"));
    assert_eq!(created.created_at, created.updated_at);

    let fetched = engine.expense(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn missing_date_defaults_to_today() {
    let (engine, _db) = engine_with_db().await;

    let mut payload = input("Coffee", 3.0, "food", "");
    payload.date = None;
    let created = engine.create_expense(&payload).await.unwrap();

    assert_eq!(created.date, Utc::now().date_naive());
}

#[tokio::test]
async fn non_positive_amount_is_rejected_and_nothing_is_stored() {
    let (engine, _db) = engine_with_db().await;

    for amount in [0.0, -5.0] {
        let err = engine
            .create_expense(&input("Refund", amount, "food", "2024-03-01"))
            .await
            .unwrap_err();
        match err {
            EngineError::Validation(errors) => assert!(errors.has_field("amount")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    let page = engine
        .list_expenses(&ExpenseFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn oversized_amount_is_rejected_and_nothing_is_stored() {
    let (engine, _db) = engine_with_db().await;

    for amount in [9e16, 1_000_000_000.01] {
        let err = engine
            .create_expense(&input("Yacht", amount, "fun", "2024-03-01"))
            .await
            .unwrap_err();
        match err {
            EngineError::Validation(errors) => assert!(errors.has_field("amount")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    let page = engine
        .list_expenses(&ExpenseFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn summary_of_largest_amounts_does_not_overflow() {
    let (engine, _db) = engine_with_db().await;

    for category in ["fun", "rent", "travel"] {
        engine
            .create_expense(&input("Big", 1_000_000_000.0, category, "2024-03-01"))
            .await
            .unwrap();
    }

    let summary = engine.summary(&DateRange::default()).await.unwrap();
    assert_eq!(summary.total, Money::new(MAX_AMOUNT.cents() * 3));
    assert_eq!(summary.count, 3);
}

#[tokio::test]
async fn far_page_is_rejected_before_querying() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_expense(&input("Coffee", 3.0, "food", "2024-03-01"))
        .await
        .unwrap();

    let errors = page_request(Some("1000"), Some("9300000000000000")).unwrap_err();
    assert!(errors.has_field("page"));

    let far = page_request(Some("1000"), Some("9000000000000")).unwrap();
    let page = engine
        .list_expenses(&ExpenseFilter::default(), far)
        .await
        .unwrap();
    assert!(page.expenses.is_empty());
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn invalid_payload_reports_every_field() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_expense(&ExpenseInput {
            description: Some("   ".to_string()),
            amount: Some(NumberInput::Text("abc".to_string())),
            category: None,
            date: Some("not-a-date".to_string()),
            notes: Some("x".repeat(501)),
        })
        .await
        .unwrap_err();

    let EngineError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    for field in ["description", "amount", "category", "date", "notes"] {
        assert!(errors.has_field(field), "missing error for {field}");
    }
}

#[tokio::test]
async fn update_overwrites_fields_and_keeps_id_and_creation_time() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_expense(&input("Taxi", 20.0, "transport", "2024-03-02"))
        .await
        .unwrap();

    let mut payload = input("Train", 12.34, "Travel", "");
    payload.date = None;
    let updated = engine.update_expense(created.id, &payload).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.description, "Train");
    assert_eq!(updated.amount, Money::new(1234));
    assert_eq!(updated.category, "travel");
    assert_eq!(updated.date, day(2024, 3, 2));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn invalid_update_leaves_record_untouched() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_expense(&input("Taxi", 20.0, "transport", "2024-03-02"))
        .await
        .unwrap();

    let err = engine
        .update_expense(created.id, &input("Taxi", -1.0, "transport", "2024-03-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert_eq!(engine.expense(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let id = Uuid::new_v4();

    let not_found = EngineError::KeyNotFound("Expense".to_string());
    assert_eq!(engine.expense(id).await.unwrap_err(), not_found);
    assert_eq!(
        engine
            .update_expense(id, &input("x", 1.0, "food", "2024-01-01"))
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(engine.delete_expense(id).await.unwrap_err(), not_found);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_expense(&input("Book", 15.0, "fun", "2024-03-02"))
        .await
        .unwrap();
    engine.delete_expense(created.id).await.unwrap();

    assert!(matches!(
        engine.expense(created.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_expense(created.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn listing_is_paginated_newest_first() {
    let (engine, _db) = engine_with_db().await;

    for n in 1..=15u32 {
        engine
            .create_expense(&input(
                &format!("item {n}"),
                f64::from(n),
                "food",
                &format!("2024-01-{n:02}"),
            ))
            .await
            .unwrap();
    }

    let first = engine
        .list_expenses(&ExpenseFilter::default(), PageRequest { page: 1, limit: 10 })
        .await
        .unwrap();
    assert_eq!(first.expenses.len(), 10);
    assert_eq!(first.total, 15);
    assert_eq!(first.pages, 2);
    assert_eq!(first.expenses[0].date, day(2024, 1, 15));
    assert!(
        first
            .expenses
            .windows(2)
            .all(|pair| pair[0].date >= pair[1].date)
    );

    let second = engine
        .list_expenses(&ExpenseFilter::default(), PageRequest { page: 2, limit: 10 })
        .await
        .unwrap();
    assert_eq!(second.expenses.len(), 5);
    assert_eq!(second.page, 2);
    assert_eq!(second.pages, 2);
    assert_eq!(second.expenses[4].date, day(2024, 1, 1));

    let past_end = engine
        .list_expenses(&ExpenseFilter::default(), PageRequest { page: 3, limit: 10 })
        .await
        .unwrap();
    assert!(past_end.expenses.is_empty());
    assert_eq!(past_end.total, 15);
}

#[tokio::test]
async fn filters_use_inclusive_dates_and_normalized_category() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_expense(&input("a", 1.0, "Food", "2024-02-29"))
        .await
        .unwrap();
    engine
        .create_expense(&input("b", 2.0, "food", "2024-03-01"))
        .await
        .unwrap();
    engine
        .create_expense(&input("c", 3.0, "food", "2024-03-31"))
        .await
        .unwrap();
    engine
        .create_expense(&input("d", 4.0, "rent", "2024-03-15"))
        .await
        .unwrap();

    let filter = expense_filter(Some("2024-03-01"), Some("2024-03-31"), Some(" FOOD ")).unwrap();
    let page = engine
        .list_expenses(&filter, PageRequest::default())
        .await
        .unwrap();

    let descriptions: Vec<&str> = page
        .expenses
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(descriptions, ["c", "b"]);
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn summary_totals_match_the_groups() {
    let (engine, _db) = engine_with_db().await;

    for (amount, category) in [(10.0, "food"), (20.5, "food"), (100.0, "rent"), (4.5, "fun")] {
        engine
            .create_expense(&input("x", amount, category, "2024-03-10"))
            .await
            .unwrap();
    }
    engine
        .create_expense(&input("outside", 999.0, "food", "2024-04-01"))
        .await
        .unwrap();

    let summary = engine
        .summary(&DateRange {
            start: Some(day(2024, 3, 1)),
            end: Some(day(2024, 3, 31)),
        })
        .await
        .unwrap();

    let categories: Vec<&str> = summary
        .by_category
        .iter()
        .map(|g| g.category.as_str())
        .collect();
    assert_eq!(categories, ["rent", "food", "fun"]);
    assert_eq!(summary.total, Money::new(13_500));
    assert_eq!(summary.count, 4);
    assert_eq!(
        summary.by_category.iter().map(|g| g.total.cents()).sum::<i64>(),
        summary.total.cents()
    );

    let food = &summary.by_category[1];
    assert_eq!(food.total, Money::new(3_050));
    assert_eq!(food.count, 2);
    assert_eq!(food.average(), 15.25);
}

#[tokio::test]
async fn summary_of_nothing_is_empty() {
    let (engine, _db) = engine_with_db().await;

    let summary = engine.summary(&DateRange::default()).await.unwrap();
    assert!(summary.by_category.is_empty());
    assert_eq!(summary.total, Money::ZERO);
    assert_eq!(summary.count, 0);
}

#[tokio::test]
async fn budget_status_reports_overspending() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_category(&CategoryInput {
            name: Some("Food".to_string()),
            budget: Some(NumberInput::Number(100.0)),
            color: None,
        })
        .await
        .unwrap();
    engine
        .create_expense(&input("a", 60.0, "food", "2024-03-03"))
        .await
        .unwrap();
    engine
        .create_expense(&input("b", 50.0, "FOOD", "2024-03-20"))
        .await
        .unwrap();
    engine
        .create_expense(&input("old", 70.0, "food", "2024-02-20"))
        .await
        .unwrap();

    let status = engine
        .budget_status(
            "Food",
            &DateRange {
                start: Some(day(2024, 3, 1)),
                end: Some(day(2024, 3, 31)),
            },
        )
        .await
        .unwrap();

    assert_eq!(status.category, "food");
    assert_eq!(status.budget, Money::new(10_000));
    assert_eq!(status.spent, Money::new(11_000));
    assert_eq!(status.remaining, Money::new(-1_000));
    assert_eq!(status.percentage, 110.0);
    assert!(status.over_budget);
}

#[tokio::test]
async fn budget_status_of_unknown_category_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .budget_status("nope", &DateRange::default())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("Category".to_string()));
}

#[tokio::test]
async fn export_has_one_row_per_listed_expense() {
    let (engine, _db) = engine_with_db().await;

    for n in 1..=3u32 {
        engine
            .create_expense(&input(&format!("e{n}"), 1.5, "food", &format!("2024-05-0{n}")))
            .await
            .unwrap();
    }
    engine
        .create_expense(&input("rent", 500.0, "rent", "2024-05-02"))
        .await
        .unwrap();

    let filter = expense_filter(None, None, Some("food")).unwrap();
    let listed = engine
        .list_expenses(&filter, PageRequest::default())
        .await
        .unwrap();
    let csv = engine.export_csv(&filter).await.unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "Description,Amount,Category,Date,Notes");
    assert_eq!(lines.len() as u64 - 1, listed.total);
    assert_eq!(lines[1], "e3,1.5,food,2024-05-03,");
}
