//! Integration tests for the SurrealDB operation repository, with a
//! focus on the per-user isolation rules.

use std::str::FromStr;

use chrono::NaiveDate;
use finledger_core::error::LedgerError;
use finledger_core::models::operation::{CreateOperation, OperationKind, UpdateOperation};
use finledger_core::repository::OperationRepository;
use finledger_db::repository::SurrealOperationRepository;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> SurrealOperationRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    finledger_db::run_migrations(&db).await.unwrap();
    SurrealOperationRepository::new(db)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn income(date_str: &str, amount: &str) -> CreateOperation {
    CreateOperation {
        date: date(date_str),
        kind: OperationKind::Income,
        amount: Decimal::from_str(amount).unwrap(),
        description: None,
    }
}

fn outcome(date_str: &str, amount: &str) -> CreateOperation {
    CreateOperation {
        kind: OperationKind::Outcome,
        ..income(date_str, amount)
    }
}

#[tokio::test]
async fn create_stamps_the_owner() {
    let repo = setup().await;

    let op = repo.create(7, income("2024-01-15", "120.50")).await.unwrap();
    assert_eq!(op.user_id, 7);
    assert!(op.id > 0);

    let fetched = repo.get(7, op.id).await.unwrap();
    assert_eq!(fetched.user_id, 7);
    assert_eq!(fetched.date, date("2024-01-15"));
    assert_eq!(fetched.amount, Decimal::from_str("120.50").unwrap());
}

#[tokio::test]
async fn amounts_are_stored_with_two_decimals() {
    let repo = setup().await;

    let op = repo.create(1, income("2024-01-01", "100")).await.unwrap();
    assert_eq!(op.amount.to_string(), "100.00");

    let fetched = repo.get(1, op.id).await.unwrap();
    assert_eq!(fetched.amount.to_string(), "100.00");
}

#[tokio::test]
async fn get_of_another_users_record_is_not_found() {
    let repo = setup().await;
    let op = repo.create(1, income("2024-01-01", "10.00")).await.unwrap();

    let err = repo.get(2, op.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));

    // The owner still sees it.
    assert!(repo.get(1, op.id).await.is_ok());
}

#[tokio::test]
async fn update_of_another_users_record_is_not_found() {
    let repo = setup().await;
    let op = repo.create(1, income("2024-01-01", "10.00")).await.unwrap();

    let input = UpdateOperation {
        date: date("2024-02-01"),
        kind: OperationKind::Outcome,
        amount: Decimal::from_str("99.99").unwrap(),
        description: Some("hijack".into()),
    };

    let err = repo.update(2, op.id, input).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));

    // Unchanged for the owner.
    let fetched = repo.get(1, op.id).await.unwrap();
    assert_eq!(fetched.kind, OperationKind::Income);
    assert_eq!(fetched.description, None);
}

#[tokio::test]
async fn update_replaces_all_mutable_fields() {
    let repo = setup().await;
    let op = repo.create(1, income("2024-01-01", "10.00")).await.unwrap();

    let updated = repo
        .update(
            1,
            op.id,
            UpdateOperation {
                date: date("2024-03-05"),
                kind: OperationKind::Outcome,
                amount: Decimal::from_str("42.5").unwrap(),
                description: Some("groceries".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, op.id);
    assert_eq!(updated.user_id, 1);
    assert_eq!(updated.date, date("2024-03-05"));
    assert_eq!(updated.kind, OperationKind::Outcome);
    assert_eq!(updated.amount.to_string(), "42.50");
    assert_eq!(updated.description.as_deref(), Some("groceries"));
}

#[tokio::test]
async fn delete_of_another_users_record_is_not_found() {
    let repo = setup().await;
    let op = repo.create(1, income("2024-01-01", "10.00")).await.unwrap();

    let err = repo.delete(2, op.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));

    assert!(repo.get(1, op.id).await.is_ok());
}

#[tokio::test]
async fn delete_then_redelete_is_not_found() {
    let repo = setup().await;
    let op = repo.create(1, income("2024-01-01", "10.00")).await.unwrap();

    repo.delete(1, op.id).await.unwrap();

    let err = repo.delete(1, op.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));

    let err = repo.get(1, op.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[tokio::test]
async fn list_filters_by_kind_and_user() {
    let repo = setup().await;
    repo.create(1, income("2024-01-01", "1.00")).await.unwrap();
    repo.create(1, outcome("2024-01-02", "2.00")).await.unwrap();
    repo.create(1, income("2024-01-03", "3.00")).await.unwrap();
    repo.create(2, income("2024-01-04", "4.00")).await.unwrap();

    let all = repo.list(1, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|op| op.user_id == 1));

    let incomes = repo.list(1, Some(OperationKind::Income)).await.unwrap();
    assert_eq!(incomes.len(), 2);
    assert!(incomes.iter().all(|op| op.kind == OperationKind::Income));

    let outcomes = repo.list(1, Some(OperationKind::Outcome)).await.unwrap();
    assert_eq!(outcomes.len(), 1);
}

#[tokio::test]
async fn list_recent_orders_by_date_then_id_descending() {
    let repo = setup().await;
    let jan = repo.create(1, income("2024-01-01", "1.00")).await.unwrap();
    let mar = repo.create(1, income("2024-03-01", "2.00")).await.unwrap();
    let feb_a = repo.create(1, income("2024-02-01", "3.00")).await.unwrap();
    let feb_b = repo.create(1, income("2024-02-01", "4.00")).await.unwrap();

    let recent = repo.list_recent(1).await.unwrap();
    let ids: Vec<i64> = recent.iter().map(|op| op.id).collect();

    // Date descending, id descending within the same date.
    assert_eq!(ids, vec![mar.id, feb_b.id, feb_a.id, jan.id]);
}

#[tokio::test]
async fn create_many_persists_every_row() {
    let repo = setup().await;

    let created = repo
        .create_many(
            1,
            vec![
                income("2024-01-01", "1.00"),
                outcome("2024-01-02", "2.00"),
                income("2024-01-03", "3.00"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|op| op.user_id == 1));

    let ids: Vec<i64> = created.iter().map(|op| op.id).collect();
    let mut deduped = ids.clone();
    deduped.dedup();
    assert_eq!(ids, deduped);

    let listed = repo.list(1, None).await.unwrap();
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn create_many_with_no_rows_is_empty() {
    let repo = setup().await;

    let created = repo.create_many(1, Vec::new()).await.unwrap();
    assert!(created.is_empty());
    assert!(repo.list(1, None).await.unwrap().is_empty());
}
