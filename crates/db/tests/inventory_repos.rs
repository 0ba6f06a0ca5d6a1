//! Repository tests against the PostgreSQL database named by `DATABASE_URL`.

use chrono::NaiveDate;
use medchain_core::inventory::{AlertSeverity, AlertType, MedicineStatus, ReorderStatus};
use medchain_db::models::alert::NewAlert;
use medchain_db::models::medicine::{CreateMedicine, UpdateMedicine};
use medchain_db::models::reorder::NewReorder;
use medchain_db::repositories::{AlertRepo, MedicineRepo, ReorderRepo, ReportRepo};
use sqlx::PgPool;

fn amoxicillin() -> CreateMedicine {
    CreateMedicine {
        name: "Amoxicillin 500mg".to_string(),
        batch_id: "AMX-2025-014".to_string(),
        manufacturer: "Global Pharma".to_string(),
        quantity: 120,
        expiry_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        location: "District Hospital".to_string(),
    }
}

fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            db_err.constraint().map(str::to_string)
        }
        _ => None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn medicine_create_update_delete(pool: PgPool) {
    medchain_db::health_check(&pool).await.unwrap();

    let created = MedicineRepo::create(&pool, &amoxicillin()).await.unwrap();
    assert_eq!(created.status, "active");

    let update = UpdateMedicine {
        quantity: Some(8),
        ..Default::default()
    };
    let updated = MedicineRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.quantity, 8);
    assert_eq!(updated.name, created.name);
    assert!(updated.updated_at >= created.updated_at);

    assert!(MedicineRepo::update_status(&pool, created.id, MedicineStatus::LowStock)
        .await
        .unwrap());
    let snapshot = MedicineRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .unwrap()
        .snapshot()
        .unwrap();
    assert_eq!(snapshot.status, MedicineStatus::LowStock);

    assert!(MedicineRepo::delete(&pool, created.id).await.unwrap());
    assert!(!MedicineRepo::delete(&pool, created.id).await.unwrap());
    assert!(MedicineRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn negative_quantity_violates_check_constraint(pool: PgPool) {
    let mut input = amoxicillin();
    input.quantity = -1;

    let err = MedicineRepo::create(&pool, &input).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => assert_eq!(db_err.code().as_deref(), Some("23514")),
        other => panic!("expected check violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn only_one_open_alert_per_type(pool: PgPool) {
    let medicine = MedicineRepo::create(&pool, &amoxicillin()).await.unwrap();
    let alert = NewAlert {
        medicine_id: medicine.id,
        alert_type: AlertType::LowStock,
        severity: AlertSeverity::Medium,
        message: "Amoxicillin 500mg at District Hospital is running low".to_string(),
    };

    let first = AlertRepo::create(&pool, &alert).await.unwrap();
    assert_eq!(
        AlertRepo::find_open(&pool, medicine.id, AlertType::LowStock).await.unwrap(),
        Some(first)
    );
    assert_eq!(
        AlertRepo::find_open(&pool, medicine.id, AlertType::Expiry).await.unwrap(),
        None
    );

    let err = AlertRepo::create(&pool, &alert).await.unwrap_err();
    assert_eq!(unique_violation(&err).as_deref(), Some("uq_alerts_open_per_type"));

    // A different type is independent.
    let expiry = NewAlert {
        alert_type: AlertType::Expiry,
        ..alert.clone()
    };
    AlertRepo::create(&pool, &expiry).await.unwrap();

    // Resolving frees the slot.
    assert!(AlertRepo::resolve(&pool, first).await.unwrap());
    assert!(!AlertRepo::resolve(&pool, first).await.unwrap());
    AlertRepo::create(&pool, &alert).await.unwrap();

    let open = AlertRepo::list(&pool, false, 50, 0).await.unwrap();
    assert_eq!(open.len(), 2);
    let all = AlertRepo::list_for_medicine(&pool, medicine.id).await.unwrap();
    assert_eq!(all.len(), 3);
    let resolved = all.iter().find(|a| a.id == first).unwrap();
    assert!(resolved.is_resolved);
    assert!(resolved.resolved_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn only_one_open_reorder_per_medicine(pool: PgPool) {
    let medicine = MedicineRepo::create(&pool, &amoxicillin()).await.unwrap();
    let reorder = NewReorder {
        medicine_id: medicine.id,
        quantity: 500,
        supplier: Some("Global Pharma".to_string()),
        expected_delivery: NaiveDate::from_ymd_opt(2025, 3, 8),
    };

    let id = ReorderRepo::create(&pool, &reorder).await.unwrap();
    assert_eq!(ReorderRepo::find_open(&pool, medicine.id).await.unwrap(), Some(id));

    let err = ReorderRepo::create(&pool, &reorder).await.unwrap_err();
    assert_eq!(
        unique_violation(&err).as_deref(),
        Some("uq_reorders_open_per_medicine")
    );

    // `ordered` still counts as open.
    let ordered = ReorderRepo::transition(&pool, id, ReorderStatus::Pending, ReorderStatus::Ordered)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ordered.status, "ordered");
    assert!(ReorderRepo::create(&pool, &reorder).await.is_err());

    // A stale transition does not apply.
    assert!(ReorderRepo::transition(&pool, id, ReorderStatus::Pending, ReorderStatus::Cancelled)
        .await
        .unwrap()
        .is_none());

    ReorderRepo::transition(&pool, id, ReorderStatus::Ordered, ReorderStatus::Shipped)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ReorderRepo::find_open(&pool, medicine.id).await.unwrap(), None);
    ReorderRepo::create(&pool, &reorder).await.unwrap();

    let pending = ReorderRepo::list(&pool, Some(ReorderStatus::Pending), 50, 0)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    let all = ReorderRepo::list(&pool, None, 50, 0).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_medicine_removes_its_alerts_and_reorders(pool: PgPool) {
    let medicine = MedicineRepo::create(&pool, &amoxicillin()).await.unwrap();
    AlertRepo::create(
        &pool,
        &NewAlert {
            medicine_id: medicine.id,
            alert_type: AlertType::Quality,
            severity: AlertSeverity::Low,
            message: "Packaging damaged".to_string(),
        },
    )
    .await
    .unwrap();
    ReorderRepo::create(
        &pool,
        &NewReorder {
            medicine_id: medicine.id,
            quantity: 500,
            supplier: None,
            expected_delivery: None,
        },
    )
    .await
    .unwrap();

    assert!(MedicineRepo::delete(&pool, medicine.id).await.unwrap());

    assert!(AlertRepo::list(&pool, true, 50, 0).await.unwrap().is_empty());
    assert!(ReorderRepo::list(&pool, None, 50, 0).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn resolve_open_clears_only_the_given_type(pool: PgPool) {
    let medicine = MedicineRepo::create(&pool, &amoxicillin()).await.unwrap();
    for alert_type in [AlertType::Expiry, AlertType::LowStock] {
        AlertRepo::create(
            &pool,
            &NewAlert {
                medicine_id: medicine.id,
                alert_type,
                severity: AlertSeverity::High,
                message: "warning".to_string(),
            },
        )
        .await
        .unwrap();
    }

    let resolved = AlertRepo::resolve_open(&pool, medicine.id, AlertType::Expiry)
        .await
        .unwrap();
    assert_eq!(resolved, 1);
    assert_eq!(
        AlertRepo::find_open(&pool, medicine.id, AlertType::Expiry)
            .await
            .unwrap(),
        None
    );
    assert!(AlertRepo::find_open(&pool, medicine.id, AlertType::LowStock)
        .await
        .unwrap()
        .is_some());

    // The critical alert can now take the slot.
    AlertRepo::create(
        &pool,
        &NewAlert {
            medicine_id: medicine.id,
            alert_type: AlertType::Expiry,
            severity: AlertSeverity::Critical,
            message: "expired".to_string(),
        },
    )
    .await
    .unwrap();

    let again = AlertRepo::resolve_open(&pool, 9_999, AlertType::Expiry)
        .await
        .unwrap();
    assert_eq!(again, 0);
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

async fn seed_reports(pool: &PgPool) {
    let rows = [
        ("Amoxicillin 500mg", "AMX-1", 120, "2026-06-30", "District Hospital"),
        ("Amoxicillin 500mg", "AMX-2", 30, "2025-01-15", "Rural Clinic A"),
        ("Paracetamol 500mg", "PCM-1", 5, "2025-03-20", "Rural Clinic A"),
        ("Insulin Glargine", "INS-1", 0, "2027-01-01", "District Hospital"),
    ];
    for (name, batch, quantity, expiry, location) in rows {
        MedicineRepo::create(
            pool,
            &CreateMedicine {
                name: name.to_string(),
                batch_id: batch.to_string(),
                quantity,
                expiry_date: expiry.parse().unwrap(),
                location: location.to_string(),
                ..amoxicillin()
            },
        )
        .await
        .unwrap();
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn report_totals_and_breakdowns(pool: PgPool) {
    seed_reports(&pool).await;
    let cutoff = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();

    let totals = ReportRepo::totals(&pool, 50, cutoff).await.unwrap();
    assert_eq!(totals.total_medicines, 4);
    assert_eq!(totals.total_quantity, 155);
    assert_eq!(totals.low_stock_count, 3);
    assert_eq!(totals.expiring_count, 2);

    let locations = ReportRepo::by_location(&pool).await.unwrap();
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].location, "District Hospital");
    assert_eq!(locations[0].medicine_count, 2);
    assert_eq!(locations[0].total_quantity, 120);
    assert_eq!(locations[1].total_quantity, 35);

    let top = ReportRepo::top_drugs(&pool, 2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "Amoxicillin 500mg");
    assert_eq!(top[0].total_quantity, 150);
    assert_eq!(top[1].name, "Paracetamol 500mg");

    assert_eq!(
        ReportRepo::locations(&pool).await.unwrap(),
        vec!["District Hospital".to_string(), "Rural Clinic A".to_string()]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn report_filters_by_threshold_cutoff_and_location(pool: PgPool) {
    seed_reports(&pool).await;

    let low = ReportRepo::low_stock(&pool, 50, None).await.unwrap();
    let quantities: Vec<i32> = low.iter().map(|m| m.quantity).collect();
    assert_eq!(quantities, vec![0, 5, 30]);

    let low_rural = ReportRepo::low_stock(&pool, 50, Some("Rural Clinic A"))
        .await
        .unwrap();
    assert_eq!(low_rural.len(), 2);

    let cutoff = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
    let expiring = ReportRepo::expiring_by(&pool, cutoff, None).await.unwrap();
    let batches: Vec<&str> = expiring.iter().map(|m| m.batch_id.as_str()).collect();
    assert_eq!(batches, vec!["AMX-2", "PCM-1"]);

    let none = ReportRepo::expiring_by(&pool, cutoff, Some("District Hospital"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn report_totals_on_empty_table_are_zero(pool: PgPool) {
    let cutoff = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
    let totals = ReportRepo::totals(&pool, 50, cutoff).await.unwrap();
    assert_eq!(totals.total_medicines, 0);
    assert_eq!(totals.total_quantity, 0);
    assert!(ReportRepo::by_location(&pool).await.unwrap().is_empty());
}
