use std::sync::Arc;

use loyalty_core::model::CustomerId;
use loyalty_core::time::fixed_now;
use services::{AppServices, Clock, CustomerServiceError, PortalError, StaticPin};

async fn sqlite_services(name: &str) -> AppServices {
    AppServices::new_sqlite(
        &format!("sqlite:file:{name}?mode=memory&cache=shared"),
        Clock::fixed(fixed_now()),
        Arc::new(StaticPin::default()),
    )
    .await
    .expect("connect sqlite")
}

#[tokio::test]
async fn admin_changes_show_up_in_customer_dashboard() {
    let services = sqlite_services("memdb_portal_flow").await;
    assert!(services.seed_if_empty().await.expect("seed"));

    let dashboard = services.portal().login("1003").await.expect("login");
    assert_eq!(dashboard.customer.name(), "Kiosco 24 Horas");
    assert_eq!(dashboard.progress.progress_percent, 13);
    assert_eq!(
        dashboard.progress.next_tier.as_ref().map(|t| t.threshold),
        Some(30_000_000)
    );

    let admin = services.admin().unlock("2626").expect("unlock");
    let id = CustomerId::new("1003").unwrap();
    admin
        .customers()
        .adjust_spend(&id, 8_700_000)
        .await
        .expect("bump");

    let dashboard = services.portal().login("1003").await.expect("login again");
    assert!(dashboard.progress.all_attained());
    assert_eq!(dashboard.progress.progress_percent, 100);

    // Raising the top tier puts it back out of reach.
    let top = admin
        .tiers()
        .list()
        .await
        .expect("tiers")
        .into_iter()
        .last()
        .expect("top tier");
    admin
        .tiers()
        .update(top.id, 40_000_000, top.tier.description.clone())
        .await
        .expect("update tier");

    let dashboard = services.portal().login("1003").await.expect("login third");
    assert_eq!(dashboard.progress.remaining, 10_000_000);
    assert_eq!(dashboard.progress.progress_percent, 50);
}

#[tokio::test]
async fn removed_customer_can_no_longer_sign_in() {
    let services = sqlite_services("memdb_portal_remove").await;
    let admin = services.admin().unlock("2626").expect("unlock");
    admin.reset_demo().await.expect("reset");

    let customers = admin.customers();
    let err = customers
        .add("1001", "Duplicate", 0)
        .await
        .expect_err("duplicate account");
    assert!(matches!(err, CustomerServiceError::DuplicateAccount(_)));

    customers
        .remove(&CustomerId::new("1001").unwrap())
        .await
        .expect("remove");
    let err = services.portal().login("1001").await.unwrap_err();
    assert!(matches!(err, PortalError::UnknownAccount(_)));

    let csv = admin.export_customers_csv().await.expect("export");
    assert_eq!(csv.file_name, "customers_2023-11-14.csv");
    assert!(!csv.contents.contains("1001,"));
    assert_eq!(csv.contents.lines().count(), 4);
}

#[tokio::test]
async fn wrong_pin_keeps_admin_locked() {
    let services = sqlite_services("memdb_portal_pin").await;
    assert!(services.admin().unlock("0000").is_err());
}
