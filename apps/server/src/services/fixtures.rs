//! Fixture loading: demo store data and test case definitions.

use std::path::Path;

use chrono::{TimeZone, Utc};
use serde_json::json;
use tracing::info;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewCustomer, NewOrder, NewProduct, NewTestCase};

/// Counts from a seeding or import pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Everything `seed` touched, per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub products: FixtureReport,
    pub customers: FixtureReport,
    pub orders: FixtureReport,
    pub test_cases: FixtureReport,
}

// (name, description, price, available, stock)
const PRODUCTS: &[(&str, &str, f64, bool, i32)] = &[
    ("Laptop", "Laptop gamingowy", 4500.99, true, 10),
    ("Smartfon", "Smartfon z 5G", 2500.50, true, 25),
    ("Słuchawki", "Bezprzewodowe słuchawki", 299.99, true, 50),
    ("Klawiatura", "Klawiatura mechaniczna", 399.00, false, 0),
    ("Myszka", "Myszka optyczna", 129.99, true, 100),
    ("Monitor", "Monitor 4K 27 cali", 1800.00, true, 15),
    ("Dysk SSD", "Dysk SSD 1TB", 550.00, true, 30),
    ("Kamera internetowa", "Kamera HD", 199.99, false, 5),
    ("Router", "Router Wi-Fi 6", 399.50, true, 20),
    ("Drukarka", "Drukarka laserowa", 799.00, true, 8),
    ("Tablet", "Tablet 10 cali", 1200.00, true, 12),
    ("Głośniki", "Głośniki Bluetooth", 249.99, true, 40),
    ("Projektor", "Projektor Full HD", 2200.00, false, 3),
    ("Skaner", "Skaner biurowy", 450.00, true, 7),
    ("Etui na laptopa", "Etui 15 cali", 89.99, true, 60),
    ("Podstawka chłodząca", "Podstawka pod laptop", 149.99, true, 25),
    ("Kabel HDMI", "Kabel HDMI 2m", 39.99, true, 200),
    ("Pendrive", "Pendrive 64GB", 59.99, true, 150),
    ("Zasilacz", "Zasilacz uniwersalny", 99.99, false, 0),
    ("Smartwatch", "Smartwatch sportowy", 699.99, true, 18),
];

// (first_name, last_name, email, phone, address)
const CUSTOMERS: &[(&str, &str, &str, Option<&str>, &str)] = &[
    ("Jan", "Kowalski", "jan.kowalski@example.com", Some("123456789"), "ul. Kwiatowa 1, Warszawa"),
    ("Anna", "Nowak", "anna.nowak@example.com", Some("987654321"), "ul. Słoneczna 2, Kraków"),
    ("Piotr", "Wiśniewski", "piotr.wisniewski@example.com", None, "ul. Leśna 3, Gdańsk"),
    ("Katarzyna", "Zielińska", "katarzyna.zielinska@example.com", Some("456123789"), "ul. Polna 4, Wrocław"),
    ("Tomasz", "Lewandowski", "tomasz.lewandowski@example.com", Some("789123456"), "ul. Morska 5, Gdynia"),
];

// (customer_id, product_id, quantity, total_price, (year, month, day))
const ORDERS: &[(i32, i32, i32, f64, (i32, u32, u32))] = &[
    (1, 1, 2, 9019.98, (2025, 1, 15)),
    (1, 3, 1, 299.99, (2025, 1, 16)),
    (2, 2, 1, 2500.50, (2025, 2, 1)),
    (2, 5, 3, 389.97, (2025, 2, 2)),
    (3, 6, 1, 1800.00, (2025, 2, 10)),
    (3, 7, 2, 1100.00, (2025, 2, 11)),
    (4, 9, 1, 399.50, (2025, 3, 1)),
    (4, 11, 1, 1200.00, (2025, 3, 2)),
    (5, 12, 2, 499.98, (2025, 3, 5)),
    (5, 20, 1, 699.99, (2025, 3, 6)),
];

/// The three SOAP cases. Their endpoint names the operation.
pub fn soap_cases() -> Vec<NewTestCase> {
    vec![
        NewTestCase {
            test_id: "SOAP_TC_001".to_string(),
            description: "Get an existing product over SOAP".to_string(),
            endpoint: "GetProduct".to_string(),
            method: "POST".to_string(),
            test_type: "soap".to_string(),
            expected_status: 200,
            expected_response: Some(
                json!({"id": 1, "name": "Laptop", "description": "Laptop gamingowy"}).to_string(),
            ),
        },
        NewTestCase {
            test_id: "SOAP_TC_002".to_string(),
            description: "Create a product over SOAP".to_string(),
            endpoint: "CreateProduct".to_string(),
            method: "POST".to_string(),
            test_type: "soap".to_string(),
            expected_status: 201,
            expected_response: Some(json!({"result": 21}).to_string()),
        },
        NewTestCase {
            test_id: "SOAP_TC_003".to_string(),
            description: "Delete a product over SOAP".to_string(),
            endpoint: "DeleteProduct".to_string(),
            method: "POST".to_string(),
            test_type: "soap".to_string(),
            expected_status: 204,
            expected_response: Some(json!({"status": "Product deleted"}).to_string()),
        },
    ]
}

/// Seed demo data. Store tables are only filled when empty; cases are
/// inserted when their test_id is not present yet.
pub async fn seed(pool: &DbPool) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    if pool.list_products().await?.is_empty() {
        for (name, description, price, available, stock) in PRODUCTS {
            pool.insert_product(NewProduct {
                name: name.to_string(),
                description: description.to_string(),
                price: *price,
                available: *available,
                stock: *stock,
            })
            .await?;
            report.products.inserted += 1;
        }
    } else {
        report.products.skipped = PRODUCTS.len();
    }
    info!("Products: {:?}", report.products);

    if pool.list_customers().await?.is_empty() {
        for (first_name, last_name, email, phone, address) in CUSTOMERS {
            pool.insert_customer(NewCustomer {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                phone: phone.map(str::to_string),
                address: address.to_string(),
            })
            .await?;
            report.customers.inserted += 1;
        }
    } else {
        report.customers.skipped = CUSTOMERS.len();
    }
    info!("Customers: {:?}", report.customers);

    if pool.list_orders().await?.is_empty() {
        for (customer_id, product_id, quantity, total_price, (y, m, d)) in ORDERS {
            let order_date = Utc
                .with_ymd_and_hms(*y, *m, *d, 0, 0, 0)
                .single()
                .ok_or_else(|| AppError::InvalidInput(format!("Invalid order date {y}-{m}-{d}")))?;
            pool.insert_order(NewOrder {
                customer_id: *customer_id,
                product_id: *product_id,
                quantity: *quantity,
                total_price: *total_price,
                order_date: Some(order_date),
            })
            .await?;
            report.orders.inserted += 1;
        }
    } else {
        report.orders.skipped = ORDERS.len();
    }
    info!("Orders: {:?}", report.orders);

    report.test_cases = insert_cases(pool, soap_cases()).await?;
    info!("SOAP test cases: {:?}", report.test_cases);

    Ok(report)
}

/// Insert cases, skipping test_ids that already exist.
pub async fn insert_cases(pool: &DbPool, cases: Vec<NewTestCase>) -> AppResult<FixtureReport> {
    let mut report = FixtureReport::default();

    for case in cases {
        if pool.test_case_exists(&case.test_id).await? {
            info!("Test case {} already exists, skipping", case.test_id);
            report.skipped += 1;
            continue;
        }
        let test_id = case.test_id.clone();
        pool.insert_test_case(case).await?;
        info!("Added test case {}", test_id);
        report.inserted += 1;
    }

    Ok(report)
}

/// Parse a JSON array of case definitions.
pub fn parse_cases(json_text: &str) -> AppResult<Vec<NewTestCase>> {
    Ok(serde_json::from_str(json_text)?)
}

/// Import cases from a JSON fixture file.
pub async fn import_cases(pool: &DbPool, path: &Path) -> AppResult<FixtureReport> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let cases = parse_cases(&text)?;
    info!("Loaded {} test case(s) from {}", cases.len(), path.display());

    insert_cases(pool, cases).await
}
