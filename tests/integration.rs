//! Integration tests for the payroll HTTP API.
//!
//! This test suite covers:
//! - Single calculation previews against the configured rate history
//! - Monthly payroll runs, partial failures and duplicate-period refusal
//! - Listing stored records
//! - Reading and saving rate tables
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/mauritius").expect("Failed to load config");
    AppState::in_memory(config)
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

fn assert_decimal(value: &Value, expected: &str) {
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("Expected decimal string, got {}", value));
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

fn employee(id: &str, base_salary: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Employee {}", id),
        "base_salary": base_salary,
        "status": "active"
    })
}

fn calculate_request(year: i32, month: u32, employee: Value, weekday_hours: &str) -> Value {
    json!({
        "period": { "year": year, "month": month },
        "employee": employee,
        "overtime": { "weekday_hours": weekday_hours }
    })
}

fn run_request(year: i32, month: u32, employees: Vec<Value>) -> Value {
    json!({
        "period": { "year": year, "month": month },
        "employees": employees
    })
}

fn run_entry(employee: Value) -> Value {
    json!({ "employee": employee })
}

// =============================================================================
// SECTION 1: Single calculation
// =============================================================================

#[tokio::test]
async fn test_calculate_salary_with_weekday_overtime() {
    // 20,000 / 200h = 100/h; 5h × 100 × 1.5 = 750 overtime
    let router = create_router(create_test_state());
    let request = calculate_request(2025, 1, employee("emp_001", "20000"), "5");

    let (status, record) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["rate_table_version"], "2024-07");
    assert_eq!(record["month_name"], "January");
    assert_decimal(&record["hourly_rate"], "100");
    assert_decimal(&record["overtime_amount"], "750");
    assert_decimal(&record["gross_salary"], "20750");
    assert_decimal(&record["deductions"]["pension"], "622.5");
    assert_decimal(&record["deductions"]["savings_fund"], "207.5");
    assert_decimal(&record["deductions"]["social_contribution"], "311.25");
    assert_decimal(&record["deductions"]["income_tax"], "0");
    assert_decimal(&record["deductions"]["training_levy"], "311.25");
    assert_decimal(&record["deductions"]["guarantee_fund"], "207.5");
    assert_decimal(&record["total_deductions"], "1660");
    assert_decimal(&record["net_salary"], "19090");
    assert!(record["flags"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_calculate_high_earner_uses_current_brackets_and_higher_levy() {
    // 2025-07 brackets: 0% to 32,500, 10% to 83,000, 20% above
    // tax = 50,500 × 10% + 17,000 × 20% = 5,050 + 3,400 = 8,450
    let router = create_router(create_test_state());
    let request = calculate_request(2025, 9, employee("emp_002", "100000"), "0");

    let (status, record) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["rate_table_version"], "2025-07");
    assert_decimal(&record["deductions"]["income_tax"], "8450");
    assert_decimal(&record["deductions"]["social_contribution"], "3000");
    assert_decimal(&record["total_deductions"], "17950");
    assert_decimal(&record["net_salary"], "82050");
    assert_decimal(&record["employer_contributions"]["pension"], "6000");
    assert_decimal(&record["employer_contributions"]["savings_fund"], "2500");
    assert_decimal(&record["employer_contributions"]["social_contribution"], "6000");
    assert_decimal(&record["employer_contributions"]["total"], "14500");
}

#[tokio::test]
async fn test_calculate_with_pinned_rate_table_version() {
    let router = create_router(create_test_state());
    let mut request = calculate_request(2025, 9, employee("emp_002", "100000"), "0");
    request["rate_table_version"] = json!("2024-07");

    let (status, record) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["rate_table_version"], "2024-07");
    // 70,000 × 10%
    assert_decimal(&record["deductions"]["income_tax"], "7000");
}

#[tokio::test]
async fn test_calculate_audit_trace_explains_each_figure() {
    let router = create_router(create_test_state());
    let request = calculate_request(2025, 1, employee("emp_001", "20000"), "5");

    let (_, record) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    let steps = record["audit_trace"]["steps"].as_array().unwrap();
    let rule_ids: Vec<&str> = steps
        .iter()
        .map(|s| s["rule_id"].as_str().unwrap())
        .collect();
    assert_eq!(rule_ids.first(), Some(&"hourly_rate"));
    assert!(rule_ids.contains(&"overtime_weekday"));
    assert!(rule_ids.contains(&"social_contribution"));
    assert!(rule_ids.contains(&"income_tax"));

    let numbers: Vec<u64> = steps
        .iter()
        .map(|s| s["step_number"].as_u64().unwrap())
        .collect();
    let expected: Vec<u64> = (1..=numbers.len() as u64).collect();
    assert_eq!(numbers, expected);
}

#[tokio::test]
async fn test_calculate_negative_net_pay_is_flagged_not_clamped() {
    let router = create_router(create_test_state());
    let request = json!({
        "period": { "year": 2025, "month": 1 },
        "employee": employee("emp_003", "20000"),
        "attendance": { "absence_days": "26" }
    });

    let (status, record) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    // 26 days × 8h × 100 = 20,800 deducted from 20,000
    assert_decimal(&record["gross_salary"], "-800");
    assert_decimal(&record["net_salary"], "-800");
    let kinds: Vec<&str> = record["flags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"negative_net_pay"));
}

#[tokio::test]
async fn test_calculate_inactive_employee_is_rejected() {
    let router = create_router(create_test_state());
    let mut inactive = employee("emp_004", "20000");
    inactive["status"] = json!("terminated");
    let request = calculate_request(2025, 1, inactive, "0");

    let (status, error) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["details"].as_str().unwrap().contains("status"));
}

#[tokio::test]
async fn test_calculate_negative_hours_are_rejected() {
    let router = create_router(create_test_state());
    let request = calculate_request(2025, 1, employee("emp_001", "20000"), "-3");

    let (status, error) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(
        error["details"]
            .as_str()
            .unwrap()
            .contains("overtime.weekday_hours")
    );
}

#[tokio::test]
async fn test_calculate_hours_beyond_decimal_range_are_rejected() {
    let router = create_router(create_test_state());
    let request = calculate_request(
        2025,
        1,
        employee("emp_001", "20000"),
        "1000000000000000000000000000",
    );

    let (status, error) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["message"].as_str().unwrap().contains("amount out of range"));
    assert!(
        error["details"]
            .as_str()
            .unwrap()
            .contains("overtime.weekday_hours")
    );
}

#[tokio::test]
async fn test_calculate_invalid_month() {
    let router = create_router(create_test_state());
    let request = calculate_request(2025, 13, employee("emp_001", "20000"), "0");

    let (status, error) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_calculate_before_first_rate_table() {
    let router = create_router(create_test_state());
    let request = calculate_request(2019, 1, employee("emp_001", "20000"), "0");

    let (status, error) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "RATE_TABLE_NOT_FOUND");
}

#[tokio::test]
async fn test_calculate_malformed_json() {
    let router = create_router(create_test_state());
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payroll/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_calculate_missing_field() {
    let router = create_router(create_test_state());
    let request = json!({
        "period": { "year": 2025, "month": 1 },
        "employee": { "id": "emp_001" }
    });

    let (status, error) = send(router, "POST", "/payroll/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("base_salary"));
}

// =============================================================================
// SECTION 2: Payroll runs
// =============================================================================

#[tokio::test]
async fn test_run_stores_records_and_lists_them() {
    let state = create_test_state();
    let request = run_request(
        2025,
        3,
        vec![
            run_entry(employee("emp_002", "35000")),
            run_entry(employee("emp_001", "20000")),
        ],
    );

    let (status, report) = send(
        create_router(state.clone()),
        "POST",
        "/payroll/runs",
        Some(request),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["rate_table_version"], "2024-07");
    assert_eq!(report["records"].as_array().unwrap().len(), 2);
    assert!(report["failures"].as_array().unwrap().is_empty());

    let (status, records) = send(
        create_router(state),
        "GET",
        "/payroll/records/2025/3",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["employee_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["emp_001", "emp_002"]);
}

#[tokio::test]
async fn test_run_twice_for_same_period_is_conflict() {
    let state = create_test_state();
    let request = run_request(2025, 4, vec![run_entry(employee("emp_001", "20000"))]);

    let (status, _) = send(
        create_router(state.clone()),
        "POST",
        "/payroll/runs",
        Some(request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(
        create_router(state.clone()),
        "POST",
        "/payroll/runs",
        Some(request),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE_PERIOD");
    assert!(error["details"].as_str().unwrap().contains("emp_001"));

    let (_, records) = send(create_router(state), "GET", "/payroll/records/2025/4", None).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_run_with_partial_failure() {
    let state = create_test_state();
    let mut inactive = employee("emp_002", "30000");
    inactive["status"] = json!("inactive");
    let request = run_request(
        2025,
        5,
        vec![
            run_entry(employee("emp_001", "20000")),
            run_entry(inactive),
            run_entry(employee("emp_003", "0")),
        ],
    );

    let (status, report) = send(
        create_router(state.clone()),
        "POST",
        "/payroll/runs",
        Some(request),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["records"].as_array().unwrap().len(), 1);
    let failures = report["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0]["employee_id"], "emp_002");
    assert_eq!(failures[0]["field"], "status");
    assert_eq!(failures[1]["employee_id"], "emp_003");
    assert_eq!(failures[1]["field"], "base_salary");

    let (_, records) = send(create_router(state), "GET", "/payroll/records/2025/5", None).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_run_pays_valid_copy_after_invalid_copy_of_same_employee() {
    let state = create_test_state();
    let request = run_request(
        2025,
        6,
        vec![
            run_entry(employee("emp_001", "0")),
            run_entry(employee("emp_001", "20000")),
        ],
    );

    let (status, report) = send(
        create_router(state.clone()),
        "POST",
        "/payroll/runs",
        Some(request),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let records = report["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_decimal(&records[0]["basic_salary"], "20000");
    let failures = report["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["field"], "base_salary");
}

#[tokio::test]
async fn test_second_run_for_month_pays_only_new_employees() {
    let state = create_test_state();
    let first = run_request(2025, 8, vec![run_entry(employee("emp_001", "20000"))]);
    let (status, _) = send(create_router(state.clone()), "POST", "/payroll/runs", Some(first)).await;
    assert_eq!(status, StatusCode::CREATED);

    let joiners = run_request(2025, 8, vec![run_entry(employee("emp_002", "30000"))]);
    let (status, _) = send(create_router(state.clone()), "POST", "/payroll/runs", Some(joiners)).await;
    assert_eq!(status, StatusCode::CREATED);

    let repeat = run_request(
        2025,
        8,
        vec![
            run_entry(employee("emp_003", "25000")),
            run_entry(employee("emp_001", "20000")),
        ],
    );
    let (status, error) = send(create_router(state.clone()), "POST", "/payroll/runs", Some(repeat)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE_PERIOD");

    let (_, records) = send(create_router(state), "GET", "/payroll/records/2025/8", None).await;
    assert_eq!(records.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_records_for_unprocessed_period_is_empty() {
    let router = create_router(create_test_state());

    let (status, records) = send(router, "GET", "/payroll/records/2025/6", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_records_for_invalid_month() {
    let router = create_router(create_test_state());

    let (status, error) = send(router, "GET", "/payroll/records/2025/0", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

// =============================================================================
// SECTION 3: Rate settings
// =============================================================================

#[tokio::test]
async fn test_get_current_rates() {
    let router = create_router(create_test_state());

    let (status, table) = send(router, "GET", "/settings/rates", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["version"], "2025-07");
    assert_eq!(table["effective_from"], "2025-07-01");
    assert_eq!(table["tax_brackets"].as_array().unwrap().len(), 3);
    assert!(table["tax_brackets"][2]["max"].is_null());
}

#[tokio::test]
async fn test_save_rates_applies_to_later_calculations() {
    let state = create_test_state();
    let (_, mut table) = send(create_router(state.clone()), "GET", "/settings/rates", None).await;

    table["version"] = json!("2026-01");
    table["effective_from"] = json!("2026-01-01");
    table["training_levy"] = json!("0.02");

    let (status, saved) = send(
        create_router(state.clone()),
        "PUT",
        "/settings/rates",
        Some(table),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["version"], "2026-01");

    let request = calculate_request(2026, 2, employee("emp_001", "20000"), "0");
    let (_, record) = send(
        create_router(state.clone()),
        "POST",
        "/payroll/calculate",
        Some(request),
    )
    .await;
    assert_eq!(record["rate_table_version"], "2026-01");
    assert_decimal(&record["deductions"]["training_levy"], "400");

    // Earlier months keep their own rates.
    let request = calculate_request(2025, 12, employee("emp_001", "20000"), "0");
    let (_, record) = send(create_router(state), "POST", "/payroll/calculate", Some(request)).await;
    assert_eq!(record["rate_table_version"], "2025-07");
    assert_decimal(&record["deductions"]["training_levy"], "300");
}

#[tokio::test]
async fn test_save_rates_refuses_to_change_existing_version() {
    let state = create_test_state();
    let (_, mut table) = send(create_router(state.clone()), "GET", "/settings/rates", None).await;

    table["pension"]["employee"] = json!("0.05");

    let (status, error) = send(
        create_router(state.clone()),
        "PUT",
        "/settings/rates",
        Some(table),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "INVALID_RATE_TABLE");
    assert_eq!(error["violations"][0]["field"], "version");

    let (_, current) = send(create_router(state), "GET", "/settings/rates", None).await;
    assert_eq!(current["version"], "2025-07");
    assert_decimal(&current["pension"]["employee"], "0.03");
}

#[tokio::test]
async fn test_save_unchanged_rates_again_is_accepted() {
    let state = create_test_state();
    let (_, table) = send(create_router(state.clone()), "GET", "/settings/rates", None).await;

    let (status, saved) = send(
        create_router(state),
        "PUT",
        "/settings/rates",
        Some(table.clone()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved, table);
}

#[tokio::test]
async fn test_save_invalid_rates_lists_every_violation() {
    let state = create_test_state();
    let (_, mut table) = send(create_router(state.clone()), "GET", "/settings/rates", None).await;

    table["version"] = json!("broken");
    table["pension"]["employee"] = json!("1.5");
    table["tax_brackets"] = json!([]);

    let (status, error) = send(
        create_router(state.clone()),
        "PUT",
        "/settings/rates",
        Some(table),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "INVALID_RATE_TABLE");
    let fields: Vec<&str> = error["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"pension.employee"));
    assert!(fields.contains(&"tax_brackets"));

    // The rejected table was not saved.
    let (_, current) = send(create_router(state), "GET", "/settings/rates", None).await;
    assert_eq!(current["version"], "2025-07");
}
