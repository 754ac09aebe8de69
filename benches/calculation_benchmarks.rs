//! Performance benchmarks for the payroll engine.
//!
//! This benchmark suite covers:
//! - A single PAYE calculation
//! - A single employee computation across both currencies
//! - Monthly runs of 100 and 1000 employees
//! - A preview request through the HTTP router
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::compute_tax;
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{Currency, Employee, PayrollPeriod};
use payroll_engine::payroll::{InMemoryPayrollStore, PayrollProcessor, PayrollService};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const CONFIG_DIR: &str = "./config/zimbabwe";

fn create_processor() -> PayrollProcessor {
    let (settings, tables) = ConfigLoader::load(CONFIG_DIR)
        .expect("Failed to load config")
        .into_parts();
    PayrollProcessor::new(
        Arc::new(tables),
        Arc::new(InMemoryPayrollStore::new()),
        settings.default_exchange_rate,
    )
}

/// Creates `count` employees with salaries spread across the bracket tables.
fn create_employees(count: usize) -> Vec<Employee> {
    (0..count)
        .map(|i| Employee {
            employee_id: format!("EMP{:05}", i),
            first_name: "Bench".to_string(),
            surname: format!("{}", i),
            usd_salary: Some(Decimal::from(500 + (i as i64 % 40) * 500)),
            zig_salary: if i % 2 == 0 {
                Some(Decimal::from(2000 + (i as i64 % 25) * 2500))
            } else {
                None
            },
            active: true,
        })
        .collect()
}

fn period() -> PayrollPeriod {
    PayrollPeriod::parse_month("2025-02").expect("valid period")
}

/// Benchmark: PAYE for one amount.
fn bench_compute_tax(c: &mut Criterion) {
    let processor = create_processor();
    let brackets = processor
        .tables()
        .active_brackets(Currency::Usd, period().first_day());
    let taxable = Decimal::from_str("3250.75").unwrap();

    c.bench_function("compute_tax", |b| {
        b.iter(|| black_box(compute_tax(black_box(taxable), Currency::Usd, &brackets, 1)))
    });
}

/// Benchmark: one employee, both currencies, with audit trace.
fn bench_single_employee(c: &mut Criterion) {
    let processor = create_processor();
    let employee = create_employees(1).remove(0);

    c.bench_function("single_employee", |b| {
        b.iter(|| black_box(processor.compute_employee_payroll(&employee, period())))
    });
}

/// Benchmark: monthly runs into a fresh store.
fn bench_monthly_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("monthly_run");

    for size in [100usize, 1000] {
        let employees = create_employees(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &employees, |b, employees| {
            b.iter(|| {
                let processor = create_processor();
                black_box(processor.run_monthly_payroll(employees, period()))
            })
        });
    }

    group.finish();
}

/// Benchmark: GET /payroll/preview through the router.
fn bench_preview_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = PayrollService::from_config_dir(CONFIG_DIR).expect("Failed to load config");
    let router = create_router(AppState::new(service));

    c.bench_function("preview_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/payroll/preview?employee_id=EMP0001&period=2025-02")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_compute_tax,
    bench_single_employee,
    bench_monthly_run,
    bench_preview_request
);
criterion_main!(benches);
