use criterion::{criterion_group, criterion_main, Criterion};

use chrono::NaiveDate;
use models::{Customer, Machine, ServiceRecord};
use rust_decimal::Decimal;
use service::engine::Engine;
use service::storage::Stores;

fn bench_daily_report(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let stores = Stores::in_memory();
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    // 200 visits on the report day across 50 customers, every tenth machine missing
    rt.block_on(async {
        for i in 0..200u32 {
            let customer = stores
                .customers
                .create(Customer {
                    id: String::new(),
                    customer_name: format!("Customer {}", i % 50),
                    address: "12 Main St".into(),
                    location: "Colombo".into(),
                    phone: "0771234567".into(),
                    email: format!("c{i}@x.com"),
                })
                .await
                .unwrap();
            let machine_id = if i % 10 == 0 {
                "missing".to_string()
            } else {
                stores
                    .machines
                    .create(Machine {
                        id: String::new(),
                        customer_id: Some(customer.id.clone()),
                        model: "WL-200".into(),
                        serial_number: format!("SN{i}"),
                        installed_date: None,
                        warranty: String::new(),
                        last_service_date: Some(day),
                        next_service_date: None,
                        capacity: "15kg".into(),
                        reg_no: format!("R{i}"),
                        id_no: format!("ID{i}"),
                    })
                    .await
                    .unwrap()
                    .id
            };
            stores
                .records
                .create(ServiceRecord {
                    id: String::new(),
                    customer_id: customer.id,
                    machine_id,
                    service_date: day,
                    next_service_date: None,
                    technician_name: "Nimal".into(),
                    remarks: String::new(),
                    service_cost: Decimal::new(1500, 0),
                    visit_no: i,
                    invoice_no: format!("INV-{i}"),
                })
                .await
                .unwrap();
        }
    });

    let engine = Engine::new(&stores);
    c.bench_function("daily_report_200_visits", |b| {
        b.iter(|| {
            let rows = rt.block_on(engine.daily_report(day)).unwrap();
            assert_eq!(rows.len(), 200);
        });
    });
}

criterion_group!(benches, bench_daily_report);
criterion_main!(benches);
