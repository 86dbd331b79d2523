use super::ForecastLogRepository;
use crate::domain::forecast::ForecastKey;
use crate::domain::forecast_log::ForecastLogEntry;
use crate::domain::types::{LogOrigin, Mes};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = crate::db::open_in_memory_with_schema().unwrap();
    Arc::new(Mutex::new(conn))
}

fn make_entry(produto: &str, mes: Mes, anterior: Option<f64>, novo: f64) -> ForecastLogEntry {
    ForecastLogEntry::new(ForecastKey::new(produto, 2025, 3, mes), anterior, novo, "ana")
}

#[test]
fn test_append_and_find_by_cell() {
    let repo = ForecastLogRepository::new(setup_test_db());

    let first = make_entry("P001", Mes::Mar, None, 5.0);
    let second = make_entry("P001", Mes::Mar, Some(5.0), 7.5);
    assert_eq!(repo.append(&first).unwrap(), first.log_id);
    repo.append(&second).unwrap();
    repo.append(&make_entry("P001", Mes::Abr, None, 1.0)).unwrap();

    let logs = repo
        .find_by_cell(&ForecastKey::new("P001", 2025, 3, Mes::Mar))
        .unwrap();
    assert_eq!(logs.len(), 2);
    // 倒序: 最新在前
    assert_eq!(logs[0].log_id, second.log_id);
    assert_eq!(logs[0].valor_anterior, Some(5.0));
    assert_eq!(logs[1].valor_anterior, None);
}

#[test]
fn test_find_by_product_respects_limit() {
    let repo = ForecastLogRepository::new(setup_test_db());

    for mes in [Mes::Jan, Mes::Fev, Mes::Mar] {
        repo.append(&make_entry("P001", mes, None, 1.0)).unwrap();
    }
    repo.append(&make_entry("P002", Mes::Jan, None, 1.0)).unwrap();

    assert_eq!(repo.find_by_product("P001", 10).unwrap().len(), 3);
    assert_eq!(repo.find_by_product("P001", 2).unwrap().len(), 2);
    assert_eq!(repo.find_recent(10).unwrap().len(), 4);
    assert_eq!(repo.count().unwrap(), 4);
}

#[test]
fn test_origin_round_trips() {
    let repo = ForecastLogRepository::new(setup_test_db());
    let entry = make_entry("P001", Mes::Jul, Some(2.0), 3.0).with_origin(LogOrigin::TotalRedistribution);
    repo.append(&entry).unwrap();

    let logs = repo.find_by_product("P001", 1).unwrap();
    assert_eq!(logs[0].origem, LogOrigin::TotalRedistribution);
    assert_eq!(logs[0].key.mes, Mes::Jul);
}
