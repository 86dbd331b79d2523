// ==========================================
// ForecastApi 集成测试
// ==========================================
// 测试范围:
// 1. 预测表格: 行顺序、缺失值按 0、可编辑标记
// 2. 单元格编辑: 非数字按 0、日志记录旧值/新值
// 3. 年度总量重分配: 已实现月份不变、零权重策略、无配置
// 4. 日志查询
// ==========================================

mod helpers;

use helpers::api_test_helper::ApiTestEnv;
use helpers::mock_config::MockConfig;

use sop_forecast::api::{ApiError, NotificationLevel, SetCellRequest, SetTotalRequest};
use sop_forecast::domain::{ForecastKey, Group, LogOrigin, Mes, MonthConfiguration};
use sop_forecast::engine::RedistributionOutcome;
use sop_forecast::repository::{ForecastStore, GroupRepository, MonthConfigRepository};

const PRODUTO: &str = "P001";

fn cell(ano: i32, id_tipo: i32, mes: &str, raw: &str) -> SetCellRequest {
    SetCellRequest {
        produto: PRODUTO.to_string(),
        ano,
        id_tipo,
        mes: mes.to_string(),
        raw_value: raw.to_string(),
        actor: Some("ana".to_string()),
    }
}

fn total(ano: i32, id_tipo: i32, raw: &str) -> SetTotalRequest {
    SetTotalRequest {
        produto: PRODUTO.to_string(),
        ano,
        id_tipo,
        raw_total: raw.to_string(),
        actor: Some("ana".to_string()),
    }
}

fn stored(env: &ApiTestEnv, ano: i32, id_tipo: i32, mes: Mes) -> Option<f64> {
    env.store
        .read_forecast_value(&ForecastKey::new(PRODUTO, ano, id_tipo, mes))
        .expect("读取失败")
}

/// JAN–JUN 各写入 10
async fn seed_realized_values(env: &ApiTestEnv) {
    for mes in ["JAN", "FEV", "MAR", "ABR", "MAI", "JUN"] {
        env.forecast_api
            .set_cell(cell(2025, 3, mes, "10"))
            .await
            .expect("写入失败");
    }
}

// ==========================================
// 预测表格
// ==========================================

#[tokio::test]
async fn test_get_forecast_table_空产品() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let table = env.forecast_api.get_forecast_table(PRODUTO).await.expect("查询失败");

    assert_eq!(table.produto, PRODUTO);
    let keys: Vec<(i32, i32)> = table.rows.iter().map(|r| (r.group.ano, r.group.id_tipo)).collect();
    assert_eq!(keys, vec![(2025, 1), (2025, 3)]);

    assert!(!table.rows[0].editable);
    assert!(table.rows[1].editable);

    let revisao = &table.rows[1];
    assert_eq!(revisao.cells.len(), 12);
    assert!(revisao.cells.iter().all(|c| c.valor == 0.0));
    assert_eq!(revisao.total, 0.0);
    assert!(revisao.cells[0].realizado);
    assert!(!revisao.cells[11].realizado);
}

#[tokio::test]
async fn test_get_forecast_table_产品编码为空() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.forecast_api.get_forecast_table("  ").await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_list_products() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let products = env.forecast_api.list_products().expect("查询失败");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].codigo, PRODUTO);
}

// ==========================================
// 单元格编辑
// ==========================================

#[tokio::test]
async fn test_set_cell_非数字输入按0() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    env.forecast_api
        .set_cell(cell(2025, 3, "MAR", "8"))
        .await
        .expect("写入失败");
    let resp = env
        .forecast_api
        .set_cell(cell(2025, 3, "mar", "abc"))
        .await
        .expect("写入失败");

    assert_eq!(resp.commit.valor_anterior, Some(8.0));
    assert_eq!(resp.commit.valor_novo, 0.0);
    assert_eq!(resp.notification.level, NotificationLevel::Info);
    assert_eq!(stored(&env, 2025, 3, Mes::Mar), Some(0.0));

    let logs = env
        .forecast_api
        .list_logs_by_cell(PRODUTO, 2025, 3, "MAR")
        .expect("查询失败");
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].valor_anterior, Some(8.0));
    assert_eq!(logs[0].valor_novo, 0.0);
    assert_eq!(logs[0].actor, "ana");
    assert_eq!(logs[0].origem, LogOrigin::CellEdit);
    assert_eq!(logs[1].valor_anterior, None);
}

#[tokio::test]
async fn test_set_cell_逗号小数与默认操作人() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let mut req = cell(2025, 3, "JUL", " 12,5 ");
    req.actor = None;
    let resp = env.forecast_api.set_cell(req).await.expect("写入失败");

    assert_eq!(resp.commit.valor_novo, 12.5);
    assert_eq!(resp.row.total, 12.5);
    let logs = env
        .forecast_api
        .list_logs_by_product(PRODUTO, None)
        .expect("查询失败");
    assert_eq!(logs[0].actor, "sistema");
}

#[tokio::test]
async fn test_set_cell_不可编辑行() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.forecast_api.set_cell(cell(2025, 1, "MAR", "5")).await;

    match result {
        Err(ApiError::NotEditable { tipo }) => assert_eq!(tipo, "ORÇAMENTO"),
        other => panic!("期望 NotEditable，实际 {:?}", other.map(|r| r.commit)),
    }
    assert_eq!(stored(&env, 2025, 1, Mes::Mar), None);
    assert_eq!(env.forecast_api.count_logs().expect("查询失败"), 0);
}

#[tokio::test]
async fn test_set_cell_分组不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.forecast_api.set_cell(cell(2030, 9, "MAR", "5")).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_set_cell_月份无效() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.forecast_api.set_cell(cell(2025, 3, "XYZ", "5")).await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

// ==========================================
// 年度总量重分配
// ==========================================

#[tokio::test]
async fn test_set_total_2025场景() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    seed_realized_values(&env).await;

    let resp = env
        .forecast_api
        .set_total(total(2025, 3, "180"))
        .await
        .expect("重分配失败");

    match &resp.outcome {
        RedistributionOutcome::Applied { plan, commits } => {
            assert_eq!(plan.realized_total, 60.0);
            assert_eq!(plan.remaining, 120.0);
            assert_eq!(commits.len(), 6);
        }
        other => panic!("期望 Applied，实际 {:?}", other),
    }
    assert_eq!(resp.notification.level, NotificationLevel::Info);

    for c in &resp.row.cells {
        let expected = if c.realizado { 10.0 } else { 20.0 };
        assert_eq!(c.valor, expected, "{}", c.mes);
    }
    assert!((resp.row.total - 180.0).abs() < 1e-9);

    let logs = env
        .forecast_api
        .list_logs_by_product(PRODUTO, None)
        .expect("查询失败");
    assert_eq!(logs.len(), 12);
    let redistribution_logs: Vec<_> = logs
        .iter()
        .filter(|l| l.origem == LogOrigin::TotalRedistribution)
        .collect();
    assert_eq!(redistribution_logs.len(), 6);
    assert!(redistribution_logs
        .iter()
        .all(|l| l.valor_anterior.is_none() && l.valor_novo == 20.0));
}

#[tokio::test]
async fn test_set_total_已实现月份超出总量() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    seed_realized_values(&env).await;

    let resp = env
        .forecast_api
        .set_total(total(2025, 3, "30"))
        .await
        .expect("重分配失败");

    // remaining = -30，开放月份各 -5
    for c in resp.row.cells.iter().filter(|c| !c.realizado) {
        assert_eq!(c.valor, -5.0);
    }
    assert_eq!(stored(&env, 2025, 3, Mes::Jan), Some(10.0));
}

#[tokio::test]
async fn test_set_total_年份无配置() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    GroupRepository::new(env.conn.clone())
        .upsert(&Group::new(2026, 3, "REVISÃO"))
        .expect("写入失败");

    let resp = env
        .forecast_api
        .set_total(total(2026, 3, "100"))
        .await
        .expect("调用失败");

    assert_eq!(resp.outcome, RedistributionOutcome::NoConfiguration { ano: 2026 });
    assert_eq!(resp.notification.level, NotificationLevel::Warning);
    assert_eq!(resp.row.total, 0.0);
    assert_eq!(env.forecast_api.count_logs().expect("查询失败"), 0);
}

#[tokio::test]
async fn test_set_total_全部已实现() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let groups = GroupRepository::new(env.conn.clone());
    groups.upsert(&Group::new(2024, 3, "REVISÃO")).expect("写入失败");
    let months = MonthConfigRepository::new(env.conn.clone());
    for mes in Mes::ALL {
        months
            .upsert(2024, mes, &MonthConfiguration::realized())
            .expect("写入失败");
    }

    let resp = env
        .forecast_api
        .set_total(total(2024, 3, "500"))
        .await
        .expect("调用失败");

    assert!(matches!(
        resp.outcome,
        RedistributionOutcome::NoOpenMonths { ano: 2024, .. }
    ));
    assert_eq!(env.forecast_api.count_logs().expect("查询失败"), 0);
}

async fn seed_zero_weight_year(env: &ApiTestEnv) {
    GroupRepository::new(env.conn.clone())
        .upsert(&Group::new(2027, 3, "REVISÃO"))
        .expect("写入失败");
    let months = MonthConfigRepository::new(env.conn.clone());
    for (i, mes) in Mes::ALL.iter().enumerate() {
        let config = if i < 8 {
            MonthConfiguration::realized()
        } else {
            MonthConfiguration::open(0.0)
        };
        months.upsert(2027, *mes, &config).expect("写入失败");
    }
}

#[tokio::test]
async fn test_set_total_零权重均分() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    seed_zero_weight_year(&env).await;

    let resp = env
        .forecast_api
        .set_total(total(2027, 3, "10"))
        .await
        .expect("重分配失败");

    let open: Vec<f64> = resp
        .row
        .cells
        .iter()
        .filter(|c| !c.realizado)
        .map(|c| c.valor)
        .collect();
    assert_eq!(open, vec![2.5, 2.5, 2.5, 2.5]);
}

#[tokio::test]
async fn test_set_total_零权重拒绝() {
    let env = ApiTestEnv::with_config(MockConfig::rejecting_zero_weight())
        .expect("无法创建测试环境");
    seed_zero_weight_year(&env).await;

    let result = env.forecast_api.set_total(total(2027, 3, "10")).await;

    assert!(matches!(result, Err(ApiError::ZeroOpenWeight { ano: 2027 })));
    assert_eq!(env.forecast_api.count_logs().expect("查询失败"), 0);
}

#[tokio::test]
async fn test_set_total_不可编辑行() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.forecast_api.set_total(total(2025, 1, "100")).await;

    assert!(matches!(result, Err(ApiError::NotEditable { .. })));
    assert_eq!(env.forecast_api.count_logs().expect("查询失败"), 0);
}

#[tokio::test]
async fn test_set_total_非数字按0() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let resp = env
        .forecast_api
        .set_total(total(2025, 3, "??"))
        .await
        .expect("重分配失败");

    assert_eq!(resp.row.total, 0.0);
    assert_eq!(env.forecast_api.count_logs().expect("查询失败"), 6);
}

// ==========================================
// 日志查询
// ==========================================

#[tokio::test]
async fn test_list_logs_by_product_限制条数() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    seed_realized_values(&env).await;

    let logs = env
        .forecast_api
        .list_logs_by_product(PRODUTO, Some(2))
        .expect("查询失败");
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].key.mes, Mes::Jun);
    assert_eq!(logs[1].key.mes, Mes::Mai);

    let recent = env.forecast_api.list_recent_logs(None).expect("查询失败");
    assert_eq!(recent.len(), 6);
}
