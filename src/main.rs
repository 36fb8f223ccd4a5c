// ==========================================
// 农产品供应链追溯系统 - 命令行入口
// ==========================================
// 用法: farm-trace [db_path] <identifier>
// - identifier: 批次号或 24 位代理主键
// - db_path 缺省时取 FARM_TRACE_DB 或用户数据目录
// 输出: 追溯报告 JSON
// ==========================================

use anyhow::{bail, Context, Result};
use farm_trace::app::{get_default_db_path, AppState};
use farm_trace::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (db_path, identifier) = match args.as_slice() {
        [identifier] => (get_default_db_path(), identifier.clone()),
        [db_path, identifier] => (db_path.clone(), identifier.clone()),
        _ => bail!("用法: farm-trace [db_path] <identifier>"),
    };

    tracing::info!("==================================================");
    tracing::info!("{} v{}", farm_trace::APP_NAME, farm_trace::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let report = state
        .trace_api
        .get_traceability_report(&identifier)
        .await
        .with_context(|| format!("查询追溯报告失败: {}", identifier))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("报告序列化失败")?
    );
    Ok(())
}
