mod settings;
mod universe;

use screener_core::common::time::RealTimeProvider;
use screener_market::calendar::WeekdayCalendar;
use screener_market::tick::KrxTickRounder;
use screener_scoring::{CancelFlag, ScoreCalculator};
use std::io::Read;
use std::sync::Arc;
use tracing::{info, warn};
use universe::Universe;

/// # Summary
/// 命令行入口：`screener [universe.json]`，未给出文件时从 stdin 读取。
///
/// # Logic
/// 1. 分层加载配置并初始化日志。
/// 2. 加载关键词表与输入的股票池。
/// 3. 确定分析日期（输入优先，否则取最近交易日）。
/// 4. 在阻塞线程池中运行并行批量分析，Ctrl-C 触发协作式取消。
/// 5. 将排名结果以 JSON 输出到 stdout。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 配置与日志
    let config = settings::load_config()?;
    let _log_guard = settings::init_logging(&config.log);
    info!("Screener starting...");

    // 2. 输入
    let tables = settings::load_keyword_tables(config.engine.keywords_path.as_deref())?;
    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let universe = Universe::from_json_str(&input)?;

    // 3. 分析日期
    let calendar = WeekdayCalendar::new(config.calendar.holidays.iter().copied());
    let analysis_date = universe.resolve_date(&calendar, &RealTimeProvider);
    info!(
        "Analyzing {} stocks for {} ({} with news)",
        universe.stocks.len(),
        analysis_date,
        universe.news.len()
    );

    // 4. 批量分析
    let calculator = Arc::new(ScoreCalculator::from_config(
        &config,
        tables,
        Arc::new(KrxTickRounder::new()),
    ));
    let cancel = CancelFlag::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, skipping remaining stocks...");
            signal_cancel.cancel();
        }
    });
    let ranked = tokio::task::spawn_blocking(move || {
        calculator.analyze_universe_with_cancel(&universe.stocks, &universe.news, analysis_date, &cancel)
    })
    .await?;

    // 5. 输出
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    info!("Screener finished: {} ranked", ranked.len());
    Ok(())
}
