use config::{Config, ConfigError, Environment, File};
use screener_core::config::{AppConfig, LogConfig};
use screener_news::KeywordTables;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. 结构体默认值。
/// 2. 当前目录下可选的 `screener.toml`。
/// 3. `SCREENER__` 前缀的环境变量，`__` 分隔层级（如 `SCREENER__ENGINE__MAX_RANKED=20`）。
pub fn load_config() -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::with_name("screener").required(false))
        .add_source(Environment::with_prefix("SCREENER").prefix_separator("__").separator("__"))
        .build()?
        .try_deserialize()
}

/// # Summary
/// 加载关键词表：配置了路径则读取 JSON，否则使用内置表。
pub fn load_keyword_tables(path: Option<&str>) -> Result<KeywordTables, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(KeywordTables::from_json_str(&json)?)
        }
        None => Ok(KeywordTables::default()),
    }
}

/// # Summary
/// 初始化全局日志。
///
/// # Logic
/// 1. `RUST_LOG` 优先，否则使用配置中的级别。
/// 2. 配置了目录时按天滚动写文件，否则写 stderr（stdout 留给结果 JSON）。
///
/// # Returns
/// 文件日志的后台写入守卫，需要在 main 结束前保持存活。
pub fn init_logging(log: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    match &log.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "screener.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}
