use crate::config::{AppConfig, LoggingConfig};
use anyhow::Result;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// 配置的级别作为全局指令。不能拿服务名拼 `name=level`：服务名带连字符，
/// 模块路径用下划线，这种指令永远匹配不上任何事件。
fn build_env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_new(&logging.level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(config: &AppConfig) -> Result<()> {
    let env_filter = build_env_filter(&config.logging);

    let fmt_layer = if config.logging.json_format {
        fmt::layer().json().with_span_events(FmtSpan::CLOSE).boxed()
    } else {
        fmt::layer().with_span_events(FmtSpan::CLOSE).boxed()
    };

    // 基本订阅者
    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    // 如果配置了日志文件路径，添加文件输出
    if let Some(file_path) = &config.logging.file_path {
        let path = Path::new(file_path);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            dir,
            path.file_name().unwrap_or_default(),
        );

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer().with_ansi(false).with_writer(non_blocking);

        if config.logging.json_format {
            subscriber.with(file_layer.json()).init();
        } else {
            subscriber.with(file_layer).init();
        }

        // guard 丢了文件日志就停，进程级单次初始化，泄漏无妨
        Box::leak(Box::new(guard));
    } else {
        subscriber.init();
    }

    tracing::info!("Logging initialized with level: {}", config.logging.level);

    Ok(())
}
