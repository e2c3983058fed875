//! 进程级日志初始化
//!
//! 解码库通过 `log` 门面输出, 这里把它桥接到 `tracing` 订阅器: 控制台一路,
//! 可选的按天滚动文件一路. 启用文件输出时, 启动阶段同步整理历史日志
//! (压缩旧文件, 删除超出保留期的文件).

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

mod maintenance;

pub use maintenance::{MaintenanceReport, maintain};

/// 日志配置, 所有字段都有默认值
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` 语法的过滤指令, 如 `info` 或 `mpa_codec=debug`
    pub level: String,
    /// 是否输出到标准错误
    pub console: bool,
    /// 日志目录, 为空时不写文件
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    pub retention_days: i64,
    pub compress_history: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            directory: None,
            file_prefix: "mpa".to_string(),
            retention_days: 30,
            compress_history: true,
        }
    }
}

/// 持有文件写线程, 丢弃时刷出剩余日志
#[must_use = "丢弃后文件日志不再写出"]
#[derive(Debug)]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    maintenance: MaintenanceReport,
}

impl LoggingGuard {
    /// 启动时历史日志整理的结果
    pub fn maintenance(&self) -> &MaintenanceReport {
        &self.maintenance
    }
}

/// 安装全局订阅器
///
/// 每个进程只能成功调用一次, 重复调用返回错误.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = || {
        EnvFilter::try_new(&config.level)
            .with_context(|| format!("无效的日志过滤指令: {}", config.level))
    };

    let console_layer = if config.console {
        Some(
            fmt::Layer::default()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .event_format(ConsoleFormatter)
                .with_filter(filter()?),
        )
    } else {
        None
    };

    let mut maintenance = MaintenanceReport::default();
    let mut file_guard = None;
    let file_layer = match &config.directory {
        Some(directory) => {
            fs::create_dir_all(directory)
                .with_context(|| format!("创建日志目录失败, path={}", directory.display()))?;
            maintenance = maintain(config)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .build(directory)
                .with_context(|| format!("创建滚动日志失败, path={}", directory.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            file_guard = Some(guard);
            Some(
                fmt::Layer::default()
                    .with_writer(writer)
                    .with_ansi(false)
                    .event_format(FileFormatter)
                    .with_filter(filter()?),
            )
        }
        None => None,
    };

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("全局日志订阅器已被设置")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        maintenance,
    })
}

/// 指定日期的日志文件路径, 与滚动写入器的命名一致
pub fn log_file_path(directory: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    directory.join(format!("{}.{}.log", prefix, date.format("%Y-%m-%d")))
}

struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let meta = event.metadata();
        let color = match *meta.level() {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            _ => "\x1b[34m",
        };
        write!(
            writer,
            "[{:02}:{:02}:{:02}.{:03}] {}{:5}\x1b[0m {} > ",
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis(),
            color,
            meta.level().to_string(),
            meta.target()
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} {:5} {} > ",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            meta.level().to_string(),
            meta.target()
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
