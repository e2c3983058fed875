//! 历史日志整理: 压缩非当天的日志, 删除超出保留期的日志
//!
//! 滚动写入器按 UTC 日期命名文件, 因此这里的 "当天" 也取 UTC 日期.

use super::LoggingConfig;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 一次整理的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub compressed: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

/// 整理日志目录; 未配置目录或目录不存在时什么也不做
pub fn maintain(config: &LoggingConfig) -> Result<MaintenanceReport> {
    match &config.directory {
        Some(directory) => maintain_at(directory, config, Utc::now().date_naive()),
        None => Ok(MaintenanceReport::default()),
    }
}

pub(super) fn maintain_at(
    directory: &Path,
    config: &LoggingConfig,
    today: NaiveDate,
) -> Result<MaintenanceReport> {
    let mut report = MaintenanceReport::default();
    if !directory.exists() {
        return Ok(report);
    }

    let cutoff = today - Duration::days(config.retention_days);
    let entries = fs::read_dir(directory)
        .with_context(|| format!("读取日志目录失败, path={}", directory.display()))?;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some((date, compressed)) = parse_log_name(&file_name, &config.file_prefix) else {
            continue;
        };
        let path = entry.path();

        if date < cutoff {
            match fs::remove_file(&path) {
                Ok(()) => report.removed.push(path),
                Err(err) => warn!("删除过期日志失败, path={}: {}", path.display(), err),
            }
            continue;
        }

        if config.compress_history && !compressed && date < today {
            match compress_to_gz(&path) {
                Ok(gz_path) => report.compressed.push(gz_path),
                Err(err) => warn!("压缩日志失败, path={}: {:#}", path.display(), err),
            }
        }
    }

    report.compressed.sort();
    report.removed.sort();
    Ok(report)
}

fn compress_to_gz(path: &Path) -> Result<PathBuf> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    if gz_path.exists() {
        anyhow::bail!("压缩目标已存在, path={}", gz_path.display());
    }

    let mut input =
        File::open(path).with_context(|| format!("打开待压缩日志失败, path={}", path.display()))?;
    let output = File::create(&gz_path)
        .with_context(|| format!("创建压缩日志失败, path={}", gz_path.display()))?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
        .with_context(|| format!("删除已压缩日志失败, path={}", path.display()))?;
    Ok(gz_path)
}

/// 解析 `<prefix>.<YYYY-MM-DD>.log[.gz]`, 返回日期与是否已压缩
fn parse_log_name(file_name: &str, prefix: &str) -> Option<(NaiveDate, bool)> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('.')?;
    let (date_part, compressed) = match rest.strip_suffix(".log.gz") {
        Some(date_part) => (date_part, true),
        None => (rest.strip_suffix(".log")?, false),
    };
    if date_part.len() != 10 {
        return None;
    }
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    Some((date, compressed))
}
