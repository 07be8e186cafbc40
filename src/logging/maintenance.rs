//! 历史日志维护: 过期删除与 gzip 压缩.

use super::LoggingConfig;
use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// 维护结果统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub removed: usize,
    pub compressed: usize,
}

/// 以 `today` 为基准整理日志目录
///
/// - 早于保留期限的日志 (含 `.gz`) 被删除
/// - 启用压缩时, 今天之前的未压缩日志被压缩为 `.log.gz`
///
/// 单个文件处理失败不会中断整体流程.
pub(super) fn maintain_logs(config: &LoggingConfig, today: NaiveDate) -> Result<MaintenanceReport> {
    let directory = Path::new(&config.directory);
    let mut report = MaintenanceReport::default();
    if !directory.exists() {
        return Ok(report);
    }

    let cutoff = today - ChronoDuration::days(config.retention_days);

    for entry in fs::read_dir(directory)
        .with_context(|| format!("读取日志目录失败, path={}", directory.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some((date, compressed)) = parse_dated_log_name(&file_name, &config.file_prefix) else {
            continue;
        };
        let file_path = entry.path();

        if date < cutoff {
            if fs::remove_file(&file_path).is_ok() {
                report.removed += 1;
            }
            continue;
        }

        if config.compress_history && !compressed && date < today && compress_to_gz(&file_path).is_ok()
        {
            report.compressed += 1;
        }
    }

    Ok(report)
}

fn compress_to_gz(path: &Path) -> Result<()> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    if gz_path.exists() {
        return Ok(());
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
    Ok(())
}

/// 解析 `{prefix}.{YYYY-MM-DD}.log[.gz]`, 返回 (日期, 是否已压缩)
fn parse_dated_log_name(file_name: &str, prefix: &str) -> Option<(NaiveDate, bool)> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('.')?;

    if let Some(date_part) = rest.strip_suffix(".log") {
        return Some((parse_date(date_part)?, false));
    }
    if let Some(date_part) = rest.strip_suffix(".log.gz") {
        return Some((parse_date(date_part)?, true));
    }
    None
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
