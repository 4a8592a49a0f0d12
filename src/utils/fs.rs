//! IO helper: safe file read/write for JSON

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::model::data_core::AppError;
use crate::model::merge::NamedSource;

/// 读取文件全文（UTF-8）
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    Ok(fs::read_to_string(p)?)
}

/// 将JSON数据保存到文件（格式化输出）
pub fn write_json_file(p: &Path, value: &Value) -> Result<(), AppError> {
    let f = File::create(p)?;
    serde_json::to_writer_pretty(f, value)?;
    Ok(())
}

/// 将文本原样写入文件
pub fn write_text_file(p: &Path, text: &str) -> Result<(), AppError> {
    Ok(fs::write(p, text)?)
}

/// 按调用方给定顺序批量读取命名源
///
/// 任一文件读取失败则整批失败；IO失败不同于解析失败，
/// 后者由合并引擎逐源记录为冲突
pub fn read_named_sources(paths: &[PathBuf]) -> Result<Vec<NamedSource>, AppError> {
    let mut sources = Vec::with_capacity(paths.len());
    for p in paths {
        let content = fs::read_to_string(p)?;
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string());
        sources.push(NamedSource::new(name, content));
    }
    Ok(sources)
}
