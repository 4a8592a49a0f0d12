//! 导出胶水：将表格投影交给CSV写出器并落盘

use std::path::Path;

use thiserror::Error;

use crate::model::table::TableProjection;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV写出失败: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("编码失败: {0}")]
    Encoding(String),
}

/// 将表格投影序列化为CSV文本：首行为列头，其后逐行输出
///
/// 字段转义（逗号/引号/换行加双引号包裹，内部引号加倍）由csv写出器保证
pub fn projection_to_csv(projection: &TableProjection) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&projection.headers)?;
    for row in &projection.rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

/// 写出CSV文件
pub fn write_csv_file(p: &Path, projection: &TableProjection) -> Result<(), ExportError> {
    let csv_text = projection_to_csv(projection)?;
    std::fs::write(p, csv_text)?;
    tracing::info!("CSV已写入: {}", p.display());
    Ok(())
}
