//! AppState：应用核心状态与JSON解析/格式化

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::model::merge::{merge, MergeOutcome, NamedSource};
use crate::model::shadow_tree::{build_shadow_tree, filter_value, JsonTreeNode};
use crate::model::table::{project, TableProjection};
use crate::utils::fs::{read_text_file, write_json_file};

/// 应用状态：当前输入文本、来源路径、解析后的DOM与扁平树索引
///
/// 状态显式持有并传入各纯函数；合并与投影引擎本身不读写任何状态
#[derive(Debug, Default)]
pub struct AppState {
    pub source_path: Option<PathBuf>,
    pub input: String,
    pub dom: Option<Value>,
    pub tree_flat: Vec<JsonTreeNode>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("状态错误: {0}")]
    State(String),
}

/// 解析错误的1-based行号（serde_json按行列定位；IO类错误兜底为第1行）
pub fn error_line(err: &serde_json::Error) -> usize {
    err.line().max(1)
}

impl AppState {
    /// 加载JSON文件：保留原始文本、解析DOM并构建影子树
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let text = read_text_file(p)?;
        let dom: Value = serde_json::from_str(&text)?;
        self.tree_flat = build_shadow_tree(&dom);
        self.input = text;
        self.source_path = Some(p.to_path_buf());
        self.dom = Some(dom);
        Ok(())
    }

    /// 解析任意输入文本（不落盘场景，如编辑器粘贴）
    pub fn parse_input(&mut self, text: &str) -> Result<(), AppError> {
        let dom: Value = serde_json::from_str(text)?;
        self.tree_flat = build_shadow_tree(&dom);
        self.input = text.to_string();
        self.source_path = None;
        self.dom = Some(dom);
        Ok(())
    }

    /// 将当前DOM输出为2空格缩进的格式化文本
    pub fn format_pretty(&self) -> Result<String, AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::State("DOM尚未加载".into()))?;
        Ok(serde_json::to_string_pretty(dom)?)
    }

    /// 当前DOM的表格投影；DOM未加载时返回无效投影
    pub fn table_projection(&self) -> TableProjection {
        self.dom.as_ref().map(project).unwrap_or_default()
    }

    /// 构建（可按子串过滤的）树形索引快照
    ///
    /// 过滤时先对值做递归剪枝再扁平化；全部被剪除时返回空列表
    pub fn tree_view(&self, filter: Option<&str>) -> Result<Vec<JsonTreeNode>, AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::State("DOM尚未加载".into()))?;
        Ok(match filter {
            Some(f) if !f.trim().is_empty() => match filter_value(dom, f) {
                Some(pruned) => build_shadow_tree(&pruned),
                None => Vec::new(),
            },
            _ => self.tree_flat.clone(),
        })
    }

    /// 合并多个命名源，成功时接管合并结果（回填输入区与树索引）
    ///
    /// 冲突结果不改动任何状态；引擎本身见 model::merge
    pub fn merge_sources(&mut self, sources: &[NamedSource]) -> Result<MergeOutcome, AppError> {
        let outcome = merge(sources);
        if let MergeOutcome::Merged(value) = &outcome {
            self.input = serde_json::to_string_pretty(value)?;
            self.tree_flat = build_shadow_tree(value);
            self.source_path = None;
            self.dom = Some(value.clone());
            tracing::info!("合并完成，共 {} 个输入源", sources.len());
        }
        Ok(outcome)
    }

    /// 将当前DOM保存到指定路径（格式化输出）
    pub fn save_to_file(&self, path: &Path) -> Result<(), AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::State("DOM尚未加载".into()))?;
        write_json_file(path, dom)?;
        tracing::info!("JSON文件已保存到: {}", path.display());
        Ok(())
    }
}
