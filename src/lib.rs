//! JSON整理工具库
//!
//! 提供JSON解析格式化、影子树构建、多文件合并与表格投影功能
//! 合并与投影引擎为无状态纯函数，结果以显式变体类型返回而非抛错

pub mod model;
pub mod utils;

// 重新导出主要类型
pub use model::data_core::{error_line, AppError, AppState};
pub use model::merge::{merge, MergeConflict, MergeOutcome, NamedSource};
pub use model::shadow_tree::{build_shadow_tree, filter_value, JsonTreeNode, NodeKind};
pub use model::table::{cell_text, project, TableProjection};
