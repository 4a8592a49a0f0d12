//! 程序入口：初始化日志、解析命令行并分发格式化/浏览/合并/导出操作

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::SubscriberBuilder;

mod model;
mod utils;

use model::data_core::{error_line, AppError, AppState};
use model::merge::MergeOutcome;
use model::shadow_tree::JsonTreeNode;
use model::table::TableProjection;
use utils::export::write_csv_file;
use utils::fs::{read_named_sources, write_text_file};

/// 表格行数提示阈值：超过只警告不拒绝，投影总是完整计算
const ROW_WARN_THRESHOLD: usize = 1000;

/// 命令行定义：子命令与原型应用的操作按钮一一对应
#[derive(Parser)]
#[command(name = "jsort", version, about = "JSON整理工具：格式化、树形浏览、表格投影与多文件合并")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 格式化JSON文件（2空格缩进）
    Format {
        file: PathBuf,
        /// 输出文件；缺省打印到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 以树形结构浏览JSON
    Tree {
        file: PathBuf,
        /// 子串过滤：保留键名或值命中的分支，剪除过滤后为空的容器
        #[arg(long)]
        filter: Option<String>,
    },
    /// 以表格形式展示对象数组
    Table { file: PathBuf },
    /// 合并多个JSON文件（数组拼接 / 对象顶层浅合并）
    Merge {
        files: Vec<PathBuf>,
        /// 输出文件；缺省打印到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 将对象数组导出为CSV文件
    ExportCsv {
        file: PathBuf,
        /// 输出CSV路径
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let cli = Cli::parse();
    match cli.command {
        Command::Format { file, output } => run_format(&file, output.as_deref()),
        Command::Tree { file, filter } => run_tree(&file, filter.as_deref()),
        Command::Table { file } => run_table(&file),
        Command::Merge { files, output } => run_merge(&files, output.as_deref()),
        Command::ExportCsv { file, output } => run_export_csv(&file, &output),
    }
}

/// 解析/读取失败的统一呈现：解析错误附带1-based行号
fn report_load_error(file: &Path, err: AppError) -> anyhow::Error {
    match err {
        AppError::Parse(ref e) => anyhow::anyhow!("{} (at line {})", err, error_line(e)),
        _ => anyhow::Error::new(err).context(format!("处理文件失败: {}", file.display())),
    }
}

fn run_format(file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let mut state = AppState::default();
    state.load_file(file).map_err(|e| report_load_error(file, e))?;

    let pretty = state.format_pretty()?;
    match output {
        Some(out) => {
            write_text_file(out, &pretty)?;
            println!("格式化完成: {}", out.display());
        }
        None => println!("{pretty}"),
    }
    Ok(())
}

fn run_tree(file: &Path, filter: Option<&str>) -> anyhow::Result<()> {
    let mut state = AppState::default();
    state.load_file(file).map_err(|e| report_load_error(file, e))?;

    let tree = state.tree_view(filter)?;
    print_tree(&tree);
    Ok(())
}

fn print_tree(nodes: &[JsonTreeNode]) {
    if nodes.is_empty() {
        println!("（无匹配节点）");
        return;
    }
    for node in nodes {
        let indent = "  ".repeat(node.depth as usize);
        println!("{indent}{} {}", node.name, node.preview);
    }
}

fn run_table(file: &Path) -> anyhow::Result<()> {
    let mut state = AppState::default();
    state.load_file(file).map_err(|e| report_load_error(file, e))?;

    let projection = state.table_projection();
    if !projection.is_valid {
        anyhow::bail!("表格视图要求根为对象数组，请改用 tree 子命令浏览");
    }
    if projection.rows.len() > ROW_WARN_THRESHOLD {
        tracing::warn!(
            "行数 {} 超过 {}，输出可能较慢",
            projection.rows.len(),
            ROW_WARN_THRESHOLD
        );
        eprintln!(
            "警告: 共 {} 行，超过 {} 行，输出可能较慢",
            projection.rows.len(),
            ROW_WARN_THRESHOLD
        );
    }
    print_table(&projection);
    Ok(())
}

fn print_table(projection: &TableProjection) {
    // 按列内容宽度对齐
    let mut widths: Vec<usize> = projection.headers.iter().map(|h| h.chars().count()).collect();
    for row in &projection.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<1$}", cell, widths[i]))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    println!("{}", render(&projection.headers));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &projection.rows {
        println!("{}", render(row));
    }
}

fn run_merge(files: &[PathBuf], output: Option<&Path>) -> anyhow::Result<()> {
    // IO层失败整批终止；单个源的解析问题由合并引擎记录为冲突
    let sources = read_named_sources(files)?;

    let mut state = AppState::default();
    match state.merge_sources(&sources)? {
        MergeOutcome::Merged(_) => {
            match output {
                Some(out) => {
                    state.save_to_file(out)?;
                    println!("合并完成: {}", out.display());
                }
                None => println!("{}", state.format_pretty()?),
            }
            Ok(())
        }
        MergeOutcome::Conflicts(conflicts) => {
            eprintln!("Merge Errors:");
            for conflict in &conflicts {
                if let Some(name) = &conflict.source_name {
                    tracing::warn!("文件 {} 被跳过", name);
                }
                eprintln!("❌ {}", conflict.message);
            }
            anyhow::bail!("合并失败，共 {} 条冲突", conflicts.len())
        }
    }
}

fn run_export_csv(file: &Path, output: &Path) -> anyhow::Result<()> {
    let mut state = AppState::default();
    state.load_file(file).map_err(|e| report_load_error(file, e))?;

    let projection = state.table_projection();
    if !projection.is_valid {
        anyhow::bail!("CSV导出要求根为对象数组");
    }
    write_csv_file(output, &projection)?;
    println!("CSV导出完成: {}", output.display());
    Ok(())
}
