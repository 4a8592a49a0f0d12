//! 影子树（Shadow Tree）：仅存结构与路径，不复制大值，助于大文件性能导航

use serde_json::Value;

use crate::model::table::cell_text;

/// JSON 节点类型（与展示层解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

#[derive(Debug, Clone)]
pub struct JsonTreeNode {
    /// 节点在父级中的键名或索引的字符串形式
    pub name: String,
    /// 点号/方括号路径（用于展示与定位）
    pub path: String,
    /// 节点类型
    pub kind: NodeKind,
    /// 子元素数量（对象字段数 / 数组长度），便于懒加载展示
    pub children: u32,
    /// 轻量预览（字符串截断、数字/布尔/空的简短描述）
    pub preview: String,
    /// 节点深度（用于缩进显示）
    pub depth: u32,
}

/// 从根 Value 构建全树影子索引（可后续做懒加载/分页）
pub fn build_shadow_tree(root: &Value) -> Vec<JsonTreeNode> {
    let mut out = Vec::with_capacity(1024);
    fn kind_of(v: &Value) -> NodeKind {
        match v {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            Value::String(_) => NodeKind::String,
            Value::Number(_) => NodeKind::Number,
            Value::Bool(_) => NodeKind::Bool,
            Value::Null => NodeKind::Null,
        }
    }
    fn preview_of(v: &Value) -> String {
        match v {
            Value::String(s) => {
                let s = s.trim();
                if s.chars().count() > 32 {
                    let truncated: String = s.chars().take(32).collect();
                    format!("\"{}...\"", truncated)
                } else {
                    format!("\"{}\"", s)
                }
            }
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Object(m) => format!("{{..}} ({} keys)", m.len()),
            Value::Array(a) => format!("[..] ({} items)", a.len()),
        }
    }
    fn push_node(out: &mut Vec<JsonTreeNode>, name: String, path: String, v: &Value, depth: u32) {
        let children = match v {
            Value::Object(m) => m.len() as u32,
            Value::Array(a) => a.len() as u32,
            _ => 0,
        };
        out.push(JsonTreeNode {
            name,
            path,
            kind: kind_of(v),
            children,
            preview: preview_of(v),
            depth,
        });
    }
    fn walk(out: &mut Vec<JsonTreeNode>, v: &Value, path: &str, name: &str, depth: u32) {
        push_node(out, name.to_string(), path.to_string(), v, depth);
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    // 字段名含特殊字符时使用 bracket-notation
                    let field_path = if k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        format!("{}.{}", path, k)
                    } else {
                        format!("{}['{}']", path, k.replace('\'', "\\'"))
                    };
                    walk(out, child, &field_path, k, depth + 1);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, idx);
                    walk(out, child, &item_path, &format!("[{}]", idx), depth + 1);
                }
            }
            _ => {}
        }
    }

    walk(&mut out, root, "$", "$", 0);
    out
}

/// 递归子串过滤：键名或标量值文本命中即保留，过滤后为空的容器被剪除
///
/// 键名命中时整个子树随之保留；容器本身不参与文本匹配，仅由其
/// 后代的去留决定。全树无命中时返回 None
pub fn filter_value(value: &Value, filter: &str) -> Option<Value> {
    match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                if k.contains(filter) {
                    out.insert(k.clone(), v.clone());
                } else if let Some(kept) = filter_value(v, filter) {
                    out.insert(k.clone(), kept);
                }
            }
            if out.is_empty() {
                None
            } else {
                Some(Value::Object(out))
            }
        }
        Value::Array(items) => {
            let kept: Vec<Value> = items
                .iter()
                .filter_map(|item| filter_value(item, filter))
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(Value::Array(kept))
            }
        }
        scalar => {
            if cell_text(scalar).contains(filter) {
                Some(scalar.clone())
            } else {
                None
            }
        }
    }
}
