//! 表格投影引擎：判定"对象数组"并派生排序列集合与行矩阵

use std::collections::BTreeSet;

use serde_json::Value;

/// 表格投影结果：列头按字典序升序且唯一，每行与列头等长
///
/// 每次调用重新派生，调用方可按输入自行缓存；同一份
/// `headers`/`rows` 同时供屏幕表格与CSV等导出格式消费
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableProjection {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub is_valid: bool,
}

/// 单元格文本化：嵌套结构内嵌紧凑JSON文本，标量取其标准文本形式
///
/// 嵌套对象/数组绝不展开成额外列；null写作字面量"null"
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// 将一个JSON值投影为表格
///
/// 仅当根为数组且至少含一个对象元素、且列集合非空时有效；
/// 列集合为全部对象元素键名的并集，按与locale无关的序数序升序。
/// 行按元素原始顺序生成：缺失键与非对象元素的单元格为空串。
/// 无论行数多少都完整计算，超大结果的提示属于调用方策略
pub fn project(value: &Value) -> TableProjection {
    let Value::Array(items) = value else {
        return TableProjection::default();
    };

    let mut columns: BTreeSet<&str> = BTreeSet::new();
    let mut has_object_items = false;
    for item in items {
        if let Value::Object(map) = item {
            has_object_items = true;
            columns.extend(map.keys().map(String::as_str));
        }
    }

    if !has_object_items || columns.is_empty() {
        return TableProjection::default();
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|key| match item {
                    Value::Object(map) => map.get(*key).map(cell_text).unwrap_or_default(),
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    TableProjection {
        headers: columns.into_iter().map(String::from).collect(),
        rows,
        is_valid: true,
    }
}
