//! 合并引擎：将多份JSON文档按根类型合并为一份，或逐文件收集冲突

use serde_json::Value;

/// 命名输入源：原始文本加来源标签（通常为文件名），仅用于错误归因
#[derive(Debug, Clone)]
pub struct NamedSource {
    pub name: String,
    pub content: String,
}

impl NamedSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// 单条合并冲突记录；空输入冲突不携带来源名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub source_name: Option<String>,
    pub message: String,
}

/// 合并结果：要么得到一份合并完成的文档，要么得到按输入顺序排列的全部冲突
///
/// 只要出现任何冲突，整次合并即告失败，之前已并入累加器的内容一并丢弃
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    Merged(Value),
    Conflicts(Vec<MergeConflict>),
}

/// 根类型：决定合并策略（数组按序拼接 / 对象顶层浅合并）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    Array,
    Object,
}

fn root_kind_of(v: &Value) -> Option<RootKind> {
    match v {
        Value::Array(_) => Some(RootKind::Array),
        Value::Object(_) => Some(RootKind::Object),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 按输入顺序合并多个命名源
///
/// 顺序敏感：首个成功解析的数组/对象源确定根类型并作为累加器初值。
/// 之后同为数组则拼接（累加器元素在前），同为对象则顶层键浅覆盖
/// （后来者优先，嵌套对象整体替换、不递归）。
/// 单个源解析失败、根类型不一致或根为标量时只跳过该源并记录冲突，
/// 其余源继续处理；纯函数，对畸形输入不panic也不抛错。
pub fn merge(sources: &[NamedSource]) -> MergeOutcome {
    if sources.is_empty() {
        return MergeOutcome::Conflicts(vec![MergeConflict {
            source_name: None,
            message: "No files provided for merging.".to_string(),
        }]);
    }

    let mut conflicts: Vec<MergeConflict> = Vec::new();
    let mut accumulator: Option<(RootKind, Value)> = None;

    for source in sources {
        let parsed: Value = match serde_json::from_str(&source.content) {
            Ok(v) => v,
            Err(e) => {
                conflicts.push(MergeConflict {
                    source_name: Some(source.name.clone()),
                    message: format!(
                        "Error parsing JSON from file '{}': {}",
                        source.name, e
                    ),
                });
                continue;
            }
        };

        // 标量/null根不参与合并，记为独立冲突而非静默当作空对象
        let Some(kind) = root_kind_of(&parsed) else {
            conflicts.push(MergeConflict {
                source_name: Some(source.name.clone()),
                message: format!(
                    "Merge conflict: File {} has a non-mergeable root type ({}). This file was skipped.",
                    source.name,
                    kind_name(&parsed)
                ),
            });
            continue;
        };

        if let Some((root_kind, acc)) = accumulator.as_mut() {
            if kind != *root_kind {
                conflicts.push(MergeConflict {
                    source_name: Some(source.name.clone()),
                    message: format!(
                        "Merge conflict: File {} has a different root type ({}) than previous files. This file was skipped.",
                        source.name,
                        kind_name(&parsed)
                    ),
                });
                continue;
            }
            match (acc, parsed) {
                (Value::Array(dst), Value::Array(src)) => dst.extend(src),
                (Value::Object(dst), Value::Object(src)) => {
                    // 顶层键浅覆盖：同名键以后来者为准
                    for (k, v) in src {
                        dst.insert(k, v);
                    }
                }
                // 根类型一致性已在上方判定
                _ => {}
            }
        } else {
            accumulator = Some((kind, parsed));
        }
    }

    if conflicts.is_empty() {
        if let Some((_, merged)) = accumulator {
            return MergeOutcome::Merged(merged);
        }
    }
    MergeOutcome::Conflicts(conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn src(name: &str, content: &str) -> NamedSource {
        NamedSource::new(name, content)
    }

    #[test]
    fn test_merge_single_object_identity() {
        let outcome = merge(&[src("a.json", r#"{"a": 1, "b": [2]}"#)]);
        assert_eq!(
            outcome,
            MergeOutcome::Merged(json!({"a": 1, "b": [2]})),
            "单对象源应原样返回"
        );
    }

    #[test]
    fn test_merge_single_array_identity() {
        let outcome = merge(&[src("a.json", r#"[1, {"x": 2}]"#)]);
        assert_eq!(
            outcome,
            MergeOutcome::Merged(json!([1, {"x": 2}])),
            "单数组源应原样返回"
        );
    }

    #[test]
    fn test_merge_objects_shallow_later_wins() {
        let outcome = merge(&[
            src("a.json", r#"{"a": 1}"#),
            src("b.json", r#"{"a": 2, "b": 3}"#),
        ]);
        assert_eq!(
            outcome,
            MergeOutcome::Merged(json!({"a": 2, "b": 3})),
            "同名顶层键应以后出现的源为准"
        );
    }

    #[test]
    fn test_merge_objects_nested_replaced_wholesale() {
        let outcome = merge(&[
            src("a.json", r#"{"cfg": {"x": 1, "y": 2}, "keep": true}"#),
            src("b.json", r#"{"cfg": {"z": 3}}"#),
        ]);
        // 浅合并：嵌套对象整体替换，不做深合并
        assert_eq!(
            outcome,
            MergeOutcome::Merged(json!({"cfg": {"z": 3}, "keep": true})),
            "嵌套对象应被整体替换而非递归合并"
        );
    }

    #[test]
    fn test_merge_arrays_concat_preserves_order() {
        let outcome = merge(&[src("a.json", "[1, 2]"), src("b.json", "[3]")]);
        assert_eq!(
            outcome,
            MergeOutcome::Merged(json!([1, 2, 3])),
            "数组合并应按输入顺序拼接"
        );
    }

    #[test]
    fn test_merge_root_kind_mismatch_is_failure() {
        let outcome = merge(&[src("a.json", "[1, 2]"), src("b.json", r#"{"a": 1}"#)]);
        let MergeOutcome::Conflicts(conflicts) = outcome else {
            panic!("根类型不一致时整次合并应失败");
        };
        assert_eq!(conflicts.len(), 1, "应恰好记录一条冲突");
        assert_eq!(
            conflicts[0].source_name.as_deref(),
            Some("b.json"),
            "冲突应归因到类型不一致的那个源"
        );
        assert_eq!(
            conflicts[0].message,
            "Merge conflict: File b.json has a different root type (object) than previous files. This file was skipped."
        );
    }

    #[test]
    fn test_merge_zero_sources() {
        let MergeOutcome::Conflicts(conflicts) = merge(&[]) else {
            panic!("空输入应返回冲突");
        };
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].source_name.is_none(), "空输入冲突不应携带来源名");
        assert_eq!(conflicts[0].message, "No files provided for merging.");
    }

    #[test]
    fn test_merge_parse_error_does_not_short_circuit() {
        let outcome = merge(&[
            src("bad.json", r#"{"a":}"#),
            src("b.json", r#"{"b": 1}"#),
            src("c.json", r#"{"c": 2}"#),
        ]);
        let MergeOutcome::Conflicts(conflicts) = outcome else {
            panic!("存在解析冲突时整次合并应失败");
        };
        // 后续源仍被处理，但只要有冲突就不返回部分合并结果
        assert_eq!(conflicts.len(), 1, "只有无法解析的源产生冲突");
        assert_eq!(conflicts[0].source_name.as_deref(), Some("bad.json"));
        assert!(
            conflicts[0]
                .message
                .starts_with("Error parsing JSON from file 'bad.json':"),
            "解析冲突应包含来源名与解析错误文本"
        );
    }

    #[test]
    fn test_merge_multiple_conflicts_in_input_order() {
        let outcome = merge(&[
            src("a.json", "[1]"),
            src("bad.json", "not json"),
            src("c.json", r#"{"x": 1}"#),
        ]);
        let MergeOutcome::Conflicts(conflicts) = outcome else {
            panic!("应失败");
        };
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].source_name.as_deref(), Some("bad.json"));
        assert_eq!(conflicts[1].source_name.as_deref(), Some("c.json"));
    }

    #[test]
    fn test_merge_scalar_root_is_distinct_conflict() {
        let outcome = merge(&[src("n.json", "42"), src("b.json", r#"{"a": 1}"#)]);
        let MergeOutcome::Conflicts(conflicts) = outcome else {
            panic!("标量根应产生冲突");
        };
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts[0].message,
            "Merge conflict: File n.json has a non-mergeable root type (number). This file was skipped."
        );
    }

    #[test]
    fn test_merge_scalar_root_does_not_fix_root_kind() {
        // 标量源被跳过后，首个数组/对象源才确定根类型
        let outcome = merge(&[src("n.json", "null"), src("a.json", "[1]"), src("b.json", "[2]")]);
        let MergeOutcome::Conflicts(conflicts) = outcome else {
            panic!("存在标量冲突时整次合并应失败");
        };
        assert_eq!(conflicts.len(), 1, "两个数组源之间不应再产生冲突");
        assert!(conflicts[0].message.contains("non-mergeable root type (null)"));
    }

    #[test]
    fn test_merge_three_objects_in_order() {
        let outcome = merge(&[
            src("a.json", r#"{"a": 1}"#),
            src("b.json", r#"{"b": 2}"#),
            src("c.json", r#"{"a": 9, "c": 3}"#),
        ]);
        assert_eq!(
            outcome,
            MergeOutcome::Merged(json!({"a": 9, "b": 2, "c": 3})),
            "多个对象源应按顺序逐个浅合并"
        );
    }
}
