//! 性能测量模块
//!
//! 用于测量大文档的解析耗时与可见行投影耗时，
//! 验证投影成本只随可见行数增长，而不随整棵树的大小增长

use std::time::Instant;

use serde_json::{json, Value};

use crate::model::codec::parse_text;
use crate::model::data_core::TreeState;

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 生成测量用文档：偶数层为对象、奇数层为数组，每层 `width` 个分支，
/// 第 `depth` 层为标量叶子（字符串/数字/布尔/空轮换）
pub fn generate_large_json(depth: usize, width: usize) -> Value {
    fn leaf(level: usize, i: usize) -> Value {
        match i % 4 {
            0 => Value::String(format!("v{}.{}", level, i)),
            1 => json!(i as f64 / 4.0),
            2 => Value::Bool(level % 2 == 0),
            _ => Value::Null,
        }
    }

    fn branch(level: usize, depth: usize, width: usize, i: usize) -> Value {
        if level >= depth {
            return leaf(level, i);
        }
        let kids = (0..width).map(|k| branch(level + 1, depth, width, k));
        if level % 2 == 0 {
            Value::Object(
                kids.enumerate()
                    .map(|(k, v)| (format!("n{}_{}", level, k), v))
                    .collect(),
            )
        } else {
            Value::Array(kids.collect())
        }
    }

    branch(0, depth, width, 0)
}

/// 测试JSON解析性能
pub fn benchmark_json_parsing(json_str: &str) -> PerformanceResult {
    let start = Instant::now();
    let parse_result = parse_text(json_str);
    let duration = start.elapsed();

    match parse_result {
        Ok(_) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            true,
            &format!("解析了 {} 字节的JSON", json_str.len()),
        ),
        Err(e) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            false,
            &format!("解析失败: {}", e),
        ),
    }
}

/// 测试可见行投影性能，返回结果与投影出的行数
pub fn benchmark_projection(state: &TreeState) -> (PerformanceResult, usize) {
    let start = Instant::now();
    let rows = state.project();
    let duration = start.elapsed();

    let result = PerformanceResult::new(
        "可见行投影",
        duration.as_millis(),
        !rows.is_empty(),
        &format!("投影了 {} 行（展开节点 {} 个）", rows.len(), state.expanded_paths().len()),
    );
    (result, rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::codec::serialize;

    #[test]
    fn test_generate_large_json_shape() {
        let v = generate_large_json(3, 4);
        let root = v.as_object().expect("根节点应为对象");
        assert_eq!(root.len(), 4);
        assert_eq!(v["n0_2"].as_array().map(|a| a.len()), Some(4));
        assert!(v["n0_2"][1]["n2_3"].is_null());
        assert_eq!(v["n0_2"][1]["n2_0"], json!("v3.0"));
        assert_eq!(generate_large_json(0, 4), json!("v0.0"));
    }

    #[test]
    fn test_benchmark_parsing() {
        let text = serialize(&generate_large_json(4, 6)).unwrap();
        let ok = benchmark_json_parsing(&text);
        assert!(ok.success, "{}", ok.details);

        let bad = benchmark_json_parsing("{\"truncated\": [1, 2");
        assert!(!bad.success);
        assert!(bad.details.starts_with("解析失败"));
    }

    #[test]
    fn test_projection_bounded_by_visible_rows() {
        let mut state = TreeState::new();
        state.load_document(generate_large_json(4, 8));

        let (collapsed, collapsed_rows) = benchmark_projection(&state);
        assert!(collapsed.success);
        assert_eq!(collapsed_rows, 9, "折叠时只有根与八个顶层分支");

        state.expand_all();
        let (_, expanded_rows) = benchmark_projection(&state);
        assert_eq!(expanded_rows, 1 + 8 + 64 + 512 + 4096);
    }
}
