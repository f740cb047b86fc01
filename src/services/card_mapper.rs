//! 搜索结果 → 内容卡片

use crate::models::ContentCard;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 把原始内容列表映射为展示卡片
///
/// - `constant_data`：原样拷贝到每张卡片
/// - `dynamic_fields`：卡片字段名 → 内容里的点分路径
/// - `meta_fields`：拷贝进 `metaData` 的字段
pub fn get_data_for_card(
    content: &[Value],
    constant_data: &Map<String, Value>,
    dynamic_fields: &BTreeMap<String, String>,
    meta_fields: &[String],
) -> Vec<ContentCard> {
    content
        .iter()
        .map(|item| process_content(item, constant_data, dynamic_fields, meta_fields))
        .collect()
}

fn process_content(
    item: &Value,
    constant_data: &Map<String, Value>,
    dynamic_fields: &BTreeMap<String, String>,
    meta_fields: &[String],
) -> ContentCard {
    let text = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| item.get(*k).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let rating = match item.get("me_averageRating") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "0".to_string(),
    };

    let meta_data = meta_fields
        .iter()
        .filter_map(|field| item.get(field).map(|v| (field.clone(), v.clone())))
        .collect();

    let mut extra = constant_data.clone();
    for (card_field, path) in dynamic_fields {
        if let Some(value) = lookup_path(item, path) {
            extra.insert(card_field.clone(), value.clone());
        }
    }

    ContentCard {
        name: text(&["name", "courseName"]),
        image: text(&["appIcon", "courseLogoUrl"]),
        description: text(&["description"]),
        rating,
        content_type: text(&["contentType"]),
        meta_data,
        extra,
    }
}

/// 按点分路径取值，任何一级缺失返回 `None`
fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| match current {
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => current.get(key),
    })
}
