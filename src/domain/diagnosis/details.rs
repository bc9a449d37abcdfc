//! Diagnosis Context - 疾病详情
//!
//! 远端详情服务不保证任何 schema：所有字段可选，未知字段忽略，
//! 响应体可能是 JSON 字符串再包一层 JSON（双重编码）。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DetailsDecodeError;

/// 允许的最大字符串编码层数
const MAX_ENCODING_LAYERS: usize = 2;

/// 疾病详情
///
/// 可选字段记录；远端返回的未知字段不会保留
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseaseDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symptoms: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub home_remedy: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub treatment: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_to_see_doctor: Option<String>,
}

/// 报告中的一个列表段落
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection<'a> {
    pub title: &'static str,
    pub items: &'a [String],
}

impl DiseaseDetails {
    /// 从任意 JSON 对象宽松提取
    ///
    /// - 列表字段接受单个字符串（视为一项）和 `{title, description}` 对象
    /// - 类型不符的字段视为缺失
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            overview: lookup(map, &["overview", "description"]).and_then(text),
            symptoms: lookup(map, &["symptoms"]).map(items).unwrap_or_default(),
            causes: lookup(map, &["causes"]).map(items).unwrap_or_default(),
            home_remedy: lookup(map, &["home_remedy", "homeRemedy", "home_remedies", "remedies"])
                .map(items)
                .unwrap_or_default(),
            treatment: lookup(map, &["treatment", "treatments"])
                .map(items)
                .unwrap_or_default(),
            when_to_see_doctor: lookup(map, &["when_to_see_doctor", "whenToSeeDoctor"])
                .and_then(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overview.is_none()
            && self.symptoms.is_empty()
            && self.causes.is_empty()
            && self.home_remedy.is_empty()
            && self.treatment.is_empty()
            && self.when_to_see_doctor.is_none()
    }

    /// 非空列表段落，按报告顺序
    pub fn sections(&self) -> Vec<ReportSection<'_>> {
        [
            ("Symptoms", &self.symptoms),
            ("Causes", &self.causes),
            ("Home Remedies", &self.home_remedy),
            ("Treatment", &self.treatment),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(title, items)| ReportSection {
            title,
            items: items.as_slice(),
        })
        .collect()
    }
}

/// 防御性解码详情响应
///
/// 接受 JSON 对象，或包含对象 JSON 的字符串（最多两层编码）
pub fn decode_details(raw: Value) -> Result<DiseaseDetails, DetailsDecodeError> {
    let mut value = raw;
    let mut layers = 0;

    loop {
        match value {
            Value::Object(map) => return Ok(DiseaseDetails::from_map(&map)),
            Value::String(encoded) => {
                if layers == MAX_ENCODING_LAYERS {
                    return Err(DetailsDecodeError::TooDeeplyEncoded(MAX_ENCODING_LAYERS));
                }
                value = serde_json::from_str(&encoded)
                    .map_err(|e| DetailsDecodeError::Malformed(e.to_string()))?;
                layers += 1;
            }
            other => return Err(DetailsDecodeError::NotAMapping(kind_of(&other))),
        }
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn items(value: &Value) -> Vec<String> {
    match value {
        Value::Array(values) => values.iter().filter_map(item).collect(),
        other => item(other).into_iter().collect(),
    }
}

fn item(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => text(value),
        Value::Object(map) => {
            let title = map.get("title").and_then(text);
            let description = map.get("description").and_then(text);
            match (title, description) {
                (Some(title), Some(description)) => Some(format!("{}: {}", title, description)),
                (Some(only), None) | (None, Some(only)) => Some(only),
                (None, None) => None,
            }
        }
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
