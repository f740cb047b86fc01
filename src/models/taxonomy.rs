//! 分类体系（framework）数据

use crate::error::TaxonomyError;
use crate::utils::truthy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 知识点分类的 code
pub const TOPIC_CATEGORY: &str = "topic";

/// 分类体系服务推送的一条数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkResponse {
    /// 服务端错误标记，存在即视为失败
    pub err: Option<Value>,
    /// framework id → 该 framework 的数据
    pub frameworkdata: BTreeMap<String, FrameworkData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkData {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub identifier: Option<String>,
    pub code: String,
    pub name: Option<String>,
    pub terms: Option<Vec<Term>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Term {
    pub identifier: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FrameworkResponse {
    /// 取出指定 framework 中 `topic` 分类的 terms
    ///
    /// err 为真值或缺少该 framework 时返回错误（`false`、`null`、空串不算错误）；找不到 topic 分类返回 `Ok(None)`
    pub fn topic_terms(&self, framework: &str) -> Result<Option<Vec<Term>>, TaxonomyError> {
        if let Some(err) = self.err.as_ref().filter(|e| truthy(e)) {
            return Err(TaxonomyError::Flagged {
                framework: framework.to_string(),
                message: err.to_string(),
            });
        }
        let data = self
            .frameworkdata
            .get(framework)
            .ok_or_else(|| TaxonomyError::MissingFramework {
                framework: framework.to_string(),
            })?;
        Ok(data
            .categories
            .iter()
            .find(|c| c.code == TOPIC_CATEGORY)
            .and_then(|c| c.terms.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> FrameworkResponse {
        serde_json::from_value(json!({
            "frameworkdata": {
                "NCF": {
                    "categories": [
                        { "code": "board", "terms": [{ "name": "CBSE" }] },
                        { "code": "topic", "terms": [
                            { "identifier": "t1", "name": "Fractions" },
                            { "identifier": "t2", "name": "Decimals", "index": 2 }
                        ]}
                    ]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_topic_terms_found() {
        let terms = sample().topic_terms("NCF").unwrap().unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].name.as_deref(), Some("Fractions"));
        assert_eq!(terms[1].extra.get("index"), Some(&json!(2)));
    }

    #[test]
    fn test_err_flag_and_missing_framework() {
        let mut resp = sample();
        assert!(matches!(
            resp.topic_terms("OTHER"),
            Err(TaxonomyError::MissingFramework { .. })
        ));
        resp.err = Some(json!("SERVER_ERROR"));
        assert!(matches!(
            resp.topic_terms("NCF"),
            Err(TaxonomyError::Flagged { .. })
        ));
    }

    #[test]
    fn test_falsy_err_is_not_an_error() {
        for err in [json!(false), json!(null), json!(""), json!(0)] {
            let mut resp = sample();
            resp.err = Some(err.clone());
            let terms = resp.topic_terms("NCF").unwrap();
            assert_eq!(terms.map(|t| t.len()), Some(2), "err = {}", err);
        }
    }
}
