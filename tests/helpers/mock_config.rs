// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use interior_pm::config::{ConfigResult, ImportConfigReader};
use interior_pm::domain::{ExpectedHeaderSet, ImportPolicy};

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub locale: String,
    pub policy: ImportPolicy,
    pub expected_headers: ExpectedHeaderSet,
    pub actor: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            policy: ImportPolicy::ValidSubset,
            expected_headers: ExpectedHeaderSet::bulk_items(),
            actor: "tester".to_string(),
        }
    }
}

impl MockConfig {
    /// 西班牙语诊断
    pub fn spanish() -> Self {
        Self {
            locale: "es".to_string(),
            ..Self::default()
        }
    }

    /// 任一行错误即整批拒绝
    pub fn all_or_nothing() -> Self {
        Self {
            policy: ImportPolicy::AllOrNothing,
            ..Self::default()
        }
    }

    /// 仅要求 item_name + cost 两列
    pub fn minimal_headers() -> Self {
        Self {
            expected_headers: ExpectedHeaderSet::new(["item_name", "cost"]),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_locale(&self) -> ConfigResult<String> {
        Ok(self.locale.clone())
    }

    async fn get_import_policy(&self) -> ConfigResult<ImportPolicy> {
        Ok(self.policy)
    }

    async fn get_expected_headers(&self, _template: &str) -> ConfigResult<ExpectedHeaderSet> {
        Ok(self.expected_headers.clone())
    }

    async fn get_actor(&self) -> ConfigResult<String> {
        Ok(self.actor.clone())
    }
}
