use idex_core::{MapConvertible, SettingsMap, to_settings_map};
use serde::{Deserialize, Serialize};

/// Code style section (`codeStyle`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CodeStyleConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_same_reports_for_all_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_wrap_at: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java: Option<LanguageCodeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groovy: Option<LanguageCodeStyle>,
}

impl CodeStyleConfig {
    pub fn java(&mut self) -> &mut LanguageCodeStyle {
        self.java.get_or_insert_with(LanguageCodeStyle::default)
    }

    pub fn groovy(&mut self) -> &mut LanguageCodeStyle {
        self.groovy.get_or_insert_with(LanguageCodeStyle::default)
    }
}

impl MapConvertible for CodeStyleConfig {
    fn to_map(&self) -> SettingsMap {
        to_settings_map(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LanguageCodeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_count_to_use_import_on_demand: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_multiline_named_arguments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_parameter_descriptions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_line_after_description: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_force_braces: Option<ForceBraces>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub while_force_braces: Option<ForceBraces>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForceBraces {
    DoNotForce,
    ForceBracesIfMultiline,
    ForceBracesAlways,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_language_sections_created_on_demand() {
        let mut style = CodeStyleConfig::default();
        assert!(style.to_map().is_empty());

        style.hard_wrap_at = Some(120);
        style.java().class_count_to_use_import_on_demand = Some(999);
        style.groovy().if_force_braces = Some(ForceBraces::ForceBracesAlways);

        let map = style.to_map();
        assert_eq!(map["hardWrapAt"], json!(120));
        assert_eq!(map["java"], json!({ "classCountToUseImportOnDemand": 999 }));
        assert_eq!(map["groovy"], json!({ "ifForceBraces": "FORCE_BRACES_ALWAYS" }));
    }
}
