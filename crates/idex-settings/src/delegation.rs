use idex_core::{MapConvertible, SettingsMap, to_settings_map};
use serde::{Deserialize, Serialize};

/// Which runner executes tests launched from the IDE.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestRunner {
    #[default]
    Platform,
    Gradle,
    ChoosePerTest,
}

/// Build/run action delegation (`actionDelegationConfig`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ActionDelegationConfig {
    pub delegate_build_run_to_gradle: bool,
    pub test_runner: TestRunner,
}

impl MapConvertible for ActionDelegationConfig {
    fn to_map(&self) -> SettingsMap {
        to_settings_map(self)
    }
}
