use crate::entities::{ConfigSynonym, SourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigResolution {
    pub is_explicitly_set: bool,
    pub is_default_value: bool,
}

/// 根据配置项自身的值、默认标志、来源以及同义配置列表，判断其是否显式设置、是否等于默认值。
///
/// - `is_default_value`：取 `DefaultConfig` 来源的同义配置与 `entry_value` 比较，
///   多个 `DefaultConfig` 同义配置时以最后一个为准；没有则为 false。两者都缺失视为相等。
/// - `is_explicitly_set`：远端报告非默认值，或来源为静态/动态 broker 配置。
///   值恰好等于默认值时远端也会报告为默认，这里以来源为准。
pub fn resolve(
    entry_value: Option<&str>,
    entry_is_default: bool,
    entry_source: SourceKind,
    synonyms: &[ConfigSynonym],
) -> ConfigResolution {
    let is_default_value = synonyms
        .iter()
        .rev()
        .find(|synonym| synonym.source == SourceKind::DefaultConfig)
        .is_some_and(|synonym| synonym.value.as_deref() == entry_value);

    let is_explicitly_set = !entry_is_default
        || matches!(
            entry_source,
            SourceKind::StaticBrokerConfig | SourceKind::DynamicBrokerConfig
        );

    ConfigResolution {
        is_explicitly_set,
        is_default_value,
    }
}
