use thiserror::Error;

use crate::entities::{
    ConfigEntry, ConfigSynonym, RawConfigRecord, RawConfigSynonym, SourceKind, ValueType,
};

use super::config_resolver::resolve;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("config record #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("config '{name}' has unknown source code {code}")]
    UnknownSource { name: String, code: i8 },
    #[error("synonym '{synonym}' of config '{name}' has unknown source code {code}")]
    UnknownSynonymSource {
        name: String,
        synonym: String,
        code: i8,
    },
    #[error("config '{name}' has unknown type code {code}")]
    UnknownType { name: String, code: i8 },
    #[error("sensitive config '{name}' carries a value")]
    SensitiveValueExposed { name: String },
}

/// 将 DescribeConfigs 原始记录逐条投影为面向客户端的配置项，顺序与数量保持不变
pub fn project(records: &[RawConfigRecord]) -> Result<Vec<ConfigEntry>, ProjectionError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| project_record(index, record))
        .collect()
}

fn project_record(index: usize, record: &RawConfigRecord) -> Result<ConfigEntry, ProjectionError> {
    if record.name.is_empty() {
        return Err(ProjectionError::EmptyName { index });
    }

    let source =
        SourceKind::from_code(record.source).ok_or_else(|| ProjectionError::UnknownSource {
            name: record.name.clone(),
            code: record.source,
        })?;

    let value_type =
        ValueType::from_code(record.config_type).ok_or_else(|| ProjectionError::UnknownType {
            name: record.name.clone(),
            code: record.config_type,
        })?;

    if record.is_sensitive && record.value.is_some() {
        return Err(ProjectionError::SensitiveValueExposed {
            name: record.name.clone(),
        });
    }

    let synonyms = record
        .synonyms
        .iter()
        .map(|synonym| project_synonym(&record.name, synonym))
        .collect::<Result<Vec<_>, _>>()?;

    let resolution = resolve(record.value.as_deref(), record.is_default, source, &synonyms);

    Ok(ConfigEntry {
        name: record.name.clone(),
        value: record.value.clone(),
        source,
        value_type,
        is_explicitly_set: resolution.is_explicitly_set,
        is_default_value: resolution.is_default_value,
        is_read_only: record.read_only,
        is_sensitive: record.is_sensitive,
        documentation: record.documentation.clone(),
        synonyms,
    })
}

fn project_synonym(
    config_name: &str,
    synonym: &RawConfigSynonym,
) -> Result<ConfigSynonym, ProjectionError> {
    let source = SourceKind::from_code(synonym.source).ok_or_else(|| {
        ProjectionError::UnknownSynonymSource {
            name: config_name.to_string(),
            synonym: synonym.name.clone(),
            code: synonym.source,
        }
    })?;

    Ok(ConfigSynonym {
        name: synonym.name.clone(),
        value: synonym.value.clone(),
        source,
    })
}
