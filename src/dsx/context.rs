use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DeployConfig;

/// Placeholder name -> value mapping used to render a job definition template
///
/// Built once from [`DeployConfig`] and never modified afterwards. Credentials and the
/// connection domain aren't template values, they only appear on tool command lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeploymentContext {
    values: BTreeMap<&'static str, String>,
}

impl DeploymentContext {
    pub fn new(config: &DeployConfig) -> DeploymentContext {
        [
            ("DS_SERVER_NAME", &config.asb_host),
            ("DS_PROJECT", &config.project),
            ("EXPORT_DATE", &config.export_date),
            ("EXPORT_TIME", &config.export_time),
            ("JOB_NAME", &config.job_name),
            ("SOURCE_PARAM", &config.source_param),
            ("SOURCE_SQL", &config.source_sql),
            ("TARGET_SCHEMA", &config.target_schema),
            ("TARGET_TABLE", &config.target_table),
        ]
        .into_iter()
        .map(|(name, value)| (name, value.clone()))
        .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Pretty JSON, used by `--print-context`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<(&'static str, String)> for DeploymentContext {
    fn from_iter<I: IntoIterator<Item = (&'static str, String)>>(iter: I) -> Self {
        DeploymentContext { values: iter.into_iter().collect() }
    }
}
