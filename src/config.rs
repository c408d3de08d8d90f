use std::env;

use log::info;

use crate::error::DeployError;

/// Target platform domain, e.g. `services.company.com:9080`
pub const DS_DOMAIN: &str = "DS_DOMAIN";
pub const DS_USER: &str = "DS_USER";
pub const DS_PASS: &str = "DS_PASS";
/// Engine tier host that compiles and runs jobs
pub const DS_ASBHOST: &str = "DS_ASBHOST";

static REQUIRED: [&str; 4] = [DS_DOMAIN, DS_USER, DS_PASS, DS_ASBHOST];

static DEFAULT_PROJECT: &str = "BIDW_ADM";
static DEFAULT_EXPORT_DATE: &str = "2025-10-30";
static DEFAULT_EXPORT_TIME: &str = "13.38.34";
static DEFAULT_JOB_NAME: &str = "DM_SP_SL_PAY_D_LOAD";
static DEFAULT_SOURCE_PARAM: &str = "P_DW_VER";
static DEFAULT_SOURCE_SQL: &str = "SELECT * FROM BIDWADM_CO.OD_SP_SL_PAY_D";
static DEFAULT_TARGET_SCHEMA: &str = "BIDWADM";
static DEFAULT_TARGET_TABLE: &str = "DM_SP_SL_PAY_D";

/// Everything a deployment needs, read once at startup
///
/// Required values have no defaults: a missing one stops the process before the template is
/// rendered or any tool is launched. Values are passed through untouched, so a malformed domain
/// or host only shows up as a failing `istool` / `dsjob` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub domain: String,
    pub user: String,
    pub password: String,
    pub asb_host: String,
    pub project: String,
    pub export_date: String,
    pub export_time: String,
    pub job_name: String,
    pub source_param: String,
    pub source_sql: String,
    pub target_schema: String,
    pub target_table: String,
}

impl DeployConfig {
    /// Read configuration from the process environment
    ///
    /// Variables that aren't valid unicode are treated as unset.
    pub fn from_env() -> Result<DeployConfig, DeployError> {
        DeployConfig::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<DeployConfig, DeployError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&'static str> = REQUIRED
            .iter()
            .copied()
            .filter(|key| lookup(*key).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(DeployError::MissingConfiguration(missing));
        }

        let required = |key: &str| lookup(key).unwrap_or_default();
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = DeployConfig {
            domain: required(DS_DOMAIN),
            user: required(DS_USER),
            password: required(DS_PASS),
            asb_host: required(DS_ASBHOST),
            project: optional("DS_PROJECT", DEFAULT_PROJECT),
            export_date: optional("EXPORT_DATE", DEFAULT_EXPORT_DATE),
            export_time: optional("EXPORT_TIME", DEFAULT_EXPORT_TIME),
            job_name: optional("JOB_NAME", DEFAULT_JOB_NAME),
            source_param: optional("SOURCE_PARAM", DEFAULT_SOURCE_PARAM),
            source_sql: optional("SOURCE_SQL", DEFAULT_SOURCE_SQL),
            target_schema: optional("TARGET_SCHEMA", DEFAULT_TARGET_SCHEMA),
            target_table: optional("TARGET_TABLE", DEFAULT_TARGET_TABLE),
        };

        info!("Loaded configuration for job {} in project {} on {}", config.job_name, config.project, config.asb_host);
        Ok(config)
    }
}
