//! Engine configuration, loaded from `{data_dir}/staffing.json`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingConfig {
    /// Facilities whose records never appear in the reconciled output.
    #[serde(default)]
    pub excluded_facilities: Vec<String>,
    /// Substring (case-insensitive) that marks an employment status as active.
    #[serde(default = "default_active_token")]
    pub active_status_token: String,
    /// Exact employment status the roster fetch filters out.
    #[serde(default = "default_terminated_status")]
    pub terminated_status: String,
    #[serde(default = "default_unknown_unit")]
    pub unknown_unit_label: String,
    #[serde(default = "default_unknown_role")]
    pub unknown_role_label: String,
    #[serde(default = "default_unknown_cost_center")]
    pub unknown_cost_center_label: String,
    /// Emit archived quota lines (flagged) instead of dropping them.
    #[serde(default)]
    pub include_archived: bool,
}

fn default_active_token() -> String {
    "ATIVO".into()
}

fn default_terminated_status() -> String {
    "99-Demitido".into()
}

fn default_unknown_unit() -> String {
    "Sem Unidade".into()
}

fn default_unknown_role() -> String {
    "Sem Cargo".into()
}

fn default_unknown_cost_center() -> String {
    "Sem Centro de Custo".into()
}

impl StaffingConfig {
    /// Load from the data/ directory.
    /// In tests, use StaffingConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/staffing.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: StaffingConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.active_status_token.trim().is_empty() {
            anyhow::bail!("{path}: active_status_token must not be blank");
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            excluded_facilities: vec!["SBCD - HMI".into(), "SBCD - PROJETO POA".into()],
            active_status_token: default_active_token(),
            terminated_status: default_terminated_status(),
            unknown_unit_label: default_unknown_unit(),
            unknown_role_label: default_unknown_role(),
            unknown_cost_center_label: default_unknown_cost_center(),
            include_archived: false,
        }
    }

    pub fn is_excluded(&self, facility: &str) -> bool {
        self.excluded_facilities.iter().any(|f| f == facility)
    }

    /// Whether a free-text employment status counts as active.
    pub fn is_active_status(&self, status: Option<&str>) -> bool {
        let token = self.active_status_token.to_uppercase();
        status.is_some_and(|s| s.to_uppercase().contains(&token))
    }
}
