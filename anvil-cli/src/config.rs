//! Configuration module
//!
//! Settings shared by every command, collected from flags and environment.

use anyhow::bail;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Project scope for internal ids
    pub project_id: u64,

    /// First internal id handed out
    pub iid_start: u64,

    /// Protected ref patterns
    pub protected_refs: Vec<String>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.iid_start == 0 {
            bail!("iid_start must be greater than 0");
        }

        if self.protected_refs.iter().any(|p| p.trim().is_empty()) {
            bail!("protected ref patterns cannot be empty");
        }

        if let Some(pattern) = self
            .protected_refs
            .iter()
            .find(|p| p.trim_end_matches('*').contains('*'))
        {
            bail!(
                "protected ref pattern '{}' may only use '*' as its last character",
                pattern
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: 1,
            iid_start: 1,
            protected_refs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project_id, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.iid_start = 0;
        assert!(config.validate().is_err());
        config.iid_start = 10;

        config.protected_refs = vec!["main".to_string(), "release/*".to_string()];
        assert!(config.validate().is_ok());

        config.protected_refs = vec!["rel*ease".to_string()];
        assert!(config.validate().is_err());

        config.protected_refs = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }
}
