//! Which backends the storefront talks to.

use serde::{Deserialize, Serialize};

/// Backend selection for search and the model service.
///
/// Production needs the Azure settings from the environment. Development
/// serves the seeded sample catalog with a hash-based model, so the UI and
/// CLI work without network access or credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Azure AI Search index and Azure OpenAI deployments
    Production,
    /// In-memory sample catalog and deterministic model
    #[default]
    Development,
}

/// Unrecognized `--mode` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown runtime mode '{0}': use 'production' for the Azure services \
     or 'development' for the offline sample catalog"
)]
pub struct ParseModeError(pub String);

impl RuntimeMode {
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Whether Azure endpoints and credentials must be configured.
    pub fn requires_cloud_config(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Short description of the backends in use, for logs and health checks.
    pub fn backends(self) -> &'static str {
        match self {
            Self::Production => "Azure AI Search + Azure OpenAI",
            Self::Development => "in-memory sample catalog + deterministic model",
        }
    }
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" | "azure" => Ok(Self::Production),
            "development" | "dev" | "offline" => Ok(Self::Development),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime_mode() {
        assert_eq!("prod".parse::<RuntimeMode>(), Ok(RuntimeMode::Production));
        assert_eq!(" Offline ".parse::<RuntimeMode>(), Ok(RuntimeMode::Development));

        let err = "staging".parse::<RuntimeMode>().unwrap_err();
        assert_eq!(err, ParseModeError("staging".to_string()));
        assert!(err.to_string().contains("offline sample catalog"));
    }

    #[test]
    fn test_only_production_needs_cloud_config() {
        assert!(RuntimeMode::Production.requires_cloud_config());
        assert!(!RuntimeMode::default().requires_cloud_config());
        assert!(RuntimeMode::default().is_development());
        assert_eq!(RuntimeMode::Production.to_string(), "production");
        assert_eq!(
            serde_json::to_string(&RuntimeMode::Development).unwrap(),
            "\"development\""
        );
    }
}
