//! Ambient metadata attached to every `*Reviewer` bot item: the publishing
//! organisation and a snapshot of the execution environment it ran in.

use serde::{Deserialize, Serialize};

use crate::model::Organization;

/// The fixed organisation credited as publisher of every reviewer bot this
/// crate produces.
pub fn esi_lab_organization() -> Organization {
    Organization {
        type_: "Organization".to_string(),
        name: "ESI Lab".to_string(),
        url: Some("https://www.gesis.org/en/institute/esi-lab".to_string()),
        identifier: None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionEnvironment {
    pub hostname: String,
    pub pkg_version: String,
}

/// A minimal snapshot of the environment the pipeline is running in, for
/// inclusion in a bot's `launchConfiguration`.
pub fn inspect_execution_env() -> ExecutionEnvironment {
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());
    ExecutionEnvironment {
        hostname,
        pkg_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esi_lab_organization_has_name() {
        assert_eq!(esi_lab_organization().name, "ESI Lab");
    }

    #[test]
    fn test_inspect_execution_env_has_pkg_version() {
        let env = inspect_execution_env();
        assert!(!env.pkg_version.is_empty());
    }
}
