//! Doctor command for diagnostics
//!
//! Checks configuration, endpoint reachability and the state directory.

use crate::cli::Config;
use crate::streaming::HttpSummaryClient;
use colored::*;
use std::path::PathBuf;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics
pub struct Doctor {
    config: Config,
}

impl Doctor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        vec![
            self.check_config(),
            self.check_endpoint().await,
            self.check_state_dir(),
        ]
    }

    /// Check 1: configuration values
    fn check_config(&self) -> HealthCheck {
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 2: summarization endpoint answers
    async fn check_endpoint(&self) -> HealthCheck {
        let client = match HttpSummaryClient::with_config(
            &self.config.endpoint.base_url,
            &self.config.endpoint.summarize_path,
            self.config.connect_timeout(),
        ) {
            Ok(client) => client,
            Err(e) => {
                return HealthCheck::new("Endpoint", HealthStatus::Fail(format!("Cannot build client: {}", e)))
            }
        };

        match client.health_check().await {
            Ok(true) => HealthCheck::new("Endpoint", HealthStatus::Pass),
            Ok(false) => HealthCheck::new(
                "Endpoint",
                HealthStatus::Fail(format!("{} not reachable", client.base_url())),
            ),
            Err(e) => HealthCheck::new("Endpoint", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 3: state directory writable
    fn check_state_dir(&self) -> HealthCheck {
        let dir: PathBuf = self.config.state_dir();
        if !dir.exists() {
            return HealthCheck::new(
                "State Directory",
                HealthStatus::Warn(format!("{} will be created on first use", dir.display())),
            );
        }

        let probe = dir.join(".write_test");
        match std::fs::write(&probe, b"ok") {
            Ok(()) => {
                let _ = std::fs::remove_file(&probe);
                HealthCheck::new("State Directory", HealthStatus::Pass)
            }
            Err(e) => HealthCheck::new(
                "State Directory",
                HealthStatus::Fail(format!("No write permission: {}", e)),
            ),
        }
    }

    /// Print results table
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}", "crunchdigest doctor".bold());
        println!("{:<20} {}", "Check", "Status");
        println!("{}", "=".repeat(50));

        for check in checks {
            let status = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };
            println!("{:<20} {}", check.name, status);
        }
        println!();
    }

    /// No check failed
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_status() {
        let checks = vec![
            HealthCheck::new("a", HealthStatus::Pass),
            HealthCheck::new("b", HealthStatus::Warn("warning".to_string())),
        ];
        assert!(Doctor::overall_status(&checks));

        let checks = vec![
            HealthCheck::new("a", HealthStatus::Pass),
            HealthCheck::new("b", HealthStatus::Fail("broken".to_string())),
        ];
        assert!(!Doctor::overall_status(&checks));
    }

    #[test]
    fn test_invalid_config_fails() {
        let mut config = Config::default();
        config.endpoint.connect_timeout_secs = 0;
        let check = Doctor::new(config).check_config();
        assert!(matches!(check.status, HealthStatus::Fail(_)));
    }

    #[test]
    fn test_state_dir_writable() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.state_dir = dir.path().to_string_lossy().to_string();
        let check = Doctor::new(config).check_state_dir();
        assert_eq!(check.status, HealthStatus::Pass);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails() {
        let mut config = Config::default();
        // Port 9 (discard) is closed on test machines
        config.endpoint.base_url = "http://127.0.0.1:9".to_string();
        let check = Doctor::new(config).check_endpoint().await;
        assert!(matches!(check.status, HealthStatus::Fail(_)));
    }
}
