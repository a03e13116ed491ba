use std::path::Path;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub acred_review_format: Option<String>,
    pub acred_graph_format: Option<String>,
    pub based_on_depth: Option<u32>,
    pub cred_conf_threshold: Option<f64>,
    pub article_from_website_conf_factor: Option<f64>,
    pub article_from_website_cred_threshold_penalise: Option<f64>,
    pub factchecker_website_to_qclaim_confidence_penalty_factor: Option<f64>,
    pub sentence_similarity_unrelated_factor: Option<f64>,
    pub sentence_similarity_discuss_factor: Option<f64>,
    pub max_claims_in_doc: Option<usize>,
    pub worthiness_review: Option<bool>,
    pub acred_factchecker_urls: Option<Vec<String>>,
    pub acred_socmedia_urls: Option<Vec<String>>,
    pub similarity_service_url: Option<String>,
    pub worthiness_service_url: Option<String>,
    pub website_credibility_service_url: Option<String>,
    pub request_timeout: Option<u64>,
    pub domain_cache_capacity: Option<usize>,
    pub similarity_search_auth_user: Option<String>,
    pub similarity_search_auth_pwrd: Option<String>,
    pub similarity_search_verify_tls: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub acred_review_format: String,
    pub acred_graph_format: String,
    pub based_on_depth: Option<u32>,
    pub cred_conf_threshold: f64,
    pub article_from_website_conf_factor: f64,
    pub article_from_website_cred_threshold_penalise: f64,
    pub factchecker_website_to_qclaim_confidence_penalty_factor: f64,
    pub sentence_similarity_unrelated_factor: f64,
    pub sentence_similarity_discuss_factor: f64,
    pub max_claims_in_doc: usize,
    pub worthiness_review: bool,
    pub acred_factchecker_urls: Vec<String>,
    pub acred_socmedia_urls: Vec<String>,
    pub similarity_service_url: String,
    pub worthiness_service_url: String,
    pub website_credibility_service_url: String,
    pub request_timeout: u64,
    pub domain_cache_capacity: usize,
    pub similarity_search_auth_user: Option<String>,
    pub similarity_search_auth_pwrd: Option<String>,
    pub similarity_search_verify_tls: bool,
}

const DEFAULT_CONFIG_FILE: &str = ".acred/config.toml";

const DEFAULT_SOCMEDIA_URLS: &[&str] = &["twitter.com", "facebook.com", "instagram.com"];

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        Self::load_from(cli, Path::new("."))
    }

    pub fn load_from(cli: &Cli, project_dir: &Path) -> Result<Self> {
        let explicit = cli.config != DEFAULT_CONFIG_FILE;
        let file_config = if explicit {
            let path = Path::new(&cli.config);
            if !path.exists() {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            let content = std::fs::read_to_string(path)?;
            parse_config(&content)?
        } else {
            let path = project_dir.join(DEFAULT_CONFIG_FILE);
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                parse_config(&content)?
            } else {
                ConfigFile::default()
            }
        };

        merge(file_config, cli)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    Ok(config)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_var(name).and_then(|s| s.parse().ok())
}

fn env_bool(name: &str) -> Option<bool> {
    env_var(name).map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn env_list(name: &str) -> Option<Vec<String>> {
    env_var(name).map(|s| s.split(',').map(|p| p.trim().to_string()).collect())
}

/// `ACRED_*` environment variables, read at `merge()` time so they sit
/// between the TOML file and CLI flags in precedence.
#[derive(Debug, Default)]
struct EnvOverrides {
    acred_review_format: Option<String>,
    acred_graph_format: Option<String>,
    cred_conf_threshold: Option<f64>,
    article_from_website_conf_factor: Option<f64>,
    article_from_website_cred_threshold_penalise: Option<f64>,
    factchecker_website_to_qclaim_confidence_penalty_factor: Option<f64>,
    sentence_similarity_unrelated_factor: Option<f64>,
    sentence_similarity_discuss_factor: Option<f64>,
    max_claims_in_doc: Option<usize>,
    worthiness_review: Option<bool>,
    acred_factchecker_urls: Option<Vec<String>>,
    acred_socmedia_urls: Option<Vec<String>>,
    similarity_service_url: Option<String>,
    worthiness_service_url: Option<String>,
    website_credibility_service_url: Option<String>,
    request_timeout: Option<u64>,
}

fn read_env_overrides() -> EnvOverrides {
    EnvOverrides {
        acred_review_format: env_var("ACRED_REVIEW_FORMAT"),
        acred_graph_format: env_var("ACRED_GRAPH_FORMAT"),
        cred_conf_threshold: env_parsed("ACRED_CRED_CONF_THRESHOLD"),
        article_from_website_conf_factor: env_parsed("ACRED_ARTICLE_FROM_WEBSITE_CONF_FACTOR"),
        article_from_website_cred_threshold_penalise: env_parsed(
            "ACRED_ARTICLE_FROM_WEBSITE_CRED_THRESHOLD_PENALISE",
        ),
        factchecker_website_to_qclaim_confidence_penalty_factor: env_parsed(
            "ACRED_FACTCHECKER_WEBSITE_TO_QCLAIM_CONFIDENCE_PENALTY_FACTOR",
        ),
        sentence_similarity_unrelated_factor: env_parsed(
            "ACRED_SENTENCE_SIMILARITY_UNRELATED_FACTOR",
        ),
        sentence_similarity_discuss_factor: env_parsed(
            "ACRED_SENTENCE_SIMILARITY_DISCUSS_FACTOR",
        ),
        max_claims_in_doc: env_parsed("ACRED_MAX_CLAIMS_IN_DOC"),
        worthiness_review: env_bool("ACRED_WORTHINESS_REVIEW"),
        acred_factchecker_urls: env_list("ACRED_FACTCHECKER_URLS"),
        acred_socmedia_urls: env_list("ACRED_SOCMEDIA_URLS"),
        similarity_service_url: env_var("ACRED_SIMILARITY_SERVICE_URL"),
        worthiness_service_url: env_var("ACRED_WORTHINESS_SERVICE_URL"),
        website_credibility_service_url: env_var("ACRED_WEBSITE_CREDIBILITY_SERVICE_URL"),
        request_timeout: env_parsed("ACRED_REQUEST_TIMEOUT"),
    }
}

/// Layers config as defaults -> TOML file -> `ACRED_*` env vars -> CLI flags.
pub fn merge(file: ConfigFile, cli: &Cli) -> Result<Config> {
    let env = read_env_overrides();
    let config = Config {
        acred_review_format: cli
            .review_format
            .clone()
            .or(env.acred_review_format)
            .or(file.acred_review_format)
            .unwrap_or_else(|| "schema.org".to_string()),
        acred_graph_format: cli
            .graph_format
            .clone()
            .or(env.acred_graph_format)
            .or(file.acred_graph_format)
            .unwrap_or_else(|| "nestedTree".to_string()),
        based_on_depth: file.based_on_depth,
        cred_conf_threshold: cli
            .cred_conf_threshold
            .or(env.cred_conf_threshold)
            .or(file.cred_conf_threshold)
            .unwrap_or(0.7),
        article_from_website_conf_factor: env
            .article_from_website_conf_factor
            .or(file.article_from_website_conf_factor)
            .unwrap_or(0.9),
        article_from_website_cred_threshold_penalise: env
            .article_from_website_cred_threshold_penalise
            .or(file.article_from_website_cred_threshold_penalise)
            .unwrap_or(0.2),
        factchecker_website_to_qclaim_confidence_penalty_factor: env
            .factchecker_website_to_qclaim_confidence_penalty_factor
            .or(file.factchecker_website_to_qclaim_confidence_penalty_factor)
            .unwrap_or(0.5),
        sentence_similarity_unrelated_factor: env
            .sentence_similarity_unrelated_factor
            .or(file.sentence_similarity_unrelated_factor)
            .unwrap_or(0.9),
        sentence_similarity_discuss_factor: env
            .sentence_similarity_discuss_factor
            .or(file.sentence_similarity_discuss_factor)
            .unwrap_or(0.9),
        max_claims_in_doc: cli
            .max_claims_in_doc
            .or(env.max_claims_in_doc)
            .or(file.max_claims_in_doc)
            .unwrap_or(5),
        worthiness_review: cli.worthiness_review
            || env.worthiness_review.unwrap_or(false)
            || file.worthiness_review.unwrap_or(false),
        acred_factchecker_urls: env
            .acred_factchecker_urls
            .or(file.acred_factchecker_urls)
            .unwrap_or_default(),
        acred_socmedia_urls: env.acred_socmedia_urls.or(file.acred_socmedia_urls).unwrap_or_else(|| {
            DEFAULT_SOCMEDIA_URLS
                .iter()
                .map(|s| s.to_string())
                .collect()
        }),
        similarity_service_url: cli
            .similarity_service_url
            .clone()
            .or(env.similarity_service_url)
            .or(file.similarity_service_url)
            .unwrap_or_else(|| "http://localhost:8070".to_string()),
        worthiness_service_url: cli
            .worthiness_service_url
            .clone()
            .or(env.worthiness_service_url)
            .or(file.worthiness_service_url)
            .unwrap_or_else(|| "http://localhost:8071".to_string()),
        website_credibility_service_url: cli
            .website_credibility_service_url
            .clone()
            .or(env.website_credibility_service_url)
            .or(file.website_credibility_service_url)
            .unwrap_or_else(|| "http://localhost:8072".to_string()),
        request_timeout: cli
            .request_timeout
            .or(env.request_timeout)
            .or(file.request_timeout)
            .unwrap_or(20),
        domain_cache_capacity: file.domain_cache_capacity.unwrap_or(1024),
        similarity_search_auth_user: file
            .similarity_search_auth_user
            .or_else(|| Some("testuser".to_string())),
        similarity_search_auth_pwrd: file
            .similarity_search_auth_pwrd
            .or_else(|| Some("testpass".to_string())),
        similarity_search_verify_tls: file.similarity_search_verify_tls.unwrap_or(false),
    };
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
impl Config {
    /// A fully-populated default `Config`, for tests in other modules that
    /// need a config value but don't care about its specifics.
    pub fn test_default() -> Self {
        let cli = Cli::parse_from(["acred"]);
        merge(ConfigFile::default(), &cli).expect("defaults are always valid")
    }
}

fn validate(config: &Config) -> Result<()> {
    match config.acred_review_format.as_str() {
        "schema.org" | "cred_assessment" => {}
        other => {
            return Err(Error::ConfigValidation(format!(
                "unknown acred_review_format: {other} (expected: schema.org, cred_assessment)"
            )));
        }
    }
    match config.acred_graph_format.as_str() {
        "nestedTree" | "nodesWithRefs" | "nodesAndLinks" => {}
        other => {
            return Err(Error::ConfigValidation(format!(
                "unknown acred_graph_format: {other} (expected: nestedTree, nodesWithRefs, nodesAndLinks)"
            )));
        }
    }
    if !(0.0..=1.0).contains(&config.cred_conf_threshold) {
        return Err(Error::ConfigValidation(
            "cred_conf_threshold must be within [0, 1]".to_string(),
        ));
    }
    if config.max_claims_in_doc == 0 {
        return Err(Error::ConfigValidation(
            "max_claims_in_doc must be > 0".to_string(),
        ));
    }
    if config.request_timeout == 0 {
        return Err(Error::ConfigValidation(
            "request_timeout must be > 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
acred_review_format = "schema.org"
cred_conf_threshold = 0.6
max_claims_in_doc = 3
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.acred_review_format.as_deref(), Some("schema.org"));
        assert_eq!(config.cred_conf_threshold, Some(0.6));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_parse_unknown_field() {
        let err = parse_config(r#"bogus = "value""#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_defaults_applied() {
        let cli = Cli::parse_from(["acred", "--claim", "x"]);
        let config = merge(ConfigFile::default(), &cli).unwrap();
        assert_eq!(config.acred_review_format, "schema.org");
        assert_eq!(config.acred_graph_format, "nestedTree");
        assert_eq!(config.cred_conf_threshold, 0.7);
        assert_eq!(config.max_claims_in_doc, 5);
        assert!(!config.worthiness_review);
        assert_eq!(
            config.acred_socmedia_urls,
            vec!["twitter.com", "facebook.com", "instagram.com"]
        );
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ConfigFile {
            cred_conf_threshold: Some(0.5),
            max_claims_in_doc: Some(2),
            ..Default::default()
        };
        let cli = Cli::parse_from([
            "acred",
            "--claim",
            "x",
            "--cred-conf-threshold",
            "0.9",
            "--worthiness-review",
        ]);
        let config = merge(file, &cli).unwrap();
        assert_eq!(config.cred_conf_threshold, 0.9); // CLI wins
        assert_eq!(config.max_claims_in_doc, 2); // file value kept
        assert!(config.worthiness_review);
    }

    #[test]
    fn test_invalid_review_format_rejected() {
        let cli = Cli::parse_from(["acred", "--claim", "x", "--review-format", "xml"]);
        let err = merge(ConfigFile::default(), &cli).unwrap_err();
        assert!(err.to_string().contains("unknown acred_review_format"));
    }

    #[test]
    fn test_invalid_graph_format_rejected() {
        let cli = Cli::parse_from(["acred", "--claim", "x", "--graph-format", "xml"]);
        let err = merge(ConfigFile::default(), &cli).unwrap_err();
        assert!(err.to_string().contains("unknown acred_graph_format"));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let cli = Cli::parse_from(["acred", "--claim", "x", "--cred-conf-threshold", "1.5"]);
        let err = merge(ConfigFile::default(), &cli).unwrap_err();
        assert!(err.to_string().contains("cred_conf_threshold"));
    }

    #[test]
    fn test_zero_max_claims_rejected() {
        let cli = Cli::parse_from(["acred", "--claim", "x", "--max-claims-in-doc", "0"]);
        let err = merge(ConfigFile::default(), &cli).unwrap_err();
        assert!(err.to_string().contains("max_claims_in_doc"));
    }

    #[test]
    fn test_env_var_overrides_file_but_not_cli() {
        // SAFETY: tests run single-threaded within this process is not
        // guaranteed by cargo, so scope the var strictly to this test and
        // always restore it, to avoid bleeding into other tests.
        let key = "ACRED_CRED_CONF_THRESHOLD";
        let previous = std::env::var(key).ok();
        unsafe { std::env::set_var(key, "0.42") };

        let file = ConfigFile {
            cred_conf_threshold: Some(0.1),
            ..Default::default()
        };
        let cli = Cli::parse_from(["acred", "--claim", "x"]);
        let config = merge(file, &cli).unwrap();
        assert_eq!(config.cred_conf_threshold, 0.42);

        let cli_override = Cli::parse_from(["acred", "--claim", "x", "--cred-conf-threshold", "0.9"]);
        let config = merge(ConfigFile::default(), &cli_override).unwrap();
        assert_eq!(config.cred_conf_threshold, 0.9);

        match previous {
            Some(v) => unsafe { std::env::set_var(key, v) },
            None => unsafe { std::env::remove_var(key) },
        }
    }

    #[test]
    fn test_load_missing_default_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from(["acred", "--claim", "x"]);
        let config = Config::load_from(&cli, tmp.path()).unwrap();
        assert_eq!(config.acred_review_format, "schema.org");
        assert_eq!(config.cred_conf_threshold, 0.7);
    }

    #[test]
    fn test_load_explicit_missing_config_errors() {
        let cli = Cli::parse_from([
            "acred",
            "--claim",
            "x",
            "--config",
            "/nonexistent/config.toml",
        ]);
        let err = Config::load(&cli).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_load_with_file_and_cli_override() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg_dir = tmp.path().join(".acred");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "cred_conf_threshold = 0.4\nmax_claims_in_doc = 2\n",
        )
        .unwrap();
        let cli = Cli::parse_from(["acred", "--claim", "x"]);
        let config = Config::load_from(&cli, tmp.path()).unwrap();
        assert_eq!(config.cred_conf_threshold, 0.4);
        assert_eq!(config.max_claims_in_doc, 2);
    }
}
