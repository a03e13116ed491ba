use clap::Parser;

/// acred — credibility review pipeline
#[derive(Parser, Debug)]
#[command(name = "acred", version, about)]
pub struct Cli {
    /// Claim sentence(s) to review for credibility (repeatable)
    #[arg(long = "claim")]
    pub claims: Vec<String>,

    /// Article URL to review
    #[arg(long)]
    pub article_url: Option<String>,

    /// Pre-extracted article content, used instead of fetching (requires --article-url)
    #[arg(long)]
    pub article_content: Option<String>,

    /// Tweet text to review (URLs inside are resolved to linked articles)
    #[arg(long)]
    pub tweet: Option<String>,

    /// Website URL or domain to review
    #[arg(long)]
    pub website: Option<String>,

    /// Path to config file
    #[arg(long, default_value = ".acred/config.toml")]
    pub config: String,

    /// Review output format (schema.org, cred_assessment)
    #[arg(long)]
    pub review_format: Option<String>,

    /// Graph output format (nestedTree, nodesWithRefs, nodesAndLinks)
    #[arg(long)]
    pub graph_format: Option<String>,

    /// Confidence threshold below which a rating is reported as "not verifiable"
    #[arg(long)]
    pub cred_conf_threshold: Option<f64>,

    /// Maximum number of extracted claims reviewed per document
    #[arg(long)]
    pub max_claims_in_doc: Option<usize>,

    /// Run check-worthiness filtering before similarity search
    #[arg(long)]
    pub worthiness_review: bool,

    /// Base URL of the similarity/stance service
    #[arg(long)]
    pub similarity_service_url: Option<String>,

    /// Base URL of the check-worthiness service
    #[arg(long)]
    pub worthiness_service_url: Option<String>,

    /// Base URL of the website credibility service
    #[arg(long)]
    pub website_credibility_service_url: Option<String>,

    /// Timeout in seconds for calls to external services
    #[arg(long)]
    pub request_timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_claim() {
        let cli = Cli::parse_from(["acred", "--claim", "the sky is blue"]);
        assert_eq!(cli.claims, vec!["the sky is blue".to_string()]);
    }

    #[test]
    fn test_parse_multiple_claims() {
        let cli = Cli::parse_from(["acred", "--claim", "a", "--claim", "b"]);
        assert_eq!(cli.claims, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_parse_article() {
        let cli = Cli::parse_from(["acred", "--article-url", "https://example.com/a"]);
        assert_eq!(cli.article_url.as_deref(), Some("https://example.com/a"));
    }

    #[test]
    fn test_parse_worthiness_flag_defaults_false() {
        let cli = Cli::parse_from(["acred", "--claim", "x"]);
        assert!(!cli.worthiness_review);
    }

    #[test]
    fn test_parse_all_overrides() {
        let cli = Cli::parse_from([
            "acred",
            "--claim",
            "x",
            "--review-format",
            "cred_assessment",
            "--graph-format",
            "nodesAndLinks",
            "--cred-conf-threshold",
            "0.5",
            "--max-claims-in-doc",
            "3",
            "--worthiness-review",
            "--request-timeout",
            "10",
        ]);
        assert_eq!(cli.review_format.as_deref(), Some("cred_assessment"));
        assert_eq!(cli.graph_format.as_deref(), Some("nodesAndLinks"));
        assert_eq!(cli.cred_conf_threshold, Some(0.5));
        assert_eq!(cli.max_claims_in_doc, Some(3));
        assert!(cli.worthiness_review);
        assert_eq!(cli.request_timeout, Some(10));
    }
}
