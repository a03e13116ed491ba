use acred::cli::Cli;
use acred::config::Config;
use acred::itnorm;
use acred::model::{Article, Tweet};
use acred::registry;
use acred::reviewer::credibility::article_credrev::{self, PreAnalysedArticle};
use acred::reviewer::credibility::tweet_credrev::{self, NoContentSource};
use acred::reviewer::credibility::{agg_qsent_credrev, website_credrev};
use acred::sentsplit;
use acred::services::{self, website_credibility::DomainCredibilityCache};

use clap::Parser;
use serde_json::Value;
use tracing::info;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .init();
}

/// Reshapes a finished review according to `cfg.acred_graph_format`, after
/// trimming `isBasedOn` to `cfg.based_on_depth` levels (if configured).
fn shape_output(review: Value, cfg: &Config) -> Result<Value, acred::error::Error> {
    let registry = registry::shared();
    let trimmed = match cfg.based_on_depth {
        Some(depth) => itnorm::trim_tree(&review, "isBasedOn", depth as i64)?,
        None => review,
    };
    let options = itnorm::IndexOptions::default_composite();
    match cfg.acred_graph_format.as_str() {
        "nestedTree" => Ok(trimmed),
        "nodesWithRefs" => {
            let index = itnorm::index_ident_tree(&trimmed, registry, &options)?;
            Ok(serde_json::to_value(index).expect("identifier index is always encodable"))
        }
        "nodesAndLinks" => {
            let (nodes, links) = itnorm::nested_item_as_graph(&trimmed, registry, &options)?;
            Ok(serde_json::json!({"nodes": nodes, "links": links}))
        }
        other => unreachable!("validated config rejects unknown graph format: {other}"),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    info!(?config, "acred config loaded");

    if cli.claims.is_empty() && cli.article_url.is_none() && cli.tweet.is_none() && cli.website.is_none() {
        eprintln!("error: specify one of --claim, --article-url, --tweet, --website");
        std::process::exit(1);
    }

    let client = services::http_client(&config);
    let registry = registry::shared();
    let cache = DomainCredibilityCache::new(config.domain_cache_capacity);

    let output = if !cli.claims.is_empty() {
        let reviews = agg_qsent_credrev::review_batch(&client, &config, &cache, registry, &cli.claims).await;
        Value::Array(reviews)
    } else if let Some(url) = &cli.article_url {
        let mut article = Article::new(url.clone());
        if let Some(content) = &cli.article_content {
            article.content = Some(content.clone());
            article.claims_content =
                sentsplit::split_sentences(content).into_iter().take(config.max_claims_in_doc).collect();
        }
        article_credrev::review(&client, &config, &cache, registry, &PreAnalysedArticle, &article).await
    } else if let Some(text) = &cli.tweet {
        let tweet = Tweet::new("cli", text);
        tweet_credrev::review(
            &client,
            &config,
            &cache,
            registry,
            &PreAnalysedArticle,
            &NoContentSource,
            &tweet,
        )
        .await
    } else {
        let website = cli.website.as_deref().expect("checked above");
        website_credrev::review(&client, &config, &cache, registry, website).await
    };

    match shape_output(output, &config) {
        Ok(shaped) => println!("{}", serde_json::to_string_pretty(&shaped).expect("review tree is always encodable")),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
