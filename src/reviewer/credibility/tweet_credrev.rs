//! Tweet credibility reviewer (§4.12): normalises a tweet, reviews every
//! linked article and every extracted sentence, then aggregates.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};

use crate::bot_describer;
use crate::config::Config;
use crate::content::{self, CI_CONTEXT};
use crate::isodate;
use crate::model::{Article, Tweet, TweetUrl};
use crate::registry::Registry;
use crate::reviewer::credibility::article_credrev::ArticleAnalyser;
use crate::reviewer::credibility::{agg_qsent_credrev, article_credrev, contentagg};
use crate::sentsplit;
use crate::services::website_credibility::DomainCredibilityCache;

const VERSION: &str = "0.1.0";

/// Fetches a tweet's full content by id when the tweet object handed to the
/// reviewer doesn't already carry it. Kept as a trait so the actual tweet
/// store (out of scope for this crate) can be swapped in by the caller.
#[async_trait]
pub trait TweetContentSource: Send + Sync {
    async fn content_for(&self, tweet_id: &str) -> Option<String>;
}

/// A [`TweetContentSource`] that never has anything to offer — used when
/// every tweet handed to the reviewer already carries its own `content`.
pub struct NoContentSource;

#[async_trait]
impl TweetContentSource for NoContentSource {
    async fn content_for(&self, _tweet_id: &str) -> Option<String> {
        None
    }
}

pub fn bot_info(registry: &Registry) -> Value {
    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "TweetCredReviewer",
        "name": "Tweet Credibility Reviewer",
        "description": "Estimates the credibility of a tweet from its linked articles and the claims it makes.",
        "additionalType": content::super_types(registry, &json!("TweetCredReviewer")),
        "author": bot_describer::esi_lab_organization(),
        "dateCreated": "2020-06-20T20:03:00Z",
        "softwareVersion": VERSION,
        "applicationSuite": "Co-inform",
        "isBasedOn": [],
        "launchConfiguration": {},
    });
    content::with_identifier(registry, result)
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").expect("static regex is valid"))
}

/// Ensures `tweet` has `content`, `urls` and `text` populated:
/// - `content` is fetched from `source` by id if absent.
/// - `urls` are parsed out of `content` with a plain URL regex if absent.
/// - `text` is `content` with every URL substring removed.
pub async fn normalise(source: &dyn TweetContentSource, tweet: &Tweet) -> Tweet {
    let mut tweet = tweet.clone();
    if tweet.content.is_none() {
        tweet.content = source.content_for(&tweet.tweet_id).await;
    }
    let content = tweet.content.clone().unwrap_or_default();
    if tweet.urls.is_empty() {
        tweet.urls = url_regex()
            .find_iter(&content)
            .map(|m| TweetUrl {
                short_url: m.as_str().to_string(),
                expanded_url: None,
            })
            .collect();
    }
    if tweet.text.is_none() {
        let mut text = content.clone();
        for found in url_regex().find_iter(&content) {
            text = text.replace(found.as_str(), "");
        }
        tweet.text = Some(text.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    tweet
}

/// Reviews `tweet` for credibility.
pub async fn review(
    client: &reqwest::Client,
    cfg: &Config,
    website_cache: &DomainCredibilityCache,
    registry: &Registry,
    analyser: &dyn ArticleAnalyser,
    source: &dyn TweetContentSource,
    tweet: &Tweet,
) -> Value {
    let normalised = normalise(source, tweet).await;
    let text = normalised.text.clone().unwrap_or_default();
    let sentences = sentsplit::split_sentences(&text);

    let mut article_reviews = Vec::with_capacity(normalised.urls.len());
    for tweet_url in &normalised.urls {
        let url = tweet_url.expanded_url.clone().unwrap_or_else(|| tweet_url.short_url.clone());
        let article = Article::new(url);
        let review = article_credrev::review(client, cfg, website_cache, registry, analyser, &article).await;
        article_reviews.push(review);
    }

    let sentence_reviews = if sentences.is_empty() {
        Vec::new()
    } else {
        agg_qsent_credrev::review_batch(client, cfg, website_cache, registry, &sentences).await
    };

    let mut all_reviews = article_reviews;
    all_reviews.extend(sentence_reviews);
    let aggregate = contentagg::aggregate(cfg, &all_reviews);

    let result = json!({
        "@context": CI_CONTEXT,
        "@type": "TweetCredReview",
        "additionalType": content::super_types(registry, &json!("TweetCredReview")),
        "itemReviewed": tweet_as_value(&normalised),
        "reviewAspect": "credibility",
        "reviewRating": aggregate.rating,
        "dateCreated": isodate::now_utc_timestamp(),
        "author": bot_info(registry),
        "isBasedOn": all_reviews,
    });
    content::with_identifier(registry, result)
}

fn tweet_as_value(tweet: &Tweet) -> Value {
    serde_json::to_value(tweet).unwrap_or_else(|_| json!({"@type": "Tweet", "tweetId": tweet.tweet_id}))
}
