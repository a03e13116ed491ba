//! Concrete, `serde`-derived domain types for ratings, reviews and the
//! items they review. These sit above the generic [`crate::itnorm`] tree
//! representation: aggregation math and reviewer logic work with these
//! typed structs, converting to [`serde_json::Value`] only at the
//! identity-engine boundary (via `serde_json::to_value`/`from_value`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(rename = "@type")]
    pub type_: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// A single rating on a named aspect, always carrying a confidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(rename = "@type")]
    pub type_: String,
    pub review_aspect: String,
    pub rating_value: f64,
    pub confidence: f64,
    pub rating_explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,
}

impl Rating {
    pub fn new(aspect: &str, value: f64, confidence: f64, explanation: impl Into<String>) -> Self {
        Self {
            type_: "Rating".to_string(),
            review_aspect: aspect.to_string(),
            rating_value: value,
            confidence,
            rating_explanation: explanation.into(),
            best_rating: None,
            worst_rating: None,
            alternate_name: None,
        }
    }
}

/// A rating that summarises one or more underlying ratings/reviews.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    #[serde(flatten)]
    pub rating: Rating,
    pub rating_count: u32,
    pub review_count: u32,
}

impl AggregateRating {
    pub fn new(
        aspect: &str,
        value: f64,
        confidence: f64,
        explanation: impl Into<String>,
        rating_count: u32,
        review_count: u32,
    ) -> Self {
        let mut rating = Rating::new(aspect, value, confidence, explanation);
        rating.type_ = "AggregateRating".to_string();
        Self {
            rating,
            rating_count,
            review_count,
        }
    }

    pub fn rating_value(&self) -> f64 {
        self.rating.rating_value
    }

    pub fn confidence(&self) -> f64 {
        self.rating.confidence
    }
}

/// Common review shape. Generic over the rating type it carries (plain
/// [`Rating`] for leaf reviews, [`AggregateRating`] for anything that
/// summarises sub-reviews).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review<R> {
    #[serde(rename = "@type")]
    pub type_: String,
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub review_aspect: String,
    pub item_reviewed: Value,
    pub review_rating: R,
    pub author: Value,
    pub date_created: String,
    pub is_based_on: Vec<Value>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
}

impl<R> Review<R> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_: &str,
        aspect: &str,
        item_reviewed: Value,
        review_rating: R,
        author: Value,
        date_created: String,
        is_based_on: Vec<Value>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            type_: type_.to_string(),
            context: Some("http://coinform.eu".to_string()),
            identifier: None,
            review_aspect: aspect.to_string(),
            item_reviewed,
            review_rating,
            author,
            date_created,
            is_based_on,
            text: text.into(),
            headline: None,
        }
    }
}

/// A `*Reviewer` bot item — the `author` of every [`Review`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerBot {
    #[serde(rename = "@type")]
    pub type_: String,
    pub name: String,
    pub software_version: String,
    pub date_created: String,
    pub is_based_on: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_configuration: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    #[serde(rename = "@type")]
    pub type_: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub appearance: Vec<Value>,
}

impl Sentence {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            type_: "Sentence".to_string(),
            text: text.into(),
            identifier: None,
            appearance: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebSite {
    #[serde(rename = "@type")]
    pub type_: String,
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl WebSite {
    pub fn new(url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            type_: "WebSite".to_string(),
            url: url.into(),
            name: domain.into(),
            identifier: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "@type")]
    pub type_: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub claims_content: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Article {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            type_: "Article".to_string(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn is_analysed(&self) -> bool {
        self.content.is_some() && !self.claims_content.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TweetUrl {
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    #[serde(rename = "@type")]
    pub type_: String,
    pub tweet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<TweetUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Tweet {
    pub fn new(tweet_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            type_: "Tweet".to_string(),
            tweet_id: tweet_id.into(),
            content: Some(content.into()),
            ..Default::default()
        }
    }
}
