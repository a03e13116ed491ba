//! Credibility-pipeline reviewers (§4.2, §4.3, §4.6, §4.8–§4.12), dependency
//! order leaves-first.

pub mod agg_qsent_credrev;
pub mod article_credrev;
pub mod claimreview_normalizer;
pub mod contentagg;
pub mod dbsent_credrev;
pub mod label;
pub mod qsent_credrev;
pub mod tweet_credrev;
pub mod website_credrev;
