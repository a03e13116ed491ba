//! acred — a hierarchical pipeline of reviewers that assess the credibility
//! of claims, articles, tweets and web sites, producing signed,
//! content-addressable `Review` items.

pub mod bot_describer;
pub mod cli;
pub mod config;
pub mod content;
pub mod dictu;
pub mod error;
pub mod hashu;
pub mod isodate;
pub mod itnorm;
pub mod model;
pub mod registry;
pub mod reviewer;
pub mod sentsplit;
pub mod services;
