//! Process-wide, initialise-once table of type descriptors.
//!
//! Every `@type` the identity/normalisation engine needs to walk is
//! registered once, at start-up, with its identity fields, URL route
//! template and reference-field list. This stands in for a dynamic,
//! mutate-at-import registry: the table is built by [`Registry::bootstrap`]
//! and handed around as a read-only value from then on.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Everything the identity engine needs to know about one registered type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub super_types: Vec<String>,
    pub ident_keys: Vec<String>,
    pub route_template: Option<String>,
    pub itemref_keys: Vec<String>,
}

/// Types that never get an `identifier` assigned by [`crate::itnorm::ensure_ident`].
pub const NO_IDENT_TYPES: &[&str] = &[
    "MediaObject",
    "Timing",
    "schema:Language",
    "Thing",
    "schema:CreativeWork",
    "CreativeWork",
    "nif:String",
    "schema:Rating",
    "schema:ClaimReview",
    "ClaimReview",
];

/// Types that never get a `url` assigned by [`crate::itnorm::ensure_url`] —
/// the identifier whitelist plus `Dataset` and `SentencePair`.
pub fn no_url_types() -> Vec<&'static str> {
    let mut v = NO_IDENT_TYPES.to_vec();
    v.push("Dataset");
    v.push("SentencePair");
    v
}

#[derive(Debug, Default)]
pub struct Registry {
    types: HashMap<String, TypeDescriptor>,
}

impl Registry {
    fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Register a type. Re-registering the same type name is a hard error.
    pub fn register(&mut self, name: &str, descriptor: TypeDescriptor) -> Result<()> {
        if self.types.contains_key(name) {
            return Err(Error::Registry(format!(
                "type already registered: {name}"
            )));
        }
        self.types.insert(name.to_string(), descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// `super_types` for an unregistered type is not a hard error — only a
    /// warning, since classification queries are best-effort.
    pub fn super_types(&self, name: &str) -> Vec<String> {
        match self.types.get(name) {
            Some(d) => d.super_types.clone(),
            None => {
                tracing::warn!("[acred:registry] super_types requested for unregistered type {name}");
                Vec::new()
            }
        }
    }

    pub fn ident_keys(&self, name: &str) -> Result<&[String]> {
        self.types
            .get(name)
            .map(|d| d.ident_keys.as_slice())
            .ok_or_else(|| Error::Registry(format!("unregistered type: {name}")))
    }

    pub fn route_template(&self, name: &str) -> Result<Option<&str>> {
        self.types
            .get(name)
            .map(|d| d.route_template.as_deref())
            .ok_or_else(|| Error::Registry(format!("unregistered type: {name}")))
    }

    pub fn itemref_keys(&self, name: &str) -> Result<&[String]> {
        self.types
            .get(name)
            .map(|d| d.itemref_keys.as_slice())
            .ok_or_else(|| Error::Registry(format!("unregistered type: {name}")))
    }

    /// Same as [`Self::itemref_keys`] but only warns (rather than errors) on
    /// an unregistered type, for use by link-extraction code that should
    /// skip unknown types instead of aborting the whole graph projection.
    pub fn itemref_keys_lenient(&self, name: &str) -> Vec<String> {
        match self.types.get(name) {
            Some(d) => d.itemref_keys.clone(),
            None => {
                tracing::warn!("[acred:registry] itemref_keys requested for unregistered type {name}, skipping");
                Vec::new()
            }
        }
    }

    /// Build the full descriptor table used by the credibility pipeline.
    pub fn bootstrap() -> Result<Self> {
        let mut r = Self::new();
        let d = |super_types: &[&str], ident_keys: &[&str], route: Option<&str>, refs: &[&str]| {
            TypeDescriptor {
                super_types: super_types.iter().map(|s| s.to_string()).collect(),
                ident_keys: ident_keys.iter().map(|s| s.to_string()).collect(),
                route_template: route.map(|s| s.to_string()),
                itemref_keys: refs.iter().map(|s| s.to_string()).collect(),
            }
        };

        r.register(
            "Rating",
            d(&[], &["reviewAspect", "ratingValue", "confidence"], None, &[]),
        )?;
        r.register(
            "AggregateRating",
            d(
                &["Rating"],
                &["reviewAspect", "ratingValue", "confidence", "ratingCount", "reviewCount"],
                None,
                &[],
            ),
        )?;
        r.register(
            "WebPage",
            d(&[], &["url"], Some("/webpage/{identifier}"), &["claims_content"]),
        )?;
        r.register(
            "Article",
            d(
                &["WebPage"],
                &["url"],
                Some("/article/{identifier}"),
                &["claims_content"],
            ),
        )?;
        r.register(
            "Sentence",
            d(&[], &["text"], Some("/sentence/{identifier}"), &[]),
        )?;
        r.register(
            "Claim",
            d(&["Sentence"], &["text"], Some("/claim/{identifier}"), &[]),
        )?;
        r.register("Organization", d(&[], &["name", "url"], None, &[]))?;
        r.register("Person", d(&[], &["name", "url"], None, &[]))?;
        r.register("schema:Organization", d(&["Organization"], &["name", "url"], None, &[]))?;
        r.register("WebSite", d(&[], &["url"], Some("/website/{identifier}"), &[]))?;
        r.register("schema:ClaimReview", d(&[], &["url"], None, &[]))?;
        r.register(
            "SentencePair",
            d(&[], &["@type", "text"], None, &["sentA", "sentB"]),
        )?;
        r.register(
            "SentenceEncoder",
            d(
                &["SoftwareApplication", "Bot"],
                &["@type", "name", "dateCreated", "softwareVersion", "author", "launchConfiguration"],
                Some("/bot/{@type}/{softwareVersion}/{identifier}"),
                &["author"],
            ),
        )?;

        // Every `*Reviewer`/`*Normalizer` bot type shares the same identity
        // shape: a SoftwareApplication/Bot keyed by its name, creation date,
        // version and the sub-bots (`isBasedOn`) and parameters
        // (`launchConfiguration`) it was built with.
        let bot = |ident_keys: &[&str]| {
            d(
                &["SoftwareApplication", "Bot"],
                ident_keys,
                Some("/bot/{@type}/{softwareVersion}/{identifier}"),
                &["isBasedOn"],
            )
        };
        let bot_ident_keys: &[&str] = &[
            "@type",
            "name",
            "dateCreated",
            "softwareVersion",
            "isBasedOn",
            "launchConfiguration",
        ];
        for bot_type in [
            "SemSentSimReviewer",
            "SentStanceReviewer",
            "SentPolarSimilarityReviewer",
            "ClaimReviewNormalizer",
            "SentCheckWorthinessReviewer",
            "WebSiteCredReviewer",
            "DBSentCredReviewer",
            "QSentCredReviewer",
            "AggQSentCredReviewer",
            "ArticleCredReviewer",
            "TweetCredReviewer",
        ] {
            r.register(bot_type, bot(bot_ident_keys))?;
        }

        // Every `*Review` shares the same identity shape: what reviewed
        // what, with what rating, published by whom and when.
        let review = |ident_keys: &[&str]| {
            d(
                &["CredibilityReview", "Review"],
                ident_keys,
                Some("/review/{identifier}"),
                &["author", "itemReviewed", "reviewRating"],
            )
        };
        let leaf_ident_keys: &[&str] =
            &["@type", "dateCreated", "author", "itemReviewed", "reviewRating"];
        for review_type in [
            "SentSimilarityReview",
            "SentStanceReview",
            "SentPolarSimilarityReview",
            "NormalisedClaimReview",
            "SentCheckWorthinessReview",
            "WebSiteCredReview",
            "DBSentCredReview",
            "QSentCredReview",
        ] {
            r.register(review_type, review(leaf_ident_keys))?;
        }
        let agg_ident_keys: &[&str] = &[
            "@type",
            "dateCreated",
            "author",
            "itemReviewed",
            "reviewRating",
            "isBasedOn",
        ];
        for review_type in ["AggQSentCredReview", "ArticleCredReview", "TweetCredReview"] {
            r.register(review_type, review(agg_ident_keys))?;
        }

        Ok(r)
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Shared, process-wide, read-only handle — populated lazily on first use.
pub fn shared() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry::bootstrap().expect("static type table is self-consistent"))
}
