pub mod credibility;
pub mod factcheckability;
pub mod similarity;
pub mod stance;
pub mod support;
