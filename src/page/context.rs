//! Per-request data read by the page visitors.

use crate::config::{ProfileConfig, SocialLink};
use crate::links::LinkCollection;

/// Resolved links plus the fixed profile values for one page render.
#[derive(Debug, Clone)]
pub struct TransformContext {
    pub links: LinkCollection,
    pub display_name: String,
    pub page_title: String,
    pub avatar_url: String,
    pub body_class: String,
    pub social: Vec<SocialLink>,
}

impl TransformContext {
    pub fn new(links: LinkCollection, profile: &ProfileConfig) -> Self {
        Self {
            links,
            display_name: profile.display_name.clone(),
            page_title: profile.page_title.clone(),
            avatar_url: profile.avatar_url.clone(),
            body_class: profile.body_class.clone(),
            social: profile.social.clone(),
        }
    }
}
