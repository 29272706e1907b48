//! Role resolution from URL query state.
//!
//! The query contract: `?role=frontend|backend` or the legacy bare flags
//! `?frontend` / `?backend` select a role page; anything else (no query,
//! unrelated parameters, malformed input) falls back to the default
//! full-stack page. Resolution is a pure function of the query string and
//! can never fail.
//!
//! Frontend signals are checked before backend signals, so mixed input
//! like `?frontend&backend` resolves deterministically to frontend.
//!
//! This module also owns `application/x-www-form-urlencoded` decoding,
//! shared by query parsing and the contact form body parser.

use std::borrow::Cow;

use crate::content::RoleKey;

/// Decode one URL component: `+` means space, percent sequences decode,
/// undecodable input passes through unchanged.
fn decode_component(raw: &str) -> String {
    let plussed = raw.replace('+', " ");
    match urlencoding::decode(&plussed) {
        Ok(Cow::Borrowed(_)) => plussed,
        Ok(Cow::Owned(decoded)) => decoded,
        Err(_) => plussed,
    }
}

/// Parsed query parameters, in source order.
///
/// A pair without `=` is a bare flag and carries no value.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    /// Parse a query string. A leading `?` is tolerated; empty segments
    /// are skipped.
    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let pairs = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (decode_component(key), Some(decode_component(value))),
                None => (decode_component(segment), None),
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self { pairs }
    }

    /// First value for `name`, if that pair has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Whether `name` appears at all, with or without a value.
    pub fn has(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The outcome of role resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub key: RoleKey,
    /// True when the query explicitly selected a non-default role.
    pub is_custom: bool,
}

/// Resolve a role from a raw query string. Total: every input maps to a
/// role, with `fullstack` as the fallback.
pub fn resolve_role(query: &str) -> Resolution {
    resolve_params(&QueryParams::parse(query))
}

/// Resolve a role from already-parsed parameters.
pub fn resolve_params(params: &QueryParams) -> Resolution {
    let key = if params.get("role") == Some("frontend") || params.has("frontend") {
        RoleKey::Frontend
    } else if params.get("role") == Some("backend") || params.has("backend") {
        RoleKey::Backend
    } else {
        RoleKey::Fullstack
    };
    Resolution {
        key,
        is_custom: !key.is_default(),
    }
}

/// Parse an `application/x-www-form-urlencoded` body into ordered pairs.
/// Bare keys decode to an empty value.
pub fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(segment), String::new()),
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
