//! Request header assembly.
//!
//! Callers hand extra headers over in whatever shape they already hold: a
//! plain map, a list of pairs, or a native `HeaderMap`. All of them are merged
//! on top of the JSON content-type default; none are dropped.

#[cfg(test)]
#[path = "headers_test.rs"]
mod headers_test;

use std::collections::{BTreeMap, HashMap, HashSet};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use super::error::ApiError;

/// Caller-supplied headers in any of the accepted shapes.
#[derive(Debug, Clone)]
pub enum HeaderSource {
    Map(BTreeMap<String, String>),
    Pairs(Vec<(String, String)>),
    Native(HeaderMap),
}

impl From<BTreeMap<String, String>> for HeaderSource {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::Map(map)
    }
}

impl From<HashMap<String, String>> for HeaderSource {
    fn from(map: HashMap<String, String>) -> Self {
        Self::Map(map.into_iter().collect())
    }
}

impl From<Vec<(String, String)>> for HeaderSource {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Pairs(pairs)
    }
}

impl From<&[(&str, &str)]> for HeaderSource {
    fn from(pairs: &[(&str, &str)]) -> Self {
        Self::Pairs(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
    }
}

impl From<HeaderMap> for HeaderSource {
    fn from(map: HeaderMap) -> Self {
        Self::Native(map)
    }
}

impl HeaderSource {
    /// Convert to a `HeaderMap`, keeping repeated names as repeated values.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHeader`] for a name or value that is not valid HTTP.
    pub fn to_header_map(&self) -> Result<HeaderMap, ApiError> {
        match self {
            Self::Native(map) => Ok(map.clone()),
            Self::Map(map) => collect_pairs(map.iter()),
            Self::Pairs(pairs) => collect_pairs(pairs.iter().map(|(k, v)| (k, v))),
        }
    }
}

fn collect_pairs<'a>(pairs: impl Iterator<Item = (&'a String, &'a String)>) -> Result<HeaderMap, ApiError> {
    let mut out = HeaderMap::new();
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidHeader(format!("{}: {e}", name.as_str())))?;
        out.append(name, value);
    }
    Ok(out)
}

/// Final header set for one request.
///
/// Order of precedence: JSON content-type default, then caller headers (a
/// caller header replaces a default of the same name), then the bearer token
/// when one is present.
///
/// # Errors
///
/// Returns [`ApiError::InvalidHeader`] if caller headers or the token are not valid HTTP.
pub fn build_headers(token: Option<&str>, extra: Option<&HeaderSource>) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(extra) = extra {
        let mut replaced: HashSet<HeaderName> = HashSet::new();
        for (name, value) in &extra.to_header_map()? {
            if replaced.insert(name.clone()) {
                headers.insert(name.clone(), value.clone());
            } else {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ApiError::InvalidHeader(format!("authorization: {e}")))?;
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
