//! `Link` header parsing

use super::types::{LinkProblem, PagedLink, PagedResource};
use crate::error::{Error, Result};
use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

/// Regex for one link entry: <url>; rel="name"
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]*)>\s*;\s*rel="([^"]*)""#).unwrap());

const REQUIRED_RELATIONS: [&str; 3] = ["current", "first", "last"];
const OPTIONAL_RELATIONS: [&str; 2] = ["next", "prev"];

/// Build a [`PagedResource`] from the `Link` headers of a response
///
/// Multiple `Link` header lines are treated as one comma-separated list.
pub fn extract_paged_resource(headers: &HeaderMap) -> Result<PagedResource> {
    // Non-ASCII bytes stay in so a bad link is reported under its own rel
    let value = headers
        .get_all(LINK)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .collect::<Vec<_>>()
        .join(", ");

    parse_link_header(&value)
}

/// Parse a `Link` header value into a [`PagedResource`]
///
/// Every missing or unparseable relation is reported, not just the first.
/// Unknown relation names are ignored; if a relation repeats, the first
/// occurrence wins.
pub fn parse_link_header(header: &str) -> Result<PagedResource> {
    let mut links: HashMap<&str, PagedLink> = HashMap::new();
    let mut problems = Vec::new();

    for caps in LINK_REGEX.captures_iter(header) {
        let (Some(url), Some(rel)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let rel = rel.as_str();
        if !is_known_relation(rel) || links.contains_key(rel) {
            continue;
        }

        match parse_link(url.as_str()) {
            Ok(link) => {
                links.insert(rel, link);
            }
            Err(reason) => problems.push(LinkProblem::malformed(rel, reason)),
        }
    }

    for rel in REQUIRED_RELATIONS {
        if !links.contains_key(rel) && !problems.iter().any(|p| p.rel == rel) {
            problems.push(LinkProblem::missing(rel));
        }
    }

    match (
        links.remove("current"),
        links.remove("first"),
        links.remove("last"),
    ) {
        (Some(current), Some(first), Some(last)) if problems.is_empty() => Ok(PagedResource {
            current,
            first,
            last,
            next: links.remove("next"),
            prev: links.remove("prev"),
        }),
        _ => Err(Error::Pagination { problems }),
    }
}

fn is_known_relation(rel: &str) -> bool {
    REQUIRED_RELATIONS.contains(&rel) || OPTIONAL_RELATIONS.contains(&rel)
}

/// Parse one link URL and its `page` parameter
fn parse_link(raw: &str) -> std::result::Result<PagedLink, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL '{raw}': {e}"))?;

    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| format!("no page parameter in '{raw}'"))?;

    let page = page
        .parse::<u32>()
        .map_err(|_| format!("non-numeric page '{page}' in '{raw}'"))?;

    Ok(PagedLink { url, page })
}
