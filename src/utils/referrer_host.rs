//! Host extraction for referrer reputation checks.

use url::{Host, Url};

/// Extracts the lowercase host from a referrer or registry entry.
///
/// Accepts full URLs (`https://Sub.Example.com/path`) as well as bare hosts
/// (`example.com`, `example.com:8080`). A trailing dot is removed. Returns
/// `None` when no host can be found.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_host("HTTPS://Example.COM/a?b=c").as_deref(), Some("example.com"));
/// assert_eq!(extract_host("known-bad.tld").as_deref(), Some("known-bad.tld"));
/// ```
pub fn extract_host(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let url = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url,
        _ => Url::parse(&format!("http://{}", trimmed)).ok()?,
    };

    let host = match url.host()? {
        Host::Domain(domain) => domain.trim_end_matches('.').to_ascii_lowercase(),
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    };

    if host.is_empty() { None } else { Some(host) }
}

/// Returns the host and each of its parent domains, most specific first.
///
/// IP literals produce only themselves.
///
/// ```ignore
/// assert_eq!(host_candidates("a.b.tld"), vec!["a.b.tld", "b.tld", "tld"]);
/// ```
pub fn host_candidates(host: &str) -> Vec<String> {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return vec![host.to_string()];
    }

    let mut candidates = Vec::new();
    let mut rest = host;
    loop {
        if !rest.is_empty() {
            candidates.push(rest.to_string());
        }
        match rest.split_once('.') {
            Some((_, parent)) => rest = parent,
            None => break,
        }
    }
    candidates
}
