// ABOUTME: Shared cookie jar partitioned into SSO and Connect application trust domains
// ABOUTME: Plugs into reqwest as its cookie provider and supports snapshot, restore, and clear
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use reqwest::header::HeaderValue;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};
use url::Url;

/// Cookie name to value, ordered by name so snapshots serialize deterministically
pub type CookieMap = BTreeMap<String, String>;

/// The two authentication domains sharing one jar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CookieDomain {
    /// SSO host cookies (`login_cookies` in a persisted session)
    Sso,
    /// Connect application host cookies (`session_cookies` in a persisted session)
    Application,
}

#[derive(Debug, Default)]
struct Partition {
    base_url: String,
    host: Option<(String, Option<u16>)>,
    cookies: CookieMap,
}

impl Partition {
    /// Length of the matched prefix if `url` lives below this partition's base URL
    fn prefix_match(&self, url: &str) -> Option<usize> {
        if self.base_url.is_empty() {
            return None;
        }
        let rest = url.strip_prefix(self.base_url.as_str())?;
        (rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
            .then_some(self.base_url.len())
    }

    fn host_match(&self, url: &Url) -> bool {
        self.host.as_ref().is_some_and(|(host, port)| {
            url.host_str() == Some(host.as_str()) && url.port_or_known_default() == *port
        })
    }
}

/// Cookie store shared by every request of one client
///
/// Each [`CookieDomain`] is bound to a base URL. Requests below that URL send
/// the partition's cookies and responses store into it; when no base URL
/// matches, a partition on the same host and port is used. URLs on unrelated
/// hosts neither send nor receive cookies.
#[derive(Debug, Default)]
pub struct CookieJar {
    partitions: RwLock<BTreeMap<CookieDomain, Partition>>,
}

impl CookieJar {
    /// Create an empty jar with no bound domains
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a domain to the base URL of the endpoint client that owns it
    pub fn bind(&self, domain: CookieDomain, base_url: &str) {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let host = Url::parse(&base_url).ok().and_then(|url| {
            url.host_str()
                .map(|host| (host.to_owned(), url.port_or_known_default()))
        });

        let mut partitions = self.write();
        let partition = partitions.entry(domain).or_default();
        partition.base_url = base_url;
        partition.host = host;
    }

    /// Copy of the cookies currently held for a domain
    #[must_use]
    pub fn snapshot(&self, domain: CookieDomain) -> CookieMap {
        self.read()
            .get(&domain)
            .map(|partition| partition.cookies.clone())
            .unwrap_or_default()
    }

    /// Insert saved cookies into a domain, overwriting same-named entries
    pub fn restore(&self, domain: CookieDomain, cookies: &CookieMap) {
        debug!(?domain, count = cookies.len(), "Restoring cookies for saved session");
        let mut partitions = self.write();
        let partition = partitions.entry(domain).or_default();
        for (name, value) in cookies {
            partition.cookies.insert(name.clone(), value.clone());
        }
    }

    /// Drop every cookie of a domain
    pub fn clear(&self, domain: CookieDomain) {
        if let Some(partition) = self.write().get_mut(&domain) {
            partition.cookies.clear();
        }
    }

    /// Number of cookies held for a domain
    #[must_use]
    pub fn len(&self, domain: CookieDomain) -> usize {
        self.read()
            .get(&domain)
            .map_or(0, |partition| partition.cookies.len())
    }

    /// True when a domain holds no cookies
    #[must_use]
    pub fn is_empty(&self, domain: CookieDomain) -> bool {
        self.len(domain) == 0
    }

    fn domain_for(partitions: &BTreeMap<CookieDomain, Partition>, url: &Url) -> Option<CookieDomain> {
        let url_str = url.as_str();
        partitions
            .iter()
            .filter_map(|(domain, partition)| {
                partition.prefix_match(url_str).map(|len| (len, *domain))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, domain)| domain)
            .or_else(|| {
                partitions
                    .iter()
                    .find(|(_, partition)| partition.host_match(url))
                    .map(|(domain, _)| *domain)
            })
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<CookieDomain, Partition>> {
        self.partitions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<CookieDomain, Partition>> {
        self.partitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parsed `Set-Cookie` header: name, value, and whether it deletes the cookie
fn parse_set_cookie(header: &str) -> Option<(String, String, bool)> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');

    let mut expired = value.is_empty();
    for attribute in parts {
        let Some((key, attr_value)) = attribute.split_once('=') else {
            continue;
        };
        let attr_value = attr_value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "max-age" => {
                if attr_value.parse::<i64>().is_ok_and(|secs| secs <= 0) {
                    expired = true;
                }
            }
            "expires" => {
                if parse_cookie_date(attr_value).is_some_and(|at| at <= Utc::now()) {
                    expired = true;
                }
            }
            _ => {}
        }
    }

    Some((name.to_owned(), value.to_owned(), expired))
}

/// Cookie dates come as RFC 1123 or with dashes (`01-Jan-1970`)
fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc2822(&value.replace('-', " ")))
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let mut partitions = self.write();
        let Some(domain) = Self::domain_for(&partitions, url) else {
            trace!(%url, "Ignoring cookies from unbound host");
            return;
        };
        let Some(partition) = partitions.get_mut(&domain) else {
            return;
        };

        for header in cookie_headers {
            let Some((name, value, expired)) =
                header.to_str().ok().and_then(parse_set_cookie)
            else {
                continue;
            };
            if expired {
                trace!(?domain, cookie = %name, "Cookie removed by server");
                partition.cookies.remove(&name);
            } else {
                trace!(?domain, cookie = %name, "Cookie stored");
                partition.cookies.insert(name, value);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let partitions = self.read();
        let domain = Self::domain_for(&partitions, url)?;
        let partition = partitions.get(&domain)?;
        if partition.cookies.is_empty() {
            return None;
        }

        let header = partition
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;

    fn bound_jar() -> CookieJar {
        let jar = CookieJar::new();
        jar.bind(CookieDomain::Sso, "http://127.0.0.1:8080/sso");
        jar.bind(CookieDomain::Application, "http://127.0.0.1:8080/modern/");
        jar
    }

    fn store(jar: &CookieJar, url: &str, headers: &[&str]) {
        let values: Vec<HeaderValue> = headers
            .iter()
            .map(|h| HeaderValue::from_str(h).unwrap())
            .collect();
        jar.set_cookies(&mut values.iter(), &Url::parse(url).unwrap());
    }

    #[test]
    fn test_responses_land_in_their_own_domain() {
        let jar = bound_jar();
        store(&jar, "http://127.0.0.1:8080/sso/signin?x=1", &["CASTGC=tgt; Path=/; Secure"]);
        store(&jar, "http://127.0.0.1:8080/modern/?ticket=ST-1", &["SESSIONID=abc; HttpOnly"]);

        assert_eq!(jar.snapshot(CookieDomain::Sso).get("CASTGC").unwrap(), "tgt");
        assert_eq!(
            jar.snapshot(CookieDomain::Application).get("SESSIONID").unwrap(),
            "abc"
        );
        assert_eq!(jar.len(CookieDomain::Sso), 1);
        assert_eq!(jar.len(CookieDomain::Application), 1);
    }

    #[test]
    fn test_request_header_only_carries_matching_domain() {
        let jar = bound_jar();
        let mut sso = CookieMap::new();
        sso.insert("CASTGC".into(), "tgt".into());
        let mut app = CookieMap::new();
        app.insert("SESSIONID".into(), "abc".into());
        app.insert("JWT".into(), "jwt".into());
        jar.restore(CookieDomain::Sso, &sso);
        jar.restore(CookieDomain::Application, &app);

        let header = jar
            .cookies(&Url::parse("http://127.0.0.1:8080/modern/proxy/x").unwrap())
            .unwrap();
        assert_eq!(header.to_str().unwrap(), "JWT=jwt; SESSIONID=abc");

        let header = jar
            .cookies(&Url::parse("http://127.0.0.1:8080/sso/login").unwrap())
            .unwrap();
        assert_eq!(header.to_str().unwrap(), "CASTGC=tgt");
    }

    #[test]
    fn test_prefix_requires_segment_boundary() {
        let partition = Partition {
            base_url: "http://127.0.0.1:8080/sso".into(),
            host: None,
            cookies: CookieMap::new(),
        };
        assert!(partition.prefix_match("http://127.0.0.1:8080/sso").is_some());
        assert!(partition.prefix_match("http://127.0.0.1:8080/sso/login").is_some());
        assert!(partition.prefix_match("http://127.0.0.1:8080/sso?x=1").is_some());
        assert!(partition.prefix_match("http://127.0.0.1:8080/ssox").is_none());
    }

    #[test]
    fn test_host_fallback_for_paths_outside_base() {
        let jar = bound_jar();
        store(&jar, "http://127.0.0.1:8080/en-US/signin", &["LANG=en"]);
        // Sso sorts first among partitions on the same host
        assert_eq!(jar.len(CookieDomain::Sso), 1);

        let other = Url::parse("http://elsewhere.test/sso/login").unwrap();
        assert!(jar.cookies(&other).is_none());
    }

    #[test]
    fn test_expired_cookie_is_removed() {
        let jar = bound_jar();
        store(&jar, "http://127.0.0.1:8080/sso/signin", &["GARMIN-SSO=1"]);
        assert_eq!(jar.len(CookieDomain::Sso), 1);

        store(
            &jar,
            "http://127.0.0.1:8080/sso/signin",
            &["GARMIN-SSO=gone; Expires=Thu, 01-Jan-1970 00:00:00 GMT"],
        );
        assert!(jar.is_empty(CookieDomain::Sso));

        store(&jar, "http://127.0.0.1:8080/sso/signin", &["A=1", "A=x; Max-Age=0"]);
        assert!(jar.is_empty(CookieDomain::Sso));
    }

    #[test]
    fn test_clear_is_per_domain() {
        let jar = bound_jar();
        store(&jar, "http://127.0.0.1:8080/sso/signin", &["A=1"]);
        store(&jar, "http://127.0.0.1:8080/modern/", &["B=2"]);

        jar.clear(CookieDomain::Sso);
        assert!(jar.is_empty(CookieDomain::Sso));
        assert_eq!(jar.len(CookieDomain::Application), 1);
    }

    #[test]
    fn test_unbound_hosts_are_ignored() {
        let jar = bound_jar();
        store(&jar, "https://tracker.example.com/pixel", &["T=1"]);
        assert!(jar.is_empty(CookieDomain::Sso));
        assert!(jar.is_empty(CookieDomain::Application));
    }

    #[test]
    fn test_parse_set_cookie_attributes() {
        assert_eq!(
            parse_set_cookie("SESSION=\"abc\"; Path=/; Max-Age=3600"),
            Some(("SESSION".into(), "abc".into(), false))
        );
        assert_eq!(
            parse_set_cookie("SESSION=abc; max-age=0"),
            Some(("SESSION".into(), "abc".into(), true))
        );
        assert_eq!(parse_set_cookie("garbage"), None);
    }
}
