//! Header lookups for client identification behind proxies.

use axum::http::HeaderMap;

/// Header value as trimmed `&str`, ignoring empty and non-UTF-8 values.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// First hop of `x-forwarded-for`.
pub fn forwarded_for(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Client address used for rate-limit keys: `x-forwarded-for`, then `x-real-ip`.
pub fn rate_limit_ip(headers: &HeaderMap) -> String {
    forwarded_for(headers)
        .or_else(|| header_str(headers, "x-real-ip"))
        .unwrap_or("unknown")
        .to_string()
}

/// Client address recorded with request metrics: the CDN header wins.
pub fn metrics_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "cf-connecting-ip")
        .or_else(|| header_str(headers, "x-real-ip"))
        .or_else(|| forwarded_for(headers))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        assert_eq!(forwarded_for(&h), Some("203.0.113.7"));
        assert_eq!(rate_limit_ip(&h), "203.0.113.7");
    }

    #[test]
    fn rate_limit_ip_falls_back() {
        assert_eq!(rate_limit_ip(&headers(&[("x-real-ip", "198.51.100.2")])), "198.51.100.2");
        assert_eq!(rate_limit_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn metrics_ip_prefers_cdn_header() {
        let h = headers(&[
            ("x-forwarded-for", "203.0.113.7"),
            ("x-real-ip", "198.51.100.2"),
            ("cf-connecting-ip", "192.0.2.1"),
        ]);
        assert_eq!(metrics_ip(&h).as_deref(), Some("192.0.2.1"));
        assert_eq!(metrics_ip(&HeaderMap::new()), None);
    }
}
