//! URL construction for API calls.
//!
//! Every endpoint URL is `base + fragment + "?" + query`. The trailing `?` is
//! kept even when there are no parameters; the gateway ignores it.

use std::fmt::Display;
use ::url::form_urlencoded;

/// Ordered multimap of query parameters.
///
/// Keys may repeat (`user_ids=a&user_ids=b`) and keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value for `key`.
    pub fn push(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Append every value of `values` under the same `key`.
    pub fn push_all<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        for value in values {
            self.push(key, value);
        }
        self
    }

    /// Append `value` only when present.
    pub fn push_opt<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.push(key, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// Join a base URL, an endpoint fragment and a query string.
///
/// Keys and values are form-url-encoded. With no parameters the result ends
/// in a bare `?`; otherwise it never ends in `&`.
pub fn build_full_url(base: &str, fragment: &str, query: &QueryParams) -> String {
    let mut url = String::with_capacity(base.len() + fragment.len() + 1 + query.len() * 16);
    url.push_str(base);
    url.push_str(fragment);
    url.push('?');

    for (key, value) in query.iter() {
        url.extend(form_urlencoded::byte_serialize(key.as_bytes()));
        url.push('=');
        url.extend(form_urlencoded::byte_serialize(value.as_bytes()));
        url.push('&');
    }

    if url.ends_with('&') {
        url.pop();
    }
    url
}

/// Percent-encode a value for substitution into a path template.
pub fn encode_path_segment(segment: &str) -> String {
    // byte_serialize escapes a literal '+' as %2B, so any '+' left is a space.
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_keeps_question_mark() {
        let url = build_full_url("https://host", "/v2/account", &QueryParams::new());
        assert_eq!(url, "https://host/v2/account?");
    }

    #[test]
    fn test_repeated_keys() {
        let mut q = QueryParams::new();
        q.push_all("ids", ["a", "b"]);
        let url = build_full_url("https://host", "/v2/friend", &q);
        assert_eq!(url, "https://host/v2/friend?ids=a&ids=b");
    }

    #[test]
    fn test_keys_and_values_are_encoded() {
        let mut q = QueryParams::new();
        q.push("user name", "a&b=c");
        q.push("label", "{\"mode\":\"ffa\"}");
        let url = build_full_url("http://h", "/p", &q);
        assert_eq!(
            url,
            "http://h/p?user+name=a%26b%3Dc&label=%7B%22mode%22%3A%22ffa%22%7D"
        );
    }

    #[test]
    fn test_never_ends_with_ampersand() {
        let mut q = QueryParams::new();
        q.push("limit", 10).push("cursor", "").push_opt::<u32>("state", None);
        let url = build_full_url("http://h", "/v2/group", &q);
        assert!(url.starts_with("http://h/v2/group?"));
        assert!(!url.ends_with('&'));
        assert_eq!(url, "http://h/v2/group?limit=10&cursor=");
    }

    #[test]
    fn test_each_pair_appears_once_per_value() {
        let q: QueryParams = [("user_ids", "x"), ("user_ids", "y"), ("other", "x")]
            .into_iter()
            .collect();
        let url = build_full_url("http://h", "/g", &q);
        assert_eq!(url.matches("user_ids=x").count(), 1);
        assert_eq!(url.matches("user_ids=y").count(), 1);
        assert_eq!(url.matches("other=x").count(), 1);
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("weekly top"), "weekly%20top");
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
        assert_eq!(encode_path_segment("c++"), "c%2B%2B");
        assert_eq!(encode_path_segment("plain-id_01"), "plain-id_01");
    }
}
