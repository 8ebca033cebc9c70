// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TourAPI request URL construction.

/// Read-only TourAPI operations used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AreaCode,
    AreaBasedList,
    SearchKeyword,
    DetailCommon,
    DetailIntro,
    DetailImage,
}

impl Endpoint {
    /// Path segment under the service base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::AreaCode => "areaCode1",
            Endpoint::AreaBasedList => "areaBasedList1",
            Endpoint::SearchKeyword => "searchKeyword1",
            Endpoint::DetailCommon => "detailCommon1",
            Endpoint::DetailIntro => "detailIntro1",
            Endpoint::DetailImage => "detailImage1",
        }
    }
}

/// Caller-supplied query parameters. `None` values are dropped.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pairs: Vec<(&'static str, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn set(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Add a parameter only if it has a value.
    pub fn opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| *k == key)
    }
}

/// Builds complete TourAPI URLs with credentials and default parameters.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    service_key: String,
    mobile_os: String,
    mobile_app: String,
}

impl RequestBuilder {
    pub fn new(base_url: &str, service_key: &str, mobile_os: &str, mobile_app: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: normalize_service_key(service_key),
            mobile_os: mobile_os.to_string(),
            mobile_app: mobile_app.to_string(),
        }
    }

    /// Query string: service key, then defaults, then caller parameters.
    ///
    /// A caller parameter with the same name as a default replaces it.
    pub fn query(&self, params: &Params) -> String {
        let defaults = [
            ("MobileOS", self.mobile_os.as_str()),
            ("MobileApp", self.mobile_app.as_str()),
            ("_type", "json"),
        ];

        let mut parts = vec![encode_pair("serviceKey", &self.service_key)];
        parts.extend(
            defaults
                .iter()
                .filter(|(key, _)| !params.contains(key))
                .map(|(key, value)| encode_pair(key, value)),
        );
        parts.extend(params.pairs.iter().map(|(key, value)| encode_pair(key, value)));

        parts.join("&")
    }

    /// Full URL for an endpoint.
    pub fn url(&self, endpoint: Endpoint, params: &Params) -> String {
        format!(
            "{}/{}?{}",
            self.base_url,
            endpoint.path(),
            self.query(params)
        )
    }
}

fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", key, urlencoding::encode(value))
}

/// data.go.kr hands out both a raw and a percent-encoded form of each key;
/// accept either by decoding the encoded form once.
fn normalize_service_key(key: &str) -> String {
    let key = key.trim();
    if key.contains('%') {
        if let Ok(decoded) = urlencoding::decode(key) {
            return decoded.into_owned();
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::new("https://apis.example/KorService1/", "k+y/=", "ETC", "tourmark")
    }

    #[test]
    fn test_defaults_and_credentials() {
        let query = builder().query(&Params::new());
        assert_eq!(
            query,
            "serviceKey=k%2By%2F%3D&MobileOS=ETC&MobileApp=tourmark&_type=json"
        );
    }

    #[test]
    fn test_missing_values_are_omitted() {
        let area: Option<String> = None;
        let content_type: Option<&str> = None;
        let query = builder().query(
            &Params::new()
                .set("keyword", "경복궁")
                .opt("areaCode", area)
                .opt("contentTypeId", content_type),
        );

        assert!(query.contains("keyword=%EA%B2%BD%EB%B3%B5%EA%B6%81"));
        assert!(!query.contains("areaCode"));
        assert!(!query.contains("contentTypeId"));
        assert!(!query.contains("undefined"));
        assert!(!query.contains("None"));
    }

    #[test]
    fn test_caller_overrides_default() {
        let query = builder().query(&Params::new().set("MobileOS", "AND"));
        assert!(query.contains("MobileOS=AND"));
        assert!(!query.contains("MobileOS=ETC"));
    }

    #[test]
    fn test_url_layout() {
        let url = builder().url(Endpoint::DetailImage, &Params::new().set("contentId", 126508));
        assert!(url.starts_with("https://apis.example/KorService1/detailImage1?serviceKey="));
        assert!(url.ends_with("&contentId=126508"));
    }

    #[test]
    fn test_encoded_service_key_is_accepted() {
        let raw = RequestBuilder::new("http://x", "abc+def==", "ETC", "app");
        let encoded = RequestBuilder::new("http://x", "abc%2Bdef%3D%3D", "ETC", "app");
        assert_eq!(raw.query(&Params::new()), encoded.query(&Params::new()));
    }
}
