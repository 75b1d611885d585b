//! Raw request serialization.

use crate::request::decompose::UrlParts;
use crate::request::error::MalformedUrlError;

/// Protocol token written on every request line.
pub const HTTP_VERSION: &str = "HTTP/1.1";

const CRLF: &str = "\r\n";

/// Build the raw HTTP/1.1 request text for the given fields.
///
/// `override_url`, when present, replaces `url` for this call only. Empty
/// `body` and `extra_header_lines` are treated exactly like absent ones.
///
/// # Example
/// ```
/// use spyglass::request::build_raw_request;
///
/// let raw = build_raw_request("GET", "http://api.gowalla.com/", None, None, None).unwrap();
/// assert_eq!(raw, "GET / HTTP/1.1\r\nHost: api.gowalla.com\r\nAccept: */*\r\n\r\n");
/// ```
pub fn build_raw_request(
    method: &str,
    url: &str,
    body: Option<&str>,
    extra_header_lines: Option<&str>,
    override_url: Option<&str>,
) -> Result<String, MalformedUrlError> {
    let target = override_url.unwrap_or(url);
    RawRequest::new(method, target, body, extra_header_lines).map(|request| request.render())
}

/// A request whose URL has already been decomposed.
///
/// The dispatcher keeps one of these so that the bytes it writes and the
/// address it connects to come from the same decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    method: String,
    parts: UrlParts,
    body: Option<String>,
    extra_headers: Option<String>,
}

impl RawRequest {
    pub fn new(
        method: &str,
        url: &str,
        body: Option<&str>,
        extra_header_lines: Option<&str>,
    ) -> Result<Self, MalformedUrlError> {
        let parts = UrlParts::parse(url)?;
        Ok(Self {
            method: method.to_string(),
            parts,
            body: non_empty(body),
            extra_headers: non_empty(extra_header_lines),
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn parts(&self) -> &UrlParts {
        &self.parts
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Serialize to wire format.
    pub fn render(&self) -> String {
        let body_len = self.body.as_ref().map(String::len).unwrap_or(0);
        let mut out = String::with_capacity(128 + body_len);

        out.push_str(&format!("{} {} {}{}", self.method, self.parts.path, HTTP_VERSION, CRLF));
        out.push_str(&format!("Host: {}{}", self.parts.host, CRLF));
        out.push_str(&format!("Accept: */*{}", CRLF));

        if let Some(body) = &self.body {
            // String::len is the UTF-8 byte length, which is what goes on the wire.
            out.push_str(&format!("Content-Length: {}{}", body.len(), CRLF));
        }

        if let Some(headers) = &self.extra_headers {
            out.push_str(headers);
            out.push_str(CRLF);
        }

        out.push_str(CRLF);

        if let Some(body) = &self.body {
            out.push_str(body);
        }

        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn get(url: &str) -> String {
        build_raw_request("GET", url, None, None, None).unwrap()
    }

    #[test]
    fn test_index() {
        assert_eq!(
            get("http://api.gowalla.com/"),
            "GET / HTTP/1.1\r\nHost: api.gowalla.com\r\nAccept: */*\r\n\r\n"
        );
    }

    #[test]
    fn test_index_without_trailing_slash() {
        assert_eq!(
            get("http://www.carfax.com"),
            "GET / HTTP/1.1\r\nHost: www.carfax.com\r\nAccept: */*\r\n\r\n"
        );
    }

    #[test]
    fn test_with_path() {
        assert_eq!(
            get("http://api.gowalla.com/spots"),
            "GET /spots HTTP/1.1\r\nHost: api.gowalla.com\r\nAccept: */*\r\n\r\n"
        );
    }

    #[test]
    fn test_with_querystring() {
        assert_eq!(
            get("http://api.flickr.com/services/rest/?method=flickr.photos.getExif"),
            "GET /services/rest/?method=flickr.photos.getExif HTTP/1.1\r\n\
             Host: api.flickr.com\r\nAccept: */*\r\n\r\n"
        );
    }

    #[test]
    fn test_override_url() {
        let raw = build_raw_request(
            "GET",
            "http://google.com/",
            None,
            None,
            Some("http://www.google.com/"),
        )
        .unwrap();
        assert_eq!(raw, "GET / HTTP/1.1\r\nHost: www.google.com\r\nAccept: */*\r\n\r\n");
    }

    #[test]
    fn test_with_body() {
        let body = concat!(
            "\n    <fake-xml>\n",
            "        <key>com.bleedingwolf.PrincipalClass</key>\n",
            "        <value>SomeClassName</value>\n",
            "    </fake-xml>\n",
        );
        let raw =
            build_raw_request("POST", "http://localhost:9000/endpoint", Some(body), None, None)
                .unwrap();
        let expected = format!(
            "POST /endpoint HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\
             Content-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_with_extra_headers() {
        let headers = [
            "User-Agent: Spyglass/0.1",
            "Referer: http://localhost:9000/login.jsp",
        ]
        .join("\r\n");
        let raw =
            build_raw_request("GET", "http://localhost:9000/endpoint", None, Some(&headers), None)
                .unwrap();
        let expected = [
            "GET /endpoint HTTP/1.1",
            "Host: localhost",
            "Accept: */*",
            "User-Agent: Spyglass/0.1",
            "Referer: http://localhost:9000/login.jsp",
            "",
            "",
        ]
        .join("\r\n");
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_body_and_headers_order() {
        let raw =
            build_raw_request("PUT", "http://a.com/x", Some("hi"), Some("X-One: 1"), None).unwrap();
        assert_eq!(
            raw,
            "PUT /x HTTP/1.1\r\nHost: a.com\r\nAccept: */*\r\n\
             Content-Length: 2\r\nX-One: 1\r\n\r\nhi"
        );
    }

    #[test]
    fn test_conflicting_headers_are_not_deduplicated() {
        let extra = "Host: b.com\r\nAccept: text/html";
        let raw = build_raw_request("GET", "http://a.com/", None, Some(extra), None).unwrap();
        assert_eq!(
            raw,
            "GET / HTTP/1.1\r\nHost: a.com\r\nAccept: */*\r\n\
             Host: b.com\r\nAccept: text/html\r\n\r\n"
        );
    }

    #[test]
    fn test_empty_body_and_headers_are_absent() {
        let explicit = build_raw_request("GET", "http://a.com/", Some(""), Some(""), None).unwrap();
        assert_eq!(explicit, get("http://a.com/"));
        assert!(!explicit.contains("Content-Length"));
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let raw =
            build_raw_request("POST", "http://a.com/", Some("héllo ✓"), None, None).unwrap();
        assert!(raw.contains("Content-Length: 10\r\n"));
        assert!(raw.ends_with("\r\n\r\nhéllo ✓"));
    }

    #[test]
    fn test_method_used_verbatim() {
        assert!(build_raw_request("get", "http://a.com/", None, None, None)
            .unwrap()
            .starts_with("get / HTTP/1.1\r\n"));
    }

    #[test]
    fn test_malformed_url() {
        let err = build_raw_request("GET", "api.gowalla.com/spots", None, None, None).unwrap_err();
        assert_eq!(err.url, "api.gowalla.com/spots");

        let err = build_raw_request("GET", "http://ok.com/", None, None, Some("nope")).unwrap_err();
        assert_eq!(err.url, "nope");
    }

    #[test]
    fn test_url_cannot_split_the_request_line() {
        for url in [
            "http://a.com/x\r\nX-Injected: 1\r\n",
            "http://a.com/a b",
            "http://a.com\\evil/p",
        ] {
            let err = build_raw_request("GET", url, None, None, None).unwrap_err();
            assert_eq!(err.url, url);

            let err =
                build_raw_request("GET", "http://ok.com/", None, None, Some(url)).unwrap_err();
            assert_eq!(err.url, url);
        }
    }

    #[test]
    fn test_raw_request_accessors() {
        let request = RawRequest::new("POST", "http://localhost:9000/e", Some("b"), None).unwrap();
        assert_eq!(request.method(), "POST");
        assert_eq!(request.parts().port, Some(9000));
        assert_eq!(request.body(), Some("b"));
        assert_eq!(request.to_bytes(), request.render().into_bytes());
    }

    proptest! {
        #[test]
        fn prop_content_length_matches_body(body in "\\PC{1,64}") {
            let raw = build_raw_request("POST", "http://a.com/p", Some(&body), None, None).unwrap();
            let (head, tail) = raw.split_once("\r\n\r\n").unwrap();
            let expected_header = format!("Content-Length: {}", body.len());
            prop_assert!(head.lines().any(|line| line == expected_header));
            prop_assert_eq!(tail, body.as_str());
        }

        #[test]
        fn prop_deterministic(path in "[a-zA-Z0-9/_.-]{0,24}", query in "[a-z0-9=&]{0,12}") {
            let url = if query.is_empty() {
                format!("http://example.com/{}", path)
            } else {
                format!("http://example.com/{}?{}", path, query)
            };
            let first = build_raw_request("GET", &url, None, Some("X-A: 1"), None).unwrap();
            let second = build_raw_request("GET", &url, None, Some("X-A: 1"), None).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_empty_path_is_root(
            host in "[a-z]{1,12}(\\.[a-z]{2,5}){1,2}",
            slash in proptest::bool::ANY,
        ) {
            let url = format!("http://{}{}", host, if slash { "/" } else { "" });
            let raw = build_raw_request("GET", &url, None, None, None).unwrap();
            let expected_prefix = format!("GET / HTTP/1.1\r\nHost: {}\r\n", host);
            prop_assert!(raw.starts_with(&expected_prefix));
        }
    }
}
