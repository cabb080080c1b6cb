#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One call to the transformation service, resolved but not yet sent.
///
/// Every request asks for JSON back; `json` adds a JSON body.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url.into())
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url.into())
    }

    fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            headers: vec![("Accept".into(), "application/json".into())],
            body: None,
        }
    }

    pub fn json(mut self, body: String) -> Self {
        self.headers
            .push(("Content-Type".into(), "application/json".into()));
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Prompts can be long and private; the size is enough.
        f.debug_struct("HttpRequest")
            .field("method", &self.method.as_str())
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("json_bytes", &self.body.as_ref().map(String::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_sets_content_type() {
        let req = HttpRequest::post("http://localhost:5000/transform").json("{}".into());
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("ACCEPT"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some("{}"));

        let plain = HttpRequest::get("http://localhost:5000/health");
        assert_eq!(plain.header("content-type"), None);
        assert_eq!(plain.body, None);
    }

    #[test]
    fn debug_hides_prompt_text() {
        let req = HttpRequest::post("http://localhost:5000/transform")
            .json(r#"{"prompt":"my secret plan"}"#.into());

        let s = format!("{req:?}");
        assert!(!s.contains("secret plan"));
        assert!(s.contains("json_bytes: Some(27)"));
        assert!(s.contains("\"POST\""));
    }
}
