use std::collections::BTreeMap;

use serde::Serialize;

use ecslog_core::Field;

/// Data recorded under the ECS `http.request` field.
///
/// <https://www.elastic.co/guide/en/ecs/current/ecs-http.html>
#[derive(Debug, Clone, Default, Serialize)]
pub struct HttpRequest {
    /// Request method.
    pub method: String,
    /// Protocol version, e.g. `HTTP/1.1`.
    pub version: String,
    /// The referrer header, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// Size of the request body in bytes, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// Request headers worth recording.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// Data recorded under the ECS `http.response` field.
///
/// <https://www.elastic.co/guide/en/ecs/current/ecs-http.html>
#[derive(Debug, Clone, Serialize)]
pub struct HttpResponse {
    /// Status code of the response.
    pub status_code: u16,
    /// Size of the response body in bytes, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Creates the ECS `http.request` field.
pub fn http_request(request: &HttpRequest) -> Field {
    Field::any("http.request", request)
}

/// Creates the ECS `http.response` field.
pub fn http_response(response: &HttpResponse) -> Field {
    Field::any("http.response", response)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_members() {
        let request = HttpRequest {
            method: "GET".into(),
            version: "HTTP/1.1".into(),
            referrer: Some("https://example.com/".into()),
            bytes: Some(128),
            ..Default::default()
        };
        let field = http_request(&request);

        assert_eq!(field.key, "http.request");
        assert_eq!(
            field.value.as_json(),
            json!({
                "method": "GET",
                "version": "HTTP/1.1",
                "referrer": "https://example.com/",
                "bytes": 128,
            })
        );
    }

    #[test]
    fn test_response_members() {
        let response = HttpResponse {
            status_code: 503,
            bytes: None,
        };

        assert_eq!(
            http_response(&response).value.as_json(),
            json!({ "status_code": 503 })
        );
    }
}
