use serde::Serialize;

use ecslog_core::Field;

#[derive(Serialize)]
struct UrlField<'a> {
    path: &'a str,
    query: &'a str,
}

/// Creates the ECS `url` field from a parsed URL.
///
/// <https://www.elastic.co/guide/en/ecs/current/ecs-url.html>
pub fn url(url: &::url::Url) -> Field {
    Field::any(
        "url",
        &UrlField {
            path: url.path(),
            query: url.query().unwrap_or(""),
        },
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_url_members() {
        let parsed: ::url::Url = "https://example.com/users/42?expand=roles".parse().unwrap();
        let field = url(&parsed);

        assert_eq!(field.key, "url");
        assert_eq!(
            field.value.as_json(),
            json!({ "path": "/users/42", "query": "expand=roles" })
        );
    }

    #[test]
    fn test_url_without_query() {
        let parsed: ::url::Url = "https://example.com/healthz".parse().unwrap();
        assert_eq!(
            url(&parsed).value.as_json(),
            json!({ "path": "/healthz", "query": "" })
        );
    }
}
