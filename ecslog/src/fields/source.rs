use serde::Serialize;

use ecslog_core::Field;

#[derive(Serialize)]
struct SourceField {
    ip: String,
    port: u16,
}

/// Creates the ECS `source` field from a peer address.
///
/// <https://www.elastic.co/guide/en/ecs/current/ecs-source.html>
pub fn source(ip: impl Into<String>, port: u16) -> Field {
    Field::any(
        "source",
        &SourceField {
            ip: ip.into(),
            port,
        },
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_source_members() {
        let field = source("203.0.113.7", 443);
        assert_eq!(field.key, "source");
        assert_eq!(
            field.value.as_json(),
            json!({ "ip": "203.0.113.7", "port": 443 })
        );
    }
}
