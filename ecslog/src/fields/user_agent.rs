use serde::Serialize;

use ecslog_core::Field;

#[derive(Serialize)]
struct UserAgentField {
    original: String,
}

/// Creates the ECS `user_agent` field from the raw header value.
///
/// <https://www.elastic.co/guide/en/ecs/current/ecs-user_agent.html>
pub fn user_agent(original: impl Into<String>) -> Field {
    Field::any(
        "user_agent",
        &UserAgentField {
            original: original.into(),
        },
    )
}
