use ecslog_core::{Field, Service};

/// Creates the ECS `service` field.
///
/// <https://www.elastic.co/guide/en/ecs/current/ecs-service.html>
pub fn service(name: impl Into<String>, version: impl Into<String>) -> Field {
    Field::service(Service::new(name, version))
}
