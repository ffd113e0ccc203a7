use serde_json::Value;

/// Server-side analytics go to the log stream under the `analytics` target,
/// where the collector picks them up. Never fails.
pub fn track_event(name: &str, params: Value) {
    tracing::info!(target: "analytics", event = name, params = %params, "analytics event");
}
