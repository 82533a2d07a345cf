use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
                }
            },
            "database": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" }
                }
            },
            "notifications": {
                "type": "object",
                "properties": {
                    "webhook_url": { "type": "string", "format": "uri" },
                    "vendor_recipient": { "type": "string" },
                    "max_retries": { "type": "integer", "minimum": 0, "maximum": 10 }
                }
            },
            "policy": {
                "type": "object",
                "properties": {
                    "allow_submit_when_closed": { "type": "boolean" }
                }
            }
        }
    })
});
