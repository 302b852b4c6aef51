//! Canonical field layouts and the legacy spellings each field accepts.
//!
//! Field names and aliases are written in camelCase because key folding runs
//! before any schema is applied.

use serde_json::{Map, Number, Value};

/// Keys under which a backend may wrap a list instead of returning it bare.
const LIST_WRAPPERS: &[&str] = &[
    "items",
    "list",
    "data",
    "results",
    "records",
    "clients",
    "environments",
    "activities",
];

// == Field Kinds ==
#[derive(Debug)]
pub enum FieldKind {
    /// Non-negative integer, default 0
    Count,
    /// Floating point number, default 0.0
    Number,
    /// String with the given default
    Text(&'static str),
    /// String or null, default null
    OptionalText,
    /// List of objects following the given schema, default []
    List(&'static Schema),
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
}

/// Canonical layout of one object shape.
#[derive(Debug)]
pub struct Schema {
    pub fields: &'static [Field],
    /// Field that receives a bare scalar found where an object was expected
    pub scalar_field: Option<&'static str>,
}

// == Schemas ==
pub static ACTIVITY: Schema = Schema {
    fields: &[
        Field {
            name: "id",
            aliases: &["activityId"],
            kind: FieldKind::Text(""),
        },
        Field {
            name: "kind",
            aliases: &["type", "action"],
            kind: FieldKind::Text(""),
        },
        Field {
            name: "description",
            aliases: &["message", "desc", "title"],
            kind: FieldKind::Text(""),
        },
        Field {
            name: "createdAt",
            aliases: &["timestamp", "time", "created"],
            kind: FieldKind::OptionalText,
        },
    ],
    scalar_field: Some("description"),
};

pub static TREND_POINT: Schema = Schema {
    fields: &[
        Field {
            name: "label",
            aliases: &["date", "name", "x"],
            kind: FieldKind::Text(""),
        },
        Field {
            name: "value",
            aliases: &["count", "y"],
            kind: FieldKind::Number,
        },
    ],
    scalar_field: Some("value"),
};

pub static DASHBOARD_STATS: Schema = Schema {
    fields: &[
        Field {
            name: "totalUsers",
            aliases: &["users", "userCount"],
            kind: FieldKind::Count,
        },
        Field {
            name: "activeUsers",
            aliases: &["activeUserCount"],
            kind: FieldKind::Count,
        },
        Field {
            name: "totalInterviews",
            aliases: &["interviews", "interviewCount"],
            kind: FieldKind::Count,
        },
        Field {
            name: "completedInterviews",
            aliases: &["completed", "completedCount"],
            kind: FieldKind::Count,
        },
        Field {
            name: "averageScore",
            aliases: &["avgScore", "meanScore"],
            kind: FieldKind::Number,
        },
        Field {
            name: "recentActivities",
            aliases: &["activities", "recentActivity"],
            kind: FieldKind::List(&ACTIVITY),
        },
        Field {
            name: "trend",
            aliases: &["trends", "trendData", "chart"],
            kind: FieldKind::List(&TREND_POINT),
        },
    ],
    scalar_field: None,
};

pub static REALTIME_STATS: Schema = Schema {
    fields: &[
        Field {
            name: "onlineUsers",
            aliases: &["online", "currentUsers"],
            kind: FieldKind::Count,
        },
        Field {
            name: "activeSessions",
            aliases: &["sessions"],
            kind: FieldKind::Count,
        },
        Field {
            name: "requestsPerMinute",
            aliases: &["rpm", "requestRate"],
            kind: FieldKind::Number,
        },
        Field {
            name: "updatedAt",
            aliases: &["timestamp", "lastUpdated"],
            kind: FieldKind::OptionalText,
        },
    ],
    scalar_field: None,
};

pub static MONITOR_STATS: Schema = Schema {
    fields: &[
        Field {
            name: "totalClients",
            aliases: &["clients", "clientCount"],
            kind: FieldKind::Count,
        },
        Field {
            name: "activeConnections",
            aliases: &["connections", "activeClients"],
            kind: FieldKind::Count,
        },
        Field {
            name: "messagesSent",
            aliases: &["sent"],
            kind: FieldKind::Count,
        },
        Field {
            name: "messagesReceived",
            aliases: &["received"],
            kind: FieldKind::Count,
        },
        Field {
            name: "uptimeSeconds",
            aliases: &["uptime"],
            kind: FieldKind::Count,
        },
    ],
    scalar_field: None,
};

pub static CLIENT_INFO: Schema = Schema {
    fields: &[
        Field {
            name: "clientId",
            aliases: &["id", "client"],
            kind: FieldKind::Text(""),
        },
        Field {
            name: "environment",
            aliases: &["env", "environmentName"],
            kind: FieldKind::Text(""),
        },
        Field {
            name: "status",
            aliases: &["state"],
            kind: FieldKind::Text("unknown"),
        },
        Field {
            name: "connectedAt",
            aliases: &["connectedTime", "connected"],
            kind: FieldKind::OptionalText,
        },
        Field {
            name: "lastSeen",
            aliases: &["lastActive", "lastHeartbeat"],
            kind: FieldKind::OptionalText,
        },
    ],
    scalar_field: Some("clientId"),
};

pub static ENVIRONMENT_INFO: Schema = Schema {
    fields: &[
        Field {
            name: "name",
            aliases: &["environment", "env", "id"],
            kind: FieldKind::Text(""),
        },
        Field {
            name: "clientCount",
            aliases: &["clients", "count"],
            kind: FieldKind::Count,
        },
        Field {
            name: "status",
            aliases: &["state", "health"],
            kind: FieldKind::Text("unknown"),
        },
    ],
    scalar_field: Some("name"),
};

// == Application ==
/// Rewrites `value` into the canonical object layout of `schema`.
///
/// Canonical spellings win over aliases, aliases are removed, unknown keys
/// pass through, and a non-object input starts from an empty object.
pub fn apply_object(schema: &Schema, value: Value) -> Value {
    let mut map = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        scalar => {
            let mut map = Map::new();
            if let Some(field) = schema.scalar_field {
                map.insert(field.to_string(), scalar);
            }
            map
        }
    };

    for field in schema.fields {
        let mut raw = map.remove(field.name);
        for alias in field.aliases {
            let aliased = map.remove(*alias);
            if raw.is_none() {
                raw = aliased;
            }
        }
        map.insert(field.name.to_string(), coerce(&field.kind, raw));
    }

    Value::Object(map)
}

/// Normalizes a list whose items follow `schema`.
pub fn apply_list(schema: &Schema, value: Value) -> Value {
    let items = match unwrap_list(value) {
        Some(items) => items,
        None => return Value::Array(Vec::new()),
    };
    Value::Array(
        items
            .into_iter()
            .map(|item| apply_object(schema, item))
            .collect(),
    )
}

/// Finds the array in a bare or wrapped list, `None` when there is none.
fn unwrap_list(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => LIST_WRAPPERS.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }),
        _ => None,
    }
}

fn coerce(kind: &FieldKind, raw: Option<Value>) -> Value {
    match kind {
        FieldKind::Count => Value::from(coerce_count(raw.as_ref())),
        FieldKind::Number => coerce_number(raw),
        FieldKind::Text(default) => match raw {
            Some(Value::String(s)) => Value::String(s),
            Some(Value::Number(n)) => Value::String(n.to_string()),
            Some(Value::Bool(b)) => Value::String(b.to_string()),
            _ => Value::String((*default).to_string()),
        },
        FieldKind::OptionalText => match raw {
            Some(Value::String(s)) => Value::String(s),
            Some(Value::Number(n)) => Value::String(n.to_string()),
            _ => Value::Null,
        },
        FieldKind::List(schema) => match raw {
            Some(value) => apply_list(schema, value),
            None => Value::Array(Vec::new()),
        },
    }
}

fn non_negative_floor(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.floor() as u64)
}

fn coerce_count(raw: Option<&Value>) -> u64 {
    match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(non_negative_floor))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(non_negative_floor))
                .unwrap_or(0)
        }
        // a legacy backend sent the collection instead of its size
        Some(Value::Array(items)) => items.len() as u64,
        _ => 0,
    }
}

fn coerce_number(raw: Option<Value>) -> Value {
    match raw {
        Some(Value::Number(n)) => Value::Number(n),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0.0)),
        _ => Value::from(0.0),
    }
}
