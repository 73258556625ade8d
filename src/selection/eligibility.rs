use serde_json::{Map, Value};

use crate::{
    config::AnnouncementConfig,
    domain::{Condition, User},
};

type Predicate = fn(&User) -> bool;

/// Predicates a deployment may opt into through `user_predicates`.
/// Nothing outside this table is ever evaluated against a user.
const PREDICATES: &[(&str, Predicate)] = &[
    ("free?", is_free),
    ("subscribed?", is_subscribed),
];

fn is_free(user: &User) -> bool {
    user.is_free()
}

fn is_subscribed(user: &User) -> bool {
    !user.is_free()
}

pub fn lookup_predicate(name: &str) -> Option<Predicate> {
    PREDICATES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, predicate)| *predicate)
}

/// Request-scoped projection of a user into `field -> value`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSnapshot {
    fields: Map<String, Value>,
}

impl UserSnapshot {
    pub fn build(user: &User, config: &AnnouncementConfig) -> Self {
        let mut fields = match serde_json::to_value(user) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        if !config.user_fields.is_empty() {
            fields.retain(|name, _| config.user_fields.iter().any(|f| f == name));
        }

        for name in &config.user_predicates {
            if let Some(predicate) = lookup_predicate(name) {
                fields.insert(name.clone(), Value::Bool(predicate(user)));
            }
        }

        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }
}

/// True when every condition holds for the snapshot. A field missing from
/// the snapshot fails its condition; no conditions means everyone matches.
pub fn matches(snapshot: &UserSnapshot, conditions: &[Condition]) -> bool {
    conditions
        .iter()
        .all(|condition| snapshot.get(&condition.field) == Some(&condition.value))
}
