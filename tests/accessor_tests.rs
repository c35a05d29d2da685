use std::borrow::Cow;

use mustache_resolver::{
    Context, DataAccessor, MapAccessor, Model, ModelAccessor, MustacheError, ObjectAccessor,
    Record, SecurityError, SecurityPolicy, Value,
    record::{LookupStrategy, getter_name},
    security::short_name,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Map accessor
// ============================================================================

fn order() -> MapAccessor {
    MapAccessor::from_json(json!({
        "ref": "A-100",
        "items": [{"sku": "X"}, {"sku": "Y"}],
        "customer": {"address": {"city": "Lyon"}}
    }))
}

#[test]
fn test_map_paths() {
    let accessor = order();
    assert_eq!(accessor.get("ref").unwrap(), Value::from("A-100"));
    assert_eq!(accessor.get("items.1.sku").unwrap(), Value::from("Y"));
    assert_eq!(accessor.get("customer.address.city").unwrap(), Value::from("Lyon"));
    assert_eq!(accessor.get("customer.phone.number").unwrap(), Value::Null);
    assert_eq!(accessor.get("items.7").unwrap(), Value::Null);
}

#[test]
fn test_map_walks_borrowed_data() {
    let accessor = order();
    let root = accessor.raw();
    assert!(matches!(root, Cow::Borrowed(_)));
    assert!(matches!(root.lookup_ref("customer"), Cow::Borrowed(_)));
    assert!(matches!(root.lookup_ref("missing"), Cow::Owned(Value::Null)));
    assert_eq!(
        root.lookup_path(["customer", "address", "city"]),
        Value::from("Lyon")
    );
}

#[test]
fn test_map_metadata() {
    let accessor = order();
    assert!(accessor.has("ref"));
    assert!(!accessor.has("missing"));
    assert_eq!(accessor.keys(), vec!["ref", "items", "customer"]);
    assert_eq!(accessor.source_type(), "array");
}

// ============================================================================
// Record lookup cascade
// ============================================================================

#[derive(Debug)]
struct Invoice;

impl Record for Invoice {
    fn type_name(&self) -> &str {
        "Invoice"
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "number" => Some(Value::from("INV-1")),
            "total" => Some(Value::Integer(10)),
            _ => None,
        }
    }

    fn getter(&self, method: &str) -> Option<Value> {
        match method {
            "getTotal" => Some(Value::Integer(99)),
            "getDueDate" => Some(Value::from("2025-12-31")),
            _ => None,
        }
    }

    fn keyed(&self, key: &str) -> Option<Value> {
        (key == "0").then(|| Value::from("first line"))
    }

    fn catch_all(&self, name: &str) -> Option<Value> {
        Some(Value::String(format!("dynamic:{}", name)))
    }

    fn field_names(&self) -> Vec<String> {
        vec!["number".to_string(), "total".to_string()]
    }
}

#[test]
fn test_cascade_order() {
    let accessor = ObjectAccessor::from_record(Invoice);
    // field wins over getter
    assert_eq!(accessor.get("total").unwrap(), Value::Integer(10));
    assert_eq!(accessor.get("dueDate").unwrap(), Value::from("2025-12-31"));
    assert_eq!(accessor.get("0").unwrap(), Value::from("first line"));
    assert_eq!(accessor.get("anything").unwrap(), Value::from("dynamic:anything"));
    assert_eq!(accessor.keys(), vec!["number", "total"]);
    assert_eq!(accessor.source_type(), "object");
}

#[test]
fn test_strategy_order_and_getter_names() {
    assert_eq!(
        LookupStrategy::ORDER,
        [
            LookupStrategy::DirectField,
            LookupStrategy::Getter,
            LookupStrategy::Keyed,
            LookupStrategy::CatchAll
        ]
    );
    assert_eq!(getter_name("fullName"), "getFullName");
    assert_eq!(getter_name(""), "get");
}

// ============================================================================
// Model accessor and security
// ============================================================================

fn user() -> Model {
    Model::new("App\\Models\\User")
        .with_attribute("name", "Ann")
        .with_attribute("password", "hunter2")
        .with_relation(
            "orders",
            Value::Array(vec![
                Model::new("App\\Models\\Order").with_attribute("ref", "A-1").into(),
                Model::new("App\\Models\\Order").with_attribute("ref", "A-2").into(),
            ]),
        )
}

#[test]
fn test_model_relations() {
    let accessor = ModelAccessor::new(user());
    assert_eq!(accessor.model_name(), "User");
    assert_eq!(accessor.get("orders.1.ref").unwrap(), Value::from("A-2"));
    assert_eq!(accessor.keys(), vec!["name", "password", "orders"]);
}

#[test]
fn test_model_without_policy_reads_everything() {
    let accessor = ModelAccessor::new(user());
    assert_eq!(accessor.get("password").unwrap(), Value::from("hunter2"));
}

#[test]
fn test_recommended_policy_blocks_credentials() {
    let accessor = ModelAccessor::new(user()).with_policy(SecurityPolicy::recommended());
    let err = accessor.get("password").unwrap_err();
    assert_eq!(
        err,
        MustacheError::from(SecurityError::RestrictedPath {
            path: "password".to_string()
        })
    );
    assert!(!accessor.has("password"));
    assert_eq!(accessor.get("name").unwrap(), Value::from("Ann"));
}

#[test]
fn test_raw_walks_are_checked_against_the_policy() {
    let accessor = ModelAccessor::new(user()).with_policy(SecurityPolicy::recommended());
    assert!(accessor.check_path("password.0").is_err());
    assert!(accessor.check_path("orders.0.ref").is_ok());
    assert!(order().check_path("password").is_ok());

    let restricted = ModelAccessor::new(user()).with_policy(SecurityPolicy::default().allow("Order"));
    assert!(restricted.check_path("orders.0").is_err());
}

#[test]
fn test_depth_limit() {
    let policy = SecurityPolicy::default().with_max_depth(2);
    assert!(policy.check_path("a.b").is_ok());
    assert_eq!(
        policy.check_path("a.b.c"),
        Err(SecurityError::DepthExceeded {
            path: "a.b.c".to_string(),
            max_depth: 2
        })
    );
}

#[test]
fn test_blacklist_checks_first_segment_only() {
    let policy = SecurityPolicy::recommended();
    assert!(policy.check_path("secret.value").is_err());
    assert!(policy.check_path("profile.secret").is_ok());
}

#[test]
fn test_allow_list_accepts_short_names() {
    let policy = SecurityPolicy::default().allow("User");
    assert!(policy.validate_source("App\\Models\\User").is_ok());
    assert!(policy.validate_source("crate::models::User").is_ok());
    assert!(policy.validate_source("App\\Models\\Order").is_err());
    assert!(SecurityPolicy::default().validate_source("Anything").is_ok());
    assert_eq!(short_name("App\\Models\\User"), "User");
}

#[test]
fn test_policy_from_json() {
    let policy: SecurityPolicy =
        serde_json::from_str(r#"{"allowed_models": ["User"], "max_depth": 3}"#).unwrap();
    assert_eq!(policy.allowed_sources, vec!["User"]);
    assert_eq!(policy.max_depth, 3);
    assert!(policy.blacklisted_attributes.is_empty());
}

// ============================================================================
// Context
// ============================================================================

#[test]
fn test_context_is_immutable() {
    let base = Context::from_json(json!({"name": "Ann"}));
    let derived = base.with("name", "Bo").with_strict(false).with_prefix(Some("User"));

    assert_eq!(base.get("name").unwrap(), Value::from("Ann"));
    assert!(base.is_strict());
    assert_eq!(base.expected_prefix(), None);

    assert_eq!(derived.get("name").unwrap(), Value::from("Bo"));
    assert!(!derived.is_strict());
    assert_eq!(derived.expected_prefix(), Some("User"));
}

#[test]
fn test_context_config() {
    let ctx = Context::default().with_config([("locale", Value::from("fr"))]);
    assert_eq!(ctx.config("locale"), Some(&Value::from("fr")));
    assert_eq!(ctx.config_or("timezone", Value::from("UTC")), Value::from("UTC"));
}

#[test]
fn test_context_swaps_accessor() {
    let ctx = Context::default().with("v", 1i64).with_accessor(order());
    assert_eq!(ctx.get("ref").unwrap(), Value::from("A-100"));
    assert_eq!(ctx.get("v").unwrap(), Value::Integer(1));
    assert!(ctx.has("items"));
}
