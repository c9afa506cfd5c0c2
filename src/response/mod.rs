//! HTTP error response serialization
//!
//! Turns anything error-shaped into exactly one status + JSON body write.
//! Serialization never fails: unknown references degrade to the Root
//! variant, anomalies degrade to defaults, and a sink that already sent
//! a response turns the whole call into a no-op.

pub mod context;
pub mod sink;

pub use context::RequestContext;
pub use sink::{RecordingSink, ResponseSink};

use crate::config::SerializerPreferences;
use crate::instance::{Cause, ErrorInstance, InstantiateArgs};
use crate::logging::{self, LogEvent, LogLevel};
use crate::registry::{self, VariantRegistry};
use serde_json::{json, Map, Value};
use std::error::Error as StdError;

const FALLBACK_MESSAGE: &str = "internal error";
const BATCH_CODE: &str = "BAD_FORMAT";

/// Validator bookkeeping stripped from schema-error entries before they
/// go out on the wire.
const INTERNAL_VALIDATOR_FIELDS: [&str; 5] = [
    "desc",
    "constraintName",
    "constraintValue",
    "testedValue",
    "kind",
];

/// Anything `send` accepts as its error argument.
#[derive(Debug)]
pub enum ErrorInput {
    /// No error value at all; serialized as an unclassified failure.
    None,
    /// Variant name or machine code to instantiate.
    Name(String),
    Instance(ErrorInstance),
    /// An error-shaped JSON object; `name`/`code` select the variant and
    /// the remaining fields are copied onto the instance.
    Object(Value),
    /// Display text of a wrapped native error.
    Native(String),
}

impl ErrorInput {
    /// Wrap a native error, preserving its message and chaining it as
    /// the instance's cause.
    pub fn wrap<E: StdError>(error: &E) -> Self {
        ErrorInput::Native(error.to_string())
    }
}

impl From<&str> for ErrorInput {
    fn from(name_or_code: &str) -> Self {
        ErrorInput::Name(name_or_code.to_string())
    }
}

impl From<String> for ErrorInput {
    fn from(name_or_code: String) -> Self {
        ErrorInput::Name(name_or_code)
    }
}

impl From<ErrorInstance> for ErrorInput {
    fn from(instance: ErrorInstance) -> Self {
        ErrorInput::Instance(instance)
    }
}

impl From<Value> for ErrorInput {
    fn from(object: Value) -> Self {
        ErrorInput::Object(object)
    }
}

/// Serializer borrowing a registry for variant resolution.
pub struct ResponseSerializer<'a> {
    registry: &'a VariantRegistry,
    prefs: SerializerPreferences,
}

impl<'a> ResponseSerializer<'a> {
    pub fn new(registry: &'a VariantRegistry) -> Self {
        Self {
            registry,
            prefs: SerializerPreferences::default(),
        }
    }

    pub fn with_preferences(registry: &'a VariantRegistry, prefs: SerializerPreferences) -> Self {
        Self { registry, prefs }
    }

    /// Serialize `input` onto `sink`. Returns whether a response was
    /// written; `false` means the sink had already sent one.
    pub fn send(
        &self,
        sink: &mut dyn ResponseSink,
        input: ErrorInput,
        ctx: Option<&dyn RequestContext>,
        params: Map<String, Value>,
    ) -> bool {
        let instance = self.normalize(input);
        let status = self.resolve_status(&instance);
        let mut body = self.resolve_body(&instance);
        if let Some(ctx) = ctx {
            localize(&mut body, ctx, &params);
        }

        let already_sent = sink.headers_sent();
        self.log_diagnostics(&instance, status, &body, already_sent);
        if already_sent {
            return false;
        }

        sink.status(status);
        sink.json(&body);
        true
    }

    /// Collapse every accepted input shape into one instance.
    fn normalize(&self, input: ErrorInput) -> ErrorInstance {
        match input {
            ErrorInput::None => self.instantiate_named("", InstantiateArgs::none()),
            ErrorInput::Name(name_or_code) => {
                self.instantiate_named(&name_or_code, InstantiateArgs::none())
            }
            ErrorInput::Instance(instance) => instance,
            ErrorInput::Object(object) => self.normalize_object(object),
            ErrorInput::Native(message) => self.instantiate_named(
                "",
                InstantiateArgs::message(message.clone()).with_cause(Cause::Other(message)),
            ),
        }
    }

    fn instantiate_named(&self, name_or_code: &str, args: InstantiateArgs) -> ErrorInstance {
        let descriptor = self.registry.descriptor_for(name_or_code);
        self.registry.instantiate(&descriptor, args)
    }

    /// Build the named variant and copy the object's remaining fields
    /// onto the instance. Explicit fields win over variant defaults.
    fn normalize_object(&self, object: Value) -> ErrorInstance {
        let reference = object
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| object.get("code").and_then(Value::as_str))
            .unwrap_or("")
            .to_string();
        let mut instance = self.instantiate_named(&reference, InstantiateArgs::none());

        if let Value::Object(fields) = object {
            for (key, value) in fields {
                match key.as_str() {
                    "name" => {}
                    "code" => {
                        if let Some(code) = value.as_str() {
                            instance.code = code.to_string();
                        }
                    }
                    "statusCode" => {
                        if let Some(status) =
                            value.as_u64().and_then(|status| u16::try_from(status).ok())
                        {
                            instance.status_code = Some(status);
                        }
                    }
                    "message" => match value {
                        Value::String(text) => instance.message = text,
                        other => instance.message = other.to_string(),
                    },
                    "body" => instance.body = Some(value),
                    "schemaErrors" => {
                        if let Value::Array(entries) = value {
                            instance.schema_errors = Some(entries);
                        }
                    }
                    _ => instance.set_field(key, value),
                }
            }
        }
        instance
    }

    /// Instance status, else the variant chain's default, else 500.
    fn resolve_status(&self, instance: &ErrorInstance) -> u16 {
        if let Some(status) = instance.status_code {
            return status;
        }
        self.chain_default(&instance.name, "statusCode")
            .and_then(|value| value.as_u64())
            .and_then(|status| u16::try_from(status).ok())
            .unwrap_or(500)
    }

    /// Body precedence: validation batch, opaque passthrough, explicit
    /// message, variant default message, fallback text.
    fn resolve_body(&self, instance: &ErrorInstance) -> Value {
        if let Some(batch) = &instance.schema_errors {
            return Value::Array(batch.iter().map(reformat_schema_error).collect());
        }
        if let Some(body) = &instance.body {
            return body.clone();
        }
        if !instance.message.is_empty() {
            return json!({"code": instance.code, "message": instance.message});
        }
        if let Some(default) = self
            .chain_default(&instance.name, "message")
            .and_then(|value| value.as_str().map(str::to_string))
        {
            return json!({"code": instance.code, "message": default});
        }
        json!({"code": instance.code, "message": FALLBACK_MESSAGE})
    }

    fn chain_default(&self, variant_name: &str, key: &str) -> Option<Value> {
        let descriptor = self.registry.lookup(variant_name)?;
        self.registry
            .resolved_defaults(descriptor)
            .get(key)
            .cloned()
    }

    fn log_diagnostics(&self, instance: &ErrorInstance, status: u16, body: &Value, already_sent: bool) {
        let logger = match logging::try_get_global_logger() {
            Some(logger) => logger,
            None => return,
        };
        if !logger.should_log(LogLevel::Debug) {
            return;
        }

        let mut event = LogEvent::debug("sending error response")
            .with_context("error", &instance.to_string())
            .with_context("status", &status.to_string())
            .with_context("alreadySent", if already_sent { "true" } else { "false" });
        if self.prefs.log_error_stacks {
            event = event.with_context("stack", &instance.stack);
        }
        if self.prefs.log_response_bodies {
            event = event.with_context("body", &body.to_string());
        }
        logger.log_event(event);
    }
}

/// `send` against the global registry.
pub fn send(
    sink: &mut dyn ResponseSink,
    input: ErrorInput,
    ctx: Option<&dyn RequestContext>,
    params: Map<String, Value>,
) -> bool {
    registry::with_global(|registry| ResponseSerializer::new(registry).send(sink, input, ctx, params))
}

/// One wire entry per validation failure: the batch code, the caller's
/// own fields minus validator bookkeeping, and a message taken from
/// `desc` then `message` (omitted when neither exists).
fn reformat_schema_error(entry: &Value) -> Value {
    let mut out = Map::new();
    out.insert("code".to_string(), Value::String(BATCH_CODE.to_string()));

    if let Value::Object(fields) = entry {
        let message = fields
            .get("desc")
            .and_then(Value::as_str)
            .or_else(|| fields.get("message").and_then(Value::as_str))
            .map(str::to_string);

        for (key, value) in fields {
            if key == "code"
                || key == "message"
                || INTERNAL_VALIDATOR_FIELDS.contains(&key.as_str())
            {
                continue;
            }
            out.insert(key.clone(), value.clone());
        }
        if let Some(message) = message {
            out.insert("message".to_string(), Value::String(message));
        }
    }
    Value::Object(out)
}

/// Rewrite the single-object body's message through the request context.
/// Batch and passthrough bodies are left untouched.
fn localize(body: &mut Value, ctx: &dyn RequestContext, params: &Map<String, Value>) {
    let map = match body {
        Value::Object(map) => map,
        _ => return,
    };
    let message = match map.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => return,
    };

    let mut full_params = params.clone();
    if let Some(locale) = ctx.locale() {
        full_params.insert("locale".to_string(), Value::String(locale.to_string()));
    }
    map.insert(
        "message".to_string(),
        Value::String(ctx.translate(&message, &full_params)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch;

    fn bootstrapped() -> VariantRegistry {
        let mut registry = VariantRegistry::new();
        registry.bootstrap().unwrap();
        registry
    }

    fn send_simple(registry: &VariantRegistry, sink: &mut RecordingSink, input: ErrorInput) -> bool {
        ResponseSerializer::new(registry).send(sink, input, None, Map::new())
    }

    #[test]
    fn test_send_alias_code() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();

        let written = send_simple(&registry, &mut sink, "NOT_FOUND".into());

        assert!(written);
        assert_eq!(sink.status_code, Some(404));
        assert_eq!(
            sink.body,
            Some(json!({"code": "NOT_FOUND", "message": "resource not found"}))
        );
    }

    #[test]
    fn test_send_instance_with_explicit_message() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();
        let error = dispatch::throw_named(
            &registry,
            "HTTP_CONFLICT",
            InstantiateArgs::message("name already taken"),
        );

        send_simple(&registry, &mut sink, error.into());

        assert_eq!(sink.status_code, Some(409));
        assert_eq!(
            sink.body,
            Some(json!({"code": "HTTP_CONFLICT_ERROR", "message": "name already taken"}))
        );
    }

    #[test]
    fn test_instance_falls_back_to_chain_defaults() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();
        // Built without resolved defaults: no status, empty message.
        let descriptor = registry.lookup("HttpNotFoundError").unwrap().clone();
        let bare = crate::instance::instantiate(&descriptor, &Map::new(), InstantiateArgs::none());
        assert_eq!(bare.status_code, None);
        assert_eq!(bare.message, "");

        send_simple(&registry, &mut sink, bare.into());

        assert_eq!(sink.status_code, Some(404));
        assert_eq!(
            sink.body,
            Some(json!({"code": "HTTP_NOT_FOUND_ERROR", "message": "Not Found"}))
        );
    }

    #[test]
    fn test_schema_errors_batch() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();
        let input = json!({
            "code": "BAD_FORMAT",
            "schemaErrors": [
                {"desc": "must be an integer", "field": "age", "constraintName": "type", "kind": "invalid"},
                {"message": "too long", "field": "name", "testedValue": "x".repeat(3)},
            ],
        });

        send_simple(&registry, &mut sink, input.into());

        assert_eq!(sink.status_code, Some(400));
        assert_eq!(
            sink.body,
            Some(json!([
                {"code": "BAD_FORMAT", "field": "age", "message": "must be an integer"},
                {"code": "BAD_FORMAT", "field": "name", "message": "too long"},
            ]))
        );
    }

    #[test]
    fn test_body_passthrough() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();
        let input = json!({
            "code": "TEAPOT",
            "statusCode": 418,
            "body": {"custom": true, "hint": "short and stout"},
        });

        send_simple(&registry, &mut sink, input.into());

        assert_eq!(sink.status_code, Some(418));
        assert_eq!(
            sink.body,
            Some(json!({"custom": true, "hint": "short and stout"}))
        );
    }

    #[test]
    fn test_write_once_is_a_noop() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::already_sent();

        let written = send_simple(&registry, &mut sink, "NOT_FOUND".into());

        assert!(!written);
        assert_eq!(sink.status_code, None);
        assert_eq!(sink.write_count, 0);
    }

    #[test]
    fn test_none_input_is_unclassified() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();

        send_simple(&registry, &mut sink, ErrorInput::None);

        assert_eq!(sink.status_code, Some(500));
        assert_eq!(
            sink.body,
            Some(json!({"code": "ROOT_ERROR", "message": "internal error"}))
        );
    }

    #[test]
    fn test_unknown_reference_defaults_to_internal() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();

        send_simple(&registry, &mut sink, "NEVER_DECLARED".into());

        // The requested identity survives; everything else is the
        // unclassified default.
        assert_eq!(sink.status_code, Some(500));
        assert_eq!(
            sink.body,
            Some(json!({"code": "NEVER_DECLARED_ERROR", "message": "internal error"}))
        );
    }

    #[test]
    fn test_native_error_wrap() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();
        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");

        send_simple(&registry, &mut sink, ErrorInput::wrap(&io_error));

        assert_eq!(sink.status_code, Some(500));
        assert_eq!(
            sink.body,
            Some(json!({"code": "ROOT_ERROR", "message": "disk gone"}))
        );
    }

    struct TaggingContext;

    impl RequestContext for TaggingContext {
        fn translate(&self, message: &str, params: &Map<String, Value>) -> String {
            let locale = params
                .get("locale")
                .and_then(Value::as_str)
                .unwrap_or("none");
            format!("{} [{}]", message, locale)
        }

        fn locale(&self) -> Option<&str> {
            Some("fr")
        }
    }

    #[test]
    fn test_localization_rewrites_message() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();

        ResponseSerializer::new(&registry).send(
            &mut sink,
            "NOT_FOUND".into(),
            Some(&TaggingContext),
            Map::new(),
        );

        assert_eq!(
            sink.body,
            Some(json!({"code": "NOT_FOUND", "message": "resource not found [fr]"}))
        );
    }

    #[test]
    fn test_localization_skips_batches() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();
        let input = json!({
            "code": "BAD_FORMAT",
            "schemaErrors": [{"desc": "must be an integer", "field": "age"}],
        });

        ResponseSerializer::new(&registry).send(
            &mut sink,
            input.into(),
            Some(&TaggingContext),
            Map::new(),
        );

        assert_eq!(
            sink.body,
            Some(json!([
                {"code": "BAD_FORMAT", "field": "age", "message": "must be an integer"}
            ]))
        );
    }

    #[test]
    fn test_object_code_survives_without_variant() {
        let registry = bootstrapped();
        let mut sink = RecordingSink::new();
        let input = json!({
            "code": "LEGACY_SUBSYSTEM",
            "statusCode": 502,
            "message": "upstream refused",
        });

        send_simple(&registry, &mut sink, input.into());

        assert_eq!(sink.status_code, Some(502));
        assert_eq!(
            sink.body,
            Some(json!({"code": "LEGACY_SUBSYSTEM", "message": "upstream refused"}))
        );
    }
}
