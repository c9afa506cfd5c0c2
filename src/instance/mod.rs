//! Error instance construction
//!
//! Per-instantiation logic: decides whether the caller passed a message, a
//! structured payload, or both; merges declared defaults; manages stack
//! capture and cause chaining. Instances are value-like and owned by the
//! call stack that raised them; no registry retains instances.

use crate::registry::descriptor::VariantDescriptor;
use serde_json::{Map, Value};
use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// Primary construction argument.
#[derive(Debug, Clone, Default)]
pub enum Primary {
    #[default]
    None,
    /// Plain message text.
    Message(String),
    /// Structured payload; becomes `extra` and a JSON-serialized message.
    Payload(Value),
}

/// Value or error that triggered an instance. Read-only after construction.
#[derive(Debug, Clone)]
pub enum Cause {
    /// Another instance; its trace may be adopted and `source()` walks it.
    Instance(Box<ErrorInstance>),
    /// Anything else, flattened to its display text.
    Other(String),
}

impl Cause {
    /// Wrap a native error, preserving its message.
    pub fn from_error<E: StdError>(error: &E) -> Self {
        Cause::Other(error.to_string())
    }

    /// Trace carried by this cause, if any.
    pub fn stack(&self) -> Option<&str> {
        match self {
            Cause::Instance(instance) => Some(&instance.stack),
            Cause::Other(_) => None,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Instance(instance) => instance.fmt(f),
            Cause::Other(text) => f.write_str(text),
        }
    }
}

/// Original construction arguments, kept intact for instantiation hooks.
#[derive(Debug, Clone, Default)]
pub struct InstantiateArgs {
    pub primary: Primary,
    pub secondary: Option<Value>,
    pub cause: Option<Cause>,
}

impl InstantiateArgs {
    /// No arguments at all; defaults decide everything.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            primary: Primary::Message(message.into()),
            ..Self::default()
        }
    }

    pub fn payload(payload: Value) -> Self {
        Self {
            primary: Primary::Payload(payload),
            ..Self::default()
        }
    }

    /// Attach a structured extra payload alongside a message.
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.secondary = Some(extra);
        self
    }

    pub fn with_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }
}

/// One raised or constructed error.
#[derive(Debug, Clone)]
pub struct ErrorInstance {
    /// Variant name, e.g. `HttpNotFoundError`.
    pub name: String,
    /// Variant code; may be overridden per instance during normalization.
    pub code: String,
    /// Always a defined string; empty when none was given.
    pub message: String,
    /// Structured payload, present only when the caller supplied one as
    /// the primary argument (or as the explicit extra slot).
    pub extra: Option<Value>,
    /// Only meaningful when the error crosses the HTTP boundary.
    pub status_code: Option<u16>,
    /// Opaque response body; passthrough wins over message synthesis.
    pub body: Option<Value>,
    /// Validation-failure batch, reformatted by the serializer.
    pub schema_errors: Option<Vec<Value>>,
    /// Other fields applied from defaults or copied during normalization.
    pub fields: Map<String, Value>,
    /// Trace text: `"<name>[: message]"` followed by call-frame lines.
    pub stack: String,
    cause: Option<Cause>,
    display_override: Option<String>,
}

impl ErrorInstance {
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Override the display text, the way a payload with its own
    /// stringification would in a dynamic host.
    pub fn set_display(&mut self, text: impl Into<String>) {
        self.display_override = Some(text.into());
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// First line of the trace: `"<name>: <message>"` or just the name.
    pub fn head_line(&self) -> String {
        if self.message.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.message)
        }
    }
}

impl fmt::Display for ErrorInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = &self.display_override {
            f.write_str(text)
        } else if self.message.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

impl StdError for ErrorInstance {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Some(Cause::Instance(instance)) => Some(instance.as_ref()),
            _ => None,
        }
    }
}

/// Build an instance from a descriptor, its chain-resolved defaults and the
/// caller's arguments. Construction never fails: anomalies (for example a
/// payload that refuses to serialize) degrade to defaults.
pub fn instantiate(
    descriptor: &VariantDescriptor,
    defaults: &Map<String, Value>,
    args: InstantiateArgs,
) -> ErrorInstance {
    let mut instance = ErrorInstance {
        name: descriptor.name.clone(),
        code: descriptor.code.clone(),
        message: String::new(),
        extra: None,
        status_code: None,
        body: None,
        schema_errors: None,
        fields: Map::new(),
        stack: String::new(),
        cause: None,
        display_override: None,
    };

    // Explicit per-instance message assignment always wins over descriptor
    // defaults; a payload's serialization counts as explicit.
    let mut message_set = false;
    match (&args.primary, &args.secondary) {
        (Primary::Payload(payload), None) => {
            instance.extra = Some(payload.clone());
            instance.message = serde_json::to_string(payload).unwrap_or_default();
            message_set = true;
        }
        (Primary::Payload(payload), Some(secondary)) => {
            // Degenerate call shape: payload plus explicit extra. The extra
            // slot keeps the secondary value, the payload still names the
            // message.
            instance.message = serde_json::to_string(payload).unwrap_or_default();
            instance.extra = Some(secondary.clone());
            message_set = true;
        }
        (Primary::Message(message), secondary) => {
            instance.message = message.clone();
            instance.extra = secondary.clone();
            message_set = true;
        }
        (Primary::None, secondary) => {
            instance.extra = secondary.clone();
        }
    }

    for (key, value) in defaults {
        match key.as_str() {
            "statusCode" => {
                if instance.status_code.is_none() {
                    instance.status_code = value
                        .as_u64()
                        .and_then(|status| u16::try_from(status).ok());
                }
            }
            "message" => {
                if !message_set {
                    if let Some(text) = value.as_str() {
                        instance.message = text.to_string();
                    }
                }
            }
            _ => {
                instance
                    .fields
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }
    }

    if let Some(hook) = &descriptor.on_instantiate {
        hook(&mut instance, &args);
    }

    if let Some(cause) = args.cause {
        if let Some(trace) = cause.stack() {
            instance.stack = adopt_trace(&instance.head_line(), trace);
        }
        instance.cause = Some(cause);
    }
    if instance.stack.is_empty() {
        instance.stack = capture_stack(&instance.head_line());
    }

    instance
}

/// Capture a trace rooted at the construction site.
fn capture_stack(head: &str) -> String {
    let backtrace = Backtrace::force_capture();
    let mut stack = head.to_string();
    for line in backtrace.to_string().lines() {
        stack.push('\n');
        stack.push_str(line);
    }
    stack
}

/// Re-head an adopted trace with the new instance's own first line.
fn adopt_trace(head: &str, trace: &str) -> String {
    let mut stack = head.to_string();
    for line in trace.lines().skip(1) {
        stack.push('\n');
        stack.push_str(line);
    }
    stack
}

/// Remove exactly one frame line, the one belonging to an internal caller,
/// so the trace appears rooted at the user's call site.
pub fn strip_frame(stack: &str) -> String {
    let mut lines: Vec<&str> = stack.lines().collect();
    if lines.len() > 1 {
        lines.remove(1);
    }
    lines.join("\n")
}
