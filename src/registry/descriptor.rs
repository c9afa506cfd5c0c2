//! Variant descriptors and declaration options
//!
//! A descriptor is pure data: identity, parent link, field defaults and an
//! optional instantiation hook. No executable code is synthesized at
//! declaration time; one generic instantiation routine consumes descriptors.

use crate::codec;
use crate::instance::{ErrorInstance, InstantiateArgs};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Hook invoked on every instantiation, after defaults are applied.
///
/// Receives the instance under construction and the original arguments;
/// may mutate the instance freely.
pub type InstantiateHook = dyn Fn(&mut ErrorInstance, &InstantiateArgs) + Send + Sync;

/// Hook invoked exactly once when a variant is declared.
///
/// Used to attach static class-level metadata to the descriptor itself.
pub type DeclareHook = dyn FnOnce(&mut VariantDescriptor) + Send;

/// Identity and behavior of one declared error kind.
#[derive(Clone)]
pub struct VariantDescriptor {
    /// Canonical class-style identifier, e.g. `HttpNotFoundError`.
    pub name: String,
    /// Machine code, e.g. `HTTP_NOT_FOUND_ERROR`.
    pub code: String,
    /// Parent variant name; `None` only for the Root variant.
    pub parent: Option<String>,
    /// Field defaults; conventional keys are `statusCode` and `message`.
    pub defaults: Map<String, Value>,
    /// Static metadata attached by the one-time declaration hook.
    pub metadata: Map<String, Value>,
    /// Optional per-instantiation hook.
    pub on_instantiate: Option<Arc<InstantiateHook>>,
    /// False when declared with `publish(false)`: constructible but not
    /// registered and without a throw helper.
    pub published: bool,
}

impl VariantDescriptor {
    /// The Root variant every other variant descends from.
    pub fn root() -> Self {
        Self {
            name: codec::ROOT_VARIANT_NAME.to_string(),
            code: codec::to_code(codec::ROOT_VARIANT_NAME),
            parent: None,
            defaults: Map::new(),
            metadata: Map::new(),
            on_instantiate: None,
            published: true,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Default message carried by this descriptor, if any.
    pub fn default_message(&self) -> Option<&str> {
        self.defaults.get("message").and_then(Value::as_str)
    }

    /// Default HTTP status carried by this descriptor, if any.
    pub fn default_status(&self) -> Option<u16> {
        self.defaults
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|n| u16::try_from(n).ok())
    }

    /// Throw-helper key for this variant, e.g. `throwHttpNotFound`.
    pub fn helper_name(&self) -> String {
        codec::to_throw_helper_name(&self.name)
    }
}

impl fmt::Debug for VariantDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantDescriptor")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("parent", &self.parent)
            .field("defaults", &self.defaults)
            .field("metadata", &self.metadata)
            .field("on_instantiate", &self.on_instantiate.as_ref().map(|_| "<hook>"))
            .field("published", &self.published)
            .finish()
    }
}

/// Reference to a parent variant: either a name string or a descriptor.
#[derive(Debug, Clone)]
pub enum ParentRef {
    Name(String),
    Descriptor(Box<VariantDescriptor>),
}

impl From<&str> for ParentRef {
    fn from(name: &str) -> Self {
        ParentRef::Name(name.to_string())
    }
}

impl From<String> for ParentRef {
    fn from(name: String) -> Self {
        ParentRef::Name(name)
    }
}

impl From<VariantDescriptor> for ParentRef {
    fn from(descriptor: VariantDescriptor) -> Self {
        ParentRef::Descriptor(Box::new(descriptor))
    }
}

/// Options accepted by `declare`.
///
/// Everything set through [`status_code`](Self::status_code),
/// [`message`](Self::message) and [`default_field`](Self::default_field)
/// lands in the descriptor's `defaults` table; parent, hooks and the
/// publish flag are consumed by the factory and never appear there.
pub struct VariantOptions {
    pub code: Option<String>,
    pub parent: Option<ParentRef>,
    pub publish: bool,
    pub defaults: Map<String, Value>,
    pub on_instantiate: Option<Arc<InstantiateHook>>,
    pub on_declare: Option<Box<DeclareHook>>,
}

impl Default for VariantOptions {
    fn default() -> Self {
        Self {
            code: None,
            parent: None,
            publish: true,
            defaults: Map::new(),
            on_instantiate: None,
            on_declare: None,
        }
    }
}

impl VariantOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the derived machine code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<ParentRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// When false the variant is constructible but never registered.
    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn status_code(mut self, status: u16) -> Self {
        self.defaults
            .insert("statusCode".to_string(), Value::from(status));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.defaults
            .insert("message".to_string(), Value::String(message.into()));
        self
    }

    /// Arbitrary default field applied to every instance.
    pub fn default_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    pub fn on_instantiate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ErrorInstance, &InstantiateArgs) + Send + Sync + 'static,
    {
        self.on_instantiate = Some(Arc::new(hook));
        self
    }

    pub fn on_declare<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut VariantDescriptor) + Send + 'static,
    {
        self.on_declare = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for VariantOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantOptions")
            .field("code", &self.code)
            .field("parent", &self.parent)
            .field("publish", &self.publish)
            .field("defaults", &self.defaults)
            .field("on_instantiate", &self.on_instantiate.as_ref().map(|_| "<hook>"))
            .field("on_declare", &self.on_declare.as_ref().map(|_| "<hook>"))
            .finish()
    }
}
