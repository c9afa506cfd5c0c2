//! Throw dispatch
//!
//! Resolves a name or code to a registered variant (undeclared names are
//! raised as-is over Root's defaults), instantiates it, and strips the
//! internal dispatch frame from the trace so it appears rooted at the
//! caller's site.
//!
//! Raising is an explicit tagged error value rather than a panic: callers
//! propagate the returned [`ErrorInstance`] through [`Raise`] results. This
//! is the intended substitution for throw/catch hosts, not a functional
//! difference.

use crate::codec;
use crate::instance::{strip_frame, ErrorInstance, InstantiateArgs};
use crate::registry::{self, VariantRegistry};

/// Result alias for operations that raise taxonomy errors.
pub type Raise<T> = Result<T, ErrorInstance>;

/// Build a raisable instance of the variant named or coded `name_or_code`.
///
/// Undeclared references raise under the requested name with Root's
/// defaults; no declaration is required. The frame belonging to this
/// dispatch call is removed from the trace.
pub fn throw_named(
    registry: &VariantRegistry,
    name_or_code: &str,
    args: InstantiateArgs,
) -> ErrorInstance {
    let requested = if name_or_code.is_empty() {
        "root"
    } else {
        name_or_code
    };
    let descriptor = registry.descriptor_for(requested);

    let mut instance = registry.instantiate(&descriptor, args);
    instance.stack = strip_frame(&instance.stack);
    instance
}

/// [`throw_named`] against the global registry.
pub fn throw(name_or_code: &str, args: InstantiateArgs) -> ErrorInstance {
    registry::with_global(|registry| throw_named(registry, name_or_code, args))
}

/// A throw helper bound to one declared variant.
///
/// One helper exists per published variant under its helper key
/// (`throwHttpNotFound` for `HttpNotFoundError`); looked up through
/// [`helper`].
#[derive(Debug, Clone)]
pub struct ThrowHelper {
    variant: String,
}

impl ThrowHelper {
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Raise the bound variant against an explicit registry.
    pub fn raise_with(&self, registry: &VariantRegistry, args: InstantiateArgs) -> ErrorInstance {
        throw_named(registry, &self.variant, args)
    }

    /// Raise the bound variant against the global registry.
    pub fn raise(&self, args: InstantiateArgs) -> ErrorInstance {
        throw(&self.variant, args)
    }
}

/// Look up the bound helper for a helper key, e.g. `throwHttpNotFound`.
pub fn helper(registry: &VariantRegistry, helper_name: &str) -> Option<ThrowHelper> {
    registry
        .helper_variant(helper_name)
        .map(|variant| ThrowHelper {
            variant: variant.to_string(),
        })
}

/// Convenience: helper key for a variant name.
pub fn helper_name_for(variant_name: &str) -> String {
    codec::to_throw_helper_name(&codec::to_variant_name(variant_name))
}
