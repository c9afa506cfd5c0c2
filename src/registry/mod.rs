//! Variant registry
//!
//! The registry is process-wide mutable state with an explicit lifecycle:
//! `bootstrap()`/`clear()` may run at process start and at arbitrary points
//! thereafter (for example before each isolated test). Prefer passing a
//! [`VariantRegistry`] explicitly; the global singleton below exists for
//! ergonomic call sites and mirrors the registry API one-to-one.

pub mod descriptor;
pub mod error;
pub mod table;

pub use descriptor::{
    DeclareHook, InstantiateHook, ParentRef, VariantDescriptor, VariantOptions,
};
pub use error::{DeclareError, DeclareResult};
pub use table::VariantRegistry;

use std::sync::{Mutex, MutexGuard, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Mutex<VariantRegistry>> = OnceLock::new();

/// The default process-wide registry, bootstrapped on first access.
pub fn global() -> &'static Mutex<VariantRegistry> {
    GLOBAL_REGISTRY.get_or_init(|| {
        let mut registry = VariantRegistry::new();
        // Static catalog data cannot trip a declaration error.
        let _ = registry.bootstrap();
        Mutex::new(registry)
    })
}

fn lock_global() -> MutexGuard<'static, VariantRegistry> {
    // A poisoned lock only means another thread panicked mid-declaration;
    // the table itself stays usable and error reporting must not fail.
    global()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run a closure against the global registry.
pub fn with_global<R>(f: impl FnOnce(&mut VariantRegistry) -> R) -> R {
    let mut guard = lock_global();
    f(&mut guard)
}

/// Reset the global registry to its bootstrap state.
pub fn init() -> DeclareResult<()> {
    with_global(|registry| registry.bootstrap())
}

/// Remove every global variant and helper except Root.
pub fn clean() {
    with_global(|registry| registry.clear());
}

/// Declare a variant in the global registry.
pub fn declare(name: &str, options: VariantOptions) -> DeclareResult<VariantDescriptor> {
    with_global(|registry| registry.declare(name, options))
}
