//! errkit - runtime error taxonomy and HTTP error-response serialization
//!
//! Callers declare named error variants (code, default status, default
//! message, parent, custom hooks), raise instances through bound helpers,
//! and convert anything error-shaped into a well-formed HTTP status plus
//! JSON body.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod instance;
pub mod logging;
pub mod registry;
pub mod response;

pub use config::{LoggingPreferences, SerializerPreferences};
pub use dispatch::{helper, throw, throw_named, Raise, ThrowHelper};
pub use instance::{Cause, ErrorInstance, InstantiateArgs, Primary};
pub use registry::{
    clean, declare, init, with_global, DeclareError, DeclareResult, ParentRef, VariantDescriptor,
    VariantOptions, VariantRegistry,
};
pub use response::{
    send, ErrorInput, RecordingSink, RequestContext, ResponseSerializer, ResponseSink,
};
