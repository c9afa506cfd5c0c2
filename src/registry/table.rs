//! Process-wide table of declared error variants
//!
//! Supports declare, overwrite, clear, enumerate and parent-chain
//! resolution. Registry membership is last-write-wins: re-declaring a name
//! replaces the prior descriptor and its throw helper, no merge.

use crate::catalog;
use crate::codec;
use crate::instance::{self, ErrorInstance, InstantiateArgs};
use crate::registry::descriptor::{ParentRef, VariantDescriptor, VariantOptions};
use crate::registry::error::{DeclareError, DeclareResult};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Ancestry walks stop after this many hops; chains are expected to be
/// a handful of links deep.
const MAX_CHAIN_DEPTH: usize = 64;

/// Registry of variant descriptors keyed by canonical name.
#[derive(Debug)]
pub struct VariantRegistry {
    variants: HashMap<String, VariantDescriptor>,
    order: Vec<String>,
    codes: HashMap<String, String>,
    helpers: HashMap<String, String>,
}

impl VariantRegistry {
    /// Fresh registry containing only the Root variant.
    pub fn new() -> Self {
        let mut registry = Self {
            variants: HashMap::new(),
            order: Vec::new(),
            codes: HashMap::new(),
            helpers: HashMap::new(),
        };
        registry.publish(VariantDescriptor::root());
        registry
    }

    /// Declare a variant under `name`.
    ///
    /// Runs the factory, invokes the one-time declaration hook, publishes
    /// the descriptor unless the options say otherwise, and installs the
    /// throw helper for published variants. Returns the built descriptor.
    pub fn declare(
        &mut self,
        name: &str,
        mut options: VariantOptions,
    ) -> DeclareResult<VariantDescriptor> {
        if !name.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(DeclareError::missing_name(name));
        }

        let variant_name = codec::to_variant_name(name);
        let code = options
            .code
            .take()
            .unwrap_or_else(|| codec::to_code(&variant_name));

        let parent = match options.parent.take() {
            Some(parent_ref) => Some(self.resolve_parent(&parent_ref)),
            None if variant_name == codec::ROOT_VARIANT_NAME => None,
            None => Some(codec::ROOT_VARIANT_NAME.to_string()),
        };
        if let Some(parent_name) = &parent {
            self.check_ancestry(&variant_name, parent_name)?;
        }

        let mut descriptor = VariantDescriptor {
            name: variant_name,
            code,
            parent,
            defaults: options.defaults,
            metadata: Map::new(),
            on_instantiate: options.on_instantiate,
            published: options.publish,
        };

        if let Some(hook) = options.on_declare.take() {
            hook(&mut descriptor);
        }

        if descriptor.published {
            self.publish(descriptor.clone());
        }
        Ok(descriptor)
    }

    /// Insert a descriptor, replacing any previous one with the same name
    /// along with its code mapping and throw helper.
    fn publish(&mut self, descriptor: VariantDescriptor) {
        if let Some(previous) = self.variants.get(&descriptor.name) {
            self.codes.remove(&previous.code);
            self.helpers.remove(&previous.helper_name());
        } else {
            self.order.push(descriptor.name.clone());
        }
        self.codes
            .insert(descriptor.code.clone(), descriptor.name.clone());
        self.helpers
            .insert(descriptor.helper_name(), descriptor.name.clone());
        self.variants
            .insert(descriptor.name.clone(), descriptor);
    }

    /// Remove every variant and helper except Root. Idempotent.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Published variant names, Root included, in declaration order.
    pub fn list(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Look up a descriptor by canonical variant name.
    pub fn lookup(&self, variant_name: &str) -> Option<&VariantDescriptor> {
        self.variants.get(variant_name)
    }

    /// Look up a descriptor by machine code.
    pub fn lookup_code(&self, code: &str) -> Option<&VariantDescriptor> {
        self.codes.get(code).and_then(|name| self.variants.get(name))
    }

    /// Resolve an arbitrary name-or-code reference to a descriptor.
    pub fn resolve(&self, name_or_code: &str) -> Option<&VariantDescriptor> {
        self.lookup(&codec::to_variant_name(name_or_code))
            .or_else(|| self.lookup_code(name_or_code))
    }

    /// Resolve a reference to an owned descriptor, synthesizing one when
    /// nothing is declared under it.
    ///
    /// The synthesized descriptor carries the normalized requested name
    /// and its derived code over Root's defaults and parent, so raising
    /// an undeclared name still yields an instance under that name.
    pub fn descriptor_for(&self, name_or_code: &str) -> VariantDescriptor {
        if let Some(descriptor) = self.resolve(name_or_code) {
            return descriptor.clone();
        }
        let name = codec::to_variant_name(name_or_code);
        let code = codec::to_code(&name);
        VariantDescriptor {
            name,
            code,
            parent: Some(codec::ROOT_VARIANT_NAME.to_string()),
            ..VariantDescriptor::root()
        }
    }

    /// Resolve a parent reference to a variant name.
    ///
    /// Strings are normalized and used as-is when not yet declared: a
    /// forward reference is a caller error, not a crash, and the chain
    /// simply ends at the unknown name.
    pub fn resolve_parent(&self, parent: &ParentRef) -> String {
        match parent {
            ParentRef::Descriptor(descriptor) => descriptor.name.clone(),
            ParentRef::Name(name) => codec::to_variant_name(name),
        }
    }

    /// Refuse declarations that would make a variant its own ancestor.
    fn check_ancestry(&self, variant_name: &str, parent_name: &str) -> DeclareResult<()> {
        let mut current = Some(parent_name.to_string());
        let mut hops = 0;
        while let Some(name) = current {
            if name == variant_name {
                return Err(DeclareError::self_parent(variant_name, parent_name));
            }
            if hops >= MAX_CHAIN_DEPTH {
                break;
            }
            hops += 1;
            current = self
                .variants
                .get(&name)
                .and_then(|descriptor| descriptor.parent.clone());
        }
        Ok(())
    }

    /// Transitive is-a check along the parent chain.
    pub fn is_kind_of(&self, name: &str, ancestor: &str) -> bool {
        let target = codec::to_variant_name(ancestor);
        let mut current = Some(codec::to_variant_name(name));
        let mut hops = 0;
        while let Some(variant_name) = current {
            if variant_name == target {
                return true;
            }
            if hops >= MAX_CHAIN_DEPTH {
                return false;
            }
            hops += 1;
            current = self
                .variants
                .get(&variant_name)
                .and_then(|descriptor| descriptor.parent.clone());
        }
        false
    }

    /// Is-a check for a constructed instance.
    pub fn instance_of(&self, instance: &ErrorInstance, ancestor: &str) -> bool {
        self.is_kind_of(&instance.name, ancestor)
    }

    /// Merge defaults along the parent chain, root first, so the leaf's
    /// own defaults win.
    pub fn resolved_defaults(&self, descriptor: &VariantDescriptor) -> Map<String, Value> {
        let mut chain: Vec<&VariantDescriptor> = vec![descriptor];
        let mut parent = descriptor.parent.clone();
        let mut hops = 0;
        while let Some(name) = parent {
            if hops >= MAX_CHAIN_DEPTH {
                break;
            }
            hops += 1;
            match self.variants.get(&name) {
                Some(ancestor) => {
                    chain.push(ancestor);
                    parent = ancestor.parent.clone();
                }
                None => break,
            }
        }

        let mut defaults = Map::new();
        for descriptor in chain.iter().rev() {
            for (key, value) in &descriptor.defaults {
                defaults.insert(key.clone(), value.clone());
            }
        }
        defaults
    }

    /// Construct an instance of a descriptor with chain-resolved defaults.
    pub fn instantiate(
        &self,
        descriptor: &VariantDescriptor,
        args: InstantiateArgs,
    ) -> ErrorInstance {
        instance::instantiate(descriptor, &self.resolved_defaults(descriptor), args)
    }

    /// Variant name bound to a throw-helper key, e.g. `throwHttpNotFound`.
    pub fn helper_variant(&self, helper_name: &str) -> Option<&str> {
        self.helpers.get(helper_name).map(String::as_str)
    }

    pub fn has_helper(&self, helper_name: &str) -> bool {
        self.helpers.contains_key(helper_name)
    }

    /// Reset to the bootstrap state: Root plus one variant per catalog
    /// status plus the legacy short-code aliases. Callable repeatedly.
    pub fn bootstrap(&mut self) -> DeclareResult<()> {
        self.clear();
        for entry in catalog::STATUS_CATALOG {
            self.declare(
                &format!("http {}", entry.key),
                VariantOptions::new()
                    .status_code(entry.status)
                    .message(entry.reason),
            )?;
        }
        for alias in catalog::CODE_ALIASES {
            self.declare(
                alias.code,
                VariantOptions::new()
                    .code(alias.code)
                    .status_code(alias.status)
                    .message(alias.message),
            )?;
        }
        Ok(())
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}
