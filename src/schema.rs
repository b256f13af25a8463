//! Field declarations per record type, and the annotation collector that
//! merges them across a type's ancestry.
//!
//! A [`Schema`] is what a record registers about itself: its name, the base
//! schemas it extends, and its own [`FieldDecl`]s (name, [`TypeDescriptor`],
//! optional default). [`collect`] flattens a schema and all of its ancestors
//! into one ordered [`FieldSet`], with more-derived declarations shadowing
//! base declarations of the same name.
//!
//! # Ancestry order
//!
//! Ancestors are linearized depth-first, left to right, keeping only the
//! **last** occurrence of a schema that is reached through several paths.
//! For a diamond `D extends (B1, B2)`, both extending `A`, the order is
//! `D, B1, B2, A`, so `B2` shadows `A` and `B1` shadows `B2`.

use std::collections::BTreeSet;

use crate::descriptor::TypeDescriptor;
use crate::value::Value;

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    name: String,
    ty: TypeDescriptor,
    default: Option<fn() -> Value>,
}

impl FieldDecl {
    pub fn new(name: &str, ty: TypeDescriptor) -> Self {
        Self {
            name: name.to_string(),
            ty,
            default: None,
        }
    }

    /// Attach a static default, used when the data has no entry for this field.
    pub fn with_default(mut self, default: fn() -> Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn default_value(&self) -> Option<Value> {
        self.default.map(|make| make())
    }
}

/// Static declaration of a record type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    bases: Vec<Schema>,
    fields: Vec<FieldDecl>,
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            bases: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Inherit every field declaration of `base`.
    pub fn extends(mut self, base: Schema) -> Self {
        self.bases.push(base);
        self
    }

    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bases(&self) -> &[Schema] {
        &self.bases
    }

    /// Declarations made by this schema itself, without ancestors.
    pub fn own_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// This schema followed by its ancestors, most-derived first.
    pub fn ancestry(&self) -> Vec<&Schema> {
        let mut all = Vec::new();
        self.walk(&mut all);

        let mut seen = BTreeSet::new();
        let mut linear: Vec<&Schema> = all
            .into_iter()
            .rev()
            .filter(|schema| seen.insert(schema.name))
            .collect();
        linear.reverse();
        linear
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Schema>) {
        out.push(self);
        for base in &self.bases {
            base.walk(out);
        }
    }

    /// Static default for `field`, looked up most-derived first.
    pub fn default_for(&self, field: &str) -> Option<Value> {
        self.ancestry().into_iter().find_map(|schema| {
            schema
                .fields
                .iter()
                .find(|decl| decl.name == field)
                .and_then(FieldDecl::default_value)
        })
    }
}

/// Ordered field-name to descriptor mapping for one record type, ancestors
/// included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<(String, TypeDescriptor)>,
}

impl FieldSet {
    /// Insert or replace. A replaced entry keeps its original position.
    fn insert(&mut self, name: &str, ty: TypeDescriptor) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = ty,
            None => self.entries.push((name.to_string(), ty)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, ty)| ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.entries.iter().map(|(n, ty)| (n.as_str(), ty))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Gather every field declared by `schema` or its ancestors, minus `exclude`.
///
/// Bases are applied first and the schema itself last, so a derived type's
/// declaration wins over a base's declaration of the same name.
pub fn collect(schema: &Schema, exclude: &BTreeSet<String>) -> FieldSet {
    let mut set = FieldSet::default();
    for ancestor in schema.ancestry().into_iter().rev() {
        for decl in &ancestor.fields {
            set.insert(&decl.name, decl.ty.clone());
        }
    }
    set.entries.retain(|(name, _)| !exclude.contains(name));
    set
}
