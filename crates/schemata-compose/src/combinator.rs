//! # Standalone Combinators
//!
//! `allOf` / `anyOf` / `oneOf` / `not` built from a mix of type
//! references and inline fragments, without binding the result to a
//! property. The output is an ordinary fragment and can be used as an
//! inline member of another combinator or union.

use schemata_core::{Combinator, Fragment, SchemaResult, TypeDef};

use crate::resolver::TypeRef;
use crate::store::Registry;

/// A member of a union or combinator.
#[derive(Debug, Clone, PartialEq)]
pub enum UnionMember {
    /// Resolved through the registry.
    Ref(TypeRef),
    /// Used verbatim.
    Inline(Fragment),
}

impl From<TypeRef> for UnionMember {
    fn from(r: TypeRef) -> Self {
        Self::Ref(r)
    }
}

impl From<TypeDef> for UnionMember {
    fn from(t: TypeDef) -> Self {
        Self::Ref(TypeRef::Type(t))
    }
}

impl From<&TypeDef> for UnionMember {
    fn from(t: &TypeDef) -> Self {
        Self::Ref(TypeRef::Type(t.clone()))
    }
}

impl From<Fragment> for UnionMember {
    fn from(f: Fragment) -> Self {
        Self::Inline(f)
    }
}

impl Registry {
    /// Resolve a single member.
    pub fn resolve_member(&self, member: &UnionMember) -> SchemaResult<Fragment> {
        match member {
            UnionMember::Ref(r) => self.resolve(r),
            UnionMember::Inline(f) => Ok(f.clone()),
        }
    }

    /// Resolve every member, failing on the first unresolvable one.
    pub fn resolve_members(&self, members: &[UnionMember]) -> SchemaResult<Vec<Fragment>> {
        members.iter().map(|m| self.resolve_member(m)).collect()
    }

    /// `{kind: [members..]}`.
    pub fn combine(&self, kind: Combinator, members: &[UnionMember]) -> SchemaResult<Fragment> {
        Ok(Fragment::combinator(kind, self.resolve_members(members)?))
    }

    /// `{allOf: [members..]}`.
    pub fn all_of(&self, members: &[UnionMember]) -> SchemaResult<Fragment> {
        self.combine(Combinator::AllOf, members)
    }

    /// `{anyOf: [members..]}`.
    pub fn any_of(&self, members: &[UnionMember]) -> SchemaResult<Fragment> {
        self.combine(Combinator::AnyOf, members)
    }

    /// `{oneOf: [members..]}`.
    pub fn one_of(&self, members: &[UnionMember]) -> SchemaResult<Fragment> {
        self.combine(Combinator::OneOf, members)
    }

    /// `{not: member}`.
    pub fn not(&self, member: &UnionMember) -> SchemaResult<Fragment> {
        self.resolve_member(member).map(Fragment::negation)
    }
}
