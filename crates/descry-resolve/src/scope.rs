// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Package fragments and the member scopes behind them.

use std::sync::Arc;

use descry_deserialize::{DecodeError, DeclarationDecoder};
use descry_metadata::CallableRecord;
use descry_model::{DeclId, FqName, MemoizedCache, Name, NameTable};
use descry_platform::{
    field_belongs_to_class_object, is_sam_interface, method_belongs_to_class_object,
    PlatformClass, PlatformMethod, PlatformPackage,
};
use indexmap::IndexSet;

use crate::error::ResolveError;
use crate::facade::SearchRule;
use crate::members;
use crate::session::ResolutionSession;
use crate::static_members::should_create_static_members_package;

/// One resolved package: its declaration and the scope holding its members.
#[derive(Debug)]
pub struct PackageFragment {
    decl: DeclId,
    fq_name: FqName,
    scope: Scope,
}

impl PackageFragment {
    pub(crate) fn new(decl: DeclId, fq_name: FqName, scope: Scope) -> Self {
        Self {
            decl,
            fq_name,
            scope,
        }
    }

    pub fn decl(&self) -> DeclId {
        self.decl
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn kind(&self) -> ScopeKind {
        self.scope.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    CompiledModule,
    PlatformPackage,
    StaticMembers,
}

impl ScopeKind {
    pub fn describe(self) -> &'static str {
        match self {
            ScopeKind::CompiledModule => "compiled module",
            ScopeKind::PlatformPackage => "platform package",
            ScopeKind::StaticMembers => "static members",
        }
    }
}

/// Members of one package fragment.
///
/// Every variant answers the same queries. Lookups build declarations on
/// first use and return the same ids on every later call.
#[derive(Debug, Clone)]
pub enum Scope {
    /// Top-level members decoded from a compiled package class.
    CompiledModule(Arc<CompiledModuleScope>),
    /// A platform package; holds classes only.
    PlatformPackage(Arc<PlatformPackageScope>),
    /// Static members of a platform class, seen as a namespace.
    StaticMembers(Arc<StaticMembersScope>),
}

impl Scope {
    pub(crate) fn compiled_module(
        fragment: DeclId,
        fq_name: FqName,
        names: NameTable,
        members: Vec<CallableRecord>,
    ) -> Self {
        Scope::CompiledModule(Arc::new(CompiledModuleScope {
            fragment,
            fq_name,
            names,
            members,
            functions: MemoizedCache::new("compiled functions"),
        }))
    }

    pub(crate) fn platform_package(fragment: DeclId, package: Arc<PlatformPackage>) -> Self {
        Scope::PlatformPackage(Arc::new(PlatformPackageScope { fragment, package }))
    }

    pub(crate) fn static_members(fragment: DeclId, class: Arc<PlatformClass>) -> Self {
        Scope::StaticMembers(Arc::new(StaticMembersScope {
            fragment,
            class,
            functions: MemoizedCache::new("static functions"),
            properties: MemoizedCache::new("static properties"),
        }))
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::CompiledModule(_) => ScopeKind::CompiledModule,
            Scope::PlatformPackage(_) => ScopeKind::PlatformPackage,
            Scope::StaticMembers(_) => ScopeKind::StaticMembers,
        }
    }

    /// The package fragment owning this scope's members.
    pub fn fragment(&self) -> DeclId {
        match self {
            Scope::CompiledModule(scope) => scope.fragment,
            Scope::PlatformPackage(scope) => scope.fragment,
            Scope::StaticMembers(scope) => scope.fragment,
        }
    }

    pub fn classifier(
        &self,
        session: &ResolutionSession,
        name: &Name,
    ) -> Result<Option<DeclId>, ResolveError> {
        match self {
            Scope::CompiledModule(scope) => {
                session.package_member_class(&scope.fq_name.child(name.clone()))
            }
            Scope::PlatformPackage(scope) => {
                let fq_name = scope.package.fq_name.child(name.clone());
                if !scope.package.classes.contains(&fq_name) {
                    return Ok(None);
                }
                session.package_member_class(&fq_name)
            }
            Scope::StaticMembers(scope) => match scope.nested_class(name) {
                Some(nested) => session.find_class(&nested.fq_name, SearchRule::IncludeSource),
                None => Ok(None),
            },
        }
    }

    pub fn functions(
        &self,
        session: &ResolutionSession,
        name: &Name,
    ) -> Result<Vec<DeclId>, ResolveError> {
        match self {
            Scope::CompiledModule(scope) => scope.functions(session, name),
            Scope::PlatformPackage(_) => Ok(Vec::new()),
            Scope::StaticMembers(scope) => scope.functions(session, name),
        }
    }

    pub fn properties(
        &self,
        session: &ResolutionSession,
        name: &Name,
    ) -> Result<Vec<DeclId>, ResolveError> {
        match self {
            Scope::StaticMembers(scope) => scope.properties(session, name),
            Scope::CompiledModule(_) | Scope::PlatformPackage(_) => Ok(Vec::new()),
        }
    }

    /// Every member, classifiers first, then functions and properties in
    /// declaration order.
    pub fn all_descriptors(&self, session: &ResolutionSession) -> Result<Vec<DeclId>, ResolveError> {
        let mut all = Vec::new();
        for member in self.member_names(session)? {
            all.extend(self.member(session, &member)?);
        }
        Ok(all)
    }

    /// Names of every member, in the order `all_descriptors` builds them.
    pub(crate) fn member_names(&self, session: &ResolutionSession) -> Result<Vec<MemberName>, ResolveError> {
        let names = match self {
            Scope::CompiledModule(scope) => session
                .class_names_in_package(&scope.fq_name)
                .into_iter()
                .map(|name| MemberName::Class(scope.fq_name.child(name)))
                .chain(scope.function_names()?.into_iter().map(MemberName::Function))
                .collect(),
            Scope::PlatformPackage(scope) => scope
                .package
                .classes
                .iter()
                .cloned()
                .map(MemberName::Class)
                .collect(),
            Scope::StaticMembers(scope) => scope
                .eligible_nested()
                .map(|nested| MemberName::Class(nested.fq_name.clone()))
                .chain(scope.function_names().into_iter().map(MemberName::Function))
                .chain(scope.property_names().into_iter().map(MemberName::Property))
                .collect(),
        };
        Ok(names)
    }

    /// Build the declarations behind one member name.
    pub(crate) fn member(
        &self,
        session: &ResolutionSession,
        member: &MemberName,
    ) -> Result<Vec<DeclId>, ResolveError> {
        match member {
            MemberName::Class(fq_name) => match self {
                Scope::StaticMembers(_) => {
                    Ok(session.find_class(fq_name, SearchRule::IncludeSource)?.into_iter().collect())
                }
                Scope::CompiledModule(_) | Scope::PlatformPackage(_) => {
                    Ok(session.package_member_class(fq_name)?.into_iter().collect())
                }
            },
            MemberName::Function(name) => self.functions(session, name),
            MemberName::Property(name) => self.properties(session, name),
        }
    }

    /// Packages nested directly under this one. Compiled-module scopes do
    /// not enumerate nested packages and always return an empty list.
    pub fn sub_packages(&self, session: &ResolutionSession) -> Vec<FqName> {
        match self {
            Scope::CompiledModule(_) => Vec::new(),
            Scope::PlatformPackage(scope) => {
                let mut packages = scope.package.sub_packages.clone();
                packages.extend(scope.package.classes.iter().filter_map(|fq_name| {
                    let class = session.platform().find_class(fq_name)?;
                    should_create_static_members_package(&class).then(|| fq_name.clone())
                }));
                packages
            }
            Scope::StaticMembers(scope) => scope
                .eligible_nested()
                .filter(|nested| should_create_static_members_package(nested))
                .map(|nested| nested.fq_name.clone())
                .collect(),
        }
    }
}

/// One name a scope answers for, tagged with the lookup that builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MemberName {
    Class(FqName),
    Function(Name),
    Property(Name),
}

#[derive(Debug)]
pub struct CompiledModuleScope {
    fragment: DeclId,
    fq_name: FqName,
    names: NameTable,
    members: Vec<CallableRecord>,
    functions: MemoizedCache<Name, Vec<DeclId>>,
}

impl CompiledModuleScope {
    fn functions(&self, session: &ResolutionSession, name: &Name) -> Result<Vec<DeclId>, ResolveError> {
        self.functions.get_or_compute_value(name, || {
            let decoder = DeclarationDecoder::new(
                session.arena(),
                session.builtins(),
                &self.names,
                session,
                self.fragment,
            );
            let mut functions = Vec::new();
            for record in &self.members {
                if self.names.name(record.name).map_err(DecodeError::from)? == name {
                    functions.push(decoder.load_function(record)?);
                }
            }
            Ok(functions)
        })
    }

    fn function_names(&self) -> Result<IndexSet<Name>, ResolveError> {
        self.members
            .iter()
            .map(|record| {
                self.names
                    .name(record.name)
                    .cloned()
                    .map_err(|err| ResolveError::from(DecodeError::from(err)))
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct PlatformPackageScope {
    fragment: DeclId,
    package: Arc<PlatformPackage>,
}

#[derive(Debug)]
pub struct StaticMembersScope {
    fragment: DeclId,
    class: Arc<PlatformClass>,
    functions: MemoizedCache<Name, Vec<DeclId>>,
    properties: MemoizedCache<Name, Vec<DeclId>>,
}

impl StaticMembersScope {
    fn functions(&self, session: &ResolutionSession, name: &Name) -> Result<Vec<DeclId>, ResolveError> {
        self.functions.get_or_compute_value(name, || {
            self.class
                .methods
                .iter()
                .filter(|method| &method.name == name && self.is_namespace_method(method))
                .map(|method| members::reflect_function(session, self.fragment, method))
                .collect()
        })
    }

    fn properties(&self, session: &ResolutionSession, name: &Name) -> Result<Vec<DeclId>, ResolveError> {
        self.properties.get_or_compute_value(name, || {
            self.class
                .fields
                .iter()
                .filter(|field| {
                    &field.name == name
                        && field.is_static
                        && !field_belongs_to_class_object(&self.class, field)
                })
                .map(|field| members::reflect_property(session, self.fragment, field))
                .collect()
        })
    }

    fn is_namespace_method(&self, method: &PlatformMethod) -> bool {
        method.is_static && !method_belongs_to_class_object(&self.class, method)
    }

    fn function_names(&self) -> IndexSet<Name> {
        self.class
            .methods
            .iter()
            .filter(|method| self.is_namespace_method(method))
            .map(|method| method.name.clone())
            .collect()
    }

    fn property_names(&self) -> IndexSet<Name> {
        self.class
            .fields
            .iter()
            .filter(|field| field.is_static && !field_belongs_to_class_object(&self.class, field))
            .map(|field| field.name.clone())
            .collect()
    }

    /// Nested classes reachable through the namespace: static ones and SAM
    /// interfaces.
    fn eligible_nested(&self) -> impl Iterator<Item = &Arc<PlatformClass>> + '_ {
        self.class
            .nested
            .iter()
            .filter(|nested| nested.is_static || is_sam_interface(nested))
    }

    fn nested_class(&self, name: &Name) -> Option<&Arc<PlatformClass>> {
        self.eligible_nested().find(|nested| &nested.name() == name)
    }
}
