// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The resolution session: collaborators, arena and caches.

use std::sync::{Arc, OnceLock};

use descry_deserialize::ClassLookup;
use descry_model::{
    Attributes, Builtins, DeclArena, DeclId, DeclKind, Declaration, FqName, MemoizedCache, Name,
    Origin,
};
use descry_platform::{CompiledClassFinder, PlatformClassFinder};
use tracing::debug;

use crate::cache::ResolverCache;
use crate::config::SessionConfig;
use crate::error::ResolveError;
use crate::facade::SearchRule;
use crate::merger::FragmentMerger;
use crate::source::SourceClassResolver;

/// All state of one compilation's view of compiled code.
///
/// Sessions are independent of each other. Within a session every cache
/// lives as long as the session, and each qualified name maps to at most
/// one declaration.
pub struct ResolutionSession {
    pub(crate) config: SessionConfig,
    platform: Arc<dyn PlatformClassFinder>,
    compiled: Arc<dyn CompiledClassFinder>,
    pub(crate) source: Arc<dyn SourceClassResolver>,
    arena: DeclArena,
    module: DeclId,
    builtins: Builtins,
    merger: OnceLock<FragmentMerger>,
    cache: ResolverCache,
    /// Platform class shells by qualified name.
    pub(crate) classes: MemoizedCache<FqName, DeclId>,
    /// Type parameters of platform classes, built on first access.
    pub(crate) class_type_parameters: MemoizedCache<DeclId, Vec<DeclId>>,
    /// Packages fully built by the eager strategy, with their member count.
    pub(crate) materialized: MemoizedCache<FqName, usize>,
}

impl ResolutionSession {
    pub fn new(
        config: SessionConfig,
        platform: Arc<dyn PlatformClassFinder>,
        compiled: Arc<dyn CompiledClassFinder>,
        source: Arc<dyn SourceClassResolver>,
    ) -> Result<Self, ResolveError> {
        let arena = DeclArena::new();
        let module = arena.alloc(
            None,
            module_name(&config.module_name),
            Origin::Synthesized,
            DeclKind::Module,
        );
        module.initialize(Attributes::Module)?;
        let builtins = Builtins::new(&arena, module.id())?;
        debug!(
            module = %module.name(),
            strategy = ?config.strategy,
            builtins = builtins.len(),
            "started resolution session"
        );

        Ok(Self {
            config,
            platform,
            compiled,
            source,
            arena,
            module: module.id(),
            builtins,
            merger: OnceLock::new(),
            cache: ResolverCache::new(),
            classes: MemoizedCache::new("classes"),
            class_type_parameters: MemoizedCache::new("class type parameters"),
            materialized: MemoizedCache::new("materialized packages"),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Declaration storage. Source analysis allocates its own declarations
    /// here before recording them with the source hook.
    pub fn arena(&self) -> &DeclArena {
        &self.arena
    }

    pub fn module(&self) -> DeclId {
        self.module
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn resolver_cache(&self) -> &ResolverCache {
        &self.cache
    }

    pub fn declaration(&self, id: DeclId) -> Result<Arc<Declaration>, ResolveError> {
        Ok(self.arena.get(id)?)
    }

    /// The fragment merger, created on first use.
    pub fn merger(&self) -> &FragmentMerger {
        self.merger
            .get_or_init(|| FragmentMerger::new(self.config.package_class_name.clone()))
    }

    pub(crate) fn platform(&self) -> &dyn PlatformClassFinder {
        self.platform.as_ref()
    }

    pub(crate) fn compiled(&self) -> &dyn CompiledClassFinder {
        self.compiled.as_ref()
    }

    /// Allocate the declaration of a package fragment under the module.
    pub(crate) fn alloc_fragment(&self, fq_name: &FqName) -> Result<DeclId, ResolveError> {
        let name = fq_name
            .short_name()
            .cloned()
            .unwrap_or_else(|| Name::special("root"));
        let fragment = self.arena.alloc(
            Some(self.module),
            name,
            Origin::Synthesized,
            DeclKind::PackageFragment {
                fq_name: fq_name.clone(),
            },
        );
        fragment.initialize(Attributes::PackageFragment)?;
        Ok(fragment.id())
    }
}

impl ClassLookup for ResolutionSession {
    type Error = ResolveError;

    fn class_by_fq_name(&self, fq_name: &FqName) -> Result<Option<DeclId>, ResolveError> {
        self.find_class(fq_name, SearchRule::IncludeSource)
    }
}

fn module_name(configured: &str) -> Name {
    let inner = configured
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(configured);
    Name::special(inner)
}
