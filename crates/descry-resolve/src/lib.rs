// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Name resolution over compiled modules and host-platform classes.
//!
//! A [`ResolutionSession`] is the entry point. It resolves qualified names
//! to class and package declarations, merging two sources per package:
//! compiled-module metadata (read through `descry-deserialize`) and
//! reflected platform structure (`descry-platform`). Platform classes that
//! only carry static members are exposed as namespaces of their own.
//!
//! Everything is computed on first demand and cached for the life of the
//! session; asking twice returns the same declaration.

mod cache;
mod class;
mod config;
mod error;
mod facade;
mod members;
mod merger;
pub mod render;
mod scope;
mod session;
mod source;
mod static_members;

pub use cache::{PlatformEntity, ResolverCache};
pub use config::{SessionConfig, Strategy, LAZY};
pub use error::ResolveError;
pub use facade::SearchRule;
pub use merger::FragmentMerger;
pub use scope::{PackageFragment, Scope, ScopeKind};
pub use session::ResolutionSession;
pub use source::{SourceClassRegistry, SourceClassResolver};
pub use static_members::{has_static_members, should_create_static_members_package};
