// SPDX-License-Identifier: (MIT OR Apache-2.0)

mod common;

use std::collections::BTreeSet;

use common::*;
use descry_model::ClassKind;
use descry_platform::{
    InMemoryPlatform, MetadataKind, PlatformClass, PlatformField, PlatformMethod, PlatformType,
    PlatformTypeParameter, PrimitiveKind,
};
use descry_resolve::{render, PlatformEntity, ScopeKind, SearchRule};

fn string() -> PlatformType {
    PlatformType::class("lang.String")
}

fn strings_class() -> PlatformClass {
    let comparable = PlatformType::generic("lang.Comparable", vec![PlatformType::variable("T")]);
    PlatformClass::new("util.Strings", ClassKind::Class)
        .final_class()
        .method(
            PlatformMethod::static_method("join")
                .param("parts", PlatformType::Array(Box::new(string())))
                .returns(string())
                .vararg(),
        )
        .method(
            PlatformMethod::static_method("max")
                .type_param(PlatformTypeParameter::new("T", vec![comparable]))
                .param("a", PlatformType::variable("T"))
                .param("b", PlatformType::variable("T"))
                .returns(PlatformType::variable("T")),
        )
        .method(PlatformMethod::new("length").returns(PlatformType::Primitive(PrimitiveKind::Int)))
        .field(PlatformField::static_field("EMPTY", string()).final_field())
        .field(PlatformField::new("value", string()))
        .nested_class(
            "Builder",
            PlatformClass::new("Builder", ClassKind::Class)
                .static_nested()
                .method(
                    PlatformMethod::static_method("create")
                        .returns(PlatformType::class("util.Strings.Builder")),
                ),
        )
        .nested_class(
            "Callback",
            PlatformClass::new("Callback", ClassKind::Interface)
                .method(PlatformMethod::abstract_method("call")),
        )
        .nested_class("Inner", PlatformClass::new("Inner", ClassKind::Class))
}

fn util_platform() -> InMemoryPlatform {
    let mut platform = InMemoryPlatform::new();
    platform.add_class(strings_class());
    platform.add_class(
        PlatformClass::new("util.Plain", ClassKind::Class)
            .method(PlatformMethod::new("run"))
            .field(PlatformField::new("count", PlatformType::Primitive(PrimitiveKind::Int))),
    );
    platform.add_class(
        PlatformClass::new("util.Color", ClassKind::Enum)
            .field(PlatformField::enum_entry("RED", PlatformType::class("util.Color")))
            .method(PlatformMethod::static_method("values").returns(PlatformType::Array(Box::new(
                PlatformType::class("util.Color"),
            ))))
            .method(
                PlatformMethod::static_method("valueOf")
                    .param("name", string())
                    .returns(PlatformType::class("util.Color")),
            ),
    );
    platform
}

#[test]
fn class_with_statics_becomes_a_namespace() {
    let session = session(util_platform());

    let fragment = session
        .resolve_package(&fq("util.Strings"), SearchRule::IncludeSource)
        .unwrap()
        .unwrap();
    assert_eq!(fragment.kind(), ScopeKind::StaticMembers);
    assert_eq!(
        render::scope(&session, fragment.scope()).unwrap(),
        [
            "class util.Strings.Builder",
            "interface util.Strings.Callback",
            "fun join(vararg parts: lang.String?): lang.String?",
            "fun <T : lang.Comparable<T?>?> max(a: T?, b: T?): T?",
            "val EMPTY: lang.String?",
        ]
    );
}

#[test]
fn instance_members_stay_out() {
    let session = session(util_platform());
    let fragment = session
        .resolve_package(&fq("util.Strings"), SearchRule::IncludeSource)
        .unwrap()
        .unwrap();
    let scope = fragment.scope();
    assert!(scope.functions(&session, &name("length")).unwrap().is_empty());
    assert!(scope.properties(&session, &name("value")).unwrap().is_empty());
    assert!(scope.classifier(&session, &name("Inner")).unwrap().is_none());
}

#[test]
fn namespace_members_belong_to_the_namespace() {
    let session = session(util_platform());
    let fragment = session
        .resolve_package(&fq("util.Strings"), SearchRule::IncludeSource)
        .unwrap()
        .unwrap();

    let join = fragment.scope().functions(&session, &name("join")).unwrap();
    assert_eq!(join.len(), 1);
    assert_eq!(session.declaration(join[0]).unwrap().containing(), Some(fragment.decl()));

    // A nested class reached through the namespace is the platform class
    // itself, contained by its outer class.
    let builder = fragment.scope().classifier(&session, &name("Builder")).unwrap().unwrap();
    assert_eq!(builder, class(&session, "util.Strings.Builder"));
    let strings = class(&session, "util.Strings");
    assert_eq!(session.declaration(builder).unwrap().containing(), Some(strings));

    let util = session.resolve_package(&fq("util"), SearchRule::IncludeSource).unwrap().unwrap();
    assert_eq!(session.declaration(strings).unwrap().containing(), Some(util.decl()));
    assert_eq!(
        rendered(&session, class(&session, "util.Strings.Inner")),
        "inner class util.Strings.Inner"
    );
}

#[test]
fn instance_only_class_is_not_a_package() {
    let session = session(util_platform());

    assert!(session
        .resolve_package(&fq("util.Plain"), SearchRule::IncludeSource)
        .unwrap()
        .is_none());
    assert!(matches!(session.merger().cached(&fq("util.Plain")), Some(None)));

    let allocated = session.arena().len();
    assert!(session
        .resolve_package(&fq("util.Plain"), SearchRule::IncludeSource)
        .unwrap()
        .is_none());
    assert_eq!(session.arena().len(), allocated);
}

#[test]
fn enum_class_object_members_do_not_count() {
    let session = session(util_platform());
    assert!(session
        .resolve_package(&fq("util.Color"), SearchRule::IncludeSource)
        .unwrap()
        .is_none());
}

#[test]
fn enum_with_other_statics_keeps_only_those() {
    let mut platform = InMemoryPlatform::new();
    platform.add_class(
        PlatformClass::new("util.Level", ClassKind::Enum)
            .field(PlatformField::enum_entry("LOW", PlatformType::class("util.Level")))
            .method(PlatformMethod::static_method("values"))
            .method(
                PlatformMethod::static_method("parse")
                    .param("code", PlatformType::Primitive(PrimitiveKind::Int))
                    .returns(PlatformType::class("util.Level")),
            ),
    );
    let session = session(platform);

    let fragment = session
        .resolve_package(&fq("util.Level"), SearchRule::IncludeSource)
        .unwrap()
        .unwrap();
    assert_eq!(
        render::scope(&session, fragment.scope()).unwrap(),
        ["fun parse(code: lang.Int): util.Level?"]
    );
}

#[test]
fn compiled_classes_are_never_namespaces() {
    let mut platform = InMemoryPlatform::new();
    platform.add_compiled_class(
        PlatformClass::new("util.Gen", ClassKind::Class).method(PlatformMethod::static_method("make")),
        MetadataKind::Class,
        Vec::new(),
    );
    let session = session(platform);
    assert!(session
        .resolve_package(&fq("util.Gen"), SearchRule::IncludeSource)
        .unwrap()
        .is_none());
}

#[test]
fn resolver_cache_records_owners() {
    let session = session(util_platform());
    let util = session.resolve_package(&fq("util"), SearchRule::IncludeSource).unwrap().unwrap();
    let strings = session
        .resolve_package(&fq("util.Strings"), SearchRule::IncludeSource)
        .unwrap()
        .unwrap();

    let cache = session.resolver_cache();
    assert!(cache.is_proper_package(&fq("util")));
    assert!(!cache.is_proper_package(&fq("util.Strings")));
    assert!(cache.is_static_members_namespace(&fq("util.Strings")));
    assert_eq!(cache.fragment_for(&PlatformEntity::Package(fq("util"))), Some(util.decl()));
    assert_eq!(
        cache.fragment_for(&PlatformEntity::Class(fq("util.Strings"))),
        Some(strings.decl())
    );
    assert_eq!(cache.fragment_for(&PlatformEntity::Class(fq("util.Plain"))), None);
}

#[test]
fn namespaces_are_sub_packages() {
    let session = session(util_platform());

    let expected: BTreeSet<_> = [fq("util.Strings")].into_iter().collect();
    assert_eq!(session.sub_packages(&fq("util")).unwrap(), expected);

    let expected: BTreeSet<_> = [fq("util.Strings.Builder")].into_iter().collect();
    assert_eq!(session.sub_packages(&fq("util.Strings")).unwrap(), expected);

    let root: BTreeSet<_> = [fq("util")].into_iter().collect();
    assert_eq!(session.sub_packages(&descry_model::FqName::root()).unwrap(), root);
    assert!(session.sub_packages(&fq("nowhere")).unwrap().is_empty());
}

#[test]
fn nested_namespace_resolves() {
    let session = session(util_platform());
    let builder = session
        .resolve_package(&fq("util.Strings.Builder"), SearchRule::IncludeSource)
        .unwrap()
        .unwrap();
    assert_eq!(
        render::scope(&session, builder.scope()).unwrap(),
        ["fun create(): util.Strings.Builder?"]
    );
}
