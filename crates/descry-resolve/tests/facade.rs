// SPDX-License-Identifier: (MIT OR Apache-2.0)

mod common;

use std::sync::Arc;
use std::thread;

use common::*;
use descry_metadata::{ClassKindRecord, TypeRecord};
use descry_model::{ClassHeader, ClassKind, DeclKind, Modality, Origin, Visibility};
use descry_platform::{
    InMemoryPlatform, MetadataKind, PlatformClass, PlatformMethod, PlatformType,
    PlatformTypeParameter, DEFAULT_PACKAGE_CLASS_NAME,
};
use descry_resolve::{
    render, ResolutionSession, ResolveError, ScopeKind, SearchRule, SourceClassRegistry, Strategy,
};

fn mixed_platform() -> InMemoryPlatform {
    let mut w = MetadataWriter::new();
    let t = w.type_param(0, "T", vec![]);
    let node = w.generic("p.Node", vec![TypeRecord::parameter(0)], false);
    let x = w.value("x", TypeRecord::parameter(0));
    let wrap = w.function("wrap", vec![t], vec![x], node);

    let mut platform = InMemoryPlatform::new();
    platform.add_class(
        PlatformClass::new("p.Node", ClassKind::Class).type_param(PlatformTypeParameter::new(
            "T",
            vec![PlatformType::generic("p.Node", vec![PlatformType::variable("T")])],
        )),
    );
    platform.add_compiled_package(&fq("p"), DEFAULT_PACKAGE_CLASS_NAME, w.package(vec![wrap]));
    platform.add_class(
        PlatformClass::new("q.Tools", ClassKind::Class)
            .method(
                PlatformMethod::static_method("first")
                    .type_param(PlatformTypeParameter::new("E", vec![]))
                    .param("items", PlatformType::generic("p.Node", vec![PlatformType::variable("E")]))
                    .returns(PlatformType::variable("E")),
            )
            .method(PlatformMethod::static_method("reset")),
    );
    platform
}

fn render_everything(session: &ResolutionSession) -> Vec<String> {
    let mut lines = Vec::new();
    for package in ["p", "q", "q.Tools"] {
        let fragment = session
            .resolve_package(&fq(package), SearchRule::IncludeSource)
            .unwrap()
            .unwrap();
        lines.push(rendered(session, fragment.decl()));
        lines.extend(render::scope(session, fragment.scope()).unwrap());
    }
    lines
}

#[test]
fn builtins_take_priority() {
    let session = session(mixed_platform());
    let string = session
        .resolve_class(&fq("lang.String"), SearchRule::ErrorIfFoundInSource)
        .unwrap();
    assert_eq!(string, session.builtins().class_named("String"));
}

#[test]
fn reflected_class_bound_refers_to_itself() {
    let session = session(mixed_platform());
    let node = class(&session, "p.Node");
    assert_eq!(rendered(&session, node), "class p.Node<T : p.Node<T?>?>");

    let parameters = session.class_type_parameters(node).unwrap();
    assert_eq!(session.class_type_parameters(node).unwrap(), parameters);
    assert_eq!(session.declaration(parameters[0]).unwrap().containing(), Some(node));
}

#[test]
fn inner_class_sees_outer_type_parameters() {
    let mut platform = InMemoryPlatform::new();
    platform.add_class(
        PlatformClass::new("p.Outer", ClassKind::Class)
            .type_param(PlatformTypeParameter::new("T", vec![]))
            .nested_class(
                "Inner",
                PlatformClass::new("Inner", ClassKind::Class)
                    .type_param(PlatformTypeParameter::new("U", vec![PlatformType::variable("T")])),
            )
            .nested_class(
                "Nested",
                PlatformClass::new("Nested", ClassKind::Class)
                    .static_nested()
                    .type_param(PlatformTypeParameter::new("V", vec![PlatformType::variable("T")])),
            ),
    );
    let session = session(platform);

    let outer = class(&session, "p.Outer");
    let inner = class(&session, "p.Outer.Inner");
    assert_eq!(rendered(&session, inner), "inner class p.Outer.Inner<U : T?>");

    let t = session.class_type_parameters(outer).unwrap()[0];
    let u = session.class_type_parameters(inner).unwrap()[0];
    let u = session.declaration(u).unwrap();
    assert_eq!(u.containing(), Some(inner));
    assert_eq!(u.as_type_parameter().unwrap().upper_bounds[0].target(), Some(t));

    // A static nested class has no access to the outer parameters.
    let nested = class(&session, "p.Outer.Nested");
    assert_eq!(
        session.class_type_parameters(nested),
        Err(ResolveError::UnknownTypeVariable {
            name: name("T"),
            member: "p.Outer.Nested".to_string(),
        })
    );
}

#[test]
fn compiled_inner_class_sees_outer_type_parameters() {
    let platform = || {
        let mut outer_writer = MetadataWriter::new();
        let t = outer_writer.type_param(0, "T", vec![]);
        let outer_bytes = outer_writer.class_metadata("p.Outer", ClassKindRecord::Class, vec![t]);

        let mut inner_writer = MetadataWriter::new();
        let u = inner_writer.type_param(1, "U", vec![TypeRecord::parameter(0)]);
        let inner_bytes =
            inner_writer.class_metadata("p.Outer.Inner", ClassKindRecord::Class, vec![u]);

        let outer = PlatformClass::new("p.Outer", ClassKind::Class)
            .type_param(PlatformTypeParameter::new("T", vec![]))
            .nested_class("Inner", PlatformClass::new("Inner", ClassKind::Class));
        let inner = (*outer.nested[0]).clone();
        let mut platform = InMemoryPlatform::new();
        platform.add_compiled_class(outer, MetadataKind::Class, outer_bytes);
        platform.add_compiled_class(inner, MetadataKind::Class, inner_bytes);
        platform
    };

    for session in [session(platform()), eager_session(platform())] {
        let outer = class(&session, "p.Outer");
        let inner = class(&session, "p.Outer.Inner");
        assert_eq!(rendered(&session, inner), "inner class p.Outer.Inner<U : T>");

        let t = session.class_type_parameters(outer).unwrap()[0];
        let u = session.class_type_parameters(inner).unwrap()[0];
        let u = session.declaration(u).unwrap();
        assert_eq!(u.origin(), Origin::Deserialized);
        assert_eq!(u.as_type_parameter().unwrap().upper_bounds[0].target(), Some(t));
    }
}

#[test]
fn lazy_and_eager_render_the_same() {
    let lazy = session(mixed_platform());
    let eager = eager_session(mixed_platform());
    assert_eq!(render_everything(&lazy), render_everything(&eager));
    assert_eq!(
        render_everything(&lazy),
        [
            "package p",
            "fun <T : lang.Any> wrap(x: T): p.Node<T>",
            "package q",
            "class q.Tools",
            "package q.Tools",
            "fun <E : lang.Any> first(items: p.Node<E?>?): E?",
            "fun reset(): lang.Unit",
        ]
    );
}

#[test]
fn eager_builds_members_up_front() {
    let lazy = session(mixed_platform());
    let eager = eager_session(mixed_platform());

    for session in [&lazy, &eager] {
        session.resolve_package(&fq("q.Tools"), SearchRule::IncludeSource).unwrap();
    }
    assert!(eager.arena().len() > lazy.arena().len());

    let lazy_node = class(&lazy, "p.Node");
    let eager_node = class(&eager, "p.Node");
    assert!(!lazy.declaration(lazy_node).unwrap().is_initialized());
    assert!(eager.declaration(eager_node).unwrap().is_initialized());
}

#[test]
fn source_classes_shadow_binaries() {
    let mut platform = InMemoryPlatform::new();
    platform.add_class(PlatformClass::new("app.Main", ClassKind::Class));
    platform.add_class(
        PlatformClass::new("app.Launcher", ClassKind::Class)
            .method(PlatformMethod::static_method("start").param("main", PlatformType::class("app.Main"))),
    );
    let source = Arc::new(SourceClassRegistry::new());
    let session = session_with(Arc::new(platform), Strategy::Lazy, source.clone());

    let main = session.arena().alloc(
        Some(session.module()),
        name("Main"),
        Origin::Source,
        DeclKind::Class(ClassHeader {
            fq_name: fq("app.Main"),
            kind: ClassKind::Class,
            modality: Modality::Final,
            visibility: Visibility::Public,
            is_inner: false,
        }),
    );
    assert_eq!(source.record(fq("app.Main"), main.id()), main.id());

    let found = session.resolve_class(&fq("app.Main"), SearchRule::IncludeSource).unwrap();
    assert_eq!(found, Some(main.id()));

    let binary = session
        .resolve_class(&fq("app.Main"), SearchRule::IgnoreSource)
        .unwrap()
        .unwrap();
    assert_ne!(binary, main.id());
    assert_eq!(session.declaration(binary).unwrap().origin(), Origin::Reflected);

    assert_eq!(
        session.resolve_class(&fq("app.Main"), SearchRule::ErrorIfFoundInSource),
        Err(ResolveError::FoundInSource {
            fq_name: fq("app.Main")
        })
    );
    assert!(session
        .resolve_class(&fq("app.Launcher"), SearchRule::ErrorIfFoundInSource)
        .unwrap()
        .is_some());

    // Member signatures see the source declaration.
    let start = function(&session, "app.Launcher", "start");
    let attrs = session.declaration(start).unwrap().as_function().unwrap().clone();
    let parameter = session.declaration(attrs.value_parameters[0]).unwrap();
    assert_eq!(parameter.as_value_parameter().unwrap().ty.target(), Some(main.id()));
}

#[test]
fn unknown_names_resolve_to_nothing() {
    let session = session(mixed_platform());
    assert_eq!(
        session.resolve_class(&fq("p.Missing"), SearchRule::IncludeSource),
        Ok(None)
    );
    assert!(session
        .resolve_package(&fq("p.Missing"), SearchRule::IncludeSource)
        .unwrap()
        .is_none());
    assert!(session.class_names_in_package(&fq("p.Missing")).is_empty());
}

#[test]
fn package_scope_by_declaration() {
    let session = session(mixed_platform());
    let q = session.resolve_package(&fq("q"), SearchRule::IncludeSource).unwrap().unwrap();

    let scope = session.package_scope(q.decl()).unwrap().unwrap();
    assert_eq!(scope.kind(), ScopeKind::PlatformPackage);
    assert_eq!(scope.fragment(), q.decl());

    let tools = class(&session, "q.Tools");
    assert!(matches!(
        session.package_scope(tools),
        Err(ResolveError::NotAPackage { id }) if id == tools
    ));

    // The built-in package is not a platform package.
    assert!(session.package_scope(session.builtins().package()).unwrap().is_none());
}

#[test]
fn undeclared_type_variable_is_reported() {
    let mut platform = InMemoryPlatform::new();
    platform.add_class(
        PlatformClass::new("q.Broken", ClassKind::Class)
            .method(PlatformMethod::static_method("bad").returns(PlatformType::variable("X"))),
    );
    let session = session(platform);
    let fragment = session
        .resolve_package(&fq("q.Broken"), SearchRule::IncludeSource)
        .unwrap()
        .unwrap();
    assert_eq!(
        fragment.scope().functions(&session, &name("bad")),
        Err(ResolveError::UnknownTypeVariable {
            name: name("X"),
            member: "bad".to_string(),
        })
    );
}

#[test]
fn one_bad_member_does_not_hide_its_package() {
    let broken = || {
        let mut platform = InMemoryPlatform::new();
        platform.add_class(
            PlatformClass::new("q.Broken", ClassKind::Class)
                .method(PlatformMethod::static_method("ok"))
                .method(PlatformMethod::static_method("bad").returns(PlatformType::variable("X"))),
        );
        platform
    };
    let lazy = session(broken());
    let eager = eager_session(broken());

    for session in [&lazy, &eager] {
        for _ in 0..2 {
            let fragment = session
                .resolve_package(&fq("q.Broken"), SearchRule::IncludeSource)
                .unwrap()
                .unwrap();
            assert_eq!(fragment.kind(), ScopeKind::StaticMembers);
            let ok = fragment.scope().functions(session, &name("ok")).unwrap();
            assert_eq!(rendered(session, ok[0]), "fun ok(): lang.Unit");
            assert_eq!(
                fragment.scope().functions(session, &name("bad")),
                Err(ResolveError::UnknownTypeVariable {
                    name: name("X"),
                    member: "bad".to_string(),
                })
            );
        }
    }
    assert!(eager
        .resolve_class(&fq("q.Broken"), SearchRule::IncludeSource)
        .unwrap()
        .is_some());
}

#[test]
fn concurrent_lookups_agree() {
    let session = session(mixed_platform());

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let tools = session
                        .resolve_package(&fq("q.Tools"), SearchRule::IncludeSource)
                        .unwrap()
                        .unwrap();
                    let first = tools.scope().functions(&session, &name("first")).unwrap();
                    let node = class(&session, "p.Node");
                    let parameters = session.class_type_parameters(node).unwrap();
                    (tools.decl(), first, node, parameters)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }
}
