//! Finalization and the registration fixed point: forward references,
//! unresolved dependencies, redeclarations, package markers, and
//! incremental loading after finalize.

use crate::helpers::fixtures::*;
use ned_resources::NedResourceCache;

#[test]
fn forward_references_resolve_across_files() {
    // A extends B, loaded before B exists
    let cache = finalized_cache(&[
        ("/virt/A.ned", "package p;\nsimple A extends B { }\n"),
        ("/virt/B.ned", "package p;\nsimple B { }\n"),
    ]);
    assert!(cache.lookup("p.A").is_some());
    assert!(cache.lookup("p.B").is_some());
    assert_eq!(cache.get("p.A").unwrap().super_qname(), Some("p.B"));
}

#[test]
fn extends_chains_settle_regardless_of_load_order() {
    let cache = finalized_cache(&[
        ("/virt/C.ned", "package p;\nsimple C extends B { }\n"),
        ("/virt/B.ned", "package p;\nsimple B extends A { }\n"),
        ("/virt/A.ned", "package p;\nsimple A { }\n"),
    ]);
    assert_eq!(cache.get("p.C").unwrap().super_qname(), Some("p.B"));
    assert_eq!(cache.get("p.B").unwrap().super_qname(), Some("p.A"));
    // registration order follows dependency order
    let names = cache.type_names().clone();
    assert_eq!(names, vec!["p.A", "p.B", "p.C"]);
}

#[test]
fn missing_base_type_fails_finalize_with_the_qname() {
    let mut cache = cache_with_texts(&[(
        "/virt/A.ned",
        "package p;\nsimple A extends B { }\n",
    )]);
    let error = cache.finalize().expect_err("unresolved base");
    assert_eq!(
        error.to_string(),
        "NED type 'p.A' could not be fully resolved due to a missing base type or interface"
    );
}

#[test]
fn several_unresolved_types_are_listed_together() {
    let mut cache = cache_with_texts(&[
        ("/virt/A.ned", "package p;\nsimple A extends Missing { }\n"),
        ("/virt/B.ned", "package p;\nsimple B extends Missing { }\n"),
    ]);
    let error = cache.finalize().expect_err("unresolved bases");
    let message = error.to_string();
    assert!(message.starts_with("The following NED types"), "{message}");
    assert!(message.contains("p.A") && message.contains("p.B"), "{message}");
}

#[test]
fn interface_conformance_is_a_dependency_too() {
    let mut cache = cache_with_texts(&[(
        "/virt/M.ned",
        "package p;\nmodule M like IM { }\n",
    )]);
    let error = cache.finalize().expect_err("missing interface");
    assert!(error.to_string().contains("p.M"), "{error}");

    let cache = finalized_cache(&[
        ("/virt/M.ned", "package p;\nmodule M like IM { }\n"),
        ("/virt/IM.ned", "package p;\nmoduleinterface IM { }\n"),
    ]);
    assert_eq!(cache.get("p.M").unwrap().interface_qnames(), ["p.IM"]);
}

#[test]
fn interfaces_may_extend_several_bases() {
    let cache = finalized_cache(&[(
        "/virt/I.ned",
        "package p;\nmoduleinterface IBase { }\nmoduleinterface IOther { }\nmoduleinterface I extends IBase, IOther { }\n",
    )]);
    assert_eq!(
        cache.get("p.I").unwrap().extends_qnames(),
        ["p.IBase", "p.IOther"]
    );
}

#[test]
fn redeclaration_is_a_hard_error() {
    let mut cache = cache_with_texts(&[
        ("/virt/X1.ned", "package p;\nsimple X { }\n"),
        ("/virt/X2.ned", "package p;\nsimple X { }\n"),
    ]);
    let error = cache.finalize().expect_err("redeclaration");
    assert_eq!(error.to_string(), "Redeclaration of simple-module p.X");
}

#[test]
fn duplicate_package_markers_fail_finalize() {
    let mut cache = cache_with_texts(&[
        ("/r1/package.ned", "package common;\n"),
        ("/r2/package.ned", "package common;\n"),
    ]);
    let error = cache.finalize().expect_err("duplicate marker");
    let message = error.to_string();
    assert!(
        message.starts_with("More than one package.ned file for package 'common'"),
        "{message}"
    );
    assert!(message.contains("/r1/package.ned") && message.contains("/r2/package.ned"));
}

#[test]
fn finalize_may_only_run_once() {
    let mut cache = NedResourceCache::new();
    cache.finalize().expect("first finalize");
    let error = cache.finalize().expect_err("second finalize");
    assert!(error.to_string().contains("may only be called once"));
}

#[test]
fn package_markers_cannot_arrive_after_finalize() {
    let mut cache = NedResourceCache::new();
    cache.finalize().expect("finalize");
    let error = cache
        .load_text("/late/package.ned", "package late;\n", None, false)
        .expect_err("late marker");
    assert!(
        error
            .to_string()
            .contains("'package.ned' files can no longer be loaded"),
        "{error}"
    );
}

#[test]
fn files_loaded_after_finalize_register_immediately() {
    let mut cache = finalized_cache(&[("/virt/B.ned", "package p;\nsimple B { }\n")]);
    cache
        .load_text(
            "/virt/C.ned",
            "package p;\nsimple C extends B { }\n",
            None,
            false,
        )
        .expect("incremental load");
    assert_eq!(cache.get("p.C").unwrap().super_qname(), Some("p.B"));
}

#[test]
fn incremental_loads_with_missing_bases_fail() {
    let mut cache = finalized_cache(&[("/virt/B.ned", "package p;\nsimple B { }\n")]);
    let error = cache
        .load_text(
            "/virt/D.ned",
            "package p;\nsimple D extends Nowhere { }\n",
            None,
            false,
        )
        .expect_err("missing base");
    assert!(error.to_string().contains("p.D"), "{error}");
}

#[test]
fn builtins_register_the_ned_package() {
    let mut cache = NedResourceCache::new();
    cache.register_builtins().expect("builtins parse");
    cache.finalize().expect("finalize");

    for name in [
        "ned.IdealChannel",
        "ned.DelayChannel",
        "ned.DatarateChannel",
        "ned.IBidirectionalChannel",
        "ned.IUnidirectionalChannel",
    ] {
        assert!(cache.lookup(name).is_some(), "missing builtin {name}");
    }
    // the synthetic file acts as the package marker for 'ned'
    assert!(cache.package_ned_file("ned").is_some());
    assert_eq!(cache.package_ned_chain("ned").len(), 1);
}

#[test]
fn type_name_listing_follows_registrations() {
    let mut cache = finalized_cache(&[("/virt/A.ned", "package p;\nsimple A { }\n")]);
    assert_eq!(cache.type_names().clone(), vec!["p.A"]);

    cache
        .load_text("/virt/B.ned", "package p;\nsimple B { }\n", None, false)
        .expect("incremental load");
    // the cached listing is invalidated by the new registration
    assert_eq!(cache.type_names().clone(), vec!["p.A", "p.B"]);
}

#[test]
fn identical_inputs_give_identical_listings() {
    let sources = [
        ("/virt/one.ned", "package p;\nsimple One extends Two { }\n"),
        ("/virt/two.ned", "package p;\nsimple Two { }\nchannel Ch { }\n"),
    ];
    let first = finalized_cache(&sources);
    let second = finalized_cache(&sources);
    assert_eq!(first.type_names().clone(), second.type_names().clone());
}

#[test]
fn marker_chain_walks_parent_packages() {
    let cache = finalized_cache(&[
        ("/r/package.ned", "\n"),
        ("/r/a/package.ned", "package a;\n"),
        ("/r/a/b/package.ned", "package a.b;\n"),
    ]);
    assert_eq!(cache.package_ned_chain("a.b").len(), 3);
    assert_eq!(cache.package_ned_chain("a").len(), 2);
    assert_eq!(cache.package_ned_chain("").len(), 1);
    // unknown leaf packages simply inherit the rest of the chain
    assert_eq!(cache.package_ned_chain("a.b.c").len(), 3);
}
