//! Cache facade: lookups, error formatting, in-memory and XML loading.

use crate::helpers::fixtures::*;
use ned_resources::{NedResourceCache, NedTypeKind};

#[test]
fn lookup_and_get_agree_for_registered_types() {
    let cache = finalized_cache(&[(
        "/virt/a.ned",
        "package p;\nsimple A { }\nchannel C { }\nmoduleinterface I { }\n",
    )]);
    for qname in cache.type_names().clone() {
        let looked_up = cache.lookup(&qname).expect("lookup");
        let got = cache.get(&qname).expect("get");
        assert_eq!(looked_up.qname(), got.qname());
        assert_eq!(looked_up.qname(), qname);
    }
}

#[test]
fn get_reports_missing_declarations() {
    let cache = NedResourceCache::new();
    let error = cache.get("no.such.Type").expect_err("missing");
    assert_eq!(error.to_string(), "NED declaration 'no.such.Type' not found");
}

#[test]
fn type_info_reflects_the_declaration() {
    let cache = finalized_cache(&[(
        "/virt/a.ned",
        "package p;\nmodule Outer {\n  types:\n    simple Inner { }\n}\nchannel C { }\n",
    )]);

    let outer = cache.get("p.Outer").expect("Outer");
    assert_eq!(outer.name(), "Outer");
    assert_eq!(outer.package(), "p");
    assert_eq!(outer.kind(), NedTypeKind::CompoundModule);
    assert!(!outer.is_inner());
    assert!(outer.kind().is_module());

    let inner = cache.get("p.Outer.Inner").expect("Inner");
    assert_eq!(inner.name(), "Inner");
    assert!(inner.is_inner());

    let channel = cache.get("p.C").expect("C");
    assert_eq!(channel.kind(), NedTypeKind::Channel);
    assert!(!channel.kind().is_module());
}

#[test]
fn syntax_errors_surface_capitalized_with_location() {
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_text("/virt/bad.ned", "%%%", None, false)
        .expect_err("syntax error");
    assert_eq!(error.to_string(), "Syntax error, at /virt/bad.ned:1");
}

#[test]
fn parse_errors_carry_their_line() {
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_text("/virt/bad.ned", "package p;\nsimple M\n", None, false)
        .expect_err("missing body");
    let message = error.to_string();
    assert!(message.contains("/virt/bad.ned:"), "{message}");
    // the first character is upper-cased
    assert!(message.chars().next().unwrap().is_uppercase(), "{message}");
}

#[test]
fn expected_package_is_checked_for_text_loads() {
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_text("/virt/m.ned", "package y;\nsimple M { }\n", Some("x"), false)
        .expect_err("mismatch");
    assert_eq!(
        error.to_string(),
        "Declared package 'y' does not match expected package 'x' in file /virt/m.ned"
    );
}

#[test]
fn xml_text_input_is_rejected() {
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_text("/virt/a.xml", "<ned-file/>", None, true)
        .expect_err("XML from text");
    assert_eq!(
        error.to_string(),
        "Parsing XML from a string is not supported"
    );
}

#[test]
fn xml_files_load_like_ned_files() {
    let dir = source_tree(&[(
        "net.xml",
        r#"<ned-file>
             <package name="p"/>
             <import import-spec="x.*"/>
             <simple-module name="A">
               <extends name="B"/>
             </simple-module>
             <simple-module name="B"/>
           </ned-file>"#,
    )]);
    let mut cache = NedResourceCache::new();
    let path = format!("{}/net.xml", folder(&dir));
    cache.load_file(&path, None, true).expect("load XML");
    cache.finalize().expect("finalize");
    assert!(cache.lookup("p.A").is_some());
    assert_eq!(cache.get("p.A").unwrap().super_qname(), Some("p.B"));
}

#[test]
fn xml_with_a_wrong_root_is_rejected() {
    let dir = source_tree(&[("bad.xml", "<not-ned/>")]);
    let mut cache = NedResourceCache::new();
    let path = format!("{}/bad.xml", folder(&dir));
    let error = cache.load_file(&path, None, true).expect_err("bad root");
    let message = error.to_string().to_lowercase();
    assert!(message.contains("unknown element"), "{message}");
}

#[test]
fn validation_errors_abort_the_load() {
    let mut cache = NedResourceCache::new();
    let error = cache
        .load_text(
            "/virt/late.ned",
            "simple M { }\npackage p;\n",
            None,
            false,
        )
        .expect_err("late package decl");
    assert!(
        error.to_string().contains("must precede"),
        "{error}"
    );
}

#[test]
fn failed_loads_leave_no_file_behind() {
    let mut cache = NedResourceCache::new();
    cache
        .load_text("/virt/ok.ned", "package p;\nsimple A { }\n", None, false)
        .expect("good file");
    let before = cache.file_count();
    let _ = cache
        .load_text("/virt/bad.ned", "%%%", None, false)
        .expect_err("bad file");
    assert_eq!(cache.file_count(), before);
    assert!(cache.file("/virt/bad.ned").is_none());
}

#[test]
fn loaded_files_are_reachable_by_name() {
    let cache = finalized_cache(&[("/virt/a.ned", "package p;\nsimple A { }\n")]);
    assert!(cache.file("/virt/a.ned").is_some());
    assert!(cache.file("/virt/unknown.ned").is_none());
    assert_eq!(cache.file_count(), 1);
}

#[test]
fn caches_are_independent_instances() {
    let first = finalized_cache(&[("/virt/a.ned", "package p;\nsimple A { }\n")]);
    let second = NedResourceCache::new();
    assert!(first.lookup("p.A").is_some());
    assert!(second.lookup("p.A").is_none());
}
