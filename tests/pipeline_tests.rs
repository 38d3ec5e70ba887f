//! End-to-end tests of the scan → reconcile → infer → render pipeline
//!
//! These tests build real archives in a temporary pack and drive the library
//! API the same way the CLI does.


use modgraph::{analysis, set_active, Category, Config, Diagnostic, Error, FsRenamer};
use std::fs;
use test_utils::{fabric_mod_json, jar_bytes, MockMod, TestPack};

// ============================================================================
// Scanning
// ============================================================================

#[test]
fn test_scan_mixed_pack() {
    let pack = TestPack::new();
    pack.add_forge_jar(
        "alphabeta-forge-1.0.jar",
        &[
            MockMod::new("alpha", "Alpha").with_dependency("core"),
            MockMod::new("beta", "Beta").with_optional("jei"),
        ],
    );
    pack.add_forge_jar("core-1.0.jar", &[MockMod::new("core", "Core")]);

    let inner = jar_bytes(&[(
        "fabric.mod.json",
        fabric_mod_json(&MockMod::new("innerlib", "Inner Lib"), &[]).into_bytes(),
    )]);
    pack.add_fabric_jar(
        "outer-fabric.jar",
        &MockMod::new("outer", "Outer").with_dependency("innerlib"),
        &[("META-INF/jars/innerlib.jar", inner)],
    );
    pack.add_jar("mystery-1.2.jar", &[("readme.txt", b"hello".to_vec())]);

    let config = Config::load(pack.path()).unwrap();
    let (graph, diagnostics) = analysis::scan(&config, None).unwrap();

    assert_eq!(graph.len(), 6);

    let alpha = graph.get("alpha").unwrap();
    let beta = graph.get("beta").unwrap();
    assert_eq!(alpha.archive, beta.archive);
    assert_eq!(alpha.archive.as_deref(), Some("alphabeta-forge-1.0.jar"));

    let inner = graph.get("innerlib").unwrap();
    assert_eq!(inner.parent.as_deref(), Some("outer"));
    assert_eq!(inner.archive.as_deref(), Some("outer-fabric.jar"));
    assert_eq!(inner.dependents[0].id, "outer");

    let mystery = graph.get("mystery").unwrap();
    assert_eq!(mystery.name, "mystery-1.2.jar");
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::MissingManifest { inferred_id, .. } if inferred_id == "mystery")));
}

#[test]
fn test_first_archive_wins() {
    let pack = TestPack::new();
    pack.add_forge_jar("b-second.jar", &[MockMod::new("dup", "Second")]);
    pack.add_forge_jar("a-first.jar", &[MockMod::new("dup", "First")]);

    let config = Config::load(pack.path()).unwrap();
    let (graph, diagnostics) = analysis::scan(&config, None).unwrap();

    assert_eq!(graph.len(), 1);
    assert_eq!(graph.get("dup").unwrap().name, "First");
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::DuplicatePackage { dropped_archive, .. } if dropped_archive == "b-second.jar")));
}

#[test]
fn test_missing_bundled_archive_aborts_scan() {
    let pack = TestPack::new();
    let json = fabric_mod_json(&MockMod::new("outer", "Outer"), &["META-INF/jars/missing.jar"]);
    pack.add_jar("outer.jar", &[("fabric.mod.json", json.into_bytes())]);

    let config = Config::load(pack.path()).unwrap();
    let result = analysis::scan(&config, None);
    assert!(matches!(result, Err(Error::NestedExtraction { .. })));
}

#[test]
fn test_ignore_list_hides_optional() {
    let pack = TestPack::new();
    pack.add_forge_jar(
        "beta.jar",
        &[MockMod::new("beta", "Beta")
            .with_optional("jei")
            .with_optional("emi")],
    );
    fs::write(pack.path().join("ignoredOptDeps.txt"), "jei\n").unwrap();

    let config = Config::load(pack.path()).unwrap();
    let (graph, _) = analysis::scan(&config, None).unwrap();
    assert_eq!(graph.unsatisfied_optional_targets(), vec!["emi".to_string()]);
}

// ============================================================================
// Report round trip
// ============================================================================

fn library_pack() -> TestPack {
    let pack = TestPack::new();
    pack.add_forge_jar("core.jar", &[MockMod::new("core", "Core")]);
    pack.add_forge_jar(
        "addon.jar",
        &[MockMod::new("addon", "Addon").with_dependency("core")],
    );
    pack.add_sidecar("core.jar", "Core", "both", Some(42));
    pack.write_config("title = \"Round Trip\"\n");
    pack
}

#[test]
fn test_report_preserves_curated_data() {
    let pack = library_pack();
    let config = Config::load(pack.path()).unwrap();

    let mut first = analysis::analyze(&config, None).unwrap();
    assert_eq!(
        first.graph.get("core").unwrap().category,
        Some(Category::provisional("Library"))
    );
    let addon = first.graph.resolve("addon").unwrap();
    first
        .graph
        .set_category(addon, Some(Category::confirmed("Tech")));
    analysis::write_report(&config, &first).unwrap();

    let report = pack.read_report();
    assert!(report.starts_with("# Round Trip\n\n> Auto-generated at "));
    assert!(report.contains("[Core](https://www.curseforge.com/projects/42)"));

    let second = analysis::analyze(&config, None).unwrap();
    assert_eq!(second.reconcile.recovered, 2);
    assert!(second.reconcile.gone.is_empty());
    assert_eq!(second.inference.inferred, 0);

    let addon = second.graph.get("addon").unwrap();
    assert_eq!(addon.category, Some(Category::confirmed("Tech")));
    let core = second.graph.get("core").unwrap();
    assert_eq!(core.category, Some(Category::provisional("Library")));
    assert_eq!(core.side.unwrap().to_string(), "both?");
}

#[test]
fn test_padded_display_name_round_trips() {
    let pack = TestPack::new();
    pack.add_forge_jar("spaced.jar", &[MockMod::new("spaced", "Spaced Mod ")]);
    let config = Config::load(pack.path()).unwrap();

    let mut first = analysis::analyze(&config, None).unwrap();
    let spaced = first.graph.resolve("spaced").unwrap();
    assert_eq!(first.graph.node_at(spaced).name, "Spaced Mod");
    first
        .graph
        .set_category(spaced, Some(Category::confirmed("Tech")));
    analysis::write_report(&config, &first).unwrap();

    let second = analysis::analyze(&config, None).unwrap();
    assert_eq!(second.reconcile.recovered, 1);
    assert!(second.reconcile.gone.is_empty());
    assert_eq!(second.graph.len(), 1);
    assert_eq!(
        second.graph.get("spaced").unwrap().category,
        Some(Category::confirmed("Tech"))
    );
}

#[test]
fn test_unreadable_previous_report() {
    let pack = library_pack();
    fs::write(pack.report_path(), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let config = Config::load(pack.path()).unwrap();
    let result = analysis::analyze(&config, None);
    assert!(matches!(result, Err(Error::InvalidReport(_))));
}

#[test]
fn test_removed_archive_becomes_gone() {
    let pack = library_pack();
    let config = Config::load(pack.path()).unwrap();

    let first = analysis::analyze(&config, None).unwrap();
    analysis::write_report(&config, &first).unwrap();

    pack.remove_archive("addon.jar");
    let second = analysis::analyze(&config, None).unwrap();
    assert_eq!(second.reconcile.gone, vec!["Addon".to_string()]);

    let gone = second.graph.get("addon").unwrap();
    assert!(gone.is_gone());
    assert_eq!(gone.gone.as_ref().unwrap().raw_dependencies, "`core`");
    assert!(second.graph.get("core").unwrap().dependents.is_empty());

    analysis::write_report(&config, &second).unwrap();
    let report = pack.read_report();
    let gone_line = report
        .lines()
        .find(|l| l.contains("| addon "))
        .expect("gone row rendered");
    assert!(gone_line.contains("❓"));
    assert!(gone_line.contains("`core`"));
    assert!(report.contains("`2` mods (`0` disabled, `1` gone)"));
}

// ============================================================================
// Cascading toggles on disk
// ============================================================================

#[test]
fn test_cascade_renames_archives() {
    let pack = TestPack::new();
    pack.add_forge_jar("a.jar", &[MockMod::new("a", "A").with_dependency("b")]);
    pack.add_forge_jar("b.jar", &[MockMod::new("b", "B").with_dependency("c")]);
    pack.add_forge_jar("c.jar", &[MockMod::new("c", "C")]);

    let config = Config::load(pack.path()).unwrap();
    let (mut graph, _) = analysis::scan(&config, None).unwrap();
    let mut renamer = FsRenamer::new(config.mods_dir());

    let outcome = set_active(&mut graph, &mut renamer, "c", false).unwrap();
    assert_eq!(outcome.changed, vec!["c", "b", "a"]);
    for name in ["a", "b", "c"] {
        assert!(pack.has_archive(&format!("{}.jar.disabled", name)));
        assert!(!pack.has_archive(&format!("{}.jar", name)));
    }

    // the disabled state is what a fresh scan sees
    let (mut graph, _) = analysis::scan(&config, None).unwrap();
    assert!(graph.nodes().iter().all(|n| !n.active));

    let outcome = set_active(&mut graph, &mut renamer, "a", true).unwrap();
    assert_eq!(outcome.changed, vec!["a", "b", "c"]);
    for name in ["a", "b", "c"] {
        assert!(pack.has_archive(&format!("{}.jar", name)));
    }
}

#[test]
fn test_fan_out_siblings_toggle_together() {
    let pack = TestPack::new();
    pack.add_forge_jar(
        "both.jar",
        &[MockMod::new("left", "Left"), MockMod::new("right", "Right")],
    );
    pack.add_forge_jar("user.jar", &[MockMod::new("user", "User").with_dependency("right")]);

    let config = Config::load(pack.path()).unwrap();
    let (mut graph, _) = analysis::scan(&config, None).unwrap();
    let mut renamer = FsRenamer::new(config.mods_dir());

    let outcome = set_active(&mut graph, &mut renamer, "left", false).unwrap();
    assert_eq!(outcome.changed, vec!["left", "right", "user"]);
    assert!(pack.has_archive("both.jar.disabled"));
    assert!(pack.has_archive("user.jar.disabled"));
}
