use clap::Parser;
use crawldex::engine::arg_parser::Cli;
use crawldex::engine::{
    OS_JUNK_PATTERNS, build_opts, glob_match, paths_overlap, roots_overlap,
    should_include_in_crawl,
};
use crawldex::pipeline::{NameFilter, resolve_visited_scope};
use crawldex::utils::crawldex_toml::{apply_file_to_opts, parse_crawldex_toml};
use crawldex::{DedupPolicy, FileRef, Opts, VisitedScope, WorkItem};
use std::collections::HashSet;
use std::path::PathBuf;

// --- FileRef ---

#[test]
fn test_file_ref_equality_by_path_only() {
    assert_eq!(FileRef::file("/a/b"), FileRef::dir("/a/b"));
    assert_ne!(FileRef::file("/a/b"), FileRef::file("/a/c"));
    let set: HashSet<FileRef> = [FileRef::file("/x"), FileRef::dir("/x")].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_file_ref_equality_by_canonical_path() {
    let direct = FileRef::file("/r/docs/x");
    let alias = FileRef::file("/r/alias/x").with_canonical("/r/docs/x");
    assert_eq!(direct, alias);
    assert_eq!(alias.path(), "/r/alias/x");
    assert_eq!(alias.canonical(), "/r/docs/x");
    assert_eq!(direct.canonical(), "/r/docs/x");
}

#[test]
fn test_file_ref_name() {
    assert_eq!(FileRef::file("/a/b/c.txt").name(), "c.txt");
    assert_eq!(FileRef::file("c.txt").name(), "c.txt");
    assert_eq!(FileRef::dir("/").name(), "/");
}

#[test]
fn test_stop_marker_never_equals_a_file() {
    assert_ne!(WorkItem::Stop, WorkItem::File(FileRef::file("poison.txt")));
    assert!(WorkItem::Stop.is_stop());
    assert!(!WorkItem::File(FileRef::file("")).is_stop());
}

// --- glob_match / should_include_in_crawl ---

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("node_modules", "node_modules"));
    assert!(!glob_match("node_modules", "node_module"));
    assert!(!glob_match("node_module", "node_modules"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.log", "foo.log"));
    assert!(glob_match("*.log", ".log"));
    assert!(!glob_match("*.log", "foo.log.txt"));
    assert!(glob_match("node_*", "node_modules"));
    assert!(glob_match("a*b*c", "aXXbYYc"));
    assert!(!glob_match("a*b*c", "aXXbYY"));
    assert!(glob_match("*", ""));
}

#[test]
fn test_glob_match_question() {
    assert!(glob_match("?.txt", "a.txt"));
    assert!(!glob_match("?.txt", "ab.txt"));
}

#[test]
fn test_glob_match_negation_stripped() {
    assert!(glob_match("!node_modules", "node_modules"));
}

#[test]
fn test_should_include_without_patterns_keeps_everything() {
    assert!(should_include_in_crawl(&PathBuf::from("/r/.DS_Store"), &[]));
    assert!(should_include_in_crawl(&PathBuf::from("/r/Thumbs.db"), &[]));
}

#[test]
fn test_should_include_os_junk_patterns() {
    let junk: Vec<String> = OS_JUNK_PATTERNS.iter().map(|p| p.to_string()).collect();
    assert!(!should_include_in_crawl(&PathBuf::from("/r/.DS_Store"), &junk));
    assert!(!should_include_in_crawl(&PathBuf::from("/r/._resource"), &junk));
    assert!(!should_include_in_crawl(&PathBuf::from("/r/Thumbs.db"), &junk));
    assert!(!should_include_in_crawl(&PathBuf::from("/r/.Trash-1000"), &junk));
    assert!(should_include_in_crawl(&PathBuf::from("/r/notes.txt"), &junk));
}

#[test]
fn test_should_include_exclude_pattern_name() {
    assert!(!should_include_in_crawl(
        &PathBuf::from("/foo/node_modules"),
        &["node_modules".to_string()]
    ));
}

#[test]
fn test_should_include_exclude_pattern_full_path() {
    assert!(!should_include_in_crawl(
        &PathBuf::from("/foo/build/out.o"),
        &["/foo/build/*".to_string()]
    ));
}

#[test]
fn test_should_include_not_excluded() {
    assert!(should_include_in_crawl(
        &PathBuf::from("/foo/bar/baz.txt"),
        &["*.log".to_string(), "node_modules".to_string()]
    ));
}

// --- root overlap ---

#[test]
fn test_paths_overlap() {
    assert!(paths_overlap(&PathBuf::from("/a"), &PathBuf::from("/a")));
    assert!(paths_overlap(&PathBuf::from("/a"), &PathBuf::from("/a/b")));
    assert!(paths_overlap(&PathBuf::from("/a/b"), &PathBuf::from("/a")));
    assert!(!paths_overlap(&PathBuf::from("/a/b"), &PathBuf::from("/a/bc")));
}

#[test]
fn test_resolve_visited_scope() {
    let disjoint = vec![PathBuf::from("/nx/a"), PathBuf::from("/nx/b")];
    let nested = vec![PathBuf::from("/nx/a"), PathBuf::from("/nx/a/b")];
    assert!(!roots_overlap(&disjoint));
    assert!(roots_overlap(&nested));
    assert_eq!(
        resolve_visited_scope(VisitedScope::Auto, &disjoint),
        VisitedScope::PerCrawler
    );
    assert_eq!(
        resolve_visited_scope(VisitedScope::Auto, &nested),
        VisitedScope::Shared
    );
    assert_eq!(
        resolve_visited_scope(VisitedScope::PerCrawler, &nested),
        VisitedScope::PerCrawler
    );
}

// --- NameFilter ---

#[test]
fn test_name_filter_from_parts() {
    assert!(NameFilter::from_parts(None, None, None).unwrap().is_none());
    let f = NameFilter::from_parts(Some("a.txt"), None, None).unwrap().unwrap();
    assert!(f.matches_name("a.txt"));
    assert!(!f.matches_name("ba.txt"));
    assert!(NameFilter::from_parts(Some("a"), Some("*"), None).is_err());
    assert!(NameFilter::from_parts(None, None, Some("(")).is_err());
}

#[test]
fn test_name_filter_uses_file_name_not_path() {
    let f = NameFilter::glob("a*");
    assert!(f.matches(&FileRef::file("/zzz/abc")));
    assert!(!f.matches(&FileRef::file("/abc/zzz")));
}

// --- config file ---

#[test]
fn test_toml_applies_present_fields_only() {
    let file = parse_crawldex_toml(
        r#"
        [settings]
        capacity = 32
        workers = 3
        dedup = false
        exclude = ["target"]
        glob = "*.rs"
        "#,
    )
    .unwrap();
    let mut opts = Opts::default();
    let follow_before = opts.pipeline.follow_links;
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.pipeline.capacity, 32);
    assert_eq!(opts.pipeline.workers, 3);
    assert_eq!(opts.pipeline.dedup, DedupPolicy::Disabled);
    assert_eq!(opts.pipeline.exclude, vec!["target".to_string()]);
    assert_eq!(opts.pipeline.follow_links, follow_before);
    assert!(matches!(opts.pipeline.name_filter, Some(NameFilter::Glob(ref g)) if g == "*.rs"));
}

#[test]
fn test_toml_empty_is_default() {
    let file = parse_crawldex_toml("").unwrap();
    let mut opts = Opts::default();
    let capacity = opts.pipeline.capacity;
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.pipeline.capacity, capacity);
    assert_eq!(capacity, 10);
    assert!(opts.pipeline.name_filter.is_none());
}

#[test]
fn test_toml_rejects_wrong_types() {
    assert!(parse_crawldex_toml("[settings]\ncapacity = \"big\"").is_err());
}

#[test]
fn test_cli_overrides_file() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".crawldex.toml"),
        "[settings]\nworkers = 3\ncapacity = 5\nname = \"a.txt\"\n",
    )
    .unwrap();
    let cli = Cli::parse_from(["crawldex", "--workers", "7", "--no-dedup", "/tmp"]);
    let opts = build_opts(&cli, dir.path()).unwrap();
    assert_eq!(opts.pipeline.workers, 7);
    assert_eq!(opts.pipeline.capacity, 5);
    assert_eq!(opts.pipeline.dedup, DedupPolicy::Disabled);
    assert!(matches!(opts.pipeline.name_filter, Some(NameFilter::Exact(ref n)) if n == "a.txt"));
}

#[test]
fn test_cli_excludes_config_file_and_os_junk() {
    let dir = tempfile::TempDir::new().unwrap();
    let cli = Cli::parse_from(["crawldex", "/tmp", "-e", "*.log"]);
    let opts = build_opts(&cli, dir.path()).unwrap();
    let exclude = &opts.pipeline.exclude;
    assert_eq!(exclude[0], "*.log");
    assert!(exclude.iter().any(|p| p == ".crawldex.toml"));
    assert!(!should_include_in_crawl(&PathBuf::from("/r/Thumbs.db"), exclude));
    assert!(!should_include_in_crawl(&PathBuf::from("/r/.crawldex.toml"), exclude));
}

#[test]
fn test_cli_default_root_is_cwd() {
    let cli = Cli::parse_from(["crawldex"]);
    assert_eq!(cli.roots, vec![PathBuf::from(".")]);
}
