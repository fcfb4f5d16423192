use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use clean_my_mac::common::config::Config;
use clean_my_mac::common::errors::CleanMyMacError;
use clean_my_mac::common::exec::{CommandOutput, CommandRunner};
use clean_my_mac::common::paths::ScanPaths;
use clean_my_mac::scanner::types::ReclaimableItem;
use clean_my_mac::scanner::{
    scanners_from_config, DockerScanner, HomebrewScanner, NodeModulesScanner, Scanner,
    SystemLogsScanner,
};

/// Stands in for a native tool: replays a canned response and records
/// every invocation for assertion.
struct StubRunner {
    response: Result<String, String>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl StubRunner {
    fn ok(stdout: &str) -> Self {
        Self {
            response: Ok(stdout.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn err(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn recorded_calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for StubRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CleanMyMacError> {
        self.calls.lock().unwrap().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        match &self.response {
            Ok(stdout) => Ok(CommandOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            Err(msg) => Err(CleanMyMacError::command(program, msg.clone())),
        }
    }
}

/// Shares one stub between the test and the scanner that consumed it
struct SharedRunner(Arc<StubRunner>);

impl CommandRunner for SharedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CleanMyMacError> {
        self.0.run(program, args)
    }
}

fn empty_paths(dir: &TempDir) -> ScanPaths {
    ScanPaths {
        user_logs: dir.path().join("no-user-logs"),
        system_logs: dir.path().join("no-system-logs"),
        node_search_roots: vec![],
        duplicate_roots: vec![],
        exclusions: vec![],
    }
}

// ─── Docker ──────────────────────────────────────────────────────────────────

#[test]
fn test_docker_scan_parses_reclaimable_rows() {
    let dir = TempDir::new().unwrap();
    let stub = StubRunner::ok(
        "Images\t5.5GB\t2.1GB (38%)\nContainers\t1GB\t500MB (50%)\nLocal Volumes\t2GB\t1GB (50%)\nBuild Cache\t300MB\t300MB (100%)\n",
    );
    let scanner = DockerScanner::with_runner(Box::new(stub));

    let result = scanner.scan(&empty_paths(&dir));
    assert_eq!(result.items.len(), 4);
    assert_eq!(
        result.total_size,
        result.items.iter().map(|i| i.size).sum::<u64>()
    );
    assert_eq!(result.items[0].path.to_string_lossy(), "docker:images");
    assert_eq!(result.items[2].path.to_string_lossy(), "docker:volumes");
}

#[test]
fn test_docker_scan_daemon_down_is_empty() {
    let dir = TempDir::new().unwrap();
    let stub = StubRunner::err("Cannot connect to the Docker daemon");
    let scanner = DockerScanner::with_runner(Box::new(stub));

    let result = scanner.scan(&empty_paths(&dir));
    assert!(result.items.is_empty());
    assert_eq!(result.total_size, 0);
}

#[test]
fn test_docker_clean_runs_single_prune() {
    let stub = Arc::new(StubRunner::ok("Total reclaimed space: 2.6GB\n"));
    let scanner = DockerScanner::with_runner(Box::new(SharedRunner(stub.clone())));

    let items = vec![
        ReclaimableItem::file("docker:images", 2_000_000, "Docker Images"),
        ReclaimableItem::file("docker:containers", 600_000, "Docker Containers"),
    ];
    let result = scanner.clean(&items, false);

    assert_eq!(result.cleaned_items, 2);
    assert_eq!(result.freed_space, 2_600_000);
    assert!(result.errors.is_empty());

    let calls = stub.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "docker");
    assert_eq!(calls[0].1, vec!["system", "prune", "-f"]);
}

#[test]
fn test_docker_clean_prunes_volumes_only_when_selected() {
    let stub = Arc::new(StubRunner::ok(""));
    let scanner = DockerScanner::with_runner(Box::new(SharedRunner(stub.clone())));

    let items = vec![ReclaimableItem::file("docker:volumes", 1_000, "Docker Volumes")];
    scanner.clean(&items, false);

    let calls = stub.recorded_calls();
    assert_eq!(calls[0].1, vec!["system", "prune", "-f", "--volumes"]);
}

#[test]
fn test_docker_clean_failure_is_all_or_nothing() {
    let stub = StubRunner::err("permission denied");
    let scanner = DockerScanner::with_runner(Box::new(stub));

    let items = vec![
        ReclaimableItem::file("docker:images", 2_000_000, "Docker Images"),
        ReclaimableItem::file("docker:containers", 600_000, "Docker Containers"),
    ];
    let result = scanner.clean(&items, false);

    assert_eq!(result.cleaned_items, 0);
    assert_eq!(result.freed_space, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("permission denied"));
}

#[test]
fn test_docker_dry_run_invokes_nothing() {
    let stub = Arc::new(StubRunner::ok(""));
    let scanner = DockerScanner::with_runner(Box::new(SharedRunner(stub.clone())));

    let items = vec![ReclaimableItem::file("docker:images", 42, "Docker Images")];
    let result = scanner.clean(&items, true);

    assert_eq!(result.cleaned_items, 1);
    assert_eq!(result.freed_space, 42);
    assert!(stub.recorded_calls().is_empty(), "dry run must not execute commands");
}

// ─── Homebrew ────────────────────────────────────────────────────────────────

#[test]
fn test_homebrew_scan_lists_cache_entries() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("Homebrew");
    std::fs::create_dir_all(cache.join("downloads")).unwrap();
    std::fs::write(cache.join("wget-1.21.tar.gz"), vec![0u8; 2048]).unwrap();
    std::fs::write(cache.join("downloads/blob"), vec![0u8; 1024]).unwrap();

    let stub = StubRunner::ok(&format!("{}\n", cache.display()));
    let scanner = HomebrewScanner::with_runner(Box::new(stub));

    let result = scanner.scan(&empty_paths(&dir));
    assert_eq!(result.items.len(), 2, "one per top-level cache entry");
    assert_eq!(result.total_size, 3072);
    // Sorted by path: downloads/ before wget tarball
    assert!(result.items[0].is_directory);
    assert!(!result.items[1].is_directory);
}

#[test]
fn test_homebrew_missing_is_empty() {
    let dir = TempDir::new().unwrap();
    let stub = StubRunner::err("brew: command not found");
    let scanner = HomebrewScanner::with_runner(Box::new(stub));

    let result = scanner.scan(&empty_paths(&dir));
    assert!(result.items.is_empty());
}

#[test]
fn test_homebrew_clean_failure_reported() {
    let stub = StubRunner::err("cleanup failed");
    let scanner = HomebrewScanner::with_runner(Box::new(stub));

    let items = vec![ReclaimableItem::file("/cache/blob", 100, "blob")];
    let result = scanner.clean(&items, false);

    assert_eq!(result.cleaned_items, 0);
    assert_eq!(result.errors.len(), 1);
}

// ─── System logs ─────────────────────────────────────────────────────────────

#[test]
fn test_system_logs_scan_exact_totals() {
    let dir = TempDir::new().unwrap();
    let user_logs = dir.path().join("Logs");
    std::fs::create_dir_all(user_logs.join("app")).unwrap();
    std::fs::write(user_logs.join("system.log"), vec![0u8; 100]).unwrap();
    std::fs::write(user_logs.join("app/debug.log"), vec![0u8; 250]).unwrap();

    let paths = ScanPaths {
        user_logs,
        system_logs: dir.path().join("absent"),
        node_search_roots: vec![],
        duplicate_roots: vec![],
        exclusions: vec![],
    };

    let result = SystemLogsScanner::new().scan(&paths);
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.total_size, 350);
}

#[test]
fn test_system_logs_scan_honors_exclusions() {
    let dir = TempDir::new().unwrap();
    let user_logs = dir.path().join("Logs");
    std::fs::create_dir_all(user_logs.join("KeepApp")).unwrap();
    std::fs::write(user_logs.join("system.log"), vec![0u8; 100]).unwrap();
    std::fs::write(user_logs.join("KeepApp/app.log"), vec![0u8; 999]).unwrap();

    let paths = ScanPaths {
        user_logs,
        system_logs: dir.path().join("absent"),
        node_search_roots: vec![],
        duplicate_roots: vec![],
        exclusions: vec!["KeepApp".to_string()],
    };

    let result = SystemLogsScanner::new().scan(&paths);
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.total_size, 100);
}

#[test]
fn test_system_logs_missing_dirs_scan_empty() {
    let dir = TempDir::new().unwrap();
    let result = SystemLogsScanner::new().scan(&empty_paths(&dir));
    assert!(result.items.is_empty());
    assert_eq!(result.total_size, 0);
}

#[test]
fn test_system_logs_clean_deletes_per_item() {
    let dir = TempDir::new().unwrap();
    let keep = dir.path().join("keep.log");
    let gone = dir.path().join("gone.log");
    std::fs::write(&keep, "keep").unwrap();
    std::fs::write(&gone, "gone").unwrap();

    let items = vec![
        ReclaimableItem::file(&gone, 4, "gone.log"),
        ReclaimableItem::file(dir.path().join("already-missing.log"), 10, "missing"),
    ];
    let result = SystemLogsScanner::new().clean(&items, false);

    // One real deletion, one contained failure, untouched neighbors
    assert_eq!(result.cleaned_items, 1);
    assert_eq!(result.freed_space, 4);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("already-missing.log"));
    assert!(result.errors[0].contains("path does not exist"));
    assert!(!gone.exists());
    assert!(keep.exists());
}

#[test]
fn test_system_logs_dry_run_leaves_files() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("a.log");
    std::fs::write(&log, "body").unwrap();

    let items = vec![ReclaimableItem::file(&log, 4, "a.log")];
    let result = SystemLogsScanner::new().clean(&items, true);

    assert_eq!(result.cleaned_items, 1);
    assert_eq!(result.freed_space, 4);
    assert!(log.exists());
}

// ─── Node modules ────────────────────────────────────────────────────────────

#[test]
fn test_node_modules_scan_reports_whole_trees() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("my-app");
    std::fs::create_dir_all(project.join("node_modules/lodash")).unwrap();
    std::fs::write(project.join("node_modules/lodash/index.js"), vec![0u8; 500]).unwrap();
    std::fs::write(project.join("index.js"), vec![0u8; 10]).unwrap();

    let paths = ScanPaths {
        user_logs: dir.path().join("absent"),
        system_logs: dir.path().join("absent"),
        node_search_roots: vec![dir.path().to_path_buf()],
        duplicate_roots: vec![],
        exclusions: vec![],
    };

    let result = NodeModulesScanner::new().scan(&paths);
    assert_eq!(result.items.len(), 1, "tree reported as one unit");
    assert!(result.items[0].is_directory);
    assert_eq!(result.items[0].size, 500);
    assert!(result.items[0].path.ends_with("node_modules"));
}

#[test]
fn test_node_modules_scan_skips_excluded_projects() {
    let dir = TempDir::new().unwrap();
    for project in ["active", "archive"] {
        let tree = dir.path().join(project).join("node_modules/pkg");
        std::fs::create_dir_all(&tree).unwrap();
        std::fs::write(tree.join("main.js"), "x").unwrap();
    }

    let paths = ScanPaths {
        user_logs: dir.path().join("absent"),
        system_logs: dir.path().join("absent"),
        node_search_roots: vec![dir.path().to_path_buf()],
        duplicate_roots: vec![],
        exclusions: vec!["archive".to_string()],
    };

    let result = NodeModulesScanner::new().scan(&paths);
    assert_eq!(result.items.len(), 1);
    assert!(result.items[0].path.starts_with(dir.path().join("active")));
}

#[test]
fn test_node_modules_clean_removes_tree() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("app/node_modules");
    std::fs::create_dir_all(tree.join("pkg")).unwrap();
    std::fs::write(tree.join("pkg/main.js"), "x").unwrap();

    let items = vec![ReclaimableItem::directory(&tree, 1, "app/node_modules")];
    let result = NodeModulesScanner::new().clean(&items, false);

    assert_eq!(result.cleaned_items, 1);
    assert!(!tree.exists());
    assert!(dir.path().join("app").exists(), "parent project is untouched");
}

// ─── Config-driven registry ──────────────────────────────────────────────────

#[test]
fn test_config_depth_bounds_node_modules_search() {
    let dir = TempDir::new().unwrap();
    // node_modules sits at depth 3 below the search root
    let deep = dir.path().join("a/b/node_modules/pkg");
    std::fs::create_dir_all(&deep).unwrap();
    std::fs::write(deep.join("main.js"), "x").unwrap();

    let paths = ScanPaths {
        user_logs: dir.path().join("absent"),
        system_logs: dir.path().join("absent"),
        node_search_roots: vec![dir.path().to_path_buf()],
        duplicate_roots: vec![],
        exclusions: vec![],
    };

    let shallow = scanners_from_config(&Config {
        node_scan_depth: 2,
        ..Config::default()
    });
    let found: usize = shallow
        .iter()
        .filter(|s| s.category().id == "node-modules")
        .map(|s| s.scan(&paths).items.len())
        .sum();
    assert_eq!(found, 0, "depth 2 must not reach a depth-3 tree");

    let deep_enough = scanners_from_config(&Config::default());
    let found: usize = deep_enough
        .iter()
        .filter(|s| s.category().id == "node-modules")
        .map(|s| s.scan(&paths).items.len())
        .sum();
    assert_eq!(found, 1);
}

#[test]
fn test_config_min_size_bounds_duplicate_scan() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.dat"), vec![9u8; 512]).unwrap();
    std::fs::write(dir.path().join("b.dat"), vec![9u8; 512]).unwrap();

    let paths = ScanPaths {
        user_logs: dir.path().join("absent"),
        system_logs: dir.path().join("absent"),
        node_search_roots: vec![],
        duplicate_roots: vec![dir.path().to_path_buf()],
        exclusions: vec![],
    };

    let strict = scanners_from_config(&Config {
        min_duplicate_size: 1024,
        ..Config::default()
    });
    let found: usize = strict
        .iter()
        .filter(|s| s.category().id == "duplicates")
        .map(|s| s.scan(&paths).items.len())
        .sum();
    assert_eq!(found, 0, "512-byte twins sit below the configured minimum");

    let relaxed = scanners_from_config(&Config {
        min_duplicate_size: 256,
        ..Config::default()
    });
    let found: usize = relaxed
        .iter()
        .filter(|s| s.category().id == "duplicates")
        .map(|s| s.scan(&paths).items.len())
        .sum();
    assert_eq!(found, 1, "one of the two twins is reclaimable");
}
