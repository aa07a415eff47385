//! Integration tests for ftp-walker
//!
//! No real FTP server is needed: an in-memory mock session implements the
//! transport traits and simulates servers with different listing-command
//! support, transient failures, and dropped connections.

use ftp_walker::config::RetryPolicy;
use ftp_walker::error::{TransportError, TransportResult, WalkerError};
use ftp_walker::ftp::{Connection, FtpSession, RichEntry, SessionDialer};
use ftp_walker::listing::StrategyKind;
use ftp_walker::walker::Crawl;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

/// In-memory FTP server state shared by the dialer and its sessions
#[derive(Default)]
struct ServerState {
    /// Directory path (with trailing '/') -> children in server order
    tree: HashMap<String, Vec<(String, bool)>>,

    mlsd_supported: bool,
    list_supported: bool,
    nlst_supported: bool,

    /// Directories whose CWD always times out
    broken_dirs: HashSet<String>,

    /// Number of upcoming PWD calls that fail (simulates a dropped session)
    pwd_failures: u32,

    /// Reject the login of every dial attempt
    reject_login: bool,

    cwd: String,
    dials: u32,
    quits: u32,
    pwd_calls: u32,
}

#[derive(Clone)]
struct MockDialer(Rc<RefCell<ServerState>>);

struct MockSession(Rc<RefCell<ServerState>>);

impl SessionDialer for MockDialer {
    type Session = MockSession;

    fn dial(&self) -> TransportResult<MockSession> {
        let mut state = self.0.borrow_mut();
        state.dials += 1;
        if state.reject_login {
            return Err(TransportError::AuthRejected {
                user: "tester".into(),
            });
        }
        state.cwd = "/".into();
        Ok(MockSession(Rc::clone(&self.0)))
    }
}

impl MockSession {
    fn children(&self) -> TransportResult<Vec<(String, bool)>> {
        let state = self.0.borrow();
        match state.tree.get(&state.cwd) {
            Some(children) => Ok(children.clone()),
            None => Err(TransportError::CommandRejected {
                message: format!("550 {}: not a directory", state.cwd),
            }),
        }
    }
}

impl FtpSession for MockSession {
    fn cwd(&mut self, path: &str) -> TransportResult<()> {
        let mut state = self.0.borrow_mut();

        let target = if path == ".." {
            let trimmed = state.cwd.trim_end_matches('/');
            match trimmed.rfind('/') {
                Some(idx) => trimmed[..=idx].to_string(),
                None => "/".to_string(),
            }
        } else if path.starts_with('/') {
            format!("{}/", path.trim_end_matches('/'))
        } else {
            format!("{}{}/", state.cwd, path.trim_end_matches('/'))
        };

        if state.broken_dirs.contains(&target) {
            return Err(TransportError::Timeout(format!("CWD {target}")));
        }

        if state.tree.contains_key(&target) {
            state.cwd = target;
            Ok(())
        } else {
            Err(TransportError::CommandRejected {
                message: format!("550 {target}: no such directory"),
            })
        }
    }

    fn pwd(&mut self) -> TransportResult<String> {
        let mut state = self.0.borrow_mut();
        state.pwd_calls += 1;
        if state.pwd_failures > 0 {
            state.pwd_failures -= 1;
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        Ok(state.cwd.clone())
    }

    fn list_rich(&mut self) -> TransportResult<Vec<RichEntry>> {
        if !self.0.borrow().mlsd_supported {
            return Err(TransportError::CommandRejected {
                message: "500 MLSD not understood".into(),
            });
        }

        let mut entries = vec![rich_entry(".", true), rich_entry("..", true)];
        for (name, is_dir) in self.children()? {
            entries.push(rich_entry(&name, is_dir));
        }
        Ok(entries)
    }

    fn list_lines(&mut self) -> TransportResult<Vec<String>> {
        if !self.0.borrow().list_supported {
            return Err(TransportError::CommandRejected {
                message: "500 LIST not understood".into(),
            });
        }

        // "total N" mimics servers that prepend a summary line
        let mut lines = vec![
            "total 4".to_string(),
            "drwxr-xr-x   2 ftp ftp     4096 Jan 01 00:00 .".to_string(),
            "drwxr-xr-x   2 ftp ftp     4096 Jan 01 00:00 ..".to_string(),
        ];
        for (name, is_dir) in self.children()? {
            let line = if is_dir {
                format!("drwxr-xr-x   2 ftp ftp     4096 Jan 01 00:00 {name}")
            } else {
                format!("-rw-r--r--   1 ftp ftp      100 Jan 01 00:00 {name}")
            };
            lines.push(line);
        }
        Ok(lines)
    }

    fn list_names(&mut self) -> TransportResult<Vec<String>> {
        if !self.0.borrow().nlst_supported {
            return Err(TransportError::CommandRejected {
                message: "500 NLST not understood".into(),
            });
        }

        let mut names = vec![".".to_string(), "..".to_string()];
        names.extend(self.children()?.into_iter().map(|(name, _)| name));
        Ok(names)
    }

    fn quit(&mut self) -> TransportResult<()> {
        self.0.borrow_mut().quits += 1;
        Ok(())
    }
}

fn rich_entry(name: &str, is_dir: bool) -> RichEntry {
    let mut facts = HashMap::new();
    facts.insert(
        "type".to_string(),
        if is_dir { "dir" } else { "file" }.to_string(),
    );
    RichEntry {
        name: name.to_string(),
        facts,
    }
}

/// A small three-level tree used by most tests:
///
/// ```text
/// /
/// ├── a/
/// │   ├── b/
/// │   │   └── f2.txt
/// │   └── f1.txt
/// └── f0.txt
/// ```
fn sample_tree() -> HashMap<String, Vec<(String, bool)>> {
    let mut tree = HashMap::new();
    tree.insert(
        "/".to_string(),
        vec![("a".to_string(), true), ("f0.txt".to_string(), false)],
    );
    tree.insert(
        "/a/".to_string(),
        vec![("b".to_string(), true), ("f1.txt".to_string(), false)],
    );
    tree.insert("/a/b/".to_string(), vec![("f2.txt".to_string(), false)]);
    tree
}

fn server(
    tree: HashMap<String, Vec<(String, bool)>>,
    mlsd: bool,
    list: bool,
    nlst: bool,
) -> Rc<RefCell<ServerState>> {
    Rc::new(RefCell::new(ServerState {
        tree,
        mlsd_supported: mlsd,
        list_supported: list,
        nlst_supported: nlst,
        ..ServerState::default()
    }))
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_connect_retries: 2,
        max_operation_retries: 3,
        base_backoff: Duration::from_millis(1),
        retry_delay: Duration::from_millis(1),
    }
}

fn connect(state: &Rc<RefCell<ServerState>>) -> Connection<MockDialer> {
    Connection::connect(MockDialer(Rc::clone(state)), fast_policy()).unwrap()
}

const EXPECTED_SAMPLE: &[&str] = &["a/", "f0.txt", "a/b/", "a/f1.txt", "a/b/f2.txt"];

#[test]
fn test_selector_prefers_rich_metadata() {
    let state = server(sample_tree(), true, true, true);
    let crawl = Crawl::new(connect(&state), "/").unwrap();
    assert_eq!(crawl.strategy(), StrategyKind::RichMetadata);
}

#[test]
fn test_selector_falls_back_to_tabular() {
    let state = server(sample_tree(), false, true, true);
    let crawl = Crawl::new(connect(&state), "/").unwrap();
    assert_eq!(crawl.strategy(), StrategyKind::Tabular);
}

#[test]
fn test_selector_falls_back_to_name_probe() {
    let state = server(sample_tree(), false, false, true);
    let crawl = Crawl::new(connect(&state), "/").unwrap();
    assert_eq!(crawl.strategy(), StrategyKind::NameProbe);
}

#[test]
fn test_no_usable_strategy_is_fatal_before_any_items() {
    let state = server(sample_tree(), false, false, false);
    let result = Crawl::new(connect(&state), "/");
    assert!(matches!(result, Err(WalkerError::NoUsableStrategy)));
}

#[test]
fn test_breadth_first_order_with_rich_metadata() {
    let state = server(sample_tree(), true, false, false);
    let paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();
    assert_eq!(paths, EXPECTED_SAMPLE);
}

#[test]
fn test_breadth_first_order_with_tabular() {
    let state = server(sample_tree(), false, true, false);
    let paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();
    assert_eq!(paths, EXPECTED_SAMPLE);
}

#[test]
fn test_breadth_first_order_with_name_probe() {
    let state = server(sample_tree(), false, false, true);
    let paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();
    assert_eq!(paths, EXPECTED_SAMPLE);
}

#[test]
fn test_directory_and_file_counts_round_trip() {
    let state = server(sample_tree(), true, true, true);
    let paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();

    let dirs = paths.iter().filter(|p| p.ends_with('/')).count();
    let files = paths.iter().filter(|p| !p.ends_with('/')).count();
    assert_eq!(dirs, 2);
    assert_eq!(files, 3);

    // No duplicates, single separators only
    let unique: HashSet<&String> = paths.iter().collect();
    assert_eq!(unique.len(), paths.len());
    assert!(paths.iter().all(|p| !p.contains("//")));
}

#[test]
fn test_directory_yielded_before_its_contents() {
    let mut tree = HashMap::new();
    tree.insert("/".to_string(), vec![("a".to_string(), true)]);
    tree.insert("/a/".to_string(), vec![("b.txt".to_string(), false)]);

    let state = server(tree, true, false, false);
    let paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();
    assert_eq!(paths, vec!["a/", "a/b.txt"]);
}

#[test]
fn test_start_path_below_root() {
    let mut tree = sample_tree();
    tree.insert(
        "/pub/".to_string(),
        vec![("data".to_string(), true), ("note.txt".to_string(), false)],
    );
    tree.insert("/pub/data/".to_string(), vec![]);
    tree.insert("/".to_string(), vec![("pub".to_string(), true)]);

    let state = server(tree, true, false, false);
    let paths: Vec<String> = Crawl::new(connect(&state), "/pub").unwrap().collect();
    assert_eq!(paths, vec!["data/", "note.txt"]);
}

#[test]
fn test_missing_start_path_fails_construction() {
    let state = server(sample_tree(), true, false, false);
    let result = Crawl::new(connect(&state), "/nope");
    assert!(matches!(result, Err(WalkerError::Transport(_))));
}

#[test]
fn test_broken_directory_is_skipped_not_fatal() {
    let mut tree = HashMap::new();
    tree.insert(
        "/".to_string(),
        vec![
            ("a".to_string(), true),
            ("b".to_string(), true),
            ("c".to_string(), true),
        ],
    );
    tree.insert("/a/".to_string(), vec![("f1".to_string(), false)]);
    tree.insert("/b/".to_string(), vec![("f2".to_string(), false)]);
    tree.insert("/c/".to_string(), vec![("f3".to_string(), false)]);

    let state = server(tree, true, false, false);
    state
        .borrow_mut()
        .broken_dirs
        .insert("/b/".to_string());

    let paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();

    // b/ itself was discovered from the root listing, but its contents are
    // skipped; siblings already in the frontier are still processed.
    assert_eq!(paths, vec!["a/", "b/", "c/", "a/f1", "c/f3"]);
}

#[test]
fn test_dropped_session_reconnects_without_losing_items() {
    // 60 empty directories under the root
    let mut tree = HashMap::new();
    let children: Vec<(String, bool)> = (0..60).map(|i| (format!("d{i:02}"), true)).collect();
    for (name, _) in &children {
        tree.insert(format!("/{name}/"), vec![]);
    }
    tree.insert("/".to_string(), children);

    let state = server(tree, true, false, false);
    let mut crawl = Crawl::new(connect(&state), "/").unwrap();

    let mut paths = Vec::new();
    for _ in 0..50 {
        paths.push(crawl.next().unwrap());
    }

    // Kill the session mid-crawl; the next liveness probe fails and the
    // connection transparently redials.
    state.borrow_mut().pwd_failures = 1;

    paths.extend(&mut crawl);

    assert_eq!(paths.len(), 60);
    let unique: HashSet<&String> = paths.iter().collect();
    assert_eq!(unique.len(), 60);
    assert_eq!(state.borrow().dials, 2);
}

#[test]
fn test_liveness_check_boundary_reconnects_without_losing_items() {
    // 55 directories each holding one file, so the dequeue counter keeps
    // advancing while items are still flowing.
    let mut tree = HashMap::new();
    let children: Vec<(String, bool)> = (0..55).map(|i| (format!("d{i:02}"), true)).collect();
    for (name, _) in &children {
        tree.insert(format!("/{name}/"), vec![("f.txt".to_string(), false)]);
    }
    tree.insert("/".to_string(), children);

    let state = server(tree, true, false, false);
    let mut crawl = Crawl::new(connect(&state), "/").unwrap();

    let mut paths = Vec::new();
    for _ in 0..103 {
        paths.push(crawl.next().unwrap());
    }

    // The next item forces the 50th dequeue: the scheduled liveness check
    // runs against a dead session and redials before the directory is
    // entered.
    state.borrow_mut().pwd_failures = 1;

    paths.extend(&mut crawl);

    assert_eq!(paths.len(), 110);
    let unique: HashSet<&String> = paths.iter().collect();
    assert_eq!(unique.len(), 110);
    assert_eq!(state.borrow().dials, 2);
}

#[test]
fn test_liveness_check_runs_once_per_interval() {
    // 49 directories with one file each, then 10 empty ones. The check is
    // keyed on dequeued directories, so a run of empty directories must not
    // retrigger it.
    let mut tree = HashMap::new();
    let mut children = Vec::new();
    for i in 0..49 {
        let name = format!("full{i:02}");
        tree.insert(format!("/{name}/"), vec![("f.txt".to_string(), false)]);
        children.push((name, true));
    }
    for i in 0..10 {
        let name = format!("empty{i}");
        tree.insert(format!("/{name}/"), vec![]);
        children.push((name, true));
    }
    tree.insert("/".to_string(), children);

    let state = server(tree, true, false, false);
    let _paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();

    // Every command issues one PWD before it runs: 2 during construction
    // (enter the start path, strategy selection) and 2 per explored
    // directory (CWD + MLSD) for 60 directories. Exactly one extra PWD is
    // the scheduled check on the 50th dequeue.
    assert_eq!(state.borrow().pwd_calls, 2 + 60 * 2 + 1);
}

#[test]
fn test_rejected_login_fails_construction_without_retry() {
    let state = server(sample_tree(), true, true, true);
    state.borrow_mut().reject_login = true;

    let result = Connection::connect(MockDialer(Rc::clone(&state)), fast_policy());
    assert!(matches!(result, Err(TransportError::AuthRejected { .. })));
    assert_eq!(state.borrow().dials, 1);
}

#[test]
fn test_connection_released_on_completion() {
    let state = server(sample_tree(), true, false, false);
    let crawl = Crawl::new(connect(&state), "/").unwrap();
    let _paths: Vec<String> = crawl.collect();
    assert_eq!(state.borrow().quits, 1);
}

#[test]
fn test_connection_released_on_early_abandonment() {
    let state = server(sample_tree(), true, false, false);
    {
        let mut crawl = Crawl::new(connect(&state), "/").unwrap();
        assert_eq!(crawl.next().unwrap(), "a/");
        // Consumer walks away here
    }
    assert_eq!(state.borrow().quits, 1);
}

#[test]
fn test_empty_directory_yields_nothing_but_is_not_an_error() {
    let mut tree = HashMap::new();
    tree.insert("/".to_string(), vec![("empty".to_string(), true)]);
    tree.insert("/empty/".to_string(), vec![]);

    let state = server(tree, true, false, false);
    let paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();
    assert_eq!(paths, vec!["empty/"]);
}

#[test]
fn test_dot_entries_never_appear_in_output() {
    // The mock prepends "." and ".." to every listing; no strategy may
    // let them through.
    for (mlsd, list, nlst) in [(true, false, false), (false, true, false), (false, false, true)] {
        let state = server(sample_tree(), mlsd, list, nlst);
        let paths: Vec<String> = Crawl::new(connect(&state), "/").unwrap().collect();
        assert!(
            paths.iter().all(|p| !p.contains('.') || p.contains(".txt")),
            "dot entries leaked with mlsd={mlsd} list={list} nlst={nlst}: {paths:?}"
        );
        assert_eq!(paths.len(), EXPECTED_SAMPLE.len());
    }
}
