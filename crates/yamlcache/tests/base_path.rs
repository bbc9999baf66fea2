//! Factory construction relative to the working directory.
//!
//! These tests change the process working directory and must not run
//! concurrently with each other.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::tempdir;
use yamlcache::{YamlConfig, resolve_base_dir};

/// Restores the working directory when dropped.
struct CwdGuard(PathBuf);

impl CwdGuard {
    fn enter(dir: &Path) -> Self {
        let previous = env::current_dir().unwrap();
        env::set_current_dir(dir).unwrap();
        Self(previous)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.0);
    }
}

#[test]
#[serial]
fn test_factory_uses_working_directory() {
    let dir = tempdir().unwrap();
    let conf = dir.path().join("conf");
    fs::create_dir_all(&conf).unwrap();
    fs::write(conf.join("factory_cwd.yaml"), "hello: word\nfoo: 1.0\n").unwrap();

    let _cwd = CwdGuard::enter(dir.path());
    let config = YamlConfig::from_factory("./conf", "factory_cwd", None).unwrap();

    assert_eq!(config.namespace().as_str(), "factory_cwd");
    assert_eq!(config.get_string("hello").unwrap(), "word");
    assert!((config.get_float64("foo").unwrap() - 1.0).abs() < f64::EPSILON);
}

#[test]
#[serial]
fn test_factory_walks_up_to_anchor() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("my-project");
    let nested = project.join("crates").join("app");
    fs::create_dir_all(&nested).unwrap();
    fs::create_dir_all(project.join("conf")).unwrap();
    fs::write(project.join("conf").join("factory_anchor.yml"), "port: 8080\n").unwrap();

    let _cwd = CwdGuard::enter(&nested);
    let config = YamlConfig::from_factory("conf", "factory_anchor", Some("my-project")).unwrap();

    assert_eq!(config.get_int("port").unwrap(), 8080);
    assert_eq!(
        config.source().path().map(|p| p.canonicalize().unwrap()),
        Some(
            project
                .join("conf")
                .join("factory_anchor.yml")
                .canonicalize()
                .unwrap()
        )
    );
}

#[test]
#[serial]
fn test_unknown_anchor_falls_back_to_cwd() {
    let dir = tempdir().unwrap();
    let _cwd = CwdGuard::enter(dir.path());

    let base = resolve_base_dir(Some("no-such-ancestor-dir")).unwrap();
    assert_eq!(
        base.canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[test]
#[serial]
fn test_factory_missing_file_is_error() {
    let dir = tempdir().unwrap();
    let _cwd = CwdGuard::enter(dir.path());

    let err = YamlConfig::from_factory("", "", None).unwrap_err();
    assert!(err.is_not_found());
}
