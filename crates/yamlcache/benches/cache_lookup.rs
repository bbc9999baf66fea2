//! Benchmarks for cached reads versus raw source reads.
//!
//! Run with: `cargo bench -p yamlcache`

use std::fs;

use divan::{Bencher, black_box};
use tempfile::TempDir;
use yamlcache::{RawSource, SharedTable, YamlConfig, YamlConfigBuilder, YamlSource};

const DOCUMENT: &str = "\
server:
  host: localhost
  port: 8080
  timeout: 30s
  hosts: [a, b, c]
database:
  url: postgres://localhost/app
  pool: 16
";

fn main() {
    divan::main();
}

fn setup() -> (TempDir, YamlConfig<YamlSource>) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.yaml"), DOCUMENT).unwrap();

    let config = YamlConfigBuilder::new()
        .base_dir(dir.path())
        .table(SharedTable::new())
        .build()
        .unwrap();

    (dir, config)
}

#[divan::bench]
fn cached_int(bencher: Bencher) {
    let (_dir, config) = setup();
    config.get_int("server.port").unwrap();

    bencher.bench_local(|| black_box(config.get_int(black_box("server.port")).unwrap()));
}

#[divan::bench]
fn cached_string(bencher: Bencher) {
    let (_dir, config) = setup();
    config.get_string("database.url").unwrap();

    bencher.bench_local(|| black_box(config.get_string(black_box("database.url")).unwrap()));
}

#[divan::bench]
fn raw_source_int(bencher: Bencher) {
    let (_dir, config) = setup();
    let source = config.source();

    bencher.bench_local(|| black_box(source.get_int(black_box("server.port"))));
}

#[divan::bench]
fn raw_source_duration(bencher: Bencher) {
    let (_dir, config) = setup();
    let source = config.source();

    bencher.bench_local(|| black_box(source.get_duration(black_box("server.timeout"))));
}

#[divan::bench]
fn cold_read_after_purge(bencher: Bencher) {
    let (_dir, config) = setup();

    bencher.bench_local(|| {
        config.container().fuzzy_delete();
        black_box(config.get_int("server.port").unwrap())
    });
}
