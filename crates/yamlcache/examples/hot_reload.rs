//! Hot reload example demonstrating cached reads and file watching.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=yamlcache=debug cargo run --example hot_reload
//!
//! # In another terminal, modify the file printed at startup
//! echo 'port: 9090' > /tmp/yamlcache_example/config.yaml
//! ```

use std::fs;
use std::thread;
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use yamlcache::YamlConfig;

fn main() -> miette::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yamlcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let dir = std::env::temp_dir().join("yamlcache_example");
    fs::create_dir_all(&dir).map_err(|e| miette::miette!("creating {}: {e}", dir.display()))?;

    let path = dir.join("config.yaml");
    fs::write(&path, "port: 8080\nhost: localhost\ntimeout: 5s\n")
        .map_err(|e| miette::miette!("writing {}: {e}", path.display()))?;

    println!("Config file: {}", path.display());
    println!("Modify this file to see hot reload in action!\n");

    let config = YamlConfig::builder()
        .base_dir(&dir)
        .debounce(Duration::from_millis(50))
        .build()?;
    config.config_file_change_listen()?;

    for _ in 0..30 {
        let port = config.get_int("port")?;
        let host = config.get_string("host")?;
        let timeout = config.get_duration("timeout")?;

        println!(
            "{host}:{port} timeout={timeout:?} (cached entries: {})",
            config.container().len()
        );
        thread::sleep(Duration::from_secs(2));
    }

    Ok(())
}
