#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use yamlcache::file::FileUtils;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (lossy to handle invalid UTF-8)
    let content = String::from_utf8_lossy(data);
    let path = Path::new("fuzz.yaml");

    // Errors are fine, panics are not
    let parsed = FileUtils::parse_str(&content, path);

    // Every successful parse is a mapping or some other value, never null
    if let Ok(doc) = &parsed {
        assert!(!doc.is_null(), "blank documents must parse to an empty mapping");

        // Lookups with the input itself as a key must not panic
        let _ = FileUtils::lookup(doc, &content);
        for line in content.lines().take(16) {
            let _ = FileUtils::lookup(doc, line);
        }
    }

    // YAML is sensitive to indentation and special characters
    let yaml_tests = [
        format!("key: {content}"),
        format!("- {content}"),
        format!("nested:\n  value: {content}"),
    ];

    for yaml in &yaml_tests {
        if let Ok(doc) = FileUtils::parse_str(yaml, path) {
            let _ = FileUtils::lookup(&doc, "key");
            let _ = FileUtils::lookup(&doc, "nested.value");
            let _ = FileUtils::lookup(&doc, "0");
        }
    }
});
