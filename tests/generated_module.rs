//! A rendered module compiled against the library
//!
//! `fixtures/assets.rs` is `bundlefs --pkg assets --prefix tests/fixtures/assets
//! tests/fixtures/assets` output. Paths are relative to the package root,
//! which is where cargo runs integration tests.

use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Barrier};
use std::thread;

use bundlefs::{PackOptions, VirtualFs, pack_assets};

include!("fixtures/assets.rs");

const FIXTURE_ROOT: &str = "tests/fixtures/assets";
const KEYS: [&str; 3] = ["/empty.txt", "/index.html", "/static/app.js"];

#[test]
fn test_embedded_matches_local() {
    for key in KEYS {
        let embedded = assets::read_bytes(false, key).unwrap();
        let local = assets::read_bytes(true, key).unwrap();
        assert_eq!(embedded, local, "{key}");
    }
    assert_eq!(
        assets::must_read_string(false, "index.html"),
        "<!doctype html>\n<h1>bundlefs</h1>\n"
    );
    assert!(assets::read_bytes(false, "/empty.txt").unwrap().is_empty());
}

#[test]
fn test_scoped_open() {
    for use_local in [false, true] {
        let mut text = String::new();
        assets::dir(use_local, "/static")
            .open("app.js")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "console.log(\"embedded\");\n");
    }
}

#[test]
fn test_missing_asset_is_not_found() {
    assert!(assets::fs(false).open("/missing").unwrap_err().is_not_found());
    assert!(assets::fs(true).open("/missing").unwrap_err().is_not_found());
    assert!(assets::read_string(false, "/static/missing.js").is_err());
}

#[test]
fn test_directories_are_registered() {
    let registry = assets::BUNDLE.registry();
    assert_eq!(
        registry.keys().collect::<Vec<_>>(),
        vec!["/", "/empty.txt", "/index.html", "/static", "/static/app.js"]
    );
    assert!(assets::fs(false).open("/static").unwrap().stat().unwrap().is_dir());
}

#[test]
fn test_concurrent_reads_decode_once() {
    let barrier = Arc::new(Barrier::new(32));
    let handles: Vec<_> = (0..32)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut data = Vec::new();
                assets::fs(false)
                    .open("/static/app.js")
                    .unwrap()
                    .read_to_end(&mut data)
                    .unwrap();
                data
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), b"console.log(\"embedded\");\n");
    }
    let entry = assets::BUNDLE.registry().get("/static/app.js").unwrap();
    assert_eq!(entry.decode_runs(), 1);
}

/// Rendered text minus the version header and the payload chunk lines
///
/// Compressed bytes depend on the deflate implementation; everything else
/// must match what the emitter produces today.
fn template_lines(source: &str) -> Vec<&str> {
    source
        .lines()
        .skip(1)
        .filter(|line| !line.starts_with("                \""))
        .collect()
}

#[test]
fn test_fixture_matches_fresh_render() {
    let options = PackOptions {
        pkg: "assets".to_string(),
        prefix: FIXTURE_ROOT.to_string(),
        ..PackOptions::default()
    };
    let fresh = pack_assets(&[PathBuf::from(FIXTURE_ROOT)], &options).unwrap();
    let fixture = include_str!("fixtures/assets.rs");

    assert!(fresh.starts_with("// Code generated by bundlefs "));
    assert_eq!(template_lines(&fresh), template_lines(fixture));
}

#[test]
fn test_fixture_payloads_decode_to_inputs() {
    for key in KEYS {
        let on_disk = std::fs::read(format!("{FIXTURE_ROOT}{key}")).unwrap();
        assert_eq!(&*assets::read_bytes(false, key).unwrap(), &on_disk[..], "{key}");
    }
}
