// Code generated by bundlefs 0.3.0. DO NOT EDIT.

#[allow(dead_code)]
pub mod assets {
    use std::sync::{Arc, LazyLock};

    use bundlefs::{Bundle, EntryDescriptor, ScopedFs, VirtualFs};

    /// Packed entries, files then directories, sorted by path
    pub static ENTRIES: [EntryDescriptor; 5] = [
        EntryDescriptor::file(
            "/empty.txt",
            "tests/fixtures/assets/empty.txt",
            0,
            None,
            concat!(
                "H4sIAAAAAAACAwMAAAAAAAAAAAA=",
            ),
        ),
        EntryDescriptor::file(
            "/index.html",
            "tests/fixtures/assets/index.html",
            34,
            None,
            concat!(
                "H4sIAAAAAAACA7NRTMlPLqksSFXIKMnNseOyyTC0SyrNS8lJTSu20QdyuAAxLUPGIgAAAA==",
            ),
        ),
        EntryDescriptor::file(
            "/static/app.js",
            "tests/fixtures/assets/static/app.js",
            25,
            None,
            concat!(
                "H4sIAAAAAAACA0vOzyvOz0nVy8lP11BKzU1KTUlJTVHStOYCACXFbaUZAAAA",
            ),
        ),
        EntryDescriptor::dir("/", "tests/fixtures/assets"),
        EntryDescriptor::dir("/static", "tests/fixtures/assets/static"),
    ];

    /// Registry over [`ENTRIES`], built on first use
    pub static BUNDLE: LazyLock<Bundle> = LazyLock::new(|| match Bundle::from_static(&ENTRIES) {
        Ok(bundle) => bundle,
        Err(e) => panic!("embedded registry is invalid: {e}"),
    });

    /// Embedded assets, or the original files on disk when `use_local` is true
    pub fn fs(use_local: bool) -> Box<dyn VirtualFs> {
        BUNDLE.fs(use_local)
    }

    /// Assets below the directory `name`
    pub fn dir(use_local: bool, name: &str) -> ScopedFs {
        BUNDLE.dir(use_local, name)
    }

    /// Contents of the asset at `name`
    pub fn read_bytes(use_local: bool, name: &str) -> bundlefs::Result<Arc<[u8]>> {
        BUNDLE.read_bytes(use_local, name)
    }

    /// Same as `read_bytes`, but panics if the asset is missing or corrupt
    pub fn must_read_bytes(use_local: bool, name: &str) -> Arc<[u8]> {
        BUNDLE.must_read_bytes(use_local, name)
    }

    /// Contents of the text asset at `name`
    pub fn read_string(use_local: bool, name: &str) -> bundlefs::Result<String> {
        BUNDLE.read_string(use_local, name)
    }

    /// Same as `read_string`, but panics if the asset is missing or corrupt
    pub fn must_read_string(use_local: bool, name: &str) -> String {
        BUNDLE.must_read_string(use_local, name)
    }
}
