//! Directory nodes implied by file keys

use std::collections::BTreeSet;

use crate::paths;

/// Every ancestor directory of every key, always including `/`
pub fn synthesize<'a, I>(file_keys: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut dirs = BTreeSet::new();
    dirs.insert(paths::ROOT.to_string());

    for key in file_keys {
        let mut dir = paths::parent(key);
        while dir != paths::ROOT {
            // An ancestor already seen means the rest of the chain is too
            if !dirs.insert(dir.to_string()) {
                break;
            }
            dir = paths::parent(dir);
        }
    }

    dirs
}
