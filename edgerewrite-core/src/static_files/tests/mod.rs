mod handler_tests;

use std::fs;
use std::path::Path;

/// A small site: two directories with identity and precompressed index
/// documents, plus an asset with no variants.
pub(crate) fn write_site(root: &Path) {
    fs::create_dir_all(root.join("about")).unwrap();
    fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(root.join("index.html.br"), "home-br").unwrap();
    fs::write(root.join("index.html.gz"), "home-gz").unwrap();
    fs::write(root.join("about/index.html"), "<h1>about</h1>").unwrap();
    fs::write(root.join("about/index.html.gz"), "about-gz").unwrap();
    fs::write(root.join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
}
