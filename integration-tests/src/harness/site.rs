use std::fs;
use tempfile::TempDir;

pub const HOME_IDENTITY: &str = "<h1>home</h1>";
pub const HOME_BR: &str = "home-br";
pub const HOME_GZ: &str = "home-gz";
pub const ABOUT_GZ: &str = "about-gz";

/// A site whose bodies name the object they came from, so a response shows
/// which key the rewrite picked. `about/` deliberately has no brotli variant.
pub fn build_site() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create site dir");
    let root = dir.path();

    fs::create_dir_all(root.join("about")).unwrap();
    fs::write(root.join("index.html"), HOME_IDENTITY).unwrap();
    fs::write(root.join("index.html.br"), HOME_BR).unwrap();
    fs::write(root.join("index.html.gz"), HOME_GZ).unwrap();
    fs::write(root.join("about/index.html"), "<h1>about</h1>").unwrap();
    fs::write(root.join("about/index.html.gz"), ABOUT_GZ).unwrap();
    fs::write(root.join("app.css"), "body{}").unwrap();

    dir
}
