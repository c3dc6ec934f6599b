// Shared build script helper for README-to-rustdoc transformation.
// Include this in build.rs files with: include!("../build_common.rs");
//
// Required imports in the including file:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Prepare a crate's README.md for inclusion as rustdoc front matter.
///
/// Rustdoc cannot resolve `src/foo.rs` style links, so links into the source
/// tree are rewritten to module links:
/// 1. Strip the 'src/' prefix
/// 2. Strip the '.rs' extension
///
/// The result is written to `$OUT_DIR/README_GENERATED.md`, which each crate
/// pulls in with `#![doc = include_str!(...)]`.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");

    let readme_path = Path::new(crate_dir).join("README.md");
    let content = fs::read_to_string(&readme_path)
        .unwrap_or_else(|e| panic!("README.md required for crate docs ({e})"));

    let rustdoc_content = content.replace("](src/", "](").replace(".rs)", ")");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("README_GENERATED.md");
    fs::write(dest_path, rustdoc_content).unwrap();
}
