//! Places `config.toml` and the `seed/` payloads next to the built binary,
//! where the backend looks for them at startup.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn profile_dir() -> Option<PathBuf> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").ok()?);
    let profile = env::var("PROFILE").ok()?;
    // OUT_DIR is target/<profile>/build/backend-xxx/out
    out_dir
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../seed");

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let Some(target_dir) = profile_dir() else {
        println!("cargo:warning=Could not locate target profile directory");
        return;
    };

    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        if let Err(e) = fs::copy(&source_config, target_dir.join("config.toml")) {
            println!("cargo:warning=Failed to copy config.toml: {}", e);
        }
    }

    let seed_src = workspace_root.join("seed");
    let Ok(entries) = fs::read_dir(&seed_src) else {
        return;
    };
    let seed_dst = target_dir.join("seed");
    if let Err(e) = fs::create_dir_all(&seed_dst) {
        println!("cargo:warning=Failed to create {:?}: {}", seed_dst, e);
        return;
    }
    for path in entries.filter_map(|e| e.ok().map(|e| e.path())) {
        if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(name) = path.file_name() {
                if let Err(e) = fs::copy(&path, seed_dst.join(name)) {
                    println!("cargo:warning=Failed to copy {:?}: {}", path, e);
                }
            }
        }
    }
}
