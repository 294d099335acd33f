use std::{env, fs, fs::File, io::prelude::*, path::Path};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=../patterns/");

    let out_dir = env::var("OUT_DIR")?;
    let dest_patterns_path = Path::new(&out_dir).join("all-patterns.yaml");

    // Try multiple possible paths for patterns directory
    let possible_paths = ["../patterns", "../../patterns", "patterns"];

    let patterns_path = possible_paths
        .iter()
        .find(|path| Path::new(path).exists())
        .ok_or_else(|| {
            let msg = format!("Patterns directory not found. Tried paths: {possible_paths:?}");
            std::io::Error::new(std::io::ErrorKind::NotFound, msg)
        })?;

    // Declaration order of the forbidden set is the sorted file order.
    let mut paths: Vec<_> = fs::read_dir(patterns_path)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    paths.sort_by_key(std::fs::DirEntry::path);

    let mut all_group_patterns = String::new();
    for entry in &paths {
        let contents = fs::read_to_string(entry.path())?;
        all_group_patterns.push_str(&contents);
        all_group_patterns.push('\n');
    }

    let mut file = File::create(dest_patterns_path)?;
    file.write_all(all_group_patterns.as_bytes())?;

    Ok(())
}
