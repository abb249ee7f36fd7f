use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")).unwrap_or_default();
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            let include = crate_dir.join("include");
            if let Err(err) = std::fs::create_dir_all(&include) {
                println!("cargo:warning=cannot create {}: {err}", include.display());
                return;
            }
            let header = include.join("personas.h");
            let mut contents = Vec::new();
            bindings.write(&mut contents);
            if let Err(err) = std::fs::write(&header, contents) {
                println!("cargo:warning=cannot write {}: {err}", header.display());
            }
        }
        Err(err) => println!("cargo:warning=cbindgen skipped: {err}"),
    }
}
