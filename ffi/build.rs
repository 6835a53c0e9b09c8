use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let crate_dir = PathBuf::from(crate_dir);
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")).unwrap_or_default();
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            let include = crate_dir.join("include");
            if let Err(e) = std::fs::create_dir_all(&include) {
                println!("cargo:warning=cannot create {}: {e}", include.display());
                return;
            }
            bindings.write_to_file(include.join("reqctx.h"));
        }
        Err(e) => println!("cargo:warning=header generation skipped: {e}"),
    }
}
