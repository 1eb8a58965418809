// Embeds the crate version at compile time as SKILLSEEK_VERSION.
// Release pipelines may replace the patch segment through SKILLSEEK_PATCH_VERSION.

use std::env;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");

    let version = match env::var("SKILLSEEK_PATCH_VERSION") {
        Ok(patch) => {
            let (major_minor, _) = version
                .rsplit_once('.')
                .expect("Cargo.toml version must be major.minor.patch");
            format!("{major_minor}.{patch}")
        }
        Err(_) => version,
    };

    println!("cargo:rustc-env=SKILLSEEK_VERSION={version}");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=SKILLSEEK_PATCH_VERSION");
}
