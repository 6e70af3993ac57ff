/// Build script for queuecalc
/// Embeds the source revision shown by `queuecalc version`

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");

    // Short hash; absent outside a git checkout
    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            if let Ok(hash) = String::from_utf8(output.stdout) {
                println!("cargo:rustc-env=QUEUECALC_GIT_HASH={}", hash.trim());
            }
        }
    }
}
