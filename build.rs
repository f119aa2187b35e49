// Stamps the binary with its build time and commit. The commit ends up in the
// HTTP user agent of every stop request; both show in `scanctl validate`.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    println!(
        "cargo:rustc-env=SCANCTL_BUILD_TIMESTAMP={}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );

    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|hash| !hash.is_empty());
    if let Some(hash) = hash {
        println!("cargo:rustc-env=SCANCTL_GIT_HASH={hash}");
    }
}
