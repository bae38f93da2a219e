use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=ALFRED_GIT_COMMIT");
    println!("cargo:rerun-if-env-changed=ALFRED_BUILD_DATE");

    // Release pipelines may pin these explicitly; otherwise ask git and the clock.
    let commit = std::env::var("ALFRED_GIT_COMMIT")
        .ok()
        .filter(|value| !value.is_empty())
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".to_string());

    let date = std::env::var("ALFRED_BUILD_DATE")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    println!("cargo:rustc-env=ALFRED_GIT_COMMIT={commit}");
    println!("cargo:rustc-env=ALFRED_BUILD_DATE={date}");
}

fn git_short_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let sha = String::from_utf8(output.stdout).ok()?;
    let sha = sha.trim();
    if sha.is_empty() {
        None
    } else {
        Some(sha.to_string())
    }
}
