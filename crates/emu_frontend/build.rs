// build.rs
// Build script capturing source-control identity for the window title

use std::env;
use std::process::Command;

/// Run a git command and return its trimmed stdout, if it succeeded
fn git_output(args: &[&str]) -> Option<String> {
    let output = match Command::new("git").args(args).output() {
        Ok(output) => output,
        Err(e) => {
            eprintln!("info: git not available ({}), using fallback SCM fields", e);
            return None;
        }
    };

    if !output.status.success() {
        eprintln!("info: git {:?} failed, using fallback SCM fields", args);
        return None;
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-env-changed=FRONTEND_SCM_BRANCH");
    println!("cargo:rerun-if-env-changed=FRONTEND_SCM_DESC");

    // Explicit overrides win, so packaged builds without a checkout stay reproducible
    let branch = env::var("FRONTEND_SCM_BRANCH")
        .ok()
        .or_else(|| git_output(&["rev-parse", "--abbrev-ref", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());

    let description = env::var("FRONTEND_SCM_DESC")
        .ok()
        .or_else(|| git_output(&["describe", "--always", "--dirty"]))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=FRONTEND_SCM_BRANCH={}", branch);
    println!("cargo:rustc-env=FRONTEND_SCM_DESC={}", description);
}
