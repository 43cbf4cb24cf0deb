//! Build script for judgelight-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Checks that exactly one node role is enabled
//! - Validates node.toml and turns it into constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const ROLES: [&str; 4] = ["HOST", "LEFT", "RIGHT", "CENTER"];
const REVISIONS: [(&str, &str); 2] = [("early", "Early"), ("late", "Late")];
const BAUD_RATES: [i64; 5] = [9_600, 19_200, 38_400, 57_600, 115_200];

fn main() {
    setup_linker();
    validate_role();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Exactly one `role-*` feature must be enabled
fn validate_role() {
    let enabled: Vec<&str> = ROLES
        .iter()
        .copied()
        .filter(|role| env::var_os(format!("CARGO_FEATURE_ROLE_{role}")).is_some())
        .collect();

    match enabled.len() {
        1 => {}
        0 => panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: no node role selected                                    ║\n\
            ║                                                                  ║\n\
            ║  Build with exactly one of:                                      ║\n\
            ║    --features role-host | role-left | role-right | role-center   ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        ),
        _ => panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: several node roles selected                              ║\n\
            ║                                                                  ║\n\
            ║  Enabled: {:<54} ║\n\
            ║  A node is either the host or one judge module.                  ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            enabled.join(", ")
        ),
    }
}

/// Validate node.toml configuration at compile time
fn validate_config() -> toml::Value {
    println!("cargo:rerun-if-changed=node.toml");

    let config_path = Path::new("node.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read node.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in node.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();

    match config.get("timings").and_then(|t| t.get("ack_revision")) {
        Some(toml::Value::String(rev)) if REVISIONS.iter().any(|(name, _)| name == rev) => {}
        Some(other) => errors.push(format!(
            "timings.ack_revision must be \"early\" or \"late\", got {other}"
        )),
        None => errors.push("missing timings.ack_revision".to_string()),
    }

    match config.get("link").and_then(|l| l.get("baud")) {
        Some(toml::Value::Integer(baud)) if BAUD_RATES.contains(baud) => {}
        Some(other) => errors.push(format!("link.baud {other} is not a supported XBee rate")),
        None => errors.push("missing link.baud".to_string()),
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: node.toml validation failed                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&errors.join("\n"))
        );
    }

    println!("cargo:warning=node.toml validated successfully");
    config
}

/// Write `node_config.rs` into OUT_DIR
fn generate_config(config: &toml::Value) {
    let revision = config["timings"]["ack_revision"].as_str().unwrap_or("late");
    let variant = REVISIONS
        .iter()
        .find(|(name, _)| *name == revision)
        .map(|(_, variant)| *variant)
        .unwrap_or("Late");
    let baud = config["link"]["baud"].as_integer().unwrap_or(38_400);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("node_config.rs")).unwrap();
    writeln!(
        f,
        "/// Acknowledgment timeout revision from node.toml\n\
         pub const ACK_REVISION: AckTimeoutRevision = AckTimeoutRevision::{variant};\n\
         /// Radio link rate from node.toml\n\
         pub const LINK_BAUD: u32 = {baud};"
    )
    .unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
