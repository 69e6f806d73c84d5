//! Parsing, editing and generating a commented configuration document.
//!
//! Run with: cargo run --example basic

use std::error::Error;
use tconf::{FormatOptions, Registry, Value};

const CONFIG: &str = "\
# Human readable service name
name = \"inventory\"

# Network settings
server:
    # Address to bind
    host = \"0.0.0.0\"
    port = 8080
    ports = Tint [
        8080
        8443
    ]

limits:
    burst = 1.5
    strict = false
";

fn main() -> Result<(), Box<dyn Error>> {
    let registry = Registry::new();

    // Keep block headers so their comments survive a rewrite
    let options = FormatOptions::new().with_block_headers(true);
    let mut doc = registry.parser_with_options(options).parse(CONFIG)?;

    for (key, entry) in &doc {
        if entry.is_block() {
            println!("{:<16} (block) # {}", key, entry.comment);
        } else {
            println!("{:<16} {}", key, entry.value);
        }
    }

    if let Some(port) = doc.get_value("server.port").and_then(Value::as_int) {
        println!("\nport is {}, moving to {}", port, port + 1);
        doc.insert_commented("server.port", "Moved off the default", port + 1);
    }
    doc.insert_commented("limits.timeout", "Seconds before giving up", 30);

    let text = registry.generator().generate(&doc)?;
    println!("\nRewritten:\n{}", text);

    // The comment-free view
    let values = registry.parser().parse_values(&text)?;
    assert_eq!(values.get("server.port"), Some(&Value::Int(8081)));
    println!("✓ {} values after round trip", values.len());

    Ok(())
}
