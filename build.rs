use std::fs;

const DEFAULT_CONFIG: &str = "src/default_config.toml";

fn main() {
    println!("cargo:rerun-if-changed={DEFAULT_CONFIG}");

    let content = fs::read_to_string(DEFAULT_CONFIG).expect("Failed to read default_config.toml");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {e}"),
    };

    if !table.get("render").is_some_and(toml::Value::is_table) {
        panic!("default_config.toml: missing [render] table");
    }
    let Some(markers) = table.get("markers").and_then(toml::Value::as_table) else {
        panic!("default_config.toml: missing [markers] table");
    };
    for (role, marker) in markers {
        match marker.as_str() {
            Some(selector) if !selector.trim().is_empty() => {}
            _ => panic!("default_config.toml: marker `{role}` must be a non-empty string"),
        }
    }
}
