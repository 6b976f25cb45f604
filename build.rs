use std::fs;

fn main() {
    // Validate default config at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    let base_size = table
        .get("font")
        .and_then(|font| font.get("base_size"))
        .and_then(toml::Value::as_integer);
    if !matches!(base_size, Some(size) if size > 0) {
        panic!("default_config.toml: font.base_size must be a positive integer");
    }
}
