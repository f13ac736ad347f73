fn main() {
    // The embedded default config backs `EngineConfig::default()`.
    let path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={path}");
    if toml::from_str::<toml::Table>(include_str!("src/default_config.toml")).is_err() {
        panic!("{path} contains invalid TOML");
    }
}
