/// Native entry point: `prism-native [config.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use prism::PickerConfig;

    let path = std::env::args_os().nth(1);
    let loaded = match &path {
        Some(path) => match PickerConfig::load(std::path::Path::new(path)) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Failed to load {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => PickerConfig::load_from_default_path(),
    };
    let config = loaded.clone().unwrap_or_default();

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    // First run: leave an editable copy of the defaults behind.
    if loaded.is_none() {
        if let Err(e) = config.save_to_default_path() {
            log::warn!("Could not write default configuration: {}", e);
        }
    }

    if let Err(e) = prism::native::run(&config) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
