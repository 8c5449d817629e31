//! Env command - look up environment variables through the map bridge.

use husk_bridge::{collect_map, get_value_for, register_env, release_map, MapHandle};

fn lookup(map: MapHandle, key: &str) -> miette::Result<Option<String>> {
    get_value_for(map, key.as_bytes()).map_err(|e| miette::miette!("Lookup failed: {}", e))
}

pub fn run(key: Option<&str>) -> miette::Result<()> {
    let map = register_env().map_err(|e| miette::miette!("Failed to register environment: {}", e))?;

    let result = match key {
        Some(key) => lookup(map, key).and_then(|value| match value {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(miette::miette!("{} is not set", key)),
        }),
        None => {
            for (key, value) in collect_map(map) {
                println!("{}={}", key, value);
            }
            Ok(())
        }
    };

    release_map(map).map_err(|e| miette::miette!("Failed to release map: {}", e))?;
    result
}
