//! Environment helpers.

use crate::error::BridgeError;
use crate::handle::MapHandle;
use crate::map::{register_map, StringMap};
use std::env;

/// The process environment as an ordered map. Variables whose name or value
/// is not valid Unicode are skipped.
pub fn env_map() -> StringMap {
    env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Register the current environment as a map handle.
pub fn register_env() -> Result<MapHandle, BridgeError> {
    register_map(env_map())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{get_value_for, release_map};

    #[test]
    fn test_env_map_matches_process_environment() {
        let map = env_map();
        for (key, value) in env::vars() {
            assert_eq!(map.get(&key), Some(&value));
        }
    }

    #[test]
    fn test_register_env() {
        let handle = register_env().unwrap();
        if let Ok(path) = env::var("PATH") {
            assert_eq!(get_value_for(handle, b"PATH").unwrap(), Some(path));
        }
        release_map(handle).unwrap();
    }
}
