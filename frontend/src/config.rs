//! Build-time configuration of the web client.
//!
//! The backend address is baked in from `ACO_BOOK_SERVER_ADDRESS` when the
//! crate is compiled (e.g. `ACO_BOOK_SERVER_ADDRESS=https://api.example.com/ trunk build`).

use common::config::{ClientConfig, DEFAULT_SERVER_ADDRESS};

const SERVER_ADDRESS: Option<&str> = option_env!("ACO_BOOK_SERVER_ADDRESS");

/// The client configuration, falling back to the default address when the
/// configured one does not parse.
pub fn client_config() -> ClientConfig {
    let address = SERVER_ADDRESS.unwrap_or(DEFAULT_SERVER_ADDRESS);
    match ClientConfig::new(address) {
        Ok(config) => config,
        Err(err) => {
            gloo_console::error!(format!(
                "{err}; using {DEFAULT_SERVER_ADDRESS} instead"
            ));
            ClientConfig::default()
        }
    }
}
