//! Browser client script

const CLIENT_SCRIPT: &str = include_str!("../assets/autoreload.js");

/// Client script preconfigured for `port`
pub fn client_script(port: u16) -> String {
    format!("window.autoreloadPort = {};\n{}", port, CLIENT_SCRIPT)
}
