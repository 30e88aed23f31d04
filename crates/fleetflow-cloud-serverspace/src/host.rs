//! Regional endpoint routing
//!
//! Serverspace API keys start with a two-character prefix naming the region
//! that issued them. The prefix selects the API host when none is given.

use crate::error::{Result, ServerspaceError};

/// API key prefix → regional API host
pub const REGION_HOSTS: &[(&str, &str)] = &[
    ("02", "https://api.serverspace.by"),
    ("04", "https://api.serverspace.io"),
    ("06", "https://api.serverspace.ru"),
    ("07", "https://api.lincore.kz"),
    ("08", "https://api.serverspace.us"),
    ("09", "https://api.serverspace.com.tr"),
    ("0a", "https://api.serverspace.in"),
    ("14", "https://api.serverspace.kz"),
    ("21", "https://api.serverspace.ca"),
    ("22", "https://api.serverspace.com.br"),
    ("23", "https://api.falconcloud.ae"),
];

/// Pick the API host for a key
pub fn resolve_host(api_key: &str) -> Result<&'static str> {
    let prefix = api_key.get(..2).ok_or(ServerspaceError::WrongKeyFormat)?;
    REGION_HOSTS
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, host)| *host)
        .ok_or(ServerspaceError::WrongKeyFormat)
}
