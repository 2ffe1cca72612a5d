//! Application identities.
//!
//! The server and the client resolve into different sets, so each gets its
//! own enum. The server never produces `selector`.

use std::fmt;
use std::str::FromStr;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name a known application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application type: {0:?}")]
pub struct ParseAppTypeError(pub String);

/// Application resolved on the server for an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerApp {
    #[default]
    Customer,
    Merchant,
    Admin,
}

impl ServerApp {
    /// All server applications, in declaration order.
    pub const ALL: [ServerApp; 3] = [ServerApp::Customer, ServerApp::Merchant, ServerApp::Admin];

    pub const fn as_str(self) -> &'static str {
        match self {
            ServerApp::Customer => "customer",
            ServerApp::Merchant => "merchant",
            ServerApp::Admin => "admin",
        }
    }

    /// Value for the `X-App-Type` response header.
    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

impl fmt::Display for ServerApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerApp {
    type Err = ParseAppTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(ServerApp::Customer),
            "merchant" => Ok(ServerApp::Merchant),
            "admin" => Ok(ServerApp::Admin),
            other => Err(ParseAppTypeError(other.to_string())),
        }
    }
}

/// Application resolved on the client for a page load or navigation.
///
/// `Selector` means no application is chosen yet and the chooser screen
/// should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientApp {
    Customer,
    Merchant,
    Admin,
    Selector,
}

impl ClientApp {
    pub const fn as_str(self) -> &'static str {
        match self {
            ClientApp::Customer => "customer",
            ClientApp::Merchant => "merchant",
            ClientApp::Admin => "admin",
            ClientApp::Selector => "selector",
        }
    }
}

impl From<ServerApp> for ClientApp {
    fn from(app: ServerApp) -> Self {
        match app {
            ServerApp::Customer => ClientApp::Customer,
            ServerApp::Merchant => ClientApp::Merchant,
            ServerApp::Admin => ClientApp::Admin,
        }
    }
}

impl fmt::Display for ClientApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientApp {
    type Err = ParseAppTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selector" => Ok(ClientApp::Selector),
            other => other.parse::<ServerApp>().map(ClientApp::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_app_names() {
        for app in ServerApp::ALL {
            assert_eq!(app.as_str().parse::<ServerApp>().unwrap(), app);
            assert_eq!(app.header_value(), app.as_str());
        }
        assert_eq!(ServerApp::default(), ServerApp::Customer);
    }

    #[test]
    fn test_server_app_rejects_selector() {
        let err = "selector".parse::<ServerApp>().unwrap_err();
        assert_eq!(err, ParseAppTypeError("selector".into()));
        assert!("Admin".parse::<ServerApp>().is_err());
    }

    #[test]
    fn test_client_app_parse() {
        assert_eq!("selector".parse::<ClientApp>().unwrap(), ClientApp::Selector);
        assert_eq!("merchant".parse::<ClientApp>().unwrap(), ClientApp::Merchant);
        assert!("".parse::<ClientApp>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ServerApp::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&ClientApp::Selector).unwrap(), "\"selector\"");
        let app: ServerApp = serde_json::from_str("\"merchant\"").unwrap();
        assert_eq!(app, ServerApp::Merchant);
    }
}
