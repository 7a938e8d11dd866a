//! Service tokens and `config firewall service custom` blocks.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Protocols that get a synthesized custom service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Protocol {
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
}

impl Protocol {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("tcp") {
            Some(Protocol::Tcp)
        } else if value.eq_ignore_ascii_case("udp") {
            Some(Protocol::Udp)
        } else {
            None
        }
    }

    /// Field that carries the port for this protocol.
    pub fn portrange_field(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp-portrange",
            Protocol::Udp => "udp-portrange",
        }
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
        }
    }
}

/// One resolved entry of a row's service list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceRef {
    /// `PROTO/PORT` token backed by a synthesized custom service.
    Custom { protocol: Protocol, port: String },
    /// Name expected to already exist on the firewall.
    Opaque { name: String },
}

impl ServiceRef {
    /// Parse one trimmed token. Anything that is not `tcp|udp` `/` digits is opaque.
    pub fn parse(token: &str) -> Self {
        let custom = token.split_once('/').and_then(|(proto, port)| {
            let protocol = Protocol::parse(proto)?;
            let numeric = !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit());
            numeric.then(|| (protocol, port.to_string()))
        });
        match custom {
            Some((protocol, port)) => ServiceRef::Custom { protocol, port },
            None => ServiceRef::Opaque {
                name: token.to_string(),
            },
        }
    }

    /// Name written into the policy's `service` list.
    pub fn reference(&self) -> String {
        match self {
            ServiceRef::Custom { protocol, port } => service_name(*protocol, port),
            ServiceRef::Opaque { name } => name.clone(),
        }
    }
}

/// Split a service cell on `;` and `,`, dropping blanks.
pub fn split_services(field: &str) -> Vec<&str> {
    field
        .split([';', ','])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Synthesized object name, e.g. `TCP-443`.
pub fn service_name(protocol: Protocol, port: &str) -> String {
    format!("{protocol}-{port}")
}

/// A synthesized custom service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceObject {
    pub name: String,
    pub protocol: Protocol,
    pub port: String,
}

impl ServiceObject {
    pub fn new(protocol: Protocol, port: &str) -> Self {
        Self {
            name: service_name(protocol, port),
            protocol,
            port: port.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "config firewall service custom\n    edit \"{}\"\n        set protocol {}\n        set {} {}\n    next\nend\n",
            self.name,
            self.protocol,
            self.protocol.portrange_field(),
            self.port
        )
    }
}
