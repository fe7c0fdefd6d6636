//! Fixed categories used to name services and data directories.

use std::fmt;

/// A systemd-managed daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceKind {
    Node,
    Baker,
    Accuser,
    Dal,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Node,
        ServiceKind::Baker,
        ServiceKind::Accuser,
        ServiceKind::Dal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Node => "node",
            ServiceKind::Baker => "baker",
            ServiceKind::Accuser => "accuser",
            ServiceKind::Dal => "dal",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-network data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataKind {
    Node,
    Client,
    Dal,
}

impl DataKind {
    pub const ALL: [DataKind; 3] = [DataKind::Node, DataKind::Client, DataKind::Dal];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Node => "node",
            DataKind::Client => "client",
            DataKind::Dal => "dal",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
