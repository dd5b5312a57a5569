//! Per-run operator session state.

/// State that lives for one CLI run and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Ethereum address shown after marketplace setup.
    eth_address: Option<String>,
}

impl Session {
    pub fn eth_address(&self) -> Option<&str> {
        self.eth_address.as_deref()
    }

    pub fn set_eth_address(&mut self, address: impl Into<String>) {
        let address = address.into();
        let trimmed = address.trim();
        self.eth_address = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
}
