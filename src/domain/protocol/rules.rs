use serde::{Deserialize, Serialize};

/// Network the ledger is following
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Parse a network name as found in configuration
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mainnet" => Some(Network::Mainnet),
            "testnet" => Some(Network::Testnet),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

/// Block heights at which a rule is in force
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Always,
    Never,
    /// `height >= h`
    From(u64),
    /// `height > h`
    After(u64),
    /// `start <= height < end`
    Window { start: u64, end: u64 },
}

impl Activation {
    pub fn is_active(&self, height: u64) -> bool {
        match *self {
            Activation::Always => true,
            Activation::Never => false,
            Activation::From(h) => height >= h,
            Activation::After(h) => height > h,
            Activation::Window { start, end } => height >= start && height < end,
        }
    }
}

/// Historical protocol changes that affect dividends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolRule {
    /// 24/32-byte payload carrying an explicit dividend asset
    CurrentWireLayout,
    /// Escrowed balances receive dividends; before this they were skipped
    EscrowedHoldersPaid,
    /// The paying address does not pay itself
    SourceExcludedFromPayout,
    /// Holders of the fee asset may be paid a dividend
    FeeAssetHolderDividends,
    /// Only the current issuer may pay dividends on an asset
    IssuerOnlyDividends,
    /// Dividends cost a fee in the fee asset
    DividendFee,
    /// Dividends may be deferred by an activation delta
    ScheduledDividends,
}

/// One row of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolChange {
    pub rule: ProtocolRule,
    pub mainnet: Activation,
    pub testnet: Activation,
}

impl ProtocolChange {
    const fn new(rule: ProtocolRule, mainnet: Activation, testnet: Activation) -> Self {
        Self {
            rule,
            mainnet,
            testnet,
        }
    }

    fn activation(&self, network: Network) -> Activation {
        match network {
            Network::Mainnet => self.mainnet,
            Network::Testnet => self.testnet,
        }
    }
}

/// Protocol history, oldest change first
pub const PROTOCOL_CHANGES: [ProtocolChange; 7] = [
    ProtocolChange::new(
        ProtocolRule::CurrentWireLayout,
        Activation::After(288_150),
        Activation::Always,
    ),
    ProtocolChange::new(
        ProtocolRule::EscrowedHoldersPaid,
        Activation::From(294_500),
        Activation::Always,
    ),
    ProtocolChange::new(
        ProtocolRule::SourceExcludedFromPayout,
        Activation::From(296_000),
        Activation::Always,
    ),
    ProtocolChange::new(
        ProtocolRule::FeeAssetHolderDividends,
        Activation::Window {
            start: 317_500,
            end: 320_000,
        },
        Activation::Never,
    ),
    ProtocolChange::new(
        ProtocolRule::IssuerOnlyDividends,
        Activation::From(320_000),
        Activation::Always,
    ),
    ProtocolChange::new(
        ProtocolRule::DividendFee,
        Activation::From(330_000),
        Activation::Always,
    ),
    ProtocolChange::new(
        ProtocolRule::ScheduledDividends,
        Activation::Never,
        Activation::Always,
    ),
];

/// Network plus the rule table every validation and codec call is evaluated against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolParams {
    network: Network,
    changes: Vec<ProtocolChange>,
}

impl ProtocolParams {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            changes: PROTOCOL_CHANGES.to_vec(),
        }
    }

    pub fn mainnet() -> Self {
        Self::for_network(Network::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::for_network(Network::Testnet)
    }

    /// Override when scheduled dividends switch on for the configured network
    pub fn with_scheduled_dividends(mut self, activation: Activation) -> Self {
        let network = self.network;
        for change in self
            .changes
            .iter_mut()
            .filter(|change| change.rule == ProtocolRule::ScheduledDividends)
        {
            match network {
                Network::Mainnet => change.mainnet = activation,
                Network::Testnet => change.testnet = activation,
            }
        }
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn is_testnet(&self) -> bool {
        self.network == Network::Testnet
    }

    /// Whether `rule` is in force at `height` on this network
    pub fn is_active(&self, rule: ProtocolRule, height: u64) -> bool {
        self.changes
            .iter()
            .find(|change| change.rule == rule)
            .map(|change| change.activation(self.network).is_active(height))
            .unwrap_or(false)
    }
}
