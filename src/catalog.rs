//! Asset catalog.
//!
//! An explicitly constructed, immutable, ordered list of assets. The
//! iteration order doubles as the ranking tie-break order, so catalogs
//! never reorder after construction. The built-in table covers the top
//! 50 coins by market cap with hand-maintained volatility/drift figures;
//! user catalogs load from TOML `[[asset]]` tables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use tracing::warn;

use crate::types::{AssetParameters, CompassError};

/// Reference parameters: (name, spot price, daily volatility, daily drift).
const BUILTIN: &[(&str, f64, f64, f64)] = &[
    // Top 10 by market cap
    ("Bitcoin", 45_000.0, 0.03, 0.0012),
    ("Ethereum", 2500.0, 0.04, 0.0018),
    ("Binance Coin", 320.0, 0.045, 0.0015),
    ("Solana", 100.0, 0.06, 0.0025),
    ("XRP", 0.60, 0.055, 0.0008),
    ("Cardano", 0.50, 0.05, 0.0010),
    ("Avalanche", 38.0, 0.055, 0.0020),
    ("Dogecoin", 0.08, 0.07, 0.0005),
    ("Polkadot", 7.5, 0.05, 0.0012),
    ("Polygon", 0.85, 0.06, 0.0022),
    // 11-20
    ("Chainlink", 15.0, 0.055, 0.0018),
    ("Litecoin", 75.0, 0.045, 0.0010),
    ("Uniswap", 6.5, 0.06, 0.0020),
    ("Stellar", 0.12, 0.05, 0.0008),
    ("VeChain", 0.025, 0.065, 0.0015),
    ("Cosmos", 10.0, 0.055, 0.0016),
    ("Algorand", 0.18, 0.06, 0.0018),
    ("Tron", 0.10, 0.05, 0.0010),
    ("Monero", 160.0, 0.045, 0.0012),
    ("EOS", 0.70, 0.055, 0.0008),
    // 21-30
    ("Filecoin", 5.5, 0.07, 0.0022),
    ("Hedera", 0.08, 0.06, 0.0015),
    ("Aptos", 8.0, 0.08, 0.0030),
    ("Near Protocol", 3.5, 0.065, 0.0020),
    ("Arbitrum", 1.2, 0.07, 0.0025),
    ("Optimism", 2.5, 0.07, 0.0024),
    ("Sui", 1.5, 0.09, 0.0035),
    ("Injective", 25.0, 0.08, 0.0028),
    ("Render", 7.0, 0.075, 0.0026),
    ("The Graph", 0.15, 0.065, 0.0018),
    // 31-40
    ("Kaspa", 0.12, 0.10, 0.0040),
    ("Immutable", 2.0, 0.08, 0.0027),
    ("Stacks", 1.5, 0.075, 0.0023),
    ("Sei", 0.50, 0.09, 0.0032),
    ("Celestia", 8.0, 0.085, 0.0030),
    ("Fantom", 0.45, 0.07, 0.0020),
    ("Theta", 1.2, 0.065, 0.0016),
    ("Axie Infinity", 7.0, 0.08, 0.0022),
    ("Flow", 0.80, 0.07, 0.0018),
    ("Sandbox", 0.50, 0.075, 0.0021),
    // 41-50
    ("Mina", 0.70, 0.07, 0.0019),
    ("Aave", 95.0, 0.06, 0.0020),
    ("Maker", 1500.0, 0.055, 0.0016),
    ("Quant", 110.0, 0.065, 0.0021),
    ("Lido DAO", 2.2, 0.07, 0.0023),
    ("Pepe", 0.000001, 0.12, 0.0045),
    ("Bonk", 0.00001, 0.11, 0.0042),
    ("Floki", 0.00005, 0.10, 0.0038),
    ("Shiba Inu", 0.00001, 0.09, 0.0035),
    ("Worldcoin", 3.5, 0.085, 0.0029),
];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable, ordered asset list.
#[derive(Debug, Clone)]
pub struct Catalog {
    assets: Vec<AssetParameters>,
}

/// On-disk shape of a user catalog: a list of `[[asset]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    asset: Vec<AssetParameters>,
}

impl Catalog {
    /// The built-in 50-asset reference table.
    pub fn builtin() -> Self {
        let assets = BUILTIN
            .iter()
            .map(|&(name, price, vol, drift)| AssetParameters::new(name, price, vol, drift))
            .collect();
        Self { assets }
    }

    /// Build a catalog from explicit assets, validating every entry.
    pub fn from_assets(assets: Vec<AssetParameters>) -> Result<Self, CompassError> {
        if assets.is_empty() {
            return Err(CompassError::Catalog("catalog contains no assets".to_string()));
        }
        for asset in &assets {
            asset.validate()?;
        }
        Ok(Self { assets })
    }

    /// Load a user catalog from a TOML file of `[[asset]]` tables.
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {path}"))?;
        let file: CatalogFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse catalog file: {path}"))?;
        let catalog = Self::from_assets(file.asset)
            .with_context(|| format!("Invalid catalog file: {path}"))?;
        Ok(catalog)
    }

    /// Apply live quotes over the catalog prices. Unknown names and
    /// non-positive quotes are ignored with a warning, leaving the
    /// catalog default in place.
    pub fn with_price_overrides(&self, overrides: &HashMap<String, f64>) -> Self {
        let mut assets = self.assets.clone();
        let mut applied = 0usize;

        for (name, price) in overrides {
            if !price.is_finite() || *price <= 0.0 {
                warn!(asset = %name, price, "Ignoring invalid price override");
                continue;
            }
            match assets.iter_mut().find(|a| &a.name == name) {
                Some(asset) => {
                    asset.initial_price = *price;
                    applied += 1;
                }
                None => warn!(asset = %name, "Price override for unknown asset ignored"),
            }
        }

        if applied > 0 {
            tracing::debug!(applied, "Applied price overrides");
        }
        Self { assets }
    }

    pub fn assets(&self) -> &[AssetParameters] {
        &self.assets
    }

    pub fn get(&self, name: &str) -> Option<&AssetParameters> {
        self.assets.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetParameters> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_size() {
        assert_eq!(Catalog::builtin().len(), 50);
    }

    #[test]
    fn test_builtin_order_is_stable() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.assets()[0].name, "Bitcoin");
        assert_eq!(catalog.assets()[49].name, "Worldcoin");
    }

    #[test]
    fn test_builtin_all_valid() {
        for asset in Catalog::builtin().iter() {
            assert!(asset.validate().is_ok(), "invalid builtin asset: {asset}");
        }
    }

    #[test]
    fn test_get_known_and_unknown() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get("Kaspa").unwrap().daily_volatility, 0.10);
        assert!(catalog.get("Dogwifhat").is_none());
    }

    #[test]
    fn test_from_assets_rejects_empty() {
        assert!(Catalog::from_assets(Vec::new()).is_err());
    }

    #[test]
    fn test_from_assets_rejects_invalid_entry() {
        let assets = vec![
            AssetParameters::new("Good", 10.0, 0.05, 0.001),
            AssetParameters::new("Bad", -1.0, 0.05, 0.001),
        ];
        assert!(Catalog::from_assets(assets).is_err());
    }

    #[test]
    fn test_price_override_applied() {
        let catalog = Catalog::builtin();
        let mut overrides = HashMap::new();
        overrides.insert("Bitcoin".to_string(), 52_000.0);

        let updated = catalog.with_price_overrides(&overrides);
        assert_eq!(updated.get("Bitcoin").unwrap().initial_price, 52_000.0);
        // The source catalog is untouched
        assert_eq!(catalog.get("Bitcoin").unwrap().initial_price, 45_000.0);
        // Other parameters survive the override
        assert_eq!(updated.get("Bitcoin").unwrap().daily_volatility, 0.03);
    }

    #[test]
    fn test_price_override_unknown_name_ignored() {
        let catalog = Catalog::builtin();
        let mut overrides = HashMap::new();
        overrides.insert("Dogwifhat".to_string(), 3.0);

        let updated = catalog.with_price_overrides(&overrides);
        assert_eq!(updated.len(), 50);
        assert!(updated.get("Dogwifhat").is_none());
    }

    #[test]
    fn test_price_override_invalid_quote_ignored() {
        let catalog = Catalog::builtin();
        let mut overrides = HashMap::new();
        overrides.insert("Bitcoin".to_string(), -5.0);
        overrides.insert("Ethereum".to_string(), f64::NAN);

        let updated = catalog.with_price_overrides(&overrides);
        assert_eq!(updated.get("Bitcoin").unwrap().initial_price, 45_000.0);
        assert_eq!(updated.get("Ethereum").unwrap().initial_price, 2500.0);
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            [[asset]]
            name = "Bitcoin"
            initial_price = 45000.0
            daily_volatility = 0.03
            daily_drift = 0.0012

            [[asset]]
            name = "Ethereum"
            initial_price = 2500.0
            daily_volatility = 0.04
            daily_drift = 0.0018
        "#;
        let file: CatalogFile = toml::from_str(toml_str).unwrap();
        let catalog = Catalog::from_assets(file.asset).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.assets()[1].name, "Ethereum");
    }

    #[test]
    fn test_from_toml_file_missing() {
        assert!(Catalog::from_toml_file("/tmp/compass_no_such_catalog_974.toml").is_err());
    }
}
