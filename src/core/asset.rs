//! Asset - units, value bags and CIP-25 token metadata

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::consts::ledger::LOVELACE;

/// Hex of the UTF-8 bytes of `text`, the on-chain form of an asset name.
pub fn from_text(text: &str) -> String {
    hex::encode(text.as_bytes())
}

/// `policy id ‖ hex(asset name)`, or `lovelace` for ada.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unit(String);

impl Unit {
    pub fn new(policy_id: &str, asset_name: &str) -> Self {
        Unit(format!("{}{}", policy_id, from_text(asset_name)))
    }

    pub fn lovelace() -> Self {
        Unit(LOVELACE.to_string())
    }

    pub fn is_lovelace(&self) -> bool {
        self.0 == LOVELACE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn policy_id(&self) -> Option<&str> {
        if self.is_lovelace() {
            None
        } else {
            self.0.get(..56)
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Unit {
    fn from(value: &str) -> Self {
        Unit(value.to_string())
    }
}

/// Signed quantities per unit. Minting uses positive, burning negative amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assets(BTreeMap<Unit, i128>);

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(unit: Unit, quantity: i128) -> Self {
        let mut assets = Self::new();
        assets.insert(unit, quantity);
        assets
    }

    pub fn lovelace(quantity: i128) -> Self {
        Self::single(Unit::lovelace(), quantity)
    }

    pub fn with(mut self, unit: Unit, quantity: i128) -> Self {
        self.insert(unit, quantity);
        self
    }

    pub fn insert(&mut self, unit: Unit, quantity: i128) {
        if quantity == 0 {
            self.0.remove(&unit);
        } else {
            self.0.insert(unit, quantity);
        }
    }

    pub fn get(&self, unit: &Unit) -> i128 {
        self.0.get(unit).copied().unwrap_or(0)
    }

    pub fn lovelace_amount(&self) -> i128 {
        self.get(&Unit::lovelace())
    }

    pub fn add(&mut self, other: &Assets) {
        for (unit, quantity) in &other.0 {
            self.insert(unit.clone(), self.get(unit) + quantity);
        }
    }

    pub fn sub(&mut self, other: &Assets) {
        for (unit, quantity) in &other.0 {
            self.insert(unit.clone(), self.get(unit) - quantity);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Unit, &i128)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_negative(&self) -> bool {
        self.0.values().any(|q| *q < 0)
    }

    /// Distinct policy ids touched, excluding ada.
    pub fn policies(&self) -> Vec<String> {
        let mut policies: Vec<String> = self.0.keys().filter_map(|u| u.policy_id().map(str::to_string)).collect();
        policies.dedup();
        policies
    }
}

impl FromIterator<(Unit, i128)> for Assets {
    fn from_iter<I: IntoIterator<Item = (Unit, i128)>>(iter: I) -> Self {
        let mut assets = Assets::new();
        for (unit, quantity) in iter {
            assets.insert(unit.clone(), assets.get(&unit) + quantity);
        }
        assets
    }
}

/// CIP-25 v1 record: `{ <policy>: { <name>: { name, image } } }`, attached under label 721.
pub fn cip25_metadata(policy_id: &str, asset_name: &str, image: &str) -> Value {
    let mut assets = Map::new();
    assets.insert(asset_name.to_string(), json!({"name": asset_name, "image": image}));
    let mut policies = Map::new();
    policies.insert(policy_id.to_string(), Value::Object(assets));
    Value::Object(policies)
}
