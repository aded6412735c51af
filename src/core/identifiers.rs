use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::CongruenceError;

/// Bidirectional lookup between mined integer ids and stable names (file
/// paths or developer emails).
///
/// Miners key their id maps with string-encoded integers. The ids must form
/// the dense range `0..n-1` so the map doubles as the canonical axis ordering
/// for every matrix built from that artifact; a gap, a non-numeric key or a
/// duplicated name indicates a corrupted artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, String>",
    into = "HashMap<String, String>"
)]
pub struct IdentifierMap {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

/// Parse a string-encoded id, insisting on the canonical decimal form the
/// miners emit (no leading zeros or signs).
pub(crate) fn parse_id(key: &str) -> Option<usize> {
    let id: usize = key.parse().ok()?;
    (id.to_string() == key).then_some(id)
}

impl IdentifierMap {
    /// Build from the raw `{"0": name, ...}` form emitted by the miners.
    pub fn from_raw(raw: HashMap<String, String>) -> Result<Self, CongruenceError> {
        let mut names: Vec<Option<String>> = vec![None; raw.len()];
        for (key, name) in raw {
            let id = parse_id(&key).ok_or_else(|| {
                CongruenceError::integrity(format!("invalid identifier key {key:?}"))
            })?;
            // Canonical keys are unique per id, so a slot is written at most once.
            match names.get_mut(id) {
                Some(slot) => *slot = Some(name),
                None => {
                    return Err(CongruenceError::integrity(format!(
                        "identifier id {id} is out of range, ids must cover 0..{}",
                        names.len()
                    )))
                }
            }
        }
        // n distinct in-range ids over n slots fill every slot.
        let names: Vec<String> = names.into_iter().flatten().collect();

        let mut ids = HashMap::with_capacity(names.len());
        for (id, name) in names.iter().enumerate() {
            if ids.insert(name.clone(), id).is_some() {
                return Err(CongruenceError::integrity(format!(
                    "name {name:?} is mapped by more than one identifier id"
                )));
            }
        }
        Ok(Self { names, ids })
    }

    /// Resolve an id to its name.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Resolve a name back to its id.
    pub fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// All names in id order, usable directly as matrix axis labels.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TryFrom<HashMap<String, String>> for IdentifierMap {
    type Error = CongruenceError;

    fn try_from(raw: HashMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<IdentifierMap> for HashMap<String, String> {
    fn from(map: IdentifierMap) -> Self {
        map.names
            .into_iter()
            .enumerate()
            .map(|(id, name)| (id.to_string(), name))
            .collect()
    }
}
