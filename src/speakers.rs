/*!
 * Speaker resolution against the configured roster.
 *
 * The roster usually lags behind the script, so a missing id is not an
 * error: the dialogue is kept without attribution and the id is counted so
 * maintainers can extend the roster.
 */

use std::collections::{BTreeMap, BTreeSet};

use crate::app_config::SpeakerInfo;

/// Resolves character ids and remembers which roster entries were used
#[derive(Debug, Clone)]
pub struct SpeakerResolver<'r> {
    roster: &'r BTreeMap<String, SpeakerInfo>,
    referenced: BTreeSet<String>,
    unresolved: BTreeMap<String, usize>,
}

impl<'r> SpeakerResolver<'r> {
    pub fn new(roster: &'r BTreeMap<String, SpeakerInfo>) -> Self {
        Self {
            roster,
            referenced: BTreeSet::new(),
            unresolved: BTreeMap::new(),
        }
    }

    /// Look up a (normalized) id; a hit marks it referenced
    pub fn resolve(&mut self, id: &str) -> Option<&'r SpeakerInfo> {
        match self.roster.get(id) {
            Some(info) => {
                self.referenced.insert(id.to_string());
                Some(info)
            }
            None => {
                *self.unresolved.entry(id.to_string()).or_default() += 1;
                None
            }
        }
    }

    /// Roster trimmed to the ids that were resolved at least once
    pub fn referenced(&self) -> BTreeMap<String, SpeakerInfo> {
        self.referenced
            .iter()
            .filter_map(|id| Some((id.clone(), self.roster.get(id)?.clone())))
            .collect()
    }

    /// Ids that were looked up but are missing from the roster, with counts
    pub fn unresolved(&self) -> &BTreeMap<String, usize> {
        &self.unresolved
    }
}
