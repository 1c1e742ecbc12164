//! Legacy persisted-state migration.
//!
//! Runs once over the raw `"syntellite:variables:v1"` blob before the store
//! becomes usable. Operates on raw JSON values rather than decoded
//! definitions: the rules depend on distinctions (a missing vs. an
//! explicitly `false` marker) that typed defaults would erase.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::warn;

use super::model::{LEGACY_DEFAULTS, Variable};

/// Applies the legacy migration rules and decodes the retained entries.
///
/// Returns the decoded definitions and whether anything was dropped — the
/// caller only rewrites the persisted blob when it did. Idempotent:
/// migrating the serialization of a migrated map changes nothing.
///
/// Rules, per stored entry:
/// - an entry that is not a JSON object is dropped;
/// - a retired built-in name (`Meeting_Link`, `Offer_Letter_Link`) is
///   dropped unless the user repurposed it as a candidate field;
/// - a candidate entry whose `autoImported` is anything but literal `false`
///   is dropped (an older auto-import marking scheme is no longer trusted);
/// - a retained candidate entry without a `lists` set gets an empty one
///   (via decoding defaults; this alone does not count as a change);
/// - an entry the typed model cannot decode is dropped.
pub(crate) fn migrate(saved: Map<String, Value>) -> (BTreeMap<String, Variable>, bool) {
    let mut retained = BTreeMap::new();
    let mut changed = false;

    for (name, entry) in saved {
        let Value::Object(fields) = &entry else {
            warn!("dropping malformed variable entry {name}");
            changed = true;
            continue;
        };
        let kind = fields.get("type").and_then(Value::as_str);

        if LEGACY_DEFAULTS.contains(&name.as_str()) && kind != Some("candidate") {
            changed = true;
            continue;
        }

        if kind == Some("candidate") && fields.get("autoImported") != Some(&Value::Bool(false)) {
            changed = true;
            continue;
        }

        match serde_json::from_value::<Variable>(entry) {
            Ok(variable) => {
                retained.insert(name, variable);
            }
            Err(error) => {
                warn!("dropping undecodable variable entry {name}: {error}");
                changed = true;
            }
        }
    }

    (retained, changed)
}
