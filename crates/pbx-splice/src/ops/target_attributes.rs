//! Ensure a target's attribute body and merge settings into it

use indexmap::IndexMap;

use pbx_document::{ObjectId, ProjectDocument};

use crate::anchor::{self, AnchorError};
use crate::ops::{EditResult, SpliceError};

/// Three-level idempotent cascade:
/// (a) no `TargetAttributes` dictionary → create one, inside the project
///     object's `attributes` dictionary, holding the target body with all
///     settings;
/// (b) dictionary exists but the target has no body → insert one;
/// (c) body exists → splice in only the missing keys, leaving existing
///     values untouched.
pub(crate) fn apply(
    document: &mut ProjectDocument,
    target: &ObjectId,
    settings: &IndexMap<String, String>,
) -> Result<EditResult, SpliceError> {
    let attributes_body = match anchor::target_attributes_body(document) {
        Ok(range) => range,
        Err(AnchorError::NotFound(_)) => {
            let attributes = anchor::project_attributes_body(document)?;
            let block = format!(
                "\n\t\t\t\tTargetAttributes = {{{}\n\t\t\t\t}};",
                target_entry(target, settings)
            );
            document.splice(attributes.start + 1, &block)?;
            return Ok(EditResult::applied(None));
        }
        Err(e) => return Err(e.into()),
    };

    match anchor::key_body(document, attributes_body.clone(), &target.to_string()) {
        Ok(body) => {
            let slice = &document.as_str()[body.clone()];
            let missing: Vec<(String, String)> = settings
                .iter()
                .filter(|(key, _)| !body_has_key(slice, key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            if missing.is_empty() {
                return Ok(EditResult::already_present());
            }
            let mut block = String::new();
            for (key, value) in &missing {
                block.push_str(&format!("\n\t\t\t\t\t\t{key} = {value};"));
            }
            document.splice(body.start + 1, &block)?;
            Ok(EditResult::applied(None))
        }
        Err(AnchorError::NotFound(_)) => {
            document.splice(attributes_body.start + 1, &target_entry(target, settings))?;
            Ok(EditResult::applied(None))
        }
        Err(e) => Err(e.into()),
    }
}

fn target_entry(target: &ObjectId, settings: &IndexMap<String, String>) -> String {
    let mut entry = format!("\n\t\t\t\t\t{target} = {{");
    for (key, value) in settings {
        entry.push_str(&format!("\n\t\t\t\t\t\t{key} = {value};"));
    }
    entry.push_str("\n\t\t\t\t\t};");
    entry
}

// Presence of `key = ` with a clean left boundary, so `DevelopmentTeam`
// never matches inside a longer key.
fn body_has_key(body: &str, key: &str) -> bool {
    let needle = format!("{key} = ");
    let mut from = 0;
    while let Some(rel) = body[from..].find(&needle) {
        let at = from + rel;
        let clean = at == 0 || {
            let prev = body.as_bytes()[at - 1];
            !(prev.is_ascii_alphanumeric() || prev == b'_' || prev == b'.')
        };
        if clean {
            return true;
        }
        from = at + 1;
    }
    false
}
