//! Enable a named capability for a build target

use indexmap::IndexMap;

use pbx_document::{ObjectId, ProjectDocument};

use crate::anchor::{self, AnchorError};
use crate::ops::{target_attributes, EditResult, SpliceError};

/// Ensures the target's attribute body exists (a reduced form of the
/// target-attributes cascade), then ensures the `SystemCapabilities`
/// sub-dictionary exists, then splices `capability = { enabled = 1; };`.
///
/// The presence check is scoped to the target's own `SystemCapabilities`
/// body: a capability mentioned elsewhere in the document (another target,
/// a comment) does not count as present.
pub(crate) fn apply(
    document: &mut ProjectDocument,
    target: &ObjectId,
    capability: &str,
) -> Result<EditResult, SpliceError> {
    target_attributes::apply(document, target, &IndexMap::new())?;

    // Relocate after the ensure step; offsets may have shifted.
    let body = anchor::target_body(document, target)?;

    match anchor::key_body(document, body.clone(), "SystemCapabilities") {
        Ok(capabilities) => {
            if document.as_str()[capabilities.clone()].contains(capability) {
                return Ok(EditResult::already_present());
            }
            document.splice(capabilities.start + 1, &capability_entry(capability))?;
            Ok(EditResult::applied(None))
        }
        Err(AnchorError::NotFound(_)) => {
            let block = format!(
                "\n\t\t\t\t\t\tSystemCapabilities = {{{}\n\t\t\t\t\t\t}};",
                capability_entry(capability)
            );
            document.splice(body.start + 1, &block)?;
            Ok(EditResult::applied(None))
        }
        Err(e) => Err(e.into()),
    }
}

fn capability_entry(capability: &str) -> String {
    format!(
        "\n\t\t\t\t\t\t\t{capability} = {{\n\
         \t\t\t\t\t\t\t\tenabled = 1;\n\
         \t\t\t\t\t\t\t}};"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Outcome;

    const TARGET: &str = "CCCCCCCCCCCCCCCCCCCCCCC1";
    const OTHER: &str = "CCCCCCCCCCCCCCCCCCCCCCC2";

    fn target_id() -> ObjectId {
        TARGET.parse().unwrap()
    }

    fn bare_project() -> ProjectDocument {
        ProjectDocument::new(
            "\t\tBBBBBBBBBBBBBBBBBBBBBBB1 /* Project object */ = {\n\
             \t\t\tisa = PBXProject;\n\
             \t\t\tattributes = {\n\
             \t\t\t\tLastUpgradeCheck = 1500;\n\
             \t\t\t};\n\
             \t\t};\n"
                .to_string(),
        )
    }

    #[test]
    fn builds_full_cascade_from_bare_project() {
        let mut doc = bare_project();
        let result = apply(&mut doc, &target_id(), "com.apple.CloudKit").unwrap();

        assert_eq!(result.outcome, Outcome::Applied);
        assert!(doc.contains("SystemCapabilities = {"));
        assert!(doc.contains("com.apple.CloudKit = {"));
        assert!(doc.contains("enabled = 1;"));
        assert!(doc.is_brace_balanced());
    }

    #[test]
    fn second_capability_joins_existing_dictionary() {
        let mut doc = bare_project();
        apply(&mut doc, &target_id(), "com.apple.iCloud").unwrap();
        apply(&mut doc, &target_id(), "com.apple.CloudKit").unwrap();

        assert_eq!(doc.as_str().matches("SystemCapabilities = {").count(), 1);
        assert!(doc.contains("com.apple.iCloud = {"));
        assert!(doc.contains("com.apple.CloudKit = {"));
        assert!(doc.is_brace_balanced());
    }

    #[test]
    fn repeated_capability_is_noop() {
        let mut doc = bare_project();
        apply(&mut doc, &target_id(), "com.apple.CloudKit").unwrap();

        let before = doc.clone();
        let result = apply(&mut doc, &target_id(), "com.apple.CloudKit").unwrap();
        assert_eq!(result.outcome, Outcome::AlreadyPresent);
        assert_eq!(doc, before);
    }

    #[test]
    fn capability_on_another_target_does_not_count() {
        let mut doc = ProjectDocument::new(format!(
            "\t\tBBBBBBBBBBBBBBBBBBBBBBB1 /* Project object */ = {{\n\
             \t\t\tisa = PBXProject;\n\
             \t\t\tattributes = {{\n\
             \t\t\t\tTargetAttributes = {{\n\
             \t\t\t\t\t{OTHER} = {{\n\
             \t\t\t\t\t\tSystemCapabilities = {{\n\
             \t\t\t\t\t\t\tcom.apple.CloudKit = {{\n\
             \t\t\t\t\t\t\t\tenabled = 1;\n\
             \t\t\t\t\t\t\t}};\n\
             \t\t\t\t\t\t}};\n\
             \t\t\t\t\t}};\n\
             \t\t\t\t}};\n\
             \t\t\t}};\n\
             \t\t}};\n"
        ));
        let result = apply(&mut doc, &target_id(), "com.apple.CloudKit").unwrap();

        // Scoped check: this target still gets its own entry
        assert_eq!(result.outcome, Outcome::Applied);
        assert_eq!(doc.as_str().matches("com.apple.CloudKit = {").count(), 2);
        assert!(doc.is_brace_balanced());
    }
}
