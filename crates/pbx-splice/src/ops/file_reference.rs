//! Add a file reference and its group-child entry

use pbx_document::{IdentifierPool, ProjectDocument, SectionKind};

use crate::anchor;
use crate::ops::{EditResult, SpliceError};

/// Precondition: any existing reference to `file_name` makes this a no-op.
/// Otherwise two identifiers are issued - one for the file-reference object
/// spliced at the head of its section, one reserved for the build-file
/// wrapper a later build-phase edit would reference - and the new object is
/// linked into the named group's ordered children list.
pub(crate) fn apply(
    document: &mut ProjectDocument,
    pool: &mut IdentifierPool,
    file_name: &str,
    file_type: &str,
    group: &str,
) -> Result<EditResult, SpliceError> {
    if document.contains(file_name) {
        return Ok(EditResult::already_present());
    }

    // Locate both anchors before splicing; offsets shift once text moves.
    let section_at = anchor::section_start(document, SectionKind::FileReference)?;
    let children_at = anchor::group_children_start(document, group)?;

    let file_ref = pool.issue();
    let _build_file = pool.issue();

    let reference = format!(
        "\n\t\t{file_ref} /* {file_name} */ = {{isa = PBXFileReference; \
         lastKnownFileType = {file_type}; path = {file_name}; \
         sourceTree = \"<group>\"; }};"
    );
    let child = format!("\n\t\t\t\t{file_ref} /* {file_name} */,");

    // Higher offset first so the lower one stays valid.
    if section_at > children_at {
        document.splice(section_at, &reference)?;
        document.splice(children_at, &child)?;
    } else {
        document.splice(children_at, &child)?;
        document.splice(section_at, &reference)?;
    }

    Ok(EditResult::applied(Some(file_ref)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Outcome;

    fn fixture() -> ProjectDocument {
        ProjectDocument::new(
            "/* Begin PBXFileReference section */\n\
             /* End PBXFileReference section */\n\
             /* Begin PBXGroup section */\n\
             \t\tAAAAAAAAAAAAAAAAAAAAAAA1 /* App */ = {\n\
             \t\t\tisa = PBXGroup;\n\
             \t\t\tchildren = (\n\
             \t\t\t);\n\
             \t\t\tpath = App;\n\
             \t\t\tsourceTree = \"<group>\";\n\
             \t\t};\n\
             /* End PBXGroup section */\n"
                .to_string(),
        )
    }

    #[test]
    fn adds_reference_and_group_child() {
        let mut doc = fixture();
        let mut pool = IdentifierPool::scan(&doc);
        let result = apply(
            &mut doc,
            &mut pool,
            "App.entitlements",
            "text.plist.entitlements",
            "App",
        )
        .unwrap();

        assert_eq!(result.outcome, Outcome::Applied);
        let id = result.identifier.unwrap().to_string();
        assert!(doc
            .as_str()
            .contains(&format!("{id} /* App.entitlements */ = {{isa = PBXFileReference;")));
        assert!(doc.as_str().contains(&format!("\t\t\t\t{id} /* App.entitlements */,")));
        assert!(doc.is_brace_balanced());
    }

    #[test]
    fn existing_reference_is_noop() {
        let mut doc = fixture();
        let mut pool = IdentifierPool::scan(&doc);
        apply(&mut doc, &mut pool, "App.entitlements", "text.plist.entitlements", "App").unwrap();

        let before = doc.clone();
        let result =
            apply(&mut doc, &mut pool, "App.entitlements", "text.plist.entitlements", "App")
                .unwrap();
        assert_eq!(result.outcome, Outcome::AlreadyPresent);
        assert_eq!(result.identifier, None);
        assert_eq!(doc, before);
    }

    #[test]
    fn missing_section_fails_before_issuing_identifiers() {
        let mut doc = ProjectDocument::new("no sections at all".to_string());
        let mut pool = IdentifierPool::new();
        let result = apply(&mut doc, &mut pool, "A.entitlements", "text.plist.entitlements", "App");
        assert!(result.is_err());
        assert!(pool.is_empty());
        assert_eq!(doc.as_str(), "no sections at all");
    }

    #[test]
    fn missing_group_fails_without_partial_splice() {
        let mut doc = ProjectDocument::new(
            "/* Begin PBXFileReference section */\n/* End PBXFileReference section */\n"
                .to_string(),
        );
        let before = doc.clone();
        let mut pool = IdentifierPool::new();
        let result = apply(&mut doc, &mut pool, "A.entitlements", "text.plist.entitlements", "App");
        assert!(result.is_err());
        assert_eq!(doc, before);
    }
}
