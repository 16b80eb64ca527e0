//! Anchor location
//!
//! Translates semantic target descriptions ("start of the file-reference
//! section", "children list of the group named N", "the attribute body of
//! identifier X") into byte offsets. Shallow anchors are literal markers or
//! anchored patterns; any region whose extent depends on nested braces is
//! bounded with [`scan::balanced_span`] instead of a regex capture.
//!
//! Locators are deterministic and never mutate their input. Where a marker
//! occurs more than once, the **first** match wins; multi-target documents
//! are out of scope, and callers needing stronger addressing must anchor on
//! an identifier rather than a display name.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use pbx_document::{ObjectId, ProjectDocument, SectionKind};

use crate::scan::{self, ScanError};

/// Literal anchor introducing the root project object body
pub const PROJECT_OBJECT_ANCHOR: &str = "/* Project object */ =";

/// Errors from anchor location
#[derive(Debug, thiserror::Error)]
pub enum AnchorError {
    /// The required marker or structure is absent
    #[error("anchor not found: {0}")]
    NotFound(String),

    /// Brace structure around the anchor is malformed
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl AnchorError {
    /// Whether this is a missing-anchor failure (as opposed to malformed braces)
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A `buildSettings` body that contains the requested anchor key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsBody {
    /// Byte range of the body, opening brace through closing brace inclusive
    pub body: Range<usize>,
    /// Absolute offset of the anchor key inside the body
    pub anchor: usize,
}

/// Offset just past the Begin marker of `section`
///
/// New object bodies are spliced here, at the head of the section.
///
/// # Errors
/// Returns [`AnchorError::NotFound`] if the section marker is absent
pub fn section_start(
    document: &ProjectDocument,
    section: SectionKind,
) -> Result<usize, AnchorError> {
    let marker = section.begin_marker();
    document
        .find(&marker)
        .map(|at| at + marker.len())
        .ok_or(AnchorError::NotFound(format!("section marker `{marker}`")))
}

static GROUP_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/\* (?P<name>[^*/]+) \*/ = \{\s*isa = PBXGroup;").expect("group header pattern")
});

/// Offset just past `children = (` of the first group named `name`
///
/// Group display names containing `*` or `/` are not addressable.
///
/// # Errors
/// Returns [`AnchorError::NotFound`] if no such group exists or it has no
/// children list
pub fn group_children_start(
    document: &ProjectDocument,
    name: &str,
) -> Result<usize, AnchorError> {
    let text = document.as_str();
    for caps in GROUP_HEADER.captures_iter(text) {
        let (Some(whole), Some(found)) = (caps.get(0), caps.name("name")) else {
            continue;
        };
        if found.as_str() != name {
            continue;
        }
        let open = scan::next_open_brace(text, whole.start())
            .ok_or(AnchorError::NotFound(format!("body of group `{name}`")))?;
        let close = scan::balanced_span(text, open)?;
        let list = "children = (";
        let rel = text[open..=close]
            .find(list)
            .ok_or(AnchorError::NotFound(format!("children list of group `{name}`")))?;
        return Ok(open + rel + list.len());
    }
    Err(AnchorError::NotFound(format!("group `{name}`")))
}

/// Every `buildSettings` body containing `anchor_key`
///
/// The anchor key is a stable sibling setting (typically the bundle
/// identifier line) shared by the Debug and Release configurations of one
/// target, so a match set normally has two entries.
///
/// # Errors
/// Returns [`AnchorError::NotFound`] if no body contains the anchor
pub fn build_settings_bodies(
    document: &ProjectDocument,
    anchor_key: &str,
) -> Result<Vec<SettingsBody>, AnchorError> {
    let text = document.as_str();
    let mut bodies = Vec::new();
    for (at, _) in text.match_indices("buildSettings = {") {
        let open = at + "buildSettings = ".len();
        let close = scan::balanced_span(text, open)?;
        if let Some(rel) = text[open..=close].find(anchor_key) {
            bodies.push(SettingsBody {
                body: open..close + 1,
                anchor: open + rel,
            });
        }
    }
    if bodies.is_empty() {
        return Err(AnchorError::NotFound(format!(
            "buildSettings body containing `{anchor_key}`"
        )));
    }
    Ok(bodies)
}

/// Body range (opening brace through closing brace inclusive) of the object
/// introduced by the literal `anchor`
///
/// # Errors
/// Returns [`AnchorError::NotFound`] if the anchor or its opening brace is
/// absent
pub fn object_body(document: &ProjectDocument, anchor: &str) -> Result<Range<usize>, AnchorError> {
    let text = document.as_str();
    let at = document
        .find(anchor)
        .ok_or(AnchorError::NotFound(format!("object anchor `{anchor}`")))?;
    let open = scan::next_open_brace(text, at + anchor.len())
        .ok_or(AnchorError::NotFound(format!("opening brace after `{anchor}`")))?;
    let close = scan::balanced_span(text, open)?;
    Ok(open..close + 1)
}

/// Body range of the first `key = {` dictionary inside `within`
///
/// The match is boundary-checked so that e.g. `attributes` never matches the
/// tail of `TargetAttributes`.
///
/// # Errors
/// Returns [`AnchorError::NotFound`] if the key opens no dictionary in range
pub fn key_body(
    document: &ProjectDocument,
    within: Range<usize>,
    key: &str,
) -> Result<Range<usize>, AnchorError> {
    let text = document.as_str();
    let slice = &text[within.clone()];
    let needle = format!("{key} = {{");
    let mut from = 0;
    while let Some(rel) = slice[from..].find(&needle) {
        let at = from + rel;
        let clean_boundary = at == 0 || {
            let prev = slice.as_bytes()[at - 1];
            !(prev.is_ascii_alphanumeric() || prev == b'_' || prev == b'.')
        };
        if clean_boundary {
            let open = within.start + at + needle.len() - 1;
            let close = scan::balanced_span(text, open)?;
            return Ok(open..close + 1);
        }
        from = at + 1;
    }
    Err(AnchorError::NotFound(format!("`{key}` body")))
}

/// Body range of the `attributes` dictionary of the project object
///
/// # Errors
/// Returns [`AnchorError::NotFound`] if the project object or its
/// attributes dictionary is absent
pub fn project_attributes_body(document: &ProjectDocument) -> Result<Range<usize>, AnchorError> {
    let project = object_body(document, PROJECT_OBJECT_ANCHOR)?;
    key_body(document, project, "attributes")
}

/// Body range of the `TargetAttributes` dictionary
///
/// # Errors
/// Returns [`AnchorError::NotFound`] if the cascade of enclosing bodies is
/// absent
pub fn target_attributes_body(document: &ProjectDocument) -> Result<Range<usize>, AnchorError> {
    let attributes = project_attributes_body(document)?;
    key_body(document, attributes, "TargetAttributes")
}

/// Body range of the attribute dictionary for one target identifier
///
/// # Errors
/// Returns [`AnchorError::NotFound`] if the target has no attribute body
pub fn target_body(
    document: &ProjectDocument,
    target: &ObjectId,
) -> Result<Range<usize>, AnchorError> {
    let attributes = target_attributes_body(document)?;
    key_body(document, attributes, &target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> ProjectDocument {
        ProjectDocument::new(text.to_string())
    }

    const GROUPS: &str = "\
/* Begin PBXGroup section */
\t\tAAAAAAAAAAAAAAAAAAAAAAA1 /* App */ = {
\t\t\tisa = PBXGroup;
\t\t\tchildren = (
\t\t\t\tAAAAAAAAAAAAAAAAAAAAAAA2 /* Sources */,
\t\t\t);
\t\t\tpath = App;
\t\t\tsourceTree = \"<group>\";
\t\t};
/* End PBXGroup section */
";

    #[test]
    fn section_start_lands_after_marker() {
        let d = doc(GROUPS);
        let at = section_start(&d, SectionKind::Group).unwrap();
        assert!(d.as_str()[at..].starts_with('\n'));
    }

    #[test]
    fn section_start_missing_marker() {
        let d = doc("nothing here");
        let err = section_start(&d, SectionKind::FileReference).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn group_children_found() {
        let d = doc(GROUPS);
        let at = group_children_start(&d, "App").unwrap();
        assert!(d.as_str()[at..].starts_with("\n\t\t\t\tAAAAAAAAAAAAAAAAAAAAAAA2"));
    }

    #[test]
    fn group_children_unknown_group() {
        let d = doc(GROUPS);
        let err = group_children_start(&d, "Products").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn build_settings_bodies_finds_each_configuration() {
        let d = doc(
            "buildSettings = {\n\tPRODUCT_BUNDLE_IDENTIFIER = com.x.App;\n};\n\
             buildSettings = {\n\tPRODUCT_BUNDLE_IDENTIFIER = com.x.App;\n};\n\
             buildSettings = {\n\tSDKROOT = iphoneos;\n};\n",
        );
        let bodies = build_settings_bodies(&d, "PRODUCT_BUNDLE_IDENTIFIER = com.x.App;").unwrap();
        assert_eq!(bodies.len(), 2);
        for b in &bodies {
            assert_eq!(d.as_str().as_bytes()[b.body.start], b'{');
            assert_eq!(d.as_str().as_bytes()[b.body.end - 1], b'}');
            assert!(b.body.contains(&b.anchor));
        }
    }

    #[test]
    fn build_settings_bodies_missing_anchor() {
        let d = doc("buildSettings = {\n\tSDKROOT = iphoneos;\n};\n");
        let err = build_settings_bodies(&d, "PRODUCT_BUNDLE_IDENTIFIER").unwrap_err();
        assert!(err.is_not_found());
    }

    const PROJECT: &str = "\
/* Begin PBXProject section */
\t\tBBBBBBBBBBBBBBBBBBBBBBB1 /* Project object */ = {
\t\t\tisa = PBXProject;
\t\t\tattributes = {
\t\t\t\tLastUpgradeCheck = 1500;
\t\t\t\tTargetAttributes = {
\t\t\t\t\tCCCCCCCCCCCCCCCCCCCCCCC1 = {
\t\t\t\t\t\tDevelopmentTeam = ABC123;
\t\t\t\t\t};
\t\t\t\t};
\t\t\t};
\t\t\tmainGroup = BBBBBBBBBBBBBBBBBBBBBBB2;
\t\t};
/* End PBXProject section */
";

    #[test]
    fn attributes_body_is_outer_dictionary_not_target_attributes() {
        let d = doc(PROJECT);
        let attrs = project_attributes_body(&d).unwrap();
        let body = &d.as_str()[attrs.clone()];
        assert!(body.contains("LastUpgradeCheck"));
        assert!(body.contains("TargetAttributes"));
        // The outer body opens before the nested one
        let ta = target_attributes_body(&d).unwrap();
        assert!(attrs.start < ta.start);
        assert!(ta.end < attrs.end);
    }

    #[test]
    fn target_body_found_by_identifier() {
        let d = doc(PROJECT);
        let target: ObjectId = "CCCCCCCCCCCCCCCCCCCCCCC1".parse().unwrap();
        let body = target_body(&d, &target).unwrap();
        assert!(d.as_str()[body].contains("DevelopmentTeam = ABC123;"));
    }

    #[test]
    fn target_body_missing_identifier() {
        let d = doc(PROJECT);
        let target: ObjectId = "DDDDDDDDDDDDDDDDDDDDDDD1".parse().unwrap();
        let err = target_body(&d, &target).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn first_match_wins_for_duplicate_groups() {
        let duplicated = format!("{GROUPS}{GROUPS}");
        let d = doc(&duplicated);
        let at = group_children_start(&d, "App").unwrap();
        assert!(at < GROUPS.len());
    }
}
