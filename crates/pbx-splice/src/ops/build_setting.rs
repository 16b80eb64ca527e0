//! Add a build setting ahead of a stable anchor key

use pbx_document::ProjectDocument;

use crate::anchor;
use crate::ops::{EditResult, SpliceError};

/// Splices `key = value;` immediately before `anchor_key` in every
/// build-settings body that carries the anchor. Debug and Release both
/// anchor on the same bundle-identifier line; editing only the first body
/// would leave the configurations disagreeing.
pub(crate) fn apply(
    document: &mut ProjectDocument,
    key: &str,
    value: &str,
    anchor_key: &str,
) -> Result<EditResult, SpliceError> {
    let setting = format!("{key} = {value};");
    let bodies = anchor::build_settings_bodies(document, anchor_key)?;

    let mut pending: Vec<usize> = bodies
        .iter()
        .filter(|b| !document.as_str()[b.body.clone()].contains(&setting))
        .map(|b| b.anchor)
        .collect();

    if pending.is_empty() {
        return Ok(EditResult::already_present());
    }

    // Highest offset first so earlier anchors stay valid while splicing.
    pending.sort_unstable_by(|a, b| b.cmp(a));
    for at in pending {
        document.splice(at, &format!("{setting}\n\t\t\t\t"))?;
    }

    Ok(EditResult::applied(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Outcome;
    use pretty_assertions::assert_eq;

    const ANCHOR: &str = "PRODUCT_BUNDLE_IDENTIFIER = com.x.App;";

    fn fixture() -> ProjectDocument {
        ProjectDocument::new(
            "\t\t\tbuildSettings = {\n\
             \t\t\t\tCODE_SIGN_STYLE = Automatic;\n\
             \t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = com.x.App;\n\
             \t\t\t};\n\
             \t\t\tbuildSettings = {\n\
             \t\t\t\tCODE_SIGN_STYLE = Automatic;\n\
             \t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = com.x.App;\n\
             \t\t\t};\n"
                .to_string(),
        )
    }

    #[test]
    fn splices_before_anchor_in_every_body() {
        let mut doc = fixture();
        let result = apply(
            &mut doc,
            "CODE_SIGN_ENTITLEMENTS",
            "App/App.entitlements",
            ANCHOR,
        )
        .unwrap();

        assert_eq!(result.outcome, Outcome::Applied);
        let expected = "CODE_SIGN_ENTITLEMENTS = App/App.entitlements;\n\
                        \t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = com.x.App;";
        assert_eq!(doc.as_str().matches(expected).count(), 2);
        assert!(doc.is_brace_balanced());
    }

    #[test]
    fn present_everywhere_is_noop() {
        let mut doc = fixture();
        apply(&mut doc, "CODE_SIGN_ENTITLEMENTS", "App/App.entitlements", ANCHOR).unwrap();

        let before = doc.clone();
        let result =
            apply(&mut doc, "CODE_SIGN_ENTITLEMENTS", "App/App.entitlements", ANCHOR).unwrap();
        assert_eq!(result.outcome, Outcome::AlreadyPresent);
        assert_eq!(doc, before);
    }

    #[test]
    fn partially_present_fills_the_gap() {
        // First body already carries the setting, second does not.
        let mut doc = ProjectDocument::new(
            "\t\t\tbuildSettings = {\n\
             \t\t\t\tCODE_SIGN_ENTITLEMENTS = App/App.entitlements;\n\
             \t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = com.x.App;\n\
             \t\t\t};\n\
             \t\t\tbuildSettings = {\n\
             \t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = com.x.App;\n\
             \t\t\t};\n"
                .to_string(),
        );
        let result =
            apply(&mut doc, "CODE_SIGN_ENTITLEMENTS", "App/App.entitlements", ANCHOR).unwrap();
        assert_eq!(result.outcome, Outcome::Applied);
        assert_eq!(
            doc.as_str()
                .matches("CODE_SIGN_ENTITLEMENTS = App/App.entitlements;")
                .count(),
            2
        );
    }

    #[test]
    fn missing_anchor_fails() {
        let mut doc = ProjectDocument::new("buildSettings = {\n};\n".to_string());
        let result = apply(&mut doc, "K", "V", ANCHOR);
        assert!(result.is_err());
    }

    #[test]
    fn different_value_still_splices() {
        // `key = other;` present is not `key = value;` - the precondition is
        // exact, so the requested pair is added alongside.
        let mut doc = ProjectDocument::new(
            "buildSettings = {\n\
             \tCODE_SIGN_ENTITLEMENTS = Old/Old.entitlements;\n\
             \tPRODUCT_BUNDLE_IDENTIFIER = com.x.App;\n\
             };\n"
                .to_string(),
        );
        let result =
            apply(&mut doc, "CODE_SIGN_ENTITLEMENTS", "App/App.entitlements", ANCHOR).unwrap();
        assert_eq!(result.outcome, Outcome::Applied);
        assert!(doc.contains("CODE_SIGN_ENTITLEMENTS = App/App.entitlements;"));
    }
}
