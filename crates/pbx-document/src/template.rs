//! Minimal-project scaffold
//!
//! Renders a minimal, valid project document for an application: file
//! reference and group sections, the three standard build phases, a native
//! target, the project object, and Debug/Release configurations wired
//! through configuration lists. Every object identifier is issued from the
//! caller's [`IdentifierPool`], except an optional pre-existing target
//! identifier that a rebuild wants to keep stable so attribute edits keep
//! addressing the same target.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::ProjectDocument;
use crate::ident::{IdentifierPool, ObjectId};

/// What to scaffold
#[derive(Debug, Clone)]
pub struct TemplateSpec {
    /// Application name (group, target, and product names derive from it)
    pub app_name: String,
    /// `PRODUCT_BUNDLE_IDENTIFIER` for the target configurations
    pub bundle_identifier: String,
    /// Reuse this native-target identifier instead of issuing a fresh one
    pub target: Option<ObjectId>,
}

impl TemplateSpec {
    /// Spec with a fresh target identifier
    #[must_use]
    pub fn new(app_name: impl Into<String>, bundle_identifier: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            bundle_identifier: bundle_identifier.into(),
            target: None,
        }
    }

    /// Keep an existing target identifier
    #[must_use]
    pub fn with_target(mut self, target: ObjectId) -> Self {
        self.target = Some(target);
        self
    }
}

static NATIVE_TARGET_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9A-F]{24}) /\* [^*]+ \*/ = \{\s*isa = PBXNativeTarget;")
        .expect("native target pattern")
});

/// Extract the first native-target identifier from an existing document
///
/// Used when rebuilding over a broken project so the replacement keeps the
/// original target identity. First match wins.
#[must_use]
pub fn existing_target(document: &ProjectDocument) -> Option<ObjectId> {
    NATIVE_TARGET_ID
        .captures(document.as_str())
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Render the minimal project document
pub fn render(spec: &TemplateSpec, pool: &mut IdentifierPool) -> ProjectDocument {
    let name = &spec.app_name;
    let bundle = &spec.bundle_identifier;

    let target = match spec.target {
        Some(id) => {
            pool.reserve(id);
            id
        }
        None => pool.issue(),
    };
    let root_group = pool.issue();
    let app_group = pool.issue();
    let products_group = pool.issue();
    let product_ref = pool.issue();
    let project = pool.issue();
    let frameworks_phase = pool.issue();
    let resources_phase = pool.issue();
    let sources_phase = pool.issue();
    let project_cfg_list = pool.issue();
    let target_cfg_list = pool.issue();
    let project_debug = pool.issue();
    let project_release = pool.issue();
    let target_debug = pool.issue();
    let target_release = pool.issue();

    let mut text = String::with_capacity(8 * 1024);

    text.push_str("// !$*UTF8*$!\n{\n");
    text.push_str("\tarchiveVersion = 1;\n");
    text.push_str("\tclasses = {\n\t};\n");
    text.push_str("\tobjectVersion = 56;\n");
    text.push_str("\tobjects = {\n\n");

    text.push_str("/* Begin PBXFileReference section */\n");
    text.push_str(&format!(
        "\t\t{product_ref} /* {name}.app */ = {{isa = PBXFileReference; \
         explicitFileType = wrapper.application; includeInIndex = 0; \
         path = {name}.app; sourceTree = BUILT_PRODUCTS_DIR; }};\n"
    ));
    text.push_str("/* End PBXFileReference section */\n\n");

    text.push_str("/* Begin PBXFrameworksBuildPhase section */\n");
    text.push_str(&format!(
        "\t\t{frameworks_phase} /* Frameworks */ = {{\n\
         \t\t\tisa = PBXFrameworksBuildPhase;\n\
         \t\t\tbuildActionMask = 2147483647;\n\
         \t\t\tfiles = (\n\t\t\t);\n\
         \t\t\trunOnlyForDeploymentPostprocessing = 0;\n\
         \t\t}};\n"
    ));
    text.push_str("/* End PBXFrameworksBuildPhase section */\n\n");

    text.push_str("/* Begin PBXGroup section */\n");
    text.push_str(&format!(
        "\t\t{root_group} = {{\n\
         \t\t\tisa = PBXGroup;\n\
         \t\t\tchildren = (\n\
         \t\t\t\t{app_group} /* {name} */,\n\
         \t\t\t\t{products_group} /* Products */,\n\
         \t\t\t);\n\
         \t\t\tsourceTree = \"<group>\";\n\
         \t\t}};\n"
    ));
    text.push_str(&format!(
        "\t\t{app_group} /* {name} */ = {{\n\
         \t\t\tisa = PBXGroup;\n\
         \t\t\tchildren = (\n\
         \t\t\t);\n\
         \t\t\tpath = {name};\n\
         \t\t\tsourceTree = \"<group>\";\n\
         \t\t}};\n"
    ));
    text.push_str(&format!(
        "\t\t{products_group} /* Products */ = {{\n\
         \t\t\tisa = PBXGroup;\n\
         \t\t\tchildren = (\n\
         \t\t\t\t{product_ref} /* {name}.app */,\n\
         \t\t\t);\n\
         \t\t\tname = Products;\n\
         \t\t\tsourceTree = \"<group>\";\n\
         \t\t}};\n"
    ));
    text.push_str("/* End PBXGroup section */\n\n");

    text.push_str("/* Begin PBXNativeTarget section */\n");
    text.push_str(&format!(
        "\t\t{target} /* {name} */ = {{\n\
         \t\t\tisa = PBXNativeTarget;\n\
         \t\t\tbuildConfigurationList = {target_cfg_list} /* Build configuration list for PBXNativeTarget \"{name}\" */;\n\
         \t\t\tbuildPhases = (\n\
         \t\t\t\t{sources_phase} /* Sources */,\n\
         \t\t\t\t{frameworks_phase} /* Frameworks */,\n\
         \t\t\t\t{resources_phase} /* Resources */,\n\
         \t\t\t);\n\
         \t\t\tbuildRules = (\n\t\t\t);\n\
         \t\t\tdependencies = (\n\t\t\t);\n\
         \t\t\tname = {name};\n\
         \t\t\tproductName = {name};\n\
         \t\t\tproductReference = {product_ref} /* {name}.app */;\n\
         \t\t\tproductType = \"com.apple.product-type.application\";\n\
         \t\t}};\n"
    ));
    text.push_str("/* End PBXNativeTarget section */\n\n");

    text.push_str("/* Begin PBXProject section */\n");
    text.push_str(&format!(
        "\t\t{project} /* Project object */ = {{\n\
         \t\t\tisa = PBXProject;\n\
         \t\t\tattributes = {{\n\
         \t\t\t\tBuildIndependentTargetsInParallel = 1;\n\
         \t\t\t\tLastSwiftUpdateCheck = 1500;\n\
         \t\t\t\tLastUpgradeCheck = 1500;\n\
         \t\t\t}};\n\
         \t\t\tbuildConfigurationList = {project_cfg_list} /* Build configuration list for PBXProject \"{name}\" */;\n\
         \t\t\tdevelopmentRegion = en;\n\
         \t\t\thasScannedForEncodings = 0;\n\
         \t\t\tknownRegions = (\n\
         \t\t\t\ten,\n\
         \t\t\t\tBase,\n\
         \t\t\t);\n\
         \t\t\tmainGroup = {root_group};\n\
         \t\t\tproductRefGroup = {products_group} /* Products */;\n\
         \t\t\tprojectDirPath = \"\";\n\
         \t\t\tprojectRoot = \"\";\n\
         \t\t\ttargets = (\n\
         \t\t\t\t{target} /* {name} */,\n\
         \t\t\t);\n\
         \t\t}};\n"
    ));
    text.push_str("/* End PBXProject section */\n\n");

    text.push_str("/* Begin PBXResourcesBuildPhase section */\n");
    text.push_str(&format!(
        "\t\t{resources_phase} /* Resources */ = {{\n\
         \t\t\tisa = PBXResourcesBuildPhase;\n\
         \t\t\tbuildActionMask = 2147483647;\n\
         \t\t\tfiles = (\n\t\t\t);\n\
         \t\t\trunOnlyForDeploymentPostprocessing = 0;\n\
         \t\t}};\n"
    ));
    text.push_str("/* End PBXResourcesBuildPhase section */\n\n");

    text.push_str("/* Begin PBXSourcesBuildPhase section */\n");
    text.push_str(&format!(
        "\t\t{sources_phase} /* Sources */ = {{\n\
         \t\t\tisa = PBXSourcesBuildPhase;\n\
         \t\t\tbuildActionMask = 2147483647;\n\
         \t\t\tfiles = (\n\t\t\t);\n\
         \t\t\trunOnlyForDeploymentPostprocessing = 0;\n\
         \t\t}};\n"
    ));
    text.push_str("/* End PBXSourcesBuildPhase section */\n\n");

    text.push_str("/* Begin XCBuildConfiguration section */\n");
    text.push_str(&project_configuration(project_debug, "Debug"));
    text.push_str(&project_configuration(project_release, "Release"));
    text.push_str(&target_configuration(target_debug, "Debug", bundle));
    text.push_str(&target_configuration(target_release, "Release", bundle));
    text.push_str("/* End XCBuildConfiguration section */\n\n");

    text.push_str("/* Begin XCConfigurationList section */\n");
    text.push_str(&configuration_list(
        project_cfg_list,
        &format!("Build configuration list for PBXProject \"{name}\""),
        project_debug,
        project_release,
    ));
    text.push_str(&configuration_list(
        target_cfg_list,
        &format!("Build configuration list for PBXNativeTarget \"{name}\""),
        target_debug,
        target_release,
    ));
    text.push_str("/* End XCConfigurationList section */\n");

    text.push_str("\t};\n");
    text.push_str(&format!("\trootObject = {project} /* Project object */;\n"));
    text.push_str("}\n");

    ProjectDocument::new(text)
}

fn project_configuration(id: ObjectId, config: &str) -> String {
    let debug = config == "Debug";
    format!(
        "\t\t{id} /* {config} */ = {{\n\
         \t\t\tisa = XCBuildConfiguration;\n\
         \t\t\tbuildSettings = {{\n\
         \t\t\t\tALWAYS_SEARCH_USER_PATHS = NO;\n\
         \t\t\t\tCLANG_ENABLE_MODULES = YES;\n\
         \t\t\t\tDEBUG_INFORMATION_FORMAT = {};\n\
         \t\t\t\tENABLE_STRICT_OBJC_MSGSEND = YES;\n\
         \t\t\t\tGCC_OPTIMIZATION_LEVEL = {};\n\
         \t\t\t\tIPHONEOS_DEPLOYMENT_TARGET = 16.0;\n\
         \t\t\t\tONLY_ACTIVE_ARCH = {};\n\
         \t\t\t\tSDKROOT = iphoneos;\n\
         \t\t\t\tSWIFT_OPTIMIZATION_LEVEL = \"{}\";\n\
         \t\t\t}};\n\
         \t\t\tname = {config};\n\
         \t\t}};\n",
        if debug { "dwarf" } else { "\"dwarf-with-dsym\"" },
        if debug { "0" } else { "s" },
        if debug { "YES" } else { "NO" },
        if debug { "-Onone" } else { "-O" },
    )
}

fn target_configuration(id: ObjectId, config: &str, bundle: &str) -> String {
    format!(
        "\t\t{id} /* {config} */ = {{\n\
         \t\t\tisa = XCBuildConfiguration;\n\
         \t\t\tbuildSettings = {{\n\
         \t\t\t\tASSETCATALOG_COMPILER_APPICON_NAME = AppIcon;\n\
         \t\t\t\tCODE_SIGN_STYLE = Automatic;\n\
         \t\t\t\tCURRENT_PROJECT_VERSION = 1;\n\
         \t\t\t\tGENERATE_INFOPLIST_FILE = YES;\n\
         \t\t\t\tIPHONEOS_DEPLOYMENT_TARGET = 16.0;\n\
         \t\t\t\tLD_RUNPATH_SEARCH_PATHS = (\n\
         \t\t\t\t\t\"$(inherited)\",\n\
         \t\t\t\t\t\"@executable_path/Frameworks\",\n\
         \t\t\t\t);\n\
         \t\t\t\tMARKETING_VERSION = 1.0;\n\
         \t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = {bundle};\n\
         \t\t\t\tPRODUCT_NAME = \"$(TARGET_NAME)\";\n\
         \t\t\t\tSWIFT_EMIT_LOC_STRINGS = YES;\n\
         \t\t\t\tSWIFT_VERSION = 5.0;\n\
         \t\t\t\tTARGETED_DEVICE_FAMILY = \"1,2\";\n\
         \t\t\t}};\n\
         \t\t\tname = {config};\n\
         \t\t}};\n",
    )
}

fn configuration_list(id: ObjectId, comment: &str, debug: ObjectId, release: ObjectId) -> String {
    format!(
        "\t\t{id} /* {comment} */ = {{\n\
         \t\t\tisa = XCConfigurationList;\n\
         \t\t\tbuildConfigurations = (\n\
         \t\t\t\t{debug} /* Debug */,\n\
         \t\t\t\t{release} /* Release */,\n\
         \t\t\t);\n\
         \t\t\tdefaultConfigurationIsVisible = 0;\n\
         \t\t\tdefaultConfigurationName = Release;\n\
         \t\t}};\n"
    )
}
