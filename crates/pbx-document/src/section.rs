//! Named object sections
//!
//! A section is a delimited run of same-kind object bodies, identified by a
//! literal `/* Begin ... section */` marker unique within the document.

/// The object sections the editor knows how to address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// `PBXBuildFile` - build-file wrappers referencing file references
    BuildFile,
    /// `PBXFileReference` - on-disk file references
    FileReference,
    /// `PBXFrameworksBuildPhase`
    FrameworksBuildPhase,
    /// `PBXGroup` - ordered grouping of children
    Group,
    /// `PBXNativeTarget`
    NativeTarget,
    /// `PBXProject` - the root project object
    Project,
    /// `PBXResourcesBuildPhase`
    ResourcesBuildPhase,
    /// `PBXSourcesBuildPhase`
    SourcesBuildPhase,
    /// `XCBuildConfiguration` - build-settings bodies
    BuildConfiguration,
    /// `XCConfigurationList`
    ConfigurationList,
}

impl SectionKind {
    /// The isa name of objects in this section
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BuildFile => "PBXBuildFile",
            Self::FileReference => "PBXFileReference",
            Self::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
            Self::Group => "PBXGroup",
            Self::NativeTarget => "PBXNativeTarget",
            Self::Project => "PBXProject",
            Self::ResourcesBuildPhase => "PBXResourcesBuildPhase",
            Self::SourcesBuildPhase => "PBXSourcesBuildPhase",
            Self::BuildConfiguration => "XCBuildConfiguration",
            Self::ConfigurationList => "XCConfigurationList",
        }
    }

    /// Literal marker opening this section
    #[must_use]
    pub fn begin_marker(self) -> String {
        format!("/* Begin {} section */", self.name())
    }

    /// Literal marker closing this section
    #[must_use]
    pub fn end_marker(self) -> String {
        format!("/* End {} section */", self.name())
    }
}
