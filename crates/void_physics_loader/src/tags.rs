//! Tag and attribute vocabulary of the PhysicsEditor AndEngine exporter

/// Element names the exporter writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Bodies,
    Body,
    BodyDef,
    Fixtures,
    Fixture,
    FixtureType,
    Polygons,
    Polygon,
    Vertex,
    Circle,
    Metadata,
    Format,
    PtmRatio,
}

impl Tag {
    /// Every known tag
    pub const ALL: [Tag; 13] = [
        Tag::Bodies,
        Tag::Body,
        Tag::BodyDef,
        Tag::Fixtures,
        Tag::Fixture,
        Tag::FixtureType,
        Tag::Polygons,
        Tag::Polygon,
        Tag::Vertex,
        Tag::Circle,
        Tag::Metadata,
        Tag::Format,
        Tag::PtmRatio,
    ];

    /// Tags the scene builder registers with the dispatcher
    pub const HANDLED: [Tag; 10] = [
        Tag::Bodies,
        Tag::Body,
        Tag::Fixture,
        Tag::Polygon,
        Tag::Vertex,
        Tag::BodyDef,
        Tag::Metadata,
        Tag::Format,
        Tag::PtmRatio,
        Tag::Circle,
    ];

    /// Name as written in the document
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Bodies => "bodies",
            Tag::Body => "body",
            Tag::BodyDef => "bodydef",
            Tag::Fixtures => "fixtures",
            Tag::Fixture => "fixture",
            Tag::FixtureType => "fixture_type",
            Tag::Polygons => "polygons",
            Tag::Polygon => "polygon",
            Tag::Vertex => "vertex",
            Tag::Circle => "circle",
            Tag::Metadata => "metadata",
            Tag::Format => "format",
            Tag::PtmRatio => "ptm_ratio",
        }
    }

    /// Look up a tag by its document name
    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.iter().copied().find(|tag| tag.as_str() == name)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute names read by the builder
pub mod attr {
    pub const NAME: &str = "name";
    pub const DYNAMIC: &str = "dynamic";
    pub const DENSITY: &str = "density";
    pub const FRICTION: &str = "friction";
    pub const RESTITUTION: &str = "restitution";
    pub const IS_SENSOR: &str = "isSensor";
    pub const FILTER_CATEGORY_BITS: &str = "filter_categoryBits";
    pub const FILTER_MASK_BITS: &str = "filter_maskBits";
    pub const FILTER_GROUP_INDEX: &str = "filter_groupIndex";
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const R: &str = "r";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve_back() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_name(tag.as_str()), Some(tag));
        }
        assert_eq!(Tag::from_name("joint"), None);
        assert_eq!(Tag::from_name("Body"), None);
    }
}
