//! Stock configurations for GML 3.1 and the schemas it imports
//!
//! GML imports XLink for `xlink:href` references and SMIL 2.0 for default
//! styling, so [`gml`] depends on [`xlink`] and [`smil`]. The GML
//! configuration contributes a [`GmlSettings`] capability that geometry
//! bindings read from the composition context.

use crate::bindings::BindingSet;
use crate::configuration::Configuration;
use crate::context::CompositionContext;
use crate::error::Result;
use crate::namespaces::{QName, GML_NAMESPACE, SMIL_20_NAMESPACE, XLINK_NAMESPACE};
use std::sync::Arc;

/// Canonical XLink schema
pub const XLINK_SCHEMA_LOCATION: &str = "http://schemas.opengis.net/xlink/1.0.0/xlinks.xsd";

/// Canonical SMIL 2.0 schema as distributed with GML 3.1.1
pub const SMIL_SCHEMA_LOCATION: &str = "http://schemas.opengis.net/gml/3.1.1/smil/smil20.xsd";

/// Canonical GML 3.1.1 schema
pub const GML_SCHEMA_LOCATION: &str = "http://schemas.opengis.net/gml/3.1.1/base/gml.xsd";

/// Context key of the [`GmlSettings`] capability
pub const SETTINGS_KEY: &str = "gml.settings";

/// Syntax used when writing `srsName` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SrsSyntax {
    /// `EPSG:4326`
    EpsgCode,
    /// `http://www.opengis.net/gml/srs/epsg.xml#4326`
    #[default]
    OgcHttpUrl,
    /// `urn:x-ogc:def:crs:EPSG:4326`
    OgcUrnExperimental,
    /// `urn:ogc:def:crs:EPSG::4326`
    OgcUrn,
    /// `http://www.opengis.net/def/crs/EPSG/0/4326`
    OgcHttpUri,
}

impl SrsSyntax {
    /// Prefix placed before an EPSG code
    pub fn prefix(self) -> &'static str {
        match self {
            SrsSyntax::EpsgCode => "EPSG:",
            SrsSyntax::OgcHttpUrl => "http://www.opengis.net/gml/srs/epsg.xml#",
            SrsSyntax::OgcUrnExperimental => "urn:x-ogc:def:crs:EPSG:",
            SrsSyntax::OgcUrn => "urn:ogc:def:crs:EPSG::",
            SrsSyntax::OgcHttpUri => "http://www.opengis.net/def/crs/EPSG/0/",
        }
    }

    /// Format an EPSG code in this syntax
    pub fn format(self, code: u32) -> String {
        format!("{}{}", self.prefix(), code)
    }
}

/// Settings shared with geometry bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmlSettings {
    /// Syntax of written `srsName` attributes
    pub srs_syntax: SrsSyntax,
    /// Write `srsDimension` on coordinate lists
    pub encode_srs_dimension: bool,
    /// Write `gml:boundedBy` on features
    pub encode_feature_bounds: bool,
    /// Accept arcs and curved surfaces
    pub extended_arc_surface_support: bool,
}

impl Default for GmlSettings {
    fn default() -> Self {
        Self {
            srs_syntax: SrsSyntax::default(),
            encode_srs_dimension: true,
            encode_feature_bounds: true,
            extended_arc_surface_support: false,
        }
    }
}

/// XLink configuration
pub fn xlink() -> Result<Arc<Configuration>> {
    Configuration::builder(XLINK_NAMESPACE, XLINK_SCHEMA_LOCATION)
        .with_bindings(
            BindingSet::new()
                .with_attribute(QName::namespaced(XLINK_NAMESPACE, "href"), "xlink-href")
                .with_attribute(QName::namespaced(XLINK_NAMESPACE, "title"), "xlink-title"),
        )
        .build()
}

/// SMIL 2.0 configuration; imported by GML, contributes nothing
pub fn smil() -> Result<Arc<Configuration>> {
    Configuration::builder(SMIL_20_NAMESPACE, SMIL_SCHEMA_LOCATION).build()
}

/// GML configuration with default settings
pub fn gml() -> Result<Arc<Configuration>> {
    gml_with(GmlSettings::default())
}

/// GML configuration contributing `settings`
pub fn gml_with(settings: GmlSettings) -> Result<Arc<Configuration>> {
    let element = |local: &str| QName::namespaced(GML_NAMESPACE, local);
    let mut bindings = BindingSet::new()
        .with_element(element("Point"), "point")
        .with_element(element("LineString"), "line-string")
        .with_element(element("LinearRing"), "linear-ring")
        .with_element(element("Polygon"), "polygon")
        .with_element(element("MultiPoint"), "multi-point")
        .with_element(element("MultiLineString"), "multi-line-string")
        .with_element(element("MultiPolygon"), "multi-polygon")
        .with_element(element("Envelope"), "envelope")
        .with_element(element("pos"), "direct-position")
        .with_element(element("posList"), "direct-position-list")
        .with_type(element("AbstractFeatureType"), "feature")
        .with_attribute(QName::local("srsName"), "srs-name");
    if settings.extended_arc_surface_support {
        bindings = bindings
            .with_element(element("Arc"), "arc")
            .with_element(element("Curve"), "curve")
            .with_element(element("Surface"), "surface");
    }

    Configuration::builder(GML_NAMESPACE, GML_SCHEMA_LOCATION)
        .depends_on(xlink()?)
        .depends_on(smil()?)
        .with_bindings(bindings)
        .contributes(move |ctx: &mut CompositionContext| ctx.register(SETTINGS_KEY, settings.clone()))
        .build()
}
