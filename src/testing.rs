use crate::client::{Fetch, Format};
use crate::config::CachePolicy;
use crate::error::{EpsgError, EpsgResult};
use crate::resolver::Resolver;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub(crate) const CRS_27700: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:ProjectedCRS xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:xlink="http://www.w3.org/1999/xlink" gml:id="ogp-crs-27700">
  <gml:identifier codeSpace="OGP">urn:ogc:def:crs:EPSG::27700</gml:identifier>
  <gml:name>OSGB 1936 / British National Grid</gml:name>
  <gml:remarks>Replaces OSGB 1936 / British National Grid (alias).</gml:remarks>
  <gml:domainOfValidity xlink:href="4390-area"/>
  <gml:scope>Engineering survey, topographic mapping.</gml:scope>
  <gml:conversion xlink:href="19916-coordop"/>
  <gml:baseGeodeticCRS xlink:href="4277"/>
  <gml:cartesianCS xlink:href="4400-cs"/>
</gml:ProjectedCRS>"#;

pub(crate) const CRS_21781: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:ProjectedCRS xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:xlink="http://www.w3.org/1999/xlink" gml:id="ogp-crs-21781">
  <gml:identifier codeSpace="OGP">urn:ogc:def:crs:EPSG::21781</gml:identifier>
  <gml:name>CH1903 / LV03</gml:name>
  <gml:domainOfValidity xlink:href="1286-area"/>
  <gml:scope>Cadastre, engineering survey, topographic mapping (large and medium scale).</gml:scope>
  <gml:baseGeodeticCRS xlink:href="4149"/>
  <gml:cartesianCS xlink:href="4498-cs"/>
</gml:ProjectedCRS>"#;

/// A projected CRS whose base CRS link points at a coordinate system.
pub(crate) const CRS_99999_BAD_LINK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:ProjectedCRS xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:xlink="http://www.w3.org/1999/xlink" gml:id="ogp-crs-99999">
  <gml:identifier codeSpace="OGP">urn:ogc:def:crs:EPSG::99999</gml:identifier>
  <gml:name>Broken projection</gml:name>
  <gml:scope>Testing.</gml:scope>
  <gml:baseGeodeticCRS xlink:href="4400-cs"/>
  <gml:cartesianCS xlink:href="4400-cs"/>
</gml:ProjectedCRS>"#;

pub(crate) const CRS_4277: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:GeodeticCRS xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:xlink="http://www.w3.org/1999/xlink" gml:id="ogp-crs-4277">
  <gml:identifier codeSpace="OGP">urn:ogc:def:crs:EPSG::4277</gml:identifier>
  <gml:name>OSGB 1936</gml:name>
  <gml:domainOfValidity xlink:href="1264-area"/>
  <gml:scope>Geodetic survey, topographic mapping.</gml:scope>
  <gml:ellipsoidalCS xlink:href="6422-cs"/>
  <gml:geodeticDatum xlink:href="6277-datum"/>
</gml:GeodeticCRS>"#;

pub(crate) const CRS_5973: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:CompoundCRS xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:xlink="http://www.w3.org/1999/xlink" gml:id="ogp-crs-5973">
  <gml:identifier codeSpace="OGP">urn:ogc:def:crs:EPSG::5973</gml:identifier>
  <gml:name>ETRS89 / UTM zone 33 + NN2000 height</gml:name>
  <gml:domainOfValidity xlink:href="3144-area"/>
  <gml:scope>Engineering survey, topographic mapping.</gml:scope>
  <gml:componentReferenceSystem xlink:href="25833"/>
  <gml:componentReferenceSystem xlink:href="5941"/>
</gml:CompoundCRS>"#;

pub(crate) const VERTICAL_5703: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:VerticalCRS xmlns:gml="http://www.opengis.net/gml/3.2" gml:id="ogp-crs-5703">
  <gml:identifier codeSpace="OGP">urn:ogc:def:crs:EPSG::5703</gml:identifier>
  <gml:name>NAVD88 height</gml:name>
</gml:VerticalCRS>"#;

pub(crate) const CS_4400: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:CartesianCS xmlns:gml="http://www.opengis.net/gml/3.2" gml:id="ogp-cs-4400">
  <gml:identifier codeSpace="OGP">urn:ogc:def:cs:EPSG::4400</gml:identifier>
  <gml:name>Cartesian 2D CS. Axes: easting, northing (E,N). Orientations: E along prime meridian, N along equator. UoM: m.</gml:name>
  <gml:remarks>Used in projected and engineering coordinate reference systems.</gml:remarks>
  <gml:axis>
    <gml:CoordinateSystemAxis gml:id="ogp-axis-1" uom="9001-units">
      <gml:identifier codeSpace="OGP">urn:ogc:def:axis:EPSG::1</gml:identifier>
      <gml:name>Easting</gml:name>
      <gml:axisAbbrev>E</gml:axisAbbrev>
      <gml:axisDirection codeSpace="EPSG">east</gml:axisDirection>
    </gml:CoordinateSystemAxis>
  </gml:axis>
  <gml:axis>
    <gml:CoordinateSystemAxis gml:id="ogp-axis-2" uom="9001-units">
      <gml:identifier codeSpace="OGP">urn:ogc:def:axis:EPSG::2</gml:identifier>
      <gml:name>Northing</gml:name>
      <gml:axisAbbrev>N</gml:axisAbbrev>
      <gml:axisDirection codeSpace="EPSG">north</gml:axisDirection>
    </gml:CoordinateSystemAxis>
  </gml:axis>
</gml:CartesianCS>"#;

/// Geocentric CS whose third axis has lost its unit.
pub(crate) const CS_6500_MISSING_UOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:CartesianCS xmlns:gml="http://www.opengis.net/gml/3.2" gml:id="ogp-cs-6500">
  <gml:identifier codeSpace="OGP">urn:ogc:def:cs:EPSG::6500</gml:identifier>
  <gml:name>Earth centred, earth fixed, righthanded 3D coordinate system</gml:name>
  <gml:remarks>Used in geocentric coordinate reference systems.</gml:remarks>
  <gml:axis>
    <gml:CoordinateSystemAxis gml:id="ogp-axis-115" uom="9001-units">
      <gml:axisDirection codeSpace="EPSG">geocentricX</gml:axisDirection>
    </gml:CoordinateSystemAxis>
  </gml:axis>
  <gml:axis>
    <gml:CoordinateSystemAxis gml:id="ogp-axis-116" uom="9001-units">
      <gml:axisDirection codeSpace="EPSG">geocentricY</gml:axisDirection>
    </gml:CoordinateSystemAxis>
  </gml:axis>
  <gml:axis>
    <gml:CoordinateSystemAxis gml:id="ogp-axis-117">
      <gml:axisDirection codeSpace="EPSG">geocentricZ</gml:axisDirection>
    </gml:CoordinateSystemAxis>
  </gml:axis>
</gml:CartesianCS>"#;

pub(crate) const UOM_9001: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gml:BaseUnit xmlns:gml="http://www.opengis.net/gml/3.2" gml:id="ogp-uom-9001">
  <gml:identifier codeSpace="OGP">urn:ogc:def:uom:EPSG::9001</gml:identifier>
  <gml:name>metre</gml:name>
  <gml:quantityType>length</gml:quantityType>
  <gml:unitsSystem xlink:href="http://www.bipm.fr/en/si" xmlns:xlink="http://www.w3.org/1999/xlink"/>
</gml:BaseUnit>"#;

pub(crate) const AREA_1286: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<epsg:ExtentDefinition xmlns:epsg="urn:x-ogp:spec:schema-xsd:EPSG:2.2:dataset" xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:gmd="http://www.isotc211.org/2005/gmd" xmlns:gco="http://www.isotc211.org/2005/gco" gml:id="ogp-area-1286">
  <gml:identifier codeSpace="OGP">urn:ogc:def:area:EPSG::1286</gml:identifier>
  <gml:name>Europe - Liechtenstein and Switzerland</gml:name>
  <gmd:EX_Extent>
    <gmd:description>
      <gco:CharacterString>Liechtenstein; Switzerland.</gco:CharacterString>
    </gmd:description>
    <gmd:geographicElement>
      <gmd:EX_GeographicBoundingBox>
        <gmd:westBoundLongitude>
          <gco:Decimal>5.96</gco:Decimal>
        </gmd:westBoundLongitude>
        <gmd:eastBoundLongitude>
          <gco:Decimal>10.49</gco:Decimal>
        </gmd:eastBoundLongitude>
        <gmd:southBoundLatitude>
          <gco:Decimal>45.82</gco:Decimal>
        </gmd:southBoundLatitude>
        <gmd:northBoundLatitude>
          <gco:Decimal>47.81</gco:Decimal>
        </gmd:northBoundLatitude>
      </gmd:EX_GeographicBoundingBox>
    </gmd:geographicElement>
  </gmd:EX_Extent>
</epsg:ExtentDefinition>"#;

pub(crate) const AREA_1264_POLYGON_ONLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<epsg:ExtentDefinition xmlns:epsg="urn:x-ogp:spec:schema-xsd:EPSG:2.2:dataset" xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:gmd="http://www.isotc211.org/2005/gmd" xmlns:gco="http://www.isotc211.org/2005/gco" gml:id="ogp-area-1264">
  <gml:name>UK - Great Britain; Isle of Man</gml:name>
  <gmd:EX_Extent>
    <gmd:geographicElement>
      <gmd:EX_BoundingPolygon>
        <gmd:polygon xlink:href="1264-polygon" xmlns:xlink="http://www.w3.org/1999/xlink"/>
      </gmd:EX_BoundingPolygon>
    </gmd:geographicElement>
  </gmd:EX_Extent>
</epsg:ExtentDefinition>"#;

pub(crate) const WKT_27700: &str = r#"PROJCS["OSGB 1936 / British National Grid",GEOGCS["OSGB 1936",DATUM["OSGB_1936",SPHEROID["Airy 1830",6377563.396,299.3249646,AUTHORITY["EPSG","7001"]],AUTHORITY["EPSG","6277"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4277"]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",49],PARAMETER["central_meridian",-2],PARAMETER["scale_factor",0.9996012717],PARAMETER["false_easting",400000],PARAMETER["false_northing",-100000],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AXIS["Easting",EAST],AXIS["Northing",NORTH],AUTHORITY["EPSG","27700"]]"#;

pub(crate) const ESRI_WKT_27700: &str = r#"PROJCS["OSGB_1936_British_National_Grid",GEOGCS["GCS_OSGB 1936",DATUM["D_OSGB_1936",SPHEROID["Airy_1830",6377563.396,299.3249646]],PRIMEM["Greenwich",0],UNIT["Degree",0.017453292519943295]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",49],PARAMETER["central_meridian",-2],PARAMETER["scale_factor",0.9996012717],PARAMETER["false_easting",400000],PARAMETER["false_northing",-100000],UNIT["Meter",1]]"#;

pub(crate) const HTML_27700: &str = r#"<div class="syntax"><pre><span class="gh">PROJCS</span><span class="p">[</span><span class="s">"OSGB 1936 / British National Grid"</span>...</pre></div>"#;

pub(crate) const PROJ4_21781: &str = "\n+proj=somerc +lat_0=46.95240555555556 +lon_0=7.439583333333333 +k_0=1 +x_0=600000 +y_0=200000 +ellps=bessel +towgs84=674.4,15.1,405.3,0,0,0,0 +units=m +no_defs \n";

/// Canned registry responses keyed by `code.format`, with a request log.
pub(crate) struct FixtureFetcher {
    bodies: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub(crate) fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
        .with("27700", Format::Gml, CRS_27700)
        .with("27700", Format::Wkt, WKT_27700)
        .with("27700", Format::EsriWkt, ESRI_WKT_27700)
        .with("27700", Format::Html, HTML_27700)
        .with("21781", Format::Gml, CRS_21781)
        .with("21781", Format::Proj4, PROJ4_21781)
        .with("99999", Format::Gml, CRS_99999_BAD_LINK)
        .with("4277", Format::Gml, CRS_4277)
        .with("5973", Format::Gml, CRS_5973)
        .with("5703", Format::Gml, VERTICAL_5703)
        .with("4400-cs", Format::Gml, CS_4400)
        .with("6500-cs", Format::Gml, CS_6500_MISSING_UOM)
        .with("9001-units", Format::Gml, UOM_9001)
        .with("1286-area", Format::Gml, AREA_1286)
        .with("1264-area", Format::Gml, AREA_1264_POLYGON_ONLY)
        .with("broken", Format::Gml, "<gml:ProjectedCRS")
    }

    pub(crate) fn with(mut self, code: &str, format: Format, body: &str) -> Self {
        self.bodies.insert(key(code, format), body.to_string());
        self
    }

    pub(crate) fn requests_for(&self, code: &str, format: Format) -> usize {
        let wanted = key(code, format);
        self.log().iter().filter(|k| **k == wanted).count()
    }

    pub(crate) fn total_requests(&self) -> usize {
        self.log().len()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl Fetch for FixtureFetcher {
    async fn fetch(&self, code: &str, format: Format) -> EpsgResult<String> {
        let key = key(code, format);
        self.log().push(key.clone());
        self.bodies
            .get(&key)
            .cloned()
            .ok_or_else(|| EpsgError::HttpError(format!("HTTP 404 Not Found: {}", key)))
    }
}

/// Hands control back to the runtime before every response, so concurrent
/// callers interleave at the fetch.
pub(crate) struct YieldingFetcher(pub(crate) Arc<FixtureFetcher>);

#[async_trait]
impl Fetch for YieldingFetcher {
    async fn fetch(&self, code: &str, format: Format) -> EpsgResult<String> {
        tokio::task::yield_now().await;
        self.0.fetch(code, format).await
    }
}

fn key(code: &str, format: Format) -> String {
    format!("{}.{}", code, format.extension())
}

/// A resolver over the standard fixtures plus a handle to its request log.
pub(crate) fn fixture_resolver(policy: CachePolicy) -> (Resolver, Arc<FixtureFetcher>) {
    let fixtures = Arc::new(FixtureFetcher::new());
    let resolver = Resolver::with_fetcher(fixtures.clone(), policy);
    (resolver, fixtures)
}
