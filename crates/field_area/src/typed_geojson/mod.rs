use std::marker::PhantomData;
use serde::{Deserialize, Serialize};
use geojson::{Geometry, JsonObject};
use ts_rs::TS;
use schemars::JsonSchema;

use crate::{error::Result, types::AreaReport};

/// Serialize a properties value into a GeoJSON property map
pub(crate) fn to_object<T: Serialize>(value: &T) -> Result<JsonObject> {
    Ok(serde_json::to_value(value)?.as_object().cloned().unwrap_or_default())
}

/// Properties of the boundary polygon feature
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[ts(export)]
#[schemars(description = "Area and extent of a surveyed field boundary")]
pub struct FieldBoundaryProperties {
    #[schemars(description = "Area in hectares, 4 decimals")]
    pub hectare: f64,
    #[schemars(description = "Area in acres, 4 decimals")]
    pub acre: f64,
    #[schemars(description = "Area in guntas, 4 decimals")]
    pub gunta: f64,
    #[schemars(description = "Area in square feet, 2 decimals")]
    pub sqft: f64,
    #[schemars(description = "Unrounded area in square meters")]
    pub area_m2: f64,
    #[schemars(description = "Boundary length in meters")]
    pub perimeter_m: f64,
    #[schemars(description = "Number of boundary samples")]
    pub sample_count: usize,
}

impl FieldBoundaryProperties {
    pub fn report(&self) -> AreaReport {
        AreaReport {
            hectare: self.hectare,
            acre: self.acre,
            gunta: self.gunta,
            sqft: self.sqft,
        }
    }
}

/// Properties of a per-sample point feature
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[ts(export)]
pub struct SamplePointProperties {
    pub index: usize,
    pub identifier: Option<String>,
}

/// Type alias for field boundary GeoJSON
pub type FieldGeoJson = TypedGeoJson<FieldBoundaryProperties>;

/// A typed GeoJSON Feature that is generic over its properties.
#[derive(Serialize, Deserialize, Debug)]
pub struct TypedFeature<P> {
    #[serde(flatten)]
    pub feature: geojson::Feature,
    #[serde(skip)]
    _properties: PhantomData<P>,
}

impl<P> TypedFeature<P>
where
    for<'de> P: Serialize + Deserialize<'de>,
{
    pub fn new(geometry: Option<Geometry>, properties: &P) -> Result<Self> {
        let feature = geojson::Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(to_object(properties)?),
            foreign_members: None,
        };
        Ok(Self {
            feature,
            _properties: PhantomData,
        })
    }

    /// Tries to access the typed properties of the feature.
    pub fn properties(&self) -> Option<P> {
        self.feature.properties.as_ref().and_then(|p| {
            serde_json::from_value(serde_json::Value::Object(p.clone())).ok()
        })
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TypedFeatureCollection<P> {
    pub bbox: Option<Vec<f64>>,
    pub features: Vec<TypedFeature<P>>,
    pub foreign_members: Option<JsonObject>,
}

impl<P> TypedFeatureCollection<P> {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub enum TypedGeoJson<P> {
    Geometry(Geometry),
    Feature(TypedFeature<P>),
    FeatureCollection(TypedFeatureCollection<P>),
}

impl<P> TypedGeoJson<P> {
    pub fn as_feature_collection(&self) -> Option<&TypedFeatureCollection<P>> {
        match self {
            TypedGeoJson::FeatureCollection(fc) => Some(fc),
            _ => None,
        }
    }
}

impl FieldGeoJson {
    /// Boundary properties of the first feature, if any
    pub fn boundary(&self) -> Option<FieldBoundaryProperties> {
        match self {
            TypedGeoJson::Feature(feature) => feature.properties(),
            TypedGeoJson::FeatureCollection(fc) => {
                fc.features.first().and_then(TypedFeature::properties)
            }
            TypedGeoJson::Geometry(_) => None,
        }
    }

    pub fn report(&self) -> Option<AreaReport> {
        self.boundary().map(|b| b.report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Value;

    #[test]
    fn test_typed_feature_properties() {
        let properties = SamplePointProperties {
            index: 2,
            identifier: Some("file:///c.jpg".into()),
        };
        let geometry = Geometry::new(Value::Point(vec![73.85, 18.52]));
        let feature = TypedFeature::new(Some(geometry), &properties).expect("Should serialize");

        let raw = feature.feature.properties.as_ref().expect("Should carry properties");
        assert_eq!(raw["index"], 2);
        assert_eq!(feature.properties(), Some(properties));
    }

    #[test]
    fn test_non_object_properties_are_empty() {
        let feature = TypedFeature::<u32>::new(None, &7).unwrap();
        assert_eq!(feature.feature.properties, Some(JsonObject::new()));
        assert_eq!(feature.properties(), None);
    }
}
