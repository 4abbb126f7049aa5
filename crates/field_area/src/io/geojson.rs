use geojson::{Feature, FeatureCollection, Geometry, Value};
use crate::{
    error::{FieldAreaError, Result},
    estimator::AreaEstimate,
    session::FieldSession,
    typed_geojson::{
        to_object, FieldBoundaryProperties, FieldGeoJson, SamplePointProperties, TypedFeature,
        TypedFeatureCollection, TypedGeoJson,
    },
    types::{Coordinate, Sample},
};

/// Closed `[longitude, latitude]` ring, as GeoJSON orders positions
fn closed_ring(coordinates: &[Coordinate]) -> Vec<Vec<f64>> {
    let mut ring: Vec<Vec<f64>> = coordinates
        .iter()
        .map(|c| vec![c.longitude, c.latitude])
        .collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    ring
}

impl AreaEstimate {
    pub fn boundary_properties(&self) -> FieldBoundaryProperties {
        FieldBoundaryProperties {
            hectare: self.report.hectare,
            acre: self.report.acre,
            gunta: self.report.gunta,
            sqft: self.report.sqft,
            area_m2: self.area_m2,
            perimeter_m: self.perimeter_m,
            sample_count: self.coordinates.len(),
        }
    }

    fn boundary_geometry(&self) -> Option<Geometry> {
        self.is_polygon()
            .then(|| Geometry::new(Value::Polygon(vec![closed_ring(&self.coordinates)])))
    }

    /// Export the boundary as typed GeoJSON
    pub fn to_typed_geojson(&self) -> Result<FieldGeoJson> {
        let mut features = Vec::new();
        if let Some(geometry) = self.boundary_geometry() {
            features.push(TypedFeature::new(Some(geometry), &self.boundary_properties())?);
        }

        Ok(TypedGeoJson::FeatureCollection(TypedFeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }))
    }

    /// Export the boundary polygon plus one point per vertex.
    ///
    /// `samples`, when given, must be the samples the estimate was computed
    /// from; their identifiers are attached to the point features.
    pub fn to_geojson_with_samples(&self, samples: Option<&[Sample]>) -> Result<FeatureCollection> {
        let mut features = Vec::new();

        if let Some(geometry) = self.boundary_geometry() {
            features.push(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: Some(geojson::feature::Id::String("boundary".to_string())),
                properties: Some(to_object(&self.boundary_properties())?),
                foreign_members: None,
            });
        }

        for (index, coordinate) in self.coordinates.iter().enumerate() {
            let properties = SamplePointProperties {
                index,
                identifier: samples
                    .and_then(|s| s.get(index))
                    .map(|s| s.identifier().to_string()),
            };
            let point = Value::Point(vec![coordinate.longitude, coordinate.latitude]);
            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(point)),
                id: Some(geojson::feature::Id::Number(serde_json::Number::from(index))),
                properties: Some(to_object(&properties)?),
                foreign_members: None,
            });
        }

        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert(
            "sample_count".to_string(),
            serde_json::Value::from(self.coordinates.len()),
        );

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        self.to_geojson_with_samples(None)
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let geojson = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    pub fn save_geojson(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}

impl FieldSession {
    /// GeoJSON of the current boundary with sample identifiers on the points
    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        self.collector()
            .last_estimate()
            .to_geojson_with_samples(Some(self.samples()))
    }
}

/// Read a stored boundary back into walk order.
///
/// Takes the first Polygon feature's exterior ring and drops its closing
/// vertex. Falls back to Point features in document order when there is no polygon.
pub fn coordinates_from_geojson_string(geojson_str: &str) -> Result<Vec<Coordinate>> {
    let collection: FeatureCollection = geojson_str.parse()?;

    let position = |p: &Vec<f64>| -> Result<Coordinate> {
        match p.as_slice() {
            [longitude, latitude, ..] => {
                let c = Coordinate::new(*latitude, *longitude);
                c.validate()?;
                Ok(c)
            }
            _ => Err(FieldAreaError::invalid_coordinate("position with fewer than two values")),
        }
    };

    for feature in &collection.features {
        if let Some(Value::Polygon(rings)) = feature.geometry.as_ref().map(|g| &g.value) {
            let Some(exterior) = rings.first() else { continue };
            let mut coordinates = exterior.iter().map(position).collect::<Result<Vec<_>>>()?;
            if coordinates.len() > 1 && coordinates.first() == coordinates.last() {
                coordinates.pop();
            }
            return Ok(coordinates);
        }
    }

    collection
        .features
        .iter()
        .filter_map(|f| match f.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(p)) => Some(p),
            _ => None,
        })
        .map(position)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::AreaEstimator;

    fn walk() -> Vec<Sample> {
        vec![
            Sample::new("file:///a.jpg", 18.5200, 73.8500),
            Sample::new("file:///b.jpg", 18.5200, 73.8510),
            Sample::new("file:///c.jpg", 18.5210, 73.8505),
        ]
    }

    #[test]
    fn test_geojson_export() {
        let samples = walk();
        let estimate = AreaEstimator::new().estimate_samples(&samples).unwrap();
        let collection = estimate
            .to_geojson_with_samples(Some(&samples))
            .expect("Should create GeoJSON");

        assert_eq!(collection.features.len(), 4);
        let boundary = &collection.features[0];
        match &boundary.geometry.as_ref().unwrap().value {
            Value::Polygon(rings) => {
                assert_eq!(rings[0].len(), 4);
                assert_eq!(rings[0][0], vec![73.85, 18.52]);
                assert_eq!(rings[0][0], rings[0][3]);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
        let props = boundary.properties.as_ref().unwrap();
        assert_eq!(props["hectare"], estimate.report.hectare);
        assert_eq!(props["sample_count"], 3);

        let point = collection.features[2].properties.as_ref().unwrap();
        assert_eq!(point["identifier"], "file:///b.jpg");
    }

    #[test]
    fn test_short_walk_has_no_polygon() {
        let estimate = AreaEstimator::new().estimate_samples(&walk()[..2]).unwrap();
        let collection = estimate.to_geojson().unwrap();
        assert_eq!(collection.features.len(), 2);
        assert!(estimate.to_typed_geojson().unwrap().report().is_none());
    }

    #[test]
    fn test_geojson_round_trip_coordinates() {
        let estimate = AreaEstimator::new().estimate_samples(&walk()).unwrap();
        let json = estimate.to_geojson_string().unwrap();
        let coordinates = coordinates_from_geojson_string(&json).expect("Should parse");
        assert_eq!(coordinates, estimate.coordinates);
    }

    #[test]
    fn test_points_only_geojson() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [73.85, 18.52]}, "properties": null},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [73.86, 18.53]}, "properties": null}
            ]
        }"#;
        let coordinates = coordinates_from_geojson_string(json).unwrap();
        assert_eq!(coordinates, vec![Coordinate::new(18.52, 73.85), Coordinate::new(18.53, 73.86)]);
    }

    #[test]
    fn test_invalid_position_rejected() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [73.85, 95.0]}, "properties": null}
            ]
        }"#;
        assert!(matches!(
            coordinates_from_geojson_string(json),
            Err(FieldAreaError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_typed_geojson_report() {
        let estimate = AreaEstimator::new().estimate_samples(&walk()).unwrap();
        let typed = estimate.to_typed_geojson().unwrap();
        assert_eq!(typed.report(), Some(estimate.report));
        assert_eq!(typed.as_feature_collection().map(|fc| fc.len()), Some(1));
    }

    #[test]
    fn test_session_geojson() {
        let mut session = FieldSession::new();
        for sample in walk() {
            session.add_sample(sample);
        }
        let collection = session.to_geojson().unwrap();
        let last = collection.features.last().unwrap().properties.as_ref().unwrap();
        assert_eq!(last["identifier"], "file:///c.jpg");
    }
}
