pub mod geojson;

pub use self::geojson::coordinates_from_geojson_string;
