// Copyright 2018 The GeoRust Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Choropleth maps of Australia rendered to SVG.
//!
//! Topology files are fetched through a [`ResourceLoader`], decoded from
//! [TopoJSON](https://github.com/topojson/topojson-specification) into GeoJSON
//! feature collections, projected with a rotated Mercator projection fitted to
//! the viewport and written out as SVG paths.
//!
//! The map is made of two rendering units:
//!
//! * [`MapProjector`] loads the national outline, derives the shared
//!   [`PathGenerator`] and owns one [`FeatureLayer`] per sub-region.
//! * [`FeatureLayer`] loads its own topology and fills each feature through a
//!   [`LinearColorScale`] over its `Area_SqKm` property.
//!
//! ```no_run
//! use election_maps::{init, AppContext, FsLoader, Viewport};
//!
//! # async fn run() {
//! let ctx = AppContext::new(Viewport::new(1280.0, 720.0));
//! let loader = FsLoader::new("public");
//! let app = init(&ctx, &loader).await;
//! println!("{}", app.to_html());
//! # }
//! ```

/// Bounding Boxes
///
/// [TopoJSON Format Specification § 3](https://github.com/topojson/topojson-specification#3-bounding-boxes)
pub type Bbox = Vec<f64>;

/// Positions
///
/// [TopoJSON Format Specification § 2.1.1](https://github.com/topojson/topojson-specification#211-positions)
pub type Position = Vec<f64>;

/// Arcs
///
/// [TopoJSON Format Specification § 2.1.3](https://github.com/topojson/topojson-specification#213-arcs)
pub type Arc = Vec<Position>;

/// Arc Indexes
///
/// [TopoJSON Format Specification § 2.1.4](https://github.com/topojson/topojson-specification#214-arc-indexes)
pub type ArcIndexes = Vec<i32>;

/// Quantization transform of a Topology
///
/// [TopoJSON Format Specification § 2.1.2](https://github.com/topojson/topojson-specification#212-transforms)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParams {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

mod json {
    pub use serde::{Deserialize, Deserializer, Serialize, Serializer};
    pub use serde_json::{Map, Value as JsonValue};
    pub type JsonObject = Map<String, JsonValue>;
}

pub mod app;
pub mod color;
mod error;
mod geometry;
pub mod layer;
pub mod loader;
pub mod map;
pub mod path;
pub mod projection;
pub mod svg;
mod to_geojson;
mod topojson;
mod topology;
mod util;

#[cfg(test)]
mod fixtures;

pub use crate::app::{init, init_with_config, AppContext, MountedApp, Viewport};
pub use crate::color::{LinearColorScale, Rgb};
pub use crate::error::Error;
pub use crate::geometry::{Geometry, NamedGeometry, Value};
pub use crate::layer::FeatureLayer;
#[cfg(feature = "http")]
pub use crate::loader::HttpLoader;
pub use crate::loader::{load_features, FsLoader, MemoryLoader, ResourceLoader};
pub use crate::map::{MapConfig, MapProjector};
pub use crate::path::PathGenerator;
pub use crate::projection::Projection;
pub use crate::to_geojson::{feature_collection, to_geojson};
pub use crate::topojson::TopoJson;
pub use crate::topology::Topology;
