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

//! Fetching topology resources by location.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use geojson::FeatureCollection;

use crate::{feature_collection, Error, TopoJson};

/// Source of topology documents, addressed by the relative locations the
/// map is configured with.
#[allow(async_fn_in_trait)]
pub trait ResourceLoader {
    async fn fetch(&self, location: &str) -> Result<String, Error>;
}

/// Fetch `location`, decode it and convert its first object.
pub async fn load_features<L>(loader: &L, location: &str) -> Result<FeatureCollection, Error>
where
    L: ResourceLoader,
{
    let text = loader.fetch(location).await?;
    let topology = text.parse::<TopoJson>()?.into_topology()?;
    feature_collection(&topology)
}

/// Reads locations relative to a base directory.
#[derive(Clone, Debug)]
pub struct FsLoader {
    base: PathBuf,
}

impl FsLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        FsLoader { base: base.into() }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let relative = location.trim_start_matches("./");
        self.base.join(Path::new(relative))
    }
}

impl ResourceLoader for FsLoader {
    async fn fetch(&self, location: &str) -> Result<String, Error> {
        let path = self.resolve(location);
        log::debug!("reading {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::Fetch {
                location: location.to_owned(),
                reason: e.to_string(),
            })
    }
}

/// Serves documents registered up front; anything else is not found.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    resources: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        MemoryLoader::default()
    }

    pub fn with(mut self, location: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(location, body);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, body: impl Into<String>) {
        self.resources.insert(location.into(), body.into());
    }
}

impl ResourceLoader for MemoryLoader {
    async fn fetch(&self, location: &str) -> Result<String, Error> {
        self.resources
            .get(location)
            .cloned()
            .ok_or_else(|| Error::Fetch {
                location: location.to_owned(),
                reason: "not found".to_owned(),
            })
    }
}

/// Fetches locations relative to a base URL.
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct HttpLoader {
    client: reqwest::Client,
    base: String,
}

#[cfg(feature = "http")]
impl HttpLoader {
    pub fn new(base: impl Into<String>) -> Self {
        HttpLoader {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }

    pub fn url(&self, location: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            location.trim_start_matches("./")
        )
    }
}

#[cfg(feature = "http")]
impl ResourceLoader for HttpLoader {
    async fn fetch(&self, location: &str) -> Result<String, Error> {
        let fetch_error = |e: reqwest::Error| Error::Fetch {
            location: location.to_owned(),
            reason: e.to_string(),
        };
        let url = self.url(location);
        log::debug!("GET {}", url);
        self.client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?
            .text()
            .await
            .map_err(fetch_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn memory_loader_serves_registered_documents() {
        let loader = fixtures::loader();
        let fc = load_features(&loader, "topo/qld.topo.json").await.unwrap();
        assert_eq!(fc.features.len(), 2);
    }

    #[tokio::test]
    async fn unknown_location_is_a_fetch_error() {
        let loader = MemoryLoader::new();
        assert_eq!(
            load_features(&loader, "topo/missing.json").await,
            Err(Error::Fetch {
                location: "topo/missing.json".to_string(),
                reason: "not found".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn decode_failures_surface_as_errors() {
        let loader = MemoryLoader::new()
            .with("bad.json", "{\"type\": \"Topology\", \"arcs\": [")
            .with("empty.json", fixtures::NO_OBJECTS)
            .with("point.json", "{\"type\":\"Point\",\"coordinates\":[0,0]}");
        assert_eq!(load_features(&loader, "bad.json").await, Err(Error::MalformedJson));
        assert_eq!(
            load_features(&loader, "empty.json").await,
            Err(Error::TopologyHasNoObjects)
        );
        assert_eq!(
            load_features(&loader, "point.json").await,
            Err(Error::ExpectedTopology)
        );
    }

    #[tokio::test]
    async fn fs_loader_reads_relative_to_base() {
        let dir = std::env::temp_dir().join(format!("election-maps-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("topo")).unwrap();
        std::fs::write(dir.join("topo/tas.topo.json"), fixtures::TAS).unwrap();

        let loader = FsLoader::new(&dir);
        assert_eq!(loader.resolve("./topo/tas.topo.json"), dir.join("topo/tas.topo.json"));
        let fc = load_features(&loader, "./topo/tas.topo.json").await.unwrap();
        assert_eq!(fc.features.len(), 1);
        assert!(matches!(
            load_features(&loader, "topo/nope.json").await,
            Err(Error::Fetch { .. })
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
