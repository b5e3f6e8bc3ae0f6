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

//! The national map and the frame its sub-region layers share.

use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures_util::future::join_all;
use geojson::{Feature, FeatureCollection};
use log::debug;
use serde::Deserialize;

use crate::layer::GeometrySlot;
use crate::loader::{load_features, ResourceLoader};
use crate::projection::Projection;
use crate::svg::Element;
use crate::{Error, FeatureLayer, PathGenerator};

const REGIONS: [&str; 8] = ["qld", "nsw", "act", "nt", "sa", "tas", "vic", "wa"];

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    /// Location of the national topology.
    pub topology_source: String,
    /// `(longitude, latitude)` brought to the middle of the map.
    pub focus: (f64, f64),
    pub margin: f64,
    pub fill: String,
    /// Sub-region topologies, drawn in this order.
    pub regions: Vec<String>,
    pub point_radius: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            width: 800.0,
            height: 600.0,
            topology_source: "./topo/australia.json".to_owned(),
            focus: (133.15399233370441, -24.656909465155994),
            margin: 64.0,
            fill: "#ddd".to_owned(),
            regions: REGIONS
                .iter()
                .map(|region| format!("topo/{}.topo.json", region))
                .collect(),
            point_radius: 2.0,
        }
    }
}

impl MapConfig {
    /// The rectangle features are fitted into.
    pub fn extent(&self) -> [[f64; 2]; 2] {
        let m = self.margin;
        [[m, m], [self.width - m, self.height - m]]
    }
}

/// Everything derived from the national geometry.
#[derive(Debug)]
struct Frame {
    path: Rc<PathGenerator>,
    layers: Vec<FeatureLayer>,
}

impl Frame {
    fn fit(config: &MapConfig, national: &FeatureCollection) -> Result<Frame, Error> {
        let (lon, lat) = config.focus;
        let projection = Projection::mercator()
            .rotate([-lon, -lat])
            .fit_extent(config.extent(), national)?;
        let path = Rc::new(PathGenerator::new(projection).with_point_radius(config.point_radius));
        let layers = config
            .regions
            .iter()
            .map(|location| FeatureLayer::new(location.as_str(), Rc::clone(&path)))
            .collect();
        Ok(Frame { path, layers })
    }

    fn activate<'a, L>(&self, loader: &'a L) -> Vec<impl Future<Output = ()> + 'a>
    where
        L: ResourceLoader,
    {
        self.layers.iter().map(|layer| layer.activate(loader)).collect()
    }
}

/// Loads the national topology, fits the projection to it and hosts one
/// [`FeatureLayer`] per configured region.
#[derive(Debug)]
pub struct MapProjector {
    config: MapConfig,
    slot: Rc<RefCell<GeometrySlot>>,
    frame: Rc<RefCell<Option<Frame>>>,
}

impl MapProjector {
    pub fn new(config: MapConfig) -> Self {
        MapProjector {
            config,
            slot: Rc::default(),
            frame: Rc::default(),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.slot.borrow().active
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.borrow().geometry.is_some()
    }

    pub fn geometry(&self) -> Option<Ref<'_, FeatureCollection>> {
        Ref::filter_map(self.slot.borrow(), |s| s.geometry.as_ref()).ok()
    }

    /// The generator every layer draws with, once the projection is fitted.
    pub fn path_generator(&self) -> Option<Rc<PathGenerator>> {
        self.frame.borrow().as_ref().map(|frame| Rc::clone(&frame.path))
    }

    /// Sub-region layers; empty until the national geometry is loaded.
    pub fn layers(&self) -> Ref<'_, [FeatureLayer]> {
        Ref::map(self.frame.borrow(), |frame| match frame {
            Some(frame) => frame.layers.as_slice(),
            None => &[],
        })
    }

    /// Load the national topology, then every sub-region concurrently.
    ///
    /// The returned future keeps only weak handles on the map; if the map is
    /// dropped or deactivated before a load finishes, its result is
    /// discarded.
    pub fn activate<'a, L>(&self, loader: &'a L) -> impl Future<Output = ()> + 'a
    where
        L: ResourceLoader,
    {
        let loaded = GeometrySlot::activate(&self.slot);
        let slot = Rc::downgrade(&self.slot);
        let frame = Rc::downgrade(&self.frame);
        let config = self.config.clone();
        async move {
            let source = config.topology_source.as_str();
            if loaded {
                debug!("{}: already loaded, not fetching again", source);
            } else {
                let fitted = load_features(loader, source).await.and_then(|national| {
                    let fitted = Frame::fit(&config, &national)?;
                    Ok((national, fitted))
                });
                let (result, fitted) = match fitted {
                    Ok((national, fitted)) => (Ok(national), Some(fitted)),
                    Err(e) => (Err(e), None),
                };
                if !GeometrySlot::settle(&slot, source, result) {
                    return;
                }
                if let (Some(frame), Some(fitted)) = (frame.upgrade(), fitted) {
                    *frame.borrow_mut() = Some(fitted);
                }
            }

            let Some(frame) = frame.upgrade() else {
                return;
            };
            let activations = frame
                .borrow()
                .as_ref()
                .map(|frame| frame.activate(loader))
                .unwrap_or_default();
            drop(frame);
            join_all(activations).await;
        }
    }

    /// Stop accepting results, for the map and all of its layers.
    pub fn deactivate(&self) {
        self.slot.borrow_mut().active = false;
        if let Some(ref frame) = *self.frame.borrow() {
            frame.layers.iter().for_each(FeatureLayer::deactivate);
        }
    }

    /// The `<svg>` element alone. It is empty until the national geometry
    /// is loaded.
    pub fn render_svg(&self) -> Element {
        let svg = Element::new("svg")
            .attr("class", "svg")
            .attr("width", self.config.width)
            .attr("height", self.config.height);
        let slot = self.slot.borrow();
        let frame = self.frame.borrow();
        let (Some(national), Some(frame)) = (slot.geometry.as_ref(), frame.as_ref()) else {
            return svg;
        };
        svg.child(
            Element::new("g").attr("class", "group").children(
                national
                    .features
                    .iter()
                    .map(|feature| self.render_feature(&frame.path, feature)),
            ),
        )
        .child(Element::new("g").children(frame.layers.iter().filter_map(FeatureLayer::render)))
    }

    pub fn render(&self) -> Element {
        Element::new("div")
            .attr("class", "root")
            .child(self.render_svg())
    }

    fn render_feature(&self, path: &PathGenerator, feature: &Feature) -> Element {
        let mut element = Element::new("path");
        if let Some(d) = path.path(feature) {
            element = element.attr("d", d);
        }
        element
            .attr("class", "feature")
            .attr("fill", &self.config.fill)
            .attr("stroke", "white")
            .attr("stroke-width", 0.5)
    }
}
