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

//! Sub-region layer filled by area.

use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use geojson::{Feature, FeatureCollection};
use log::{debug, info, warn};

use crate::loader::{load_features, ResourceLoader};
use crate::svg::Element;
use crate::{Error, LinearColorScale, PathGenerator};

/// Feature property the fill color is derived from.
pub const AREA_PROPERTY: &str = "Area_SqKm";

const FILL_OPACITY: f64 = 0.4;
const STROKE: &str = "rgba(255, 255, 255, 0.2)";
const STROKE_WIDTH: f64 = 0.9;

/// Geometry owned by one rendering unit. It goes from empty to loaded once
/// and is only written by the unit's own load.
#[derive(Debug, Default)]
pub(crate) struct GeometrySlot {
    pub(crate) active: bool,
    pub(crate) geometry: Option<FeatureCollection>,
}

impl GeometrySlot {
    /// Mark the slot active; returns `true` when it already holds geometry.
    pub(crate) fn activate(slot: &RefCell<GeometrySlot>) -> bool {
        let mut slot = slot.borrow_mut();
        slot.active = true;
        slot.geometry.is_some()
    }

    /// Store the outcome of a load started by `activate`. Nothing is written
    /// if the unit was dropped or deactivated meanwhile. Returns whether the
    /// geometry was stored.
    pub(crate) fn settle(
        slot: &Weak<RefCell<GeometrySlot>>,
        location: &str,
        result: Result<FeatureCollection, Error>,
    ) -> bool {
        let Some(slot) = slot.upgrade() else {
            debug!("{}: unit dropped before the load finished, ignoring", location);
            return false;
        };
        let mut slot = slot.borrow_mut();
        if !slot.active {
            debug!("{}: unit deactivated before the load finished, ignoring", location);
            return false;
        }
        if slot.geometry.is_some() {
            debug!("{}: already loaded, ignoring", location);
            return false;
        }
        match result {
            Ok(geometry) => {
                info!("loaded {} ({} features)", location, geometry.features.len());
                slot.geometry = Some(geometry);
                true
            }
            Err(e) => {
                warn!("unable to load {}: {}", location, e);
                false
            }
        }
    }
}

/// One sub-region topology drawn with a shared path generator.
#[derive(Debug)]
pub struct FeatureLayer {
    location: String,
    path: Rc<PathGenerator>,
    scale: LinearColorScale,
    slot: Rc<RefCell<GeometrySlot>>,
}

impl FeatureLayer {
    pub fn new(location: impl Into<String>, path: Rc<PathGenerator>) -> Self {
        FeatureLayer {
            location: location.into(),
            path,
            scale: LinearColorScale::area(),
            slot: Rc::default(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn path_generator(&self) -> &Rc<PathGenerator> {
        &self.path
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

    /// Start loading the topology. The returned future only keeps a weak
    /// handle on the layer, so it may outlive it.
    pub fn activate<'a, L>(&self, loader: &'a L) -> impl Future<Output = ()> + 'a
    where
        L: ResourceLoader,
    {
        let loaded = GeometrySlot::activate(&self.slot);
        let slot = Rc::downgrade(&self.slot);
        let location = self.location.clone();
        async move {
            if loaded {
                debug!("{}: already loaded, not fetching again", location);
                return;
            }
            let result = load_features(loader, &location).await;
            GeometrySlot::settle(&slot, &location, result);
        }
    }

    /// Results of loads still in flight are dropped from now on.
    pub fn deactivate(&self) {
        self.slot.borrow_mut().active = false;
    }

    /// Fill color for `feature`, from its area property.
    pub fn fill(&self, feature: &Feature) -> String {
        let area = feature
            .property(AREA_PROPERTY)
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN);
        self.scale.color(area)
    }

    /// `None` until the geometry is loaded.
    pub fn render(&self) -> Option<Element> {
        let geometry = self.geometry()?;
        Some(
            Element::new("g").attr("class", "group").children(
                geometry
                    .features
                    .iter()
                    .map(|feature| self.render_feature(feature)),
            ),
        )
    }

    fn render_feature(&self, feature: &Feature) -> Element {
        let mut path = Element::new("path");
        if let Some(d) = self.path.path(feature) {
            path = path.attr("d", d);
        }
        path.attr("class", "feature")
            .attr("fill", self.fill(feature))
            .attr("fill-opacity", FILL_OPACITY)
            .attr("stroke", STROKE)
            .attr("stroke-width", STROKE_WIDTH)
    }
}
