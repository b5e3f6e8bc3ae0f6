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

//! Application entry point: mounting the map into a page.

use log::info;

use crate::loader::ResourceLoader;
use crate::svg::Element;
use crate::{MapConfig, MapProjector};

pub const PROJECT_NAME: &str = "interactive-election-maps";

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

/// Process-wide settings, built once at startup and passed explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct AppContext {
    viewport: Viewport,
}

impl AppContext {
    pub fn new(viewport: Viewport) -> Self {
        AppContext { viewport }
    }

    pub fn project_name(&self) -> &'static str {
        PROJECT_NAME
    }

    /// Attribute marking the element the app is mounted on.
    pub fn mount_attribute(&self) -> String {
        format!("data-{}-root", PROJECT_NAME)
    }

    pub fn mount_selector(&self) -> String {
        format!("[{}]", self.mount_attribute())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The map configuration `init` mounts: the whole viewport, the national
    /// topology and a light grey fill.
    pub fn map_config(&self) -> MapConfig {
        MapConfig {
            width: self.viewport.width,
            height: self.viewport.height,
            topology_source: "./topo/australia.json".to_owned(),
            fill: "#d1d1d1".to_owned(),
            ..MapConfig::default()
        }
    }
}

/// Build the map for `ctx`, load everything through `loader` and mount it.
pub async fn init<L>(ctx: &AppContext, loader: &L) -> MountedApp
where
    L: ResourceLoader,
{
    init_with_config(ctx, ctx.map_config(), loader).await
}

/// Like [`init`], with a caller supplied map configuration.
pub async fn init_with_config<L>(ctx: &AppContext, config: MapConfig, loader: &L) -> MountedApp
where
    L: ResourceLoader,
{
    info!(
        "mounting {} at {} ({}x{})",
        ctx.project_name(),
        ctx.mount_selector(),
        config.width,
        config.height
    );
    let map = MapProjector::new(config);
    map.activate(loader).await;
    MountedApp {
        mount_attribute: ctx.mount_attribute(),
        map,
    }
}

/// A map attached to its mount point.
#[derive(Debug)]
pub struct MountedApp {
    mount_attribute: String,
    map: MapProjector,
}

impl MountedApp {
    pub fn map(&self) -> &MapProjector {
        &self.map
    }

    pub fn render(&self) -> Element {
        Element::new("div")
            .flag(self.mount_attribute.as_str())
            .child(
                Element::new("div")
                    .attr("class", "geo-map")
                    .child(self.map.render()),
            )
    }

    /// A complete HTML document holding the mounted tree.
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            PROJECT_NAME,
            self.render()
        )
    }

    /// The map as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        self.map
            .render_svg()
            .attr("xmlns", SVG_NAMESPACE)
            .to_string()
    }

    /// Detach the map; loads still in flight are ignored.
    pub fn unmount(&self) {
        self.map.deactivate();
    }
}
