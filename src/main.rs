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

//! election-maps: render the Australian choropleth to HTML or SVG.
//!
//! Usage examples
//! --------------
//!
//! - Render the map from topologies under `public/` to stdout
//!   $ election-maps --source public
//!
//! - Standalone SVG at a custom size
//!   $ election-maps --source public --width 1280 --height 720 --format svg -o map.svg
//!
//! - Override any map setting with a JSON document
//!   $ election-maps --source public --config map.json
//!
//! Log output is controlled through `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "http")]
use election_maps::HttpLoader;
use election_maps::{
    init, init_with_config, AppContext, Error, FsLoader, MapConfig, ResourceLoader, Viewport,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Html,
    Svg,
}

#[derive(Debug, Parser)]
#[command(
    name = "election-maps",
    version,
    about = "Render the Australian area choropleth from TopoJSON files"
)]
struct Args {
    /// Viewport width (default: 800, or the config file's width)
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height (default: 600, or the config file's height)
    #[arg(long)]
    height: Option<f64>,

    /// Directory or base URL the topology locations are resolved against
    #[arg(short = 's', long = "source", default_value = ".")]
    source: String,

    /// JSON map configuration; missing fields keep their defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Html)]
    format: Format,
}

enum Source {
    Fs(FsLoader),
    #[cfg(feature = "http")]
    Http(HttpLoader),
}

impl Source {
    fn new(source: &str) -> anyhow::Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            Source::remote(source)
        } else {
            Ok(Source::Fs(FsLoader::new(source)))
        }
    }

    #[cfg(feature = "http")]
    fn remote(source: &str) -> anyhow::Result<Self> {
        Ok(Source::Http(HttpLoader::new(source)))
    }

    #[cfg(not(feature = "http"))]
    fn remote(source: &str) -> anyhow::Result<Self> {
        anyhow::bail!("{} is a URL; rebuild with the `http` feature to fetch it", source)
    }
}

impl ResourceLoader for Source {
    async fn fetch(&self, location: &str) -> Result<String, Error> {
        match self {
            Source::Fs(loader) => loader.fetch(location).await,
            #[cfg(feature = "http")]
            Source::Http(loader) => loader.fetch(location).await,
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<MapConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let loader = Source::new(&args.source)?;

    let app = match args.config {
        Some(ref path) => {
            let mut config = read_config(path)?;
            config.width = args.width.unwrap_or(config.width);
            config.height = args.height.unwrap_or(config.height);
            let ctx = AppContext::new(Viewport::new(config.width, config.height));
            init_with_config(&ctx, config, &loader).await
        }
        None => {
            let defaults = MapConfig::default();
            let ctx = AppContext::new(Viewport::new(
                args.width.unwrap_or(defaults.width),
                args.height.unwrap_or(defaults.height),
            ));
            init(&ctx, &loader).await
        }
    };
    if !app.map().is_loaded() {
        log::warn!("the national topology did not load; writing an empty map");
    }

    let document = match args.format {
        Format::Html => app.to_html(),
        Format::Svg => app.to_svg(),
    };
    match args.output {
        Some(path) => std::fs::write(&path, document)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", document),
    }
    Ok(())
}
