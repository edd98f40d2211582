use std::collections::HashMap;

use egui::Context;
use walkers::{
    sources::{Attribution, TileSource},
    HttpOptions, HttpTiles, TileId, Tiles,
};

use crate::map::widget::{self, Provider, TileLayer};

const MAPBOX_ATTRIBUTION: widget::Attribution = widget::Attribution {
    text: "© Mapbox © OpenStreetMap",
    url: "https://www.mapbox.com/about/maps/",
};

/// Tile source that fills in the url template of a [`TileLayer`].
#[derive(Debug, Clone)]
pub struct TemplateSource {
    layer: TileLayer,
}

impl TemplateSource {
    pub fn new(layer: TileLayer) -> Self {
        Self { layer }
    }
}

impl TileSource for TemplateSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.layer.tile_url(tile_id.zoom, tile_id.x, tile_id.y)
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: self.layer.attribution.text,
            url: self.layer.attribution.url,
            logo_light: None,
            logo_dark: None,
        }
    }

    fn tile_size(&self) -> u32 {
        self.layer.tile_size
    }
}

/// Returns the HTTP options for the tile downloads. Tiles are never cached on disk.
fn http_options() -> HttpOptions {
    HttpOptions {
        cache: None,
        ..Default::default()
    }
}

fn mapbox_layer(provider: Provider, style: &str, suffix: &str, token: &str) -> TileLayer {
    TileLayer {
        provider,
        url_template: format!(
            "https://api.mapbox.com/styles/v1/mapbox/{}/tiles/512/{{z}}/{{x}}/{{y}}{}?access_token={}",
            style, suffix, token
        ),
        tile_size: 512,
        attribution: MAPBOX_ATTRIBUTION,
    }
}

/// Returns the layers the user can pick from.
///
/// # Arguments
/// * `mapbox_access_token` - Enables the Mapbox layers when present.
pub fn tile_layers(mapbox_access_token: Option<&str>) -> Vec<TileLayer> {
    let mut layers = vec![TileLayer::open_street_map()];
    if let Some(token) = mapbox_access_token {
        layers.push(mapbox_layer(
            Provider::MapboxStreets,
            "streets-v12",
            "",
            token,
        ));
        layers.push(mapbox_layer(
            Provider::MapboxSatellite,
            "satellite-v9",
            "@2x",
            token,
        ));
    }
    layers
}

/// Returns a downloader for `layer`.
pub fn http_tiles(layer: &TileLayer, egui_ctx: Context) -> Box<dyn Tiles + Send> {
    Box::new(HttpTiles::with_options(
        TemplateSource::new(layer.clone()),
        http_options(),
        egui_ctx,
    ))
}

/// Returns the downloaders of `base` and of every other available layer.
///
/// # Arguments
/// * `egui_ctx` - The Egui context.
/// * `base` - The layer the map starts with; it wins over a built-in layer of the same provider.
/// * `mapbox_access_token` - Enables the Mapbox layers when present.
pub fn providers(
    egui_ctx: Context,
    base: &TileLayer,
    mapbox_access_token: Option<&str>,
) -> HashMap<Provider, (TileLayer, Box<dyn Tiles + Send>)> {
    let mut providers: HashMap<Provider, (TileLayer, Box<dyn Tiles + Send>)> = HashMap::default();

    for layer in tile_layers(mapbox_access_token) {
        if layer.provider != base.provider {
            let tiles = http_tiles(&layer, egui_ctx.to_owned());
            providers.insert(layer.provider, (layer, tiles));
        }
    }
    providers.insert(base.provider, (base.clone(), http_tiles(base, egui_ctx)));

    providers
}
