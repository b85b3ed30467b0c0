use crate::core::geo::TileCoord;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// A named raster tile service described by a URL template.
///
/// The template understands `{s}` (subdomain shard), `{z}`, `{x}`, `{y}` and
/// `{r}` (retina suffix, empty unless retina tiles are requested).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileProvider {
    pub id: String,
    pub name: String,
    url_template: String,
    pub attribution: String,
    pub subdomains: Vec<String>,
}

impl TileProvider {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url_template: impl Into<String>,
        attribution: impl Into<String>,
    ) -> Result<Self> {
        let url_template = url_template.into();
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !url_template.contains(placeholder) {
                return Err(MapError::InvalidTemplate(format!(
                    "{url_template} is missing {placeholder}"
                )));
            }
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            url_template,
            attribution: attribution.into(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        })
    }

    pub fn with_subdomains<I, S>(mut self, subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomains = subdomains.into_iter().map(Into::into).collect();
        self
    }

    /// Shard for a tile: `|x + y| mod len`, or an empty string without shards
    pub fn subdomain(&self, coord: TileCoord) -> &str {
        if self.subdomains.is_empty() {
            return "";
        }
        let idx = ((coord.x as u64 + coord.y as u64) % self.subdomains.len() as u64) as usize;
        &self.subdomains[idx]
    }

    /// Fills the template for `coord`
    pub fn tile_url(&self, coord: TileCoord, retina: bool) -> String {
        self.url_template
            .replace("{s}", self.subdomain(coord))
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{r}", if retina { "@2x" } else { "" })
    }
}

impl TileSource for TileProvider {
    fn url(&self, coord: TileCoord) -> String {
        self.tile_url(coord, false)
    }
}

/// The set of base maps a user can switch between, in menu order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileCatalog {
    providers: Vec<TileProvider>,
}

impl TileCatalog {
    pub fn new(providers: Vec<TileProvider>) -> Result<Self> {
        if providers.is_empty() {
            return Err(MapError::Config(
                "a tile catalog needs at least one provider".to_string(),
            ));
        }
        Ok(Self { providers })
    }

    /// Dark, Light, Street, Satellite and Terrain base maps
    pub fn builtin() -> Self {
        let providers = [
            (
                "cartodb-dark",
                "Dark",
                "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
                "© OpenStreetMap © CARTO",
            ),
            (
                "cartodb-light",
                "Light",
                "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
                "© OpenStreetMap © CARTO",
            ),
            (
                "osm",
                "Street",
                "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                "© OpenStreetMap",
            ),
            (
                "satellite",
                "Satellite",
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                "© Esri, DigitalGlobe",
            ),
            (
                "terrain",
                "Terrain",
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Terrain_Base/MapServer/tile/{z}/{y}/{x}",
                "© Esri",
            ),
        ];

        let providers = providers
            .into_iter()
            .filter_map(|(id, name, url, attribution)| {
                TileProvider::new(id, name, url, attribution).ok()
            })
            .collect();
        Self { providers }
    }

    pub fn get(&self, id: &str) -> Option<&TileProvider> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> &TileProvider {
        &self.providers[0]
    }

    pub fn providers(&self) -> &[TileProvider] {
        &self.providers
    }

    /// Adds a provider or replaces the one with the same id
    pub fn insert(&mut self, provider: TileProvider) {
        match self.providers.iter_mut().find(|p| p.id == provider.id) {
            Some(existing) => *existing = provider,
            None => self.providers.push(provider),
        }
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
