//! Renderer identifiers and highlight defaults shared by every preset.
//! Keeping them in a single place makes it easier to point the map at another account or dataset.

/// Custom style published for the boundaries map.
pub const DEFAULT_STYLE_URL: &str = "mapbox://styles/pfalero/cmh3l072w001201qpegcy1227";

/// Core style that needs no custom-style access; handy when debugging token scopes.
pub const LIGHT_STYLE_URL: &str = "mapbox://styles/mapbox/light-v11";

/// Province / state boundary tileset.
pub const ADM1_TILESET_URL: &str = "mapbox://mapbox.boundaries-adm1-v4";

/// County / admin-2 boundary tileset.
pub const ADM2_TILESET_URL: &str = "mapbox://mapbox.boundaries-adm2-v4";

pub const ADM1_SOURCE_LAYER: &str = "boundaries_admin_1";
pub const ADM2_SOURCE_LAYER: &str = "boundaries_admin_2";

/// Feature property promoted to the per-feature id.
pub const PROMOTE_ID_FIELD: &str = "mapbox_id";

/// Feature property carrying the worldview tag ("all" or a list of codes).
pub const WORLDVIEW_PROPERTY: &str = "worldview";

/// Feature property carrying the ISO 3166-1 alpha-2 country code.
pub const COUNTRY_PROPERTY: &str = "iso_3166_1";

/// Feature-state key toggled by the hover handlers.
pub const HOVER_STATE_KEY: &str = "hover";

pub const HIGHLIGHT_COLOR: &str = "#FF9900";
pub const HIT_FILL_COLOR: &str = "#000";

/// Initial extent `(south, west, north, east)` covering North America.
pub const NORTH_AMERICA_EXTENT: (f64, f64, f64, f64) = (15.0, -170.0, 75.0, -40.0);

/// DOM id of the map container element.
pub const DEFAULT_CONTAINER_ID: &str = "map";

/// DOM id of the error banner element.
pub const ERROR_BANNER_ID: &str = "err";

/// Public tokens carry this prefix; secret tokens must never ship to a browser.
pub const PUBLIC_TOKEN_PREFIX: &str = "pk.";
