pub mod artwork;
pub mod cancel;
pub mod config;
pub mod recommendations;
pub mod testing;

pub use artwork::{
    select_credential, ArtworkCatalog, ArtworkError, Credential, CredentialConfig,
    EnrichmentState, PosterLookup, TmdbPosterClient,
};
pub use cancel::CancellationToken;
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, ArtworkConfig,
    Config, ConfigError, RecommenderConfig, SanitizedConfig,
};
pub use recommendations::{
    parse_title_list, Algorithm, HttpMethod, HttpRecommendationClient, ParamValue, Params,
    QueryClient, QueryState, RecommendationError, RecommendationItem, RecommendationRequest,
    RecommendationService, RequestDescription,
};
