pub mod auth;
pub mod blackhole;
pub mod config;
pub mod filter;
pub mod matching;
pub mod metrics;
pub mod orchestrator;
pub mod release;
pub mod searcher;
pub mod testing;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, BasicAuthenticator, Identity,
    NoneAuthenticator,
};
pub use blackhole::{Blackhole, BlackholeError};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, BackendConfig,
    Config, ConfigError, SanitizedConfig, ServerConfig,
};
pub use filter::{FilterError, FilterExpression, MetaField};
pub use orchestrator::{
    sort_candidates, GrabTarget, Movie, NoopHooks, ScoredCandidate, SearchHooks,
    SearchOrchestrator, SearchSettings, SortKey, TracingHooks, WarningLevel,
};
pub use release::{ParserDefaults, ReleaseMeta, ReleaseParser};
pub use searcher::{build_backends, Backend, RawCandidate, SearchError, TorznabBackend};
