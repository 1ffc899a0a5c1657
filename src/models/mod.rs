//! Data models shared by the service façade, the page state and the HTTP API

pub mod role_play;
pub mod solution;
pub mod token_map;

pub use role_play::{
    ChatMessage, Difficulty, RespondRequest, Role, RolePlaySession, RolePlayTurn, Scenario,
    SessionScore, StartSessionRequest,
};
pub use solution::{RecommendRequest, RecommendedProduct, RefineRequest, Solution, SolutionVersion};
pub use token_map::{
    ExportFormat, ExportedFile, GenerateTokenMapRequest, ProviderDistribution, TokenMapCategory,
    TokenMapData, TokenMapLayer, TokenMapPatch, UseCase,
};
