pub mod attributes;
pub mod loaders;
pub mod program;
pub mod question_type;
pub mod route;
pub mod search;
pub mod taxonomy;
pub mod telemetry;

pub use attributes::{LastOpenedUnit, QuestionTopicSelection, Role, SelectedAttributes};
pub use loaders::{load_program_details, load_user_profile};
pub use program::{ProgramDetails, UserProfile};
pub use question_type::QuestionType;
pub use route::{RouteData, RouteParams, RouteSnapshot};
pub use search::{
    ContentCard, DisplayFacets, Facet, FacetValue, FilterFacet, FilterSet, NoResultMessage,
    QueryParams, RangeOption, SearchRequest, SearchResponse, SearchResult,
};
pub use taxonomy::{Category, FrameworkData, FrameworkResponse, Term};
pub use telemetry::{
    CardEvent, ImpressionContext, ImpressionEdata, ImpressionEvent, InteractEdata, InviewEntry,
    InviewEvent, InviewItem, TelemetryDescriptor,
};
