//! Navigation routes: `/` for the listing, `/pokemon/{id}` for one entry.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Route {
    #[default]
    Listing,
    /// The id is passed to the data source as-is.
    Detail { id: String },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown route {0:?}; expected / or /pokemon/<id>")]
pub struct RouteError(pub String);

impl Route {
    pub fn detail(id: impl Into<String>) -> Self {
        Route::Detail { id: id.into() }
    }

    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Ok(Route::Listing),
            ["pokemon", id] => Ok(Route::detail(*id)),
            _ => Err(RouteError(path.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Listing => "/".to_string(),
            Route::Detail { id } => format!("/pokemon/{id}"),
        }
    }
}

impl std::str::FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}
