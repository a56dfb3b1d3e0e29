//! PokeAPI client

use std::sync::OnceLock;

use async_trait::async_trait;
use serde::Deserialize;

use crate::state::BaseStat;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("no numeric id in reference url {0}")]
    InvalidReference(String),
}

/// One row of the page-list endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntrySummary {
    pub name: String,
    pub reference_url: String,
}

/// The parts of a single-entry record the screens use.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryRecord {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<BaseStat>,
    pub moves: Vec<String>,
    pub sprite_default: Option<String>,
    pub sprite_artwork: Option<String>,
}

/// Read-only access to the creature catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_summaries(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<CatalogEntrySummary>, ApiError>;

    async fn fetch_record(&self, id: &str) -> Result<EntryRecord, ApiError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    moves: Vec<PokemonMoveSlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

pub fn decode_summaries(bytes: &[u8]) -> Result<Vec<CatalogEntrySummary>, ApiError> {
    let response: ListResponse =
        serde_json::from_slice(bytes).map_err(|err| ApiError::Decode(err.to_string()))?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| CatalogEntrySummary {
            name: entry.name,
            reference_url: entry.url,
        })
        .collect())
}

pub fn decode_record(bytes: &[u8]) -> Result<EntryRecord, ApiError> {
    let response: PokemonResponse =
        serde_json::from_slice(bytes).map_err(|err| ApiError::Decode(err.to_string()))?;

    let types = response
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let stats = response
        .stats
        .into_iter()
        .map(|slot| BaseStat {
            name: slot.stat.name,
            base_value: slot.base_stat,
        })
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| slot.ability.name)
        .collect();
    let moves = response
        .moves
        .into_iter()
        .map(|slot| slot.move_info.name)
        .collect();

    Ok(EntryRecord {
        id: response.id,
        name: response.name,
        height: response.height,
        weight: response.weight,
        types,
        abilities,
        stats,
        moves,
        sprite_default: pointer_string(&response.sprites, "/front_default"),
        sprite_artwork: pointer_string(
            &response.sprites,
            "/other/official-artwork/front_default",
        ),
    })
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// HTTP implementation of [`CatalogSource`].
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    base: String,
    http: reqwest::Client,
}

impl PokeApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        check_status(url, response.status())?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn check_status(url: &str, status: reqwest::StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    tracing::warn!(%url, status = status.as_u16(), "non-success response");
    Err(ApiError::Status {
        url: url.to_string(),
        status: status.as_u16(),
    })
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_summaries(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<CatalogEntrySummary>, ApiError> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base);
        let bytes = self.get(&url).await?;
        let summaries = decode_summaries(&bytes)?;
        tracing::info!(offset, limit, returned = summaries.len(), "fetched page");
        Ok(summaries)
    }

    async fn fetch_record(&self, id: &str) -> Result<EntryRecord, ApiError> {
        let url = format!("{}/pokemon/{id}", self.base);
        let bytes = self.get(&url).await?;
        decode_record(&bytes)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.get(url).await
    }
}

static CLIENT: OnceLock<PokeApiClient> = OnceLock::new();

/// Sets the API base for the process-wide client. Only the first call wins.
pub fn configure(base: &str) -> bool {
    CLIENT.set(PokeApiClient::new(base)).is_ok()
}

pub fn client() -> &'static PokeApiClient {
    CLIENT.get_or_init(|| PokeApiClient::new(DEFAULT_API_BASE))
}
