//! Page loading with per-entry enrichment, and single-entry detail loading.

use futures_util::future::try_join_all;

use crate::api::{ApiError, CatalogEntrySummary, CatalogSource, EntryRecord};
use crate::state::{CatalogEntry, CatalogEntryDetail, PAGE_SIZE};

/// One enriched page, in the order the source listed it.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedPage {
    pub offset: u32,
    /// Summaries the source returned; fewer than [`PAGE_SIZE`] means exhaustion.
    pub summary_count: usize,
    pub entries: Vec<CatalogEntry>,
}

/// Numeric id from the trailing path segment of a reference url
/// (`.../pokemon/25/` or `.../pokemon/25`).
pub fn parse_entry_id(url: &str) -> Option<u32> {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .last()?
        .parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
}

/// Fetches one page of summaries and enriches every entry concurrently.
/// Any failing enrichment fails the whole page.
pub async fn load_page<S>(source: &S, offset: u32) -> Result<LoadedPage, ApiError>
where
    S: CatalogSource + ?Sized,
{
    let summaries = source.fetch_summaries(offset, PAGE_SIZE).await?;
    let summary_count = summaries.len();
    let entries = try_join_all(
        summaries
            .into_iter()
            .map(|summary| enrich_summary(source, summary)),
    )
    .await?;
    Ok(LoadedPage {
        offset,
        summary_count,
        entries,
    })
}

async fn enrich_summary<S>(source: &S, summary: CatalogEntrySummary) -> Result<CatalogEntry, ApiError>
where
    S: CatalogSource + ?Sized,
{
    // Name-only references are rejected rather than fetched by name.
    let id = parse_entry_id(&summary.reference_url)
        .ok_or_else(|| ApiError::InvalidReference(summary.reference_url.clone()))?;
    let record = source.fetch_record(&id.to_string()).await?;
    Ok(CatalogEntry {
        id,
        name: summary.name,
        default_image_url: record.sprite_default,
        alternate_image_url: record.sprite_artwork,
        type_names: record.types,
    })
}

pub async fn load_detail<S>(source: &S, id: &str) -> Result<CatalogEntryDetail, ApiError>
where
    S: CatalogSource + ?Sized,
{
    source.fetch_record(id).await.map(detail_from_record)
}

fn detail_from_record(record: EntryRecord) -> CatalogEntryDetail {
    CatalogEntryDetail {
        id: record.id,
        name: record.name,
        height_decimetres: record.height,
        weight_decagrams: record.weight,
        types: record.types,
        abilities: record.abilities,
        stats: record.stats,
        moves: record.moves,
        artwork_url: record.sprite_artwork,
    }
}
