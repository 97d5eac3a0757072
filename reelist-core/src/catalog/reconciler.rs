//! Keeps local catalog rows in line with a volatile upstream catalog.
//!
//! The local cache is always treated as suspect: the upstream provider has
//! been observed to recycle identifiers for unrelated titles, so every
//! `ensure_fresh` re-fetches the upstream record and compares it against the
//! cached head before writing.

use chrono::Datelike;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::similarity::{
    YEAR_CHANGE_THRESHOLD, titles_differ_significantly,
};
use crate::database::ports::movies::{CatalogUpsert, MovieHead, MovieStore};
use crate::error::{CoreError, Result};
use crate::providers::tmdb::{
    CatalogProvider, MovieDetails, PosterSize, poster_url,
};
use reelist_model::{GenreSlots, MovieId};

/// What `ensure_fresh` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// No local row existed; a fresh one was inserted.
    Inserted,
    /// The local row was refreshed in place.
    Refreshed,
    /// The identifier was detected as reused: the stale row and all
    /// dependent watched/watchlist rows were purged before the insert.
    ReplacedAfterIdReuse,
    /// Upstream was unreachable but a local copy exists; it was kept as-is.
    StaleRetained,
}

/// Whether a cached record and the upstream record for the same identifier
/// look like two different films.
///
/// Requires both signals at once: titles sharing less than half their words
/// AND release years more than one apart (with both dates known). This is a
/// heuristic with deliberately conservative, behaviour-compatible
/// thresholds.
pub fn id_reuse_suspected(local: &MovieHead, upstream: &MovieDetails) -> bool {
    let title_changed =
        titles_differ_significantly(&local.title, &upstream.title);

    let year_changed = match (local.release_date, upstream.release_date) {
        (Some(old), Some(new)) => {
            (old.year() - new.year()).abs() > YEAR_CHANGE_THRESHOLD
        }
        _ => false,
    };

    title_changed && year_changed
}

#[derive(Clone)]
pub struct CatalogReconciler {
    provider: Arc<dyn CatalogProvider>,
    movies: Arc<dyn MovieStore>,
    image_base_url: String,
}

impl std::fmt::Debug for CatalogReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogReconciler")
            .field("image_base_url", &self.image_base_url)
            .finish_non_exhaustive()
    }
}

impl CatalogReconciler {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        movies: Arc<dyn MovieStore>,
        image_base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            movies,
            image_base_url: image_base_url.into(),
        }
    }

    /// Guarantee a local catalog row for `movie_id` exists and holds the
    /// latest upstream data.
    ///
    /// Fails with `UpstreamUnavailable` only when the row is absent locally
    /// AND the upstream fetch fails; with a local copy present, upstream
    /// failure retains the stale row and still reports success.
    pub async fn ensure_fresh(&self, movie_id: MovieId) -> Result<EnsureOutcome> {
        let head = self.movies.head(movie_id).await?;

        let details = match self.provider.fetch_movie(movie_id).await {
            Ok(details) => details,
            Err(err) => {
                return match head {
                    Some(_) => {
                        warn!(
                            %movie_id,
                            error = %err,
                            "upstream fetch failed, retaining stale catalog entry"
                        );
                        Ok(EnsureOutcome::StaleRetained)
                    }
                    None => Err(CoreError::UpstreamUnavailable(err.to_string())),
                };
            }
        };

        let reused = head
            .as_ref()
            .is_some_and(|local| id_reuse_suspected(local, &details));
        if reused {
            // The identifier now names a different film. User ratings and
            // reviews attached to the old title are invalid and are
            // discarded with it; this data loss is the documented policy.
            info!(
                %movie_id,
                old_title = %head.as_ref().map(|h| h.title.as_str()).unwrap_or_default(),
                new_title = %details.title,
                "identifier reuse detected, purging stale entry and dependents"
            );
            self.movies.purge(movie_id).await?;
        }

        // Best effort: a missing certification is not an error.
        let certification = match self.provider.fetch_certification(movie_id).await
        {
            Ok(certification) => certification,
            Err(err) => {
                debug!(%movie_id, error = %err, "certification fetch failed");
                None
            }
        };

        let record = build_upsert(details, certification, &self.image_base_url);
        self.movies.upsert(&record).await?;

        Ok(if reused {
            EnsureOutcome::ReplacedAfterIdReuse
        } else if head.is_some() {
            EnsureOutcome::Refreshed
        } else {
            EnsureOutcome::Inserted
        })
    }
}

fn build_upsert(
    details: MovieDetails,
    certification: Option<String>,
    image_base_url: &str,
) -> CatalogUpsert {
    let poster_url = details
        .poster_path
        .as_deref()
        .map(|path| poster_url(image_base_url, PosterSize::W500, path));
    let genre_codes: Vec<i32> = details.genres.iter().map(|g| g.id).collect();

    CatalogUpsert {
        // The upstream echo of the id is canonical.
        movie_id: MovieId::new(details.id),
        title: details.title,
        // 0 is the valid "unknown/unreleased" sentinel.
        runtime_minutes: details.runtime.unwrap_or(0),
        certification,
        language: details.original_language.filter(|s| !s.is_empty()),
        release_date: details.release_date,
        poster_path: details.poster_path,
        poster_url,
        adult: details.adult,
        overview: details.overview.filter(|s| !s.is_empty()),
        genres: GenreSlots::from_codes(&genre_codes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ports::movies::MockMovieStore;
    use crate::providers::tmdb::{Genre, MockCatalogProvider, ProviderError};
    use chrono::NaiveDate;
    use mockall::Sequence;
    use mockall::predicate::eq;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

    fn details(id: i64, title: &str, year: i32) -> MovieDetails {
        MovieDetails {
            id,
            title: title.to_string(),
            release_date: NaiveDate::from_ymd_opt(year, 6, 15),
            runtime: Some(120),
            genres: vec![
                Genre {
                    id: 18,
                    name: "Drama".to_string(),
                },
                Genre {
                    id: 53,
                    name: "Thriller".to_string(),
                },
            ],
            poster_path: Some("/poster.jpg".to_string()),
            overview: Some("A film.".to_string()),
            adult: false,
            original_language: Some("en".to_string()),
        }
    }

    fn head(title: &str, year: i32) -> MovieHead {
        MovieHead {
            title: title.to_string(),
            release_date: NaiveDate::from_ymd_opt(year, 6, 15),
        }
    }

    fn reconciler(
        provider: MockCatalogProvider,
        movies: MockMovieStore,
    ) -> CatalogReconciler {
        CatalogReconciler::new(Arc::new(provider), Arc::new(movies), IMAGE_BASE)
    }

    #[test]
    fn reuse_requires_both_title_and_year_change() {
        let old = head("Old Title", 2010);

        // Id 99 reassigned to a completely different film.
        assert!(id_reuse_suspected(
            &old,
            &details(99, "Completely Different Film", 2023)
        ));

        // Title changed, year close: a retitle, not a reuse.
        assert!(!id_reuse_suspected(
            &old,
            &details(99, "Completely Different Film", 2010)
        ));

        // Year changed, title similar: a corrected release date.
        assert!(!id_reuse_suspected(&old, &details(99, "Old Title", 2023)));

        // Either date missing disables the year signal entirely.
        let undated = MovieHead {
            title: "Old Title".to_string(),
            release_date: None,
        };
        assert!(!id_reuse_suspected(
            &undated,
            &details(99, "Completely Different Film", 2023)
        ));
    }

    #[tokio::test]
    async fn missing_locally_and_upstream_down_is_fatal() {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();

        movies
            .expect_head()
            .with(eq(MovieId::new(7)))
            .returning(|_| Ok(None));
        provider
            .expect_fetch_movie()
            .returning(|_| Err(ProviderError::ApiError("boom".to_string())));
        movies.expect_purge().never();
        movies.expect_upsert().never();

        let result = reconciler(provider, movies)
            .ensure_fresh(MovieId::new(7))
            .await;
        assert!(matches!(result, Err(CoreError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn cached_copy_survives_upstream_outage() {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();

        movies
            .expect_head()
            .returning(|_| Ok(Some(head("Old Title", 2010))));
        provider
            .expect_fetch_movie()
            .returning(|_| Err(ProviderError::ApiError("boom".to_string())));
        movies.expect_purge().never();
        movies.expect_upsert().never();

        let outcome = reconciler(provider, movies)
            .ensure_fresh(MovieId::new(7))
            .await
            .unwrap();
        assert_eq!(outcome, EnsureOutcome::StaleRetained);
    }

    #[tokio::test]
    async fn fresh_insert_writes_full_record() {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();

        movies.expect_head().returning(|_| Ok(None));
        provider
            .expect_fetch_movie()
            .returning(|_| Ok(details(603, "The Matrix", 1999)));
        provider
            .expect_fetch_certification()
            .returning(|_| Ok(Some("R".to_string())));
        movies.expect_purge().never();
        movies
            .expect_upsert()
            .withf(|record| {
                record.movie_id == MovieId::new(603)
                    && record.title == "The Matrix"
                    && record.certification.as_deref() == Some("R")
                    && record.poster_url.as_deref()
                        == Some("https://image.tmdb.org/t/p/w500/poster.jpg")
                    && record.genres.codes().collect::<Vec<_>>() == vec![18, 53]
            })
            .returning(|_| Ok(()));

        let outcome = reconciler(provider, movies)
            .ensure_fresh(MovieId::new(603))
            .await
            .unwrap();
        assert_eq!(outcome, EnsureOutcome::Inserted);
    }

    #[tokio::test]
    async fn certification_failure_degrades_to_none() {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();

        movies.expect_head().returning(|_| Ok(None));
        provider
            .expect_fetch_movie()
            .returning(|_| Ok(details(603, "The Matrix", 1999)));
        provider
            .expect_fetch_certification()
            .returning(|_| Err(ProviderError::ApiError("boom".to_string())));
        movies
            .expect_upsert()
            .withf(|record| record.certification.is_none())
            .returning(|_| Ok(()));

        let outcome = reconciler(provider, movies)
            .ensure_fresh(MovieId::new(603))
            .await
            .unwrap();
        assert_eq!(outcome, EnsureOutcome::Inserted);
    }

    #[tokio::test]
    async fn missing_runtime_defaults_to_zero() {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();

        movies.expect_head().returning(|_| Ok(None));
        provider.expect_fetch_movie().returning(|_| {
            let mut d = details(1, "Untitled Project", 2030);
            d.runtime = None;
            d.poster_path = None;
            d.overview = Some(String::new());
            Ok(d)
        });
        provider
            .expect_fetch_certification()
            .returning(|_| Ok(None));
        movies
            .expect_upsert()
            .withf(|record| {
                record.runtime_minutes == 0
                    && record.poster_url.is_none()
                    && record.overview.is_none()
            })
            .returning(|_| Ok(()));

        reconciler(provider, movies)
            .ensure_fresh(MovieId::new(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unchanged_upstream_refreshes_in_place() {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();

        movies
            .expect_head()
            .returning(|_| Ok(Some(head("The Matrix", 1999))));
        provider
            .expect_fetch_movie()
            .returning(|_| Ok(details(603, "The Matrix", 1999)));
        provider
            .expect_fetch_certification()
            .returning(|_| Ok(Some("R".to_string())));
        movies.expect_purge().never();
        movies.expect_upsert().returning(|_| Ok(()));

        let outcome = reconciler(provider, movies)
            .ensure_fresh(MovieId::new(603))
            .await
            .unwrap();
        assert_eq!(outcome, EnsureOutcome::Refreshed);
    }

    #[tokio::test]
    async fn id_reuse_purges_dependents_before_insert() {
        let mut provider = MockCatalogProvider::new();
        let mut movies = MockMovieStore::new();
        let mut seq = Sequence::new();

        movies
            .expect_head()
            .returning(|_| Ok(Some(head("Old Title", 2010))));
        provider
            .expect_fetch_movie()
            .returning(|_| Ok(details(99, "Completely Different Film", 2023)));
        provider
            .expect_fetch_certification()
            .returning(|_| Ok(None));

        movies
            .expect_purge()
            .with(eq(MovieId::new(99)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        movies
            .expect_upsert()
            .withf(|record| record.title == "Completely Different Film")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let outcome = reconciler(provider, movies)
            .ensure_fresh(MovieId::new(99))
            .await
            .unwrap();
        assert_eq!(outcome, EnsureOutcome::ReplacedAfterIdReuse);
    }
}
