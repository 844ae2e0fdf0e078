//! Configuration façade
//!
//! Owns the global and local bundle listings, the registered repo sources
//! and their cached listings, and the content-addressed store for the
//! duration of one command invocation. The dispatcher loads it once;
//! every mutation persists through a façade method. There is no
//! process-wide singleton.

pub mod listing;
pub mod repos;

use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::bundle::Bundle;
use crate::content::ContentId;
use crate::error::{PackwrightError, Result};
use crate::fetcher::FetchStrategy;
use crate::store::BundleStore;

pub use listing::Listing;
pub use repos::{RepoSet, slug};

/// Environment override for the global packwright directory
pub const HOME_ENV: &str = "PACKWRIGHT_HOME";

/// File name repo sources must serve their listing under
pub const LISTING_FILE: &str = "bundles.json";

pub struct Config {
    home: PathBuf,
    project: PathBuf,
    /// Entries published from this host (home/bundles.json)
    own: Listing,
    /// Cached listings contributed by repo sources, keyed by slug
    repo_listings: Vec<(String, Listing)>,
    /// Bundles materialized into the current project
    local: Listing,
    sources: RepoSet,
    store: BundleStore,
}

impl Config {
    /// Resolve the global directory: `$PACKWRIGHT_HOME` or `~/.packwright`
    pub fn home_dir() -> Result<PathBuf> {
        if let Ok(home) = env::var(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }
        dirs::home_dir()
            .map(|h| h.join(".packwright"))
            .ok_or(PackwrightError::HomeDirNotFound)
    }

    /// Load the façade for a project directory, resolving home from the
    /// environment
    pub fn load(project: PathBuf) -> Result<Self> {
        Self::load_with(Self::home_dir()?, project)
    }

    /// Load with an explicit global directory (tests drive this directly)
    pub fn load_with(home: PathBuf, project: PathBuf) -> Result<Self> {
        let own = Listing::load(&home.join(LISTING_FILE))?;
        let local = Listing::load(&project.join(".packwright").join(LISTING_FILE))?;
        let sources = RepoSet::load(&home.join("repos.json"))?;

        let mut repo_listings = Vec::new();
        for source in sources.sources() {
            let slug = slug(&source.uri);
            let cache = home.join("repos").join(format!("{slug}.json"));
            if cache.exists() {
                repo_listings.push((slug, Listing::load(&cache)?));
            }
        }

        let store = BundleStore::new(home.join("storage"));
        Ok(Self {
            home,
            project,
            own,
            repo_listings,
            local,
            sources,
            store,
        })
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    pub fn store(&self) -> &BundleStore {
        &self.store
    }

    // Global listing: own published entries merged with repo caches

    /// Every global record sharing `name`, (name, id) deduplicated
    pub fn global_candidates(&self, name: &str) -> Vec<Bundle> {
        let mut out: Vec<Bundle> = Vec::new();
        let all = std::iter::once(&self.own).chain(self.repo_listings.iter().map(|(_, l)| l));
        for listing in all {
            for bundle in listing.get(name) {
                if !out.iter().any(|b| b.id == bundle.id) {
                    out.push(bundle.clone());
                }
            }
        }
        out
    }

    /// Global lookup by content identifier
    pub fn global_by_id(&self, cid: &ContentId) -> Option<Bundle> {
        std::iter::once(&self.own)
            .chain(self.repo_listings.iter().map(|(_, l)| l))
            .find_map(|l| l.get_by_id(cid))
            .cloned()
    }

    /// Register a record in the global own-listing and persist
    pub fn add_global(&mut self, bundle: Bundle) -> Result<()> {
        self.own.add(bundle);
        self.own.save(&self.home.join(LISTING_FILE))
    }

    // Local listing

    pub fn local_candidates(&self, name: &str) -> Vec<Bundle> {
        self.local.get(name).to_vec()
    }

    /// Register a record in the project-local listing and persist
    pub fn add_local(&mut self, bundle: Bundle) -> Result<()> {
        self.local.add(bundle);
        self.local
            .save(&self.project.join(".packwright").join(LISTING_FILE))
    }

    // Repo sources

    /// Registered source uris
    pub fn repo_sources(&self) -> Vec<String> {
        self.sources.sources().iter().map(|s| s.uri.clone()).collect()
    }

    /// Register a source and perform its initial listing fetch.
    /// The source is not registered when the fetch fails.
    pub fn repo_add(&mut self, uri: &str) -> Result<()> {
        let listing = self.fetch_listing(uri)?;
        self.cache_listing(uri, &listing)?;
        self.sources.add(uri.to_string());
        self.sources.save(&self.home.join("repos.json"))?;
        self.repo_listings.push((slug(uri), listing));
        Ok(())
    }

    /// Re-fetch one source's listing, or all when `uri` is `None`.
    /// Each source's failure is independent; failures are returned so the
    /// caller can report them without aborting the rest.
    pub fn repo_update(&mut self, uri: Option<&str>) -> Result<Vec<(String, PackwrightError)>> {
        let targets: Vec<String> = match uri {
            Some(uri) => {
                if !self.sources.contains(uri) {
                    return Err(PackwrightError::UnknownRepoSource {
                        uri: uri.to_string(),
                    });
                }
                vec![uri.to_string()]
            }
            None => self.repo_sources(),
        };

        let mut failures = Vec::new();
        for target in targets {
            match self.fetch_listing(&target) {
                Ok(listing) => {
                    self.cache_listing(&target, &listing)?;
                    let slug = slug(&target);
                    match self.repo_listings.iter_mut().find(|(s, _)| *s == slug) {
                        Some(entry) => entry.1 = listing,
                        None => self.repo_listings.push((slug, listing)),
                    }
                }
                Err(e) => failures.push((target, e)),
            }
        }
        Ok(failures)
    }

    /// Unregister a source and drop its cached listing from future lookups
    pub fn repo_rm(&mut self, uri: &str) -> Result<()> {
        if !self.sources.remove(uri) {
            return Err(PackwrightError::UnknownRepoSource {
                uri: uri.to_string(),
            });
        }
        self.sources.save(&self.home.join("repos.json"))?;

        let slug = slug(uri);
        self.repo_listings.retain(|(s, _)| *s != slug);
        let cache = self.home.join("repos").join(format!("{slug}.json"));
        if cache.exists() {
            fs::remove_file(&cache)?;
        }
        Ok(())
    }

    fn fetch_listing(&self, uri: &str) -> Result<Listing> {
        let strategy = FetchStrategy::select(uri);
        let mut reader =
            strategy
                .open(LISTING_FILE)
                .map_err(|e| PackwrightError::ListingSourceUnreachable {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                })?;
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| PackwrightError::ListingSourceUnreachable {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;
        Listing::from_json(&text).map_err(|e| PackwrightError::ListingSourceUnreachable {
            uri: uri.to_string(),
            reason: e.to_string(),
        })
    }

    fn cache_listing(&self, uri: &str, listing: &Listing) -> Result<()> {
        let cache = self.home.join("repos").join(format!("{}.json", slug(uri)));
        listing.save(&cache)
    }
}
