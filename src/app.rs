//! Composition root.
//!
//! Construction order is fixed: the persisted itinerary is loaded into the
//! store before the travel client and any page exist, so no page can read
//! the store before it is initialized.

use std::sync::Arc;

use jiff::civil::Date;

use crate::api::{AmadeusClient, TravelApi};
use crate::config::Config;
use crate::display;
use crate::error::Result;
use crate::itinerary::{ItineraryStore, Subscription};
use crate::paths::storage_dir;
use crate::router::{NavigationState, Navigator, Route};
use crate::storage::FileKeyValueStore;
use crate::views::itinerary::view_details_state;
use crate::views::{
    Action, ActionKind, DestinationsPage, DetailsPage, HomePage, ItineraryPage, Page, Tab,
};

/// Open the itinerary store persisted under the configured root.
pub fn open_store(config: &Config) -> Arc<ItineraryStore> {
    let storage = FileKeyValueStore::new(storage_dir(), config.storage.capacity_bytes);
    Arc::new(ItineraryStore::initialize(
        storage,
        config.storage.itinerary_key.clone(),
    ))
}

/// A running session: configuration, the shared store, the travel client
/// and the navigation history.
pub struct App<A: TravelApi> {
    config: Config,
    store: Arc<ItineraryStore>,
    api: A,
    navigator: Navigator,
    tab: Tab,
    today: Date,
    _change_log: Subscription,
}

impl App<AmadeusClient> {
    pub fn from_config(config: Config) -> Result<Self> {
        let store = open_store(&config);
        let api = AmadeusClient::from_config(&config)?;
        Ok(Self::new(config, store, api))
    }
}

impl<A: TravelApi> App<A> {
    pub fn new(config: Config, store: Arc<ItineraryStore>, api: A) -> Self {
        let change_log = store.subscribe(|itinerary| {
            tracing::debug!(entries = itinerary.len(), "itinerary changed");
        });
        Self {
            config,
            store,
            api,
            navigator: Navigator::new(),
            tab: Tab::default(),
            today: display::today(),
            _change_log: change_log,
        }
    }

    /// Fix the date departure dates are computed from.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<ItineraryStore> {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Navigate to `route` and build the page.
    pub async fn open(&mut self, route: Route, state: Option<NavigationState>) -> Result<Page> {
        self.tab = Tab::default();
        self.navigator.navigate(route, state);
        self.current_page().await
    }

    /// Build the page for the current route and payload.
    pub async fn current_page(&self) -> Result<Page> {
        let visit = self.navigator.current();
        let page = match &visit.route {
            Route::Home => Page::Home(HomePage::new()),
            Route::Destinations { search } => {
                Page::Destinations(DestinationsPage::load(&self.api, search.as_deref()).await)
            }
            Route::DestinationDetails { city_code } => Page::Details(
                DetailsPage::load(
                    &self.api,
                    &self.store,
                    &self.config.travel,
                    city_code,
                    visit.state.as_ref(),
                    self.tab,
                    self.today,
                )
                .await?,
            ),
            Route::Itinerary => Page::Itinerary(ItineraryPage::new(&self.store)),
        };
        Ok(page)
    }

    /// Payload the UI would carry into the details page for `city_code`:
    /// a saved entry with that city code, else the first search result
    /// with a matching city code.
    pub async fn resolve_destination(&self, city_code: &str) -> Option<NavigationState> {
        let itinerary = self.store.current_itinerary();
        if let Some(saved) = itinerary.find_by_city_code(city_code) {
            return Some(view_details_state(saved));
        }

        match self.api.search_destinations(city_code).await {
            Ok(results) => results
                .into_iter()
                .find(|location| {
                    location
                        .city_code()
                        .is_some_and(|code| code.eq_ignore_ascii_case(city_code))
                })
                .map(NavigationState::new),
            Err(e) => {
                tracing::warn!(city_code, "destination lookup failed: {e}");
                None
            }
        }
    }

    /// Carry out `action` offered by `page` and return the resulting page.
    ///
    /// Store writes that fail are reported through the returned error only
    /// after the in-memory change is applied.
    pub async fn perform(&mut self, page: &mut Page, action: &Action) -> Result<Page> {
        match &action.kind {
            ActionKind::Navigate { route, state } => {
                self.open(route.clone(), state.clone()).await
            }
            ActionKind::Back => {
                if !self.navigator.back() {
                    self.navigator.home();
                }
                self.tab = Tab::default();
                self.current_page().await
            }
            ActionKind::SaveDestination => {
                if let Page::Details(details_page) = page
                    && let Some(details) = details_page.details_mut()
                {
                    details.save(&self.store)?;
                }
                Ok(page.clone())
            }
            ActionKind::RemoveDestination { id } => {
                self.store.remove(id)?;
                self.current_page().await
            }
            ActionKind::ClearItinerary => {
                self.store.clear()?;
                self.current_page().await
            }
            ActionKind::SelectTab { tab } => {
                self.tab = *tab;
                if let Page::Details(details_page) = page
                    && let Some(details) = details_page.details_mut()
                {
                    details.tab = *tab;
                }
                Ok(page.clone())
            }
            ActionKind::Inert => Ok(page.clone()),
        }
    }
}
