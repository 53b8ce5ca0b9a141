//! Explorer session state.
//!
//! Models the location/places flow as explicit transitions. Every search is
//! stamped with a generation token and a completion is applied only while
//! its token is still current, so a slow response superseded by a refresh or
//! a radius change can never overwrite newer state.

use thiserror::Error;

use crate::{geo::GeoLocation, nearby::Place, prelude::*};

/// Why a location reading could not be obtained.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location information is unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,
}

/// Token identifying one search attempt.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug, Default)]
pub enum ExplorerState {
    #[default]
    NoLocation,
    LocationRequested,
    LocationDenied {
        message: String,
    },
    LocationGranted {
        location: GeoLocation,
    },
    PlacesLoading {
        location: GeoLocation,
    },
    PlacesReady {
        location: GeoLocation,
        places: Vec<Place>,
    },
    PlacesFailed {
        location: GeoLocation,
        message: String,
    },
}

/// One explorer session. No state is terminal: denied permissions and failed
/// searches may always be retried.
#[derive(Default)]
pub struct Explorer {
    state: ExplorerState,
    generation: u64,
}

impl Explorer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ExplorerState {
        &self.state
    }

    pub fn request_location(&mut self) {
        self.state = ExplorerState::LocationRequested;
    }

    pub fn location_granted(&mut self, location: GeoLocation) {
        self.state = ExplorerState::LocationGranted { location };
    }

    pub fn location_denied(&mut self, error: &LocationError) {
        self.state = ExplorerState::LocationDenied { message: error.to_string() };
    }

    /// Enter `PlacesLoading` and hand out the token for this attempt.
    ///
    /// Bumping the generation here implicitly invalidates any still-running
    /// search.
    pub fn begin_search(&mut self) -> Result<Generation> {
        let location = match &self.state {
            ExplorerState::LocationGranted { location }
            | ExplorerState::PlacesLoading { location }
            | ExplorerState::PlacesReady { location, .. }
            | ExplorerState::PlacesFailed { location, .. } => *location,
            ExplorerState::NoLocation
            | ExplorerState::LocationRequested
            | ExplorerState::LocationDenied { .. } => {
                bail!("cannot search for places without a location");
            }
        };
        self.generation += 1;
        self.state = ExplorerState::PlacesLoading { location };
        Ok(Generation(self.generation))
    }

    /// Apply a search completion.
    ///
    /// Returns `false` when the token is stale and the completion was
    /// discarded.
    pub fn complete_search(
        &mut self,
        generation: Generation,
        result: Result<Vec<Place>>,
    ) -> bool {
        if generation.0 != self.generation {
            debug!(?generation, current = self.generation, "Discarding a stale completion");
            return false;
        }
        let ExplorerState::PlacesLoading { location } = &self.state else {
            return false;
        };
        let location = *location;
        self.state = match result {
            Ok(places) => ExplorerState::PlacesReady { location, places },
            Err(error) => {
                ExplorerState::PlacesFailed { location, message: format!("{error:#}") }
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KATHMANDU: GeoLocation = GeoLocation { latitude: 27.7172, longitude: 85.3240 };

    #[test]
    fn happy_path_ok() -> Result {
        let mut explorer = Explorer::new();
        explorer.request_location();
        explorer.location_granted(KATHMANDU);
        let generation = explorer.begin_search()?;
        assert!(matches!(explorer.state(), ExplorerState::PlacesLoading { .. }));
        assert!(explorer.complete_search(generation, Ok(Vec::new())));
        assert!(matches!(explorer.state(), ExplorerState::PlacesReady { .. }));
        Ok(())
    }

    #[test]
    fn denied_location_is_not_terminal() {
        let mut explorer = Explorer::new();
        explorer.request_location();
        explorer.location_denied(&LocationError::PermissionDenied);
        assert!(explorer.begin_search().is_err());
        // The user re-triggers the request and grants it this time.
        explorer.request_location();
        explorer.location_granted(KATHMANDU);
        assert!(explorer.begin_search().is_ok());
    }

    #[test]
    fn stale_completion_is_discarded() -> Result {
        let mut explorer = Explorer::new();
        explorer.location_granted(KATHMANDU);
        let first = explorer.begin_search()?;
        // A refresh supersedes the first search while it is in flight.
        let second = explorer.begin_search()?;
        assert!(!explorer.complete_search(first, Ok(Vec::new())));
        assert!(matches!(explorer.state(), ExplorerState::PlacesLoading { .. }));
        assert!(explorer.complete_search(second, Err(anyhow!("transport error"))));
        assert!(matches!(explorer.state(), ExplorerState::PlacesFailed { .. }));
        Ok(())
    }

    #[test]
    fn failed_search_may_be_retried() -> Result {
        let mut explorer = Explorer::new();
        explorer.location_granted(KATHMANDU);
        let generation = explorer.begin_search()?;
        assert!(explorer.complete_search(generation, Err(anyhow!("503"))));
        let retry = explorer.begin_search()?;
        assert!(explorer.complete_search(retry, Ok(Vec::new())));
        assert!(matches!(explorer.state(), ExplorerState::PlacesReady { .. }));
        Ok(())
    }
}
