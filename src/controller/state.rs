//! Controller state and the pure transition function over it.
//!
//! Every user action and every request completion is an [`Event`]. [`reduce`]
//! turns the current [`AppState`] and one event into the next state plus the
//! [`Effect`]s the runtime has to carry out. Nothing in here performs I/O.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

use crate::api::types::NewSchool;
use crate::models::{
    Draft, DraftField, LocationField, School, StatusKind, StatusMessage, UserLocation,
};

/// How long a success message stays visible
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(3);

pub const ADD_SUCCEEDED_TEXT: &str = "School added successfully!";
pub const ADD_FAILED_TEXT: &str = "Failed to add school";
pub const FETCH_FAILED_TEXT: &str = "Failed to fetch schools";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub draft: Draft,
    pub location: UserLocation,
    /// Latest accepted listing, in backend order
    pub schools: Vec<School>,
    pub status: StatusMessage,
    pub last_refreshed: Option<DateTime<Utc>>,
    /// Sequence number of the most recently issued fetch
    pub latest_fetch: u64,
    /// Bumped on every status change; a scheduled clear must match it
    pub status_token: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    DraftChanged {
        field: DraftField,
        value: String,
    },
    LocationChanged {
        field: LocationField,
        value: String,
    },
    /// Draft passed input checks and should be stored
    SubmitRequested(NewSchool),
    RefreshRequested,
    SchoolAdded(School),
    AddFailed,
    SchoolsLoaded {
        seq: u64,
        schools: Vec<School>,
        received_at: DateTime<Utc>,
    },
    FetchFailed {
        seq: u64,
    },
    StatusExpired {
        token: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchSchools { seq: u64, location: UserLocation },
    AddSchool(NewSchool),
    ClearStatusAfter { token: u64, delay: Duration },
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(state: AppState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

pub fn reduce(state: AppState, event: Event) -> Transition {
    match event {
        Event::DraftChanged { field, value } => Transition::quiet(AppState {
            draft: state.draft.with_field(field, value),
            ..state
        }),

        Event::LocationChanged { field, value } => {
            let state = AppState {
                location: state.location.with_field(field, value),
                ..state
            };
            refresh(state)
        }

        Event::SubmitRequested(new_school) => Transition {
            state,
            effects: vec![Effect::AddSchool(new_school)],
        },

        Event::RefreshRequested => refresh(state),

        Event::SchoolAdded(_) => {
            let token = state.status_token + 1;
            let state = AppState {
                draft: Draft::default(),
                status: StatusMessage::success(ADD_SUCCEEDED_TEXT),
                status_token: token,
                ..state
            };

            let mut transition = refresh(state);
            transition.effects.push(Effect::ClearStatusAfter {
                token,
                delay: STATUS_CLEAR_DELAY,
            });
            transition
        }

        Event::AddFailed => Transition::quiet(with_status(state, StatusMessage::error(ADD_FAILED_TEXT))),

        Event::SchoolsLoaded {
            seq,
            schools,
            received_at,
        } => {
            if seq != state.latest_fetch {
                debug!(
                    "Discarding stale school list #{} (latest is #{})",
                    seq, state.latest_fetch
                );
                return Transition::quiet(state);
            }

            let state = AppState {
                schools,
                last_refreshed: Some(received_at),
                ..state
            };

            if state.status.kind == StatusKind::Error {
                Transition::quiet(with_status(state, StatusMessage::default()))
            } else {
                Transition::quiet(state)
            }
        }

        Event::FetchFailed { seq } => {
            if seq != state.latest_fetch {
                debug!(
                    "Ignoring failure of stale fetch #{} (latest is #{})",
                    seq, state.latest_fetch
                );
                return Transition::quiet(state);
            }
            Transition::quiet(with_status(state, StatusMessage::error(FETCH_FAILED_TEXT)))
        }

        Event::StatusExpired { token } => {
            if token == state.status_token && state.status.kind == StatusKind::Success {
                Transition::quiet(with_status(state, StatusMessage::default()))
            } else {
                Transition::quiet(state)
            }
        }
    }
}

fn refresh(state: AppState) -> Transition {
    if !state.location.is_complete() {
        return Transition::quiet(state);
    }

    let seq = state.latest_fetch + 1;
    let location = state.location.clone();
    Transition {
        state: AppState {
            latest_fetch: seq,
            ..state
        },
        effects: vec![Effect::FetchSchools { seq, location }],
    }
}

fn with_status(state: AppState, status: StatusMessage) -> AppState {
    AppState {
        status,
        status_token: state.status_token + 1,
        ..state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SchoolId;

    fn school(id: i64, name: &str, distance: f64) -> School {
        School {
            id: SchoolId::Number(id),
            name: name.into(),
            address: format!("{} Street", name),
            latitude: 0.0,
            longitude: 0.0,
            distance: Some(distance),
        }
    }

    fn located(lat: &str, lon: &str) -> AppState {
        AppState {
            location: UserLocation::new(lat, lon),
            ..AppState::default()
        }
    }

    fn location_changed(field: LocationField, value: &str) -> Event {
        Event::LocationChanged {
            field,
            value: value.into(),
        }
    }

    fn loaded(seq: u64, schools: Vec<School>) -> Event {
        Event::SchoolsLoaded {
            seq,
            schools,
            received_at: Utc::now(),
        }
    }

    #[test]
    fn draft_edits_have_no_effects() {
        let t = reduce(
            AppState::default(),
            Event::DraftChanged {
                field: DraftField::Name,
                value: "X".into(),
            },
        );
        assert_eq!(t.state.draft.name, "X");
        assert!(t.effects.is_empty());
    }

    #[test]
    fn completing_location_triggers_one_fetch() {
        let t = reduce(AppState::default(), location_changed(LocationField::Latitude, "1.23"));
        assert!(t.effects.is_empty());

        let t = reduce(t.state, location_changed(LocationField::Longitude, "4.56"));
        assert_eq!(
            t.effects,
            vec![Effect::FetchSchools {
                seq: 1,
                location: UserLocation::new("1.23", "4.56"),
            }]
        );
        assert_eq!(t.state.latest_fetch, 1);
    }

    #[test]
    fn every_edit_of_complete_location_fetches_current_values() {
        let t = reduce(located("1.23", "4.56"), location_changed(LocationField::Latitude, "7.5"));
        assert_eq!(
            t.effects,
            vec![Effect::FetchSchools {
                seq: 1,
                location: UserLocation::new("7.5", "4.56"),
            }]
        );
    }

    #[test]
    fn clearing_a_location_field_does_not_fetch() {
        let t = reduce(located("1.23", "4.56"), location_changed(LocationField::Longitude, ""));
        assert!(t.effects.is_empty());
        assert_eq!(t.state.latest_fetch, 0);
    }

    #[test]
    fn refresh_requires_complete_location() {
        assert!(reduce(located("1", ""), Event::RefreshRequested).effects.is_empty());

        let t = reduce(located("1", "2"), Event::RefreshRequested);
        assert_eq!(t.effects.len(), 1);
    }

    #[test]
    fn submit_requests_add_without_touching_state() {
        let body = NewSchool {
            name: "X".into(),
            address: "Y".into(),
            latitude: 1.0,
            longitude: 2.0,
        };
        let before = located("1", "2");
        let t = reduce(before.clone(), Event::SubmitRequested(body.clone()));
        assert_eq!(t.state, before);
        assert_eq!(t.effects, vec![Effect::AddSchool(body)]);
    }

    #[test]
    fn successful_add_resets_draft_refetches_and_schedules_clear() {
        let state = AppState {
            draft: Draft {
                name: "X".into(),
                address: "Y".into(),
                latitude: "1".into(),
                longitude: "2".into(),
            },
            latest_fetch: 1,
            ..located("1.23", "4.56")
        };

        let t = reduce(state, Event::SchoolAdded(school(9, "X", 0.0)));

        assert!(t.state.draft.is_empty());
        assert_eq!(t.state.status, StatusMessage::success(ADD_SUCCEEDED_TEXT));
        assert_eq!(
            t.effects,
            vec![
                Effect::FetchSchools {
                    seq: 2,
                    location: UserLocation::new("1.23", "4.56"),
                },
                Effect::ClearStatusAfter {
                    token: t.state.status_token,
                    delay: STATUS_CLEAR_DELAY,
                },
            ]
        );
    }

    #[test]
    fn successful_add_without_location_only_schedules_clear() {
        let t = reduce(AppState::default(), Event::SchoolAdded(school(9, "X", 0.0)));
        assert!(matches!(t.effects.as_slice(), [Effect::ClearStatusAfter { .. }]));
    }

    #[test]
    fn failed_add_keeps_draft_and_shows_error() {
        let state = AppState {
            draft: Draft {
                name: "X".into(),
                ..Draft::default()
            },
            ..AppState::default()
        };
        let t = reduce(state, Event::AddFailed);
        assert_eq!(t.state.draft.name, "X");
        assert_eq!(t.state.status, StatusMessage::error(ADD_FAILED_TEXT));
        assert!(t.effects.is_empty());
    }

    #[test]
    fn loaded_list_is_kept_in_backend_order() {
        let state = AppState {
            latest_fetch: 1,
            ..located("1.23", "4.56")
        };
        // Deliberately unsorted: ordering belongs to the backend.
        let schools = vec![school(2, "B", 5.0), school(1, "A", 2.5)];

        let t = reduce(state, loaded(1, schools.clone()));
        assert_eq!(t.state.schools, schools);
        assert!(t.state.last_refreshed.is_some());
    }

    #[test]
    fn stale_responses_are_discarded() {
        let state = AppState {
            latest_fetch: 2,
            ..located("1", "2")
        };

        let t = reduce(state.clone(), loaded(1, vec![school(1, "old", 1.0)]));
        assert_eq!(t.state, state);

        let t = reduce(state.clone(), Event::FetchFailed { seq: 1 });
        assert_eq!(t.state, state);
    }

    #[test]
    fn latest_fetch_failure_keeps_list_and_shows_error() {
        let state = AppState {
            latest_fetch: 1,
            schools: vec![school(1, "A", 2.5)],
            ..located("1", "2")
        };
        let t = reduce(state, Event::FetchFailed { seq: 1 });
        assert_eq!(t.state.schools.len(), 1);
        assert_eq!(t.state.status, StatusMessage::error(FETCH_FAILED_TEXT));
    }

    #[test]
    fn successful_fetch_clears_error_but_not_success() {
        let errored = AppState {
            latest_fetch: 1,
            status: StatusMessage::error(FETCH_FAILED_TEXT),
            ..located("1", "2")
        };
        let t = reduce(errored, loaded(1, vec![]));
        assert!(t.state.status.is_none());

        let succeeded = AppState {
            latest_fetch: 1,
            status: StatusMessage::success(ADD_SUCCEEDED_TEXT),
            ..located("1", "2")
        };
        let t = reduce(succeeded, loaded(1, vec![]));
        assert_eq!(t.state.status.kind, StatusKind::Success);
    }

    #[test]
    fn success_expires_only_for_current_token() {
        let t = reduce(AppState::default(), Event::SchoolAdded(school(1, "A", 0.0)));
        let first_token = t.state.status_token;

        let t = reduce(t.state, Event::SchoolAdded(school(2, "B", 0.0)));
        let t = reduce(t.state, Event::StatusExpired { token: first_token });
        assert_eq!(t.state.status.kind, StatusKind::Success);

        let current = t.state.status_token;
        let t = reduce(t.state, Event::StatusExpired { token: current });
        assert!(t.state.status.is_none());
    }

    #[test]
    fn error_is_not_cleared_by_pending_success_timer() {
        let t = reduce(AppState::default(), Event::SchoolAdded(school(1, "A", 0.0)));
        let token = t.state.status_token;

        let t = reduce(t.state, Event::AddFailed);
        let t = reduce(t.state, Event::StatusExpired { token });
        assert_eq!(t.state.status, StatusMessage::error(ADD_FAILED_TEXT));
    }
}
