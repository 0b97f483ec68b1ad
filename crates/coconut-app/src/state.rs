// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::apply::{LoginRedirect, Navigation, Route, route_apply};
use crate::filter::SearchQuery;
use crate::login::welcome_message;
use crate::model::{ApplicationContext, OfferingViewModel};
use crate::pagination::Pagination;
use crate::session::{SESSION_EXPIRED_MESSAGE, Session};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Listing,
    Login,
    Apply,
    Monitoring,
}

impl Screen {
    pub const ALL: [Self; 4] = [Self::Listing, Self::Login, Self::Apply, Self::Monitoring];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Listing => "공모주 청약",
            Self::Login => "로그인",
            Self::Apply => "청약 신청",
            Self::Monitoring => "시스템 모니터링",
        }
    }

    pub const fn route(self) -> Route {
        match self {
            Self::Listing => Route::Listing,
            Self::Login => Route::Login,
            Self::Apply => Route::SubscriptionApply,
            Self::Monitoring => Route::Monitoring,
        }
    }
}

/// A message the user has to acknowledge before doing anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub search: SearchQuery,
    pub pagination: Pagination,
    pub session: Session,
    pub pending_redirect: Option<LoginRedirect>,
    pub application: Option<ApplicationContext>,
    pub notification: Option<Notification>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::Listing,
            search: SearchQuery::default(),
            pagination: Pagination::default(),
            session: Session::Absent,
            pending_redirect: None,
            application: None,
            notification: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    ShowScreen(Screen),
    SelectPage(u32),
    NextPage,
    PrevPage,
    SetTotalPages(Option<u32>),
    PushSearchChar(char),
    PopSearchChar,
    ClearSearch,
    ToggleSearchField,
    /// `now` re-checks the session before routing.
    Apply {
        offering: OfferingViewModel,
        now: OffsetDateTime,
    },
    SignedIn { session: Session, username: String },
    SignOut,
    Notify(Notification),
    DismissNotification,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(Screen),
    /// The listing must be refetched for this page.
    PageChanged(u32),
    SearchChanged,
    Navigated(Route),
    SessionChanged,
    NotificationShown,
    NotificationDismissed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::ShowScreen(screen) => self.show_screen(screen),
            AppCommand::SelectPage(page) => {
                let changed = self.pagination.select(page);
                self.page_events(changed)
            }
            AppCommand::NextPage => {
                let changed = self.pagination.next();
                self.page_events(changed)
            }
            AppCommand::PrevPage => {
                let changed = self.pagination.prev();
                self.page_events(changed)
            }
            AppCommand::SetTotalPages(total) => {
                let changed = self.pagination.set_total_pages(total);
                self.page_events(changed)
            }
            AppCommand::PushSearchChar(ch) => {
                self.search.term.push(ch);
                vec![AppEvent::SearchChanged]
            }
            AppCommand::PopSearchChar => {
                if self.search.term.pop().is_none() {
                    return Vec::new();
                }
                vec![AppEvent::SearchChanged]
            }
            AppCommand::ClearSearch => {
                if self.search.term.is_empty() {
                    return Vec::new();
                }
                self.search.term.clear();
                vec![AppEvent::SearchChanged]
            }
            AppCommand::ToggleSearchField => {
                self.search.field = self.search.field.toggle();
                let label = format!("검색 기준: {}", self.search.field.label());
                vec![AppEvent::SearchChanged, self.set_status(&label)]
            }
            AppCommand::Apply { offering, now } => {
                let expired = self.session.expire_at(now);
                let navigation = route_apply(&offering, &self.session);
                let mut events = self.navigate(navigation);
                if expired {
                    events.push(AppEvent::SessionChanged);
                    events.push(self.set_status(SESSION_EXPIRED_MESSAGE));
                }
                events
            }
            AppCommand::SignedIn { session, username } => {
                self.session = session;
                self.notification = Some(Notification::new("로그인", welcome_message(&username)));
                let mut events = vec![AppEvent::SessionChanged, AppEvent::NotificationShown];
                match self.pending_redirect.take() {
                    Some(redirect) => {
                        let navigation = redirect.resume(&self.session);
                        events.extend(self.navigate(navigation));
                    }
                    None => events.extend(self.show_screen(Screen::Listing)),
                }
                events
            }
            AppCommand::SignOut => {
                self.session = Session::Absent;
                self.application = None;
                let mut events = vec![AppEvent::SessionChanged, self.set_status("로그아웃했습니다.")];
                if self.screen == Screen::Apply {
                    events.extend(self.show_screen(Screen::Listing));
                }
                events
            }
            AppCommand::Notify(notification) => {
                self.notification = Some(notification);
                vec![AppEvent::NotificationShown]
            }
            AppCommand::DismissNotification => {
                if self.notification.take().is_none() {
                    return Vec::new();
                }
                vec![AppEvent::NotificationDismissed]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn show_screen(&mut self, screen: Screen) -> Vec<AppEvent> {
        if self.screen == Screen::Login && screen != Screen::Login {
            self.pending_redirect = None;
        }
        if screen != Screen::Apply {
            self.application = None;
        }
        self.screen = screen;
        vec![AppEvent::ScreenChanged(screen)]
    }

    fn navigate(&mut self, navigation: Navigation) -> Vec<AppEvent> {
        let route = navigation.route();
        let mut events = vec![AppEvent::Navigated(route)];
        match navigation {
            Navigation::Login(redirect) => {
                events.extend(self.show_screen(Screen::Login));
                self.pending_redirect = Some(redirect);
                events.push(self.set_status("청약 신청을 위해 로그인이 필요합니다."));
            }
            Navigation::ApplicationEntry(context) => {
                events.extend(self.show_screen(Screen::Apply));
                self.application = Some(context);
            }
        }
        events
    }

    fn page_events(&self, changed: bool) -> Vec<AppEvent> {
        if changed {
            vec![AppEvent::PageChanged(self.pagination.current_page())]
        } else {
            Vec::new()
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, Screen};
    use crate::{
        OfferingViewModel, Route, SESSION_EXPIRED_MESSAGE, Session, SessionToken,
        normalize_offering, sample_raw_offering,
    };
    use base64::Engine;
    use time::OffsetDateTime;

    const NOW: i64 = 1_700_000_000;

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(seconds).expect("valid timestamp")
    }

    fn apply(offering: OfferingViewModel) -> AppCommand {
        AppCommand::Apply {
            offering,
            now: at(NOW),
        }
    }

    fn signed_in() -> Session {
        Session::Present(SessionToken::new("token").expect("token"))
    }

    fn token_expiring_at(exp: i64) -> SessionToken {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let payload = engine.encode(format!(r#"{{"sub":"kim","exp":{exp}}}"#));
        SessionToken::new(format!("{}.{payload}.sig", engine.encode("{}"))).expect("token")
    }

    fn page_changes(events: &[AppEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, AppEvent::PageChanged(_)))
            .count()
    }

    #[test]
    fn each_page_change_emits_one_refetch_regardless_of_search() {
        let mut state = AppState::default();
        for ch in "테스트".chars() {
            let events = state.dispatch(AppCommand::PushSearchChar(ch));
            assert_eq!(page_changes(&events), 0);
        }

        let events = state.dispatch(AppCommand::SelectPage(2));
        assert_eq!(events, vec![AppEvent::PageChanged(2)]);

        let events = state.dispatch(AppCommand::SelectPage(2));
        assert!(events.is_empty());

        let events = state.dispatch(AppCommand::NextPage);
        assert_eq!(page_changes(&events), 1);
        assert_eq!(state.pagination.current_page(), 3);
        assert_eq!(state.search.term, "테스트");
    }

    #[test]
    fn search_edits_never_touch_the_page() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SelectPage(4));
        state.dispatch(AppCommand::PushSearchChar('a'));
        state.dispatch(AppCommand::ToggleSearchField);
        state.dispatch(AppCommand::PopSearchChar);
        assert!(state.dispatch(AppCommand::ClearSearch).is_empty());
        assert_eq!(state.pagination.current_page(), 4);
    }

    #[test]
    fn shrinking_total_refetches_clamped_page() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SelectPage(5));
        let events = state.dispatch(AppCommand::SetTotalPages(Some(3)));
        assert_eq!(events, vec![AppEvent::PageChanged(3)]);
        assert!(state.dispatch(AppCommand::SetTotalPages(Some(3))).is_empty());
    }

    #[test]
    fn apply_without_session_goes_to_login_and_resumes() {
        let offering = normalize_offering(&sample_raw_offering());
        let mut state = AppState::default();

        let events = state.dispatch(apply(offering.clone()));
        assert_eq!(events[0], AppEvent::Navigated(Route::Login));
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(
            state
                .pending_redirect
                .as_ref()
                .map(|redirect| &redirect.offering),
            Some(&offering)
        );

        let events = state.dispatch(AppCommand::SignedIn {
            session: signed_in(),
            username: "kim".to_owned(),
        });
        assert!(events.contains(&AppEvent::Navigated(Route::SubscriptionApply)));
        assert_eq!(state.screen, Screen::Apply);
        assert!(state.pending_redirect.is_none());
        assert_eq!(
            state.application.as_ref().map(|context| &context.offering),
            Some(&offering)
        );
        assert_eq!(
            state.notification.as_ref().map(|note| note.body.as_str()),
            Some("kim님, 오셨군요! 환영합니다!")
        );
    }

    #[test]
    fn apply_with_session_opens_application_directly() {
        let offering = normalize_offering(&sample_raw_offering());
        let mut state = AppState {
            session: signed_in(),
            ..AppState::default()
        };

        state.dispatch(apply(offering.clone()));
        assert_eq!(state.screen, Screen::Apply);
        assert!(state.pending_redirect.is_none());
        assert_eq!(
            state.application.as_ref().map(|context| &context.offering),
            Some(&offering)
        );
    }

    #[test]
    fn apply_rechecks_expiry_of_a_running_session() {
        let offering = normalize_offering(&sample_raw_offering());
        let token = token_expiring_at(NOW + 1);
        let mut state = AppState {
            session: Session::from_token(Some(token.clone()), at(NOW)),
            ..AppState::default()
        };
        assert!(state.session.is_authenticated());

        let events = state.dispatch(AppCommand::Apply {
            offering: offering.clone(),
            now: at(NOW + 2),
        });
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(state.session, Session::Expired(token));
        assert!(events.contains(&AppEvent::SessionChanged));
        assert_eq!(state.status_line.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(state.application.is_none());
        assert_eq!(
            state
                .pending_redirect
                .as_ref()
                .map(|redirect| &redirect.offering),
            Some(&offering)
        );
    }

    #[test]
    fn apply_before_expiry_keeps_the_session() {
        let mut state = AppState {
            session: Session::Present(token_expiring_at(NOW + 60)),
            ..AppState::default()
        };
        let events = state.dispatch(apply(normalize_offering(&sample_raw_offering())));
        assert_eq!(state.screen, Screen::Apply);
        assert!(!events.contains(&AppEvent::SessionChanged));
    }

    #[test]
    fn leaving_login_drops_pending_redirect() {
        let mut state = AppState::default();
        state.dispatch(apply(normalize_offering(&sample_raw_offering())));
        state.dispatch(AppCommand::ShowScreen(Screen::Listing));
        assert!(state.pending_redirect.is_none());

        state.dispatch(AppCommand::SignedIn {
            session: signed_in(),
            username: "kim".to_owned(),
        });
        assert_eq!(state.screen, Screen::Listing);
    }

    #[test]
    fn sign_out_leaves_application_screen() {
        let mut state = AppState {
            session: signed_in(),
            ..AppState::default()
        };
        state.dispatch(apply(normalize_offering(&sample_raw_offering())));
        let events = state.dispatch(AppCommand::SignOut);
        assert!(events.contains(&AppEvent::SessionChanged));
        assert_eq!(state.session, Session::Absent);
        assert_eq!(state.screen, Screen::Listing);
        assert!(state.application.is_none());
    }

    #[test]
    fn notification_dismissal() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::DismissNotification).is_empty());
        state.dispatch(AppCommand::Notify(super::Notification::new("오류", "실패")));
        assert_eq!(
            state.dispatch(AppCommand::DismissNotification),
            vec![AppEvent::NotificationDismissed]
        );
    }
}
