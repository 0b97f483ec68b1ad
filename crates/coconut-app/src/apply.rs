// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{ApplicationContext, OfferingViewModel};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Listing,
    Login,
    SubscriptionApply,
    Monitoring,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Listing => "/",
            Self::Login => "/login",
            Self::SubscriptionApply => "/subscription/apply",
            Self::Monitoring => "/admin/monitoring",
        }
    }
}

/// Where to go after login, and the offering the user picked on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub redirect: Route,
    pub offering: OfferingViewModel,
}

impl LoginRedirect {
    pub fn resume(&self, session: &Session) -> Navigation {
        route_apply(&self.offering, session)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Login(LoginRedirect),
    ApplicationEntry(ApplicationContext),
}

impl Navigation {
    pub const fn route(&self) -> Route {
        match self {
            Self::Login(_) => Route::Login,
            Self::ApplicationEntry(_) => Route::SubscriptionApply,
        }
    }
}

/// Sends a signed-in user straight to the application form and everyone
/// else to login, carrying the offering along.
pub fn route_apply(offering: &OfferingViewModel, session: &Session) -> Navigation {
    match session {
        Session::Present(_) => {
            Navigation::ApplicationEntry(ApplicationContext::from_offering(offering))
        }
        Session::Absent | Session::Expired(_) => Navigation::Login(LoginRedirect {
            redirect: Route::SubscriptionApply,
            offering: offering.clone(),
        }),
    }
}
