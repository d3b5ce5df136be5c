//! Named navigation targets.
//!
//! The session manager and the route guard never touch a router directly;
//! they signal one of these named targets and the navigation surface
//! resolves it to an actual view.

use serde::{Deserialize, Serialize};

/// A named navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationTarget {
    /// Public landing page.
    Home,

    /// Customer sign-in view.
    CustomerLogin,

    /// Staff sign-in view.
    StaffLogin,

    /// First-admin setup view, shown while no staff account exists.
    StaffSetup,

    /// Operations-metrics landing for admins.
    StaffMetrics,

    /// Reservations landing for assistants.
    StaffReservations,

    /// Reservations index; the demotion target for under-privileged staff.
    ReservationsIndex,
}

impl NavigationTarget {
    /// Get the target's route name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::CustomerLogin => "customer-login",
            Self::StaffLogin => "staff-login",
            Self::StaffSetup => "staff-setup",
            Self::StaffMetrics => "staff-metrics-landing",
            Self::StaffReservations => "staff-reservations-landing",
            Self::ReservationsIndex => "reservations-index",
        }
    }
}

impl std::fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
